//! Challenge-response authentication.
//!
//! Right after `connect`, the server invokes `authenticationDetails` with a
//! property list:
//!
//! ```text
//! authenticationDetails(..., {
//!     randomAuth: 12345,
//!     tvFeeActivated: false,
//!     locatedInBroadcastTerritory: true,
//! })
//! ```
//!
//! The player must answer with `authenticateRandomNumber(response)`, where
//! the response is a fixed transform of `randomAuth`. Until it does, the
//! server ignores every other request.

use std::collections::HashMap;

use rml_amf0::Amf0Value;

use super::codec::FlexMessage;
use crate::{error::Result, session::Entitlements, transport::Transport};

/// Name of the message carrying the response.
pub const AUTHENTICATE_RANDOM_NUMBER: &str = "authenticateRandomNumber";

const PROPERTY_CHALLENGE: &str = "randomAuth";
const PROPERTY_TV_FEE_ACTIVATED: &str = "tvFeeActivated";
const PROPERTY_IN_BROADCAST_TERRITORY: &str = "locatedInBroadcastTerritory";

const OFFSET: i64 = 447_537_687;
const MODULUS: i64 = 6_834_253;

/// Computes the response to a server challenge.
///
/// The result is `(challenge + 447537687) mod 6834253`, always in
/// `0..6834253`.
#[must_use]
pub fn response(challenge: i64) -> i64 {
    (challenge.rem_euclid(MODULUS) + OFFSET.rem_euclid(MODULUS)) % MODULUS
}

/// Handles the property list of `authenticationDetails`.
///
/// Updates the entitlement flags from the properties present and, if the
/// list carries a challenge, sends the response. A list without challenge
/// sends nothing.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::implicit_hasher
)]
pub fn authenticate<T>(
    entitlements: &mut Entitlements,
    transport: &mut T,
    properties: &HashMap<String, Amf0Value>,
) -> Result<()>
where
    T: Transport + ?Sized,
{
    let mut challenge = None;

    for (name, value) in properties {
        match (name.as_str(), value) {
            (PROPERTY_IN_BROADCAST_TERRITORY, Amf0Value::Boolean(flag)) => {
                entitlements.in_broadcast_territory = *flag;
            }
            (PROPERTY_TV_FEE_ACTIVATED, Amf0Value::Boolean(flag)) => {
                entitlements.tv_fee_activated = *flag;
            }
            (PROPERTY_CHALLENGE, Amf0Value::Number(n)) => {
                // Saturating; the server sends whole numbers well in range.
                challenge = Some(*n as i64);
            }
            _ => trace!("ignoring authentication property {name}: {value:?}"),
        }
    }

    let Some(challenge) = challenge else {
        debug!("no challenge in authenticationDetails");
        return Ok(());
    };

    let packet = FlexMessage::new(AUTHENTICATE_RANDOM_NUMBER)
        .arg(Amf0Value::Number(response(challenge) as f64))
        .to_packet()?;

    debug!("sending {AUTHENTICATE_RANDOM_NUMBER}");
    transport.send_packet(packet)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::transport::testing::RecordingTransport;

    fn properties(values: &[(&str, Amf0Value)]) -> HashMap<String, Amf0Value> {
        values
            .iter()
            .map(|(name, value)| ((*name).to_owned(), value.clone()))
            .collect()
    }

    #[test]
    fn response_to_known_challenge() {
        assert_eq!(response(100), 447_537_787 % 6_834_253);
        assert_eq!(response(100), 3_311_342);
        assert_eq!(response(0), 3_311_242);
    }

    #[test]
    fn response_is_non_negative_for_negative_challenges() {
        assert_eq!(response(-447_537_687), 0);
        assert_eq!(response(-447_537_688), MODULUS - 1);
    }

    proptest! {
        #[test]
        fn response_matches_modular_formula(challenge in any::<i32>()) {
            let expected = (i64::from(challenge) + OFFSET).rem_euclid(MODULUS);
            prop_assert_eq!(response(i64::from(challenge)), expected);
        }

        #[test]
        fn response_is_in_range(challenge in any::<i64>()) {
            let r = response(challenge);
            prop_assert!((0..MODULUS).contains(&r));
        }
    }

    #[test]
    fn challenge_is_answered() {
        let mut entitlements = Entitlements::default();
        let mut transport = RecordingTransport::default();
        let props = properties(&[
            ("randomAuth", Amf0Value::Number(100.0)),
            ("tvFeeActivated", Amf0Value::Boolean(true)),
            ("locatedInBroadcastTerritory", Amf0Value::Boolean(true)),
        ]);

        authenticate(&mut entitlements, &mut transport, &props).unwrap();

        assert!(entitlements.tv_fee_activated);
        assert!(entitlements.in_broadcast_territory);
        assert!(!entitlements.tv_fee_required);

        let sent = transport.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].name, AUTHENTICATE_RANDOM_NUMBER);
        assert_eq!(sent[0].args, vec![Amf0Value::Number(3_311_342.0)]);
    }

    #[test]
    fn missing_challenge_sends_nothing() {
        let mut entitlements = Entitlements::default();
        let mut transport = RecordingTransport::default();
        let props = properties(&[("locatedInBroadcastTerritory", Amf0Value::Boolean(true))]);

        authenticate(&mut entitlements, &mut transport, &props).unwrap();

        assert!(entitlements.in_broadcast_territory);
        assert!(transport.packets.is_empty());
    }

    #[test]
    fn mistyped_properties_are_ignored() {
        let mut entitlements = Entitlements::default();
        let mut transport = RecordingTransport::default();
        let props = properties(&[
            ("randomAuth", Amf0Value::Utf8String("100".to_owned())),
            ("tvFeeActivated", Amf0Value::Number(1.0)),
        ]);

        authenticate(&mut entitlements, &mut transport, &props).unwrap();

        assert_eq!(entitlements, Entitlements::default());
        assert!(transport.packets.is_empty());
    }
}
