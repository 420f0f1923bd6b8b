//! Routing of host callbacks to the session protocol.
//!
//! The host calls [`dispatch`] for every `_result` and every invoke it
//! receives, before running its own handling:
//!
//! | Event                             | Action                                   |
//! |-----------------------------------|------------------------------------------|
//! | result of `connect`               | server bandwidth only, no `createStream` |
//! | `authenticationDetails`           | answer challenge, request descriptor     |
//! | `randomNumberAuthenticated`       | nothing                                  |
//! | `rpcResult`                       | resolve stream location                  |
//! | `rpcError`                        | stop the session                         |
//! | anything else                     | left to the host                         |
//!
//! With authentication disabled every event is left to the host.

use std::collections::HashMap;

use rml_amf0::Amf0Value;

use crate::{
    error::{Error, Result},
    protocol::{auth, codec, descriptor, Resolution},
    session::Session,
    transport::Transport,
};

const CONNECT: &str = "connect";
const AUTHENTICATION_DETAILS: &str = "authenticationDetails";
const RANDOM_NUMBER_AUTHENTICATED: &str = "randomNumberAuthenticated";
const RPC_RESULT: &str = "rpcResult";
const RPC_ERROR: &str = "rpcError";

/// Position of the property list in `authenticationDetails`.
const AUTHENTICATION_PROPERTIES: usize = 3;

/// A callback from the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event<'a> {
    /// The server answered one of our invokes with `_result`.
    Result {
        /// Name of the invoke being answered
        method: &'a str,
    },

    /// The server invoked a method on us.
    Invoke {
        /// Name of the invoked method
        method: &'a str,

        /// All decoded values of the invoke: name, transaction ID, command
        /// object and arguments.
        values: &'a [Amf0Value],
    },
}

/// Whether an event was taken care of.
///
/// Failures are returned as `Err` and mean the host should stop the session.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Disposition {
    /// The host must not process the event further.
    Handled,

    /// The host should process the event as usual.
    NotHandled,
}

/// Routes a host callback.
///
/// # Errors
///
/// Any error means the session cannot continue and the host should close
/// the connection.
pub fn dispatch<T>(session: &mut Session, transport: &mut T, event: Event<'_>) -> Result<Disposition>
where
    T: Transport + ?Sized,
{
    if !session.auth {
        return Ok(Disposition::NotHandled);
    }

    match event {
        Event::Result { method: CONNECT } => {
            // Delivery failures surface on the next send; the connect itself
            // succeeded.
            if let Err(e) = transport.send_server_bandwidth() {
                warn!("could not send server bandwidth: {e}");
            }
            Ok(Disposition::Handled)
        }

        Event::Invoke {
            method: AUTHENTICATION_DETAILS,
            values,
        } => {
            let empty = HashMap::new();
            let properties = codec::object_at(values, AUTHENTICATION_PROPERTIES).unwrap_or(&empty);
            auth::authenticate(&mut session.entitlements, transport, properties)?;

            match session.clip_id() {
                Some(clip_id) => descriptor::request(transport, clip_id)?,
                None => transport.send_create_stream()?,
            }
            Ok(Disposition::Handled)
        }

        Event::Invoke {
            method: RANDOM_NUMBER_AUTHENTICATED,
            ..
        } => {
            debug!("authenticated");
            Ok(Disposition::Handled)
        }

        Event::Invoke {
            method: RPC_RESULT,
            values,
        } => {
            match descriptor::resolve(session, transport, values)? {
                Resolution::Unrelated => trace!("ignoring unrelated {RPC_RESULT}"),
                Resolution::Resolved { redirected } => {
                    if redirected {
                        info!("stream moved to {}", transport.link().hostname);
                    }
                }
            }
            Ok(Disposition::Handled)
        }

        Event::Invoke {
            method: RPC_ERROR,
            values,
        } => {
            error!("RTMP server returned RPC error");
            trace!("{RPC_ERROR}: {values:?}");
            Err(Error::aborted("server returned rpcError"))
        }

        _ => Ok(Disposition::NotHandled),
    }
}
