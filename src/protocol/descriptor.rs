//! Clip descriptor exchange.
//!
//! Once authenticated, the player resolves the clip ID from the web page:
//!
//! ```text
//! C -> S: requestData("e0", "/<clip id>")            recordings
//! C -> S: requestData("e0", "streams/fi/<clip id>")  live streams
//! S -> C: rpcResult(..., "e0", "<media>...</media>")
//! ```
//!
//! The `url` element of the returned document is the real stream location.

use rml_amf0::Amf0Value;

use super::{
    codec::{self, FlexMessage},
    document,
    location::StreamLocation,
};
use crate::{
    error::{Error, Result},
    session::Session,
    transport::Transport,
};

/// Name of the message requesting a descriptor.
pub const REQUEST_DATA: &str = "requestData";

/// Category tag of descriptor requests and their replies.
pub const CATEGORY: &str = "e0";

/// Path prefix of live stream clip IDs.
const LIVE_PREFIX: &str = "streams/fi/";

/// Path prefix of recorded clip IDs.
const RECORDING_PREFIX: &str = "/";

/// Position of the category tag in `rpcResult`.
const RESULT_CATEGORY: usize = 3;

/// Position of the descriptor document in `rpcResult`.
const RESULT_DOCUMENT: usize = 4;

const FIELD_URL: &str = "url";
const FIELD_TV_PAY_ONLY: &str = "tvpayOnly";

/// Fields of a clip descriptor document.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Descriptor {
    /// Stream URL.
    pub url: String,

    /// Whether only TV fee payers may watch, if the server said so.
    pub tv_pay_only: Option<bool>,
}

/// What a `rpcResult` turned out to be.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Resolution {
    /// The reply was not for a descriptor request.
    Unrelated,

    /// The link now points at the resolved stream.
    Resolved {
        /// The stream lives on another server than the one connected to.
        redirected: bool,
    },
}

impl Descriptor {
    /// Reads the descriptor fields from the document text.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if
    /// the document has no `url`.
    pub fn from_document(document: &str) -> Result<Self> {
        let url = document::field(document, FIELD_URL)
            .ok_or_else(|| Error::not_found("clip descriptor has no url"))?;
        let tv_pay_only = document::field(document, FIELD_TV_PAY_ONLY).map(|v| v != "false");

        Ok(Self { url, tv_pay_only })
    }
}

/// Returns the path to request for a clip.
#[must_use]
pub fn request_path(clip_id: &str, live: bool) -> String {
    let prefix = if live { LIVE_PREFIX } else { RECORDING_PREFIX };
    format!("{prefix}{clip_id}")
}

/// Builds the descriptor request for a clip.
#[must_use]
pub fn request_message(clip_id: &str, live: bool) -> FlexMessage {
    FlexMessage::new(REQUEST_DATA)
        .arg(Amf0Value::Utf8String(CATEGORY.to_owned()))
        .arg(Amf0Value::Utf8String(request_path(clip_id, live)))
}

/// Asks the server to resolve `clip_id`.
pub fn request<T>(transport: &mut T, clip_id: &str) -> Result<()>
where
    T: Transport + ?Sized,
{
    let live = transport.link().live;
    let packet = request_message(clip_id, live).to_packet()?;

    debug!("sending {REQUEST_DATA} for {clip_id}");
    transport.send_packet(packet)
}

/// Handles the values of a `rpcResult` invoke.
///
/// Replies with another category are left alone. For descriptor replies,
/// points the link at the resolved stream and starts stream creation. The
/// link is only changed once the whole descriptor has been understood.
pub fn resolve<T>(session: &mut Session, transport: &mut T, values: &[Amf0Value]) -> Result<Resolution>
where
    T: Transport + ?Sized,
{
    if codec::string_at(values, RESULT_CATEGORY) != Some(CATEGORY) {
        return Ok(Resolution::Unrelated);
    }

    let document = codec::string_at(values, RESULT_DOCUMENT)
        .ok_or_else(|| Error::not_found("clip descriptor missing from rpcResult"))?;
    trace!("clip data:\n{document}");

    let descriptor = Descriptor::from_document(document)?;
    if let Some(tv_pay_only) = descriptor.tv_pay_only {
        session.entitlements.tv_fee_required = tv_pay_only;
    }

    let location = StreamLocation::parse(&descriptor.url).inspect_err(|_| {
        error!("couldn't parse stream url {}", descriptor.url);
    })?;
    debug!("new playpath: {}", location.playpath);

    let link = transport.link_mut();
    location.playpath.clone_into(&mut link.playpath);

    let redirected = location.server != link.hostname;
    if redirected {
        debug!("redirected to another server: {}", location.server);
        location.server.clone_into(&mut link.hostname);
        link.redirected = true;
    }

    transport.send_create_stream()?;
    Ok(Resolution::Resolved { redirected })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, transport::testing::RecordingTransport};

    fn rpc_result(category: &str, document: &str) -> Vec<Amf0Value> {
        vec![
            Amf0Value::Utf8String("rpcResult".to_owned()),
            Amf0Value::Number(0.0),
            Amf0Value::Null,
            Amf0Value::Utf8String(category.to_owned()),
            Amf0Value::Utf8String(document.to_owned()),
        ]
    }

    #[test]
    fn request_path_depends_on_stream_kind() {
        assert_eq!(request_path("1-50114", false), "/1-50114");
        assert_eq!(request_path("tv1", true), "streams/fi/tv1");
    }

    #[test]
    fn request_uses_live_flag_of_link() {
        let mut transport = RecordingTransport::default();
        transport.link.live = true;

        request(&mut transport, "tv2").unwrap();

        let sent = transport.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], request_message("tv2", true));
        assert_eq!(
            sent[0].args[1],
            Amf0Value::Utf8String("streams/fi/tv2".to_owned())
        );
    }

    #[test]
    fn oversized_clip_id_sends_nothing() {
        let mut transport = RecordingTransport::default();

        let err = request(&mut transport, &"9".repeat(200)).unwrap_err();

        assert_eq!(err.kind, ErrorKind::OutOfRange);
        assert!(transport.packets.is_empty());
    }

    #[test]
    fn descriptor_fields() {
        let descriptor =
            Descriptor::from_document("<url>rtmp://h/a/p</url><tvpayOnly>true</tvpayOnly>")
                .unwrap();
        assert_eq!(descriptor.url, "rtmp://h/a/p");
        assert_eq!(descriptor.tv_pay_only, Some(true));

        let descriptor = Descriptor::from_document("<url>rtmp://h/a/p</url>").unwrap();
        assert_eq!(descriptor.tv_pay_only, None);
    }

    #[test]
    fn resolves_stream_on_same_server() {
        let mut session = Session::default();
        let mut transport = RecordingTransport::with_hostname("cdn.example");
        let values = rpc_result(
            CATEGORY,
            "<url>rtmp://cdn.example/app/mp4:clip123.mp4</url><tvpayOnly>false</tvpayOnly>",
        );

        let resolution = resolve(&mut session, &mut transport, &values).unwrap();

        assert_eq!(resolution, Resolution::Resolved { redirected: false });
        assert_eq!(transport.link.playpath, "mp4:clip123.mp4");
        assert_eq!(transport.link.hostname, "cdn.example");
        assert!(!transport.link.redirected);
        assert!(!session.entitlements.tv_fee_required);
        assert_eq!(transport.create_stream_sent, 1);
        assert!(transport.packets.is_empty());
    }

    #[test]
    fn reports_redirect_to_other_server() {
        let mut session = Session::default();
        let mut transport = RecordingTransport::with_hostname("fms.example.com");
        let values = rpc_result(CATEGORY, "<url>rtmp://edge2.example.com/a1/mp3:x</url>");

        let resolution = resolve(&mut session, &mut transport, &values).unwrap();

        assert_eq!(resolution, Resolution::Resolved { redirected: true });
        assert_eq!(transport.link.hostname, "edge2.example.com");
        assert_eq!(transport.link.playpath, "mp3:x");
        assert!(transport.link.redirected);
    }

    #[test]
    fn tv_pay_only_sets_entitlement() {
        let mut session = Session::default();
        let mut transport = RecordingTransport::with_hostname("h");
        let values = rpc_result(CATEGORY, "<tvpayOnly>yes</tvpayOnly><url>rtmp://h/a/p</url>");

        resolve(&mut session, &mut transport, &values).unwrap();

        assert!(session.entitlements.tv_fee_required);
    }

    #[test]
    fn unrelated_reply_is_ignored() {
        let mut session = Session::default();
        let mut transport = RecordingTransport::with_hostname("h");
        let values = rpc_result("e1", "<url>rtmp://other/a/p</url>");

        let resolution = resolve(&mut session, &mut transport, &values).unwrap();

        assert_eq!(resolution, Resolution::Unrelated);
        assert_eq!(transport.link.hostname, "h");
        assert!(transport.link.playpath.is_empty());
        assert_eq!(transport.create_stream_sent, 0);
    }

    #[test]
    fn missing_url_fails_without_touching_link() {
        let mut session = Session::default();
        let mut transport = RecordingTransport::with_hostname("h");
        let values = rpc_result(CATEGORY, "<media><tvpayOnly>false</tvpayOnly></media>");

        let err = resolve(&mut session, &mut transport, &values).unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(transport.link.hostname, "h");
        assert!(transport.link.playpath.is_empty());
        assert_eq!(transport.create_stream_sent, 0);
    }

    #[test]
    fn unparsable_url_fails_without_touching_link() {
        let mut session = Session::default();
        let mut transport = RecordingTransport::with_hostname("h");
        let values = rpc_result(CATEGORY, "<url>rtmp://host/onlyapp</url>");

        let err = resolve(&mut session, &mut transport, &values).unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert!(transport.link.playpath.is_empty());
        assert_eq!(transport.create_stream_sent, 0);
    }

    #[test]
    fn missing_document_fails() {
        let mut session = Session::default();
        let mut transport = RecordingTransport::default();
        let mut values = rpc_result(CATEGORY, "");
        values.truncate(4);

        let err = resolve(&mut session, &mut transport, &values).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
