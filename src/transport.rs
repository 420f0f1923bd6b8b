//! The host RTMP client as seen from this crate.
//!
//! Connection setup, the RTMP handshake, chunking and media download all
//! stay with the host. This crate only needs to read and rewrite the link
//! parameters and to put a few messages on the wire.

use crate::{error::Result, protocol::codec::Packet};

/// Link parameters of the host connection.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Link {
    /// Server the host is connected to.
    pub hostname: String,

    /// Stream to play once the stream has been created.
    pub playpath: String,

    /// Whether the host plays a live stream rather than a recording.
    pub live: bool,

    /// Set when the server resolved the clip to a different host. Whether and
    /// how to reconnect is up to the host.
    pub redirected: bool,
}

/// Operations the host client provides to the session protocol.
pub trait Transport {
    fn link(&self) -> &Link;

    fn link_mut(&mut self) -> &mut Link;

    /// Sends a packet built by this crate.
    fn send_packet(&mut self, packet: Packet) -> Result<()>;

    /// Sends the server bandwidth announcement that normally follows a
    /// successful `connect`, without the host's other follow-up messages.
    fn send_server_bandwidth(&mut self) -> Result<()>;

    /// Continues with the host's regular `createStream` sequence.
    fn send_create_stream(&mut self) -> Result<()>;
}
