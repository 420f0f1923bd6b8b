//! Flex message encoding for the Areena control messages.
//!
//! Areena expects its custom calls as RTMP flex messages (packet type
//! `0x11`) on the control channel. The body is one reserved byte followed by
//! AMF0 values:
//!
//! ```text
//! 0x00 | name: string | invocation id: number 0 | null | arguments...
//! ```
//!
//! Messages are small and built into a fixed packet buffer. A message that
//! does not fit is an error rather than a reason to grow the buffer, so
//! oversized clip IDs fail the same way on every host.

use std::collections::HashMap;

use rml_amf0::Amf0Value;

use crate::error::{Error, Result};

/// Size of the buffer a packet is built in, header included.
pub const PACKET_BUFFER_SIZE: usize = 128;

/// Largest RTMP chunk header the host may prepend.
pub const MAX_HEADER_SIZE: usize = 18;

/// Room left for the message body.
pub const MAX_BODY_SIZE: usize = PACKET_BUFFER_SIZE - MAX_HEADER_SIZE;

/// RTMP chunk stream used for control messages.
pub const CONTROL_CHANNEL: u32 = 0x03;

/// RTMP message type of an AMF0 command wrapped as flex message.
pub const FLEX_MESSAGE: u8 = 0x11;

/// Leading byte of every flex message body. Its meaning is undocumented.
const RESERVED: u8 = 0x00;

/// Invocation ID of every message sent by this crate.
const INVOCATION_ID: f64 = 0.0;

/// An encoded message ready for the host transport.
///
/// Sent with a full (large) chunk header; the host fills in the timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct Packet {
    /// Chunk stream ID
    pub channel: u32,

    /// RTMP message type
    pub packet_type: u8,

    /// Message body, at most [`MAX_BODY_SIZE`] bytes
    pub body: Vec<u8>,
}

/// A named remote invocation with positional arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct FlexMessage {
    pub name: String,
    pub args: Vec<Amf0Value>,
}

impl FlexMessage {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument.
    #[must_use]
    pub fn arg(mut self, value: Amf0Value) -> Self {
        self.args.push(value);
        self
    }

    /// Encodes the message body.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::OutOfRange`](crate::error::ErrorKind::OutOfRange)
    /// when the body would exceed [`MAX_BODY_SIZE`].
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut values = Vec::with_capacity(self.args.len() + 3);
        values.push(Amf0Value::Utf8String(self.name.clone()));
        values.push(Amf0Value::Number(INVOCATION_ID));
        values.push(Amf0Value::Null);
        values.extend(self.args.iter().cloned());

        let amf = rml_amf0::serialize(&values)?;
        let len = amf.len() + 1;
        if len > MAX_BODY_SIZE {
            error!("buffer too short for {}", self.name);
            return Err(Error::out_of_range(format!(
                "{} needs {len} bytes but only {MAX_BODY_SIZE} are available",
                self.name
            )));
        }

        let mut body = Vec::with_capacity(len);
        body.push(RESERVED);
        body.extend_from_slice(&amf);
        Ok(body)
    }

    /// Encodes the message into a control channel packet.
    pub fn to_packet(&self) -> Result<Packet> {
        Ok(Packet {
            channel: CONTROL_CHANNEL,
            packet_type: FLEX_MESSAGE,
            body: self.encode()?,
        })
    }

    /// Decodes a flex message body.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::DataLoss`](crate::error::ErrorKind::DataLoss) if
    /// the body is not valid AMF0 or does not start with a message name.
    pub fn decode(body: &[u8]) -> Result<Self> {
        let Some((&RESERVED, mut amf)) = body.split_first() else {
            return Err(Error::data_loss("flex message lacks reserved byte"));
        };

        let mut values = rml_amf0::deserialize(&mut amf)?.into_iter();
        let Some(Amf0Value::Utf8String(name)) = values.next() else {
            return Err(Error::data_loss("flex message lacks a name"));
        };

        // Skip invocation ID and null.
        let args = values.skip(2).collect();
        Ok(Self { name, args })
    }
}

/// Returns the string at `index` of a decoded value list, if there is one.
#[must_use]
pub fn string_at(values: &[Amf0Value], index: usize) -> Option<&str> {
    match values.get(index) {
        Some(Amf0Value::Utf8String(s)) => Some(s),
        _ => None,
    }
}

/// Returns the object properties at `index` of a decoded value list.
#[must_use]
pub fn object_at(values: &[Amf0Value], index: usize) -> Option<&HashMap<String, Amf0Value>> {
    match values.get(index) {
        Some(Amf0Value::Object(properties)) => Some(properties),
        _ => None,
    }
}
