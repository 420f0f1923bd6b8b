//! The Areena session protocol.
//!
//! After the RTMP `connect`, an Areena server runs this exchange before it
//! serves any stream:
//!
//! ```text
//! S -> C: invoke authenticationDetails(..., { randomAuth: 12345, ... })
//! C -> S: flex   authenticateRandomNumber((12345 + 447537687) % 6834253)
//! S -> C: invoke randomNumberAuthenticated()
//! C -> S: flex   requestData("e0", "/<clip id>")
//! S -> C: invoke rpcResult(..., "e0", "<media><url>...</url></media>")
//! ```
//!
//! # Submodules
//!
//! * [`codec`] - Flex message encoding
//! * [`auth`] - Challenge-response authentication
//! * [`descriptor`] - Clip ID resolution
//! * [`document`] - Field lookup in the descriptor document
//! * [`location`] - Stream URL splitting

pub mod auth;
pub mod codec;
pub mod descriptor;
pub mod document;
pub mod location;

pub use codec::{FlexMessage, Packet};
pub use descriptor::{Descriptor, Resolution};
pub use location::StreamLocation;
