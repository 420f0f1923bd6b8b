//! Session extension for RTMP connections to YLE Areena.
//!
//! Areena's RTMP servers expect two things from a player that a stock RTMP
//! client does not do:
//!
//! 1. After `connect`, the server sends `authenticationDetails` with a numeric
//!    challenge. The player must answer with `authenticateRandomNumber`, or
//!    the server refuses to talk to it.
//! 2. The web page only carries an opaque clip ID. The player asks the server
//!    to resolve it with `requestData` and receives an XML document whose
//!    `url` element holds the real stream location.
//!
//! This crate implements those steps on top of a host RTMP client. The host
//! owns the connection and calls [`dispatch::dispatch`] for every `_result`
//! and invoke it receives; see [`transport::Transport`] for what the host
//! must provide.
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate log;

pub mod config;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transport;
