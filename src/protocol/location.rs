//! Stream location parsing.
//!
//! Areena stream URLs look like
//!
//! ```text
//! rtmp://fms.example.com/a1/mp4:clip/1-50114.mp4
//! ```
//!
//! Unlike generic RTMP URLs, the app is always exactly one path segment and
//! everything after it is the playpath, slashes, `mp4:`/`mp3:` prefix and
//! extension included.

use std::fmt;

use crate::error::{Error, Result};

const SCHEME_SEPARATOR: &str = "://";

/// A stream URL split into the parts the host needs.
///
/// All parts borrow from the parsed URL.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct StreamLocation<'a> {
    pub scheme: &'a str,
    pub server: &'a str,
    pub app: &'a str,
    pub playpath: &'a str,
}

impl<'a> StreamLocation<'a> {
    /// Splits a stream URL into scheme, server, app and playpath.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if the URL has no `://`, fewer than two `/` after it, or an empty
    /// server, app or playpath.
    pub fn parse(url: &'a str) -> Result<Self> {
        let invalid = || Error::invalid_argument(format!("could not parse stream url {url}"));

        let (scheme, rest) = url.split_once(SCHEME_SEPARATOR).ok_or_else(invalid)?;
        let (server, rest) = rest.split_once('/').ok_or_else(invalid)?;
        let (app, playpath) = rest.split_once('/').ok_or_else(invalid)?;

        if server.is_empty() || app.is_empty() || playpath.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            scheme,
            server,
            app,
            playpath,
        })
    }
}

/// Formats the location back into a stream URL.
impl fmt::Display for StreamLocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SCHEME_SEPARATOR}{}/{}/{}",
            self.scheme, self.server, self.app, self.playpath
        )
    }
}
