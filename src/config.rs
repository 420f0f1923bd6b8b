//! Per-connection options.
//!
//! The host client hands over options as name/value pairs, usually taken
//! straight from the command line or an RTMP URL. Two names are recognized,
//! both case-insensitively:
//!
//! * `yle` - the Areena clip ID; setting it also enables authentication
//! * `yleauth` - integer flag; nonzero enables authentication
//!
//! Anything else belongs to the host and is ignored here.

/// Option name carrying the clip ID.
const OPTION_CLIP_ID: &str = "yle";

/// Option name carrying the authentication flag.
const OPTION_AUTH: &str = "yleauth";

#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Config {
    /// Clip ID to resolve into a stream location.
    pub clip_id: Option<String>,

    /// Whether the Areena handshake runs at all.
    pub auth: bool,
}

impl Config {
    /// Builds a configuration from name/value option pairs.
    ///
    /// Options are applied in order, so later values win.
    #[must_use]
    pub fn from_options<I, K, V>(options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (name, value) in options {
            config.set_option(name.as_ref(), value.as_ref());
        }
        config
    }

    /// Applies a single option. Returns whether the name was recognized.
    pub fn set_option(&mut self, name: &str, value: &str) -> bool {
        if name.eq_ignore_ascii_case(OPTION_CLIP_ID) {
            self.clip_id = Some(value.to_owned());
            self.auth = true;
            true
        } else if name.eq_ignore_ascii_case(OPTION_AUTH) {
            self.auth = parse_flag(value) != 0;
            true
        } else {
            trace!("ignoring option {name}");
            false
        }
    }
}

/// Parses an integer the way C `strtol` does with base 0.
///
/// Leading whitespace and a sign are accepted. `0x` selects hexadecimal, a
/// leading `0` octal, anything else decimal. Parsing stops at the first
/// character that is not a digit in the selected base; if no digit was read
/// the result is 0. Values that do not fit saturate.
fn parse_flag(value: &str) -> i64 {
    let s = value.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if hex.starts_with(|c: char| c.is_ascii_hexdigit()) {
            (16, hex)
        } else {
            // "0x" without hex digits parses as the single digit 0.
            (10, &s[..1])
        }
    } else if s.starts_with('0') {
        (8, s)
    } else {
        (10, s)
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    let magnitude = match i64::from_str_radix(&digits[..end], radix) {
        Ok(n) => n,
        Err(_) if end == 0 => 0,
        Err(_) => i64::MAX,
    };

    if negative {
        -magnitude
    } else {
        magnitude
    }
}
