use crate::config::Config;

/// State of one Areena connection.
///
/// Created when the host opens a connection and dropped with it. Only the
/// authentication and descriptor steps mutate it; nothing is shared between
/// connections.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Session {
    /// Clip ID to resolve. Without one, the host's own stream creation runs
    /// right after authentication.
    pub clip_id: Option<String>,

    /// When `false`, every event is left to the host.
    pub auth: bool,

    /// Access rights reported by the server.
    pub entitlements: Entitlements,
}

/// Regional and subscription flags reported by the server.
///
/// These are informational. The server may omit any of them, in which case
/// the previous value is kept.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Entitlements {
    /// The stream is only available to TV fee payers (`tvpayOnly`).
    pub tv_fee_required: bool,

    /// The viewer has an active TV fee (`tvFeeActivated`).
    pub tv_fee_activated: bool,

    /// The viewer connects from within the broadcast territory
    /// (`locatedInBroadcastTerritory`).
    pub in_broadcast_territory: bool,
}

impl Session {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            clip_id: config.clip_id.clone(),
            auth: config.auth,
            entitlements: Entitlements::default(),
        }
    }

    /// Returns the clip ID, treating an empty one as absent.
    #[must_use]
    pub fn clip_id(&self) -> Option<&str> {
        self.clip_id.as_deref().filter(|id| !id.is_empty())
    }
}
