//! Roaming zones.

use crate::context::ChannelRef;

/// A roaming zone: the set of DMR channels the radio may switch between
/// to stay connected to the same talk group while moving.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoamingZone {
    /// Display name.
    pub name: String,
    /// Member channels, by position in the channel list.
    pub channels: Vec<ChannelRef>,
}

impl RoamingZone {
    /// Create an empty roaming zone.
    pub fn new(name: impl Into<String>) -> Self {
        RoamingZone {
            name: name.into(),
            channels: Vec::new(),
        }
    }
}
