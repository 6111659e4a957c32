//! Zones: named groups of channels selectable on the radio.

use crate::context::ChannelRef;

/// A zone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Zone {
    /// Display name.
    pub name: String,
    /// Member channels, by position in the channel list.
    pub channels: Vec<ChannelRef>,
}

impl Zone {
    /// Create an empty zone.
    pub fn new(name: impl Into<String>) -> Self {
        Zone {
            name: name.into(),
            channels: Vec::new(),
        }
    }
}
