//! RX group lists.

use crate::context::ContactRef;

/// An RX group list: the set of (group call) contacts a DMR channel
/// listens to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupList {
    /// Display name.
    pub name: String,
    /// Member contacts, by position in the contact list.
    pub contacts: Vec<ContactRef>,
}

impl GroupList {
    /// Create an empty group list.
    pub fn new(name: impl Into<String>) -> Self {
        GroupList {
            name: name.into(),
            contacts: Vec::new(),
        }
    }
}
