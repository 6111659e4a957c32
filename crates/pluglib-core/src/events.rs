//! Change notification for the configuration graph.
//!
//! Every owned collection of a [`Config`](crate::config::Config) shares one
//! [`EventLog`]. Mutating collection calls record exactly one
//! [`ConfigEvent`] each and set the modified flag; the owner of the tree
//! drains the log after a batch of edits. This replaces per-object signal
//! wiring with a single coarse queue, so a bulk reset of the whole tree can
//! record exactly one event.
//!
//! The log is an `Rc<RefCell<…>>`: the configuration graph is a
//! single-threaded structure and is deliberately not `Send`.

use std::cell::RefCell;
use std::rc::Rc;

/// Identifies an owned collection (or singleton) of the configuration tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// The global radio settings singleton.
    Settings,
    /// The radio ID list.
    RadioIds,
    /// The contact list.
    Contacts,
    /// The RX group lists.
    GroupLists,
    /// The channel list.
    Channels,
    /// The zone list.
    Zones,
    /// The scan lists.
    ScanLists,
    /// The positioning (GPS/APRS) systems.
    Positioning,
    /// The roaming zones.
    RoamingZones,
    /// The vendor extension slot.
    Extension,
}

/// A coarse change notification raised by a collection-level API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEvent {
    /// An element was appended or inserted.
    Added {
        /// The collection that grew.
        collection: Collection,
        /// Index of the new element.
        index: usize,
    },
    /// An element was removed.
    Removed {
        /// The collection that shrank.
        collection: Collection,
        /// Index the element had before removal.
        index: usize,
    },
    /// An element (or singleton) was modified in place.
    Modified {
        /// The collection the element belongs to.
        collection: Collection,
        /// Index of the modified element (0 for singletons).
        index: usize,
    },
    /// A single collection was emptied.
    CollectionCleared {
        /// The collection that was emptied.
        collection: Collection,
    },
    /// The whole tree was reset to its empty state.
    TreeCleared,
    /// The whole tree was replaced by a copy of another tree.
    TreeReplaced,
}

#[derive(Debug, Default)]
struct EventLogInner {
    events: Vec<ConfigEvent>,
    modified: bool,
}

/// Shared, single-threaded event queue plus the tree-level modified flag.
///
/// Cloning an `EventLog` yields another handle to the same queue.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    inner: Rc<RefCell<EventLogInner>>,
}

impl EventLog {
    /// Create a fresh, empty log with the modified flag clear.
    pub fn new() -> Self {
        EventLog::default()
    }

    /// Record one event and set the modified flag.
    pub fn record(&self, event: ConfigEvent) {
        let mut inner = self.inner.borrow_mut();
        inner.modified = true;
        inner.events.push(event);
    }

    /// Whether any mutation has been recorded since the flag was last
    /// cleared.
    pub fn is_modified(&self) -> bool {
        self.inner.borrow().modified
    }

    /// Set or clear the modified flag (e.g. after a successful save).
    pub fn set_modified(&self, modified: bool) {
        self.inner.borrow_mut().modified = modified;
    }

    /// Remove and return all recorded events, oldest first.
    ///
    /// Draining does not touch the modified flag.
    pub fn drain(&self) -> Vec<ConfigEvent> {
        std::mem::take(&mut self.inner.borrow_mut().events)
    }

    /// Number of events currently queued.
    pub fn len(&self) -> usize {
        self.inner.borrow().events.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_sets_modified() {
        let log = EventLog::new();
        assert!(!log.is_modified());
        log.record(ConfigEvent::Added {
            collection: Collection::Channels,
            index: 0,
        });
        assert!(log.is_modified());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn drain_returns_in_order() {
        let log = EventLog::new();
        log.record(ConfigEvent::Added {
            collection: Collection::Contacts,
            index: 0,
        });
        log.record(ConfigEvent::Removed {
            collection: Collection::Contacts,
            index: 0,
        });
        let events = log.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ConfigEvent::Added { .. }));
        assert!(matches!(events[1], ConfigEvent::Removed { .. }));
        assert!(log.is_empty());
    }

    #[test]
    fn drain_keeps_modified_flag() {
        let log = EventLog::new();
        log.record(ConfigEvent::TreeCleared);
        let _ = log.drain();
        assert!(log.is_modified());
        log.set_modified(false);
        assert!(!log.is_modified());
    }

    #[test]
    fn clones_share_the_queue() {
        let log = EventLog::new();
        let handle = log.clone();
        handle.record(ConfigEvent::TreeReplaced);
        assert_eq!(log.len(), 1);
        assert!(log.is_modified());
    }
}
