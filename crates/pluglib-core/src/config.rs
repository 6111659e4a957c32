//! The configuration tree root.
//!
//! [`Config`] owns exactly one of each collection that makes up a
//! codeplug. All collections share one [`EventLog`], so any mutation made
//! through any collection's API sets the tree-level modified flag and
//! queues exactly one [`ConfigEvent`](crate::events::ConfigEvent). Bulk
//! operations on the whole tree ([`Config::clear`], [`Config::copy_from`])
//! queue exactly one event, not one per collection.

use crate::channel::Channel;
use crate::contact::Contact;
use crate::events::{Collection, ConfigEvent, EventLog};
use crate::extension::ConfigExtension;
use crate::grouplist::GroupList;
use crate::list::ObjectList;
use crate::positioning::PositioningSystem;
use crate::radioid::RadioIdList;
use crate::roaming::RoamingZone;
use crate::scanlist::ScanList;
use crate::settings::RadioSettings;
use crate::zone::Zone;

/// The complete, codec-agnostic codeplug configuration.
#[derive(Debug)]
pub struct Config {
    log: EventLog,
    settings: RadioSettings,
    radio_ids: RadioIdList,
    contacts: ObjectList<Contact>,
    group_lists: ObjectList<GroupList>,
    channels: ObjectList<Channel>,
    zones: ObjectList<Zone>,
    scan_lists: ObjectList<ScanList>,
    positioning: ObjectList<PositioningSystem>,
    roaming: ObjectList<RoamingZone>,
    extension: Option<Box<dyn ConfigExtension>>,
}

impl Config {
    /// Create an empty configuration with a clear modified flag.
    pub fn new() -> Self {
        let log = EventLog::new();
        Config {
            settings: RadioSettings::default(),
            radio_ids: RadioIdList::new(log.clone()),
            contacts: ObjectList::new(Collection::Contacts, log.clone()),
            group_lists: ObjectList::new(Collection::GroupLists, log.clone()),
            channels: ObjectList::new(Collection::Channels, log.clone()),
            zones: ObjectList::new(Collection::Zones, log.clone()),
            scan_lists: ObjectList::new(Collection::ScanLists, log.clone()),
            positioning: ObjectList::new(Collection::Positioning, log.clone()),
            roaming: ObjectList::new(Collection::RoamingZones, log.clone()),
            extension: None,
            log,
        }
    }

    /// The global radio settings.
    pub fn settings(&self) -> &RadioSettings {
        &self.settings
    }

    /// Mutate the global settings through a closure. Records one event.
    pub fn modify_settings<R>(&mut self, f: impl FnOnce(&mut RadioSettings) -> R) -> R {
        let result = f(&mut self.settings);
        self.log.record(ConfigEvent::Modified {
            collection: Collection::Settings,
            index: 0,
        });
        result
    }

    /// The radio ID list.
    pub fn radio_ids(&self) -> &RadioIdList {
        &self.radio_ids
    }

    /// The radio ID list, for mutation.
    pub fn radio_ids_mut(&mut self) -> &mut RadioIdList {
        &mut self.radio_ids
    }

    /// The contact list.
    pub fn contacts(&self) -> &ObjectList<Contact> {
        &self.contacts
    }

    /// The contact list, for mutation.
    pub fn contacts_mut(&mut self) -> &mut ObjectList<Contact> {
        &mut self.contacts
    }

    /// The RX group lists.
    pub fn group_lists(&self) -> &ObjectList<GroupList> {
        &self.group_lists
    }

    /// The RX group lists, for mutation.
    pub fn group_lists_mut(&mut self) -> &mut ObjectList<GroupList> {
        &mut self.group_lists
    }

    /// The channel list.
    pub fn channels(&self) -> &ObjectList<Channel> {
        &self.channels
    }

    /// The channel list, for mutation.
    pub fn channels_mut(&mut self) -> &mut ObjectList<Channel> {
        &mut self.channels
    }

    /// The zone list.
    pub fn zones(&self) -> &ObjectList<Zone> {
        &self.zones
    }

    /// The zone list, for mutation.
    pub fn zones_mut(&mut self) -> &mut ObjectList<Zone> {
        &mut self.zones
    }

    /// The scan lists.
    pub fn scan_lists(&self) -> &ObjectList<ScanList> {
        &self.scan_lists
    }

    /// The scan lists, for mutation.
    pub fn scan_lists_mut(&mut self) -> &mut ObjectList<ScanList> {
        &mut self.scan_lists
    }

    /// The positioning systems.
    pub fn positioning(&self) -> &ObjectList<PositioningSystem> {
        &self.positioning
    }

    /// The positioning systems, for mutation.
    pub fn positioning_mut(&mut self) -> &mut ObjectList<PositioningSystem> {
        &mut self.positioning
    }

    /// The roaming zones.
    pub fn roaming(&self) -> &ObjectList<RoamingZone> {
        &self.roaming
    }

    /// The roaming zones, for mutation.
    pub fn roaming_mut(&mut self) -> &mut ObjectList<RoamingZone> {
        &mut self.roaming
    }

    /// The vendor extension, if one is attached.
    pub fn extension(&self) -> Option<&dyn ConfigExtension> {
        self.extension.as_deref()
    }

    /// Attach (or replace) the vendor extension. Records one event.
    pub fn set_extension(&mut self, ext: Box<dyn ConfigExtension>) {
        self.extension = Some(ext);
        self.log.record(ConfigEvent::Modified {
            collection: Collection::Extension,
            index: 0,
        });
    }

    /// Detach the vendor extension. Records one event if one was attached.
    pub fn clear_extension(&mut self) {
        if self.extension.take().is_some() {
            self.log.record(ConfigEvent::Modified {
                collection: Collection::Extension,
                index: 0,
            });
        }
    }

    /// Whether any mutation happened since the flag was last cleared.
    pub fn is_modified(&self) -> bool {
        self.log.is_modified()
    }

    /// Set or clear the modified flag (e.g. after a successful save).
    pub fn set_modified(&mut self, modified: bool) {
        self.log.set_modified(modified);
    }

    /// Remove and return all queued change events, oldest first.
    pub fn drain_events(&self) -> Vec<ConfigEvent> {
        self.log.drain()
    }

    /// Reset the whole tree to its empty state.
    ///
    /// Records exactly one [`ConfigEvent::TreeCleared`] for the whole
    /// operation.
    pub fn clear(&mut self) {
        self.settings = RadioSettings::default();
        self.radio_ids.clear_silent();
        self.contacts.clear_silent();
        self.group_lists.clear_silent();
        self.channels.clear_silent();
        self.zones.clear_silent();
        self.scan_lists.clear_silent();
        self.positioning.clear_silent();
        self.roaming.clear_silent();
        self.extension = None;
        self.log.record(ConfigEvent::TreeCleared);
    }

    /// Replace this tree's contents with a deep clone of `other`'s.
    ///
    /// Preserves structure but not object identity; records exactly one
    /// [`ConfigEvent::TreeReplaced`].
    pub fn copy_from(&mut self, other: &Config) {
        self.settings = other.settings.clone();
        self.radio_ids.copy_from_silent(&other.radio_ids);
        self.contacts.copy_from_silent(&other.contacts);
        self.group_lists.copy_from_silent(&other.group_lists);
        self.channels.copy_from_silent(&other.channels);
        self.zones.copy_from_silent(&other.zones);
        self.scan_lists.copy_from_silent(&other.scan_lists);
        self.positioning.copy_from_silent(&other.positioning);
        self.roaming.copy_from_silent(&other.roaming);
        self.extension = other.extension.clone();
        self.log.record(ConfigEvent::TreeReplaced);
    }

    /// Whether any DMR channel references a roaming zone, i.e. whether the
    /// roaming subsystem must be enabled on the device.
    pub fn requires_roaming(&self) -> bool {
        self.channels
            .iter()
            .filter_map(Channel::as_dmr)
            .any(|dmr| dmr.roaming.is_some())
    }

    /// Whether any channel references a positioning system, i.e. whether
    /// the GPS/APRS subsystem must be enabled on the device.
    pub fn requires_gps(&self) -> bool {
        self.channels.iter().any(|ch| ch.positioning.is_some())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Clone for Config {
    /// Deep-clone into a fresh tree with its own event log and a clear
    /// modified flag.
    fn clone(&self) -> Self {
        let mut config = Config::new();
        config.copy_from(self);
        config.set_modified(false);
        let _ = config.drain_events();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PositioningRef, RoamingZoneRef};
    use crate::types::Frequency;

    fn simplex(name: &str) -> Channel {
        Channel::fm(
            name,
            Frequency::from_mhz(145.500),
            Frequency::from_mhz(145.500),
        )
    }

    #[test]
    fn mutation_sets_modified_flag() {
        let mut config = Config::new();
        assert!(!config.is_modified());
        config.contacts_mut().add(Contact::dmr(
            "Local",
            crate::types::CallType::Group,
            9,
        ));
        assert!(config.is_modified());
        assert_eq!(config.drain_events().len(), 1);
    }

    #[test]
    fn settings_mutation_records_one_event() {
        let mut config = Config::new();
        config.modify_settings(|s| s.mic_level = 7);
        assert_eq!(config.settings().mic_level, 7);
        let events = config.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            ConfigEvent::Modified {
                collection: Collection::Settings,
                index: 0
            }
        ));
    }

    #[test]
    fn clear_records_exactly_one_event() {
        let mut config = Config::new();
        config.channels_mut().add(simplex("a"));
        config.zones_mut().add(Zone::new("z"));
        config.set_modified(false);
        let _ = config.drain_events();

        config.clear();
        assert!(config.is_modified());
        assert_eq!(config.drain_events(), vec![ConfigEvent::TreeCleared]);
        assert!(config.channels().is_empty());
        assert!(config.zones().is_empty());
    }

    #[test]
    fn copy_preserves_structure_not_identity() {
        let mut a = Config::new();
        a.channels_mut().add(simplex("one"));
        a.channels_mut().add(simplex("two"));
        a.zones_mut().add(Zone {
            name: "z".into(),
            channels: vec![crate::context::ChannelRef(1)],
        });

        let b = a.clone();
        assert_eq!(b.channels().len(), 2);
        assert_eq!(b.zones().get(0).unwrap().channels[0].index(), 1);
        assert!(!b.is_modified());
    }

    #[test]
    fn copy_from_records_one_event() {
        let mut a = Config::new();
        a.channels_mut().add(simplex("one"));
        let mut b = Config::new();
        let _ = b.drain_events();
        b.copy_from(&a);
        assert_eq!(b.drain_events(), vec![ConfigEvent::TreeReplaced]);
        assert_eq!(b.channels().len(), 1);
    }

    #[test]
    fn requires_roaming_scans_dmr_channels() {
        let mut config = Config::new();
        config.channels_mut().add(simplex("fm"));
        assert!(!config.requires_roaming());

        let mut digital = Channel::dmr(
            "dmr",
            Frequency::from_mhz(439.5625),
            Frequency::from_mhz(431.9625),
        );
        digital.as_dmr_mut().unwrap().roaming = Some(RoamingZoneRef(0));
        config.channels_mut().add(digital);
        assert!(config.requires_roaming());
    }

    #[test]
    fn requires_gps_scans_all_channels() {
        let mut config = Config::new();
        let mut ch = simplex("fm");
        assert!(!config.requires_gps());
        ch.positioning = Some(PositioningRef(0));
        config.channels_mut().add(ch);
        assert!(config.requires_gps());
    }

    #[test]
    fn extension_round_trip() {
        use crate::extension::TytExtension;

        let mut config = Config::new();
        assert!(config.extension().is_none());
        config.set_extension(Box::new(TytExtension::default()));
        assert_eq!(config.extension().unwrap().name(), "tyt");
        config.clear_extension();
        assert!(config.extension().is_none());
    }
}
