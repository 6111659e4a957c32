//! pluglib-yaml: the human-editable text form of a codeplug.
//!
//! Serializes the generic configuration tree of `pluglib-core` to and
//! from a YAML document. Both directions are explicit two-pass protocols:
//!
//! - **Write**: [`label`] assigns every object a stable textual id, then
//!   [`serialize`] emits the document with all reference fields written as
//!   those ids.
//! - **Read**: [`parse_document`] constructs all objects with scalar
//!   fields only, then links every id reference once all objects exist.
//!
//! # Document shape
//!
//! ```yaml
//! version: "0.12.0"
//! settings:
//!   introLine1: pluglib
//!   defaultID: id1
//! radioIDs:
//!   - dmr: {id: id1, name: DM3MAT, number: 2621370}
//! contacts:
//!   - dmr: {id: cont1, name: Regional, ring: false, type: GroupCall, number: 8}
//! groupLists:
//!   - {id: grp1, name: Regional, contacts: [cont1]}
//! channels:
//!   - digital:
//!       id: ch1
//!       name: DB0LDS TS2
//!       rxFrequency: 439.56250
//!       txFrequency: 431.96250
//!       colorCode: 1
//!       timeSlot: TS2
//!       groupList: grp1
//! zones:
//!   - {id: zone1, name: Berlin, channels: [ch1]}
//! ```
//!
//! `scanLists`, `positioning` and `roaming` are emitted only when
//! non-empty. Unknown top-level keys are vendor extension blocks,
//! dispatched through the [`ExtensionRegistry`].

mod node;

pub mod extensions;
pub mod reader;
pub mod writer;

pub use extensions::{ExtensionCodec, ExtensionRegistry};
pub use reader::{parse_document, read_string};
pub use writer::{label, serialize, write_string, FORMAT_VERSION};

#[cfg(test)]
mod tests {
    use super::*;
    use pluglib_core::{
        CallType, Channel, ChannelRef, Config, Contact, ContactRef, Frequency, GroupList,
        GroupListRef, PositioningRef, PositioningSystem, RadioId, RoamingZone, RoamingZoneRef,
        ScanList, ScanListRef, SelectiveCall, TimeSlot, TytExtension, Zone,
    };

    fn sample_config() -> Config {
        let mut config = Config::new();
        config.modify_settings(|s| {
            s.intro_line1 = "pluglib".into();
            s.mic_level = 5;
        });
        config.radio_ids_mut().add(RadioId::new("DM3MAT", 2_621_370));
        config.radio_ids_mut().add(RadioId::new("Hotspot", 2_621_371));
        config.radio_ids_mut().set_default(1);

        config
            .contacts_mut()
            .add(Contact::dmr("Regional", CallType::Group, 8));
        config
            .contacts_mut()
            .add(Contact::dmr("All", CallType::All, 16_777_215));
        config.contacts_mut().add(Contact::dtmf("Gate", "*99#"));

        let mut gl = GroupList::new("Regional");
        gl.contacts = vec![ContactRef(0), ContactRef(1)];
        config.group_lists_mut().add(gl);

        config
            .positioning_mut()
            .add(PositioningSystem::aprs("APRS", 300));
        let mut gps = PositioningSystem::dmr_gps("BM GPS", 120);
        gps.as_dmr_gps_mut().unwrap().destination = Some(ContactRef(1));
        config.positioning_mut().add(gps);

        let mut fm = Channel::fm(
            "DB0SP",
            Frequency::from_mhz(145.600),
            Frequency::from_mhz(145.000),
        );
        fm.as_fm_mut().unwrap().rx_tone = Some(SelectiveCall::ctcss(67.0));
        fm.as_fm_mut().unwrap().tx_tone = Some(SelectiveCall::dcs(-23));
        fm.positioning = Some(PositioningRef(0));
        config.channels_mut().add(fm);

        let mut dmr = Channel::dmr(
            "DB0LDS TS2",
            Frequency::from_mhz(439.5625),
            Frequency::from_mhz(431.9625),
        );
        {
            let d = dmr.as_dmr_mut().unwrap();
            d.color_code = 1;
            d.time_slot = TimeSlot::Ts2;
            d.group_list = Some(GroupListRef(0));
            d.contact = Some(ContactRef(0));
            d.radio_id = Some(pluglib_core::RadioIdRef(0));
            d.roaming = Some(RoamingZoneRef(0));
        }
        dmr.scan_list = Some(ScanListRef(0));
        config.channels_mut().add(dmr);

        let mut zone = Zone::new("Berlin");
        zone.channels = vec![ChannelRef(0), ChannelRef(1)];
        config.zones_mut().add(zone);

        let mut scan = ScanList::new("Scan");
        scan.channels = vec![ChannelRef(1), ChannelRef(0)];
        scan.priority = Some(ChannelRef(0));
        config.scan_lists_mut().add(scan);

        let mut roam = RoamingZone::new("BM 262");
        roam.channels = vec![ChannelRef(1)];
        config.roaming_mut().add(roam);

        config.set_extension(Box::new(TytExtension {
            long_press_duration: 2000,
            ..TytExtension::default()
        }));

        config
    }

    #[test]
    fn round_trip_preserves_structure() {
        let config = sample_config();
        let text = write_string(&config).unwrap();
        let parsed = read_string(&text).unwrap();

        assert!(!parsed.is_modified());
        assert_eq!(parsed.settings().intro_line1, "pluglib");
        assert_eq!(parsed.settings().mic_level, 5);

        assert_eq!(parsed.radio_ids().len(), 2);
        assert_eq!(parsed.radio_ids().default_index(), Some(1));
        assert_eq!(parsed.radio_ids().default_id().unwrap().name, "Hotspot");

        assert_eq!(parsed.contacts().len(), 3);
        assert_eq!(
            parsed.contacts().get(1).unwrap().kind,
            pluglib_core::ContactKind::Dmr {
                call_type: CallType::All,
                number: 16_777_215
            }
        );

        assert_eq!(
            parsed.group_lists().get(0).unwrap().contacts,
            vec![ContactRef(0), ContactRef(1)]
        );

        let fm = parsed.channels().get(0).unwrap();
        assert_eq!(fm.rx_frequency, Frequency::from_mhz(145.600));
        assert_eq!(
            fm.as_fm().unwrap().rx_tone,
            Some(SelectiveCall::ctcss(67.0))
        );
        assert_eq!(fm.as_fm().unwrap().tx_tone, Some(SelectiveCall::dcs(-23)));
        assert_eq!(fm.positioning, Some(PositioningRef(0)));

        let dmr = parsed.channels().get(1).unwrap();
        assert_eq!(dmr.as_dmr().unwrap().time_slot, TimeSlot::Ts2);
        assert_eq!(dmr.as_dmr().unwrap().group_list, Some(GroupListRef(0)));
        assert_eq!(dmr.as_dmr().unwrap().roaming, Some(RoamingZoneRef(0)));
        assert_eq!(
            dmr.as_dmr().unwrap().radio_id,
            Some(pluglib_core::RadioIdRef(0))
        );
        assert_eq!(dmr.scan_list, Some(ScanListRef(0)));

        assert_eq!(
            parsed.zones().get(0).unwrap().channels,
            vec![ChannelRef(0), ChannelRef(1)]
        );
        let scan = parsed.scan_lists().get(0).unwrap();
        assert_eq!(scan.channels, vec![ChannelRef(1), ChannelRef(0)]);
        assert_eq!(scan.priority, Some(ChannelRef(0)));
        assert_eq!(
            parsed.roaming().get(0).unwrap().channels,
            vec![ChannelRef(1)]
        );

        assert_eq!(parsed.positioning().len(), 2);
        assert_eq!(
            parsed
                .positioning()
                .get(1)
                .unwrap()
                .as_dmr_gps()
                .unwrap()
                .destination,
            Some(ContactRef(1))
        );

        let ext = parsed.extension().unwrap();
        let tyt = ext.as_any().downcast_ref::<TytExtension>().unwrap();
        assert_eq!(tyt.long_press_duration, 2000);
    }

    #[test]
    fn key_order_in_document_is_irrelevant() {
        // Channels appear before the group lists they reference.
        let text = "\
channels:
  - digital:
      id: ch1
      name: test
      rxFrequency: 439.56250
      txFrequency: 431.96250
      groupList: grp1
groupLists:
  - {id: grp1, name: Local, contacts: []}
version: \"0.12.0\"
settings:
  micLevel: 3
radioIDs: []
contacts: []
zones: []
";
        let parsed = read_string(text).unwrap();
        assert_eq!(
            parsed.channels().get(0).unwrap().as_dmr().unwrap().group_list,
            Some(GroupListRef(0))
        );
    }

    #[test]
    fn missing_version_defaults_with_warning() {
        let text = "settings: {}\nradioIDs: []\ncontacts: []\nchannels: []\nzones: []\n";
        let parsed = read_string(text).unwrap();
        assert!(parsed.channels().is_empty());
    }

    #[test]
    fn missing_optional_keys_are_empty_collections() {
        let text = "version: \"0.12.0\"\nchannels: []\nzones: []\n";
        let parsed = read_string(text).unwrap();
        assert!(parsed.scan_lists().is_empty());
        assert!(parsed.positioning().is_empty());
        assert!(parsed.roaming().is_empty());
        assert!(parsed.contacts().is_empty());
    }

    #[test]
    fn default_id_falls_back_to_first_entry() {
        let text = "\
version: \"0.12.0\"
radioIDs:
  - dmr: {id: id1, name: One, number: 1}
  - dmr: {id: id2, name: Two, number: 2}
channels: []
zones: []
";
        let parsed = read_string(text).unwrap();
        assert_eq!(parsed.radio_ids().default_index(), Some(0));
        assert_eq!(parsed.radio_ids().default_id().unwrap().name, "One");
    }

    #[test]
    fn unknown_default_id_fails_link() {
        let text = "\
version: \"0.12.0\"
settings:
  defaultID: id9
radioIDs:
  - dmr: {id: id1, name: One, number: 1}
channels: []
zones: []
";
        let err = read_string(text).unwrap_err();
        assert!(matches!(err, pluglib_core::Error::Link { .. }));
        assert!(err.to_string().contains("settings.defaultID"));
    }

    #[test]
    fn dangling_channel_reference_fails_link() {
        let text = "\
version: \"0.12.0\"
channels:
  - digital:
      id: ch1
      name: test
      rxFrequency: 439.56250
      txFrequency: 431.96250
      groupList: grp7
zones: []
";
        let err = read_string(text).unwrap_err();
        assert!(matches!(err, pluglib_core::Error::Link { .. }));
        assert!(err.to_string().contains("channels[0].groupList"));
        assert!(err.to_string().contains("grp7"));
    }

    #[test]
    fn reference_of_wrong_kind_fails_link() {
        let text = "\
version: \"0.12.0\"
contacts:
  - dmr: {id: cont1, name: TG9, type: GroupCall, number: 9}
channels:
  - digital:
      id: ch1
      name: test
      rxFrequency: 439.56250
      txFrequency: 431.96250
      groupList: cont1
zones: []
";
        let err = read_string(text).unwrap_err();
        assert!(err.to_string().contains("expected GroupList"));
    }

    #[test]
    fn duplicate_id_fails_parse() {
        let text = "\
version: \"0.12.0\"
contacts:
  - dmr: {id: cont1, name: A, type: GroupCall, number: 1}
  - dmr: {id: cont1, name: B, type: GroupCall, number: 2}
channels: []
zones: []
";
        let err = read_string(text).unwrap_err();
        assert!(err.to_string().contains("duplicate id"));
    }

    #[test]
    fn non_map_document_fails() {
        let err = read_string("- 1\n- 2\n").unwrap_err();
        assert!(matches!(err, pluglib_core::Error::Parse { .. }));
        assert!(err.to_string().contains("not a map"));
    }

    #[test]
    fn missing_required_key_reports_location() {
        let text = "\
version: \"0.12.0\"
channels:
  - analog:
      id: ch1
      rxFrequency: 145.50000
      txFrequency: 145.50000
zones: []
";
        let err = read_string(text).unwrap_err();
        assert!(err.to_string().contains("channels[0].name"));
    }

    #[test]
    fn frequencies_survive_round_trip_at_10hz() {
        let mut config = Config::new();
        config.channels_mut().add(Channel::fm(
            "x",
            Frequency::from_hz(145_236_750),
            Frequency::from_hz(145_236_750),
        ));
        let text = write_string(&config).unwrap();
        let parsed = read_string(&text).unwrap();
        assert_eq!(
            parsed.channels().get(0).unwrap().rx_frequency,
            Frequency::from_hz(145_236_750)
        );
    }
}
