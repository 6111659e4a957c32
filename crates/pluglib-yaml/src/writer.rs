//! The write side: label, then serialize.
//!
//! Serialization is two passes. [`label`] walks the whole tree first and
//! assigns every object a stable, human-meaningful id (`ch1`, `cont3`,
//! `zone2`, ...) in the [`Context`]; only then does [`serialize`] emit the
//! document, so a reference field can always be written no matter where
//! its target sits in the key order. Top-level keys are emitted in a fixed
//! order; the optional collections (`scanLists`, `positioning`, `roaming`)
//! appear only when non-empty.

use pluglib_core::{
    ChannelMode, ChannelRef, Config, Contact, ContactKind, ContactRef, Context, Error, Frequency,
    GroupListRef, ObjRef, PositioningKind, PositioningRef, RadioIdRef, Result, RoamingZoneRef,
    ScanListRef, SelectiveCall, ZoneRef,
};
use saphyr::{Hash, Yaml, YamlEmitter};

use crate::extensions::ExtensionRegistry;

/// Format version written into new documents.
pub const FORMAT_VERSION: &str = "0.12.0";

/// Assign document ids to every object of the tree.
///
/// Deterministic given the tree: ids are the per-collection prefix plus
/// the 1-based position (positioning systems count per kind, so `aprs1`
/// and `gps1` may coexist).
pub fn label(config: &Config) -> Result<Context> {
    let mut ctx = Context::new();
    ctx.set_version(FORMAT_VERSION);

    for i in 0..config.radio_ids().len() {
        ctx.add(format!("id{}", i + 1), RadioIdRef(i).into())?;
    }
    for i in 0..config.contacts().len() {
        ctx.add(format!("cont{}", i + 1), ContactRef(i).into())?;
    }
    for i in 0..config.group_lists().len() {
        ctx.add(format!("grp{}", i + 1), GroupListRef(i).into())?;
    }
    for i in 0..config.channels().len() {
        ctx.add(format!("ch{}", i + 1), ChannelRef(i).into())?;
    }
    for i in 0..config.zones().len() {
        ctx.add(format!("zone{}", i + 1), ZoneRef(i).into())?;
    }
    for i in 0..config.scan_lists().len() {
        ctx.add(format!("scan{}", i + 1), ScanListRef(i).into())?;
    }
    let (mut aprs, mut gps) = (0, 0);
    for (i, sys) in config.positioning().iter().enumerate() {
        let id = match sys.kind {
            PositioningKind::Aprs(_) => {
                aprs += 1;
                format!("aprs{aprs}")
            }
            PositioningKind::DmrGps(_) => {
                gps += 1;
                format!("gps{gps}")
            }
        };
        ctx.add(id, PositioningRef(i).into())?;
    }
    for i in 0..config.roaming().len() {
        ctx.add(format!("roam{}", i + 1), RoamingZoneRef(i).into())?;
    }
    Ok(ctx)
}

/// Serialize a labeled tree into a YAML document node.
pub fn serialize(config: &Config, ctx: &Context, registry: &ExtensionRegistry) -> Result<Yaml> {
    let mut doc = Hash::new();
    doc.insert(key("version"), Yaml::String(FORMAT_VERSION.into()));
    doc.insert(key("settings"), settings_node(config, ctx)?);
    doc.insert(key("radioIDs"), radio_ids_node(config, ctx)?);
    doc.insert(key("contacts"), contacts_node(config, ctx)?);
    doc.insert(key("groupLists"), group_lists_node(config, ctx)?);
    doc.insert(key("channels"), channels_node(config, ctx)?);
    doc.insert(key("zones"), zones_node(config, ctx)?);
    if !config.scan_lists().is_empty() {
        doc.insert(key("scanLists"), scan_lists_node(config, ctx)?);
    }
    if !config.positioning().is_empty() {
        doc.insert(key("positioning"), positioning_node(config, ctx)?);
    }
    if !config.roaming().is_empty() {
        doc.insert(key("roaming"), roaming_node(config, ctx)?);
    }
    if let Some(ext) = config.extension() {
        if let Some((ext_key, node)) = registry.serialize(ext) {
            doc.insert(key(ext_key), node);
        }
    }
    Ok(Yaml::Hash(doc))
}

/// Label, serialize and emit a configuration as YAML text.
pub fn write_string(config: &Config) -> Result<String> {
    let ctx = label(config)?;
    let doc = serialize(config, &ctx, &ExtensionRegistry::with_defaults())?;
    let mut out = String::new();
    YamlEmitter::new(&mut out)
        .dump(&doc)
        .map_err(|e| Error::parse("document", format!("cannot emit YAML: {e}")))?;
    out.push('\n');
    Ok(out)
}

fn key(s: &str) -> Yaml {
    Yaml::String(s.into())
}

fn id_node(ctx: &Context, location: &str, obj: ObjRef) -> Result<Yaml> {
    match ctx.id_for(obj) {
        Some(id) => Ok(Yaml::String(id.into())),
        None => Err(Error::link(location, "reference to an unlabeled object")),
    }
}

fn frequency_node(freq: Frequency) -> Yaml {
    Yaml::Real(format!("{:.5}", freq.mhz()))
}

fn tone_node(tone: &SelectiveCall) -> Yaml {
    let mut hash = Hash::new();
    match tone {
        SelectiveCall::Ctcss { deci_hz } => {
            hash.insert(
                key("ctcss"),
                Yaml::Real(format!("{}.{}", deci_hz / 10, deci_hz % 10)),
            );
        }
        SelectiveCall::Dcs { code, inverted } => {
            let signed = if *inverted { -(*code as i64) } else { *code as i64 };
            hash.insert(key("dcs"), Yaml::Integer(signed));
        }
    }
    Yaml::Hash(hash)
}

fn settings_node(config: &Config, ctx: &Context) -> Result<Yaml> {
    let s = config.settings();
    let mut hash = Hash::new();
    hash.insert(key("introLine1"), Yaml::String(s.intro_line1.clone()));
    hash.insert(key("introLine2"), Yaml::String(s.intro_line2.clone()));
    hash.insert(key("micLevel"), Yaml::Integer(s.mic_level as i64));
    hash.insert(key("speech"), Yaml::Boolean(s.speech));
    hash.insert(key("squelch"), Yaml::Integer(s.squelch as i64));
    hash.insert(key("vox"), Yaml::Integer(s.vox as i64));
    hash.insert(key("tot"), Yaml::Integer(s.tot as i64));
    // The default radio ID is defined here even though it references into
    // the radioIDs collection.
    if let Some(index) = config.radio_ids().default_index() {
        hash.insert(
            key("defaultID"),
            id_node(ctx, "settings.defaultID", RadioIdRef(index).into())?,
        );
    }
    Ok(Yaml::Hash(hash))
}

fn radio_ids_node(config: &Config, ctx: &Context) -> Result<Yaml> {
    let mut seq = Vec::new();
    for (i, id) in config.radio_ids().iter().enumerate() {
        let mut body = Hash::new();
        body.insert(
            key("id"),
            id_node(ctx, &format!("radioIDs[{i}]"), RadioIdRef(i).into())?,
        );
        body.insert(key("name"), Yaml::String(id.name.clone()));
        body.insert(key("number"), Yaml::Integer(id.number as i64));
        let mut entry = Hash::new();
        entry.insert(key("dmr"), Yaml::Hash(body));
        seq.push(Yaml::Hash(entry));
    }
    Ok(Yaml::Array(seq))
}

fn contact_entry(i: usize, contact: &Contact, ctx: &Context) -> Result<Yaml> {
    let location = format!("contacts[{i}]");
    let mut body = Hash::new();
    body.insert(key("id"), id_node(ctx, &location, ContactRef(i).into())?);
    body.insert(key("name"), Yaml::String(contact.name.clone()));
    body.insert(key("ring"), Yaml::Boolean(contact.ring));
    let mut entry = Hash::new();
    match &contact.kind {
        ContactKind::Dmr { call_type, number } => {
            body.insert(key("type"), Yaml::String(call_type.to_string()));
            body.insert(key("number"), Yaml::Integer(*number as i64));
            entry.insert(key("dmr"), Yaml::Hash(body));
        }
        ContactKind::Dtmf { number } => {
            body.insert(key("number"), Yaml::String(number.clone()));
            entry.insert(key("dtmf"), Yaml::Hash(body));
        }
    }
    Ok(Yaml::Hash(entry))
}

fn contacts_node(config: &Config, ctx: &Context) -> Result<Yaml> {
    let mut seq = Vec::new();
    for (i, contact) in config.contacts().iter().enumerate() {
        seq.push(contact_entry(i, contact, ctx)?);
    }
    Ok(Yaml::Array(seq))
}

fn group_lists_node(config: &Config, ctx: &Context) -> Result<Yaml> {
    let mut seq = Vec::new();
    for (i, list) in config.group_lists().iter().enumerate() {
        let location = format!("groupLists[{i}]");
        let mut body = Hash::new();
        body.insert(key("id"), id_node(ctx, &location, GroupListRef(i).into())?);
        body.insert(key("name"), Yaml::String(list.name.clone()));
        let mut members = Vec::new();
        for (m, contact) in list.contacts.iter().enumerate() {
            members.push(id_node(
                ctx,
                &format!("{location}.contacts[{m}]"),
                (*contact).into(),
            )?);
        }
        body.insert(key("contacts"), Yaml::Array(members));
        seq.push(Yaml::Hash(body));
    }
    Ok(Yaml::Array(seq))
}

fn channels_node(config: &Config, ctx: &Context) -> Result<Yaml> {
    let mut seq = Vec::new();
    for (i, ch) in config.channels().iter().enumerate() {
        let location = format!("channels[{i}]");
        let mut body = Hash::new();
        body.insert(key("id"), id_node(ctx, &location, ChannelRef(i).into())?);
        body.insert(key("name"), Yaml::String(ch.name.clone()));
        body.insert(key("rxFrequency"), frequency_node(ch.rx_frequency));
        body.insert(key("txFrequency"), frequency_node(ch.tx_frequency));
        body.insert(key("rxOnly"), Yaml::Boolean(ch.rx_only));
        body.insert(key("power"), Yaml::String(ch.power.to_string()));
        body.insert(key("timeout"), Yaml::Integer(ch.timeout as i64));
        body.insert(key("vox"), Yaml::Boolean(ch.vox));

        let mut entry = Hash::new();
        match &ch.mode {
            ChannelMode::Fm(fm) => {
                body.insert(key("admit"), Yaml::String(fm.admit.to_string()));
                body.insert(key("bandwidth"), Yaml::String(fm.bandwidth.to_string()));
                body.insert(key("squelch"), Yaml::Integer(fm.squelch as i64));
                if let Some(tone) = &fm.rx_tone {
                    body.insert(key("rxTone"), tone_node(tone));
                }
                if let Some(tone) = &fm.tx_tone {
                    body.insert(key("txTone"), tone_node(tone));
                }
                insert_channel_refs(&mut body, ch, &location, ctx)?;
                entry.insert(key("analog"), Yaml::Hash(body));
            }
            ChannelMode::Dmr(dmr) => {
                body.insert(key("admit"), Yaml::String(dmr.admit.to_string()));
                body.insert(key("colorCode"), Yaml::Integer(dmr.color_code as i64));
                body.insert(key("timeSlot"), Yaml::String(dmr.time_slot.to_string()));
                if let Some(r) = dmr.group_list {
                    body.insert(
                        key("groupList"),
                        id_node(ctx, &format!("{location}.groupList"), r.into())?,
                    );
                }
                if let Some(r) = dmr.contact {
                    body.insert(
                        key("contact"),
                        id_node(ctx, &format!("{location}.contact"), r.into())?,
                    );
                }
                if let Some(r) = dmr.radio_id {
                    body.insert(
                        key("radioID"),
                        id_node(ctx, &format!("{location}.radioID"), r.into())?,
                    );
                }
                if let Some(r) = dmr.roaming {
                    body.insert(
                        key("roaming"),
                        id_node(ctx, &format!("{location}.roaming"), r.into())?,
                    );
                }
                insert_channel_refs(&mut body, ch, &location, ctx)?;
                entry.insert(key("digital"), Yaml::Hash(body));
            }
        }
        seq.push(Yaml::Hash(entry));
    }
    Ok(Yaml::Array(seq))
}

fn insert_channel_refs(
    body: &mut Hash,
    ch: &pluglib_core::Channel,
    location: &str,
    ctx: &Context,
) -> Result<()> {
    if let Some(r) = ch.scan_list {
        body.insert(
            key("scanList"),
            id_node(ctx, &format!("{location}.scanList"), r.into())?,
        );
    }
    if let Some(r) = ch.positioning {
        body.insert(
            key("aprs"),
            id_node(ctx, &format!("{location}.aprs"), r.into())?,
        );
    }
    Ok(())
}

fn member_list(
    members: &[ChannelRef],
    location: &str,
    ctx: &Context,
) -> Result<Yaml> {
    let mut seq = Vec::new();
    for (m, channel) in members.iter().enumerate() {
        seq.push(id_node(
            ctx,
            &format!("{location}.channels[{m}]"),
            (*channel).into(),
        )?);
    }
    Ok(Yaml::Array(seq))
}

fn zones_node(config: &Config, ctx: &Context) -> Result<Yaml> {
    let mut seq = Vec::new();
    for (i, zone) in config.zones().iter().enumerate() {
        let location = format!("zones[{i}]");
        let mut body = Hash::new();
        body.insert(key("id"), id_node(ctx, &location, ZoneRef(i).into())?);
        body.insert(key("name"), Yaml::String(zone.name.clone()));
        body.insert(
            key("channels"),
            member_list(&zone.channels, &location, ctx)?,
        );
        seq.push(Yaml::Hash(body));
    }
    Ok(Yaml::Array(seq))
}

fn scan_lists_node(config: &Config, ctx: &Context) -> Result<Yaml> {
    let mut seq = Vec::new();
    for (i, list) in config.scan_lists().iter().enumerate() {
        let location = format!("scanLists[{i}]");
        let mut body = Hash::new();
        body.insert(key("id"), id_node(ctx, &location, ScanListRef(i).into())?);
        body.insert(key("name"), Yaml::String(list.name.clone()));
        if let Some(r) = list.priority {
            body.insert(
                key("primary"),
                id_node(ctx, &format!("{location}.primary"), r.into())?,
            );
        }
        body.insert(
            key("channels"),
            member_list(&list.channels, &location, ctx)?,
        );
        seq.push(Yaml::Hash(body));
    }
    Ok(Yaml::Array(seq))
}

fn positioning_node(config: &Config, ctx: &Context) -> Result<Yaml> {
    let mut seq = Vec::new();
    for (i, sys) in config.positioning().iter().enumerate() {
        let location = format!("positioning[{i}]");
        let mut body = Hash::new();
        body.insert(key("id"), id_node(ctx, &location, PositioningRef(i).into())?);
        body.insert(key("name"), Yaml::String(sys.name.clone()));
        body.insert(key("period"), Yaml::Integer(sys.period as i64));
        let mut entry = Hash::new();
        match &sys.kind {
            PositioningKind::Aprs(aprs) => {
                body.insert(key("sourceSSID"), Yaml::Integer(aprs.source_ssid as i64));
                for (via_key, via) in [("via1", &aprs.via1), ("via2", &aprs.via2)] {
                    if let Some(via) = via {
                        let mut via_body = Hash::new();
                        via_body.insert(key("call"), Yaml::String(via.call.clone()));
                        via_body.insert(key("ssid"), Yaml::Integer(via.ssid as i64));
                        body.insert(key(via_key), Yaml::Hash(via_body));
                    }
                }
                body.insert(key("icon"), Yaml::Integer(aprs.icon as i64));
                body.insert(key("comment"), Yaml::String(aprs.comment.clone()));
                if let Some(pos) = aprs.fixed_position {
                    let mut pos_body = Hash::new();
                    pos_body.insert(key("latitude"), Yaml::Real(format!("{:.4}", pos.latitude)));
                    pos_body.insert(
                        key("longitude"),
                        Yaml::Real(format!("{:.4}", pos.longitude)),
                    );
                    body.insert(key("position"), Yaml::Hash(pos_body));
                }
                body.insert(
                    key("baud"),
                    Yaml::Integer(if aprs.baud_1200 { 1200 } else { 300 }),
                );
                entry.insert(key("aprs"), Yaml::Hash(body));
            }
            PositioningKind::DmrGps(gps) => {
                if let Some(r) = gps.destination {
                    body.insert(
                        key("destination"),
                        id_node(ctx, &format!("{location}.destination"), r.into())?,
                    );
                }
                entry.insert(key("dmr"), Yaml::Hash(body));
            }
        }
        seq.push(Yaml::Hash(entry));
    }
    Ok(Yaml::Array(seq))
}

fn roaming_node(config: &Config, ctx: &Context) -> Result<Yaml> {
    let mut seq = Vec::new();
    for (i, zone) in config.roaming().iter().enumerate() {
        let location = format!("roaming[{i}]");
        let mut body = Hash::new();
        body.insert(key("id"), id_node(ctx, &location, RoamingZoneRef(i).into())?);
        body.insert(key("name"), Yaml::String(zone.name.clone()));
        body.insert(
            key("channels"),
            member_list(&zone.channels, &location, ctx)?,
        );
        seq.push(Yaml::Hash(body));
    }
    Ok(Yaml::Array(seq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluglib_core::{CallType, Channel, RadioId};

    #[test]
    fn label_is_deterministic_and_unique() {
        let mut config = Config::new();
        config.radio_ids_mut().add(RadioId::new("X", 1));
        config
            .contacts_mut()
            .add(Contact::dmr("a", CallType::Group, 1));
        config
            .contacts_mut()
            .add(Contact::dtmf("b", "123"));
        config.channels_mut().add(Channel::fm(
            "c",
            Frequency::from_mhz(145.5),
            Frequency::from_mhz(145.5),
        ));

        let ctx = label(&config).unwrap();
        assert_eq!(ctx.get("id1"), Some(RadioIdRef(0).into()));
        assert_eq!(ctx.get("cont1"), Some(ContactRef(0).into()));
        assert_eq!(ctx.get("cont2"), Some(ContactRef(1).into()));
        assert_eq!(ctx.get("ch1"), Some(ChannelRef(0).into()));
        assert_eq!(ctx.id_for(ContactRef(1).into()), Some("cont2"));
    }

    #[test]
    fn top_level_key_order_is_fixed() {
        let mut config = Config::new();
        config.radio_ids_mut().add(RadioId::new("X", 1));
        config
            .scan_lists_mut()
            .add(pluglib_core::ScanList::new("s"));
        let text = write_string(&config).unwrap();
        let version = text.find("version:").unwrap();
        let settings = text.find("settings:").unwrap();
        let radio_ids = text.find("radioIDs:").unwrap();
        let channels = text.find("channels:").unwrap();
        let scan_lists = text.find("scanLists:").unwrap();
        assert!(version < settings);
        assert!(settings < radio_ids);
        assert!(radio_ids < channels);
        assert!(channels < scan_lists);
    }

    #[test]
    fn optional_collections_omitted_when_empty() {
        let config = Config::new();
        let text = write_string(&config).unwrap();
        assert!(!text.contains("scanLists:"));
        assert!(!text.contains("positioning:"));
        assert!(!text.contains("roaming:"));
        // Required collections appear even when empty.
        assert!(text.contains("channels:"));
        assert!(text.contains("zones:"));
    }

    #[test]
    fn default_id_written_under_settings() {
        let mut config = Config::new();
        config.radio_ids_mut().add(RadioId::new("a", 1));
        config.radio_ids_mut().add(RadioId::new("b", 2));
        config.radio_ids_mut().set_default(1);
        let text = write_string(&config).unwrap();
        assert!(text.contains("defaultID: id2"));
    }

    #[test]
    fn dangling_reference_fails_serialization() {
        let mut config = Config::new();
        let mut ch = Channel::dmr(
            "d",
            Frequency::from_mhz(439.0),
            Frequency::from_mhz(431.4),
        );
        ch.as_dmr_mut().unwrap().group_list = Some(GroupListRef(7));
        config.channels_mut().add(ch);
        let err = write_string(&config).unwrap_err();
        assert!(matches!(err, Error::Link { .. }));
        assert!(err.to_string().contains("channels[0].groupList"));
    }

    #[test]
    fn tone_nodes() {
        let mut out = String::new();
        YamlEmitter::new(&mut out)
            .dump(&tone_node(&SelectiveCall::ctcss(67.0)))
            .unwrap();
        assert!(out.contains("ctcss: 67.0"));

        let mut out = String::new();
        YamlEmitter::new(&mut out)
            .dump(&tone_node(&SelectiveCall::dcs(-23)))
            .unwrap();
        assert!(out.contains("dcs: -23"));
    }
}
