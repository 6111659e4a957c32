//! The read side: parse, then link.
//!
//! Reading is two passes over the same document. `parse` constructs every
//! object with its scalar fields only, registering document ids in the
//! [`Context`] as it goes; the order of top-level keys in the document is
//! irrelevant because each key is addressed by name. `link` then resolves
//! every id reference across the whole tree, which is guaranteed to
//! succeed for well-formed documents because all objects already exist.
//!
//! Radio IDs are linked before the settings because the
//! `settings.defaultID` field may refer to one; that field is linked
//! separately from the rest of the settings since it is a cross-collection
//! reference stored in an unusual place.

use pluglib_core::{
    AprsPath, Channel, ChannelRef, Config, Contact, ContactRef, Context, Error, Frequency,
    GroupList, GroupListRef, LatLon, ObjKind, PositioningRef, PositioningSystem, RadioId,
    RadioIdRef, RadioSettings, Result, RoamingZone, RoamingZoneRef, ScanList, ScanListRef,
    SelectiveCall, Zone, ZoneRef,
};
use saphyr::Yaml;
use tracing::{debug, warn};

use crate::extensions::ExtensionRegistry;
use crate::node;

const KNOWN_KEYS: &[&str] = &[
    "version",
    "settings",
    "radioIDs",
    "contacts",
    "groupLists",
    "channels",
    "zones",
    "scanLists",
    "positioning",
    "roaming",
];

/// Read a configuration from YAML text with the default extension
/// registry.
pub fn read_string(text: &str) -> Result<Config> {
    let mut docs = Yaml::load_from_str(text)
        .map_err(|e| Error::parse("document", format!("cannot read YAML: {e}")))?;
    if docs.is_empty() {
        return Err(Error::parse("document", "empty document"));
    }
    parse_document(&docs.remove(0), &ExtensionRegistry::with_defaults())
}

/// Parse and link one YAML document into a configuration.
pub fn parse_document(doc: &Yaml, registry: &ExtensionRegistry) -> Result<Config> {
    node::expect_map(doc, "document")?;

    let mut config = Config::new();
    let mut ctx = Context::new();

    match node::get(doc, "version").and_then(Yaml::as_str) {
        Some(version) => {
            debug!("using format version {version}");
            ctx.set_version(version);
        }
        None => {
            warn!("no version string set, assuming 0.9.0");
            ctx.set_version("0.9.0");
        }
    }

    parse(doc, &mut config, &mut ctx, registry)?;
    link(doc, &mut config, &ctx)?;

    config.set_modified(false);
    let _ = config.drain_events();
    Ok(config)
}

// ---------------------------------------------------------------
// Parse pass: scalars only.
// ---------------------------------------------------------------

fn parse(
    doc: &Yaml,
    config: &mut Config,
    ctx: &mut Context,
    registry: &ExtensionRegistry,
) -> Result<()> {
    if let Some(settings) = node::get(doc, "settings") {
        parse_settings(settings, config)?;
    }
    if let Some(seq) = node::get(doc, "radioIDs") {
        parse_radio_ids(seq, config, ctx)?;
    }
    if let Some(seq) = node::get(doc, "contacts") {
        parse_contacts(seq, config, ctx)?;
    }
    if let Some(seq) = node::get(doc, "groupLists") {
        parse_group_lists(seq, config, ctx)?;
    }
    if let Some(seq) = node::get(doc, "channels") {
        parse_channels(seq, config, ctx)?;
    }
    if let Some(seq) = node::get(doc, "zones") {
        parse_zones(seq, config, ctx)?;
    }
    if let Some(seq) = node::get(doc, "scanLists") {
        parse_scan_lists(seq, config, ctx)?;
    }
    if let Some(seq) = node::get(doc, "positioning") {
        parse_positioning(seq, config, ctx)?;
    }
    if let Some(seq) = node::get(doc, "roaming") {
        parse_roaming(seq, config, ctx)?;
    }

    // Any other top-level key is a vendor extension block.
    for (k, v) in doc.as_hash().expect("checked above") {
        let Some(k) = k.as_str() else { continue };
        if KNOWN_KEYS.contains(&k) {
            continue;
        }
        if let Some(ext) = registry.parse(k, v)? {
            config.set_extension(ext);
        }
    }
    Ok(())
}

/// The single `variant: {body}` entry of a typed sequence element.
fn variant<'a>(entry: &'a Yaml, location: &str) -> Result<(&'a str, &'a Yaml)> {
    let map = node::expect_map(entry, location)?;
    if map.len() != 1 {
        return Err(Error::parse(
            location,
            format!("expected exactly one variant key, found {}", map.len()),
        ));
    }
    let (k, v) = map.iter().next().expect("len checked");
    let k = k
        .as_str()
        .ok_or_else(|| Error::parse(location, "variant key is not a string"))?;
    Ok((k, v))
}

fn parse_settings(node: &Yaml, config: &mut Config) -> Result<()> {
    let location = "settings";
    node::expect_map(node, location)?;
    let settings = RadioSettings {
        intro_line1: node::opt_str(node, "introLine1", location)?.unwrap_or_default(),
        intro_line2: node::opt_str(node, "introLine2", location)?.unwrap_or_default(),
        mic_level: node::opt_u8(node, "micLevel", location, 3, 10)?,
        speech: node::opt_bool(node, "speech", location, false)?,
        squelch: node::opt_u8(node, "squelch", location, 1, 10)?,
        vox: node::opt_u8(node, "vox", location, 0, 10)?,
        tot: node::opt_i64(node, "tot", location, 0)?.max(0) as u32,
    };
    config.modify_settings(|s| *s = settings);
    Ok(())
}

fn parse_radio_ids(seq: &Yaml, config: &mut Config, ctx: &mut Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "radioIDs")?.iter().enumerate() {
        let location = format!("radioIDs[{i}]");
        let (kind, body) = variant(entry, &location)?;
        if kind != "dmr" {
            return Err(Error::parse(&location, format!("unknown radio ID type '{kind}'")));
        }
        let id = node::req_str(body, "id", &location)?;
        let radio_id = RadioId::new(
            node::req_str(body, "name", &location)?,
            node::req_i64(body, "number", &location)? as u32,
        );
        let index = config.radio_ids_mut().add(radio_id);
        ctx.add(id, RadioIdRef(index).into())?;
    }
    Ok(())
}

fn parse_contacts(seq: &Yaml, config: &mut Config, ctx: &mut Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "contacts")?.iter().enumerate() {
        let location = format!("contacts[{i}]");
        let (kind, body) = variant(entry, &location)?;
        let id = node::req_str(body, "id", &location)?;
        let name = node::req_str(body, "name", &location)?;
        let mut contact = match kind {
            "dmr" => {
                let call_type = node::req_str(body, "type", &location)?
                    .parse()
                    .map_err(|e| Error::parse(format!("{location}.type"), format!("{e}")))?;
                Contact::dmr(name, call_type, node::req_i64(body, "number", &location)? as u32)
            }
            "dtmf" => Contact::dtmf(name, node::req_str(body, "number", &location)?),
            other => {
                return Err(Error::parse(&location, format!("unknown contact type '{other}'")))
            }
        };
        contact.ring = node::opt_bool(body, "ring", &location, false)?;
        let index = config.contacts_mut().add(contact);
        ctx.add(id, ContactRef(index).into())?;
    }
    Ok(())
}

fn parse_group_lists(seq: &Yaml, config: &mut Config, ctx: &mut Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "groupLists")?.iter().enumerate() {
        let location = format!("groupLists[{i}]");
        node::expect_map(entry, &location)?;
        let id = node::req_str(entry, "id", &location)?;
        let list = GroupList::new(node::req_str(entry, "name", &location)?);
        let index = config.group_lists_mut().add(list);
        ctx.add(id, GroupListRef(index).into())?;
    }
    Ok(())
}

fn parse_tone(node: &Yaml, location: &str) -> Result<SelectiveCall> {
    if let Some(ctcss) = node::get(node, "ctcss") {
        let hz = node::as_f64(ctcss)
            .ok_or_else(|| Error::parse(format!("{location}.ctcss"), "expected a number"))?;
        Ok(SelectiveCall::ctcss(hz))
    } else if let Some(dcs) = node::get(node, "dcs") {
        let code = dcs
            .as_i64()
            .ok_or_else(|| Error::parse(format!("{location}.dcs"), "expected an integer"))?;
        Ok(SelectiveCall::dcs(code as i32))
    } else {
        Err(Error::parse(location, "expected a ctcss or dcs key"))
    }
}

fn parse_channels(seq: &Yaml, config: &mut Config, ctx: &mut Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "channels")?.iter().enumerate() {
        let location = format!("channels[{i}]");
        let (kind, body) = variant(entry, &location)?;
        let id = node::req_str(body, "id", &location)?;
        let name = node::req_str(body, "name", &location)?;
        let rx = Frequency::from_mhz(node::req_f64(body, "rxFrequency", &location)?);
        let tx = Frequency::from_mhz(node::req_f64(body, "txFrequency", &location)?);

        let mut channel = match kind {
            "analog" => {
                let mut ch = Channel::fm(name, rx, tx);
                let fm = ch.as_fm_mut().unwrap();
                if let Some(admit) = node::opt_str(body, "admit", &location)? {
                    fm.admit = admit
                        .parse()
                        .map_err(|e| Error::parse(format!("{location}.admit"), format!("{e}")))?;
                }
                if let Some(bw) = node::opt_str(body, "bandwidth", &location)? {
                    fm.bandwidth = bw.parse().map_err(|e| {
                        Error::parse(format!("{location}.bandwidth"), format!("{e}"))
                    })?;
                }
                fm.squelch = node::opt_u8(body, "squelch", &location, 1, 10)?;
                if let Some(tone) = node::get(body, "rxTone") {
                    fm.rx_tone = Some(parse_tone(tone, &format!("{location}.rxTone"))?);
                }
                if let Some(tone) = node::get(body, "txTone") {
                    fm.tx_tone = Some(parse_tone(tone, &format!("{location}.txTone"))?);
                }
                ch
            }
            "digital" => {
                let mut ch = Channel::dmr(name, rx, tx);
                let dmr = ch.as_dmr_mut().unwrap();
                if let Some(admit) = node::opt_str(body, "admit", &location)? {
                    dmr.admit = admit
                        .parse()
                        .map_err(|e| Error::parse(format!("{location}.admit"), format!("{e}")))?;
                }
                dmr.color_code = node::opt_u8(body, "colorCode", &location, 1, 15)?;
                if let Some(ts) = node::opt_str(body, "timeSlot", &location)? {
                    dmr.time_slot = ts.parse().map_err(|e| {
                        Error::parse(format!("{location}.timeSlot"), format!("{e}"))
                    })?;
                }
                ch
            }
            other => {
                return Err(Error::parse(&location, format!("unknown channel type '{other}'")))
            }
        };

        if let Some(power) = node::opt_str(body, "power", &location)? {
            channel.power = power
                .parse()
                .map_err(|e| Error::parse(format!("{location}.power"), format!("{e}")))?;
        }
        channel.timeout = node::opt_i64(body, "timeout", &location, 0)?.max(0) as u32;
        channel.rx_only = node::opt_bool(body, "rxOnly", &location, false)?;
        channel.vox = node::opt_bool(body, "vox", &location, false)?;

        let index = config.channels_mut().add(channel);
        ctx.add(id, ChannelRef(index).into())?;
    }
    Ok(())
}

fn parse_zones(seq: &Yaml, config: &mut Config, ctx: &mut Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "zones")?.iter().enumerate() {
        let location = format!("zones[{i}]");
        node::expect_map(entry, &location)?;
        let id = node::req_str(entry, "id", &location)?;
        let zone = Zone::new(node::req_str(entry, "name", &location)?);
        let index = config.zones_mut().add(zone);
        ctx.add(id, ZoneRef(index).into())?;
    }
    Ok(())
}

fn parse_scan_lists(seq: &Yaml, config: &mut Config, ctx: &mut Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "scanLists")?.iter().enumerate() {
        let location = format!("scanLists[{i}]");
        node::expect_map(entry, &location)?;
        let id = node::req_str(entry, "id", &location)?;
        let list = ScanList::new(node::req_str(entry, "name", &location)?);
        let index = config.scan_lists_mut().add(list);
        ctx.add(id, ScanListRef(index).into())?;
    }
    Ok(())
}

fn parse_positioning(seq: &Yaml, config: &mut Config, ctx: &mut Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "positioning")?.iter().enumerate() {
        let location = format!("positioning[{i}]");
        let (kind, body) = variant(entry, &location)?;
        let id = node::req_str(body, "id", &location)?;
        let name = node::req_str(body, "name", &location)?;
        let period = node::opt_i64(body, "period", &location, 300)?.max(0) as u32;
        let system = match kind {
            "aprs" => {
                let mut sys = PositioningSystem::aprs(name, period);
                let aprs = sys.as_aprs_mut().unwrap();
                aprs.source_ssid = node::opt_u8(body, "sourceSSID", &location, 0, 15)?;
                for (via_key, slot) in [("via1", 0usize), ("via2", 1)] {
                    if let Some(via) = node::get(body, via_key) {
                        let via_loc = format!("{location}.{via_key}");
                        let path = AprsPath::new(
                            node::req_str(via, "call", &via_loc)?,
                            node::opt_u8(via, "ssid", &via_loc, 0, 15)?,
                        );
                        if slot == 0 {
                            aprs.via1 = Some(path);
                        } else {
                            aprs.via2 = Some(path);
                        }
                    }
                }
                aprs.icon = node::opt_i64(body, "icon", &location, 0)?.clamp(0, 255) as u8;
                aprs.comment = node::opt_str(body, "comment", &location)?.unwrap_or_default();
                if let Some(pos) = node::get(body, "position") {
                    let pos_loc = format!("{location}.position");
                    aprs.fixed_position = Some(LatLon::new(
                        node::req_f64(pos, "latitude", &pos_loc)?,
                        node::req_f64(pos, "longitude", &pos_loc)?,
                    ));
                }
                aprs.baud_1200 = node::opt_i64(body, "baud", &location, 1200)? == 1200;
                sys
            }
            "dmr" => PositioningSystem::dmr_gps(name, period),
            other => {
                return Err(Error::parse(
                    &location,
                    format!("unknown positioning type '{other}'"),
                ))
            }
        };
        let index = config.positioning_mut().add(system);
        ctx.add(id, PositioningRef(index).into())?;
    }
    Ok(())
}

fn parse_roaming(seq: &Yaml, config: &mut Config, ctx: &mut Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "roaming")?.iter().enumerate() {
        let location = format!("roaming[{i}]");
        node::expect_map(entry, &location)?;
        let id = node::req_str(entry, "id", &location)?;
        let zone = RoamingZone::new(node::req_str(entry, "name", &location)?);
        let index = config.roaming_mut().add(zone);
        ctx.add(id, RoamingZoneRef(index).into())?;
    }
    Ok(())
}

// ---------------------------------------------------------------
// Link pass: resolve id references.
// ---------------------------------------------------------------

fn link(doc: &Yaml, config: &mut Config, ctx: &Context) -> Result<()> {
    // Radio IDs hold no references, but the default selection below
    // depends on them having been parsed; settings come second.
    link_default_radio_id(doc, config, ctx)?;

    if let Some(seq) = node::get(doc, "groupLists") {
        link_group_lists(seq, config, ctx)?;
    }
    if let Some(seq) = node::get(doc, "channels") {
        link_channels(seq, config, ctx)?;
    }
    if let Some(seq) = node::get(doc, "zones") {
        link_zones(seq, config, ctx)?;
    }
    if let Some(seq) = node::get(doc, "scanLists") {
        link_scan_lists(seq, config, ctx)?;
    }
    if let Some(seq) = node::get(doc, "positioning") {
        link_positioning(seq, config, ctx)?;
    }
    if let Some(seq) = node::get(doc, "roaming") {
        link_roaming(seq, config, ctx)?;
    }
    Ok(())
}

/// Link `settings.defaultID`. The field is a cross-collection reference
/// defined inside the settings map, so it is linked here and not in
/// `parse_settings`. Without it, a non-empty radio ID list defaults to
/// its first entry.
fn link_default_radio_id(doc: &Yaml, config: &mut Config, ctx: &Context) -> Result<()> {
    let default = node::get(doc, "settings")
        .and_then(|s| node::get(s, "defaultID"))
        .and_then(Yaml::as_str);
    match default {
        Some(id) => {
            let index = ctx.resolve("settings.defaultID", id, ObjKind::RadioId)?;
            config.radio_ids_mut().set_default(index);
            debug!(
                "set default radio ID to '{}'",
                config.radio_ids().get(index).expect("resolved").name
            );
        }
        None => {
            if !config.radio_ids().is_empty() {
                debug!("no defaultID set, using the first radio ID");
            }
        }
    }
    Ok(())
}

fn resolve_channel_list(
    node_list: &Yaml,
    location: &str,
    ctx: &Context,
) -> Result<Vec<ChannelRef>> {
    let mut members = Vec::new();
    for (m, member) in node::expect_seq(node_list, location)?.iter().enumerate() {
        let member_loc = format!("{location}[{m}]");
        let id = member
            .as_str()
            .ok_or_else(|| Error::parse(&member_loc, "expected an id string"))?;
        members.push(ChannelRef(ctx.resolve(&member_loc, id, ObjKind::Channel)?));
    }
    Ok(members)
}

fn link_group_lists(seq: &Yaml, config: &mut Config, ctx: &Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "groupLists")?.iter().enumerate() {
        let location = format!("groupLists[{i}].contacts");
        let mut members = Vec::new();
        if let Some(contacts) = node::get(entry, "contacts") {
            for (m, member) in node::expect_seq(contacts, &location)?.iter().enumerate() {
                let member_loc = format!("{location}[{m}]");
                let id = member
                    .as_str()
                    .ok_or_else(|| Error::parse(&member_loc, "expected an id string"))?;
                members.push(ContactRef(ctx.resolve(&member_loc, id, ObjKind::Contact)?));
            }
        }
        config
            .group_lists_mut()
            .modify(i, |list| list.contacts = members);
    }
    Ok(())
}

fn link_channels(seq: &Yaml, config: &mut Config, ctx: &Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "channels")?.iter().enumerate() {
        let location = format!("channels[{i}]");
        let (_, body) = variant(entry, &location)?;

        let scan_list = match node::opt_str(body, "scanList", &location)? {
            Some(id) => Some(ScanListRef(ctx.resolve(
                &format!("{location}.scanList"),
                &id,
                ObjKind::ScanList,
            )?)),
            None => None,
        };
        let positioning = match node::opt_str(body, "aprs", &location)? {
            Some(id) => Some(PositioningRef(ctx.resolve(
                &format!("{location}.aprs"),
                &id,
                ObjKind::Positioning,
            )?)),
            None => None,
        };
        let group_list = match node::opt_str(body, "groupList", &location)? {
            Some(id) => Some(GroupListRef(ctx.resolve(
                &format!("{location}.groupList"),
                &id,
                ObjKind::GroupList,
            )?)),
            None => None,
        };
        let contact = match node::opt_str(body, "contact", &location)? {
            Some(id) => Some(ContactRef(ctx.resolve(
                &format!("{location}.contact"),
                &id,
                ObjKind::Contact,
            )?)),
            None => None,
        };
        let radio_id = match node::opt_str(body, "radioID", &location)? {
            Some(id) => Some(RadioIdRef(ctx.resolve(
                &format!("{location}.radioID"),
                &id,
                ObjKind::RadioId,
            )?)),
            None => None,
        };
        let roaming = match node::opt_str(body, "roaming", &location)? {
            Some(id) => Some(RoamingZoneRef(ctx.resolve(
                &format!("{location}.roaming"),
                &id,
                ObjKind::RoamingZone,
            )?)),
            None => None,
        };

        config.channels_mut().modify(i, |ch| {
            ch.scan_list = scan_list;
            ch.positioning = positioning;
            if let Some(dmr) = ch.as_dmr_mut() {
                dmr.group_list = group_list;
                dmr.contact = contact;
                dmr.radio_id = radio_id;
                dmr.roaming = roaming;
            }
        });
    }
    Ok(())
}

fn link_zones(seq: &Yaml, config: &mut Config, ctx: &Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "zones")?.iter().enumerate() {
        let location = format!("zones[{i}].channels");
        let members = match node::get(entry, "channels") {
            Some(list) => resolve_channel_list(list, &location, ctx)?,
            None => Vec::new(),
        };
        config.zones_mut().modify(i, |zone| zone.channels = members);
    }
    Ok(())
}

fn link_scan_lists(seq: &Yaml, config: &mut Config, ctx: &Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "scanLists")?.iter().enumerate() {
        let location = format!("scanLists[{i}]");
        let priority = match node::opt_str(entry, "primary", &location)? {
            Some(id) => Some(ChannelRef(ctx.resolve(
                &format!("{location}.primary"),
                &id,
                ObjKind::Channel,
            )?)),
            None => None,
        };
        let members = match node::get(entry, "channels") {
            Some(list) => resolve_channel_list(list, &format!("{location}.channels"), ctx)?,
            None => Vec::new(),
        };
        config.scan_lists_mut().modify(i, |list| {
            list.priority = priority;
            list.channels = members;
        });
    }
    Ok(())
}

fn link_positioning(seq: &Yaml, config: &mut Config, ctx: &Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "positioning")?.iter().enumerate() {
        let location = format!("positioning[{i}]");
        let (kind, body) = variant(entry, &location)?;
        if kind != "dmr" {
            continue;
        }
        let destination = match node::opt_str(body, "destination", &location)? {
            Some(id) => Some(ContactRef(ctx.resolve(
                &format!("{location}.destination"),
                &id,
                ObjKind::Contact,
            )?)),
            None => None,
        };
        config.positioning_mut().modify(i, |sys| {
            if let Some(gps) = sys.as_dmr_gps_mut() {
                gps.destination = destination;
            }
        });
    }
    Ok(())
}

fn link_roaming(seq: &Yaml, config: &mut Config, ctx: &Context) -> Result<()> {
    for (i, entry) in node::expect_seq(seq, "roaming")?.iter().enumerate() {
        let location = format!("roaming[{i}].channels");
        let members = match node::get(entry, "channels") {
            Some(list) => resolve_channel_list(list, &location, ctx)?,
            None => Vec::new(),
        };
        config
            .roaming_mut()
            .modify(i, |zone| zone.channels = members);
    }
    Ok(())
}
