//! Zone record codec.
//!
//! Zones (0xb0 bytes, 68 per bank) hold a name and up to 80 channel
//! indices stored with the `+1` convention:
//!
//! ```text
//! 0x00  name, 16 bytes ASCII, 0xff padded
//! 0x10  80 member channel indices + 1, 16-bit LE each
//! ```

use pluglib_core::{BinaryContext, ChannelRef, Config, Error, ObjKind, Result, Zone};
use pluglib_image::{ElementMut, ElementRef};

use crate::bank::BankLayout;

/// Size of one zone record.
pub const ZONE_SIZE: usize = 0xb0;

/// Zones per bank.
pub const ZONES_PER_BANK: usize = 68;

/// Members per zone.
pub const MEMBERS_PER_ZONE: usize = 80;

/// Shape of the zone bank (0x20 bitmask + records).
pub const ZONE_BANK: BankLayout = BankLayout {
    records_offset: 0x20,
    record_size: ZONE_SIZE,
    capacity: ZONES_PER_BANK,
};

/// Name length limit of a zone record.
pub const NAME_LENGTH: usize = 16;

const NAME: usize = 0x00;
const MEMBERS: usize = 0x10;

/// Encode a zone, resolving member channels through the binary context.
pub fn encode_zone(buf: &mut [u8], location: &str, zone: &Zone, ctx: &BinaryContext) -> Result<()> {
    if zone.channels.len() > MEMBERS_PER_ZONE {
        return Err(Error::encode(
            location,
            format!(
                "{} members exceed the supported {MEMBERS_PER_ZONE}",
                zone.channels.len()
            ),
        ));
    }
    let mut el = ElementMut::new(buf);
    el.fill(0);
    el.set_ascii(NAME, NAME_LENGTH, 0xff, &zone.name);
    for (n, channel) in zone.channels.iter().enumerate() {
        let slot = ctx.index_of(location, (*channel).into())?;
        el.set_u16_le(MEMBERS + 2 * n, slot as u16 + 1);
    }
    Ok(())
}

/// Decode the scalar fields (the name) of a zone record.
pub fn decode_zone(buf: &[u8]) -> Zone {
    Zone::new(ElementRef::new(buf).ascii(NAME, NAME_LENGTH, 0xff))
}

/// Resolve the member indices of a zone record and attach them to the
/// zone at `zone_index` of `config`.
pub fn link_zone(
    buf: &[u8],
    location: &str,
    config: &mut Config,
    zone_index: usize,
    ctx: &BinaryContext,
) -> Result<()> {
    let el = ElementRef::new(buf);
    let mut members = Vec::new();
    for n in 0..MEMBERS_PER_ZONE {
        let stored = el.u16_le(MEMBERS + 2 * n);
        if stored == 0 {
            continue;
        }
        let obj = ctx.object_at(
            &format!("{location}, member {n}"),
            ObjKind::Channel,
            stored as usize - 1,
        )?;
        members.push(ChannelRef(obj.index));
    }
    config
        .zones_mut()
        .modify(zone_index, |zone| zone.channels = members)
        .ok_or_else(|| Error::link(location, "zone vanished before link"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluglib_core::{Channel, Frequency};

    #[test]
    fn round_trip_with_members() {
        let mut config = Config::new();
        for i in 0..4 {
            config.channels_mut().add(Channel::fm(
                format!("ch{i}"),
                Frequency::from_mhz(145.500),
                Frequency::from_mhz(145.500),
            ));
        }
        let mut zone = Zone::new("Home");
        zone.channels = vec![ChannelRef(3), ChannelRef(1)];
        let idx = config.zones_mut().add(zone.clone());

        let mut ctx = BinaryContext::new();
        for i in 0..4 {
            ctx.add(ChannelRef(i).into(), i);
        }

        let mut buf = vec![0u8; ZONE_SIZE];
        encode_zone(&mut buf, "zone", &zone, &ctx).unwrap();
        assert_eq!(decode_zone(&buf).name, "Home");
        // Members stored +1.
        let el = ElementRef::new(&buf);
        assert_eq!(el.u16_le(MEMBERS), 4);
        assert_eq!(el.u16_le(MEMBERS + 2), 2);

        link_zone(&buf, "zone", &mut config, idx, &ctx).unwrap();
        assert_eq!(
            config.zones().get(idx).unwrap().channels,
            vec![ChannelRef(3), ChannelRef(1)]
        );
    }

    #[test]
    fn too_many_members_fails() {
        let mut zone = Zone::new("big");
        zone.channels = (0..81).map(ChannelRef).collect();
        let mut buf = vec![0u8; ZONE_SIZE];
        let err = encode_zone(&mut buf, "zone", &zone, &BinaryContext::new()).unwrap_err();
        assert!(err.to_string().contains("81 members"));
    }

    #[test]
    fn link_rejects_unknown_member_index() {
        let mut config = Config::new();
        let idx = config.zones_mut().add(Zone::new("z"));
        let mut buf = vec![0u8; ZONE_SIZE];
        ElementMut::new(&mut buf).set_u16_le(MEMBERS, 42);
        let err = link_zone(&buf, "zone bank, slot 0", &mut config, idx, &BinaryContext::new())
            .unwrap_err();
        assert!(err.to_string().contains("does not refer to a decoded record"));
    }

    #[test]
    fn bank_shape() {
        assert_eq!(ZONE_BANK.size(), 0x20 + 68 * 0xb0);
    }
}
