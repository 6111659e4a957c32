//! Roaming zone record codec.
//!
//! Roaming zones (0x90 bytes, 64 per bank) hold a name and up to 64
//! member channel indices stored with the `+1` convention:
//!
//! ```text
//! 0x00  name, 16 bytes ASCII, 0xff padded
//! 0x10  64 member channel indices + 1, 16-bit LE each
//! ```
//!
//! Only DMR channels make sense as members; the verifier flags FM members
//! before encode.

use pluglib_core::{BinaryContext, ChannelRef, Config, Error, ObjKind, Result, RoamingZone};
use pluglib_image::{ElementMut, ElementRef};

use crate::bank::BankLayout;

/// Size of one roaming zone record.
pub const ROAMING_ZONE_SIZE: usize = 0x90;

/// Roaming zones per bank.
pub const ROAMING_ZONES_PER_BANK: usize = 64;

/// Members per roaming zone.
pub const MEMBERS_PER_ROAMING_ZONE: usize = 64;

/// Shape of the roaming zone bank.
pub const ROAMING_ZONE_BANK: BankLayout = BankLayout {
    records_offset: 0x10,
    record_size: ROAMING_ZONE_SIZE,
    capacity: ROAMING_ZONES_PER_BANK,
};

/// Name length limit of a roaming zone record.
pub const NAME_LENGTH: usize = 16;

const NAME: usize = 0x00;
const MEMBERS: usize = 0x10;

/// Encode a roaming zone, resolving member channels through the binary
/// context.
pub fn encode_roaming_zone(
    buf: &mut [u8],
    location: &str,
    zone: &RoamingZone,
    ctx: &BinaryContext,
) -> Result<()> {
    if zone.channels.len() > MEMBERS_PER_ROAMING_ZONE {
        return Err(Error::encode(
            location,
            format!(
                "{} members exceed the supported {MEMBERS_PER_ROAMING_ZONE}",
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

/// Decode the scalar fields (the name) of a roaming zone record.
pub fn decode_roaming_zone(buf: &[u8]) -> RoamingZone {
    RoamingZone::new(ElementRef::new(buf).ascii(NAME, NAME_LENGTH, 0xff))
}

/// Resolve the member indices of a roaming zone record and attach them to
/// the zone at `zone_index` of `config`.
pub fn link_roaming_zone(
    buf: &[u8],
    location: &str,
    config: &mut Config,
    zone_index: usize,
    ctx: &BinaryContext,
) -> Result<()> {
    let el = ElementRef::new(buf);
    let mut members = Vec::new();
    for n in 0..MEMBERS_PER_ROAMING_ZONE {
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
        .roaming_mut()
        .modify(zone_index, |zone| zone.channels = members)
        .ok_or_else(|| Error::link(location, "roaming zone vanished before link"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluglib_core::{Channel, Frequency};

    #[test]
    fn round_trip() {
        let mut config = Config::new();
        for i in 0..2 {
            config.channels_mut().add(Channel::dmr(
                format!("R{i}"),
                Frequency::from_mhz(439.5625),
                Frequency::from_mhz(431.9625),
            ));
        }
        let mut zone = RoamingZone::new("BM 262");
        zone.channels = vec![ChannelRef(1), ChannelRef(0)];
        let idx = config.roaming_mut().add(zone.clone());

        let mut ctx = BinaryContext::new();
        ctx.add(ChannelRef(0).into(), 0);
        ctx.add(ChannelRef(1).into(), 1);

        let mut buf = vec![0u8; ROAMING_ZONE_SIZE];
        encode_roaming_zone(&mut buf, "roam", &zone, &ctx).unwrap();
        assert_eq!(decode_roaming_zone(&buf).name, "BM 262");

        link_roaming_zone(&buf, "roam", &mut config, idx, &ctx).unwrap();
        assert_eq!(
            config.roaming().get(idx).unwrap().channels,
            vec![ChannelRef(1), ChannelRef(0)]
        );
    }

    #[test]
    fn too_many_members_fails() {
        let mut zone = RoamingZone::new("big");
        zone.channels = (0..65).map(ChannelRef).collect();
        let mut buf = vec![0u8; ROAMING_ZONE_SIZE];
        let err =
            encode_roaming_zone(&mut buf, "roam", &zone, &BinaryContext::new()).unwrap_err();
        assert!(err.to_string().contains("65 members"));
    }
}
