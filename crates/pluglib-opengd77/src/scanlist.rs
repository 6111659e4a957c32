//! Scan list record codec.
//!
//! Scan lists (0x58 bytes, 64 per bank):
//!
//! ```text
//! 0x00  name, 16 bytes ASCII, 0xff padded
//! 0x10  priority channel index + 1, 16-bit LE, 0 = none
//! 0x12  reserved, zero
//! 0x14  32 member channel indices + 1, 16-bit LE each
//! 0x54  reserved, zero
//! ```

use pluglib_core::{BinaryContext, ChannelRef, Config, Error, ObjKind, Result, ScanList};
use pluglib_image::{ElementMut, ElementRef};

use crate::bank::BankLayout;

/// Size of one scan list record.
pub const SCAN_LIST_SIZE: usize = 0x58;

/// Scan lists per bank.
pub const SCAN_LISTS_PER_BANK: usize = 64;

/// Members per scan list.
pub const MEMBERS_PER_SCAN_LIST: usize = 32;

/// Shape of the scan list bank.
pub const SCAN_LIST_BANK: BankLayout = BankLayout {
    records_offset: 0x10,
    record_size: SCAN_LIST_SIZE,
    capacity: SCAN_LISTS_PER_BANK,
};

/// Name length limit of a scan list record.
pub const NAME_LENGTH: usize = 16;

const NAME: usize = 0x00;
const PRIORITY: usize = 0x10;
const MEMBERS: usize = 0x14;

/// Encode a scan list, resolving channel references through the binary
/// context.
pub fn encode_scan_list(
    buf: &mut [u8],
    location: &str,
    list: &ScanList,
    ctx: &BinaryContext,
) -> Result<()> {
    if list.channels.len() > MEMBERS_PER_SCAN_LIST {
        return Err(Error::encode(
            location,
            format!(
                "{} members exceed the supported {MEMBERS_PER_SCAN_LIST}",
                list.channels.len()
            ),
        ));
    }
    let mut el = ElementMut::new(buf);
    el.fill(0);
    el.set_ascii(NAME, NAME_LENGTH, 0xff, &list.name);
    let priority = match list.priority {
        Some(r) => ctx.index_of(location, r.into())? as u16 + 1,
        None => 0,
    };
    el.set_u16_le(PRIORITY, priority);
    for (n, channel) in list.channels.iter().enumerate() {
        let slot = ctx.index_of(location, (*channel).into())?;
        el.set_u16_le(MEMBERS + 2 * n, slot as u16 + 1);
    }
    Ok(())
}

/// Decode the scalar fields (the name) of a scan list record.
pub fn decode_scan_list(buf: &[u8]) -> ScanList {
    ScanList::new(ElementRef::new(buf).ascii(NAME, NAME_LENGTH, 0xff))
}

/// Resolve the channel references of a scan list record and attach them
/// to the list at `list_index` of `config`.
pub fn link_scan_list(
    buf: &[u8],
    location: &str,
    config: &mut Config,
    list_index: usize,
    ctx: &BinaryContext,
) -> Result<()> {
    let el = ElementRef::new(buf);
    let priority = match el.u16_le(PRIORITY) {
        0 => None,
        stored => {
            let obj = ctx.object_at(
                &format!("{location}, priority channel"),
                ObjKind::Channel,
                stored as usize - 1,
            )?;
            Some(ChannelRef(obj.index))
        }
    };
    let mut members = Vec::new();
    for n in 0..MEMBERS_PER_SCAN_LIST {
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
        .scan_lists_mut()
        .modify(list_index, |list| {
            list.priority = priority;
            list.channels = members;
        })
        .ok_or_else(|| Error::link(location, "scan list vanished before link"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluglib_core::{Channel, Frequency};

    #[test]
    fn round_trip_with_priority() {
        let mut config = Config::new();
        for i in 0..3 {
            config.channels_mut().add(Channel::fm(
                format!("ch{i}"),
                Frequency::from_mhz(145.500),
                Frequency::from_mhz(145.500),
            ));
        }
        let mut list = ScanList::new("VHF scan");
        list.channels = vec![ChannelRef(0), ChannelRef(2)];
        list.priority = Some(ChannelRef(2));
        let idx = config.scan_lists_mut().add(list.clone());

        let mut ctx = BinaryContext::new();
        for i in 0..3 {
            ctx.add(ChannelRef(i).into(), i);
        }

        let mut buf = vec![0u8; SCAN_LIST_SIZE];
        encode_scan_list(&mut buf, "scan", &list, &ctx).unwrap();
        assert_eq!(decode_scan_list(&buf).name, "VHF scan");

        link_scan_list(&buf, "scan", &mut config, idx, &ctx).unwrap();
        let linked = config.scan_lists().get(idx).unwrap();
        assert_eq!(linked.channels, vec![ChannelRef(0), ChannelRef(2)]);
        assert_eq!(linked.priority, Some(ChannelRef(2)));
    }

    #[test]
    fn no_priority_encodes_zero() {
        let list = ScanList::new("plain");
        let mut buf = vec![0u8; SCAN_LIST_SIZE];
        encode_scan_list(&mut buf, "scan", &list, &BinaryContext::new()).unwrap();
        assert_eq!(ElementRef::new(&buf).u16_le(PRIORITY), 0);
    }

    #[test]
    fn dangling_priority_fails_link() {
        let mut config = Config::new();
        let idx = config.scan_lists_mut().add(ScanList::new("s"));
        let mut buf = vec![0u8; SCAN_LIST_SIZE];
        ElementMut::new(&mut buf).set_u16_le(PRIORITY, 9);
        let err = link_scan_list(
            &buf,
            "scan bank, slot 0",
            &mut config,
            idx,
            &BinaryContext::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("priority channel"));
    }
}
