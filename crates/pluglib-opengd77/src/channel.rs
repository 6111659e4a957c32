//! Channel record codec.
//!
//! Channels are stored in eight banks of 128 slots; each record is 0x38
//! bytes. One record layout serves both modes, with a discriminant byte
//! selecting the FM or DMR interpretation of the mode-specific fields:
//!
//! ```text
//! 0x00  name, 16 bytes ASCII, 0xff padded
//! 0x10  RX frequency, 8-digit BCD, 10 Hz units
//! 0x14  TX frequency, 8-digit BCD, 10 Hz units
//! 0x18  mode: 0 = FM, 1 = DMR
//! 0x19  power code (1..=5)
//! 0x1a  RX subtone, 16-bit selective-call code
//! 0x1c  TX subtone, 16-bit selective-call code
//! 0x1e  flags: bit0 VOX, bit1 RX only, bit7 radio-ID override
//! 0x1f  radio ID index (meaningful with flag bit7)
//! 0x20  scan list index + 1, 0 = none
//! 0x21  group list index + 1, 0 = none          (DMR)
//! 0x22  contact index + 1, 16-bit LE, 0 = none  (DMR)
//! 0x24  color code                              (DMR)
//! 0x25  positioning system index + 1, 0 = none
//! 0x26  roaming zone index + 1, 0 = none        (DMR)
//! 0x27  admit: 0 always, 1 free, 2 tone/color-code
//! 0x28  TX timeout seconds, 16-bit LE, 0 = off
//! 0x2a  squelch level 0..=10                    (FM)
//! 0x2b  flags: bit1 wide bandwidth (FM), bit6 time slot 2 (DMR)
//! 0x2c  reserved, zero
//! ```
//!
//! Fields not meaningful to the record's mode are written as their neutral
//! value (0xffff for subtones, 0 elsewhere) and ignored on read.

use pluglib_core::{
    BinaryContext, Channel, Config, ContactRef, DmrAdmit, Error, FmAdmit, GroupListRef, ObjKind,
    PositioningKind, PositioningRef, RadioIdRef, Result, RoamingZoneRef, ScanListRef, TimeSlot,
};
use pluglib_image::{ElementMut, ElementRef};
use tracing::warn;

use crate::bank::BankLayout;
use crate::codec;

/// Size of one channel record.
pub const CHANNEL_SIZE: usize = 0x38;

/// Channels per bank.
pub const CHANNELS_PER_BANK: usize = 128;

/// Number of channel banks (bank 0 in EEPROM, 1..=7 in flash).
pub const CHANNEL_BANK_COUNT: usize = 8;

/// Total channel capacity of the radio.
pub const MAX_CHANNELS: usize = CHANNELS_PER_BANK * CHANNEL_BANK_COUNT;

/// Shape of one channel bank (0x1c10 bytes).
pub const CHANNEL_BANK: BankLayout = BankLayout {
    records_offset: 0x10,
    record_size: CHANNEL_SIZE,
    capacity: CHANNELS_PER_BANK,
};

mod offset {
    use pluglib_image::BitAddr;

    pub const NAME: usize = 0x00;
    pub const RX_FREQUENCY: usize = 0x10;
    pub const TX_FREQUENCY: usize = 0x14;
    pub const MODE: usize = 0x18;
    pub const POWER: usize = 0x19;
    pub const RX_TONE: usize = 0x1a;
    pub const TX_TONE: usize = 0x1c;
    pub const VOX: BitAddr = BitAddr::new(0x1e, 0);
    pub const RX_ONLY: BitAddr = BitAddr::new(0x1e, 1);
    pub const OVERRIDE_RADIO_ID: BitAddr = BitAddr::new(0x1e, 7);
    pub const RADIO_ID: usize = 0x1f;
    pub const SCAN_LIST: usize = 0x20;
    pub const GROUP_LIST: usize = 0x21;
    pub const CONTACT: usize = 0x22;
    pub const COLOR_CODE: usize = 0x24;
    pub const POSITIONING: usize = 0x25;
    pub const ROAMING: usize = 0x26;
    pub const ADMIT: usize = 0x27;
    pub const TIMEOUT: usize = 0x28;
    pub const SQUELCH: usize = 0x2a;
    pub const BANDWIDTH: BitAddr = BitAddr::new(0x2b, 1);
    pub const TIME_SLOT: BitAddr = BitAddr::new(0x2b, 6);
}

/// Name length limit of a channel record.
pub const NAME_LENGTH: usize = 16;

const MODE_FM: u8 = 0;
const MODE_DMR: u8 = 1;

/// Zero a vacated channel slot.
pub fn clear_channel(buf: &mut [u8]) {
    buf.fill(0);
}

/// Encode `channel` into one record, resolving reference fields through
/// the binary context.
pub fn encode_channel(
    buf: &mut [u8],
    location: &str,
    channel: &Channel,
    config: &Config,
    ctx: &BinaryContext,
) -> Result<()> {
    let mut el = ElementMut::new(buf);
    el.fill(0);
    el.set_ascii(offset::NAME, NAME_LENGTH, 0xff, &channel.name);
    el.set_bcd_be(
        offset::RX_FREQUENCY,
        8,
        codec::frequency_to_code(channel.rx_frequency),
    );
    el.set_bcd_be(
        offset::TX_FREQUENCY,
        8,
        codec::frequency_to_code(channel.tx_frequency),
    );
    el.set_u8(offset::POWER, codec::encode_power(channel.power));
    el.set_bit(offset::VOX, channel.vox);
    el.set_bit(offset::RX_ONLY, channel.rx_only);
    el.set_u16_le(offset::TIMEOUT, channel.timeout.min(u16::MAX as u32) as u16);

    let scan = match channel.scan_list {
        Some(r) => ctx.index_of(location, r.into())? as u8 + 1,
        None => 0,
    };
    el.set_u8(offset::SCAN_LIST, scan);

    // A positioning reference may point at a DMR GPS system, which this
    // layout cannot store; the channel keeps working without it.
    let positioning = match channel.positioning {
        Some(r) => match resolve_positioning(location, r, config, ctx)? {
            Some(slot) => slot as u8 + 1,
            None => 0,
        },
        None => 0,
    };
    el.set_u8(offset::POSITIONING, positioning);

    match &channel.mode {
        pluglib_core::ChannelMode::Fm(fm) => {
            el.set_u8(offset::MODE, MODE_FM);
            el.set_u16_le(offset::RX_TONE, codec::encode_selective_call(fm.rx_tone));
            el.set_u16_le(offset::TX_TONE, codec::encode_selective_call(fm.tx_tone));
            el.set_u8(offset::SQUELCH, fm.squelch.min(10));
            el.set_bit(
                offset::BANDWIDTH,
                fm.bandwidth == pluglib_core::Bandwidth::Wide,
            );
            el.set_u8(
                offset::ADMIT,
                match fm.admit {
                    FmAdmit::Always => 0,
                    FmAdmit::Free => 1,
                    FmAdmit::Tone => 2,
                },
            );
        }
        pluglib_core::ChannelMode::Dmr(dmr) => {
            el.set_u8(offset::MODE, MODE_DMR);
            el.set_u16_le(offset::RX_TONE, codec::SELCALL_NONE);
            el.set_u16_le(offset::TX_TONE, codec::SELCALL_NONE);
            el.set_u8(offset::COLOR_CODE, dmr.color_code.min(15));
            el.set_bit(offset::TIME_SLOT, dmr.time_slot == TimeSlot::Ts2);
            el.set_u8(
                offset::ADMIT,
                match dmr.admit {
                    DmrAdmit::Always => 0,
                    DmrAdmit::Free => 1,
                    DmrAdmit::ColorCode => 2,
                },
            );
            let group_list = match dmr.group_list {
                Some(r) => ctx.index_of(location, r.into())? as u8 + 1,
                None => 0,
            };
            el.set_u8(offset::GROUP_LIST, group_list);
            let contact = match dmr.contact {
                Some(r) => ctx.index_of(location, r.into())? as u16 + 1,
                None => 0,
            };
            el.set_u16_le(offset::CONTACT, contact);
            let roaming = match dmr.roaming {
                Some(r) => ctx.index_of(location, r.into())? as u8 + 1,
                None => 0,
            };
            el.set_u8(offset::ROAMING, roaming);
            if let Some(r) = dmr.radio_id {
                el.set_bit(offset::OVERRIDE_RADIO_ID, true);
                el.set_u8(offset::RADIO_ID, ctx.index_of(location, r.into())? as u8);
            }
        }
    }

    Ok(())
}

fn resolve_positioning(
    location: &str,
    r: PositioningRef,
    config: &Config,
    ctx: &BinaryContext,
) -> Result<Option<usize>> {
    match config.positioning().get(r.index()).map(|sys| &sys.kind) {
        Some(PositioningKind::Aprs(_)) => ctx.index_of(location, r.into()).map(Some),
        Some(PositioningKind::DmrGps(_)) => {
            warn!("{location}: DMR GPS systems are not stored by this radio, dropping reference");
            Ok(None)
        }
        None => Err(Error::encode(location, "dangling positioning reference")),
    }
}

/// Decode the scalar fields of one channel record into a fresh generic
/// channel of the right variant. Reference fields are left unset; the
/// link pass resolves them once all records exist.
pub fn decode_channel(buf: &[u8], location: &str) -> Result<Channel> {
    let el = ElementRef::new(buf);
    let name = el.ascii(offset::NAME, NAME_LENGTH, 0xff);
    let rx = codec::frequency_from_code(el.bcd_be(offset::RX_FREQUENCY, 8));
    let tx = codec::frequency_from_code(el.bcd_be(offset::TX_FREQUENCY, 8));

    let mut channel = match el.u8(offset::MODE) {
        MODE_FM => {
            let mut ch = Channel::fm(name, rx, tx);
            let fm = ch.as_fm_mut().unwrap();
            fm.rx_tone = codec::decode_selective_call(el.u16_le(offset::RX_TONE));
            fm.tx_tone = codec::decode_selective_call(el.u16_le(offset::TX_TONE));
            fm.squelch = el.u8(offset::SQUELCH).min(10);
            fm.bandwidth = if el.bit(offset::BANDWIDTH) {
                pluglib_core::Bandwidth::Wide
            } else {
                pluglib_core::Bandwidth::Narrow
            };
            fm.admit = match el.u8(offset::ADMIT) {
                0 => FmAdmit::Always,
                1 => FmAdmit::Free,
                _ => FmAdmit::Tone,
            };
            ch
        }
        MODE_DMR => {
            let mut ch = Channel::dmr(name, rx, tx);
            let dmr = ch.as_dmr_mut().unwrap();
            dmr.color_code = el.u8(offset::COLOR_CODE).min(15);
            dmr.time_slot = if el.bit(offset::TIME_SLOT) {
                TimeSlot::Ts2
            } else {
                TimeSlot::Ts1
            };
            dmr.admit = match el.u8(offset::ADMIT) {
                0 => DmrAdmit::Always,
                1 => DmrAdmit::Free,
                _ => DmrAdmit::ColorCode,
            };
            ch
        }
        mode => {
            return Err(Error::decode(
                location,
                format!("invalid mode byte 0x{mode:02x}"),
            ))
        }
    };

    channel.power = codec::decode_power(el.u8(offset::POWER));
    channel.timeout = el.u16_le(offset::TIMEOUT) as u32;
    channel.rx_only = el.bit(offset::RX_ONLY);
    channel.vox = el.bit(offset::VOX);
    Ok(channel)
}

/// Resolve the reference fields of a decoded channel record against the
/// now-complete binary context and attach them to the channel at
/// `channel_index` of `config`.
pub fn link_channel(
    buf: &[u8],
    location: &str,
    config: &mut Config,
    channel_index: usize,
    ctx: &BinaryContext,
) -> Result<()> {
    let el = ElementRef::new(buf);

    let scan_list = decode_ref(el.u8(offset::SCAN_LIST) as usize)
        .map(|slot| ctx.object_at(&format!("{location}, scan list"), ObjKind::ScanList, slot))
        .transpose()?
        .map(|obj| ScanListRef(obj.index));

    let positioning = decode_ref(el.u8(offset::POSITIONING) as usize)
        .map(|slot| {
            ctx.object_at(
                &format!("{location}, positioning system"),
                ObjKind::Positioning,
                slot,
            )
        })
        .transpose()?
        .map(|obj| PositioningRef(obj.index));

    let mut group_list = None;
    let mut contact = None;
    let mut roaming = None;
    let mut radio_id = None;
    if el.u8(offset::MODE) == MODE_DMR {
        group_list = decode_ref(el.u8(offset::GROUP_LIST) as usize)
            .map(|slot| {
                ctx.object_at(&format!("{location}, group list"), ObjKind::GroupList, slot)
            })
            .transpose()?
            .map(|obj| GroupListRef(obj.index));
        contact = decode_ref(el.u16_le(offset::CONTACT) as usize)
            .map(|slot| ctx.object_at(&format!("{location}, contact"), ObjKind::Contact, slot))
            .transpose()?
            .map(|obj| ContactRef(obj.index));
        roaming = decode_ref(el.u8(offset::ROAMING) as usize)
            .map(|slot| {
                ctx.object_at(
                    &format!("{location}, roaming zone"),
                    ObjKind::RoamingZone,
                    slot,
                )
            })
            .transpose()?
            .map(|obj| RoamingZoneRef(obj.index));
        if el.bit(offset::OVERRIDE_RADIO_ID) {
            let obj = ctx.object_at(
                &format!("{location}, radio ID"),
                ObjKind::RadioId,
                el.u8(offset::RADIO_ID) as usize,
            )?;
            radio_id = Some(RadioIdRef(obj.index));
        }
    }

    config
        .channels_mut()
        .modify(channel_index, |ch| {
            ch.scan_list = scan_list;
            ch.positioning = positioning;
            if let Some(dmr) = ch.as_dmr_mut() {
                dmr.group_list = group_list;
                dmr.contact = contact;
                dmr.roaming = roaming;
                dmr.radio_id = radio_id;
            }
        })
        .ok_or_else(|| Error::link(location, "channel vanished before link"))?;
    Ok(())
}

/// Decode a `+1`-convention reference field: 0 means unset.
fn decode_ref(stored: usize) -> Option<usize> {
    stored.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluglib_core::{Frequency, ObjRef, Power, SelectiveCall};

    fn ctx_with(entries: &[(ObjRef, usize)]) -> BinaryContext {
        let mut ctx = BinaryContext::new();
        for &(obj, slot) in entries {
            ctx.add(obj, slot);
        }
        ctx
    }

    fn record() -> Vec<u8> {
        vec![0u8; CHANNEL_SIZE]
    }

    #[test]
    fn fm_round_trip() {
        let mut ch = Channel::fm(
            "DB0SP",
            Frequency::from_mhz(145.600),
            Frequency::from_mhz(145.000),
        );
        ch.power = Power::Low;
        ch.timeout = 120;
        ch.vox = true;
        {
            let fm = ch.as_fm_mut().unwrap();
            fm.squelch = 3;
            fm.bandwidth = pluglib_core::Bandwidth::Wide;
            fm.admit = FmAdmit::Tone;
            fm.rx_tone = Some(SelectiveCall::ctcss(67.0));
            fm.tx_tone = Some(SelectiveCall::dcs(-23));
        }

        let config = Config::new();
        let ctx = BinaryContext::new();
        let mut buf = record();
        encode_channel(&mut buf, "ch", &ch, &config, &ctx).unwrap();
        let decoded = decode_channel(&buf, "ch").unwrap();
        assert_eq!(decoded, ch);
    }

    #[test]
    fn dmr_round_trip_scalars() {
        let mut ch = Channel::dmr(
            "DB0LDS TS2",
            Frequency::from_mhz(439.5625),
            Frequency::from_mhz(431.9625),
        );
        ch.rx_only = true;
        {
            let dmr = ch.as_dmr_mut().unwrap();
            dmr.color_code = 7;
            dmr.time_slot = TimeSlot::Ts2;
            dmr.admit = DmrAdmit::ColorCode;
        }

        let config = Config::new();
        let ctx = BinaryContext::new();
        let mut buf = record();
        encode_channel(&mut buf, "ch", &ch, &config, &ctx).unwrap();
        let decoded = decode_channel(&buf, "ch").unwrap();
        assert_eq!(decoded, ch);
    }

    #[test]
    fn dmr_references_encode_plus_one() {
        let mut ch = Channel::dmr(
            "ref",
            Frequency::from_mhz(439.0),
            Frequency::from_mhz(431.4),
        );
        ch.scan_list = Some(ScanListRef(0));
        {
            let dmr = ch.as_dmr_mut().unwrap();
            dmr.group_list = Some(GroupListRef(4));
            dmr.contact = Some(ContactRef(9));
        }

        let config = Config::new();
        let ctx = ctx_with(&[
            (ScanListRef(0).into(), 3),
            (GroupListRef(4).into(), 1),
            (ContactRef(9).into(), 255),
        ]);
        let mut buf = record();
        encode_channel(&mut buf, "ch", &ch, &config, &ctx).unwrap();
        let el = ElementRef::new(&buf);
        assert_eq!(el.u8(offset::SCAN_LIST), 4);
        assert_eq!(el.u8(offset::GROUP_LIST), 2);
        assert_eq!(el.u16_le(offset::CONTACT), 256);
    }

    #[test]
    fn unassigned_reference_is_encode_error() {
        let mut ch = Channel::dmr(
            "ref",
            Frequency::from_mhz(439.0),
            Frequency::from_mhz(431.4),
        );
        ch.as_dmr_mut().unwrap().group_list = Some(GroupListRef(4));

        let config = Config::new();
        let ctx = BinaryContext::new();
        let mut buf = record();
        let err = encode_channel(&mut buf, "channel 'ref'", &ch, &config, &ctx).unwrap_err();
        assert!(matches!(err, Error::Encode { .. }));
        assert!(err.to_string().contains("no binary index"));
    }

    #[test]
    fn invalid_mode_byte_fails_decode() {
        let mut buf = record();
        buf[offset::MODE] = 0x7f;
        let err = decode_channel(&buf, "channel bank 0, slot 5").unwrap_err();
        assert!(err.to_string().contains("invalid mode byte 0x7f"));
        assert!(err.to_string().contains("slot 5"));
    }

    #[test]
    fn link_resolves_references() {
        let mut config = Config::new();
        config.contacts_mut().add(pluglib_core::Contact::dmr(
            "TG9",
            pluglib_core::CallType::Group,
            9,
        ));
        let idx = config.channels_mut().add(Channel::dmr(
            "ch",
            Frequency::from_mhz(439.0),
            Frequency::from_mhz(431.4),
        ));

        // Contact occupies binary slot 0; the record references slot 0 (+1).
        let ctx = ctx_with(&[(ContactRef(0).into(), 0)]);
        let mut buf = record();
        buf[offset::MODE] = MODE_DMR;
        buf[offset::CONTACT] = 1;

        link_channel(&buf, "ch", &mut config, idx, &ctx).unwrap();
        assert_eq!(
            config.channels().get(idx).unwrap().as_dmr().unwrap().contact,
            Some(ContactRef(0))
        );
    }

    #[test]
    fn link_out_of_range_index_fails() {
        let mut config = Config::new();
        let idx = config.channels_mut().add(Channel::dmr(
            "ch",
            Frequency::from_mhz(439.0),
            Frequency::from_mhz(431.4),
        ));

        let ctx = BinaryContext::new();
        let mut buf = record();
        buf[offset::MODE] = MODE_DMR;
        buf[offset::GROUP_LIST] = 5; // refers to slot 4, never decoded

        let err = link_channel(&buf, "channel bank 0, slot 0", &mut config, idx, &ctx)
            .unwrap_err();
        assert!(matches!(err, Error::Link { .. }));
        assert!(err.to_string().contains("group list"));
    }

    #[test]
    fn dmr_neutralizes_fm_fields() {
        let ch = Channel::dmr(
            "d",
            Frequency::from_mhz(439.0),
            Frequency::from_mhz(431.4),
        );
        let config = Config::new();
        let mut buf = record();
        encode_channel(&mut buf, "ch", &ch, &config, &BinaryContext::new()).unwrap();
        let el = ElementRef::new(&buf);
        assert_eq!(el.u16_le(offset::RX_TONE), codec::SELCALL_NONE);
        assert_eq!(el.u16_le(offset::TX_TONE), codec::SELCALL_NONE);
        assert_eq!(el.u8(offset::SQUELCH), 0);
    }

    #[test]
    fn clear_zeroes_record() {
        let mut buf = record();
        buf.fill(0xab);
        clear_channel(&mut buf);
        assert!(buf.iter().all(|&b| b == 0));
    }
}
