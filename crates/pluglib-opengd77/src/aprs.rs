//! APRS system record codec.
//!
//! APRS systems (0x40 bytes, 8 per bank) carry everything an AX.25
//! position beacon needs. DMR GPS positioning systems have no slot in
//! this layout; the codeplug codec skips them (the verifier warns):
//!
//! ```text
//! 0x00  name, 8 bytes ASCII, 0xff padded
//! 0x08  source SSID
//! 0x09  fixed latitude, 32-bit LE angle code
//! 0x0d  fixed longitude, 32-bit LE angle code
//! 0x11  via 1 call, 6 bytes ASCII, zero padded
//! 0x17  via 1 SSID
//! 0x18  via 2 call, 6 bytes ASCII, zero padded
//! 0x1e  via 2 SSID
//! 0x1f  icon index
//! 0x20  comment, 23 bytes ASCII, zero padded
//! 0x37  beacon period seconds, 16-bit LE
//! 0x3d  flags: bit0 1200 baud, bit1 use fixed position
//! ```

use pluglib_core::{
    AprsPath, Error, LatLon, PositioningKind, PositioningSystem, Result,
};
use pluglib_image::{ElementMut, ElementRef};

use crate::bank::BankLayout;
use crate::codec::{decode_angle, encode_angle};

/// Size of one APRS system record.
pub const APRS_SYSTEM_SIZE: usize = 0x40;

/// APRS systems per bank.
pub const APRS_SYSTEMS_PER_BANK: usize = 8;

/// Shape of the APRS system bank.
pub const APRS_BANK: BankLayout = BankLayout {
    records_offset: 0x10,
    record_size: APRS_SYSTEM_SIZE,
    capacity: APRS_SYSTEMS_PER_BANK,
};

/// Name length limit of an APRS system record.
pub const NAME_LENGTH: usize = 8;

/// Comment length limit of an APRS system record.
pub const COMMENT_LENGTH: usize = 23;

const CALL_LENGTH: usize = 6;

mod offset {
    use pluglib_image::BitAddr;

    pub const NAME: usize = 0x00;
    pub const SOURCE_SSID: usize = 0x08;
    pub const LATITUDE: usize = 0x09;
    pub const LONGITUDE: usize = 0x0d;
    pub const VIA1_CALL: usize = 0x11;
    pub const VIA1_SSID: usize = 0x17;
    pub const VIA2_CALL: usize = 0x18;
    pub const VIA2_SSID: usize = 0x1e;
    pub const ICON: usize = 0x1f;
    pub const COMMENT: usize = 0x20;
    pub const PERIOD: usize = 0x37;
    pub const BAUD_1200: BitAddr = BitAddr::new(0x3d, 0);
    pub const USE_FIXED_POSITION: BitAddr = BitAddr::new(0x3d, 1);
}

/// Encode an APRS positioning system. Fails when handed a DMR GPS system;
/// the codeplug codec filters those out beforehand.
pub fn encode_aprs_system(
    buf: &mut [u8],
    location: &str,
    system: &PositioningSystem,
) -> Result<()> {
    let PositioningKind::Aprs(aprs) = &system.kind else {
        return Err(Error::encode(location, "not an APRS system"));
    };
    let mut el = ElementMut::new(buf);
    el.fill(0);
    el.set_ascii(offset::NAME, NAME_LENGTH, 0xff, &system.name);
    el.set_u8(offset::SOURCE_SSID, aprs.source_ssid.min(15));
    if let Some(pos) = aprs.fixed_position {
        el.set_bit(offset::USE_FIXED_POSITION, true);
        el.set_u32_le(offset::LATITUDE, encode_angle(pos.latitude));
        el.set_u32_le(offset::LONGITUDE, encode_angle(pos.longitude));
    }
    if let Some(via) = &aprs.via1 {
        el.set_ascii(offset::VIA1_CALL, CALL_LENGTH, 0x00, &via.call);
        el.set_u8(offset::VIA1_SSID, via.ssid.min(15));
    }
    if let Some(via) = &aprs.via2 {
        el.set_ascii(offset::VIA2_CALL, CALL_LENGTH, 0x00, &via.call);
        el.set_u8(offset::VIA2_SSID, via.ssid.min(15));
    }
    el.set_u8(offset::ICON, aprs.icon);
    el.set_ascii(offset::COMMENT, COMMENT_LENGTH, 0x00, &aprs.comment);
    el.set_u16_le(offset::PERIOD, system.period.min(u16::MAX as u32) as u16);
    el.set_bit(offset::BAUD_1200, aprs.baud_1200);
    Ok(())
}

/// Decode an APRS system record. APRS systems hold no cross-references,
/// so decode is the whole job and there is no link step.
pub fn decode_aprs_system(buf: &[u8]) -> PositioningSystem {
    let el = ElementRef::new(buf);
    let mut system = PositioningSystem::aprs(
        el.ascii(offset::NAME, NAME_LENGTH, 0xff),
        el.u16_le(offset::PERIOD) as u32,
    );
    let aprs = system.as_aprs_mut().unwrap();
    aprs.source_ssid = el.u8(offset::SOURCE_SSID);
    if el.bit(offset::USE_FIXED_POSITION) {
        aprs.fixed_position = Some(LatLon::new(
            decode_angle(el.u32_le(offset::LATITUDE)),
            decode_angle(el.u32_le(offset::LONGITUDE)),
        ));
    }
    let via1 = el.ascii(offset::VIA1_CALL, CALL_LENGTH, 0x00);
    if !via1.is_empty() {
        aprs.via1 = Some(AprsPath::new(via1, el.u8(offset::VIA1_SSID)));
    }
    let via2 = el.ascii(offset::VIA2_CALL, CALL_LENGTH, 0x00);
    if !via2.is_empty() {
        aprs.via2 = Some(AprsPath::new(via2, el.u8(offset::VIA2_SSID)));
    }
    aprs.icon = el.u8(offset::ICON);
    aprs.comment = el.ascii(offset::COMMENT, COMMENT_LENGTH, 0x00);
    aprs.baud_1200 = el.bit(offset::BAUD_1200);
    system
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_full() {
        let mut system = PositioningSystem::aprs("APRS", 300);
        {
            let aprs = system.as_aprs_mut().unwrap();
            aprs.source_ssid = 7;
            aprs.via1 = Some(AprsPath::new("WIDE1", 1));
            aprs.via2 = Some(AprsPath::new("WIDE2", 2));
            aprs.icon = 15;
            aprs.comment = "pluglib beacon".into();
            aprs.fixed_position = Some(LatLon::new(52.5186, 13.4083));
            aprs.baud_1200 = true;
        }
        let mut buf = vec![0u8; APRS_SYSTEM_SIZE];
        encode_aprs_system(&mut buf, "aprs", &system).unwrap();
        let decoded = decode_aprs_system(&buf);
        assert_eq!(decoded.name, "APRS");
        assert_eq!(decoded.period, 300);
        let aprs = decoded.as_aprs().unwrap();
        assert_eq!(aprs.source_ssid, 7);
        assert_eq!(aprs.via1, Some(AprsPath::new("WIDE1", 1)));
        assert_eq!(aprs.via2, Some(AprsPath::new("WIDE2", 2)));
        assert_eq!(aprs.icon, 15);
        assert_eq!(aprs.comment, "pluglib beacon");
        assert!(aprs.baud_1200);
        let pos = aprs.fixed_position.unwrap();
        assert!((pos.latitude - 52.5186).abs() < 1e-4);
        assert!((pos.longitude - 13.4083).abs() < 1e-4);
    }

    #[test]
    fn round_trip_minimal() {
        let system = PositioningSystem::aprs("APRS", 600);
        let mut buf = vec![0u8; APRS_SYSTEM_SIZE];
        encode_aprs_system(&mut buf, "aprs", &system).unwrap();
        let decoded = decode_aprs_system(&buf);
        assert_eq!(decoded, system);
    }

    #[test]
    fn rejects_dmr_gps() {
        let system = PositioningSystem::dmr_gps("BM", 120);
        let mut buf = vec![0u8; APRS_SYSTEM_SIZE];
        assert!(encode_aprs_system(&mut buf, "aprs", &system).is_err());
    }

    #[test]
    fn bank_shape() {
        assert_eq!(APRS_BANK.size(), 0x10 + 8 * 0x40);
    }
}
