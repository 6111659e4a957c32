//! Contact record codecs: DMR call targets and DTMF numbers.
//!
//! DMR contacts (0x18 bytes, 256 per bank):
//!
//! ```text
//! 0x00  name, 16 bytes ASCII, 0xff padded
//! 0x10  number, 8-digit BCD
//! 0x14  call type: 0 group, 1 private, 2 all
//! 0x15  ring flag
//! 0x16  reserved, zero
//! ```
//!
//! DTMF contacts (0x20 bytes, 64 per bank) are just a name and the dial
//! string, both 16 bytes. Neither record holds references, so the link
//! pass has nothing to do here.

use pluglib_core::{CallType, Contact, ContactKind, Error, Result};
use pluglib_image::{ElementMut, ElementRef};

use crate::bank::BankLayout;

/// Size of one DMR contact record.
pub const DMR_CONTACT_SIZE: usize = 0x18;

/// DMR contacts per bank.
pub const DMR_CONTACTS_PER_BANK: usize = 256;

/// Shape of the DMR contact bank (0x20 bitmask + records).
pub const DMR_CONTACT_BANK: BankLayout = BankLayout {
    records_offset: 0x20,
    record_size: DMR_CONTACT_SIZE,
    capacity: DMR_CONTACTS_PER_BANK,
};

/// Size of one DTMF contact record.
pub const DTMF_CONTACT_SIZE: usize = 0x20;

/// DTMF contacts per bank.
pub const DTMF_CONTACTS_PER_BANK: usize = 64;

/// Shape of the DTMF contact bank.
pub const DTMF_CONTACT_BANK: BankLayout = BankLayout {
    records_offset: 0x10,
    record_size: DTMF_CONTACT_SIZE,
    capacity: DTMF_CONTACTS_PER_BANK,
};

/// Name length limit of both contact records.
pub const NAME_LENGTH: usize = 16;

/// Number length limit of a DTMF contact record.
pub const DTMF_NUMBER_LENGTH: usize = 16;

mod offset {
    pub const NAME: usize = 0x00;
    pub const NUMBER: usize = 0x10;
    pub const CALL_TYPE: usize = 0x14;
    pub const RING: usize = 0x15;
}

/// Encode a DMR contact. Fails when handed a DTMF contact; the caller
/// routes contacts to the right bank.
pub fn encode_dmr_contact(buf: &mut [u8], location: &str, contact: &Contact) -> Result<()> {
    let ContactKind::Dmr { call_type, number } = &contact.kind else {
        return Err(Error::encode(location, "not a DMR contact"));
    };
    let mut el = ElementMut::new(buf);
    el.fill(0);
    el.set_ascii(offset::NAME, NAME_LENGTH, 0xff, &contact.name);
    el.set_bcd_be(offset::NUMBER, 8, *number);
    el.set_u8(
        offset::CALL_TYPE,
        match call_type {
            CallType::Group => 0,
            CallType::Private => 1,
            CallType::All => 2,
        },
    );
    el.set_u8(offset::RING, contact.ring as u8);
    Ok(())
}

/// Decode a DMR contact record.
pub fn decode_dmr_contact(buf: &[u8], location: &str) -> Result<Contact> {
    let el = ElementRef::new(buf);
    let call_type = match el.u8(offset::CALL_TYPE) {
        0 => CallType::Group,
        1 => CallType::Private,
        2 => CallType::All,
        t => {
            return Err(Error::decode(
                location,
                format!("invalid call type byte 0x{t:02x}"),
            ))
        }
    };
    let mut contact = Contact::dmr(
        el.ascii(offset::NAME, NAME_LENGTH, 0xff),
        call_type,
        el.bcd_be(offset::NUMBER, 8),
    );
    contact.ring = el.u8(offset::RING) != 0;
    Ok(contact)
}

/// Encode a DTMF contact. Fails when handed a DMR contact.
pub fn encode_dtmf_contact(buf: &mut [u8], location: &str, contact: &Contact) -> Result<()> {
    let ContactKind::Dtmf { number } = &contact.kind else {
        return Err(Error::encode(location, "not a DTMF contact"));
    };
    let mut el = ElementMut::new(buf);
    el.fill(0);
    el.set_ascii(offset::NAME, NAME_LENGTH, 0xff, &contact.name);
    el.set_ascii(offset::NUMBER, DTMF_NUMBER_LENGTH, 0xff, number);
    Ok(())
}

/// Decode a DTMF contact record.
pub fn decode_dtmf_contact(buf: &[u8]) -> Contact {
    let el = ElementRef::new(buf);
    Contact::dtmf(
        el.ascii(offset::NAME, NAME_LENGTH, 0xff),
        el.ascii(offset::NUMBER, DTMF_NUMBER_LENGTH, 0xff),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dmr_round_trip() {
        let mut contact = Contact::dmr("Brandmeister", CallType::Group, 262_00);
        contact.ring = true;
        let mut buf = vec![0u8; DMR_CONTACT_SIZE];
        encode_dmr_contact(&mut buf, "c", &contact).unwrap();
        assert_eq!(decode_dmr_contact(&buf, "c").unwrap(), contact);
    }

    #[test]
    fn dmr_call_types() {
        for (ct, byte) in [
            (CallType::Group, 0u8),
            (CallType::Private, 1),
            (CallType::All, 2),
        ] {
            let contact = Contact::dmr("x", ct, 1);
            let mut buf = vec![0u8; DMR_CONTACT_SIZE];
            encode_dmr_contact(&mut buf, "c", &contact).unwrap();
            assert_eq!(buf[offset::CALL_TYPE], byte);
            assert_eq!(decode_dmr_contact(&buf, "c").unwrap(), contact);
        }
    }

    #[test]
    fn dmr_rejects_dtmf() {
        let contact = Contact::dtmf("x", "123");
        let mut buf = vec![0u8; DMR_CONTACT_SIZE];
        assert!(encode_dmr_contact(&mut buf, "c", &contact).is_err());
    }

    #[test]
    fn invalid_call_type_fails_decode() {
        let mut buf = vec![0u8; DMR_CONTACT_SIZE];
        buf[offset::CALL_TYPE] = 9;
        let err = decode_dmr_contact(&buf, "contact bank, slot 3").unwrap_err();
        assert!(err.to_string().contains("invalid call type"));
    }

    #[test]
    fn dtmf_round_trip() {
        let contact = Contact::dtmf("Echolink", "*3551#");
        let mut buf = vec![0u8; DTMF_CONTACT_SIZE];
        encode_dtmf_contact(&mut buf, "c", &contact).unwrap();
        assert_eq!(decode_dtmf_contact(&buf), contact);
    }

    #[test]
    fn dtmf_rejects_dmr() {
        let contact = Contact::dmr("x", CallType::Group, 9);
        let mut buf = vec![0u8; DTMF_CONTACT_SIZE];
        assert!(encode_dtmf_contact(&mut buf, "c", &contact).is_err());
    }

    #[test]
    fn bank_shapes() {
        assert_eq!(DMR_CONTACT_BANK.size(), 0x20 + 256 * 0x18);
        assert_eq!(DTMF_CONTACT_BANK.size(), 0x10 + 64 * 0x20);
    }
}
