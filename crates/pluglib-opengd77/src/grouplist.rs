//! RX group list record codec.
//!
//! Group lists (0x50 bytes, 64 per bank) hold a name and up to 32 contact
//! indices stored with the `+1` convention (0 marks an empty member slot):
//!
//! ```text
//! 0x00  name, 16 bytes ASCII, 0xff padded
//! 0x10  32 member contact indices + 1, 16-bit LE each
//! ```

use pluglib_core::{BinaryContext, Config, ContactRef, Error, GroupList, ObjKind, Result};
use pluglib_image::{ElementMut, ElementRef};

use crate::bank::BankLayout;

/// Size of one group list record.
pub const GROUP_LIST_SIZE: usize = 0x50;

/// Group lists per bank.
pub const GROUP_LISTS_PER_BANK: usize = 64;

/// Members per group list.
pub const MEMBERS_PER_GROUP_LIST: usize = 32;

/// Shape of the group list bank.
pub const GROUP_LIST_BANK: BankLayout = BankLayout {
    records_offset: 0x10,
    record_size: GROUP_LIST_SIZE,
    capacity: GROUP_LISTS_PER_BANK,
};

/// Name length limit of a group list record.
pub const NAME_LENGTH: usize = 16;

const NAME: usize = 0x00;
const MEMBERS: usize = 0x10;

/// Encode a group list, resolving member contacts through the binary
/// context.
pub fn encode_group_list(
    buf: &mut [u8],
    location: &str,
    list: &GroupList,
    ctx: &BinaryContext,
) -> Result<()> {
    if list.contacts.len() > MEMBERS_PER_GROUP_LIST {
        return Err(Error::encode(
            location,
            format!(
                "{} members exceed the supported {MEMBERS_PER_GROUP_LIST}",
                list.contacts.len()
            ),
        ));
    }
    let mut el = ElementMut::new(buf);
    el.fill(0);
    el.set_ascii(NAME, NAME_LENGTH, 0xff, &list.name);
    for (n, contact) in list.contacts.iter().enumerate() {
        let slot = ctx.index_of(location, (*contact).into())?;
        el.set_u16_le(MEMBERS + 2 * n, slot as u16 + 1);
    }
    Ok(())
}

/// Decode the scalar fields (the name) of a group list record.
pub fn decode_group_list(buf: &[u8]) -> GroupList {
    GroupList::new(ElementRef::new(buf).ascii(NAME, NAME_LENGTH, 0xff))
}

/// Resolve the member indices of a group list record and attach them to
/// the list at `list_index` of `config`.
pub fn link_group_list(
    buf: &[u8],
    location: &str,
    config: &mut Config,
    list_index: usize,
    ctx: &BinaryContext,
) -> Result<()> {
    let el = ElementRef::new(buf);
    let mut members = Vec::new();
    for n in 0..MEMBERS_PER_GROUP_LIST {
        let stored = el.u16_le(MEMBERS + 2 * n);
        if stored == 0 {
            continue;
        }
        let obj = ctx.object_at(
            &format!("{location}, member {n}"),
            ObjKind::Contact,
            stored as usize - 1,
        )?;
        members.push(ContactRef(obj.index));
    }
    config
        .group_lists_mut()
        .modify(list_index, |list| list.contacts = members)
        .ok_or_else(|| Error::link(location, "group list vanished before link"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_with_members() {
        let mut config = Config::new();
        for i in 0..3 {
            config.contacts_mut().add(pluglib_core::Contact::dmr(
                format!("TG{i}"),
                pluglib_core::CallType::Group,
                i,
            ));
        }
        let mut list = GroupList::new("Regional");
        list.contacts = vec![ContactRef(2), ContactRef(0)];
        let idx = config.group_lists_mut().add(list.clone());

        let mut ctx = BinaryContext::new();
        for i in 0..3 {
            ctx.add(ContactRef(i).into(), i);
        }

        let mut buf = vec![0u8; GROUP_LIST_SIZE];
        encode_group_list(&mut buf, "gl", &list, &ctx).unwrap();
        assert_eq!(decode_group_list(&buf).name, "Regional");

        link_group_list(&buf, "gl", &mut config, idx, &ctx).unwrap();
        assert_eq!(
            config.group_lists().get(idx).unwrap().contacts,
            vec![ContactRef(2), ContactRef(0)]
        );
    }

    #[test]
    fn too_many_members_fails() {
        let mut list = GroupList::new("big");
        list.contacts = (0..33).map(ContactRef).collect();
        let mut buf = vec![0u8; GROUP_LIST_SIZE];
        let err =
            encode_group_list(&mut buf, "gl", &list, &BinaryContext::new()).unwrap_err();
        assert!(err.to_string().contains("33 members"));
    }

    #[test]
    fn link_rejects_unknown_member_index() {
        let mut config = Config::new();
        let idx = config.group_lists_mut().add(GroupList::new("gl"));
        let mut buf = vec![0u8; GROUP_LIST_SIZE];
        ElementMut::new(&mut buf).set_u16_le(MEMBERS, 8); // slot 7, never decoded
        let err = link_group_list(&buf, "group list bank, slot 0", &mut config, idx,
            &BinaryContext::new())
        .unwrap_err();
        assert!(matches!(err, Error::Link { .. }));
        assert!(err.to_string().contains("member 0"));
    }

    #[test]
    fn empty_member_slots_are_skipped() {
        let mut config = Config::new();
        config.contacts_mut().add(pluglib_core::Contact::dmr(
            "TG9",
            pluglib_core::CallType::Group,
            9,
        ));
        let idx = config.group_lists_mut().add(GroupList::new("gl"));

        let mut ctx = BinaryContext::new();
        ctx.add(ContactRef(0).into(), 0);

        // Member 0 empty, member 5 set.
        let mut buf = vec![0u8; GROUP_LIST_SIZE];
        ElementMut::new(&mut buf).set_u16_le(MEMBERS + 2 * 5, 1);
        link_group_list(&buf, "gl", &mut config, idx, &ctx).unwrap();
        assert_eq!(
            config.group_lists().get(idx).unwrap().contacts,
            vec![ContactRef(0)]
        );
    }
}
