//! Reference types and the resolution context.
//!
//! Cross-collection references in the configuration graph are *explicit
//! relation values*: a typed index into a sibling collection (e.g. a
//! channel's group list is a [`GroupListRef`] into the group-list
//! collection). References never embed pointers into the referenced
//! object; resolution always goes through a table.
//!
//! Two tables exist:
//!
//! - [`Context`] maps textual document ids to objects and back. It is
//!   filled by the label pass before serialization and by the parse pass
//!   before linking.
//! - [`BinaryContext`] maps binary slot indices to objects and back. It is
//!   filled while assigning bank slots on encode and while decoding banks.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// The kind of a referenced configuration object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjKind {
    /// A radio (DMR) ID.
    RadioId,
    /// A contact.
    Contact,
    /// An RX group list.
    GroupList,
    /// A channel.
    Channel,
    /// A zone.
    Zone,
    /// A scan list.
    ScanList,
    /// A positioning (GPS/APRS) system.
    Positioning,
    /// A roaming zone.
    RoamingZone,
}

/// An untyped reference: object kind plus position in its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjRef {
    /// Which collection the object lives in.
    pub kind: ObjKind,
    /// Position within that collection.
    pub index: usize,
}

impl ObjRef {
    /// Construct a reference to the object at `index` in the `kind`
    /// collection.
    pub fn new(kind: ObjKind, index: usize) -> Self {
        ObjRef { kind, index }
    }
}

macro_rules! typed_ref {
    ($(#[$doc:meta])* $name:ident, $kind:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub usize);

        impl $name {
            /// Position of the referenced object in its collection.
            pub fn index(&self) -> usize {
                self.0
            }
        }

        impl From<$name> for ObjRef {
            fn from(r: $name) -> ObjRef {
                ObjRef::new(ObjKind::$kind, r.0)
            }
        }
    };
}

typed_ref!(
    /// Reference to a radio ID by position.
    RadioIdRef,
    RadioId
);
typed_ref!(
    /// Reference to a contact by position.
    ContactRef,
    Contact
);
typed_ref!(
    /// Reference to an RX group list by position.
    GroupListRef,
    GroupList
);
typed_ref!(
    /// Reference to a channel by position.
    ChannelRef,
    Channel
);
typed_ref!(
    /// Reference to a zone by position.
    ZoneRef,
    Zone
);
typed_ref!(
    /// Reference to a scan list by position.
    ScanListRef,
    ScanList
);
typed_ref!(
    /// Reference to a positioning system by position.
    PositioningRef,
    Positioning
);
typed_ref!(
    /// Reference to a roaming zone by position.
    RoamingZoneRef,
    RoamingZone
);

/// Bidirectional table between textual document ids and objects.
///
/// Also carries the document format version seen (or assumed) by the
/// parser, since field interpretation may depend on it.
#[derive(Debug, Default)]
pub struct Context {
    version: String,
    by_id: HashMap<String, ObjRef>,
    by_obj: HashMap<ObjRef, String>,
}

impl Context {
    /// Create an empty context with an unset version.
    pub fn new() -> Self {
        Context::default()
    }

    /// The document format version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Set the document format version.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    /// Register `id` for `obj`. Fails if either side is already present,
    /// since document ids must be unique and labeling must be stable.
    pub fn add(&mut self, id: impl Into<String>, obj: ObjRef) -> Result<()> {
        let id = id.into();
        if self.by_id.contains_key(&id) {
            return Err(Error::parse(&id, "duplicate id"));
        }
        if self.by_obj.contains_key(&obj) {
            return Err(Error::parse(&id, "object already labeled"));
        }
        self.by_obj.insert(obj, id.clone());
        self.by_id.insert(id, obj);
        Ok(())
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// The object registered under `id`, if any.
    pub fn get(&self, id: &str) -> Option<ObjRef> {
        self.by_id.get(id).copied()
    }

    /// The object registered under `id`, checked to be of `kind`.
    ///
    /// Returns a link error naming `location` when the id is unknown or
    /// refers to an object of a different kind.
    pub fn resolve(&self, location: &str, id: &str, kind: ObjKind) -> Result<usize> {
        match self.get(id) {
            Some(obj) if obj.kind == kind => Ok(obj.index),
            Some(obj) => Err(Error::link(
                location,
                format!("id '{}' refers to a {:?}, expected {:?}", id, obj.kind, kind),
            )),
            None => Err(Error::link(location, format!("unknown id '{id}'"))),
        }
    }

    /// The id registered for `obj`, if any.
    pub fn id_for(&self, obj: ObjRef) -> Option<&str> {
        self.by_obj.get(&obj).map(String::as_str)
    }
}

/// Bidirectional table between binary slot indices and objects.
///
/// Encode fills it while assigning bank slots (object → slot), then record
/// encoders resolve reference fields through [`BinaryContext::index_of`].
/// Decode fills it while walking banks (slot → object), then the link pass
/// resolves stored indices through [`BinaryContext::object_at`].
#[derive(Debug, Default)]
pub struct BinaryContext {
    by_obj: HashMap<ObjRef, usize>,
    by_slot: HashMap<(ObjKind, usize), ObjRef>,
}

impl BinaryContext {
    /// Create an empty table.
    pub fn new() -> Self {
        BinaryContext::default()
    }

    /// Record that `obj` occupies binary slot `slot` of its kind's bank.
    pub fn add(&mut self, obj: ObjRef, slot: usize) {
        self.by_obj.insert(obj, slot);
        self.by_slot.insert((obj.kind, slot), obj);
    }

    /// The binary slot assigned to `obj`, if any.
    ///
    /// Use [`BinaryContext::index_of`] where a missing assignment is an
    /// error; this accessor is for objects that are legitimately absent
    /// from the binary layout (e.g. dropped by a capability gap).
    pub fn get(&self, obj: ObjRef) -> Option<usize> {
        self.by_obj.get(&obj).copied()
    }

    /// The binary slot assigned to `obj`.
    ///
    /// A missing assignment is an ordering/dependency error: the encode
    /// pass must assign every object of a kind a slot before any record
    /// referencing that kind is encoded.
    pub fn index_of(&self, location: &str, obj: ObjRef) -> Result<usize> {
        self.by_obj.get(&obj).copied().ok_or_else(|| {
            Error::encode(
                location,
                format!("{:?} {} has no binary index assigned", obj.kind, obj.index),
            )
        })
    }

    /// The object decoded from slot `slot` of the `kind` bank.
    ///
    /// Returns a link error naming `location` for an index that no decoded
    /// record occupies.
    pub fn object_at(&self, location: &str, kind: ObjKind, slot: usize) -> Result<ObjRef> {
        self.by_slot.get(&(kind, slot)).copied().ok_or_else(|| {
            Error::link(
                location,
                format!("{kind:?} index {slot} does not refer to a decoded record"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_ref_into_obj_ref() {
        let r: ObjRef = ContactRef(3).into();
        assert_eq!(r, ObjRef::new(ObjKind::Contact, 3));
        assert_eq!(ContactRef(3).index(), 3);
    }

    #[test]
    fn context_add_and_lookup() {
        let mut ctx = Context::new();
        ctx.add("ch1", ChannelRef(0).into()).unwrap();
        assert!(ctx.contains("ch1"));
        assert_eq!(ctx.get("ch1"), Some(ObjRef::new(ObjKind::Channel, 0)));
        assert_eq!(ctx.id_for(ChannelRef(0).into()), Some("ch1"));
    }

    #[test]
    fn context_rejects_duplicate_id() {
        let mut ctx = Context::new();
        ctx.add("ch1", ChannelRef(0).into()).unwrap();
        assert!(ctx.add("ch1", ChannelRef(1).into()).is_err());
    }

    #[test]
    fn context_rejects_relabeling() {
        let mut ctx = Context::new();
        ctx.add("ch1", ChannelRef(0).into()).unwrap();
        assert!(ctx.add("other", ChannelRef(0).into()).is_err());
    }

    #[test]
    fn resolve_checks_kind() {
        let mut ctx = Context::new();
        ctx.add("grp1", GroupListRef(0).into()).unwrap();
        assert_eq!(
            ctx.resolve("x", "grp1", ObjKind::GroupList).unwrap(),
            0
        );
        let err = ctx.resolve("x", "grp1", ObjKind::Contact).unwrap_err();
        assert!(err.to_string().contains("expected Contact"));
    }

    #[test]
    fn resolve_unknown_id() {
        let ctx = Context::new();
        let err = ctx
            .resolve("channels[0].groupList", "grp9", ObjKind::GroupList)
            .unwrap_err();
        assert!(err.to_string().contains("unknown id 'grp9'"));
        assert!(err.to_string().contains("channels[0].groupList"));
    }

    #[test]
    fn binary_context_round_trip() {
        let mut ctx = BinaryContext::new();
        ctx.add(ContactRef(7).into(), 2);
        assert_eq!(ctx.index_of("x", ContactRef(7).into()).unwrap(), 2);
        assert_eq!(
            ctx.object_at("x", ObjKind::Contact, 2).unwrap(),
            ObjRef::new(ObjKind::Contact, 7)
        );
    }

    #[test]
    fn binary_context_missing_assignment() {
        let ctx = BinaryContext::new();
        assert!(ctx.index_of("x", ContactRef(0).into()).is_err());
        assert!(ctx.object_at("x", ObjKind::Contact, 0).is_err());
    }
}
