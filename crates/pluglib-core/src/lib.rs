//! pluglib-core: the vendor-neutral codeplug configuration model.
//!
//! This crate defines the generic abstractions every pluglib backend works
//! against: the configuration tree, its value types, change notification,
//! reference resolution contexts, per-model capability tables, and the
//! error type. Device codec crates (e.g. `pluglib-opengd77`) and the text
//! serializer (`pluglib-yaml`) both target this model, which is what keeps
//! the two representations in agreement.
//!
//! # Key types
//!
//! - [`Config`] -- the configuration tree root
//! - [`Channel`], [`Contact`], [`Zone`], ... -- the owned entities
//! - [`Context`] / [`BinaryContext`] -- id and index resolution tables
//! - [`RadioLimits`] / [`verify_config`] -- per-model capability checking
//! - [`Error`] / [`Result`] -- error handling

pub mod channel;
pub mod config;
pub mod contact;
pub mod context;
pub mod error;
pub mod events;
pub mod extension;
pub mod grouplist;
pub mod list;
pub mod positioning;
pub mod radioid;
pub mod roaming;
pub mod scanlist;
pub mod settings;
pub mod transport;
pub mod types;
pub mod verify;
pub mod zone;

// Re-export key types at crate root for ergonomic `use pluglib_core::*`.
pub use channel::{Channel, ChannelMode, DmrChannel, FmChannel};
pub use config::Config;
pub use contact::{Contact, ContactKind};
pub use context::{
    BinaryContext, ChannelRef, ContactRef, Context, GroupListRef, ObjKind, ObjRef,
    PositioningRef, RadioIdRef, RoamingZoneRef, ScanListRef, ZoneRef,
};
pub use error::{Error, Result};
pub use events::{Collection, ConfigEvent, EventLog};
pub use extension::{ButtonAction, ConfigExtension, TytExtension};
pub use grouplist::GroupList;
pub use list::ObjectList;
pub use positioning::{AprsPath, AprsSettings, GpsSettings, PositioningKind, PositioningSystem};
pub use radioid::{RadioId, RadioIdList};
pub use roaming::RoamingZone;
pub use scanlist::ScanList;
pub use settings::RadioSettings;
pub use transport::MemoryTransport;
pub use types::{
    Bandwidth, CallType, DmrAdmit, FmAdmit, Frequency, LatLon, ParseEnumError, Power,
    SelectiveCall, TimeSlot,
};
pub use verify::{
    max_severity, verify_config, verify_firmware_version, FrequencyRange, RadioLimits, Severity,
    VerifyIssue,
};
pub use zone::Zone;
