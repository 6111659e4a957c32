//! pluglib-opengd77: binary codeplug codec for the OpenGD77 firmware
//! family.
//!
//! This crate maps the generic configuration model of `pluglib-core` onto
//! the fixed memory layout of radios running the OpenGD77 community
//! firmware (GD-77 and friends): densely packed records in bitmask-gated
//! banks across an EEPROM and a flash image, plus the standalone callsign
//! database image.
//!
//! # Layers
//!
//! - [`codec`] -- the field-level encodings (angles, subtone codes, BCD
//!   frequencies, bitmasks)
//! - [`bank`] -- the bank shape tables
//! - per-record modules ([`channel`], [`zone`], [`contact`], ...) --
//!   `encode`/`decode`/`link` against the generic model
//! - [`codeplug`] -- the full memory map and whole-image codec
//! - [`callsigndb`] -- the user database image
//! - [`limits`] -- the static capability table and band-code lookup
//!
//! Decode is always two-phase: every record's scalar fields are decoded
//! across all banks before any reference is linked, so cross-references
//! between banks resolve regardless of storage order.

pub mod aprs;
pub mod bank;
pub mod callsigndb;
pub mod channel;
pub mod codec;
pub mod codeplug;
pub mod contact;
pub mod grouplist;
pub mod limits;
pub mod roamingzone;
pub mod scanlist;
pub mod settings;
pub mod zone;

pub use callsigndb::{CallsignDb, UserRecord};
pub use codeplug::OpenGd77Codeplug;
pub use limits::{limits, limits_for_band_code, tx_bands, verify};
