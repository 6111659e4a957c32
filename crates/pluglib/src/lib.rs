//! # pluglib -- Codeplug Programming for DMR Radios
//!
//! `pluglib` reads, edits, verifies, and binary-encodes *codeplugs*: the
//! complete configuration memory image of a digital-radio transceiver
//! (channels, contacts, zones, scan lists, positioning systems, roaming).
//! It translates between three representations:
//!
//! - the vendor-neutral in-memory [`Config`] tree,
//! - a human-editable YAML document ([`yaml`]), and
//! - vendor-specific fixed-layout binary memory images ([`opengd77`]).
//!
//! ## Quick Start
//!
//! ```
//! use pluglib::{Config, Channel, Frequency};
//! use pluglib::opengd77::OpenGd77Codeplug;
//!
//! let mut config = Config::new();
//! config.channels_mut().add(Channel::fm(
//!     "Simplex",
//!     Frequency::from_mhz(145.500),
//!     Frequency::from_mhz(145.500),
//! ));
//!
//! // Text form.
//! let text = pluglib::yaml::write_string(&config)?;
//! let reread = pluglib::yaml::read_string(&text)?;
//! assert_eq!(reread.channels().len(), 1);
//!
//! // Binary form.
//! let mut plug = OpenGd77Codeplug::new();
//! plug.encode(&config)?;
//! let decoded = plug.decode()?;
//! assert_eq!(decoded.channels().get(0).unwrap().name, "Simplex");
//! # Ok::<(), pluglib::Error>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                  | Purpose                                      |
//! |------------------------|----------------------------------------------|
//! | `pluglib-core`         | Config tree, types, errors, limits, verifier |
//! | `pluglib-image`        | Byte-layout accessors, memory-image model    |
//! | `pluglib-opengd77`     | OpenGD77-family binary codec + callsign DB   |
//! | `pluglib-yaml`         | YAML serializer (label/parse/link)           |
//! | `pluglib-test-harness` | Mock radio memory for tests                  |
//! | **`pluglib`**          | This facade crate -- re-exports everything   |
//!
//! The [`Config`] tree is the hub: the YAML serializer and the binary
//! codecs target it independently, so the two representations agree on
//! semantics even though their encodings share nothing.

pub use pluglib_core::*;

/// Byte-layout element accessors and the segmented memory-image model.
pub mod image {
    pub use pluglib_image::*;
}

/// OpenGD77-family binary codeplug backend.
///
/// Provides [`OpenGd77Codeplug`](opengd77::OpenGd77Codeplug) for the
/// codeplug itself, [`CallsignDb`](opengd77::CallsignDb) for the user
/// database image, and the model's capability table.
pub mod opengd77 {
    pub use pluglib_opengd77::*;
}

/// The YAML text form: label/serialize out, parse/link in.
pub mod yaml {
    pub use pluglib_yaml::*;
}

/// Returns the capability tables of all radio models this build supports.
///
/// The entry point for applications that enumerate supported radios (e.g.
/// a model picker).
pub fn supported_radios() -> Vec<RadioLimits> {
    vec![opengd77::limits()]
}
