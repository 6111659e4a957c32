//! pluglib-image: byte-layout accessors and the segmented memory-image
//! model.
//!
//! Binary codeplug codecs are built from two layers that live here:
//!
//! - [`element`] -- typed field accessors ([`ElementRef`] / [`ElementMut`])
//!   over one record's bytes: integers, bit-fields, BCD numbers, padded
//!   strings.
//! - [`image`] -- the sparse, segmented [`Image`] of a whole device
//!   address space, moved across a
//!   [`MemoryTransport`](pluglib_core::MemoryTransport) as block-aligned
//!   elements.
//!
//! Device crates (e.g. `pluglib-opengd77`) compose these into per-record
//! codecs and full codeplug encode/decode.

pub mod element;
pub mod image;

pub use element::{BitAddr, ElementMut, ElementRef};
pub use image::{align_size, Image, ImageElement};
