//! Transport trait for device memory access.
//!
//! The [`MemoryTransport`] trait abstracts over the physical link to a
//! radio's configuration memory. Real implementations wrap a USB or serial
//! programming interface; tests use the mock from the
//! `pluglib-test-harness` crate.
//!
//! The codec layer never talks to a transport directly: it encodes into and
//! decodes from memory images, and the image layer moves whole images
//! across this trait. All calls are synchronous and blocking; the codec
//! model has no suspension points.

use crate::error::Result;

/// Synchronous byte-level access to a radio's memory.
///
/// Memory is addressed as `(bank, address)`: radios of this family expose
/// more than one address space (e.g. EEPROM and SPI flash), and each image
/// of a codeplug targets one of them.
pub trait MemoryTransport {
    /// Read `buf.len()` bytes starting at `address` of `bank`.
    fn read(&mut self, bank: u32, address: u32, buf: &mut [u8]) -> Result<()>;

    /// Write `data` starting at `address` of `bank`.
    ///
    /// Implementations must respect the device's write-block granularity;
    /// callers guarantee block-aligned ranges (see
    /// `pluglib_image::align_size`).
    fn write(&mut self, bank: u32, address: u32, data: &[u8]) -> Result<()>;
}
