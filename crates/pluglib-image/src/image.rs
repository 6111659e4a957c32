//! The segmented memory-image model.
//!
//! A codeplug occupies sparse ranges of one or more device address spaces.
//! An [`Image`] represents one address space (one *bank* of the transport):
//! a list of non-overlapping [`ImageElement`]s, each a contiguous byte
//! range at a fixed address. Codecs allocate the ranges they need with
//! [`Image::add_element`] and then read and write record memory through
//! [`Image::data`] / [`Image::data_mut`].
//!
//! Accessing an address that no allocated element covers is a programming
//! error in a codec's layout table and panics; the memory map of a device
//! is a compile-time fact.

use bytes::BytesMut;
use pluglib_core::{MemoryTransport, Result};

/// Round `n` up to the next multiple of `block`.
///
/// Device transports write in fixed-size blocks, so every allocation is
/// block-aligned to the device's write granularity.
///
/// # Example
///
/// ```
/// use pluglib_image::align_size;
///
/// assert_eq!(align_size(0, 32), 0);
/// assert_eq!(align_size(1, 32), 32);
/// assert_eq!(align_size(32, 32), 32);
/// assert_eq!(align_size(33, 32), 64);
/// ```
pub fn align_size(n: usize, block: usize) -> usize {
    n.div_ceil(block) * block
}

/// One contiguous, zero-initialized byte range of an image.
#[derive(Debug, Clone)]
pub struct ImageElement {
    address: u32,
    data: BytesMut,
}

impl ImageElement {
    fn new(address: u32, size: usize) -> Self {
        ImageElement {
            address,
            data: BytesMut::zeroed(size),
        }
    }

    /// Start address of this element within its image's address space.
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Size of this element in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the element is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The element's bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The element's bytes, mutable.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn contains(&self, address: u32, len: usize) -> bool {
        address >= self.address && (address as usize + len) <= (self.address as usize + self.len())
    }

    fn overlaps(&self, address: u32, size: usize) -> bool {
        let a0 = self.address as usize;
        let a1 = a0 + self.len();
        let b0 = address as usize;
        let b1 = b0 + size;
        a0 < b1 && b0 < a1
    }
}

/// One device address space: a sparse, ordered set of allocated byte
/// ranges.
#[derive(Debug, Clone)]
pub struct Image {
    name: String,
    bank: u32,
    elements: Vec<ImageElement>,
}

impl Image {
    /// Create an empty image for transport bank `bank`.
    pub fn new(name: impl Into<String>, bank: u32) -> Self {
        Image {
            name: name.into(),
            bank,
            elements: Vec::new(),
        }
    }

    /// Human-readable name of this image (e.g. `"EEPROM"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The transport bank this image maps to.
    pub fn bank(&self) -> u32 {
        self.bank
    }

    /// Allocate (or find) a zero-initialized element of `size` bytes at
    /// `address`.
    ///
    /// Finding means an element with exactly this address and size already
    /// exists; that is a no-op. Any other overlap with an existing element
    /// is a layout-table bug.
    ///
    /// # Panics
    ///
    /// Panics if the requested range overlaps an existing element without
    /// matching it exactly.
    pub fn add_element(&mut self, address: u32, size: usize) {
        if let Some(existing) = self.elements.iter().find(|e| e.overlaps(address, size)) {
            assert!(
                existing.address == address && existing.len() == size,
                "image '{}': element 0x{:06x}+0x{:x} overlaps existing 0x{:06x}+0x{:x}",
                self.name,
                address,
                size,
                existing.address,
                existing.len()
            );
            return;
        }
        let pos = self
            .elements
            .partition_point(|e| e.address < address);
        self.elements.insert(pos, ImageElement::new(address, size));
    }

    /// Whether `len` bytes at `address` are covered by one element.
    pub fn is_allocated(&self, address: u32, len: usize) -> bool {
        self.elements.iter().any(|e| e.contains(address, len))
    }

    /// The `len` bytes at `address`.
    ///
    /// # Panics
    ///
    /// Panics if the range is not covered by a single allocated element.
    pub fn data(&self, address: u32, len: usize) -> &[u8] {
        let el = self
            .elements
            .iter()
            .find(|e| e.contains(address, len))
            .unwrap_or_else(|| {
                panic!(
                    "image '{}': 0x{:06x}+0x{:x} is not covered by any element",
                    self.name, address, len
                )
            });
        let start = (address - el.address) as usize;
        &el.data()[start..start + len]
    }

    /// The `len` bytes at `address`, mutable.
    ///
    /// # Panics
    ///
    /// Panics if the range is not covered by a single allocated element.
    pub fn data_mut(&mut self, address: u32, len: usize) -> &mut [u8] {
        let name = self.name.clone();
        let el = self
            .elements
            .iter_mut()
            .find(|e| e.contains(address, len))
            .unwrap_or_else(|| {
                panic!(
                    "image '{name}': 0x{address:06x}+0x{len:x} is not covered by any element"
                )
            });
        let start = (address - el.address) as usize;
        &mut el.data_mut()[start..start + len]
    }

    /// The allocated elements, in address order.
    pub fn elements(&self) -> &[ImageElement] {
        &self.elements
    }

    /// Total number of allocated bytes.
    pub fn size(&self) -> usize {
        self.elements.iter().map(ImageElement::len).sum()
    }

    /// Write every allocated element to the device.
    pub fn write_to(&self, transport: &mut dyn MemoryTransport) -> Result<()> {
        for el in &self.elements {
            transport.write(self.bank, el.address(), el.data())?;
        }
        Ok(())
    }

    /// Fill every allocated element from the device.
    ///
    /// The caller allocates the ranges it wants to read first; this is how
    /// a codeplug read knows the device's memory map.
    pub fn read_from(&mut self, transport: &mut dyn MemoryTransport) -> Result<()> {
        let bank = self.bank;
        for el in &mut self.elements {
            let address = el.address();
            transport.read(bank, address, el.data_mut())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluglib_core::Error;

    #[test]
    fn align_size_blocks() {
        assert_eq!(align_size(0, 16), 0);
        assert_eq!(align_size(1, 16), 16);
        assert_eq!(align_size(16, 16), 16);
        assert_eq!(align_size(17, 16), 32);
        assert_eq!(align_size(12 + 5 * 12, 32), 96);
    }

    #[test]
    fn add_element_zero_initialized() {
        let mut img = Image::new("EEPROM", 0);
        img.add_element(0x80, 0x40);
        assert!(img.is_allocated(0x80, 0x40));
        assert!(img.data(0x80, 0x40).iter().all(|&b| b == 0));
    }

    #[test]
    fn add_element_twice_is_noop() {
        let mut img = Image::new("EEPROM", 0);
        img.add_element(0x80, 0x40);
        img.data_mut(0x80, 4).copy_from_slice(b"plug");
        img.add_element(0x80, 0x40);
        assert_eq!(img.data(0x80, 4), &b"plug"[..]);
        assert_eq!(img.elements().len(), 1);
    }

    #[test]
    #[should_panic(expected = "overlaps existing")]
    fn overlapping_element_panics() {
        let mut img = Image::new("EEPROM", 0);
        img.add_element(0x80, 0x40);
        img.add_element(0xa0, 0x40);
    }

    #[test]
    fn elements_kept_in_address_order() {
        let mut img = Image::new("EEPROM", 0);
        img.add_element(0x1000, 0x10);
        img.add_element(0x80, 0x10);
        img.add_element(0x800, 0x10);
        let addrs: Vec<u32> = img.elements().iter().map(ImageElement::address).collect();
        assert_eq!(addrs, vec![0x80, 0x800, 0x1000]);
        assert_eq!(img.size(), 0x30);
    }

    #[test]
    fn data_at_interior_offset() {
        let mut img = Image::new("EEPROM", 0);
        img.add_element(0x100, 0x20);
        img.data_mut(0x110, 2).copy_from_slice(&[0xab, 0xcd]);
        assert_eq!(img.data(0x110, 2), &[0xab, 0xcd]);
        assert_eq!(img.data(0x100, 0x20)[0x10], 0xab);
    }

    #[test]
    #[should_panic(expected = "not covered")]
    fn unallocated_data_panics() {
        let img = Image::new("EEPROM", 0);
        let _ = img.data(0x80, 4);
    }

    #[test]
    #[should_panic(expected = "not covered")]
    fn range_spanning_past_element_panics() {
        let mut img = Image::new("EEPROM", 0);
        img.add_element(0x80, 0x10);
        let _ = img.data(0x88, 0x10);
    }

    struct FlatMemory {
        bytes: Vec<u8>,
    }

    impl MemoryTransport for FlatMemory {
        fn read(&mut self, _bank: u32, address: u32, buf: &mut [u8]) -> Result<()> {
            let start = address as usize;
            if start + buf.len() > self.bytes.len() {
                return Err(Error::Transport("read past end of memory".into()));
            }
            buf.copy_from_slice(&self.bytes[start..start + buf.len()]);
            Ok(())
        }

        fn write(&mut self, _bank: u32, address: u32, data: &[u8]) -> Result<()> {
            let start = address as usize;
            if start + data.len() > self.bytes.len() {
                return Err(Error::Transport("write past end of memory".into()));
            }
            self.bytes[start..start + data.len()].copy_from_slice(data);
            Ok(())
        }
    }

    #[test]
    fn write_then_read_round_trip() {
        let mut mem = FlatMemory {
            bytes: vec![0; 0x200],
        };

        let mut img = Image::new("EEPROM", 0);
        img.add_element(0x80, 0x20);
        img.data_mut(0x80, 5).copy_from_slice(b"hello");
        img.write_to(&mut mem).unwrap();

        let mut readback = Image::new("EEPROM", 0);
        readback.add_element(0x80, 0x20);
        readback.read_from(&mut mem).unwrap();
        assert_eq!(readback.data(0x80, 5), &b"hello"[..]);
    }

    #[test]
    fn transport_error_propagates() {
        let mut mem = FlatMemory { bytes: vec![0; 4] };
        let mut img = Image::new("EEPROM", 0);
        img.add_element(0x80, 0x20);
        assert!(img.write_to(&mut mem).is_err());
    }
}
