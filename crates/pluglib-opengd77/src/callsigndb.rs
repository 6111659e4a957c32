//! Callsign database image codec.
//!
//! The radio can hold a lookup database of DMR users so it can display a
//! caller's callsign and name instead of a bare number. The database is
//! its own image, independent of the codeplug:
//!
//! ```text
//! 0x00  magic "ID-V001\0"
//! 0x08  entry count, 32-bit LE
//! 0x0c  entries, 12 bytes each:
//!         0x00  DMR ID, 8-digit BCD
//!         0x04  callsign + name, 8 bytes ASCII, zero padded
//! ```
//!
//! Entries are sorted ascending by ID before encoding (the firmware
//! binary-searches them) and capped at the device maximum of 10920, and
//! further by the caller's selection limit. Allocation is aligned to the
//! 32-byte write-block granularity.

use pluglib_core::{Error, MemoryTransport, Result};
use pluglib_image::{align_size, ElementMut, ElementRef, Image};

/// Maximum number of database entries the device stores.
pub const MAX_ENTRIES: usize = 10920;

/// Write-block granularity of the database flashing protocol.
pub const BLOCK_SIZE: usize = 32;

/// Transport bank of the database image.
pub const CALLSIGN_DB_BANK: u32 = 2;

const MAGIC: &[u8; 8] = b"ID-V001\0";
const HEADER_SIZE: usize = 12;
const ENTRY_SIZE: usize = 12;
const NAME_LENGTH: usize = 8;

/// One user record from the external callsign source database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// DMR ID.
    pub id: u32,
    /// Callsign.
    pub call: String,
    /// Operator name; may be empty.
    pub name: String,
}

impl UserRecord {
    /// Create a user record.
    pub fn new(id: u32, call: impl Into<String>, name: impl Into<String>) -> Self {
        UserRecord {
            id,
            call: call.into(),
            name: name.into(),
        }
    }

    /// The 8-byte display text: the callsign, and the name after it when
    /// it fits.
    fn display_text(&self) -> String {
        if self.name.is_empty() {
            self.call.clone()
        } else {
            format!("{} {}", self.call, self.name)
        }
    }
}

/// The callsign database image of a GD77-family radio.
#[derive(Debug, Clone)]
pub struct CallsignDb {
    image: Image,
}

impl CallsignDb {
    /// Create an empty database image.
    pub fn new() -> Self {
        CallsignDb {
            image: Image::new("callsign database", CALLSIGN_DB_BANK),
        }
    }

    /// The backing image.
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Encode `users` into the database image.
    ///
    /// Takes the first `limit` (and at most [`MAX_ENTRIES`]) records from
    /// `users`, sorts the selection ascending by ID, and writes header
    /// plus entries into one block-aligned element at offset 0. With
    /// nothing to store, the image stays empty.
    pub fn encode(&mut self, users: &[UserRecord], limit: Option<usize>) -> Result<()> {
        let mut n = users.len().min(MAX_ENTRIES);
        if let Some(limit) = limit {
            n = n.min(limit);
        }
        if n == 0 {
            return Ok(());
        }

        let mut selection: Vec<&UserRecord> = users[..n].iter().collect();
        selection.sort_by_key(|u| u.id);

        let size = align_size(HEADER_SIZE + n * ENTRY_SIZE, BLOCK_SIZE);
        self.image.add_element(0, size);
        let data = self.image.data_mut(0, size);

        let mut el = ElementMut::new(data);
        el.fill(0);
        for (i, &b) in MAGIC.iter().enumerate() {
            el.set_u8(i, b);
        }
        el.set_u32_le(8, n as u32);
        for (i, user) in selection.iter().enumerate() {
            let base = HEADER_SIZE + i * ENTRY_SIZE;
            el.set_bcd_be(base, 8, user.id);
            el.set_ascii(base + 4, NAME_LENGTH, 0x00, &user.display_text());
        }
        Ok(())
    }

    /// Decode the database image back into user records.
    ///
    /// The display text is split at the first blank back into callsign
    /// and name.
    pub fn decode(&self) -> Result<Vec<UserRecord>> {
        if !self.image.is_allocated(0, HEADER_SIZE) {
            return Ok(Vec::new());
        }
        let header = ElementRef::new(self.image.data(0, HEADER_SIZE));
        if header.bytes()[..8] != MAGIC[..] {
            return Err(Error::decode(
                "callsign database",
                "bad magic, not an ID-V001 database",
            ));
        }
        let count = header.u32_le(8) as usize;
        if count > MAX_ENTRIES {
            return Err(Error::decode(
                "callsign database",
                format!("entry count {count} exceeds the device maximum {MAX_ENTRIES}"),
            ));
        }
        if !self.image.is_allocated(0, HEADER_SIZE + count * ENTRY_SIZE) {
            return Err(Error::decode(
                "callsign database",
                format!("entry count {count} runs past the end of the image"),
            ));
        }

        let mut users = Vec::with_capacity(count);
        for i in 0..count {
            let base = HEADER_SIZE + i * ENTRY_SIZE;
            let el = ElementRef::new(self.image.data(base as u32, ENTRY_SIZE));
            let text = el.ascii(4, NAME_LENGTH, 0x00);
            let (call, name) = match text.split_once(' ') {
                Some((call, name)) => (call.to_string(), name.to_string()),
                None => (text, String::new()),
            };
            users.push(UserRecord {
                id: el.bcd_be(0, 8),
                call,
                name,
            });
        }
        Ok(users)
    }

    /// Write the database image to the device.
    pub fn write_to(&self, transport: &mut dyn MemoryTransport) -> Result<()> {
        self.image.write_to(transport)
    }
}

impl Default for CallsignDb {
    fn default() -> Self {
        CallsignDb::new()
    }
}
