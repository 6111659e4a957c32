//! General and boot settings element codecs.
//!
//! Two small singleton elements carry everything that is not a bank:
//!
//! General settings (0x18 bytes) -- the radio identity and the default
//! knobs:
//!
//! ```text
//! 0x00  radio name, 8 bytes ASCII, 0xff padded
//! 0x08  default DMR ID, 8-digit BCD
//! 0x0c  mic level 1..=10
//! 0x0d  default squelch 0..=10
//! 0x0e  VOX sensitivity 0..=10
//! 0x0f  flags: bit0 speech synthesis
//! 0x10  TX timeout seconds, 16-bit LE
//! 0x12  reserved, zero
//! ```
//!
//! Boot settings (0x48 bytes) -- what the radio shows at power-on:
//!
//! ```text
//! 0x00  show text on boot (1) or the boot image (0)
//! 0x01  boot password enabled
//! 0x0c  boot password, 6-digit BCD
//! 0x28  intro line 1, 16 bytes ASCII, 0xff padded
//! 0x38  intro line 2, 16 bytes ASCII, 0xff padded
//! ```
//!
//! The boot password is device-local state with no counterpart in the
//! configuration model; encode leaves it cleared and decode ignores it.

use pluglib_core::{RadioId, RadioSettings};
use pluglib_image::{ElementMut, ElementRef};

/// Size of the general settings element.
pub const GENERAL_SETTINGS_SIZE: usize = 0x18;

/// Size of the boot settings element.
pub const BOOT_SETTINGS_SIZE: usize = 0x48;

/// Radio name length limit.
pub const RADIO_NAME_LENGTH: usize = 8;

/// Intro line length limit.
pub const INTRO_LINE_LENGTH: usize = 16;

mod offset {
    use pluglib_image::BitAddr;

    pub const RADIO_NAME: usize = 0x00;
    pub const DMR_ID: usize = 0x08;
    pub const MIC_LEVEL: usize = 0x0c;
    pub const SQUELCH: usize = 0x0d;
    pub const VOX: usize = 0x0e;
    pub const SPEECH: BitAddr = BitAddr::new(0x0f, 0);
    pub const TOT: usize = 0x10;

    pub const BOOT_TEXT: usize = 0x00;
    pub const LINE1: usize = 0x28;
    pub const LINE2: usize = 0x38;
}

/// Encode the general settings element from the global settings and the
/// default radio ID (if the radio ID list is non-empty).
pub fn encode_general_settings(
    buf: &mut [u8],
    settings: &RadioSettings,
    default_id: Option<&RadioId>,
) {
    let mut el = ElementMut::new(buf);
    el.fill(0);
    match default_id {
        Some(id) => {
            el.set_ascii(offset::RADIO_NAME, RADIO_NAME_LENGTH, 0xff, &id.name);
            el.set_bcd_be(offset::DMR_ID, 8, id.number);
        }
        None => el.set_ascii(offset::RADIO_NAME, RADIO_NAME_LENGTH, 0xff, ""),
    }
    el.set_u8(offset::MIC_LEVEL, settings.mic_level.clamp(1, 10));
    el.set_u8(offset::SQUELCH, settings.squelch.min(10));
    el.set_u8(offset::VOX, settings.vox.min(10));
    el.set_bit(offset::SPEECH, settings.speech);
    el.set_u16_le(offset::TOT, settings.tot.min(u16::MAX as u32) as u16);
}

/// Decode the general settings element.
///
/// Returns the settings (intro lines still empty, they live in the boot
/// element) and the default radio ID, `None` when the stored DMR ID is
/// zero (erased memory).
pub fn decode_general_settings(buf: &[u8]) -> (RadioSettings, Option<RadioId>) {
    let el = ElementRef::new(buf);
    let settings = RadioSettings {
        intro_line1: String::new(),
        intro_line2: String::new(),
        mic_level: el.u8(offset::MIC_LEVEL).clamp(1, 10),
        speech: el.bit(offset::SPEECH),
        squelch: el.u8(offset::SQUELCH).min(10),
        vox: el.u8(offset::VOX).min(10),
        tot: el.u16_le(offset::TOT) as u32,
    };
    let number = el.bcd_be(offset::DMR_ID, 8);
    let id = (number != 0).then(|| {
        RadioId::new(
            el.ascii(offset::RADIO_NAME, RADIO_NAME_LENGTH, 0xff),
            number,
        )
    });
    (settings, id)
}

/// Encode the boot settings element from the global settings.
pub fn encode_boot_settings(buf: &mut [u8], settings: &RadioSettings) {
    let mut el = ElementMut::new(buf);
    el.fill(0);
    let show_text = !settings.intro_line1.is_empty() || !settings.intro_line2.is_empty();
    el.set_u8(offset::BOOT_TEXT, show_text as u8);
    el.set_ascii(offset::LINE1, INTRO_LINE_LENGTH, 0xff, &settings.intro_line1);
    el.set_ascii(offset::LINE2, INTRO_LINE_LENGTH, 0xff, &settings.intro_line2);
}

/// Decode the boot settings element into the two intro lines.
pub fn decode_boot_settings(buf: &[u8]) -> (String, String) {
    let el = ElementRef::new(buf);
    (
        el.ascii(offset::LINE1, INTRO_LINE_LENGTH, 0xff),
        el.ascii(offset::LINE2, INTRO_LINE_LENGTH, 0xff),
    )
}
