//! Field-level codecs specific to the OpenGD77 memory layout.
//!
//! These are the numeric encodings the record codecs share: fixed-point
//! angles for stored positions, the 16-bit selective-call (subtone) code,
//! BCD-packed frequencies, the power-level code, and the presence bitmasks
//! that gate bank slots. Each encoding has an exact inverse; round-trip
//! fidelity within the encoding resolution is what the whole binary layer
//! is judged by.

use pluglib_core::{Frequency, Power, SelectiveCall};

/// Sentinel for "no subtone set".
pub const SELCALL_NONE: u16 = 0xffff;

/// Encode an angle (latitude or longitude) in degrees.
///
/// The layout stores angles as a 24-bit fixed-point code: bit 23 is the
/// sign, bits 15..=22 the integer degrees, and the low 15 bits the decimal
/// fraction in units of 10^-4 degrees.
pub fn encode_angle(degrees: f64) -> u32 {
    let sign: u32 = if degrees < 0.0 { 1 } else { 0 };
    let decimals = (degrees.abs() * 1e4).round() as u32;
    let (deg, frac) = (decimals / 10_000, decimals % 10_000);
    (sign << 23) | (deg << 15) | frac
}

/// Decode an angle code produced by [`encode_angle`].
pub fn decode_angle(code: u32) -> f64 {
    let sign = if (code >> 23) & 1 != 0 { -1.0 } else { 1.0 };
    let deg = ((code >> 15) & 0xff) as f64;
    let frac = (code & 0x7fff) as f64;
    sign * (deg + frac / 1e4)
}

/// Encode a subtone as the 16-bit selective-call code.
///
/// `0xffff` means unset. DCS codes set bit 15, with bit 14 carrying the
/// inverted flag and the low bits the code number. Anything else is a
/// CTCSS frequency in tenths of a hertz.
pub fn encode_selective_call(call: Option<SelectiveCall>) -> u16 {
    match call {
        None => SELCALL_NONE,
        Some(SelectiveCall::Ctcss { deci_hz }) => deci_hz,
        Some(SelectiveCall::Dcs { code, inverted }) => {
            0x8000 | if inverted { 0x4000 } else { 0 } | (code & 0x3fff)
        }
    }
}

/// Decode a 16-bit selective-call code.
///
/// Classifies the code range: the `0xffff` sentinel and the all-zero
/// pattern of erased memory decode as unset.
pub fn decode_selective_call(code: u16) -> Option<SelectiveCall> {
    if code == SELCALL_NONE || code == 0 {
        None
    } else if code & 0x8000 != 0 {
        Some(SelectiveCall::Dcs {
            code: code & 0x3fff,
            inverted: code & 0x4000 != 0,
        })
    } else {
        Some(SelectiveCall::Ctcss { deci_hz: code })
    }
}

/// Encode a frequency as the BCD field value: units of 10 Hz, eight
/// decimal digits.
pub fn frequency_to_code(freq: Frequency) -> u32 {
    (freq.hz() / 10) as u32
}

/// Decode the BCD field value back into a frequency.
pub fn frequency_from_code(code: u32) -> Frequency {
    Frequency::from_hz(code as u64 * 10)
}

/// Encode a power setting as the channel's power byte (0 selects the
/// radio-wide default; this codec always writes an explicit level).
pub fn encode_power(power: Power) -> u8 {
    match power {
        Power::Min => 1,
        Power::Low => 2,
        Power::Mid => 3,
        Power::High => 4,
        Power::Max => 5,
    }
}

/// Decode the channel power byte; out-of-range codes and the "global"
/// marker 0 fall back to [`Power::High`].
pub fn decode_power(code: u8) -> Power {
    match code {
        1 => Power::Min,
        2 => Power::Low,
        3 => Power::Mid,
        4 => Power::High,
        5 => Power::Max,
        _ => Power::High,
    }
}

/// Whether slot `index` of a presence bitmask is set.
pub fn bitmask_get(mask: &[u8], index: usize) -> bool {
    mask[index / 8] & (1 << (index % 8)) != 0
}

/// Set or clear slot `index` of a presence bitmask.
pub fn bitmask_set(mask: &mut [u8], index: usize, set: bool) {
    if set {
        mask[index / 8] |= 1 << (index % 8);
    } else {
        mask[index / 8] &= !(1 << (index % 8));
    }
}
