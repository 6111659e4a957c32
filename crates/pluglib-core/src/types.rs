//! Core value types shared by the configuration model and the codecs.
//!
//! These types form the vendor-neutral vocabulary of a codeplug: channel
//! frequencies, power levels, DMR time slots, and analog selective-call
//! (subtone) codes. The binary codecs and the text serializer both target
//! these types, so their semantics must not depend on either representation.

use std::fmt;
use std::str::FromStr;

/// Error returned when a string cannot be parsed into one of the
/// enumeration types in this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    what: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(what: &'static str, value: &str) -> Self {
        ParseEnumError {
            what,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: '{}'", self.what, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

/// A channel frequency stored with 1 Hz resolution.
///
/// The binary layouts store frequencies as BCD in units of 10 Hz and the
/// text form uses MHz floats, so `Frequency` keeps the exact hertz value
/// and converts at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Frequency(u64);

impl Frequency {
    /// Create a frequency from a value in hertz.
    pub const fn from_hz(hz: u64) -> Self {
        Frequency(hz)
    }

    /// Create a frequency from a value in MHz.
    ///
    /// Rounds to the nearest hertz; text documents carry at most 5
    /// fractional MHz digits (10 Hz), so this is lossless in practice.
    pub fn from_mhz(mhz: f64) -> Self {
        Frequency((mhz * 1e6).round() as u64)
    }

    /// The frequency in hertz.
    pub fn hz(&self) -> u64 {
        self.0
    }

    /// The frequency in MHz.
    pub fn mhz(&self) -> f64 {
        self.0 as f64 / 1e6
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} MHz", self.mhz())
    }
}

/// Transmit power setting of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Power {
    /// Lowest possible power setting.
    Min,
    /// Low power.
    Low,
    /// Medium power.
    Mid,
    /// High power.
    #[default]
    High,
    /// Maximum power setting.
    Max,
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Power::Min => "Min",
            Power::Low => "Low",
            Power::Mid => "Mid",
            Power::High => "High",
            Power::Max => "Max",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Power {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "min" => Ok(Power::Min),
            "low" => Ok(Power::Low),
            "mid" => Ok(Power::Mid),
            "high" => Ok(Power::High),
            "max" => Ok(Power::Max),
            _ => Err(ParseEnumError::new("power setting", s)),
        }
    }
}

/// DMR time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeSlot {
    /// Time slot 1.
    #[default]
    Ts1,
    /// Time slot 2.
    Ts2,
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSlot::Ts1 => write!(f, "TS1"),
            TimeSlot::Ts2 => write!(f, "TS2"),
        }
    }
}

impl FromStr for TimeSlot {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TS1" | "1" => Ok(TimeSlot::Ts1),
            "TS2" | "2" => Ok(TimeSlot::Ts2),
            _ => Err(ParseEnumError::new("time slot", s)),
        }
    }
}

/// FM channel bandwidth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bandwidth {
    /// 12.5 kHz channel spacing.
    #[default]
    Narrow,
    /// 25 kHz channel spacing.
    Wide,
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bandwidth::Narrow => write!(f, "Narrow"),
            Bandwidth::Wide => write!(f, "Wide"),
        }
    }
}

impl FromStr for Bandwidth {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "narrow" => Ok(Bandwidth::Narrow),
            "wide" => Ok(Bandwidth::Wide),
            _ => Err(ParseEnumError::new("bandwidth", s)),
        }
    }
}

/// Admit criterion for FM channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FmAdmit {
    /// Transmit regardless of channel state.
    #[default]
    Always,
    /// Transmit only when the channel is free.
    Free,
    /// Transmit only when the matching subtone is received.
    Tone,
}

impl fmt::Display for FmAdmit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FmAdmit::Always => "Always",
            FmAdmit::Free => "Free",
            FmAdmit::Tone => "Tone",
        };
        write!(f, "{s}")
    }
}

impl FromStr for FmAdmit {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(FmAdmit::Always),
            "free" => Ok(FmAdmit::Free),
            "tone" => Ok(FmAdmit::Tone),
            _ => Err(ParseEnumError::new("FM admit criterion", s)),
        }
    }
}

/// Admit criterion for DMR channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DmrAdmit {
    /// Transmit regardless of channel state.
    #[default]
    Always,
    /// Transmit only when the channel is free.
    Free,
    /// Transmit only when the received color code matches.
    ColorCode,
}

impl fmt::Display for DmrAdmit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DmrAdmit::Always => "Always",
            DmrAdmit::Free => "Free",
            DmrAdmit::ColorCode => "ColorCode",
        };
        write!(f, "{s}")
    }
}

impl FromStr for DmrAdmit {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(DmrAdmit::Always),
            "free" => Ok(DmrAdmit::Free),
            "colorcode" => Ok(DmrAdmit::ColorCode),
            _ => Err(ParseEnumError::new("DMR admit criterion", s)),
        }
    }
}

/// DMR call type of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CallType {
    /// Group call to a talk group.
    #[default]
    Group,
    /// Private call to a single subscriber.
    Private,
    /// All call.
    All,
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CallType::Group => "GroupCall",
            CallType::Private => "PrivateCall",
            CallType::All => "AllCall",
        };
        write!(f, "{s}")
    }
}

impl FromStr for CallType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groupcall" => Ok(CallType::Group),
            "privatecall" => Ok(CallType::Private),
            "allcall" => Ok(CallType::All),
            _ => Err(ParseEnumError::new("call type", s)),
        }
    }
}

/// An analog selective call: a CTCSS subtone or a DCS code.
///
/// CTCSS frequencies are kept in tenths of a hertz so that the 16-bit
/// binary encoding and the text form round-trip exactly (67.0 Hz is
/// `Ctcss { deci_hz: 670 }`). DCS codes are the conventional octal code
/// numbers (e.g. 023) stored as their numeric value, with an inversion
/// flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectiveCall {
    /// Continuous tone-coded squelch.
    Ctcss {
        /// Tone frequency in tenths of a hertz (67.0 Hz = 670).
        deci_hz: u16,
    },
    /// Digital-coded squelch.
    Dcs {
        /// Octal code number interpreted as a plain integer (023 = 23).
        code: u16,
        /// Inverted polarity.
        inverted: bool,
    },
}

impl SelectiveCall {
    /// Create a CTCSS subtone from a frequency in hertz.
    pub fn ctcss(hz: f64) -> Self {
        SelectiveCall::Ctcss {
            deci_hz: (hz * 10.0).round() as u16,
        }
    }

    /// Create a DCS code; negative values select inverted polarity, the
    /// convention used by the text form.
    pub fn dcs(code: i32) -> Self {
        SelectiveCall::Dcs {
            code: code.unsigned_abs() as u16,
            inverted: code < 0,
        }
    }

    /// The CTCSS frequency in hertz, if this is a CTCSS tone.
    pub fn ctcss_hz(&self) -> Option<f64> {
        match self {
            SelectiveCall::Ctcss { deci_hz } => Some(*deci_hz as f64 / 10.0),
            SelectiveCall::Dcs { .. } => None,
        }
    }
}

impl fmt::Display for SelectiveCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectiveCall::Ctcss { deci_hz } => {
                write!(f, "CTCSS {}.{} Hz", deci_hz / 10, deci_hz % 10)
            }
            SelectiveCall::Dcs { code, inverted } => {
                write!(f, "DCS {}{:03}", if *inverted { "-" } else { "" }, code)
            }
        }
    }
}

/// A WGS84 position, used for fixed-location channels and APRS beacons.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatLon {
    /// Latitude in degrees, north positive.
    pub latitude: f64,
    /// Longitude in degrees, east positive.
    pub longitude: f64,
}

impl LatLon {
    /// Create a position from latitude/longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        LatLon {
            latitude,
            longitude,
        }
    }
}
