//! Positioning systems: APRS beaconing and DMR GPS reporting.

use crate::context::ContactRef;
use crate::types::LatLon;

/// A positioning system referenced by channels.
#[derive(Debug, Clone, PartialEq)]
pub struct PositioningSystem {
    /// Display name.
    pub name: String,
    /// Reporting period in seconds.
    pub period: u32,
    /// APRS or DMR specifics.
    pub kind: PositioningKind,
}

/// The two positioning flavors.
#[derive(Debug, Clone, PartialEq)]
pub enum PositioningKind {
    /// AX.25 APRS beaconing on an FM channel.
    Aprs(AprsSettings),
    /// Position reporting over DMR to a contact.
    DmrGps(GpsSettings),
}

/// Settings of an APRS beacon system.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AprsSettings {
    /// Source SSID appended to the radio's callsign.
    pub source_ssid: u8,
    /// First digipeater path entry.
    pub via1: Option<AprsPath>,
    /// Second digipeater path entry.
    pub via2: Option<AprsPath>,
    /// Symbol icon index.
    pub icon: u8,
    /// Free-text comment appended to each beacon.
    pub comment: String,
    /// Beacon a fixed position instead of the GPS fix.
    pub fixed_position: Option<LatLon>,
    /// Use 1200 baud AFSK (300 baud otherwise).
    pub baud_1200: bool,
}

/// One APRS digipeater path entry (call + SSID).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AprsPath {
    /// Digipeater callsign, e.g. `WIDE1`.
    pub call: String,
    /// SSID, 0..=15.
    pub ssid: u8,
}

impl AprsPath {
    /// Create a path entry.
    pub fn new(call: impl Into<String>, ssid: u8) -> Self {
        AprsPath {
            call: call.into(),
            ssid,
        }
    }
}

/// Settings of a DMR position reporting system.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GpsSettings {
    /// Contact the position reports are sent to.
    pub destination: Option<ContactRef>,
}

impl PositioningSystem {
    /// Create an APRS system with default settings.
    pub fn aprs(name: impl Into<String>, period: u32) -> Self {
        PositioningSystem {
            name: name.into(),
            period,
            kind: PositioningKind::Aprs(AprsSettings::default()),
        }
    }

    /// Create a DMR GPS system with default settings.
    pub fn dmr_gps(name: impl Into<String>, period: u32) -> Self {
        PositioningSystem {
            name: name.into(),
            period,
            kind: PositioningKind::DmrGps(GpsSettings::default()),
        }
    }

    /// Whether this is an APRS system.
    pub fn is_aprs(&self) -> bool {
        matches!(self.kind, PositioningKind::Aprs(_))
    }

    /// The APRS settings, if this is an APRS system.
    pub fn as_aprs(&self) -> Option<&AprsSettings> {
        match &self.kind {
            PositioningKind::Aprs(aprs) => Some(aprs),
            PositioningKind::DmrGps(_) => None,
        }
    }

    /// Mutable APRS settings, if this is an APRS system.
    pub fn as_aprs_mut(&mut self) -> Option<&mut AprsSettings> {
        match &mut self.kind {
            PositioningKind::Aprs(aprs) => Some(aprs),
            PositioningKind::DmrGps(_) => None,
        }
    }

    /// The DMR GPS settings, if this is a DMR GPS system.
    pub fn as_dmr_gps(&self) -> Option<&GpsSettings> {
        match &self.kind {
            PositioningKind::DmrGps(gps) => Some(gps),
            PositioningKind::Aprs(_) => None,
        }
    }

    /// Mutable DMR GPS settings, if this is a DMR GPS system.
    pub fn as_dmr_gps_mut(&mut self) -> Option<&mut GpsSettings> {
        match &mut self.kind {
            PositioningKind::DmrGps(gps) => Some(gps),
            PositioningKind::Aprs(_) => None,
        }
    }
}
