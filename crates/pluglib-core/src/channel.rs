//! Channels: the polymorphic FM/DMR channel model.
//!
//! A [`Channel`] carries the capability set shared by both modes (name,
//! frequencies, power, timeout, scan membership, positioning) and a
//! [`ChannelMode`] with the mode-specific fields. Codecs dispatch on the
//! mode; fields not meaningful to a mode are simply absent from it, so
//! there is no "CTCSS tone on a DMR channel" state to get wrong.

use crate::context::{
    ContactRef, GroupListRef, PositioningRef, RadioIdRef, RoamingZoneRef, ScanListRef,
};
use crate::types::{Bandwidth, DmrAdmit, FmAdmit, Frequency, Power, SelectiveCall, TimeSlot};

/// A channel of either mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Display name.
    pub name: String,
    /// Receive frequency.
    pub rx_frequency: Frequency,
    /// Transmit frequency.
    pub tx_frequency: Frequency,
    /// Transmit power setting.
    pub power: Power,
    /// Transmit timeout in seconds (0 = off).
    pub timeout: u32,
    /// Receive-only channel (transmit inhibited).
    pub rx_only: bool,
    /// VOX enabled on this channel.
    pub vox: bool,
    /// Scan list this channel belongs to.
    pub scan_list: Option<ScanListRef>,
    /// Positioning (GPS/APRS) system used when transmitting here.
    pub positioning: Option<PositioningRef>,
    /// Mode-specific settings.
    pub mode: ChannelMode,
}

/// Mode-specific channel settings; the closed set of channel variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelMode {
    /// Analog FM.
    Fm(FmChannel),
    /// Digital DMR.
    Dmr(DmrChannel),
}

/// Settings only meaningful on FM channels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FmChannel {
    /// Admit criterion.
    pub admit: FmAdmit,
    /// Squelch level, 0..=10 (0 = open).
    pub squelch: u8,
    /// Channel bandwidth.
    pub bandwidth: Bandwidth,
    /// Subtone required on receive.
    pub rx_tone: Option<SelectiveCall>,
    /// Subtone sent on transmit.
    pub tx_tone: Option<SelectiveCall>,
}

/// Settings only meaningful on DMR channels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DmrChannel {
    /// Admit criterion.
    pub admit: DmrAdmit,
    /// Color code, 0..=15.
    pub color_code: u8,
    /// Time slot.
    pub time_slot: TimeSlot,
    /// RX group list.
    pub group_list: Option<GroupListRef>,
    /// Default transmit contact.
    pub contact: Option<ContactRef>,
    /// Radio ID override (the list default applies when unset).
    pub radio_id: Option<RadioIdRef>,
    /// Roaming zone.
    pub roaming: Option<RoamingZoneRef>,
}

impl Channel {
    /// Create an FM channel with default mode settings.
    pub fn fm(name: impl Into<String>, rx: Frequency, tx: Frequency) -> Self {
        Channel::with_mode(name, rx, tx, ChannelMode::Fm(FmChannel::default()))
    }

    /// Create a DMR channel with default mode settings.
    pub fn dmr(name: impl Into<String>, rx: Frequency, tx: Frequency) -> Self {
        Channel::with_mode(name, rx, tx, ChannelMode::Dmr(DmrChannel::default()))
    }

    /// Create a channel with explicit mode settings.
    pub fn with_mode(
        name: impl Into<String>,
        rx: Frequency,
        tx: Frequency,
        mode: ChannelMode,
    ) -> Self {
        Channel {
            name: name.into(),
            rx_frequency: rx,
            tx_frequency: tx,
            power: Power::default(),
            timeout: 0,
            rx_only: false,
            vox: false,
            scan_list: None,
            positioning: None,
            mode,
        }
    }

    /// Whether this is an FM channel.
    pub fn is_fm(&self) -> bool {
        matches!(self.mode, ChannelMode::Fm(_))
    }

    /// Whether this is a DMR channel.
    pub fn is_dmr(&self) -> bool {
        matches!(self.mode, ChannelMode::Dmr(_))
    }

    /// The FM settings, if this is an FM channel.
    pub fn as_fm(&self) -> Option<&FmChannel> {
        match &self.mode {
            ChannelMode::Fm(fm) => Some(fm),
            ChannelMode::Dmr(_) => None,
        }
    }

    /// Mutable FM settings, if this is an FM channel.
    pub fn as_fm_mut(&mut self) -> Option<&mut FmChannel> {
        match &mut self.mode {
            ChannelMode::Fm(fm) => Some(fm),
            ChannelMode::Dmr(_) => None,
        }
    }

    /// The DMR settings, if this is a DMR channel.
    pub fn as_dmr(&self) -> Option<&DmrChannel> {
        match &self.mode {
            ChannelMode::Dmr(dmr) => Some(dmr),
            ChannelMode::Fm(_) => None,
        }
    }

    /// Mutable DMR settings, if this is a DMR channel.
    pub fn as_dmr_mut(&mut self) -> Option<&mut DmrChannel> {
        match &mut self.mode {
            ChannelMode::Dmr(dmr) => Some(dmr),
            ChannelMode::Fm(_) => None,
        }
    }
}
