//! Model capability table and hardware band-code lookup.
//!
//! [`limits`] is the static table [`verify_config`] checks configurations
//! against. [`tx_bands`] maps the band-configuration byte the radio
//! reports during identification to its transmit frequency ranges; the
//! codes encode factory variants and are carried here as an opaque table,
//! not derived.

use pluglib_core::{
    verify_config, verify_firmware_version, Config, FrequencyRange, RadioLimits, VerifyIssue,
};
use tracing::info;

use crate::aprs::APRS_SYSTEMS_PER_BANK;
use crate::channel::MAX_CHANNELS;
use crate::contact::{DMR_CONTACTS_PER_BANK, DTMF_CONTACTS_PER_BANK};
use crate::grouplist::{GROUP_LISTS_PER_BANK, MEMBERS_PER_GROUP_LIST};
use crate::roamingzone::{MEMBERS_PER_ROAMING_ZONE, ROAMING_ZONES_PER_BANK};
use crate::scanlist::{MEMBERS_PER_SCAN_LIST, SCAN_LISTS_PER_BANK};
use crate::zone::{MEMBERS_PER_ZONE, ZONES_PER_BANK};

/// Firmware version this codec was written against.
pub const SUPPORTED_FIRMWARE: &str = "V100";

/// The capability and limit table of the OpenGD77 family.
pub fn limits() -> RadioLimits {
    RadioLimits {
        model_name: "OpenGD77",
        supported_firmware: SUPPORTED_FIRMWARE,
        has_dmr: true,
        has_fm: true,
        frequency_ranges: default_bands(),
        max_radio_ids: 1,
        max_name_length: 16,
        max_intro_line_length: 16,
        max_channels: MAX_CHANNELS,
        max_zones: ZONES_PER_BANK,
        max_channels_in_zone: MEMBERS_PER_ZONE,
        has_scan_lists: true,
        max_scan_lists: SCAN_LISTS_PER_BANK,
        max_channels_in_scan_list: MEMBERS_PER_SCAN_LIST,
        max_contacts: DMR_CONTACTS_PER_BANK,
        max_dtmf_contacts: DTMF_CONTACTS_PER_BANK,
        max_group_lists: GROUP_LISTS_PER_BANK,
        max_contacts_in_group_list: MEMBERS_PER_GROUP_LIST,
        has_dmr_gps: false,
        has_aprs: true,
        max_positioning_systems: APRS_SYSTEMS_PER_BANK,
        has_roaming: true,
        max_roaming_zones: ROAMING_ZONES_PER_BANK,
        max_channels_in_roaming_zone: MEMBERS_PER_ROAMING_ZONE,
        has_callsign_db: true,
        max_callsign_db_entries: crate::callsigndb::MAX_ENTRIES,
    }
}

fn default_bands() -> Vec<FrequencyRange> {
    vec![FrequencyRange::mhz(136, 174), FrequencyRange::mhz(400, 480)]
}

/// Transmit frequency ranges for a reported band-configuration code.
///
/// Unknown codes fall back to the default 136-174/400-480 MHz coverage
/// with a log line, matching the radio's own behavior.
pub fn tx_bands(code: u8) -> Vec<FrequencyRange> {
    match code {
        0x00 | 0x01 | 0x04 => vec![FrequencyRange::mhz(136, 174), FrequencyRange::mhz(400, 480)],
        0x02 => vec![FrequencyRange::mhz(136, 174), FrequencyRange::mhz(430, 440)],
        0x03 | 0x05 => vec![FrequencyRange::mhz(144, 146), FrequencyRange::mhz(430, 440)],
        0x06 => vec![FrequencyRange::mhz(136, 174), FrequencyRange::mhz(446, 447)],
        0x07 => vec![FrequencyRange::mhz(144, 148), FrequencyRange::mhz(420, 450)],
        0x08 => vec![FrequencyRange::mhz(136, 174), FrequencyRange::mhz(400, 470)],
        0x09 => vec![FrequencyRange::mhz(144, 146), FrequencyRange::mhz(430, 432)],
        0x0a => vec![FrequencyRange::mhz(144, 148), FrequencyRange::mhz(430, 450)],
        0x0b => vec![FrequencyRange::mhz(136, 174), FrequencyRange::mhz(400, 520)],
        0x0c => vec![FrequencyRange::mhz(136, 174), FrequencyRange::mhz(400, 490)],
        0x0d => vec![FrequencyRange::mhz(136, 174), FrequencyRange::mhz(403, 470)],
        0x0e => vec![
            FrequencyRange::mhz(136, 174),
            FrequencyRange::mhz(220, 225),
            FrequencyRange::mhz(400, 520),
        ],
        0x0f => vec![FrequencyRange::mhz(144, 148), FrequencyRange::mhz(400, 520)],
        0x10 => vec![FrequencyRange::mhz(144, 147), FrequencyRange::mhz(430, 440)],
        0x11 => vec![FrequencyRange::mhz(136, 174)],
        _ => {
            info!(
                "unknown band-code 0x{code:02x}: limiting TX to 136-174 MHz and 400-480 MHz"
            );
            default_bands()
        }
    }
}

/// The limits table specialized to the band code a connected radio
/// reported.
pub fn limits_for_band_code(code: u8) -> RadioLimits {
    RadioLimits {
        frequency_ranges: tx_bands(code),
        ..limits()
    }
}

/// Verify a configuration against this model, including the advisory
/// firmware-version check when the radio's reported version is known.
pub fn verify(config: &Config, reported_firmware: Option<&str>) -> Vec<VerifyIssue> {
    let limits = limits();
    let mut issues = verify_config(config, &limits);
    if let Some(reported) = reported_firmware {
        if let Some(issue) = verify_firmware_version(reported, limits.supported_firmware) {
            issues.push(issue);
        }
    }
    issues.sort_by(|a, b| b.severity.cmp(&a.severity));
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluglib_core::{max_severity, Frequency, Severity};

    #[test]
    fn limits_match_bank_capacities() {
        let l = limits();
        assert_eq!(l.max_channels, 1024);
        assert_eq!(l.max_zones, 68);
        assert_eq!(l.max_contacts, 256);
        assert_eq!(l.max_dtmf_contacts, 64);
        assert_eq!(l.max_positioning_systems, 8);
        assert!(l.has_roaming);
        assert!(!l.has_dmr_gps);
    }

    #[test]
    fn band_code_table() {
        assert_eq!(tx_bands(0x11), vec![FrequencyRange::mhz(136, 174)]);
        assert_eq!(tx_bands(0x0e).len(), 3);
        // Unknown codes fall back to the default coverage.
        assert_eq!(tx_bands(0x7f), default_bands());
        assert_eq!(tx_bands(0x00), default_bands());
    }

    #[test]
    fn band_code_restricts_verification() {
        let mut config = Config::new();
        config.channels_mut().add(pluglib_core::Channel::fm(
            "70cm",
            Frequency::from_mhz(439.500),
            Frequency::from_mhz(439.500),
        ));
        // Code 0x11 is the VHF-only variant.
        let narrow = limits_for_band_code(0x11);
        let issues = verify_config(&config, &narrow);
        assert_eq!(max_severity(&issues), Some(Severity::Error));
        // The default variant covers 70 cm.
        assert!(verify_config(&config, &limits()).is_empty());
    }

    #[test]
    fn verify_includes_firmware_advisory() {
        let config = Config::new();
        let issues = verify(&config, Some("V101"));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("newer"));
        assert!(verify(&config, Some("V100")).is_empty());
        assert!(verify(&config, None).is_empty());
    }
}
