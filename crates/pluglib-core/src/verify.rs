//! Static per-model capability tables and configuration verification.
//!
//! Every radio model publishes a [`RadioLimits`] table: frequency coverage,
//! collection capacities, name-length limits, and capability flags.
//! [`verify_config`] walks a configuration against such a table and
//! produces a severity-ordered list of [`VerifyIssue`]s; the overall result
//! of a verification is the maximum severity observed (see
//! [`max_severity`]).
//!
//! Verification never mutates the configuration and never blocks an encode
//! by itself; the caller decides whether warnings are acceptable.

use std::fmt;

use crate::config::Config;
use crate::types::Frequency;

/// How severe a verification finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Advisory; the codeplug can be written but may not behave as
    /// intended (e.g. a name that will be truncated).
    Warning,
    /// The codeplug cannot be represented on this model as-is.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One verification finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyIssue {
    /// How severe the finding is.
    pub severity: Severity,
    /// Human-readable description, including the offending location.
    pub message: String,
}

impl VerifyIssue {
    /// Create a warning.
    pub fn warning(message: impl Into<String>) -> Self {
        VerifyIssue {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Create an error.
    pub fn error(message: impl Into<String>) -> Self {
        VerifyIssue {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for VerifyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// A contiguous transmit/receive frequency range in hertz (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyRange {
    /// Lower bound.
    pub low: Frequency,
    /// Upper bound.
    pub high: Frequency,
}

impl FrequencyRange {
    /// Create a range from bounds in MHz.
    pub const fn mhz(low: u64, high: u64) -> Self {
        FrequencyRange {
            low: Frequency::from_hz(low * 1_000_000),
            high: Frequency::from_hz(high * 1_000_000),
        }
    }

    /// Whether `freq` falls inside this range.
    pub fn contains(&self, freq: Frequency) -> bool {
        self.low <= freq && freq <= self.high
    }
}

/// Static capability and limit table of one radio model.
#[derive(Debug, Clone)]
pub struct RadioLimits {
    /// Human-readable model name.
    pub model_name: &'static str,
    /// Firmware version this library was written against.
    pub supported_firmware: &'static str,

    /// Whether the model does DMR.
    pub has_dmr: bool,
    /// Whether the model does analog FM.
    pub has_fm: bool,
    /// Frequency ranges the model can transmit in.
    pub frequency_ranges: Vec<FrequencyRange>,

    /// Maximum number of radio IDs.
    pub max_radio_ids: usize,
    /// Maximum length of names throughout the codeplug.
    pub max_name_length: usize,
    /// Maximum length of each boot intro line.
    pub max_intro_line_length: usize,

    /// Maximum number of channels.
    pub max_channels: usize,
    /// Maximum number of zones.
    pub max_zones: usize,
    /// Maximum number of channels per zone.
    pub max_channels_in_zone: usize,

    /// Whether the model stores scan lists.
    pub has_scan_lists: bool,
    /// Maximum number of scan lists.
    pub max_scan_lists: usize,
    /// Maximum number of channels per scan list.
    pub max_channels_in_scan_list: usize,

    /// Maximum number of DMR contacts.
    pub max_contacts: usize,
    /// Maximum number of DTMF contacts.
    pub max_dtmf_contacts: usize,
    /// Maximum number of RX group lists.
    pub max_group_lists: usize,
    /// Maximum number of contacts per RX group list.
    pub max_contacts_in_group_list: usize,

    /// Whether the model reports positions over DMR.
    pub has_dmr_gps: bool,
    /// Whether the model beacons APRS.
    pub has_aprs: bool,
    /// Maximum number of positioning systems (of the supported kinds).
    pub max_positioning_systems: usize,

    /// Whether the model supports roaming.
    pub has_roaming: bool,
    /// Maximum number of roaming zones.
    pub max_roaming_zones: usize,
    /// Maximum number of channels per roaming zone.
    pub max_channels_in_roaming_zone: usize,

    /// Whether the model stores a callsign database.
    pub has_callsign_db: bool,
    /// Maximum number of callsign database entries.
    pub max_callsign_db_entries: usize,
}

impl RadioLimits {
    fn check_name(&self, issues: &mut Vec<VerifyIssue>, what: &str, name: &str) {
        if name.len() > self.max_name_length {
            issues.push(VerifyIssue::warning(format!(
                "{what}: name '{name}' exceeds {} characters and will be truncated",
                self.max_name_length
            )));
        }
    }

    fn check_frequency(&self, issues: &mut Vec<VerifyIssue>, what: &str, freq: Frequency) {
        if !self.frequency_ranges.iter().any(|r| r.contains(freq)) {
            issues.push(VerifyIssue::error(format!(
                "{what}: frequency {freq} is outside the supported ranges"
            )));
        }
    }
}

/// Verify `config` against the `limits` table of a radio model.
///
/// Returns all findings ordered most severe first. An empty result means
/// the configuration fits the model.
pub fn verify_config(config: &Config, limits: &RadioLimits) -> Vec<VerifyIssue> {
    let mut issues = Vec::new();

    verify_settings(config, limits, &mut issues);
    verify_radio_ids(config, limits, &mut issues);
    verify_contacts(config, limits, &mut issues);
    verify_group_lists(config, limits, &mut issues);
    verify_channels(config, limits, &mut issues);
    verify_zones(config, limits, &mut issues);
    verify_scan_lists(config, limits, &mut issues);
    verify_positioning(config, limits, &mut issues);
    verify_roaming(config, limits, &mut issues);

    issues.sort_by(|a, b| b.severity.cmp(&a.severity));
    issues
}

/// The overall result of a verification: the maximum severity observed,
/// or `None` for a clean configuration.
pub fn max_severity(issues: &[VerifyIssue]) -> Option<Severity> {
    issues.iter().map(|i| i.severity).max()
}

/// Compare the firmware version reported by a radio against the version
/// this library supports.
///
/// Versions are compared lexicographically, the convention these firmware
/// version strings follow. A mismatch in either direction is advisory
/// only.
pub fn verify_firmware_version(reported: &str, supported: &str) -> Option<VerifyIssue> {
    if reported > supported {
        Some(VerifyIssue::warning(format!(
            "radio reports firmware {reported}, newer than the supported {supported}; \
             some settings may not be understood"
        )))
    } else if reported < supported {
        Some(VerifyIssue::warning(format!(
            "radio reports firmware {reported}, older than the supported {supported}; \
             consider updating the firmware"
        )))
    } else {
        None
    }
}

fn verify_settings(config: &Config, limits: &RadioLimits, issues: &mut Vec<VerifyIssue>) {
    for (what, line) in [
        ("settings.introLine1", &config.settings().intro_line1),
        ("settings.introLine2", &config.settings().intro_line2),
    ] {
        if line.len() > limits.max_intro_line_length {
            issues.push(VerifyIssue::warning(format!(
                "{what}: '{line}' exceeds {} characters and will be truncated",
                limits.max_intro_line_length
            )));
        }
    }
}

fn verify_radio_ids(config: &Config, limits: &RadioLimits, issues: &mut Vec<VerifyIssue>) {
    if config.radio_ids().len() > limits.max_radio_ids {
        issues.push(VerifyIssue::error(format!(
            "{} radio IDs exceed the supported {}",
            config.radio_ids().len(),
            limits.max_radio_ids
        )));
    }
    for id in config.radio_ids().iter() {
        limits.check_name(issues, "radio ID", &id.name);
    }
}

fn verify_contacts(config: &Config, limits: &RadioLimits, issues: &mut Vec<VerifyIssue>) {
    let dmr = config.contacts().iter().filter(|c| c.is_dmr()).count();
    let dtmf = config.contacts().iter().filter(|c| c.is_dtmf()).count();
    if dmr > limits.max_contacts {
        issues.push(VerifyIssue::error(format!(
            "{dmr} DMR contacts exceed the supported {}",
            limits.max_contacts
        )));
    }
    if dtmf > limits.max_dtmf_contacts {
        issues.push(VerifyIssue::error(format!(
            "{dtmf} DTMF contacts exceed the supported {}",
            limits.max_dtmf_contacts
        )));
    }
    for contact in config.contacts() {
        limits.check_name(issues, "contact", &contact.name);
    }
}

fn verify_group_lists(config: &Config, limits: &RadioLimits, issues: &mut Vec<VerifyIssue>) {
    if config.group_lists().len() > limits.max_group_lists {
        issues.push(VerifyIssue::error(format!(
            "{} group lists exceed the supported {}",
            config.group_lists().len(),
            limits.max_group_lists
        )));
    }
    for (i, list) in config.group_lists().iter().enumerate() {
        limits.check_name(issues, "group list", &list.name);
        if list.contacts.len() > limits.max_contacts_in_group_list {
            issues.push(VerifyIssue::error(format!(
                "group list '{}': {} members exceed the supported {}",
                list.name,
                list.contacts.len(),
                limits.max_contacts_in_group_list
            )));
        }
        for (m, contact) in list.contacts.iter().enumerate() {
            if config.contacts().get(contact.index()).is_none() {
                issues.push(VerifyIssue::error(format!(
                    "groupLists[{i}].contacts[{m}]: dangling contact reference"
                )));
            }
        }
    }
}

fn verify_channels(config: &Config, limits: &RadioLimits, issues: &mut Vec<VerifyIssue>) {
    if config.channels().len() > limits.max_channels {
        issues.push(VerifyIssue::error(format!(
            "{} channels exceed the supported {}",
            config.channels().len(),
            limits.max_channels
        )));
    }
    for (i, ch) in config.channels().iter().enumerate() {
        limits.check_name(issues, "channel", &ch.name);
        limits.check_frequency(issues, &format!("channel '{}' (RX)", ch.name), ch.rx_frequency);
        if !ch.rx_only {
            limits.check_frequency(
                issues,
                &format!("channel '{}' (TX)", ch.name),
                ch.tx_frequency,
            );
        }
        match &ch.mode {
            crate::channel::ChannelMode::Fm(_) if !limits.has_fm => {
                issues.push(VerifyIssue::error(format!(
                    "channel '{}': model does not support FM",
                    ch.name
                )));
            }
            crate::channel::ChannelMode::Dmr(_) if !limits.has_dmr => {
                issues.push(VerifyIssue::error(format!(
                    "channel '{}': model does not support DMR",
                    ch.name
                )));
            }
            _ => {}
        }
        if let Some(scan) = ch.scan_list {
            if config.scan_lists().get(scan.index()).is_none() {
                issues.push(VerifyIssue::error(format!(
                    "channels[{i}].scanList: dangling scan list reference"
                )));
            }
        }
        if let Some(pos) = ch.positioning {
            if config.positioning().get(pos.index()).is_none() {
                issues.push(VerifyIssue::error(format!(
                    "channels[{i}].aprs: dangling positioning reference"
                )));
            }
        }
        if let Some(dmr) = ch.as_dmr() {
            if let Some(gl) = dmr.group_list {
                if config.group_lists().get(gl.index()).is_none() {
                    issues.push(VerifyIssue::error(format!(
                        "channels[{i}].groupList: dangling group list reference"
                    )));
                }
            }
            if let Some(contact) = dmr.contact {
                if config.contacts().get(contact.index()).is_none() {
                    issues.push(VerifyIssue::error(format!(
                        "channels[{i}].contact: dangling contact reference"
                    )));
                }
            }
            if let Some(id) = dmr.radio_id {
                if config.radio_ids().get(id.index()).is_none() {
                    issues.push(VerifyIssue::error(format!(
                        "channels[{i}].radioID: dangling radio ID reference"
                    )));
                }
            }
            if let Some(roam) = dmr.roaming {
                if config.roaming().get(roam.index()).is_none() {
                    issues.push(VerifyIssue::error(format!(
                        "channels[{i}].roaming: dangling roaming zone reference"
                    )));
                }
            }
        }
    }
}

fn verify_zones(config: &Config, limits: &RadioLimits, issues: &mut Vec<VerifyIssue>) {
    if config.zones().len() > limits.max_zones {
        issues.push(VerifyIssue::error(format!(
            "{} zones exceed the supported {}",
            config.zones().len(),
            limits.max_zones
        )));
    }
    for (i, zone) in config.zones().iter().enumerate() {
        limits.check_name(issues, "zone", &zone.name);
        if zone.channels.len() > limits.max_channels_in_zone {
            issues.push(VerifyIssue::error(format!(
                "zone '{}': {} members exceed the supported {}",
                zone.name,
                zone.channels.len(),
                limits.max_channels_in_zone
            )));
        }
        for (m, ch) in zone.channels.iter().enumerate() {
            if config.channels().get(ch.index()).is_none() {
                issues.push(VerifyIssue::error(format!(
                    "zones[{i}].channels[{m}]: dangling channel reference"
                )));
            }
        }
    }
}

fn verify_scan_lists(config: &Config, limits: &RadioLimits, issues: &mut Vec<VerifyIssue>) {
    if !limits.has_scan_lists {
        if !config.scan_lists().is_empty() {
            issues.push(VerifyIssue::warning(
                "model does not store scan lists; they will be dropped",
            ));
        }
        return;
    }
    if config.scan_lists().len() > limits.max_scan_lists {
        issues.push(VerifyIssue::error(format!(
            "{} scan lists exceed the supported {}",
            config.scan_lists().len(),
            limits.max_scan_lists
        )));
    }
    for (i, list) in config.scan_lists().iter().enumerate() {
        limits.check_name(issues, "scan list", &list.name);
        if list.channels.len() > limits.max_channels_in_scan_list {
            issues.push(VerifyIssue::error(format!(
                "scan list '{}': {} members exceed the supported {}",
                list.name,
                list.channels.len(),
                limits.max_channels_in_scan_list
            )));
        }
        for (m, ch) in list.channels.iter().enumerate() {
            if config.channels().get(ch.index()).is_none() {
                issues.push(VerifyIssue::error(format!(
                    "scanLists[{i}].channels[{m}]: dangling channel reference"
                )));
            }
        }
    }
}

fn verify_positioning(config: &Config, limits: &RadioLimits, issues: &mut Vec<VerifyIssue>) {
    if config.positioning().len() > limits.max_positioning_systems {
        issues.push(VerifyIssue::error(format!(
            "{} positioning systems exceed the supported {}",
            config.positioning().len(),
            limits.max_positioning_systems
        )));
    }
    for (i, sys) in config.positioning().iter().enumerate() {
        limits.check_name(issues, "positioning system", &sys.name);
        match &sys.kind {
            crate::positioning::PositioningKind::Aprs(_) if !limits.has_aprs => {
                issues.push(VerifyIssue::warning(format!(
                    "positioning system '{}': model does not beacon APRS; it will be dropped",
                    sys.name
                )));
            }
            crate::positioning::PositioningKind::DmrGps(gps) => {
                if !limits.has_dmr_gps {
                    issues.push(VerifyIssue::warning(format!(
                        "positioning system '{}': model does not report positions over DMR; \
                         it will be dropped",
                        sys.name
                    )));
                }
                if let Some(dest) = gps.destination {
                    if config.contacts().get(dest.index()).is_none() {
                        issues.push(VerifyIssue::error(format!(
                            "positioning[{i}].destination: dangling contact reference"
                        )));
                    }
                }
            }
            _ => {}
        }
    }
}

fn verify_roaming(config: &Config, limits: &RadioLimits, issues: &mut Vec<VerifyIssue>) {
    if !limits.has_roaming {
        if config.requires_roaming() || !config.roaming().is_empty() {
            issues.push(VerifyIssue::warning(
                "model does not support roaming; roaming zones will be dropped",
            ));
        }
        return;
    }
    if config.roaming().len() > limits.max_roaming_zones {
        issues.push(VerifyIssue::error(format!(
            "{} roaming zones exceed the supported {}",
            config.roaming().len(),
            limits.max_roaming_zones
        )));
    }
    for (i, zone) in config.roaming().iter().enumerate() {
        limits.check_name(issues, "roaming zone", &zone.name);
        if zone.channels.len() > limits.max_channels_in_roaming_zone {
            issues.push(VerifyIssue::error(format!(
                "roaming zone '{}': {} members exceed the supported {}",
                zone.name,
                zone.channels.len(),
                limits.max_channels_in_roaming_zone
            )));
        }
        for (m, ch) in zone.channels.iter().enumerate() {
            match config.channels().get(ch.index()) {
                None => issues.push(VerifyIssue::error(format!(
                    "roaming[{i}].channels[{m}]: dangling channel reference"
                ))),
                Some(channel) if !channel.is_dmr() => {
                    issues.push(VerifyIssue::error(format!(
                        "roaming[{i}].channels[{m}]: '{}' is not a DMR channel",
                        channel.name
                    )))
                }
                Some(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::contact::Contact;
    use crate::context::GroupListRef;
    use crate::positioning::PositioningSystem;
    use crate::types::Frequency;
    use crate::zone::Zone;

    fn test_limits() -> RadioLimits {
        RadioLimits {
            model_name: "Test",
            supported_firmware: "V100",
            has_dmr: true,
            has_fm: true,
            frequency_ranges: vec![FrequencyRange::mhz(136, 174), FrequencyRange::mhz(400, 480)],
            max_radio_ids: 4,
            max_name_length: 16,
            max_intro_line_length: 16,
            max_channels: 8,
            max_zones: 4,
            max_channels_in_zone: 4,
            has_scan_lists: true,
            max_scan_lists: 4,
            max_channels_in_scan_list: 4,
            max_contacts: 8,
            max_dtmf_contacts: 4,
            max_group_lists: 4,
            max_contacts_in_group_list: 4,
            has_dmr_gps: false,
            has_aprs: true,
            max_positioning_systems: 2,
            has_roaming: false,
            max_roaming_zones: 0,
            max_channels_in_roaming_zone: 0,
            has_callsign_db: true,
            max_callsign_db_entries: 10920,
        }
    }

    fn in_band_channel(name: &str) -> Channel {
        Channel::fm(
            name,
            Frequency::from_mhz(145.500),
            Frequency::from_mhz(145.500),
        )
    }

    #[test]
    fn clean_config_verifies_clean() {
        let mut config = Config::new();
        config.radio_ids_mut().add(crate::radioid::RadioId::new("X", 1));
        config.channels_mut().add(in_band_channel("ok"));
        let issues = verify_config(&config, &test_limits());
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
        assert_eq!(max_severity(&issues), None);
    }

    #[test]
    fn too_many_channels_is_error() {
        let mut config = Config::new();
        for i in 0..9 {
            config.channels_mut().add(in_band_channel(&format!("ch{i}")));
        }
        let issues = verify_config(&config, &test_limits());
        assert_eq!(max_severity(&issues), Some(Severity::Error));
        assert!(issues[0].message.contains("9 channels"));
    }

    #[test]
    fn long_name_is_warning() {
        let mut config = Config::new();
        config
            .channels_mut()
            .add(in_band_channel("a channel name that is way too long"));
        let issues = verify_config(&config, &test_limits());
        assert_eq!(max_severity(&issues), Some(Severity::Warning));
    }

    #[test]
    fn out_of_band_frequency_is_error() {
        let mut config = Config::new();
        config.channels_mut().add(Channel::fm(
            "hf",
            Frequency::from_mhz(14.074),
            Frequency::from_mhz(14.074),
        ));
        let issues = verify_config(&config, &test_limits());
        assert_eq!(max_severity(&issues), Some(Severity::Error));
    }

    #[test]
    fn rx_only_skips_tx_check() {
        let mut config = Config::new();
        let mut ch = Channel::fm(
            "airband",
            Frequency::from_mhz(162.400),
            Frequency::from_mhz(14.074),
        );
        ch.rx_only = true;
        config.channels_mut().add(ch);
        let issues = verify_config(&config, &test_limits());
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn dangling_group_list_is_error() {
        let mut config = Config::new();
        let mut ch = Channel::dmr(
            "dmr",
            Frequency::from_mhz(439.5625),
            Frequency::from_mhz(431.9625),
        );
        ch.as_dmr_mut().unwrap().group_list = Some(GroupListRef(3));
        config.channels_mut().add(ch);
        let issues = verify_config(&config, &test_limits());
        assert_eq!(max_severity(&issues), Some(Severity::Error));
        assert!(issues
            .iter()
            .any(|i| i.message.contains("dangling group list reference")));
    }

    #[test]
    fn dangling_zone_member_is_error() {
        let mut config = Config::new();
        config.zones_mut().add(Zone {
            name: "z".into(),
            channels: vec![crate::context::ChannelRef(7)],
        });
        let issues = verify_config(&config, &test_limits());
        assert!(issues
            .iter()
            .any(|i| i.message.contains("zones[0].channels[0]")));
    }

    #[test]
    fn roaming_on_non_roaming_model_warns() {
        let mut config = Config::new();
        config
            .roaming_mut()
            .add(crate::roaming::RoamingZone::new("roam"));
        let issues = verify_config(&config, &test_limits());
        assert_eq!(max_severity(&issues), Some(Severity::Warning));
    }

    #[test]
    fn issues_sorted_most_severe_first() {
        let mut config = Config::new();
        // One warning (long name) and one error (too many zones).
        config
            .channels_mut()
            .add(in_band_channel("a channel name that is way too long"));
        for i in 0..5 {
            config.zones_mut().add(Zone::new(format!("z{i}")));
        }
        let issues = verify_config(&config, &test_limits());
        assert!(issues.len() >= 2);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues.last().unwrap().severity, Severity::Warning);
    }

    #[test]
    fn contact_counts_by_kind() {
        let mut config = Config::new();
        for i in 0..5 {
            config
                .contacts_mut()
                .add(Contact::dtmf(format!("d{i}"), "123"));
        }
        let issues = verify_config(&config, &test_limits());
        assert!(issues.iter().any(|i| i.message.contains("DTMF")));
        assert_eq!(max_severity(&issues), Some(Severity::Error));
    }

    #[test]
    fn firmware_version_newer_warns() {
        let issue = verify_firmware_version("V101", "V100").unwrap();
        assert_eq!(issue.severity, Severity::Warning);
        assert!(issue.message.contains("newer"));
    }

    #[test]
    fn firmware_version_older_warns() {
        let issue = verify_firmware_version("V099", "V100").unwrap();
        assert_eq!(issue.severity, Severity::Warning);
        assert!(issue.message.contains("older"));
    }

    #[test]
    fn firmware_version_equal_is_clean() {
        assert!(verify_firmware_version("V100", "V100").is_none());
    }

    #[test]
    fn dmr_gps_on_aprs_only_model_warns() {
        let mut config = Config::new();
        config
            .positioning_mut()
            .add(PositioningSystem::dmr_gps("BM", 300));
        let issues = verify_config(&config, &test_limits());
        assert!(issues
            .iter()
            .any(|i| i.message.contains("does not report positions over DMR")));
    }
}
