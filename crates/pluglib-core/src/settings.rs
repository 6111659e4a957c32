//! Global radio settings.

/// Radio-wide settings that are not tied to any channel.
///
/// The default radio ID is *not* stored here; it lives with the radio ID
/// list (see [`RadioIdList`](crate::radioid::RadioIdList)), even though the
/// text form nests it under the `settings` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioSettings {
    /// First line of the boot text.
    pub intro_line1: String,
    /// Second line of the boot text.
    pub intro_line2: String,
    /// Microphone amplification, 1..=10.
    pub mic_level: u8,
    /// Speech synthesis for visually impaired operators.
    pub speech: bool,
    /// Default squelch level, 0..=10 (0 = open).
    pub squelch: u8,
    /// Default VOX sensitivity, 0..=10 (0 = disabled).
    pub vox: u8,
    /// Default transmit timeout in seconds (0 = off).
    pub tot: u32,
}

impl Default for RadioSettings {
    fn default() -> Self {
        RadioSettings {
            intro_line1: String::new(),
            intro_line2: String::new(),
            mic_level: 3,
            speech: false,
            squelch: 1,
            vox: 0,
            tot: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = RadioSettings::default();
        assert_eq!(s.mic_level, 3);
        assert_eq!(s.squelch, 1);
        assert_eq!(s.vox, 0);
        assert_eq!(s.tot, 0);
        assert!(!s.speech);
    }
}
