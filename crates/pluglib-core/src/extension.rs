//! Vendor extension slot of the configuration tree.
//!
//! Vendor-specific settings that have no place in the generic model attach
//! to the tree root as a single extension object. The text serializer
//! dispatches extension sub-nodes to a registered codec by property name
//! (e.g. the `tyt` key), so the core only needs a type-erased slot here.

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use crate::types::ParseEnumError;

/// A vendor extension attached to the configuration root.
pub trait ConfigExtension: fmt::Debug {
    /// The property name this extension serializes under (e.g. `"tyt"`).
    fn name(&self) -> &'static str;

    /// Clone into a fresh box; extensions must be cloneable for tree copy.
    fn clone_box(&self) -> Box<dyn ConfigExtension>;

    /// Downcast support.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl Clone for Box<dyn ConfigExtension> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Function a programmable side button can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonAction {
    /// Button does nothing.
    #[default]
    Disabled,
    /// Toggle VOX.
    VoxToggle,
    /// Cycle the power setting.
    PowerToggle,
    /// Open the squelch while held.
    MonitorToggle,
    /// Transmit a 1750 Hz repeater tone-burst while held.
    Tone1750,
}

impl fmt::Display for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ButtonAction::Disabled => "Disabled",
            ButtonAction::VoxToggle => "ToggleVox",
            ButtonAction::PowerToggle => "TogglePower",
            ButtonAction::MonitorToggle => "ToggleMonitor",
            ButtonAction::Tone1750 => "Tone1750",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ButtonAction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disabled" => Ok(ButtonAction::Disabled),
            "togglevox" => Ok(ButtonAction::VoxToggle),
            "togglepower" => Ok(ButtonAction::PowerToggle),
            "togglemonitor" => Ok(ButtonAction::MonitorToggle),
            "tone1750" => Ok(ButtonAction::Tone1750),
            _ => Err(ParseEnumError::new("button action", s)),
        }
    }
}

/// TyT/Retevis button settings, the one extension this library ships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TytExtension {
    /// Long-press threshold in milliseconds.
    pub long_press_duration: u32,
    /// Side button 1, short press.
    pub side_button1_short: ButtonAction,
    /// Side button 1, long press.
    pub side_button1_long: ButtonAction,
    /// Side button 2, short press.
    pub side_button2_short: ButtonAction,
    /// Side button 2, long press.
    pub side_button2_long: ButtonAction,
}

impl Default for TytExtension {
    fn default() -> Self {
        TytExtension {
            long_press_duration: 1000,
            side_button1_short: ButtonAction::Disabled,
            side_button1_long: ButtonAction::Disabled,
            side_button2_short: ButtonAction::Disabled,
            side_button2_long: ButtonAction::Disabled,
        }
    }
}

impl ConfigExtension for TytExtension {
    fn name(&self) -> &'static str {
        "tyt"
    }

    fn clone_box(&self) -> Box<dyn ConfigExtension> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
