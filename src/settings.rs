//! Runtime debug settings
//!
//! Toggled from raw key presses; never persisted.

use serde::{Deserialize, Serialize};

use crate::sim::powerup::PowerupKind;

/// What a key press asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugCommand {
    ToggleOverlay,
    ToggleGaps,
    ToggleHitboxes,
    Activate(PowerupKind),
}

impl DebugCommand {
    /// Map a key to a command. Everything except the overlay toggle
    /// requires the overlay to already be on.
    pub fn from_key(key: char, debug_enabled: bool) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'd' => Some(Self::ToggleOverlay),
            'g' if debug_enabled => Some(Self::ToggleGaps),
            'h' if debug_enabled => Some(Self::ToggleHitboxes),
            'f' if debug_enabled => Some(Self::Activate(PowerupKind::Fly)),
            'a' if debug_enabled => Some(Self::Activate(PowerupKind::Attack)),
            _ => None,
        }
    }
}

/// Debug toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Show the debug overlay (speed readout, gap markers)
    pub debug_overlay: bool,
    /// Outline hitboxes while the overlay is on
    pub show_hitboxes: bool,
    /// Generate gaps in the ground
    pub gaps_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_overlay: false,
            show_hitboxes: true,
            gaps_enabled: true,
        }
    }
}

impl Settings {
    /// Effective hitbox drawing (requires the overlay)
    pub fn draw_hitboxes(&self) -> bool {
        self.debug_overlay && self.show_hitboxes
    }

    /// Apply a toggle command. Powerup activation is routed elsewhere;
    /// returns true if a setting changed.
    pub fn apply(&mut self, command: DebugCommand) -> bool {
        match command {
            DebugCommand::ToggleOverlay => {
                self.debug_overlay = !self.debug_overlay;
                log::info!("Debug mode: {}", on_off(self.debug_overlay));
            }
            DebugCommand::ToggleGaps => {
                self.gaps_enabled = !self.gaps_enabled;
                log::info!("Ground gaps: {}", on_off(self.gaps_enabled));
            }
            DebugCommand::ToggleHitboxes => {
                self.show_hitboxes = !self.show_hitboxes;
                log::info!("Hitboxes: {}", on_off(self.show_hitboxes));
            }
            DebugCommand::Activate(_) => return false,
        }
        true
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_toggle_requires_debug() {
        assert_eq!(DebugCommand::from_key('g', false), None);
        assert_eq!(DebugCommand::from_key('G', true), Some(DebugCommand::ToggleGaps));
        assert_eq!(DebugCommand::from_key('D', false), Some(DebugCommand::ToggleOverlay));
    }

    #[test]
    fn test_apply_toggles() {
        let mut settings = Settings::default();
        assert!(settings.apply(DebugCommand::ToggleOverlay));
        assert!(settings.debug_overlay);
        assert!(settings.draw_hitboxes());
        assert!(settings.apply(DebugCommand::ToggleGaps));
        assert!(!settings.gaps_enabled);
        assert!(!settings.apply(DebugCommand::Activate(PowerupKind::Fly)));
    }
}
