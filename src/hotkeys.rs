//! Single-keystroke controls read from the terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a keystroke asks the dashboard to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    ToggleRate,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::ToggleRate => "toggle rate",
            Action::Quit => "quit",
        };
        write!(f, "{}", s)
    }
}

/// Key bindings. `None` disables an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hotkeys {
    pub toggle_rate: Option<char>,
    pub quit: Option<char>,
}

impl Default for Hotkeys {
    fn default() -> Self {
        Self {
            toggle_rate: Some('r'),
            quit: Some('q'),
        }
    }
}

impl Hotkeys {
    /// Look up the action bound to a raw input byte. Unbound keys are `None`.
    pub fn action_for(&self, byte: u8) -> Option<Action> {
        let ch = byte as char;
        if self.quit == Some(ch) {
            Some(Action::Quit)
        } else if self.toggle_rate == Some(ch) {
            Some(Action::ToggleRate)
        } else {
            None
        }
    }

    /// Both bindings must be single ASCII characters and distinct.
    pub fn validate(&self) -> Result<(), String> {
        for (name, key) in [("toggle_rate", self.toggle_rate), ("quit", self.quit)] {
            if let Some(k) = key {
                if !k.is_ascii() || k.is_ascii_control() {
                    return Err(format!("hotkey '{}' must be a printable ASCII character", name));
                }
            }
        }
        if self.toggle_rate.is_some() && self.toggle_rate == self.quit {
            return Err("toggle_rate and quit share the same key".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings() {
        let hk = Hotkeys::default();
        assert_eq!(hk.action_for(b'r'), Some(Action::ToggleRate));
        assert_eq!(hk.action_for(b'q'), Some(Action::Quit));
        assert_eq!(hk.action_for(b'x'), None);
        assert_eq!(hk.action_for(b'R'), None);
    }

    #[test]
    fn disabled_binding_is_ignored() {
        let hk = Hotkeys {
            toggle_rate: None,
            ..Default::default()
        };
        assert_eq!(hk.action_for(b'r'), None);
        assert!(hk.validate().is_ok());
    }

    #[test]
    fn duplicate_binding_is_rejected() {
        let hk = Hotkeys {
            toggle_rate: Some('x'),
            quit: Some('x'),
        };
        assert!(hk.validate().is_err());
    }

    #[test]
    fn action_display() {
        assert_eq!(Action::Quit.to_string(), "quit");
    }
}
