//! Joystick port auto-assignment
//!
//! Ports 0 and 1 with a mode but no device get a concrete device from the
//! pool of connected joysticks plus the synthetic `none`, `mouse` and
//! `keyboard` devices. Devices pinned explicitly to either port are taken out
//! of the pool first, and a device assigned to one port is never handed to
//! the other.
//!
//! Port 1 (the joystick port, preferring the `primary_joystick` setting) is
//! resolved before port 0 (preferring `secondary_joystick`), so port 1 wins
//! contested devices.

use super::{ConfigValues, JoystickMode, value_of};
use crate::services::InputDevice;

/// Synthetic devices always present in the pool, in pool order.
const SYNTHETIC_DEVICES: &[&str] = &["none", "mouse", "keyboard"];

/// Ports in resolution order.
const RESOLUTION_ORDER: [usize; 2] = [1, 0];

/// Keys consulted by auto-assignment.
pub const JOYSTICK_KEYS: &[&str] = &[
    "joystick_port_0",
    "joystick_port_0_mode",
    "joystick_port_1",
    "joystick_port_1_mode",
];

struct PoolEntry {
    id: String,
    name_lower: String,
}

/// Preferred device names for the two auto-assigned ports.
#[derive(Debug, Clone, Default)]
pub struct JoystickPreferences {
    /// Preferred device for port 1
    pub primary: String,
    /// Preferred device for port 0
    pub secondary: String,
}

impl JoystickPreferences {
    fn for_port(&self, port: usize) -> &str {
        if port == 1 { &self.primary } else { &self.secondary }
    }
}

/// Fill in `joystick_port_0` / `joystick_port_1` where the mode needs a
/// device and none is configured.
pub fn fix_joystick_ports(
    values: &mut ConfigValues,
    joysticks: &[InputDevice],
    preferences: &JoystickPreferences,
) {
    let mut pool: Vec<PoolEntry> = joysticks
        .iter()
        .map(|device| PoolEntry {
            id: device.id.clone(),
            name_lower: device.name.to_lowercase(),
        })
        .chain(SYNTHETIC_DEVICES.iter().map(|name| PoolEntry {
            id: name.to_string(),
            name_lower: name.to_string(),
        }))
        .collect();

    // Devices pinned to a port are not available to the other one
    for port in RESOLUTION_ORDER {
        let pinned = value_of(values, &device_key(port)).to_lowercase();
        if pinned.is_empty() {
            continue;
        }
        if let Some(index) = pool
            .iter()
            .position(|entry| entry.name_lower == pinned || entry.id.to_lowercase() == pinned)
        {
            pool.remove(index);
        }
    }

    for port in RESOLUTION_ORDER {
        let key = device_key(port);
        if !value_of(values, &key).is_empty() {
            continue;
        }
        let mode: JoystickMode = value_of(values, &mode_key(port)).parse().unwrap_or_default();
        let device = if mode.wants_joystick() {
            let wanted = preferences.for_port(port).to_lowercase();
            let index = pool
                .iter()
                .position(|entry| !wanted.is_empty() && entry.name_lower == wanted)
                .or_else(|| pool.len().checked_sub(1));
            match index {
                Some(index) => pool.remove(index).id,
                None => continue,
            }
        } else {
            match mode {
                JoystickMode::Mouse => "mouse".to_string(),
                JoystickMode::Nothing => "none".to_string(),
                _ => continue,
            }
        };
        tracing::debug!("Auto-assigned {} to {}", device, key);
        values.insert(key, device);
    }
}

fn device_key(port: usize) -> String {
    format!("joystick_port_{port}")
}

fn mode_key(port: usize) -> String {
    format!("joystick_port_{port}_mode")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ports(port0_mode: &str, port1_mode: &str) -> ConfigValues {
        let mut values = ConfigValues::new();
        values.insert("joystick_port_0".into(), String::new());
        values.insert("joystick_port_0_mode".into(), port0_mode.into());
        values.insert("joystick_port_1".into(), String::new());
        values.insert("joystick_port_1_mode".into(), port1_mode.into());
        values
    }

    fn pads() -> Vec<InputDevice> {
        vec![
            InputDevice::new("pad-a", "Competition Pro"),
            InputDevice::new("pad-b", "Xbox Controller"),
        ]
    }

    #[test]
    fn test_two_joystick_ports_get_distinct_devices() {
        let mut values = ports("joystick", "joystick");
        fix_joystick_ports(&mut values, &pads(), &JoystickPreferences::default());
        assert_ne!(values["joystick_port_0"], values["joystick_port_1"]);
        assert!(!values["joystick_port_0"].is_empty());
    }

    #[test]
    fn test_last_pool_entry_wins_without_preference() {
        let mut values = ports("joystick", "joystick");
        fix_joystick_ports(&mut values, &pads(), &JoystickPreferences::default());
        // Port 1 goes first and takes the last entry, port 0 the one before
        assert_eq!(values["joystick_port_1"], "keyboard");
        assert_eq!(values["joystick_port_0"], "mouse");
    }

    #[test]
    fn test_preferences_are_case_insensitive() {
        let mut values = ports("joystick", "cd32 gamepad");
        let preferences = JoystickPreferences {
            primary: "xbox controller".into(),
            secondary: "COMPETITION PRO".into(),
        };
        fix_joystick_ports(&mut values, &pads(), &preferences);
        assert_eq!(values["joystick_port_1"], "pad-b");
        assert_eq!(values["joystick_port_0"], "pad-a");
    }

    #[test]
    fn test_port_one_wins_contested_preference() {
        let mut values = ports("joystick", "joystick");
        let preferences = JoystickPreferences {
            primary: "Competition Pro".into(),
            secondary: "Competition Pro".into(),
        };
        fix_joystick_ports(&mut values, &pads(), &preferences);
        assert_eq!(values["joystick_port_1"], "pad-a");
        assert_eq!(values["joystick_port_0"], "keyboard");
    }

    #[test]
    fn test_pinned_device_is_not_reassigned() {
        let mut values = ports("joystick", "joystick");
        values.insert("joystick_port_0".into(), "pad-a".into());
        let preferences = JoystickPreferences {
            primary: "Competition Pro".into(),
            secondary: String::new(),
        };
        fix_joystick_ports(&mut values, &pads(), &preferences);
        assert_eq!(values["joystick_port_0"], "pad-a");
        assert_ne!(values["joystick_port_1"], "pad-a");
    }

    #[test]
    fn test_mouse_and_nothing_modes() {
        let mut values = ports("mouse", "nothing");
        fix_joystick_ports(&mut values, &pads(), &JoystickPreferences::default());
        assert_eq!(values["joystick_port_0"], "mouse");
        assert_eq!(values["joystick_port_1"], "none");
    }

    #[test]
    fn test_unset_mode_leaves_port_empty() {
        let mut values = ports("", "");
        fix_joystick_ports(&mut values, &pads(), &JoystickPreferences::default());
        assert_eq!(values["joystick_port_0"], "");
        assert_eq!(values["joystick_port_1"], "");
    }

    #[test]
    fn test_explicit_device_kept_for_mouse_mode() {
        let mut values = ports("mouse", "");
        values.insert("joystick_port_0".into(), "keyboard".into());
        fix_joystick_ports(&mut values, &[], &JoystickPreferences::default());
        assert_eq!(values["joystick_port_0"], "keyboard");
    }
}
