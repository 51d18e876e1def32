//! Input device abstraction
//!
//! Device enumeration itself lives outside the configuration core; the
//! store only needs the current list to auto-assign joystick ports.

/// A physical input device that can be assigned to a joystick port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDevice {
    /// Identifier written to `joystick_port_N`
    pub id: String,
    /// Display name, matched against the preferred joystick settings
    pub name: String,
}

impl InputDevice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Source of currently connected joysticks.
pub trait InputDevices: Send + Sync {
    /// Connected joysticks in enumeration order.
    fn joysticks(&self) -> Vec<InputDevice>;
}

/// A fixed device list, used when enumeration happens elsewhere.
#[derive(Debug, Clone, Default)]
pub struct StaticInputDevices {
    devices: Vec<InputDevice>,
}

impl StaticInputDevices {
    pub fn new(devices: Vec<InputDevice>) -> Self {
        Self { devices }
    }
}

impl InputDevices for StaticInputDevices {
    fn joysticks(&self) -> Vec<InputDevice> {
        self.devices.clone()
    }
}
