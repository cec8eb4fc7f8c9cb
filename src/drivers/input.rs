use std::os::raw::c_uint;

use enumset::{EnumSet, EnumSetType};

#[derive(EnumSetType, Debug)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
    Start,
    Select,
    L,
    L2,
    L3,
    R,
    R2,
    R3,
}

impl Button {
    pub fn from_raw_retro_joypad_device_id(device_id_joypad: c_uint) -> Option<Self> {
        Some(match device_id_joypad {
            libretro_sys::DEVICE_ID_JOYPAD_UP => Button::Up,
            libretro_sys::DEVICE_ID_JOYPAD_DOWN => Button::Down,
            libretro_sys::DEVICE_ID_JOYPAD_LEFT => Button::Left,
            libretro_sys::DEVICE_ID_JOYPAD_RIGHT => Button::Right,
            libretro_sys::DEVICE_ID_JOYPAD_A => Button::A,
            libretro_sys::DEVICE_ID_JOYPAD_B => Button::B,
            libretro_sys::DEVICE_ID_JOYPAD_X => Button::X,
            libretro_sys::DEVICE_ID_JOYPAD_Y => Button::Y,
            libretro_sys::DEVICE_ID_JOYPAD_SELECT => Button::Select,
            libretro_sys::DEVICE_ID_JOYPAD_START => Button::Start,
            libretro_sys::DEVICE_ID_JOYPAD_L => Button::L,
            libretro_sys::DEVICE_ID_JOYPAD_L2 => Button::L2,
            libretro_sys::DEVICE_ID_JOYPAD_L3 => Button::L3,
            libretro_sys::DEVICE_ID_JOYPAD_R => Button::R,
            libretro_sys::DEVICE_ID_JOYPAD_R2 => Button::R2,
            libretro_sys::DEVICE_ID_JOYPAD_R3 => Button::R3,
            _ => return None,
        })
    }

    /// Bit position within the `GET_INPUT_BITMASKS` 16-bit joypad mask,
    /// i.e. the same ordinal the libretro header's `DEVICE_ID_JOYPAD_*`
    /// constants use.
    pub fn bitmask_bit(self) -> u16 {
        1 << (self as u32)
    }
}

/// `poll()`/`state()` as seen by the core through `input_poll`/
/// `input_state`; `GET_INPUT_BITMASKS` support is a capability flag since
/// not every default backend can cheaply produce a packed mask.
pub trait InputDriver: Send {
    fn poll(&mut self);

    /// Reads a single control. `port`/`device`/`index`/`id` are the raw
    /// libretro values; joypad buttons arrive with `device ==
    /// RETRO_DEVICE_JOYPAD` and `id` one of `DEVICE_ID_JOYPAD_*`.
    fn state(&self, port: u32, device: u32, index: u32, id: u32) -> i16;

    fn pressed_buttons(&self, port: u32) -> EnumSet<Button>;

    fn supports_bitmasks(&self) -> bool {
        true
    }

    fn max_users(&self) -> u32 {
        1
    }

    fn device_capabilities(&self) -> u64 {
        1 << libretro_sys::DEVICE_JOYPAD
    }

    fn rumble(&mut self, _port: u32, _effect: u32, _strength: u16) -> bool {
        false
    }

    /// `retro_sensor_interface::set_sensor_state`.
    fn set_sensor_state(&mut self, _port: u32, _action: u32, _rate: u32) -> bool {
        false
    }

    /// `retro_sensor_interface::get_sensor_input`.
    fn get_sensor_input(&self, _port: u32, _id: u32) -> f32 {
        0.0
    }
}

/// Packs 16 joypad buttons into the `GET_INPUT_BITMASKS` mask format,
/// shared by every `InputDriver` that reports `supports_bitmasks() ==
/// true`.
pub fn joypad_bitmask(pressed: EnumSet<Button>) -> i16 {
    pressed
        .iter()
        .fold(0u16, |mask, button| mask | button.bitmask_bit()) as i16
}

/// Reads real gamepads through `gilrs`. The teacher's default backend;
/// kept minimal since only the `InputDriver` contract is in scope, not a
/// full remapping UI.
pub struct GilrsInputDriver {
    gilrs: gilrs::Gilrs,
    pressed: EnumSet<Button>,
}

impl GilrsInputDriver {
    pub fn new() -> anyhow::Result<Self> {
        let gilrs = gilrs::Gilrs::new().map_err(|err| anyhow::anyhow!("failed to init gilrs: {err}"))?;

        Ok(Self {
            gilrs,
            pressed: EnumSet::empty(),
        })
    }

    fn button_from_gilrs(button: gilrs::Button) -> Option<Button> {
        Some(match button {
            gilrs::Button::DPadUp => Button::Up,
            gilrs::Button::DPadDown => Button::Down,
            gilrs::Button::DPadLeft => Button::Left,
            gilrs::Button::DPadRight => Button::Right,
            gilrs::Button::East => Button::A,
            gilrs::Button::South => Button::B,
            gilrs::Button::North => Button::X,
            gilrs::Button::West => Button::Y,
            gilrs::Button::Start => Button::Start,
            gilrs::Button::Select => Button::Select,
            gilrs::Button::LeftTrigger => Button::L,
            gilrs::Button::LeftTrigger2 => Button::L2,
            gilrs::Button::LeftThumb => Button::L3,
            gilrs::Button::RightTrigger => Button::R,
            gilrs::Button::RightTrigger2 => Button::R2,
            gilrs::Button::RightThumb => Button::R3,
            _ => return None,
        })
    }
}

impl InputDriver for GilrsInputDriver {
    fn poll(&mut self) {
        while let Some(gilrs::Event { event, .. }) = self.gilrs.next_event() {
            match event {
                gilrs::EventType::ButtonPressed(button, _) => {
                    if let Some(button) = Self::button_from_gilrs(button) {
                        self.pressed.insert(button);
                    }
                }
                gilrs::EventType::ButtonReleased(button, _) => {
                    if let Some(button) = Self::button_from_gilrs(button) {
                        self.pressed.remove(button);
                    }
                }
                _ => {}
            }
        }
    }

    fn state(&self, _port: u32, device: u32, _index: u32, id: u32) -> i16 {
        if device != libretro_sys::DEVICE_JOYPAD {
            return 0;
        }

        if id == libretro_sys::DEVICE_ID_JOYPAD_MASK as u32 {
            return joypad_bitmask(self.pressed);
        }

        let Some(button) = Button::from_raw_retro_joypad_device_id(id) else {
            return 0;
        };

        self.pressed.contains(button) as i16
    }

    fn pressed_buttons(&self, _port: u32) -> EnumSet<Button> {
        self.pressed
    }
}

/// Declines every control; used when no input backend is configured.
#[derive(Default)]
pub struct NullInputDriver;

impl InputDriver for NullInputDriver {
    fn poll(&mut self) {}

    fn state(&self, _port: u32, _device: u32, _index: u32, _id: u32) -> i16 {
        0
    }

    fn pressed_buttons(&self, _port: u32) -> EnumSet<Button> {
        EnumSet::empty()
    }

    fn supports_bitmasks(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joypad_bitmask_packs_a_and_start() {
        let pressed = Button::A | Button::Start;
        let mask = joypad_bitmask(pressed);

        assert_eq!(mask as u16, (1u16 << 8) | (1u16 << 3));
        assert_eq!(mask, 264);
    }
}
