/// `GET_LED_INTERFACE`. `led` is a frontend-defined index; `state` is an
/// arbitrary non-negative intensity, usually treated as a boolean by cores
/// that only blink a single indicator.
pub trait LedDriver: Send {
    fn set_led_state(&mut self, led: i32, state: i32);
}

/// Drops every update; used when no LED hardware is configured.
#[derive(Default)]
pub struct NullLedDriver;

impl LedDriver for NullLedDriver {
    fn set_led_state(&mut self, _led: i32, _state: i32) {}
}
