/// `GET_LOCATION_INTERFACE`.
pub trait LocationDriver: Send {
    fn start(&mut self) -> bool;
    fn stop(&mut self);

    /// Latest fix, if one is available since the last poll.
    fn get_position(&mut self) -> Option<LocationFix>;

    /// Requested update interval in milliseconds and the minimum distance
    /// (meters) that should trigger an update.
    fn set_interval(&mut self, interval_ms: u32, interval_distance: u32);
}

#[derive(Debug, Clone, Copy)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    pub horizontal_accuracy: f64,
    pub vertical_accuracy: f64,
}

/// Declines every query; used when no positioning backend is configured.
#[derive(Default)]
pub struct NullLocationDriver;

impl LocationDriver for NullLocationDriver {
    fn start(&mut self) -> bool {
        false
    }

    fn stop(&mut self) {}

    fn get_position(&mut self) -> Option<LocationFix> {
        None
    }

    fn set_interval(&mut self, _interval_ms: u32, _interval_distance: u32) {}
}
