/// `GET_MICROPHONE_INTERFACE`. A core opens at most a handful of
/// microphones; the driver hands back an opaque id it can later use to
/// query state or pull samples.
pub trait MicrophoneDriver: Send {
    fn open(&mut self, rate: i32) -> Option<u32>;
    fn close(&mut self, mic: u32);
    fn set_state(&mut self, mic: u32, enabled: bool) -> bool;
    fn get_state(&mut self, mic: u32) -> bool;
    fn sample_rate(&self, mic: u32) -> Option<i32>;
    fn read(&mut self, mic: u32, buf: &mut [i16]) -> i32;
}

/// Refuses every `open`; used when no capture backend is configured.
#[derive(Default)]
pub struct NullMicrophoneDriver;

impl MicrophoneDriver for NullMicrophoneDriver {
    fn open(&mut self, _rate: i32) -> Option<u32> {
        None
    }

    fn close(&mut self, _mic: u32) {}

    fn set_state(&mut self, _mic: u32, _enabled: bool) -> bool {
        false
    }

    fn get_state(&mut self, _mic: u32) -> bool {
        false
    }

    fn sample_rate(&self, _mic: u32) -> Option<i32> {
        None
    }

    fn read(&mut self, _mic: u32, _buf: &mut [i16]) -> i32 {
        0
    }
}
