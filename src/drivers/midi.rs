/// `GET_MIDI_INTERFACE`. Cores poll `input_enabled`/`output_enabled` before
/// touching `read`/`write`, so a driver that never wants MIDI traffic can
/// simply answer both with `false`.
pub trait MidiDriver: Send {
    fn input_enabled(&self) -> bool {
        false
    }

    fn output_enabled(&self) -> bool {
        false
    }

    fn read(&mut self) -> Option<u8> {
        None
    }

    fn write(&mut self, byte: u8, delta_time: u32) -> bool;

    fn flush(&mut self) -> bool {
        true
    }
}

/// Reports both directions disabled; used when no MIDI backend is wired up.
#[derive(Default)]
pub struct NullMidiDriver;

impl MidiDriver for NullMidiDriver {
    fn write(&mut self, _byte: u8, _delta_time: u32) -> bool {
        false
    }
}
