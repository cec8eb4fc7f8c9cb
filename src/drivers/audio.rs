use std::sync::mpsc::{Receiver, SyncSender};
use std::sync::Arc;
use std::time::Duration;
use std::vec;

use parking_lot::RwLock;

/// Receives audio samples pushed by the core. `sample_batch` returns the
/// number of frames it actually consumed, per the libretro contract for
/// `retro_audio_sample_batch_t`.
pub trait AudioDriver: Send {
    fn sample(&mut self, left: i16, right: i16);
    fn sample_batch(&mut self, frames: &[i16]) -> usize;

    /// `SET_MINIMUM_AUDIO_LATENCY`; accepted but non-binding by default.
    fn set_minimum_latency(&mut self, _latency_ms: u32) {}
}

/// Minimal default: forwards interleaved stereo frames to a bounded
/// channel a `rodio::Source` on another thread drains. Mirrors the
/// teacher's original audio-thread handoff; kept deliberately thin since
/// only the `AudioDriver` contract, not this backend's internals, is in
/// scope.
pub struct RodioAudioDriver {
    tx: SyncSender<Vec<i16>>,
    base_sample_rate: f32,
    speed_factor: Arc<RwLock<f32>>,
}

impl RodioAudioDriver {
    pub fn new(tx: SyncSender<Vec<i16>>, base_sample_rate: f32) -> Self {
        Self {
            tx,
            base_sample_rate,
            speed_factor: Arc::new(RwLock::new(1.0)),
        }
    }

    pub fn source(&self, rx: Receiver<Vec<i16>>) -> RodioSource {
        RodioSource {
            rx,
            current_frame: Vec::new().into_iter(),
            base_sample_rate: self.base_sample_rate,
            speed_factor: self.speed_factor.clone(),
        }
    }
}

impl AudioDriver for RodioAudioDriver {
    fn sample(&mut self, left: i16, right: i16) {
        let _ = self.tx.send(vec![left, right]);
    }

    fn sample_batch(&mut self, frames: &[i16]) -> usize {
        let num_frames = frames.len() / 2;
        let _ = self.tx.send(frames.to_vec());
        num_frames
    }
}

pub struct RodioSource {
    rx: Receiver<Vec<i16>>,
    current_frame: vec::IntoIter<i16>,
    base_sample_rate: f32,
    speed_factor: Arc<RwLock<f32>>,
}

impl rodio::Source for RodioSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.current_frame.len().max(1))
    }

    fn channels(&self) -> u16 {
        2
    }

    fn sample_rate(&self) -> u32 {
        (*self.speed_factor.read() * self.base_sample_rate) as u32
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

impl Iterator for RodioSource {
    type Item = i16;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(sample) = self.current_frame.next() {
            return Some(sample);
        }

        self.current_frame = self.rx.recv().ok()?.into_iter();
        self.current_frame.next()
    }
}

/// Declines everything; used when no audio backend is configured.
#[derive(Default)]
pub struct NullAudioDriver;

impl AudioDriver for NullAudioDriver {
    fn sample(&mut self, _left: i16, _right: i16) {}

    fn sample_batch(&mut self, frames: &[i16]) -> usize {
        frames.len() / 2
    }
}
