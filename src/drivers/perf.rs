use std::cell::Cell;
use std::time::Instant;

/// `GET_PERF_INTERFACE`: coarse wall-clock counters and CPU feature
/// reporting. Cores mostly use this for optional self-profiling, so the
/// default backend keeps it simple rather than exposing real SIMD
/// detection.
///
/// Timing itself lives in the core-owned `retro_perf_counter` struct (the
/// trampolines in `environment.rs` read/write its `start`/`total`/
/// `call_cnt` fields directly, per the libretro ABI); these methods exist
/// so a driver can observe registration/start/stop for its own logging.
pub trait PerfDriver: Send {
    fn register_counter(&mut self, name: &str);
    fn start_counter(&mut self, name: &str);
    /// Called once a counter stops, with the totals already accumulated
    /// in the core-owned struct.
    fn stop_counter(&mut self, name: &str, total_usec: u64, call_count: u64);
    fn log_counters(&self);
    fn cpu_features(&self) -> u64 {
        0
    }
    fn time_usec(&self) -> i64;
}

pub struct StdPerfDriver {
    counters: Vec<(String, u64, u64)>,
    start: Cell<Option<Instant>>,
}

impl Default for StdPerfDriver {
    fn default() -> Self {
        Self {
            counters: Vec::new(),
            start: Cell::new(None),
        }
    }
}

impl StdPerfDriver {
    fn entry(&mut self, name: &str) -> &mut (String, u64, u64) {
        if let Some(index) = self.counters.iter().position(|(n, ..)| n == name) {
            return &mut self.counters[index];
        }
        self.counters.push((name.to_owned(), 0, 0));
        self.counters.last_mut().expect("just pushed")
    }
}

impl PerfDriver for StdPerfDriver {
    fn register_counter(&mut self, name: &str) {
        self.entry(name);
    }

    fn start_counter(&mut self, name: &str) {
        log::trace!("perf counter `{name}` started");
    }

    fn stop_counter(&mut self, name: &str, total_usec: u64, call_count: u64) {
        let entry = self.entry(name);
        entry.1 = total_usec;
        entry.2 = call_count;
    }

    fn log_counters(&self) {
        for (name, total_usec, call_count) in &self.counters {
            log::debug!("perf counter `{name}`: {total_usec}us over {call_count} calls");
        }
    }

    fn time_usec(&self) -> i64 {
        let start = match self.start.get() {
            Some(start) => start,
            None => {
                let now = Instant::now();
                self.start.set(Some(now));
                now
            }
        };

        start.elapsed().as_micros() as i64
    }
}
