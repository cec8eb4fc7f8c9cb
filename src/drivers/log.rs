/// `GET_LOG_INTERFACE`. `level` is the raw `RETRO_LOG_*` value.
pub trait LogDriver: Send {
    fn log(&mut self, level: u32, message: &str);
}

/// Forwards into the `log` facade at the matching level, so core log
/// lines show up next to the frontend's own `log::info!`/`log::warn!`
/// output under whatever subscriber the binary installed.
#[derive(Default)]
pub struct LogFacadeDriver;

impl LogDriver for LogFacadeDriver {
    fn log(&mut self, level: u32, message: &str) {
        let level = match level {
            0 => log::Level::Debug,
            1 => log::Level::Info,
            2 => log::Level::Warn,
            _ => log::Level::Error,
        };

        log::log!(target: "libretro_core", level, "{}", message.trim_end());
    }
}
