/// Receives `SET_MESSAGE` (legacy) and `SET_MESSAGE_EXT` notifications.
/// `GET_MESSAGE_INTERFACE_VERSION` reports 0 or 1; a version-0 driver only
/// ever sees `Legacy` messages — the dispatcher downgrades extended
/// messages before calling in.
pub trait MessageInterface: Send {
    fn interface_version(&self) -> u32 {
        0
    }

    fn show(&mut self, message: Message);
}

pub enum Message<'a> {
    Legacy { text: &'a str, frames: u32 },
    Extended {
        text: &'a str,
        duration_ms: u32,
        priority: u32,
        level: u32,
        target: u32,
        kind: u32,
        progress: i8,
    },
}

/// Prints to stderr; a real frontend would route this to an on-screen
/// display.
#[derive(Default)]
pub struct OsdMessageDriver;

impl MessageInterface for OsdMessageDriver {
    fn show(&mut self, message: Message) {
        match message {
            Message::Legacy { text, frames } => {
                log::info!("[core message, {frames} frames] {text}");
            }
            Message::Extended { text, level, .. } => {
                log::log!(log_level_from_retro(level), "[core message] {text}");
            }
        }
    }
}

fn log_level_from_retro(level: u32) -> log::Level {
    match level {
        0 => log::Level::Debug,
        1 => log::Level::Info,
        2 => log::Level::Warn,
        _ => log::Level::Error,
    }
}
