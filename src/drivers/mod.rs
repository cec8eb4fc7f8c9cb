//! Capability-typed driver contracts. Each trait here is the Rust
//! rendering of one libretro-facing interface; the `CompositeEnvironmentDriver`
//! owns at most one boxed instance of each (most are optional — a core
//! querying a capability nobody configured simply gets `false`/null back).

mod audio;
mod camera;
mod content;
mod input;
mod led;
mod location;
mod log;
mod message;
mod microphone;
mod midi;
mod options;
mod path;
mod perf;
mod power;
mod user;
mod vfs;
mod video;

pub use audio::{AudioDriver, NullAudioDriver, RodioAudioDriver};
pub use camera::{CameraDriver, CameraFrame};
pub use content::{
    ContentAttributes, ContentDriver, ContentError, LoadedContentFile, LoadedContentGuard,
    NullContentDriver,
};
pub use input::{Button, GilrsInputDriver, InputDriver, NullInputDriver};
pub use led::{LedDriver, NullLedDriver};
pub use location::{LocationDriver, LocationFix, NullLocationDriver};
pub use log::{LogDriver, LogFacadeDriver};
pub use message::{MessageInterface, OsdMessageDriver};
pub use microphone::{MicrophoneDriver, NullMicrophoneDriver};
pub use midi::{MidiDriver, NullMidiDriver};
pub use options::{CoreOption, CoreOptionValue, InMemoryOptionDriver, OptionDriver};
pub use path::{DefaultPathDriver, PathDriver};
pub use perf::{PerfDriver, StdPerfDriver};
pub use power::{DevicePower, NullPowerDriver, PowerDriver};
pub use user::{DefaultUserDriver, UserDriver};
pub use vfs::{FileSystemInterface, StdFileSystemInterface};
pub use video::{NullVideoDriver, PixelFormatExt, SoftwareFramebuffer, VideoDriver, VideoFrame};
