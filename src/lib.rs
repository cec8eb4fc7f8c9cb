//! A frontend host for dynamically loaded emulator cores that conform to
//! the [libretro](https://docs.libretro.com/) C ABI: [`core::CoreHandle`]
//! loads a core's shared library and drives its lifecycle, the
//! [`environment::CompositeEnvironmentDriver`] answers every
//! `RETRO_ENVIRONMENT_*` command the core can ask through the single
//! multiplexed environment callback, and [`Session`] binds the two plus a
//! loaded content bundle into one run-to-completion unit.
//!
//! ```no_run
//! use libretro_host::drivers::{
//!     DefaultPathDriver, DefaultUserDriver, InMemoryOptionDriver, LogFacadeDriver,
//!     NullAudioDriver, NullContentDriver, NullInputDriver, NullPowerDriver, NullVideoDriver,
//!     OsdMessageDriver, StdPerfDriver,
//! };
//! use libretro_host::environment::CompositeEnvironmentDriverArgs;
//! use libretro_host::session::{Content, Session};
//!
//! # fn main() -> anyhow::Result<()> {
//! let args = CompositeEnvironmentDriverArgs {
//!     video: Box::new(NullVideoDriver),
//!     audio: Box::new(NullAudioDriver),
//!     input: Box::new(NullInputDriver),
//!     options: Box::new(InMemoryOptionDriver::default()),
//!     path: Box::new(DefaultPathDriver {
//!         core_path: "core.so".into(),
//!         system_directory: None,
//!         save_directory: None,
//!         content_directory: None,
//!         playlist_directory: None,
//!     }),
//!     user: Box::new(DefaultUserDriver::default()),
//!     message: Box::new(OsdMessageDriver),
//!     log: Box::new(LogFacadeDriver),
//!     perf: Box::new(StdPerfDriver::default()),
//!     power: Box::new(NullPowerDriver),
//!     location: None,
//!     vfs: None,
//!     led: None,
//!     midi: None,
//!     microphone: None,
//!     camera: None,
//! };
//!
//! let mut session = unsafe {
//!     Session::load(
//!         "core.so",
//!         Content::Game(vec!["game.rom".into()]),
//!         args,
//!         Box::new(NullContentDriver),
//!     )?
//! };
//!
//! session.run_one_frame()?;
//! # Ok(())
//! # }
//! ```

pub mod abi;
pub mod command;
pub mod core;
pub mod drivers;
pub mod environment;
pub mod error;
pub mod session;

pub use error::SessionError;
pub use session::{Content, Session};
