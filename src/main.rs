//! Thin CLI entry point: loads a libretro core, loads one piece of content,
//! and pumps `retro_run` on the calling thread until the core asks to
//! shut down or the process receives Ctrl-C. Driver wiring here is the
//! frontend's own choice, not part of the hosted-core contract the rest of
//! this crate implements.

use std::path::PathBuf;
use std::sync::mpsc::sync_channel;

use anyhow::{Context, Result};
use clap::Parser;
use libretro_host::drivers::{
    DefaultPathDriver, DefaultUserDriver, GilrsInputDriver, InMemoryOptionDriver, LogFacadeDriver,
    NullContentDriver, NullPowerDriver, NullVideoDriver, OsdMessageDriver, RodioAudioDriver,
    StdPerfDriver,
};
use libretro_host::environment::CompositeEnvironmentDriverArgs;
use libretro_host::session::{Content, Session};

#[derive(clap::Parser)]
#[command(about = "Host a libretro core from the command line")]
struct Cli {
    /// Path to the core's shared library.
    #[clap(long, env = "LIBRETRO_CORE")]
    core: PathBuf,

    /// Path to the content (ROM) file. Omit if the core supports running
    /// without content.
    #[clap(long, env = "LIBRETRO_CONTENT")]
    content: Option<PathBuf>,

    /// Directory the core should treat as its system directory.
    #[clap(long, env = "LIBRETRO_SYSTEM_DIR")]
    system_dir: Option<PathBuf>,

    /// Directory the core should treat as its save directory.
    #[clap(long, env = "LIBRETRO_SAVE_DIR")]
    save_dir: Option<PathBuf>,

    /// Stop after this many frames instead of running until shutdown.
    #[clap(long)]
    frames: Option<u64>,

    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    run(&cli)
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn run(cli: &Cli) -> Result<()> {
    let (_stream, stream_handle) =
        rodio::OutputStream::try_default().context("failed to open default audio output")?;

    let input = GilrsInputDriver::new().context("failed to initialize gamepad input")?;

    // The real sample rate isn't known until the core reports its AV info
    // inside `Session::load` below, so the driver is built with a
    // placeholder rate and `audio_rx` is kept around to hand to a
    // `RodioSource` built with the true rate afterwards.
    let (audio_tx, audio_rx) = sync_channel(64);
    let audio = RodioAudioDriver::new(audio_tx, 44_100.0);

    let args = CompositeEnvironmentDriverArgs {
        video: Box::new(NullVideoDriver),
        audio: Box::new(audio),
        input: Box::new(input),
        options: Box::new(InMemoryOptionDriver::default()),
        path: Box::new(DefaultPathDriver {
            core_path: cli.core.clone(),
            system_directory: cli.system_dir.clone(),
            save_directory: cli.save_dir.clone(),
            content_directory: cli.content.as_deref().and_then(|p| p.parent()).map(Into::into),
            playlist_directory: None,
        }),
        user: Box::new(DefaultUserDriver::default()),
        message: Box::new(OsdMessageDriver),
        log: Box::new(LogFacadeDriver),
        perf: Box::new(StdPerfDriver::default()),
        power: Box::new(NullPowerDriver),
        location: None,
        vfs: None,
        led: None,
        midi: None,
        microphone: None,
        camera: None,
    };

    let content = match &cli.content {
        Some(path) => Content::Game(vec![path.clone()]),
        None => Content::Game(Vec::new()),
    };

    let mut session =
        unsafe { Session::load(&cli.core, content, args, Box::new(NullContentDriver))? };

    let system_info = session.system_info().cloned();
    if let Some(info) = &system_info {
        log::info!(
            "loaded core `{}` {} (need_fullpath={}, block_extract={})",
            info.library_name,
            info.library_version,
            info.need_fullpath,
            info.block_extract
        );
    }

    let av_info = session.av_info();
    log::info!(
        "geometry {}x{} @ {:.2} fps, {:.0} Hz audio",
        av_info.geometry.base_width,
        av_info.geometry.base_height,
        av_info.timing.fps,
        av_info.timing.sample_rate
    );

    let rodio_source = RodioAudioDriver::new(sync_channel(0).0, av_info.timing.sample_rate as f32)
        .source(audio_rx);
    std::thread::spawn(move || {
        if let Err(err) = stream_handle.play_raw(rodio::Source::convert_samples(rodio_source)) {
            log::warn!("audio playback stopped: {err}");
        }
    });

    let mut frame = 0u64;
    loop {
        if let Some(limit) = cli.frames {
            if frame >= limit {
                break;
            }
        }

        session.run_one_frame()?;

        if let Some(err) = session.take_last_error() {
            log::warn!("core ABI error: {err}");
        }

        if session.shutdown_requested() {
            log::info!("core requested shutdown");
            break;
        }

        frame += 1;
    }

    log::info!("ran {frame} frames");
    session.unload().context("failed to tear down session")?;

    Ok(())
}
