//! The Composite Environment Driver: the one object a loaded core actually
//! talks to through the five fixed `retro_set_*_cb` callbacks and the
//! catch-all `environment` multiplexer. Every capability (`VideoDriver`,
//! `AudioDriver`, `OptionDriver`, ...) composes into this single struct, and
//! [`CompositeEnvironmentDriver::dispatch`] is the one place the ~80
//! `RETRO_ENVIRONMENT_*` command IDs are interpreted.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::{c_char, c_uint};
use std::path::{Path, PathBuf};
use std::ptr;
use std::slice;

use libretro_sys::{GameGeometry, PixelFormat, SystemAvInfo, SystemTiming};

use crate::abi::{
    self, ControllerDescription, ControllerPortInfo, ContentInfoOverride, InputDescriptor,
    RetroAudioBufferStatusCallback, RetroAudioCallback, RetroCoreOptionDefinition,
    RetroCoreOptionDisplay, RetroCoreOptionV2Category, RetroCoreOptionV2Definition,
    RetroCoreOptionsIntl, RetroCoreOptionsUpdateDisplayCallback, RetroCoreOptionsV2,
    RetroCoreOptionsV2Intl, RetroControllerInfo, RetroDiskControlCallback, RetroDiskControlExtCallback,
    RetroFastforwardingOverride, RetroFrameTimeCallback, RetroGameInfoExt, RetroGetProcAddressInterface,
    RetroHwRenderCallback, RetroKeyboardCallback, RetroMessageExt, RetroNetpacketCallback,
    RetroSubsystemInfo, RetroSubsystemRomInfo, RetroSystemContentInfoOverride,
    RetroThrottleState, RetroVariable, SavestateContext, SubsystemInfo, SubsystemRomInfo,
};
use crate::command::{self, Command};
use crate::core::MemoryMap;
use crate::drivers::{
    AudioDriver, CameraDriver, CoreOption, CoreOptionValue, FileSystemInterface,
    InputDriver, LedDriver, LoadedContentFile, LocationDriver, LogDriver, Message, MessageInterface,
    MicrophoneDriver, MidiDriver, OptionDriver, PathDriver, PerfDriver, PixelFormatExt, PowerDriver,
    SoftwareFramebuffer, UserDriver, VideoDriver, VideoFrame,
};

/// Highest `SET_CORE_OPTIONS*` wire version this frontend understands.
/// Reported by `GET_CORE_OPTIONS_VERSION` unconditionally — a core queries
/// this *before* it has submitted any options table, so the answer can't
/// depend on what (if anything) has been submitted so far.
const CORE_OPTIONS_VERSION: u32 = 2;

/// Everything needed to build a [`CompositeEnvironmentDriver`]. Every
/// capability is boxed; fields with no sensible default take `Null*`
/// implementations (`crate::drivers::Null*Driver`) at the call site rather
/// than inside this struct, so constructing one always names every choice
/// explicitly.
pub struct CompositeEnvironmentDriverArgs {
    pub video: Box<dyn VideoDriver>,
    pub audio: Box<dyn AudioDriver>,
    pub input: Box<dyn InputDriver>,
    pub options: Box<dyn OptionDriver>,
    pub path: Box<dyn PathDriver>,
    pub user: Box<dyn UserDriver>,
    pub message: Box<dyn MessageInterface>,
    pub log: Box<dyn LogDriver>,
    pub perf: Box<dyn PerfDriver>,
    pub power: Box<dyn PowerDriver>,
    pub location: Option<Box<dyn LocationDriver>>,
    pub vfs: Option<Box<dyn FileSystemInterface>>,
    pub led: Option<Box<dyn LedDriver>>,
    pub midi: Option<Box<dyn MidiDriver>>,
    pub microphone: Option<Box<dyn MicrophoneDriver>>,
    pub camera: Option<Box<dyn CameraDriver>>,
}

pub struct CompositeEnvironmentDriver {
    video: Box<dyn VideoDriver>,
    audio: Box<dyn AudioDriver>,
    input: Box<dyn InputDriver>,
    options: Box<dyn OptionDriver>,
    path: Box<dyn PathDriver>,
    user: Box<dyn UserDriver>,
    message: Box<dyn MessageInterface>,
    log: Box<dyn LogDriver>,
    perf: Box<dyn PerfDriver>,
    power: Box<dyn PowerDriver>,
    location: Option<Box<dyn LocationDriver>>,
    vfs: Option<Box<dyn FileSystemInterface>>,
    led: Option<Box<dyn LedDriver>>,
    midi: Option<Box<dyn MidiDriver>>,
    microphone: Option<Box<dyn MicrophoneDriver>>,
    camera: Option<Box<dyn CameraDriver>>,
    camera_dimensions: (u32, u32),

    pixel_format: PixelFormat,
    rotation: u32,
    performance_level: u32,
    support_no_game: bool,
    av_info: SystemAvInfo,
    target_refresh_rate: f32,

    input_descriptors: Vec<InputDescriptor>,
    controller_ports: Vec<ControllerPortInfo>,
    subsystem_info: Vec<SubsystemInfo>,
    content_info_overrides: Vec<ContentInfoOverride>,
    memory_maps: MemoryMap,

    serialization_quirks: u64,
    av_enable_mask: u32,
    savestate_context: SavestateContext,
    fastforwarding: bool,
    fastforwarding_override: Option<(f32, bool)>,
    throttle_state: (u32, f32),
    jit_capable: bool,
    achievements_supported: bool,

    hw_render: Option<RetroHwRenderCallback>,
    hw_render_context_negotiation_set: bool,
    hw_shared_context: bool,
    /// Set once `retro_run` has completed at least once since the last
    /// `SET_SYSTEM_AV_INFO`. `SET_PIXEL_FORMAT` is rejected while this is
    /// set, per the invariant that pixel format is frozen after the first
    /// frame unless AV negotiation is explicitly restarted.
    frame_ran: bool,
    disk_control: Option<RetroDiskControlCallback>,
    disk_control_ext: Option<RetroDiskControlExtCallback>,
    audio_callback: Option<RetroAudioCallback>,
    audio_buffer_status_callback: Option<RetroAudioBufferStatusCallback>,
    minimum_audio_latency: u32,
    frame_time_callback: Option<RetroFrameTimeCallback>,
    keyboard_callback: Option<RetroKeyboardCallback>,
    proc_address_callback: Option<RetroGetProcAddressInterface>,
    netpacket_interface: Option<RetroNetpacketCallback>,
    core_options_update_display_callback: Option<abi::RetroCoreOptionsUpdateDisplayCallbackT>,

    shutdown_requested: bool,
    last_error: Option<String>,

    // Pointer-stable caches: the ABI requires these stay valid until the
    // underlying value changes, not merely for the duration of one call.
    system_directory_cache: Option<CString>,
    save_directory_cache: Option<CString>,
    content_directory_cache: Option<CString>,
    playlist_directory_cache: Option<CString>,
    libretro_path_cache: Option<CString>,
    username_cache: Option<CString>,

    game_info_ext: Option<GameInfoExtCache>,
    game_info_ext_raw: Option<RetroGameInfoExt>,

    /// `retro_vfs_get_path` output cache: a handle's path borrows from the
    /// `FileSystemInterface`'s own storage, so it is copied into a `CString`
    /// here the first time a handle is queried, stable until the handle
    /// closes.
    vfs_path_cache: std::collections::HashMap<u64, CString>,
}

struct GameInfoExtCache {
    full_path: Option<CString>,
    dir: Option<CString>,
    name: Option<CString>,
    ext: Option<CString>,
    data: Option<Vec<u8>>,
    persistent_data: bool,
}

impl CompositeEnvironmentDriver {
    pub fn new(args: CompositeEnvironmentDriverArgs) -> Self {
        Self {
            video: args.video,
            audio: args.audio,
            input: args.input,
            options: args.options,
            path: args.path,
            user: args.user,
            message: args.message,
            log: args.log,
            perf: args.perf,
            power: args.power,
            location: args.location,
            vfs: args.vfs,
            led: args.led,
            midi: args.midi,
            microphone: args.microphone,
            camera: args.camera,
            camera_dimensions: (0, 0),

            pixel_format: PixelFormat::ARGB1555,
            rotation: 0,
            performance_level: 0,
            support_no_game: false,
            av_info: SystemAvInfo {
                geometry: GameGeometry {
                    aspect_ratio: f32::NAN,
                    base_width: 0,
                    base_height: 0,
                    max_width: 0,
                    max_height: 0,
                },
                timing: SystemTiming {
                    fps: 60.0,
                    sample_rate: 44_100.0,
                },
            },
            target_refresh_rate: 60.0,

            input_descriptors: Vec::new(),
            controller_ports: Vec::new(),
            subsystem_info: Vec::new(),
            content_info_overrides: Vec::new(),
            memory_maps: MemoryMap::empty(),

            serialization_quirks: 0,
            av_enable_mask: abi::RETRO_AV_ENABLE_VIDEO | abi::RETRO_AV_ENABLE_AUDIO,
            savestate_context: SavestateContext::Normal,
            fastforwarding: false,
            fastforwarding_override: None,
            throttle_state: (abi::RETRO_THROTTLE_NONE, 1.0),
            jit_capable: true,
            achievements_supported: false,

            hw_render: None,
            hw_render_context_negotiation_set: false,
            hw_shared_context: false,
            frame_ran: false,
            disk_control: None,
            disk_control_ext: None,
            audio_callback: None,
            audio_buffer_status_callback: None,
            minimum_audio_latency: 0,
            frame_time_callback: None,
            keyboard_callback: None,
            proc_address_callback: None,
            netpacket_interface: None,
            core_options_update_display_callback: None,

            shutdown_requested: false,
            last_error: None,

            system_directory_cache: None,
            save_directory_cache: None,
            content_directory_cache: None,
            playlist_directory_cache: None,
            libretro_path_cache: None,
            username_cache: None,

            game_info_ext: None,
            game_info_ext_raw: None,

            vfs_path_cache: std::collections::HashMap::new(),
        }
    }

    /// `retro_vfs_get_path` support: returns a pointer stable until `handle`
    /// closes, caching the conversion from the driver's borrowed `&Path`.
    fn vfs_path_ptr(&mut self, handle: u64) -> Option<*const c_char> {
        if !self.vfs_path_cache.contains_key(&handle) {
            let path = self.vfs.as_ref()?.path(handle)?;
            self.vfs_path_cache.insert(handle, cstring_from_path(path));
        }

        self.vfs_path_cache.get(&handle).map(|c| c.as_ptr())
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn video_refresh(&mut self, frame: Option<VideoFrame>) {
        self.video.refresh(frame);
    }

    pub fn audio_sample(&mut self, left: i16, right: i16) {
        self.audio.sample(left, right);
    }

    pub fn audio_sample_batch(&mut self, frames: &[i16]) -> usize {
        self.audio.sample_batch(frames)
    }

    pub fn input_poll(&mut self) {
        self.input.poll();
    }

    pub fn input_state(&self, port: c_uint, device: c_uint, index: c_uint, id: c_uint) -> i16 {
        self.input.state(port, device, index, id)
    }

    pub fn av_info(&self) -> SystemAvInfo {
        self.av_info
    }

    pub fn set_av_info(&mut self, info: SystemAvInfo) {
        self.av_info = info;
        self.target_refresh_rate = info.timing.fps as f32;
        // Restarts AV negotiation: a core that follows this up with a
        // fresh SET_PIXEL_FORMAT is re-negotiating from scratch.
        self.frame_ran = false;
    }

    /// Called once per completed `retro_run`, so a later `SET_PIXEL_FORMAT`
    /// can be rejected per §3's "pixel format is frozen after the first
    /// frame" invariant.
    pub fn note_frame_ran(&mut self) {
        self.frame_ran = true;
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    pub fn take_last_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    pub fn disk_control(&self) -> Option<&RetroDiskControlCallback> {
        self.disk_control.as_ref()
    }

    pub fn disk_control_ext(&self) -> Option<&RetroDiskControlExtCallback> {
        self.disk_control_ext.as_ref()
    }

    pub fn memory_maps(&self) -> &MemoryMap {
        &self.memory_maps
    }

    pub fn support_no_game(&self) -> bool {
        self.support_no_game
    }

    pub fn content_info_overrides(&self) -> &[ContentInfoOverride] {
        &self.content_info_overrides
    }

    /// Caches the content that was just loaded so a later `GET_GAME_INFO_EXT`
    /// has somewhere stable to point into. Called by `Session` right after
    /// `retro_load_game` succeeds.
    pub fn set_loaded_content(&mut self, file: Option<&LoadedContentFile>) {
        let Some(file) = file else {
            self.game_info_ext = None;
            return;
        };

        let full_path = file.path.as_deref().map(cstring_from_path);
        let dir = file
            .path
            .as_deref()
            .and_then(Path::parent)
            .map(cstring_from_path);
        let name = file
            .path
            .as_deref()
            .and_then(|p| p.file_stem())
            .map(|s| CString::new(s.to_string_lossy().into_owned()).unwrap_or_default());
        let ext = file
            .path
            .as_deref()
            .and_then(|p| p.extension())
            .map(|s| CString::new(s.to_string_lossy().into_owned()).unwrap_or_default());

        self.game_info_ext = Some(GameInfoExtCache {
            full_path,
            dir,
            name,
            ext,
            data: file.data.clone(),
            persistent_data: file.persistent,
        });
    }

    /// Entry point for the `environment` trampoline: `command` is the raw
    /// `RETRO_ENVIRONMENT_*` value (EXPERIMENTAL/PRIVATE bits included, same
    /// as libretro hands it to a core's `retro_environment_t`).
    ///
    /// # Safety
    /// `data` must point at the argument type the libretro header declares
    /// for `command`, valid for the duration of this call (and, for output
    /// parameters the ABI documents as staying valid past the call, until
    /// the corresponding value is replaced).
    pub unsafe fn dispatch(&mut self, command: u32, data: *mut c_void) -> bool {
        let Some(command) = command::decode(command) else {
            log::debug!("unhandled retro_environment command `{command:#x}`");
            return false;
        };

        match command {
            Command::SetRotation => {
                let Some(value) = read(data) else { return false };
                self.rotation = value;
                true
            }
            Command::GetOverscan => {
                if !data.is_null() {
                    write(data, false);
                }
                true
            }
            Command::GetCanDupe => {
                write(data, self.video.can_dupe_frames());
                true
            }
            Command::SetMessage => {
                let Some(message) = (data as *const libretro_sys::Message).as_ref() else {
                    return false;
                };
                let Some(text) = cstr_to_str(message.msg) else {
                    return false;
                };
                self.message.show(Message::Legacy {
                    text,
                    frames: message.frames,
                });
                true
            }
            Command::Shutdown => {
                self.shutdown_requested = true;
                true
            }
            Command::SetPerformanceLevel => {
                let Some(value) = read(data) else { return false };
                self.performance_level = value;
                true
            }
            Command::GetSystemDirectory => {
                write_cached_path(data, self.path.system_directory(), &mut self.system_directory_cache)
            }
            Command::SetPixelFormat => {
                let Some(raw) = read::<c_uint>(data) else { return false };
                let Some(format) = PixelFormat::from_wire_value(raw) else {
                    return false;
                };
                if self.frame_ran {
                    log::warn!("core attempted SET_PIXEL_FORMAT after the first retro_run without SET_SYSTEM_AV_INFO; ignoring");
                    return false;
                }
                self.pixel_format = format;
                true
            }
            Command::SetInputDescriptors => {
                self.input_descriptors = parse_input_descriptors(data as *const abi::RetroInputDescriptor);
                true
            }
            Command::SetKeyboardCallback => {
                self.keyboard_callback = read_struct::<RetroKeyboardCallback>(data);
                true
            }
            Command::SetDiskControlInterface => {
                self.disk_control = read_struct::<RetroDiskControlCallback>(data);
                true
            }
            Command::SetHwRender => {
                let callback = read_struct::<RetroHwRenderCallback>(data);
                let accepted = callback.is_some();
                self.hw_render = callback;
                accepted
            }
            Command::GetVariable => {
                let Some(variable) = (data as *mut RetroVariable).as_mut() else {
                    return false;
                };
                let Some(key) = cstr_to_str(variable.key) else {
                    return false;
                };

                match self.options.get_ptr(key) {
                    Some(ptr) => {
                        variable.value = ptr;
                        true
                    }
                    None => {
                        variable.value = ptr::null();
                        false
                    }
                }
            }
            Command::SetVariables => {
                let options = parse_legacy_variables(data as *const RetroVariable);
                self.options.set_options(0, options);
                true
            }
            Command::GetVariableUpdate => {
                write(data, self.options.take_dirty());
                true
            }
            Command::SetSupportNoGame => {
                let Some(value) = read::<bool>(data) else { return false };
                self.support_no_game = value;
                true
            }
            Command::GetLibretroPath => {
                write_cached_path(data, self.path.core_path(), &mut self.libretro_path_cache)
            }
            Command::SetFrameTimeCallback => {
                self.frame_time_callback = read_struct::<RetroFrameTimeCallback>(data);
                true
            }
            Command::SetAudioCallback => {
                self.audio_callback = read_struct::<RetroAudioCallback>(data);
                true
            }
            Command::GetRumbleInterface => {
                write_struct(
                    data,
                    abi::RetroRumbleInterface {
                        set_rumble_state: Some(trampolines::set_rumble_state),
                    },
                );
                true
            }
            Command::GetInputDeviceCapabilities => {
                write(data, self.input.device_capabilities());
                true
            }
            Command::GetSensorInterface => {
                write_struct(
                    data,
                    abi::RetroSensorInterface {
                        set_sensor_state: Some(trampolines::set_sensor_state),
                        get_sensor_input: Some(trampolines::get_sensor_input),
                    },
                );
                true
            }
            Command::GetCameraInterface => {
                let Some(camera) = self.camera.as_deref() else {
                    return false;
                };
                let requested = (data as *mut abi::RetroCameraCallback).as_mut();
                let Some(requested) = requested else { return false };

                if requested.caps & camera.supported_buffer_types() == 0 {
                    return false;
                }

                self.camera_dimensions = (requested.width.max(0) as u32, requested.height.max(0) as u32);
                requested.start = Some(trampolines::camera_start);
                requested.stop = Some(trampolines::camera_stop);
                true
            }
            Command::GetLogInterface => {
                // `retro_log_printf_t` is C-variadic; stable Rust cannot
                // author the callback body, so this capability is declined
                // rather than faked. Cores fall back to their own stderr
                // logging, which still reaches the terminal.
                false
            }
            Command::GetPerfInterface => {
                write_struct(
                    data,
                    abi::RetroPerfCallback {
                        get_time_usec: Some(trampolines::perf_get_time_usec),
                        get_cpu_features: Some(trampolines::perf_get_cpu_features),
                        get_perf_counter: Some(trampolines::perf_get_counter),
                        perf_register: Some(trampolines::perf_register),
                        perf_start: Some(trampolines::perf_start),
                        perf_stop: Some(trampolines::perf_stop),
                        perf_log: Some(trampolines::perf_log),
                    },
                );
                true
            }
            Command::GetLocationInterface => {
                if self.location.is_none() {
                    return false;
                }
                write_struct(
                    data,
                    abi::RetroLocationCallback {
                        start: Some(trampolines::location_start),
                        stop: Some(trampolines::location_stop),
                        get_position: Some(trampolines::location_get_position),
                        set_interval: Some(trampolines::location_set_interval),
                        initialized: None,
                        deinitialized: None,
                    },
                );
                true
            }
            Command::GetContentDirectory => {
                write_cached_path(data, self.path.content_directory(), &mut self.content_directory_cache)
            }
            Command::GetSaveDirectory => {
                write_cached_path(data, self.path.save_directory(), &mut self.save_directory_cache)
            }
            Command::SetSystemAvInfo => {
                let Some(info) = read::<SystemAvInfo>(data) else {
                    return false;
                };
                self.set_av_info(info);
                true
            }
            Command::SetProcAddressCallback => {
                self.proc_address_callback = read_struct::<RetroGetProcAddressInterface>(data);
                true
            }
            Command::SetSubsystemInfo => {
                self.subsystem_info = parse_subsystem_info(data as *const RetroSubsystemInfo);
                true
            }
            Command::SetControllerInfo => {
                self.controller_ports = parse_controller_info(data as *const RetroControllerInfo);
                true
            }
            Command::SetMemoryMaps => {
                self.memory_maps = MemoryMap::from_raw(data as *const libretro_sys::MemoryMap);
                true
            }
            Command::SetGeometry => {
                let Some(geometry) = read::<GameGeometry>(data) else {
                    return false;
                };
                self.av_info.geometry = geometry;
                true
            }
            Command::GetUsername => match self.user.username() {
                Some(name) => {
                    let cached = self
                        .username_cache
                        .insert(CString::new(name).unwrap_or_default());
                    write(data, cached.as_ptr());
                    true
                }
                None => false,
            },
            Command::GetLanguage => {
                write(data, self.user.language());
                true
            }
            Command::GetCurrentSoftwareFramebuffer => {
                let Some(fb) = (data as *mut abi::RetroFramebuffer).as_mut() else {
                    return false;
                };
                match self.video.current_software_framebuffer(fb.width, fb.height) {
                    Some(SoftwareFramebuffer {
                        data,
                        pitch,
                        format,
                        memory_flags,
                    }) => {
                        fb.data = data;
                        fb.pitch = pitch;
                        fb.format = format;
                        fb.memory_flags = memory_flags;
                        true
                    }
                    None => false,
                }
            }
            Command::GetHwRenderInterface => match self.video.hw_render_interface() {
                Some(ptr) => {
                    write(data, ptr.cast_const());
                    true
                }
                None => false,
            },
            Command::SetSupportAchievements => {
                let Some(value) = read::<bool>(data) else { return false };
                self.achievements_supported = value;
                true
            }
            Command::SetHwRenderContextNegotiationInterface => {
                self.hw_render_context_negotiation_set = !data.is_null();
                true
            }
            Command::SetSerializationQuirks => {
                let Some(quirks) = read::<u64>(data) else { return false };
                self.serialization_quirks = quirks;
                true
            }
            Command::SetHwSharedContext => {
                self.hw_shared_context = true;
                true
            }
            Command::GetVfsInterface => {
                if self.vfs.is_none() {
                    return false;
                }
                let Some(info) = (data as *mut abi::RetroVfsInterfaceInfo).as_mut() else {
                    return false;
                };
                let Some(iface) = info.iface.as_mut() else {
                    return false;
                };

                info.required_interface_version = info.required_interface_version.min(2);
                *iface = abi::RetroVfsInterface {
                    get_path: Some(trampolines::vfs_get_path),
                    open: Some(trampolines::vfs_open),
                    close: Some(trampolines::vfs_close),
                    size: Some(trampolines::vfs_size),
                    truncate: Some(trampolines::vfs_truncate),
                    tell: Some(trampolines::vfs_tell),
                    seek: Some(trampolines::vfs_seek),
                    read: Some(trampolines::vfs_read),
                    write: Some(trampolines::vfs_write),
                    flush: Some(trampolines::vfs_flush),
                    remove: Some(trampolines::vfs_remove),
                    rename: Some(trampolines::vfs_rename),
                    mkdir: Some(trampolines::vfs_mkdir),
                };
                true
            }
            Command::GetLedInterface => {
                if self.led.is_none() {
                    return false;
                }
                write_struct(
                    data,
                    abi::RetroLedInterface {
                        set_led_state: Some(trampolines::set_led_state),
                    },
                );
                true
            }
            Command::GetAudioVideoEnable => {
                write(data, self.av_enable_mask as i32);
                true
            }
            Command::GetMidiInterface => {
                if self.midi.is_none() {
                    return false;
                }
                write_struct(
                    data,
                    abi::RetroMidiInterface {
                        input_enabled: Some(trampolines::midi_input_enabled),
                        output_enabled: Some(trampolines::midi_output_enabled),
                        read: Some(trampolines::midi_read),
                        write: Some(trampolines::midi_write),
                        flush: Some(trampolines::midi_flush),
                    },
                );
                true
            }
            Command::GetFastforwarding => {
                write(data, self.fastforwarding);
                true
            }
            Command::GetTargetRefreshRate => {
                write(data, self.target_refresh_rate);
                true
            }
            Command::GetInputBitmasks => self.input.supports_bitmasks(),
            Command::GetCoreOptionsVersion => {
                write(data, CORE_OPTIONS_VERSION);
                true
            }
            Command::SetCoreOptions => {
                let options = parse_core_options_v1(data as *const RetroCoreOptionDefinition);
                self.options.set_options(1, options);
                true
            }
            Command::SetCoreOptionsIntl => {
                let Some(intl) = (data as *const RetroCoreOptionsIntl).as_ref() else {
                    return false;
                };
                let options = parse_core_options_v1(intl.us);
                self.options.set_options(1, options);
                true
            }
            Command::SetCoreOptionsDisplay => {
                let Some(display) = (data as *const RetroCoreOptionDisplay).as_ref() else {
                    return false;
                };
                let Some(key) = cstr_to_str(display.key) else {
                    return false;
                };
                self.options.set_display(key, display.visible);
                true
            }
            Command::GetPreferredHwRender => match self.video.preferred_hw_render() {
                Some(value) => {
                    write(data, value);
                    true
                }
                None => false,
            },
            Command::GetDiskControlInterfaceVersion => {
                write(data, 1u32);
                true
            }
            Command::SetDiskControlExtInterface => {
                self.disk_control_ext = read_struct::<RetroDiskControlExtCallback>(data);
                true
            }
            Command::GetMessageInterfaceVersion => {
                write(data, self.message.interface_version());
                true
            }
            Command::SetMessageExt => {
                let Some(message) = (data as *const RetroMessageExt).as_ref() else {
                    return false;
                };
                let Some(text) = cstr_to_str(message.msg) else {
                    return false;
                };

                if message.target == abi::MessageTarget::Log as u32 {
                    self.log.log(message.level, text);
                } else if self.message.interface_version() >= 1 {
                    self.message.show(Message::Extended {
                        text,
                        duration_ms: message.duration,
                        priority: message.priority,
                        level: message.level,
                        target: message.target,
                        kind: message.kind,
                        progress: message.progress,
                    });
                } else {
                    self.message.show(Message::Legacy {
                        text,
                        frames: ms_to_frames(message.duration),
                    });
                }
                true
            }
            Command::GetInputMaxUsers => {
                write(data, self.input.max_users());
                true
            }
            Command::SetAudioBufferStatusCallback => {
                self.audio_buffer_status_callback = read_struct::<RetroAudioBufferStatusCallback>(data);
                true
            }
            Command::SetMinimumAudioLatency => {
                let Some(value) = read::<c_uint>(data) else { return false };
                self.minimum_audio_latency = value;
                self.audio.set_minimum_latency(value);
                true
            }
            Command::SetFastforwardingOverride => {
                let Some(over) = read::<RetroFastforwardingOverride>(data) else {
                    return false;
                };
                self.fastforwarding = over.fastforward;
                self.fastforwarding_override = Some((over.ratio, over.notification));
                true
            }
            Command::SetContentInfoOverride => {
                self.content_info_overrides =
                    parse_content_info_overrides(data as *const RetroSystemContentInfoOverride);
                true
            }
            Command::GetGameInfoExt => {
                let Some(cache) = self.game_info_ext.as_ref() else {
                    return false;
                };
                let out = data as *mut *const RetroGameInfoExt;
                if out.is_null() {
                    return false;
                }

                let raw = RetroGameInfoExt {
                    full_path: cache.full_path.as_ref().map_or(ptr::null(), |s| s.as_ptr()),
                    archive_path: ptr::null(),
                    archive_file: ptr::null(),
                    dir: cache.dir.as_ref().map_or(ptr::null(), |s| s.as_ptr()),
                    name: cache.name.as_ref().map_or(ptr::null(), |s| s.as_ptr()),
                    ext: cache.ext.as_ref().map_or(ptr::null(), |s| s.as_ptr()),
                    meta: ptr::null(),
                    data: cache
                        .data
                        .as_ref()
                        .map_or(ptr::null(), |d| d.as_ptr().cast::<c_void>()),
                    size: cache.data.as_ref().map_or(0, Vec::len),
                    file_in_archive: false,
                    persistent_data: cache.persistent_data,
                };

                let stored = self.game_info_ext_raw.insert(raw);
                *out = stored as *const RetroGameInfoExt;
                true
            }
            Command::SetCoreOptionsV2 => {
                let Some(v2) = (data as *const RetroCoreOptionsV2).as_ref() else {
                    return false;
                };
                let options = parse_core_options_v2(v2.categories, v2.definitions);
                self.options.set_options(2, options);
                true
            }
            Command::SetCoreOptionsV2Intl => {
                let Some(intl) = (data as *const RetroCoreOptionsV2Intl).as_ref() else {
                    return false;
                };
                let Some(us) = intl.us.as_ref() else { return false };
                let options = parse_core_options_v2(us.categories, us.definitions);
                self.options.set_options(2, options);
                true
            }
            Command::SetCoreOptionsUpdateDisplayCallback => {
                let Some(callback) = (data as *const RetroCoreOptionsUpdateDisplayCallback).as_ref() else {
                    return false;
                };
                self.core_options_update_display_callback = callback.callback;
                true
            }
            Command::SetVariable => {
                let Some(variable) = (data as *const RetroVariable).as_ref() else {
                    return false;
                };
                let Some(key) = cstr_to_str(variable.key) else {
                    return false;
                };
                let Some(value) = cstr_to_str(variable.value) else {
                    return false;
                };
                self.options.set(key, value)
            }
            Command::GetThrottleState => {
                let (mode, rate) = self.throttle_state;
                write(data, RetroThrottleState { mode, rate });
                true
            }
            Command::GetSavestateContext => {
                write(data, self.savestate_context as i32);
                true
            }
            Command::GetHwRenderContextNegotiationInterfaceSupport => false,
            Command::GetJitCapable => {
                write(data, self.jit_capable);
                true
            }
            Command::GetMicrophoneInterface => {
                if self.microphone.is_none() {
                    return false;
                }
                write_struct(
                    data,
                    abi::RetroMicrophoneInterface {
                        interface_version: abi::RETRO_MICROPHONE_INTERFACE_VERSION,
                        open_mic: Some(trampolines::microphone_open),
                        close_mic: Some(trampolines::microphone_close),
                        set_mic_state: Some(trampolines::microphone_set_state),
                        get_mic_state: Some(trampolines::microphone_get_state),
                        get_params: Some(trampolines::microphone_get_params),
                        read_mic: Some(trampolines::microphone_read),
                    },
                );
                true
            }
            Command::SetNetpacketInterface => {
                self.netpacket_interface = read_struct::<RetroNetpacketCallback>(data);
                true
            }
            Command::GetDevicePower => match self.power.device_power() {
                Some(power) => {
                    write(
                        data,
                        abi::RetroDevicePower {
                            state: power.state as i32,
                            seconds: power.seconds.map_or(-1, |s| s as i32),
                            percent: power.percent.map_or(-1, |p| p as i8),
                        },
                    );
                    true
                }
                None => false,
            },
            Command::GetPlaylistDirectory => {
                write_cached_path(data, self.path.playlist_directory(), &mut self.playlist_directory_cache)
            }
        }
    }
}

fn ms_to_frames(duration_ms: u32) -> u32 {
    ((duration_ms as f64 / 1000.0) * 60.0).round() as u32
}

fn cstring_from_path(path: &Path) -> CString {
    CString::new(path.to_string_lossy().into_owned()).unwrap_or_default()
}

unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        None
    } else {
        CStr::from_ptr(ptr).to_str().ok()
    }
}

unsafe fn read<T: Copy>(data: *mut c_void) -> Option<T> {
    if data.is_null() {
        None
    } else {
        Some(*data.cast::<T>())
    }
}

unsafe fn read_struct<T: Copy>(data: *mut c_void) -> Option<T> {
    if data.is_null() {
        None
    } else {
        Some(*data.cast::<T>())
    }
}

unsafe fn write<T>(data: *mut c_void, value: T) {
    if !data.is_null() {
        *data.cast::<T>() = value;
    }
}

unsafe fn write_struct<T>(data: *mut c_void, value: T) {
    write(data, value)
}

unsafe fn write_cached_path(data: *mut c_void, path: Option<&Path>, cache: &mut Option<CString>) -> bool {
    let Some(path) = path else { return false };
    let cached = cache.insert(cstring_from_path(path));
    write(data, cached.as_ptr());
    true
}

/// Parses the legacy `{"Label; opt1|opt2|..."}` wire format shared by
/// `SET_VARIABLES` and `SET_VARIABLE`'s sibling `SET_CORE_OPTIONS_INTL`
/// fallback path.
unsafe fn parse_legacy_variables(mut ptr: *const RetroVariable) -> Vec<CoreOption> {
    let mut options = Vec::new();

    loop {
        let Some(variable) = ptr.as_ref() else { break };
        let Some(key) = cstr_to_str(variable.key) else { break };
        let Some(spec) = cstr_to_str(variable.value) else { break };

        let Some((description, values)) = spec.split_once("; ") else {
            ptr = ptr.add(1);
            continue;
        };

        let values: Vec<CoreOptionValue> = values
            .split('|')
            .map(|value| CoreOptionValue {
                value: value.to_owned(),
                label: None,
            })
            .collect();

        let default_value = values.first().map(|v| v.value.clone()).unwrap_or_default();

        options.push(CoreOption {
            key: key.to_owned(),
            description: description.to_owned(),
            info: None,
            values,
            default_value: default_value.clone(),
            current_value: default_value,
            category: None,
            visible: true,
        });

        ptr = ptr.add(1);
    }

    options
}

unsafe fn parse_core_option_values(values: &[abi::RetroCoreOptionValue]) -> Vec<CoreOptionValue> {
    values
        .iter()
        .take_while(|v| !v.value.is_null())
        .map(|v| CoreOptionValue {
            value: cstr_to_str(v.value).unwrap_or_default().to_owned(),
            label: cstr_to_str(v.label).map(str::to_owned),
        })
        .collect()
}

unsafe fn parse_core_options_v1(mut ptr: *const RetroCoreOptionDefinition) -> Vec<CoreOption> {
    let mut options = Vec::new();

    loop {
        let Some(def) = ptr.as_ref() else { break };
        let Some(key) = cstr_to_str(def.key) else { break };

        let values = parse_core_option_values(&def.values);
        let default_value = cstr_to_str(def.default_value)
            .map(str::to_owned)
            .or_else(|| values.first().map(|v| v.value.clone()))
            .unwrap_or_default();

        options.push(CoreOption {
            key: key.to_owned(),
            description: cstr_to_str(def.desc).unwrap_or_default().to_owned(),
            info: cstr_to_str(def.info).map(str::to_owned),
            values,
            default_value: default_value.clone(),
            current_value: default_value,
            category: None,
            visible: true,
        });

        ptr = ptr.add(1);
    }

    options
}

unsafe fn parse_core_options_v2(
    categories: *const RetroCoreOptionV2Category,
    mut definitions: *const RetroCoreOptionV2Definition,
) -> Vec<CoreOption> {
    let mut category_keys = std::collections::HashSet::new();
    let mut cat_ptr = categories;
    while let Some(cat) = cat_ptr.as_ref() {
        let Some(key) = cstr_to_str(cat.key) else { break };
        category_keys.insert(key.to_owned());
        cat_ptr = cat_ptr.add(1);
    }

    let mut options = Vec::new();

    loop {
        let Some(def) = definitions.as_ref() else { break };
        let Some(key) = cstr_to_str(def.key) else { break };

        let values = parse_core_option_values(&def.values);
        let default_value = cstr_to_str(def.default_value)
            .map(str::to_owned)
            .or_else(|| values.first().map(|v| v.value.clone()))
            .unwrap_or_default();
        let category = cstr_to_str(def.category_key)
            .map(str::to_owned)
            .filter(|key| category_keys.contains(key));

        options.push(CoreOption {
            key: key.to_owned(),
            description: cstr_to_str(def.desc).unwrap_or_default().to_owned(),
            info: cstr_to_str(def.info).map(str::to_owned),
            values,
            default_value: default_value.clone(),
            current_value: default_value,
            category,
            visible: true,
        });

        definitions = definitions.add(1);
    }

    options
}

unsafe fn parse_input_descriptors(mut ptr: *const abi::RetroInputDescriptor) -> Vec<InputDescriptor> {
    let mut descriptors = Vec::new();

    loop {
        let Some(descriptor) = ptr.as_ref() else { break };
        let Some(description) = cstr_to_str(descriptor.description) else {
            break;
        };

        descriptors.push(InputDescriptor {
            port: descriptor.port,
            device: descriptor.device,
            index: descriptor.index,
            id: descriptor.id,
            description: description.to_owned(),
        });

        ptr = ptr.add(1);
    }

    descriptors
}

unsafe fn parse_controller_info(mut ptr: *const RetroControllerInfo) -> Vec<ControllerPortInfo> {
    let mut ports = Vec::new();

    loop {
        let Some(port) = ptr.as_ref() else { break };
        if port.num_types == 0 {
            break;
        }

        let descriptions = slice::from_raw_parts(port.types, port.num_types as usize)
            .iter()
            .filter_map(|desc| {
                Some(ControllerDescription {
                    desc: cstr_to_str(desc.desc)?.to_owned(),
                    id: desc.id,
                })
            })
            .collect();

        ports.push(ControllerPortInfo { types: descriptions });
        ptr = ptr.add(1);
    }

    ports
}

unsafe fn parse_subsystem_info(mut ptr: *const RetroSubsystemInfo) -> Vec<SubsystemInfo> {
    let mut infos = Vec::new();

    loop {
        let Some(info) = ptr.as_ref() else { break };
        let Some(ident) = cstr_to_str(info.ident) else { break };

        let roms = if info.roms.is_null() || info.num_roms == 0 {
            Vec::new()
        } else {
            slice::from_raw_parts(info.roms, info.num_roms as usize)
                .iter()
                .map(|rom: &RetroSubsystemRomInfo| SubsystemRomInfo {
                    desc: cstr_to_str(rom.desc).unwrap_or_default().to_owned(),
                    valid_extensions: cstr_to_str(rom.valid_extensions).unwrap_or_default().to_owned(),
                    need_fullpath: rom.need_fullpath,
                    block_extract: rom.block_extract,
                    required: rom.required,
                })
                .collect()
        };

        infos.push(SubsystemInfo {
            desc: cstr_to_str(info.desc).unwrap_or_default().to_owned(),
            ident: ident.to_owned(),
            roms,
            id: info.id,
        });

        ptr = ptr.add(1);
    }

    infos
}

unsafe fn parse_content_info_overrides(
    mut ptr: *const RetroSystemContentInfoOverride,
) -> Vec<ContentInfoOverride> {
    let mut overrides = Vec::new();

    loop {
        let Some(over) = ptr.as_ref() else { break };
        let Some(extensions) = cstr_to_str(over.extensions) else {
            break;
        };

        overrides.push(ContentInfoOverride {
            extensions: extensions.split('|').map(str::to_owned).collect(),
            need_fullpath: over.need_fullpath,
            persistent_data: over.persistent_data,
        });

        ptr = ptr.add(1);
    }

    overrides
}

/// `extern "C"` trampolines for the interfaces the dispatcher hands out by
/// pointer (rumble, sensor, LED, MIDI, VFS, perf, location, microphone,
/// camera). Each reaches the active driver through the same thread-local
/// registry the five fixed libretro callbacks use.
mod trampolines {
    use std::ffi::{c_void, CStr};
    use std::os::raw::{c_char, c_int, c_uint};
    use std::path::Path;

    use crate::core::callbacks::with_active;

    pub unsafe extern "C" fn set_rumble_state(port: c_uint, effect: c_uint, strength: u16) -> bool {
        with_active(|driver| driver.input.rumble(port, effect, strength)).unwrap_or(false)
    }

    pub unsafe extern "C" fn set_sensor_state(port: c_uint, action: c_uint, rate: c_uint) -> bool {
        with_active(|driver| driver.input.set_sensor_state(port, action, rate)).unwrap_or(false)
    }

    pub unsafe extern "C" fn get_sensor_input(port: c_uint, id: c_uint) -> f32 {
        with_active(|driver| driver.input.get_sensor_input(port, id)).unwrap_or(0.0)
    }

    pub unsafe extern "C" fn set_led_state(led: c_int, state: c_int) {
        with_active(|driver| {
            if let Some(leds) = driver.led.as_deref_mut() {
                leds.set_led_state(led, state);
            }
        });
    }

    pub unsafe extern "C" fn midi_input_enabled() -> bool {
        with_active(|driver| driver.midi.as_deref().is_some_and(|m| m.input_enabled())).unwrap_or(false)
    }

    pub unsafe extern "C" fn midi_output_enabled() -> bool {
        with_active(|driver| driver.midi.as_deref().is_some_and(|m| m.output_enabled())).unwrap_or(false)
    }

    pub unsafe extern "C" fn midi_read(byte: *mut u8) -> bool {
        with_active(|driver| {
            let Some(midi) = driver.midi.as_deref_mut() else {
                return false;
            };
            match midi.read() {
                Some(value) => {
                    if !byte.is_null() {
                        *byte = value;
                    }
                    true
                }
                None => false,
            }
        })
        .unwrap_or(false)
    }

    pub unsafe extern "C" fn midi_write(byte: u8, delta_time: c_uint) -> bool {
        with_active(|driver| {
            driver
                .midi
                .as_deref_mut()
                .is_some_and(|m| m.write(byte, delta_time))
        })
        .unwrap_or(false)
    }

    pub unsafe extern "C" fn midi_flush() -> bool {
        with_active(|driver| driver.midi.as_deref_mut().is_some_and(|m| m.flush())).unwrap_or(false)
    }

    pub unsafe extern "C" fn perf_get_time_usec() -> i64 {
        with_active(|driver| driver.perf.time_usec()).unwrap_or(0)
    }

    pub unsafe extern "C" fn perf_get_cpu_features() -> u64 {
        with_active(|driver| driver.perf.cpu_features()).unwrap_or(0)
    }

    pub unsafe extern "C" fn perf_get_counter() -> i64 {
        with_active(|driver| driver.perf.time_usec()).unwrap_or(0)
    }

    pub unsafe extern "C" fn perf_register(counter: *mut crate::abi::RetroPerfCounter) {
        if let Some(counter) = counter.as_mut() {
            counter.registered = true;
            if let Some(name) = cstr_to_str(counter.ident) {
                with_active(|driver| driver.perf.register_counter(name));
            }
        }
    }

    pub unsafe extern "C" fn perf_start(counter: *mut crate::abi::RetroPerfCounter) {
        if let Some(counter) = counter.as_mut() {
            counter.start = with_active(|driver| driver.perf.time_usec()).unwrap_or(0) as u64;
            if let Some(name) = cstr_to_str(counter.ident) {
                with_active(|driver| driver.perf.start_counter(name));
            }
        }
    }

    pub unsafe extern "C" fn perf_stop(counter: *mut crate::abi::RetroPerfCounter) {
        if let Some(counter) = counter.as_mut() {
            let now = with_active(|driver| driver.perf.time_usec()).unwrap_or(0) as u64;
            counter.total += now.saturating_sub(counter.start);
            counter.call_cnt += 1;
            if let Some(name) = cstr_to_str(counter.ident) {
                let (total, call_cnt) = (counter.total, counter.call_cnt);
                with_active(|driver| driver.perf.stop_counter(name, total, call_cnt));
            }
        }
    }

    pub unsafe extern "C" fn perf_log() {
        with_active(|driver| driver.perf.log_counters());
    }

    pub unsafe extern "C" fn location_start() -> bool {
        with_active(|driver| driver.location.as_deref_mut().is_some_and(|l| l.start())).unwrap_or(false)
    }

    pub unsafe extern "C" fn location_stop() {
        with_active(|driver| {
            if let Some(location) = driver.location.as_deref_mut() {
                location.stop();
            }
        });
    }

    pub unsafe extern "C" fn location_get_position(
        lat: *mut f64,
        lon: *mut f64,
        horiz_accuracy: *mut f64,
        vert_accuracy: *mut f64,
    ) -> bool {
        with_active(|driver| {
            let Some(location) = driver.location.as_deref_mut() else {
                return false;
            };
            let Some(fix) = location.get_position() else {
                return false;
            };

            if !lat.is_null() {
                *lat = fix.latitude;
            }
            if !lon.is_null() {
                *lon = fix.longitude;
            }
            if !horiz_accuracy.is_null() {
                *horiz_accuracy = fix.horizontal_accuracy;
            }
            if !vert_accuracy.is_null() {
                *vert_accuracy = fix.vertical_accuracy;
            }

            true
        })
        .unwrap_or(false)
    }

    pub unsafe extern "C" fn location_set_interval(interval_ms: u32, interval_distance: u32) {
        with_active(|driver| {
            if let Some(location) = driver.location.as_deref_mut() {
                location.set_interval(interval_ms, interval_distance);
            }
        });
    }

    pub unsafe extern "C" fn camera_start() -> bool {
        with_active(|driver| {
            let (width, height) = driver.camera_dimensions;
            driver.camera.as_deref_mut().is_some_and(|c| c.start(width, height))
        })
        .unwrap_or(false)
    }

    pub unsafe extern "C" fn camera_stop() {
        with_active(|driver| {
            if let Some(camera) = driver.camera.as_deref_mut() {
                camera.stop();
            }
        });
    }

    pub unsafe extern "C" fn microphone_open(
        params: *const crate::abi::RetroMicrophoneParams,
    ) -> *mut crate::abi::RetroMicrophone {
        let rate = params.as_ref().map_or(0, |p| p.rate);

        with_active(|driver| {
            driver
                .microphone
                .as_deref_mut()
                .and_then(|m| m.open(rate))
                .map(|handle| handle as usize as *mut crate::abi::RetroMicrophone)
        })
        .flatten()
        .unwrap_or(std::ptr::null_mut())
    }

    pub unsafe extern "C" fn microphone_close(microphone: *mut crate::abi::RetroMicrophone) {
        let handle = microphone as usize as u32;
        with_active(|driver| {
            if let Some(mic) = driver.microphone.as_deref_mut() {
                mic.close(handle);
            }
        });
    }

    pub unsafe extern "C" fn microphone_set_state(
        microphone: *mut crate::abi::RetroMicrophone,
        state: bool,
    ) -> bool {
        let handle = microphone as usize as u32;
        with_active(|driver| {
            driver
                .microphone
                .as_deref_mut()
                .is_some_and(|m| m.set_state(handle, state))
        })
        .unwrap_or(false)
    }

    pub unsafe extern "C" fn microphone_get_state(microphone: *mut crate::abi::RetroMicrophone) -> bool {
        let handle = microphone as usize as u32;
        with_active(|driver| {
            driver
                .microphone
                .as_deref_mut()
                .is_some_and(|m| m.get_state(handle))
        })
        .unwrap_or(false)
    }

    pub unsafe extern "C" fn microphone_get_params(
        microphone: *mut crate::abi::RetroMicrophone,
        params: *mut crate::abi::RetroMicrophoneParams,
    ) -> bool {
        let handle = microphone as usize as u32;
        with_active(|driver| {
            let Some(mic) = driver.microphone.as_deref() else {
                return false;
            };
            let Some(rate) = mic.sample_rate(handle) else {
                return false;
            };
            if !params.is_null() {
                (*params).rate = rate;
            }
            true
        })
        .unwrap_or(false)
    }

    pub unsafe extern "C" fn microphone_read(
        microphone: *mut crate::abi::RetroMicrophone,
        samples: *mut c_void,
        num_samples: c_int,
    ) -> c_int {
        let handle = microphone as usize as u32;
        let buf =
            std::slice::from_raw_parts_mut(samples.cast::<i16>(), num_samples.max(0) as usize);

        with_active(|driver| {
            driver
                .microphone
                .as_deref_mut()
                .map_or(0, |m| m.read(handle, buf))
        })
        .unwrap_or(0)
    }

    fn path_from_cstr<'a>(ptr: *const c_char) -> Option<&'a Path> {
        if ptr.is_null() {
            return None;
        }
        let s = unsafe { CStr::from_ptr(ptr) }.to_str().ok()?;
        Some(Path::new(s))
    }

    pub unsafe extern "C" fn vfs_get_path(stream: *mut crate::abi::RetroVfsFileHandle) -> *const c_char {
        let handle = stream as usize as u64;
        with_active(|driver| driver.vfs_path_ptr(handle))
            .flatten()
            .unwrap_or(std::ptr::null())
    }

    pub unsafe extern "C" fn vfs_open(
        path: *const c_char,
        mode: c_uint,
        _hints: c_uint,
    ) -> *mut crate::abi::RetroVfsFileHandle {
        let Some(path) = path_from_cstr(path) else {
            return std::ptr::null_mut();
        };

        with_active(|driver| {
            driver
                .vfs
                .as_deref_mut()
                .and_then(|vfs| vfs.open(path, mode))
                .map(|handle| handle as usize as *mut crate::abi::RetroVfsFileHandle)
        })
        .flatten()
        .unwrap_or(std::ptr::null_mut())
    }

    pub unsafe extern "C" fn vfs_close(stream: *mut crate::abi::RetroVfsFileHandle) -> i64 {
        let handle = stream as usize as u64;
        with_active(|driver| {
            if let Some(vfs) = driver.vfs.as_deref_mut() {
                vfs.close(handle);
            }
            driver.vfs_path_cache.remove(&handle);
        });
        0
    }

    pub unsafe extern "C" fn vfs_size(stream: *mut crate::abi::RetroVfsFileHandle) -> i64 {
        let handle = stream as usize as u64;
        with_active(|driver| driver.vfs.as_deref_mut().and_then(|vfs| vfs.size(handle)))
            .flatten()
            .map(|n| n as i64)
            .unwrap_or(-1)
    }

    pub unsafe extern "C" fn vfs_truncate(stream: *mut crate::abi::RetroVfsFileHandle, length: i64) -> i64 {
        let handle = stream as usize as u64;
        let ok = with_active(|driver| {
            driver
                .vfs
                .as_deref_mut()
                .is_some_and(|vfs| vfs.truncate(handle, length as u64))
        })
        .unwrap_or(false);
        if ok {
            0
        } else {
            -1
        }
    }

    pub unsafe extern "C" fn vfs_tell(stream: *mut crate::abi::RetroVfsFileHandle) -> i64 {
        let handle = stream as usize as u64;
        with_active(|driver| driver.vfs.as_deref_mut().and_then(|vfs| vfs.tell(handle)))
            .flatten()
            .map(|n| n as i64)
            .unwrap_or(-1)
    }

    pub unsafe extern "C" fn vfs_seek(
        stream: *mut crate::abi::RetroVfsFileHandle,
        offset: i64,
        seek_position: c_int,
    ) -> i64 {
        let handle = stream as usize as u64;
        with_active(|driver| {
            driver
                .vfs
                .as_deref_mut()
                .and_then(|vfs| vfs.seek(handle, offset, seek_position))
        })
        .flatten()
        .map(|n| n as i64)
        .unwrap_or(-1)
    }

    pub unsafe extern "C" fn vfs_read(
        stream: *mut crate::abi::RetroVfsFileHandle,
        s: *mut c_void,
        len: u64,
    ) -> i64 {
        let handle = stream as usize as u64;
        let buf = std::slice::from_raw_parts_mut(s.cast::<u8>(), len as usize);
        with_active(|driver| driver.vfs.as_deref_mut().and_then(|vfs| vfs.read(handle, buf)))
            .flatten()
            .map(|n| n as i64)
            .unwrap_or(-1)
    }

    pub unsafe extern "C" fn vfs_write(
        stream: *mut crate::abi::RetroVfsFileHandle,
        s: *const c_void,
        len: u64,
    ) -> i64 {
        let handle = stream as usize as u64;
        let buf = std::slice::from_raw_parts(s.cast::<u8>(), len as usize);
        with_active(|driver| driver.vfs.as_deref_mut().and_then(|vfs| vfs.write(handle, buf)))
            .flatten()
            .map(|n| n as i64)
            .unwrap_or(-1)
    }

    pub unsafe extern "C" fn vfs_flush(stream: *mut crate::abi::RetroVfsFileHandle) -> c_int {
        let handle = stream as usize as u64;
        let ok =
            with_active(|driver| driver.vfs.as_deref_mut().is_some_and(|vfs| vfs.flush(handle)))
                .unwrap_or(false);
        if ok {
            0
        } else {
            -1
        }
    }

    pub unsafe extern "C" fn vfs_remove(path: *const c_char) -> c_int {
        let Some(path) = path_from_cstr(path) else { return -1 };
        let ok = with_active(|driver| driver.vfs.as_deref_mut().is_some_and(|vfs| vfs.remove(path)))
            .unwrap_or(false);
        if ok {
            0
        } else {
            -1
        }
    }

    pub unsafe extern "C" fn vfs_rename(old_path: *const c_char, new_path: *const c_char) -> c_int {
        let (Some(old_path), Some(new_path)) = (path_from_cstr(old_path), path_from_cstr(new_path)) else {
            return -1;
        };
        let ok = with_active(|driver| {
            driver
                .vfs
                .as_deref_mut()
                .is_some_and(|vfs| vfs.rename(old_path, new_path))
        })
        .unwrap_or(false);
        if ok {
            0
        } else {
            -1
        }
    }

    pub unsafe extern "C" fn vfs_mkdir(dir: *const c_char) -> c_int {
        let Some(dir) = path_from_cstr(dir) else { return -1 };
        let ok = with_active(|driver| driver.vfs.as_deref_mut().is_some_and(|vfs| vfs.mkdir(dir)))
            .unwrap_or(false);
        if ok {
            0
        } else {
            -1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{
        DefaultPathDriver, DefaultUserDriver, InMemoryOptionDriver, LogFacadeDriver, NullAudioDriver,
        NullInputDriver, NullPowerDriver, NullVideoDriver, OsdMessageDriver, StdPerfDriver,
    };

    fn driver() -> CompositeEnvironmentDriver {
        CompositeEnvironmentDriver::new(CompositeEnvironmentDriverArgs {
            video: Box::new(NullVideoDriver),
            audio: Box::new(NullAudioDriver),
            input: Box::new(NullInputDriver),
            options: Box::new(InMemoryOptionDriver::default()),
            path: Box::new(DefaultPathDriver {
                core_path: "core.so".into(),
                system_directory: None,
                save_directory: None,
                content_directory: None,
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
        })
    }

    #[test]
    fn get_core_options_version_reports_supported_version_before_any_submission() {
        let mut driver = driver();
        let mut version: u32 = 0xdead;
        let ok = unsafe {
            driver.dispatch(
                command::Command::GetCoreOptionsVersion as u32,
                &mut version as *mut u32 as *mut c_void,
            )
        };
        assert!(ok);
        assert_eq!(version, 2);
    }

    #[test]
    fn set_pixel_format_rejected_after_first_frame() {
        let mut driver = driver();
        let mut xrgb8888: c_uint = 1;
        let ok = unsafe {
            driver.dispatch(
                command::Command::SetPixelFormat as u32,
                &mut xrgb8888 as *mut c_uint as *mut c_void,
            )
        };
        assert!(ok);
        assert_eq!(driver.pixel_format, PixelFormat::ARGB8888);

        driver.note_frame_ran();

        let mut rgb565: c_uint = 2;
        let ok = unsafe {
            driver.dispatch(
                command::Command::SetPixelFormat as u32,
                &mut rgb565 as *mut c_uint as *mut c_void,
            )
        };
        assert!(!ok);
        assert_eq!(driver.pixel_format, PixelFormat::ARGB8888);
    }

    #[test]
    fn set_system_av_info_reopens_pixel_format_negotiation() {
        let mut driver = driver();
        driver.note_frame_ran();

        let info = driver.av_info();
        driver.set_av_info(info);

        let mut rgb565: c_uint = 2;
        let ok = unsafe {
            driver.dispatch(
                command::Command::SetPixelFormat as u32,
                &mut rgb565 as *mut c_uint as *mut c_void,
            )
        };
        assert!(ok);
        assert_eq!(driver.pixel_format, PixelFormat::RGB565);
    }

    #[test]
    fn set_hw_shared_context_is_distinct_from_serialization_quirks() {
        let mut driver = driver();

        let mut quirks: u64 = 0x4;
        let ok = unsafe {
            driver.dispatch(44, &mut quirks as *mut u64 as *mut c_void)
        };
        assert!(ok);
        assert_eq!(driver.serialization_quirks, 0x4);
        assert!(!driver.hw_shared_context);

        let ok = unsafe {
            driver.dispatch(44 | command::ENVIRONMENT_EXPERIMENTAL, ptr::null_mut())
        };
        assert!(ok);
        assert!(driver.hw_shared_context);
        assert_eq!(driver.serialization_quirks, 0x4);
    }
}
