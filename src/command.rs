use std::ffi::c_uint;

use strum::FromRepr;

/// If set, this call is not part of the stable libretro API yet. Accepted
/// identically to the base command; the bit is informational only.
pub const ENVIRONMENT_EXPERIMENTAL: c_uint = 0x10000;

/// Reserved for frontend-internal use; masked off like EXPERIMENTAL.
pub const ENVIRONMENT_PRIVATE: c_uint = 0x20000;

const COMMAND_MASK: c_uint = ENVIRONMENT_EXPERIMENTAL - 1;

/// Strips the EXPERIMENTAL/PRIVATE tag bits and resolves the remaining ID
/// to a [`Command`], or `None` for anything the dispatcher has never heard
/// of.
///
/// Base ID 44 is special-cased: `SET_SERIALIZATION_QUIRKS` is plain `44`,
/// but `SET_HW_SHARED_CONTEXT` is *wired* as `44 | EXPERIMENTAL` — not an
/// experimental tag on `SET_SERIALIZATION_QUIRKS`, but a distinct command
/// that happens to reuse its base ID. Masking the bit off before matching
/// would collapse the two, so the collision is resolved before masking.
pub fn decode(raw: c_uint) -> Option<Command> {
    if raw == (44 | ENVIRONMENT_EXPERIMENTAL) {
        return Some(Command::SetHwSharedContext);
    }

    Command::from_repr(raw & COMMAND_MASK)
}

/// Every `RETRO_ENVIRONMENT_*` command ID the dispatcher must either act on
/// or explicitly decline with `false`. Values and groupings mirror the
/// libretro header; commands 4 and 5 are permanently retired (legacy
/// GET_VARIABLE / SET_VARIABLES) and intentionally absent here.
#[derive(FromRepr, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Command {
    SetRotation = 1,
    GetOverscan = 2,
    GetCanDupe = 3,
    SetMessage = 6,
    /// Requests the frontend terminate the session. Read by the `Session`
    /// between frames, not acted on immediately.
    Shutdown = 7,
    SetPerformanceLevel = 8,
    GetSystemDirectory = 9,
    /// Rejects anything outside {0RGB1555, XRGB8888, RGB565}.
    SetPixelFormat = 10,
    SetInputDescriptors = 11,
    SetKeyboardCallback = 12,
    SetDiskControlInterface = 13,
    SetHwRender = 14,
    GetVariable = 15,
    SetVariables = 16,
    /// Returns the dirty flag and clears it atomically.
    GetVariableUpdate = 17,
    SetSupportNoGame = 18,
    GetLibretroPath = 19,
    SetFrameTimeCallback = 21,
    SetAudioCallback = 22,
    GetRumbleInterface = 23,
    GetInputDeviceCapabilities = 24,
    GetSensorInterface = 25,
    GetCameraInterface = 26,
    GetLogInterface = 27,
    GetPerfInterface = 28,
    GetLocationInterface = 29,
    /// Aliases `GET_CORE_ASSETS_DIRECTORY` — both spellings share ID 30.
    GetContentDirectory = 30,
    GetSaveDirectory = 31,
    /// Replaces AV info wholesale and restarts AV negotiation, unlike
    /// `SetGeometry` which only touches geometry.
    SetSystemAvInfo = 32,
    SetProcAddressCallback = 33,
    SetSubsystemInfo = 34,
    SetControllerInfo = 35,
    SetMemoryMaps = 36,
    /// Replaces geometry only; timing (fps/sample_rate) is left untouched
    /// even if `geometry.fps` disagrees.
    SetGeometry = 37,
    GetUsername = 38,
    GetLanguage = 39,
    GetCurrentSoftwareFramebuffer = 40,
    GetHwRenderInterface = 41,
    SetSupportAchievements = 42,
    SetHwRenderContextNegotiationInterface = 43,
    SetSerializationQuirks = 44,
    /// Wire ID `44 | EXPERIMENTAL`, not base `44` — see [`decode`].
    SetHwSharedContext = 44 | ENVIRONMENT_EXPERIMENTAL,
    GetVfsInterface = 45,
    GetLedInterface = 46,
    GetAudioVideoEnable = 47,
    GetMidiInterface = 48,
    GetFastforwarding = 49,
    GetTargetRefreshRate = 50,
    /// `id == JOYPAD_MASK (256)` on a subsequent `input_state` call then
    /// returns all 16 joypad buttons packed into one bitmask.
    GetInputBitmasks = 51,
    GetCoreOptionsVersion = 52,
    SetCoreOptions = 53,
    SetCoreOptionsIntl = 54,
    SetCoreOptionsDisplay = 55,
    GetPreferredHwRender = 56,
    GetDiskControlInterfaceVersion = 57,
    SetDiskControlExtInterface = 58,
    GetMessageInterfaceVersion = 59,
    SetMessageExt = 60,
    GetInputMaxUsers = 61,
    SetAudioBufferStatusCallback = 62,
    SetMinimumAudioLatency = 63,
    SetFastforwardingOverride = 64,
    SetContentInfoOverride = 65,
    GetGameInfoExt = 66,
    /// Wins over a prior `SetCoreOptions` table if both are called.
    SetCoreOptionsV2 = 67,
    SetCoreOptionsV2Intl = 68,
    SetCoreOptionsUpdateDisplayCallback = 69,
    /// Core-originated single-variable mutation; sets the same dirty flag
    /// a frontend-side `SET_VARIABLE` would.
    SetVariable = 70,
    GetThrottleState = 71,
    GetSavestateContext = 72,
    GetHwRenderContextNegotiationInterfaceSupport = 73,
    GetJitCapable = 74,
    GetMicrophoneInterface = 75,
    SetNetpacketInterface = 76,
    GetDevicePower = 77,
    GetPlaylistDirectory = 79,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_ids() {
        assert_eq!(decode(10), Some(Command::SetPixelFormat));
        assert_eq!(decode(37), Some(Command::SetGeometry));
    }

    #[test]
    fn masks_experimental_and_private_bits() {
        assert_eq!(
            decode(51 | ENVIRONMENT_EXPERIMENTAL),
            Some(Command::GetInputBitmasks)
        );
        assert_eq!(
            decode(10 | ENVIRONMENT_PRIVATE),
            Some(Command::SetPixelFormat)
        );
    }

    #[test]
    fn unknown_id_decodes_to_none() {
        assert_eq!(decode(99999), None);
        assert_eq!(decode(4), None);
        assert_eq!(decode(5), None);
    }

    #[test]
    fn base_44_collision_resolves_by_experimental_bit() {
        assert_eq!(decode(44), Some(Command::SetSerializationQuirks));
        assert_eq!(
            decode(44 | ENVIRONMENT_EXPERIMENTAL),
            Some(Command::SetHwSharedContext)
        );
    }
}
