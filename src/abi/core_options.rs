use std::os::raw::c_char;

/// `retro_variable`; the legacy `GET_VARIABLE`/`SET_VARIABLES` wire format.
/// `value` is an input (the `"label; opt1|opt2"` string) for `SET_VARIABLES`
/// and an output (the frontend writes the current value's pointer) for
/// `GET_VARIABLE`.
#[repr(C)]
pub struct RetroVariable {
    pub key: *const c_char,
    pub value: *const c_char,
}

pub const RETRO_NUM_CORE_OPTION_VALUES_MAX: usize = 128;

#[repr(C)]
pub struct RetroCoreOptionValue {
    pub value: *const c_char,
    pub label: *const c_char,
}

#[repr(C)]
pub struct RetroCoreOptionDefinition {
    pub key: *const c_char,
    pub desc: *const c_char,
    pub info: *const c_char,
    pub values: [RetroCoreOptionValue; RETRO_NUM_CORE_OPTION_VALUES_MAX],
    pub default_value: *const c_char,
}

#[repr(C)]
pub struct RetroCoreOptionsIntl {
    pub us: *const RetroCoreOptionDefinition,
    pub local: *const RetroCoreOptionDefinition,
}

#[repr(C)]
pub struct RetroCoreOptionDisplay {
    pub key: *const c_char,
    pub visible: bool,
}

#[repr(C)]
pub struct RetroCoreOptionV2Category {
    pub key: *const c_char,
    pub desc: *const c_char,
    pub info: *const c_char,
}

#[repr(C)]
pub struct RetroCoreOptionV2Definition {
    pub key: *const c_char,
    pub desc: *const c_char,
    pub desc_categorized: *const c_char,
    pub info: *const c_char,
    pub info_categorized: *const c_char,
    pub category_key: *const c_char,
    pub values: [RetroCoreOptionValue; RETRO_NUM_CORE_OPTION_VALUES_MAX],
    pub default_value: *const c_char,
}

#[repr(C)]
pub struct RetroCoreOptionsV2 {
    pub categories: *const RetroCoreOptionV2Category,
    pub definitions: *const RetroCoreOptionV2Definition,
}

#[repr(C)]
pub struct RetroCoreOptionsV2Intl {
    pub us: *const RetroCoreOptionsV2,
    pub local: *const RetroCoreOptionsV2,
}

pub type RetroCoreOptionsUpdateDisplayCallbackT = unsafe extern "C" fn() -> bool;

#[repr(C)]
pub struct RetroCoreOptionsUpdateDisplayCallback {
    pub callback: Option<RetroCoreOptionsUpdateDisplayCallbackT>,
}
