use std::os::raw::c_uint;

pub type RetroSetEjectStateT = unsafe extern "C" fn(ejected: bool) -> bool;
pub type RetroGetEjectStateT = unsafe extern "C" fn() -> bool;
pub type RetroGetImageIndexT = unsafe extern "C" fn() -> c_uint;
pub type RetroSetImageIndexT = unsafe extern "C" fn(index: c_uint) -> bool;
pub type RetroGetNumImagesT = unsafe extern "C" fn() -> c_uint;
pub type RetroReplaceImageIndexT = unsafe extern "C" fn(index: c_uint, info: *const libretro_sys::GameInfo) -> bool;
pub type RetroAddImageIndexT = unsafe extern "C" fn() -> bool;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroDiskControlCallback {
    pub set_eject_state: Option<RetroSetEjectStateT>,
    pub get_eject_state: Option<RetroGetEjectStateT>,
    pub get_image_index: Option<RetroGetImageIndexT>,
    pub set_image_index: Option<RetroSetImageIndexT>,
    pub get_num_images: Option<RetroGetNumImagesT>,
    pub replace_image_index: Option<RetroReplaceImageIndexT>,
    pub add_image_index: Option<RetroAddImageIndexT>,
}

pub type RetroSetInitialImageT =
    unsafe extern "C" fn(index: c_uint, path: *const std::os::raw::c_char) -> bool;
pub type RetroGetImagePathT =
    unsafe extern "C" fn(index: c_uint, path: *mut std::os::raw::c_char, len: usize) -> bool;
pub type RetroGetImageLabelT =
    unsafe extern "C" fn(index: c_uint, label: *mut std::os::raw::c_char, len: usize) -> bool;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct RetroDiskControlExtCallback {
    pub set_eject_state: Option<RetroSetEjectStateT>,
    pub get_eject_state: Option<RetroGetEjectStateT>,
    pub get_image_index: Option<RetroGetImageIndexT>,
    pub set_image_index: Option<RetroSetImageIndexT>,
    pub get_num_images: Option<RetroGetNumImagesT>,
    pub replace_image_index: Option<RetroReplaceImageIndexT>,
    pub add_image_index: Option<RetroAddImageIndexT>,
    pub set_initial_image: Option<RetroSetInitialImageT>,
    pub get_image_path: Option<RetroGetImagePathT>,
    pub get_image_label: Option<RetroGetImageLabelT>,
}
