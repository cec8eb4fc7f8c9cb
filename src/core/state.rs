use std::cell::Cell;

thread_local! {
    /// Enforces "only one core per thread": [`crate::core::CoreHandle::load`]
    /// refuses to load a second core on a thread that already has one
    /// registered, since the FFI trampolines recover "which session is this"
    /// purely from thread-local state and cannot distinguish two cores on
    /// the same thread.
    pub static IS_CORE_LOADED: Cell<bool> = const { Cell::new(false) };
}
