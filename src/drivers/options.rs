use std::ffi::CString;
use std::os::raw::c_char;

use indexmap::IndexMap;

/// One possible value for a core option, with an optional display label
/// (v1/v2 core options attach one; plain v0 variables never do).
#[derive(Debug, Clone)]
pub struct CoreOptionValue {
    pub value: String,
    pub label: Option<String>,
}

/// A single option as the driver stores it internally, regardless of
/// which wire version (`SET_VARIABLES`, `SET_CORE_OPTIONS`, or
/// `SET_CORE_OPTIONS_V2`) it arrived through.
#[derive(Debug, Clone)]
pub struct CoreOption {
    pub key: String,
    pub description: String,
    pub info: Option<String>,
    pub values: Vec<CoreOptionValue>,
    pub default_value: String,
    pub current_value: String,
    pub category: Option<String>,
    pub visible: bool,
}

impl CoreOption {
    pub fn new(key: impl Into<String>, description: impl Into<String>, default_value: impl Into<String>) -> Self {
        let default_value = default_value.into();

        Self {
            key: key.into(),
            description: description.into(),
            info: None,
            values: Vec::new(),
            default_value: default_value.clone(),
            current_value: default_value,
            category: None,
            visible: true,
        }
    }
}

/// Stores the negotiated core-options table (any of v0/v1/v2, up-converted
/// to this single representation), the dirty flag, and the reported
/// options version.
pub trait OptionDriver: Send {
    /// Wire version of the last table actually submitted via
    /// `set_options` (0/1/2). Diagnostic only: `GET_CORE_OPTIONS_VERSION`
    /// reports the frontend's supported version unconditionally, not this
    /// value, since a core queries it before submitting anything.
    fn version(&self) -> u32;

    /// Replaces the whole table (`SET_VARIABLES` / `SET_CORE_OPTIONS` /
    /// `SET_CORE_OPTIONS_V2`, already up-converted to `CoreOption` by the
    /// caller). Does not itself set the dirty flag — a fresh table isn't a
    /// "the core should re-read" signal.
    fn set_options(&mut self, version: u32, options: Vec<CoreOption>);

    fn set_display(&mut self, key: &str, visible: bool);

    /// `GET_VARIABLE`: current value for `key`, or `None` if unknown.
    fn get(&self, key: &str) -> Option<&str>;

    /// `GET_VARIABLE`'s wire form: a pointer into storage owned by this
    /// driver, stable until `key` is replaced by a later `set`/`set_options`
    /// call, as the ABI requires.
    fn get_ptr(&mut self, key: &str) -> Option<*const c_char>;

    /// `SET_VARIABLE` (core-originated) / frontend-side mutation. Both
    /// origins set the dirty flag.
    fn set(&mut self, key: &str, value: &str) -> bool;

    /// `GET_VARIABLE_UPDATE`: returns the dirty flag and clears it.
    fn take_dirty(&mut self) -> bool;
}

#[derive(Default)]
pub struct InMemoryOptionDriver {
    version: u32,
    options: IndexMap<String, CoreOption>,
    dirty: bool,
    /// Cached per-key `CString` handed back by `get_ptr`; rebuilt only when
    /// the value actually changes, so the pointer stays valid across
    /// repeated `GET_VARIABLE` calls between mutations.
    value_cache: IndexMap<String, CString>,
}

impl OptionDriver for InMemoryOptionDriver {
    fn version(&self) -> u32 {
        self.version
    }

    fn set_options(&mut self, version: u32, options: Vec<CoreOption>) {
        self.version = version;
        self.options = options.into_iter().map(|o| (o.key.clone(), o)).collect();
        self.value_cache.clear();
    }

    fn set_display(&mut self, key: &str, visible: bool) {
        if let Some(option) = self.options.get_mut(key) {
            option.visible = visible;
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(|o| o.current_value.as_str())
    }

    fn get_ptr(&mut self, key: &str) -> Option<*const c_char> {
        let value = self.options.get(key)?.current_value.as_str();

        let cached = self
            .value_cache
            .entry(key.to_owned())
            .or_insert_with(|| CString::new(value).unwrap_or_default());

        if cached.to_str() != Ok(value) {
            *cached = CString::new(value).unwrap_or_default();
        }

        Some(cached.as_ptr())
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        let Some(option) = self.options.get_mut(key) else {
            return false;
        };

        option.current_value = value.to_owned();
        self.dirty = true;

        true
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_variable_then_get_variable_update_round_trip() {
        let mut driver = InMemoryOptionDriver::default();
        driver.set_options(2, vec![CoreOption::new("k", "desc", "a")]);

        assert!(!driver.take_dirty());

        assert!(driver.set("k", "b"));
        assert_eq!(driver.get("k"), Some("b"));
        assert!(driver.take_dirty());
        assert!(!driver.take_dirty());
    }

    #[test]
    fn unknown_key_set_returns_false_and_does_not_dirty() {
        let mut driver = InMemoryOptionDriver::default();
        driver.set_options(2, vec![CoreOption::new("k", "desc", "a")]);

        assert!(!driver.set("missing", "x"));
        assert!(!driver.take_dirty());
    }
}
