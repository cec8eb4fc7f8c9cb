/// `GET_USERNAME` / `GET_LANGUAGE`.
pub trait UserDriver: Send {
    fn username(&self) -> Option<&str> {
        None
    }

    /// `RETRO_LANGUAGE_*` value; defaults to English.
    fn language(&self) -> u32 {
        0
    }
}

pub struct DefaultUserDriver {
    pub username: Option<String>,
    pub language: u32,
}

impl Default for DefaultUserDriver {
    fn default() -> Self {
        Self {
            username: None,
            language: 0,
        }
    }
}

impl UserDriver for DefaultUserDriver {
    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn language(&self) -> u32 {
        self.language
    }
}
