use std::fmt;

/// Key under which a realtime listener waits for finished translations.
///
/// Uploads that carry no session identifier share [`SessionKey::default_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub const DEFAULT: &'static str = "default";

    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            Self::default_key()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn default_key() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    pub fn from_optional(key: Option<&str>) -> Self {
        key.map(Self::new).unwrap_or_else(Self::default_key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionKey {
    fn default() -> Self {
        Self::default_key()
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
