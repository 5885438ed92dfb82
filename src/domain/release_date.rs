use core::fmt;

/// Date-like release date, e.g. "2006-06-19". Exactly 10 characters; the
/// content is not parsed any further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDate(String);

impl ReleaseDate {
    pub fn parse(s: String) -> Result<Self, String> {
        if s.chars().count() == 10 {
            Ok(Self(s))
        } else {
            Err(format!("invalid release date format: '{}'", s))
        }
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for ReleaseDate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ReleaseDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
