use core::fmt;

use reqwest::Url;

/// Link to the song. Must be an absolute URL with an `http` or `https`
/// scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongLink(String);

impl SongLink {
    pub fn parse(s: String) -> Result<Self, String> {
        match Url::parse(&s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self(s)),
            _ => Err(format!("invalid song link URL: '{}'", s)),
        }
    }
}

impl fmt::Display for SongLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for SongLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SongLink {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
