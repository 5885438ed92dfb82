use serde::Deserialize;

use super::{ReleaseDate, Song, SongLink};

/// Raw non-id song fields as supplied by a caller, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct SongPayload {
    pub group: String,
    pub song: String,
    pub release_date: String,
    pub text: String,
    pub link: String,
}

/// A fully validated song, ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewSong {
    pub group: String,
    pub song: String,
    pub release_date: ReleaseDate,
    pub text: String,
    pub link: SongLink,
}

impl NewSong {
    /// Validates fields in order: group, song name, release date, text, link.
    /// The error names the first failing field.
    pub fn parse(payload: SongPayload) -> Result<Self, String> {
        if payload.group.is_empty() {
            return Err("group cannot be empty".to_string());
        }
        if payload.song.is_empty() {
            return Err("song name cannot be empty".to_string());
        }
        let release_date = ReleaseDate::parse(payload.release_date)?;
        if payload.text.is_empty() {
            return Err("song text cannot be empty".to_string());
        }
        let link = SongLink::parse(payload.link)?;

        Ok(Self {
            group: payload.group,
            song: payload.song,
            release_date,
            text: payload.text,
            link,
        })
    }

    pub fn into_song(self, id: i64) -> Song {
        Song {
            id,
            group: self.group,
            song: self.song,
            release_date: self.release_date.as_ref().to_string(),
            text: self.text,
            link: self.link.as_ref().to_string(),
        }
    }
}

impl TryFrom<SongPayload> for NewSong {
    type Error = String;

    fn try_from(payload: SongPayload) -> Result<Self, Self::Error> {
        Self::parse(payload)
    }
}
