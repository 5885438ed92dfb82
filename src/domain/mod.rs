mod new_song;
mod release_date;
mod song_link;

pub use new_song::{NewSong, SongPayload};
pub use release_date::ReleaseDate;
pub use song_link::SongLink;

use serde::{Deserialize, Serialize};

/// A persisted song. The id is assigned by storage on creation and immutable
/// afterwards; every non-id field satisfies the constraints enforced by
/// [`NewSong::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Song {
    pub id: i64,
    pub group: String,
    pub song: String,
    pub release_date: String,
    pub text: String,
    pub link: String,
}
