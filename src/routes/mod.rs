mod auth;
mod health_check;
mod songs;

pub use auth::require_api_key;
pub use health_check::health_check;
pub use songs::{create_song, delete_song, get_song, list_songs, update_song};
