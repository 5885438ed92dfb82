use axum::extract::FromRef;
use secrecy::SecretString;

use crate::{database::Database, service::SongService};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub song_service: SongService,
    pub api_key: SecretString,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for SongService {
    fn from_ref(state: &AppState) -> Self {
        state.song_service.clone()
    }
}
