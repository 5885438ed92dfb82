use tracing::{error, info, instrument, warn};

use crate::{
    domain::{NewSong, Song, SongPayload},
    error::SongError,
    metadata_client::{MetadataClient, SongDetail},
    repository::{SongFilter, SongRepository},
};

/// Validates inputs and orchestrates the repository and the external
/// metadata client. No retries anywhere in this layer; repository and
/// external-API errors propagate unchanged.
#[derive(Clone)]
pub struct SongService {
    repository: SongRepository,
    metadata_client: MetadataClient,
}

impl SongService {
    pub fn new(repository: SongRepository, metadata_client: MetadataClient) -> Self {
        Self {
            repository,
            metadata_client,
        }
    }

    #[instrument(name = "Listing songs", skip(self))]
    pub async fn list_songs(
        &self,
        filter: &SongFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Song>, SongError> {
        if limit <= 0 {
            let err = "limit must be greater than 0".to_string();
            error!(limit, "invalid limit");
            return Err(SongError::Validation(err));
        }
        if offset < 0 {
            let err = "offset cannot be negative".to_string();
            error!(offset, "invalid offset");
            return Err(SongError::Validation(err));
        }
        if matches!(&filter.group, Some(group) if group.is_empty()) {
            let err = "group filter cannot be empty".to_string();
            error!("invalid group filter");
            return Err(SongError::Validation(err));
        }

        Ok(self.repository.list(filter, limit, offset).await?)
    }

    #[instrument(name = "Getting song by id", skip(self))]
    pub async fn get_song(&self, id: i64) -> Result<Song, SongError> {
        Self::validate_id(id)?;

        match self.repository.get(id).await? {
            Some(song) => Ok(song),
            None => {
                warn!(id, "song not found");
                Err(SongError::NotFound(id))
            }
        }
    }

    /// Validates the payload and persists it, returning the stored song with
    /// its storage-assigned id.
    #[instrument(name = "Creating song", skip_all, fields(group = %payload.group, song = %payload.song))]
    pub async fn create_song(&self, payload: SongPayload) -> Result<Song, SongError> {
        let new_song = NewSong::parse(payload).map_err(|e| {
            error!(error = %e, "validation error while creating song");
            SongError::Validation(e)
        })?;

        let id = self.repository.create(&new_song).await?;
        info!(id, "song created");
        Ok(new_song.into_song(id))
    }

    /// Full replacement of every non-id field, re-validated. Zero affected
    /// rows is surfaced as a not-found error.
    #[instrument(name = "Updating song", skip_all, fields(id))]
    pub async fn update_song(&self, id: i64, payload: SongPayload) -> Result<(), SongError> {
        Self::validate_id(id)?;
        let new_song = NewSong::parse(payload).map_err(|e| {
            error!(error = %e, id, "validation error while updating song");
            SongError::Validation(e)
        })?;

        let affected = self.repository.update(id, &new_song).await?;
        if affected == 0 {
            warn!(id, "update matched no rows");
            return Err(SongError::NotFound(id));
        }
        info!(id, "song updated");
        Ok(())
    }

    /// Idempotent by construction: deleting a non-existent id succeeds.
    #[instrument(name = "Deleting song", skip(self))]
    pub async fn delete_song(&self, id: i64) -> Result<(), SongError> {
        Self::validate_id(id)?;

        let affected = self.repository.delete(id).await?;
        info!(id, affected, "song deleted");
        Ok(())
    }

    /// Pure pass-through to the external metadata client.
    #[instrument(name = "Fetching song details via service", skip(self))]
    pub async fn fetch_song_details(
        &self,
        group: &str,
        song: &str,
    ) -> Result<SongDetail, SongError> {
        Ok(self.metadata_client.get_song_details(group, song).await?)
    }

    fn validate_id(id: i64) -> Result<(), SongError> {
        if id <= 0 {
            error!(id, "invalid song id");
            return Err(SongError::Validation("invalid song ID".to_string()));
        }
        Ok(())
    }
}
