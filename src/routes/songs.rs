use axum::{
    Json,
    extract::{Path, Query, State},
};
use hyper::StatusCode;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    domain::{Song, SongPayload},
    error::SongError,
    repository::SongFilter,
    service::SongService,
};

#[derive(Deserialize)]
pub struct ListParams {
    limit: i64,
    offset: i64,
    group: Option<String>,
}

#[instrument(name = "Listing songs over HTTP", skip_all, fields(limit = params.limit, offset = params.offset))]
pub async fn list_songs(
    State(service): State<SongService>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Song>>, SongError> {
    let filter = SongFilter {
        group: params.group,
    };
    let songs = service
        .list_songs(&filter, params.limit, params.offset)
        .await?;
    Ok(Json(songs))
}

#[instrument(name = "Getting song over HTTP", skip(service))]
pub async fn get_song(
    State(service): State<SongService>,
    Path(id): Path<i64>,
) -> Result<Json<Song>, SongError> {
    let song = service.get_song(id).await?;
    Ok(Json(song))
}

#[derive(Deserialize)]
pub struct CreateSongRequest {
    group: String,
    song: String,
}

/// Creation flow: the caller supplies group and title, the remaining fields
/// come from the external metadata API and are merged in before validation.
#[instrument(name = "Creating song over HTTP", skip_all, fields(group = %request.group, song = %request.song))]
pub async fn create_song(
    State(service): State<SongService>,
    Json(request): Json<CreateSongRequest>,
) -> Result<(StatusCode, Json<Song>), SongError> {
    info!(
        "Adding new song '{}' by '{}'",
        request.song, request.group
    );
    let details = service
        .fetch_song_details(&request.group, &request.song)
        .await?;

    let payload = SongPayload {
        group: request.group,
        song: request.song,
        release_date: details.release_date,
        text: details.text,
        link: details.link,
    };
    let song = service.create_song(payload).await?;
    Ok((StatusCode::CREATED, Json(song)))
}

#[instrument(name = "Updating song over HTTP", skip_all, fields(id))]
pub async fn update_song(
    State(service): State<SongService>,
    Path(id): Path<i64>,
    Json(payload): Json<SongPayload>,
) -> Result<StatusCode, SongError> {
    service.update_song(id, payload).await?;
    Ok(StatusCode::OK)
}

#[instrument(name = "Deleting song over HTTP", skip(service))]
pub async fn delete_song(
    State(service): State<SongService>,
    Path(id): Path<i64>,
) -> Result<StatusCode, SongError> {
    service.delete_song(id).await?;
    Ok(StatusCode::OK)
}
