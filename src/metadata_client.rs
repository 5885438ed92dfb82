use reqwest::Url;
use serde::Deserialize;
use tracing::instrument;

use crate::configuration::MetadataClientSettings;

/// Release details returned by the external metadata API.
#[derive(Debug, Clone, Deserialize)]
pub struct SongDetail {
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    pub text: String,
    pub link: String,
}

/// Client for the external metadata collaborator. One outbound GET per
/// song-creation request, bounded by the configured total timeout. No
/// retries, no caching.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http_client: reqwest::Client,
    info_url: Url,
}

impl MetadataClient {
    /// `GET {base_url}/info?group={group}&song={song}`. Any non-200 response
    /// or decode failure is surfaced to the caller as an error.
    #[instrument(name = "Fetching song details", skip(self))]
    pub async fn get_song_details(
        &self,
        group: &str,
        song: &str,
    ) -> Result<SongDetail, reqwest::Error> {
        self.http_client
            .get(self.info_url.clone())
            .query(&[("group", group), ("song", song)])
            .send()
            .await?
            .error_for_status()?
            .json::<SongDetail>()
            .await
    }
}

impl TryFrom<MetadataClientSettings> for MetadataClient {
    type Error = anyhow::Error;

    fn try_from(settings: MetadataClientSettings) -> Result<Self, Self::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout_ms)
            .build()?;
        // Append to the base path rather than RFC 3986-joining, so a base of
        // http://host/metadata targets http://host/metadata/info.
        let mut info_url = settings.base_url;
        info_url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("metadata base URL cannot be a base"))?
            .pop_if_empty()
            .push("info");
        Ok(Self {
            http_client,
            info_url,
        })
    }
}
