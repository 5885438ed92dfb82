use sqlx::{Postgres, QueryBuilder};
use tracing::{error, instrument};

use crate::{
    database::Database,
    domain::{NewSong, Song},
};

/// Closed set of supported equality filters for listing songs. Field names
/// never come from untrusted input; only the values are bound as parameters.
#[derive(Debug, Clone, Default)]
pub struct SongFilter {
    pub group: Option<String>,
}

/// Maps CRUD intents to SQL against the `songs` table. Sole owner of
/// persisted state; failures are logged here with query context and the
/// underlying error is re-raised unchanged.
#[derive(Clone)]
pub struct SongRepository {
    db: Database,
}

impl SongRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn list_query<'a>(
        filter: &'a SongFilter,
        limit: i64,
        offset: i64,
    ) -> QueryBuilder<'a, Postgres> {
        let mut builder = QueryBuilder::new(
            r#"SELECT id, "group", song, release_date, text, link FROM songs WHERE 1=1"#,
        );
        if let Some(group) = &filter.group {
            builder.push(r#" AND "group" = "#).push_bind(group.as_str());
        }
        builder
            .push(" ORDER BY id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        builder
    }

    #[instrument(name = "Querying songs from database", skip(self))]
    pub async fn list(
        &self,
        filter: &SongFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Song>, sqlx::Error> {
        let pool = self.db.pool().await;
        let mut query = Self::list_query(filter, limit, offset);
        let sql = query.sql().to_owned();
        query
            .build_query_as::<Song>()
            .fetch_all(&pool)
            .await
            .map_err(|e| {
                error!(error = %e, query = %sql, "error querying songs");
                e
            })
    }

    #[instrument(name = "Querying song by id from database", skip(self))]
    pub async fn get(&self, id: i64) -> Result<Option<Song>, sqlx::Error> {
        let pool = self.db.pool().await;
        sqlx::query_as::<_, Song>(
            r#"SELECT id, "group", song, release_date, text, link FROM songs WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            error!(error = %e, id, "error querying song by id");
            e
        })
    }

    /// Inserts the song and returns the storage-assigned id.
    #[instrument(name = "Inserting song into database", skip_all, fields(group = %song.group, song = %song.song))]
    pub async fn create(&self, song: &NewSong) -> Result<i64, sqlx::Error> {
        let pool = self.db.pool().await;
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO songs ("group", song, release_date, text, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&song.group)
        .bind(&song.song)
        .bind(song.release_date.as_ref())
        .bind(&song.text)
        .bind(song.link.as_ref())
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            error!(error = %e, group = %song.group, song = %song.song, "error creating song");
            e
        })
    }

    /// Replaces every non-id field, returning the number of affected rows.
    #[instrument(name = "Updating song in database", skip_all, fields(id))]
    pub async fn update(&self, id: i64, song: &NewSong) -> Result<u64, sqlx::Error> {
        let pool = self.db.pool().await;
        let result = sqlx::query(
            r#"
            UPDATE songs
            SET "group" = $1, song = $2, release_date = $3, text = $4, link = $5
            WHERE id = $6
            "#,
        )
        .bind(&song.group)
        .bind(&song.song)
        .bind(song.release_date.as_ref())
        .bind(&song.text)
        .bind(song.link.as_ref())
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            error!(error = %e, id, "error updating song");
            e
        })?;
        Ok(result.rows_affected())
    }

    /// Unconditional delete by id, returning the number of affected rows.
    #[instrument(name = "Deleting song from database", skip(self))]
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let pool = self.db.pool().await;
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(&pool)
            .await
            .map_err(|e| {
                error!(error = %e, id, "error deleting song");
                e
            })?;
        Ok(result.rows_affected())
    }
}
