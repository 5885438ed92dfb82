use anyhow::Context;
use axum::{
    Router,
    http::{HeaderName, Request},
    middleware,
    routing::{delete, get, post, put},
};
use std::time::Duration;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{debug, error, info, info_span, instrument};

use crate::{
    configuration::Settings,
    database::Database,
    metadata_client::MetadataClient,
    repository::SongRepository,
    routes::{
        create_song, delete_song, get_song, health_check, list_songs, require_api_key, update_song,
    },
    service::SongService,
    state::AppState,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

pub struct Application {
    listener: TcpListener,
    pub app: Router,
}

impl Application {
    #[instrument(name = "Building Application", skip_all)]
    pub async fn build(
        Settings {
            database_cfg,
            application_cfg,
            metadata_cfg,
        }: Settings,
    ) -> Result<Self, anyhow::Error> {
        info!("Building application.");
        debug!("Database configuration: {:?}", database_cfg);
        let db = Database::init(&database_cfg)
            .await
            .context("Failed to initialize the database")?;
        let _health_check = db.spawn_health_check();

        debug!("Metadata client configuration: {:?}", metadata_cfg);
        let metadata_client =
            MetadataClient::try_from(metadata_cfg).context("Invalid metadata client config")?;
        let song_service = SongService::new(SongRepository::new(db.clone()), metadata_client);

        let listener = application_cfg.listener().await?;
        debug!(
            "Listener bound to port: {}",
            listener.local_addr().unwrap().port()
        );

        let app = Self::get_router(AppState {
            db,
            song_service,
            api_key: application_cfg.api_key,
        });

        Ok(Self { listener, app })
    }

    pub fn port(&self) -> u16 {
        self.listener.local_addr().unwrap().port()
    }

    pub fn get_router(app_state: AppState) -> axum::Router {
        let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
        let middleware_stack = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(
                x_request_id.clone(),
                MakeRequestUuid,
            ))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                    // Log the request id as generated.
                    let request_id = request.headers().get(REQUEST_ID_HEADER);

                    match request_id {
                        Some(request_id) => info_span!(
                            "http_request",
                            request_id = ?request_id,
                        ),
                        None => {
                            error!("could not extract request_id");
                            info_span!("http_request")
                        }
                    }
                }),
            )
            // send headers from request to response headers
            .layer(PropagateRequestIdLayer::new(x_request_id));

        let songs = Router::new()
            .route("/api/v1/songs", get(list_songs))
            .route("/api/v1/songs/{id}", get(get_song))
            .route("/api/v1/songs/create", post(create_song))
            .route("/api/v1/songs/update/{id}", put(update_song))
            .route("/api/v1/songs/delete/{id}", delete(delete_song))
            .route_layer(middleware::from_fn_with_state(
                app_state.clone(),
                require_api_key,
            ));

        Router::new()
            .route("/api/v1/health", get(health_check))
            .merge(songs)
            .with_state(app_state)
            .layer(middleware_stack)
            .layer(TimeoutLayer::new(Duration::from_secs(10)))
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        let Application { listener, app } = self;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
