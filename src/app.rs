use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::{env, net::SocketAddr, sync::Arc};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::catalog::Catalog;
use crate::error::{ProviderError, StorageError};
use crate::genres;
use crate::models::{Movie, MovieDetails, MoviePage};
use crate::moods;
use crate::omdb::{OmdbApi, OmdbClient};
use crate::store::{Collection, FileStorage, ProfileStore, StoreChange};
use crate::tvmaze::{TvMazeApi, TvMazeClient};

const PORT: u16 = 3210;
const MAX_BODY_BYTES: usize = 64 * 1024; // collection writes carry one Movie

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub store: Arc<ProfileStore>,
}

pub async fn run_server() -> Result<()> {
    let tvmaze: Arc<dyn TvMazeApi> = Arc::new(TvMazeClient::new()?);
    let omdb: Arc<dyn OmdbApi> = Arc::new(OmdbClient::from_env()?);
    let catalog = Catalog::new(tvmaze, omdb);

    let data_dir = env::var("CINESCOUT_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let storage = FileStorage::open(data_dir.as_str())?;
    let store = Arc::new(ProfileStore::open(Box::new(storage)));
    info!("Persisting collections under {}", data_dir);

    let mut events = store.subscribe();
    tokio::spawn(async move {
        while events.changed().await.is_ok() {
            let event = *events.borrow_and_update();
            if let Some(event) = event {
                let verb = match event.change {
                    StoreChange::Added => "added to",
                    StoreChange::Removed => "removed from",
                };
                info!("Movie {} {} {}", event.movie_id, verb, event.collection);
            }
        }
    });

    let state = AppState { catalog, store };
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], PORT));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/movies/popular", get(popular))
        .route("/api/movies/top-rated", get(top_rated))
        .route("/api/movies/now-playing", get(now_playing))
        .route("/api/movies/search", get(search))
        .route("/api/movies/:id", get(details))
        .route("/api/genres", get(list_genres))
        .route("/api/moods", get(list_moods))
        .route("/api/moods/:mood", get(mood_movies))
        .route("/api/watchlist", get(watchlist_index).post(watchlist_add))
        .route("/api/watchlist/:id", delete(watchlist_remove))
        .route("/api/favorites", get(favorites_index).post(favorites_add))
        .route("/api/favorites/:id", delete(favorites_remove))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// JSON error envelope. Providers and storage map onto distinct statuses so
/// "empty catalog" and "provider unreachable" stay distinguishable at the
/// edge.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        if err.is_not_found() {
            return Self::not_found("movie not found");
        }
        Self::new(StatusCode::BAD_GATEWAY, err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<u32>,
}

impl PageQuery {
    fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    query: String,
    page: Option<u32>,
}

async fn health() -> &'static str {
    "OK"
}

async fn popular(
    State(state): State<AppState>,
    Query(q): Query<PageQuery>,
) -> Result<Json<MoviePage>, ApiError> {
    Ok(Json(state.catalog.popular(q.page()).await?))
}

async fn top_rated(
    State(state): State<AppState>,
    Query(q): Query<PageQuery>,
) -> Result<Json<MoviePage>, ApiError> {
    Ok(Json(state.catalog.top_rated(q.page()).await?))
}

async fn now_playing(
    State(state): State<AppState>,
    Query(q): Query<PageQuery>,
) -> Result<Json<MoviePage>, ApiError> {
    Ok(Json(state.catalog.now_playing(q.page()).await?))
}

async fn search(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<MoviePage>, ApiError> {
    let page = q.page.unwrap_or(1).max(1);
    Ok(Json(state.catalog.search(&q.query, page).await?))
}

async fn details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MovieDetails>, ApiError> {
    Ok(Json(state.catalog.details(id).await?))
}

async fn list_genres() -> Json<Vec<crate::models::Genre>> {
    Json(genres::all())
}

async fn list_moods() -> Json<&'static [moods::MoodFilter]> {
    Json(moods::MOOD_FILTERS)
}

async fn mood_movies(
    State(state): State<AppState>,
    Path(mood): Path<String>,
    Query(q): Query<PageQuery>,
) -> Result<Json<MoviePage>, ApiError> {
    let filter = moods::find(&mood)
        .ok_or_else(|| ApiError::not_found(format!("unknown mood '{}'", mood)))?;
    Ok(Json(
        state.catalog.by_genres(filter.genre_ids, q.page()).await?,
    ))
}

async fn watchlist_index(State(state): State<AppState>) -> Json<Vec<Movie>> {
    Json(state.store.movies(Collection::Watchlist).await)
}

async fn watchlist_add(
    State(state): State<AppState>,
    Json(movie): Json<Movie>,
) -> Result<Response, ApiError> {
    collection_add(&state, Collection::Watchlist, movie).await
}

async fn watchlist_remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    collection_remove(&state, Collection::Watchlist, id).await
}

async fn favorites_index(State(state): State<AppState>) -> Json<Vec<Movie>> {
    Json(state.store.movies(Collection::Favorites).await)
}

async fn favorites_add(
    State(state): State<AppState>,
    Json(movie): Json<Movie>,
) -> Result<Response, ApiError> {
    collection_add(&state, Collection::Favorites, movie).await
}

async fn favorites_remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    collection_remove(&state, Collection::Favorites, id).await
}

async fn collection_add(
    state: &AppState,
    collection: Collection,
    movie: Movie,
) -> Result<Response, ApiError> {
    let added = state.store.add(collection, movie).await?;
    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(json!({ "added": added }))).into_response())
}

async fn collection_remove(
    state: &AppState,
    collection: Collection,
    movie_id: i64,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = state.store.remove(collection, movie_id).await?;
    Ok(Json(json!({ "removed": removed })))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
