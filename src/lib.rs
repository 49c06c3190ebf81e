mod authentication;
pub mod config;
mod data_formats;
mod db_helpers;
mod errors;
pub mod feed;
mod handlers;
pub mod models;
pub mod ownership;
pub mod visibility;

use std::{net::SocketAddr, str::FromStr, sync::Arc};

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use config::Config;
pub use data_formats::*;
pub use errors::{RequestError, RequestErrorJsonWrapper};
use handlers::*;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Sqlite, SqlitePool,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub type JsonResponse<T> = (StatusCode, Json<T>);

/// Installs the global tracing subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run_app(app: Router, config: Config) -> Result<()> {
    let address = config.address()?;
    let app = build_app(app, config).await?;
    tracing::info!(%address, "server started");
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

/// Opens the database and attaches the shared state every handler expects.
pub async fn build_app(app: Router, config: Config) -> Result<Router> {
    let db = init_db(&config.database_url).await?;
    Ok(app
        .layer(Extension(Arc::new(db)))
        .layer(Extension(Arc::new(config)))
        .layer(TraceLayer::new_for_http()))
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!(db_url, "creating database");
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("Failed to create database {db_url}"))?;
    } else {
        tracing::debug!(db_url, "database already exists");
    }
    let options = SqliteConnectOptions::from_str(db_url)
        .context("Invalid DATABASE_URL")?
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("migrations completed");
    Ok(pool)
}

/// Binds an ephemeral port on localhost.
pub fn get_random_free_port() -> Result<std::net::TcpListener> {
    std::net::TcpListener::bind("127.0.0.1:0").context("Could not get a free port")
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/users/login", post(login_user))
        .route("/users", post(register_user))
        .route(
            "/user",
            get(get_current_user).put(update_user).delete(delete_user),
        )
        .route("/profile/:username", get(get_profile))
        .route("/", get(list_posts))
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/posts/:id/comment", post(add_comment))
        .route("/posts/:id/edit_comment/:comment_id", put(edit_comment))
        .route("/posts/:id/delete_comment/:comment_id", delete(delete_comment))
        .route("/category/:slug", get(category_posts))
        .route("/categories", post(create_category))
        .route("/categories/:slug", delete(delete_category))
        .route("/locations", post(create_location))
        .route("/locations/:id", delete(delete_location))
        .fallback(not_found)
}

/// Serves `make_router()` on an already-bound listener; returns its address.
pub async fn spawn_app(config: Config, listener: std::net::TcpListener) -> Result<SocketAddr> {
    let address = listener.local_addr()?;
    let app = build_app(make_router(), config).await?;
    let server = axum::Server::from_tcp(listener)?.serve(app.into_make_service());
    tokio::spawn(async move {
        if let Err(e) = server.await {
            tracing::error!(error = %e, "server stopped");
        }
    });
    Ok(address)
}
