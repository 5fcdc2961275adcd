use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use taskdeck::core::auth::api::{AuthApiState, auth_api_router};
use taskdeck::core::auth::guard::AuthGuard;
use taskdeck::core::auth::jwt::TokenManager;
use taskdeck::core::auth::revocation::RevocationStore;
use taskdeck::core::auth::service::AuthService;
use taskdeck::core::categories::{CategoryApiState, category_api_router};
use taskdeck::core::config::Config;
use taskdeck::core::db::pool::create_pool_with_migrations;
use taskdeck::core::db::repositories::{CategoryRepository, TaskRepository, UserRepository};
use taskdeck::core::protected::{ProtectedApiState, protected_api_router};
use taskdeck::core::tasks::{TaskApiState, task_api_router};

/// How often expired revocation entries are swept out
const REVOCATION_SWEEP_INTERVAL: Duration = Duration::from_secs(30 * 60);

#[tokio::main]
async fn main() {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load application config from environment variables
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Config loaded: app={}, env={}, issuer={}",
        config.app.name,
        config.app.env,
        config.token.issuer
    );

    // Connect to PostgreSQL and apply migrations
    let pool = match create_pool_with_migrations(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    // Repositories
    let users = UserRepository::new(pool.clone());
    let categories = CategoryRepository::new(pool.clone());
    let tasks = TaskRepository::new(pool);

    // Auth core: token manager, revocation store, session guard
    let tokens = TokenManager::new(config.token.clone());
    let revocation = RevocationStore::new();
    let guard = AuthGuard::new(tokens.clone(), Some(revocation.clone()));
    let auth_service = AuthService::new(users, tokens, revocation.clone());

    start_revocation_sweep(revocation);

    // Build the application router
    let app = Router::new()
        .merge(auth_api_router(AuthApiState { auth_service }))
        .merge(protected_api_router(ProtectedApiState {
            guard: guard.clone(),
            app_name: config.app.name.clone(),
        }))
        .merge(category_api_router(CategoryApiState {
            categories: categories.clone(),
            guard: guard.clone(),
        }))
        .merge(task_api_router(TaskApiState {
            tasks,
            categories,
            guard,
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.server.addr();
    tracing::info!("listening on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Periodically drop revocation entries whose horizon has passed
///
/// Keeps the in-memory revoked set bounded; admission correctness never
/// depends on this sweep running.
fn start_revocation_sweep(revocation: RevocationStore) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(REVOCATION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = revocation.purge_expired(chrono::Utc::now());
            if removed > 0 {
                tracing::debug!("Revocation sweep removed {} expired entries", removed);
            }
        }
    });
}
