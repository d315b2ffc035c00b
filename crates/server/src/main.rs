//! Survey-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use survey_api::{AppState, endpoints};
use survey_common::{Config, HmacAuthenticator};
use survey_core::{CompanyService, ReportService, SubmissionService, TokenService};
use survey_db::repositories::{
    CompanyRepository, FreeTextRepository, SurveyResponseRepository, SurveyTokenRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Hard cap on inbound request bodies (16 MB).
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
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
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "survey=info,tower_http=debug".into()),
        )
        .init();

    info!("Starting survey-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = survey_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    survey_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let token_repo = SurveyTokenRepository::new(Arc::clone(&db));
    let response_repo = SurveyResponseRepository::new(Arc::clone(&db));
    let free_text_repo = FreeTextRepository::new(Arc::clone(&db));
    let company_repo = CompanyRepository::new(Arc::clone(&db));

    // Initialize services
    let authenticator = Arc::new(HmacAuthenticator::new(&config.auth.secret));

    let token_service = TokenService::new(
        Arc::clone(&db),
        token_repo.clone(),
        company_repo.clone(),
    );
    let submission_service = SubmissionService::new(Arc::clone(&db), token_service.clone());
    let report_service = ReportService::new(
        response_repo.clone(),
        free_text_repo.clone(),
        company_repo.clone(),
    );
    let company_service = CompanyService::new(
        Arc::clone(&db),
        company_repo.clone(),
        authenticator.clone(),
    );

    // Create app state
    let state = AppState {
        token_service,
        submission_service,
        report_service,
        company_service,
        authenticator,
        form_template: config.survey.form_template.clone().into(),
    };

    // Build router
    let app = Router::new()
        .merge(endpoints::survey_page::router())
        .nest("/api", endpoints::router())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
