use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{State, rejection::FormRejection},
    http::{HeaderValue, StatusCode},
    response::Html,
    routing::{get, post},
};
use reqwest::{
    Method,
    header::{ACCEPT, CONTENT_TYPE},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument, warn};

use crate::api::dto::CheckRequest;
use crate::configuration::Settings;
use crate::domain::{ProbeResult, RequestValidator};
use crate::error::CheckError;
use crate::probe::{ProberBuildError, StatusProber};

const INDEX_HTML: &str = include_str!("../static/index.html");

type AppState = (Arc<StatusProber>, Arc<RequestValidator>);

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to bind listener: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Prober(#[from] ProberBuildError),

    #[error("Invalid CORS origin '{origin}': {reason}")]
    CorsOrigin { origin: String, reason: String },
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Binds the listener first so the self-probe guard knows the real port,
    /// even when the configured port is 0.
    pub async fn build(configuration: Settings) -> Result<Self, StartupError> {
        let listener = TcpListener::bind(configuration.application.address()).await?;
        let bound = listener.local_addr()?;

        let validator = RequestValidator::new(bound, &configuration.application.host);
        let prober = StatusProber::new(&configuration.probe)?;
        info!(
            address = %bound,
            method = %prober.method(),
            follow_redirects = prober.follows_redirects(),
            timeout_seconds = configuration.probe.timeout_seconds,
            "Application built"
        );

        let router = Self::app(Arc::new(prober), Arc::new(validator), &configuration)?;

        Ok(Self {
            port: bound.port(),
            listener,
            router,
        })
    }

    pub fn app(
        prober: Arc<StatusProber>,
        validator: Arc<RequestValidator>,
        configuration: &Settings,
    ) -> Result<Router, StartupError> {
        let allowed_origins: Vec<HeaderValue> = configuration
            .cors
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| StartupError::CorsOrigin {
                    origin: origin.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cors = CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, ACCEPT]);

        let router = Router::new()
            .route("/", get(index))
            .route("/health", get(health_check))
            .route("/check", post(check_handler).fallback(method_not_allowed))
            .with_state((prober, validator))
            .layer(TraceLayer::new_for_http())
            .layer(cors);

        Ok(router)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        info!(port = self.port, "Listening");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

#[instrument(level = "info", skip_all)]
async fn check_handler(
    State((prober, validator)): State<AppState>,
    form: Result<Form<CheckRequest>, FormRejection>,
) -> Result<ProbeResult, CheckError> {
    let Form(payload) = form.map_err(|e| {
        warn!(error = %e, "Unreadable check request");
        CheckError::InvalidInput(e.body_text())
    })?;

    let target = validator.validate(&payload.url).inspect_err(|e| {
        warn!(url = %payload.url, error = %e, "Rejected check request");
    })?;

    info!(url = %target, "Received check request");
    prober.probe(&target).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
