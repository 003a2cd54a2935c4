//! Tally Web Server
//!
//! Axum-based REST API for the Tally personal finance tracker.
//!
//! Security features:
//! - Bearer API key authentication resolved to a user (use --no-auth with a dev user for local work)
//! - Every record is scoped to the authenticated owner
//! - Restrictive CORS policy
//! - Full audit logging for all API access (reads and writes)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use tally_core::db::Database;
use tally_core::models::Owner;

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Maximum accepted JSON body (bytes)
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Environment variable listing allowed CORS origins (comma-separated)
pub const ALLOWED_ORIGINS_ENV: &str = "TALLY_ALLOWED_ORIGINS";

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Owner assumed for unauthenticated requests when `require_auth` is off
    pub dev_user: Option<Owner>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            dev_user: None,
        }
    }
}

impl ServerConfig {
    /// Read `TALLY_ALLOWED_ORIGINS` into `allowed_origins`
    pub fn with_origins_from_env(mut self) -> Self {
        if let Ok(origins) = std::env::var(ALLOWED_ORIGINS_ENV) {
            self.allowed_origins = parse_origins(&origins);
        }
        self
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// How the current request was authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    ApiKey,
    DevUser,
}

/// Authentication middleware - resolves the caller to an [`Owner`]
///
/// The owner is inserted into the request extensions for handlers. A bearer
/// key is hashed and matched in constant time against stored digests. With
/// authentication disabled, requests without a key run as the configured dev
/// user.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());

    if let Some(key) = bearer {
        match state.db.find_user_by_api_key(&key) {
            Ok(Some(user)) => {
                debug!(owner = %user.owner(), path = %request.uri().path(), "Authenticated via API key");
                request.extensions_mut().insert(user.owner());
                request.extensions_mut().insert(AuthMethod::ApiKey);
                return next.run(request).await;
            }
            Ok(None) => {
                warn!(path = %request.uri().path(), "Rejected unknown API key");
            }
            Err(e) => {
                error!(error = %e, "API key lookup failed");
                return AppError::internal("An internal error occurred").into_response();
            }
        }
    } else if !state.config.require_auth {
        if let Some(owner) = state.config.dev_user {
            request.extensions_mut().insert(owner);
            request.extensions_mut().insert(AuthMethod::DevUser);
            return next.run(request).await;
        }
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no valid auth");
    AppError::unauthorized("Authentication required").into_response()
}

/// The owner the auth middleware resolved for this request
pub(crate) fn request_owner(request: &Request) -> Result<Owner, AppError> {
    request
        .extensions()
        .get::<Owner>()
        .copied()
        .ok_or_else(|| AppError::unauthorized("Authentication required"))
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    let api_routes = Router::new()
        // Auth
        .route("/me", get(handlers::get_me))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/transactions/:id",
            get(handlers::get_transaction)
                .put(handlers::replace_transaction)
                .patch(handlers::patch_transaction)
                .delete(handlers::delete_transaction),
        )
        // Categories
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/:id",
            get(handlers::get_category)
                .patch(handlers::rename_category)
                .delete(handlers::delete_category),
        )
        // Month targets
        .route(
            "/targets/month",
            get(handlers::list_month_targets).post(handlers::create_month_target),
        )
        .route(
            "/targets/month/:year/:month",
            get(handlers::get_month_target),
        )
        .route(
            "/targets/month/id/:id",
            axum::routing::put(handlers::replace_month_target)
                .patch(handlers::patch_month_target)
                .delete(handlers::delete_month_target),
        )
        // Save-money targets
        .route(
            "/targets/save",
            get(handlers::list_save_targets).post(handlers::create_save_target),
        )
        .route(
            "/targets/save/:id",
            get(handlers::get_save_target)
                .put(handlers::replace_save_target)
                .patch(handlers::patch_save_target)
                .delete(handlers::delete_save_target),
        )
        // Charts
        .route("/charts/range_cost", get(handlers::chart_range_cost))
        .route("/charts/type_cost", get(handlers::chart_type_cost))
        .route("/charts/compare_cost", get(handlers::chart_compare_cost))
        .route(
            "/charts/target/:year/:month",
            get(handlers::chart_month_target),
        )
        .route(
            "/charts/save_target/:category_id",
            get(handlers::chart_save_target),
        )
        // Reports
        .route(
            "/reports/monthly/:year/:month",
            get(handlers::report_monthly),
        )
        .route("/reports/yearly/:year", get(handlers::report_yearly))
        // Audit log
        .route("/audit", get(handlers::list_audit_log));

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server
pub async fn serve(db: Database, host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(db, host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        match config.dev_user {
            Some(owner) => warn!(%owner, "Authentication disabled - do not expose to network!"),
            None => warn!("Authentication disabled but no dev user set; requests without an API key will be rejected"),
        }
    }

    let app = create_router(db, config);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Tally server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn conflict(msg: &str) -> Self {
        Self::with_status(StatusCode::CONFLICT, msg)
    }

    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Map caller-caused core errors to their status; `None` for system errors
    pub fn from_core(err: &tally_core::Error) -> Option<Self> {
        use tally_core::Error;

        match err {
            Error::InvalidInput(msg) => Some(Self::bad_request(msg)),
            Error::RangeTooShort(_) => Some(Self::bad_request(&err.to_string())),
            Error::NotFound(msg) => Some(Self::not_found(msg)),
            Error::Conflict(msg) => Some(Self::conflict(msg)),
            Error::Unauthorized => Some(Self::unauthorized("Authentication required")),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        if let Some(mapped) = err
            .downcast_ref::<tally_core::Error>()
            .and_then(Self::from_core)
        {
            return mapped;
        }
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
