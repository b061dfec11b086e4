//! Web server exposing the calculators as a JSON API.
//!
//! Every request is computed from its body alone; the router holds no state.

use std::net::{IpAddr, SocketAddr};

use axum::{
    Router,
    extract::{FromRequest, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::error::{CalcError, FormulaError, ProgramError};
use crate::formulas::{Formula, estimate_1rm, round_to_decimals};
use crate::hlm::{
    HlmAlternateProgram, HlmAlternateRequest, HlmStandardProgram, HlmStandardRequest,
    generate_alternate, generate_standard,
};
use crate::rep_max::{RepMaxRow, build_table, format_table};
use crate::wendler::{self, WendlerProgram, WendlerRequest};

/// Settings for binding and serving the API.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Origins allowed by CORS; empty or `*` allows any origin.
    pub cors_origins: Vec<String>,
}

// === Errors ===

/// Errors surfaced to API clients as `{"detail": ...}`.
///
/// Domain errors answer 400; body rejections keep axum's status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", .0.body_text())]
    Json(#[from] JsonRejection),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error(transparent)]
    Program(#[from] ProgramError),
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Json(rejection) => rejection.status(),
            _ => StatusCode::BAD_REQUEST,
        };
        let detail = self.to_string();
        log::warn!("Rejected request ({}): {}", status, detail);
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

// === JSON Request/Response Types ===

/// JSON body extractor whose rejections use the `{"detail": ...}` error body.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
struct ApiJson<T>(T);

#[derive(Debug, Deserialize)]
pub struct OneRmRequest {
    pub weight: f64,
    pub reps: i32,
    pub formula: String,
}

#[derive(Debug, Serialize)]
pub struct OneRmResponse {
    pub one_rm: f64,
    pub formatted_table: String,
    pub table: Vec<RepMaxRow>,
}

// === Router Setup ===

/// Creates the application router.
///
/// The short paths (`/calc/1rm`, `/hlm/...`, `/echo/`) are kept for older clients.
pub fn create_router(cors_origins: &[String]) -> Router {
    Router::new()
        .route("/calcs/1rm", post(calculate_one_rm))
        .route("/calc/1rm", post(calculate_one_rm))
        .route("/programs/hlm/standard", post(hlm_standard))
        .route("/hlm/standard", post(hlm_standard))
        .route("/programs/hlm/alternate", post(hlm_alternate))
        .route("/hlm/alternate", post(hlm_alternate))
        .route("/programs/wendler531", post(wendler_531))
        .route("/echo", post(echo))
        .route("/echo/", post(echo))
        .route("/health", get(health))
        .layer(cors_layer(cors_origins))
}

/// Builds the CORS layer for the configured origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let trimmed: Vec<&str> = origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .collect();
    let allowed: Vec<HeaderValue> = trimmed
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let allow_origin = if allowed.is_empty() || trimmed.contains(&"*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Runs the web server until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let app = create_router(&config.cors_origins);
    let addr = SocketAddr::new(config.host, config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}

// === API Handlers ===

/// POST /calcs/1rm - Estimated 1RM and rep-max table.
async fn calculate_one_rm(
    ApiJson(request): ApiJson<OneRmRequest>,
) -> Result<Json<OneRmResponse>, ApiError> {
    let formula: Formula = request.formula.parse()?;
    let one_rm = estimate_1rm(request.weight, request.reps, formula);
    if !one_rm.is_finite() {
        return Err(CalcError::NonFinite("estimated one_rm").into());
    }

    let table = build_table(one_rm, request.reps, formula)?;
    log::debug!(
        "1RM {:?}: {} x {} -> {:.2}",
        formula,
        request.weight,
        request.reps,
        one_rm
    );

    Ok(Json(OneRmResponse {
        one_rm: round_to_decimals(one_rm, 2),
        formatted_table: format_table(&table),
        table,
    }))
}

/// POST /programs/hlm/standard - Standard HLM week.
async fn hlm_standard(
    ApiJson(request): ApiJson<HlmStandardRequest>,
) -> Result<Json<HlmStandardProgram>, ApiError> {
    let program = generate_standard(&request)?;
    log::debug!("Generated {}", program.template_name);
    Ok(Json(program))
}

/// POST /programs/hlm/alternate - Alternate-pressing HLM week.
async fn hlm_alternate(
    ApiJson(request): ApiJson<HlmAlternateRequest>,
) -> Result<Json<HlmAlternateProgram>, ApiError> {
    let program = generate_alternate(&request)?;
    log::debug!("Generated {}", program.template_name);
    Ok(Json(program))
}

/// POST /programs/wendler531 - Four-week 5/3/1 cycle.
async fn wendler_531(
    ApiJson(request): ApiJson<WendlerRequest>,
) -> Result<Json<WendlerProgram>, ApiError> {
    let program = wendler::generate(&request)?;
    log::debug!(
        "Generated 5/3/1 cycle for [{}]",
        program
            .training_maxes
            .keys()
            .map(|lift| lift.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(Json(program))
}

/// POST /echo - Returns the posted body.
async fn echo(ApiJson(body): ApiJson<Value>) -> Json<Value> {
    Json(json!({ "received_data": body }))
}

/// GET /health - Liveness probe.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
