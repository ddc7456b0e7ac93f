use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{ServerConfig, SolverConfig};
use crate::constraints::MAX_SCORE;
use crate::data::{Placement, PlacementFailure, SolverInput, SolverStats};
use crate::error::ApiError;
use crate::solver;
use crate::validation::validate_input;

const NOTHING_TO_PLACE: &str = "ไม่มีวิชาที่ต้องจัดเพิ่ม";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoArrangeResponse {
    pub success: bool,
    pub placements: Vec<Placement>,
    pub failures: Vec<PlacementFailure>,
    pub stats: SolverStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

async fn auto_arrange_handler(
    State(config): State<SolverConfig>,
    Json(mut input): Json<SolverInput>,
) -> Result<Json<AutoArrangeResponse>, ApiError> {
    info!(
        "Auto-arrange request for teacher {} ({}-{})",
        input.teacher_id, input.semester, input.academic_year
    );

    if let Err(e) = validate_input(&input) {
        warn!("Rejected auto-arrange input: {}", e);
        return Err(e.into());
    }

    input.unplaced_subjects.retain(|s| s.remaining_periods() > 0);
    if input.unplaced_subjects.is_empty() {
        return Ok(Json(AutoArrangeResponse {
            success: true,
            placements: Vec::new(),
            failures: Vec::new(),
            stats: SolverStats {
                quality_score: MAX_SCORE,
                ..SolverStats::default()
            },
            message: Some(NOTHING_TO_PLACE.to_string()),
        }));
    }

    // the solver is CPU bound for up to its timeout budget
    let result = tokio::task::spawn_blocking(move || solver::solve_with_config(&input, &config))
        .await
        .map_err(|e| {
            error!("Auto-arrange solver task failed: {}", e);
            ApiError::Internal(e.to_string())
        })?;

    info!(
        "Solver completed: {} placed, {} failed, {} ms, quality {}",
        result.stats.successfully_placed,
        result.stats.failed,
        result.stats.duration_ms,
        result.stats.quality_score
    );
    for failure in &result.failures {
        info!("Unplaced: {}", failure);
    }

    Ok(Json(AutoArrangeResponse {
        success: result.success,
        placements: result.placements,
        failures: result.failures,
        stats: result.stats,
        message: None,
    }))
}

async fn health_handler() -> &'static str {
    "ok"
}

pub fn router(config: SolverConfig) -> Router {
    Router::new()
        .route("/v1/schedule/auto-arrange", post(auto_arrange_handler))
        .route("/healthz", get(health_handler))
        .with_state(config)
}

pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let app = router(config.solver);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
