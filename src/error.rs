//! Error types for the HTTP action layer.
//!
//! Unplaceable periods are not errors; they come back as
//! `PlacementFailure`s inside a successful response.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::ids::IdError;

/// A `SolverInput` the solver should not be run on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("ข้อมูลไม่ครบถ้วน (academicYear, semester, teacherId)")]
    MissingScope,
    #[error(
        "subject {subject_code} ({grade_id}) has {placed} periods placed but only {per_week} per week"
    )]
    OverPlaced {
        subject_code: String,
        grade_id: String,
        placed: u32,
        per_week: u32,
    },
    #[error(transparent)]
    Id(#[from] IdError),
    #[error("timeslot {timeslot_id} is outside term {term}")]
    TimeslotOutOfTerm { timeslot_id: String, term: String },
    #[error("timeslot {timeslot_id} does not match its day/period ({day} {period})")]
    TimeslotMismatch {
        timeslot_id: String,
        day: String,
        period: u32,
    },
    #[error("duplicate timeslot {0}")]
    DuplicateTimeslot(String),
    #[error("duplicate room {0}")]
    DuplicateRoom(u32),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),
    #[error("เกิดข้อผิดพลาดในระบบจัดตารางอัตโนมัติ")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            message: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}
