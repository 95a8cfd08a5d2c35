//! Patient enrollment and retrieval.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use shared_types::{Actor, Patient, PatientId, StudyId};

use crate::domain::error::ApiError;
use crate::router::AppState;

/// `POST /api/patients` — enrolls a patient, capturing variable values for
/// their study in the same step.
pub async fn enroll(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(new): Json<rct_01_trial_registry::NewPatient>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let patient = state.patients.enroll(actor, new)?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// `GET /api/patients/:id` — demographics plus resolved variable values.
pub async fn detail(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(patient_id): Path<u64>,
) -> Result<Json<rct_01_trial_registry::PatientDetail>, ApiError> {
    let detail = state
        .patients
        .patient_detail(actor, PatientId(patient_id))?;
    Ok(Json(detail))
}

/// `GET /api/studies/:id/patients`
pub async fn list_for_study(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(study_id): Path<u64>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(
        state.patients.list_for_study(actor, StudyId(study_id))?,
    ))
}
