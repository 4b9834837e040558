use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use super::model::Employee;
use super::validation::{parse_create, parse_update, FieldViolation};
use crate::{error::ApiError, state::AppState};

const INVALID_ID: &str = "Invalid ID";
const INVALID_ORGANIZATION_ID: &str = "Invalid organization ID";
const NOT_FOUND: &str = "Employee not found";

pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/employees", post(create_employee))
        .route(
            "/employees/organizations/:organization_id",
            get(get_all_employees),
        )
        .route(
            "/employees/organizations/:organization_id/:id",
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
}

fn parse_key(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok()
}

/// (organization_id, id) from the path, or 400 before any store access.
fn parse_keys(organization_id: &str, id: &str) -> Result<(i32, i32), ApiError> {
    match (parse_key(organization_id), parse_key(id)) {
        (Some(org), Some(id)) => Ok((org, id)),
        _ => {
            warn!(organization_id, id, "invalid employee path");
            Err(ApiError::BadRequest(INVALID_ID))
        }
    }
}

fn body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(v)) => Ok(v),
        Err(rejection) => Err(ApiError::Validation(vec![FieldViolation {
            path: Vec::new(),
            code: "invalid_body".into(),
            message: rejection.body_text(),
        }])),
    }
}

fn internal(e: anyhow::Error) -> ApiError {
    error!(error = ?e, "employee store failed");
    ApiError::Internal
}

/// POST /employees
#[instrument(skip(state, payload))]
pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let input = parse_create(body(payload)?).map_err(|details| {
        warn!(violations = details.len(), "create employee rejected");
        ApiError::Validation(details)
    })?;

    let employee = state
        .employees
        .create_employee(input)
        .await
        .map_err(internal)?;

    info!(
        organization_id = employee.organization_id,
        employee_id = employee.id,
        "employee created"
    );
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /employees/organizations/:organization_id/:id
#[instrument(skip(state))]
pub async fn get_employee(
    State(state): State<AppState>,
    Path((organization_id, id)): Path<(String, String)>,
) -> Result<Json<Employee>, ApiError> {
    let (organization_id, id) = parse_keys(&organization_id, &id)?;

    state
        .employees
        .get_employee_by_id(id, organization_id)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

/// GET /employees/organizations/:organization_id
#[instrument(skip(state))]
pub async fn get_all_employees(
    State(state): State<AppState>,
    Path(organization_id): Path<String>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let Some(organization_id) = parse_key(&organization_id) else {
        warn!(organization_id = %organization_id, "invalid organization path");
        return Err(ApiError::BadRequest(INVALID_ORGANIZATION_ID));
    };

    let employees = state
        .employees
        .get_all_employees(organization_id)
        .await
        .map_err(internal)?;
    Ok(Json(employees))
}

/// PUT /employees/organizations/:organization_id/:id
#[instrument(skip(state, payload))]
pub async fn update_employee(
    State(state): State<AppState>,
    Path((organization_id, id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    let (organization_id, id) = parse_keys(&organization_id, &id)?;
    let input = parse_update(body(payload)?).map_err(|details| {
        warn!(organization_id, employee_id = id, "update employee rejected");
        ApiError::Validation(details)
    })?;

    state
        .employees
        .update_employee(id, organization_id, input)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

/// DELETE /employees/organizations/:organization_id/:id
#[instrument(skip(state))]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path((organization_id, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let (organization_id, id) = parse_keys(&organization_id, &id)?;

    let deleted = state
        .employees
        .delete_employee(id, organization_id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(ApiError::NotFound(NOT_FOUND));
    }

    info!(organization_id, employee_id = id, "employee deleted");
    Ok(StatusCode::NO_CONTENT)
}
