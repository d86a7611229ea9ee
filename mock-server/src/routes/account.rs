use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use tracing::info;

use super::auth::CurrentAccount;
use crate::error::ApiFailure;
use crate::extract::{IdPath, JsonBody};
use crate::messages::{must_be_string, should_not_be_empty, NOT_YOUR_ACCOUNT, REGISTRATION_COMPLETED, REGISTRATION_FIELDS};
use crate::models::Account;
use crate::state::{now_millis, AppState};

pub async fn my_account(
    State(state): State<AppState>,
    CurrentAccount(id): CurrentAccount,
) -> Result<Json<Account>, ApiFailure> {
    state
        .db
        .read()
        .await
        .account_view(id)
        .map(Json)
        .ok_or_else(ApiFailure::unauthorized)
}

pub async fn delete_account(
    State(state): State<AppState>,
    CurrentAccount(id): CurrentAccount,
    IdPath(target): IdPath,
) -> Result<Json<bool>, ApiFailure> {
    if target != id {
        return Err(ApiFailure::forbidden(NOT_YOUR_ACCOUNT));
    }
    Ok(Json(state.db.write().await.delete_account(id)))
}

pub async fn complete_registration(
    State(state): State<AppState>,
    CurrentAccount(id): CurrentAccount,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<Account>), ApiFailure> {
    let errors = registration_errors(&body);
    if !errors.is_empty() {
        return Err(ApiFailure::invalid_fields(errors));
    }

    let mut db = state.db.write().await;
    let record = db.account_mut(id).ok_or_else(ApiFailure::unauthorized)?;
    if record.registration_completed {
        return Err(ApiFailure::bad_request(REGISTRATION_COMPLETED));
    }
    let text = |field: &str| body.get(field).and_then(Value::as_str).map(str::to_string);
    record.full_name = text("fullName");
    record.gender = text("gender");
    record.preferred_gender = text("preferredGender");
    record.registration_completed = true;
    record.last_seen = now_millis();
    info!(account_id = id, "registration completed");

    let account = db.account_view(id).ok_or_else(ApiFailure::unauthorized)?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Per field, in order: a type message for anything that is not a string,
/// an empty message for missing, null or empty values.
fn registration_errors(body: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    for field in REGISTRATION_FIELDS {
        match body.get(field) {
            Some(Value::String(value)) if !value.is_empty() => {}
            Some(Value::String(_)) => errors.push(should_not_be_empty(field)),
            None | Some(Value::Null) => {
                errors.push(must_be_string(field));
                errors.push(should_not_be_empty(field));
            }
            Some(_) => errors.push(must_be_string(field)),
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_body_reports_type_then_empty_per_field() {
        assert_eq!(
            registration_errors(&json!({})),
            [
                "fullName must be a string",
                "fullName should not be empty",
                "gender must be a string",
                "gender should not be empty",
                "preferredGender must be a string",
                "preferredGender should not be empty",
            ]
        );
    }

    #[test]
    fn empty_strings_only_report_empty() {
        assert_eq!(
            registration_errors(&json!({"fullName": "", "gender": "", "preferredGender": ""})),
            [
                "fullName should not be empty",
                "gender should not be empty",
                "preferredGender should not be empty",
            ]
        );
    }

    #[test]
    fn numbers_only_report_type() {
        assert_eq!(
            registration_errors(&json!({"fullName": 345, "gender": 3, "preferredGender": 0})),
            [
                "fullName must be a string",
                "gender must be a string",
                "preferredGender must be a string",
            ]
        );
    }

    #[test]
    fn valid_body_has_no_errors() {
        let body = json!({"fullName": "Ann Lee", "gender": "female", "preferredGender": "male"});
        assert!(registration_errors(&body).is_empty());
    }
}
