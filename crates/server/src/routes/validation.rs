//! `GET /api/v1/tips/validation`

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use tipcheck_core::ValidationOutcome;

use super::{DataResponse, credential};
use crate::error::ApiError;
use crate::handler::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationQuery {
    pub cast_url: Option<String>,
    pub force_refresh: Option<String>,
}

impl ValidationQuery {
    /// Only the literal `true` forces a refresh.
    pub fn force_refresh(&self) -> bool {
        self.force_refresh.as_deref() == Some("true")
    }
}

pub async fn validate_tip(
    State(state): State<AppState>, headers: HeaderMap, query: Result<Query<ValidationQuery>, QueryRejection>,
) -> Result<Json<DataResponse<ValidationOutcome>>, ApiError> {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            state.validation.authorizer().check(credential(&headers))?;
            tracing::debug!(error = %rejection, "rejected validation query");
            return Err(ApiError::bad_request("Missing castUrl"));
        }
    };
    let cast_url = query.cast_url.as_deref().unwrap_or_default();
    let outcome = state
        .validation
        .validate(credential(&headers), cast_url, query.force_refresh())
        .await?;

    Ok(Json(DataResponse { data: Some(outcome) }))
}
