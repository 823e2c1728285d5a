//! `GET /api/v1/tips/allowance`

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use tipcheck_client::AllowanceData;

use super::{DataResponse, credential};
use crate::error::ApiError;
use crate::handler::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AllowanceQuery {
    pub fid: Option<String>,
}

impl AllowanceQuery {
    /// A positive numeric fid.
    pub fn fid(&self) -> Option<u64> {
        self.fid.as_deref().and_then(|s| s.trim().parse().ok()).filter(|fid| *fid > 0)
    }
}

pub async fn get_allowance(
    State(state): State<AppState>, headers: HeaderMap, query: Result<Query<AllowanceQuery>, QueryRejection>,
) -> Result<Json<DataResponse<AllowanceData>>, ApiError> {
    state.validation.authorizer().check(credential(&headers))?;
    let fid = match query {
        Ok(Query(query)) => query.fid(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected allowance query");
            None
        }
    };
    let fid = fid.ok_or_else(|| ApiError::bad_request("Missing fid"))?;

    let data = state.allowance.allowance(fid).await?;
    Ok(Json(DataResponse { data }))
}
