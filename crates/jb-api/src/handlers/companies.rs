//! Company API handlers.

use axum::extract::State;
use axum::Json;

use jb_models::Company;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

/// List every company, for the filter dropdown and job forms.
pub async fn list_companies(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Company>>> {
    let token = auth.access_token()?;

    let companies = state.companies.list(&token).await?;
    Ok(Json(companies))
}
