//! Account API route handlers.
//!
//! Each visitor's account state lives in their session. The sign-in flow
//! itself happens elsewhere; it hands its result to `PUT /api/account/session`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use eecol_core::{Account, AccountId, SessionAccount};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::account::UserData;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Body of `PUT /api/account/selected`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAccountRequest {
    pub account_id: AccountId,
}

/// The visitor's selected account, or `null` when not signed in.
///
/// GET /api/account
#[instrument(skip_all)]
pub async fn selected(State(state): State<AppState>, session: Session) -> Result<Json<Option<Account>>> {
    Ok(Json(state.account_session(session).get_selected_account().await?))
}

/// Select an account.
///
/// PUT /api/account/selected
#[instrument(skip(state, session))]
pub async fn select(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SelectAccountRequest>,
) -> Result<StatusCode> {
    if body.account_id.is_empty() {
        return Err(AppError::BadRequest("accountId must not be empty".to_string()));
    }

    state
        .account_session(session)
        .set_selected_account(&body.account_id)
        .await?;
    add_breadcrumb(
        "account",
        "Selected account",
        Some(&[("account_id", body.account_id.as_str())][..]),
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Store the sign-in result for this visitor.
///
/// PUT /api/account/session
#[instrument(skip_all)]
pub async fn set_session(
    State(state): State<AppState>,
    session: Session,
    Json(account): Json<SessionAccount>,
) -> Result<StatusCode> {
    state
        .account_session(session)
        .set_user_account(&account)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ask the sign-in flow to start.
///
/// POST /api/account/sign-in
#[instrument(skip_all)]
pub async fn sign_in(State(state): State<AppState>, session: Session) -> StatusCode {
    state.account_session(session).sign_in();
    StatusCode::ACCEPTED
}

/// A value stored for the selected account, or `null`.
///
/// GET /api/account/data/{key}
#[instrument(skip(state, session))]
pub async fn get_data(
    State(state): State<AppState>,
    session: Session,
    Path(key): Path<String>,
) -> Result<Json<Option<UserData>>> {
    Ok(Json(
        state.account_session(session).retrieve_user_data(&key).await?,
    ))
}

/// Store a value for the selected account.
///
/// PUT /api/account/data/{key}
#[instrument(skip(state, session, value))]
pub async fn put_data(
    State(state): State<AppState>,
    session: Session,
    Path(key): Path<String>,
    Json(value): Json<UserData>,
) -> Result<StatusCode> {
    let stored = state
        .account_session(session)
        .store_user_data(&key, &value)
        .await?;

    if stored {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::BadRequest("No account selected".to_string()))
    }
}
