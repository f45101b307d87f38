//! Google Calendar sync endpoints.
//!
//! Tokens live in the browser, not on the server: the OAuth callback hands
//! them back through the redirect query string, and every sync call supplies
//! them again in request headers.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Redirect;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use shared::api::{AuthUrlResponse, SyncAction, SyncEventRequest, SyncEventResponse};

use crate::error::{ApiError, ApiResult};
use crate::gcal::{GcalClient, GcalError, TokenSet};
use crate::AppState;

const ACCESS_TOKEN_HEADER: &str = "x-gcal-access-token";
const REFRESH_TOKEN_HEADER: &str = "x-gcal-refresh-token";
const TOKEN_EXPIRY_HEADER: &str = "x-gcal-token-expiry";

pub async fn auth_url(State(state): State<AppState>) -> ApiResult<Json<AuthUrlResponse>> {
    let config = state
        .gcal()
        .ok_or_else(|| ApiError::bad_request("Google Calendar sync is not configured"))?;

    let client = GcalClient::new(config);
    Ok(Json(AuthUrlResponse {
        auth_url: client.auth_url(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Google redirects the browser here. The outcome travels to the settings
/// page in the query string, tokens included; the server keeps nothing.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let settings_url = &state.config.settings_page_url;

    if query.error.is_some() {
        return Redirect::to(&format!("{}?error=auth_failed", settings_url));
    }
    let Some(code) = query.code else {
        return Redirect::to(&format!("{}?error=no_code", settings_url));
    };
    let Some(config) = state.gcal() else {
        return Redirect::to(&format!("{}?error=callback_failed", settings_url));
    };

    let mut client = GcalClient::new(config);
    match client.exchange_code(&code).await {
        Ok(tokens) => Redirect::to(&format!(
            "{}?success=true&accessToken={}&refreshToken={}&expiresAt={}",
            settings_url,
            urlencoding::encode(&tokens.access_token),
            urlencoding::encode(&tokens.refresh_token),
            urlencoding::encode(&tokens.expires_at.to_rfc3339()),
        )),
        Err(e) => {
            tracing::error!("OAuth code exchange failed: {}", e);
            Redirect::to(&format!("{}?error=token_failed", settings_url))
        }
    }
}

fn tokens_from_headers(headers: &HeaderMap) -> Option<TokenSet> {
    let get = |name: &str| headers.get(name)?.to_str().ok().map(str::to_string);

    let access_token = get(ACCESS_TOKEN_HEADER)?;
    let refresh_token = get(REFRESH_TOKEN_HEADER)?;
    let expires_at = DateTime::parse_from_rfc3339(&get(TOKEN_EXPIRY_HEADER)?)
        .ok()?
        .with_timezone(&Utc);

    Some(TokenSet {
        access_token,
        refresh_token,
        expires_at,
    })
}

pub async fn sync_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SyncEventRequest>,
) -> ApiResult<Json<SyncEventResponse>> {
    let config = state
        .gcal()
        .ok_or_else(|| ApiError::bad_request("Google Calendar sync is not configured"))?;

    let tokens = tokens_from_headers(&headers)
        .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))?;

    let mut client = GcalClient::with_tokens(config, tokens);
    if !client.ensure_authenticated(None).await {
        return Err(ApiError::Unauthorized("authentication required".to_string()));
    }

    let result = match req.action {
        SyncAction::Create => client.create_event(&req.event).await,
        SyncAction::Update => {
            let id = req
                .external_event_id
                .as_deref()
                .ok_or_else(|| ApiError::bad_request("externalEventId is required for update"))?;
            client.update_event(id, &req.event).await
        }
        SyncAction::Delete => {
            let id = req
                .external_event_id
                .as_deref()
                .ok_or_else(|| ApiError::bad_request("externalEventId is required for delete"))?;
            client.delete_event(id).await
        }
    };

    match result {
        Ok(value) => Ok(Json(SyncEventResponse {
            success: true,
            result: value,
        })),
        Err(GcalError::AuthRequired) => Err(ApiError::Unauthorized(
            "authentication required".to_string(),
        )),
        Err(GcalError::Remote(e)) => Err(ApiError::Internal(e)),
    }
}
