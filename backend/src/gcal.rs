//! Google Calendar sync adapter: OAuth 2.0 authorization-code flow plus
//! create/update/delete against the user's primary calendar.
//!
//! There is no server-side token storage. The browser holds the tokens and
//! sends them on every sync call; each request builds a fresh client, loads
//! the supplied tokens, and refreshes once if the access token has expired.

use anyhow::{anyhow, Context};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared::api::EventSyncPayload;

use crate::config::AppConfig;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const EVENTS_ENDPOINT: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

/// Timed remote events carry this zone; all-day events are date-only.
const EVENT_TIME_ZONE: &str = "Asia/Tokyo";

#[derive(Debug, Error)]
pub enum GcalError {
    #[error("authentication required")]
    AuthRequired,

    #[error(transparent)]
    Remote(#[from] anyhow::Error),
}

/// The OAuth token triple as the browser round-trips it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenSet {
    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct GcalConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl GcalConfig {
    /// `None` unless all three Google OAuth settings are present.
    pub fn from_app(config: &AppConfig) -> Option<Self> {
        Some(Self {
            client_id: config.google_client_id.clone()?,
            client_secret: config.google_client_secret.clone()?,
            redirect_uri: config.google_redirect_uri.clone()?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
}

pub struct GcalClient {
    http: reqwest::Client,
    config: GcalConfig,
    tokens: Option<TokenSet>,
}

impl GcalClient {
    pub fn new(config: GcalConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            tokens: None,
        }
    }

    pub fn with_tokens(config: GcalConfig, tokens: TokenSet) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            tokens: Some(tokens),
        }
    }

    pub fn tokens(&self) -> Option<&TokenSet> {
        self.tokens.as_ref()
    }

    /// The consent-screen URL the browser is sent to. `access_type=offline`
    /// with `prompt=consent` so Google always issues a refresh token.
    pub fn auth_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            AUTH_ENDPOINT,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(CALENDAR_SCOPE),
        )
    }

    /// Exchange the authorization code for a token set. A response without a
    /// refresh token is an error; the flow requests one unconditionally.
    pub async fn exchange_code(&mut self, code: &str) -> Result<TokenSet, GcalError> {
        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await
            .context("token exchange request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("token exchange failed ({}): {}", status, body).into());
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .context("invalid token exchange response")?;
        let refresh_token = parsed
            .refresh_token
            .ok_or_else(|| anyhow!("token exchange response lacked a refresh token"))?;

        let tokens = TokenSet {
            access_token: parsed.access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(parsed.expires_in),
        };
        self.tokens = Some(tokens.clone());
        Ok(tokens)
    }

    /// Trade the refresh token for a new access token. The refresh token
    /// itself is kept; Google does not reissue it here.
    pub async fn refresh(&mut self) -> Result<(), GcalError> {
        let current = self.tokens.as_ref().ok_or(GcalError::AuthRequired)?;
        let refresh_token = current.refresh_token.clone();

        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("token refresh request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("token refresh failed ({}): {}", status, body).into());
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .context("invalid token refresh response")?;

        self.tokens = Some(TokenSet {
            access_token: parsed.access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(parsed.expires_in),
        });
        Ok(())
    }

    /// Load the supplied tokens and refresh once if the access token has
    /// expired. Returns whether a valid session is in place; never errors,
    /// a failed refresh is logged and reported as unauthenticated.
    pub async fn ensure_authenticated(&mut self, supplied: Option<TokenSet>) -> bool {
        if let Some(tokens) = supplied {
            self.tokens = Some(tokens);
        }

        match self.tokens.as_ref() {
            None => false,
            Some(t) if t.is_valid() => true,
            Some(_) => match self.refresh().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Google token refresh failed: {}", e);
                    false
                }
            },
        }
    }

    /// Drop the session. Nothing is revoked remotely.
    pub fn logout(&mut self) {
        self.tokens = None;
    }

    pub async fn create_event(
        &self,
        payload: &EventSyncPayload,
    ) -> Result<serde_json::Value, GcalError> {
        let remote = RemoteEvent::from_payload(payload)?;
        let request = self.http.post(EVENTS_ENDPOINT).json(&remote);
        self.send_authed(request).await
    }

    pub async fn update_event(
        &self,
        external_event_id: &str,
        payload: &EventSyncPayload,
    ) -> Result<serde_json::Value, GcalError> {
        let remote = RemoteEvent::from_payload(payload)?;
        let url = format!("{}/{}", EVENTS_ENDPOINT, external_event_id);
        let request = self.http.put(&url).json(&remote);
        self.send_authed(request).await
    }

    pub async fn delete_event(
        &self,
        external_event_id: &str,
    ) -> Result<serde_json::Value, GcalError> {
        let url = format!("{}/{}", EVENTS_ENDPOINT, external_event_id);
        self.send_authed(self.http.delete(&url)).await
    }

    async fn send_authed(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<serde_json::Value, GcalError> {
        let tokens = self.tokens.as_ref().ok_or(GcalError::AuthRequired)?;
        if !tokens.is_valid() {
            return Err(GcalError::AuthRequired);
        }

        let response = request
            .bearer_auth(&tokens.access_token)
            .send()
            .await
            .context("calendar request failed")?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GcalError::AuthRequired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("calendar request failed ({}): {}", status, body).into());
        }

        // DELETE returns an empty body.
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(serde_json::json!({}));
        }
        Ok(response
            .json()
            .await
            .context("invalid calendar response")?)
    }
}

/// Wire shape of a Google Calendar event, limited to the fields synced.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEvent {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: RemoteEventTime,
    pub end: RemoteEventTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl RemoteEvent {
    /// All-day (or untimed) events map to date-only start/end with an
    /// exclusive end of the next day. Timed events get a fixed one-hour
    /// duration in the household zone.
    pub fn from_payload(payload: &EventSyncPayload) -> Result<Self, GcalError> {
        let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
            .map_err(|_| anyhow!("invalid event date: {}", payload.date))?;

        let (start, end) = match payload.time.as_deref().filter(|_| !payload.is_all_day) {
            None => {
                let next = date + Duration::days(1);
                (date_only(date), date_only(next))
            }
            Some(raw) => {
                let time = NaiveTime::parse_from_str(raw, "%H:%M")
                    .map_err(|_| anyhow!("invalid event time: {}", raw))?;
                let start = date.and_time(time);
                (timed(start), timed(start + Duration::hours(1)))
            }
        };

        Ok(Self {
            summary: payload.title.clone(),
            description: payload.description.clone(),
            start,
            end,
            color_id: Some(color_for(payload.event_type.as_str()).to_string()),
        })
    }
}

fn date_only(date: NaiveDate) -> RemoteEventTime {
    RemoteEventTime {
        date: Some(date.format("%Y-%m-%d").to_string()),
        date_time: None,
        time_zone: None,
    }
}

fn timed(at: chrono::NaiveDateTime) -> RemoteEventTime {
    RemoteEventTime {
        date: None,
        date_time: Some(at.format("%Y-%m-%dT%H:%M:%S").to_string()),
        time_zone: Some(EVENT_TIME_ZONE.to_string()),
    }
}

/// Google Calendar color id per event category.
pub fn color_for(event_type: &str) -> &'static str {
    match event_type {
        "work" => "9",
        "school" => "10",
        "hospital" => "11",
        "travel" => "5",
        "shift" => "7",
        _ => "8",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::EventType;

    fn payload(time: Option<&str>, is_all_day: bool) -> EventSyncPayload {
        EventSyncPayload {
            title: "dentist".to_string(),
            description: Some("checkup".to_string()),
            date: "2024-06-03".to_string(),
            time: time.map(str::to_string),
            event_type: EventType::Hospital,
            is_all_day,
        }
    }

    #[test]
    fn all_day_maps_to_date_only_with_exclusive_end() {
        let remote = RemoteEvent::from_payload(&payload(None, true)).unwrap();
        assert_eq!(remote.start.date.as_deref(), Some("2024-06-03"));
        assert_eq!(remote.end.date.as_deref(), Some("2024-06-04"));
        assert!(remote.start.date_time.is_none());
        assert!(remote.start.time_zone.is_none());
    }

    #[test]
    fn all_day_flag_wins_over_a_supplied_time() {
        let remote = RemoteEvent::from_payload(&payload(Some("14:00"), true)).unwrap();
        assert_eq!(remote.start.date.as_deref(), Some("2024-06-03"));
        assert!(remote.start.date_time.is_none());
    }

    #[test]
    fn timed_event_gets_one_hour_in_household_zone() {
        let remote = RemoteEvent::from_payload(&payload(Some("14:00"), false)).unwrap();
        assert_eq!(
            remote.start.date_time.as_deref(),
            Some("2024-06-03T14:00:00")
        );
        assert_eq!(remote.end.date_time.as_deref(), Some("2024-06-03T15:00:00"));
        assert_eq!(remote.start.time_zone.as_deref(), Some("Asia/Tokyo"));
        assert!(remote.start.date.is_none());
    }

    #[test]
    fn color_mapping_covers_known_types_and_falls_back() {
        assert_eq!(color_for("work"), "9");
        assert_eq!(color_for("school"), "10");
        assert_eq!(color_for("hospital"), "11");
        assert_eq!(color_for("travel"), "5");
        assert_eq!(color_for("shift"), "7");
        assert_eq!(color_for("other"), "8");
        assert_eq!(color_for("unrecognized"), "8");
    }

    #[test]
    fn token_validity_tracks_expiry() {
        let valid = TokenSet {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: Utc::now() + Duration::minutes(5),
        };
        let expired = TokenSet {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: Utc::now() - Duration::minutes(5),
        };
        assert!(valid.is_valid());
        assert!(!expired.is_valid());
    }

    #[test]
    fn auth_url_requests_offline_access() {
        let client = GcalClient::new(GcalConfig {
            client_id: "cid".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:8080/api/gcal/callback".to_string(),
        });

        let url = client.auth_url();
        assert!(url.starts_with(AUTH_ENDPOINT));
        assert!(url.contains("client_id=cid"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains(&urlencoding::encode(CALENDAR_SCOPE).into_owned()));
    }

    #[test]
    fn remote_event_serializes_camel_case_and_skips_absent_fields() {
        let remote = RemoteEvent::from_payload(&payload(None, true)).unwrap();
        let json = serde_json::to_value(&remote).unwrap();

        assert_eq!(json["colorId"], "11");
        assert_eq!(json["start"]["date"], "2024-06-03");
        assert!(json["start"].get("dateTime").is_none());
    }
}
