//! Settings endpoints backed by the preference file.

use axum::extract::State;
use axum::Json;
use validator::Validate;

use shared::api::UpdateSettingsRequest;
use shared::Preferences;

use crate::error::ApiResult;
use crate::AppState;

pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<Preferences>> {
    Ok(Json(state.prefs.get()))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> ApiResult<Json<Preferences>> {
    req.validate()?;

    let prefs = Preferences {
        theme: req.theme,
        weather_enabled: req.weather_enabled,
        weather_zipcode: req.weather_zipcode,
        shift_commands: req.shift_commands,
    };
    state.prefs.set(prefs.clone())?;

    Ok(Json(prefs))
}
