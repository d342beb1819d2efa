/// Audio addressing API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use tilawa_client::AudioUrlResponse;
use tilawa_core::Position;

/// GET /api/audio/:surah/:ayah - URL of the verse recording for the configured reciter
pub async fn audio_url(
    State(app_state): State<AppState>,
    Path((surah, ayah)): Path<(u16, u16)>,
) -> Result<Json<AudioUrlResponse>> {
    let position =
        Position::new(surah, ayah).map_err(|e| ServerError::NotFound(e.to_string()))?;

    Ok(Json(AudioUrlResponse {
        url: app_state.audio.url_for(position),
    }))
}
