/// Range parsing API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{extract::State, Json};
use tilawa_client::ParseRangeRequest;
use tilawa_core::PlaybackRange;

/// POST /api/parse-range - Turn a free-form request into a playback range
///
/// Rate limited per caller; see [`crate::middleware::rate_limit`].
pub async fn parse_range(
    State(app_state): State<AppState>,
    Json(request): Json<ParseRangeRequest>,
) -> Result<Json<PlaybackRange>> {
    let text = request.input_as_text.trim();
    if text.is_empty() {
        return Err(ServerError::BadRequest(
            "input_as_text must not be empty".to_string(),
        ));
    }

    let range = app_state.range_parser.parse_range(text).await?;

    tracing::info!(
        surah = range.surah(),
        start = range.start_ayah(),
        end = range.end_ayah(),
        repeat_ayah = range.repeat_ayah_count(),
        repeat_range = range.repeat_range_count(),
        "Parsed range"
    );

    Ok(Json(range))
}
