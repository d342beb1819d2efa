/// Verse text API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use tilawa_core::{Position, VerseContent};

/// GET /api/verse/:surah/:ayah - Arabic text, translation and surah verse count
///
/// Also served as `/api/ayah/:surah/:ayah`. Text is returned as the upstream
/// sends it.
pub async fn get_verse(
    State(app_state): State<AppState>,
    Path((surah, ayah)): Path<(u16, u16)>,
) -> Result<Json<VerseContent>> {
    let position =
        Position::new(surah, ayah).map_err(|e| ServerError::NotFound(e.to_string()))?;

    let verse = app_state
        .verse_provider
        .fetch_verse(position)
        .await
        .map_err(|e| {
            tracing::warn!(%position, "Verse fetch failed: {}", e);
            ServerError::from(e)
        })?;

    Ok(Json(verse))
}
