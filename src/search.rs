use crate::app::AppState;
use crate::model::User;

/// Case-insensitive substring match on the display name.
///
/// `needle` must already be lowercased; an empty needle matches everything.
pub fn name_matches(user: &User, needle: &str) -> bool {
    needle.is_empty() || user.name.to_lowercase().contains(needle)
}

/// Apply the typed search query to the store and reset the selection.
pub fn apply_search(app: &mut AppState) {
    let q = app.search_query.trim().to_string();
    app.store.filter(&q);
    app.selected_index = 0;
    tracing::debug!(query = %q, visible = app.store.len(), "search applied");
}

/// Drop the active query and show the full set again.
pub fn clear_search(app: &mut AppState) {
    app.search_query.clear();
    app.store.filter("");
    app.clamp_selection();
}
