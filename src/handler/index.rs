use axum::response::Html;

use crate::view::{PageState, render_page};

/// Handler for GET /
pub async fn index() -> Html<String> {
    Html(render_page(&PageState::Empty))
}
