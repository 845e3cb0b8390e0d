use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::children::controller::{
    add_child, get_child, get_child_for_edit, link_parent, list_children, replace_child,
    update_child,
};
use crate::state::AppState;

pub fn init_children_router() -> Router<AppState> {
    Router::new()
        .route("/add/", post(add_child))
        .route("/list/", get(list_children))
        .route("/{id}/", get(get_child))
        .route("/{id}/parents/", post(link_parent))
        .route(
            "/edit/{id}/",
            get(get_child_for_edit).put(replace_child).patch(update_child),
        )
}
