use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::parents::controller::{
    add_parent, get_my_children, get_my_profile, get_parent, get_parent_by_user, list_parents,
    replace_parent, update_parent,
};
use crate::state::AppState;

pub fn init_parents_router() -> Router<AppState> {
    Router::new()
        .route("/add/", post(add_parent))
        .route("/list/", get(list_parents))
        .route("/list/{user_id}/", get(get_parent_by_user))
        .route(
            "/edit/{id}/",
            get(get_parent).put(replace_parent).patch(update_parent),
        )
        .route("/me/", get(get_my_profile))
        .route("/children/", get(get_my_children))
}
