use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::programs::controller::{create_program, get_program, list_programs};
use crate::state::AppState;

pub fn init_programs_router() -> Router<AppState> {
    Router::new()
        .route("/create/", post(create_program))
        .route("/list/", get(list_programs))
        .route("/{id}/", get(get_program))
}
