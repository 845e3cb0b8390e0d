use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::auth::controller::{get_me, login_user, register_user};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register/", post(register_user))
        .route("/login/", post(login_user))
        .route("/me/", get(get_me))
}
