use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::groups::controller::{
    assign_employee, create_group, get_group, get_group_for_edit, list_group_employees,
    list_groups, replace_group, update_group,
};
use crate::state::AppState;

pub fn init_groups_router() -> Router<AppState> {
    Router::new()
        .route("/create/", post(create_group))
        .route("/list/", get(list_groups))
        .route("/role/", post(assign_employee))
        .route("/{id}/", get(get_group))
        .route("/{id}/employees/", get(list_group_employees))
        .route(
            "/edit/{id}/",
            get(get_group_for_edit)
                .put(replace_group)
                .patch(update_group),
        )
}
