use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::employees::controller::{
    add_employee, get_employee, get_employee_by_user, list_employees, replace_employee,
    update_employee,
};
use crate::state::AppState;

pub fn init_employees_router() -> Router<AppState> {
    Router::new()
        .route("/add/", post(add_employee))
        .route("/list/", get(list_employees))
        .route("/list/{user_id}/", get(get_employee_by_user))
        .route(
            "/edit/{id}/",
            get(get_employee)
                .put(replace_employee)
                .patch(update_employee),
        )
}
