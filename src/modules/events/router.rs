use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::events::controller::{
    create_event, enroll_child, events_for_my_children, get_event, get_event_for_edit,
    link_program, list_events_by_program, list_participants, replace_event, update_event,
};
use crate::state::AppState;

pub fn init_events_router() -> Router<AppState> {
    Router::new()
        .route("/add/", post(create_event))
        .route("/list/{program_id}/", get(list_events_by_program))
        .route("/my_children/", get(events_for_my_children))
        .route("/{id}/", get(get_event))
        .route("/{id}/programs/", post(link_program))
        .route(
            "/{id}/participants/",
            get(list_participants).post(enroll_child),
        )
        .route(
            "/edit/{id}/",
            get(get_event_for_edit)
                .put(replace_event)
                .patch(update_event),
        )
}
