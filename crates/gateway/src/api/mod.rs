//! Route tree. Handlers are thin: parse,
//! authenticate, call the core, translate the result.

pub mod events;
pub mod ical;
pub mod notifications;
pub mod oncall;
pub mod rosters;
pub mod schedules;
pub mod teams;
pub mod users;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let healthcheck_path = state.config.healthcheck_path.clone();

    Router::new()
        .route(&healthcheck_path, get(healthcheck))
        .route("/api/v0/teams", post(teams::create_team))
        .route("/api/v0/teams/:team", get(teams::get_team).delete(teams::delete_team))
        .route("/api/v0/teams/:team/oncall", get(oncall::team_oncall))
        .route("/api/v0/teams/:team/oncall/:role", get(oncall::team_oncall_role))
        .route("/api/v0/services/:service/oncall", get(oncall::service_oncall))
        .route("/api/v0/users", post(users::create_user))
        .route("/api/v0/users/:user", get(users::get_user))
        .route("/api/v0/users/:user/contacts", post(users::add_contact))
        .route(
            "/api/v0/users/:user/notifications",
            get(notifications::list_user_settings).post(notifications::create_setting),
        )
        .route(
            "/api/v0/users/:user/notifications/:id",
            axum::routing::delete(notifications::delete_setting),
        )
        .route("/api/v0/notifications", get(notifications::search))
        .route("/api/v0/teams/:team/rosters", post(rosters::create_roster))
        .route("/api/v0/rosters/:roster/users", put(rosters::set_roster_user))
        .route(
            "/api/v0/teams/:team/schedules",
            get(schedules::list_for_team).post(schedules::create_schedule),
        )
        .route(
            "/api/v0/schedules/:id",
            get(schedules::get_schedule)
                .put(schedules::update_schedule)
                .delete(schedules::delete_schedule),
        )
        .route("/api/v0/schedules/:id/populate", post(schedules::populate))
        .route("/api/v0/schedules/:id/preview", get(schedules::preview))
        .route("/api/v0/events", get(events::list).post(events::create))
        .route(
            "/api/v0/events/:id",
            get(events::get).put(events::edit).delete(events::delete_one),
        )
        .route("/api/v0/events/link", post(events::create_linked))
        .route(
            "/api/v0/events/link/:link_id",
            put(events::edit_linked).delete(events::delete_linked),
        )
        .route("/api/v0/events/swap", post(events::swap))
        .route("/api/v0/events/override", post(events::override_handler))
        .route("/api/v0/teams/:team/ical", get(ical::team_ical))
        .route("/api/v0/users/:user/ical", get(ical::user_ical))
        .route("/api/v0/ical/:key", get(ical::public_ical))
        .with_state(state)
}

async fn healthcheck() -> &'static str {
    "ok"
}
