use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/contests", contest_routes())
        .nest("/problems", problem_routes())
}

fn contest_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::contest::list_contests,
            handlers::contest::create_contest
        ))
        .routes(routes!(
            handlers::contest::get_contest,
            handlers::contest::update_contest
        ))
        .routes(routes!(
            handlers::contest::list_contest_problems,
            handlers::contest::add_contest_problem
        ))
        .routes(routes!(
            handlers::contest::list_participants,
            handlers::contest::register_participant
        ))
        .routes(routes!(handlers::clock::get_contest_timing))
        .routes(routes!(handlers::clock::stream_contest_clock))
}

fn problem_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::problem::list_problems,
            handlers::problem::create_problem
        ))
        .routes(routes!(handlers::problem::get_problem))
}
