use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/photos", photo_routes())
        .nest("/activities", activity_routes())
        .nest("/contributors", contributor_routes())
        .nest("/sync", sync_routes())
}

fn photo_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::photo::list_photos))
        .route("/discover", post(handlers::photo::discover_photos))
        .route("/{uid}/sync", post(handlers::photo::sync_photo))
        .route(
            "/{uid}/activities",
            get(handlers::activity::list_photo_activities),
        )
}

fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::activity::list_activities))
        .route("/unvoted", get(handlers::activity::list_unvoted_activities))
        .route("/{activity_id}/votes", post(handlers::vote::cast_vote))
}

fn contributor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::contributor::list_contributors))
        .route("/leaderboard", get(handlers::contributor::leaderboard))
        .route("/{author}", get(handlers::contributor::get_contributor))
}

fn sync_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::sync::sync_all))
        .route("/enqueue", post(handlers::sync::enqueue_sync))
}
