use axum::{Router, routing::post};

use crate::modules::auth::controller::register_user;
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new().route("/register", post(register_user))
}
