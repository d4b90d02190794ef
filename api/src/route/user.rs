use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::user::show_user_bookings;

pub fn build_user_routers() -> Router<AppRegistry> {
    Router::new().route("/users/:user_id/bookings", get(show_user_bookings))
}
