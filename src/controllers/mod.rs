pub mod bookings;
pub mod movies;
pub mod reviews;
pub mod showtimes;
pub mod theaters;
pub mod users;
pub mod ws;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(users::routes())
        .merge(movies::routes())
        .merge(theaters::routes())
        .merge(showtimes::routes())
        .merge(bookings::routes())
        .merge(reviews::routes())
        .merge(ws::routes())
}
