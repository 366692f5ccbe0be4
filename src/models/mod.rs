pub mod booking;
pub mod movie;
pub mod review;
pub mod seat;
pub mod showtime;
pub mod theater;
pub mod user;

pub use booking::Booking;
pub use movie::Movie;
pub use review::Review;
pub use seat::Seat;
pub use showtime::Showtime;
pub use theater::Theater;
pub use user::User;
