pub mod booking;
pub mod broadcast;
pub mod payment;
pub mod sentiment;
