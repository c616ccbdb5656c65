pub mod booking;

pub use booking::{canonical_id, NewBooking, Rejection};
