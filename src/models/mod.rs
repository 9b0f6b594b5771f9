pub mod user;
pub mod showing;
pub mod seat;
pub mod booking;

pub use user::User;
pub use showing::Showing;
pub use seat::ShowSeat;
pub use booking::{Booking, BookingStatus};
