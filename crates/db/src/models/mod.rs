pub mod member;
pub mod member_reservation;
pub mod reservation;
pub mod reservation_time;
pub mod theme;
