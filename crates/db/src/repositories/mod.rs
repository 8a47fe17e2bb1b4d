pub mod member_repo;
pub mod member_reservation_repo;
pub mod reservation_repo;
pub mod reservation_time_repo;
pub mod theme_repo;

pub use member_repo::MemberRepo;
pub use member_reservation_repo::MemberReservationRepo;
pub use reservation_repo::ReservationRepo;
pub use reservation_time_repo::ReservationTimeRepo;
pub use theme_repo::ThemeRepo;
