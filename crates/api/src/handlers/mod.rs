pub mod catalog;
pub mod reservations;
