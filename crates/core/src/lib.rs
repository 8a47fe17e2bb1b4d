//! Domain types and rules shared across the roomkey workspace.
//!
//! This crate is deliberately free of web and database dependencies so the
//! booking rules can be unit tested without infrastructure.

pub mod booking;
pub mod error;
pub mod roles;
pub mod types;
