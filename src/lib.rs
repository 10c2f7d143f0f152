//! Front-desk visitor log: visitors check in through a public form, staff
//! log in to list who is inside, stamp check-outs, and run filtered reports.

pub mod app;
pub mod auth;
pub mod bootstrap;
pub mod clock;
pub mod config;
pub mod error;
pub mod reports;
pub mod state;
pub mod visitors;
pub mod web;

pub use app::build_app;
pub use error::AppError;
pub use state::AppState;
