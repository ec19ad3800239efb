//! Shift-planning backend for gig-economy drivers.
//!
//! The crate is organised as a set of workflow modules behind thin trait
//! seams (repositories, directories, auth) so that the HTTP service in
//! `services/api` can wire in concrete infrastructure while the business
//! rules stay exercisable in isolation.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
