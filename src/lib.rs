#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod classification;
pub mod config;
pub mod error;
pub(crate) mod handler;
pub mod healthcheck;
pub mod observability;
pub mod view;

pub use healthcheck::{healthcheck, healthcheck_with_port};
