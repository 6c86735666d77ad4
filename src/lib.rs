pub mod config;
pub mod error;
pub mod event;
pub mod generator;
pub mod input;
pub mod model;
pub mod session;
pub mod ui;
