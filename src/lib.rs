pub mod app;
pub mod config;
pub mod error;
pub mod format;
pub mod gateway;
pub mod models;
pub mod tmdb;
