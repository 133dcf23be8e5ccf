pub mod activity;
pub mod api;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod store;
pub mod tabs;
pub mod terminal;
