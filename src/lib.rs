pub mod app;
pub mod blob;
pub mod cli;
pub mod error;
pub mod gpx;
pub mod location;
pub mod persistence;
pub mod store;
pub mod terminal;
pub mod types;
pub mod utils;
pub mod view;
