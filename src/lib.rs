pub mod config;
pub mod error;
pub mod events;
pub mod feed;
pub mod model;
pub mod sources;
pub mod state;
pub mod ui;

pub use error::{Error, Result};
