pub mod app;
pub mod board;
pub mod config;
pub mod error;
pub mod event;
pub mod feed;
pub mod sound;
pub mod ui;
pub mod util;

pub use board::{Board, RollTiming};
pub use config::Config;
pub use error::{FlapboardError, Result};
