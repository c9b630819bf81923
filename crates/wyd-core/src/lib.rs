pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod focus;
pub mod mission;
pub mod onboarding;
pub mod progression;
pub mod session;
pub mod types;
pub mod views;

pub use error::{Result, WydError};
