pub mod article;
pub mod config;
pub mod preview;
pub mod titles;
