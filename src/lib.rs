pub mod analysis;
pub mod article;
pub mod config;
pub mod error;
pub mod history;
pub mod pipeline;
