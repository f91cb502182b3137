pub mod app;
pub mod component;
pub mod core;
pub mod engine;
pub mod error;
pub mod spanmetrics;
