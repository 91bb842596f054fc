pub mod analysis;
pub mod config;
pub mod error;
pub mod indicator;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod recommend;
pub mod report;
pub mod results_store;
