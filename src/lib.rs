pub mod api;
pub mod config;
pub mod model;
pub mod pacing;
pub mod provider;
pub mod report;
pub mod screener;
pub mod validator;
