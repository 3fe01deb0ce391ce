pub mod account;
pub mod application;
pub mod canary_config;
pub mod dispatch;
pub mod execution;
pub mod pipeline;
pub mod pipeline_template;
pub mod project;
pub mod shared;
pub mod version;
