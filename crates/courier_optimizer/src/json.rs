pub mod plan_config;
pub mod report;
