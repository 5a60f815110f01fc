pub mod dispatch;
pub mod route_builder;
pub mod run_result;
pub mod trip;
pub mod trip_simulator;
pub mod two_opt;
