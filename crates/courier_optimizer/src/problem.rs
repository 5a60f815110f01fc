pub mod address;
pub mod constraints;
pub mod deadline;
pub mod distance_index;
pub mod fleet;
pub mod location;
pub mod package;
pub mod package_store;
pub mod service_clock;
pub mod vehicle;
