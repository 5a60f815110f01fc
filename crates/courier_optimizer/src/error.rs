use thiserror::Error;

use crate::problem::{
    package::{PackageId, PackageStatus},
    vehicle::VehicleId,
};

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("Address not in distance table: {address:?}")]
    AddressNotFound { address: String },

    #[error("{package} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        package: PackageId,
        from: PackageStatus,
        to: PackageStatus,
    },

    #[error("{vehicle} cannot carry more than {capacity} packages")]
    CapacityExceeded { vehicle: VehicleId, capacity: usize },

    #[error("Unknown package: {0}")]
    UnknownPackage(PackageId),

    #[error("Unknown vehicle: {0}")]
    UnknownVehicle(VehicleId),

    #[error("Fleet needs at least one primary vehicle")]
    EmptyFleet,

    #[error("Duplicate vehicle in fleet: {0}")]
    DuplicateVehicle(VehicleId),

    #[error("{vehicle} has invalid {parameter}: {value}")]
    InvalidVehicleParameter {
        vehicle: VehicleId,
        parameter: &'static str,
        value: String,
    },

    #[error("Invalid clock time: {0:?}")]
    InvalidClockTime(String),
}
