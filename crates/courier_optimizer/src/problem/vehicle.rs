use serde::Serialize;

use crate::{
    define_id_newtype,
    error::RoutingError,
    problem::{
        location::{DEPOT, LocationIdx},
        package::PackageId,
        service_clock::Minutes,
    },
};

define_id_newtype!(VehicleId, "Truck");

pub const DEFAULT_SPEED_MPH: f64 = 18.0;
pub const DEFAULT_CAPACITY: usize = 16;

#[derive(Serialize, Debug, Clone)]
pub struct Vehicle {
    id: VehicleId,
    speed_mph: f64,
    capacity: usize,
    should_return_to_depot: bool,

    location: LocationIdx,
    clock: Minutes,
    odometer: f64,

    carried: Vec<PackageId>,
    delivered: Vec<PackageId>,
}

impl Vehicle {
    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn speed_mph(&self) -> f64 {
        self.speed_mph
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn should_return_to_depot(&self) -> bool {
        self.should_return_to_depot
    }

    pub fn location(&self) -> LocationIdx {
        self.location
    }

    pub fn clock(&self) -> Minutes {
        self.clock
    }

    pub fn odometer(&self) -> f64 {
        self.odometer
    }

    pub fn carried(&self) -> &[PackageId] {
        &self.carried
    }

    pub fn delivered(&self) -> &[PackageId] {
        &self.delivered
    }

    /// Whole minutes needed to drive `miles` at this vehicle's speed, halves
    /// rounded to even.
    pub fn travel_minutes(&self, miles: f64) -> Minutes {
        (60.0 * miles / self.speed_mph).round_ties_even() as Minutes
    }

    /// Rejects a speed or capacity no trip could be planned with.
    pub fn validate(&self) -> Result<(), RoutingError> {
        if !self.speed_mph.is_finite() || self.speed_mph <= 0.0 {
            return Err(RoutingError::InvalidVehicleParameter {
                vehicle: self.id,
                parameter: "speed_mph",
                value: self.speed_mph.to_string(),
            });
        }
        if self.capacity == 0 {
            return Err(RoutingError::InvalidVehicleParameter {
                vehicle: self.id,
                parameter: "capacity",
                value: self.capacity.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn load(&mut self, packages: &[PackageId]) -> Result<(), RoutingError> {
        if self.carried.len() + packages.len() > self.capacity {
            return Err(RoutingError::CapacityExceeded {
                vehicle: self.id,
                capacity: self.capacity,
            });
        }

        self.carried.extend_from_slice(packages);
        Ok(())
    }

    pub(crate) fn unload(&mut self, package: PackageId) -> Result<(), RoutingError> {
        let position = self
            .carried
            .iter()
            .position(|&carried| carried == package)
            .ok_or(RoutingError::UnknownPackage(package))?;

        self.carried.remove(position);
        self.delivered.push(package);
        Ok(())
    }

    pub(crate) fn advance(&mut self, location: LocationIdx, clock: Minutes, miles: f64) {
        self.location = location;
        self.clock = clock;
        self.odometer += miles;
    }
}

#[derive(Default)]
pub struct VehicleBuilder {
    id: Option<VehicleId>,
    speed_mph: Option<f64>,
    capacity: Option<usize>,
    should_return_to_depot: Option<bool>,
}

impl VehicleBuilder {
    pub fn set_vehicle_id(&mut self, id: impl Into<VehicleId>) -> &mut VehicleBuilder {
        self.id = Some(id.into());
        self
    }

    pub fn set_speed_mph(&mut self, speed_mph: f64) -> &mut VehicleBuilder {
        self.speed_mph = Some(speed_mph);
        self
    }

    pub fn set_capacity(&mut self, capacity: usize) -> &mut VehicleBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_return(&mut self, should_return_to_depot: bool) -> &mut VehicleBuilder {
        self.should_return_to_depot = Some(should_return_to_depot);
        self
    }

    pub fn build(self) -> Vehicle {
        Vehicle {
            id: self.id.unwrap_or(VehicleId::new(1)),
            speed_mph: self.speed_mph.unwrap_or(DEFAULT_SPEED_MPH),
            capacity: self.capacity.unwrap_or(DEFAULT_CAPACITY),
            should_return_to_depot: self.should_return_to_depot.unwrap_or(false),
            location: DEPOT,
            clock: 0,
            odometer: 0.0,
            carried: vec![],
            delivered: vec![],
        }
    }
}
