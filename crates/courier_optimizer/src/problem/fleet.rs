use fxhash::FxHashSet;

use crate::{
    error::RoutingError,
    problem::vehicle::{Vehicle, VehicleId},
};

/// The vehicles available for a run.
///
/// Primary vehicles each have a driver from the start of service; the
/// auxiliary vehicle is taken out at most once, when a driver comes back.
#[derive(Debug, Clone)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
    primary: Vec<VehicleId>,
    auxiliary: Option<VehicleId>,
}

impl Fleet {
    pub fn new(primary: Vec<Vehicle>, auxiliary: Option<Vehicle>) -> Result<Fleet, RoutingError> {
        if primary.is_empty() {
            return Err(RoutingError::EmptyFleet);
        }

        let mut seen = FxHashSet::default();
        for vehicle in primary.iter().chain(auxiliary.iter()) {
            if !seen.insert(vehicle.id()) {
                return Err(RoutingError::DuplicateVehicle(vehicle.id()));
            }
            vehicle.validate()?;
        }

        let primary_ids = primary.iter().map(Vehicle::id).collect();
        let auxiliary_id = auxiliary.as_ref().map(Vehicle::id);

        let mut vehicles = primary;
        vehicles.extend(auxiliary);

        Ok(Fleet {
            vehicles,
            primary: primary_ids,
            auxiliary: auxiliary_id,
        })
    }

    #[inline]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn primary(&self) -> &[VehicleId] {
        &self.primary
    }

    pub fn auxiliary(&self) -> Option<VehicleId> {
        self.auxiliary
    }

    pub fn contains(&self, id: VehicleId) -> bool {
        self.vehicles.iter().any(|vehicle| vehicle.id() == id)
    }

    pub fn vehicle(&self, id: VehicleId) -> Result<&Vehicle, RoutingError> {
        self.vehicles
            .iter()
            .find(|vehicle| vehicle.id() == id)
            .ok_or(RoutingError::UnknownVehicle(id))
    }

    pub(crate) fn vehicle_mut(&mut self, id: VehicleId) -> Result<&mut Vehicle, RoutingError> {
        self.vehicles
            .iter_mut()
            .find(|vehicle| vehicle.id() == id)
            .ok_or(RoutingError::UnknownVehicle(id))
    }
}
