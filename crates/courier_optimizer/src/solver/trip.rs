use serde::Serialize;

use crate::{
    problem::{
        distance_index::Distance, package::PackageId, service_clock::Minutes, vehicle::VehicleId,
    },
    solver::trip_simulator::SimulatedTrip,
};

/// A recorded trip. Never changes once the scheduler has logged it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    vehicle_id: VehicleId,
    departure: Minutes,
    return_minute: Minutes,
    miles: Distance,
    package_ids: Vec<PackageId>,
}

impl Trip {
    pub fn vehicle_id(&self) -> VehicleId {
        self.vehicle_id
    }

    pub fn departure(&self) -> Minutes {
        self.departure
    }

    pub fn return_minute(&self) -> Minutes {
        self.return_minute
    }

    pub fn miles(&self) -> Distance {
        self.miles
    }

    pub fn package_ids(&self) -> &[PackageId] {
        &self.package_ids
    }

    pub fn len(&self) -> usize {
        self.package_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.package_ids.is_empty()
    }

    /// Whether the trip was on the road at `minute`, ends included.
    pub fn spans(&self, minute: Minutes) -> bool {
        self.departure <= minute && minute <= self.return_minute
    }
}

impl From<&SimulatedTrip> for Trip {
    fn from(trip: &SimulatedTrip) -> Self {
        Trip {
            vehicle_id: trip.vehicle_id,
            departure: trip.departure,
            return_minute: trip.return_minute,
            miles: trip.miles,
            package_ids: trip.package_ids().collect(),
        }
    }
}
