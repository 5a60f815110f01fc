use serde::Serialize;

use crate::{
    problem::{distance_index::Distance, service_clock::Minutes, vehicle::VehicleId},
    solver::trip::Trip,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Termination {
    /// Every package was delivered.
    Completed,
    /// Packages remain but no trip could be built for them.
    Stalled { remaining: usize },
    /// The dispatch loop ran out of iterations. Only seen on partial results.
    IterationLimit { remaining: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSummary {
    pub vehicle_id: VehicleId,
    pub miles: Distance,
    pub delivered: usize,
    pub last_return: Option<Minutes>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub total_miles: Distance,
    pub vehicles: Vec<VehicleSummary>,
    pub delivered: usize,
    pub total_packages: usize,
    pub trips: Vec<Trip>,
    pub termination: Termination,
}

impl RunResult {
    pub fn is_complete(&self) -> bool {
        matches!(self.termination, Termination::Completed)
    }

    pub fn within_mileage(&self, max_miles: Distance) -> bool {
        self.total_miles <= max_miles
    }

    /// Trips ordered by departure; trips leaving together keep dispatch order.
    pub fn timeline(&self) -> Vec<&Trip> {
        let mut trips = self.trips.iter().collect::<Vec<_>>();
        trips.sort_by_key(|trip| trip.departure());
        trips
    }

    pub fn vehicle(&self, vehicle_id: VehicleId) -> Option<&VehicleSummary> {
        self.vehicles
            .iter()
            .find(|summary| summary.vehicle_id == vehicle_id)
    }
}
