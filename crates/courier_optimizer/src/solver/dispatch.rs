use fxhash::FxHashSet;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    error::RoutingError,
    log_elapsed,
    problem::{
        distance_index::DistanceIndex, fleet::Fleet, package::PackageStatus,
        package_store::PackageStore, service_clock::Minutes, service_clock::ServiceClock,
        vehicle::VehicleId,
    },
    solver::{
        route_builder::RouteBuilder,
        run_result::{RunResult, Termination, VehicleSummary},
        trip::Trip,
        trip_simulator::TripSimulator,
    },
};

pub const DEFAULT_MAX_ITERATIONS: usize = 100;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("Dispatch stopped after {iterations} iterations with {remaining} packages at the hub")]
    IterationLimitReached {
        iterations: usize,
        remaining: usize,
        partial: Box<RunResult>,
    },
}

#[derive(Debug, Clone)]
pub struct DispatchParams {
    /// Upper bound on dispatch attempts after the first wave.
    pub max_iterations: usize,
}

impl Default for DispatchParams {
    fn default() -> Self {
        DispatchParams {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// A driver and the minute they are next back at the depot.
#[derive(Debug, Clone, Copy)]
struct Slot {
    vehicle_id: VehicleId,
    free_at: Minutes,
}

/// Plans and executes trips until every package has left the hub.
///
/// The scheduler owns the package store and the fleet for the whole run,
/// every mutation goes through [`crate::solver::trip_simulator::SimulatedTrip::commit`].
pub struct DispatchScheduler<'a> {
    index: &'a DistanceIndex,
    clock: ServiceClock,
    params: DispatchParams,

    packages: PackageStore,
    fleet: Fleet,

    used: FxHashSet<VehicleId>,
    trips: Vec<Trip>,
}

impl<'a> DispatchScheduler<'a> {
    pub fn new(
        index: &'a DistanceIndex,
        clock: ServiceClock,
        packages: PackageStore,
        fleet: Fleet,
        params: DispatchParams,
    ) -> Self {
        DispatchScheduler {
            index,
            clock,
            params,
            packages,
            fleet,
            used: FxHashSet::default(),
            trips: vec![],
        }
    }

    pub fn packages(&self) -> &PackageStore {
        &self.packages
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn into_packages(self) -> PackageStore {
        self.packages
    }

    pub fn run(&mut self) -> Result<RunResult, DispatchError> {
        log_elapsed!("dispatch", self.dispatch_all())
    }

    fn dispatch_all(&mut self) -> Result<RunResult, DispatchError> {
        info!(
            packages = self.packages.len(),
            vehicles = self.fleet.vehicles().len(),
            "Starting dispatch"
        );

        let mut slots = Vec::with_capacity(self.fleet.primary().len());
        for vehicle_id in self.fleet.primary().to_vec() {
            self.used.insert(vehicle_id);
            let free_at = self.dispatch(vehicle_id, 0)?.unwrap_or(0);
            slots.push(Slot {
                vehicle_id,
                free_at,
            });
        }

        let mut iterations = 0;
        let termination = loop {
            let remaining = self.remaining();
            if remaining == 0 {
                break Termination::Completed;
            }

            if iterations >= self.params.max_iterations {
                error!(
                    iterations,
                    remaining,
                    slots = ?slots,
                    "Dispatch iteration limit reached"
                );
                return Err(DispatchError::IterationLimitReached {
                    iterations,
                    remaining,
                    partial: Box::new(self.summarize(Termination::IterationLimit { remaining })),
                });
            }
            iterations += 1;

            let Some(slot) = slots.iter_mut().min_by_key(|slot| slot.free_at) else {
                break Termination::Stalled { remaining };
            };

            let departure = slot.free_at;
            let vehicle_id = self.next_vehicle(slot.vehicle_id);
            self.used.insert(vehicle_id);

            let mut returned_at = self.dispatch(vehicle_id, departure)?;
            if returned_at.is_none() {
                if let Some(unlock) = self.next_unlock(departure) {
                    debug!(
                        vehicle = %vehicle_id,
                        from = %self.clock.format(departure),
                        to = %self.clock.format(unlock),
                        "Nothing to load, retrying at next unlock"
                    );
                    returned_at = self.dispatch(vehicle_id, unlock)?;
                }
            }

            let Some(returned_at) = returned_at else {
                warn!(
                    remaining,
                    departure = %self.clock.format(departure),
                    "No package can be dispatched, stopping"
                );
                break Termination::Stalled { remaining };
            };

            slot.vehicle_id = vehicle_id;
            slot.free_at = returned_at;
        };

        let result = self.summarize(termination);
        info!(
            total_miles = result.total_miles,
            delivered = result.delivered,
            total = result.total_packages,
            trips = result.trips.len(),
            "Dispatch finished"
        );

        Ok(result)
    }

    fn remaining(&self) -> usize {
        self.packages.count_with_status(PackageStatus::AtHub)
    }

    /// The vehicle of the lowest numbered restricted package still at the
    /// hub, otherwise the auxiliary vehicle the first time round, otherwise
    /// the slot's own vehicle.
    fn next_vehicle(&self, slot_vehicle: VehicleId) -> VehicleId {
        if let Some(required) = self
            .packages
            .at_hub()
            .find_map(|package| package.constraints().required_vehicle())
        {
            return required;
        }

        match self.fleet.auxiliary() {
            Some(auxiliary) if !self.used.contains(&auxiliary) => auxiliary,
            _ => slot_vehicle,
        }
    }

    /// Earliest unlock time after `departure` among packages at the hub.
    fn next_unlock(&self, departure: Minutes) -> Option<Minutes> {
        self.packages
            .at_hub()
            .flat_map(|package| package.constraints().unlocks_after(departure))
            .min()
    }

    /// Builds, simulates and commits one trip. Returns the minute the vehicle
    /// is free again, or `None` when nothing could be loaded.
    fn dispatch(
        &mut self,
        vehicle_id: VehicleId,
        departure: Minutes,
    ) -> Result<Option<Minutes>, RoutingError> {
        let vehicle = self.fleet.vehicle(vehicle_id)?;

        let route = RouteBuilder::new(self.index, &self.clock).build_route(
            self.packages.at_hub(),
            vehicle,
            departure,
        )?;
        if route.is_empty() {
            return Ok(None);
        }

        let simulated =
            TripSimulator::new(self.index).simulate(&self.packages, &route, vehicle, departure)?;
        simulated.commit(&mut self.packages, &mut self.fleet)?;

        let trip = Trip::from(&simulated);
        info!(
            vehicle = %trip.vehicle_id(),
            depart = %self.clock.format(trip.departure()),
            back = %self.clock.format(trip.return_minute()),
            packages = trip.len(),
            miles = trip.miles(),
            "Trip dispatched"
        );

        let returned_at = trip.return_minute();
        self.trips.push(trip);

        Ok(Some(returned_at))
    }

    fn summarize(&self, termination: Termination) -> RunResult {
        let vehicles = self
            .fleet
            .vehicles()
            .iter()
            .map(|vehicle| VehicleSummary {
                vehicle_id: vehicle.id(),
                miles: vehicle.odometer(),
                delivered: vehicle.delivered().len(),
                last_return: self
                    .trips
                    .iter()
                    .filter(|trip| trip.vehicle_id() == vehicle.id())
                    .map(Trip::return_minute)
                    .max(),
            })
            .collect::<Vec<_>>();

        RunResult {
            total_miles: vehicles.iter().map(|summary| summary.miles).sum(),
            vehicles,
            delivered: self.packages.count_with_status(PackageStatus::Delivered),
            total_packages: self.packages.len(),
            trips: self.trips.clone(),
            termination,
        }
    }
}
