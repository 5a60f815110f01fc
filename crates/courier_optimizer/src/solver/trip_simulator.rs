use serde::Serialize;

use crate::{
    error::RoutingError,
    problem::{
        distance_index::{Distance, DistanceIndex},
        fleet::Fleet,
        location::{DEPOT, LocationIdx},
        package::{PackageId, PackageStatus},
        package_store::PackageStore,
        service_clock::Minutes,
        vehicle::{Vehicle, VehicleId},
    },
};

/// One driven leg of a trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub location_id: LocationIdx,
    pub distance: Distance,
    /// Clock at the end of the leg, in minutes since service start.
    pub arrival: Minutes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub package_id: PackageId,
    pub delivered_at: Minutes,
}

/// Outcome of driving a route, not yet applied to packages or vehicles.
#[derive(Debug, Clone, Serialize)]
pub struct SimulatedTrip {
    pub vehicle_id: VehicleId,
    pub departure: Minutes,
    pub return_minute: Minutes,
    pub miles: Distance,
    pub legs: Vec<Leg>,
    pub deliveries: Vec<Delivery>,
    pub end_location: LocationIdx,
}

impl SimulatedTrip {
    pub fn package_ids(&self) -> impl Iterator<Item = PackageId> + '_ {
        self.deliveries.iter().map(|delivery| delivery.package_id)
    }

    /// Applies the trip to the package store and the vehicle: every package
    /// boards at departure and is then delivered at its simulated minute.
    ///
    /// All packages and the vehicle are checked before anything is written.
    pub(crate) fn commit(
        &self,
        packages: &mut PackageStore,
        fleet: &mut Fleet,
    ) -> Result<(), RoutingError> {
        for id in self.package_ids() {
            let package = packages.get(id).ok_or(RoutingError::UnknownPackage(id))?;
            if !package.is_at_hub() {
                return Err(RoutingError::InvalidStatusTransition {
                    package: id,
                    from: package.status(),
                    to: PackageStatus::EnRoute,
                });
            }
        }

        let vehicle = fleet.vehicle_mut(self.vehicle_id)?;
        let ids = self.package_ids().collect::<Vec<_>>();
        vehicle.load(&ids)?;

        for id in &ids {
            packages.get_mut(*id)?.board(self.vehicle_id, self.departure)?;
        }

        for delivery in &self.deliveries {
            packages
                .get_mut(delivery.package_id)?
                .deliver(delivery.delivered_at)?;
            vehicle.unload(delivery.package_id)?;
        }

        vehicle.advance(self.end_location, self.return_minute, self.miles);
        Ok(())
    }
}

/// Drives an ordered route on the simulated clock.
pub struct TripSimulator<'a> {
    index: &'a DistanceIndex,
}

impl<'a> TripSimulator<'a> {
    pub fn new(index: &'a DistanceIndex) -> Self {
        TripSimulator { index }
    }

    /// Walks `route` from the depot starting at `departure`.
    ///
    /// A stop whose address is only corrected later holds the vehicle until
    /// the correction time before it drives there.
    pub fn simulate(
        &self,
        packages: &PackageStore,
        route: &[PackageId],
        vehicle: &Vehicle,
        departure: Minutes,
    ) -> Result<SimulatedTrip, RoutingError> {
        let mut clock = departure;
        let mut miles = 0.0;
        let mut current = DEPOT;
        let mut legs = Vec::with_capacity(route.len() + 1);
        let mut deliveries = Vec::with_capacity(route.len());

        for &id in route {
            let package = packages.get(id).ok_or(RoutingError::UnknownPackage(id))?;

            if let Some(fixed_at) = package.constraints().address_fixed_at() {
                clock = clock.max(fixed_at);
            }

            let next = self.index.locate(package.address())?;
            let distance = self.index.travel_distance(current, next);
            clock += vehicle.travel_minutes(distance);
            miles += distance;
            current = next;

            legs.push(Leg {
                location_id: next,
                distance,
                arrival: clock,
            });
            deliveries.push(Delivery {
                package_id: id,
                delivered_at: clock,
            });
        }

        if vehicle.should_return_to_depot() && current != DEPOT {
            let distance = self.index.travel_distance(current, DEPOT);
            clock += vehicle.travel_minutes(distance);
            miles += distance;
            current = DEPOT;

            legs.push(Leg {
                location_id: DEPOT,
                distance,
                arrival: clock,
            });
        }

        Ok(SimulatedTrip {
            vehicle_id: vehicle.id(),
            departure,
            return_minute: clock,
            miles,
            legs,
            deliveries,
            end_location: current,
        })
    }
}
