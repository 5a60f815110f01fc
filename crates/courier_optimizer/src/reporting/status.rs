use serde::Serialize;

use crate::{
    problem::{
        deadline::Deadline,
        package::{Package, PackageId},
        package_store::PackageStore,
        service_clock::Minutes,
        vehicle::VehicleId,
    },
    solver::trip::Trip,
};

/// Where a package is at a given minute of the simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageState {
    AtHub,
    EnRoute { since: Minutes, vehicle_id: VehicleId },
    Delivered { at: Minutes, vehicle_id: VehicleId },
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageStatusEntry {
    pub package_id: PackageId,
    pub address: String,
    pub deadline: Deadline,
    #[serde(flatten)]
    pub state: PackageState,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub minute: Minutes,
    pub packages: Vec<PackageStatusEntry>,
}

impl StatusSnapshot {
    pub fn count(&self, predicate: impl Fn(&PackageState) -> bool) -> usize {
        self.packages
            .iter()
            .filter(|entry| predicate(&entry.state))
            .count()
    }
}

/// Minute `package` left the depot. Falls back to the departure of the
/// vehicle's trip that was on the road when the package was delivered.
fn board_minute(package: &Package, trips: &[Trip]) -> Option<Minutes> {
    if let Some(boarded_at) = package.boarded_at() {
        return Some(boarded_at);
    }

    let delivered_at = package.delivered_at()?;
    let vehicle_id = package.vehicle_id()?;
    trips
        .iter()
        .filter(|trip| trip.vehicle_id() == vehicle_id && trip.spans(delivered_at))
        .map(Trip::departure)
        .min()
}

pub fn package_state_at(package: &Package, trips: &[Trip], minute: Minutes) -> PackageState {
    let Some(vehicle_id) = package.vehicle_id() else {
        return PackageState::AtHub;
    };

    if let Some(delivered_at) = package.delivered_at() {
        if minute >= delivered_at {
            return PackageState::Delivered {
                at: delivered_at,
                vehicle_id,
            };
        }
    }

    match board_minute(package, trips) {
        Some(since)
            if since <= minute && package.delivered_at().is_none_or(|at| minute < at) =>
        {
            PackageState::EnRoute { since, vehicle_id }
        }
        _ => PackageState::AtHub,
    }
}

/// State of every package at `minute`, ordered by package ID.
pub fn status_at(packages: &PackageStore, trips: &[Trip], minute: Minutes) -> StatusSnapshot {
    StatusSnapshot {
        minute,
        packages: packages
            .iter()
            .map(|package| entry(package, trips, minute))
            .collect(),
    }
}

pub fn lookup(
    packages: &PackageStore,
    trips: &[Trip],
    package_id: PackageId,
    minute: Minutes,
) -> Option<PackageStatusEntry> {
    packages
        .get(package_id)
        .map(|package| entry(package, trips, minute))
}

fn entry(package: &Package, trips: &[Trip], minute: Minutes) -> PackageStatusEntry {
    PackageStatusEntry {
        package_id: package.id(),
        address: package.address().to_owned(),
        deadline: package.deadline(),
        state: package_state_at(package, trips, minute),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{location::DEPOT, service_clock::ServiceClock},
        solver::{
            dispatch::{DispatchParams, DispatchScheduler},
            trip_simulator::SimulatedTrip,
        },
        test_utils,
    };

    use super::*;

    fn dispatched() -> (PackageStore, Vec<Trip>) {
        let index = test_utils::create_triangle_index();
        let packages = test_utils::create_packages(&["A", "B", "C"]);
        let mut scheduler = DispatchScheduler::new(
            &index,
            ServiceClock::default(),
            packages,
            test_utils::create_fleet(),
            DispatchParams::default(),
        );
        let result = scheduler.run().unwrap();
        (scheduler.into_packages(), result.trips)
    }

    #[test]
    fn test_states_over_time() {
        let (packages, trips) = dispatched();
        let truck = VehicleId::new(1);
        let package = packages.get(PackageId::new(2)).unwrap();

        // Truck 1 leaves at 0, reaches A at 7 and B at 20
        assert_eq!(
            package_state_at(package, &trips, 0),
            PackageState::EnRoute {
                since: 0,
                vehicle_id: truck
            }
        );
        assert_eq!(
            package_state_at(package, &trips, 19),
            PackageState::EnRoute {
                since: 0,
                vehicle_id: truck
            }
        );
        assert_eq!(
            package_state_at(package, &trips, 20),
            PackageState::Delivered {
                at: 20,
                vehicle_id: truck
            }
        );
    }

    #[test]
    fn test_undispatched_package_is_at_hub() {
        let packages = test_utils::create_packages(&["A"]);
        let package = packages.get(PackageId::new(1)).unwrap();

        assert_eq!(package_state_at(package, &[], 500), PackageState::AtHub);
    }

    #[test]
    fn test_snapshot_and_lookup() {
        let (packages, trips) = dispatched();

        let snapshot = status_at(&packages, &trips, 10);
        assert_eq!(snapshot.packages.len(), 3);
        assert_eq!(
            snapshot.count(|state| matches!(state, PackageState::Delivered { .. })),
            1
        );
        assert_eq!(
            snapshot.count(|state| matches!(state, PackageState::EnRoute { .. })),
            2
        );

        let entry = lookup(&packages, &trips, PackageId::new(3), 23).unwrap();
        assert_eq!(entry.address, "C");
        assert!(matches!(entry.state, PackageState::Delivered { at: 23, .. }));
        assert!(lookup(&packages, &trips, PackageId::new(9), 23).is_none());
    }

    fn trip(vehicle_id: VehicleId, departure: Minutes, return_minute: Minutes) -> Trip {
        Trip::from(&SimulatedTrip {
            vehicle_id,
            departure,
            return_minute,
            miles: 0.0,
            legs: vec![],
            deliveries: vec![],
            end_location: DEPOT,
        })
    }

    fn delivered_without_board_minute(vehicle_id: VehicleId, delivered_at: Minutes) -> Package {
        let mut package = test_utils::create_package(1, "A");
        package.board(vehicle_id, 0).unwrap();
        package.deliver(delivered_at).unwrap();
        package.clear_board_minute();
        package
    }

    #[test]
    fn test_board_minute_falls_back_to_spanning_trip() {
        let truck = VehicleId::new(1);
        let trips = vec![
            trip(truck, 0, 23),
            trip(VehicleId::new(2), 30, 90),
            trip(truck, 40, 80),
        ];
        let package = delivered_without_board_minute(truck, 50);

        assert_eq!(package_state_at(&package, &trips, 10), PackageState::AtHub);
        assert_eq!(package_state_at(&package, &trips, 39), PackageState::AtHub);
        assert_eq!(
            package_state_at(&package, &trips, 40),
            PackageState::EnRoute {
                since: 40,
                vehicle_id: truck
            }
        );
        assert_eq!(
            package_state_at(&package, &trips, 50),
            PackageState::Delivered {
                at: 50,
                vehicle_id: truck
            }
        );
    }

    #[test]
    fn test_board_minute_fallback_prefers_earliest_departure() {
        let truck = VehicleId::new(1);
        let trips = vec![trip(truck, 40, 80), trip(truck, 0, 40)];
        let package = delivered_without_board_minute(truck, 40);

        assert_eq!(
            package_state_at(&package, &trips, 5),
            PackageState::EnRoute {
                since: 0,
                vehicle_id: truck
            }
        );
    }

    #[test]
    fn test_board_minute_fallback_without_spanning_trip() {
        let truck = VehicleId::new(1);
        let package = delivered_without_board_minute(truck, 50);

        assert_eq!(
            package_state_at(&package, &[trip(truck, 0, 23)], 45),
            PackageState::AtHub
        );
    }
}
