use tracing::debug;

use crate::{
    error::RoutingError,
    problem::{
        distance_index::{Distance, DistanceIndex},
        location::{DEPOT, LocationIdx},
        package::{Package, PackageId},
        service_clock::{Minutes, ServiceClock},
        vehicle::Vehicle,
    },
    solver::two_opt,
};

#[derive(Debug, Clone, Copy)]
struct Stop {
    package_id: PackageId,
    location_id: LocationIdx,
    deadline: Minutes,
}

/// Builds the delivery sequence of a single trip.
pub struct RouteBuilder<'a> {
    index: &'a DistanceIndex,
    clock: &'a ServiceClock,
}

impl<'a> RouteBuilder<'a> {
    pub fn new(index: &'a DistanceIndex, clock: &'a ServiceClock) -> Self {
        RouteBuilder { index, clock }
    }

    /// Whether `package` may ride on a trip of `vehicle` leaving at `departure`.
    pub fn is_eligible(package: &Package, vehicle: &Vehicle, departure: Minutes) -> bool {
        package.is_at_hub() && package.constraints().allows(vehicle.id(), departure)
    }

    /// Orders the eligible `candidates` into a trip for `vehicle`.
    ///
    /// Stops are picked greedily by distance from the current position, then
    /// by deadline, up to the vehicle's capacity, and the sequence is then
    /// refined with 2-opt. An empty result means nothing can leave at
    /// `departure`.
    pub fn build_route<'p>(
        &self,
        candidates: impl IntoIterator<Item = &'p Package>,
        vehicle: &Vehicle,
        departure: Minutes,
    ) -> Result<Vec<PackageId>, RoutingError> {
        let mut pending = candidates
            .into_iter()
            .filter(|package| Self::is_eligible(package, vehicle, departure))
            .map(|package| {
                Ok(Stop {
                    package_id: package.id(),
                    location_id: self.index.locate(package.address())?,
                    deadline: package.deadline().minutes_since_start(self.clock),
                })
            })
            .collect::<Result<Vec<_>, RoutingError>>()?;
        pending.sort_by_key(|stop| stop.package_id);

        let capacity = vehicle.capacity();
        let mut route: Vec<Stop> = Vec::with_capacity(pending.len().min(capacity));
        let mut current = DEPOT;

        while !pending.is_empty() && route.len() < capacity {
            let mut best = 0;
            let mut best_key = self.selection_key(current, &pending[0]);
            for (position, stop) in pending.iter().enumerate().skip(1) {
                let key = self.selection_key(current, stop);
                if key < best_key {
                    best = position;
                    best_key = key;
                }
            }

            let stop = pending.remove(best);
            current = stop.location_id;
            route.push(stop);
        }

        let moves = two_opt::improve(self.index, &mut route, |stop| stop.location_id);

        debug!(
            vehicle = %vehicle.id(),
            departure = %self.clock.format(departure),
            stops = route.len(),
            left_behind = pending.len(),
            two_opt_moves = moves,
            "Built route"
        );

        Ok(route.into_iter().map(|stop| stop.package_id).collect())
    }

    fn selection_key(&self, current: LocationIdx, stop: &Stop) -> (Distance, Minutes) {
        (
            self.index.travel_distance(current, stop.location_id),
            stop.deadline,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{deadline::Deadline, package::PackageBuilder, vehicle::VehicleBuilder},
        test_utils,
    };

    use super::*;

    fn build(
        index: &DistanceIndex,
        packages: &crate::problem::package_store::PackageStore,
        vehicle: &Vehicle,
        departure: Minutes,
    ) -> Vec<u32> {
        let clock = ServiceClock::default();
        RouteBuilder::new(index, &clock)
            .build_route(packages.iter(), vehicle, departure)
            .unwrap()
            .into_iter()
            .map(|id| id.get())
            .collect()
    }

    #[test]
    fn test_greedy_nearest_neighbour() {
        let index = test_utils::create_triangle_index();
        let packages = test_utils::create_packages(&["C", "A", "B"]);
        let vehicle = test_utils::create_vehicle(1);

        // depot -> A (2), A -> B (4), B -> C (1)
        assert_eq!(build(&index, &packages, &vehicle, 0), vec![2, 3, 1]);
    }

    #[test]
    fn test_deadline_breaks_distance_ties() {
        let index = test_utils::create_triangle_index();
        let mut packages = test_utils::create_packages(&["A", "A"]);
        let mut urgent = PackageBuilder::new(2);
        urgent
            .set_address("A")
            .set_deadline(Deadline::parse("10:30 AM"));
        packages.insert(urgent.build());

        let vehicle = test_utils::create_vehicle(1);
        assert_eq!(build(&index, &packages, &vehicle, 0), vec![2, 1]);
    }

    #[test]
    fn test_equal_keys_keep_lowest_id() {
        let index = test_utils::create_triangle_index();
        let packages = test_utils::create_packages(&["B", "B", "B"]);
        let vehicle = test_utils::create_vehicle(1);

        assert_eq!(build(&index, &packages, &vehicle, 0), vec![1, 2, 3]);
    }

    #[test]
    fn test_capacity_limits_route() {
        let index = test_utils::create_line_index(6);
        let packages = test_utils::create_packages(&["L6", "L5", "L4", "L3", "L2", "L1"]);
        let mut builder = VehicleBuilder::default();
        builder.set_vehicle_id(1).set_capacity(4);
        let vehicle = builder.build();

        assert_eq!(build(&index, &packages, &vehicle, 0), vec![6, 5, 4, 3]);
    }

    #[test]
    fn test_constraints_filter_candidates() {
        let index = test_utils::create_triangle_index();
        let mut packages = test_utils::create_packages(&["A", "B", "C"]);
        packages
            .get_mut(PackageId::new(1))
            .unwrap()
            .constraints_mut()
            .required_vehicle = Some(crate::problem::vehicle::VehicleId::new(2));
        packages
            .get_mut(PackageId::new(2))
            .unwrap()
            .constraints_mut()
            .available_from = Some(65);
        packages
            .get_mut(PackageId::new(3))
            .unwrap()
            .constraints_mut()
            .address_fixed_at = Some(140);

        let truck_1 = test_utils::create_vehicle(1);
        let truck_2 = test_utils::create_vehicle(2);

        assert!(build(&index, &packages, &truck_1, 0).is_empty());
        assert_eq!(build(&index, &packages, &truck_2, 0), vec![1]);
        assert_eq!(build(&index, &packages, &truck_1, 64), Vec::<u32>::new());
        assert_eq!(build(&index, &packages, &truck_1, 65), vec![2]);
        assert_eq!(build(&index, &packages, &truck_2, 140), vec![1, 2, 3]);
    }

    #[test]
    fn test_unknown_address_fails() {
        let index = test_utils::create_triangle_index();
        let packages = test_utils::create_packages(&["A", "Nowhere"]);
        let clock = ServiceClock::default();

        let result = RouteBuilder::new(&index, &clock).build_route(
            packages.iter(),
            &test_utils::create_vehicle(1),
            0,
        );
        assert!(matches!(result, Err(RoutingError::AddressNotFound { .. })));
    }
}
