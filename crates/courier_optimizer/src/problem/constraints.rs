use tracing::debug;

use crate::{
    error::RoutingError,
    problem::{
        fleet::Fleet, package::PackageId, package_store::PackageStore, service_clock::Minutes,
        vehicle::VehicleId,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRestriction {
    pub vehicle_id: VehicleId,
    pub packages: Vec<PackageId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DelayedArrival {
    pub available_from: Minutes,
    pub packages: Vec<PackageId>,
}

/// Packages whose destination is only known to be correct from `fixed_at`.
/// When `address` is given it replaces the destination of every package in
/// the group.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressCorrection {
    pub fixed_at: Minutes,
    pub packages: Vec<PackageId>,
    pub address: Option<String>,
}

/// Externally supplied constraints, applied to the package store once before
/// any dispatch happens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    vehicle_restrictions: Vec<VehicleRestriction>,
    delayed: Vec<DelayedArrival>,
    address_corrections: Vec<AddressCorrection>,
}

impl ConstraintSet {
    pub fn restrict_to_vehicle(
        &mut self,
        vehicle_id: VehicleId,
        packages: impl IntoIterator<Item = PackageId>,
    ) -> &mut ConstraintSet {
        self.vehicle_restrictions.push(VehicleRestriction {
            vehicle_id,
            packages: packages.into_iter().collect(),
        });
        self
    }

    pub fn delay_until(
        &mut self,
        available_from: Minutes,
        packages: impl IntoIterator<Item = PackageId>,
    ) -> &mut ConstraintSet {
        self.delayed.push(DelayedArrival {
            available_from,
            packages: packages.into_iter().collect(),
        });
        self
    }

    pub fn correct_address_at(
        &mut self,
        fixed_at: Minutes,
        packages: impl IntoIterator<Item = PackageId>,
        address: Option<String>,
    ) -> &mut ConstraintSet {
        self.address_corrections.push(AddressCorrection {
            fixed_at,
            packages: packages.into_iter().collect(),
            address,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.vehicle_restrictions.is_empty()
            && self.delayed.is_empty()
            && self.address_corrections.is_empty()
    }

    fn referenced_packages(&self) -> impl Iterator<Item = PackageId> + '_ {
        self.vehicle_restrictions
            .iter()
            .flat_map(|restriction| restriction.packages.iter())
            .chain(self.delayed.iter().flat_map(|delay| delay.packages.iter()))
            .chain(
                self.address_corrections
                    .iter()
                    .flat_map(|correction| correction.packages.iter()),
            )
            .copied()
    }

    /// Writes the constraints onto the packages. Nothing is written unless
    /// every referenced package and vehicle exists.
    pub fn apply(&self, packages: &mut PackageStore, fleet: &Fleet) -> Result<(), RoutingError> {
        if self.is_empty() {
            debug!("No delivery constraints to apply");
            return Ok(());
        }

        if let Some(unknown) = self.referenced_packages().find(|&id| !packages.contains(id)) {
            return Err(RoutingError::UnknownPackage(unknown));
        }

        if let Some(restriction) = self
            .vehicle_restrictions
            .iter()
            .find(|restriction| !fleet.contains(restriction.vehicle_id))
        {
            return Err(RoutingError::UnknownVehicle(restriction.vehicle_id));
        }

        for restriction in &self.vehicle_restrictions {
            for &id in &restriction.packages {
                packages.get_mut(id)?.constraints_mut().required_vehicle =
                    Some(restriction.vehicle_id);
            }
        }

        for delay in &self.delayed {
            for &id in &delay.packages {
                packages.get_mut(id)?.constraints_mut().available_from = Some(delay.available_from);
            }
        }

        for correction in &self.address_corrections {
            for &id in &correction.packages {
                let package = packages.get_mut(id)?;
                package.constraints_mut().address_fixed_at = Some(correction.fixed_at);
                if let Some(address) = &correction.address {
                    package.set_address(address.clone());
                }
            }
        }

        debug!(
            restricted = self.vehicle_restrictions.len(),
            delayed = self.delayed.len(),
            corrected = self.address_corrections.len(),
            "Applied delivery constraints"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use super::*;

    #[test]
    fn test_apply_sets_package_fields() {
        let mut packages = test_utils::create_packages(&["A", "B", "C", "A"]);
        let fleet = test_utils::create_fleet();

        let mut constraints = ConstraintSet::default();
        constraints
            .restrict_to_vehicle(VehicleId::new(2), [PackageId::new(1)])
            .delay_until(65, [PackageId::new(2), PackageId::new(3)])
            .correct_address_at(140, [PackageId::new(4)], Some(String::from("B")));
        constraints.apply(&mut packages, &fleet).unwrap();

        let first = packages.get(PackageId::new(1)).unwrap().constraints();
        assert_eq!(first.required_vehicle(), Some(VehicleId::new(2)));
        assert_eq!(first.available_from(), None);

        assert_eq!(
            packages.get(PackageId::new(3)).unwrap().constraints().available_from(),
            Some(65)
        );

        let corrected = packages.get(PackageId::new(4)).unwrap();
        assert_eq!(corrected.constraints().address_fixed_at(), Some(140));
        assert_eq!(corrected.address(), "B");
    }

    #[test]
    fn test_apply_rejects_unknown_references() {
        let fleet = test_utils::create_fleet();

        let mut packages = test_utils::create_packages(&["A"]);
        let mut constraints = ConstraintSet::default();
        constraints
            .delay_until(65, [PackageId::new(1)])
            .delay_until(65, [PackageId::new(9)]);
        assert!(matches!(
            constraints.apply(&mut packages, &fleet),
            Err(RoutingError::UnknownPackage(id)) if id == PackageId::new(9)
        ));
        // Nothing was written
        assert!(packages.get(PackageId::new(1)).unwrap().constraints().is_empty());

        let mut constraints = ConstraintSet::default();
        constraints.restrict_to_vehicle(VehicleId::new(7), [PackageId::new(1)]);
        assert!(matches!(
            constraints.apply(&mut packages, &fleet),
            Err(RoutingError::UnknownVehicle(id)) if id == VehicleId::new(7)
        ));
    }

    #[test]
    fn test_empty_set_leaves_packages_untouched() {
        let mut packages = test_utils::create_packages(&["A", "B"]);
        let constraints = ConstraintSet::default();

        assert!(constraints.is_empty());
        constraints
            .apply(&mut packages, &test_utils::create_fleet())
            .unwrap();
        assert!(
            packages
                .iter()
                .all(|package| package.constraints().is_empty())
        );

        let mut constraints = ConstraintSet::default();
        constraints.delay_until(65, [PackageId::new(2)]);
        assert!(!constraints.is_empty());
    }
}
