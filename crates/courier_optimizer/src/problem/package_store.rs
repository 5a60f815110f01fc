use fxhash::FxHashMap;

use crate::{
    error::RoutingError,
    problem::package::{Package, PackageId, PackageStatus},
};

/// Packages keyed by their ID.
///
/// Iteration helpers always yield packages in ascending ID order so that
/// planning is deterministic regardless of hashing.
#[derive(Debug, Clone, Default)]
pub struct PackageStore {
    packages: FxHashMap<PackageId, Package>,
}

impl PackageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `package`, or refreshes the descriptive fields of an existing
    /// package with the same ID. Returns `true` when the ID was new.
    pub fn insert(&mut self, package: Package) -> bool {
        match self.packages.get_mut(&package.id()) {
            Some(existing) => {
                existing.update_details(package);
                false
            }
            None => {
                self.packages.insert(package.id(), package);
                true
            }
        }
    }

    pub fn get(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(&id)
    }

    pub fn contains(&self, id: PackageId) -> bool {
        self.packages.contains_key(&id)
    }

    pub(crate) fn get_mut(&mut self, id: PackageId) -> Result<&mut Package, RoutingError> {
        self.packages
            .get_mut(&id)
            .ok_or(RoutingError::UnknownPackage(id))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        let mut packages = self.packages.values().collect::<Vec<_>>();
        packages.sort_by_key(|package| package.id());
        packages.into_iter()
    }

    pub fn at_hub(&self) -> impl Iterator<Item = &Package> {
        self.iter().filter(|package| package.is_at_hub())
    }

    pub fn count_with_status(&self, status: PackageStatus) -> usize {
        self.packages
            .values()
            .filter(|package| package.status() == status)
            .count()
    }
}

impl FromIterator<Package> for PackageStore {
    fn from_iter<T: IntoIterator<Item = Package>>(iter: T) -> Self {
        let mut store = PackageStore::new();
        for package in iter {
            store.insert(package);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use crate::problem::{
        deadline::Deadline,
        package::{PackageBuilder, PackageId, PackageStatus},
        vehicle::VehicleId,
    };

    use super::*;

    fn package(id: u32, address: &str) -> Package {
        let mut builder = PackageBuilder::new(id);
        builder.set_address(address);
        builder.build()
    }

    #[test]
    fn test_insert_or_update() {
        let mut store = PackageStore::new();

        assert!(store.insert(package(1, "A")));
        assert!(store.insert(package(2, "B")));
        assert!(!store.insert(package(1, "C")));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(PackageId::new(1)).unwrap().address(), "C");
    }

    #[test]
    fn test_update_keeps_delivery_progress() {
        let mut store = PackageStore::new();
        store.insert(package(1, "A"));
        store
            .get_mut(PackageId::new(1))
            .unwrap()
            .board(VehicleId::new(1), 0)
            .unwrap();

        let mut builder = PackageBuilder::new(1);
        builder.set_address("A").set_deadline(Deadline::parse("9:00 AM"));
        store.insert(builder.build());

        let updated = store.get(PackageId::new(1)).unwrap();
        assert_eq!(updated.status(), PackageStatus::EnRoute);
        assert_eq!(updated.deadline(), Deadline::parse("9:00 AM"));
    }

    #[test]
    fn test_iteration_is_ordered_by_id() {
        let store = [40, 3, 17, 1, 25]
            .into_iter()
            .map(|id| package(id, "A"))
            .collect::<PackageStore>();

        assert_eq!(
            store.iter().map(|p| p.id().get()).collect::<Vec<_>>(),
            vec![1, 3, 17, 25, 40]
        );
        assert_eq!(store.at_hub().count(), 5);
        assert_eq!(store.count_with_status(PackageStatus::Delivered), 0);
    }

    #[test]
    fn test_unknown_package() {
        let mut store = PackageStore::new();
        assert!(matches!(
            store.get_mut(PackageId::new(99)),
            Err(RoutingError::UnknownPackage(id)) if id == PackageId::new(99)
        ));
    }
}
