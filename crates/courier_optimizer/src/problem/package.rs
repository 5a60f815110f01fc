use std::fmt::Display;

use serde::Serialize;

use crate::{
    define_id_newtype,
    error::RoutingError,
    problem::{deadline::Deadline, service_clock::Minutes, vehicle::VehicleId},
};

define_id_newtype!(PackageId, "Package");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageStatus {
    AtHub,
    EnRoute,
    Delivered,
}

impl PackageStatus {
    /// The only status that may follow `self`.
    fn successor(&self) -> Option<PackageStatus> {
        match self {
            PackageStatus::AtHub => Some(PackageStatus::EnRoute),
            PackageStatus::EnRoute => Some(PackageStatus::Delivered),
            PackageStatus::Delivered => None,
        }
    }
}

impl Display for PackageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageStatus::AtHub => write!(f, "AT_HUB"),
            PackageStatus::EnRoute => write!(f, "EN_ROUTE"),
            PackageStatus::Delivered => write!(f, "DELIVERED"),
        }
    }
}

/// Per-package restrictions, set once before dispatch starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryConstraints {
    pub(crate) required_vehicle: Option<VehicleId>,
    pub(crate) available_from: Option<Minutes>,
    pub(crate) address_fixed_at: Option<Minutes>,
}

impl DeliveryConstraints {
    pub fn required_vehicle(&self) -> Option<VehicleId> {
        self.required_vehicle
    }

    pub fn available_from(&self) -> Option<Minutes> {
        self.available_from
    }

    pub fn address_fixed_at(&self) -> Option<Minutes> {
        self.address_fixed_at
    }

    /// Whether a trip of `vehicle` leaving at `departure` may carry the package.
    pub fn allows(&self, vehicle: VehicleId, departure: Minutes) -> bool {
        if self
            .required_vehicle
            .is_some_and(|required| required != vehicle)
        {
            return false;
        }

        if self.available_from.is_some_and(|at| at > departure) {
            return false;
        }

        if self.address_fixed_at.is_some_and(|at| at > departure) {
            return false;
        }

        true
    }

    /// Unlock times that are still ahead of `minute`.
    pub fn unlocks_after(&self, minute: Minutes) -> impl Iterator<Item = Minutes> {
        [self.available_from, self.address_fixed_at]
            .into_iter()
            .flatten()
            .filter(move |&at| at > minute)
    }

    pub fn is_empty(&self) -> bool {
        self.required_vehicle.is_none()
            && self.available_from.is_none()
            && self.address_fixed_at.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Package {
    id: PackageId,
    address: String,
    city: String,
    state: String,
    zip_code: String,
    deadline: Deadline,
    weight: f64,
    notes: String,

    status: PackageStatus,
    delivered_at: Option<Minutes>,
    vehicle_id: Option<VehicleId>,
    boarded_at: Option<Minutes>,

    constraints: DeliveryConstraints,
}

impl Package {
    pub fn id(&self) -> PackageId {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn status(&self) -> PackageStatus {
        self.status
    }

    pub fn is_at_hub(&self) -> bool {
        self.status == PackageStatus::AtHub
    }

    pub fn delivered_at(&self) -> Option<Minutes> {
        self.delivered_at
    }

    pub fn vehicle_id(&self) -> Option<VehicleId> {
        self.vehicle_id
    }

    pub fn boarded_at(&self) -> Option<Minutes> {
        self.boarded_at
    }

    pub fn constraints(&self) -> &DeliveryConstraints {
        &self.constraints
    }

    pub(crate) fn constraints_mut(&mut self) -> &mut DeliveryConstraints {
        &mut self.constraints
    }

    pub(crate) fn set_address(&mut self, address: String) {
        self.address = address;
    }

    /// Replaces the descriptive fields with those of `other`, keeping delivery progress.
    pub(crate) fn update_details(&mut self, other: Package) {
        self.address = other.address;
        self.city = other.city;
        self.state = other.state;
        self.zip_code = other.zip_code;
        self.deadline = other.deadline;
        self.weight = other.weight;
        self.notes = other.notes;
    }

    fn transition(&mut self, to: PackageStatus) -> Result<(), RoutingError> {
        if self.status.successor() != Some(to) {
            return Err(RoutingError::InvalidStatusTransition {
                package: self.id,
                from: self.status,
                to,
            });
        }

        self.status = to;
        Ok(())
    }

    pub(crate) fn board(&mut self, vehicle: VehicleId, minute: Minutes) -> Result<(), RoutingError> {
        self.transition(PackageStatus::EnRoute)?;
        self.vehicle_id = Some(vehicle);
        self.boarded_at = Some(minute);
        Ok(())
    }

    pub(crate) fn deliver(&mut self, minute: Minutes) -> Result<(), RoutingError> {
        self.transition(PackageStatus::Delivered)?;
        self.delivered_at = Some(minute);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn clear_board_minute(&mut self) {
        self.boarded_at = None;
    }
}

pub struct PackageBuilder {
    id: PackageId,
    address: String,
    city: String,
    state: String,
    zip_code: String,
    deadline: Deadline,
    weight: f64,
    notes: String,
}

impl PackageBuilder {
    pub fn new(id: impl Into<PackageId>) -> Self {
        PackageBuilder {
            id: id.into(),
            address: String::new(),
            city: String::new(),
            state: String::from("UT"),
            zip_code: String::new(),
            deadline: Deadline::EndOfDay,
            weight: 0.0,
            notes: String::new(),
        }
    }

    pub fn set_address(&mut self, address: impl Into<String>) -> &mut PackageBuilder {
        self.address = address.into();
        self
    }

    pub fn set_city(&mut self, city: impl Into<String>) -> &mut PackageBuilder {
        self.city = city.into();
        self
    }

    pub fn set_state(&mut self, state: impl Into<String>) -> &mut PackageBuilder {
        self.state = state.into();
        self
    }

    pub fn set_zip_code(&mut self, zip_code: impl Into<String>) -> &mut PackageBuilder {
        self.zip_code = zip_code.into();
        self
    }

    pub fn set_deadline(&mut self, deadline: Deadline) -> &mut PackageBuilder {
        self.deadline = deadline;
        self
    }

    pub fn set_weight(&mut self, weight: f64) -> &mut PackageBuilder {
        self.weight = weight;
        self
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) -> &mut PackageBuilder {
        self.notes = notes.into();
        self
    }

    pub fn build(self) -> Package {
        Package {
            id: self.id,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            deadline: self.deadline,
            weight: self.weight,
            notes: self.notes,
            status: PackageStatus::AtHub,
            delivered_at: None,
            vehicle_id: None,
            boarded_at: None,
            constraints: DeliveryConstraints::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package() -> Package {
        let mut builder = PackageBuilder::new(7);
        builder.set_address("195 W Oakland Ave");
        builder.build()
    }

    #[test]
    fn test_status_follows_single_path() {
        let mut package = package();
        assert_eq!(package.status(), PackageStatus::AtHub);
        assert_eq!(package.delivered_at(), None);

        package.board(VehicleId::new(1), 10).unwrap();
        assert_eq!(package.status(), PackageStatus::EnRoute);
        assert_eq!(package.boarded_at(), Some(10));
        assert_eq!(package.vehicle_id(), Some(VehicleId::new(1)));
        assert_eq!(package.delivered_at(), None);

        package.deliver(42).unwrap();
        assert_eq!(package.status(), PackageStatus::Delivered);
        assert_eq!(package.delivered_at(), Some(42));
    }

    #[test]
    fn test_status_never_regresses_or_skips() {
        let mut package = package();
        assert!(matches!(
            package.deliver(5),
            Err(RoutingError::InvalidStatusTransition {
                from: PackageStatus::AtHub,
                to: PackageStatus::Delivered,
                ..
            })
        ));

        package.board(VehicleId::new(2), 0).unwrap();
        assert!(package.board(VehicleId::new(2), 0).is_err());

        package.deliver(30).unwrap();
        assert!(package.deliver(31).is_err());
        assert!(package.board(VehicleId::new(1), 40).is_err());
        assert_eq!(package.delivered_at(), Some(30));
    }

    #[test]
    fn test_constraints_allow() {
        let constraints = DeliveryConstraints {
            required_vehicle: Some(VehicleId::new(2)),
            available_from: Some(65),
            address_fixed_at: None,
        };

        assert!(!constraints.allows(VehicleId::new(1), 100));
        assert!(!constraints.allows(VehicleId::new(2), 0));
        assert!(constraints.allows(VehicleId::new(2), 65));

        let corrected = DeliveryConstraints {
            address_fixed_at: Some(140),
            ..DeliveryConstraints::default()
        };
        assert!(!corrected.allows(VehicleId::new(1), 139));
        assert!(corrected.allows(VehicleId::new(3), 140));
        assert!(DeliveryConstraints::default().allows(VehicleId::new(9), 0));
    }

    #[test]
    fn test_unlocks_after() {
        let constraints = DeliveryConstraints {
            required_vehicle: None,
            available_from: Some(65),
            address_fixed_at: Some(140),
        };

        assert_eq!(constraints.unlocks_after(0).collect::<Vec<_>>(), vec![65, 140]);
        assert_eq!(constraints.unlocks_after(65).collect::<Vec<_>>(), vec![140]);
        assert_eq!(constraints.unlocks_after(140).count(), 0);
    }
}
