use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    error::RoutingError,
    problem::{
        constraints::ConstraintSet,
        distance_index::DistanceIndexBuilder,
        fleet::Fleet,
        package::PackageId,
        service_clock::{DEFAULT_SERVICE_START, Minutes, ServiceClock, parse_clock_text},
        vehicle::{DEFAULT_CAPACITY, DEFAULT_SPEED_MPH, Vehicle, VehicleBuilder, VehicleId},
    },
    solver::dispatch::{DEFAULT_MAX_ITERATIONS, DispatchParams},
};

pub const DEFAULT_DEPOT_NAME: &str = "Western Governors University";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid plan configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Routing(#[from] RoutingError),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename = "VehicleRestriction")]
pub struct JsonVehicleRestriction {
    pub vehicle: VehicleId,
    pub packages: Vec<PackageId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename = "DelayedArrival")]
pub struct JsonDelayedArrival {
    pub available_at: String,
    pub packages: Vec<PackageId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename = "AddressCorrection")]
pub struct JsonAddressCorrection {
    pub fixed_at: String,
    pub packages: Vec<PackageId>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields, rename = "Constraints")]
pub struct JsonConstraints {
    pub vehicle_restrictions: Vec<JsonVehicleRestriction>,
    pub delayed: Vec<JsonDelayedArrival>,
    pub address_corrections: Vec<JsonAddressCorrection>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename = "Alias")]
pub struct JsonAlias {
    pub alias: String,
    pub target: String,
}

/// Everything about a run that is not in the input tables.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields, rename = "PlanConfig")]
pub struct JsonPlanConfig {
    pub service_start: String,
    pub depot_name: String,
    pub speed_mph: f64,
    pub capacity: usize,
    pub primary_vehicles: Vec<VehicleId>,
    pub auxiliary_vehicle: Option<VehicleId>,
    pub return_to_depot: bool,
    pub max_dispatch_iterations: usize,
    pub aliases: Vec<JsonAlias>,
    pub constraints: JsonConstraints,
    pub snapshots: Vec<String>,
}

impl Default for JsonPlanConfig {
    fn default() -> Self {
        JsonPlanConfig {
            service_start: DEFAULT_SERVICE_START.strftime("%H:%M").to_string(),
            depot_name: DEFAULT_DEPOT_NAME.to_owned(),
            speed_mph: DEFAULT_SPEED_MPH,
            capacity: DEFAULT_CAPACITY,
            primary_vehicles: vec![VehicleId::new(1), VehicleId::new(2)],
            auxiliary_vehicle: Some(VehicleId::new(3)),
            return_to_depot: false,
            max_dispatch_iterations: DEFAULT_MAX_ITERATIONS,
            aliases: vec![],
            constraints: JsonConstraints::default(),
            snapshots: vec![],
        }
    }
}

impl JsonPlanConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn service_clock(&self) -> Result<ServiceClock, RoutingError> {
        parse_clock_text(&self.service_start)
            .map(ServiceClock::new)
            .ok_or_else(|| RoutingError::InvalidClockTime(self.service_start.clone()))
    }

    fn build_vehicle(&self, id: VehicleId) -> Vehicle {
        let mut builder = VehicleBuilder::default();
        builder
            .set_vehicle_id(id)
            .set_speed_mph(self.speed_mph)
            .set_capacity(self.capacity)
            .set_return(self.return_to_depot);
        builder.build()
    }

    pub fn build_fleet(&self) -> Result<Fleet, RoutingError> {
        Fleet::new(
            self.primary_vehicles
                .iter()
                .map(|&id| self.build_vehicle(id))
                .collect(),
            self.auxiliary_vehicle.map(|id| self.build_vehicle(id)),
        )
    }

    pub fn build_constraints(&self, clock: &ServiceClock) -> Result<ConstraintSet, RoutingError> {
        let mut constraints = ConstraintSet::default();

        for restriction in &self.constraints.vehicle_restrictions {
            constraints.restrict_to_vehicle(restriction.vehicle, restriction.packages.clone());
        }

        for delay in &self.constraints.delayed {
            constraints.delay_until(clock.parse(&delay.available_at)?, delay.packages.clone());
        }

        for correction in &self.constraints.address_corrections {
            constraints.correct_address_at(
                clock.parse(&correction.fixed_at)?,
                correction.packages.clone(),
                correction.address.clone(),
            );
        }

        Ok(constraints)
    }

    pub fn apply_aliases(&self, builder: &mut DistanceIndexBuilder) {
        for alias in &self.aliases {
            builder.add_alias(alias.alias.as_str(), alias.target.as_str());
        }
    }

    pub fn dispatch_params(&self) -> DispatchParams {
        DispatchParams {
            max_iterations: self.max_dispatch_iterations,
        }
    }

    pub fn snapshot_minutes(&self, clock: &ServiceClock) -> Result<Vec<Minutes>, RoutingError> {
        self.snapshots.iter().map(|text| clock.parse(text)).collect()
    }
}
