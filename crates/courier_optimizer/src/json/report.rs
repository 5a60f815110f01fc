use serde::Serialize;

use crate::{
    problem::{
        distance_index::Distance, package::PackageId, service_clock::ServiceClock,
        vehicle::VehicleId,
    },
    reporting::status::{PackageState, PackageStatusEntry, StatusSnapshot},
    solver::{
        run_result::{RunResult, Termination, VehicleSummary},
        trip::Trip,
    },
};

/// Converts a run value into its JSON form, rendering minutes as clock times.
pub trait FromRun<T> {
    fn from_run(value: T, clock: &ServiceClock) -> Self;
}

#[derive(Serialize, Debug)]
#[serde(rename = "Vehicle")]
pub struct JsonVehicleSummary {
    pub vehicle_id: VehicleId,
    pub miles: Distance,
    pub delivered: usize,
    pub last_return: Option<String>,
}

impl FromRun<&VehicleSummary> for JsonVehicleSummary {
    fn from_run(value: &VehicleSummary, clock: &ServiceClock) -> Self {
        JsonVehicleSummary {
            vehicle_id: value.vehicle_id,
            miles: value.miles,
            delivered: value.delivered,
            last_return: value.last_return.map(|minute| clock.format(minute)),
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename = "Trip")]
pub struct JsonTrip {
    pub vehicle_id: VehicleId,
    pub depart: String,
    #[serde(rename = "return")]
    pub return_time: String,
    pub miles: Distance,
    pub count: usize,
    pub packages: Vec<PackageId>,
}

impl FromRun<&Trip> for JsonTrip {
    fn from_run(value: &Trip, clock: &ServiceClock) -> Self {
        JsonTrip {
            vehicle_id: value.vehicle_id(),
            depart: clock.format(value.departure()),
            return_time: clock.format(value.return_minute()),
            miles: value.miles(),
            count: value.len(),
            packages: value.package_ids().to_vec(),
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename = "PackageStatus")]
pub struct JsonPackageStatus {
    pub package_id: PackageId,
    pub address: String,
    pub deadline: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<VehicleId>,
}

impl FromRun<&PackageStatusEntry> for JsonPackageStatus {
    fn from_run(value: &PackageStatusEntry, clock: &ServiceClock) -> Self {
        let (status, since, delivered_at, vehicle_id) = match value.state {
            PackageState::AtHub => ("AT_HUB", None, None, None),
            PackageState::EnRoute { since, vehicle_id } => {
                ("EN_ROUTE", Some(clock.format(since)), None, Some(vehicle_id))
            }
            PackageState::Delivered { at, vehicle_id } => {
                ("DELIVERED", None, Some(clock.format(at)), Some(vehicle_id))
            }
        };

        JsonPackageStatus {
            package_id: value.package_id,
            address: value.address.clone(),
            deadline: value.deadline.to_string(),
            status,
            since,
            delivered_at,
            vehicle_id,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename = "Snapshot")]
pub struct JsonSnapshot {
    pub at: String,
    pub packages: Vec<JsonPackageStatus>,
}

impl FromRun<&StatusSnapshot> for JsonSnapshot {
    fn from_run(value: &StatusSnapshot, clock: &ServiceClock) -> Self {
        JsonSnapshot {
            at: clock.format(value.minute),
            packages: value
                .packages
                .iter()
                .map(|entry| JsonPackageStatus::from_run(entry, clock))
                .collect(),
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename = "PlanReport")]
pub struct JsonPlanReport {
    pub total_miles: Distance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_miles: Option<Distance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub within_max_miles: Option<bool>,
    pub delivered: usize,
    pub total_packages: usize,
    pub termination: Termination,
    pub vehicles: Vec<JsonVehicleSummary>,
    pub trips: Vec<JsonTrip>,
    pub snapshots: Vec<JsonSnapshot>,
}

impl JsonPlanReport {
    pub fn new(
        result: &RunResult,
        snapshots: &[StatusSnapshot],
        max_miles: Option<Distance>,
        clock: &ServiceClock,
    ) -> Self {
        JsonPlanReport {
            total_miles: result.total_miles,
            max_miles,
            within_max_miles: max_miles.map(|max| result.within_mileage(max)),
            delivered: result.delivered,
            total_packages: result.total_packages,
            termination: result.termination,
            vehicles: result
                .vehicles
                .iter()
                .map(|summary| JsonVehicleSummary::from_run(summary, clock))
                .collect(),
            trips: result
                .timeline()
                .into_iter()
                .map(|trip| JsonTrip::from_run(trip, clock))
                .collect(),
            snapshots: snapshots
                .iter()
                .map(|snapshot| JsonSnapshot::from_run(snapshot, clock))
                .collect(),
        }
    }
}
