use comfy_table::{Cell, Table, presets::UTF8_FULL};
use courier_optimizer::{
    problem::service_clock::ServiceClock,
    reporting::status::{PackageState, PackageStatusEntry, StatusSnapshot},
    solver::run_result::{RunResult, Termination},
};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

pub fn summary_table(result: &RunResult, max_miles: Option<f64>) -> Table {
    let mut table = new_table(vec!["Total miles", "Delivered", "Outcome"]);

    let outcome = match result.termination {
        Termination::Completed => String::from("completed"),
        Termination::Stalled { remaining } => format!("stalled, {remaining} at hub"),
        Termination::IterationLimit { remaining } => {
            format!("iteration limit, {remaining} at hub")
        }
    };
    let miles = match max_miles {
        Some(max) if result.within_mileage(max) => format!("{:.1} (max {max:.1})", result.total_miles),
        Some(max) => format!("{:.1} (exceeds {max:.1})", result.total_miles),
        None => format!("{:.1}", result.total_miles),
    };

    table.add_row(vec![
        Cell::new(miles),
        Cell::new(format!("{}/{}", result.delivered, result.total_packages)),
        Cell::new(outcome),
    ]);
    table
}

pub fn vehicles_table(result: &RunResult, clock: &ServiceClock) -> Table {
    let mut table = new_table(vec!["Truck", "Packages", "Miles", "Last return"]);

    for vehicle in &result.vehicles {
        table.add_row(vec![
            Cell::new(vehicle.vehicle_id.get()),
            Cell::new(vehicle.delivered),
            Cell::new(format!("{:.1}", vehicle.miles)),
            Cell::new(
                vehicle
                    .last_return
                    .map(|minute| clock.format(minute))
                    .unwrap_or_else(|| String::from("-")),
            ),
        ]);
    }
    table
}

pub fn timeline_table(result: &RunResult, clock: &ServiceClock) -> Table {
    let mut table = new_table(vec!["Truck", "Depart", "Return", "Packages", "Miles"]);

    for trip in result.timeline() {
        table.add_row(vec![
            Cell::new(trip.vehicle_id().get()),
            Cell::new(clock.format(trip.departure())),
            Cell::new(clock.format(trip.return_minute())),
            Cell::new(trip.len()),
            Cell::new(format!("{:.1}", trip.miles())),
        ]);
    }
    table
}

pub fn state_cells(entry: &PackageStatusEntry, clock: &ServiceClock) -> [String; 3] {
    match entry.state {
        PackageState::AtHub => [String::from("AT HUB"), String::new(), String::new()],
        PackageState::EnRoute { since, vehicle_id } => [
            String::from("EN ROUTE"),
            format!("since {}", clock.format(since)),
            vehicle_id.to_string(),
        ],
        PackageState::Delivered { at, vehicle_id } => [
            String::from("DELIVERED"),
            format!("at {}", clock.format(at)),
            vehicle_id.to_string(),
        ],
    }
}

pub fn snapshot_table(snapshot: &StatusSnapshot, clock: &ServiceClock) -> Table {
    let mut table = new_table(vec!["Package", "Status", "Time", "Truck", "Deadline", "Address"]);

    for entry in &snapshot.packages {
        let [status, time, truck] = state_cells(entry, clock);
        table.add_row(vec![
            Cell::new(entry.package_id.get()),
            Cell::new(status),
            Cell::new(time),
            Cell::new(truck),
            Cell::new(entry.deadline),
            Cell::new(&entry.address),
        ]);
    }
    table
}
