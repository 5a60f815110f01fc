use anyhow::anyhow;
use courier_optimizer::{
    problem::{package::PackageId, service_clock::END_OF_DAY},
    reporting::status::{lookup, status_at},
};
use jiff::civil::Time;

use crate::{session::Session, tables};

pub fn print_status(session: &Session, at: Time) {
    let minute = session.clock.minutes_since_start(at);
    let snapshot = status_at(&session.packages, &session.trips, minute);

    println!("Status at {}", session.clock.format(minute));
    println!("{}", tables::snapshot_table(&snapshot, &session.clock));
}

/// One line describing package `id` at `at`.
pub fn describe_package(session: &Session, id: u32, at: Time) -> Result<String, anyhow::Error> {
    let minute = session.clock.minutes_since_start(at);
    let entry = lookup(&session.packages, &session.trips, PackageId::new(id), minute)
        .ok_or_else(|| anyhow!("No package with ID {id}"))?;

    let [status, time, truck] = tables::state_cells(&entry, &session.clock);
    Ok(
        [
            format!("Package {id} @ {}:", session.clock.format(minute)),
            status,
            time,
            truck,
            format!("| deadline {} | {}", entry.deadline, entry.address),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" "),
    )
}

pub fn print_lookup(session: &Session, id: u32, at: Option<Time>) -> Result<(), anyhow::Error> {
    println!("{}", describe_package(session, id, at.unwrap_or(END_OF_DAY))?);
    Ok(())
}
