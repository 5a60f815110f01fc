use courier_optimizer::{
    json::report::JsonPlanReport,
    problem::service_clock::ServiceClock,
    reporting::status::status_at,
    solver::run_result::{RunResult, Termination},
};
use tracing::warn;

use crate::{session::Session, tables};

/// Summary, vehicle and timeline tables for a run that did not finish.
pub fn partial_report(result: &RunResult, clock: &ServiceClock) -> String {
    format!(
        "{}\n{}\n{}",
        tables::summary_table(result, None),
        tables::vehicles_table(result, clock),
        tables::timeline_table(result, clock)
    )
}

pub fn run(session: &Session, json: bool, max_miles: Option<f64>) -> Result<(), anyhow::Error> {
    let snapshots = session
        .config
        .snapshot_minutes(&session.clock)?
        .into_iter()
        .map(|minute| status_at(&session.packages, &session.trips, minute))
        .collect::<Vec<_>>();

    if json {
        let report = JsonPlanReport::new(&session.result, &snapshots, max_miles, &session.clock);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", tables::summary_table(&session.result, max_miles));
    println!("{}", tables::vehicles_table(&session.result, &session.clock));
    println!("{}", tables::timeline_table(&session.result, &session.clock));

    for snapshot in &snapshots {
        println!("\nStatus at {}", session.clock.format(snapshot.minute));
        println!("{}", tables::snapshot_table(snapshot, &session.clock));
    }

    if let Termination::Stalled { remaining } = session.result.termination {
        warn!(remaining, "Some packages could not be dispatched");
    }
    if let Some(max) = max_miles {
        if !session.result.within_mileage(max) {
            warn!(
                total_miles = session.result.total_miles,
                max_miles = max,
                "Mileage ceiling exceeded"
            );
        }
    }

    Ok(())
}
