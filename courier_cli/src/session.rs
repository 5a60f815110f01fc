use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use courier_optimizer::{
    json::plan_config::JsonPlanConfig,
    parsers::{
        distance_table::DistanceTableParser, package_table::PackageTableParser,
        parser::TableParser,
    },
    problem::{package_store::PackageStore, service_clock::ServiceClock},
    solver::{
        dispatch::{DispatchError, DispatchScheduler},
        run_result::RunResult,
        trip::Trip,
    },
};
use tracing::info;

use crate::plan;

#[derive(Args)]
pub struct InputArgs {
    /// Distance table CSV
    #[arg(
        long,
        global = true,
        env = "COURIER_DISTANCE_TABLE",
        default_value = "data/fixtures/distance_table.csv"
    )]
    distances: PathBuf,

    /// Package table CSV
    #[arg(
        long,
        global = true,
        env = "COURIER_PACKAGES",
        default_value = "data/fixtures/package_file.csv"
    )]
    packages: PathBuf,

    /// Plan configuration JSON, defaults apply when omitted
    #[arg(long, global = true, env = "COURIER_CONFIG")]
    config: Option<PathBuf>,
}

/// A completed run and everything needed to report on it.
pub struct Session {
    pub config: JsonPlanConfig,
    pub clock: ServiceClock,
    pub result: RunResult,
    pub packages: PackageStore,
    pub trips: Vec<Trip>,
}

impl Session {
    pub fn load(inputs: &InputArgs) -> Result<Session, anyhow::Error> {
        let config = match &inputs.config {
            Some(path) => JsonPlanConfig::from_file(path)?,
            None => JsonPlanConfig::default(),
        };
        let clock = config.service_clock()?;

        let mut builder = DistanceTableParser::new(config.depot_name.as_str())
            .parse(&inputs.distances)
            .with_context(|| format!("Loading distance table {:?}", inputs.distances))?;
        config.apply_aliases(&mut builder);
        let index = builder.build()?;
        info!(locations = index.num_locations(), "Loaded distance table");

        let mut packages = PackageTableParser
            .parse(&inputs.packages)
            .with_context(|| format!("Loading packages {:?}", inputs.packages))?;
        info!(packages = packages.len(), "Loaded packages");

        let fleet = config.build_fleet()?;
        config
            .build_constraints(&clock)?
            .apply(&mut packages, &fleet)?;

        let mut scheduler =
            DispatchScheduler::new(&index, clock, packages, fleet, config.dispatch_params());
        let result = scheduler.run().inspect_err(|err| {
            if let DispatchError::IterationLimitReached { partial, .. } = err {
                println!("{}", plan::partial_report(partial, &clock));
            }
        })?;
        let trips = scheduler.trips().to_vec();

        Ok(Session {
            config,
            clock,
            result,
            packages: scheduler.into_packages(),
            trips,
        })
    }
}

#[cfg(test)]
pub(crate) fn fixture_inputs(config: &str) -> InputArgs {
    let data = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data/fixtures");
    InputArgs {
        distances: data.join("distance_table.csv"),
        packages: data.join("package_file.csv"),
        config: Some(data.join(config)),
    }
}

#[cfg(test)]
pub(crate) fn load_fixture() -> Session {
    Session::load(&fixture_inputs("plan.json")).unwrap()
}
