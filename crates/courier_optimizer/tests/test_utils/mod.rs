use std::path::PathBuf;

use courier_optimizer::{
    json::plan_config::JsonPlanConfig,
    parsers::{
        distance_table::DistanceTableParser, package_table::PackageTableParser,
        parser::TableParser,
    },
    problem::{
        distance_index::DistanceIndex, fleet::Fleet, package_store::PackageStore,
        service_clock::ServiceClock,
    },
};

pub fn data_fixture_path(fixture: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../data/fixtures/")
        .join(fixture)
}

pub struct Fixture {
    pub config: JsonPlanConfig,
    pub clock: ServiceClock,
    pub index: DistanceIndex,
    pub packages: PackageStore,
    pub fleet: Fleet,
}

/// Loads the sample tables and configuration, with constraints applied.
pub fn load_fixture() -> Fixture {
    let config = JsonPlanConfig::from_file(data_fixture_path("plan.json")).unwrap();
    let clock = config.service_clock().unwrap();

    let mut builder = DistanceTableParser::new(config.depot_name.as_str())
        .parse(data_fixture_path("distance_table.csv"))
        .unwrap();
    config.apply_aliases(&mut builder);
    let index = builder.build().unwrap();

    let mut packages = PackageTableParser
        .parse(data_fixture_path("package_file.csv"))
        .unwrap();
    let fleet = config.build_fleet().unwrap();
    config
        .build_constraints(&clock)
        .unwrap()
        .apply(&mut packages, &fleet)
        .unwrap();

    Fixture {
        config,
        clock,
        index,
        packages,
        fleet,
    }
}
