use crate::problem::{
    deadline::Deadline,
    distance_index::{Distance, DistanceIndex, DistanceIndexBuilder},
    fleet::Fleet,
    location::{DEPOT, Location, LocationIdx},
    package::{Package, PackageBuilder, PackageId},
    package_store::PackageStore,
    vehicle::{Vehicle, VehicleBuilder},
};

/// Builds an index from a full distance matrix. Location names double as
/// their street form, the first name is the depot.
pub fn create_index(names: &[&str], matrix: &[&[Distance]]) -> DistanceIndex {
    let mut builder = DistanceIndexBuilder::default();
    builder.set_locations(
        names
            .iter()
            .map(|&name| Location::new(name, name))
            .collect(),
    );

    for (row, values) in matrix.iter().enumerate() {
        let values = values.iter().copied().map(Some).collect::<Vec<_>>();
        builder.set_row(row, &values);
    }

    builder.build().unwrap()
}

/// Depot plus three stops: depot-A=2, depot-B=5, depot-C=3, A-B=4, A-C=6, B-C=1.
pub fn create_triangle_index() -> DistanceIndex {
    create_index(
        &["Depot", "A", "B", "C"],
        &[
            &[0.0],
            &[2.0, 0.0],
            &[5.0, 4.0, 0.0],
            &[3.0, 6.0, 1.0, 0.0],
        ],
    )
}

/// Locations `L1..=Ln` on a line, one mile apart, with the depot at 0.
pub fn create_line_index(stops: usize) -> DistanceIndex {
    let names = std::iter::once(String::from("Depot"))
        .chain((1..=stops).map(|i| format!("L{i}")))
        .collect::<Vec<_>>();

    let mut builder = DistanceIndexBuilder::default();
    builder.set_locations(
        names
            .iter()
            .map(|name| Location::new(name.as_str(), name.as_str()))
            .collect(),
    );
    for row in 0..names.len() {
        let values = (0..=row)
            .map(|column| Some((row - column) as Distance))
            .collect::<Vec<_>>();
        builder.set_row(row, &values);
    }

    builder.build().unwrap()
}

pub fn create_package(id: u32, address: &str) -> Package {
    let mut builder = PackageBuilder::new(id);
    builder
        .set_address(address)
        .set_city("Salt Lake City")
        .set_zip_code("84115")
        .set_deadline(Deadline::EndOfDay)
        .set_weight(1.0);
    builder.build()
}

/// One package per address, numbered from 1.
pub fn create_packages(addresses: &[&str]) -> PackageStore {
    addresses
        .iter()
        .enumerate()
        .map(|(index, address)| create_package(index as u32 + 1, address))
        .collect()
}

pub fn create_vehicle(id: u32) -> Vehicle {
    let mut builder = VehicleBuilder::default();
    builder.set_vehicle_id(id);
    builder.build()
}

/// Trucks 1 and 2 on duty, truck 3 in reserve.
pub fn create_fleet() -> Fleet {
    Fleet::new(
        vec![create_vehicle(1), create_vehicle(2)],
        Some(create_vehicle(3)),
    )
    .unwrap()
}

/// Distance of an open route starting at the depot.
pub fn route_distance(index: &DistanceIndex, packages: &PackageStore, route: &[PackageId]) -> Distance {
    let mut current = DEPOT;
    let mut total = 0.0;
    for id in route {
        let next: LocationIdx = index.locate(packages.get(*id).unwrap().address()).unwrap();
        total += index.travel_distance(current, next);
        current = next;
    }
    total
}
