use fxhash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    error::RoutingError,
    problem::{
        address::{canonical_form, leading_tokens_match},
        location::{DEPOT, Location, LocationIdx},
    },
};

pub type Distance = f64;

pub const HUB_ALIAS: &str = "HUB";

#[derive(Debug, Error)]
pub enum DistanceTableError {
    #[error("Distance table header row not found")]
    HeaderNotFound,

    #[error("No locations parsed from the distance table header")]
    NoLocations,

    #[error("Distance between {from:?} and {to:?} is missing from the table")]
    MissingDistance { from: String, to: String },

    #[error("Negative distance {distance} between {from:?} and {to:?}")]
    NegativeDistance {
        from: String,
        to: String,
        distance: Distance,
    },

    #[error("Alias {alias:?} refers to unknown address {target:?}")]
    UnknownAliasTarget { alias: String, target: String },
}

#[derive(Debug, Clone)]
struct RawKey {
    text: String,
    lowercase: String,
    canonical: String,
    location_id: LocationIdx,
}

/// Symmetric distance table between the delivery locations, plus the lookup
/// tables needed to resolve free-text addresses to table columns.
///
/// Distances are stored in a flat vector, the entry for a pair of locations
/// lives at `from * num_locations + to`.
#[derive(Debug, Clone)]
pub struct DistanceIndex {
    locations: Vec<Location>,
    distances: Vec<Distance>,
    num_locations: usize,
    canonical_keys: FxHashMap<String, LocationIdx>,
    raw_keys: Vec<RawKey>,
}

impl DistanceIndex {
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, location_id: LocationIdx) -> &Location {
        &self.locations[location_id]
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    pub fn depot(&self) -> &Location {
        &self.locations[DEPOT]
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    #[inline(always)]
    pub fn travel_distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        self.distances[self.index(from, to)]
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.num_locations).all(|i| {
            (0..self.num_locations).all(|j| {
                self.distances[i * self.num_locations + j]
                    == self.distances[j * self.num_locations + i]
            })
        })
    }

    /// Resolves address text to a table column.
    ///
    /// Tries, in order: the canonical form, the raw text ignoring case, and
    /// finally a loose match on the first two canonical tokens.
    pub fn resolve(&self, address: &str) -> Option<LocationIdx> {
        if address.trim().is_empty() {
            return None;
        }

        let canonical = canonical_form(address);
        if let Some(&location_id) = self.canonical_keys.get(&canonical) {
            return Some(location_id);
        }

        let lowercase = address.trim().to_lowercase();
        if let Some(key) = self.raw_keys.iter().find(|key| key.lowercase == lowercase) {
            return Some(key.location_id);
        }

        let key = self
            .raw_keys
            .iter()
            .find(|key| leading_tokens_match(&canonical, &key.canonical))?;

        debug!(address, matched = key.text, "Fuzzy address match");
        Some(key.location_id)
    }

    pub fn locate(&self, address: &str) -> Result<LocationIdx, RoutingError> {
        self.resolve(address)
            .ok_or_else(|| RoutingError::AddressNotFound {
                address: address.to_owned(),
            })
    }

    /// Miles between two addresses. Fails if either one cannot be resolved.
    pub fn distance(&self, from: &str, to: &str) -> Result<Distance, RoutingError> {
        let from = self.locate(from)?;
        let to = self.locate(to)?;

        Ok(self.travel_distance(from, to))
    }
}

/// Collects the parsed table before freezing it into a [`DistanceIndex`].
#[derive(Default)]
pub struct DistanceIndexBuilder {
    locations: Vec<Location>,
    entries: Vec<(usize, usize, Distance)>,
    aliases: Vec<(String, String)>,
}

impl DistanceIndexBuilder {
    pub fn set_locations(&mut self, locations: Vec<Location>) -> &mut DistanceIndexBuilder {
        self.locations = locations;
        self
    }

    /// Records the lower-triangular part of matrix row `row`, where `None`
    /// marks an empty cell. Values past the diagonal are ignored.
    pub fn set_row(&mut self, row: usize, values: &[Option<Distance>]) -> &mut DistanceIndexBuilder {
        for (column, value) in values.iter().enumerate().take(row + 1) {
            if let Some(distance) = value {
                self.entries.push((row, column, *distance));
            }
        }
        self
    }

    /// Records a single directed entry; the reverse direction is filled in on build.
    pub fn set_distance(&mut self, from: usize, to: usize, distance: Distance) -> &mut DistanceIndexBuilder {
        self.entries.push((from, to, distance));
        self
    }

    /// Makes `alias` resolve to whatever location `target` resolves to.
    pub fn add_alias(&mut self, alias: impl Into<String>, target: impl Into<String>) -> &mut DistanceIndexBuilder {
        self.aliases.push((alias.into(), target.into()));
        self
    }

    pub fn build(self) -> Result<DistanceIndex, DistanceTableError> {
        let num_locations = self.locations.len();
        if num_locations == 0 {
            return Err(DistanceTableError::NoLocations);
        }

        let name = |i: usize| self.locations[i].name().to_owned();

        let mut cells: Vec<Option<Distance>> = vec![None; num_locations * num_locations];
        for &(from, to, distance) in &self.entries {
            if from >= num_locations || to >= num_locations {
                continue;
            }
            if distance < 0.0 {
                return Err(DistanceTableError::NegativeDistance {
                    from: name(from),
                    to: name(to),
                    distance,
                });
            }
            cells[from * num_locations + to] = Some(distance);
        }

        let mut distances = vec![0.0; num_locations * num_locations];
        for i in 0..num_locations {
            for j in 0..i {
                // Lower triangle wins when both directions were given.
                let distance = cells[i * num_locations + j]
                    .or(cells[j * num_locations + i])
                    .ok_or_else(|| DistanceTableError::MissingDistance {
                        from: name(i),
                        to: name(j),
                    })?;

                distances[i * num_locations + j] = distance;
                distances[j * num_locations + i] = distance;
            }
        }

        let mut index = DistanceIndex {
            locations: self.locations,
            distances,
            num_locations,
            canonical_keys: FxHashMap::default(),
            raw_keys: vec![],
        };

        for i in 0..num_locations {
            let location = LocationIdx::new(i);
            let (location_name, street) = {
                let entry = &index.locations[location];
                (entry.name().to_owned(), entry.street().to_owned())
            };
            index.register(&location_name, location);
            index.register(&street, location);
        }
        index.register(HUB_ALIAS, DEPOT);

        for (alias, target) in self.aliases {
            let location = index
                .canonical_keys
                .get(&canonical_form(&target))
                .copied()
                .ok_or_else(|| DistanceTableError::UnknownAliasTarget {
                    alias: alias.clone(),
                    target: target.clone(),
                })?;
            index.register(&alias, location);
        }

        debug!(
            locations = num_locations,
            keys = index.raw_keys.len(),
            "Built distance index"
        );

        Ok(index)
    }
}

impl DistanceIndex {
    fn register(&mut self, text: &str, location_id: LocationIdx) {
        if text.is_empty() {
            return;
        }

        let canonical = canonical_form(text);
        self.canonical_keys.insert(canonical.clone(), location_id);

        match self.raw_keys.iter_mut().find(|key| key.text == text) {
            Some(key) => key.location_id = location_id,
            None => self.raw_keys.push(RawKey {
                text: text.to_owned(),
                lowercase: text.trim().to_lowercase(),
                canonical,
                location_id,
            }),
        }
    }
}
