use std::{io::Read, str::FromStr};

use fxhash::FxHashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{Map, serde_as};
use tracing::{debug, instrument};

use crate::{
    error::DatasetError,
    problem::{
        destination::DestinationBuilder,
        trip::{Direction, Trip},
        trip_catalog::{CatalogWarning, TripCatalog, TripCatalogBuilder},
    },
};

/// The dataset file written by the travel data editor.
///
/// Maps are kept as ordered `(key, value)` lists so that trip order follows
/// the file and duplicated keys can be reported instead of silently merged.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "TravelDataset")]
pub struct TravelDataset {
    pub destinations: Vec<String>,

    #[serde_as(as = "Map<_, _>")]
    pub params: Vec<(String, JsonDestinationParams)>,

    #[serde_as(as = "Map<_, Map<_, _>>")]
    pub outbound_trips: Vec<(String, Vec<(String, JsonTrip)>)>,

    #[serde_as(as = "Map<_, Map<_, _>>")]
    pub return_trips: Vec<(String, Vec<(String, JsonTrip)>)>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "DestinationParams")]
pub struct JsonDestinationParams {
    #[serde(rename = "U")]
    pub utility: f64,

    #[serde(rename = "D")]
    pub difficulty: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stay_hours: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stay_hours: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Trip")]
pub struct JsonTrip {
    pub dep_time: f64,
    pub arr_time: f64,
    pub cost: f64,
}

type TripTable = Vec<(String, Vec<(String, JsonTrip)>)>;

impl TravelDataset {
    pub fn from_reader(reader: impl Read) -> Result<Self, DatasetError> {
        let mut de = serde_json::Deserializer::from_reader(reader);
        let dataset = serde_path_to_error::deserialize(&mut de).map_err(|err| {
            let path = err.path().to_string();
            let inner = err.into_inner();
            if inner.is_io() {
                DatasetError::Io(inner.into())
            } else {
                DatasetError::Malformed {
                    path,
                    message: inner.to_string(),
                }
            }
        })?;

        de.end().map_err(|err| DatasetError::Malformed {
            path: ".".to_owned(),
            message: err.to_string(),
        })?;

        Ok(dataset)
    }

    #[instrument(skip_all, level = "debug")]
    pub fn build_catalog(self) -> Result<TripCatalog, DatasetError> {
        check_unique_destinations(&self.destinations)?;
        check_unique_keys("params", &self.params)?;
        check_unique_keys("outbound_trips", &self.outbound_trips)?;
        check_unique_keys("return_trips", &self.return_trips)?;

        let mut builder = TripCatalogBuilder::default();

        let listed = self
            .destinations
            .iter()
            .map(String::as_str)
            .collect::<FxHashSet<_>>();

        for (section, keys) in [
            ("params", self.params.iter().map(|(key, _)| key).collect::<Vec<_>>()),
            (
                "outbound_trips",
                self.outbound_trips.iter().map(|(key, _)| key).collect(),
            ),
            (
                "return_trips",
                self.return_trips.iter().map(|(key, _)| key).collect(),
            ),
        ] {
            for key in keys {
                if !listed.contains(key.as_str()) {
                    builder.add_warning(CatalogWarning::UnknownDestination {
                        section,
                        destination: key.clone(),
                    });
                }
            }
        }

        let mut outbound_trips = self.outbound_trips;
        let mut return_trips = self.return_trips;

        for id in &self.destinations {
            let params = self
                .params
                .iter()
                .find(|(key, _)| key == id)
                .map(|(_, params)| params)
                .ok_or_else(|| DatasetError::MissingParams(id.clone()))?;

            let mut destination = DestinationBuilder::default();
            destination
                .set_external_id(id.clone())
                .set_utility(params.utility)
                .set_difficulty(params.difficulty);

            if let Some(hours) = params.min_stay_hours {
                destination.set_min_stay_hours(hours);
            }

            if let Some(hours) = params.max_stay_hours {
                destination.set_max_stay_hours(hours);
            }

            for (direction, table) in [
                (Direction::Outbound, &mut outbound_trips),
                (Direction::Return, &mut return_trips),
            ] {
                for (trip_id, trip) in take_trips(table, id, direction)? {
                    destination.add_trip(
                        direction,
                        Trip::new(trip_id, trip.dep_time, trip.arr_time, trip.cost),
                    );
                }
            }

            builder.add_destination(destination.build());
        }

        let catalog = builder.build()?;

        debug!(
            destinations = catalog.len(),
            assignments = catalog.assignment_count(),
            warnings = catalog.warnings().len(),
            "Built trip catalog"
        );

        Ok(catalog)
    }
}

impl FromStr for TravelDataset {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TravelDataset::from_reader(s.as_bytes())
    }
}

fn check_unique_destinations(destinations: &[String]) -> Result<(), DatasetError> {
    let mut seen = FxHashSet::default();
    for id in destinations {
        if !seen.insert(id.as_str()) {
            return Err(DatasetError::DuplicateDestination(id.clone()));
        }
    }
    Ok(())
}

fn check_unique_keys<T>(section: &'static str, entries: &[(String, T)]) -> Result<(), DatasetError> {
    let mut seen = FxHashSet::default();
    for (key, _) in entries {
        if !seen.insert(key.as_str()) {
            return Err(DatasetError::DuplicateKey {
                section,
                key: key.clone(),
            });
        }
    }
    Ok(())
}

/// Removes the trips of `destination` from the table. Destination ids are
/// unique at this point, so each entry is taken at most once.
fn take_trips(
    table: &mut TripTable,
    destination: &str,
    direction: Direction,
) -> Result<Vec<(String, JsonTrip)>, DatasetError> {
    match table.iter().position(|(key, _)| key == destination) {
        Some(position) => Ok(table.swap_remove(position).1),
        None => Err(DatasetError::MissingTrips {
            destination: destination.to_owned(),
            direction,
        }),
    }
}
