use std::fmt;

use fxhash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::warn;

use crate::{
    error::DatasetError,
    problem::{
        destination::{Destination, DestinationIdx},
        trip::{Direction, Trip},
    },
    utils::enumerate_idx::EnumerateIdx,
};

/// Non-fatal findings about the input. The run continues with a documented
/// default or an unselectable destination.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogWarning {
    MissingMinStay {
        destination: String,
    },
    MissingMaxStay {
        destination: String,
    },
    NoTrips {
        destination: String,
        direction: Direction,
    },
    DepartureNotBeforeArrival {
        destination: String,
        direction: Direction,
        trip: String,
        departure_time: f64,
        arrival_time: f64,
    },
    UnknownDestination {
        section: &'static str,
        destination: String,
    },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogWarning::MissingMinStay { destination } => write!(
                f,
                "destination `{destination}` has no min_stay_hours, using 0"
            ),
            CatalogWarning::MissingMaxStay { destination } => write!(
                f,
                "destination `{destination}` has no max_stay_hours, using big-M"
            ),
            CatalogWarning::NoTrips {
                destination,
                direction,
            } => write!(
                f,
                "destination `{destination}` has no {direction} trips and can never be selected"
            ),
            CatalogWarning::DepartureNotBeforeArrival {
                destination,
                direction,
                trip,
                departure_time,
                arrival_time,
            } => write!(
                f,
                "{direction} trip `{trip}` of `{destination}` departs at {departure_time}h but arrives at {arrival_time}h"
            ),
            CatalogWarning::UnknownDestination {
                section,
                destination,
            } => write!(
                f,
                "`{section}` references unknown destination `{destination}`, ignoring it"
            ),
        }
    }
}

/// The immutable input of one enumeration run.
pub struct TripCatalog {
    destinations: Vec<Destination>,
    destination_index: FxHashMap<String, DestinationIdx>,
    warnings: Vec<CatalogWarning>,
}

impl TripCatalog {
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn destination(&self, index: DestinationIdx) -> &Destination {
        &self.destinations[index]
    }

    pub fn destination_idx(&self, external_id: &str) -> Option<DestinationIdx> {
        self.destination_index.get(external_id).copied()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }

    pub fn trips_iter(&self) -> impl Iterator<Item = &Trip> {
        self.destinations.iter().flat_map(|destination| {
            destination
                .outbound_trips()
                .iter()
                .chain(destination.return_trips().iter())
        })
    }

    pub fn max_trips(&self, direction: Direction) -> usize {
        self.destinations
            .iter()
            .map(|destination| destination.trips(direction).len())
            .max()
            .unwrap_or(0)
    }

    /// Number of distinct (destination, outbound, return) triples.
    pub fn assignment_count(&self) -> usize {
        self.destinations
            .iter()
            .map(Destination::trip_pairs)
            .sum()
    }

    /// Upper bound on the solves one enumeration can take:
    /// `destinations * max_outbound * max_return + 1`.
    pub fn max_iterations(&self) -> usize {
        self.destinations.len()
            * self.max_trips(Direction::Outbound)
            * self.max_trips(Direction::Return)
            + 1
    }
}

#[derive(Default)]
pub struct TripCatalogBuilder {
    destinations: Vec<Destination>,
    warnings: Vec<CatalogWarning>,
}

impl TripCatalogBuilder {
    pub fn add_destination(&mut self, destination: Destination) -> &mut TripCatalogBuilder {
        self.destinations.push(destination);
        self
    }

    pub fn add_warning(&mut self, warning: CatalogWarning) -> &mut TripCatalogBuilder {
        self.warnings.push(warning);
        self
    }

    pub fn build(self) -> Result<TripCatalog, DatasetError> {
        if self.destinations.is_empty() {
            return Err(DatasetError::NoDestinations);
        }

        let mut warnings = self.warnings;
        let mut destination_index: FxHashMap<String, DestinationIdx> = FxHashMap::default();

        for (index, destination) in self.destinations.iter().enumerate_idx() {
            let id = destination.external_id();
            if destination_index.insert(id.to_owned(), index).is_some() {
                return Err(DatasetError::DuplicateDestination(id.to_owned()));
            }

            check_destination(destination, &mut warnings)?;
        }

        for warning in &warnings {
            warn!("{}", warning);
        }

        Ok(TripCatalog {
            destinations: self.destinations,
            destination_index,
            warnings,
        })
    }
}

fn check_finite(value: f64, owner: &str, field: &'static str) -> Result<(), DatasetError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DatasetError::NonFinite {
            owner: owner.to_owned(),
            field,
        })
    }
}

fn check_destination(
    destination: &Destination,
    warnings: &mut Vec<CatalogWarning>,
) -> Result<(), DatasetError> {
    let id = destination.external_id();
    check_finite(destination.utility(), id, "U")?;
    check_finite(destination.difficulty(), id, "D")?;

    let bounds = destination.stay_bounds();
    for (hours, field) in [
        (bounds.min_hours(), "min_stay_hours"),
        (bounds.max_hours(), "max_stay_hours"),
    ] {
        if let Some(hours) = hours {
            check_finite(hours, id, field)?;
            if hours < 0.0 {
                return Err(DatasetError::NegativeStay {
                    destination: id.to_owned(),
                    hours,
                });
            }
        }
    }

    if let (Some(min), Some(max)) = (bounds.min_hours(), bounds.max_hours()) {
        if min > max {
            return Err(DatasetError::InvertedStayBounds {
                destination: id.to_owned(),
                min,
                max,
            });
        }
    }

    if bounds.min_hours().is_none() {
        warnings.push(CatalogWarning::MissingMinStay {
            destination: id.to_owned(),
        });
    }
    if bounds.max_hours().is_none() {
        warnings.push(CatalogWarning::MissingMaxStay {
            destination: id.to_owned(),
        });
    }

    for direction in [Direction::Outbound, Direction::Return] {
        let trips = destination.trips(direction);
        if trips.is_empty() {
            warnings.push(CatalogWarning::NoTrips {
                destination: id.to_owned(),
                direction,
            });
        }

        let mut seen = FxHashSet::default();
        for trip in trips {
            let trip_id = trip.external_id();
            if !seen.insert(trip_id) {
                return Err(DatasetError::DuplicateTrip {
                    destination: id.to_owned(),
                    direction,
                    trip: trip_id.to_owned(),
                });
            }

            check_finite(trip.departure_time(), trip_id, "dep_time")?;
            check_finite(trip.arrival_time(), trip_id, "arr_time")?;
            check_finite(trip.cost(), trip_id, "cost")?;

            if trip.cost() < 0.0 {
                return Err(DatasetError::NegativeCost {
                    destination: id.to_owned(),
                    direction,
                    trip: trip_id.to_owned(),
                    cost: trip.cost(),
                });
            }

            if !trip.departs_before_arrival() {
                warnings.push(CatalogWarning::DepartureNotBeforeArrival {
                    destination: id.to_owned(),
                    direction,
                    trip: trip_id.to_owned(),
                    departure_time: trip.departure_time(),
                    arrival_time: trip.arrival_time(),
                });
            }
        }
    }

    Ok(())
}
