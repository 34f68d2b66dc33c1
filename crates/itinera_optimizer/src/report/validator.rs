use tracing::warn;

use crate::{
    model::decision_assignment::DecisionAssignment,
    problem::{run_params::RunParams, trip::stay_duration, trip_catalog::TripCatalog},
    report::solution_record::{SolutionRecord, TripChoice, ValidationWarning},
};

const OBJECTIVE_TOLERANCE: f64 = 1e-5;

/// Recomputes cost and stay of an accepted assignment from the catalog,
/// independently of the model, and flags anything the model should have
/// excluded.
pub fn validate_assignment(
    catalog: &TripCatalog,
    params: &RunParams,
    big_m: f64,
    assignment: &DecisionAssignment,
    objective: f64,
) -> SolutionRecord {
    let destination = catalog.destination(assignment.destination());
    let outbound = destination.outbound_trip(assignment.outbound());
    let return_trip = destination.return_trip(assignment.return_trip());

    let total_cost = outbound.cost() + return_trip.cost();
    let stay_hours = stay_duration(outbound, return_trip);
    let bounds = destination.stay_bounds();

    let cost_ok = total_cost <= params.budget();
    let stay_ok = bounds.contains(stay_hours, big_m);

    let mut warnings = Vec::new();

    if !cost_ok {
        warnings.push(ValidationWarning::BudgetExceeded {
            total_cost,
            budget: params.budget(),
        });
    }

    if !stay_ok {
        warnings.push(ValidationWarning::StayOutOfBounds {
            stay_hours,
            min_hours: bounds.resolved_min(),
            max_hours: bounds.resolved_max(big_m),
        });
    }

    let expected = destination.weighted_utility(params.alpha());
    if (objective - expected).abs() > OBJECTIVE_TOLERANCE {
        warnings.push(ValidationWarning::ObjectiveMismatch {
            objective,
            expected,
        });
    }

    for warning in &warnings {
        warn!(
            destination = destination.external_id(),
            outbound = outbound.external_id(),
            return_trip = return_trip.external_id(),
            "{}",
            warning
        );
    }

    SolutionRecord {
        destination: destination.external_id().to_owned(),
        outbound: TripChoice::from(outbound),
        return_trip: TripChoice::from(return_trip),
        total_cost,
        stay_hours,
        objective,
        cost_ok,
        stay_ok,
        warnings,
        assignment: *assignment,
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{destination::DestinationIdx, trip::TripIdx},
        test_utils,
    };

    use super::*;

    fn first_pair() -> DecisionAssignment {
        DecisionAssignment::new(DestinationIdx::new(0), TripIdx::new(0), TripIdx::new(0))
    }

    #[test]
    fn test_compliant_record() {
        let catalog = test_utils::single_destination_catalog(Some(48.0), Some(96.0));
        let record = validate_assignment(
            &catalog,
            &RunParams::default(),
            5500.0,
            &first_pair(),
            4.0,
        );

        assert_eq!(record.destination, "Solo");
        assert_eq!(record.outbound.id, "OUT_1");
        assert_eq!(record.return_trip.id, "RET_1");
        assert_eq!(record.total_cost, 1100.0);
        assert_eq!(record.stay_hours, 69.5);
        assert!(record.cost_ok);
        assert!(record.stay_ok);
        assert!(record.warnings.is_empty());
        assert!(record.is_compliant());
    }

    #[test]
    fn test_violations_are_flagged_not_dropped() {
        let catalog = test_utils::single_destination_catalog(Some(72.0), Some(96.0));
        let params = RunParams::new(
            1.0,
            1000.0,
            *RunParams::default().outbound_window(),
            *RunParams::default().return_window(),
        )
        .unwrap();

        let record = validate_assignment(&catalog, &params, 5500.0, &first_pair(), 3.5);

        assert!(!record.cost_ok);
        assert!(!record.stay_ok);
        assert_eq!(
            record.warnings,
            vec![
                ValidationWarning::BudgetExceeded {
                    total_cost: 1100.0,
                    budget: 1000.0
                },
                ValidationWarning::StayOutOfBounds {
                    stay_hours: 69.5,
                    min_hours: 72.0,
                    max_hours: 96.0
                },
                ValidationWarning::ObjectiveMismatch {
                    objective: 3.5,
                    expected: 4.0
                },
            ]
        );
    }

    #[test]
    fn test_missing_max_stay_resolves_to_big_m() {
        let catalog = test_utils::single_destination_catalog(None, None);
        let record = validate_assignment(
            &catalog,
            &RunParams::default(),
            50.0,
            &first_pair(),
            4.0,
        );

        // With an unusually small M the default max stay itself becomes binding.
        assert!(!record.stay_ok);
        assert_eq!(
            record.warnings,
            vec![ValidationWarning::StayOutOfBounds {
                stay_hours: 69.5,
                min_hours: 0.0,
                max_hours: 50.0
            }]
        );
    }
}
