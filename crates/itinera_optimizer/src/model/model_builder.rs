use tracing::{debug, instrument};

use crate::{
    error::ModelConfigError,
    model::{
        decision_assignment::{AssignmentError, DecisionAssignment},
        mip_model::{ConstraintSense, LinearConstraint, MipModel, VariableIdx},
    },
    problem::{
        big_m::BigMStrategy,
        destination::DestinationIdx,
        run_params::{RunParams, TimeWindow},
        trip::{Trip, TripIdx, stay_duration},
        trip_catalog::TripCatalog,
    },
    utils::enumerate_idx::EnumerateIdx,
};

/// The MIP of one run together with the mapping from catalog entries to
/// model variables.
#[derive(Clone, Debug)]
pub struct ItineraryModel {
    model: MipModel,
    big_m: f64,
    destination_vars: Vec<VariableIdx>,
    outbound_vars: Vec<Vec<VariableIdx>>,
    return_vars: Vec<Vec<VariableIdx>>,
}

impl ItineraryModel {
    pub fn model(&self) -> &MipModel {
        &self.model
    }

    pub fn big_m(&self) -> f64 {
        self.big_m
    }

    pub fn destination_var(&self, destination: DestinationIdx) -> VariableIdx {
        self.destination_vars[destination.get()]
    }

    pub fn outbound_var(&self, destination: DestinationIdx, trip: TripIdx) -> VariableIdx {
        self.outbound_vars[destination.get()][trip.get()]
    }

    pub fn return_var(&self, destination: DestinationIdx, trip: TripIdx) -> VariableIdx {
        self.return_vars[destination.get()][trip.get()]
    }

    /// The three variables set to one by `assignment`.
    pub fn selected_vars(&self, assignment: &DecisionAssignment) -> [VariableIdx; 3] {
        [
            self.destination_var(assignment.destination()),
            self.outbound_var(assignment.destination(), assignment.outbound()),
            self.return_var(assignment.destination(), assignment.return_trip()),
        ]
    }

    /// Decodes solver values into an itinerary. A variable counts as selected
    /// when its value is strictly above `threshold`.
    pub fn extract_assignment(
        &self,
        values: &[f64],
        threshold: f64,
    ) -> Result<DecisionAssignment, AssignmentError> {
        if values.len() != self.model.num_variables() {
            return Err(AssignmentError::ValueCountMismatch {
                expected: self.model.num_variables(),
                actual: values.len(),
            });
        }

        let is_selected = |variable: &VariableIdx| values[variable.get()] > threshold;

        let selected_destinations = self
            .destination_vars
            .iter()
            .enumerate_idx::<DestinationIdx>()
            .filter(|(_, variable)| is_selected(*variable))
            .map(|(destination, _)| destination)
            .collect::<Vec<_>>();

        let destination = match selected_destinations.as_slice() {
            [] => return Err(AssignmentError::NoDestination),
            [destination] => *destination,
            many => return Err(AssignmentError::MultipleDestinations(many.len())),
        };

        for other in DestinationIdx::range(self.destination_vars.len()) {
            if other == destination {
                continue;
            }
            let stray = self.outbound_vars[other.get()]
                .iter()
                .chain(self.return_vars[other.get()].iter())
                .any(is_selected);
            if stray {
                return Err(AssignmentError::StrayTripSelection { destination: other });
            }
        }

        let outbound = selected_trips(&self.outbound_vars[destination.get()], is_selected);
        let [outbound] = outbound.as_slice() else {
            return Err(AssignmentError::OutboundCount {
                count: outbound.len(),
            });
        };

        let return_trip = selected_trips(&self.return_vars[destination.get()], is_selected);
        let [return_trip] = return_trip.as_slice() else {
            return Err(AssignmentError::ReturnCount {
                count: return_trip.len(),
            });
        };

        Ok(DecisionAssignment::new(destination, *outbound, *return_trip))
    }

    /// Adds a no-good cut so that `assignment` can never be returned again.
    pub fn exclude(&mut self, assignment: &DecisionAssignment) {
        let selected = self.selected_vars(assignment);
        self.model.add_no_good_cut(&selected);
    }
}

fn selected_trips(
    variables: &[VariableIdx],
    is_selected: impl Fn(&VariableIdx) -> bool,
) -> Vec<TripIdx> {
    variables
        .iter()
        .enumerate_idx::<TripIdx>()
        .filter(|(_, variable)| is_selected(*variable))
        .map(|(trip, _)| trip)
        .collect()
}

/// Builds the single-destination itinerary MIP.
///
/// Every Big-M constraint is written with the binaries on the left and all
/// constants folded into the right-hand side, e.g. the outbound window start
/// `dep >= start - M(1 - y)` becomes `M*y <= dep - start + M`.
#[instrument(skip_all, level = "debug")]
pub fn build_model(
    catalog: &TripCatalog,
    params: &RunParams,
    big_m_strategy: &BigMStrategy,
) -> Result<ItineraryModel, ModelConfigError> {
    let big_m = big_m_strategy.resolve(catalog, params)?;
    let mut model = MipModel::default();

    let mut destination_vars = Vec::with_capacity(catalog.len());
    let mut outbound_vars = Vec::with_capacity(catalog.len());
    let mut return_vars = Vec::with_capacity(catalog.len());

    for destination in catalog.destinations() {
        let id = destination.external_id();
        destination_vars.push(model.add_binary(format!("choose_{id}")));
        outbound_vars.push(
            destination
                .outbound_trips()
                .iter()
                .map(|trip| model.add_binary(format!("outbound_{id}_{}", trip.external_id())))
                .collect::<Vec<_>>(),
        );
        return_vars.push(
            destination
                .return_trips()
                .iter()
                .map(|trip| model.add_binary(format!("return_{id}_{}", trip.external_id())))
                .collect::<Vec<_>>(),
        );
    }

    model.set_objective(
        catalog
            .destinations()
            .iter()
            .zip(&destination_vars)
            .map(|(destination, &x)| (x, destination.weighted_utility(params.alpha())))
            .collect(),
    );

    model.add_constraint(LinearConstraint::new(
        "exactly_one_destination",
        destination_vars.iter().map(|&x| (x, 1.0)).collect(),
        ConstraintSense::Equal,
        1.0,
    ));

    for (index, destination) in catalog.destinations().iter().enumerate() {
        let id = destination.external_id();
        let x = destination_vars[index];

        for (name, trip_vars) in [
            (format!("link_outbound_{id}"), &outbound_vars[index]),
            (format!("link_return_{id}"), &return_vars[index]),
        ] {
            let mut terms = trip_vars.iter().map(|&var| (var, 1.0)).collect::<Vec<_>>();
            terms.push((x, -1.0));
            model.add_constraint(LinearConstraint::new(
                name,
                terms,
                ConstraintSense::Equal,
                0.0,
            ));
        }
    }

    let mut budget_terms = Vec::new();
    for (index, destination) in catalog.destinations().iter().enumerate() {
        budget_terms.extend(
            destination
                .outbound_trips()
                .iter()
                .zip(&outbound_vars[index])
                .chain(destination.return_trips().iter().zip(&return_vars[index]))
                .map(|(trip, &var)| (var, trip.cost())),
        );
    }
    model.add_constraint(LinearConstraint::new(
        "budget_limit",
        budget_terms,
        ConstraintSense::LessOrEqual,
        params.budget(),
    ));

    for (index, destination) in catalog.destinations().iter().enumerate() {
        let id = destination.external_id();

        for (trip, &y) in destination.outbound_trips().iter().zip(&outbound_vars[index]) {
            add_window_constraints(
                &mut model,
                &format!("out_window_{id}_{}", trip.external_id()),
                trip,
                y,
                params.outbound_window(),
                big_m,
            );
        }

        for (trip, &z) in destination.return_trips().iter().zip(&return_vars[index]) {
            add_window_constraints(
                &mut model,
                &format!("ret_window_{id}_{}", trip.external_id()),
                trip,
                z,
                params.return_window(),
                big_m,
            );
        }
    }

    for (index, destination) in catalog.destinations().iter().enumerate() {
        let id = destination.external_id();
        let min_stay = destination.stay_bounds().resolved_min();
        let max_stay = destination.stay_bounds().resolved_max(big_m);

        for (outbound, &y) in destination.outbound_trips().iter().zip(&outbound_vars[index]) {
            for (return_trip, &z) in destination.return_trips().iter().zip(&return_vars[index]) {
                let stay = stay_duration(outbound, return_trip);
                let suffix = format!("{id}_{}_{}", outbound.external_id(), return_trip.external_id());

                // stay >= min - M(2 - y - z)
                model.add_constraint(LinearConstraint::new(
                    format!("min_stay_{suffix}"),
                    vec![(y, big_m), (z, big_m)],
                    ConstraintSense::LessOrEqual,
                    stay - min_stay + 2.0 * big_m,
                ));

                // stay <= max + M(2 - y - z)
                model.add_constraint(LinearConstraint::new(
                    format!("max_stay_{suffix}"),
                    vec![(y, big_m), (z, big_m)],
                    ConstraintSense::LessOrEqual,
                    max_stay - stay + 2.0 * big_m,
                ));
            }
        }
    }

    debug!(
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        big_m,
        "Built itinerary model"
    );

    Ok(ItineraryModel {
        model,
        big_m,
        destination_vars,
        outbound_vars,
        return_vars,
    })
}

fn add_window_constraints(
    model: &mut MipModel,
    name: &str,
    trip: &Trip,
    var: VariableIdx,
    window: &TimeWindow,
    big_m: f64,
) {
    let departure = trip.departure_time();

    // dep >= start - M(1 - var)
    model.add_constraint(LinearConstraint::new(
        format!("{name}_start"),
        vec![(var, big_m)],
        ConstraintSense::LessOrEqual,
        departure - window.start() + big_m,
    ));

    // dep <= end + M(1 - var)
    model.add_constraint(LinearConstraint::new(
        format!("{name}_end"),
        vec![(var, big_m)],
        ConstraintSense::LessOrEqual,
        window.end() - departure + big_m,
    ));
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{self, assignment, values_for};

    use super::*;

    #[test]
    fn test_model_size() {
        let catalog = test_utils::single_destination_catalog(Some(48.0), Some(96.0));
        let model = build_model(&catalog, &RunParams::default(), &BigMStrategy::default()).unwrap();

        assert_eq!(model.model().num_variables(), 3);
        // C1, C2, C3, C4, two window constraints per trip, two stay constraints.
        assert_eq!(model.model().num_constraints(), 10);
        assert_eq!(model.big_m(), 5500.0);
        assert_eq!(model.model().variable(model.destination_var(DestinationIdx::new(0))).name(), "choose_Solo");
    }

    #[test]
    fn test_feasible_assignment_satisfies_every_constraint() {
        let catalog = test_utils::sample_catalog();
        let model = build_model(&catalog, &RunParams::default(), &BigMStrategy::default()).unwrap();

        // Xian, XA_G651 + XA_G658: stay 71.5h, cost 1030.
        let values = values_for(&model, &assignment(1, 0, 0));

        let violated = model
            .model()
            .violated_constraints(&values)
            .map(|constraint| constraint.name().to_owned())
            .collect::<Vec<_>>();
        assert!(violated.is_empty(), "violated: {violated:?}");
        assert_eq!(model.model().objective_value(&values), 4.0);
    }

    #[test]
    fn test_stay_violation_binds() {
        let catalog = test_utils::sample_catalog();
        let model = build_model(&catalog, &RunParams::default(), &BigMStrategy::default()).unwrap();

        // Shanghai, SH_G1 + SH_G8: 69.5h is below the 72h minimum.
        let values = values_for(&model, &assignment(0, 0, 0));

        let violated = model
            .model()
            .violated_constraints(&values)
            .map(|constraint| constraint.name().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(violated, vec!["min_stay_Shanghai_SH_G1_SH_G8".to_owned()]);
    }

    #[test]
    fn test_budget_and_window_violations_bind() {
        let catalog = test_utils::single_destination_catalog(Some(48.0), Some(96.0));
        let params = RunParams::new(
            1.0,
            1000.0,
            TimeWindow::new(9.0, 24.0),
            TimeWindow::new(72.0, 120.0),
        )
        .unwrap();
        let model = build_model(&catalog, &params, &BigMStrategy::default()).unwrap();

        let values = values_for(&model, &assignment(0, 0, 0));
        let mut violated = model
            .model()
            .violated_constraints(&values)
            .map(|constraint| constraint.name().to_owned())
            .collect::<Vec<_>>();
        violated.sort();

        assert_eq!(
            violated,
            vec![
                "budget_limit".to_owned(),
                "out_window_Solo_OUT_1_start".to_owned()
            ]
        );
    }

    #[test]
    fn test_extract_assignment() {
        let catalog = test_utils::sample_catalog();
        let model = build_model(&catalog, &RunParams::default(), &BigMStrategy::default()).unwrap();

        let expected = assignment(1, 1, 0);
        let mut values = values_for(&model, &expected);
        // Solver noise below the selection threshold is ignored.
        values[model.destination_var(DestinationIdx::new(2)).get()] = 1e-7;
        values[model.destination_var(DestinationIdx::new(1)).get()] = 0.9999;

        assert_eq!(model.extract_assignment(&values, 0.9), Ok(expected));
    }

    #[test]
    fn test_extract_assignment_errors() {
        let catalog = test_utils::sample_catalog();
        let model = build_model(&catalog, &RunParams::default(), &BigMStrategy::default()).unwrap();
        let num_variables = model.model().num_variables();

        assert_eq!(
            model.extract_assignment(&[1.0], 0.9),
            Err(AssignmentError::ValueCountMismatch {
                expected: num_variables,
                actual: 1
            })
        );

        assert_eq!(
            model.extract_assignment(&vec![0.0; num_variables], 0.9),
            Err(AssignmentError::NoDestination)
        );

        let mut values = values_for(&model, &assignment(0, 0, 0));
        values[model.destination_var(DestinationIdx::new(3)).get()] = 1.0;
        assert_eq!(
            model.extract_assignment(&values, 0.9),
            Err(AssignmentError::MultipleDestinations(2))
        );

        let mut values = values_for(&model, &assignment(0, 0, 0));
        values[model.outbound_var(DestinationIdx::new(0), TripIdx::new(1)).get()] = 1.0;
        assert_eq!(
            model.extract_assignment(&values, 0.9),
            Err(AssignmentError::OutboundCount { count: 2 })
        );

        let mut values = values_for(&model, &assignment(0, 0, 0));
        values[model.return_var(DestinationIdx::new(0), TripIdx::new(1)).get()] = 0.0;
        values[model.return_var(DestinationIdx::new(0), TripIdx::new(0)).get()] = 0.0;
        assert_eq!(
            model.extract_assignment(&values, 0.9),
            Err(AssignmentError::ReturnCount { count: 0 })
        );

        let mut values = values_for(&model, &assignment(0, 0, 0));
        values[model.return_var(DestinationIdx::new(2), TripIdx::new(1)).get()] = 1.0;
        assert_eq!(
            model.extract_assignment(&values, 0.9),
            Err(AssignmentError::StrayTripSelection {
                destination: DestinationIdx::new(2)
            })
        );
    }

    #[test]
    fn test_exclude_adds_cut() {
        let catalog = test_utils::sample_catalog();
        let mut model = build_model(&catalog, &RunParams::default(), &BigMStrategy::default()).unwrap();
        let constraints = model.model().num_constraints();

        let excluded = assignment(1, 0, 0);
        model.exclude(&excluded);

        assert_eq!(model.model().num_constraints(), constraints + 1);
        assert_eq!(model.model().num_cuts(), 1);

        let values = values_for(&model, &excluded);
        let violated = model
            .model()
            .violated_constraints(&values)
            .map(|constraint| constraint.name().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(violated, vec!["exclude_solution_0".to_owned()]);
    }
}
