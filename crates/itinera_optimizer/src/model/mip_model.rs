use std::fmt;

use serde::Serialize;

use crate::define_index_newtype;

define_index_newtype!(VariableIdx, MipVariable);

/// Feasibility slack used when checking a constraint against an assignment.
const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// All variables of the model are binary.
#[derive(Clone, Debug, Serialize)]
pub struct MipVariable {
    name: String,
}

impl MipVariable {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ConstraintSense {
    LessOrEqual,
    GreaterOrEqual,
    Equal,
}

impl fmt::Display for ConstraintSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintSense::LessOrEqual => write!(f, "<="),
            ConstraintSense::GreaterOrEqual => write!(f, ">="),
            ConstraintSense::Equal => write!(f, "="),
        }
    }
}

/// `Σ coefficient * variable  <sense>  rhs`, constants already folded into
/// the right-hand side.
#[derive(Clone, Debug, Serialize)]
pub struct LinearConstraint {
    name: String,
    terms: Vec<(VariableIdx, f64)>,
    sense: ConstraintSense,
    rhs: f64,
}

impl LinearConstraint {
    pub fn new(
        name: impl Into<String>,
        terms: Vec<(VariableIdx, f64)>,
        sense: ConstraintSense,
        rhs: f64,
    ) -> Self {
        LinearConstraint {
            name: name.into(),
            terms,
            sense,
            rhs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn terms(&self) -> &[(VariableIdx, f64)] {
        &self.terms
    }

    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(variable, coefficient)| coefficient * values[variable.get()])
            .sum()
    }

    pub fn is_satisfied_by(&self, values: &[f64]) -> bool {
        let lhs = self.lhs(values);
        match self.sense {
            ConstraintSense::LessOrEqual => lhs <= self.rhs + FEASIBILITY_TOLERANCE,
            ConstraintSense::GreaterOrEqual => lhs >= self.rhs - FEASIBILITY_TOLERANCE,
            ConstraintSense::Equal => (lhs - self.rhs).abs() <= FEASIBILITY_TOLERANCE,
        }
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        for (position, (variable, coefficient)) in self.terms.iter().enumerate() {
            if position > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{coefficient} v{variable}")?;
        }
        write!(f, " {} {}", self.sense, self.rhs)
    }
}

/// A maximization problem over binary variables.
///
/// Solver independent: adapters translate it into their own representation
/// on every solve, which lets the enumeration append cuts in place between
/// solves.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MipModel {
    variables: Vec<MipVariable>,
    objective: Vec<(VariableIdx, f64)>,
    constraints: Vec<LinearConstraint>,
    num_cuts: usize,
}

impl MipModel {
    pub fn add_binary(&mut self, name: impl Into<String>) -> VariableIdx {
        let index = VariableIdx::new(self.variables.len());
        self.variables.push(MipVariable { name: name.into() });
        index
    }

    pub fn set_objective(&mut self, terms: Vec<(VariableIdx, f64)>) {
        self.objective = terms;
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        debug_assert!(
            constraint
                .terms
                .iter()
                .all(|(variable, _)| variable.get() < self.variables.len())
        );
        self.constraints.push(constraint);
    }

    /// Forbids the exact combination of `selected` variables:
    /// `Σ selected <= |selected| - 1`.
    pub fn add_no_good_cut(&mut self, selected: &[VariableIdx]) {
        let name = format!("exclude_solution_{}", self.num_cuts);
        let terms = selected.iter().map(|&variable| (variable, 1.0)).collect();

        self.add_constraint(LinearConstraint::new(
            name,
            terms,
            ConstraintSense::LessOrEqual,
            selected.len() as f64 - 1.0,
        ));
        self.num_cuts += 1;
    }

    pub fn variables(&self) -> &[MipVariable] {
        &self.variables
    }

    pub fn variable(&self, index: VariableIdx) -> &MipVariable {
        &self.variables[index]
    }

    pub fn objective(&self) -> &[(VariableIdx, f64)] {
        &self.objective
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_cuts(&self) -> usize {
        self.num_cuts
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|&(variable, coefficient)| coefficient * values[variable.get()])
            .sum()
    }

    /// Constraints violated by `values`, for diagnostics.
    pub fn violated_constraints<'a>(
        &'a self,
        values: &'a [f64],
    ) -> impl Iterator<Item = &'a LinearConstraint> {
        self.constraints
            .iter()
            .filter(move |constraint| !constraint.is_satisfied_by(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_good_cut() {
        let mut model = MipModel::default();
        let x = model.add_binary("x");
        let y = model.add_binary("y");
        let z = model.add_binary("z");

        model.add_no_good_cut(&[x, y, z]);
        model.add_no_good_cut(&[x, z]);

        assert_eq!(model.num_cuts(), 2);
        assert_eq!(model.num_constraints(), 2);

        let cut = &model.constraints()[0];
        assert_eq!(cut.name(), "exclude_solution_0");
        assert_eq!(cut.rhs(), 2.0);
        assert!(!cut.is_satisfied_by(&[1.0, 1.0, 1.0]));
        assert!(cut.is_satisfied_by(&[1.0, 0.0, 1.0]));

        assert_eq!(model.constraints()[1].name(), "exclude_solution_1");
        assert_eq!(model.violated_constraints(&[1.0, 0.0, 1.0]).count(), 1);
    }

    #[test]
    fn test_objective_value() {
        let mut model = MipModel::default();
        let a = model.add_binary("a");
        let b = model.add_binary("b");
        model.set_objective(vec![(a, 4.0), (b, 3.0)]);

        assert_eq!(model.objective_value(&[0.0, 1.0]), 3.0);
        assert_eq!(model.objective_value(&[1.0, 0.0]), 4.0);
    }

    #[test]
    fn test_constraint_senses() {
        let mut model = MipModel::default();
        let a = model.add_binary("a");
        let b = model.add_binary("b");

        let equal = LinearConstraint::new("one", vec![(a, 1.0), (b, 1.0)], ConstraintSense::Equal, 1.0);
        assert!(equal.is_satisfied_by(&[1.0, 0.0]));
        assert!(!equal.is_satisfied_by(&[1.0, 1.0]));

        let at_least =
            LinearConstraint::new("floor", vec![(a, 10.0)], ConstraintSense::GreaterOrEqual, 5.0);
        assert!(at_least.is_satisfied_by(&[1.0, 0.0]));
        assert!(!at_least.is_satisfied_by(&[0.0, 0.0]));
        assert_eq!(at_least.to_string(), "floor: 10 v0 >= 5");
    }
}
