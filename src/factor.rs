//! Definition of the factor module
//!
//! A `Factor` represents a relationship between an ordered scope of `Variable`s. It maps every
//! joint assignment of its scope to a non-negative number. Every conditional probability table of
//! a Bayesian network is a `Factor`; the intermediate results of variable elimination are
//! `Factor`s as well, though they need not be normalized.
//!
//! All operations on a `Factor` produce a new `Factor` and leave their inputs untouched.

use crate::util::{BnetError, Result};
use crate::variable::{all_assignments, Assignment, Variable};

use itertools::Itertools;
use ndarray::prelude as nd;
use ndarray::IxDyn;

use std::fmt;

/// Alias f64 ndarray::Array as Table
pub type Table = nd::ArrayD<f64>;

/// Tolerance used when checking that a conditional table is normalized
const CPD_TOLERANCE: f64 = 0.001;


#[derive(Clone, Debug)]
pub struct Factor {
    /// Diagnostic name of the `Factor`
    name: String,

    /// The ordered scope of the `Factor`. The order defines the axes of `table`.
    scope: Vec<Variable>,

    /// The values of the `Factor` table. Axis `i` is indexed by the domain of `scope[i]`.
    table: Table
}


impl Factor {

    /// Create a new `Factor` from a complete table.
    ///
    /// # Errors
    /// * `BnetError::DuplicateVariable`, if a `Variable` appears in `scope` twice
    /// * `BnetError::InvalidScope`, if the shape of `table` does not match `scope`
    /// * `BnetError::NegativeValue`, if any entry of `table` is negative (or NaN)
    pub fn new(name: &str, scope: Vec<Variable>, table: Table) -> Result<Self> {
        check_distinct(&scope)?;

        if scope.len() != table.ndim() {
            return Err(BnetError::InvalidScope(
                format!("factor `{}` has {} variables but its table has {} dimensions",
                        name, scope.len(), table.ndim())
            ));
        }

        for (v, &t) in scope.iter().zip(table.shape().iter()) {
            if v.cardinality() != t {
                return Err(BnetError::InvalidScope(
                    format!("factor `{}`: variable `{}` has {} values but the table axis has {}",
                            name, v.name(), v.cardinality(), t)
                ));
            }
        }

        if let Some(&bad) = table.iter().find(|&&x| !(x >= 0.0)) {
            return Err(BnetError::NegativeValue { factor: String::from(name), value: bad });
        }

        Ok(Factor { name: String::from(name), scope, table })
    }


    /// Create a `Factor` over `scope` with every entry set to zero
    pub fn zeros(name: &str, scope: Vec<Variable>) -> Result<Self> {
        check_distinct(&scope)?;

        let shape = shape_of(&scope);
        Ok(Factor { name: String::from(name), scope, table: Table::zeros(IxDyn(&shape)) })
    }


    /// Create a constant `Factor` with an empty scope
    pub fn constant(name: &str, value: f64) -> Self {
        Factor { name: String::from(name), scope: Vec::new(), table: Table::from_elem(IxDyn(&[]), value) }
    }


    /// Create a conditional probability distribution ```P(var | parents)```.
    ///
    /// `table` is laid out with the parents first, in order, and `var` last: each innermost row
    /// is the distribution of `var` for one assignment of the parents. The resulting `Factor`
    /// has scope ```[var, parents...]```, which is the layout every CPT in a `BayesNet` uses.
    ///
    /// # Errors
    /// * `BnetError::NotACpd`, if some row of `table` does not sum to one
    /// * any error of `Factor::new`
    pub fn cpd(var: Variable, parents: Vec<Variable>, table: Table) -> Result<Self> {
        let name = if parents.is_empty() {
            format!("P({})", var.name())
        } else {
            format!("P({}|{})", var.name(), parents.iter().map(|p| p.name()).join(","))
        };

        let mut scope = parents.clone();
        scope.push(var.clone());
        let raw = Factor::new(&name, scope, table)?;

        let mut order = vec![var.clone()];
        order.extend(parents);
        let f = raw.reorder(&order)?;

        if !f.is_conditional_of(&var) {
            return Err(BnetError::NotACpd(name));
        }

        Ok(f)
    }


    /// Get the diagnostic name of the `Factor`
    pub fn name(&self) -> &str {
        &self.name
    }


    /// Retrieve the ordered scope of the `Factor`.
    pub fn scope(&self) -> &[Variable] {
        &self.scope
    }


    /// Retrieve the underlying table
    pub fn table(&self) -> &Table {
        &self.table
    }


    /// All values of the table, in row-major order over the scope
    pub fn values(&self) -> Vec<f64> {
        self.table.iter().cloned().collect()
    }


    /// Check if `var` is in the scope of this `Factor`
    pub fn contains(&self, var: &Variable) -> bool {
        self.scope.contains(var)
    }


    /// Position of `var` in the scope
    pub fn position(&self, var: &Variable) -> Option<usize> {
        self.scope.iter().position(|v| v == var)
    }


    /// Check if the `Factor` is a conditional distribution of `var` given the rest of its scope,
    /// i.e. the values sum to one over `var` for every assignment of the other `Variable`s.
    pub fn is_conditional_of(&self, var: &Variable) -> bool {
        if !self.contains(var) {
            return false;
        }

        self.sum_out(var).table.iter().all(|&s| (s - 1.0).abs() <= CPD_TOLERANCE)
    }


    /// Retrieve the value for a complete assignment over the scope of this `Factor`
    ///
    /// # Args
    /// * `assignment`: a full assignment to the scope of the `Factor`. The assignment may also
    ///   assign `Variable`s outside of the scope; those are ignored.
    ///
    /// # Errors
    /// * `BnetError::IncompleteAssignment`, if `assignment` misses a `Variable` of the scope
    pub fn value(&self, assignment: &Assignment) -> Result<f64> {
        let idx = self.index_of(assignment)?;
        Ok(self.table[IxDyn(&idx)])
    }


    /// Retrieve the value at the given domain values, one per scope `Variable`, in scope order.
    ///
    /// # Errors
    /// * `BnetError::InvalidScope`, if the number of values does not match the scope
    /// * `BnetError::DomainLookup`, if a value is not in its `Variable`'s domain
    pub fn value_at<S: AsRef<str>>(&self, values: &[S]) -> Result<f64> {
        let idx = self.index_of_values(values)?;
        Ok(self.table[IxDyn(&idx)])
    }


    /// Set the value of the table at the assignment of the scope given by `assignment`.
    pub fn set_value(&mut self, assignment: &Assignment, number: f64) -> Result<()> {
        self.check_value(number)?;
        let idx = self.index_of(assignment)?;
        self.table[IxDyn(&idx)] = number;
        Ok(())
    }


    /// Set a single entry, given the ordered domain values of the scope and the entry's value.
    pub fn add_row<S: AsRef<str>>(&mut self, values: &[S], number: f64) -> Result<()> {
        self.check_value(number)?;
        let idx = self.index_of_values(values)?;
        self.table[IxDyn(&idx)] = number;
        Ok(())
    }


    /// Set many entries at once. Each row holds the ordered domain values of the scope,
    /// followed by the entry's value. Entries not mentioned keep their current value.
    pub fn add_values<S: AsRef<str>>(&mut self, rows: &[(Vec<S>, f64)]) -> Result<()> {
        for &(ref values, number) in rows {
            self.add_row(values, number)?;
        }
        Ok(())
    }


    /// Product of this `Factor` and another `Factor`.
    ///
    /// Defined in Koller & Friedman Section 4.2.1
    ///
    /// # Returns
    /// A new `Factor` with scope ```union(self.scope(), other.scope())```: the scope of `self`,
    /// followed by the `Variable`s of `other` not already present. The scopes need not
    /// intersect; disjoint scopes yield the outer product.
    pub fn product(&self, other: &Self) -> Result<Self> {
        let new_scope: Vec<Variable> = self.scope.iter()
                                                 .chain(other.scope.iter())
                                                 .unique()
                                                 .cloned()
                                                 .collect();

        // position of each operand's axes within the new scope
        let my_axes = axes_within(&self.scope, &new_scope)?;
        let other_axes = axes_within(&other.scope, &new_scope)?;

        let mut tbl = Table::zeros(IxDyn(&shape_of(&new_scope)));
        let mut my_idx = vec![0; my_axes.len()];
        let mut other_idx = vec![0; other_axes.len()];

        for (idx, cell) in tbl.indexed_iter_mut() {
            for (k, &axis) in my_axes.iter().enumerate() {
                my_idx[k] = idx[axis];
            }
            for (k, &axis) in other_axes.iter().enumerate() {
                other_idx[k] = idx[axis];
            }

            *cell = self.table[IxDyn(&my_idx)] * other.table[IxDyn(&other_idx)];
        }

        Ok(Factor { name: format!("({} * {})", self.name, other.name), scope: new_scope, table: tbl })
    }


    /// Restrict the `Factor` to `var` = the value at `index` of its domain.
    ///
    /// Defined in Koller & Friedman 4.2.3
    ///
    /// # Returns
    /// A new `Factor` over the scope without `var`. If `var` is not in the scope the `Factor`
    /// is returned unchanged; if `var` is the only `Variable` in scope, the result is a
    /// constant `Factor`.
    ///
    /// # Errors
    /// * `BnetError::DomainLookup`, if `index` is outside the domain of `var`
    pub fn restrict(&self, var: &Variable, index: usize) -> Result<Self> {
        let axis = match self.position(var) {
            Some(axis) => axis,
            None => return Ok(self.clone())
        };

        if index >= var.cardinality() {
            return Err(BnetError::domain(var.name(), index));
        }

        let table = self.table.index_axis(nd::Axis(axis), index).to_owned();
        let scope = self.scope.iter().filter(|&v| v != var).cloned().collect();
        let name = format!("Restrict {}|{}={}", self.name, var.name(), var.value(index).unwrap_or("?"));

        Ok(Factor { name, scope, table })
    }


    /// Restrict the `Factor` to `var` = `value`.
    pub fn restrict_value(&self, var: &Variable, value: &str) -> Result<Self> {
        let index = var.value_index(value)?;
        self.restrict(var, index)
    }


    /// Sum `var` out of the `Factor`.
    ///
    /// Defined in Koller & Friedman 9.3.1
    ///
    /// # Returns
    /// A new `Factor` over the scope without `var`, whose value at each assignment is the sum of
    /// this `Factor` over every value of `var`. A `Factor` whose scope does not hold `var` is
    /// returned unchanged.
    pub fn sum_out(&self, var: &Variable) -> Self {
        match self.position(var) {
            Some(axis) => {
                let table = self.table.sum_axis(nd::Axis(axis));
                let scope = self.scope.iter().filter(|&v| v != var).cloned().collect();

                Factor { name: format!("Eliminate-{}-{}", var.name(), self.name), scope, table }
            },
            None => self.clone()
        }
    }


    /// Transpose the `Factor` to the given ordering of its scope.
    ///
    /// # Errors
    /// * `BnetError::InvalidScope`, if `order` is not a permutation of the scope
    pub fn reorder(&self, order: &[Variable]) -> Result<Self> {
        let invalid = || BnetError::InvalidScope(
            format!("{:?} is not an ordering of the scope {:?} of factor `{}`", order, self.scope, self.name)
        );

        if order.len() != self.scope.len() {
            return Err(invalid());
        }
        check_distinct(order).map_err(|_| invalid())?;

        let axes = axes_within(order, &self.scope).map_err(|_| invalid())?;
        let table = self.table
                        .clone()
                        .permuted_axes(IxDyn(&axes))
                        .as_standard_layout()
                        .into_owned();

        Ok(Factor { name: self.name.clone(), scope: order.to_vec(), table })
    }


    /// Normalize the values of the `Factor` so that they sum to one. An all-zero `Factor`
    /// stays all zero.
    pub fn normalize(&self) -> Self {
        let z = self.table.sum();
        let table = if z == 0.0 { self.table.clone() } else { &self.table / z };

        Factor { name: self.name.clone(), scope: self.scope.clone(), table }
    }


    /// The values of the `Factor` along `var`, with every other scope `Variable` fixed by
    /// `context`. Entry `i` corresponds to the `i`th domain value of `var`.
    ///
    /// # Errors
    /// * `BnetError::InvalidScope`, if `var` is not in the scope
    /// * `BnetError::IncompleteAssignment`, if `context` misses another scope `Variable`
    pub fn values_along(&self, var: &Variable, context: &Assignment) -> Result<Vec<f64>> {
        let axis = self.position(var).ok_or_else(|| BnetError::InvalidScope(
            format!("variable `{}` is not in the scope of factor `{}`", var.name(), self.name)
        ))?;

        let mut idx = Vec::with_capacity(self.scope.len());
        for (k, v) in self.scope.iter().enumerate() {
            if k == axis {
                idx.push(0);
            } else {
                idx.push(self.lookup(context, v)?);
            }
        }

        let mut out = Vec::with_capacity(var.cardinality());
        for i in 0..var.cardinality() {
            idx[axis] = i;
            out.push(self.table[IxDyn(&idx)]);
        }

        Ok(out)
    }


    fn lookup(&self, assignment: &Assignment, v: &Variable) -> Result<usize> {
        assignment.get(v).ok_or_else(|| BnetError::IncompleteAssignment {
            factor: self.name.clone(),
            variable: String::from(v.name())
        })
    }

    fn index_of(&self, assignment: &Assignment) -> Result<Vec<usize>> {
        self.scope.iter().map(|v| self.lookup(assignment, v)).collect()
    }

    fn index_of_values<S: AsRef<str>>(&self, values: &[S]) -> Result<Vec<usize>> {
        if values.len() != self.scope.len() {
            return Err(BnetError::InvalidScope(
                format!("factor `{}` expects {} values, got {}", self.name, self.scope.len(), values.len())
            ));
        }

        self.scope.iter().zip(values.iter()).map(|(v, val)| v.value_index(val.as_ref())).collect()
    }

    fn check_value(&self, number: f64) -> Result<()> {
        if number >= 0.0 {
            Ok(())
        } else {
            Err(BnetError::NegativeValue { factor: self.name.clone(), value: number })
        }
    }

}


impl fmt::Display for Factor {

    /// Print the factor's table, one line per assignment of the scope
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for assignment in all_assignments(&self.scope) {
            let cells = self.scope.iter()
                                  .map(|v| format!("{} = {}", v.name(), assignment.value_of(v).unwrap_or("?")))
                                  .join(", ");
            let idx: Vec<usize> = self.scope.iter().map(|v| assignment.get(v).unwrap_or(0)).collect();
            writeln!(f, "[{}] = {}", cells, self.table[IxDyn(&idx)])?;
        }
        Ok(())
    }

}


/// Multiply a list of `Factor`s together.
///
/// The factors are folded pairwise from the left, so the scope of the result lists the
/// `Variable`s in the order they are first encountered.
///
/// # Errors
/// * `BnetError::EmptyProduct`, if `factors` is empty
pub fn multiply_factors(factors: &[Factor]) -> Result<Factor> {
    let (first, rest) = factors.split_first().ok_or(BnetError::EmptyProduct)?;
    rest.iter().try_fold(first.clone(), |acc, f| acc.product(f))
}


/// Normalize a sequence of non-negative numbers so that it sums to one.
///
/// A sequence summing to exactly zero maps to a sequence of zeros.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let z: f64 = values.iter().sum();
    if z == 0.0 {
        vec![0.0; values.len()]
    } else {
        values.iter().map(|v| v / z).collect()
    }
}


fn shape_of(scope: &[Variable]) -> Vec<usize> {
    scope.iter().map(|v| v.cardinality()).collect()
}

fn check_distinct(scope: &[Variable]) -> Result<()> {
    for (i, v) in scope.iter().enumerate() {
        if scope[..i].contains(v) {
            return Err(BnetError::DuplicateVariable(String::from(v.name())));
        }
    }
    Ok(())
}

/// Position in `outer` of every `Variable` of `inner`
fn axes_within(inner: &[Variable], outer: &[Variable]) -> Result<Vec<usize>> {
    inner.iter()
         .map(|v| outer.iter().position(|u| u == v).ok_or_else(|| BnetError::StructuralInconsistency(
             format!("variable `{}` is missing from scope {:?}", v.name(), outer)
         )))
         .collect()
}
