//! Definition of the variable module
//!
//! A `Variable` represents a discrete random variable in a Bayesian network. It has a name and an
//! ordered domain of values. Values assigned to `Variable`s never live on the `Variable` itself;
//! they are carried in an explicit `Assignment`.

use crate::util::{BnetError, Result};

use indexmap::IndexMap;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Source of the unique identity of every `Variable`
static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
struct VariableData {
    id: usize,
    name: String,
    domain: Vec<String>,
}

/// A named discrete random variable with an ordered domain.
///
/// `Variable`s are cheap handles: clones refer to the same random variable and compare equal.
/// Two `Variable`s created separately are always distinct, even if their names and domains
/// match.
#[derive(Clone)]
pub struct Variable(Arc<VariableData>);

impl Variable {

    /// Construct a new `Variable` with the given ordered domain.
    ///
    /// # Errors
    /// * `BnetError::InvalidInitialization`, if the domain is empty or repeats a value
    pub fn new<S: AsRef<str>>(name: &str, domain: &[S]) -> Result<Variable> {
        if domain.is_empty() {
            return Err(BnetError::InvalidInitialization(
                format!("variable `{}` has an empty domain", name)
            ));
        }

        let domain: Vec<String> = domain.iter().map(|v| String::from(v.as_ref())).collect();
        for (i, v) in domain.iter().enumerate() {
            if domain[..i].contains(v) {
                return Err(BnetError::InvalidInitialization(
                    format!("domain of variable `{}` repeats value `{}`", name, v)
                ));
            }
        }

        Ok(Variable(Arc::new(VariableData {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            name: String::from(name),
            domain,
        })))
    }

    /// Construct a new `Variable` whose domain is the integer tags `"0".."count - 1"`
    pub fn discrete(name: &str, count: usize) -> Result<Variable> {
        let domain: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        Variable::new(name, &domain)
    }

    /// Get the name of the `Variable`
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Get the ordered domain of the `Variable`
    pub fn domain(&self) -> &[String] {
        &self.0.domain
    }

    /// The number of values in the domain
    pub fn cardinality(&self) -> usize {
        self.0.domain.len()
    }

    /// Get the position of `value` in the domain.
    ///
    /// # Errors
    /// * `BnetError::DomainLookup`, if `value` is not a member of the domain
    pub fn value_index(&self, value: &str) -> Result<usize> {
        self.0.domain
            .iter()
            .position(|v| v == value)
            .ok_or_else(|| BnetError::domain(self.name(), value))
    }

    /// Get the domain value at `index`, if there is one
    pub fn value(&self, index: usize) -> Option<&str> {
        self.0.domain.get(index).map(|v| v.as_str())
    }

}

impl PartialEq for Variable {
    fn eq(&self, other: &Variable) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, Dom = {:?}", self.name(), self.domain())
    }
}


/// An assignment of values to some set of `Variable`s.
///
/// Values are stored as indices into each `Variable`'s domain. Every value in an `Assignment` is
/// guaranteed to be a member of its `Variable`'s domain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignment {
    values: IndexMap<Variable, usize>
}

impl Assignment {

    pub fn new() -> Self {
        Assignment { values: IndexMap::new() }
    }

    /// Build an `Assignment` from a record of domain values, one per `Variable`.
    ///
    /// # Errors
    /// * `BnetError::InvalidScope`, if the number of values does not match the number of
    ///   `Variable`s
    /// * `BnetError::DomainLookup`, if any value is outside its `Variable`'s domain
    pub fn from_record<S: AsRef<str>>(vars: &[Variable], values: &[S]) -> Result<Self> {
        if vars.len() != values.len() {
            return Err(BnetError::InvalidScope(
                format!("record has {} values for {} variables", values.len(), vars.len())
            ));
        }

        let mut a = Assignment::new();
        for (v, val) in vars.iter().zip(values.iter()) {
            a.observe(v, val.as_ref())?;
        }

        Ok(a)
    }

    /// Assign `var` the value at position `index` of its domain.
    ///
    /// # Errors
    /// * `BnetError::DomainLookup`, if `index` is outside the domain
    pub fn set(&mut self, var: &Variable, index: usize) -> Result<()> {
        if index >= var.cardinality() {
            return Err(BnetError::domain(var.name(), index));
        }

        self.insert(var, index);
        Ok(())
    }

    /// Assign `var` the given domain value.
    ///
    /// # Errors
    /// * `BnetError::DomainLookup`, if `value` is not in the domain
    pub fn observe(&mut self, var: &Variable, value: &str) -> Result<()> {
        let index = var.value_index(value)?;
        self.insert(var, index);
        Ok(())
    }

    /// Assign an index already known to be inside the domain
    pub(crate) fn insert(&mut self, var: &Variable, index: usize) {
        debug_assert!(index < var.cardinality());
        self.values.insert(var.clone(), index);
    }

    /// Remove `var` from the assignment
    pub fn unset(&mut self, var: &Variable) {
        self.values.shift_remove(var);
    }

    /// Get the domain index assigned to `var`
    pub fn get(&self, var: &Variable) -> Option<usize> {
        self.values.get(var).cloned()
    }

    /// Get the domain value assigned to `var`
    pub fn value_of<'v>(&self, var: &'v Variable) -> Option<&'v str> {
        self.get(var).and_then(|i| var.value(i))
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.values.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The assigned `Variable`s, in the order they were first assigned
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, usize)> {
        self.values.iter().map(|(v, &i)| (v, i))
    }

    /// A copy of this `Assignment` holding only the given `Variable`s
    pub fn restricted_to(&self, vars: &[Variable]) -> Assignment {
        let values = self.values
                         .iter()
                         .filter(|&(v, _)| vars.contains(v))
                         .map(|(v, &i)| (v.clone(), i))
                         .collect();

        Assignment { values }
    }

}


/// Enumerate every `Assignment` to `scope`.
///
/// Assignments are produced in row-major order: the last `Variable` changes fastest. An empty
/// scope yields a single, empty `Assignment`.
pub fn all_assignments(scope: &[Variable]) -> AllAssignments {
    AllAssignments {
        scope: scope.to_vec(),
        current: Some(vec![0; scope.len()])
    }
}

/// Iterator returned by `all_assignments`
pub struct AllAssignments {
    scope: Vec<Variable>,
    current: Option<Vec<usize>>
}

impl Iterator for AllAssignments {
    type Item = Assignment;

    fn next(&mut self) -> Option<Assignment> {
        let idx = self.current.take()?;

        let mut assignment = Assignment::new();
        for (v, &i) in self.scope.iter().zip(idx.iter()) {
            assignment.insert(v, i);
        }

        // advance the odometer
        let mut next = idx;
        for pos in (0..self.scope.len()).rev() {
            next[pos] += 1;
            if next[pos] < self.scope[pos].cardinality() {
                self.current = Some(next);
                break;
            }
            next[pos] = 0;
        }

        Some(assignment)
    }
}
