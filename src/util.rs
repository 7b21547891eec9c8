//! Defines the `Error` type for the bnet library

use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, BnetError>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum BnetError {

    /// A value (or index) was used with a `Variable` whose domain does not contain it
    #[error("value `{value}` is not in the domain of variable `{variable}`")]
    DomainLookup { variable: String, value: String },

    /// Represents an incomplete assignment where a complete assignment was required.
    #[error("assignment is missing variable `{variable}` required by factor `{factor}`")]
    IncompleteAssignment { factor: String, variable: String },

    /// The network (or an intermediate result computed from it) is malformed
    #[error("structural inconsistency: {0}")]
    StructuralInconsistency(String),

    /// A `Variable` was referenced that is not part of the model
    #[error("variable `{0}` is not part of the model")]
    UnknownVariable(String),

    /// Represents a variable that was present multiple times in a situation where it should only
    /// have been present once
    #[error("variable `{0}` was encountered twice")]
    DuplicateVariable(String),

    /// Represents an error where there was a parent variable expected, but not found
    #[error("parent `{parent}` of variable `{variable}` is missing from the model")]
    MissingParent { variable: String, parent: String },

    /// An evidence variable was named without an observed value
    #[error("evidence variable `{0}` has no observed value")]
    MissingEvidence(String),

    /// Multiplication was requested over no factors at all
    #[error("cannot multiply an empty list of factors")]
    EmptyProduct,

    /// Represents an error where a certain constraint on a scope was not satisfied
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    /// Factor tables hold non-negative values only
    #[error("factor `{factor}` was given a negative value ({value})")]
    NegativeValue { factor: String, value: f64 },

    /// Represents the situation when we expected a CPD but did not receive one
    #[error("factor `{0}` is not a conditional probability distribution")]
    NotACpd(String),

    /// Represents an attempt to initialize a variable with an incompatible Initialization
    #[error("invalid initialization: {0}")]
    InvalidInitialization(String),

    /// There is not enough data provided
    #[error("not enough data has been provided")]
    NotEnoughData,
}

impl BnetError {

    pub(crate) fn domain<V: ToString>(variable: &str, value: V) -> Self {
        BnetError::DomainLookup { variable: String::from(variable), value: value.to_string() }
    }

}
