//! Error type shared by every fallible operation of the crate.

use crate::expr::Kind;

/// Errors reported by table construction, evaluation, parsing and search.
///
/// Retry-budget exhaustion inside the genetic operators is *not* an error:
/// populations are allowed to stay under-filled, see
/// [`Refill`][crate::population::Refill].
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The assignment table is unusable (ragged rows, no outcome row, no columns, bad cell).
    #[error("malformed table: {0}")]
    MalformedTable(String),

    /// An expression refers to a variable the evaluated row does not have.
    #[error("variable v_{subscript} is missing (row has {available} variables)")]
    MissingVariable { subscript: u32, available: usize },

    /// Scoring against a table without any example.
    #[error("cannot score against an empty set of examples")]
    EmptyColumnSet,

    /// An operator was placed in the wrong operator list.
    #[error("operator `{kind}` does not have arity {expected_arity}")]
    InvalidOperator { kind: Kind, expected_arity: usize },

    /// An operator name that is not part of the catalogue.
    #[error("unknown operator `{0}`")]
    UnknownOperator(String),

    /// Search or population parameters are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Every population died out, so there is no candidate to return.
    #[error("no candidate left after {generations} generations")]
    Extinct { generations: usize },

    /// Expression text does not follow the rendering grammar.
    #[error("parse error at {position}: {message}")]
    Parse { position: usize, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
