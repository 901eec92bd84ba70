use miette::Diagnostic;
use thiserror::Error;

use ast::MalformedExpression;

pub type MatchResult<T> = Result<T, MatchError>;

/// Construction-time and budget errors of the matcher.
///
/// Contradictions found *during* the search are not errors; they prune a
/// branch. An exhausted solution stream is a value (`None`), not an
/// error.
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum MatchError {
    #[error("expression side of a constraint contains the metavariable {name}")]
    #[diagnostic(code("M-001"))]
    MetaVarInExpression { name: String },
    #[error("pattern contains the bound metavariable {name}")]
    #[diagnostic(code("M-002"))]
    BoundMetaVar { name: String },
    #[error("{name} is not a metavariable")]
    #[diagnostic(code("M-003"))]
    NotAMetaVar { name: String },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Malformed(#[from] MalformedExpression),
    #[error("solver exceeded its step budget of {budget} steps")]
    #[diagnostic(code("M-004"))]
    Budget { budget: usize },
}
