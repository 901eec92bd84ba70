use miette::Diagnostic;
use thiserror::Error;

use crate::Idx;

/// Violations of the structural invariants of expression trees.
///
/// These are construction-time errors; the matcher itself never raises
/// them during search.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum MalformedExpression {
    #[error("application does not have any children")]
    #[diagnostic(code("E-001"))]
    EmptyApplication,
    #[error("binder {head} does not bind any variables")]
    #[diagnostic(code("E-002"))]
    BinderWithoutVariables { head: String },
    #[error("de Bruijn marker @{idx} does not fit the arity of its binder")]
    #[diagnostic(code("E-003"))]
    MarkerOutOfRange { idx: Idx },
}
