//! Higher-order pattern matching modulo α-equivalence.
//!
//! The matcher solves systems of pattern/expression constraints over de
//! Bruijn encoded expression trees, with expression function applications
//! (EFAs) as second-order metavariables. It implements a terminating
//! subset of higher-order unification: Miller-style patterns generalized
//! with projection and imitation branching for EFAs, triaged by a
//! complexity measure and pruned so that every search is finite.
//!
//! It is based on the following references:
//!
//! * Gérard Huet. "A unification algorithm for typed λ-calculus." (1975)
//! * Dale Miller. "A logic programming language with lambda-abstraction,
//!   function variables, and simple unification." (1991)

pub mod constraint;
pub mod problem;
pub mod result;
pub mod solution;
pub mod substitution;

pub use constraint::{Complexity, Constraint, EfaInfo};
pub use problem::{MatchOpts, Problem, Solutions};
pub use result::{MatchError, MatchResult};
pub use solution::Solution;
pub use substitution::Substitution;

/// The lazy stream of solutions for a constraint set.
pub fn solutions(constraints: Vec<Constraint>, opts: MatchOpts) -> Solutions {
    Problem::new(constraints).solutions(opts)
}

/// The first solution for a constraint set, if any. `Ok(None)` when the
/// stream is exhausted without a match.
pub fn first_solution(
    constraints: Vec<Constraint>,
    opts: MatchOpts,
) -> MatchResult<Option<Solution>> {
    Problem::new(constraints).first_solution(opts)
}
