use std::cell::OnceCell;

use pretty::DocAllocator;
use printer::tokens::COMMA;
use printer::{Alloc, Builder, Print, PrintCfg};

use ast::{ContainsMetaVars, Exp, Substitutable, Substitution, encode, occurrences};

use crate::result::{MatchError, MatchResult};

/// Base weight of an EFA constraint, chosen so that EFA branching always
/// ranks below the deterministic classes.
const EFA_BASE_WEIGHT: usize = 4;

/// Estimated copy count for EFA arguments that still contain
/// metavariables, whose true occurrence count is not yet known.
const METAVAR_COPY_ESTIMATE: usize = 2;

// Complexity
//
//

/// The complexity class of a constraint.
///
/// The ordering is the solver's triage: lower classes carry more
/// information and are resolved first. EFA constraints are weighted by
/// how much copying their arguments can cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Complexity {
    /// The constraint can never be satisfied.
    Failure,
    /// The constraint is already satisfied.
    Success,
    /// The pattern is a lone metavariable.
    Instantiation,
    /// Both sides decompose element-wise.
    Children,
    /// The pattern is an expression function application.
    Efa(usize),
}

// EfaInfo
//
//

/// Pruning data cached on every EFA constraint at classification time.
#[derive(Debug, Clone)]
pub struct EfaInfo {
    /// How often each argument occurs in the expression; the fixed
    /// estimate [`METAVAR_COPY_ESTIMATE`] for arguments that contain
    /// metavariables.
    pub arg_copy_count: Vec<usize>,
    /// Whether each argument contains a metavariable.
    pub arg_has_meta: Vec<bool>,
}

impl EfaInfo {
    /// Every argument is closed and absent from the expression: no
    /// projection or imitation can consume them, so only the constant
    /// instantiation is worth trying.
    pub fn can_be_only_constant(&self) -> bool {
        self.arg_copy_count.iter().zip(&self.arg_has_meta).all(|(count, meta)| !meta && *count == 0)
    }

    /// Whether projecting onto the k-th argument can close the
    /// constraint: the argument occurs exactly once, or its occurrence
    /// count is still unknown because it contains a metavariable.
    pub fn can_be_projection(&self, k: usize) -> bool {
        self.arg_has_meta[k] || self.arg_copy_count[k] == 1
    }
}

// Constraint
//
//

/// A single matching constraint: a pattern that is to be made
/// syntactically equal to a metavariable-free expression.
///
/// Both sides are stored de Bruijn encoded, so the equality being solved
/// for is α-equivalence. Constraints are immutable after construction;
/// the complexity classification is computed lazily and memoised.
#[derive(Debug, Clone)]
pub struct Constraint {
    pattern: Exp,
    expression: Exp,
    /// Binder levels between the problem root and this constraint.
    /// Body constraints of binder pairs live one level deeper than their
    /// parent; the capture guard adds this to local occurrence depths.
    depth: usize,
    class: OnceCell<(Complexity, Option<EfaInfo>)>,
}

impl Constraint {
    pub fn new(pattern: &Exp, expression: &Exp) -> MatchResult<Self> {
        if expression.contains_metavars() {
            let name = expression.metavar_names().into_iter().next().unwrap_or_default();
            return Err(MatchError::MetaVarInExpression { name });
        }
        if let Some(name) = bound_metavar(pattern) {
            return Err(MatchError::BoundMetaVar { name });
        }
        let pattern = encode(pattern)?;
        let expression = encode(expression)?;
        Ok(Constraint::from_encoded(pattern, expression, 0))
    }

    pub(crate) fn from_encoded(pattern: Exp, expression: Exp, depth: usize) -> Self {
        Constraint { pattern, expression, depth, class: OnceCell::new() }
    }

    pub fn pattern(&self) -> &Exp {
        &self.pattern
    }

    pub fn expression(&self) -> &Exp {
        &self.expression
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn complexity(&self) -> Complexity {
        self.classified().0
    }

    /// The cached pruning data; present exactly on EFA constraints.
    pub fn efa_info(&self) -> Option<&EfaInfo> {
        self.classified().1.as_ref()
    }

    fn classified(&self) -> &(Complexity, Option<EfaInfo>) {
        self.class.get_or_init(|| classify(&self.pattern, &self.expression))
    }

    /// The element-wise decomposition of a constraint whose complexity
    /// is [`Complexity::Children`]; empty for any other class.
    pub fn children(&self) -> Vec<Constraint> {
        match (&self.pattern, &self.expression) {
            (Exp::App(p), Exp::App(e)) if p.arity() == e.arity() => p
                .children
                .iter()
                .zip(&e.children)
                .map(|(p, e)| Constraint::from_encoded(p.clone(), e.clone(), self.depth))
                .collect(),
            (Exp::Lam(p), Exp::Lam(e)) if p.arity == e.arity => vec![
                Constraint::from_encoded(
                    Exp::Sym(p.head.clone()),
                    Exp::Sym(e.head.clone()),
                    self.depth,
                ),
                Constraint::from_encoded((*p.body).clone(), (*e.body).clone(), self.depth + 1),
            ],
            (Exp::Efa(p), Exp::Efa(e)) if p.args.len() == e.args.len() => {
                std::iter::once(Constraint::from_encoded(
                    (*p.fun).clone(),
                    (*e.fun).clone(),
                    self.depth,
                ))
                .chain(p.args.iter().zip(&e.args).map(|(p, e)| {
                    Constraint::from_encoded(p.clone(), e.clone(), self.depth)
                }))
                .collect()
            }
            _ => Vec::new(),
        }
    }

    /// A copy with the substitution applied to the pattern. The
    /// expression side never changes.
    pub fn after_substituting<S: Substitution>(&self, by: &S) -> Constraint {
        Constraint::from_encoded(self.pattern.subst(by), self.expression.clone(), self.depth)
    }
}

fn classify(pattern: &Exp, expression: &Exp) -> (Complexity, Option<EfaInfo>) {
    // 1. A lone metavariable instantiates directly.
    if let Exp::Sym(sym) = pattern {
        if sym.meta {
            return (Complexity::Instantiation, None);
        }
    }
    // 2. An EFA with a metavariable function slot branches; its weight
    //    estimates how much copying its arguments can cause.
    if let Exp::Efa(efa) = pattern {
        if efa.metavar().is_some() {
            let arg_has_meta: Vec<bool> =
                efa.args.iter().map(|a| a.contains_metavars()).collect();
            let arg_copy_count: Vec<usize> = efa
                .args
                .iter()
                .zip(&arg_has_meta)
                .map(|(a, meta)| {
                    if *meta { METAVAR_COPY_ESTIMATE } else { occurrences(a, expression) }
                })
                .collect();
            let weight = EFA_BASE_WEIGHT + arg_copy_count.iter().sum::<usize>();
            return (Complexity::Efa(weight), Some(EfaInfo { arg_copy_count, arg_has_meta }));
        }
    }
    // 3. A rigid pattern either already matches or never will.
    if !pattern.contains_metavars() {
        let class =
            if pattern == expression { Complexity::Success } else { Complexity::Failure };
        return (class, None);
    }
    // 4. A flexible compound decomposes when the shapes line up.
    let zippable = match (pattern, expression) {
        (Exp::App(p), Exp::App(e)) => p.arity() == e.arity(),
        (Exp::Lam(p), Exp::Lam(e)) => p.arity == e.arity,
        (Exp::Efa(p), Exp::Efa(e)) => p.args.len() == e.args.len(),
        _ => false,
    };
    let class = if zippable { Complexity::Children } else { Complexity::Failure };
    (class, None)
}

/// The name of a metavariable that occurs under a binder binding its
/// name, if the pattern contains one. Such patterns are rejected: a
/// metavariable stands for an unknown term of the ambient context and
/// must not be captured by the pattern's own binders.
fn bound_metavar(exp: &Exp) -> Option<String> {
    fn go(exp: &Exp, bound: &mut Vec<String>) -> Option<String> {
        match exp {
            Exp::Sym(sym) if sym.meta && bound.iter().any(|b| b == &sym.name) => {
                Some(sym.name.clone())
            }
            Exp::Sym(_) | Exp::Var(_) => None,
            Exp::App(app) => app.children.iter().find_map(|c| go(c, bound)),
            Exp::Bind(bind) => {
                let before = bound.len();
                bound.extend(bind.vars.iter().map(|v| v.id.clone()));
                let found = go(&bind.body, bound);
                bound.truncate(before);
                found
            }
            // Encoded binders bind by position, not by name.
            Exp::Lam(lam) => go(&lam.body, bound),
            Exp::Efa(efa) => {
                go(&efa.fun, bound).or_else(|| efa.args.iter().find_map(|a| go(a, bound)))
            }
        }
    }
    go(exp, &mut Vec::new())
}

impl Print for Constraint {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        self.pattern
            .print(cfg, alloc)
            .append(COMMA)
            .append(alloc.space())
            .append(self.expression.print(cfg, alloc))
            .enclose("(", ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::Sym;

    fn app(children: Vec<Exp>) -> Exp {
        Exp::app(children)
    }

    #[test]
    fn lone_metavariable_is_an_instantiation() {
        let c = Constraint::new(&Exp::metavar("A"), &Exp::sym("c")).unwrap();
        assert_eq!(c.complexity(), Complexity::Instantiation);
    }

    #[test]
    fn rigid_patterns_succeed_or_fail() {
        let success = Constraint::new(&Exp::sym("c"), &Exp::sym("c")).unwrap();
        assert_eq!(success.complexity(), Complexity::Success);
        let failure = Constraint::new(&Exp::sym("c"), &Exp::sym("d")).unwrap();
        assert_eq!(failure.complexity(), Complexity::Failure);
    }

    #[test]
    fn flexible_applications_decompose() {
        let pattern = app(vec![Exp::sym("f"), Exp::metavar("A")]);
        let expression = app(vec![Exp::sym("f"), Exp::sym("c")]);
        let c = Constraint::new(&pattern, &expression).unwrap();
        assert_eq!(c.complexity(), Complexity::Children);
        let children = c.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].complexity(), Complexity::Success);
        assert_eq!(children[1].complexity(), Complexity::Instantiation);
    }

    #[test]
    fn arity_mismatch_fails() {
        let pattern = app(vec![Exp::sym("f"), Exp::metavar("A")]);
        let expression = app(vec![Exp::sym("f"), Exp::sym("c"), Exp::sym("d")]);
        let c = Constraint::new(&pattern, &expression).unwrap();
        assert_eq!(c.complexity(), Complexity::Failure);
    }

    #[test]
    fn efa_weight_counts_argument_copies() {
        // (@ F y) against (g y y): the argument occurs twice.
        let pattern = Exp::efa(Exp::metavar("F"), vec![Exp::sym("y")]);
        let expression = app(vec![Exp::sym("g"), Exp::sym("y"), Exp::sym("y")]);
        let c = Constraint::new(&pattern, &expression).unwrap();
        assert_eq!(c.complexity(), Complexity::Efa(6));
        let info = c.efa_info().unwrap();
        assert_eq!(info.arg_copy_count, vec![2]);
        assert_eq!(info.arg_has_meta, vec![false]);
        assert!(!info.can_be_projection(0));
        assert!(!info.can_be_only_constant());
    }

    #[test]
    fn efa_with_absent_closed_arguments_is_constant_only() {
        let pattern = Exp::efa(Exp::metavar("F"), vec![Exp::sym("c")]);
        let expression = app(vec![Exp::sym("g"), Exp::sym("y")]);
        let c = Constraint::new(&pattern, &expression).unwrap();
        assert_eq!(c.complexity(), Complexity::Efa(4));
        assert!(c.efa_info().unwrap().can_be_only_constant());
    }

    #[test]
    fn metavariable_on_the_expression_side_is_rejected() {
        let result = Constraint::new(&Exp::sym("c"), &Exp::metavar("A"));
        assert_eq!(result.unwrap_err(), MatchError::MetaVarInExpression { name: "A".to_owned() });
    }

    #[test]
    fn bound_metavariable_in_the_pattern_is_rejected() {
        let pattern = Exp::bind(Sym::new("∀"), &["M"], Exp::metavar("M"));
        let result = Constraint::new(&pattern, &Exp::sym("c"));
        assert_eq!(result.unwrap_err(), MatchError::BoundMetaVar { name: "M".to_owned() });
    }

    #[test]
    fn binder_pairs_decompose_into_head_and_body() {
        let pattern = Exp::bind(Sym::new("∀"), &["x"], Exp::metavar("A"));
        let expression = Exp::bind(Sym::new("∀"), &["x"], Exp::sym("c"));
        let c = Constraint::new(&pattern, &expression).unwrap();
        assert_eq!(c.complexity(), Complexity::Children);
        let children = c.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].depth(), 0);
        assert_eq!(children[1].depth(), 1);
    }
}
