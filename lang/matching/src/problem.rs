use fxhash::FxHashSet;
use printer::Print;

use ast::{
    App, ContainsMetaVars, Efa, Exp, FreeVars, Idx, Lam, Sym, Var, metavar_depth, shift_and_clone,
};

use crate::constraint::{Complexity, Constraint};
use crate::result::{MatchError, MatchResult};
use crate::solution::Solution;
use crate::substitution::Substitution;

/// Options for a single matching search.
#[derive(Debug, Clone, Default)]
pub struct MatchOpts {
    /// Stop after this many solutions.
    pub max_solutions: Option<usize>,
    /// Abort the search with [`MatchError::Budget`] after this many
    /// solver steps.
    pub step_budget: Option<usize>,
    /// Restrict EFA enumeration to the projection and imitation
    /// branches. Used by callers hunting for instantiations that
    /// actually consume their arguments; constant instantiations are
    /// never enumerated in this mode.
    pub direct: bool,
}

// Problem
//
//

/// A multiset of constraints to be solved simultaneously.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    constraints: Vec<Constraint>,
}

impl Problem {
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Problem { constraints }
    }

    pub fn add(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// The lazy stream of solutions.
    ///
    /// Every yielded solution, applied to the pattern of any of the
    /// problem's constraints, makes it structurally equal to the
    /// constraint's expression. Solutions appear in the deterministic
    /// order the depth-first search discovers them.
    pub fn solutions(self, opts: MatchOpts) -> Solutions {
        let mut originals = FxHashSet::default();
        for constraint in &self.constraints {
            constraint.pattern().collect_metavars(&mut originals);
        }
        Solutions {
            stack: vec![Node { constraints: self.constraints, solution: Solution::empty() }],
            originals,
            fresh: 0,
            steps: 0,
            emitted: 0,
            opts,
            done: false,
        }
    }

    /// The first solution, if any. `Ok(None)` when the stream is
    /// exhausted without a match.
    pub fn first_solution(self, opts: MatchOpts) -> MatchResult<Option<Solution>> {
        self.solutions(opts).next().transpose()
    }
}

// Solutions
//
//

/// One branch of the search: the remaining constraints plus the partial
/// solution accumulated on the way here.
#[derive(Debug, Clone)]
struct Node {
    constraints: Vec<Constraint>,
    solution: Solution,
}

/// The lazy solution stream.
///
/// The search is an explicit depth-first stack machine rather than host
/// recursion, so deep proofs cannot overflow the stack, a step budget
/// can interrupt it anywhere, and dropping the iterator releases all
/// search state.
#[derive(Debug)]
pub struct Solutions {
    stack: Vec<Node>,
    /// The metavariables of the original patterns. Yielded solutions are
    /// restricted to these; fresh imitation metavariables are internal.
    originals: FxHashSet<String>,
    /// Counter for fresh imitation metavariables.
    fresh: u64,
    steps: usize,
    emitted: usize,
    opts: MatchOpts,
    done: bool,
}

impl Iterator for Solutions {
    type Item = MatchResult<Solution>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.opts.max_solutions.is_some_and(|max| self.emitted >= max) {
            self.done = true;
            return None;
        }
        'search: while let Some(mut node) = self.stack.pop() {
            loop {
                self.steps += 1;
                if let Some(budget) = self.opts.step_budget {
                    if self.steps > budget {
                        self.done = true;
                        return Some(Err(MatchError::Budget { budget }));
                    }
                }
                let Some(pos) = pick(&node.constraints) else {
                    // Nothing left to solve: yield this branch.
                    log::trace!("solution = {}", node.solution.print_trace());
                    self.emitted += 1;
                    return Some(Ok(node.solution.restricted(&self.originals)));
                };
                match node.constraints[pos].complexity() {
                    Complexity::Failure => {
                        log::trace!("branch fails on {}", node.constraints[pos].print_trace());
                        continue 'search;
                    }
                    Complexity::Success => {
                        node.constraints.remove(pos);
                    }
                    Complexity::Instantiation => {
                        let Exp::Sym(var) = node.constraints[pos].pattern().clone() else {
                            continue 'search;
                        };
                        let sub = Substitution::from_encoded(
                            var,
                            node.constraints[pos].expression().clone(),
                        );
                        // The constraint stays in place; the commit turns
                        // it into a trivial success.
                        if !commit(&mut node, sub) {
                            continue 'search;
                        }
                    }
                    Complexity::Children => {
                        let constraint = node.constraints.remove(pos);
                        let children = constraint.children();
                        node.constraints.splice(pos..pos, children);
                    }
                    Complexity::Efa(_) => {
                        let candidates = self.efa_candidates(&node.constraints[pos]);
                        log::trace!(
                            "{} instantiations for {}",
                            candidates.len(),
                            node.constraints[pos].print_trace()
                        );
                        for sub in candidates.into_iter().rev() {
                            let mut successor = node.clone();
                            if commit(&mut successor, sub) {
                                self.stack.push(successor);
                            }
                        }
                        continue 'search;
                    }
                }
            }
        }
        self.done = true;
        None
    }
}

impl Solutions {
    /// The candidate instantiations for the function slot of an EFA
    /// constraint, in the order they are to be explored: constant,
    /// projections by ascending argument, imitation. The cached pruning
    /// data disables branches that provably cannot close the constraint.
    fn efa_candidates(&mut self, constraint: &Constraint) -> Vec<Substitution> {
        let Exp::Efa(efa) = constraint.pattern() else {
            return Vec::new();
        };
        let Some(var) = efa.metavar().cloned() else {
            return Vec::new();
        };
        let Some(info) = constraint.efa_info() else {
            return Vec::new();
        };
        let arity = efa.args.len();
        let expression = constraint.expression();
        let mut out = Vec::new();

        if info.can_be_only_constant() {
            // Every argument is closed and absent from the expression;
            // all other branches are provably fruitless.
            if !self.opts.direct {
                out.push(constant(var, arity, expression));
            }
            return out;
        }
        if !self.opts.direct {
            out.push(constant(var.clone(), arity, expression));
        }
        for k in 0..arity {
            if info.can_be_projection(k) {
                out.push(projection(var.clone(), arity, k));
            }
        }
        if let Some(sub) = self.imitation(&var, arity, expression) {
            out.push(sub);
        }
        out
    }

    /// Imitate the head of the expression: instantiate the function with
    /// an abstraction that copies the expression's outermost shape and
    /// delegates everything below it to fresh EFAs over the same
    /// arguments. Binder heads are imitated purely on de Bruijn indices;
    /// no fresh bound-variable names are invented.
    fn imitation(&mut self, var: &Sym, arity: usize, expression: &Exp) -> Option<Substitution> {
        let body = match expression {
            Exp::App(app) => {
                let head = shift_and_clone(app.head()?, 1);
                let children = std::iter::once(head)
                    .chain(app.children[1..].iter().map(|_| self.fresh_efa(arity, 0)))
                    .collect();
                Exp::App(App { children })
            }
            Exp::Lam(lam) => Exp::Lam(Lam {
                head: lam.head.clone(),
                arity: lam.arity,
                names: lam.names.clone(),
                body: Box::new(self.fresh_efa(arity, 1)),
            }),
            _ => return None,
        };
        Some(Substitution::from_encoded(var.clone(), Exp::Lam(Lam::abstraction(arity, body))))
    }

    /// A fresh EFA applied to the markers of the enclosing abstraction,
    /// reaching past `extra` intervening binders.
    fn fresh_efa(&mut self, arity: usize, extra: usize) -> Exp {
        let args =
            (0..arity).map(|snd| Exp::Var(Var::new(Idx { fst: extra, snd }))).collect();
        Exp::Efa(Efa { fun: Box::new(Exp::Sym(self.fresh_metavar())), args })
    }

    fn fresh_metavar(&mut self) -> Sym {
        let name = format!("#h{}", self.fresh);
        self.fresh += 1;
        Sym::meta(&name)
    }
}

/// `F ↦ λx₁…xₙ. e` — ignore the arguments, return the expression.
fn constant(var: Sym, arity: usize, expression: &Exp) -> Substitution {
    let body = shift_and_clone(expression, 1);
    Substitution::from_encoded(var, Exp::Lam(Lam::abstraction(arity, body)))
}

/// `F ↦ λx₁…xₙ. xₖ` — return the k-th argument.
fn projection(var: Sym, arity: usize, k: usize) -> Substitution {
    let body = Exp::Var(Var::new(Idx { fst: 0, snd: k }));
    Substitution::from_encoded(var, Exp::Lam(Lam::abstraction(arity, body)))
}

/// The position of the constraint with the lowest complexity, or `None`
/// when no constraints remain. Ties keep the earliest position, so
/// insertion order breaks them deterministically.
fn pick(constraints: &[Constraint]) -> Option<usize> {
    let mut best: Option<(usize, Complexity)> = None;
    for (pos, constraint) in constraints.iter().enumerate() {
        let complexity = constraint.complexity();
        if best.is_none_or(|(_, b)| complexity < b) {
            best = Some((pos, complexity));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Commit a substitution to a branch: run the capture guard, record the
/// substitution in the accumulated solution, and rewrite every remaining
/// pattern. Returns `false` when the branch has to be abandoned.
fn commit(node: &mut Node, sub: Substitution) -> bool {
    // Capture guard: every free marker of the replacement must stay free
    // at every occurrence of the metavariable, counting the binders
    // between the problem root and the occurrence.
    if let Some(excess) = sub.expression().min_free_excess() {
        for constraint in &node.constraints {
            if let Some(depth) = metavar_depth(constraint.pattern(), &sub.metavar().name) {
                if constraint.depth() + depth > excess {
                    log::trace!("capture guard rejects {}", sub.print_trace());
                    return false;
                }
            }
        }
    }
    if !node.solution.extend(sub.clone()) {
        log::trace!("conflicting assignment for {}", sub.metavar().name);
        return false;
    }
    for constraint in &mut node.constraints {
        *constraint = constraint.after_substituting(&sub);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_empty_problem_has_the_empty_solution() {
        let mut stream = Problem::new(Vec::new()).solutions(MatchOpts::default());
        let solution = stream.next().unwrap().unwrap();
        assert!(solution.is_empty());
        assert!(stream.next().is_none());
    }

    #[test]
    fn conflicting_instantiations_prune_the_branch() {
        // (A A) against (c d) forces A to be both c and d.
        let pattern = Exp::app(vec![Exp::metavar("A"), Exp::metavar("A")]);
        let expression = Exp::app(vec![Exp::sym("c"), Exp::sym("d")]);
        let mut problem = Problem::default();
        problem.add(Constraint::new(&pattern, &expression).unwrap());
        let result = problem.first_solution(MatchOpts::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn the_step_budget_aborts_the_search() {
        let pattern = Exp::efa(Exp::metavar("F"), vec![Exp::sym("y")]);
        let expression = Exp::app(vec![Exp::sym("g"), Exp::sym("y"), Exp::sym("y")]);
        let constraint = Constraint::new(&pattern, &expression).unwrap();
        let opts = MatchOpts { step_budget: Some(2), ..Default::default() };
        let mut stream = Problem::new(vec![constraint]).solutions(opts);
        assert_eq!(stream.next(), Some(Err(MatchError::Budget { budget: 2 })));
        // The stream is fused after the budget fires.
        assert_eq!(stream.next(), None);
    }
}
