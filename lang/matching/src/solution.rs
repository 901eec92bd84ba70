use fxhash::{FxHashMap, FxHashSet};
use pretty::DocAllocator;
use printer::tokens::COMMA;
use printer::{Alloc, Builder, Print, PrintCfg};

use ast::{Exp, Substitutable};

use crate::substitution::Substitution;

/// A set of substitutions with pairwise-disjoint domains that, applied
/// simultaneously, solve a constraint set.
///
/// The substitutions are kept in the order the search committed them,
/// which keeps solution streams deterministic; equality is
/// order-insensitive, as a solution is conceptually a set.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    subs: Vec<Substitution>,
}

impl Solution {
    pub fn empty() -> Self {
        Solution { subs: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Substitution> {
        self.subs.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Substitution> {
        self.subs.iter().find(|s| s.metavar().name == name)
    }

    /// The assignments as a map from metavariable name to expression.
    pub fn assignments(&self) -> FxHashMap<String, Exp> {
        self.subs.iter().map(|s| (s.metavar().name.clone(), s.expression().clone())).collect()
    }

    /// Apply all substitutions simultaneously to `pattern`.
    pub fn apply(&self, pattern: &Exp) -> Exp {
        pattern.subst(self)
    }

    /// Record `sub`, composing it into the expressions already present.
    ///
    /// Returns `false` when the metavariable is already assigned a
    /// different expression; recording the same assignment twice is a
    /// no-op.
    pub(crate) fn extend(&mut self, sub: Substitution) -> bool {
        if let Some(prev) = self.get(&sub.metavar().name) {
            return prev.expression() == sub.expression();
        }
        for existing in &mut self.subs {
            existing.substitute(std::slice::from_ref(&sub));
        }
        self.subs.push(sub);
        true
    }

    /// The solution restricted to the given metavariable names.
    pub(crate) fn restricted(&self, keep: &FxHashSet<String>) -> Solution {
        Solution {
            subs: self
                .subs
                .iter()
                .filter(|s| keep.contains(&s.metavar().name))
                .cloned()
                .collect(),
        }
    }
}

impl ast::Substitution for Solution {
    fn get_subst(&self, name: &str) -> Option<&Exp> {
        self.get(name).map(|s| s.expression())
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.subs.len() == other.subs.len()
            && self.subs.iter().all(|s| {
                other.get(&s.metavar().name).is_some_and(|o| o.expression() == s.expression())
            })
    }
}

impl Eq for Solution {}

impl Print for Solution {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let mut subs: Vec<&Substitution> = self.subs.iter().collect();
        subs.sort_by(|a, b| a.metavar().name.cmp(&b.metavar().name));
        alloc
            .intersperse(
                subs.into_iter().map(|s| s.print(cfg, alloc)),
                alloc.text(COMMA).append(alloc.space()),
            )
            .enclose("{", "}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::Sym;

    fn assignment(name: &str, exp: Exp) -> Substitution {
        Substitution::new(Sym::meta(name), &exp).unwrap()
    }

    #[test]
    fn extend_composes_into_existing_assignments() {
        let mut solution = Solution::empty();
        assert!(solution.extend(assignment("A", Exp::app(vec![Exp::sym("f"), Exp::metavar("B")]))));
        assert!(solution.extend(assignment("B", Exp::sym("c"))));
        assert_eq!(
            solution.get("A").unwrap().expression(),
            &Exp::app(vec![Exp::sym("f"), Exp::sym("c")])
        );
    }

    #[test]
    fn conflicting_assignments_are_rejected() {
        let mut solution = Solution::empty();
        assert!(solution.extend(assignment("A", Exp::sym("c"))));
        assert!(!solution.extend(assignment("A", Exp::sym("d"))));
        assert!(solution.extend(assignment("A", Exp::sym("c"))));
        assert_eq!(solution.len(), 1);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let mut lhs = Solution::empty();
        lhs.extend(assignment("A", Exp::sym("c")));
        lhs.extend(assignment("B", Exp::sym("d")));
        let mut rhs = Solution::empty();
        rhs.extend(assignment("B", Exp::sym("d")));
        rhs.extend(assignment("A", Exp::sym("c")));
        assert_eq!(lhs, rhs);
    }
}
