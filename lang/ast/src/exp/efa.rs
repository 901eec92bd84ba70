use fxhash::FxHashSet;
use pretty::DocAllocator;
use printer::tokens::AT;
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::de_bruijn;
use crate::traits::*;

use super::{Exp, Sym};

/// An expression function application `F(a₁,…,aₙ)`.
///
/// In patterns the function slot holds a metavariable standing for an
/// unknown function of the arguments; the solver instantiates it with a
/// λ-abstraction and β-reduces. In the canonical textual form the EFA is
/// rendered with the reserved `@` head.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Efa {
    pub fun: Box<Exp>,
    pub args: Vec<Exp>,
}

impl Efa {
    /// The metavariable in the function slot, when there is one.
    pub fn metavar(&self) -> Option<&Sym> {
        match &*self.fun {
            Exp::Sym(sym) if sym.meta => Some(sym),
            _ => None,
        }
    }

    /// Rebuild an EFA whose parts have already been substituted,
    /// contracting the β-redex when the function slot has become a
    /// λ-abstraction of fitting arity.
    pub fn contracted(fun: Exp, args: Vec<Exp>) -> Exp {
        if let Exp::Lam(lam) = &fun {
            if lam.is_abstraction() && lam.arity == args.len() {
                return de_bruijn::beta_reduce(lam, &args);
            }
        }
        Exp::Efa(Efa { fun: Box::new(fun), args })
    }
}

impl From<Efa> for Exp {
    fn from(val: Efa) -> Self {
        Exp::Efa(val)
    }
}

impl Shift for Efa {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        self.fun.shift_in_range(range, by);
        self.args.shift_in_range(range, by);
    }
}

impl ContainsMetaVars for Efa {
    fn contains_metavars(&self) -> bool {
        self.fun.contains_metavars() || self.args.contains_metavars()
    }

    fn collect_metavars(&self, out: &mut FxHashSet<String>) {
        self.fun.collect_metavars(out);
        self.args.collect_metavars(out);
    }
}

impl Substitutable for Efa {
    type Target = Exp;
    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        Efa::contracted((*self.fun).subst(by), self.args.subst(by))
    }
}

impl Print for Efa {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let parts = std::iter::once(alloc.text(AT))
            .chain(std::iter::once(self.fun.print(cfg, alloc)))
            .chain(self.args.iter().map(|a| a.print(cfg, alloc)));
        alloc.intersperse(parts, alloc.space()).enclose("(", ")")
    }
}
