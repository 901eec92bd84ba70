use derivative::Derivative;
use fxhash::FxHashSet;
use pretty::DocAllocator;
use printer::tokens::COLONEQ;
use printer::{Alloc, Builder, Print, PrintCfg};

use ast::{Exp, Substitutable, Sym, encode};

use crate::result::{MatchError, MatchResult};

/// An assignment of a single metavariable to an expression.
///
/// Substitutions are immutable values from the caller's point of view;
/// the solver composes them through [`Substitution::substitute`] while
/// it owns them exclusively. The set of metavariable names occurring in
/// the expression is cached because the solver consults it on every
/// composition.
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq, Eq)]
pub struct Substitution {
    var: Sym,
    exp: Exp,
    #[derivative(PartialEq = "ignore")]
    metavars: FxHashSet<String>,
}

impl Substitution {
    pub fn new(var: Sym, exp: &Exp) -> MatchResult<Self> {
        if !var.meta {
            return Err(MatchError::NotAMetaVar { name: var.name });
        }
        let exp = encode(exp)?;
        Ok(Substitution::from_encoded(var, exp))
    }

    pub(crate) fn from_encoded(var: Sym, exp: Exp) -> Self {
        let metavars = exp.metavar_names();
        Substitution { var, exp, metavars }
    }

    pub fn metavar(&self) -> &Sym {
        &self.var
    }

    pub fn expression(&self) -> &Exp {
        &self.exp
    }

    /// The cached names of the metavariables occurring in the expression.
    pub fn metavars(&self) -> &FxHashSet<String> {
        &self.metavars
    }

    /// A copy of `target` with every subexpression equal to the
    /// metavariable replaced by a copy of the expression.
    ///
    /// The replacement is simultaneous: metavariables inside the
    /// inserted copies are not themselves substituted again. EFA
    /// β-redexes produced by the replacement are contracted eagerly.
    pub fn apply_to(&self, target: &Exp) -> Exp {
        target.subst(self)
    }

    /// Sequentially apply `others` to the expression, in place, and
    /// refresh the cached metavariable names.
    pub fn substitute(&mut self, others: &[Substitution]) {
        for other in others {
            self.exp = other.apply_to(&self.exp);
        }
        self.metavars = self.exp.metavar_names();
    }

    /// A copy with `other` applied to the expression.
    pub fn compose(&self, other: &Substitution) -> Substitution {
        let mut composed = self.clone();
        composed.substitute(std::slice::from_ref(other));
        composed
    }
}

impl ast::Substitution for Substitution {
    fn get_subst(&self, name: &str) -> Option<&Exp> {
        (self.var.name == name).then_some(&self.exp)
    }
}

impl Print for Substitution {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        self.var
            .print(cfg, alloc)
            .append(alloc.space())
            .append(COLONEQ)
            .append(alloc.space())
            .append(self.exp.print(cfg, alloc))
    }
}
