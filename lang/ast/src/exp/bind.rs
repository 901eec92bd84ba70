use fxhash::FxHashSet;
use pretty::DocAllocator;
use printer::tokens::{COMMA, DOT};
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::ident::VarBind;
use crate::traits::*;

use super::{Exp, Sym};

/// A binder in surface form: a head symbol, a non-empty list of bound
/// variables, and a body in which the variables bind by name.
///
/// This is the shape parsers produce. The de Bruijn encoder turns it
/// into a [`super::Lam`], after which the names no longer matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bind {
    pub head: Sym,
    pub vars: Vec<VarBind>,
    pub body: Box<Exp>,
}

impl From<Bind> for Exp {
    fn from(val: Bind) -> Self {
        Exp::Bind(val)
    }
}

impl Shift for Bind {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        // Named binders bind by name, not by position, so they do not
        // contribute a binder level to the marker structure.
        self.body.shift_in_range(range, by);
    }
}

impl ContainsMetaVars for Bind {
    fn contains_metavars(&self) -> bool {
        self.head.contains_metavars() || self.body.contains_metavars()
    }

    fn collect_metavars(&self, out: &mut FxHashSet<String>) {
        self.head.collect_metavars(out);
        self.body.collect_metavars(out);
    }
}

impl Substitutable for Bind {
    type Target = Bind;
    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        // A binder head only ever substitutes to another symbol: the
        // solver instantiates head metavariables from the head of the
        // matched binder, which is a symbol by construction.
        let head = match self.head.subst(by) {
            Exp::Sym(sym) => sym,
            _ => self.head.clone(),
        };
        Bind { head, vars: self.vars.clone(), body: self.body.subst(by) }
    }
}

impl Print for Bind {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let vars =
            alloc.intersperse(self.vars.iter().map(|v| v.print(cfg, alloc)), alloc.text(COMMA));
        self.head
            .print(cfg, alloc)
            .append(alloc.space())
            .append(vars)
            .append(alloc.space())
            .append(DOT)
            .append(alloc.space())
            .append(self.body.print(cfg, alloc))
            .enclose("(", ")")
    }
}
