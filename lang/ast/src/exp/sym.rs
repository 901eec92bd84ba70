use fxhash::FxHashSet;
use pretty::DocAllocator;
use printer::theme::ThemeExt;
use printer::tokens::META_SUFFIX;
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::traits::*;

use super::Exp;

/// The reserved head of λ-abstractions the matcher builds itself when it
/// instantiates an expression function.
pub const LAMBDA: &str = "λ";

/// A named atom.
///
/// The `meta` flag marks the symbol as a metavariable, i.e. a placeholder
/// the matcher solves for. Two symbols are equal when both their names
/// and their flags agree; a metavariable `x` and a constant `x` are
/// different atoms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sym {
    pub name: String,
    pub meta: bool,
}

impl Sym {
    pub fn new(name: &str) -> Self {
        Sym { name: name.to_owned(), meta: false }
    }

    pub fn meta(name: &str) -> Self {
        Sym { name: name.to_owned(), meta: true }
    }

    pub fn lambda() -> Self {
        Sym::new(LAMBDA)
    }

    pub fn is_lambda(&self) -> bool {
        !self.meta && self.name == LAMBDA
    }
}

impl From<Sym> for Exp {
    fn from(val: Sym) -> Self {
        Exp::Sym(val)
    }
}

impl Shift for Sym {
    fn shift_in_range<R: ShiftRange>(&mut self, _range: &R, _by: isize) {}
}

impl ContainsMetaVars for Sym {
    fn contains_metavars(&self) -> bool {
        self.meta
    }

    fn collect_metavars(&self, out: &mut FxHashSet<String>) {
        if self.meta {
            out.insert(self.name.clone());
        }
    }
}

impl Substitutable for Sym {
    type Target = Exp;
    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        if self.meta {
            if let Some(exp) = by.get_subst(&self.name) {
                return exp.clone();
            }
        }
        Exp::Sym(self.clone())
    }
}

impl Print for Sym {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        if self.meta {
            alloc.metavar(format!("{}{}", self.name, META_SUFFIX))
        } else {
            alloc.text(&self.name)
        }
    }
}
