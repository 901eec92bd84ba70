use fxhash::FxHashSet;
use pretty::DocAllocator;
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::traits::*;

use super::Exp;

/// An application: an ordered, non-empty sequence of children.
///
/// By convention the first child is the head. Non-emptiness is not
/// enforced by the type; the encoder rejects empty applications with a
/// `MalformedExpression` before they reach the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct App {
    pub children: Vec<Exp>,
}

impl App {
    pub fn head(&self) -> Option<&Exp> {
        self.children.first()
    }

    pub fn arity(&self) -> usize {
        self.children.len()
    }
}

impl From<App> for Exp {
    fn from(val: App) -> Self {
        Exp::App(val)
    }
}

impl Shift for App {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        self.children.shift_in_range(range, by);
    }
}

impl ContainsMetaVars for App {
    fn contains_metavars(&self) -> bool {
        self.children.contains_metavars()
    }

    fn collect_metavars(&self, out: &mut FxHashSet<String>) {
        self.children.collect_metavars(out)
    }
}

impl Substitutable for App {
    type Target = App;
    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        App { children: self.children.subst(by) }
    }
}

impl Print for App {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        alloc
            .intersperse(self.children.iter().map(|c| c.print(cfg, alloc)), alloc.space())
            .enclose("(", ")")
    }
}
