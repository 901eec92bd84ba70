use derivative::Derivative;
use fxhash::FxHashSet;
use pretty::DocAllocator;
use printer::theme::ThemeExt;
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::ident::{Idx, VarBind};
use crate::traits::*;

use super::Exp;

/// A bound variable occurrence in de Bruijn representation.
///
/// The binding structure is tracked entirely by the two-level index; the
/// name the variable had before encoding is kept for prettyprinting only
/// and is ignored by equality and hashing. This is what makes structural
/// equality of encoded expressions coincide with α-equivalence.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Var {
    pub idx: Idx,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: Option<VarBind>,
}

impl Var {
    pub fn new(idx: Idx) -> Self {
        Var { idx, name: None }
    }

    pub fn named(idx: Idx, name: &str) -> Self {
        Var { idx, name: Some(VarBind::from_string(name)) }
    }
}

impl From<Var> for Exp {
    fn from(val: Var) -> Self {
        Exp::Var(val)
    }
}

impl Shift for Var {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        self.idx.shift_in_range(range, by);
    }
}

impl ContainsMetaVars for Var {
    fn contains_metavars(&self) -> bool {
        false
    }

    fn collect_metavars(&self, _out: &mut FxHashSet<String>) {}
}

impl Substitutable for Var {
    type Target = Var;
    fn subst<S: Substitution>(&self, _by: &S) -> Self::Target {
        self.clone()
    }
}

impl Print for Var {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match &self.name {
            Some(name) if !cfg.de_bruijn => alloc.text(&name.id),
            Some(name) => alloc.marker(format!("{}@{}", name.id, self.idx)),
            None => alloc.marker(format!("@{}", self.idx)),
        }
    }
}
