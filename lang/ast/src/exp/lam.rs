use derivative::Derivative;
use fxhash::FxHashSet;
use pretty::DocAllocator;
use printer::tokens::{COMMA, DOT};
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::ident::VarBind;
use crate::traits::*;

use super::{Exp, Sym};

/// A binder after de Bruijn encoding.
///
/// The bound variables are addressed by position, so all that remains of
/// them is their count. The original names are kept as hints for
/// prettyprinting and decoding; they are ignored by equality and
/// hashing, and may be absent entirely for abstractions the matcher
/// built itself.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Lam {
    pub head: Sym,
    pub arity: usize,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub names: Vec<VarBind>,
    pub body: Box<Exp>,
}

impl Lam {
    /// A λ-abstraction with the reserved head, as built for EFA
    /// instantiations.
    pub fn abstraction(arity: usize, body: Exp) -> Self {
        Lam { head: Sym::lambda(), arity, names: Vec::new(), body: Box::new(body) }
    }

    pub fn is_abstraction(&self) -> bool {
        self.head.is_lambda()
    }
}

impl From<Lam> for Exp {
    fn from(val: Lam) -> Self {
        Exp::Lam(val)
    }
}

impl Shift for Lam {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        self.body.shift_in_range(&range.clone().shift(1), by);
    }
}

impl ContainsMetaVars for Lam {
    fn contains_metavars(&self) -> bool {
        self.head.contains_metavars() || self.body.contains_metavars()
    }

    fn collect_metavars(&self, out: &mut FxHashSet<String>) {
        self.head.collect_metavars(out);
        self.body.collect_metavars(out);
    }
}

impl Substitutable for Lam {
    type Target = Lam;
    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        // See [`super::Bind`]: binder heads only ever substitute to
        // symbols. The replacement expressions are not shifted when they
        // pass under the binder; the solver's capture guard has already
        // rejected substitutions whose free markers the binder would
        // capture.
        let head = match self.head.subst(by) {
            Exp::Sym(sym) => sym,
            _ => self.head.clone(),
        };
        Lam { head, arity: self.arity, names: self.names.clone(), body: self.body.subst(by) }
    }
}

impl Print for Lam {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let names: Vec<String> = if self.names.len() == self.arity {
            self.names.iter().map(|v| v.id.clone()).collect()
        } else {
            (1..=self.arity).map(|k| format!("x{k}")).collect()
        };
        let vars = alloc.intersperse(names, alloc.text(COMMA));
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
