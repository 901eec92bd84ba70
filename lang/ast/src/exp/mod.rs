use fxhash::FxHashSet;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::ident::VarBind;
use crate::traits::*;

mod app;
mod bind;
mod efa;
mod lam;
mod sym;
mod var;

pub use app::App;
pub use bind::Bind;
pub use efa::Efa;
pub use lam::Lam;
pub use sym::Sym;
pub use var::Var;

// Exp
//
//

/// An expression tree.
///
/// Parsers construct expressions from the surface syntax using the
/// `Sym`/`App`/`Bind` variants; the de Bruijn encoder replaces binders
/// and bound occurrences by the `Lam` and `Var` variants, on which
/// structural equality coincides with α-equivalence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Exp {
    Sym(Sym),
    Var(Var),
    App(App),
    Bind(Bind),
    Lam(Lam),
    Efa(Efa),
}

impl Exp {
    pub fn sym(name: &str) -> Exp {
        Sym::new(name).into()
    }

    pub fn metavar(name: &str) -> Exp {
        Sym::meta(name).into()
    }

    pub fn app(children: Vec<Exp>) -> Exp {
        App { children }.into()
    }

    pub fn bind(head: Sym, vars: &[&str], body: Exp) -> Exp {
        Bind {
            head,
            vars: vars.iter().map(|v| VarBind::from_string(v)).collect(),
            body: Box::new(body),
        }
        .into()
    }

    pub fn efa(fun: Exp, args: Vec<Exp>) -> Exp {
        Efa { fun: Box::new(fun), args }.into()
    }

    /// The names of all metavariables occurring in the expression.
    pub fn metavar_names(&self) -> FxHashSet<String> {
        let mut out = FxHashSet::default();
        self.collect_metavars(&mut out);
        out
    }
}

impl Shift for Exp {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        match self {
            Exp::Sym(e) => e.shift_in_range(range, by),
            Exp::Var(e) => e.shift_in_range(range, by),
            Exp::App(e) => e.shift_in_range(range, by),
            Exp::Bind(e) => e.shift_in_range(range, by),
            Exp::Lam(e) => e.shift_in_range(range, by),
            Exp::Efa(e) => e.shift_in_range(range, by),
        }
    }
}

impl ContainsMetaVars for Exp {
    fn contains_metavars(&self) -> bool {
        match self {
            Exp::Sym(e) => e.contains_metavars(),
            Exp::Var(e) => e.contains_metavars(),
            Exp::App(e) => e.contains_metavars(),
            Exp::Bind(e) => e.contains_metavars(),
            Exp::Lam(e) => e.contains_metavars(),
            Exp::Efa(e) => e.contains_metavars(),
        }
    }

    fn collect_metavars(&self, out: &mut FxHashSet<String>) {
        match self {
            Exp::Sym(e) => e.collect_metavars(out),
            Exp::Var(e) => e.collect_metavars(out),
            Exp::App(e) => e.collect_metavars(out),
            Exp::Bind(e) => e.collect_metavars(out),
            Exp::Lam(e) => e.collect_metavars(out),
            Exp::Efa(e) => e.collect_metavars(out),
        }
    }
}

impl Substitutable for Exp {
    type Target = Exp;
    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        match self {
            Exp::Sym(e) => e.subst(by),
            Exp::Var(e) => Exp::Var(e.subst(by)),
            Exp::App(e) => Exp::App(e.subst(by)),
            Exp::Bind(e) => Exp::Bind(e.subst(by)),
            Exp::Lam(e) => Exp::Lam(e.subst(by)),
            Exp::Efa(e) => e.subst(by),
        }
    }
}

impl Print for Exp {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Exp::Sym(e) => e.print_prec(cfg, alloc, prec),
            Exp::Var(e) => e.print_prec(cfg, alloc, prec),
            Exp::App(e) => e.print_prec(cfg, alloc, prec),
            Exp::Bind(e) => e.print_prec(cfg, alloc, prec),
            Exp::Lam(e) => e.print_prec(cfg, alloc, prec),
            Exp::Efa(e) => e.print_prec(cfg, alloc, prec),
        }
    }
}
