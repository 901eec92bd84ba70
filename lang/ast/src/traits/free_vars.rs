use crate::exp::*;

/// Queries about the free de Bruijn markers of an expression.
///
/// A marker is *free* when its binder distance points above the root of
/// the expression it occurs in; its *excess* is the number of binder
/// levels by which it escapes the root. The capture guard of the solver
/// compares excesses against binder depths to decide whether a
/// substitution is admissible.
pub trait FreeVars {
    /// The smallest excess among the free markers, or `None` when the
    /// expression is closed.
    fn min_free_excess(&self) -> Option<usize>;

    fn is_closed(&self) -> bool {
        self.min_free_excess().is_none()
    }
}

impl FreeVars for Exp {
    fn min_free_excess(&self) -> Option<usize> {
        min_excess(self, 0)
    }
}

fn min_excess(exp: &Exp, depth: usize) -> Option<usize> {
    match exp {
        Exp::Sym(_) => None,
        Exp::Var(Var { idx, .. }) => (idx.fst >= depth).then(|| idx.fst - depth),
        Exp::App(App { children }) => children.iter().filter_map(|c| min_excess(c, depth)).min(),
        Exp::Bind(Bind { body, .. }) => min_excess(body, depth),
        Exp::Lam(Lam { body, .. }) => min_excess(body, depth + 1),
        Exp::Efa(Efa { fun, args }) => min_excess(fun, depth)
            .into_iter()
            .chain(args.iter().filter_map(|a| min_excess(a, depth)))
            .min(),
    }
}
