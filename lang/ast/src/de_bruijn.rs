//! Conversion between surface binders and the de Bruijn representation.
//!
//! The encoder replaces every bound occurrence by a two-level marker
//! ([`Idx`]) and every binder by a [`Lam`], so that α-equivalent
//! expressions become structurally equal. The transform is involutive up
//! to the choice of names for bound variables: `decode(encode(e))`
//! differs from `e` at most in names the decoder had to invent.
//!
//! Ref: <https://www.cs.cornell.edu/courses/cs4110/2018fa/lectures/lecture15.pdf>

use fxhash::FxHashSet;

use crate::exp::*;
use crate::ident::{Idx, VarBind};
use crate::result::MalformedExpression;
use crate::traits::*;

/// A binder the traversal has passed under.
enum Frame<'a> {
    /// Surface binder whose variables still bind by name.
    Named(&'a [VarBind]),
    /// Encoded binder; binds markers by position only.
    Encoded(usize),
}

impl Frame<'_> {
    fn arity(&self) -> usize {
        match self {
            Frame::Named(vars) => vars.len(),
            Frame::Encoded(arity) => *arity,
        }
    }
}

// Encoding
//
//

/// Replace named binders and bound occurrences by their de Bruijn form.
///
/// Already-encoded subtrees pass through unchanged, so the function is
/// idempotent. Structurally malformed input (an application without
/// children, a binder without variables, a marker that does not fit its
/// binder) is rejected.
pub fn encode(exp: &Exp) -> Result<Exp, MalformedExpression> {
    encode_rec(exp, &mut Vec::new())
}

fn encode_rec<'a>(
    exp: &'a Exp,
    frames: &mut Vec<Frame<'a>>,
) -> Result<Exp, MalformedExpression> {
    match exp {
        Exp::Sym(sym) => {
            if !sym.meta {
                if let Some(idx) = lookup(&sym.name, frames) {
                    return Ok(Exp::Var(Var::named(idx, &sym.name)));
                }
            }
            Ok(exp.clone())
        }
        Exp::Var(var) => {
            let Idx { fst, snd } = var.idx;
            if fst < frames.len() {
                let frame = &frames[frames.len() - 1 - fst];
                if snd >= frame.arity() {
                    return Err(MalformedExpression::MarkerOutOfRange { idx: var.idx });
                }
            }
            Ok(exp.clone())
        }
        Exp::App(app) => {
            if app.children.is_empty() {
                return Err(MalformedExpression::EmptyApplication);
            }
            let children = app
                .children
                .iter()
                .map(|c| encode_rec(c, frames))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Exp::App(App { children }))
        }
        Exp::Bind(bind) => {
            if bind.vars.is_empty() {
                return Err(MalformedExpression::BinderWithoutVariables {
                    head: bind.head.name.clone(),
                });
            }
            frames.push(Frame::Named(&bind.vars));
            let body = encode_rec(&bind.body, frames);
            frames.pop();
            Ok(Exp::Lam(Lam {
                head: bind.head.clone(),
                arity: bind.vars.len(),
                names: bind.vars.clone(),
                body: Box::new(body?),
            }))
        }
        Exp::Lam(lam) => {
            frames.push(Frame::Encoded(lam.arity));
            let body = encode_rec(&lam.body, frames);
            frames.pop();
            Ok(Exp::Lam(Lam { body: Box::new(body?), ..lam.clone() }))
        }
        Exp::Efa(efa) => {
            let fun = encode_rec(&efa.fun, frames)?;
            let args =
                efa.args.iter().map(|a| encode_rec(a, frames)).collect::<Result<Vec<_>, _>>()?;
            Ok(Exp::Efa(Efa { fun: Box::new(fun), args }))
        }
    }
}

fn lookup(name: &str, frames: &[Frame]) -> Option<Idx> {
    for (fst, frame) in frames.iter().rev().enumerate() {
        if let Frame::Named(vars) = frame {
            // Within one binder list the last binding of a name wins.
            if let Some(snd) = vars.iter().rposition(|v| v.id == name) {
                return Some(Idx { fst, snd });
            }
        }
    }
    None
}

// Decoding
//
//

/// Replace encoded binders and markers by named binders and symbols.
///
/// The recorded name hints are reused when they fit the binder's arity;
/// otherwise fresh names `x1, x2, …` are invented, skipping any name
/// that already occurs below the binder so that re-encoding cannot
/// capture an unrelated symbol. Free markers are left in place.
pub fn decode(exp: &Exp) -> Exp {
    decode_rec(exp, &mut Vec::new())
}

fn decode_rec(exp: &Exp, scopes: &mut Vec<Vec<VarBind>>) -> Exp {
    match exp {
        Exp::Sym(_) => exp.clone(),
        Exp::Var(var) => {
            let Idx { fst, snd } = var.idx;
            if fst < scopes.len() {
                if let Some(v) = scopes[scopes.len() - 1 - fst].get(snd) {
                    return Exp::Sym(Sym::new(&v.id));
                }
            }
            exp.clone()
        }
        Exp::App(app) => {
            Exp::App(App { children: app.children.iter().map(|c| decode_rec(c, scopes)).collect() })
        }
        Exp::Bind(bind) => {
            scopes.push(bind.vars.clone());
            let body = decode_rec(&bind.body, scopes);
            scopes.pop();
            Exp::Bind(Bind { head: bind.head.clone(), vars: bind.vars.clone(), body: Box::new(body) })
        }
        Exp::Lam(lam) => {
            let vars = binder_names(lam);
            scopes.push(vars.clone());
            let body = decode_rec(&lam.body, scopes);
            scopes.pop();
            Exp::Bind(Bind { head: lam.head.clone(), vars, body: Box::new(body) })
        }
        Exp::Efa(efa) => {
            let fun = decode_rec(&efa.fun, scopes);
            let args = efa.args.iter().map(|a| decode_rec(a, scopes)).collect();
            Exp::Efa(Efa { fun: Box::new(fun), args })
        }
    }
}

fn binder_names(lam: &Lam) -> Vec<VarBind> {
    if lam.names.len() == lam.arity {
        return lam.names.clone();
    }
    let mut taken = FxHashSet::default();
    collect_names(&lam.body, &mut taken);
    let mut out = Vec::with_capacity(lam.arity);
    let mut k = 1usize;
    while out.len() < lam.arity {
        let candidate = format!("x{k}");
        k += 1;
        if !taken.contains(&candidate) {
            out.push(VarBind::from_string(&candidate));
        }
    }
    out
}

/// Every name that decoding the subtree could produce a symbol for.
fn collect_names(exp: &Exp, out: &mut FxHashSet<String>) {
    match exp {
        Exp::Sym(sym) => {
            if !sym.meta {
                out.insert(sym.name.clone());
            }
        }
        Exp::Var(var) => {
            if let Some(name) = &var.name {
                out.insert(name.id.clone());
            }
        }
        Exp::App(app) => app.children.iter().for_each(|c| collect_names(c, out)),
        Exp::Bind(bind) => {
            bind.vars.iter().for_each(|v| {
                out.insert(v.id.clone());
            });
            collect_names(&bind.body, out);
        }
        Exp::Lam(lam) => {
            lam.names.iter().for_each(|v| {
                out.insert(v.id.clone());
            });
            collect_names(&lam.body, out);
        }
        Exp::Efa(efa) => {
            collect_names(&efa.fun, out);
            efa.args.iter().for_each(|a| collect_names(a, out));
        }
    }
}

// Occurrence counting
//
//

/// How many subtrees of `hay` are structurally equal to `needle`.
///
/// When the traversal passes under a binder the needle's free markers
/// are shifted along, so a position only counts when the subtree denotes
/// the same term relative to the surrounding binder depth.
pub fn occurrences(needle: &Exp, hay: &Exp) -> usize {
    let here = usize::from(needle == hay);
    let below = match hay {
        Exp::Sym(_) | Exp::Var(_) => 0,
        Exp::App(app) => app.children.iter().map(|c| occurrences(needle, c)).sum(),
        Exp::Bind(bind) => occurrences(needle, &bind.body),
        Exp::Lam(lam) => {
            let lifted = shift_and_clone(needle, 1);
            occurrences(&lifted, &lam.body)
        }
        Exp::Efa(efa) => {
            occurrences(needle, &efa.fun)
                + efa.args.iter().map(|a| occurrences(needle, a)).sum::<usize>()
        }
    };
    here + below
}

/// The deepest binder nesting at which the metavariable `name` occurs,
/// or `None` when it does not occur at all.
pub fn metavar_depth(exp: &Exp, name: &str) -> Option<usize> {
    fn go(exp: &Exp, name: &str, depth: usize) -> Option<usize> {
        match exp {
            Exp::Sym(sym) => (sym.meta && sym.name == name).then_some(depth),
            Exp::Var(_) => None,
            Exp::App(app) => app.children.iter().filter_map(|c| go(c, name, depth)).max(),
            Exp::Bind(bind) => go(&bind.body, name, depth),
            Exp::Lam(lam) => {
                let head = (lam.head.meta && lam.head.name == name).then_some(depth);
                let body = go(&lam.body, name, depth + 1);
                head.into_iter().chain(body).max()
            }
            Exp::Efa(efa) => go(&efa.fun, name, depth)
                .into_iter()
                .chain(efa.args.iter().filter_map(|a| go(a, name, depth)))
                .max(),
        }
    }
    go(exp, name, 0)
}

/// Whether `replacement` can be plugged in for every occurrence of the
/// metavariable `name` in `target` without any of its free markers being
/// captured by a binder of `target`.
pub fn is_free_to_replace(replacement: &Exp, name: &str, target: &Exp) -> bool {
    match (replacement.min_free_excess(), metavar_depth(target, name)) {
        (Some(excess), Some(depth)) => depth <= excess,
        _ => true,
    }
}

// β-reduction
//
//

/// Contract the application of an encoded λ-abstraction to `args`.
///
/// Markers addressing the eliminated binder are replaced by the
/// corresponding argument (shifted past the binders between the redex
/// and the occurrence); markers pointing past it move down one level.
pub fn beta_reduce(lam: &Lam, args: &[Exp]) -> Exp {
    open(&lam.body, args, 0)
}

fn open(exp: &Exp, args: &[Exp], depth: usize) -> Exp {
    match exp {
        Exp::Sym(_) => exp.clone(),
        Exp::Var(var) => {
            let Idx { fst, snd } = var.idx;
            if fst == depth {
                match args.get(snd) {
                    Some(arg) => shift_and_clone(arg, depth as isize),
                    // Cannot happen on encoded input; keep the marker.
                    None => exp.clone(),
                }
            } else if fst > depth {
                Exp::Var(Var { idx: Idx { fst: fst - 1, snd }, name: var.name.clone() })
            } else {
                exp.clone()
            }
        }
        Exp::App(app) => {
            Exp::App(App { children: app.children.iter().map(|c| open(c, args, depth)).collect() })
        }
        Exp::Bind(bind) => Exp::Bind(Bind {
            head: bind.head.clone(),
            vars: bind.vars.clone(),
            body: Box::new(open(&bind.body, args, depth)),
        }),
        Exp::Lam(lam) => {
            Exp::Lam(Lam { body: Box::new(open(&lam.body, args, depth + 1)), ..lam.clone() })
        }
        Exp::Efa(efa) => Efa::contracted(
            open(&efa.fun, args, depth),
            efa.args.iter().map(|a| open(a, args, depth)).collect(),
        ),
    }
}
