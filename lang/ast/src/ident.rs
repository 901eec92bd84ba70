use std::fmt;

use pretty::DocAllocator;
use printer::tokens::{AT, DOT};
use printer::{Alloc, Builder, Print, PrintCfg};

// Local variables (binding site)
//
//

/// A variable name at its binding site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarBind {
    pub id: String,
}

impl VarBind {
    pub fn from_string(id: &str) -> Self {
        VarBind { id: id.to_owned() }
    }
}

impl fmt::Display for VarBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Print for VarBind {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        alloc.text(&self.id)
    }
}

// Two-level de Bruijn indices
//
//

/// Two-level de Bruijn index.
///
/// Every binder in this syntax binds a whole list of variables at once, so
/// a bound occurrence is addressed by two numbers: `fst` counts the
/// binders between the occurrence and the binder it originated from, and
/// `snd` is the position of the variable within that binder's list.
///
/// ```text
///  snd:                       0 1
///      (∀ a, b . (∃ c, d . ...))   occurrence of c has Idx { fst: 0, snd: 0 }
///                                  occurrence of b has Idx { fst: 1, snd: 1 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Idx {
    pub fst: usize,
    pub snd: usize,
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.fst, self.snd)
    }
}

impl Print for Idx {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Idx { fst, snd } = self;
        alloc.text(AT).append(format!("{fst}")).append(DOT).append(format!("{snd}"))
    }
}
