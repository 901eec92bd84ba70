use pretty::termcolor::ColorSpec;
use pretty::DocAllocator;

use crate::DEFAULT_WIDTH;

pub type Alloc<'a> = pretty::Arena<'a, ColorSpec>;
pub type Builder<'a> = pretty::DocBuilder<'a, Alloc<'a>, ColorSpec>;

/// Operator precedence of the term being printed.
///
/// Used to decide whether a subterm has to be wrapped in parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Arbitrary expressions
    Exp,
    /// Atomic expressions which never need parentheses
    Atom,
}

#[derive(Debug, Clone)]
pub struct PrintCfg {
    /// The width of the output terminal/device
    pub width: usize,
    /// Display bound variables as their two-level de Bruijn markers
    /// instead of their annotated names.
    pub de_bruijn: bool,
}

impl Default for PrintCfg {
    fn default() -> Self {
        Self { width: DEFAULT_WIDTH, de_bruijn: false }
    }
}

pub trait Print {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        self.print_prec(cfg, alloc, Precedence::Exp)
    }

    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        self.print(cfg, alloc)
    }

    /// Render to a string with the de Bruijn representation enabled.
    ///
    /// This is the representation used in trace logs, where the binding
    /// structure matters more than readability.
    fn print_trace(&self) -> String
    where
        Self: Sized,
    {
        let cfg = PrintCfg { de_bruijn: true, ..Default::default() };
        self.print_to_string(Some(&cfg))
    }
}

impl<T: Print> Print for Option<T> {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Some(inner) => inner.print(cfg, alloc),
            None => alloc.nil(),
        }
    }
}

impl<T: Print> Print for Box<T> {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        (**self).print(cfg, alloc)
    }

    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        (**self).print_prec(cfg, alloc, prec)
    }
}

pub trait PrintToString {
    fn print_to_string(&self, cfg: Option<&PrintCfg>) -> String;
}

impl<T: Print> PrintToString for T {
    fn print_to_string(&self, cfg: Option<&PrintCfg>) -> String {
        let alloc = Alloc::new();
        let cfg = cfg.cloned().unwrap_or_default();
        let mut buf = Vec::new();
        {
            let doc_builder = self.print(&cfg, &alloc);
            doc_builder.1.render(cfg.width, &mut buf).expect("Failed to print to string");
        }
        String::from_utf8(buf).expect("Failed to print to string")
    }
}
