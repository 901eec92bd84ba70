use pretty::DocAllocator;
use pretty::termcolor::{Color, ColorSpec};

use super::types::*;

pub trait ThemeExt<'a> {
    fn metavar(&'a self, text: String) -> Builder<'a>;
    fn marker(&'a self, text: String) -> Builder<'a>;
}

impl<'a> ThemeExt<'a> for Alloc<'a> {
    fn metavar(&'a self, text: String) -> Builder<'a> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Magenta));
        self.text(text).annotate(spec)
    }

    fn marker(&'a self, text: String) -> Builder<'a> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Cyan));
        self.text(text).annotate(spec)
    }
}
