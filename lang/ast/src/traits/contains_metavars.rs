use fxhash::FxHashSet;

pub trait ContainsMetaVars {
    /// Whether the expression contains any metavariable
    fn contains_metavars(&self) -> bool;

    /// Record the names of all metavariables occurring in the expression
    fn collect_metavars(&self, out: &mut FxHashSet<String>);
}

impl<T: ContainsMetaVars> ContainsMetaVars for Vec<T> {
    fn contains_metavars(&self) -> bool {
        self.iter().any(|x| x.contains_metavars())
    }

    fn collect_metavars(&self, out: &mut FxHashSet<String>) {
        self.iter().for_each(|x| x.collect_metavars(out))
    }
}

impl<T: ContainsMetaVars> ContainsMetaVars for Box<T> {
    fn contains_metavars(&self) -> bool {
        self.as_ref().contains_metavars()
    }

    fn collect_metavars(&self, out: &mut FxHashSet<String>) {
        self.as_ref().collect_metavars(out)
    }
}

impl<T: ContainsMetaVars> ContainsMetaVars for Option<T> {
    fn contains_metavars(&self) -> bool {
        self.as_ref().is_some_and(|x| x.contains_metavars())
    }

    fn collect_metavars(&self, out: &mut FxHashSet<String>) {
        if let Some(inner) = self.as_ref() {
            inner.collect_metavars(out)
        }
    }
}
