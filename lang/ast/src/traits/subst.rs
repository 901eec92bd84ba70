use fxhash::FxHashMap;

use crate::exp::Exp;

// Substitution
//
//

/// Trait for entities which can be used as a substitution.
///
/// A substitution maps metavariable names to replacement expressions.
/// Anything that can be queried this way — a single assignment, a whole
/// solution — can be applied to syntax nodes.
pub trait Substitution {
    fn get_subst(&self, name: &str) -> Option<&Exp>;
}

impl Substitution for FxHashMap<String, Exp> {
    fn get_subst(&self, name: &str) -> Option<&Exp> {
        self.get(name)
    }
}

// Substitutable
//
//

/// A trait for all entities to which a substitution can be applied.
///
/// The result type is parameterized because substituting for a
/// metavariable does not, in general, yield the same shape of node: a
/// symbol can become an arbitrary expression, and an expression function
/// application can contract to its β-reduct.
pub trait Substitutable: Sized {
    type Target;
    fn subst<S: Substitution>(&self, by: &S) -> Self::Target;
}

impl<T: Substitutable> Substitutable for Option<T> {
    type Target = Option<T::Target>;
    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        self.as_ref().map(|x| x.subst(by))
    }
}

impl<T: Substitutable> Substitutable for Vec<T> {
    type Target = Vec<T::Target>;
    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        self.iter().map(|x| x.subst(by)).collect()
    }
}

impl<T: Substitutable> Substitutable for Box<T> {
    type Target = Box<T::Target>;
    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        Box::new((**self).subst(by))
    }
}
