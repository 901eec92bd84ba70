pub mod contains_metavars;
pub mod free_vars;
pub mod shift;
pub mod subst;

pub use contains_metavars::*;
pub use free_vars::*;
pub use shift::*;
pub use subst::*;
