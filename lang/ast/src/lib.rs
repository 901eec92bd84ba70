pub mod de_bruijn;
pub mod exp;
pub mod ident;
pub mod result;
pub mod traits;

pub use de_bruijn::*;
pub use exp::*;
pub use ident::*;
pub use result::*;
pub use traits::*;
