mod check;
mod resolve;
mod swap;

pub use check::*;
pub use resolve::*;
pub use swap::*;
