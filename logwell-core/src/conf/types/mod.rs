mod runtime;
mod spec;

pub use runtime::*;
pub use spec::*;
