mod language;
mod upload;

pub use language::*;
pub use upload::*;
