pub mod decision;
pub mod index;
pub mod project;

pub use decision::*;
pub use index::*;
pub use project::*;
