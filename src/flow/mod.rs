pub mod config;
pub mod groups;
pub mod snapshot;
pub mod store;

pub use config::*;
pub use groups::*;
pub use store::*;
