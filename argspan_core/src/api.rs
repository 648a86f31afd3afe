mod config;
mod core;
mod spec;

pub use self::core::*;
pub use config::*;
pub use spec::*;
