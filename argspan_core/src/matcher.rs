mod api;
mod core;
mod model;
mod split;
mod token;

pub use self::api::{ArgSpec, OptionConfig, PositionalConfig, SpecId};
pub use self::split::Splitter;

pub(crate) use self::api::{longest, Specs};
pub(crate) use self::core::Interpreter;
pub(crate) use self::split::split_value;
