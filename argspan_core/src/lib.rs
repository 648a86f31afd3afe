//! Engine crate for `argspan`.
//! See the `argspan` crate documentation for the command line semantics.
#![deny(missing_docs)]
mod api;
mod constant;
mod matcher;
mod model;
mod parser;
#[allow(missing_docs)]
pub mod prelude;

pub use api::*;
pub use matcher::{OptionConfig, PositionalConfig, SpecId, Splitter};
pub use model::*;
pub use parser::{
    Binding, BoundValue, CommandLine, ConfigError, ErrorKind, Origin, ParseError, ParseResult,
    RawValue,
};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
