mod base;
mod interface;
mod middleware;
mod result;
mod trace;

pub use base::{ConfigError, ErrorKind, ParseError};
pub use middleware::CommandLine;
pub use result::{Binding, BoundValue, Origin, ParseResult, RawValue};

pub(crate) use interface::{ConsoleInterface, ErrorContext, UserInterface};
pub(crate) use result::{missing_parameters, split_map_entry, Binder};
pub(crate) use trace::Tracer;

#[cfg(test)]
pub(crate) use interface::util;
