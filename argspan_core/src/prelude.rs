//! Traits which, typically, may be imported without concern: `use argspan::prelude::*`.

/// The capabilities shared by options and positional parameters (ex: [`ArgSpec::describe`]).
// Needs to be imported in order to inspect a `CommandLine`'s parameters.
pub use crate::matcher::ArgSpec;
