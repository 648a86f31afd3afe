//! `argspan` is a command line parser for Rust which resolves tokens by *arity*.
//!
//! Each parameter declares how many values it takes per occurrence as a [`Range`] (ex: `1`, `1..3`, `0..*`).
//! The parser walks the command line once, deciding for every token which parameter consumes it.
//! `argspan` does not populate your program variables; instead it produces a [`ParseResult`] of typed values per
//! parameter, plus the tokens nothing consumed.
//!
//! # Usage
//! Declare a [`CommandSpec`] with [`OptionSpec`]s and [`PositionalParamSpec`]s, build it into a [`CommandLine`], and
//! parse.
//!
//! ```
//! use argspan::{CommandSpec, OptionSpec, PositionalParamSpec, TargetShape, ValueType};
//!
//! let command_line = CommandSpec::new("summer")
//!     .option(OptionSpec::new(["-v", "--verbose"], TargetShape::Scalar(ValueType::Boolean)))
//!     .positional(
//!         PositionalParamSpec::new("items", TargetShape::List(ValueType::Integer))
//!             .arity("1..*")
//!             .label("ITEM"),
//!     )
//!     .build();
//!
//! let result = command_line.parse_args(&["-v", "1", "2", "3"]).unwrap();
//! let sum: i64 = result
//!     .get("items")
//!     .unwrap()
//!     .value()
//!     .and_then(|value| value.as_list())
//!     .unwrap()
//!     .iter()
//!     .filter_map(|item| item.as_integer())
//!     .sum();
//! assert_eq!(sum, 6);
//! assert!(result.has("--verbose"));
//! ```
//!
//! [`CommandLine::parse`] reads the Cli [`std::env::args`] instead, printing any error with the offending token:
//! ```console
//! $ summer 1 blah
//! Invalid value for positional parameter at index 0..* (ITEM): 'blah' is not an integer
//! 1 blah
//!   ^
//! ```
//!
//! # Cli Semantics
//! * Options are matched by name (`--file`, `-f`).
//! Once matched, the option takes values from the subsequent tokens, up to its arity maximum.
//! Consumption stops early at the end of input, at the `--` delimiter, or at another known option.
//! * An option value may be attached with the separator: `--file=a.txt` is equivalent to `--file a.txt`.
//! An attached value counts as the first value of the occurrence.
//! * Single character short options may be clustered: `-abc` is equivalent to `-a -b -c`.
//! The first option in the cluster which takes a value consumes the rest of the token (`-vfFILE` is `-v -f FILE`).
//! * Any other token is a value for the positional parameters.
//! Every positional parameter whose index covers the current position takes its values from the same tokens.
//! * The first `--` ends option processing; every later token is positional, including further `--`.
//! * Boolean options without an explicit arity are flags.
//! A flag may still be given an attached literal (`--verbose=false`), unless its arity `0` was set explicitly.
//! With an arity of `0..1` they take a following `true`/`false` literal when one is present.
//! * With a split regex, each value is further split into several values.
//! Quoted regions (`"a,b"`) are never split, unless [`ParserConfiguration::split_quoted_strings`] is set.
//! * Map values are `KEY=VALUE` entries.
//!
//! ### Defaults & Fallbacks
//! * A *default value* is bound when the parameter is absent from the command line.
//! * A *fallback value* is bound when an option with an optional value appears without one.
//!
//! ```
//! use argspan::{CommandSpec, Origin, OptionSpec, TargetShape, ValueType};
//!
//! let command_line = CommandSpec::new("program")
//!     .option(
//!         OptionSpec::new(["--level"], TargetShape::Scalar(ValueType::Text))
//!             .arity("0..1")
//!             .default_value("WARN")
//!             .fallback_value("INFO"),
//!     )
//!     .build();
//!
//! let absent = command_line.parse_args(&[]).unwrap();
//! assert_eq!(absent.get("--level").unwrap().strings(), vec!["WARN"]);
//! assert_eq!(absent.get("--level").unwrap().origin(), Origin::Default);
//!
//! let present = command_line.parse_args(&["--level"]).unwrap();
//! assert_eq!(present.get("--level").unwrap().strings(), vec!["INFO"]);
//! ```
//!
//! ### Errors
//! Parsing stops at the first failure.
//! The [`ParseError`] carries its [`ErrorKind`], the parameters responsible, the offending token position, and the
//! values bound up to the failure.
//!
//! ```
//! use argspan::{CommandSpec, ErrorKind, PositionalParamSpec, TargetShape, ValueType};
//!
//! let command_line = CommandSpec::new("program")
//!     .positional(
//!         PositionalParamSpec::new("params", TargetShape::List(ValueType::Text))
//!             .arity("2..4")
//!             .split(","),
//!     )
//!     .build();
//!
//! let error = command_line.parse_args(&["a,b,c,d,e"]).unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::ArityNotSatisfied);
//! assert_eq!(
//!     error.to_string(),
//!     "positional parameter at index 0..* (<params>) requires at least 2 values, but only 1 were specified: [a,b,c,d,e]"
//! );
//! ```
//!
//! # Configuration
//! The parse policies are toggled on a [`ParserConfiguration`], either for every parse ([`CommandLine::configure`]) or
//! for a single one ([`CommandLine::parse_args_with`]).
//!
//! # Logging
//! Parse decisions are emitted as [`tracing`](https://docs.rs/tracing) events, at the [`TraceLevel`] configured with
//! [`ParserConfiguration::trace`].
//! Nothing is printed unless the application installs a subscriber.
pub use argspan_core::*;
