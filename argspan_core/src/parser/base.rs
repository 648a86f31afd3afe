use thiserror::Error;

use crate::matcher::SpecId;
use crate::parser::ParseResult;

/// Error for invalid command line declarations (ex: a repeated option name, an invalid arity).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

/// The distinguishable parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No value was available for a parameter that requires at least one.
    MissingRequiredValue,
    /// Some, but fewer than the arity minimum, values were available.
    ArityNotSatisfied,
    /// A single-valued option was specified more than once.
    OverwrittenSingleValue,
    /// A value bound to a boolean is not `true` or `false`.
    InvalidBooleanLiteral,
    /// A value cannot convert to its target type.
    TypeConversion,
    /// A token resembles an option but matches none.
    UnknownOption,
    /// A value was not consumed by any positional parameter.
    UnmatchedArgument,
    /// A value was attached to an option which takes none.
    UnexpectedValue,
    /// A map value lacks the `KEY=VALUE` shape.
    MalformedMapEntry,
    /// A required option is absent.
    MissingRequiredOption,
}

/// Error for a failed parse.
///
/// The message is the exact human-readable diagnostic.
/// The values bound before the failure are kept in [`ParseError::partial`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    kind: ErrorKind,
    message: String,
    specs: Vec<SpecId>,
    position: Option<usize>,
    values: Vec<String>,
    partial: Option<Box<ParseResult>>,
}

impl ParseError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            specs: Vec::default(),
            position: None,
            values: Vec::default(),
            partial: None,
        }
    }

    pub(crate) fn with_spec(mut self, id: SpecId) -> Self {
        self.specs.push(id);
        self
    }

    pub(crate) fn with_specs(mut self, ids: impl IntoIterator<Item = SpecId>) -> Self {
        self.specs.extend(ids);
        self
    }

    pub(crate) fn at_position(mut self, position: usize) -> Self {
        self.position.replace(position);
        self
    }

    pub(crate) fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    pub(crate) fn with_partial(mut self, partial: ParseResult) -> Self {
        self.partial.replace(Box::new(partial));
        self
    }

    /// The kind of failure.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The parameters responsible for the failure.
    pub fn specs(&self) -> &[SpecId] {
        &self.specs
    }

    /// The index of the offending token, if there is one.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// The values collected for the responsible parameter before it failed.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// What was bound before the failure.
    pub fn partial(&self) -> Option<&ParseResult> {
        self.partial.as_deref()
    }
}
