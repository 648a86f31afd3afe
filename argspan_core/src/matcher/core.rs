use std::cmp::max;

use crate::api::ParserConfiguration;
use crate::constant::*;
use crate::matcher::api::*;
use crate::matcher::model::*;
use crate::matcher::split::{split_value, unquote};
use crate::matcher::token::{TokenClass, TokenClassifier};
use crate::model::{parse_boolean, ParameterClass, Range};
use crate::parser::{missing_parameters, Binder, ErrorKind, ParseError, RawValue, Tracer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    PositionalOnly,
}

/// A short option peeled from a cluster.
/// The last one peeled may take the remainder of the token as its value.
struct Peeled<'t> {
    id: usize,
    short: char,
    value: Option<&'t str>,
    last: bool,
}

/// Walks the tokens left to right, deciding which parameter consumes each of them.
pub(crate) struct Interpreter<'s> {
    specs: &'s Specs,
    config: &'s ParserConfiguration,
    classifier: TokenClassifier<'s>,
    tracer: Tracer,
    tokens: Vec<RawValue>,
    cursor: usize,
    position: usize,
    state: State,
    delimiter_seen: bool,
}

impl<'s> Interpreter<'s> {
    pub(crate) fn new(
        specs: &'s Specs,
        config: &'s ParserConfiguration,
        tracer: Tracer,
        tokens: &[&str],
    ) -> Self {
        Self {
            specs,
            config,
            classifier: TokenClassifier::new(specs, config),
            tracer,
            tokens: tokens
                .iter()
                .enumerate()
                .map(|(i, token)| RawValue::new(i, *token))
                .collect(),
            cursor: 0,
            position: 0,
            state: State::Scanning,
            delimiter_seen: false,
        }
    }

    pub(crate) fn run(mut self, binder: &mut Binder) -> Result<(), ParseError> {
        while self.cursor < self.tokens.len() {
            let token = self.tokens[self.cursor].clone();
            self.tracer.debug(|| {
                format!(
                    "Processing argument '{}' at index {} ({:?}).",
                    token.text(),
                    token.position(),
                    self.state
                )
            });

            if !self.delimiter_seen && token.text() == self.config.get_end_of_options_delimiter() {
                self.tracer.info(|| {
                    format!(
                        "Found end-of-options delimiter '{}'; treating the remainder as positional parameters.",
                        token.text()
                    )
                });
                self.delimiter_seen = true;
                self.state = State::PositionalOnly;
                binder.consume(token.position());
                self.cursor += 1;
                continue;
            }

            if self.state == State::PositionalOnly {
                self.process_positional(binder)?;
                continue;
            }

            match self.classifier.classify(token.text()) {
                TokenClass::Option(id) => {
                    self.cursor += 1;
                    binder.consume(token.position());
                    self.process_option(binder, id, token.text(), None, token.position())?;
                }
                TokenClass::Attached { id, name, value } => {
                    self.cursor += 1;
                    binder.consume(token.position());
                    let attached = RawValue::new(token.position(), value);
                    self.process_option(binder, id, name, Some(attached), token.position())?;
                }
                TokenClass::Cluster => {
                    self.cursor += 1;
                    self.process_cluster(binder, &token)?;
                }
                TokenClass::UnknownOption => {
                    self.cursor += 1;
                    let message = format!("Unknown option: '{}'", token.text());
                    self.unmatched(binder, token, ErrorKind::UnknownOption, message)?;
                }
                TokenClass::Value => {
                    self.process_positional(binder)?;

                    if self.config.is_stop_at_positional() {
                        self.tracer.info(|| {
                            "Positional parameter found; treating the remainder as positional parameters."
                                .to_string()
                        });
                        self.state = State::PositionalOnly;
                    }
                }
            }
        }

        Ok(())
    }

    fn process_option(
        &mut self,
        binder: &mut Binder,
        id: usize,
        name: &str,
        attached: Option<RawValue>,
        position: usize,
    ) -> Result<(), ParseError> {
        let option = self.specs.option(id);
        let mut arity = option.arity().clone();
        self.tracer.debug(|| {
            format!(
                "Found option '{name}' with arity {arity} (type arity {}).",
                option.type_arity()
            )
        });

        if let Some(value) = &attached {
            if arity.max() == 0 {
                if !arity.is_unspecified() {
                    return Err(ParseError::new(
                        ErrorKind::UnexpectedValue,
                        format!(
                            "option '{name}' should be specified without '{}' parameter",
                            value.text()
                        ),
                    )
                    .with_spec(option.id())
                    .at_position(position)
                    .with_values(vec![value.text().to_string()]));
                }

                // A flag with its default arity takes the attached boolean literal (ex: `--verbose=false`).
                arity = Range::fixed(1);
            } else if self.config.is_arity_satisfied_by_attached_option_param() {
                arity = arity.with_min(1);
            } else {
                arity = arity.with_min(max(1, arity.min()));
            }
        }

        let mut buffer = MatchBuffer::new(option, name, arity, position);

        if let Some(value) = attached {
            buffer.attach(value);
        }

        let followers = self.apply(binder, buffer, self.cursor)?;
        self.cursor += followers;
        Ok(())
    }

    fn process_cluster(&mut self, binder: &mut Binder, token: &RawValue) -> Result<(), ParseError> {
        let text = token.text();
        let position = token.position();
        let peeled = match self.peel(text) {
            Ok(peeled) => peeled,
            Err((short, first)) => {
                let message = if first {
                    format!("Unknown option: '{text}'")
                } else {
                    format!("Unknown option: '-{short}' (while processing option: '{text}')")
                };
                return self.unmatched(binder, token.clone(), ErrorKind::UnknownOption, message);
            }
        };
        binder.consume(position);

        for Peeled {
            id,
            short,
            value,
            last,
        } in peeled
        {
            let name = format!("-{short}");

            if last {
                let attached = value.map(|value| RawValue::new(position, value));
                return self.process_option(binder, id, &name, attached, position);
            }

            // A flag, or an optional boolean without a literal: bind it and keep peeling.
            let option = self.specs.option(id);
            let buffer = MatchBuffer::new(option, name, option.arity().clone(), position);
            self.apply(binder, buffer, self.tokens.len())?;
        }

        Ok(())
    }

    /// Split a cluster into its short options without binding any of them.
    /// Fails with the first character that is not a short option, and whether it leads the cluster.
    fn peel<'t>(&self, text: &'t str) -> Result<Vec<Peeled<'t>>, (char, bool)> {
        let separator = self.config.get_separator();
        let mut peeled: Vec<Peeled<'t>> = Vec::default();
        let mut rest = &text[1..];

        while let Some(short) = rest.chars().next() {
            let id = self
                .specs
                .find_short(short)
                .ok_or((short, peeled.is_empty()))?;
            rest = &rest[short.len_utf8()..];
            let option = self.specs.option(id);
            let attached = if separator.is_empty() {
                None
            } else {
                rest.strip_prefix(separator)
            };

            if attached.is_some() || rest.is_empty() {
                peeled.push(Peeled {
                    id,
                    short,
                    value: attached,
                    last: true,
                });
                break;
            }

            let arity = option.arity();
            let optional_boolean = option.shape().is_boolean() && arity.min() == 0;

            if arity.max() > 0 && !(optional_boolean && parse_boolean(rest).is_none()) {
                // The remainder of the cluster is this option's value (ex: `-fFILE`).
                peeled.push(Peeled {
                    id,
                    short,
                    value: Some(rest),
                    last: true,
                });
                break;
            }

            peeled.push(Peeled {
                id,
                short,
                value: None,
                last: false,
            });
        }

        Ok(peeled)
    }

    fn process_positional(&mut self, binder: &mut Binder) -> Result<(), ParseError> {
        let start = self.cursor;
        let position = self.position;
        let mut followers = 0;

        for positional in self.specs.positionals() {
            if !positional.index().contains(position) {
                continue;
            }

            self.tracer.debug(|| {
                format!(
                    "Position {position} is claimed by {} (type arity {}).",
                    positional.describe(0),
                    positional.type_arity()
                )
            });
            let buffer = MatchBuffer::new(
                positional,
                positional.name(),
                positional.arity().clone(),
                self.tokens[start].position(),
            );
            followers = max(followers, self.apply(binder, buffer, start)?);
        }

        if followers == 0 {
            let token = self.tokens[start].clone();
            self.cursor += 1;
            let message = format!(
                "Unmatched argument at index {}: '{}'",
                token.position(),
                token.text()
            );
            self.unmatched(binder, token, ErrorKind::UnmatchedArgument, message)
        } else {
            self.cursor += followers;
            self.position += followers;
            Ok(())
        }
    }

    /// Fill the buffer from the tokens at `start` onwards and bind it.
    /// Returns how many of those tokens were consumed.
    fn apply(
        &self,
        binder: &mut Binder,
        mut buffer: MatchBuffer,
        start: usize,
    ) -> Result<usize, ParseError> {
        let spec = buffer.spec();
        let optional_boolean = spec.shape().is_boolean() && buffer.arity().min() == 0;
        let mut stopped_by = None;
        let mut index = start;

        while buffer.is_open() && index < self.tokens.len() {
            let candidate = &self.tokens[index];

            if !self.can_consume(spec, candidate.text())
                || (optional_boolean && parse_boolean(self.unquoted(candidate.text())).is_none())
            {
                stopped_by = Some(candidate);
                break;
            }

            buffer.push(candidate.clone());
            index += 1;
        }

        let followers = buffer.followers();
        let arity = buffer.arity().clone();
        let name = buffer.name().to_string();
        let position = buffer.position();
        let raw = buffer
            .close()
            .map_err(|error| self.missing(binder, spec, &name, position, error, stopped_by))?;

        let values = if raw.is_empty() {
            match self.fallback(spec) {
                Some(fallback) => fallback
                    .into_iter()
                    .map(|value| RawValue::new(position, value))
                    .collect(),
                None if spec.class() == ParameterClass::Pos => return Ok(0),
                None => Vec::default(),
            }
        } else {
            let splitter = if spec.is_multi_value() {
                spec.splitter()
            } else {
                None
            };
            let mut values = Vec::default();

            for (i, value) in raw.iter().enumerate() {
                for part in split_value(value.text(), splitter, self.config, &arity, i, &self.tracer) {
                    values.push(RawValue::new(value.position(), part));
                }
            }

            values
        };

        binder.bind(spec.id(), raw, values)?;
        Ok(followers)
    }

    fn can_consume(&self, spec: &dyn ArgSpec, token: &str) -> bool {
        if !self.delimiter_seen && token == self.config.get_end_of_options_delimiter() {
            return false;
        }

        match spec.class() {
            ParameterClass::Pos => {
                self.state == State::PositionalOnly
                    || !self.classifier.is_option(token, self.delimiter_seen)
            }
            ParameterClass::Opt => {
                self.config.is_allow_options_as_option_parameters()
                    || !self.classifier.is_option(token, self.delimiter_seen)
            }
        }
    }

    fn unquoted<'t>(&self, token: &'t str) -> &'t str {
        if self.config.is_trim_quotes() {
            unquote(token)
        } else {
            token
        }
    }

    /// The values bound when an occurrence receives none.
    fn fallback(&self, spec: &dyn ArgSpec) -> Option<Vec<String>> {
        if spec.class() == ParameterClass::Pos {
            return None;
        }

        match spec.fallback_value() {
            Some(fallback) if spec.is_multi_value() => Some(split_value(
                fallback,
                spec.splitter(),
                self.config,
                spec.arity(),
                0,
                &self.tracer,
            )),
            Some(fallback) => Some(vec![fallback.to_string()]),
            None if spec.shape().is_boolean() => Some(vec![BOOLEAN_FALLBACK.to_string()]),
            None if spec.is_multi_value() => None,
            None => Some(vec![TEXT_FALLBACK.to_string()]),
        }
    }

    fn missing(
        &self,
        binder: &Binder,
        spec: &dyn ArgSpec,
        name: &str,
        position: usize,
        error: CloseError,
        stopped_by: Option<&RawValue>,
    ) -> ParseError {
        let CloseError::TooFewValues { provided, expected } = error;
        let texts: Vec<String> = provided.iter().map(|value| value.text().to_string()).collect();
        let position = stopped_by.map_or(position, RawValue::position);

        let error = if !provided.is_empty() {
            ParseError::new(
                ErrorKind::ArityNotSatisfied,
                format!(
                    "{} requires at least {expected} values, but only {} were specified: [{}]",
                    spec.describe(0),
                    provided.len(),
                    texts.join(", ")
                ),
            )
            .with_spec(spec.id())
        } else if expected > 1 {
            ParseError::new(
                ErrorKind::MissingRequiredValue,
                format!(
                    "{} requires at least {expected} values, but none were specified.",
                    spec.describe(0)
                ),
            )
            .with_spec(spec.id())
        } else {
            match spec.class() {
                ParameterClass::Opt => match stopped_by {
                    Some(token)
                        if token.text() != self.config.get_end_of_options_delimiter() =>
                    {
                        ParseError::new(
                            ErrorKind::MissingRequiredValue,
                            format!(
                                "Expected parameter for option '{name}' but found '{}'",
                                token.text()
                            ),
                        )
                        .with_spec(spec.id())
                    }
                    _ => ParseError::new(
                        ErrorKind::MissingRequiredValue,
                        format!("Missing required parameter for {}", spec.describe(0)),
                    )
                    .with_spec(spec.id()),
                },
                ParameterClass::Pos => self.missing_positionals(binder, spec),
            }
        };

        error.with_values(texts).at_position(position)
    }

    /// The required positional parameters still unmatched, from this one's index on.
    fn missing_positionals(&self, binder: &Binder, spec: &dyn ArgSpec) -> ParseError {
        let from = match spec.id() {
            SpecId::Positional(id) => self.specs.positional(id).index().min(),
            SpecId::Option(_) => unreachable!("internal error - options are not positional"),
        };
        let missing: Vec<&dyn ArgSpec> = self
            .specs
            .positionals()
            .iter()
            .filter(|positional| {
                positional.id() == spec.id()
                    || (positional.is_required()
                        && positional.index().min() >= from
                        && !binder.is_matched(positional.id()))
            })
            .map(|positional| positional as &dyn ArgSpec)
            .collect();
        missing_parameters(&missing)
    }

    fn unmatched(
        &self,
        binder: &mut Binder,
        token: RawValue,
        kind: ErrorKind,
        message: String,
    ) -> Result<(), ParseError> {
        if self.config.is_unmatched_arguments_allowed() {
            self.tracer.debug(|| format!("{message}; continuing."));
            binder.unmatched(token);
            Ok(())
        } else {
            Err(ParseError::new(kind, message)
                .at_position(token.position())
                .with_values(vec![token.text().to_string()]))
        }
    }
}
