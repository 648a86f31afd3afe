use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};

use crate::api::ParserConfiguration;
use crate::constant::*;
use crate::matcher::{split_value, ArgSpec, SpecId, Specs};
use crate::model::{MapOrdering, TargetShape, Value, ValueType};
use crate::parser::{ErrorKind, ParseError, Tracer};

/// Where a bound value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The parameter appeared on the command line.
    CommandLine,
    /// The parameter was absent and its default value was bound.
    Default,
}

/// A token (or attached value) of the command line, with the index of the token it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawValue {
    position: usize,
    text: String,
}

impl RawValue {
    pub(crate) fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }

    /// The index of the command line token.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The converted value(s) of a parameter, by target shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    /// The most recent value.
    Scalar(Value),
    /// Every value, in order.
    List(Vec<Value>),
    /// Every entry, iterating by the map ordering.
    Map(IndexMap<Value, Value>),
}

impl BoundValue {
    fn empty(shape: &TargetShape) -> Option<Self> {
        match shape {
            TargetShape::Scalar(_) => None,
            TargetShape::List(_) => Some(BoundValue::List(Vec::default())),
            TargetShape::Map { .. } => Some(BoundValue::Map(IndexMap::default())),
        }
    }

    /// The scalar value.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            BoundValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The list values.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            BoundValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// The map entries.
    pub fn as_map(&self) -> Option<&IndexMap<Value, Value>> {
        match self {
            BoundValue::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

/// The outcome for one matched parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    spec: SpecId,
    raw: Vec<RawValue>,
    value: Option<BoundValue>,
    origin: Origin,
    occurrences: usize,
}

impl Binding {
    /// The parameter.
    pub fn spec(&self) -> SpecId {
        self.spec
    }

    /// The command line tokens bound, in order.
    pub fn raw(&self) -> &[RawValue] {
        &self.raw
    }

    /// The converted value(s).
    /// Absent only for a scalar which was matched without receiving a value.
    pub fn value(&self) -> Option<&BoundValue> {
        self.value.as_ref()
    }

    /// Where the value came from.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// How many times the parameter was matched.
    pub fn occurrences(&self) -> usize {
        self.occurrences
    }

    /// The values rendered as text: one per scalar/list value, `key=value` per map entry.
    pub fn strings(&self) -> Vec<String> {
        match &self.value {
            None => Vec::default(),
            Some(BoundValue::Scalar(value)) => vec![value.to_string()],
            Some(BoundValue::List(values)) => values.iter().map(Value::to_string).collect(),
            Some(BoundValue::Map(entries)) => entries
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect(),
        }
    }
}

/// The outcome of a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    names: HashMap<String, SpecId>,
    bindings: IndexMap<SpecId, Binding>,
    unmatched: Vec<RawValue>,
    consumed: BTreeSet<usize>,
}

impl ParseResult {
    /// The binding of a parameter, by option name or positional name.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.names
            .get(name)
            .and_then(|id| self.bindings.get(id))
    }

    /// The binding of a parameter.
    pub fn binding(&self, id: SpecId) -> Option<&Binding> {
        self.bindings.get(&id)
    }

    /// Whether the parameter appeared on the command line.
    pub fn has(&self, name: &str) -> bool {
        self.get(name)
            .map_or(false, |binding| binding.origin == Origin::CommandLine)
    }

    /// Every binding, in match order (defaults last).
    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }

    /// The tokens no parameter consumed, in order.
    pub fn unmatched(&self) -> &[RawValue] {
        &self.unmatched
    }

    /// The text of [`ParseResult::unmatched`].
    pub fn unmatched_strings(&self) -> Vec<&str> {
        self.unmatched.iter().map(RawValue::text).collect()
    }

    /// The indexes of the tokens consumed by parameters or delimiters, ascending.
    pub fn consumed(&self) -> Vec<usize> {
        self.consumed.iter().copied().collect()
    }
}

/// Accumulates the values of a single parse.
pub(crate) struct Binder<'s> {
    specs: &'s Specs,
    config: &'s ParserConfiguration,
    tracer: Tracer,
    bindings: IndexMap<SpecId, Binding>,
    unmatched: Vec<RawValue>,
    consumed: BTreeSet<usize>,
}

impl<'s> Binder<'s> {
    pub(crate) fn new(specs: &'s Specs, config: &'s ParserConfiguration, tracer: Tracer) -> Self {
        Self {
            specs,
            config,
            tracer,
            bindings: IndexMap::default(),
            unmatched: Vec::default(),
            consumed: BTreeSet::default(),
        }
    }

    pub(crate) fn consume(&mut self, position: usize) {
        self.consumed.insert(position);
    }

    pub(crate) fn unmatched(&mut self, value: RawValue) {
        self.tracer
            .debug(|| format!("Recording unmatched argument '{}'.", value.text()));
        self.unmatched.push(value);
    }

    pub(crate) fn is_matched(&self, id: SpecId) -> bool {
        self.bindings.contains_key(&id)
    }

    /// Bind one occurrence of a parameter.
    /// `values` are the logical values (already split), each with the index of its token.
    pub(crate) fn bind(
        &mut self,
        id: SpecId,
        raw: Vec<RawValue>,
        values: Vec<RawValue>,
    ) -> Result<(), ParseError> {
        for value in raw.iter() {
            self.consume(value.position());
        }

        let specs = self.specs;
        let spec = specs.spec(id);

        if !spec.is_multi_value()
            && self.bindings.contains_key(&id)
            && !self.config.is_overwritten_options_allowed()
        {
            return Err(ParseError::new(
                ErrorKind::OverwrittenSingleValue,
                format!("{} should be specified only once", spec.describe(0)),
            )
            .with_spec(id)
            .with_values(raw.into_iter().map(|value| value.text).collect()));
        }

        self.accumulate(id, raw, values, Origin::CommandLine)
    }

    fn accumulate(
        &mut self,
        id: SpecId,
        raw: Vec<RawValue>,
        values: Vec<RawValue>,
        origin: Origin,
    ) -> Result<(), ParseError> {
        let specs = self.specs;
        let spec = specs.spec(id);
        let binding = self.bindings.entry(id).or_insert_with(|| Binding {
            spec: id,
            raw: Vec::default(),
            value: BoundValue::empty(spec.shape()),
            origin,
            occurrences: 0,
        });
        binding.occurrences += 1;
        binding.raw.extend(raw);

        match *spec.shape() {
            TargetShape::Scalar(value_type) => {
                for (i, value) in values.iter().enumerate() {
                    let converted = convert(spec, i, value, value_type)?;
                    binding.value.replace(BoundValue::Scalar(converted));
                }
            }
            TargetShape::List(value_type) => {
                let mut converted = Vec::default();

                for (i, value) in values.iter().enumerate() {
                    converted.push(convert(spec, i, value, value_type)?);
                }

                match &mut binding.value {
                    Some(BoundValue::List(list)) => list.extend(converted),
                    _ => unreachable!("internal error - a list target must bind a list"),
                }
            }
            TargetShape::Map {
                key,
                value: value_type,
                ordering,
            } => {
                let mut converted = Vec::default();

                for (i, value) in values.iter().enumerate() {
                    let (k, v) = split_map_entry(value.text()).ok_or_else(|| {
                        ParseError::new(
                            ErrorKind::MalformedMapEntry,
                            format!(
                                "Value for {} should be in KEY=VALUE format but was {}",
                                spec.describe(i),
                                value.text()
                            ),
                        )
                        .with_spec(id)
                        .at_position(value.position())
                        .with_values(vec![value.text().to_string()])
                    })?;
                    let k = convert(spec, i, &RawValue::new(value.position(), k), key)?;
                    let v = convert(spec, i, &RawValue::new(value.position(), v), value_type)?;
                    converted.push((k, v));
                }

                match &mut binding.value {
                    Some(BoundValue::Map(entries)) => {
                        entries.extend(converted);

                        if ordering == MapOrdering::Natural {
                            entries.sort_keys();
                        }
                    }
                    _ => unreachable!("internal error - a map target must bind a map"),
                }
            }
        }

        self.tracer.debug(|| {
            format!(
                "Bound {} to {:?}.",
                spec.describe(0),
                self.bindings.get(&id).and_then(|binding| binding.value.as_ref())
            )
        });
        Ok(())
    }

    /// Fail on absent required parameters, then bind the default values of every other absent parameter.
    pub(crate) fn complete(&mut self) -> Result<(), ParseError> {
        let missing_options: Vec<_> = self
            .specs
            .options()
            .iter()
            .filter(|option| option.is_required() && !self.is_matched(option.id()))
            .collect();

        if !missing_options.is_empty() {
            let synopses: Vec<String> = missing_options
                .iter()
                .map(|option| format!("'{}'", option.synopsis()))
                .collect();
            return Err(ParseError::new(
                ErrorKind::MissingRequiredOption,
                format!(
                    "Missing required option{}: {}",
                    if synopses.len() == 1 { "" } else { "s" },
                    synopses.join(", ")
                ),
            )
            .with_specs(missing_options.iter().map(|option| option.id())));
        }

        let missing_positionals: Vec<&dyn ArgSpec> = self
            .specs
            .positionals()
            .iter()
            .filter(|positional| positional.is_required() && !self.is_matched(positional.id()))
            .map(|positional| positional as &dyn ArgSpec)
            .collect();

        if !missing_positionals.is_empty() {
            return Err(missing_parameters(&missing_positionals));
        }

        let absent: Vec<SpecId> = self
            .specs
            .options()
            .iter()
            .map(|option| option.id())
            .chain(self.specs.positionals().iter().map(|p| p.id()))
            .filter(|id| !self.is_matched(*id))
            .collect();

        let specs = self.specs;

        for id in absent {
            let spec = specs.spec(id);

            if let Some(default_value) = spec.default_value() {
                let values = if spec.is_multi_value() {
                    split_value(
                        default_value,
                        spec.splitter(),
                        self.config,
                        spec.arity(),
                        0,
                        &self.tracer,
                    )
                } else {
                    vec![default_value.to_string()]
                };
                self.tracer.debug(|| {
                    format!(
                        "Applying default value '{default_value}' to {}.",
                        spec.describe(0)
                    )
                });
                // Defaults are not tied to a token.
                let values = values
                    .into_iter()
                    .map(|value| RawValue::new(usize::MAX, value))
                    .collect();
                self.accumulate(id, Vec::default(), values, Origin::Default)?;
            }
        }

        Ok(())
    }

    pub(crate) fn finish(self) -> ParseResult {
        let mut names = HashMap::default();

        for option in self.specs.options() {
            for name in option.names() {
                names.insert(name.clone(), option.id());
            }
        }

        for positional in self.specs.positionals() {
            names.insert(positional.name().to_string(), positional.id());
        }

        ParseResult {
            names,
            bindings: self.bindings,
            unmatched: self.unmatched,
            consumed: self.consumed,
        }
    }
}

/// `Missing required parameter: '<a>'` (or the plural) for the given parameters, in order.
pub(crate) fn missing_parameters(specs: &[&dyn ArgSpec]) -> ParseError {
    let labels: Vec<String> = specs
        .iter()
        .map(|spec| format!("'{}'", spec.label()))
        .collect();
    ParseError::new(
        ErrorKind::MissingRequiredValue,
        format!(
            "Missing required parameter{}: {}",
            if labels.len() == 1 { "" } else { "s" },
            labels.join(", ")
        ),
    )
    .with_specs(specs.iter().map(|spec| spec.id()))
}

fn convert(
    spec: &dyn ArgSpec,
    index: usize,
    value: &RawValue,
    value_type: ValueType,
) -> Result<Value, ParseError> {
    Value::convert(value.text(), value_type).map_err(|error| {
        let kind = if value_type == ValueType::Boolean {
            ErrorKind::InvalidBooleanLiteral
        } else {
            ErrorKind::TypeConversion
        };
        let error = ParseError::new(
            kind,
            format!("Invalid value for {}: {error}", spec.describe(index)),
        )
        .with_spec(spec.id())
        .with_values(vec![value.text().to_string()]);

        if value.position() == usize::MAX {
            error
        } else {
            error.at_position(value.position())
        }
    })
}

/// Split a map entry at the first unescaped separator; escaped separators in the key are unescaped.
pub(crate) fn split_map_entry(entry: &str) -> Option<(String, String)> {
    let mut escaping = false;

    for (i, c) in entry.char_indices() {
        match c {
            ESCAPE => escaping = !escaping,
            MAP_ENTRY_SEPARATOR if !escaping => {
                let key = entry[..i].replace("\\=", "=");
                return Some((key, entry[i + 1..].to_string()));
            }
            _ => escaping = false,
        }
    }

    None
}
