use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// The upper bound of an unbounded (`*`) range.
pub const UNBOUNDED: usize = usize::MAX;

/// Error raised when a [`Range`] is declared with invalid bounds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// One of the bounds is below zero.
    #[error("Invalid negative range (min={min}, max={max})")]
    Negative {
        /// The declared lower bound.
        min: i64,
        /// The declared upper bound.
        max: i64,
    },

    /// The upper bound is below the lower bound.
    #[error("Invalid range (min={min}, max={max})")]
    Inverted {
        /// The declared lower bound.
        min: i64,
        /// The declared upper bound.
        max: i64,
    },
}

/// A closed or unbounded interval `[min, max]`.
///
/// Used both as an *arity* (how many tokens a parameter consumes per occurrence) and as a positional *index*
/// (which positions a positional parameter claims).
///
/// ### Example
/// ```
/// # use argspan_core as argspan;
/// use argspan::Range;
///
/// let arity: Range = "1..3".parse().unwrap();
/// assert_eq!(arity.min(), 1);
/// assert_eq!(arity.max(), 3);
/// assert!(arity.contains(2));
/// assert_eq!(arity.to_string(), "1..3");
///
/// let unbounded = Range::value_of("2..*").unwrap();
/// assert!(unbounded.is_variable());
/// assert!(unbounded.overlaps(&arity));
/// ```
#[derive(Debug, Clone)]
pub struct Range {
    min: usize,
    max: usize,
    variable: bool,
    unspecified: bool,
    relative: bool,
    original: String,
}

impl Range {
    /// Create a range, validating the bounds.
    /// When `variable` is set the upper bound is [`UNBOUNDED`] and `max` is only used in error reporting.
    pub fn new(
        min: i64,
        max: i64,
        variable: bool,
        relative: bool,
        original: impl Into<String>,
    ) -> Result<Self, RangeError> {
        if min < 0 || (!variable && max < 0) {
            return Err(RangeError::Negative { min, max });
        }

        if !variable && max < min {
            return Err(RangeError::Inverted { min, max });
        }

        Ok(Self {
            min: min as usize,
            max: if variable { UNBOUNDED } else { max as usize },
            variable,
            unspecified: false,
            relative,
            original: original.into(),
        })
    }

    /// A range matching exactly `n`.
    pub fn fixed(n: usize) -> Self {
        Self {
            min: n,
            max: n,
            variable: false,
            unspecified: false,
            relative: false,
            original: n.to_string(),
        }
    }

    /// A range matching `min` or more.
    pub fn at_least(min: usize) -> Self {
        Self {
            min,
            max: UNBOUNDED,
            variable: true,
            unspecified: false,
            relative: false,
            original: format!("{min}..*"),
        }
    }

    /// Parse a range from its compact notation.
    ///
    /// * `"N"`: exactly `N`.
    /// * `"N..M"`: between `N` and `M`.
    /// * `"N..*"` and `"*"`: `N` (or zero) and more.
    /// * `""`: zero and more.
    /// * `"N+"`: relative to the preceding positional parameter (index ranges only).
    ///
    /// A lower bound that fails to parse defaults to zero (`"..3"` is `0..3`).
    /// An upper bound that fails to parse is unbounded.
    pub fn value_of(range: &str) -> Result<Self, RangeError> {
        let trimmed = range.trim();
        let (text, relative) = match trimmed.strip_suffix('+') {
            Some(rest) => (rest.trim(), true),
            None => (trimmed, false),
        };

        if relative && text.is_empty() {
            return Range::new(0, 0, false, true, trimmed);
        }

        let unspecified = text.is_empty() || text.starts_with("..");
        let (min, max) = match text.find("..") {
            Some(dots) => (
                parse_bound(&text[..dots]).unwrap_or(0),
                parse_bound(&text[dots + 2..]),
            ),
            None => {
                let max = parse_bound(text);
                (max.unwrap_or(0), max)
            }
        };
        let variable = max.is_none();
        let mut out = Range::new(min, max.unwrap_or(0), variable, relative, trimmed)?;
        out.unspecified = unspecified;
        Ok(out)
    }

    /// The default arity of a parameter with the given shape, marked as unspecified.
    ///
    /// Boolean options are flags (`0`), every other scalar takes exactly one value (`1`).
    /// Multi-value options take one value per occurrence (`1`), while multi-value positional parameters take at
    /// most one value per position (`0..1`).
    pub fn default_arity(shape: &TargetShape, class: ParameterClass) -> Self {
        let mut out = match (shape, class) {
            (TargetShape::Scalar(ValueType::Boolean), ParameterClass::Opt) => Range::fixed(0),
            (TargetShape::Scalar(_), _) => Range::fixed(1),
            (_, ParameterClass::Opt) => Range::fixed(1),
            (_, ParameterClass::Pos) => Self {
                min: 0,
                max: 1,
                variable: false,
                unspecified: false,
                relative: false,
                original: "0..1".to_string(),
            },
        };
        out.unspecified = true;
        out
    }

    /// The lower bound.
    pub fn min(&self) -> usize {
        self.min
    }

    /// The upper bound ([`UNBOUNDED`] for variable ranges).
    pub fn max(&self) -> usize {
        self.max
    }

    /// Whether the upper bound is `*`.
    pub fn is_variable(&self) -> bool {
        self.variable
    }

    /// Whether this range was computed as a default rather than written out explicitly.
    pub fn is_unspecified(&self) -> bool {
        self.unspecified
    }

    /// Whether this range is relative to the preceding positional parameter.
    pub fn is_relative(&self) -> bool {
        self.relative
    }

    /// The notation this range was created from.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Whether `value` lies within the closed interval.
    pub fn contains(&self, value: usize) -> bool {
        self.min <= value && value <= self.max
    }

    /// Whether the two closed intervals intersect.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// A copy of this range with the lower bound replaced.
    /// The upper bound is raised to `min` if necessary.
    pub fn with_min(&self, min: usize) -> Range {
        Self {
            min,
            max: std::cmp::max(min, self.max),
            variable: self.variable,
            unspecified: self.unspecified,
            relative: self.relative,
            original: self.original.clone(),
        }
    }

    pub(crate) fn shift(&self, offset: usize) -> Range {
        Self {
            min: self.min.saturating_add(offset),
            max: if self.variable {
                UNBOUNDED
            } else {
                self.max.saturating_add(offset)
            },
            variable: self.variable,
            unspecified: self.unspecified,
            relative: false,
            original: self.original.clone(),
        }
    }
}

fn parse_bound(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

impl FromStr for Range {
    type Err = RangeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Range::value_of(value)
    }
}

impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        self.min == other.min
            && self.max == other.max
            && self.variable == other.variable
            && self.relative == other.relative
    }
}

impl Eq for Range {}

impl Hash for Range {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.min.hash(state);
        self.max.hash(state);
        self.variable.hash(state);
        self.relative.hash(state);
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variable {
            write!(f, "{}..*", self.min)
        } else if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}..{}", self.min, self.max)
        }
    }
}

/// The class of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterClass {
    /// A named option (ex: `--verbose`).
    Opt,
    /// A positional parameter.
    Pos,
}

/// The element type of a parameter's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Any text.
    Text,
    /// Case-insensitive `true` or `false`.
    Boolean,
    /// A signed 64-bit integer.
    Integer,
    /// A 64-bit floating point number.
    Float,
    /// A single character.
    Character,
}

impl ValueType {
    fn description(&self) -> &'static str {
        match self {
            ValueType::Text => "a string",
            ValueType::Boolean => "a boolean",
            ValueType::Integer => "an integer",
            ValueType::Float => "a float",
            ValueType::Character => "a single character",
        }
    }
}

/// Iteration order of a map target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapOrdering {
    /// Entries iterate in the order they were put.
    Insertion,
    /// Entries iterate in the natural order of their keys.
    Natural,
}

/// The shape of the target a parameter binds into.
///
/// Scalars are overwritten on each assignment, lists append, and maps put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetShape {
    /// A single value.
    Scalar(ValueType),
    /// A sequence of values.
    List(ValueType),
    /// `KEY=VALUE` entries.
    Map {
        /// The key type.
        key: ValueType,
        /// The value type.
        value: ValueType,
        /// The iteration order.
        ordering: MapOrdering,
    },
}

impl TargetShape {
    /// An insertion ordered map.
    pub fn map(key: ValueType, value: ValueType) -> Self {
        TargetShape::Map {
            key,
            value,
            ordering: MapOrdering::Insertion,
        }
    }

    /// A map ordered by its keys.
    pub fn sorted_map(key: ValueType, value: ValueType) -> Self {
        TargetShape::Map {
            key,
            value,
            ordering: MapOrdering::Natural,
        }
    }

    /// Whether the target accumulates many values.
    pub fn is_multi_value(&self) -> bool {
        !matches!(self, TargetShape::Scalar(_))
    }

    /// The number of sub-values per logical value (2 for maps: key and value).
    pub fn type_arity(&self) -> usize {
        match self {
            TargetShape::Map { .. } => 2,
            _ => 1,
        }
    }

    /// Whether the (element) values are booleans.
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            TargetShape::Scalar(ValueType::Boolean) | TargetShape::List(ValueType::Boolean)
        )
    }
}

/// Error raised when a token cannot convert to its target type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("'{token}' is not {}", .expected.description())]
pub struct ConversionError {
    token: String,
    expected: ValueType,
}

impl ConversionError {
    /// The token which failed to convert.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The type the token was converted towards.
    pub fn expected(&self) -> ValueType {
        self.expected
    }
}

/// A converted value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Text.
    Text(String),
    /// A boolean.
    Boolean(bool),
    /// An integer.
    Integer(i64),
    /// A float.
    Float(f64),
    /// A character.
    Character(char),
}

impl Value {
    /// Convert a raw token to the value type.
    ///
    /// ### Example
    /// ```
    /// # use argspan_core as argspan;
    /// use argspan::{Value, ValueType};
    ///
    /// assert_eq!(Value::convert("TRUE", ValueType::Boolean).unwrap(), Value::Boolean(true));
    /// assert_eq!(
    ///     Value::convert("abc", ValueType::Integer).unwrap_err().to_string(),
    ///     "'abc' is not an integer"
    /// );
    /// ```
    pub fn convert(token: &str, value_type: ValueType) -> Result<Value, ConversionError> {
        let error = || ConversionError {
            token: token.to_string(),
            expected: value_type,
        };

        match value_type {
            ValueType::Text => Ok(Value::Text(token.to_string())),
            ValueType::Boolean => parse_boolean(token).map(Value::Boolean).ok_or_else(error),
            ValueType::Integer => token
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| error()),
            ValueType::Float => token
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| error()),
            ValueType::Character => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Character(c)),
                    _ => Err(error()),
                }
            }
        }
    }

    /// The text, if this is a [`Value::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The boolean, if this is a [`Value::Boolean`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is a [`Value::Integer`].
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The float, if this is a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The character, if this is a [`Value::Character`].
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Character(c) => Some(*c),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Text(_) => 0,
            Value::Boolean(_) => 1,
            Value::Integer(_) => 2,
            Value::Float(_) => 3,
            Value::Character(_) => 4,
        }
    }
}

/// Case-insensitive `true`/`false`.
pub(crate) fn parse_boolean(token: &str) -> Option<bool> {
    if token.eq_ignore_ascii_case("true") {
        Some(true)
    } else if token.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Character(a), Value::Character(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Text(text) => text.hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Character(c) => c.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{text}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Character(c) => write!(f, "{c}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}
