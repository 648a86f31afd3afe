use crate::model::TargetShape;

/// Declaration of a named option.
///
/// Arity, split regex and values are validated when the [`CommandSpec`](crate::CommandSpec) is built.
///
/// ### Example
/// ```
/// # use argspan_core as argspan;
/// use argspan::{OptionSpec, TargetShape, ValueType};
///
/// let files = OptionSpec::new(["-f", "--file"], TargetShape::List(ValueType::Text))
///     .arity("1..*")
///     .split(",")
///     .label("FILE");
/// ```
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub(crate) names: Vec<String>,
    pub(crate) shape: TargetShape,
    pub(crate) arity: Option<String>,
    pub(crate) split: Option<String>,
    pub(crate) label: Option<String>,
    pub(crate) default_value: Option<String>,
    pub(crate) fallback_value: Option<String>,
    pub(crate) required: bool,
}

impl OptionSpec {
    /// Declare an option by its names (ex: `["-v", "--verbose"]`) and target shape.
    pub fn new<I, S>(names: I, shape: TargetShape) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            shape,
            arity: None,
            split: None,
            label: None,
            default_value: None,
            fallback_value: None,
            required: false,
        }
    }

    /// The arity in [`Range`](crate::Range) notation.
    /// Without one, the arity defaults from the target shape.
    pub fn arity(mut self, arity: impl Into<String>) -> Self {
        self.arity.replace(arity.into());
        self
    }

    /// The regex each value is split on.
    pub fn split(mut self, regex: impl Into<String>) -> Self {
        self.split.replace(regex.into());
        self
    }

    /// The parameter label used in messages (default `<name>`).
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label.replace(label.into());
        self
    }

    /// The value bound when the option is absent from the command line.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value.replace(value.into());
        self
    }

    /// The value bound when the option is present without a value.
    pub fn fallback_value(mut self, value: impl Into<String>) -> Self {
        self.fallback_value.replace(value.into());
        self
    }

    /// Fail the parse when this option is absent.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Declaration of a positional parameter.
///
/// ### Example
/// ```
/// # use argspan_core as argspan;
/// use argspan::{PositionalParamSpec, TargetShape, ValueType};
///
/// let rest = PositionalParamSpec::new("rest", TargetShape::List(ValueType::Text))
///     .index("1..*")
///     .arity("*");
/// ```
#[derive(Debug, Clone)]
pub struct PositionalParamSpec {
    pub(crate) name: String,
    pub(crate) shape: TargetShape,
    pub(crate) arity: Option<String>,
    pub(crate) index: Option<String>,
    pub(crate) split: Option<String>,
    pub(crate) label: Option<String>,
    pub(crate) default_value: Option<String>,
}

impl PositionalParamSpec {
    /// Declare a positional parameter by its name and target shape.
    pub fn new(name: impl Into<String>, shape: TargetShape) -> Self {
        Self {
            name: name.into(),
            shape,
            arity: None,
            index: None,
            split: None,
            label: None,
            default_value: None,
        }
    }

    /// The arity in [`Range`](crate::Range) notation.
    /// Without one, the arity defaults from the target shape.
    pub fn arity(mut self, arity: impl Into<String>) -> Self {
        self.arity.replace(arity.into());
        self
    }

    /// The positions claimed, in [`Range`](crate::Range) notation.
    ///
    /// Without one, the index follows the preceding positional parameter: a single position for scalars and
    /// every remaining position for multi-value targets.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index.replace(index.into());
        self
    }

    /// The regex each value is split on.
    pub fn split(mut self, regex: impl Into<String>) -> Self {
        self.split.replace(regex.into());
        self
    }

    /// The parameter label used in messages (default `<name>`).
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label.replace(label.into());
        self
    }

    /// The value bound when no token reaches this parameter.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value.replace(value.into());
        self
    }
}
