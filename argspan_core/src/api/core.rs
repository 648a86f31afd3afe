use crate::api::{OptionSpec, ParserConfiguration, PositionalParamSpec};
use crate::matcher::{split_value, ArgSpec, OptionConfig, PositionalConfig, Specs, Splitter};
use crate::model::{ParameterClass, Range, TargetShape, Value};
use crate::parser::{split_map_entry, CommandLine, ConfigError, ConsoleInterface, Tracer, UserInterface};

/// The declaration of a command: its options and positional parameters.
///
/// ### Example
/// ```
/// # use argspan_core as argspan;
/// use argspan::{CommandSpec, OptionSpec, PositionalParamSpec, TargetShape, ValueType};
///
/// let command_line = CommandSpec::new("program")
///     .option(OptionSpec::new(["-v", "--verbose"], TargetShape::Scalar(ValueType::Boolean)))
///     .positional(PositionalParamSpec::new("files", TargetShape::List(ValueType::Text)))
///     .build();
///
/// let result = command_line.parse_args(&["-v", "a.txt", "b.txt"]).unwrap();
/// assert!(result.has("--verbose"));
/// assert_eq!(result.get("files").unwrap().strings(), vec!["a.txt", "b.txt"]);
/// ```
#[derive(Debug, Clone)]
pub struct CommandSpec {
    name: String,
    options: Vec<OptionSpec>,
    positionals: Vec<PositionalParamSpec>,
}

impl CommandSpec {
    /// Declare a command.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::default(),
            positionals: Vec::default(),
        }
    }

    /// Add an option.
    /// The order of options does not affect the parse semantics.
    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Add a positional parameter.
    ///
    /// Positional parameters without an explicit index take the positions in the order they are added.
    ///
    /// ### Example
    /// ```
    /// # use argspan_core as argspan;
    /// use argspan::{CommandSpec, PositionalParamSpec, TargetShape, ValueType};
    ///
    /// let command_line = CommandSpec::new("program")
    ///     .positional(PositionalParamSpec::new("a", TargetShape::Scalar(ValueType::Integer)))
    ///     .positional(PositionalParamSpec::new("b", TargetShape::Scalar(ValueType::Integer)))
    ///     .build();
    ///
    /// let result = command_line.parse_args(&["1", "2"]).unwrap();
    /// assert_eq!(result.get("a").unwrap().strings(), vec!["1"]);
    /// assert_eq!(result.get("b").unwrap().strings(), vec!["2"]);
    /// ```
    pub fn positional(mut self, positional: PositionalParamSpec) -> Self {
        self.positionals.push(positional);
        self
    }

    fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<CommandLine, ConfigError> {
        let options = self
            .options
            .into_iter()
            .enumerate()
            .map(|(id, option)| resolve_option(id, option))
            .collect::<Result<Vec<_>, _>>()?;
        let mut next = 0;
        let mut positionals = Vec::default();

        for (id, positional) in self.positionals.into_iter().enumerate() {
            positionals.push(resolve_positional(id, positional, &mut next)?);
        }

        let specs = Specs::new(options, positionals)?;
        Ok(CommandLine::new(self.name, specs, user_interface))
    }

    /// Build the command line as a Result.
    /// This finalizes the declarations and checks for errors (ex: a repeated option name, an invalid arity).
    pub fn build_parser(self) -> Result<CommandLine, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the command line.
    /// This finalizes the declarations and checks for errors (ex: a repeated option name, an invalid arity).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> CommandLine {
        match self.build_parser() {
            Ok(command_line) => command_line,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

fn resolve_option(id: usize, option: OptionSpec) -> Result<OptionConfig, ConfigError> {
    let OptionSpec {
        names,
        shape,
        arity,
        split,
        label,
        default_value,
        fallback_value,
        required,
    } = option;

    if names.is_empty() || names.iter().any(|name| name.is_empty()) {
        return Err(ConfigError(format!(
            "Option names must be non-empty (found {names:?})."
        )));
    }

    let longest = crate::matcher::longest(&names).to_string();
    let arity = match arity {
        Some(arity) => Range::value_of(&arity).map_err(|error| {
            ConfigError(format!("Invalid arity '{arity}' for option '{longest}': {error}"))
        })?,
        None => Range::default_arity(&shape, ParameterClass::Opt),
    };
    let splitter = split.as_deref().map(Splitter::new).transpose()?;
    let label = label.unwrap_or_else(|| format!("<{}>", longest.trim_start_matches('-')));
    let config = OptionConfig::new(
        id,
        names,
        label,
        arity,
        shape,
        splitter,
        default_value,
        fallback_value,
        required,
    );

    if let Some(value) = config.default_value() {
        validate(&config, "default", value)?;
    }

    if let Some(value) = config.fallback_value() {
        validate(&config, "fallback", value)?;
    }

    Ok(config)
}

fn resolve_positional(
    id: usize,
    positional: PositionalParamSpec,
    next: &mut usize,
) -> Result<PositionalConfig, ConfigError> {
    let PositionalParamSpec {
        name,
        shape,
        arity,
        index,
        split,
        label,
        default_value,
    } = positional;

    let index = match index {
        Some(index) => {
            let range = Range::value_of(&index).map_err(|error| {
                ConfigError(format!(
                    "Invalid index '{index}' for positional parameter '{name}': {error}"
                ))
            })?;

            if range.is_relative() {
                range.shift(*next)
            } else {
                range
            }
        }
        None if shape.is_multi_value() => Range::at_least(*next),
        None => Range::fixed(*next),
    };
    *next = if index.is_variable() {
        index.min() + 1
    } else {
        index.max() + 1
    };

    let arity = match arity {
        Some(arity) => Range::value_of(&arity).map_err(|error| {
            ConfigError(format!(
                "Invalid arity '{arity}' for positional parameter '{name}': {error}"
            ))
        })?,
        None => Range::default_arity(&shape, ParameterClass::Pos),
    };
    let splitter = split.as_deref().map(Splitter::new).transpose()?;
    let label = label.unwrap_or_else(|| format!("<{name}>"));
    let config = PositionalConfig::new(id, name, label, index, arity, shape, splitter, default_value);

    if let Some(value) = config.default_value() {
        validate(&config, "default", value)?;
    }

    Ok(config)
}

/// Check that a declared value converts to the target shape.
fn validate(spec: &dyn ArgSpec, kind: &str, value: &str) -> Result<(), ConfigError> {
    let config = ParserConfiguration::default();
    let values = if spec.is_multi_value() {
        split_value(
            value,
            spec.splitter(),
            &config,
            spec.arity(),
            0,
            &Tracer::new(config.get_trace()),
        )
    } else {
        vec![value.to_string()]
    };
    let invalid = |detail: String| {
        ConfigError(format!(
            "Invalid {kind} value for {}: {detail}",
            spec.describe(0)
        ))
    };

    for value in values {
        match *spec.shape() {
            TargetShape::Scalar(value_type) | TargetShape::List(value_type) => {
                Value::convert(&value, value_type).map_err(|error| invalid(error.to_string()))?;
            }
            TargetShape::Map {
                key,
                value: value_type,
                ..
            } => {
                let (k, v) = split_map_entry(&value)
                    .ok_or_else(|| invalid(format!("'{value}' is not in KEY=VALUE format")))?;
                Value::convert(&k, key).map_err(|error| invalid(error.to_string()))?;
                Value::convert(&v, value_type).map_err(|error| invalid(error.to_string()))?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::SpecId;
    use crate::model::ValueType;
    use crate::test::assert_contains;
    use rstest::rstest;

    #[test]
    fn build_empty() {
        // Setup
        let command_spec = CommandSpec::new("program");

        // Execute
        let command_line = command_spec.build_parser().unwrap();

        // Verify
        assert_eq!(command_line.name(), "program");
        let result = command_line.parse_args(empty::slice()).unwrap();
        assert_eq!(result.bindings().count(), 0);
    }

    #[test]
    fn build_option_defaults() {
        // Setup
        let command_spec = CommandSpec::new("program")
            .option(OptionSpec::new(["-v", "--verbose"], TargetShape::Scalar(ValueType::Boolean)))
            .option(OptionSpec::new(["-n"], TargetShape::List(ValueType::Integer)).label("N"));

        // Execute
        let command_line = command_spec.build_parser().unwrap();

        // Verify
        let verbose = &command_line.options()[0];
        assert_eq!(verbose.label(), "<verbose>");
        assert_eq!(verbose.arity(), &Range::fixed(0));
        assert!(verbose.arity().is_unspecified());
        assert_eq!(verbose.id(), SpecId::Option(0));
        let n = &command_line.options()[1];
        assert_eq!(n.label(), "N");
        assert_eq!(n.arity(), &Range::fixed(1));
        assert!(n.splitter().is_none());
    }

    #[rstest]
    #[case(vec![None, None, None], vec!["0", "1", "2"])]
    #[case(vec![None, Some("3"), None], vec!["0", "3", "4"])]
    #[case(vec![Some("1"), Some("+"), Some("1+")], vec!["1", "2", "4"])]
    #[case(vec![Some("0..2"), None, Some("+")], vec!["0..2", "3", "4"])]
    fn build_positional_index(#[case] indexes: Vec<Option<&str>>, #[case] expected: Vec<&str>) {
        // Setup
        let mut command_spec = CommandSpec::new("program");

        for (i, index) in indexes.into_iter().enumerate() {
            let mut positional =
                PositionalParamSpec::new(format!("p{i}"), TargetShape::Scalar(ValueType::Text));

            if let Some(index) = index {
                positional = positional.index(index);
            }

            command_spec = command_spec.positional(positional);
        }

        // Execute
        let command_line = command_spec.build_parser().unwrap();

        // Verify
        let indexes: Vec<String> = command_line
            .positionals()
            .iter()
            .map(|positional| positional.index().to_string())
            .collect();
        assert_eq!(indexes, expected);
    }

    #[test]
    fn build_positional_multi_value() {
        // Setup
        let command_spec = CommandSpec::new("program")
            .positional(PositionalParamSpec::new("first", TargetShape::Scalar(ValueType::Text)))
            .positional(PositionalParamSpec::new("rest", TargetShape::List(ValueType::Text)));

        // Execute
        let command_line = command_spec.build_parser().unwrap();

        // Verify
        let rest = &command_line.positionals()[1];
        assert_eq!(rest.index().to_string(), "1..*");
        assert_eq!(rest.arity().to_string(), "0..1");
        assert_eq!(rest.label(), "<rest>");
        assert!(!rest.is_required());
        assert!(command_line.positionals()[0].is_required());
    }

    #[rstest]
    #[case(
        OptionSpec::new(Vec::<String>::default(), TargetShape::Scalar(ValueType::Text)),
        "Option names must be non-empty"
    )]
    #[case(
        OptionSpec::new([""], TargetShape::Scalar(ValueType::Text)),
        "Option names must be non-empty"
    )]
    #[case(
        OptionSpec::new(["-x"], TargetShape::Scalar(ValueType::Text)).arity("3..1"),
        "Invalid arity '3..1' for option '-x': Invalid range (min=3, max=1)"
    )]
    #[case(
        OptionSpec::new(["-x"], TargetShape::Scalar(ValueType::Text)).arity("-1"),
        "Invalid arity '-1' for option '-x': Invalid negative range (min=-1, max=-1)"
    )]
    #[case(
        OptionSpec::new(["-x"], TargetShape::List(ValueType::Text)).split("("),
        "Invalid split regex '('"
    )]
    #[case(
        OptionSpec::new(["-x"], TargetShape::Scalar(ValueType::Integer)).default_value("a"),
        "Invalid default value for option '-x' (<x>): 'a' is not an integer"
    )]
    #[case(
        OptionSpec::new(["-x"], TargetShape::List(ValueType::Integer)).split(",").default_value("1,a"),
        "Invalid default value for option '-x' (<x>): 'a' is not an integer"
    )]
    #[case(
        OptionSpec::new(["-x"], TargetShape::map(ValueType::Text, ValueType::Text)).default_value("a"),
        "Invalid default value for option '-x' (<x>): 'a' is not in KEY=VALUE format"
    )]
    #[case(
        OptionSpec::new(["-x"], TargetShape::Scalar(ValueType::Boolean)).arity("0..1").fallback_value("maybe"),
        "Invalid fallback value for option '-x' (<x>): 'maybe' is not a boolean"
    )]
    fn build_option_invalid(#[case] option: OptionSpec, #[case] message: &str) {
        // Setup
        let command_spec = CommandSpec::new("program").option(option);

        // Execute
        let result = command_spec.build_parser();

        // Verify
        assert_matches!(result, Err(error) => {
            assert_contains!(error.to_string(), message);
        });
    }

    #[rstest]
    #[case(vec![OptionSpec::new(["-x"], TargetShape::Scalar(ValueType::Text)), OptionSpec::new(["-x", "--y"], TargetShape::Scalar(ValueType::Text))], "Cannot duplicate the option name '-x'.")]
    #[case(vec![OptionSpec::new(["-x", "-x"], TargetShape::Scalar(ValueType::Text))], "Cannot duplicate the option name '-x'.")]
    fn build_option_duplicate(#[case] options: Vec<OptionSpec>, #[case] message: &str) {
        // Setup
        let mut command_spec = CommandSpec::new("program");

        for option in options {
            command_spec = command_spec.option(option);
        }

        // Execute
        let result = command_spec.build_parser();

        // Verify
        assert_matches!(result, Err(error) => {
            assert_eq!(error.to_string(), format!("Config error: {message}"));
        });
    }

    #[rstest]
    #[case(
        PositionalParamSpec::new("p", TargetShape::Scalar(ValueType::Text)).index("3..1"),
        "Invalid index '3..1' for positional parameter 'p': Invalid range (min=3, max=1)"
    )]
    #[case(
        PositionalParamSpec::new("p", TargetShape::Scalar(ValueType::Text)).arity("2..1"),
        "Invalid arity '2..1' for positional parameter 'p': Invalid range (min=2, max=1)"
    )]
    #[case(
        PositionalParamSpec::new("p", TargetShape::Scalar(ValueType::Float)).default_value("abc"),
        "Invalid default value for positional parameter at index 0 (<p>): 'abc' is not a float"
    )]
    fn build_positional_invalid(#[case] positional: PositionalParamSpec, #[case] message: &str) {
        let result = CommandSpec::new("program").positional(positional).build_parser();

        assert_matches!(result, Err(error) => {
            assert_contains!(error.to_string(), message);
        });
    }

    #[test]
    fn build_positional_duplicate() {
        let result = CommandSpec::new("program")
            .positional(PositionalParamSpec::new("p", TargetShape::Scalar(ValueType::Text)))
            .positional(PositionalParamSpec::new("p", TargetShape::Scalar(ValueType::Text)))
            .build_parser();

        assert_matches!(result, Err(error) => {
            assert_eq!(error.to_string(), "Config error: Cannot duplicate the positional parameter 'p'.");
        });
    }
}
