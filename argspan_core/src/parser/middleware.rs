use std::env;

use crate::api::ParserConfiguration;
use crate::matcher::{ArgSpec, Interpreter, OptionConfig, PositionalConfig, SpecId, Specs};
use crate::parser::interface::UserInterface;
use crate::parser::{Binder, ErrorContext, ParseError, ParseResult, Tracer};

/// The built command line parser.
/// Built via [`CommandSpec::build`](crate::CommandSpec::build) or [`CommandSpec::build_parser`](crate::CommandSpec::build_parser).
///
/// A `CommandLine` holds no parse state, so it may be used for any number of parses.
pub struct CommandLine {
    name: String,
    specs: Specs,
    config: ParserConfiguration,
    user_interface: Box<dyn UserInterface>,
}

impl CommandLine {
    pub(crate) fn new(
        name: impl Into<String>,
        specs: Specs,
        user_interface: Box<dyn UserInterface>,
    ) -> Self {
        Self {
            name: name.into(),
            specs,
            config: ParserConfiguration::default(),
            user_interface,
        }
    }

    /// Replace the configuration used by [`CommandLine::parse_args`] and [`CommandLine::parse`].
    ///
    /// ### Example
    /// ```
    /// # use argspan_core as argspan;
    /// use argspan::{CommandSpec, ParserConfiguration};
    ///
    /// let command_line = CommandSpec::new("program")
    ///     .build()
    ///     .configure(ParserConfiguration::default().unmatched_arguments_allowed(true));
    ///
    /// let result = command_line.parse_args(&["a", "--b"]).unwrap();
    /// assert_eq!(result.unmatched_strings(), vec!["a", "--b"]);
    /// ```
    pub fn configure(mut self, config: ParserConfiguration) -> Self {
        self.config = config;
        self
    }

    /// The command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configuration used by [`CommandLine::parse_args`].
    pub fn configuration(&self) -> &ParserConfiguration {
        &self.config
    }

    /// The options, in declaration order.
    pub fn options(&self) -> &[OptionConfig] {
        self.specs.options()
    }

    /// The positional parameters, in declaration order.
    pub fn positionals(&self) -> &[PositionalConfig] {
        self.specs.positionals()
    }

    /// Find a parameter by option name or positional name.
    pub fn lookup(&self, name: &str) -> Option<SpecId> {
        self.specs.lookup(name)
    }

    /// The parameter identified by `id`.
    pub fn spec(&self, id: SpecId) -> &dyn ArgSpec {
        self.specs.spec(id)
    }

    /// Bind the tokens with this command line's configuration.
    pub fn parse_args(&self, tokens: &[&str]) -> Result<ParseResult, ParseError> {
        self.parse_args_with(&self.config, tokens)
    }

    /// Bind the tokens with the given configuration.
    ///
    /// Parsing walks the tokens once, left to right:
    /// 1. Each token is classified as an option, a clustered short option, an attached option value, or a value.
    /// 2. Options take values from the following tokens, up to their arity.
    /// Values are taken by the positional parameters whose index covers the current position.
    /// 3. Once all tokens are consumed, absent required parameters fail the parse and default values are bound.
    ///
    /// The first failure stops the parse; the error holds whatever was bound up to that point.
    pub fn parse_args_with(
        &self,
        config: &ParserConfiguration,
        tokens: &[&str],
    ) -> Result<ParseResult, ParseError> {
        let tracer = Tracer::new(config.get_trace());
        tracer.info(|| format!("Parsing {} argument(s) for '{}'.", tokens.len(), self.name));
        let mut binder = Binder::new(&self.specs, config, tracer);
        let outcome = Interpreter::new(&self.specs, config, tracer, tokens)
            .run(&mut binder)
            .and_then(|()| binder.complete());

        match outcome {
            Ok(()) => Ok(binder.finish()),
            Err(error) => {
                tracer.debug(|| format!("Parse failed: {error}"));
                Err(error.with_partial(binder.finish()))
            }
        }
    }

    /// Bind the tokens, reporting any failure on the user interface.
    /// On failure, returns the exit code `1`.
    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<ParseResult, i32> {
        self.parse_args(tokens).map_err(|error| {
            self.user_interface.print_error(&error);

            if let Some(position) = error.position() {
                self.user_interface
                    .print_error_context(ErrorContext::new(position, tokens));
            }

            1
        })
    }

    /// Bind the Cli [`env::args`].
    ///
    /// If an error is encountered, it is printed with the offending token and the program exits with error code `1`
    /// (via [`std::process::exit`]).
    pub fn parse(&self) -> ParseResult {
        let command_input: Vec<String> = env::args().skip(1).collect();
        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(result) => result,
            Err(exit_code) => {
                std::process::exit(exit_code);
            }
        }
    }
}

impl std::fmt::Debug for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLine")
            .field("name", &self.name)
            .field("specs", &self.specs)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Splitter;
    use crate::model::{Range, TargetShape, ValueType};
    use crate::parser::util::InMemoryInterface;
    use crate::parser::ErrorKind;
    use std::rc::Rc;

    impl UserInterface for Rc<InMemoryInterface> {
        fn print_error(&self, error: &ParseError) {
            self.as_ref().print_error(error);
        }

        fn print_error_context(&self, error_context: ErrorContext) {
            self.as_ref().print_error_context(error_context);
        }
    }

    fn command_line(interface: Box<dyn UserInterface>) -> CommandLine {
        let specs = Specs::new(
            vec![OptionConfig::new(
                0,
                vec!["-n".to_string(), "--number".to_string()],
                "<number>".to_string(),
                Range::fixed(1),
                TargetShape::List(ValueType::Integer),
                Some(Splitter::new(",").unwrap()),
                Some("7".to_string()),
                None,
                false,
            )],
            vec![PositionalConfig::new(
                0,
                "file".to_string(),
                "<file>".to_string(),
                Range::fixed(0),
                Range::fixed(1),
                TargetShape::Scalar(ValueType::Text),
                None,
                None,
            )],
        )
        .unwrap();
        CommandLine::new("program", specs, interface)
    }

    #[test]
    fn parse_tokens() {
        // Setup
        let interface = Rc::new(InMemoryInterface::default());
        let command_line = command_line(Box::new(interface.clone()));

        // Execute
        let result = command_line.parse_tokens(&["-n", "1,2", "a.txt"]).unwrap();

        // Verify
        assert_eq!(result.get("--number").unwrap().strings(), vec!["1", "2"]);
        assert_eq!(result.get("file").unwrap().strings(), vec!["a.txt"]);
        drop(command_line);
        let (error, error_context) = Rc::try_unwrap(interface).ok().unwrap().consume();
        assert_eq!(error, None);
        assert_eq!(error_context, None);
    }

    #[test]
    fn parse_tokens_error() {
        // Setup
        let interface = Rc::new(InMemoryInterface::default());
        let command_line = command_line(Box::new(interface.clone()));

        // Execute
        let exit_code = command_line.parse_tokens(&["a.txt", "-n", "x"]).unwrap_err();

        // Verify
        assert_eq!(exit_code, 1);
        drop(command_line);
        let (error, error_context) = Rc::try_unwrap(interface).ok().unwrap().consume();
        assert_eq!(
            error.unwrap(),
            "Invalid value for option '--number' (<number>): 'x' is not an integer"
        );
        assert_eq!(
            error_context.unwrap(),
            ErrorContext::new(2, &["a.txt", "-n", "x"])
        );
    }

    #[test]
    fn parse_args_partial() {
        // Setup
        let command_line = command_line(Box::new(InMemoryInterface::default()));

        // Execute
        let result = command_line.parse_args(&["-n", "1", "a.txt", "b.txt"]);

        // Verify
        assert_matches!(result, Err(error) => {
            assert_eq!(error.kind(), ErrorKind::UnmatchedArgument);
            let partial = error.partial().unwrap();
            assert_eq!(partial.get("-n").unwrap().strings(), vec!["1"]);
            assert_eq!(partial.get("file").unwrap().strings(), vec!["a.txt"]);
            assert_eq!(partial.consumed(), vec![0, 1, 2]);
        });
    }

    #[test]
    fn parse_args_default() {
        let command_line = command_line(Box::new(InMemoryInterface::default()));

        let result = command_line.parse_args(&["a.txt"]).unwrap();

        assert_eq!(result.get("-n").unwrap().strings(), vec!["7"]);
        assert!(!result.has("-n"));
        assert!(result.has("file"));
    }

    #[test]
    fn parse_args_missing() {
        let command_line = command_line(Box::new(InMemoryInterface::default()));

        let result = command_line.parse_args(empty::slice());

        assert_matches!(result, Err(error) => {
            assert_eq!(error.kind(), ErrorKind::MissingRequiredValue);
            assert_eq!(error.to_string(), "Missing required parameter: '<file>'");
            assert_eq!(error.specs(), &[SpecId::Positional(0)]);
            assert_eq!(error.position(), None);
        });
    }

    #[test]
    fn parse_args_with() {
        // Setup
        let command_line = command_line(Box::new(InMemoryInterface::default()));
        let lenient = ParserConfiguration::default().unmatched_arguments_allowed(true);

        // Execute
        let strict = command_line.parse_args(&["a.txt", "--other"]);
        let result = command_line.parse_args_with(&lenient, &["a.txt", "--other"]);

        // Verify
        assert_matches!(strict, Err(error) => {
            assert_eq!(error.kind(), ErrorKind::UnknownOption);
        });
        assert_eq!(result.unwrap().unmatched_strings(), vec!["--other"]);
    }

    #[test]
    fn reusable() {
        let command_line = command_line(Box::new(InMemoryInterface::default()));

        let first = command_line.parse_args(&["-n", "1", "a.txt"]).unwrap();
        let second = command_line.parse_args(&["-n", "1", "a.txt"]).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.get("-n").unwrap().occurrences(), 1);
    }

    #[test]
    fn introspection() {
        let command_line = command_line(Box::new(InMemoryInterface::default()))
            .configure(ParserConfiguration::default().trim_quotes(true));

        assert_eq!(command_line.name(), "program");
        assert!(command_line.configuration().is_trim_quotes());
        assert_eq!(command_line.options().len(), 1);
        assert_eq!(command_line.positionals()[0].name(), "file");
        assert_eq!(command_line.lookup("--number"), Some(SpecId::Option(0)));
        assert_eq!(command_line.lookup("file"), Some(SpecId::Positional(0)));
        assert_eq!(command_line.lookup("--other"), None);
        assert_eq!(
            command_line.spec(SpecId::Option(0)).describe(0),
            "option '--number' (<number>)"
        );
    }
}
