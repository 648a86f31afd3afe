use crate::parser::ParseError;

pub(crate) trait UserInterface {
    fn print_error(&self, error: &ParseError);
    fn print_error_context(&self, error_context: ErrorContext);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print_error(&self, error: &ParseError) {
        eprintln!("{error}");
    }

    fn print_error_context(&self, error_context: ErrorContext) {
        eprintln!("{error_context}");
    }
}

/// The command line, with a caret under the offending token.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ErrorContext {
    position: usize,
    tokens: Vec<String>,
}

impl ErrorContext {
    pub(crate) fn new(position: usize, tokens: &[&str]) -> Self {
        Self {
            position,
            tokens: tokens.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let projection = self.tokens.join(" ");
        // Past the end points just after the final token.
        let offset: usize = self
            .tokens
            .iter()
            .take(self.position)
            .map(|token| token.chars().count() + 1)
            .sum();

        write!(
            f,
            "{projection}\n{:width$}^",
            "",
            width = std::cmp::min(offset, projection.chars().count())
        )
    }
}
