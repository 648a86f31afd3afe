use crate::constant::*;

/// Verbosity of the parse trace.
///
/// Trace events are emitted through [`tracing`]; nothing is printed unless the application installs a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TraceLevel {
    /// No trace events.
    Off,
    /// Only suspicious input (ex: unbalanced quotes).
    Warn,
    /// Major parse decisions (ex: the end-of-options delimiter).
    Info,
    /// Every token decision.
    Debug,
}

impl Default for TraceLevel {
    fn default() -> Self {
        TraceLevel::Warn
    }
}

/// Policy toggles which alter how tokens are consumed.
///
/// Each setter consumes and returns the configuration, so they chain.
///
/// ### Example
/// ```
/// # use argspan_core as argspan;
/// use argspan::{ParserConfiguration, TraceLevel};
///
/// let config = ParserConfiguration::default()
///     .trim_quotes(true)
///     .end_of_options_delimiter("::")
///     .trace(TraceLevel::Debug);
///
/// assert!(config.is_trim_quotes());
/// assert_eq!(config.get_end_of_options_delimiter(), "::");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfiguration {
    split_quoted_strings: bool,
    trim_quotes: bool,
    end_of_options_delimiter: String,
    separator: String,
    limit_split: bool,
    arity_satisfied_by_attached_option_param: bool,
    stop_at_positional: bool,
    allow_options_as_option_parameters: bool,
    unmatched_arguments_allowed: bool,
    overwritten_options_allowed: bool,
    posix_clustered_short_options_allowed: bool,
    trace: TraceLevel,
}

impl Default for ParserConfiguration {
    fn default() -> Self {
        Self {
            split_quoted_strings: false,
            trim_quotes: false,
            end_of_options_delimiter: DEFAULT_END_OF_OPTIONS.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            limit_split: false,
            arity_satisfied_by_attached_option_param: false,
            stop_at_positional: false,
            allow_options_as_option_parameters: false,
            unmatched_arguments_allowed: false,
            overwritten_options_allowed: false,
            posix_clustered_short_options_allowed: true,
            trace: TraceLevel::default(),
        }
    }
}

impl ParserConfiguration {
    /// Split on every regex match, including those inside quoted regions.
    pub fn split_quoted_strings(mut self, value: bool) -> Self {
        self.split_quoted_strings = value;
        self
    }

    /// Strip surrounding double quotes from values.
    /// Quoted tokens are then never interpreted as options.
    pub fn trim_quotes(mut self, value: bool) -> Self {
        self.trim_quotes = value;
        self
    }

    /// The token after which every remaining token is positional (default `--`).
    pub fn end_of_options_delimiter(mut self, value: impl Into<String>) -> Self {
        self.end_of_options_delimiter = value.into();
        self
    }

    /// The separator between an option name and its attached value (default `=`).
    pub fn separator(mut self, value: impl Into<String>) -> Self {
        self.separator = value.into();
        self
    }

    /// Cap the split segments of one token at the values still allowed by the arity.
    pub fn limit_split(mut self, value: bool) -> Self {
        self.limit_split = value;
        self
    }

    /// Let an attached value (`-x=v`) satisfy the arity minimum on its own.
    pub fn arity_satisfied_by_attached_option_param(mut self, value: bool) -> Self {
        self.arity_satisfied_by_attached_option_param = value;
        self
    }

    /// Treat every token after the first positional parameter as positional.
    pub fn stop_at_positional(mut self, value: bool) -> Self {
        self.stop_at_positional = value;
        self
    }

    /// Let options consume tokens that name other known options.
    pub fn allow_options_as_option_parameters(mut self, value: bool) -> Self {
        self.allow_options_as_option_parameters = value;
        self
    }

    /// Record unknown options and excess positional tokens as unmatched instead of failing.
    pub fn unmatched_arguments_allowed(mut self, value: bool) -> Self {
        self.unmatched_arguments_allowed = value;
        self
    }

    /// Let a single-valued option be specified more than once (the last occurrence wins).
    pub fn overwritten_options_allowed(mut self, value: bool) -> Self {
        self.overwritten_options_allowed = value;
        self
    }

    /// Allow clustered short options (ex: `-abc`).
    pub fn posix_clustered_short_options_allowed(mut self, value: bool) -> Self {
        self.posix_clustered_short_options_allowed = value;
        self
    }

    /// The trace verbosity.
    pub fn trace(mut self, level: TraceLevel) -> Self {
        self.trace = level;
        self
    }

    /// See [`ParserConfiguration::split_quoted_strings`].
    pub fn is_split_quoted_strings(&self) -> bool {
        self.split_quoted_strings
    }

    /// See [`ParserConfiguration::trim_quotes`].
    pub fn is_trim_quotes(&self) -> bool {
        self.trim_quotes
    }

    /// See [`ParserConfiguration::end_of_options_delimiter`].
    pub fn get_end_of_options_delimiter(&self) -> &str {
        &self.end_of_options_delimiter
    }

    /// See [`ParserConfiguration::separator`].
    pub fn get_separator(&self) -> &str {
        &self.separator
    }

    /// See [`ParserConfiguration::limit_split`].
    pub fn is_limit_split(&self) -> bool {
        self.limit_split
    }

    /// See [`ParserConfiguration::arity_satisfied_by_attached_option_param`].
    pub fn is_arity_satisfied_by_attached_option_param(&self) -> bool {
        self.arity_satisfied_by_attached_option_param
    }

    /// See [`ParserConfiguration::stop_at_positional`].
    pub fn is_stop_at_positional(&self) -> bool {
        self.stop_at_positional
    }

    /// See [`ParserConfiguration::allow_options_as_option_parameters`].
    pub fn is_allow_options_as_option_parameters(&self) -> bool {
        self.allow_options_as_option_parameters
    }

    /// See [`ParserConfiguration::unmatched_arguments_allowed`].
    pub fn is_unmatched_arguments_allowed(&self) -> bool {
        self.unmatched_arguments_allowed
    }

    /// See [`ParserConfiguration::overwritten_options_allowed`].
    pub fn is_overwritten_options_allowed(&self) -> bool {
        self.overwritten_options_allowed
    }

    /// See [`ParserConfiguration::posix_clustered_short_options_allowed`].
    pub fn is_posix_clustered_short_options_allowed(&self) -> bool {
        self.posix_clustered_short_options_allowed
    }

    /// See [`ParserConfiguration::trace`].
    pub fn get_trace(&self) -> TraceLevel {
        self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ParserConfiguration::default();
        assert!(!config.is_split_quoted_strings());
        assert!(!config.is_trim_quotes());
        assert_eq!(config.get_end_of_options_delimiter(), "--");
        assert_eq!(config.get_separator(), "=");
        assert!(!config.is_limit_split());
        assert!(!config.is_arity_satisfied_by_attached_option_param());
        assert!(!config.is_stop_at_positional());
        assert!(!config.is_allow_options_as_option_parameters());
        assert!(!config.is_unmatched_arguments_allowed());
        assert!(!config.is_overwritten_options_allowed());
        assert!(config.is_posix_clustered_short_options_allowed());
        assert_eq!(config.get_trace(), TraceLevel::Warn);
    }

    #[test]
    fn chained() {
        let config = ParserConfiguration::default()
            .split_quoted_strings(true)
            .separator(":")
            .unmatched_arguments_allowed(true)
            .posix_clustered_short_options_allowed(false)
            .trace(TraceLevel::Off);
        assert!(config.is_split_quoted_strings());
        assert_eq!(config.get_separator(), ":");
        assert!(config.is_unmatched_arguments_allowed());
        assert!(!config.is_posix_clustered_short_options_allowed());
        assert_eq!(config.get_trace(), TraceLevel::Off);
    }

    #[test]
    fn trace_ordering() {
        assert!(TraceLevel::Off < TraceLevel::Warn);
        assert!(TraceLevel::Warn < TraceLevel::Info);
        assert!(TraceLevel::Info < TraceLevel::Debug);
    }
}
