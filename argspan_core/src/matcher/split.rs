use regex::Regex;

use crate::api::ParserConfiguration;
use crate::constant::*;
use crate::model::Range;
use crate::parser::{ConfigError, Tracer};

/// Splits one raw value into logical values on a regex, leaving quoted regions intact.
///
/// ### Example
/// ```
/// # use argspan_core as argspan;
/// use argspan::{ParserConfiguration, Range, Splitter};
///
/// let splitter = Splitter::new(",").unwrap();
/// let arity = Range::at_least(0);
///
/// let values = splitter.split(r#"a,b,"c,d,e",f"#, &ParserConfiguration::default(), &arity, 0);
/// assert_eq!(values, vec!["a", "b", r#""c,d,e""#, "f"]);
///
/// let config = ParserConfiguration::default().split_quoted_strings(true);
/// let values = splitter.split(r#"a,b,"c,d,e",f"#, &config, &arity, 0);
/// assert_eq!(values, vec!["a", "b", r#""c"#, "d", r#"e""#, "f"]);
/// ```
#[derive(Debug, Clone)]
pub struct Splitter {
    regex: Regex,
}

impl Splitter {
    /// Compile the split regex.
    pub fn new(regex: &str) -> Result<Self, ConfigError> {
        Regex::new(regex)
            .map(|regex| Self { regex })
            .map_err(|error| ConfigError(format!("Invalid split regex '{regex}': {error}")))
    }

    /// The split regex.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Split `value` for a parameter with the given arity, of which `consumed` values are already taken.
    ///
    /// Trailing empty segments are dropped.
    /// With [`ParserConfiguration::limit_split`] the segments are capped at the values the arity still allows.
    pub fn split(
        &self,
        value: &str,
        config: &ParserConfiguration,
        arity: &Range,
        consumed: usize,
    ) -> Vec<String> {
        self.split_traced(value, config, arity, consumed, &Tracer::new(config.get_trace()))
    }

    pub(crate) fn split_traced(
        &self,
        value: &str,
        config: &ParserConfiguration,
        arity: &Range,
        consumed: usize,
        tracer: &Tracer,
    ) -> Vec<String> {
        let protected = if config.is_split_quoted_strings() {
            Vec::default()
        } else {
            quoted_regions(value, tracer)
        };
        let limit = if config.is_limit_split() && !arity.is_variable() {
            arity.max().saturating_sub(consumed)
        } else {
            0
        };
        let mut segments: Vec<&str> = Vec::default();
        let mut start = 0;
        let mut matched = false;

        for found in self.regex.find_iter(value) {
            if limit > 0 && segments.len() + 1 >= limit {
                break;
            }

            // A zero-width match at the very beginning never produces a leading empty segment.
            if found.end() == 0 {
                continue;
            }

            if protected
                .iter()
                .any(|region| covers(*region, found.start(), found.end()))
            {
                continue;
            }

            segments.push(&value[start..found.start()]);
            start = found.end();
            matched = true;
        }

        if !matched {
            return vec![unquote_if(value, config).to_string()];
        }

        segments.push(&value[start..]);

        if limit == 0 {
            while segments.last().map_or(false, |segment| segment.is_empty()) {
                segments.pop();
            }
        }

        tracer.debug(|| {
            format!(
                "Split value '{value}' on regex '{}' into {segments:?}.",
                self.regex.as_str()
            )
        });

        segments
            .into_iter()
            .map(|segment| unquote_if(segment, config).to_string())
            .collect()
    }
}

/// The value without a split regex: a single element, unquoted if configured.
pub(crate) fn split_value(
    value: &str,
    splitter: Option<&Splitter>,
    config: &ParserConfiguration,
    arity: &Range,
    consumed: usize,
    tracer: &Tracer,
) -> Vec<String> {
    match splitter {
        Some(splitter) => splitter.split_traced(value, config, arity, consumed, tracer),
        None => vec![unquote_if(value, config).to_string()],
    }
}

fn covers((from, to): (usize, usize), start: usize, end: usize) -> bool {
    start < to && from < std::cmp::max(end, start + 1)
}

/// Byte regions enclosed in unescaped double quotes, quotes included.
/// An unbalanced quote extends its region to the end of the value.
fn quoted_regions(value: &str, tracer: &Tracer) -> Vec<(usize, usize)> {
    let mut regions = Vec::default();
    let mut open: Option<usize> = None;
    let mut escaping = false;

    for (i, c) in value.char_indices() {
        match c {
            ESCAPE => escaping = !escaping,
            QUOTE if !escaping => match open.take() {
                Some(from) => regions.push((from, i + 1)),
                None => open = Some(i),
            },
            _ => escaping = false,
        }
    }

    if let Some(from) = open {
        tracer.warn(|| {
            format!("Unbalanced quotes in [{value}]; the remainder after index {from} is treated as quoted.")
        });
        regions.push((from, value.len()));
    }

    regions
}

pub(crate) fn is_quoted(value: &str) -> bool {
    value.len() >= 2
        && value.starts_with(QUOTE)
        && value.ends_with(QUOTE)
        && !value[..value.len() - 1].ends_with(ESCAPE)
}

pub(crate) fn unquote(value: &str) -> &str {
    if is_quoted(value) {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn unquote_if<'a>(value: &'a str, config: &ParserConfiguration) -> &'a str {
    if config.is_trim_quotes() {
        unquote(value)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{distributions::Alphanumeric, thread_rng, Rng};
    use rstest::rstest;

    fn split(regex: &str, value: &str, config: &ParserConfiguration) -> Vec<String> {
        Splitter::new(regex)
            .unwrap()
            .split_traced(value, config, &Range::at_least(0), 0, &Tracer::off())
    }

    #[rstest]
    #[case(",", "a,b,c", vec!["a", "b", "c"])]
    #[case(",", "abc", vec!["abc"])]
    #[case(",", "", vec![""])]
    #[case(",", "a,,b", vec!["a", "", "b"])]
    #[case(",", "a,b,,", vec!["a", "b"])]
    #[case(",", ",a", vec!["", "a"])]
    #[case(",", ",", vec![])]
    #[case(r"\|", "8=FIX.4.4|9=69", vec!["8=FIX.4.4", "9=69"])]
    #[case(r"\s+", "a  b\tc", vec!["a", "b", "c"])]
    #[case("", "abc", vec!["a", "b", "c"])]
    #[case(",", r#"a,b,"c,d,e",f"#, vec!["a", "b", r#""c,d,e""#, "f"])]
    #[case(",", r#""a,b""#, vec![r#""a,b""#])]
    #[case(",", r#"a,"b,c"#, vec!["a", r#""b,c"#])]
    #[case(",", r#""a,b","c,d""#, vec![r#""a,b""#, r#""c,d""#])]
    #[case(",", r#"a,\"b,c\""#, vec!["a", r#"\"b"#, r#"c\""#])]
    #[case(",", r#"a\\,b"#, vec![r#"a\\"#, "b"])]
    fn split_default(#[case] regex: &str, #[case] value: &str, #[case] expected: Vec<&str>) {
        // Execute
        let values = split(regex, value, &ParserConfiguration::default());

        // Verify
        assert_eq!(values, expected);
    }

    #[rstest]
    #[case(r#"a,b,"c,d,e",f"#, vec!["a", "b", r#""c"#, "d", r#"e""#, "f"])]
    #[case(r#"a,"b,c"#, vec!["a", r#""b"#, "c"])]
    fn split_quoted_strings(#[case] value: &str, #[case] expected: Vec<&str>) {
        // Setup
        let config = ParserConfiguration::default().split_quoted_strings(true);

        // Execute
        let values = split(",", value, &config);

        // Verify
        assert_eq!(values, expected);
    }

    #[rstest]
    #[case(r#"a,b,"c,d,e",f"#, vec!["a", "b", "c,d,e", "f"])]
    #[case(r#""a","b""#, vec!["a", "b"])]
    #[case(r#""a,b""#, vec!["a,b"])]
    #[case(r#""""#, vec![""])]
    fn split_trim_quotes(#[case] value: &str, #[case] expected: Vec<&str>) {
        // Setup
        let config = ParserConfiguration::default().trim_quotes(true);

        // Execute
        let values = split(",", value, &config);

        // Verify
        assert_eq!(values, expected);
    }

    #[rstest]
    #[case("2", 0, vec!["a", "b,c,d"])]
    #[case("3", 1, vec!["a", "b,c,d"])]
    #[case("4", 0, vec!["a", "b", "c", "d"])]
    #[case("3", 3, vec!["a", "b", "c", "d"])]
    #[case("1..*", 0, vec!["a", "b", "c", "d"])]
    fn split_limited(#[case] arity: &str, #[case] consumed: usize, #[case] expected: Vec<&str>) {
        // Setup
        let config = ParserConfiguration::default().limit_split(true);
        let splitter = Splitter::new(",").unwrap();
        let arity = Range::value_of(arity).unwrap();

        // Execute
        let values = splitter.split_traced("a,b,c,d", &config, &arity, consumed, &Tracer::off());

        // Verify
        assert_eq!(values, expected);
    }

    #[test]
    fn split_limited_keeps_trailing_empty() {
        let config = ParserConfiguration::default().limit_split(true);
        let splitter = Splitter::new(",").unwrap();
        let values =
            splitter.split_traced("a,", &config, &Range::fixed(2), 0, &Tracer::off());
        assert_eq!(values, vec!["a", ""]);
    }

    #[test]
    fn split_join_roundtrip() {
        let splitter = Splitter::new(";").unwrap();
        let config = ParserConfiguration::default();

        for _ in 0..100 {
            let mut rng = thread_rng();
            let count = rng.gen_range(1..8);
            let parts: Vec<String> = (0..count)
                .map(|_| {
                    let length = rng.gen_range(1..6);
                    (&mut rng)
                        .sample_iter(&Alphanumeric)
                        .take(length)
                        .map(char::from)
                        .collect()
                })
                .collect();

            let values = splitter.split(&parts.join(";"), &config, &Range::at_least(0), 0);
            assert_eq!(values, parts);
        }
    }

    #[rstest]
    #[case(None, "\"a,b\"", false, vec!["\"a,b\""])]
    #[case(None, "\"a,b\"", true, vec!["a,b"])]
    #[case(Some(","), "a,b", false, vec!["a", "b"])]
    fn split_value_optional(
        #[case] regex: Option<&str>,
        #[case] value: &str,
        #[case] trim_quotes: bool,
        #[case] expected: Vec<&str>,
    ) {
        // Setup
        let splitter = regex.map(|regex| Splitter::new(regex).unwrap());
        let config = ParserConfiguration::default().trim_quotes(trim_quotes);

        // Execute
        let values = split_value(
            value,
            splitter.as_ref(),
            &config,
            &Range::fixed(1),
            0,
            &Tracer::off(),
        );

        // Verify
        assert_eq!(values, expected);
    }

    #[rstest]
    #[case("\"abc\"", true, "abc")]
    #[case("\"\"", true, "")]
    #[case("\"", false, "\"")]
    #[case("abc", false, "abc")]
    #[case("\"abc", false, "\"abc")]
    #[case("\"abc\\\"", false, "\"abc\\\"")]
    fn quoting(#[case] value: &str, #[case] quoted: bool, #[case] unquoted: &str) {
        assert_eq!(is_quoted(value), quoted);
        assert_eq!(unquote(value), unquoted);
    }

    #[test]
    fn invalid_regex() {
        assert_matches!(Splitter::new("("), Err(ConfigError(message)) => {
            crate::test::assert_contains!(message, "Invalid split regex '('");
        });
    }
}
