use std::collections::HashMap;

use crate::matcher::Splitter;
use crate::model::{ParameterClass, Range, TargetShape};
use crate::parser::ConfigError;

/// Identifies a parameter of a built command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpecId {
    /// The option at this declaration index.
    Option(usize),
    /// The positional parameter at this declaration index.
    Positional(usize),
}

/// The capabilities shared by resolved options and positional parameters.
pub trait ArgSpec {
    /// The identity of this parameter.
    fn id(&self) -> SpecId;

    /// The parameter label (ex: `<file>`).
    fn label(&self) -> &str;

    /// Tokens consumed per occurrence.
    fn arity(&self) -> &Range;

    /// The target shape.
    fn shape(&self) -> &TargetShape;

    /// The value split regex.
    fn splitter(&self) -> Option<&Splitter>;

    /// The value bound when the parameter is absent.
    fn default_value(&self) -> Option<&str>;

    /// The value bound when the parameter is present without a value.
    fn fallback_value(&self) -> Option<&str>;

    /// How this parameter is referred to in messages.
    /// `index` is the value index within the current occurrence.
    fn describe(&self, index: usize) -> String;

    /// Whether this is an option or a positional parameter.
    fn class(&self) -> ParameterClass {
        match self.id() {
            SpecId::Option(_) => ParameterClass::Opt,
            SpecId::Positional(_) => ParameterClass::Pos,
        }
    }

    /// Sub-values per logical value.
    fn type_arity(&self) -> usize {
        self.shape().type_arity()
    }

    /// Whether values accumulate rather than overwrite.
    fn is_multi_value(&self) -> bool {
        self.shape().is_multi_value()
    }
}

/// A resolved option.
#[derive(Debug, Clone)]
pub struct OptionConfig {
    id: usize,
    names: Vec<String>,
    label: String,
    arity: Range,
    shape: TargetShape,
    splitter: Option<Splitter>,
    default_value: Option<String>,
    fallback_value: Option<String>,
    required: bool,
}

impl OptionConfig {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: usize,
        names: Vec<String>,
        label: String,
        arity: Range,
        shape: TargetShape,
        splitter: Option<Splitter>,
        default_value: Option<String>,
        fallback_value: Option<String>,
        required: bool,
    ) -> Self {
        Self {
            id,
            names,
            label,
            arity,
            shape,
            splitter,
            default_value,
            fallback_value,
            required,
        }
    }

    /// Every name of this option.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The longest name (the first one on ties).
    pub fn longest_name(&self) -> &str {
        longest(&self.names)
    }

    /// Whether the option must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The option as written in a usage line (ex: `--file=<file>`).
    pub fn synopsis(&self) -> String {
        if self.arity.max() == 0 {
            self.longest_name().to_string()
        } else {
            format!("{}={}", self.longest_name(), self.label)
        }
    }
}

pub(crate) fn longest(names: &[String]) -> &str {
    let mut out = "";

    for name in names {
        if name.len() > out.len() {
            out = name;
        }
    }

    out
}

impl ArgSpec for OptionConfig {
    fn id(&self) -> SpecId {
        SpecId::Option(self.id)
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn arity(&self) -> &Range {
        &self.arity
    }

    fn shape(&self) -> &TargetShape {
        &self.shape
    }

    fn splitter(&self) -> Option<&Splitter> {
        self.splitter.as_ref()
    }

    fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    fn fallback_value(&self) -> Option<&str> {
        self.fallback_value.as_deref()
    }

    fn describe(&self, index: usize) -> String {
        if self.arity.max() > 1 {
            format!(
                "option '{}' at index {index} ({})",
                self.longest_name(),
                self.label
            )
        } else {
            format!("option '{}' ({})", self.longest_name(), self.label)
        }
    }
}

/// A resolved positional parameter.
#[derive(Debug, Clone)]
pub struct PositionalConfig {
    id: usize,
    name: String,
    label: String,
    index: Range,
    arity: Range,
    shape: TargetShape,
    splitter: Option<Splitter>,
    default_value: Option<String>,
}

impl PositionalConfig {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: usize,
        name: String,
        label: String,
        index: Range,
        arity: Range,
        shape: TargetShape,
        splitter: Option<Splitter>,
        default_value: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            label,
            index,
            arity,
            shape,
            splitter,
            default_value,
        }
    }

    /// The declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The positions claimed.
    pub fn index(&self) -> &Range {
        &self.index
    }

    /// Whether a parse without this parameter fails.
    pub fn is_required(&self) -> bool {
        self.arity.min() > 0 && self.default_value.is_none()
    }
}

impl ArgSpec for PositionalConfig {
    fn id(&self) -> SpecId {
        SpecId::Positional(self.id)
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn arity(&self) -> &Range {
        &self.arity
    }

    fn shape(&self) -> &TargetShape {
        &self.shape
    }

    fn splitter(&self) -> Option<&Splitter> {
        self.splitter.as_ref()
    }

    fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    fn fallback_value(&self) -> Option<&str> {
        None
    }

    fn describe(&self, _index: usize) -> String {
        format!("positional parameter at index {} ({})", self.index, self.label)
    }
}

/// The resolved parameters of a command, with name lookups.
#[derive(Debug, Clone)]
pub(crate) struct Specs {
    options: Vec<OptionConfig>,
    positionals: Vec<PositionalConfig>,
    names: HashMap<String, usize>,
    shorts: HashMap<char, usize>,
    positional_names: HashMap<String, usize>,
}

impl Specs {
    pub(crate) fn new(
        options: Vec<OptionConfig>,
        positionals: Vec<PositionalConfig>,
    ) -> Result<Self, ConfigError> {
        let mut names = HashMap::default();
        let mut shorts = HashMap::default();
        let mut positional_names = HashMap::default();

        for option in options.iter() {
            for name in option.names() {
                if names.insert(name.clone(), option.id).is_some() {
                    return Err(ConfigError(format!(
                        "Cannot duplicate the option name '{name}'."
                    )));
                }

                if let Some(short) = short_name(name) {
                    shorts.insert(short, option.id);
                }
            }
        }

        for positional in positionals.iter() {
            if positional_names
                .insert(positional.name().to_string(), positional.id)
                .is_some()
            {
                return Err(ConfigError(format!(
                    "Cannot duplicate the positional parameter '{}'.",
                    positional.name()
                )));
            }
        }

        Ok(Self {
            options,
            positionals,
            names,
            shorts,
            positional_names,
        })
    }

    pub(crate) fn options(&self) -> &[OptionConfig] {
        &self.options
    }

    pub(crate) fn positionals(&self) -> &[PositionalConfig] {
        &self.positionals
    }

    pub(crate) fn option(&self, id: usize) -> &OptionConfig {
        &self.options[id]
    }

    pub(crate) fn positional(&self, id: usize) -> &PositionalConfig {
        &self.positionals[id]
    }

    pub(crate) fn spec(&self, id: SpecId) -> &dyn ArgSpec {
        match id {
            SpecId::Option(i) => &self.options[i],
            SpecId::Positional(i) => &self.positionals[i],
        }
    }

    pub(crate) fn find(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    pub(crate) fn find_short(&self, short: char) -> Option<usize> {
        self.shorts.get(&short).copied()
    }

    /// Find a parameter by option name or positional name.
    pub(crate) fn lookup(&self, name: &str) -> Option<SpecId> {
        self.find(name)
            .map(SpecId::Option)
            .or_else(|| self.positional_names.get(name).copied().map(SpecId::Positional))
    }
}

/// The clustering character of a single-character short name (ex: `-v`).
fn short_name(name: &str) -> Option<char> {
    let mut chars = name.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('-'), Some(c), None) if c != '-' => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValueType;
    use rstest::rstest;

    fn option(id: usize, names: &[&str], arity: &str) -> OptionConfig {
        OptionConfig::new(
            id,
            names.iter().map(|n| n.to_string()).collect(),
            "<x>".to_string(),
            Range::value_of(arity).unwrap(),
            TargetShape::List(ValueType::Text),
            None,
            None,
            None,
            false,
        )
    }

    fn positional(id: usize, name: &str, index: &str) -> PositionalConfig {
        PositionalConfig::new(
            id,
            name.to_string(),
            format!("<{name}>"),
            Range::value_of(index).unwrap(),
            Range::fixed(1),
            TargetShape::Scalar(ValueType::Text),
            None,
            None,
        )
    }

    #[rstest]
    #[case(&["-x"], "-x")]
    #[case(&["-x", "--xx"], "--xx")]
    #[case(&["--ab", "--cd"], "--ab")]
    #[case(&["-x", "--xray", "-y"], "--xray")]
    fn longest_name(#[case] names: &[&str], #[case] expected: &str) {
        assert_eq!(option(0, names, "1").longest_name(), expected);
    }

    #[rstest]
    #[case("1", "option '--xx' (<x>)")]
    #[case("0..1", "option '--xx' (<x>)")]
    #[case("2", "option '--xx' at index 0 (<x>)")]
    #[case("1..*", "option '--xx' at index 0 (<x>)")]
    fn describe_option(#[case] arity: &str, #[case] expected: &str) {
        assert_eq!(option(0, &["-x", "--xx"], arity).describe(0), expected);
    }

    #[test]
    fn describe_positional() {
        assert_eq!(
            positional(0, "params", "0..*").describe(3),
            "positional parameter at index 0..* (<params>)"
        );
    }

    #[test]
    fn type_arity() {
        let map = OptionConfig::new(
            0,
            vec!["-m".to_string()],
            "<m>".to_string(),
            Range::fixed(1),
            TargetShape::map(ValueType::Text, ValueType::Integer),
            None,
            None,
            None,
            false,
        );

        assert_eq!(map.type_arity(), 2);
        assert_eq!(option(0, &["-x"], "1").type_arity(), 1);
        assert_eq!(positional(0, "file", "0").type_arity(), 1);
    }

    #[rstest]
    #[case("0", "--xx")]
    #[case("1", "--xx=<x>")]
    fn synopsis(#[case] arity: &str, #[case] expected: &str) {
        assert_eq!(option(0, &["-x", "--xx"], arity).synopsis(), expected);
    }

    #[rstest]
    #[case("-v", Some('v'))]
    #[case("--", None)]
    #[case("--v", None)]
    #[case("-vv", None)]
    #[case("v", None)]
    fn short(#[case] name: &str, #[case] expected: Option<char>) {
        assert_eq!(short_name(name), expected);
    }

    #[test]
    fn specs_lookup() {
        let specs = Specs::new(
            vec![option(0, &["-a", "--alpha"], "1"), option(1, &["--beta"], "1")],
            vec![positional(0, "file", "0")],
        )
        .unwrap();

        assert_eq!(specs.find("--alpha"), Some(0));
        assert_eq!(specs.find("--beta"), Some(1));
        assert_eq!(specs.find("--gamma"), None);
        assert_eq!(specs.find_short('a'), Some(0));
        assert_eq!(specs.find_short('b'), None);
        assert_eq!(specs.lookup("-a"), Some(SpecId::Option(0)));
        assert_eq!(specs.lookup("file"), Some(SpecId::Positional(0)));
        assert_eq!(specs.spec(SpecId::Positional(0)).label(), "<file>");
        assert_eq!(specs.spec(SpecId::Option(1)).class(), ParameterClass::Opt);
    }

    #[test]
    fn specs_duplicate_option() {
        let result = Specs::new(
            vec![option(0, &["-a"], "1"), option(1, &["--b", "-a"], "1")],
            vec![],
        );

        assert_matches!(result, Err(ConfigError(message)) => {
            assert_eq!(message, "Cannot duplicate the option name '-a'.");
        });
    }

    #[test]
    fn specs_duplicate_positional() {
        let result = Specs::new(
            vec![],
            vec![positional(0, "a", "0"), positional(1, "a", "1")],
        );

        assert_matches!(result, Err(ConfigError(message)) => {
            assert_eq!(message, "Cannot duplicate the positional parameter 'a'.");
        });
    }
}
