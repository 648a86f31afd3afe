use crate::api::ParserConfiguration;
use crate::matcher::split::is_quoted;
use crate::matcher::Specs;

/// What a token means while options are still being scanned.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TokenClass<'t> {
    /// Exactly a declared name.
    Option(usize),
    /// `name<separator>value` for a declared name.
    Attached {
        id: usize,
        name: &'t str,
        value: &'t str,
    },
    /// Clustered short options (ex: `-abc`), starting with a declared short option.
    Cluster,
    /// Looks like an option, but matches none.
    UnknownOption,
    /// A plain value.
    Value,
}

pub(crate) struct TokenClassifier<'s> {
    specs: &'s Specs,
    config: &'s ParserConfiguration,
}

impl<'s> TokenClassifier<'s> {
    pub(crate) fn new(specs: &'s Specs, config: &'s ParserConfiguration) -> Self {
        Self { specs, config }
    }

    pub(crate) fn classify<'t>(&self, token: &'t str) -> TokenClass<'t> {
        // 1. Quoted tokens are values, when quotes are trimmed:
        //  "--verbose"
        // 2. Declared names:
        //  --file
        //  -f
        // 3. Declared names with an attached value:
        //  --file=a.txt
        //  -f=a.txt
        // 4. Clustered short options:
        //  -vf
        //  -vfa.txt
        if self.config.is_trim_quotes() && is_quoted(token) {
            return TokenClass::Value;
        }

        if let Some(id) = self.specs.find(token) {
            return TokenClass::Option(id);
        }

        if let Some((name, value)) = self.split_attached(token) {
            if let Some(id) = self.specs.find(name) {
                return TokenClass::Attached { id, name, value };
            }
        }

        if self.is_cluster(token) {
            TokenClass::Cluster
        } else if resembles_option(token) {
            TokenClass::UnknownOption
        } else {
            TokenClass::Value
        }
    }

    /// Whether the token would start a new option, which stops value consumption.
    pub(crate) fn is_option(&self, token: &str, delimiter_seen: bool) -> bool {
        if !delimiter_seen && token == self.config.get_end_of_options_delimiter() {
            return true;
        }

        match self.classify(token) {
            TokenClass::Option(_) | TokenClass::Attached { .. } | TokenClass::Cluster => true,
            TokenClass::UnknownOption | TokenClass::Value => false,
        }
    }

    fn split_attached<'t>(&self, token: &'t str) -> Option<(&'t str, &'t str)> {
        let separator = self.config.get_separator();

        if separator.is_empty() {
            return None;
        }

        match token.find(separator) {
            Some(0) | None => None,
            Some(index) => Some((&token[..index], &token[index + separator.len()..])),
        }
    }

    fn is_cluster(&self, token: &str) -> bool {
        if !self.config.is_posix_clustered_short_options_allowed() {
            return false;
        }

        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some('-'), Some(c)) if c != '-' => self.specs.find_short(c).is_some(),
            _ => false,
        }
    }
}

/// Starts with `-`, is longer than `-`, and is not a negative number.
pub(crate) fn resembles_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && !is_number(token)
}

fn is_number(token: &str) -> bool {
    let digits = token.trim_start_matches('-');
    digits
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_digit() || c == '.')
        && token.parse::<f64>().is_ok()
}
