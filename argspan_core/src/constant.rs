pub(crate) const DEFAULT_END_OF_OPTIONS: &str = "--";
pub(crate) const DEFAULT_SEPARATOR: &str = "=";
pub(crate) const BOOLEAN_FALLBACK: &str = "true";
pub(crate) const TEXT_FALLBACK: &str = "";
pub(crate) const QUOTE: char = '"';
pub(crate) const ESCAPE: char = '\\';
pub(crate) const MAP_ENTRY_SEPARATOR: char = '=';
