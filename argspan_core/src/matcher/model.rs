use thiserror::Error;

use crate::matcher::api::*;
use crate::model::Range;
use crate::parser::RawValue;

#[derive(Debug, Error, PartialEq, Eq)]
pub(super) enum CloseError {
    #[error("too few values provided (provided={}, expected={expected}).", .provided.len())]
    TooFewValues {
        provided: Vec<RawValue>,
        expected: usize,
    },
}

/// The values gathered for one occurrence of a parameter.
pub(super) struct MatchBuffer<'a> {
    spec: &'a dyn ArgSpec,
    name: String,
    arity: Range,
    position: usize,
    values: Vec<RawValue>,
    attached: bool,
}

impl<'a> MatchBuffer<'a> {
    /// `position` is the index of the token which started the occurrence.
    pub(super) fn new(
        spec: &'a dyn ArgSpec,
        name: impl Into<String>,
        arity: Range,
        position: usize,
    ) -> Self {
        Self {
            spec,
            name: name.into(),
            arity,
            position,
            values: Vec::default(),
            attached: false,
        }
    }

    pub(super) fn spec(&self) -> &'a dyn ArgSpec {
        self.spec
    }

    pub(super) fn name(&self) -> &str {
        &self.name
    }

    pub(super) fn arity(&self) -> &Range {
        &self.arity
    }

    pub(super) fn position(&self) -> usize {
        self.position
    }

    /// Push the value attached to the option token itself (ex: `-x=v`).
    pub(super) fn attach(&mut self, value: RawValue) {
        assert!(self.values.is_empty(), "internal error - only the first value may be attached");
        self.values.push(value);
        self.attached = true;
    }

    pub(super) fn push(&mut self, value: RawValue) {
        self.values.push(value);
    }

    pub(super) fn is_open(&self) -> bool {
        self.values.len() < self.arity.max()
    }

    pub(super) fn can_close(&self) -> bool {
        self.values.len() >= self.arity.min()
    }

    /// The number of values taken from the tokens following the occurrence.
    pub(super) fn followers(&self) -> usize {
        self.values.len() - usize::from(self.attached)
    }

    pub(super) fn close(self) -> Result<Vec<RawValue>, CloseError> {
        if !self.can_close() {
            return Err(CloseError::TooFewValues {
                provided: self.values,
                expected: self.arity.min(),
            });
        }

        Ok(self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TargetShape, ValueType};
    use rstest::rstest;

    fn spec() -> OptionConfig {
        OptionConfig::new(
            0,
            vec!["--x".to_string()],
            "<x>".to_string(),
            Range::fixed(1),
            TargetShape::List(ValueType::Text),
            None,
            None,
            None,
            false,
        )
    }

    #[rstest]
    #[case("0", 0, false, true)]
    #[case("1", 0, true, false)]
    #[case("1", 1, false, true)]
    #[case("1..3", 2, true, true)]
    #[case("2..*", 1, true, false)]
    #[case("2..*", 5, true, true)]
    fn buffer_state(
        #[case] arity: &str,
        #[case] count: usize,
        #[case] open: bool,
        #[case] closable: bool,
    ) {
        // Setup
        let spec = spec();
        let mut buffer = MatchBuffer::new(&spec, "--x", Range::value_of(arity).unwrap(), 0);

        // Execute
        for i in 0..count {
            buffer.push(RawValue::new(i + 1, "v"));
        }

        // Verify
        assert_eq!(buffer.is_open(), open);
        assert_eq!(buffer.can_close(), closable);
        assert_eq!(buffer.followers(), count);

        if closable {
            assert_matches!(buffer.close(), Ok(values) => {
                assert_eq!(values.len(), count);
            });
        } else {
            assert_matches!(buffer.close(), Err(CloseError::TooFewValues { provided, expected }) => {
                assert_eq!(provided.len(), count);
                assert_eq!(expected, Range::value_of(arity).unwrap().min());
            });
        }
    }

    #[test]
    fn attached() {
        let spec = spec();
        let mut buffer = MatchBuffer::new(&spec, "--x", Range::value_of("1..2").unwrap(), 3);
        buffer.attach(RawValue::new(3, "a"));
        assert!(buffer.is_open());
        assert!(buffer.can_close());
        assert_eq!(buffer.followers(), 0);

        buffer.push(RawValue::new(4, "b"));
        assert!(!buffer.is_open());
        assert_eq!(buffer.followers(), 1);
        assert_eq!(buffer.position(), 3);
        assert_eq!(buffer.name(), "--x");
        assert_eq!(buffer.close().unwrap(), vec![RawValue::new(3, "a"), RawValue::new(4, "b")]);
    }
}
