//! Entity extraction from free text
//!
//! An [`EntityRecognizer`] turns a user utterance into typed [`Entity`]
//! values with character spans. The dialog only depends on the trait;
//! [`RuleRecognizer`] is the built-in implementation.

pub mod locale;
pub mod rules;

pub use locale::Locale;
pub use rules::RuleRecognizer;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of a recognized entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Number,
    Currency,
    DateTime,
    Date,
    Ordinal,
    Percentage,
}

/// Currency units the rule recognizer knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyUnit {
    Dollar,
    Euro,
    Pound,
}

/// Machine-readable value of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Number(Decimal),
    Currency { value: Decimal, unit: CurrencyUnit },
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// A typed fragment of the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    /// Matched text
    pub text: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// `None` when the text could not be resolved to a value
    pub resolution: Option<Resolution>,
}

impl Entity {
    pub fn new(
        kind: EntityKind,
        text: impl Into<String>,
        start: usize,
        end: usize,
        resolution: Option<Resolution>,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
            resolution,
        }
    }

    /// Whether this entity's span lies inside `other`'s
    pub fn is_within(&self, other: &Entity) -> bool {
        self.start >= other.start && self.end <= other.end
    }

    /// Numeric value of a number, currency or percentage entity
    pub fn decimal_value(&self) -> Option<Decimal> {
        match self.resolution {
            Some(Resolution::Number(value) | Resolution::Currency { value, .. }) => Some(value),
            _ => None,
        }
    }
}

/// Extracts entities from text
#[cfg_attr(test, mockall::automock)]
pub trait EntityRecognizer: Send + Sync {
    /// Recognize entities in `text`, ordered by start offset
    fn recognize(&self, text: &str, locale: &Locale) -> Vec<Entity>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_span_containment() {
        let currency = Entity::new(
            EntityKind::Currency,
            "$120",
            10,
            14,
            Some(Resolution::Currency {
                value: dec!(120),
                unit: CurrencyUnit::Dollar,
            }),
        );
        let inner = Entity::new(
            EntityKind::Number,
            "120",
            11,
            14,
            Some(Resolution::Number(dec!(120))),
        );
        let outer = Entity::new(EntityKind::Number, "25", 4, 6, None);

        assert!(inner.is_within(&currency));
        assert!(!outer.is_within(&currency));
        assert_eq!(currency.decimal_value(), Some(dec!(120)));
        assert_eq!(outer.decimal_value(), None);
    }

    #[test]
    fn test_mock_recognizer() {
        let mut mock = MockEntityRecognizer::new();
        mock.expect_recognize()
            .returning(|text, _| vec![Entity::new(EntityKind::Number, text, 0, text.len(), None)]);

        let entities = mock.recognize("42", &Locale::English);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "42");
    }
}
