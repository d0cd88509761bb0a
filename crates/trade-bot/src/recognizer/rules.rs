//! Regex based entity recognizer

use super::{CurrencyUnit, Entity, EntityKind, EntityRecognizer, Locale, Resolution};
use crate::error::{Result, TradeError};
use chrono::NaiveDate;
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use tracing::trace;

/// Digits with optional separators; the locale decides which is which
const NUMBER: &str = r"\d[\d.,]*\d|\d";

/// Recognizes numbers, currency amounts, percentages, ordinals, dates and
/// datetimes
///
/// Dates, percentages and ordinals swallow the digits they contain, so
/// `2024-03-01` yields one date and no numbers. Currency amounts do not:
/// `$120` yields a currency entity and the number `120` inside it.
#[derive(Debug, Clone)]
pub struct RuleRecognizer {
    datetime: Regex,
    iso_date: Regex,
    slash_date: Regex,
    dotted_date: Regex,
    currency_prefix: Regex,
    currency_suffix: Regex,
    percentage: Regex,
    ordinal: Regex,
    number: Regex,
}

impl RuleRecognizer {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| TradeError::ConfigError(format!("Invalid recognizer pattern: {e}")))
        };

        Ok(Self {
            datetime: compile(r"\b(\d{4})-(\d{1,2})-(\d{1,2})[ T](\d{1,2}):(\d{2})\b")?,
            iso_date: compile(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b")?,
            slash_date: compile(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b")?,
            dotted_date: compile(r"\b(\d{1,2})\.(\d{1,2})\.(\d{4})\b")?,
            currency_prefix: compile(&format!(
                r"(?i)(us\$|\$|€|£|\b(?:usd|eur|gbp)\b)\s?({NUMBER})"
            ))?,
            currency_suffix: compile(&format!(
                r"(?i)({NUMBER})\s?(?:(dollars?|bucks|euros?|pounds?|usd|eur|gbp)\b|(€|£))"
            ))?,
            percentage: compile(&format!(r"(?i)({NUMBER})\s?(?:%|percent\b)"))?,
            ordinal: compile(r"(?i)\b(\d+)(?:st|nd|rd|th)\b")?,
            number: compile(NUMBER)?,
        })
    }

    fn dates(&self, text: &str, locale: &Locale, found: &mut Spans) {
        for caps in self.datetime.captures_iter(text) {
            let resolution = date_from(&caps, 1, 2, 3)
                .and_then(|date| date.and_hms_opt(part(&caps, 4)?, part(&caps, 5)?, 0))
                .map(Resolution::DateTime);
            found.claim(&caps, EntityKind::DateTime, resolution);
        }

        for caps in self.iso_date.captures_iter(text) {
            let resolution = date_from(&caps, 1, 2, 3).map(Resolution::Date);
            found.claim(&caps, EntityKind::Date, resolution);
        }

        for caps in self.slash_date.captures_iter(text) {
            let (month, day) = if locale.month_first() { (1, 2) } else { (2, 1) };
            let resolution = date_from(&caps, 3, month, day).map(Resolution::Date);
            found.claim(&caps, EntityKind::Date, resolution);
        }

        for caps in self.dotted_date.captures_iter(text) {
            let resolution = date_from(&caps, 3, 2, 1).map(Resolution::Date);
            found.claim(&caps, EntityKind::Date, resolution);
        }
    }

    fn currencies(&self, text: &str, locale: &Locale, found: &mut Spans) {
        for caps in self.currency_prefix.captures_iter(text) {
            let unit = currency_unit(&caps[1]);
            let resolution = unit.and_then(|unit| {
                parse_number(&caps[2], locale).map(|value| Resolution::Currency { value, unit })
            });
            found.claim(&caps, EntityKind::Currency, resolution);
        }

        for caps in self.currency_suffix.captures_iter(text) {
            let unit = caps
                .get(2)
                .or_else(|| caps.get(3))
                .and_then(|m| currency_unit(m.as_str()));
            let resolution = unit.and_then(|unit| {
                parse_number(&caps[1], locale).map(|value| Resolution::Currency { value, unit })
            });
            found.claim(&caps, EntityKind::Currency, resolution);
        }
    }

    fn quantities(&self, text: &str, locale: &Locale, found: &mut Spans) {
        for caps in self.percentage.captures_iter(text) {
            let resolution = parse_number(&caps[1], locale).map(Resolution::Number);
            found.claim(&caps, EntityKind::Percentage, resolution);
        }

        for caps in self.ordinal.captures_iter(text) {
            let resolution = parse_number(&caps[1], locale).map(Resolution::Number);
            found.claim(&caps, EntityKind::Ordinal, resolution);
        }
    }

    fn numbers(&self, text: &str, locale: &Locale, found: &mut Spans) {
        for m in self.number.find_iter(text) {
            let glued = text[..m.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '_');
            if glued || found.swallowed(m.start(), m.end()) {
                continue;
            }

            let resolution = parse_number(m.as_str(), locale).map(Resolution::Number);
            found.entities.push(Entity::new(
                EntityKind::Number,
                m.as_str(),
                m.start(),
                m.end(),
                resolution,
            ));
        }
    }
}

impl EntityRecognizer for RuleRecognizer {
    fn recognize(&self, text: &str, locale: &Locale) -> Vec<Entity> {
        let mut found = Spans::default();

        self.dates(text, locale, &mut found);
        self.currencies(text, locale, &mut found);
        self.quantities(text, locale, &mut found);
        self.numbers(text, locale, &mut found);

        let mut entities = found.entities;
        entities.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        trace!(count = entities.len(), "Recognized entities");
        entities
    }
}

/// Entities found so far; non-number entities never overlap each other
#[derive(Default)]
struct Spans {
    entities: Vec<Entity>,
}

impl Spans {
    fn overlaps(&self, start: usize, end: usize, swallowing_only: bool) -> bool {
        self.entities.iter().any(|e| {
            e.start < end
                && start < e.end
                && !(swallowing_only && e.kind == EntityKind::Currency)
        })
    }

    /// Record the whole match unless an earlier entity already covers part of it
    fn claim(&mut self, caps: &Captures<'_>, kind: EntityKind, resolution: Option<Resolution>) {
        let Some(m) = caps.get(0) else { return };
        if self.overlaps(m.start(), m.end(), false) {
            return;
        }
        self.entities
            .push(Entity::new(kind, m.as_str(), m.start(), m.end(), resolution));
    }

    /// Whether a bare number falls inside a date, percentage or ordinal
    fn swallowed(&self, start: usize, end: usize) -> bool {
        self.overlaps(start, end, true)
    }
}

fn part(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

fn date_from(caps: &Captures<'_>, year: usize, month: usize, day: usize) -> Option<NaiveDate> {
    let year: i32 = caps.get(year)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, part(caps, month)?, part(caps, day)?)
}

fn currency_unit(symbol: &str) -> Option<CurrencyUnit> {
    let symbol = symbol.to_lowercase();
    match symbol.as_str() {
        "$" | "us$" | "usd" | "bucks" => Some(CurrencyUnit::Dollar),
        "€" | "eur" => Some(CurrencyUnit::Euro),
        "£" | "gbp" => Some(CurrencyUnit::Pound),
        s if s.starts_with("dollar") => Some(CurrencyUnit::Dollar),
        s if s.starts_with("euro") => Some(CurrencyUnit::Euro),
        s if s.starts_with("pound") => Some(CurrencyUnit::Pound),
        _ => None,
    }
}

/// Parse digits written with the locale's separators
///
/// Thousands groups must have three digits, so `1,2` is not a number in
/// English.
fn parse_number(raw: &str, locale: &Locale) -> Option<Decimal> {
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    let (integer, fraction) = match raw.split_once(locale.decimal_separator()) {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (raw, None),
    };

    let groups: Vec<&str> = integer.split(locale.thousands_separator()).collect();
    if !groups.iter().all(|g| all_digits(g)) {
        return None;
    }
    if groups.len() > 1 && (groups[0].len() > 3 || groups[1..].iter().any(|g| g.len() != 3)) {
        return None;
    }

    let mut normalized = groups.concat();
    if let Some(fraction) = fraction {
        if !all_digits(fraction) {
            return None;
        }
        normalized.push('.');
        normalized.push_str(fraction);
    }
    normalized.parse().ok()
}
