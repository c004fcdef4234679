//! Locale-aware rendering of monetary amounts and report dates.

use std::{collections::HashMap, fmt::Write};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::Config;

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Separators used when rendering numbers for a locale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "pt-BR".into(),
            decimal_separator: ',',
            grouping_separator: '.',
        }
    }
}

static LOCALES: Lazy<HashMap<&'static str, LocaleConfig>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(
        "pt-BR",
        LocaleConfig {
            language_tag: "pt-BR".into(),
            decimal_separator: ',',
            grouping_separator: '.',
        },
    );
    map.insert(
        "en-US",
        LocaleConfig {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
        },
    );
    map.insert(
        "de-DE",
        LocaleConfig {
            language_tag: "de-DE".into(),
            decimal_separator: ',',
            grouping_separator: '.',
        },
    );
    map
});

/// Resolves a locale tag, falling back to `pt-BR` for unknown tags.
pub fn locale_for(tag: &str) -> LocaleConfig {
    LOCALES.get(tag).cloned().unwrap_or_default()
}

pub fn is_known_locale(tag: &str) -> bool {
    LOCALES.contains_key(tag)
}

pub fn symbol_for(code: &str) -> &str {
    match code {
        "BRL" => "R$ ",
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        _ => code,
    }
}

pub fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Formats amounts for one locale and currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    pub locale: LocaleConfig,
    pub currency: String,
}

impl MoneyFormat {
    pub fn new(locale: LocaleConfig, currency: impl Into<String>) -> Self {
        Self {
            locale,
            currency: currency.into().to_uppercase(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(locale_for(&config.locale), config.currency.clone())
    }

    pub fn format(&self, amount: Decimal) -> String {
        let precision = minor_units_for(&self.currency);
        let body = format_number(&self.locale, amount.abs(), precision);
        let sign = if amount.is_sign_negative() && !amount.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{}{}{}", sign, symbol_for(&self.currency), body)
    }

    /// Renders a percentage with the locale decimal separator, e.g. `12,5%`.
    pub fn format_percent(&self, value: Decimal) -> String {
        let body = format_number(&self.locale, value.abs(), 1);
        let sign = if value.is_sign_negative() && !value.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{}{}%", sign, body)
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

pub fn format_number(locale: &LocaleConfig, value: Decimal, precision: u32) -> String {
    let rounded = value.round_dp(precision);
    let mut body = format!("{:.*}", precision as usize, rounded);
    if locale.decimal_separator != '.' {
        if let Some(pos) = body.find('.') {
            body.replace_range(pos..=pos, &locale.decimal_separator.to_string());
        }
    }
    if precision > 0 {
        if let Some(pos) = body.rfind(locale.decimal_separator) {
            let int_part = group_digits(&body[..pos], locale.grouping_separator);
            return format!("{}{}", int_part, &body[pos..]);
        }
    }
    group_digits(&body, locale.grouping_separator)
}

fn group_digits(digits: &str, separator: char) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    format!("{}{}", sign, grouped)
}

/// Renders a date with a strftime pattern, falling back to ISO when the
/// pattern is invalid.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        out.clear();
        let _ = write!(out, "{}", date.format(FALLBACK_DATE_FORMAT));
    }
    out
}

/// Returns true when the strftime pattern renders without errors.
pub fn is_valid_date_format(pattern: &str) -> bool {
    use chrono::format::{Item, StrftimeItems};
    !pattern.is_empty() && StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}
