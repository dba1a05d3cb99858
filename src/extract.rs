//! Field extraction from Coastal transaction alert text

use crate::error::{Field, ParseError, Result};
use crate::types::TransactionRecord;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Banner phrase identifying a transaction alert
pub const SIGNATURE: &str = "Coastal Alert: A Transaction Has Occurred on Your Account";

/// Number of trailing account digits shown in an alert
pub const NUM_DIGITS: usize = 4;

/// Separator between a label and its value: whitespace and `&nbsp;` in any mix
const WS: &str = r"(?:\s|&nbsp;)*";

/// Same as [`WS`] without line breaks, for gaps that must stay on one line
const INLINE_WS: &str = r"(?:[^\S\r\n]|&nbsp;)*";

/// Dollar figure with optional thousands separators and exactly two decimals
const NUM: &str = r"(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}";

static ACCOUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("Account:{WS}")).unwrap());

static AMOUNT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"Amount:{WS}(?:\(\$?(?P<paren>{NUM})\)|(?P<minus>-)?\$?(?P<plain>{NUM}))(?:{INLINE_WS}(?P<bare>{NUM}))?"
    ))
    .unwrap()
});

static PAYEE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"Description:{INLINE_WS}([^\r\n]*?)\r?\n")).unwrap());

static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Date:\s(?P<day>\d{1,2})\s(?P<month>[A-Za-z]{3})\s(?P<year>\d{4})").unwrap()
});

/// Check whether `text` is a transaction alert at all
#[must_use]
pub fn matches_signature(text: &str) -> bool {
    text.contains(SIGNATURE)
}

/// Parse alert text, returning `None` when the email is not a transaction alert
pub fn parse_transaction(text: &str) -> Result<Option<TransactionRecord>> {
    if !matches_signature(text) {
        debug!("Email does not match the alert signature, skipping");
        return Ok(None);
    }

    debug!("Email matches the alert signature, parsing contents");
    TransactionRecord::extract(text).map(Some)
}

impl TransactionRecord {
    /// Extract all transaction fields from alert text
    ///
    /// Amount, payee and last digits are read from the text following the
    /// `Account:` label; the date is searched for across the whole text.
    pub fn extract(text: &str) -> Result<Self> {
        if !matches_signature(text) {
            return Err(ParseError::MissingSignature);
        }

        let remainder = account_remainder(text)?;
        let last_digits = extract_last_digits(remainder)?;
        let amount = extract_amount(remainder)?;
        let payee = extract_payee(remainder)?;
        let date = extract_date(text)?;

        debug!(
            "Parsed transaction: account {} amount {} payee {:?} date {}",
            last_digits, amount, payee, date
        );

        Ok(Self::new(last_digits, date, amount, payee))
    }
}

fn account_remainder(text: &str) -> Result<&str> {
    ACCOUNT_REGEX
        .find(text)
        .map(|m| &text[m.end()..])
        .ok_or_else(|| ParseError::malformed(Field::LastDigits, "no `Account:` label"))
}

fn extract_last_digits(remainder: &str) -> Result<String> {
    let end = [
        remainder.find(char::is_whitespace),
        remainder.find("&nbsp;"),
    ]
    .into_iter()
    .flatten()
    .min()
    .unwrap_or(remainder.len());
    let token = &remainder[..end];

    if token.len() != NUM_DIGITS || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::malformed(
            Field::LastDigits,
            format!("expected {NUM_DIGITS} digits, found {token:?}"),
        ));
    }

    Ok(token.to_string())
}

fn extract_amount(remainder: &str) -> Result<String> {
    let caps = AMOUNT_REGEX.captures(remainder).ok_or_else(|| {
        ParseError::malformed(Field::Amount, "no `Amount:` label followed by a dollar figure")
    })?;

    let (magnitude, mut debit) = match (caps.name("paren"), caps.name("plain")) {
        (Some(paren), _) => (strip_separators(paren.as_str()), true),
        (None, Some(plain)) => (strip_separators(plain.as_str()), caps.name("minus").is_some()),
        (None, None) => {
            return Err(ParseError::malformed(Field::Amount, "empty amount"));
        }
    };

    // A figure repeated right after the dollar amount marks a charge.
    if let Some(bare) = caps.name("bare") {
        let bare = strip_separators(bare.as_str());
        if bare != magnitude {
            return Err(ParseError::malformed(
                Field::Amount,
                format!("duplicated amount {bare} disagrees with {magnitude}"),
            ));
        }
        debit = true;
    }

    Ok(if debit {
        format!("-{magnitude}")
    } else {
        magnitude
    })
}

fn strip_separators(figure: &str) -> String {
    figure.replace(',', "")
}

fn extract_payee(remainder: &str) -> Result<String> {
    PAYEE_REGEX
        .captures(remainder)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end().to_string())
        .ok_or_else(|| {
            ParseError::malformed(
                Field::Payee,
                "no `Description:` label terminated by a line break",
            )
        })
}

fn extract_date(text: &str) -> Result<String> {
    let caps = DATE_REGEX.captures(text).ok_or_else(|| {
        ParseError::malformed(Field::Date, "no `Date:` label followed by `D MMM YYYY`")
    })?;

    format_date(&format!(
        "{} {}, {}",
        &caps["month"], &caps["day"], &caps["year"]
    ))
}

/// Convert a `Mon D, YYYY` date to ISO 8601 full-date (`YYYY-MM-DD`)
pub fn format_date(date: &str) -> Result<String> {
    let cleaned = date.replace("\r\n", " ").replace(',', "");
    let mut parts = cleaned.split_whitespace();

    let (Some(month), Some(day), Some(year)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ParseError::malformed(
            Field::Date,
            format!("expected month, day and year in {date:?}"),
        ));
    };

    let parsed = NaiveDate::parse_from_str(&format!("{month} {day} {year}"), "%b %d %Y")
        .map_err(|e| ParseError::malformed(Field::Date, format!("{date:?}: {e}")))?;

    Ok(parsed.format("%Y-%m-%d").to_string())
}
