//! Cell and header normalization shared by every aggregator.

use std::ops::RangeInclusive;

/// Owner labels that mean "no owner recorded".
const PLACEHOLDER_LABELS: [&str; 3] = ["none", "null", "unknown"];

/// Normalized labels of the summary row pivot exports append.
const SUMMARY_ROW_KEYS: [&str; 3] = ["total", "grand_total", "totals"];

/// Trim whitespace and surrounding quote characters.
pub fn clean_label(raw: &str) -> String {
    let mut label = raw.trim();
    loop {
        let stripped = label
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .or_else(|| label.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')));
        match stripped {
            Some(inner) => label = inner.trim(),
            None => break,
        }
    }
    label.trim_matches('"').trim().to_string()
}

/// Normalize a column header for lookup.
///
/// Lowercases and collapses each run of non-alphanumeric characters into a
/// single `_`, so `"All Family Country"` becomes `all_family_country`.
pub fn normalize_key(header: &str) -> String {
    let mut key = String::with_capacity(header.len());
    let mut pending_separator = false;

    for c in clean_label(header).chars() {
        if c.is_alphanumeric() {
            if pending_separator && !key.is_empty() {
                key.push('_');
            }
            pending_separator = false;
            key.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    key
}

/// Parse a count cell. Unparseable, negative or non-finite values are 0.
///
/// Thousands separators are accepted and fractional values are rounded.
pub fn parse_count(raw: &str) -> u64 {
    let cleaned: String = clean_label(raw)
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();

    if cleaned.is_empty() {
        return 0;
    }

    if let Ok(value) = cleaned.parse::<u64>() {
        return value;
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value.round() as u64,
        _ => 0,
    }
}

/// Parse a year cell or header, accepting only values inside `range`.
///
/// `"2015"` and `"2015.0"` are accepted; anything else is not a year.
pub fn parse_year(raw: &str, range: &RangeInclusive<u16>) -> Option<u16> {
    let cleaned = clean_label(raw);
    let digits = cleaned.strip_suffix(".0").unwrap_or(&cleaned);

    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    digits.parse::<u16>().ok().filter(|year| range.contains(year))
}

/// Reduce a classification header to its code.
///
/// `"H01M: Processes or means for..."` becomes `"H01M"`. A header without
/// a colon is kept whole.
pub fn classification_code(header: &str) -> String {
    let label = clean_label(header);
    match label.split_once(':') {
        Some((code, _)) if !code.trim().is_empty() => code.trim().to_string(),
        _ => label,
    }
}

/// True for blank owner labels and the `none`/`null`/`unknown` placeholders.
pub fn is_placeholder_owner(label: &str) -> bool {
    let label = label.trim();
    label.is_empty()
        || PLACEHOLDER_LABELS
            .iter()
            .any(|placeholder| label.eq_ignore_ascii_case(placeholder))
}

/// True for the `Total` / `Grand Total` row at the bottom of a pivot export.
pub fn is_summary_row(label: &str) -> bool {
    let key = normalize_key(label);
    SUMMARY_ROW_KEYS.contains(&key.as_str())
}
