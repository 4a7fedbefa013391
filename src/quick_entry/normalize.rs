use rust_decimal::Decimal;
use std::str::FromStr;

use super::ParseError;

/// Prepositions dropped when they open the description ("30 com academia").
const STOP_WORDS: &[&str] = &[
    "com", "no", "na", "de", "do", "da", "para", "pelo", "pela", "em", "a", "o",
];

/// Split a quick-entry line into its unsigned amount and a cleaned
/// description, `None` when nothing but the amount was typed.
pub(crate) fn normalize(input: &str) -> Result<(Decimal, Option<String>), ParseError> {
    let trimmed = input.trim();
    let (start, end) = find_amount_token(trimmed).ok_or(ParseError::NoAmountFound)?;
    let amount = parse_amount(&trimmed[start..end])?;

    let remainder = format!("{}{}", &trimmed[..start], &trimmed[end..]);
    let remainder = strip_currency_symbol(remainder.trim());
    let description = capitalize_first(&drop_leading_stop_word(remainder));

    if description.is_empty() {
        Ok((amount, None))
    } else {
        Ok((amount, Some(description)))
    }
}

fn is_amount_byte(b: u8) -> bool {
    b.is_ascii_digit() || b == b'.' || b == b','
}

/// Byte range of the first maximal run of digits, `.` and `,` that holds
/// at least one digit. All bytes in the run are ASCII, so both ends are
/// char boundaries.
fn find_amount_token(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !is_amount_byte(bytes[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && is_amount_byte(bytes[i]) {
            i += 1;
        }
        if bytes[start..i].iter().any(u8::is_ascii_digit) {
            return Some((start, i));
        }
    }
    None
}

/// Comma is a decimal separator. More than one separator is rejected
/// rather than guessed at, so "1.200,50" fails while "1.200" reads as 1.2.
fn parse_amount(token: &str) -> Result<Decimal, ParseError> {
    let mut number = token.replace(',', ".");
    let kept = number.trim_end_matches('.').len();
    number.truncate(kept);
    if number.starts_with('.') {
        number.insert(0, '0');
    }

    if number.matches('.').count() > 1 {
        return Err(ParseError::AmbiguousAmount(token.to_string()));
    }

    // from_str rounds digits it cannot hold; a changed scale means it did.
    let fraction_digits = number.split_once('.').map_or(0, |(_, frac)| frac.len());
    let amount = Decimal::from_str(&number)
        .ok()
        .filter(|amount| amount.scale() as usize == fraction_digits)
        .ok_or_else(|| ParseError::AmountOutOfRange(token.to_string()))?;
    if amount.is_zero() {
        return Err(ParseError::ZeroAmount);
    }
    Ok(amount)
}

fn strip_currency_symbol(text: &str) -> &str {
    let rest = match text.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("r$") => &text[2..],
        _ => text.strip_prefix('$').unwrap_or(text),
    };
    rest.trim_start()
}

/// Only the first word is checked; "para o mercado" keeps "o".
fn drop_leading_stop_word(text: &str) -> String {
    let mut words = text.split_whitespace().peekable();
    if let Some(first) = words.peek() {
        if STOP_WORDS.contains(&first.to_lowercase().as_str()) {
            words.next();
        }
    }
    words.collect::<Vec<_>>().join(" ")
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
