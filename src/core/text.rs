//! Text Functions
//! CONCAT, LEFT, RIGHT, MID, LEN, TRIM
//!
//! Positions and lengths count chars, not bytes.

use crate::error::{CalcError, CalcResult};

/// CONCAT/CONCATENATE with an optional joiner ("" for plain CONCAT)
pub fn concatenate<I, S>(parts: I, joiner: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = String::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            result.push_str(joiner);
        }
        result.push_str(part.as_ref());
    }
    result
}

/// LEFT(text, n)
pub fn left(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

/// RIGHT(text, n)
pub fn right(text: &str, n: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let start = chars.len().saturating_sub(n);
    chars[start..].iter().collect()
}

/// MID(text, start, length) with a 1-based `start`
pub fn mid(text: &str, start: usize, length: usize) -> CalcResult<String> {
    if start < 1 {
        return Err(CalcError::invalid(format!("MID: start {} must be >= 1", start)));
    }
    Ok(text.chars().skip(start - 1).take(length).collect())
}

/// LEN(text)
pub fn len(text: &str) -> usize {
    text.chars().count()
}

/// TRIM(text): strip leading/trailing spaces and collapse inner runs to one space
pub fn trim(text: &str) -> String {
    text.split(' ')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
