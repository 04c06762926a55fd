use crate::error::ParseError;

/// Parses a percentage string like `"12.30%"` into `12.3`.
pub fn percent(raw: &str) -> Result<f64, ParseError> {
    let trimmed = raw.trim();
    let body = trimmed.strip_suffix('%').ok_or_else(|| ParseError::MissingUnit {
        raw: trimmed.to_string(),
        unit: "%",
    })?;
    parse_number(body)
}

/// Parses a unit-suffixed reading like `"42 C"` by taking the leading token.
pub fn leading_number(raw: &str) -> Result<f64, ParseError> {
    let token = raw
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::Number(raw.to_string()))?;
    parse_number(token)
}

fn parse_number(body: &str) -> Result<f64, ParseError> {
    body.trim()
        .parse()
        .map_err(|_| ParseError::Number(body.trim().to_string()))
}
