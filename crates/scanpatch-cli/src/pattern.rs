//! Strict pattern-argument parsing.
//!
//! Two forms only: a hex byte string (whitespace between bytes allowed) or a
//! double-quoted literal with a fixed escape set. Nothing is ever evaluated.

use anyhow::{Result, bail};

/// Decode a pattern argument into raw bytes.
pub fn parse_pattern(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("pattern is empty");
    }
    if trimmed.starts_with('"') {
        parse_literal(trimmed)
    } else {
        parse_hex(trimmed)
    }
}

fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
    if !digits.len().is_multiple_of(2) {
        bail!("hex pattern has an odd number of digits ({})", digits.len());
    }

    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks_exact(2) {
        let hi = hex_digit(pair[0])?;
        let lo = hex_digit(pair[1])?;
        bytes.push(hi << 4 | lo);
    }
    Ok(bytes)
}

fn parse_literal(input: &str) -> Result<Vec<u8>> {
    let Some(inner) = input
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        bail!("literal pattern is missing its closing quote");
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut utf8 = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            continue;
        }
        match chars.next() {
            Some('x') => {
                let (Some(hi), Some(lo)) = (chars.next(), chars.next()) else {
                    bail!("truncated \\x escape in literal pattern");
                };
                bytes.push(hex_digit(hi)? << 4 | hex_digit(lo)?);
            }
            Some('0') => bytes.push(0),
            Some('n') => bytes.push(b'\n'),
            Some('r') => bytes.push(b'\r'),
            Some('t') => bytes.push(b'\t'),
            Some('\\') => bytes.push(b'\\'),
            Some('"') => bytes.push(b'"'),
            Some(other) => bail!("unknown escape '\\{}' in literal pattern", other),
            None => bail!("dangling backslash at end of literal pattern"),
        }
    }

    if bytes.is_empty() {
        bail!("literal pattern is empty");
    }
    Ok(bytes)
}

fn hex_digit(c: char) -> Result<u8> {
    match c.to_digit(16) {
        Some(value) => Ok(value as u8),
        None => bail!("invalid hex digit '{}' in pattern", c),
    }
}
