//! Plain-text sample input.
//!
//! Accepted format: numbers separated by whitespace and/or commas, any number
//! per line. Blank lines and anything after `#` are ignored. The input order
//! is preserved.

use std::io::Read;
use std::path::Path;

use crate::error::AppError;

/// Parse first-passage times from text.
pub fn parse_samples(text: &str) -> Result<Vec<f64>, AppError> {
    let mut out = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or("");
        for token in content
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            let value: f64 = token.parse().map_err(|_| {
                AppError::new(
                    2,
                    format!("Line {}: cannot parse '{token}' as a number.", line_no + 1),
                )
            })?;
            out.push(value);
        }
    }
    Ok(out)
}

/// Read samples from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_samples(path: Option<&Path>) -> Result<Vec<f64>, AppError> {
    let text = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .map_err(|e| AppError::new(2, format!("Failed to read samples '{}': {e}", p.display())))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| AppError::new(2, format!("Failed to read samples from stdin: {e}")))?;
            buf
        }
    };
    parse_samples(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_separators_and_comments() {
        let text = "# rescaled FPTs\n1.5, 2.0\n\n3e2 4\t5 # trailing\n";
        assert_eq!(parse_samples(text).unwrap(), vec![1.5, 2.0, 300.0, 4.0, 5.0]);
    }

    #[test]
    fn preserves_input_order() {
        assert_eq!(parse_samples("3 1 2").unwrap(), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn reports_bad_token_line() {
        let err = parse_samples("1.0\n2.0 abc\n").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Line 2"));
    }
}
