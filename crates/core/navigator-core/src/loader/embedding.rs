//! Parsing of serialized embedding cells

/// Outcome of decoding one embedding cell
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedEmbedding {
    /// A flat list of numbers
    Vector(Vec<f64>),
    /// Anything else; the row gets dropped
    Invalid,
}

impl ParsedEmbedding {
    /// Whether the cell held a usable vector
    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedEmbedding::Vector(_))
    }

    /// Take the vector, if any
    pub fn into_vector(self) -> Option<Vec<f64>> {
        match self {
            ParsedEmbedding::Vector(v) => Some(v),
            ParsedEmbedding::Invalid => None,
        }
    }
}

/// Parse a literal list of numbers such as `[0.12, -3, 4e-05]`.
///
/// Whitespace and one trailing comma are accepted. Numbers follow Python
/// literal grammar, so `+1`, `.5`, `1.` and `1_000` are valid; each one is
/// rewritten to a JSON number before decoding. Nested lists, strings,
/// booleans, `null`, `nan` and `inf` make the whole cell invalid.
pub fn parse_embedding(cell: &str) -> ParsedEmbedding {
    let trimmed = cell.trim();
    let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return ParsedEmbedding::Invalid;
    };

    let inner = inner.trim_end();
    let inner = match inner.strip_suffix(',') {
        Some(_) if inner.trim() == "," => return ParsedEmbedding::Invalid,
        Some(without_comma) => without_comma,
        None => inner,
    };
    if inner.trim().is_empty() {
        return ParsedEmbedding::Vector(Vec::new());
    }

    let Some(numbers) = inner
        .split(',')
        .map(|token| json_number(token.trim()))
        .collect::<Option<Vec<_>>>()
    else {
        return ParsedEmbedding::Invalid;
    };

    match serde_json::from_str::<Vec<f64>>(&format!("[{}]", numbers.join(","))) {
        Ok(values) => ParsedEmbedding::Vector(values),
        Err(_) => ParsedEmbedding::Invalid,
    }
}

/// Rewrite a Python numeric literal into JSON number syntax.
///
/// Only the spelling is normalized; tokens that are not numbers pass through
/// and are rejected by the JSON decoder.
fn json_number(token: &str) -> Option<String> {
    let (sign, unsigned) = match token.strip_prefix('+') {
        Some(rest) => ("", rest),
        None => match token.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", token),
        },
    };
    if unsigned.is_empty() || unsigned.starts_with(['+', '-']) {
        return None;
    }

    let bytes = unsigned.as_bytes();
    let separators_ok = bytes.iter().enumerate().all(|(i, b)| {
        *b != b'_'
            || (i > 0
                && i + 1 < bytes.len()
                && bytes[i - 1].is_ascii_digit()
                && bytes[i + 1].is_ascii_digit())
    });
    if !separators_ok {
        return None;
    }
    let digits = unsigned.replace('_', "");

    let exponent_at = digits.find(['e', 'E']).unwrap_or(digits.len());
    let (mantissa, exponent) = digits.split_at(exponent_at);
    if !mantissa.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    let lead = if mantissa.starts_with('.') { "0" } else { "" };
    let trail = if mantissa.ends_with('.') { "0" } else { "" };

    Some(format!("{sign}{lead}{mantissa}{trail}{exponent}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_valid_lists() {
        assert_eq!(
            parse_embedding("[0.5, -1, 2e-05]"),
            ParsedEmbedding::Vector(vec![0.5, -1.0, 2e-05])
        );
        assert_eq!(
            parse_embedding("  [1,2,3,]  "),
            ParsedEmbedding::Vector(vec![1.0, 2.0, 3.0])
        );
        assert_eq!(parse_embedding("[]"), ParsedEmbedding::Vector(vec![]));
    }

    #[test]
    fn test_parse_python_number_spellings() {
        assert_eq!(
            parse_embedding("[1., .5, +1, 1_000, -.25, 2.e3]"),
            ParsedEmbedding::Vector(vec![1.0, 0.5, 1.0, 1000.0, -0.25, 2000.0])
        );
        for cell in ["[+-1]", "[1__0]", "[_1]", "[1_]", "[.]", "[+]", "[-]", "[1e]"] {
            assert_eq!(parse_embedding(cell), ParsedEmbedding::Invalid, "{cell:?}");
        }
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        for cell in [
            "",
            "nan",
            "0.5",
            "[0.1, 'a']",
            "[0.1, \"a\"]",
            "[[0.1, 0.2]]",
            "[0.1, true]",
            "[0.1, null]",
            "[nan, 0.1]",
            "[inf]",
            "[,]",
            "[0.1,, 0.2]",
            "{0.1, 0.2}",
            "[0.1, 0.2",
        ] {
            assert_eq!(parse_embedding(cell), ParsedEmbedding::Invalid, "{cell:?}");
        }
    }

    #[test]
    fn test_into_vector() {
        assert_eq!(parse_embedding("[1]").into_vector(), Some(vec![1.0]));
        assert!(!parse_embedding("oops").is_valid());
        assert_eq!(parse_embedding("oops").into_vector(), None);
    }

    proptest! {
        #[test]
        fn prop_serialized_lists_parse_back_exactly(
            values in prop::collection::vec(-1.0e6f64..1.0e6, 0..64)
        ) {
            let cell = format!(
                "[{}]",
                values.iter().map(|v| format!("{v:?}")).collect::<Vec<_>>().join(", ")
            );
            prop_assert_eq!(parse_embedding(&cell), ParsedEmbedding::Vector(values));
        }
    }
}
