//! Tokenizer for formula bodies (the text after `=`).

use super::error::FormulaParseError;
use super::position::Position;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    /// A cell reference as written. The position may be invalid (e.g. `ZZZZ1`).
    Cell(Position, String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Cell(_, name) => name.clone(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, FormulaParseError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' => {
                i += 1;
            }
            b'+' | b'-' | b'*' | b'/' | b'(' | b')' => {
                tokens.push(match c {
                    b'+' => Token::Plus,
                    b'-' => Token::Minus,
                    b'*' => Token::Star,
                    b'/' => Token::Slash,
                    b'(' => Token::LParen,
                    _ => Token::RParen,
                });
                i += 1;
            }
            b'0'..=b'9' | b'.' => {
                let (number, next) = scan_number(input, i)?;
                tokens.push(Token::Number(number));
                i = next;
            }
            b'A'..=b'Z' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_uppercase() {
                    i += 1;
                }
                let letters_end = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let name = &input[start..i];
                if letters_end == i {
                    return Err(FormulaParseError::InvalidReference(name.to_string()));
                }
                tokens.push(Token::Cell(Position::from_a1(name), name.to_string()));
            }
            _ => {
                let ch = input[i..].chars().next().unwrap_or('?');
                return Err(FormulaParseError::UnexpectedChar { ch, offset: i });
            }
        }
    }

    Ok(tokens)
}

/// Scan `digits ['.' digits] [('e'|'E') ['+'|'-'] digits]` starting at `start`.
fn scan_number(input: &str, start: usize) -> Result<(f64, usize), FormulaParseError> {
    let bytes = input.as_bytes();
    let digits = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = digits(start);
    let int_len = i - start;
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_end = digits(i + 1);
        if frac_end == i + 1 {
            return Err(FormulaParseError::InvalidNumber(input[start..frac_end].to_string()));
        }
        i = frac_end;
    } else if int_len == 0 {
        return Err(FormulaParseError::InvalidNumber(input[start..=start].to_string()));
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_end = digits(j);
        if exp_end == j {
            return Err(FormulaParseError::InvalidNumber(input[start..exp_end].to_string()));
        }
        i = exp_end;
    }

    let text = &input[start..i];
    text.parse::<f64>()
        .map(|n| (n, i))
        .map_err(|_| FormulaParseError::InvalidNumber(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_arithmetic() {
        let tokens = tokenize("A1 + 2.5*(B2-3)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Cell(Position::new(0, 0), "A1".into()),
                Token::Plus,
                Token::Number(2.5),
                Token::Star,
                Token::LParen,
                Token::Cell(Position::new(1, 1), "B2".into()),
                Token::Minus,
                Token::Number(3.0),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_number_forms() {
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(0.5)]);
        assert_eq!(tokenize("1e3").unwrap(), vec![Token::Number(1000.0)]);
        assert_eq!(tokenize("1.5E-1").unwrap(), vec![Token::Number(0.15)]);
        assert!(tokenize("1.").is_err());
        assert!(tokenize("1e").is_err());
        assert!(tokenize(".").is_err());
    }

    #[test]
    fn test_tokenize_out_of_range_reference_is_kept() {
        let tokens = tokenize("ZZZZ1").unwrap();
        assert_eq!(tokens, vec![Token::Cell(Position::NONE, "ZZZZ1".into())]);
    }

    #[test]
    fn test_tokenize_rejects_unknown_input() {
        assert!(matches!(
            tokenize("A1 % 2"),
            Err(FormulaParseError::UnexpectedChar { ch: '%', offset: 3 })
        ));
        assert_eq!(
            tokenize("SUM"),
            Err(FormulaParseError::InvalidReference("SUM".into()))
        );
        assert!(tokenize("a1").is_err());
    }
}
