// ============================================================================
// Unit Expression Lexer
// Splits a unit string into tokens and produces the normalized cache key
// ============================================================================

use crate::domain::errors::{UnitError, UnitResult};
use std::fmt;

/// One lexical token of a unit expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unit name, symbol or alias (`meter`, `km`, `°C`, `Ω`)
    Ident(String),
    /// Unsigned numeric literal (`1`, `2`, `0.5`)
    Number(String),
    /// `*`, `·` or `×`
    Star,
    Slash,
    /// `^` or `**`
    Caret,
    Minus,
    Plus,
    LParen,
    RParen,
}

impl Token {
    /// Tokens that can end an operand.
    fn ends_operand(&self) -> bool {
        matches!(self, Token::Ident(_) | Token::Number(_) | Token::RParen)
    }

    /// Tokens that can start an operand.
    fn starts_operand(&self) -> bool {
        matches!(self, Token::Ident(_) | Token::Number(_) | Token::LParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) | Token::Number(s) => f.write_str(s),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::Caret => f.write_str("^"),
            Token::Minus => f.write_str("-"),
            Token::Plus => f.write_str("+"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '°'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Tokenize `input`.
///
/// # Errors
/// `UnitParse` on an empty input or a character that cannot start a token.
pub fn tokenize(input: &str) -> UnitResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '*' => {
                if matches!(chars.peek(), Some((_, '*'))) {
                    chars.next();
                    Token::Caret
                } else {
                    Token::Star
                }
            },
            '·' | '×' | '⋅' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '-' | '−' => Token::Minus,
            '+' => Token::Plus,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() || c == '.' => {
                let mut literal = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_ascii_digit() || next == '.' {
                        literal.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Number(literal)
            },
            c if is_ident_start(c) => {
                let mut ident = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if is_ident_continue(next) {
                        ident.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Ident(ident)
            },
            other => {
                return Err(UnitError::parse(
                    input,
                    format!("unexpected character '{}' at position {}", other, pos),
                ))
            },
        };
        tokens.push(token);
    }

    if tokens.is_empty() {
        return Err(UnitError::parse(input, "empty unit expression"));
    }
    Ok(tokens)
}

/// Render tokens back into the normalized form used as a cache key.
///
/// Operators lose their surrounding whitespace; a single space is kept
/// only where it is an implicit multiplication (`kg m`).
pub fn normalized(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut previous: Option<&Token> = None;
    for token in tokens {
        if let Some(prev) = previous {
            if prev.ends_operand() && token.starts_operand() {
                out.push(' ');
            }
        }
        out.push_str(&token.to_string());
        previous = Some(token);
    }
    out
}

/// Normalize a raw unit string in one call.
pub fn normalize(input: &str) -> UnitResult<String> {
    Ok(normalized(&tokenize(input)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Token {
        Token::Ident(s.to_string())
    }

    #[test]
    fn test_tokenize_compound() {
        let tokens = tokenize("kg * m / s^2").unwrap();
        assert_eq!(
            tokens,
            vec![
                ident("kg"),
                Token::Star,
                ident("m"),
                Token::Slash,
                ident("s"),
                Token::Caret,
                Token::Number("2".to_string()),
            ]
        );
    }

    #[test]
    fn test_double_star_is_caret() {
        assert_eq!(tokenize("m**2").unwrap()[1], Token::Caret);
    }

    #[test]
    fn test_unicode_operators_and_symbols() {
        let tokens = tokenize("N·m").unwrap();
        assert_eq!(tokens, vec![ident("N"), Token::Star, ident("m")]);
        assert_eq!(tokenize("°C").unwrap(), vec![ident("°C")]);
        assert_eq!(tokenize("µm").unwrap(), vec![ident("µm")]);
        assert_eq!(tokenize("Ω").unwrap(), vec![ident("Ω")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_err());
        assert!(tokenize("   ").is_err());
    }

    #[test]
    fn test_bad_character() {
        let err = tokenize("m $ s").unwrap_err();
        assert!(err.to_string().contains("'$'"));
    }

    #[test]
    fn test_normalized_form() {
        assert_eq!(normalize("  kg  *  m / s ** 2 ").unwrap(), "kg*m/s^2");
        assert_eq!(normalize("kg m").unwrap(), "kg m");
        assert_eq!(normalize("m·s").unwrap(), "m*s");
        assert_eq!(normalize("1 / ( s )").unwrap(), "1/(s)");
    }
}
