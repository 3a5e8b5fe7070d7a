//! Filter expression tokenizer

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use super::ast::CompareOp;
use super::errors::{FilterError, FilterResult};

/// Lexical tokens of the filter grammar
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Number(f64),
    Bool(bool),
    Cmp(CompareOp),
    And,
    Or,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::Str(s) => write!(f, "string '{}'", s),
            Token::Number(n) => write!(f, "number {}", n),
            Token::Bool(b) => write!(f, "boolean {}", if *b { "True" } else { "False" }),
            Token::Cmp(op) => write!(f, "operator '{}'", op),
            Token::And => write!(f, "'and'"),
            Token::Or => write!(f, "'or'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
        }
    }
}

/// A token with its byte offset
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

/// Symbols that look like operators but are outside the grammar
const FOREIGN_OPERATORS: &[char] = &['=', '!', '&', '|', '+', '-', '*', '/', '%', '^', '~'];

/// Splits an expression into tokens
pub fn tokenize(input: &str) -> FilterResult<Vec<Spanned>> {
    Lexer {
        input,
        chars: input.char_indices().peekable(),
    }
    .run()
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn run(mut self) -> FilterResult<Vec<Spanned>> {
        let mut tokens = Vec::new();

        while let Some(&(position, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
                continue;
            }

            let token = match ch {
                '(' => {
                    self.chars.next();
                    Token::LParen
                }
                ')' => {
                    self.chars.next();
                    Token::RParen
                }
                '\'' | '"' => Token::Str(self.quoted(position, ch)?),
                '`' => Token::Ident(self.quoted(position, '`')?),
                '<' | '>' | '=' | '!' => self.comparison(position, ch)?,
                '-' if self.next_starts_number(position) => self.number(position)?,
                '.' if self.next_is_digit(position) => self.number(position)?,
                c if c.is_ascii_digit() => self.number(position)?,
                c if c.is_alphabetic() || c == '_' => self.word(),
                c if FOREIGN_OPERATORS.contains(&c) => {
                    self.chars.next();
                    let mut operator = c.to_string();
                    if let Some(&(_, next)) = self.chars.peek() {
                        if next == c {
                            self.chars.next();
                            operator.push(next);
                        }
                    }
                    return Err(FilterError::UnsupportedOperator { operator, position });
                }
                c => return Err(FilterError::UnexpectedCharacter { ch: c, position }),
            };

            tokens.push(Spanned { token, position });
        }

        Ok(tokens)
    }

    fn comparison(&mut self, position: usize, first: char) -> FilterResult<Token> {
        self.chars.next();
        let followed_by_eq = matches!(self.chars.peek(), Some(&(_, '=')));
        if followed_by_eq {
            self.chars.next();
        }

        let op = match (first, followed_by_eq) {
            ('=', true) => CompareOp::Eq,
            ('!', true) => CompareOp::Ne,
            ('<', true) => CompareOp::Le,
            ('>', true) => CompareOp::Ge,
            ('<', false) => CompareOp::Lt,
            ('>', false) => CompareOp::Gt,
            (c, _) => {
                return Err(FilterError::UnsupportedOperator {
                    operator: c.to_string(),
                    position,
                })
            }
        };
        Ok(Token::Cmp(op))
    }

    fn next_starts_number(&self, position: usize) -> bool {
        self.input[position + 1..]
            .chars()
            .next()
            .map(|c| c.is_ascii_digit() || c == '.')
            .unwrap_or(false)
    }

    fn next_is_digit(&self, position: usize) -> bool {
        self.input[position + 1..]
            .chars()
            .next()
            .map(|c| c.is_ascii_digit())
            .unwrap_or(false)
    }

    fn number(&mut self, position: usize) -> FilterResult<Token> {
        let mut end = position;
        let mut prev = '\0';
        while let Some(&(offset, c)) = self.chars.peek() {
            let accept = c.is_ascii_digit()
                || c == '.'
                || c == 'e'
                || c == 'E'
                || (offset == position && c == '-')
                || ((c == '-' || c == '+') && (prev == 'e' || prev == 'E'));
            if !accept {
                break;
            }
            prev = c;
            end = offset + c.len_utf8();
            self.chars.next();
        }

        let literal = &self.input[position..end];
        literal
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| FilterError::InvalidNumber {
                literal: literal.to_string(),
                position,
            })
    }

    fn word(&mut self) -> Token {
        let mut word = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.chars.next();
            } else {
                break;
            }
        }

        if word.eq_ignore_ascii_case("and") {
            Token::And
        } else if word.eq_ignore_ascii_case("or") {
            Token::Or
        } else if word == "True" || word == "true" {
            Token::Bool(true)
        } else if word == "False" || word == "false" {
            Token::Bool(false)
        } else {
            Token::Ident(word)
        }
    }

    /// Reads a quoted run; `\` escapes the next character except inside backticks
    fn quoted(&mut self, position: usize, quote: char) -> FilterResult<String> {
        self.chars.next();
        let mut out = String::new();

        while let Some((_, c)) = self.chars.next() {
            match c {
                c if c == quote => {
                    if quote == '`' && out.is_empty() {
                        return Err(FilterError::UnexpectedCharacter { ch: '`', position });
                    }
                    return Ok(out);
                }
                '\\' if quote != '`' => match self.chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, escaped)) => out.push(escaped),
                    None => break,
                },
                c => out.push(c),
            }
        }

        Err(FilterError::UnterminatedQuote { position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn test_simple_comparison() {
        assert_eq!(
            tokens("Pclass == 1"),
            vec![
                Token::Ident("Pclass".into()),
                Token::Cmp(CompareOp::Eq),
                Token::Number(1.0)
            ]
        );
    }

    #[test]
    fn test_conjunction_and_strings() {
        assert_eq!(
            tokens("Sex == 'female' AND Embarked != \"S\""),
            vec![
                Token::Ident("Sex".into()),
                Token::Cmp(CompareOp::Eq),
                Token::Str("female".into()),
                Token::And,
                Token::Ident("Embarked".into()),
                Token::Cmp(CompareOp::Ne),
                Token::Str("S".into()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(tokens("-1.5")[0], Token::Number(-1.5));
        assert_eq!(tokens("2e3")[0], Token::Number(2000.0));
        assert_eq!(tokens(".25")[0], Token::Number(0.25));
        assert!(matches!(
            tokenize("1.2.3"),
            Err(FilterError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_backtick_identifier() {
        assert_eq!(tokens("`Home Port`")[0], Token::Ident("Home Port".into()));
        assert_eq!(tokens("`and`")[0], Token::Ident("and".into()));
    }

    #[test]
    fn test_escapes() {
        assert_eq!(tokens(r#"'O\'Brien'"#)[0], Token::Str("O'Brien".into()));
    }

    #[test]
    fn test_booleans() {
        assert_eq!(tokens("True")[0], Token::Bool(true));
        assert_eq!(tokens("false")[0], Token::Bool(false));
    }

    #[test]
    fn test_orderings() {
        assert_eq!(
            tokens("< <= > >="),
            vec![
                Token::Cmp(CompareOp::Lt),
                Token::Cmp(CompareOp::Le),
                Token::Cmp(CompareOp::Gt),
                Token::Cmp(CompareOp::Ge),
            ]
        );
    }

    #[test]
    fn test_single_equals_rejected() {
        assert_eq!(
            tokenize("Pclass = 1"),
            Err(FilterError::UnsupportedOperator {
                operator: "=".into(),
                position: 7
            })
        );
    }

    #[test]
    fn test_foreign_operators_rejected() {
        assert!(matches!(
            tokenize("a == 1 && b == 2"),
            Err(FilterError::UnsupportedOperator { ref operator, .. }) if operator == "&&"
        ));
        assert!(matches!(
            tokenize("Age + 1 > 3"),
            Err(FilterError::UnsupportedOperator { .. })
        ));
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            tokenize("Age > @x"),
            Err(FilterError::UnexpectedCharacter { ch: '@', position: 6 })
        );
    }

    #[test]
    fn test_lone_dot_is_not_a_number() {
        assert_eq!(
            tokenize("__import__('os').system('ls')"),
            Err(FilterError::UnexpectedCharacter { ch: '.', position: 16 })
        );
        assert_eq!(
            tokenize("Fare > ."),
            Err(FilterError::UnexpectedCharacter { ch: '.', position: 7 })
        );
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            tokenize("Sex == 'male"),
            Err(FilterError::UnterminatedQuote { position: 7 })
        );
    }
}
