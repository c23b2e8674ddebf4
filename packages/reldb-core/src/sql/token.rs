//! Lexical scanner turning statement text into position-tagged tokens.

use std::fmt;

use crate::error::DbError;

/// Reserved statement keywords, matched case-insensitively.
///
/// Type names (`int`, `str`, ...) are deliberately not keywords; they lex as
/// identifiers and the parser interprets them where a type is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Create,
    Table,
    Insert,
    Into,
    Values,
    Select,
    From,
    Where,
    And,
    Join,
    On,
    Update,
    Set,
    Delete,
    Primary,
    Key,
    Unique,
    Not,
    Null,
    True,
    False,
}

impl Keyword {
    fn parse(ident: &str) -> Option<Self> {
        match ident.to_ascii_uppercase().as_str() {
            "CREATE" => Some(Self::Create),
            "TABLE" => Some(Self::Table),
            "INSERT" => Some(Self::Insert),
            "INTO" => Some(Self::Into),
            "VALUES" => Some(Self::Values),
            "SELECT" => Some(Self::Select),
            "FROM" => Some(Self::From),
            "WHERE" => Some(Self::Where),
            "AND" => Some(Self::And),
            "JOIN" => Some(Self::Join),
            "ON" => Some(Self::On),
            "UPDATE" => Some(Self::Update),
            "SET" => Some(Self::Set),
            "DELETE" => Some(Self::Delete),
            "PRIMARY" => Some(Self::Primary),
            "KEY" => Some(Self::Key),
            "UNIQUE" => Some(Self::Unique),
            "NOT" => Some(Self::Not),
            "NULL" => Some(Self::Null),
            "TRUE" => Some(Self::True),
            "FALSE" => Some(Self::False),
            _ => None,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_uppercase())
    }
}

/// The smallest meaningful units of the statement language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Keyword(Keyword),
    /// Table or column name
    Ident(String),
    /// Integer literal
    Integer(i64),
    /// Floating-point literal
    Float(f64),
    /// Single-quoted string literal
    Str(String),
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Star,
    Dot,
    Minus,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(k) => write!(f, "{}", k),
            Self::Ident(s) => write!(f, "{}", s),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Str(s) => write!(f, "'{}'", s),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::Comma => write!(f, ","),
            Self::Semicolon => write!(f, ";"),
            Self::Star => write!(f, "*"),
            Self::Dot => write!(f, "."),
            Self::Minus => write!(f, "-"),
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "!="),
            Self::Less => write!(f, "<"),
            Self::Greater => write!(f, ">"),
            Self::LessEqual => write!(f, "<="),
            Self::GreaterEqual => write!(f, ">="),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

/// A token together with the character position it started at.
pub type SpannedToken = (usize, Token);

/// Character-cursor lexer over one statement string.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Scans the whole input, ending with an [`Token::Eof`] marker.
    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>, DbError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                tokens.push((self.position, Token::Eof));
                return Ok(tokens);
            }
            let start = self.position;
            let token = self.next_token()?;
            tokens.push((start, token));
        }
    }

    fn next_token(&mut self) -> Result<Token, DbError> {
        let ch = self.current_char();
        match ch {
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            ',' => self.single(Token::Comma),
            ';' => self.single(Token::Semicolon),
            '*' => self.single(Token::Star),
            '.' => self.single(Token::Dot),
            '-' => self.single(Token::Minus),
            '=' => self.single(Token::Equal),
            '!' => {
                self.advance();
                if self.consume_if('=') {
                    Ok(Token::NotEqual)
                } else {
                    Err(self.unexpected("'=' after '!'"))
                }
            }
            '<' => {
                self.advance();
                if self.consume_if('=') {
                    Ok(Token::LessEqual)
                } else {
                    Ok(Token::Less)
                }
            }
            '>' => {
                self.advance();
                if self.consume_if('=') {
                    Ok(Token::GreaterEqual)
                } else {
                    Ok(Token::Greater)
                }
            }
            '\'' => self.read_string(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => Ok(self.read_identifier()),
            _ => Err(self.unexpected("a token")),
        }
    }

    fn single(&mut self, token: Token) -> Result<Token, DbError> {
        self.advance();
        Ok(token)
    }

    /// Reads an identifier or keyword (case-insensitive).
    fn read_identifier(&mut self) -> Token {
        let mut ident = String::new();
        while !self.is_at_end()
            && (self.current_char().is_alphanumeric() || self.current_char() == '_')
        {
            ident.push(self.current_char());
            self.advance();
        }
        match Keyword::parse(&ident) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Ident(ident),
        }
    }

    /// Reads an integer or float literal; a single `.` switches to float.
    fn read_number(&mut self) -> Result<Token, DbError> {
        let start = self.position;
        let mut text = String::new();
        let mut has_dot = false;
        while !self.is_at_end() {
            let c = self.current_char();
            if c.is_ascii_digit() {
                text.push(c);
            } else if c == '.' && !has_dot && self.peek_is_digit() {
                has_dot = true;
                text.push(c);
            } else {
                break;
            }
            self.advance();
        }

        if has_dot {
            text.parse::<f64>().map(Token::Float).map_err(|_| DbError::SyntaxError {
                position: start,
                expected: "a float literal".to_string(),
            })
        } else {
            text.parse::<i64>().map(Token::Integer).map_err(|_| DbError::SyntaxError {
                position: start,
                expected: "an integer literal".to_string(),
            })
        }
    }

    /// Reads a string literal enclosed in single quotes.
    fn read_string(&mut self) -> Result<Token, DbError> {
        let start = self.position;
        self.advance(); // opening quote
        let mut text = String::new();
        while !self.is_at_end() && self.current_char() != '\'' {
            text.push(self.current_char());
            self.advance();
        }
        if self.is_at_end() {
            return Err(DbError::SyntaxError {
                position: start,
                expected: "a closing ' quote".to_string(),
            });
        }
        self.advance(); // closing quote
        Ok(Token::Str(text))
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek_is_digit(&self) -> bool {
        self.input
            .get(self.position + 1)
            .is_some_and(|c| c.is_ascii_digit())
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn consume_if(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.current_char() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn unexpected(&self, expected: &str) -> DbError {
        DbError::SyntaxError {
            position: self.position.min(self.input.len()),
            expected: expected.to_string(),
        }
    }
}
