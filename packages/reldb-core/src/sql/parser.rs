//! Recursive-descent parser producing a typed [`Statement`].

use crate::error::DbError;
use crate::table::{CompareOp, Condition, Predicate};
use crate::value::{DataType, Value};

use super::ast::{ColumnDef, JoinClause, Projection, Statement};
use super::token::{Keyword, Lexer, SpannedToken, Token};

/// Parses one statement. The whole input must form a single statement; the
/// terminating `;` is consumed when present and trailing tokens are an error.
pub fn parse(input: &str) -> Result<Statement, DbError> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser { tokens, cursor: 0 };
    let statement = parser.parse_statement()?;
    parser.skip(&Token::Semicolon);
    parser.expect_eof()?;
    Ok(statement)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    cursor: usize,
}

impl Parser {
    fn parse_statement(&mut self) -> Result<Statement, DbError> {
        match self.peek() {
            Token::Keyword(Keyword::Create) => self.parse_create_table(),
            Token::Keyword(Keyword::Insert) => self.parse_insert(),
            Token::Keyword(Keyword::Select) => self.parse_select(),
            Token::Keyword(Keyword::Update) => self.parse_update(),
            Token::Keyword(Keyword::Delete) => self.parse_delete(),
            _ => Err(self.error("CREATE, INSERT, SELECT, UPDATE or DELETE")),
        }
    }

    /// `CREATE TABLE <name> (<col> <type> [flags], ...) [PRIMARY KEY(<col>)]`
    fn parse_create_table(&mut self) -> Result<Statement, DbError> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;
        let name = self.next_ident()?;
        self.expect(&Token::LeftParen)?;

        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_def()?);
            if !self.next_is(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RightParen)?;

        let primary_key = if self.next_is_keyword(Keyword::Primary) {
            self.expect_keyword(Keyword::Key)?;
            self.expect(&Token::LeftParen)?;
            let column = self.next_ident()?;
            self.expect(&Token::RightParen)?;
            Some(column)
        } else {
            None
        };

        Ok(Statement::CreateTable {
            name,
            columns,
            primary_key,
        })
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef, DbError> {
        let name = self.next_ident()?;
        let type_position = self.position();
        let type_keyword = self.next_ident().map_err(|_| DbError::SyntaxError {
            position: type_position,
            expected: "a column type (int, str, float, bool)".to_string(),
        })?;
        let data_type =
            DataType::parse_keyword(&type_keyword).ok_or_else(|| DbError::SyntaxError {
                position: type_position,
                expected: "a column type (int, str, float, bool)".to_string(),
            })?;

        let mut def = ColumnDef {
            name,
            data_type,
            primary_key: false,
            unique: false,
            not_null: false,
        };
        loop {
            if self.next_is_keyword(Keyword::Primary) {
                self.expect_keyword(Keyword::Key)?;
                def.primary_key = true;
            } else if self.next_is_keyword(Keyword::Unique) {
                def.unique = true;
            } else if self.next_is_keyword(Keyword::Not) {
                self.expect_keyword(Keyword::Null)?;
                def.not_null = true;
            } else {
                break;
            }
        }
        Ok(def)
    }

    /// `INSERT INTO <name> (<col>, ...) VALUES (<literal>, ...)`
    fn parse_insert(&mut self) -> Result<Statement, DbError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.next_ident()?;

        self.expect(&Token::LeftParen)?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.next_ident()?);
            if !self.next_is(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RightParen)?;

        self.expect_keyword(Keyword::Values)?;
        let values_position = self.position();
        self.expect(&Token::LeftParen)?;
        let mut values = Vec::new();
        loop {
            values.push(self.next_literal()?);
            if !self.next_is(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RightParen)?;

        if columns.len() != values.len() {
            return Err(DbError::SyntaxError {
                position: values_position,
                expected: format!("{} values to match {} columns", columns.len(), columns.len()),
            });
        }

        Ok(Statement::Insert {
            table,
            columns,
            values,
        })
    }

    /// `SELECT <*|cols> FROM <name> [JOIN <other> ON a.x = b.y] [WHERE ...]`
    fn parse_select(&mut self) -> Result<Statement, DbError> {
        self.expect_keyword(Keyword::Select)?;

        let projection = if self.next_is(&Token::Star) {
            Projection::All
        } else {
            let mut columns = Vec::new();
            loop {
                columns.push(self.next_ident()?);
                if !self.next_is(&Token::Comma) {
                    break;
                }
            }
            Projection::Columns(columns)
        };

        self.expect_keyword(Keyword::From)?;
        let table = self.next_ident()?;

        let join = if self.next_is_keyword(Keyword::Join) {
            let join_table = self.next_ident()?;
            self.expect_keyword(Keyword::On)?;
            let (first_qualifier, first_column) = self.next_qualified_column()?;
            self.expect(&Token::Equal)?;
            let (second_qualifier, second_column) = self.next_qualified_column()?;

            // The two sides may appear in either order; qualifiers decide
            // which column belongs to the joined table.
            let first_is_right = first_qualifier.as_deref() == Some(join_table.as_str())
                || second_qualifier.as_deref() == Some(table.as_str());
            let (left_column, right_column) = if first_is_right {
                (second_column, first_column)
            } else {
                (first_column, second_column)
            };
            Some(JoinClause {
                table: join_table,
                left_column,
                right_column,
            })
        } else {
            None
        };

        let predicate = self.parse_where()?;
        Ok(Statement::Select {
            table,
            projection,
            join,
            predicate,
        })
    }

    /// `UPDATE <name> SET <col> = <literal>, ... [WHERE ...]`
    fn parse_update(&mut self) -> Result<Statement, DbError> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.next_ident()?;
        self.expect_keyword(Keyword::Set)?;

        let mut assignments = Vec::new();
        loop {
            let column = self.next_ident()?;
            self.expect(&Token::Equal)?;
            assignments.push((column, self.next_literal()?));
            if !self.next_is(&Token::Comma) {
                break;
            }
        }

        let predicate = self.parse_where()?;
        Ok(Statement::Update {
            table,
            assignments,
            predicate,
        })
    }

    /// `DELETE FROM <name> [WHERE ...]`
    fn parse_delete(&mut self) -> Result<Statement, DbError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.next_ident()?;
        let predicate = self.parse_where()?;
        Ok(Statement::Delete { table, predicate })
    }

    /// Optional WHERE clause: a conjunction of `column OP literal` terms.
    fn parse_where(&mut self) -> Result<Predicate, DbError> {
        if !self.next_is_keyword(Keyword::Where) {
            return Ok(Predicate::all());
        }
        let mut conditions = Vec::new();
        loop {
            let column = self.next_ident()?;
            let op = self.next_compare_op()?;
            let value = self.next_literal()?;
            conditions.push(Condition { column, op, value });
            if !self.next_is_keyword(Keyword::And) {
                break;
            }
        }
        Ok(Predicate { conditions })
    }

    fn next_compare_op(&mut self) -> Result<CompareOp, DbError> {
        let op = match self.peek() {
            Token::Equal => CompareOp::Eq,
            Token::NotEqual => CompareOp::NotEq,
            Token::Less => CompareOp::Lt,
            Token::Greater => CompareOp::Gt,
            Token::LessEqual => CompareOp::LtEq,
            Token::GreaterEqual => CompareOp::GtEq,
            _ => return Err(self.error("a comparison operator")),
        };
        self.advance();
        Ok(op)
    }

    /// A literal value: integer, float, string, boolean, or a negated number.
    fn next_literal(&mut self) -> Result<Value, DbError> {
        let value = match self.peek().clone() {
            Token::Integer(i) => Value::Int(i),
            Token::Float(f) => Value::Float(f),
            Token::Str(s) => Value::Str(s),
            Token::Keyword(Keyword::True) => Value::Bool(true),
            Token::Keyword(Keyword::False) => Value::Bool(false),
            Token::Minus => {
                self.advance();
                return match self.peek().clone() {
                    Token::Integer(i) => {
                        self.advance();
                        Ok(Value::Int(-i))
                    }
                    Token::Float(f) => {
                        self.advance();
                        Ok(Value::Float(-f))
                    }
                    _ => Err(self.error("a numeric literal after '-'")),
                };
            }
            _ => return Err(self.error("a literal value")),
        };
        self.advance();
        Ok(value)
    }

    /// `column` or `table.column`; the qualifier is returned separately.
    fn next_qualified_column(&mut self) -> Result<(Option<String>, String), DbError> {
        let first = self.next_ident()?;
        if self.next_is(&Token::Dot) {
            let column = self.next_ident()?;
            Ok((Some(first), column))
        } else {
            Ok((None, first))
        }
    }

    // Cursor helpers.

    fn peek(&self) -> &Token {
        &self.tokens[self.cursor].1
    }

    fn position(&self) -> usize {
        self.tokens[self.cursor].0
    }

    fn advance(&mut self) {
        if self.cursor + 1 < self.tokens.len() {
            self.cursor += 1;
        }
    }

    fn next_ident(&mut self) -> Result<String, DbError> {
        match self.peek().clone() {
            Token::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.error("an identifier")),
        }
    }

    fn next_is(&mut self, token: &Token) -> bool {
        if self.peek() == token {
            self.advance();
            true
        } else {
            false
        }
    }

    fn next_is_keyword(&mut self, keyword: Keyword) -> bool {
        self.next_is(&Token::Keyword(keyword))
    }

    fn skip(&mut self, token: &Token) {
        self.next_is(token);
    }

    fn expect(&mut self, token: &Token) -> Result<(), DbError> {
        if self.next_is(token) {
            Ok(())
        } else {
            Err(self.error(&format!("{}", token)))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), DbError> {
        self.expect(&Token::Keyword(keyword))
    }

    fn expect_eof(&mut self) -> Result<(), DbError> {
        if self.peek() == &Token::Eof {
            Ok(())
        } else {
            Err(self.error("end of statement"))
        }
    }

    fn error(&self, expected: &str) -> DbError {
        DbError::SyntaxError {
            position: self.position(),
            expected: expected.to_string(),
        }
    }
}
