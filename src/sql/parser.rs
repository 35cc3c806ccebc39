//! SQL parser for CREATE TABLE / ALTER TABLE statements.
//!
//! Statements other than table DDL are skipped. Inside a table body the parser
//! is strict about structure (separators, column types, balanced parentheses)
//! and lenient about column options it does not model.

use super::dialect::Dialect;
use super::lexer::{Lexer, Spanned, Token};
use super::types::map_type;
use crate::ast::{Column, ColumnModifier, Constraint, Entity, ForeignKey, Schema};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SqlParseError {
    #[error("Expected {expected}, found {found:?} at offset {offset}")]
    Expected {
        expected: &'static str,
        found: Token,
        offset: usize,
    },
    #[error("Unexpected end of input in table \"{table}\"")]
    UnexpectedEof { table: String },
    #[error("Trailing comma before ')' in table \"{table}\" at offset {offset}")]
    TrailingComma { table: String, offset: usize },
}

/// Parse a SQL dump into a DDL schema.
pub fn parse_sql(input: &str, dialect: Dialect) -> Result<Schema, SqlParseError> {
    let tokens = Lexer::new(input).tokenize();
    Parser::new(tokens, dialect).parse()
}

/// Words that extend a type name (`double precision`, `character varying`,
/// `timestamp with time zone`).
const TYPE_CONTINUATIONS: &[&str] = &["varying", "precision", "with", "without", "time", "zone"];

enum AlterAction {
    ForeignKey(ForeignKey),
    PrimaryKey(Vec<String>),
    Unique(Vec<String>),
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    dialect: Dialect,
    table: String,
}

impl Parser {
    fn new(tokens: Vec<Spanned>, dialect: Dialect) -> Self {
        Self {
            tokens,
            pos: 0,
            dialect,
            table: String::new(),
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).map_or(&Token::Eof, |s| &s.token)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(0, |s| s.offset)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.current() == token {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.current().is_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expected(&self, expected: &'static str) -> SqlParseError {
        SqlParseError::Expected {
            expected,
            found: self.current().clone(),
            offset: self.offset(),
        }
    }

    fn eof(&self) -> SqlParseError {
        SqlParseError::UnexpectedEof {
            table: self.table.clone(),
        }
    }

    fn parse(&mut self) -> Result<Schema, SqlParseError> {
        let mut schema = Schema::default();

        while self.current() != &Token::Eof {
            match self.current() {
                Token::Create => {
                    self.advance();
                    self.eat_word("OR");
                    self.eat_word("REPLACE");
                    for modifier in ["TEMPORARY", "TEMP", "UNLOGGED", "GLOBAL", "LOCAL"] {
                        self.eat_word(modifier);
                    }

                    if self.eat(&Token::Table) {
                        self.skip_if_not_exists();
                        if let Some((entity, fks)) = self.parse_create_table()? {
                            // Last declaration wins, first position is kept.
                            match schema.entities.iter_mut().find(|e| e.name == entity.name) {
                                Some(existing) => *existing = entity,
                                None => schema.entities.push(entity),
                            }
                            schema.foreign_keys.extend(fks);
                        }
                    } else {
                        // Skip other CREATE statements (INDEX, VIEW, etc.)
                        self.skip_statement();
                    }
                }
                Token::Alter => {
                    if let Some((table, actions)) = self.parse_alter_table()? {
                        apply_alter_actions(&mut schema, &table, actions);
                    }
                }
                _ => self.advance(),
            }
        }

        Ok(schema)
    }

    fn skip_if_not_exists(&mut self) {
        if self.eat(&Token::If) {
            self.eat(&Token::Not);
            self.eat(&Token::Exists);
        }
    }

    /// Reads `name` or `schema.name`, returning the last part.
    fn parse_qualified_name(&mut self) -> Option<String> {
        let mut name = self.current().ident()?.to_string();
        self.advance();
        while self.current() == &Token::Dot {
            self.advance();
            match self.current().ident() {
                Some(part) => {
                    name = part.to_string();
                    self.advance();
                }
                None => break,
            }
        }
        Some(name)
    }

    fn parse_create_table(&mut self) -> Result<Option<(Entity, Vec<ForeignKey>)>, SqlParseError> {
        let Some(table_name) = self.parse_qualified_name() else {
            self.skip_statement();
            return Ok(None);
        };
        if self.current() != &Token::LParen {
            // CREATE TABLE ... AS SELECT, PARTITION OF, etc.
            self.skip_statement();
            return Ok(None);
        }
        self.table = table_name.clone();
        let parsed = self.parse_table_body(table_name)?;

        // Skip table options (ENGINE=, WITH (...), etc.)
        self.skip_statement();
        Ok(Some(parsed))
    }

    fn parse_table_body(
        &mut self,
        table_name: String,
    ) -> Result<(Entity, Vec<ForeignKey>), SqlParseError> {
        self.advance(); // (

        let mut columns = Vec::new();
        let mut constraints = Vec::new();
        let mut fks = Vec::new();

        if self.eat(&Token::RParen) {
            return Ok((
                Entity {
                    name: table_name,
                    columns,
                    constraints,
                },
                fks,
            ));
        }

        loop {
            match self.current() {
                Token::Semicolon | Token::Eof => return Err(self.eof()),
                Token::RParen => {
                    return Err(SqlParseError::TrailingComma {
                        table: table_name,
                        offset: self.offset(),
                    });
                }
                Token::Constraint => {
                    // Named constraint: the definition follows the name
                    self.advance();
                    if self.current().ident().is_some() {
                        self.advance();
                    }
                    continue;
                }
                Token::Primary => {
                    self.advance();
                    self.eat(&Token::Key);
                    let cols = self.parse_column_list()?;
                    constraints.push(Constraint::PrimaryKey(cols));
                    self.skip_until_separator()?;
                }
                Token::Unique => {
                    self.advance();
                    let cols = self.parse_column_list()?;
                    constraints.push(Constraint::Unique(cols));
                    self.skip_until_separator()?;
                }
                Token::Foreign => {
                    fks.push(self.parse_foreign_key(&table_name)?);
                    self.skip_until_separator()?;
                }
                Token::Index | Token::Key | Token::Check => {
                    // Plain indexes and CHECK constraints are not modeled
                    self.skip_until_separator()?;
                }
                t if t.is_word("FULLTEXT") || t.is_word("SPATIAL") || t.is_word("EXCLUDE") => {
                    self.skip_until_separator()?;
                }
                t if t.ident().is_some() => {
                    columns.push(self.parse_column(&table_name, &mut fks)?);
                }
                _ => return Err(self.expected("column or constraint definition")),
            }

            match self.current() {
                Token::Comma => self.advance(),
                Token::RParen => {
                    self.advance();
                    break;
                }
                Token::Semicolon | Token::Eof => return Err(self.eof()),
                _ => return Err(self.expected("',' or ')'")),
            }
        }

        let pk_columns: Vec<String> = constraints
            .iter()
            .filter_map(|c| match c {
                Constraint::PrimaryKey(cols) => Some(cols.clone()),
                _ => None,
            })
            .flatten()
            .collect();
        for col in &mut columns {
            if pk_columns.contains(&col.name) && !col.has(&ColumnModifier::Pk) {
                col.modifiers.insert(0, ColumnModifier::Pk);
            }
        }

        Ok((
            Entity {
                name: table_name,
                columns,
                constraints,
            },
            fks,
        ))
    }

    fn parse_column(
        &mut self,
        table_name: &str,
        fks: &mut Vec<ForeignKey>,
    ) -> Result<Column, SqlParseError> {
        let name = self.current().ident().unwrap_or_default().to_string();
        self.advance();

        let Some(raw_type) = self.parse_type()? else {
            return Err(self.expected("column type"));
        };
        let typ = map_type(&raw_type, self.dialect);

        let mut modifiers = Vec::new();
        let mut is_pk = false;

        loop {
            match self.current() {
                Token::Comma | Token::RParen => break,
                Token::Semicolon | Token::Eof => return Err(self.eof()),
                Token::Primary => {
                    self.advance();
                    self.eat(&Token::Key);
                    is_pk = true;
                }
                Token::Not => {
                    self.advance();
                    if self.eat(&Token::Null) {
                        modifiers.push(ColumnModifier::NotNull);
                    }
                }
                Token::Unique => {
                    self.advance();
                    self.eat(&Token::Key);
                    modifiers.push(ColumnModifier::Unique);
                }
                Token::Default => {
                    self.advance();
                    self.skip_default_value()?;
                }
                Token::References => {
                    self.advance();
                    let (target, target_columns) = self.parse_reference()?;
                    self.skip_fk_actions();
                    fks.push(ForeignKey {
                        table: table_name.to_string(),
                        columns: vec![name.clone()],
                        target,
                        target_columns,
                    });
                }
                Token::Constraint => {
                    self.advance();
                    if self.current().ident().is_some() {
                        self.advance();
                    }
                }
                Token::Check | Token::LParen => {
                    if self.current() == &Token::Check {
                        self.advance();
                    }
                    self.skip_parenthesized()?;
                }
                t if t.is_word("GENERATED") => {
                    if self.parse_generated()? {
                        modifiers.push(ColumnModifier::Increment);
                    }
                }
                t if t.is_word("IDENTITY") => {
                    self.advance();
                    if self.current() == &Token::LParen {
                        self.skip_parenthesized()?;
                    }
                    modifiers.push(ColumnModifier::Increment);
                }
                t if t.is_word("AUTO_INCREMENT") || t.is_word("AUTOINCREMENT") => {
                    self.advance();
                    modifiers.push(ColumnModifier::Increment);
                }
                _ => self.advance(),
            }
        }

        if is_pk {
            modifiers.insert(0, ColumnModifier::Pk);
        }

        Ok(Column {
            name,
            typ,
            modifiers,
        })
    }

    /// Reads a possibly multi-word, parameterized, array type.
    fn parse_type(&mut self) -> Result<Option<String>, SqlParseError> {
        let Some(first) = self.current().ident() else {
            return Ok(None);
        };
        let mut words = vec![first.to_string()];
        self.advance();

        // schema-qualified user types keep their last part
        while self.current() == &Token::Dot {
            self.advance();
            if let Some(part) = self.current().ident() {
                words = vec![part.to_string()];
                self.advance();
            }
        }
        self.read_type_continuations(&mut words);

        let mut args = String::new();
        if self.current() == &Token::LParen {
            args = format!("({})", self.collect_until_paren()?);
            self.read_type_continuations(&mut words);
        }

        let mut raw = words.join(" ");
        if let Some(pos) = raw.find(" with") {
            // `timestamp(3) with time zone`: arguments belong after the base word
            raw.insert_str(pos, &args);
        } else {
            raw.push_str(&args);
        }

        // Array suffixes lex as bracketed identifiers: `[]`, `[3]`
        while matches!(self.current(), Token::Quoted(s) if s.chars().all(|c| c.is_ascii_digit()))
        {
            raw.push_str("[]");
            self.advance();
        }
        Ok(Some(raw))
    }

    fn read_type_continuations(&mut self, words: &mut Vec<String>) {
        while let Token::Ident(word) = self.current() {
            if !TYPE_CONTINUATIONS.contains(&word.to_lowercase().as_str()) {
                break;
            }
            words.push(word.clone());
            self.advance();
        }
    }

    /// `GENERATED {ALWAYS | BY DEFAULT} AS {IDENTITY [(...)] | (expr) [STORED]}`.
    /// Returns whether the column is an identity column.
    fn parse_generated(&mut self) -> Result<bool, SqlParseError> {
        self.advance(); // GENERATED
        if !self.eat_word("ALWAYS") && self.eat_word("BY") {
            self.eat(&Token::Default);
        }
        self.eat_word("AS");
        if self.eat_word("IDENTITY") {
            if self.current() == &Token::LParen {
                self.skip_parenthesized()?;
            }
            return Ok(true);
        }
        if self.current() == &Token::LParen {
            self.skip_parenthesized()?;
        }
        Ok(false)
    }

    /// Skips a DEFAULT expression: a literal, `NULL`, a bare word or call such
    /// as `now()`, or a parenthesized expression, plus trailing `::type` casts.
    fn skip_default_value(&mut self) -> Result<(), SqlParseError> {
        match self.current() {
            Token::Str(_) | Token::Num(_) | Token::Null => self.advance(),
            Token::Ident(_) => {
                self.advance();
                if self.current() == &Token::LParen {
                    self.skip_parenthesized()?;
                }
            }
            Token::LParen => self.skip_parenthesized()?,
            _ => {}
        }

        // PostgreSQL casts: 'x'::character varying
        while self.current() == &Token::Symbol(':') {
            self.advance();
            if self.current() == &Token::Symbol(':') {
                self.advance();
                self.parse_type()?;
            }
        }
        Ok(())
    }

    /// Consumes a parenthesized group and returns its inner text.
    fn collect_until_paren(&mut self) -> Result<String, SqlParseError> {
        self.advance(); // (
        let mut parts = Vec::new();
        let mut depth = 1;

        loop {
            let part = match self.current() {
                Token::LParen => {
                    depth += 1;
                    "(".to_string()
                }
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        break;
                    }
                    ")".to_string()
                }
                Token::Ident(s) | Token::Num(s) => s.clone(),
                Token::Quoted(s) => format!("\"{}\"", s),
                Token::Str(s) => format!("'{}'", s),
                Token::Comma => ",".to_string(),
                Token::Dot => ".".to_string(),
                Token::Symbol(c) => c.to_string(),
                Token::Semicolon | Token::Eof => return Err(self.eof()),
                other => format!("{:?}", other).to_uppercase(),
            };
            parts.push(part);
            self.advance();
        }

        Ok(parts.join(" ").replace(" , ", ","))
    }

    /// `table [(col, ...)]`; an empty column list means the target's primary key.
    fn parse_reference(&mut self) -> Result<(String, Vec<String>), SqlParseError> {
        let target = self
            .parse_qualified_name()
            .ok_or_else(|| self.expected("referenced table"))?;
        let columns = if self.current() == &Token::LParen {
            self.parse_column_list()?
        } else {
            Vec::new()
        };
        Ok((target, columns))
    }

    fn parse_foreign_key(&mut self, table_name: &str) -> Result<ForeignKey, SqlParseError> {
        self.advance(); // FOREIGN
        if !self.eat(&Token::Key) {
            return Err(self.expected("KEY"));
        }
        let columns = self.parse_column_list()?;

        if !self.eat(&Token::References) {
            return Err(self.expected("REFERENCES"));
        }
        let (target, target_columns) = self.parse_reference()?;
        self.skip_fk_actions();

        Ok(ForeignKey {
            table: table_name.to_string(),
            columns,
            target,
            target_columns,
        })
    }

    /// Reads `(a, b(10) DESC, ...)`, skipping an optional index name and
    /// index-kind words before the list.
    fn parse_column_list(&mut self) -> Result<Vec<String>, SqlParseError> {
        while matches!(self.current(), Token::Key | Token::Index | Token::Ident(_) | Token::Quoted(_))
        {
            self.advance();
        }
        if !self.eat(&Token::LParen) {
            return Err(self.expected("'('"));
        }

        let mut cols = Vec::new();
        let mut expect_name = true;
        loop {
            match self.current() {
                Token::RParen => {
                    self.advance();
                    break;
                }
                Token::Comma => {
                    expect_name = true;
                    self.advance();
                }
                Token::LParen => self.skip_parenthesized()?,
                Token::Semicolon | Token::Eof => return Err(self.eof()),
                t => {
                    if expect_name {
                        if let Some(name) = t.ident() {
                            cols.push(name.to_string());
                            expect_name = false;
                        }
                    }
                    self.advance();
                }
            }
        }

        Ok(cols)
    }

    /// `ON DELETE ...` / `ON UPDATE ...` clauses carry nothing the graph keeps.
    fn skip_fk_actions(&mut self) {
        while self.current() == &Token::On {
            self.advance();
            if !self.eat_word("DELETE") && !self.eat_word("UPDATE") {
                break;
            }
            if self.eat_word("SET") {
                if !self.eat(&Token::Null) {
                    self.eat(&Token::Default);
                }
            } else if self.eat_word("NO") {
                self.eat_word("ACTION");
            } else if !self.eat_word("CASCADE") && !self.eat_word("RESTRICT") {
                break;
            }
        }
    }

    fn skip_parenthesized(&mut self) -> Result<(), SqlParseError> {
        if self.current() != &Token::LParen {
            self.advance();
            return Ok(());
        }
        self.advance();
        let mut depth = 1;
        while depth > 0 {
            match self.current() {
                Token::LParen => depth += 1,
                Token::RParen => depth -= 1,
                Token::Semicolon | Token::Eof => return Err(self.eof()),
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    fn skip_statement(&mut self) {
        while !matches!(self.current(), Token::Semicolon | Token::Eof) {
            self.advance();
        }
        self.eat(&Token::Semicolon);
    }

    /// Skips the rest of a table element, stopping at `,` or `)` at depth zero.
    fn skip_until_separator(&mut self) -> Result<(), SqlParseError> {
        loop {
            match self.current() {
                Token::Comma | Token::RParen => return Ok(()),
                Token::LParen => self.skip_parenthesized()?,
                Token::Semicolon | Token::Eof => return Err(self.eof()),
                _ => self.advance(),
            }
        }
    }

    /// `ALTER TABLE [ONLY] [IF EXISTS] name ADD [CONSTRAINT n] {FOREIGN KEY | PRIMARY KEY | UNIQUE} ...`
    fn parse_alter_table(&mut self) -> Result<Option<(String, Vec<AlterAction>)>, SqlParseError> {
        self.advance(); // ALTER

        if !self.eat(&Token::Table) {
            self.skip_statement();
            return Ok(None);
        }
        self.eat(&Token::Only);
        if self.eat(&Token::If) {
            self.eat(&Token::Exists);
        }
        self.eat(&Token::Only);

        let Some(table_name) = self.parse_qualified_name() else {
            self.skip_statement();
            return Ok(None);
        };
        self.table = table_name.clone();

        let mut actions = Vec::new();
        loop {
            if !self.eat(&Token::Add) {
                break;
            }
            if self.eat(&Token::Constraint) && self.current().ident().is_some() {
                self.advance();
            }
            match self.current() {
                Token::Foreign => {
                    actions.push(AlterAction::ForeignKey(self.parse_foreign_key(&table_name)?));
                }
                Token::Primary => {
                    self.advance();
                    self.eat(&Token::Key);
                    actions.push(AlterAction::PrimaryKey(self.parse_column_list()?));
                }
                Token::Unique => {
                    self.advance();
                    actions.push(AlterAction::Unique(self.parse_column_list()?));
                }
                _ => {}
            }
            // Advance to the next `ADD` clause or the end of the statement
            while !matches!(self.current(), Token::Comma | Token::Semicolon | Token::Eof) {
                if self.current() == &Token::LParen {
                    self.skip_parenthesized()?;
                } else {
                    self.advance();
                }
            }
            if !self.eat(&Token::Comma) {
                break;
            }
        }

        self.skip_statement();
        Ok(Some((table_name, actions)))
    }
}

fn apply_alter_actions(schema: &mut Schema, table: &str, actions: Vec<AlterAction>) {
    for action in actions {
        match action {
            AlterAction::ForeignKey(fk) => schema.foreign_keys.push(fk),
            AlterAction::PrimaryKey(cols) => {
                if let Some(entity) = schema.entities.iter_mut().find(|e| e.name == table) {
                    for col in entity.columns.iter_mut().filter(|c| cols.contains(&c.name)) {
                        if !col.has(&ColumnModifier::Pk) {
                            col.modifiers.insert(0, ColumnModifier::Pk);
                        }
                    }
                    entity.constraints.push(Constraint::PrimaryKey(cols));
                }
            }
            AlterAction::Unique(cols) => {
                if let Some(entity) = schema.entities.iter_mut().find(|e| e.name == table) {
                    entity.constraints.push(Constraint::Unique(cols));
                }
            }
        }
    }
}
