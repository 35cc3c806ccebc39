//! SQL lexer for tokenizing DDL statements.

use std::iter::Peekable;
use std::str::CharIndices;

/// SQL token types.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Create,
    Alter,
    Add,
    Table,
    Only,
    Primary,
    Key,
    Foreign,
    References,
    Not,
    Null,
    Unique,
    Default,
    On,
    Constraint,
    Index,
    If,
    Exists,
    Check,

    // Identifiers and literals
    Ident(String),
    /// Double-quoted, backticked or bracketed identifier; never a keyword.
    Quoted(String),
    Str(String),
    Num(String),

    // Symbols
    LParen,
    RParen,
    Comma,
    Semicolon,
    Dot,
    /// Any other punctuation (`=`, `:`, `+`, ...).
    Symbol(char),

    // End of input
    Eof,
}

impl Token {
    /// Identifier text for bare or quoted identifiers.
    pub fn ident(&self) -> Option<&str> {
        match self {
            Token::Ident(s) | Token::Quoted(s) => Some(s),
            _ => None,
        }
    }

    /// Case-insensitive match against a bare (non-keyword) word.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, Token::Ident(s) if s.eq_ignore_ascii_case(word))
    }
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// SQL lexer.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().map(|(_, c)| c)
    }

    fn position(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |&(i, _)| i)
    }

    fn skip_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while self.peek_char().is_some_and(&mut pred) {
            self.chars.next();
        }
    }

    fn skip_block_comment(&mut self) {
        self.chars.next(); // /
        self.chars.next(); // *
        let mut prev = '\0';
        for (_, c) in self.chars.by_ref() {
            if prev == '*' && c == '/' {
                break;
            }
            prev = c;
        }
    }

    fn read_while(&mut self, start: usize, pred: impl FnMut(char) -> bool) -> &'a str {
        self.skip_while(pred);
        let input = self.input;
        &input[start..self.position()]
    }

    /// Reads up to `close`; a doubled `close` is an escaped literal character.
    fn read_delimited(&mut self, close: char, backslash_escapes: bool) -> String {
        self.chars.next(); // opening delimiter
        let mut text = String::new();
        while let Some((_, c)) = self.chars.next() {
            if c == close {
                if self.peek_char() == Some(close) {
                    text.push(c);
                    self.chars.next();
                    continue;
                }
                break;
            }
            if backslash_escapes && c == '\\' {
                if let Some((_, escaped)) = self.chars.next() {
                    match escaped {
                        'n' => text.push('\n'),
                        't' => text.push('\t'),
                        'r' => text.push('\r'),
                        other => text.push(other),
                    }
                }
                continue;
            }
            text.push(c);
        }
        text
    }

    fn read_number(&mut self, start: usize) -> String {
        self.chars.next(); // leading digit or '-'
        let mut seen_dot = false;
        self.read_while(start, |c| {
            if c == '.' && !seen_dot {
                seen_dot = true;
                true
            } else {
                c.is_ascii_digit()
            }
        })
        .to_string()
    }

    fn keyword_or_ident(word: &str) -> Token {
        match word.to_uppercase().as_str() {
            "CREATE" => Token::Create,
            "ALTER" => Token::Alter,
            "ADD" => Token::Add,
            "TABLE" => Token::Table,
            "ONLY" => Token::Only,
            "PRIMARY" => Token::Primary,
            "KEY" => Token::Key,
            "FOREIGN" => Token::Foreign,
            "REFERENCES" => Token::References,
            "NOT" => Token::Not,
            "NULL" => Token::Null,
            "UNIQUE" => Token::Unique,
            "DEFAULT" => Token::Default,
            "ON" => Token::On,
            "CONSTRAINT" => Token::Constraint,
            "INDEX" => Token::Index,
            "IF" => Token::If,
            "EXISTS" => Token::Exists,
            "CHECK" => Token::Check,
            _ => Token::Ident(word.to_string()),
        }
    }

    pub fn next_token(&mut self) -> Spanned {
        loop {
            self.skip_while(char::is_whitespace);

            let Some(&(offset, c)) = self.chars.peek() else {
                return Spanned {
                    token: Token::Eof,
                    offset: self.input.len(),
                };
            };
            let spanned = |token| Spanned { token, offset };

            match c {
                '-' if self.peek_second() == Some('-') => {
                    self.skip_while(|c| c != '\n');
                }
                '-' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                    return spanned(Token::Num(self.read_number(offset)));
                }
                '/' if self.peek_second() == Some('*') => self.skip_block_comment(),
                '#' => self.skip_while(|c| c != '\n'),
                '(' | ')' | ',' | ';' | '.' => {
                    self.chars.next();
                    return spanned(match c {
                        '(' => Token::LParen,
                        ')' => Token::RParen,
                        ',' => Token::Comma,
                        ';' => Token::Semicolon,
                        _ => Token::Dot,
                    });
                }
                '"' => return spanned(Token::Quoted(self.read_delimited('"', false))),
                '`' => return spanned(Token::Quoted(self.read_delimited('`', false))),
                '[' => return spanned(Token::Quoted(self.read_delimited(']', false))),
                '\'' => return spanned(Token::Str(self.read_delimited('\'', true))),
                c if c.is_ascii_digit() => return spanned(Token::Num(self.read_number(offset))),
                c if c.is_alphabetic() || c == '_' => {
                    let word = self.read_while(offset, |c| c.is_alphanumeric() || c == '_' || c == '$');
                    return spanned(Self::keyword_or_ident(word));
                }
                other => {
                    self.chars.next();
                    return spanned(Token::Symbol(other));
                }
            }
        }
    }

    /// Collect all tokens, terminated by a single `Eof`.
    pub fn tokenize(&mut self) -> Vec<Spanned> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token();
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                break;
            }
        }
        tokens
    }
}
