//! Parser for the documentation generator's `searchData` tables.
//!
//! A table is a JavaScript array literal assigned to `searchData`:
//!
//! ```text
//! var searchData=
//! [
//!   ['insert',['insert',['../class_mem_cache.html#ad34',1,'MemCache::insert()'],
//!                       ['../class_bin_tree.html#a045',1,'BinTree::insert()']]],
//!   ['wait_5fqueue_2eh',['wait_queue.h',['../wait__queue_8h.html',1,'']]]
//! ];
//! ```
//!
//! Each record is `[key, [label, link, link, ...]]` and each link is
//! `[target, flag, scope]`. Keys carry the generator's `_xx` escapes; labels
//! and scopes carry HTML entities. Both are decoded here. Tables for a single
//! category (`functions_8.js`) also append a serial number to every key
//! (`initial_1609`), see [`KeyFormat`].

use crate::entry::{Entry, decode_generated_key};
use crate::error::LoadError;

use super::entities::decode_entities;

/// How record keys are written in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFormat {
    /// Escaped name only (`wait_5fqueue_2eh`), as in the `all` tables
    #[default]
    Plain,
    /// Escaped name plus `_<serial>` (`insert_5fpath_1612`), as in per-category tables
    Serial,
}

impl KeyFormat {
    /// Key format used by the generator for a shard category.
    pub fn for_category(category: &str) -> Self {
        if category == "all" { Self::Plain } else { Self::Serial }
    }

    /// Decode a raw record key into the name users search for.
    pub fn decode(self, raw: &str) -> String {
        let escaped = match self {
            Self::Plain => raw,
            Self::Serial => raw
                .rsplit_once('_')
                .filter(|(name, serial)| {
                    !name.is_empty()
                        && !serial.is_empty()
                        && serial.chars().all(|c| c.is_ascii_digit())
                })
                .map_or(raw, |(name, _)| name),
        };
        decode_generated_key(escaped).into_owned()
    }
}

/// Parse a whole `searchData` file into entries, in file order.
///
/// `origin` names the source in error messages (usually the file name).
pub fn parse_search_data(
    source: &str,
    origin: &str,
    keys: KeyFormat,
) -> Result<Vec<Entry>, LoadError> {
    let mut parser = Parser::new(source, origin, keys);
    parser.seek_table()?;
    let entries = parser.table()?;

    parser.skip_ws();
    parser.eat(';');
    parser.skip_ws();
    if parser.peek().is_some() {
        return Err(parser.error("unexpected content after searchData table"));
    }

    Ok(entries)
}

struct Parser<'s> {
    src: &'s str,
    origin: &'s str,
    keys: KeyFormat,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn new(src: &'s str, origin: &'s str, keys: KeyFormat) -> Self {
        Self {
            src,
            origin,
            keys,
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Skip whitespace, then consume `expected` if it is next.
    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char, what: &str) -> Result<(), LoadError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {what}")))
        }
    }

    fn error(&self, message: &str) -> LoadError {
        let consumed = &self.src[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map_or(0, |i| i + 1);
        let column = consumed[line_start..].chars().count() + 1;
        LoadError::Syntax {
            origin: self.origin.to_string(),
            line,
            column,
            message: message.to_string(),
        }
    }

    /// Move to the opening bracket of the table, past `var searchData=`.
    fn seek_table(&mut self) -> Result<(), LoadError> {
        self.skip_ws();
        if let Some(rest) = self.src[self.pos..].strip_prefix("var") {
            let assign = rest
                .find('=')
                .ok_or_else(|| self.error("expected `=` after `var searchData`"))?;
            self.pos += "var".len() + assign + 1;
        }
        self.skip_ws();
        if self.peek() == Some('[') {
            Ok(())
        } else {
            Err(self.error("expected searchData array"))
        }
    }

    /// `[ record, record, ... ]`, trailing comma allowed.
    fn table(&mut self) -> Result<Vec<Entry>, LoadError> {
        let mut entries = Vec::new();
        self.expect('[', "`[` opening the table")?;
        loop {
            if self.eat(']') {
                return Ok(entries);
            }
            self.record(&mut entries)?;
            if !self.eat(',') {
                self.expect(']', "`,` or `]` after a record")?;
                return Ok(entries);
            }
        }
    }

    /// `[key, [label, link...], extra...]`
    fn record(&mut self, out: &mut Vec<Entry>) -> Result<(), LoadError> {
        self.expect('[', "`[` opening a record")?;
        let raw_key = self.string()?;
        self.expect(',', "`,` after the record key")?;
        self.expect('[', "`[` opening the record body")?;
        let label = self.string()?;

        let key = self.keys.decode(&raw_key);
        let label = decode_entities(&label).into_owned();
        let before = out.len();

        while self.eat(',') {
            let (target, scope) = self.link()?;
            let mut entry = Entry::new(key.clone(), label.clone(), target);
            if let Some(scope) = scope {
                entry = entry.with_scope(decode_entities(&scope));
            }
            out.push(entry);
        }
        self.expect(']', "`]` closing the record body")?;

        // Newer generators append extra fields after the body; they carry no links.
        while self.eat(',') {
            self.skip_value()?;
        }
        self.expect(']', "`]` closing the record")?;

        if out.len() == before {
            tracing::debug!("{}: record '{}' has no links, skipped", self.origin, key);
        }
        Ok(())
    }

    /// `[target, flag, scope]`. The flag and any further fields are ignored.
    fn link(&mut self) -> Result<(String, Option<String>), LoadError> {
        self.expect('[', "`[` opening a link")?;
        let target = self.string()?;
        let mut scope = None;
        while self.eat(',') {
            self.skip_ws();
            if matches!(self.peek(), Some('\'' | '"')) {
                let text = self.string()?;
                scope.get_or_insert(text);
            } else {
                self.skip_value()?;
            }
        }
        self.expect(']', "`]` closing a link")?;
        Ok((target, scope))
    }

    /// A single- or double-quoted JavaScript string literal.
    fn string(&mut self) -> Result<String, LoadError> {
        self.skip_ws();
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected string")),
        };
        self.bump();

        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(ch) if ch == quote => return Ok(out),
                Some('\\') => self.escape(&mut out)?,
                Some(ch) => out.push(ch),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LoadError> {
        let ch = match self.bump() {
            None => return Err(self.error("unterminated escape")),
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('0') => '\0',
            Some('x') => self.hex_escape(2)?,
            Some('u') => self.hex_escape(4)?,
            Some(other) => other,
        };
        out.push(ch);
        Ok(())
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, LoadError> {
        let hex = self
            .src
            .get(self.pos..self.pos + digits)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("invalid hex escape"))?;
        let ch = u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error("escape is not a valid character"))?;
        self.pos += digits;
        Ok(ch)
    }

    /// Skip a string, number, or nested array.
    fn skip_value(&mut self) -> Result<(), LoadError> {
        self.skip_ws();
        match self.peek() {
            Some('\'' | '"') => self.string().map(drop),
            Some('[') => {
                self.bump();
                loop {
                    if self.eat(']') {
                        return Ok(());
                    }
                    self.skip_value()?;
                    if !self.eat(',') {
                        return self.expect(']', "`,` or `]` in array");
                    }
                }
            }
            Some(ch) if ch == '-' || ch.is_ascii_alphanumeric() || ch == '.' => {
                while self
                    .peek()
                    .is_some_and(|c| c == '-' || c == '.' || c == '+' || c.is_ascii_alphanumeric())
                {
                    self.bump();
                }
                Ok(())
            }
            _ => Err(self.error("expected value")),
        }
    }
}
