// Grammar functions return `Result<_, Failed>` and are written with explicit
// match/if-let rather than `?`, so every failure site reads the same way.
#![allow(clippy::question_mark)]

use crate::arena::{Arena, ArrayOrigin, Handle, KeyStyle, List, NodeKind, TableState};
use crate::classify::{
    decode_utf8, is_control, is_end_of_value, is_keylike, is_whitespace, newline_len,
};
use crate::datetime::Datetime;
use crate::number::{self, Number};
use crate::proxy::TableProxy;
use crate::{Error, ErrorKind, ParseOptions, Span, string};

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;

// ---------------------------------------------------------------------------
// Lightweight internal error -- zero-sized. The kind has already been written
// into Parser::error by the time a method returns Err(Failed).
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug)]
pub(crate) struct Failed;

const BOM: &[u8] = b"\xEF\xBB\xBF";

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// A reusable TOML parser that owns the node arena of the last document.
///
/// The parsed tree borrows scalar text from the input buffer, so the buffer
/// must outlive the parser's use of it. Query the tree through
/// [`Parser::root`].
///
/// ```
/// use toml_handles::Parser;
///
/// let mut parser = Parser::new();
/// assert!(parser.parse(b"[server]\nport = 8080\n"));
/// let root = parser.root().unwrap();
/// assert_eq!(root.table("server").unwrap().get_int("port"), Some(8080));
/// ```
pub struct Parser<'de> {
    pub(crate) input: &'de [u8],
    cursor: usize,
    pub(crate) arena: Arena,
    options: ParseOptions,

    // Maps (table, hash of decoded key) to the first entry with that hash, for
    // tables large enough to make linear scans costly.
    pub(crate) key_index: foldhash::HashMap<(Handle, u64), Handle>,
    pub(crate) hasher: foldhash::fast::RandomState,

    depth: u32,
    error: Option<ErrorKind>,
    complete: bool,
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'de> Parser<'de> {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Parser {
            input: &[],
            cursor: 0,
            arena: Arena::new(),
            options,
            key_index: foldhash::HashMap::default(),
            hasher: foldhash::fast::RandomState::default(),
            depth: 0,
            error: None,
            complete: false,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses `input` as a complete TOML document.
    ///
    /// Prior state is discarded first. On `true`, [`Parser::root`] returns
    /// the document root; on `false`, [`Parser::error`] says why.
    pub fn parse(&mut self, input: &'de [u8]) -> bool {
        self.clear();
        self.input = input;
        if u32::try_from(input.len()).is_err() {
            self.error = Some(ErrorKind::InputTooLarge);
            tracing::debug!(len = input.len(), "input too large");
            return false;
        }

        let root = self.arena.allocate(NodeKind::Table {
            list: List::EMPTY,
            state: TableState::Header,
        });
        debug_assert_eq!(root, Handle::ROOT);

        match self.document() {
            Ok(()) => {
                self.complete = true;
                tracing::debug!(len = input.len(), nodes = self.arena.len(), "parsed document");
                true
            }
            Err(Failed) => {
                tracing::debug!(
                    len = input.len(),
                    offset = self.cursor,
                    error = %self.error.unwrap_or(ErrorKind::Structural),
                    "parse failed"
                );
                false
            }
        }
    }

    pub fn parse_str(&mut self, input: &'de str) -> bool {
        self.parse(input.as_bytes())
    }

    /// Like [`Parser::parse`], returning the root on success.
    pub fn try_parse(&mut self, input: &'de [u8]) -> Result<TableProxy<'_, 'de>, Error> {
        if self.parse(input) {
            Ok(TableProxy::new(self, Handle::ROOT))
        } else {
            Err(Error::from(self.error.unwrap_or(ErrorKind::Structural)))
        }
    }

    /// The document root, available only after a successful parse.
    pub fn root(&self) -> Option<TableProxy<'_, 'de>> {
        if self.complete {
            Some(TableProxy::new(self, Handle::ROOT))
        } else {
            None
        }
    }

    /// The reason the last parse failed.
    pub fn error(&self) -> Option<Error> {
        self.error.map(Error::from)
    }

    /// Drops the parsed tree, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.input = &[];
        self.cursor = 0;
        self.arena.clear();
        self.key_index.clear();
        self.depth = 0;
        self.error = None;
        self.complete = false;
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The buffer the current tree points into.
    pub fn input(&self) -> &'de [u8] {
        self.input
    }

    #[cold]
    pub(crate) fn fail(&mut self, kind: ErrorKind) -> Failed {
        if self.error.is_none() {
            self.error = Some(kind);
        }
        Failed
    }

    // -- cursor operations --------------------------------------------------

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.cursor).copied()
    }

    #[inline]
    fn advance(&mut self) {
        self.cursor += 1;
    }

    #[inline]
    fn eat_byte(&mut self, b: u8) -> bool {
        if self.peek_byte() == Some(b) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_byte(&mut self, b: u8) -> Result<(), Failed> {
        if self.eat_byte(b) {
            Ok(())
        } else if self.peek_byte().is_none() {
            Err(self.fail(ErrorKind::Boundary))
        } else {
            Err(self.fail(ErrorKind::Structural))
        }
    }

    /// Failure kind for a byte that cannot start the expected token.
    fn unexpected(&mut self, b: u8) -> Failed {
        if is_control(b) || b >= 0x80 {
            self.fail(ErrorKind::Lexical)
        } else {
            self.fail(ErrorKind::Structural)
        }
    }

    fn eat_whitespace(&mut self) {
        while let Some(b) = self.peek_byte() {
            if is_whitespace(b) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn eat_newline(&mut self) -> bool {
        let len = newline_len(self.input, self.cursor);
        self.cursor += len;
        len > 0
    }

    fn eat_newline_or_eof(&mut self) -> Result<(), Failed> {
        match self.peek_byte() {
            None => Ok(()),
            Some(_) if self.eat_newline() => Ok(()),
            Some(b'\r') => Err(self.fail(ErrorKind::Lexical)),
            Some(_) => Err(self.fail(ErrorKind::Structural)),
        }
    }

    fn eat_comment(&mut self) -> Result<bool, Failed> {
        if !self.eat_byte(b'#') {
            return Ok(false);
        }
        loop {
            match self.peek_byte() {
                None | Some(b'\n' | b'\r') => break,
                Some(b) if is_control(b) => return Err(self.fail(ErrorKind::Lexical)),
                Some(0x00..=0x7F) => self.advance(),
                Some(_) => match decode_utf8(self.input, self.cursor) {
                    Some((_, len)) => self.cursor += len,
                    None => return Err(self.fail(ErrorKind::Lexical)),
                },
            }
        }
        self.eat_newline_or_eof().map(|()| true)
    }

    /// Whitespace, newlines and comments between array elements.
    fn eat_intermediate(&mut self) -> Result<(), Failed> {
        loop {
            self.eat_whitespace();
            if self.eat_newline() {
                continue;
            }
            match self.eat_comment() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Optional whitespace and comment, then a newline or the end of input.
    fn end_of_line(&mut self) -> Result<(), Failed> {
        self.eat_whitespace();
        match self.eat_comment() {
            Ok(true) => Ok(()),
            Ok(false) => self.eat_newline_or_eof(),
            Err(e) => Err(e),
        }
    }

    // -- document structure -------------------------------------------------

    fn document(&mut self) -> Result<(), Failed> {
        if self.input.starts_with(BOM) {
            self.cursor = BOM.len();
        }
        // The table that key-values on the following lines belong to.
        let mut section = Handle::ROOT;
        loop {
            self.eat_whitespace();
            match self.eat_comment() {
                Ok(true) => continue,
                Ok(false) => {}
                Err(e) => return Err(e),
            }
            if self.eat_newline() {
                continue;
            }
            match self.peek_byte() {
                None => return Ok(()),
                Some(b'[') => {
                    section = match self.table_header() {
                        Ok(table) => table,
                        Err(e) => return Err(e),
                    };
                }
                Some(_) => {
                    if let Err(e) = self.key_value(section) {
                        return Err(e);
                    }
                    if let Err(e) = self.end_of_line() {
                        return Err(e);
                    }
                }
            }
        }
    }

    /// Parses `[a.b]` or `[[a.b]]` and returns the table it opens.
    fn table_header(&mut self) -> Result<Handle, Failed> {
        self.advance();
        let is_array = self.eat_byte(b'[');

        let mut table = Handle::ROOT;
        self.eat_whitespace();
        let mut key = match self.read_key() {
            Ok(k) => k,
            Err(e) => return Err(e),
        };
        loop {
            self.eat_whitespace();
            if !self.eat_byte(b'.') {
                break;
            }
            self.eat_whitespace();
            table = match self.navigate_header_intermediate(table, key) {
                Ok(t) => t,
                Err(e) => return Err(e),
            };
            key = match self.read_key() {
                Ok(k) => k,
                Err(e) => return Err(e),
            };
        }

        if let Err(e) = self.expect_byte(b']') {
            return Err(e);
        }
        if is_array && let Err(e) = self.expect_byte(b']') {
            return Err(e);
        }

        let section = if is_array {
            self.navigate_header_array_final(table, key)
        } else {
            self.navigate_header_table_final(table, key)
        };
        if section.is_ok()
            && let Err(e) = self.end_of_line()
        {
            return Err(e);
        }
        section
    }

    /// Parses `key = value` into `table`, creating tables for dotted keys.
    fn key_value(&mut self, table: Handle) -> Result<(), Failed> {
        let mut table = table;
        let mut key = match self.read_key() {
            Ok(k) => k,
            Err(e) => return Err(e),
        };
        self.eat_whitespace();
        while self.eat_byte(b'.') {
            self.eat_whitespace();
            table = match self.navigate_dotted(table, key) {
                Ok(t) => t,
                Err(e) => return Err(e),
            };
            key = match self.read_key() {
                Ok(k) => k,
                Err(e) => return Err(e),
            };
            self.eat_whitespace();
        }

        if let Err(e) = self.expect_byte(b'=') {
            return Err(e);
        }
        self.eat_whitespace();
        let value = match self.value() {
            Ok(v) => v,
            Err(e) => return Err(e),
        };
        self.insert_value(table, key, value)
    }

    /// Reads one key segment into a `Key` node.
    fn read_key(&mut self) -> Result<Handle, Failed> {
        let start = self.cursor;
        match self.peek_byte() {
            Some(b'"' | b'\'') => {
                let token = match string::munch(self.input, start) {
                    Ok(t) => t,
                    Err(kind) => return Err(self.fail(kind)),
                };
                if token.style.is_multiline() {
                    return Err(self.fail(ErrorKind::Structural));
                }
                self.cursor = token.end;
                let style = if token.style.is_basic() {
                    KeyStyle::Basic
                } else {
                    KeyStyle::Literal
                };
                Ok(self.arena.allocate(NodeKind::Key {
                    span: token.content,
                    style,
                }))
            }
            Some(b) if is_keylike(b) => {
                while let Some(b) = self.peek_byte() {
                    if !is_keylike(b) {
                        break;
                    }
                    self.advance();
                }
                Ok(self.arena.allocate(NodeKind::Key {
                    span: Span::from_offsets(start, self.cursor),
                    style: KeyStyle::Bare,
                }))
            }
            Some(b) => Err(self.unexpected(b)),
            None => Err(self.fail(ErrorKind::Boundary)),
        }
    }

    // -- values -------------------------------------------------------------

    fn value(&mut self) -> Result<Handle, Failed> {
        let Some(byte) = self.peek_byte() else {
            return Err(self.fail(ErrorKind::Boundary));
        };
        match byte {
            b'"' | b'\'' => self.string(),
            b'[' => self.nested(Self::array),
            b'{' => self.nested(Self::inline_table),
            b't' | b'f' => self.boolean(),
            b'0'..=b'9' if self.looks_like_datetime() => self.datetime(),
            b'0'..=b'9' | b'+' | b'-' | b'i' | b'n' => self.number(),
            // Unquoted text such as `a = bare`.
            b if b.is_ascii_alphabetic() => Err(self.fail(ErrorKind::Lexical)),
            b => Err(self.unexpected(b)),
        }
    }

    fn string(&mut self) -> Result<Handle, Failed> {
        let token = match string::munch(self.input, self.cursor) {
            Ok(t) => t,
            Err(kind) => return Err(self.fail(kind)),
        };
        self.cursor = token.end;
        Ok(self.arena.allocate(NodeKind::String {
            span: token.content,
            style: token.style,
        }))
    }

    fn boolean(&mut self) -> Result<Handle, Failed> {
        let rest = &self.input[self.cursor..];
        let (value, len) = if rest.starts_with(b"true") {
            (true, 4)
        } else if rest.starts_with(b"false") {
            (false, 5)
        } else {
            return Err(self.fail(ErrorKind::Lexical));
        };
        if !is_end_of_value(rest.get(len).copied()) {
            return Err(self.fail(ErrorKind::Lexical));
        }
        let span = Span::from_offsets(self.cursor, self.cursor + len);
        self.cursor += len;
        Ok(self.arena.allocate(NodeKind::Boolean { span, value }))
    }

    fn number(&mut self) -> Result<Handle, Failed> {
        let start = self.cursor;
        let (end, number) = match number::munch(self.input, start) {
            Ok(v) => v,
            Err(kind) => return Err(self.fail(kind)),
        };
        self.cursor = end;
        let span = Span::from_offsets(start, end);
        let kind = match number {
            Number::Integer(value) => NodeKind::Integer { span, value },
            Number::Float(class) => NodeKind::Float { span, class },
        };
        Ok(self.arena.allocate(kind))
    }

    /// Two digits and `:`, or four digits and `-`, ahead of the cursor.
    /// Anything else starting with a digit is a number, including `1.5e-3`.
    fn looks_like_datetime(&self) -> bool {
        let rest = &self.input[self.cursor..];
        let prefix = match rest {
            [_, _, b':', ..] => &rest[..2],
            [_, _, _, _, b'-', ..] => &rest[..4],
            _ => return false,
        };
        prefix.iter().all(u8::is_ascii_digit)
    }

    fn datetime(&mut self) -> Result<Handle, Failed> {
        let start = self.cursor;
        let rest = &self.input[start..];
        let (len, value) = match Datetime::munch(rest) {
            Some((len, value)) if is_end_of_value(rest.get(len).copied()) => (len, value),
            _ => return Err(self.fail(ErrorKind::Lexical)),
        };
        self.cursor += len;
        Ok(self.arena.allocate(NodeKind::DateTime {
            span: Span::from_offsets(start, start + len),
            kind: value.kind(),
        }))
    }

    /// Runs a container parser one nesting level deeper.
    fn nested(&mut self, parse: fn(&mut Self) -> Result<Handle, Failed>) -> Result<Handle, Failed> {
        if self.depth >= self.options.max_depth {
            return Err(self.fail(ErrorKind::DepthLimit));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn array(&mut self) -> Result<Handle, Failed> {
        self.advance();
        let array = self.arena.allocate(NodeKind::Array {
            list: List::EMPTY,
            origin: ArrayOrigin::Static,
        });
        loop {
            if let Err(e) = self.eat_intermediate() {
                return Err(e);
            }
            if self.eat_byte(b']') {
                break;
            }
            let value = match self.value() {
                Ok(v) => v,
                Err(e) => return Err(e),
            };
            self.arena.push_child(array, value);
            if let Err(e) = self.eat_intermediate() {
                return Err(e);
            }
            if self.eat_byte(b',') {
                continue;
            }
            if let Err(e) = self.expect_byte(b']') {
                return Err(e);
            }
            break;
        }
        if self.options.homogeneous_arrays
            && let Err(e) = self.check_homogeneous(array)
        {
            return Err(e);
        }
        Ok(array)
    }

    /// `{ k = v, ... }` on a single line, without a trailing comma.
    fn inline_table(&mut self) -> Result<Handle, Failed> {
        self.advance();
        let table = self.arena.allocate(NodeKind::Table {
            list: List::EMPTY,
            state: TableState::Inline,
        });
        self.eat_whitespace();
        if self.eat_byte(b'}') {
            return Ok(table);
        }
        loop {
            if let Err(e) = self.key_value(table) {
                return Err(e);
            }
            self.eat_whitespace();
            if self.eat_byte(b'}') {
                return Ok(table);
            }
            if let Err(e) = self.expect_byte(b',') {
                return Err(e);
            }
            self.eat_whitespace();
        }
    }
}
