//! Read-only views over a parsed document.
//!
//! A proxy is a parser reference plus a [`Handle`]. Proxies are `Copy`,
//! never allocate except to decode escaped strings, and borrow the parser
//! immutably, so the tree cannot change underneath them.

use crate::arena::{Handle, Kind, NodeKind};
use crate::datetime::Datetime;
use crate::parser::Parser;
use crate::{Span, number, string};
use std::borrow::Cow;
use std::fmt;

#[cfg(test)]
#[path = "./proxy_tests.rs"]
mod tests;

// -- table ------------------------------------------------------------------

/// A table, an inline table, or one element of an array of tables.
#[derive(Copy, Clone)]
pub struct TableProxy<'p, 'de> {
    parser: &'p Parser<'de>,
    handle: Handle,
}

impl<'p, 'de> TableProxy<'p, 'de> {
    pub(crate) fn new(parser: &'p Parser<'de>, handle: Handle) -> Self {
        TableProxy { parser, handle }
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.parser
            .arena
            .get(self.handle)
            .kind
            .list()
            .map_or(0, |list| list.size as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first entry, or [`TableProxy::end`] for an empty table.
    pub fn begin(&self) -> Handle {
        self.parser
            .arena
            .get(self.handle)
            .kind
            .list()
            .map_or(Handle::INVALID, |list| list.head)
    }

    /// The entry after `entry`, or [`TableProxy::end`].
    pub fn next(&self, entry: Handle) -> Handle {
        match self.parser.arena.try_get(entry) {
            Some(node) => node.next,
            None => Handle::INVALID,
        }
    }

    /// The past-the-end sentinel.
    #[inline]
    pub fn end(&self) -> Handle {
        Handle::INVALID
    }

    /// The decoded key of an entry handle obtained from iteration.
    pub fn key(&self, entry: Handle) -> Option<Cow<'de, str>> {
        self.parser.arena.try_get(entry)?;
        self.parser.entry_name(entry)
    }

    /// The value of an entry handle obtained from iteration.
    pub fn value(&self, entry: Handle) -> Option<ValueProxy<'p, 'de>> {
        let node = self.parser.arena.try_get(entry)?;
        match node.kind {
            NodeKind::KeyValue { value, .. } => Some(ValueProxy::new(self.parser, value)),
            _ => None,
        }
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> TableIter<'p, 'de> {
        TableIter {
            parser: self.parser,
            cursor: self.begin(),
        }
    }

    /// Looks up an entry by decoded key.
    pub fn get(&self, name: &str) -> Option<ValueProxy<'p, 'de>> {
        let entry = self.parser.find_entry(self.handle, name.as_bytes())?;
        Some(ValueProxy::new(self.parser, self.parser.entry_value(entry)))
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn table(&self, name: &str) -> Option<TableProxy<'p, 'de>> {
        self.get(name)?.as_table()
    }

    pub fn array(&self, name: &str) -> Option<ArrayProxy<'p, 'de>> {
        self.get(name)?.as_array()
    }

    pub fn get_str(&self, name: &str) -> Option<Cow<'de, str>> {
        self.get(name)?.as_str()
    }

    pub fn get_str_or<'a>(&self, name: &str, default: &'a str) -> Cow<'a, str>
    where
        'de: 'a,
    {
        self.get_str(name).unwrap_or(Cow::Borrowed(default))
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_int()
    }

    pub fn get_int_or(&self, name: &str, default: i64) -> i64 {
        self.get_int(name).unwrap_or(default)
    }

    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get(name)?.as_i32()
    }

    pub fn get_i32_or(&self, name: &str, default: i32) -> i32 {
        self.get_i32(name).unwrap_or(default)
    }

    pub fn get_u32(&self, name: &str) -> Option<u32> {
        self.get(name)?.as_u32()
    }

    pub fn get_u32_or(&self, name: &str, default: u32) -> u32 {
        self.get_u32(name).unwrap_or(default)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_float()
    }

    pub fn get_float_or(&self, name: &str, default: f64) -> f64 {
        self.get_float(name).unwrap_or(default)
    }

    pub fn get_f32(&self, name: &str) -> Option<f32> {
        self.get(name)?.as_f32()
    }

    pub fn get_f32_or(&self, name: &str, default: f32) -> f32 {
        self.get_f32(name).unwrap_or(default)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    pub fn get_bool_or(&self, name: &str, default: bool) -> bool {
        self.get_bool(name).unwrap_or(default)
    }

    pub fn get_datetime(&self, name: &str) -> Option<Datetime> {
        self.get(name)?.as_datetime()
    }

    pub fn get_datetime_or(&self, name: &str, default: Datetime) -> Datetime {
        self.get_datetime(name).unwrap_or(default)
    }
}

impl<'p, 'de> IntoIterator for TableProxy<'p, 'de> {
    type Item = (Cow<'de, str>, ValueProxy<'p, 'de>);
    type IntoIter = TableIter<'p, 'de>;

    fn into_iter(self) -> TableIter<'p, 'de> {
        self.iter()
    }
}

impl fmt::Debug for TableProxy<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.iter() {
            map.entry(&key, &value);
        }
        map.finish()
    }
}

pub struct TableIter<'p, 'de> {
    parser: &'p Parser<'de>,
    cursor: Handle,
}

impl<'p, 'de> Iterator for TableIter<'p, 'de> {
    type Item = (Cow<'de, str>, ValueProxy<'p, 'de>);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.is_valid() {
            return None;
        }
        let entry = self.cursor;
        self.cursor = self.parser.arena.get(entry).next;
        let key = self.parser.entry_name(entry).unwrap_or_default();
        Some((key, ValueProxy::new(self.parser, self.parser.entry_value(entry))))
    }
}

// -- array ------------------------------------------------------------------

/// A `[...]` value, or the sequence of `[[name]]` elements.
#[derive(Copy, Clone)]
pub struct ArrayProxy<'p, 'de> {
    parser: &'p Parser<'de>,
    handle: Handle,
}

impl<'p, 'de> ArrayProxy<'p, 'de> {
    pub(crate) fn new(parser: &'p Parser<'de>, handle: Handle) -> Self {
        ArrayProxy { parser, handle }
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn size(&self) -> u32 {
        self.parser
            .arena
            .get(self.handle)
            .kind
            .list()
            .map_or(0, |list| list.size)
    }

    pub fn len(&self) -> usize {
        self.size() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The element at `index`, walking the list from its head.
    pub fn get(&self, index: usize) -> Option<ValueProxy<'p, 'de>> {
        self.iter().nth(index)
    }

    pub fn begin(&self) -> Handle {
        self.parser
            .arena
            .get(self.handle)
            .kind
            .list()
            .map_or(Handle::INVALID, |list| list.head)
    }

    pub fn next(&self, element: Handle) -> Handle {
        match self.parser.arena.try_get(element) {
            Some(node) => node.next,
            None => Handle::INVALID,
        }
    }

    #[inline]
    pub fn end(&self) -> Handle {
        Handle::INVALID
    }

    /// The element behind a handle obtained from iteration.
    pub fn value(&self, element: Handle) -> Option<ValueProxy<'p, 'de>> {
        self.parser.arena.try_get(element)?;
        Some(ValueProxy::new(self.parser, element))
    }

    pub fn iter(&self) -> ArrayIter<'p, 'de> {
        ArrayIter {
            parser: self.parser,
            cursor: self.begin(),
        }
    }
}

impl<'p, 'de> IntoIterator for ArrayProxy<'p, 'de> {
    type Item = ValueProxy<'p, 'de>;
    type IntoIter = ArrayIter<'p, 'de>;

    fn into_iter(self) -> ArrayIter<'p, 'de> {
        self.iter()
    }
}

impl fmt::Debug for ArrayProxy<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub struct ArrayIter<'p, 'de> {
    parser: &'p Parser<'de>,
    cursor: Handle,
}

impl<'p, 'de> Iterator for ArrayIter<'p, 'de> {
    type Item = ValueProxy<'p, 'de>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.is_valid() {
            return None;
        }
        let element = self.cursor;
        self.cursor = self.parser.arena.get(element).next;
        Some(ValueProxy::new(self.parser, element))
    }
}

// -- value ------------------------------------------------------------------

/// Any value node. The typed accessors return `None` on a kind mismatch.
#[derive(Copy, Clone)]
pub struct ValueProxy<'p, 'de> {
    parser: &'p Parser<'de>,
    handle: Handle,
}

impl<'p, 'de> ValueProxy<'p, 'de> {
    pub(crate) fn new(parser: &'p Parser<'de>, handle: Handle) -> Self {
        ValueProxy { parser, handle }
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    #[inline]
    fn node(&self) -> &'p NodeKind {
        &self.parser.arena.get(self.handle).kind
    }

    /// Source bytes of a scalar value, in the buffer it was parsed from.
    fn source(&self) -> Option<&'de [u8]> {
        let input: &'de [u8] = self.parser.input;
        self.node().span()?.slice(input)
    }

    pub fn kind(&self) -> Kind {
        // Only key nodes lack a value kind; they read as text.
        self.node().value_kind().unwrap_or(Kind::String)
    }

    /// Source range of a scalar, excluding string delimiters.
    pub fn span(&self) -> Option<Span> {
        self.node().span()
    }

    pub fn as_str(&self) -> Option<Cow<'de, str>> {
        match *self.node() {
            NodeKind::String { style, .. } => string::decode(self.source()?, style),
            NodeKind::Key { .. } => string::to_text(self.parser.key_bytes(self.handle)),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self.node() {
            NodeKind::Integer { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The integer, if it fits in an `i32`.
    pub fn as_i32(&self) -> Option<i32> {
        i32::try_from(self.as_int()?).ok()
    }

    /// The integer, if it is non-negative and fits in a `u32`.
    pub fn as_u32(&self) -> Option<u32> {
        u32::try_from(self.as_int()?).ok()
    }

    /// Floats are decoded from their source text on every call.
    pub fn as_float(&self) -> Option<f64> {
        match self.node() {
            NodeKind::Float { .. } => number::decode_float(self.source()?),
            _ => None,
        }
    }

    /// The float rounded to `f32`. `None` when a finite value does not fit.
    pub fn as_f32(&self) -> Option<f32> {
        let value = self.as_float()?;
        let narrowed = value as f32;
        if value.is_finite() && !narrowed.is_finite() {
            return None;
        }
        Some(narrowed)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self.node() {
            NodeKind::Boolean { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<Datetime> {
        match self.node() {
            NodeKind::DateTime { .. } => Datetime::munch(self.source()?).map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<TableProxy<'p, 'de>> {
        match self.node() {
            NodeKind::Table { .. } | NodeKind::ArrayTable { .. } => {
                Some(TableProxy::new(self.parser, self.handle))
            }
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<ArrayProxy<'p, 'de>> {
        match self.node() {
            NodeKind::Array { .. } => Some(ArrayProxy::new(self.parser, self.handle)),
            _ => None,
        }
    }

    pub fn as_str_or<'a>(&self, default: &'a str) -> Cow<'a, str>
    where
        'de: 'a,
    {
        self.as_str().unwrap_or(Cow::Borrowed(default))
    }

    pub fn as_int_or(&self, default: i64) -> i64 {
        self.as_int().unwrap_or(default)
    }

    pub fn as_i32_or(&self, default: i32) -> i32 {
        self.as_i32().unwrap_or(default)
    }

    pub fn as_u32_or(&self, default: u32) -> u32 {
        self.as_u32().unwrap_or(default)
    }

    pub fn as_float_or(&self, default: f64) -> f64 {
        self.as_float().unwrap_or(default)
    }

    pub fn as_f32_or(&self, default: f32) -> f32 {
        self.as_f32().unwrap_or(default)
    }

    pub fn as_bool_or(&self, default: bool) -> bool {
        self.as_bool().unwrap_or(default)
    }

    pub fn as_datetime_or(&self, default: Datetime) -> Datetime {
        self.as_datetime().unwrap_or(default)
    }
}

impl fmt::Debug for ValueProxy<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(table) = self.as_table() {
            return table.fmt(f);
        }
        if let Some(array) = self.as_array() {
            return array.fmt(f);
        }
        match self.kind() {
            Kind::String => match self.as_str() {
                Some(text) => fmt::Debug::fmt(&text, f),
                None => f.write_str("<string>"),
            },
            Kind::Integer => fmt::Debug::fmt(&self.as_int().unwrap_or_default(), f),
            Kind::Float => fmt::Debug::fmt(&self.as_float().unwrap_or_default(), f),
            Kind::Boolean => fmt::Debug::fmt(&self.as_bool().unwrap_or_default(), f),
            Kind::Datetime => match self.as_datetime() {
                Some(value) => fmt::Display::fmt(&value, f),
                None => f.write_str("<datetime>"),
            },
            Kind::Array | Kind::Table => Ok(()),
        }
    }
}
