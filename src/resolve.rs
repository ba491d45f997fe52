//! Key lookup and table resolution while a document is being built.
//!
//! Every rule about which tables a key or header may open or extend lives
//! here. A table's state records how it came to exist:
//!
//! - dotted keys only descend into `Implicit` or `Dotted` tables;
//! - header segments before the last descend into any non-inline table, or
//!   into the latest element of a `[[name]]` sequence;
//! - `[name]` may promote an `Implicit` table but never reopen anything else;
//! - `[[name]]` only ever appends to a sequence that headers created.

use crate::arena::{ArrayOrigin, Handle, KeyStyle, List, NodeKind, StringStyle, TableState};
use crate::parser::{Failed, Parser};
use crate::{ErrorKind, string};
use std::borrow::Cow;
use std::hash::BuildHasher;

#[cfg(test)]
#[path = "./resolve_tests.rs"]
mod tests;

/// Tables with at least this many entries are looked up through the key
/// index instead of a linear scan.
pub(crate) const INDEXED_TABLE_THRESHOLD: usize = 6;

impl<'de> Parser<'de> {
    /// The decoded name of a `Key` node.
    pub(crate) fn key_bytes(&self, key: Handle) -> Cow<'de, [u8]> {
        let input: &'de [u8] = self.input;
        match self.arena.get(key).kind {
            NodeKind::Key { span, style } => {
                let raw = span.slice(input).unwrap_or_default();
                match style {
                    KeyStyle::Basic => string::unescape(raw, StringStyle::Basic),
                    KeyStyle::Bare | KeyStyle::Literal => Cow::Borrowed(raw),
                }
            }
            _ => Cow::Borrowed(&[]),
        }
    }

    /// The decoded name of a `KeyValue` entry as text.
    pub(crate) fn entry_name(&self, entry: Handle) -> Option<Cow<'de, str>> {
        match self.arena.get(entry).kind {
            NodeKind::KeyValue { key, .. } => string::to_text(self.key_bytes(key)),
            _ => None,
        }
    }

    pub(crate) fn entry_value(&self, entry: Handle) -> Handle {
        match self.arena.get(entry).kind {
            NodeKind::KeyValue { value, .. } => value,
            _ => Handle::INVALID,
        }
    }

    pub(crate) fn entry_key_matches(&self, entry: Handle, name: &[u8]) -> bool {
        match self.arena.get(entry).kind {
            NodeKind::KeyValue { key, .. } => *self.key_bytes(key) == *name,
            _ => false,
        }
    }

    fn hash_name(&self, name: &[u8]) -> u64 {
        self.hasher.hash_one(name)
    }

    /// Finds the entry of `table` whose decoded key equals `name`.
    pub(crate) fn find_entry(&self, table: Handle, name: &[u8]) -> Option<Handle> {
        let size = self.arena.get(table).kind.list().map_or(0, |list| list.size);
        if size as usize >= INDEXED_TABLE_THRESHOLD {
            // Every entry is indexed, so a missing hash means a missing key.
            let entry = *self.key_index.get(&(table, self.hash_name(name)))?;
            if self.entry_key_matches(entry, name) {
                return Some(entry);
            }
            // Hash collision: only the first entry per hash is indexed.
        }
        self.arena
            .children(table)
            .find(|&entry| self.entry_key_matches(entry, name))
    }

    /// Links `key = value` into `table` without any duplicate check.
    fn attach(&mut self, table: Handle, key: Handle, value: Handle, name: &[u8]) -> Handle {
        let entry = self.arena.allocate(NodeKind::KeyValue { key, value });
        self.arena.push_child(table, entry);

        let size = self.arena.get(table).kind.list().map_or(0, |list| list.size) as usize;
        if size == INDEXED_TABLE_THRESHOLD {
            let hashed: Vec<(u64, Handle)> = self
                .arena
                .children(table)
                .map(|entry| {
                    let name = match self.arena.get(entry).kind {
                        NodeKind::KeyValue { key, .. } => self.key_bytes(key),
                        _ => Cow::Borrowed(&[][..]),
                    };
                    (self.hash_name(&name), entry)
                })
                .collect();
            for (hash, entry) in hashed {
                self.key_index.entry((table, hash)).or_insert(entry);
            }
        } else if size > INDEXED_TABLE_THRESHOLD {
            let hash = self.hash_name(name);
            self.key_index.entry((table, hash)).or_insert(entry);
        }
        entry
    }

    /// Inserts a finished value under its last key segment.
    pub(crate) fn insert_value(
        &mut self,
        table: Handle,
        key: Handle,
        value: Handle,
    ) -> Result<(), Failed> {
        let name = self.key_bytes(key);
        if self.find_entry(table, &name).is_some() {
            return Err(self.fail(ErrorKind::Semantic));
        }
        self.attach(table, key, value, &name);
        Ok(())
    }

    /// Resolves a non-final segment of a dotted key.
    pub(crate) fn navigate_dotted(&mut self, table: Handle, key: Handle) -> Result<Handle, Failed> {
        let name = self.key_bytes(key);
        match self.find_entry(table, &name) {
            Some(entry) => {
                let value = self.entry_value(entry);
                match self.arena.get(value).kind {
                    NodeKind::Table {
                        state: TableState::Implicit | TableState::Dotted,
                        ..
                    } => Ok(value),
                    _ => Err(self.fail(ErrorKind::Semantic)),
                }
            }
            None => {
                let child = self.arena.allocate(NodeKind::Table {
                    list: List::EMPTY,
                    state: TableState::Dotted,
                });
                self.attach(table, key, child, &name);
                Ok(child)
            }
        }
    }

    /// Resolves a non-final segment of a table header.
    pub(crate) fn navigate_header_intermediate(
        &mut self,
        table: Handle,
        key: Handle,
    ) -> Result<Handle, Failed> {
        let name = self.key_bytes(key);
        match self.find_entry(table, &name) {
            Some(entry) => {
                let value = self.entry_value(entry);
                match self.arena.get(value).kind {
                    NodeKind::Table {
                        state: TableState::Inline,
                        ..
                    } => Err(self.fail(ErrorKind::Semantic)),
                    NodeKind::Table { .. } => Ok(value),
                    NodeKind::Array {
                        list,
                        origin: ArrayOrigin::Headers,
                    } => Ok(list.tail),
                    _ => Err(self.fail(ErrorKind::Semantic)),
                }
            }
            None => {
                let child = self.arena.allocate(NodeKind::Table {
                    list: List::EMPTY,
                    state: TableState::Implicit,
                });
                self.attach(table, key, child, &name);
                Ok(child)
            }
        }
    }

    /// Resolves the last segment of `[a.b.c]`.
    pub(crate) fn navigate_header_table_final(
        &mut self,
        table: Handle,
        key: Handle,
    ) -> Result<Handle, Failed> {
        let name = self.key_bytes(key);
        match self.find_entry(table, &name) {
            Some(entry) => {
                let value = self.entry_value(entry);
                if let NodeKind::Table { state, .. } = &mut self.arena.get_mut(value).kind
                    && *state == TableState::Implicit
                {
                    *state = TableState::Header;
                    return Ok(value);
                }
                Err(self.fail(ErrorKind::Semantic))
            }
            None => {
                let child = self.arena.allocate(NodeKind::Table {
                    list: List::EMPTY,
                    state: TableState::Header,
                });
                self.attach(table, key, child, &name);
                Ok(child)
            }
        }
    }

    /// Resolves the last segment of `[[a.b.c]]`, appending a new element.
    pub(crate) fn navigate_header_array_final(
        &mut self,
        table: Handle,
        key: Handle,
    ) -> Result<Handle, Failed> {
        let name = self.key_bytes(key);
        let array = match self.find_entry(table, &name) {
            Some(entry) => {
                let value = self.entry_value(entry);
                match self.arena.get(value).kind {
                    NodeKind::Array {
                        origin: ArrayOrigin::Headers,
                        ..
                    } => value,
                    _ => return Err(self.fail(ErrorKind::Semantic)),
                }
            }
            None => {
                let array = self.arena.allocate(NodeKind::Array {
                    list: List::EMPTY,
                    origin: ArrayOrigin::Headers,
                });
                self.attach(table, key, array, &name);
                array
            }
        };
        let element = self
            .arena
            .allocate(NodeKind::ArrayTable { list: List::EMPTY });
        self.arena.push_child(array, element);
        Ok(element)
    }

    /// Fails if the elements of `array` are not all of one value kind.
    pub(crate) fn check_homogeneous(&mut self, array: Handle) -> Result<(), Failed> {
        let mut kinds = self
            .arena
            .children(array)
            .filter_map(|element| self.arena.get(element).kind.value_kind());
        let mixed = match kinds.next() {
            Some(first) => kinds.any(|kind| kind != first),
            None => false,
        };
        if mixed {
            return Err(self.fail(ErrorKind::Semantic));
        }
        Ok(())
    }
}
