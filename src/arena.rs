//! Growable node store addressed by [`Handle`].
//!
//! Nodes link to each other only through handles, so the backing vector can
//! reallocate freely while the tree is being built.

use crate::Span;
use std::ops::Index;

#[cfg(test)]
#[path = "./arena_tests.rs"]
mod tests;

const INITIAL_CAPACITY: usize = 64;

/// Index of a node inside an [`Arena`].
///
/// Handles are plain indices and stay valid across growth of the arena.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Handle(u32);

impl Handle {
    /// The reserved sentinel; never refers to a node.
    pub const INVALID: Handle = Handle(u32::MAX);
    /// The document root table, allocated before any input is consumed.
    pub const ROOT: Handle = Handle(0);

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// How a table came into existence.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TableState {
    /// Intermediate segment of a header such as `a` in `[a.b]`.
    Implicit,
    /// Created by a dotted key.
    Dotted,
    /// Opened by `[name]`, or an element of `[[name]]`.
    Header,
    /// An inline table, closed once its `}` is read.
    Inline,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ArrayOrigin {
    /// A `[...]` value. Frozen once its closing bracket is read.
    Static,
    /// The sequence collecting `[[name]]` elements.
    Headers,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StringStyle {
    Basic,
    Literal,
    MultilineBasic,
    MultilineLiteral,
}

impl StringStyle {
    /// Whether escape sequences are interpreted.
    #[inline]
    pub fn is_basic(self) -> bool {
        matches!(self, StringStyle::Basic | StringStyle::MultilineBasic)
    }

    #[inline]
    pub fn is_multiline(self) -> bool {
        matches!(
            self,
            StringStyle::MultilineBasic | StringStyle::MultilineLiteral
        )
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum KeyStyle {
    Bare,
    Basic,
    Literal,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FloatClass {
    Finite,
    Infinity,
    Nan,
}

/// The four date-time variants.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DatetimeKind {
    OffsetDateTime,
    LocalDateTime,
    LocalDate,
    LocalTime,
}

/// Value type as seen by readers of the finished tree.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Kind {
    String,
    Integer,
    Float,
    Boolean,
    Datetime,
    Array,
    Table,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Boolean => "boolean",
            Kind::Datetime => "datetime",
            Kind::Array => "array",
            Kind::Table => "table",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Head, tail and length of a singly linked child list.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct List {
    pub size: u32,
    pub head: Handle,
    pub tail: Handle,
}

impl List {
    pub const EMPTY: List = List {
        size: 0,
        head: Handle::INVALID,
        tail: Handle::INVALID,
    };
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum NodeKind {
    /// Children are `KeyValue` nodes in insertion order.
    Table { list: List, state: TableState },
    /// One element of a `[[name]]` sequence; shaped like a table.
    ArrayTable { list: List },
    Array { list: List, origin: ArrayOrigin },
    KeyValue { key: Handle, value: Handle },
    /// One key segment. The span covers the text between any quotes.
    Key { span: Span, style: KeyStyle },
    /// The span covers the content between the delimiters.
    String { span: Span, style: StringStyle },
    Integer { span: Span, value: i64 },
    Float { span: Span, class: FloatClass },
    Boolean { span: Span, value: bool },
    DateTime { span: Span, kind: DatetimeKind },
}

impl NodeKind {
    /// The reader-facing type of a value node. `None` for keys and key-values.
    pub fn value_kind(&self) -> Option<Kind> {
        Some(match self {
            NodeKind::Table { .. } | NodeKind::ArrayTable { .. } => Kind::Table,
            NodeKind::Array { .. } => Kind::Array,
            NodeKind::String { .. } => Kind::String,
            NodeKind::Integer { .. } => Kind::Integer,
            NodeKind::Float { .. } => Kind::Float,
            NodeKind::Boolean { .. } => Kind::Boolean,
            NodeKind::DateTime { .. } => Kind::Datetime,
            NodeKind::KeyValue { .. } | NodeKind::Key { .. } => return None,
        })
    }

    /// The child list of a container node.
    #[inline]
    pub fn list(&self) -> Option<&List> {
        match self {
            NodeKind::Table { list, .. }
            | NodeKind::ArrayTable { list }
            | NodeKind::Array { list, .. } => Some(list),
            _ => None,
        }
    }

    #[inline]
    fn list_mut(&mut self) -> Option<&mut List> {
        match self {
            NodeKind::Table { list, .. }
            | NodeKind::ArrayTable { list }
            | NodeKind::Array { list, .. } => Some(list),
            _ => None,
        }
    }

    /// Source range of a scalar or key node.
    pub fn span(&self) -> Option<Span> {
        match *self {
            NodeKind::Key { span, .. }
            | NodeKind::String { span, .. }
            | NodeKind::Integer { span, .. }
            | NodeKind::Float { span, .. }
            | NodeKind::Boolean { span, .. }
            | NodeKind::DateTime { span, .. } => Some(span),
            _ => None,
        }
    }
}

/// One arena slot.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Node {
    pub kind: NodeKind,
    /// Next sibling in the owning list, or [`Handle::INVALID`].
    pub next: Handle,
}

const _: () = assert!(std::mem::size_of::<Node>() <= 32);

/// Append-only store of [`Node`]s.
///
/// Individual nodes are never freed; [`Arena::clear`] drops everything at
/// once and keeps the allocation for the next parse.
#[derive(Default)]
pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn new() -> Self {
        Arena { nodes: Vec::new() }
    }

    /// Appends a node and returns its handle.
    pub fn allocate(&mut self, kind: NodeKind) -> Handle {
        if self.nodes.len() == self.nodes.capacity() {
            let grow = self.nodes.capacity().max(INITIAL_CAPACITY);
            self.nodes.reserve_exact(grow);
        }
        let handle = Handle(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            next: Handle::INVALID,
        });
        handle
    }

    /// Panics if `handle` does not refer to a live node.
    #[inline]
    pub fn get(&self, handle: Handle) -> &Node {
        &self.nodes[handle.0 as usize]
    }

    /// Panics if `handle` does not refer to a live node.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> &mut Node {
        &mut self.nodes[handle.0 as usize]
    }

    #[inline]
    pub fn try_get(&self, handle: Handle) -> Option<&Node> {
        self.nodes.get(handle.0 as usize)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// All nodes in allocation order.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Links `child` at the tail of the container `owner`.
    pub(crate) fn push_child(&mut self, owner: Handle, child: Handle) {
        let Some(list) = self.get_mut(owner).kind.list_mut() else {
            debug_assert!(false, "push_child on a non-container node");
            return;
        };
        let prev_tail = list.tail;
        if list.size == 0 {
            list.head = child;
        }
        list.tail = child;
        list.size += 1;
        if prev_tail.is_valid() {
            self.get_mut(prev_tail).next = child;
        }
    }

    /// Iterates the handles in the child list of `owner`.
    pub fn children(&self, owner: Handle) -> Children<'_> {
        let head = match self.get(owner).kind.list() {
            Some(list) => list.head,
            None => Handle::INVALID,
        };
        Children {
            arena: self,
            cursor: head,
        }
    }
}

impl Index<Handle> for Arena {
    type Output = Node;

    #[inline]
    fn index(&self, handle: Handle) -> &Node {
        self.get(handle)
    }
}

/// Iterator over a child list, following `next` links.
pub struct Children<'a> {
    arena: &'a Arena,
    cursor: Handle,
}

impl Iterator for Children<'_> {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        if !self.cursor.is_valid() {
            return None;
        }
        let current = self.cursor;
        self.cursor = self.arena.get(current).next;
        Some(current)
    }
}
