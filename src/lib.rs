//! A zero-copy TOML parser that builds its document tree in a flat arena of
//! handle-linked nodes.
//!
//! Scalars are not copied out of the input: string nodes record the span of
//! their content and are decoded only when read, and floats keep their source
//! text until asked for. Tables and arrays are singly linked child lists inside
//! one growable [`Arena`], so building a document costs one vector and no
//! per-node allocation. A [`Parser`] can be reused; each parse keeps the
//! arena's capacity.
//!
//! # Examples
//!
//! ```
//! use toml_handles::{Kind, Parser};
//!
//! let content = r#"
//! dev-mode = true
//!
//! [[things]]
//! name = "hammer"
//! value = 43
//!
//! [[things]]
//! name = "drill"
//! value = 300
//! color = "green"
//! "#;
//!
//! let mut parser = Parser::new();
//! let root = parser.try_parse(content.as_bytes())?;
//!
//! assert!(root.get_bool_or("dev-mode", false));
//!
//! let things = root.array("things").unwrap();
//! assert_eq!(things.size(), 2);
//! let drill = things.get(1).unwrap().as_table().unwrap();
//! assert_eq!(drill.get_str("name").as_deref(), Some("drill"));
//! assert_eq!(drill.get_int("value"), Some(300));
//! assert_eq!(drill.get("color").map(|v| v.kind()), Some(Kind::String));
//! # Ok::<(), toml_handles::Error>(())
//! ```

mod arena;
mod classify;
mod datetime;
mod error;
mod number;
mod options;
mod parser;
mod proxy;
mod resolve;
mod span;
mod string;

pub use arena::{
    Arena, ArrayOrigin, Children, DatetimeKind, FloatClass, Handle, Kind, KeyStyle, List, Node,
    NodeKind, StringStyle, TableState,
};
pub use datetime::{Date, Datetime, Time, TimeOffset};
pub use error::{Error, ErrorKind};
pub use number::decode_float;
pub use options::{DEFAULT_MAX_DEPTH, ParseOptions};
pub use parser::Parser;
pub use proxy::{ArrayIter, ArrayProxy, TableIter, TableProxy, ValueProxy};
pub use span::Span;

#[cfg(feature = "serde")]
pub mod impl_serde;

/// Parses `input` with default options, handing the root to `f`.
///
/// Convenience for one-off reads where keeping a [`Parser`] around is not
/// worth it.
pub fn parse_with<R>(
    input: &str,
    f: impl FnOnce(TableProxy<'_, '_>) -> R,
) -> Result<R, Error> {
    let mut parser = Parser::new();
    let root = parser.try_parse(input.as_bytes())?;
    Ok(f(root))
}
