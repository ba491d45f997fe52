#![cfg_attr(docsrs, doc(cfg(feature = "serde")))]

//! Provides [`serde::Serialize`] for the read proxies.
//!
//! Tables serialize as maps in insertion order, arrays as sequences, and
//! date-times as their RFC 3339 text.

use crate::arena::Kind;
use crate::{ArrayProxy, TableProxy, ValueProxy};
use serde::ser::{SerializeMap, SerializeSeq};

impl serde::Serialize for ValueProxy<'_, '_> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if let Some(table) = self.as_table() {
            return table.serialize(ser);
        }
        if let Some(array) = self.as_array() {
            return array.serialize(ser);
        }
        match self.kind() {
            Kind::Integer => ser.serialize_i64(self.as_int().unwrap_or_default()),
            Kind::Float => ser.serialize_f64(self.as_float().unwrap_or_default()),
            Kind::Boolean => ser.serialize_bool(self.as_bool().unwrap_or_default()),
            Kind::Datetime => match self.as_datetime() {
                Some(value) => ser.collect_str(&value),
                None => ser.serialize_unit(),
            },
            Kind::String | Kind::Array | Kind::Table => ser.serialize_str(&self.as_str_or("")),
        }
    }
}

impl serde::Serialize for TableProxy<'_, '_> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = ser.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(&*key, &value)?;
        }
        map.end()
    }
}

impl serde::Serialize for ArrayProxy<'_, '_> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = ser.serialize_seq(Some(self.len()))?;
        for element in self.iter() {
            seq.serialize_element(&element)?;
        }
        seq.end()
    }
}
