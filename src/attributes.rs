//! Typed per-vertex attribute columns with a fixed schema.

use crate::error::{DtError, DtResult};
use log::warn;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    FixedString(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    I64,
    U64,
    F32,
    F64,
    Bool,
    FixedString(usize),
}

#[derive(Debug, Clone, Default)]
pub struct AttributeSchema {
    fields: Vec<(String, FieldType)>,
}

impl AttributeSchema {
    pub fn new() -> Self {
        AttributeSchema { fields: Vec::new() }
    }

    pub fn add_field(&mut self, name: impl Into<String>, ty: FieldType) {
        self.fields.push((name.into(), ty));
    }

    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, t)| *t)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }
}

#[derive(Debug, Default)]
pub(crate) struct AttributeStore {
    pub schema: AttributeSchema,
    rows: HashMap<usize, HashMap<String, AttributeValue>>,
}

impl AttributeStore {
    pub fn new() -> Self {
        AttributeStore::default()
    }

    /// Writes one field of one vertex's attribute row. Unknown field names
    /// are silently ignored (matching the schema's "unknown writes vanish"
    /// policy); values are coerced best-effort to the declared type.
    pub fn set(&mut self, vertex: usize, field: &str, value: AttributeValue) {
        let ty = match self.schema.field_type(field) {
            Some(t) => t,
            None => {
                warn!("ignoring write to unknown attribute field '{}'", field);
                return;
            }
        };
        let coerced = coerce(&value, ty);
        self.rows.entry(vertex).or_default().insert(field.to_string(), coerced);
    }

    pub fn get(&self, vertex: usize, field: &str) -> Option<&AttributeValue> {
        self.rows.get(&vertex).and_then(|row| row.get(field))
    }

    pub fn row(&self, vertex: usize) -> Option<&HashMap<String, AttributeValue>> {
        self.rows.get(&vertex)
    }

    pub fn remove_vertex(&mut self, vertex: usize) {
        self.rows.remove(&vertex);
    }

    pub fn validate_field(&self, field: &str) -> DtResult<FieldType> {
        self.schema
            .field_type(field)
            .ok_or_else(|| DtError::InvalidInput(format!("unknown attribute field '{}'", field)))
    }
}

/// The type default standing in for a schema field never written on a given
/// vertex: zero for numeric types, `false`, or an empty string.
pub(crate) fn default_value(ty: FieldType) -> AttributeValue {
    match ty {
        FieldType::I64 => AttributeValue::I64(0),
        FieldType::U64 => AttributeValue::U64(0),
        FieldType::F32 => AttributeValue::F32(0.0),
        FieldType::F64 => AttributeValue::F64(0.0),
        FieldType::Bool => AttributeValue::Bool(false),
        FieldType::FixedString(_) => AttributeValue::FixedString(String::new()),
    }
}

fn coerce(value: &AttributeValue, ty: FieldType) -> AttributeValue {
    use AttributeValue::*;
    match (value, ty) {
        (I64(v), FieldType::I64) => I64(*v),
        (I64(v), FieldType::F64) => F64(*v as f64),
        (I64(v), FieldType::F32) => F32(*v as f32),
        (I64(v), FieldType::U64) => U64((*v).max(0) as u64),
        (U64(v), FieldType::U64) => U64(*v),
        (U64(v), FieldType::I64) => I64(*v as i64),
        (U64(v), FieldType::F64) => F64(*v as f64),
        (U64(v), FieldType::F32) => F32(*v as f32),
        (F64(v), FieldType::F64) => F64(*v),
        (F64(v), FieldType::F32) => F32(*v as f32),
        (F32(v), FieldType::F32) => F32(*v),
        (F32(v), FieldType::F64) => F64(*v as f64),
        (Bool(v), FieldType::Bool) => Bool(*v),
        (FixedString(s), FieldType::FixedString(n)) => FixedString(s.chars().take(*n).collect()),
        _ => {
            warn!("attribute value type mismatch, storing as-is");
            value.clone()
        }
    }
}
