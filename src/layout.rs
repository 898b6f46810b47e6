//! Description of a compiled wire layout.
//!
//! [`Schema::layout`] renders the compiled field descriptors into plain
//! data, for documenting or debugging the wire contract of a record type.
//! With the `serde` feature the description types serialize.

use crate::{
    bytes::ByteOrder,
    compiled::{Count, ElemStrategy, Field, Strategy},
    schema::Schema,
};

/// One field of a compiled layout, in wire order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldLayout {
    pub name: &'static str,
    /// Compact kind notation: `"u:2"`, `"i:4"`, `"str[8]"`, `"str"`,
    /// `"[u:2; 4]"`, `"record"`, `"packed[6]"`.
    pub kind: String,
    pub byte_order: ByteOrder,
    /// Fixed wire length, when the field has one.
    pub wire_len: Option<usize>,
    /// Sub-layout of nested record fields.
    pub fields: Vec<FieldLayout>,
}

impl Schema {
    /// The compiled wire layout, field by field.
    pub fn layout(&self) -> Vec<FieldLayout> {
        self.fields.iter().map(FieldLayout::from_field).collect()
    }
}

impl FieldLayout {
    fn from_field(field: &Field) -> Self {
        let fields = match &field.strategy {
            Strategy::Nested { schema } | Strategy::NestedOpt { schema } => schema.layout(),
            _ => Vec::new(),
        };

        FieldLayout {
            name: field.name,
            kind: kind_name(&field.strategy),
            byte_order: field.order,
            wire_len: field.wire_len,
            fields,
        }
    }
}

fn kind_name(strategy: &Strategy) -> String {
    match strategy {
        Strategy::Uint { width } => format!("u:{width}"),
        Strategy::Int { width } => format!("i:{width}"),
        Strategy::Byte => "byte".to_string(),
        Strategy::Bool => "bool".to_string(),
        Strategy::Float { width } => format!("f:{width}"),
        Strategy::FixedStr { size } => format!("str[{size}]"),
        Strategy::VarStr => "str".to_string(),
        Strategy::Seq { elem, count } => {
            format!("[{}; {}]", elem_name(elem), count_name(count))
        }
        Strategy::Nested { .. } => "record".to_string(),
        Strategy::NestedOpt { .. } => "record?".to_string(),
        Strategy::Packed { size } => format!("packed[{size}]"),
    }
}

fn elem_name(elem: &ElemStrategy) -> String {
    match elem {
        ElemStrategy::Byte => "byte".to_string(),
        ElemStrategy::Uint { width } => format!("u:{width}"),
        ElemStrategy::Int { width } => format!("i:{width}"),
        ElemStrategy::Bool => "bool".to_string(),
        ElemStrategy::Float { width } => format!("f:{width}"),
        ElemStrategy::FixedStr { size } => format!("str[{size}]"),
        ElemStrategy::VarStr => "str".to_string(),
    }
}

fn count_name(count: &Count) -> String {
    match count {
        Count::Fixed(n) => n.to_string(),
        Count::Runtime => "_".to_string(),
    }
}
