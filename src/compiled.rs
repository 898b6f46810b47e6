use crate::{
    bytes::ByteOrder,
    directive::Directive,
    errors::SchemaError,
    record::{FieldDef, SeqMut, ValueMut},
    schema::{Schema, SchemaConfig},
};

/// Compiled descriptor of one field.
#[derive(Debug)]
pub(crate) struct Field {
    pub name: &'static str,
    /// Position in the record's `fields()` list. Excluded fields get no
    /// descriptor, so positions are not contiguous.
    pub index: usize,
    pub order: ByteOrder,
    pub strategy: Strategy,
    /// Total wire length when fixed, `None` for variable-width fields.
    pub wire_len: Option<usize>,
}

impl Field {
    pub fn compile(
        def: &mut FieldDef<'_>,
        index: usize,
        directive: &Directive,
        config: &SchemaConfig,
    ) -> Result<Self, SchemaError> {
        let order = directive.byte_order.unwrap_or(config.byte_order);
        let strategy = classify(def.name, &mut def.value, directive, config)?;
        let wire_len = strategy.wire_len();

        Ok(Field { name: def.name, index, order, strategy, wire_len })
    }
}

/// Bound transcoding strategy of one field, selected once at compile time.
#[derive(Debug)]
pub(crate) enum Strategy {
    Uint { width: usize },
    Int { width: usize },
    /// Single byte, verbatim.
    Byte,
    Bool,
    Float { width: usize },
    /// Fixed-width string: `size` content bytes, zero-padded.
    FixedStr { size: usize },
    /// Variable-width string: content plus one zero terminator byte.
    VarStr,
    Seq { elem: ElemStrategy, count: Count },
    Nested { schema: Schema },
    NestedOpt { schema: Schema },
    Packed { size: usize },
}

impl Strategy {
    /// Fixed wire length, `None` when the length depends on content.
    pub fn wire_len(&self) -> Option<usize> {
        match self {
            Strategy::Uint { width } | Strategy::Int { width } | Strategy::Float { width } => {
                Some(*width)
            }
            Strategy::Byte | Strategy::Bool => Some(1),
            Strategy::FixedStr { size } => Some(*size),
            Strategy::VarStr => None,
            Strategy::Seq { elem, count } => match (elem.wire_len(), count) {
                (Some(w), Count::Fixed(n)) => Some(w * n),
                _ => None,
            },
            Strategy::Nested { schema } | Strategy::NestedOpt { schema } => schema.wire_len(),
            Strategy::Packed { size } => Some(*size),
        }
    }
}

/// Per-element strategy of a sequence field.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ElemStrategy {
    Byte,
    Uint { width: usize },
    Int { width: usize },
    Bool,
    Float { width: usize },
    FixedStr { size: usize },
    VarStr,
}

impl ElemStrategy {
    pub fn wire_len(&self) -> Option<usize> {
        match self {
            ElemStrategy::Byte | ElemStrategy::Bool => Some(1),
            ElemStrategy::Uint { width }
            | ElemStrategy::Int { width }
            | ElemStrategy::Float { width } => Some(*width),
            ElemStrategy::FixedStr { size } => Some(*size),
            ElemStrategy::VarStr => None,
        }
    }
}

/// Effective repeat count of a sequence field.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Count {
    Fixed(usize),
    /// Resolved from the live sequence length at each transcode pass.
    Runtime,
}

fn classify(
    name: &'static str,
    value: &mut ValueMut<'_>,
    directive: &Directive,
    config: &SchemaConfig,
) -> Result<Strategy, SchemaError> {
    let strategy = match value {
        ValueMut::Str(_) => match directive.size {
            Some(size) => Strategy::FixedStr { size },
            None => Strategy::VarStr,
        },
        ValueMut::I8(_) => Strategy::Int { width: int_width(name, directive, 1)? },
        ValueMut::I16(_) => Strategy::Int { width: int_width(name, directive, 2)? },
        ValueMut::I32(_) => Strategy::Int { width: int_width(name, directive, 4)? },
        ValueMut::I64(_) => Strategy::Int { width: int_width(name, directive, 8)? },
        ValueMut::U8(_) => Strategy::Byte,
        ValueMut::U16(_) => Strategy::Uint { width: int_width(name, directive, 2)? },
        ValueMut::U32(_) => Strategy::Uint { width: int_width(name, directive, 4)? },
        ValueMut::U64(_) => Strategy::Uint { width: int_width(name, directive, 8)? },
        ValueMut::Bool(_) => Strategy::Bool,
        ValueMut::F32(_) => Strategy::Float { width: 4 },
        ValueMut::F64(_) => Strategy::Float { width: 8 },
        ValueMut::Seq(seq) => classify_seq(name, seq, directive)?,
        ValueMut::Nested(record) => {
            Strategy::Nested { schema: Schema::compile(&mut **record, config)? }
        }
        ValueMut::NestedOpt(slot) => {
            let schema = match slot.get() {
                Some(record) => Schema::compile(record, config)?,
                None => {
                    let mut fresh = slot.fresh();
                    Schema::compile(fresh.as_mut(), config)?
                }
            };
            Strategy::NestedOpt { schema }
        }
        ValueMut::Packed(value) => Strategy::Packed { size: value.wire_size() },
        ValueMut::Opaque => return Err(SchemaError::UnclassifiableKind { field: name }),
    };

    Ok(strategy)
}

fn classify_seq(
    name: &'static str,
    seq: &SeqMut<'_>,
    directive: &Directive,
) -> Result<Strategy, SchemaError> {
    let elem = match seq {
        SeqMut::Bytes(_) => ElemStrategy::Byte,
        SeqMut::I8(_) => ElemStrategy::Int { width: int_width(name, directive, 1)? },
        SeqMut::I16(_) => ElemStrategy::Int { width: int_width(name, directive, 2)? },
        SeqMut::I32(_) => ElemStrategy::Int { width: int_width(name, directive, 4)? },
        SeqMut::I64(_) => ElemStrategy::Int { width: int_width(name, directive, 8)? },
        SeqMut::U16(_) => ElemStrategy::Uint { width: int_width(name, directive, 2)? },
        SeqMut::U32(_) => ElemStrategy::Uint { width: int_width(name, directive, 4)? },
        SeqMut::U64(_) => ElemStrategy::Uint { width: int_width(name, directive, 8)? },
        SeqMut::Bool(_) => ElemStrategy::Bool,
        SeqMut::F32(_) => ElemStrategy::Float { width: 4 },
        SeqMut::F64(_) => ElemStrategy::Float { width: 8 },
        SeqMut::Str(_) => match directive.size {
            Some(size) => ElemStrategy::FixedStr { size },
            None => ElemStrategy::VarStr,
        },
    };

    let count = match directive.num {
        Some(n) => Count::Fixed(n),
        None => match seq.fixed_len() {
            Some(n) => Count::Fixed(n),
            None => Count::Runtime,
        },
    };

    Ok(Strategy::Seq { elem, count })
}

fn int_width(
    name: &'static str,
    directive: &Directive,
    native: usize,
) -> Result<usize, SchemaError> {
    match directive.size {
        Some(width) if (1..=8).contains(&width) => Ok(width),
        Some(width) => Err(SchemaError::UnsupportedWidth { field: name, width }),
        None => Ok(native),
    }
}
