//! The ordered, bounds-checked encode and decode passes.
//!
//! Both passes walk the schema's field descriptors in order, keeping one
//! cursor into the buffer. Before a field is written its exact wire length
//! is computed and checked against the remaining capacity, so the
//! offending field of a failed encode is never partially written; before a
//! field is read its required input is checked the same way. Nested
//! records recurse with no marker bytes — sub-fields land contiguously.

use crate::{
    bytes::{self, ByteOrder},
    compiled::{Count, ElemStrategy, Strategy},
    errors::{DecodeError, EncodeError, SchemaError},
    record::{Record, SeqMut, ValueMut},
    schema::{Schema, SchemaConfig},
};

/// Compiles `record` with the default configuration and binds the schema
/// to it.
pub fn compile(record: &mut dyn Record) -> Result<Transcoder<'_>, SchemaError> {
    compile_with(record, SchemaConfig::default())
}

/// Compiles `record` with an explicit configuration.
pub fn compile_with(
    record: &mut dyn Record,
    config: SchemaConfig,
) -> Result<Transcoder<'_>, SchemaError> {
    let schema = Schema::compile(&mut *record, &config)?;
    Ok(Transcoder { record, schema })
}

/// A schema bound to one record instance.
///
/// The transcoder borrows its record mutably for its whole lifetime, so
/// concurrent transcoding of one record is rejected by the borrow checker;
/// two transcoders over two records need no coordination.
pub struct Transcoder<'r> {
    record: &'r mut dyn Record,
    schema: Schema,
}

impl Transcoder<'_> {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Encodes the bound record into `dst`, returning the bytes written.
    pub fn encode(&mut self, dst: &mut [u8]) -> Result<usize, EncodeError> {
        encode_record(&self.schema, &mut *self.record, dst)
    }

    /// Decodes `src` into the bound record, returning the bytes consumed.
    pub fn decode(&mut self, src: &[u8]) -> Result<usize, DecodeError> {
        decode_record(&self.schema, &mut *self.record, src)
    }
}

fn encode_record(
    schema: &Schema,
    record: &mut dyn Record,
    dst: &mut [u8],
) -> Result<usize, EncodeError> {
    let mut defs = record.fields();
    let mut n = 0;

    for field in &schema.fields {
        let def = &mut defs[field.index];
        match &field.strategy {
            Strategy::Nested { schema } => {
                let ValueMut::Nested(sub) = &mut def.value else { shape_mismatch(field.name) };
                n += encode_record(schema, &mut **sub, &mut dst[n..])
                    .map_err(|e| e.advanced_by(n))?;
            }
            Strategy::NestedOpt { schema } => {
                let ValueMut::NestedOpt(slot) = &mut def.value else { shape_mismatch(field.name) };
                let written = match slot.get() {
                    Some(sub) => encode_record(schema, sub, &mut dst[n..]),
                    None => {
                        let mut fresh = slot.fresh();
                        encode_record(schema, fresh.as_mut(), &mut dst[n..])
                    }
                };
                n += written.map_err(|e| e.advanced_by(n))?;
            }
            strategy => {
                let len = encode_len(strategy, &def.value, field.name);
                if n + len > dst.len() {
                    return Err(EncodeError::BufferTooSmall { field: field.name, written: n });
                }
                write_field(strategy, field.order, &mut def.value, &mut dst[n..n + len], field.name);
                n += len;
            }
        }
    }

    Ok(n)
}

fn decode_record(
    schema: &Schema,
    record: &mut dyn Record,
    src: &[u8],
) -> Result<usize, DecodeError> {
    let mut defs = record.fields();
    let mut n = 0;

    for field in &schema.fields {
        let def = &mut defs[field.index];
        match &field.strategy {
            Strategy::Nested { schema } => {
                let ValueMut::Nested(sub) = &mut def.value else { shape_mismatch(field.name) };
                n += decode_record(schema, &mut **sub, &src[n..]).map_err(|e| e.advanced_by(n))?;
            }
            Strategy::NestedOpt { schema } => {
                let ValueMut::NestedOpt(slot) = &mut def.value else { shape_mismatch(field.name) };
                let sub = slot.materialize();
                n += decode_record(schema, sub, &src[n..]).map_err(|e| e.advanced_by(n))?;
            }
            strategy => {
                let consumed = decode_field(strategy, field.order, &mut def.value, &src[n..], field.name)
                    .ok_or(DecodeError::UnexpectedEnd { field: field.name, consumed: n })?;
                n += consumed;
            }
        }
    }

    Ok(n)
}

/// Exact number of bytes the field will occupy on this encode pass.
fn encode_len(strategy: &Strategy, value: &ValueMut<'_>, name: &'static str) -> usize {
    if let Some(len) = strategy.wire_len() {
        return len;
    }

    match strategy {
        Strategy::VarStr => {
            let ValueMut::Str(s) = value else { shape_mismatch(name) };
            s.len() + 1
        }
        Strategy::Seq { elem, count } => {
            let ValueMut::Seq(seq) = value else { shape_mismatch(name) };
            let count = resolve_count(*count, seq);
            match elem.wire_len() {
                Some(w) => w * count,
                // variable-width string elements; missing ones encode empty
                None => (0..count).map(|i| seq.str_at(i).map_or(0, str::len) + 1).sum(),
            }
        }
        _ => unreachable!("strategies without a fixed wire length are handled above"),
    }
}

/// Writes one leaf field into `dst`, which is exactly its encode length.
fn write_field(
    strategy: &Strategy,
    order: ByteOrder,
    value: &mut ValueMut<'_>,
    dst: &mut [u8],
    name: &'static str,
) {
    match strategy {
        Strategy::Uint { .. }
        | Strategy::Int { .. }
        | Strategy::Float { .. }
        | Strategy::Byte
        | Strategy::Bool => {
            let Some(bits) = value.scalar_bits() else { shape_mismatch(name) };
            bytes::put_uint(dst, bits, order);
        }
        Strategy::FixedStr { size } => {
            let ValueMut::Str(s) = value else { shape_mismatch(name) };
            put_fixed_str(dst, s, *size);
        }
        Strategy::VarStr => {
            let ValueMut::Str(s) = value else { shape_mismatch(name) };
            put_var_str(dst, s);
        }
        Strategy::Seq { elem, count } => {
            let ValueMut::Seq(seq) = value else { shape_mismatch(name) };
            write_seq(*elem, *count, order, seq, dst);
        }
        Strategy::Packed { .. } => {
            let ValueMut::Packed(packed) = value else { shape_mismatch(name) };
            packed.pack(dst);
        }
        Strategy::Nested { .. } | Strategy::NestedOpt { .. } => {
            unreachable!("nested fields are encoded by the record walk")
        }
    }
}

fn write_seq(
    elem: ElemStrategy,
    count: Count,
    order: ByteOrder,
    seq: &mut SeqMut<'_>,
    dst: &mut [u8],
) {
    let count = resolve_count(count, seq);
    let mut n = 0;

    match elem {
        ElemStrategy::FixedStr { size } => {
            for i in 0..count {
                put_fixed_str(&mut dst[n..n + size], seq.str_at(i).unwrap_or(""), size);
                n += size;
            }
        }
        ElemStrategy::VarStr => {
            for i in 0..count {
                let s = seq.str_at(i).unwrap_or("");
                put_var_str(&mut dst[n..n + s.len() + 1], s);
                n += s.len() + 1;
            }
        }
        ElemStrategy::Byte | ElemStrategy::Bool => write_seq_scalars(seq, count, 1, order, dst),
        ElemStrategy::Uint { width } | ElemStrategy::Int { width } | ElemStrategy::Float { width } => {
            write_seq_scalars(seq, count, width, order, dst)
        }
    }
}

fn write_seq_scalars(seq: &SeqMut<'_>, count: usize, width: usize, order: ByteOrder, dst: &mut [u8]) {
    let mut n = 0;
    for i in 0..count {
        // elements past the in-memory length zero-fill the wire
        let bits = seq.elem_bits(i).unwrap_or(0);
        bytes::put_uint(&mut dst[n..n + width], bits, order);
        n += width;
    }
}

fn put_fixed_str(dst: &mut [u8], s: &str, size: usize) {
    let content = s.as_bytes();
    let n = content.len().min(size);
    dst[..n].copy_from_slice(&content[..n]);
    dst[n..].fill(0);
}

fn put_var_str(dst: &mut [u8], s: &str) {
    dst[..s.len()].copy_from_slice(s.as_bytes());
    dst[s.len()] = 0x00;
}

/// Decodes one leaf field from the head of `src`. `None` means the input
/// ran out before the field was complete.
fn decode_field(
    strategy: &Strategy,
    order: ByteOrder,
    value: &mut ValueMut<'_>,
    src: &[u8],
    name: &'static str,
) -> Option<usize> {
    match strategy {
        Strategy::Uint { width } | Strategy::Float { width } => {
            let chunk = src.get(..*width)?;
            store_scalar(value, bytes::get_uint(chunk, order), name);
            Some(*width)
        }
        Strategy::Int { width } => {
            let chunk = src.get(..*width)?;
            store_scalar(value, bytes::get_int(chunk, order) as u64, name);
            Some(*width)
        }
        Strategy::Byte | Strategy::Bool => {
            let chunk = src.get(..1)?;
            store_scalar(value, chunk[0] as u64, name);
            Some(1)
        }
        Strategy::FixedStr { size } => {
            let chunk = src.get(..*size)?;
            let ValueMut::Str(s) = value else { shape_mismatch(name) };
            **s = str_from_padded(chunk);
            Some(*size)
        }
        Strategy::VarStr => {
            let pos = src.iter().position(|b| *b == 0)?;
            let ValueMut::Str(s) = value else { shape_mismatch(name) };
            **s = lossy_string(&src[..pos]);
            Some(pos + 1)
        }
        Strategy::Seq { elem, count } => {
            let ValueMut::Seq(seq) = value else { shape_mismatch(name) };
            decode_seq(*elem, *count, order, seq, src)
        }
        Strategy::Packed { size } => {
            let chunk = src.get(..*size)?;
            let ValueMut::Packed(packed) = value else { shape_mismatch(name) };
            packed.unpack(chunk);
            Some(*size)
        }
        Strategy::Nested { .. } | Strategy::NestedOpt { .. } => {
            unreachable!("nested fields are decoded by the record walk")
        }
    }
}

fn decode_seq(
    elem: ElemStrategy,
    count: Count,
    order: ByteOrder,
    seq: &mut SeqMut<'_>,
    src: &[u8],
) -> Option<usize> {
    let count = resolve_count(count, seq);
    // growable targets take exactly `count` elements; fixed targets keep
    // their capacity, extra wire elements are consumed and discarded
    seq.resize(count);
    let mut n = 0;

    match elem {
        ElemStrategy::FixedStr { size } => {
            for i in 0..count {
                let chunk = src.get(n..n + size)?;
                seq.set_str(i, str_from_padded(chunk));
                n += size;
            }
        }
        ElemStrategy::VarStr => {
            for i in 0..count {
                let rest = &src[n..];
                let pos = rest.iter().position(|b| *b == 0)?;
                seq.set_str(i, lossy_string(&rest[..pos]));
                n += pos + 1;
            }
        }
        ElemStrategy::Byte | ElemStrategy::Bool => {
            for i in 0..count {
                let chunk = src.get(n..n + 1)?;
                seq.set_elem_bits(i, chunk[0] as u64);
                n += 1;
            }
        }
        ElemStrategy::Uint { width } | ElemStrategy::Float { width } => {
            for i in 0..count {
                let chunk = src.get(n..n + width)?;
                seq.set_elem_bits(i, bytes::get_uint(chunk, order));
                n += width;
            }
        }
        ElemStrategy::Int { width } => {
            for i in 0..count {
                let chunk = src.get(n..n + width)?;
                seq.set_elem_bits(i, bytes::get_int(chunk, order) as u64);
                n += width;
            }
        }
    }

    // fixed-capacity positions past the declared count revert to defaults
    seq.clear_from(count);
    Some(n)
}

fn store_scalar(value: &mut ValueMut<'_>, bits: u64, name: &'static str) {
    if !value.set_scalar_bits(bits) {
        shape_mismatch(name);
    }
}

fn resolve_count(count: Count, seq: &SeqMut<'_>) -> usize {
    match count {
        Count::Fixed(n) => n,
        Count::Runtime => seq.len(),
    }
}

fn str_from_padded(chunk: &[u8]) -> String {
    let content = match chunk.iter().position(|b| *b == 0) {
        Some(pos) => &chunk[..pos],
        None => chunk,
    };
    lossy_string(content)
}

fn lossy_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[track_caller]
fn shape_mismatch(field: &str) -> ! {
    panic!("record field `{field}` changed shape between compilation and transcoding");
}
