//! Schema: the compiled, ordered field descriptors of one record type.

use crate::{compiled::Field, directive::Directive, errors::SchemaError, record::Record};

/// Compile-time configuration.
///
/// The byte order applies to every field of the record tree that carries
/// no `bo` directive. There is no process-wide default; the configuration
/// is captured into the schema at compilation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaConfig {
    pub byte_order: crate::bytes::ByteOrder,
}

/// A compiled schema: field descriptors in declaration order, which is
/// wire order, plus the total wire length when every field is fixed-width.
/// Immutable once built; discarded with its [crate::Transcoder].
#[derive(Debug)]
pub struct Schema {
    pub(crate) fields: Vec<Field>,
    wire_len: Option<usize>,
}

impl Schema {
    /// Compiles the record's fields into a schema. Excluded fields get no
    /// descriptor; a field that cannot be classified fails compilation.
    pub fn compile(record: &mut dyn Record, config: &SchemaConfig) -> Result<Self, SchemaError> {
        let mut defs = record.fields();
        let mut fields = Vec::with_capacity(defs.len());
        let mut wire_len = Some(0usize);

        for (index, def) in defs.iter_mut().enumerate() {
            let directive = Directive::parse(def.directive);
            if directive.skip {
                continue;
            }

            let field = Field::compile(def, index, &directive, config)?;
            wire_len = match (wire_len, field.wire_len) {
                (Some(total), Some(len)) => Some(total + len),
                _ => None,
            };
            fields.push(field);
        }

        tracing::trace!(fields = fields.len(), ?wire_len, "schema compiled");
        Ok(Schema { fields, wire_len })
    }

    /// Total wire length, when every field is fixed-width.
    pub fn wire_len(&self) -> Option<usize> {
        self.wire_len
    }

    /// Number of compiled field descriptors.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldDef, ValueMut};

    struct Header {
        version: u16,
        flags: u8,
        scratch: u64,
        tag: String,
    }

    impl Record for Header {
        fn fields(&mut self) -> Vec<FieldDef<'_>> {
            vec![
                FieldDef::new("version", &mut self.version),
                FieldDef::new("flags", &mut self.flags),
                FieldDef::with_directive("scratch", "-", &mut self.scratch),
                FieldDef::with_directive("tag", "size=8", &mut self.tag),
            ]
        }
    }

    #[test]
    fn test_compile_fixed_wire_len() {
        let mut header = Header {
            version: 1,
            flags: 0,
            scratch: 0,
            tag: String::new(),
        };
        let schema = Schema::compile(&mut header, &SchemaConfig::default()).unwrap();
        assert_eq!(schema.wire_len(), Some(2 + 1 + 8));
    }

    #[test]
    fn test_excluded_field_has_no_descriptor() {
        let mut header = Header {
            version: 1,
            flags: 0,
            scratch: 0,
            tag: String::new(),
        };
        let schema = Schema::compile(&mut header, &SchemaConfig::default()).unwrap();
        assert_eq!(schema.field_count(), 3);
    }

    #[test]
    fn test_variable_field_clears_wire_len() {
        struct Message {
            body: String,
        }
        impl Record for Message {
            fn fields(&mut self) -> Vec<FieldDef<'_>> {
                vec![FieldDef::new("body", &mut self.body)]
            }
        }

        let mut message = Message { body: "x".into() };
        let schema = Schema::compile(&mut message, &SchemaConfig::default()).unwrap();
        assert_eq!(schema.wire_len(), None);
    }

    #[test]
    fn test_opaque_field_fails() {
        struct Odd;
        impl Record for Odd {
            fn fields(&mut self) -> Vec<FieldDef<'_>> {
                vec![FieldDef { name: "odd", directive: "", value: ValueMut::Opaque }]
            }
        }

        let err = Schema::compile(&mut Odd, &SchemaConfig::default()).unwrap_err();
        assert_eq!(err, SchemaError::UnclassifiableKind { field: "odd" });
    }

    #[test]
    fn test_excluded_opaque_field_compiles() {
        struct Odd;
        impl Record for Odd {
            fn fields(&mut self) -> Vec<FieldDef<'_>> {
                vec![FieldDef { name: "odd", directive: "-", value: ValueMut::Opaque }]
            }
        }

        let schema = Schema::compile(&mut Odd, &SchemaConfig::default()).unwrap();
        assert_eq!(schema.wire_len(), Some(0));
        assert_eq!(schema.field_count(), 0);
    }

    #[test]
    fn test_oversized_width_fails() {
        struct Wide {
            x: u32,
        }
        impl Record for Wide {
            fn fields(&mut self) -> Vec<FieldDef<'_>> {
                vec![FieldDef::with_directive("x", "size=9", &mut self.x)]
            }
        }

        let err = Schema::compile(&mut Wide { x: 0 }, &SchemaConfig::default()).unwrap_err();
        assert_eq!(err, SchemaError::UnsupportedWidth { field: "x", width: 9 });
    }

    #[test]
    fn test_runtime_count_sequence_has_no_wire_len() {
        struct Batch {
            values: Vec<u16>,
        }
        impl Record for Batch {
            fn fields(&mut self) -> Vec<FieldDef<'_>> {
                vec![FieldDef::new("values", &mut self.values)]
            }
        }

        let mut batch = Batch { values: vec![1, 2, 3] };
        let schema = Schema::compile(&mut batch, &SchemaConfig::default()).unwrap();
        assert_eq!(schema.wire_len(), None);
    }

    #[test]
    fn test_counted_sequence_wire_len() {
        struct Batch {
            values: Vec<u16>,
        }
        impl Record for Batch {
            fn fields(&mut self) -> Vec<FieldDef<'_>> {
                vec![FieldDef::with_directive("values", "num=4", &mut self.values)]
            }
        }

        let mut batch = Batch { values: Vec::new() };
        let schema = Schema::compile(&mut batch, &SchemaConfig::default()).unwrap();
        assert_eq!(schema.wire_len(), Some(8));
    }

    #[test]
    fn test_fixed_array_count_from_capacity() {
        struct Addr {
            octets: [u8; 6],
        }
        impl Record for Addr {
            fn fields(&mut self) -> Vec<FieldDef<'_>> {
                vec![FieldDef::new("octets", &mut self.octets)]
            }
        }

        let mut addr = Addr { octets: [0; 6] };
        let schema = Schema::compile(&mut addr, &SchemaConfig::default()).unwrap();
        assert_eq!(schema.wire_len(), Some(6));
    }
}
