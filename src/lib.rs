//! # flatwire
//!
//! Byte-level encoding and decoding of record types described by
//! per-field directives.
//!
//! A record lists its fields once through the [`Record`] trait; [`compile`]
//! turns that description into an immutable schema bound to the record, and
//! the returned [`Transcoder`] moves values to and from flat byte buffers —
//! no framing, no field tags, no intermediate representation. Wire
//! compatibility rests entirely on both sides sharing the record definition
//! and its directives.
//!
//! Directives are comma-separated tokens on a field: `size=<n>` (explicit
//! byte width; on a string, fixed width instead of zero-terminated),
//! `num=<n>` (repeat count of a sequence), `bo=le|be` (byte order;
//! little-endian is the default), `-` (exclude the field). Unrecognized
//! tokens are ignored.
//!
//! ## Example
//!
//! ```
//! use flatwire::{FieldDef, Record, compile};
//!
//! struct Packet {
//!     id: u16,
//!     flag: bool,
//!     name: String,
//! }
//!
//! impl Record for Packet {
//!     fn fields(&mut self) -> Vec<FieldDef<'_>> {
//!         vec![
//!             FieldDef::new("id", &mut self.id),
//!             FieldDef::new("flag", &mut self.flag),
//!             FieldDef::with_directive("name", "size=4", &mut self.name),
//!         ]
//!     }
//! }
//!
//! let mut packet = Packet { id: 0x1234, flag: true, name: "ab".into() };
//! let mut buf = [0u8; 7];
//! let n = compile(&mut packet).unwrap().encode(&mut buf).unwrap();
//! assert_eq!(&buf[..n], &[0x34, 0x12, 0x01, 0x61, 0x62, 0x00, 0x00]);
//! ```

pub mod bytes;
pub mod directive;
pub mod errors;
pub mod layout;
pub mod record;
pub mod schema;
pub mod transcoder;

mod compiled;

pub use bytes::ByteOrder;
pub use directive::Directive;
pub use errors::{DecodeError, EncodeError, SchemaError};
pub use layout::FieldLayout;
pub use record::{Elems, FieldDef, NestedSlot, Packed, Record, SeqMut, ValueMut};
pub use schema::{Schema, SchemaConfig};
pub use transcoder::{Transcoder, compile, compile_with};
