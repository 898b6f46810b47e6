//! Integer codecs over fixed-width byte spans.
//!
//! The span length selects the wire width: callers slice the buffer to
//! exactly the bytes a field occupies, then read or write through these
//! helpers in the field's byte order.

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

/// Wire byte order of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ByteOrder {
    /// Little-endian, the compile-time default.
    #[default]
    Le,
    /// Big-endian.
    Be,
}

/// Writes the low `dst.len()` bytes of `value` into `dst`. Values wider
/// than the span are truncated to the span width (two's complement).
pub fn put_uint(dst: &mut [u8], value: u64, order: ByteOrder) {
    let value = truncate(value, dst.len());
    match order {
        ByteOrder::Le => LittleEndian::write_uint(dst, value, dst.len()),
        ByteOrder::Be => BigEndian::write_uint(dst, value, dst.len()),
    }
}

/// Reads all of `src` as an unsigned integer.
pub fn get_uint(src: &[u8], order: ByteOrder) -> u64 {
    match order {
        ByteOrder::Le => LittleEndian::read_uint(src, src.len()),
        ByteOrder::Be => BigEndian::read_uint(src, src.len()),
    }
}

/// Reads all of `src` as a signed integer, sign-extending from the span
/// width.
pub fn get_int(src: &[u8], order: ByteOrder) -> i64 {
    match order {
        ByteOrder::Le => LittleEndian::read_int(src, src.len()),
        ByteOrder::Be => BigEndian::read_int(src, src.len()),
    }
}

fn truncate(value: u64, width: usize) -> u64 {
    if width >= 8 {
        value
    } else {
        value & ((1u64 << (width * 8)) - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_uint_be() {
        let mut buf = [0u8; 4];
        put_uint(&mut buf, 255, ByteOrder::Be);
        assert_eq!(buf, [0x00, 0x00, 0x00, 0xff]);
    }

    #[test]
    fn test_put_uint_le() {
        let mut buf = [0u8; 4];
        put_uint(&mut buf, 255, ByteOrder::Le);
        assert_eq!(buf, [0xff, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_put_uint_truncates() {
        let mut buf = [0u8; 1];
        put_uint(&mut buf, 0x1234, ByteOrder::Le);
        assert_eq!(buf, [0x34]);
    }

    #[test]
    fn test_get_uint_roundtrip() {
        let mut buf = [0u8; 3];
        put_uint(&mut buf, 0x00c0ffee, ByteOrder::Be);
        assert_eq!(get_uint(&buf, ByteOrder::Be), 0x00c0ffee);
        put_uint(&mut buf, 0x00c0ffee, ByteOrder::Le);
        assert_eq!(get_uint(&buf, ByteOrder::Le), 0x00c0ffee);
    }

    #[test]
    fn test_get_int_sign_extends() {
        let mut buf = [0u8; 2];
        put_uint(&mut buf, (-2i64) as u64, ByteOrder::Le);
        assert_eq!(get_int(&buf, ByteOrder::Le), -2);
        assert_eq!(get_uint(&buf, ByteOrder::Le), 0xfffe);
    }

    #[test]
    fn test_float_bits_pass_through() {
        let mut buf = [0u8; 8];
        let x = 1.32f64;
        put_uint(&mut buf, x.to_bits(), ByteOrder::Be);
        assert_eq!(f64::from_bits(get_uint(&buf, ByteOrder::Be)), x);
    }

    #[test]
    fn test_full_width() {
        let mut buf = [0u8; 8];
        put_uint(&mut buf, u64::MAX, ByteOrder::Le);
        assert_eq!(get_uint(&buf, ByteOrder::Le), u64::MAX);
    }
}
