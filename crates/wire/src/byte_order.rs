//! Conversion between host byte order and the fixed wire order (big-endian).
//!
//! The wire format is always big-endian regardless of host architecture.
//! [`is_host_big_endian`] caches the one-time runtime probe; every other
//! function here is a plain `to_be_bytes`/`from_be_bytes` wrapper so callers
//! never have to special-case the host order themselves.

use std::sync::OnceLock;

fn host_endianness_cell() -> &'static OnceLock<bool> {
    static CELL: OnceLock<bool> = OnceLock::new();
    &CELL
}

/// Returns `true` if the host is big-endian. Computed once and cached.
pub fn is_host_big_endian() -> bool {
    *host_endianness_cell().get_or_init(|| {
        let probe: u16 = 0x0102;
        probe.to_ne_bytes()[0] == 0x01
    })
}

/// Writes `value` into `dst` in wire (big-endian) order.
///
/// `dst` must be exactly `N` bytes long.
pub fn to_wire<const N: usize>(dst: &mut [u8], value: [u8; N]) {
    debug_assert_eq!(dst.len(), N);
    dst.copy_from_slice(&value);
}

/// Reads `N` wire-order bytes from `src` back into an `[u8; N]` host-order
/// array of big-endian bytes (callers then call `from_be_bytes`).
pub fn from_wire<const N: usize>(src: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&src[..N]);
    out
}

macro_rules! scalar_codec {
    ($write:ident, $read:ident, $ty:ty) => {
        /// Writes a scalar in wire order, returning the number of bytes written.
        pub fn $write(dst: &mut [u8], value: $ty) {
            to_wire(dst, value.to_be_bytes());
        }

        /// Reads a scalar from wire order.
        pub fn $read(src: &[u8]) -> $ty {
            <$ty>::from_be_bytes(from_wire(src))
        }
    };
}

scalar_codec!(write_u16, read_u16, u16);
scalar_codec!(write_u32, read_u32, u32);
scalar_codec!(write_u64, read_u64, u64);
scalar_codec!(write_i16, read_i16, i16);
scalar_codec!(write_i32, read_i32, i32);
scalar_codec!(write_i64, read_i64, i64);
scalar_codec!(write_f32, read_f32, f32);
scalar_codec!(write_f64, read_f64, f64);

/// Single-byte values are identical in every byte order; this is an
/// identity copy, never an allocation.
pub fn write_u8(dst: &mut [u8], value: u8) {
    dst[0] = value;
}

/// See [`write_u8`].
pub fn read_u8(src: &[u8]) -> u8 {
    src[0]
}
