//! The fixed 16-byte frame header.

use crate::byte_order;
use crate::error::CodecError;

/// Constant magic value every frame begins with (four ASCII `'f'`).
pub const MAGIC: u32 = 0x6666_6666;
/// The only protocol version this codec speaks.
pub const VERSION: u8 = 1;
/// Wire size of [`FrameHeader`], always exactly 16 bytes.
pub const HEADER_LEN: usize = 16;

/// Bit set in [`FrameHeader::flags`] when the reserved checksum field is
/// populated. Reserved: always zero in this implementation.
pub const FLAG_HAS_CHECKSUM: u8 = 0x01;

/// The fixed header every frame carries ahead of its field body.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameHeader {
    /// Constant `0x66666666`; a mismatch means the stream is unsynchronized.
    pub magic: u32,
    /// Protocol version; currently always 1.
    pub version: u8,
    /// Total bytes of body following this header.
    pub body_length: u32,
    /// Bitset of header flags (`HasCheckSum` is the only defined bit).
    pub flags: u8,
    /// Reserved checksum; zero unless `HasCheckSum` is set.
    pub checksum: u32,
    /// Number of top-level fields encoded in the body.
    pub field_count: u16,
}

impl FrameHeader {
    /// Encodes the header into exactly [`HEADER_LEN`] wire bytes.
    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        byte_order::write_u32(&mut out[0..4], self.magic);
        byte_order::write_u8(&mut out[4..5], self.version);
        byte_order::write_u32(&mut out[5..9], self.body_length);
        byte_order::write_u8(&mut out[9..10], self.flags);
        byte_order::write_u32(&mut out[10..14], self.checksum);
        byte_order::write_u16(&mut out[14..16], self.field_count);
        out
    }

    /// Decodes a header from the first [`HEADER_LEN`] bytes of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ShortHeader`] if `buf` is too short,
    /// [`CodecError::BadMagic`] on a magic mismatch, or
    /// [`CodecError::UnsupportedVersion`] if the version byte is not 1.
    pub fn decode(buf: &[u8]) -> Result<FrameHeader, CodecError> {
        if buf.len() < HEADER_LEN {
            return Err(CodecError::ShortHeader);
        }
        let magic = byte_order::read_u32(&buf[0..4]);
        if magic != MAGIC {
            return Err(CodecError::BadMagic);
        }
        let version = byte_order::read_u8(&buf[4..5]);
        if version != VERSION {
            return Err(CodecError::UnsupportedVersion { found: version });
        }
        let body_length = byte_order::read_u32(&buf[5..9]);
        let flags = byte_order::read_u8(&buf[9..10]);
        let checksum = byte_order::read_u32(&buf[10..14]);
        let field_count = byte_order::read_u16(&buf[14..16]);
        Ok(FrameHeader {
            magic,
            version,
            body_length,
            flags,
            checksum,
            field_count,
        })
    }

    /// `true` when [`FLAG_HAS_CHECKSUM`] is set.
    #[must_use]
    pub const fn has_checksum(&self) -> bool {
        self.flags & FLAG_HAS_CHECKSUM != 0
    }
}
