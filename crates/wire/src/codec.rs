//! Whole-frame encoding and decoding, tying [`FrameHeader`] and [`Field`]
//! together under configurable size limits.

use crate::data_type::{DataType, WireScalar};
use crate::error::CodecError;
use crate::field::{Field, FieldValue, RawField};
use crate::header::{FrameHeader, HEADER_LEN, MAGIC, VERSION};

/// Per-codec configurable caps, with the same defaults the client ships
/// with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CodecLimits {
    /// Longest field name accepted, in bytes.
    pub max_field_name_length: usize,
    /// Largest field value accepted, in bytes.
    pub max_field_value_length: usize,
    /// Initial capacity hint for the encoder's body buffer.
    pub pre_allocated_size: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        CodecLimits {
            max_field_name_length: 128,
            max_field_value_length: 1024 * 1024,
            pre_allocated_size: 4096,
        }
    }
}

/// A decoded frame: its header and the fields that survived the configured
/// limits.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// The fixed header this frame was decoded with.
    pub header: FrameHeader,
    /// Fields that passed `CodecLimits`, in wire order. Oversized fields are
    /// silently dropped here (see [`FrameCodec::decode`]); a dropped field
    /// does not change `header.field_count`, which still reflects the
    /// original wire count.
    pub fields: Vec<Field>,
}

impl Frame {
    /// Looks up a scalar field by name, returning `None` if it is absent or
    /// its wire type does not match `T`.
    #[must_use]
    pub fn get<T: ScalarValue>(&self, name: &str) -> Option<T> {
        self.fields
            .iter()
            .find(|f| f.name == name && f.data_type == T::DATA_TYPE)
            .and_then(|f| T::from_field_value(&f.value))
    }

    /// Looks up a `String` field by name. Bytes that are not valid UTF-8
    /// are treated the same as an absent field; callers that need to tell
    /// the two apart should use [`Frame::try_get_string`] instead.
    #[must_use]
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.try_get_string(name).ok().flatten()
    }

    /// Looks up a `String` field by name, distinguishing "absent" from
    /// "present but not valid UTF-8".
    ///
    /// # Errors
    ///
    /// Returns the field's raw bytes if present but not valid UTF-8.
    pub fn try_get_string(&self, name: &str) -> Result<Option<String>, Vec<u8>> {
        match self
            .fields
            .iter()
            .find(|f| f.name == name && f.data_type == DataType::String)
        {
            Some(f) => match &f.value {
                FieldValue::Container(bytes) => {
                    String::from_utf8(bytes.clone()).map(Some).map_err(|e| e.into_bytes())
                }
                _ => Ok(None),
            },
            None => Ok(None),
        }
    }

    /// Looks up a `ByteArray` field by name.
    #[must_use]
    pub fn get_bytes(&self, name: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|f| f.name == name && f.data_type == DataType::ByteArray)
            .and_then(|f| match &f.value {
                FieldValue::Container(bytes) => Some(bytes.as_slice()),
                _ => None,
            })
    }

    /// Looks up a container field's raw payload regardless of declared
    /// type, for callers that decode `ArrayValue`/`MapValue` themselves.
    #[must_use]
    pub fn get_container(&self, name: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| match &f.value {
                FieldValue::Container(bytes) => Some(bytes.as_slice()),
                _ => None,
            })
    }
}

/// Maps a Rust scalar type onto how it is pulled out of a decoded
/// [`FieldValue`]. Blanket-implemented for every [`WireScalar`] type.
pub trait ScalarValue: WireScalar {
    /// Builds the field value this scalar is carried as.
    fn into_field_value(self) -> FieldValue;
    /// Extracts `Self` from a decoded field value, or `None` on mismatch.
    fn from_field_value(value: &FieldValue) -> Option<Self>;
}

macro_rules! impl_scalar_value {
    ($ty:ty, $variant:ident) => {
        impl ScalarValue for $ty {
            fn into_field_value(self) -> FieldValue {
                FieldValue::$variant(self)
            }
            fn from_field_value(value: &FieldValue) -> Option<Self> {
                match value {
                    FieldValue::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

impl_scalar_value!(u8, UInt8);
impl_scalar_value!(i8, Int8);
impl_scalar_value!(u16, UInt16);
impl_scalar_value!(i16, Int16);
impl_scalar_value!(u32, UInt32);
impl_scalar_value!(i32, Int32);
impl_scalar_value!(u64, UInt64);
impl_scalar_value!(i64, Int64);
impl_scalar_value!(f32, Float);
impl_scalar_value!(f64, Double);
impl_scalar_value!(bool, Bool);

/// Builds up the fields of an outgoing frame.
#[derive(Default)]
pub struct FrameBuilder {
    fields: Vec<Field>,
}

impl FrameBuilder {
    /// Starts an empty frame.
    #[must_use]
    pub fn new() -> Self {
        FrameBuilder::default()
    }

    /// Appends a fixed-width scalar field.
    pub fn scalar<T: ScalarValue>(mut self, name: impl Into<String>, value: T) -> Self {
        self.fields.push(Field::scalar(
            name,
            T::DATA_TYPE,
            value.into_field_value(),
        ));
        self
    }

    /// Appends a UTF-8 string field.
    pub fn string(mut self, name: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.fields.push(Field::container(
            name,
            DataType::String,
            value.as_ref().as_bytes().to_vec(),
        ));
        self
    }

    /// Appends an opaque byte array field.
    pub fn bytes(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.fields
            .push(Field::container(name, DataType::ByteArray, value.into()));
        self
    }

    /// Appends a pre-encoded `Array`/`Map`/`Dictionary` container field.
    pub fn container(
        mut self,
        name: impl Into<String>,
        data_type: DataType,
        encoded: Vec<u8>,
    ) -> Self {
        self.fields.push(Field::container(name, data_type, encoded));
        self
    }

    /// Finalizes the field list.
    #[must_use]
    pub fn fields(self) -> Vec<Field> {
        self.fields
    }
}

/// Encodes and decodes whole frames under a fixed set of [`CodecLimits`].
#[derive(Clone, Copy, Debug)]
pub struct FrameCodec {
    limits: CodecLimits,
}

impl FrameCodec {
    /// Builds a codec with the given limits.
    #[must_use]
    pub fn new(limits: CodecLimits) -> Self {
        FrameCodec { limits }
    }

    /// The limits this codec enforces.
    #[must_use]
    pub fn limits(&self) -> CodecLimits {
        self.limits
    }

    /// Encodes `fields` into a complete frame: header followed by body.
    #[must_use]
    pub fn encode(&self, fields: &[Field]) -> Vec<u8> {
        let mut body = Vec::with_capacity(self.limits.pre_allocated_size);
        for field in fields {
            field.encode(&mut body);
        }
        let header = FrameHeader {
            magic: MAGIC,
            version: VERSION,
            body_length: body.len() as u32,
            flags: 0,
            checksum: 0,
            field_count: fields.len() as u16,
        };
        let mut out = Vec::with_capacity(HEADER_LEN + body.len());
        out.extend_from_slice(&header.encode());
        out.extend_from_slice(&body);
        out
    }

    /// Decodes one complete frame from the start of `buf`.
    ///
    /// Fields whose name or value exceed the configured limits are skipped
    /// (a `tracing::warn!` is emitted) rather than failing the whole frame;
    /// the returned byte count always reflects the full frame regardless of
    /// how many fields were kept.
    ///
    /// # Errors
    ///
    /// Propagates [`CodecError`] from [`FrameHeader::decode`], or returns
    /// [`CodecError::Truncated`]/[`CodecError::FieldOverrun`] if the body is
    /// shorter than declared or a field's lengths overrun it.
    pub fn decode(&self, buf: &[u8]) -> Result<(Frame, usize), CodecError> {
        let header = FrameHeader::decode(buf)?;
        let total_len = HEADER_LEN + header.body_length as usize;
        if buf.len() < total_len {
            return Err(CodecError::Truncated {
                declared: header.body_length,
                available: (buf.len() - HEADER_LEN.min(buf.len())) as u32,
            });
        }
        let body = &buf[HEADER_LEN..total_len];

        let mut fields = Vec::with_capacity(header.field_count as usize);
        let mut pos = 0usize;
        for _ in 0..header.field_count {
            let (raw, consumed) = RawField::decode(&body[pos..])?;
            pos += consumed;

            if raw.name.len() > self.limits.max_field_name_length {
                tracing::warn!(
                    field = %raw.name,
                    length = raw.name.len(),
                    limit = self.limits.max_field_name_length,
                    "skipping field: name exceeds configured limit"
                );
                continue;
            }
            if raw.value_bytes.len() > self.limits.max_field_value_length {
                tracing::warn!(
                    field = %raw.name,
                    length = raw.value_bytes.len(),
                    limit = self.limits.max_field_value_length,
                    "skipping field: value exceeds configured limit"
                );
                continue;
            }
            fields.push(raw.into_field());
        }

        Ok((Frame { header, fields }, total_len))
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        FrameCodec::new(CodecLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_mixed_fields() {
        let fields = FrameBuilder::new()
            .scalar("id", 7u32)
            .string("name", "block")
            .bytes("payload", vec![1u8, 2, 3])
            .fields();
        let codec = FrameCodec::default();
        let bytes = codec.encode(&fields);
        let (frame, consumed) = codec.decode(&bytes).expect("decode");
        assert_eq!(consumed, bytes.len());
        assert_eq!(frame.get::<u32>("id"), Some(7));
        assert_eq!(frame.get_string("name"), Some("block".to_string()));
        assert_eq!(frame.get_bytes("payload"), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn oversized_field_name_is_skipped_not_fatal() {
        let long_name = "x".repeat(200);
        let fields = FrameBuilder::new()
            .scalar(long_name, 1u32)
            .scalar("kept", 2u32)
            .fields();
        let codec = FrameCodec::default();
        let bytes = codec.encode(&fields);
        let (frame, consumed) = codec.decode(&bytes).expect("decode");
        assert_eq!(consumed, bytes.len());
        assert_eq!(frame.fields.len(), 1);
        assert_eq!(frame.get::<u32>("kept"), Some(2));
    }

    #[test]
    fn oversized_field_value_is_skipped_not_fatal() {
        let limits = CodecLimits {
            max_field_value_length: 4,
            ..CodecLimits::default()
        };
        let codec = FrameCodec::new(limits);
        let fields = FrameBuilder::new()
            .bytes("big", vec![0u8; 16])
            .scalar("kept", 1u32)
            .fields();
        let bytes = codec.encode(&fields);
        let (frame, consumed) = codec.decode(&bytes).expect("decode");
        assert_eq!(consumed, bytes.len());
        assert_eq!(frame.fields.len(), 1);
        assert_eq!(frame.get::<u32>("kept"), Some(1));
    }

    #[test]
    fn mismatched_scalar_type_returns_none() {
        let fields = FrameBuilder::new().scalar("id", 7u32).fields();
        let codec = FrameCodec::default();
        let bytes = codec.encode(&fields);
        let (frame, _) = codec.decode(&bytes).expect("decode");
        assert_eq!(frame.get::<u16>("id"), None);
    }

    #[test]
    fn empty_frame_round_trips() {
        let codec = FrameCodec::default();
        let bytes = codec.encode(&[]);
        let (frame, consumed) = codec.decode(&bytes).expect("decode");
        assert_eq!(consumed, HEADER_LEN);
        assert!(frame.fields.is_empty());
    }

    #[test]
    fn truncated_body_is_rejected() {
        let fields = FrameBuilder::new().scalar("id", 7u32).fields();
        let codec = FrameCodec::default();
        let mut bytes = codec.encode(&fields);
        bytes.truncate(bytes.len() - 1);
        assert!(codec.decode(&bytes).is_err());
    }
}
