//! Request/response envelope framing over the three server-facing paths.

use danejoe_wire::{DataType, Field, FrameBuilder, FrameCodec};

use crate::error::ProtocolError;

/// `/test` — a round-trip liveness check.
pub const PATH_TEST: &str = "/test";
/// `/download` — resolve a file id into its metadata.
pub const PATH_DOWNLOAD: &str = "/download";
/// `/block` — fetch one block's payload.
pub const PATH_BLOCK: &str = "/block";

/// HTTP-method-shaped request kind carried in the envelope header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum RequestType {
    /// `GET`.
    Get = 0,
    /// `POST`.
    Post = 1,
}

/// Response status. Values mirror familiar HTTP codes; this is the
/// protocol's own convention, not an HTTP dependency.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u16)]
pub enum Status {
    /// Request succeeded.
    Ok = 200,
    /// Referenced entity (file, block) does not exist.
    NotFound = 404,
    /// Request body was malformed or missing required fields.
    BadRequest = 400,
}

impl Status {
    /// Decodes a wire status code; unrecognised codes map to `BadRequest`.
    #[must_use]
    pub fn from_wire(code: u16) -> Status {
        match code {
            200 => Status::Ok,
            404 => Status::NotFound,
            _ => Status::BadRequest,
        }
    }
}

/// A fully decoded response envelope; `body` is still an encoded nested
/// frame, parsed by the per-path `parse_*_response` functions.
#[derive(Clone, Debug)]
pub struct EnvelopeResponse {
    /// Protocol version the server replied with.
    pub version: u16,
    /// Echoes the request's `request_id`.
    pub request_id: u64,
    /// Outcome of the request.
    pub status: Status,
    /// Content-type tag of `body` (opaque to this layer).
    pub content_type: u8,
    /// Nested frame bytes; pass to a `parse_*_body` function.
    pub body: Vec<u8>,
}

const ENVELOPE_CONTENT_TYPE: u8 = 0;

/// Builds a complete request frame: envelope fields wrapping `body_bytes`
/// (itself an already-encoded nested frame) as an opaque `ByteArray`.
#[must_use]
pub fn build_request(
    request_type: RequestType,
    path: &str,
    content_type: u8,
    body_bytes: Vec<u8>,
    request_id: u64,
) -> Vec<u8> {
    let fields = FrameBuilder::new()
        .scalar("version", 1u16)
        .scalar("request_id", request_id)
        .scalar("request_type", request_type as u8)
        .string("path", path)
        .scalar("content_type", content_type)
        .bytes("body", body_bytes)
        .fields();
    FrameCodec::default().encode(&fields)
}

/// `POST /test` with body `{message:string}`.
#[must_use]
pub fn build_test_request(message: &str, request_id: u64) -> Vec<u8> {
    let body = FrameCodec::default().encode(&FrameBuilder::new().string("message", message).fields());
    build_request(
        RequestType::Post,
        PATH_TEST,
        ENVELOPE_CONTENT_TYPE,
        body,
        request_id,
    )
}

/// `GET /download` with body `{file_id:i64}`.
#[must_use]
pub fn build_download_request(file_id: i64, request_id: u64) -> Vec<u8> {
    let body = FrameCodec::default().encode(&FrameBuilder::new().scalar("file_id", file_id).fields());
    build_request(
        RequestType::Get,
        PATH_DOWNLOAD,
        ENVELOPE_CONTENT_TYPE,
        body,
        request_id,
    )
}

/// The fields identifying one block request.
#[derive(Clone, Copy, Debug)]
pub struct BlockRequestFields {
    /// Store-assigned block id.
    pub block_id: i64,
    /// Owning file id.
    pub file_id: i64,
    /// Owning task id.
    pub task_id: i64,
    /// Byte offset of the block within the file.
    pub offset: i64,
    /// Requested block size.
    pub block_size: i64,
}

/// `GET /block` with body `{block_id, file_id, task_id, offset, block_size}`.
#[must_use]
pub fn build_block_request(block_req: BlockRequestFields, request_id: u64) -> Vec<u8> {
    let body = FrameCodec::default().encode(
        &FrameBuilder::new()
            .scalar("block_id", block_req.block_id)
            .scalar("file_id", block_req.file_id)
            .scalar("task_id", block_req.task_id)
            .scalar("offset", block_req.offset)
            .scalar("block_size", block_req.block_size)
            .fields(),
    );
    build_request(
        RequestType::Get,
        PATH_BLOCK,
        ENVELOPE_CONTENT_TYPE,
        body,
        request_id,
    )
}

/// Parses a complete response frame into its envelope fields.
///
/// # Errors
///
/// Returns [`ProtocolError::Codec`] if `frame_bytes` does not decode, or
/// [`ProtocolError::MissingField`] if a required envelope field is absent.
pub fn parse_response(frame_bytes: &[u8]) -> Result<EnvelopeResponse, ProtocolError> {
    let codec = FrameCodec::default();
    let (frame, _) = codec.decode(frame_bytes)?;
    let version = frame
        .get::<u16>("version")
        .ok_or(ProtocolError::MissingField("version"))?;
    let request_id = frame
        .get::<u64>("request_id")
        .ok_or(ProtocolError::MissingField("request_id"))?;
    let status = frame
        .get::<u16>("status")
        .ok_or(ProtocolError::MissingField("status"))?;
    let content_type = frame
        .get::<u8>("content_type")
        .ok_or(ProtocolError::MissingField("content_type"))?;
    let body = frame
        .get_bytes("body")
        .ok_or(ProtocolError::MissingField("body"))?
        .to_vec();
    Ok(EnvelopeResponse {
        version,
        request_id,
        status: Status::from_wire(status),
        content_type,
        body,
    })
}

/// Builds a response envelope frame, used by the in-process test fixture
/// server and integration tests.
#[must_use]
pub fn build_response(
    status: Status,
    content_type: u8,
    body_bytes: Vec<u8>,
    request_id: u64,
) -> Vec<u8> {
    let fields = FrameBuilder::new()
        .scalar("version", 1u16)
        .scalar("request_id", request_id)
        .scalar("status", status as u16)
        .scalar("content_type", content_type)
        .bytes("body", body_bytes)
        .fields();
    FrameCodec::default().encode(&fields)
}

/// `{message:string}`, the `/test` response body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestResponse {
    /// Echoed message.
    pub message: String,
}

/// Parses a `/test` response body.
pub fn parse_test_response(body: &[u8]) -> Result<TestResponse, ProtocolError> {
    let (frame, _) = FrameCodec::default().decode(body)?;
    let message = frame
        .try_get_string("message")
        .map_err(|_| ProtocolError::InvalidUtf8("message"))?
        .ok_or(ProtocolError::MissingField("message"))?;
    Ok(TestResponse { message })
}

/// `{file_id, file_name, file_size, md5_code}`, the `/download` response
/// body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DownloadResponse {
    /// File id being described.
    pub file_id: i64,
    /// Remote file name.
    pub file_name: String,
    /// Total file size, in bytes.
    pub file_size: i64,
    /// MD5 checksum, possibly empty.
    pub md5_code: String,
}

/// Parses a `/download` response body.
pub fn parse_download_response(body: &[u8]) -> Result<DownloadResponse, ProtocolError> {
    let (frame, _) = FrameCodec::default().decode(body)?;
    Ok(DownloadResponse {
        file_id: frame
            .get::<i64>("file_id")
            .ok_or(ProtocolError::MissingField("file_id"))?,
        file_name: frame
            .try_get_string("file_name")
            .map_err(|_| ProtocolError::InvalidUtf8("file_name"))?
            .ok_or(ProtocolError::MissingField("file_name"))?,
        file_size: frame
            .get::<i64>("file_size")
            .ok_or(ProtocolError::MissingField("file_size"))?,
        md5_code: frame.get_string("md5_code").unwrap_or_default(),
    })
}

/// `{block_id, file_id, task_id, offset, block_size, data}`, the `/block`
/// response body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockResponse {
    /// Block id this response answers.
    pub block_id: i64,
    /// Owning file id.
    pub file_id: i64,
    /// Owning task id.
    pub task_id: i64,
    /// Byte offset of the block within the file.
    pub offset: i64,
    /// Declared payload size; may be less than `data.len()`.
    pub block_size: i64,
    /// Raw block bytes.
    pub data: Vec<u8>,
}

/// Parses a `/block` response body.
pub fn parse_block_response(body: &[u8]) -> Result<BlockResponse, ProtocolError> {
    let (frame, _) = FrameCodec::default().decode(body)?;
    Ok(BlockResponse {
        block_id: frame
            .get::<i64>("block_id")
            .ok_or(ProtocolError::MissingField("block_id"))?,
        file_id: frame
            .get::<i64>("file_id")
            .ok_or(ProtocolError::MissingField("file_id"))?,
        task_id: frame
            .get::<i64>("task_id")
            .ok_or(ProtocolError::MissingField("task_id"))?,
        offset: frame
            .get::<i64>("offset")
            .ok_or(ProtocolError::MissingField("offset"))?,
        block_size: frame
            .get::<i64>("block_size")
            .ok_or(ProtocolError::MissingField("block_size"))?,
        data: frame
            .get_bytes("data")
            .ok_or(ProtocolError::MissingField("data"))?
            .to_vec(),
    })
}

/// Builds a `/block` response body frame, used by the test fixture server.
#[must_use]
pub fn build_block_response_body(response: &BlockResponse) -> Vec<u8> {
    FrameCodec::default().encode(
        &FrameBuilder::new()
            .scalar("block_id", response.block_id)
            .scalar("file_id", response.file_id)
            .scalar("task_id", response.task_id)
            .scalar("offset", response.offset)
            .scalar("block_size", response.block_size)
            .bytes("data", response.data.clone())
            .fields(),
    )
}

/// Builds a `/download` response body frame, used by the test fixture
/// server.
#[must_use]
pub fn build_download_response_body(response: &DownloadResponse) -> Vec<u8> {
    FrameCodec::default().encode(
        &FrameBuilder::new()
            .scalar("file_id", response.file_id)
            .string("file_name", &response.file_name)
            .scalar("file_size", response.file_size)
            .string("md5_code", &response.md5_code)
            .fields(),
    )
}

/// Builds a `/test` response body frame, used by the test fixture server.
#[must_use]
pub fn build_test_response_body(response: &TestResponse) -> Vec<u8> {
    FrameCodec::default().encode(&FrameBuilder::new().string("message", &response.message).fields())
}

/// Resolves a `path` string to a statically known path constant, used by
/// the fixture server dispatcher.
///
/// # Errors
///
/// Returns [`ProtocolError::UnknownPath`] for anything other than
/// [`PATH_TEST`], [`PATH_DOWNLOAD`], or [`PATH_BLOCK`].
pub fn resolve_path(path: &str) -> Result<&'static str, ProtocolError> {
    match path {
        PATH_TEST => Ok(PATH_TEST),
        PATH_DOWNLOAD => Ok(PATH_DOWNLOAD),
        PATH_BLOCK => Ok(PATH_BLOCK),
        other => Err(ProtocolError::UnknownPath(other.to_string())),
    }
}

/// Reads the `path` field out of a decoded request frame. Exposed for the
/// fixture server, which needs it before any `parse_*_request` exists.
#[must_use]
pub fn request_path(fields: &[Field]) -> Option<String> {
    fields
        .iter()
        .find(|f| f.name == "path" && f.data_type == DataType::String)
        .and_then(|f| match &f.value {
            danejoe_wire::FieldValue::Container(bytes) => String::from_utf8(bytes.clone()).ok(),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_round_trips() {
        let frame_bytes = build_test_request("hello", 1);
        let response_body = build_test_response_body(&TestResponse {
            message: "hello".to_string(),
        });
        let response_frame = build_response(Status::Ok, ENVELOPE_CONTENT_TYPE, response_body, 1);

        let envelope = parse_response(&response_frame).expect("parse envelope");
        assert_eq!(envelope.request_id, 1);
        assert_eq!(envelope.status, Status::Ok);
        let parsed = parse_test_response(&envelope.body).expect("parse body");
        assert_eq!(parsed.message, "hello");

        let (request_frame, _) = FrameCodec::default().decode(&frame_bytes).unwrap();
        assert_eq!(request_frame.get_string("path"), Some(PATH_TEST.to_string()));
    }

    #[test]
    fn download_request_round_trips() {
        let frame_bytes = build_download_request(42, 7);
        let (frame, _) = FrameCodec::default().decode(&frame_bytes).unwrap();
        assert_eq!(frame.get_string("path"), Some(PATH_DOWNLOAD.to_string()));
        let body = frame.get_bytes("body").unwrap();
        let (body_frame, _) = FrameCodec::default().decode(body).unwrap();
        assert_eq!(body_frame.get::<i64>("file_id"), Some(42));
    }

    #[test]
    fn block_response_round_trips() {
        let expected = BlockResponse {
            block_id: 1,
            file_id: 2,
            task_id: 3,
            offset: 1024,
            block_size: 4,
            data: vec![1, 2, 3, 4],
        };
        let body = build_block_response_body(&expected);
        let parsed = parse_block_response(&body).expect("parse");
        assert_eq!(parsed, expected);
    }

    #[test]
    fn unknown_path_is_rejected() {
        assert!(resolve_path("/nope").is_err());
    }

    #[test]
    fn invalid_utf8_in_message_is_distinguished_from_missing() {
        let body = FrameCodec::default().encode(
            &FrameBuilder::new()
                .container("message", DataType::String, vec![0xFF, 0xFE])
                .fields(),
        );
        assert!(matches!(
            parse_test_response(&body),
            Err(ProtocolError::InvalidUtf8("message"))
        ));
    }
}
