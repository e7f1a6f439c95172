#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `danejoe-protocol` sits directly above [`danejoe_wire`]: it turns a raw
//! byte stream into whole frames ([`FrameAssembler`]) and gives those
//! frames request/response shape ([`envelope`]).
//!
//! # Design
//!
//! The envelope layer never contains domain logic — it only knows how to
//! build and parse the three server paths (`/test`, `/download`,
//! `/block`). Task/block scheduling lives one layer up, in
//! `danejoe-scheduler`.
//!
//! # Errors
//!
//! Fallible operations return [`ProtocolError`].

mod assembler;
mod envelope;
mod error;

pub use assembler::FrameAssembler;
pub use envelope::{
    build_block_request, build_block_response_body, build_download_request,
    build_download_response_body, build_request, build_response, build_test_request,
    build_test_response_body, parse_block_response, parse_download_response, parse_response,
    parse_test_response, request_path, resolve_path, BlockRequestFields, BlockResponse,
    DownloadResponse, EnvelopeResponse, RequestType, Status, TestResponse, PATH_BLOCK,
    PATH_DOWNLOAD, PATH_TEST,
};
pub use error::ProtocolError;
