//! In-process fixture server standing in for a `danejoe://` server, used
//! to drive the compiled binary end-to-end over a real loopback socket.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use danejoe_protocol::{
    build_block_response_body, build_download_response_body, build_response, request_path,
    resolve_path, BlockResponse, DownloadResponse, FrameAssembler, Status, PATH_BLOCK,
    PATH_DOWNLOAD,
};
use danejoe_wire::FrameCodec;

/// Serves `/download` and `/block` requests for one connection against a
/// single in-memory file, then keeps serving until the client disconnects.
pub struct FixtureServer {
    port: u16,
    handle: Option<JoinHandle<()>>,
}

impl FixtureServer {
    /// Binds a loopback listener on an ephemeral port and starts serving
    /// `file_contents` as file id 1.
    pub fn start(file_contents: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture listener");
        let port = listener.local_addr().expect("local addr").port();
        let handle = thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                serve_connection(stream, &file_contents);
            }
        });
        FixtureServer {
            port,
            handle: Some(handle),
        }
    }

    /// The `danejoe://127.0.0.1:<port>` URL the client under test connects to.
    pub fn url(&self) -> String {
        format!("danejoe://127.0.0.1:{}", self.port)
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve_connection(mut stream: TcpStream, file_contents: &[u8]) {
    let mut assembler = FrameAssembler::new();
    let mut chunk = [0u8; 4096];
    let codec = FrameCodec::default();

    loop {
        let request = loop {
            if let Some(frame) = assembler.pop_frame() {
                break Some(frame);
            }
            match stream.read(&mut chunk) {
                Ok(0) | Err(_) => break None,
                Ok(n) => assembler.push(&chunk[..n]),
            }
        };
        let Some(request) = request else {
            return;
        };

        let (envelope, _) = codec.decode(&request).expect("decode request envelope");
        let request_id = envelope.get::<u64>("request_id").expect("request_id field");
        let path = request_path(&envelope.fields).expect("path field");
        let path = resolve_path(&path).expect("recognised path");

        let response = match path {
            PATH_DOWNLOAD => build_response(
                Status::Ok,
                0,
                build_download_response_body(&DownloadResponse {
                    file_id: 1,
                    file_name: "fixture.bin".to_string(),
                    file_size: file_contents.len() as i64,
                    md5_code: String::new(),
                }),
                request_id,
            ),
            PATH_BLOCK => {
                let body = envelope.get_bytes("body").expect("body field");
                let (block_request, _) = codec.decode(body).expect("decode block request body");
                let offset = block_request.get::<i64>("offset").expect("offset field") as usize;
                let block_size = block_request
                    .get::<i64>("block_size")
                    .expect("block_size field") as usize;
                let end = (offset + block_size).min(file_contents.len());
                let data = file_contents[offset..end].to_vec();
                build_response(
                    Status::Ok,
                    0,
                    build_block_response_body(&BlockResponse {
                        block_id: block_request.get::<i64>("block_id").unwrap_or(-1),
                        file_id: 1,
                        task_id: block_request.get::<i64>("task_id").unwrap_or(-1),
                        offset: offset as i64,
                        block_size: data.len() as i64,
                        data,
                    }),
                    request_id,
                )
            }
            _ => unreachable!("fixture server only serves /download and /block"),
        };

        if stream.write_all(&response).is_err() {
            return;
        }
    }
}
