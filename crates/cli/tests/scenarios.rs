//! End-to-end download scenarios: runs the compiled `danejoe-transfer`
//! binary against an in-process fixture server and checks what landed on
//! disk.

mod support;

use std::fs;
use std::path::Path;

use assert_cmd::Command;

use support::FixtureServer;

fn run_transfer(server: &FixtureServer, file_id: i64, destination: &Path, block_bytes: i64) {
    let mut cmd = Command::cargo_bin("danejoe-transfer").expect("binary built by this workspace");
    cmd.arg(server.url())
        .arg(file_id.to_string())
        .arg(destination.to_str().expect("utf8 path"))
        .arg("--block-bytes")
        .arg(block_bytes.to_string());
    cmd.assert().success();
}

#[test]
fn downloads_a_file_that_fits_in_one_block() {
    let contents: Vec<u8> = (0..4096u32).map(|b| (b % 256) as u8).collect();
    let server = FixtureServer::start(contents.clone());
    let dest_dir = tempfile::tempdir().expect("tempdir");
    let dest_path = dest_dir.path().join("out.bin");

    run_transfer(&server, 1, &dest_path, 1024 * 1024);

    assert_eq!(fs::read(&dest_path).expect("read output"), contents);
}

#[test]
fn downloads_a_file_spanning_several_blocks() {
    let contents: Vec<u8> = (0..(256 * 1024)).map(|b| (b % 251) as u8).collect();
    let server = FixtureServer::start(contents.clone());
    let dest_dir = tempfile::tempdir().expect("tempdir");
    let dest_path = dest_dir.path().join("out.bin");

    run_transfer(&server, 1, &dest_path, 64 * 1024);

    assert_eq!(fs::read(&dest_path).expect("read output"), contents);
}

#[test]
fn destination_parent_directories_are_created_as_needed() {
    let contents = vec![7u8; 128];
    let server = FixtureServer::start(contents.clone());
    let dest_dir = tempfile::tempdir().expect("tempdir");
    let dest_path = dest_dir.path().join("nested").join("deeper").join("out.bin");

    run_transfer(&server, 1, &dest_path, 1024);

    assert_eq!(fs::read(&dest_path).expect("read output"), contents);
}

#[test]
fn empty_file_produces_an_empty_destination() {
    let server = FixtureServer::start(Vec::new());
    let dest_dir = tempfile::tempdir().expect("tempdir");
    let dest_path = dest_dir.path().join("out.bin");

    run_transfer(&server, 1, &dest_path, 1024);

    assert_eq!(fs::read(&dest_path).expect("read output"), Vec::<u8>::new());
}
