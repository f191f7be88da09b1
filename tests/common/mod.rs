#![allow(dead_code)]

use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;

use tempfile::TempDir;

pub const SALINA_CSV: &str = "category,daytime,recommendation\n\
solo,evening,Night tour|Photography spot\n\
solo,morning,Salt lake boat|Wheel ride\n\
family,morning,Playground|Mini golf\n\
,,\n";

/// Temporary site root holding `/assets/recommendations/<file>`.
pub fn site_with(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("failed creating tempdir");
    let target = dir.path().join("assets/recommendations");
    fs::create_dir_all(&target).expect("failed creating asset dir");
    for (name, body) in files {
        write(&target.join(name), body);
    }
    dir
}

fn write(path: &Path, body: &str) {
    fs::write(path, body).expect("failed writing dataset");
}

/// Serve one HTTP response; the handle yields the request line and headers.
pub fn serve_once(status: u16, body: &str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed binding listener");
    let addr = listener.local_addr().expect("listener has no address");
    let body = body.as_bytes().to_vec();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("no client connected");
        let mut received = Vec::new();
        let mut chunk = [0u8; 1024];
        while !received.windows(4).any(|window| window == b"\r\n\r\n") {
            let read = stream.read(&mut chunk).unwrap_or(0);
            if read == 0 {
                break;
            }
            received.extend_from_slice(&chunk[..read]);
        }
        let head = format!(
            "HTTP/1.1 {status} Status\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).expect("failed writing headers");
        stream.write_all(&body).expect("failed writing body");
        let _ = stream.flush();
        String::from_utf8_lossy(&received).into_owned()
    });
    (format!("http://{addr}"), handle)
}
