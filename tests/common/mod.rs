#![allow(dead_code)]

use json_table::data::datatable::DataRow;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// The two-state dataset used throughout the scenarios
pub fn texas_ohio() -> Vec<DataRow> {
    vec![
        DataRow::new().with("state", "Texas").with("pop", 29_000_000),
        DataRow::new().with("state", "Ohio").with("pop", 11_800_000),
    ]
}

pub fn state_names(rows: &[DataRow]) -> Vec<String> {
    rows.iter()
        .map(|r| r.get("state").map(|v| v.to_string()).unwrap_or_default())
        .collect()
}

/// Serve exactly one HTTP response on a random local port and return its URL
pub fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://{}/data.json", addr)
}

/// A URL nothing listens on
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{}/data.json", addr)
}
