//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed route table: GET on the results path returns an HTML page
//! of result tiles (the query string is ignored), and any path can be given a
//! canned status and content type for HEAD reachability checks. Every
//! request line is recorded.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// Canned response for one path.
#[derive(Debug, Clone)]
pub struct Route {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl Route {
    pub fn image() -> Self {
        Self {
            status: "200 OK",
            content_type: "image/jpeg",
            body: String::new(),
        }
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: "200 OK",
            content_type: "text/html; charset=utf-8",
            body: body.into(),
        }
    }

    pub fn status(status: &'static str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: String::new(),
        }
    }
}

type Routes = Arc<Mutex<HashMap<String, Route>>>;

pub struct TestServer {
    /// Base URL ending in `/`, e.g. `http://127.0.0.1:12345/`.
    pub base: String,
    routes: Routes,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Add or replace the response for `path` (no query string).
    pub fn route(&self, path: &str, route: Route) {
        self.routes.lock().unwrap().insert(path.to_string(), route);
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    /// Request lines seen so far ("GET /path?query HTTP/1.1").
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path_prefix: &str) -> usize {
        let prefix = format!("{method} {path_prefix}");
        self.requests()
            .iter()
            .filter(|r| r.starts_with(&prefix))
            .count()
    }
}

/// Results page with one `a.iusc` tile per image URL.
pub fn results_page(image_urls: &[String]) -> String {
    let tiles: String = image_urls
        .iter()
        .map(|u| {
            format!(
                "<div class=\"imgpt\"><a class=\"iusc\" m='{{\"murl\":\"{u}\",\"turl\":\"{u}?thumb\"}}' href=\"#\"></a></div>"
            )
        })
        .collect();
    format!("<!DOCTYPE html><html><body><div id=\"mmComponent\">{tiles}</div></body></html>")
}

/// Starts an empty server on a background thread; add paths with
/// [`TestServer::route`]. Paths are matched without the query string and
/// unknown paths get 404. The server runs until the process exits.
pub fn start() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Routes = Arc::new(Mutex::new(HashMap::new()));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let (table, log) = (Arc::clone(&routes), Arc::clone(&requests));
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let table = Arc::clone(&table);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &table, &log));
        }
    });
    TestServer {
        base: format!("http://127.0.0.1:{}/", port),
        routes,
        requests,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &Mutex<HashMap<String, Route>>,
    log: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let request_line = request.lines().next().unwrap_or("").trim().to_string();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("/");
    let path = target.split('?').next().unwrap_or("/").to_string();
    log.lock().unwrap().push(request_line.clone());

    let route = routes
        .lock()
        .unwrap()
        .get(&path)
        .cloned()
        .unwrap_or_else(|| Route::status("404 Not Found"));
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.status,
        route.content_type,
        route.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    if method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(route.body.as_bytes());
    }
}
