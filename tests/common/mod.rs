//! Shared fixtures for integration tests: a local HTTP server and image helpers

#![allow(dead_code)]

use image::{ImageFormat, Rgba, RgbaImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Response, Server, StatusCode};

/// Canned response for one path
#[derive(Clone)]
pub struct Route {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Route {
    pub fn html(body: &str) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".into(), "text/html; charset=utf-8".into())],
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn bytes(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".into(), content_type.into())],
            body,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: format!("status {}", status).into_bytes(),
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            headers: vec![("Location".into(), location.into())],
            body: Vec::new(),
        }
    }
}

/// HTTP server on an ephemeral localhost port, stopped on drop
pub struct TestServer {
    server: Arc<Server>,
    routes: Arc<Mutex<HashMap<String, Route>>>,
    hits: Arc<Mutex<Vec<String>>>,
    handle: Option<JoinHandle<()>>,
    base_url: String,
}

impl TestServer {
    pub fn start() -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("Failed to bind test server"));
        let addr = server
            .server_addr()
            .to_ip()
            .expect("Test server should listen on an IP address");
        let routes: Arc<Mutex<HashMap<String, Route>>> = Arc::new(Mutex::new(HashMap::new()));
        let hits = Arc::new(Mutex::new(Vec::new()));

        let worker = Arc::clone(&server);
        let worker_routes = Arc::clone(&routes);
        let worker_hits = Arc::clone(&hits);
        let handle = thread::spawn(move || {
            for request in worker.incoming_requests() {
                let path = request
                    .url()
                    .split('?')
                    .next()
                    .unwrap_or_default()
                    .to_string();
                worker_hits.lock().unwrap().push(path.clone());

                let route = worker_routes
                    .lock()
                    .unwrap()
                    .get(&path)
                    .cloned()
                    .unwrap_or_else(|| Route::status(404));

                let mut response =
                    Response::from_data(route.body).with_status_code(StatusCode(route.status));
                for (name, value) in &route.headers {
                    let header = Header::from_bytes(name.as_bytes(), value.as_bytes())
                        .expect("Invalid test header");
                    response = response.with_header(header);
                }
                let _ = request.respond(response);
            }
        });

        Self {
            server,
            routes,
            hits,
            handle: Some(handle),
            base_url: format!("http://{}", addr),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn route(&self, path: &str, route: Route) {
        self.routes.lock().unwrap().insert(path.to_string(), route);
    }

    /// Number of requests received for a path
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().iter().filter(|p| *p == path).count()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// In-memory sink for formatted tracing output
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Route INFO and above from the current thread into this capture
    ///
    /// Events are recorded until the returned guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        let buffer = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Captured lines containing `needle`
    pub fn matching(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains(needle))
            .collect()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn og_page(image_url: &str) -> String {
    format!(
        r#"<!doctype html><html><head><title>Course</title>
<meta property="og:title" content="Course">
<meta property="og:image" content="{}">
</head><body><h1>Course</h1></body></html>"#,
        image_url
    )
}

pub fn plain_page() -> String {
    "<!doctype html><html><head><title>Nothing</title></head><body><p>No images here.</p></body></html>"
        .to_string()
}

pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode PNG fixture");
    buffer.into_inner()
}

/// 20x20 white logo with a dark 8x8 mark at (5,5)..=(12,12)
pub fn logo_fixture() -> RgbaImage {
    RgbaImage::from_fn(20, 20, |x, y| {
        if (5..=12).contains(&x) && (5..=12).contains(&y) {
            Rgba([30, 30, 90, 255])
        } else {
            Rgba([252, 252, 252, 255])
        }
    })
}

/// Small opaque product thumbnail
pub fn thumbnail_fixture() -> RgbaImage {
    RgbaImage::from_pixel(6, 4, Rgba([200, 40, 40, 255]))
}
