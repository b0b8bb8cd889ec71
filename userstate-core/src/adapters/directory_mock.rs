//! Mock user directory server for testing
//!
//! A tiny HTTP server on a background thread that behaves like the
//! directory API:
//! - GET /users/?email=... returns the matching records as a JSON array
//! - POST /api/user/register records the request and returns 201

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::domain::UserProfile;

/// Mock directory server for testing
pub struct MockDirectoryServer {
    port: u16,
    running: Arc<AtomicBool>,
    registrations: Arc<Mutex<Vec<RecordedRequest>>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// Behaviour of the mock server
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Records served by the lookup endpoint
    pub users: Vec<UserProfile>,
    /// Answer every request with this status instead
    pub fail_status: Option<u16>,
    /// Serve a body that is not a user array
    pub malformed_body: bool,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

/// A request received on the registration endpoint
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub content_type: Option<String>,
    pub body: String,
}

impl MockDirectoryServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let registrations = Arc::new(Mutex::new(Vec::new()));

        // Non-blocking so the loop can notice shutdown
        listener.set_nonblocking(true)?;

        let running_clone = running.clone();
        let registrations_clone = registrations.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let recorded = registrations_clone.clone();
                        thread::spawn(move || {
                            handle_connection(stream, &cfg, &recorded);
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            registrations,
            thread_handle: Some(thread_handle),
        })
    }

    /// Get the base URL for this mock server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Get the registration URL for this mock server
    pub fn registration_url(&self) -> String {
        format!("{}/api/user/register", self.base_url())
    }

    /// Registration requests received so far
    pub fn registrations(&self) -> Vec<RecordedRequest> {
        self.registrations
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockDirectoryServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read one full request: headers plus `Content-Length` bytes of body
fn read_request(stream: &mut TcpStream) -> Option<(String, String)> {
    stream.set_nonblocking(false).ok()?;
    let mut data = Vec::new();
    let mut buffer = [0; 4096];

    loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);

        let text = String::from_utf8_lossy(&data);
        if let Some(split) = text.find("\r\n\r\n") {
            let head = text[..split].to_string();
            let content_length = head
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            let body_start = split + 4;
            if data.len() >= body_start + content_length {
                let body = String::from_utf8_lossy(&data[body_start..body_start + content_length])
                    .to_string();
                return Some((head, body));
            }
        }
    }
    None
}

fn handle_connection(
    mut stream: TcpStream,
    config: &MockConfig,
    registrations: &Mutex<Vec<RecordedRequest>>,
) {
    let Some((head, body)) = read_request(&mut stream) else {
        return;
    };

    if config.delay_ms > 0 {
        thread::sleep(std::time::Duration::from_millis(config.delay_ms));
    }

    let first_line = head.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        send_response(&mut stream, 400, "Bad Request", r#"{"error": "Invalid request"}"#);
        return;
    }
    let method = parts[0];
    let target = parts[1];

    if let Some(status) = config.fail_status {
        send_response(&mut stream, status, "Error", r#"{"error": "Simulated failure"}"#);
        return;
    }

    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    match (method, path) {
        ("GET", "/users/") | ("GET", "/users") => {
            if config.malformed_body {
                send_response(&mut stream, 200, "OK", r#"{"users": "nope"}"#);
                return;
            }
            let email = url::form_urlencoded::parse(query.as_bytes())
                .find(|(k, _)| k == "email")
                .map(|(_, v)| v.into_owned());
            let matches: Vec<&UserProfile> = config
                .users
                .iter()
                .filter(|u| email.as_deref().map_or(true, |e| u.email == e))
                .collect();
            let json = serde_json::to_string(&matches).unwrap_or_else(|_| "[]".to_string());
            send_response(&mut stream, 200, "OK", &json);
        }
        ("POST", "/api/user/register") => {
            let content_type = head
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-type"))
                .map(|(_, v)| v.trim().to_string());
            if let Ok(mut recorded) = registrations.lock() {
                recorded.push(RecordedRequest { content_type, body });
            }
            send_response(&mut stream, 201, "Created", "{}");
        }
        _ => {
            send_response(&mut stream, 404, "Not Found", r#"{"error": "Endpoint not found"}"#);
        }
    }
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http_directory::HttpUserDirectory;
    use crate::domain::result::UserError;
    use crate::domain::{Address, Geo};
    use crate::ports::UserDirectory;

    fn directory_users() -> Vec<UserProfile> {
        vec![
            UserProfile::new(1, "Ann", "ann", "ann@example.com").with_address(Address {
                street: "Kulas Light".to_string(),
                city: "Gwenborough".to_string(),
                geo: Geo { lat: -37.3159, lng: 81.1496 },
                ..Default::default()
            }),
            UserProfile::new(2, "Bob", "bob", "bob+tag@example.com"),
        ]
    }

    #[test]
    fn test_mock_server_starts() {
        let server = MockDirectoryServer::start(MockConfig::default()).unwrap();
        assert!(server.base_url().starts_with("http://127.0.0.1:"));
    }

    #[tokio::test]
    async fn test_lookup_returns_matching_record() {
        let server = MockDirectoryServer::start(MockConfig {
            users: directory_users(),
            ..Default::default()
        })
        .unwrap();

        let directory = HttpUserDirectory::new(&server.base_url()).unwrap();
        let users = directory.find_by_email("ann@example.com").await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0], directory_users()[0]);
    }

    #[tokio::test]
    async fn test_lookup_encodes_email() {
        let server = MockDirectoryServer::start(MockConfig {
            users: directory_users(),
            ..Default::default()
        })
        .unwrap();

        let directory = HttpUserDirectory::new(&server.base_url()).unwrap();
        let users = directory.find_by_email("bob+tag@example.com").await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 2);
    }

    #[tokio::test]
    async fn test_lookup_without_match_is_empty() {
        let server = MockDirectoryServer::start(MockConfig::default()).unwrap();

        let directory = HttpUserDirectory::new(&server.base_url()).unwrap();
        let users = directory.find_by_email("nobody@x.com").await.unwrap();

        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let server = MockDirectoryServer::start(MockConfig {
            fail_status: Some(500),
            ..Default::default()
        })
        .unwrap();

        let directory = HttpUserDirectory::new(&server.base_url()).unwrap();
        let err = directory.find_by_email("ann@example.com").await.unwrap_err();

        assert!(matches!(err, UserError::Network(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_rate_limit_message() {
        let server = MockDirectoryServer::start(MockConfig {
            fail_status: Some(429),
            ..Default::default()
        })
        .unwrap();

        let directory = HttpUserDirectory::new(&server.base_url()).unwrap();
        let err = directory.find_by_email("ann@example.com").await.unwrap_err();

        assert!(err.to_string().to_lowercase().contains("rate limit"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_serialization_error() {
        let server = MockDirectoryServer::start(MockConfig {
            malformed_body: true,
            ..Default::default()
        })
        .unwrap();

        let directory = HttpUserDirectory::new(&server.base_url()).unwrap();
        let err = directory.find_by_email("ann@example.com").await.unwrap_err();

        assert!(matches!(err, UserError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_unreachable_directory_is_network_error() {
        let server = MockDirectoryServer::start(MockConfig::default()).unwrap();
        let base_url = server.base_url();
        drop(server);

        let directory = HttpUserDirectory::new(&base_url).unwrap();
        let err = directory.find_by_email("ann@example.com").await.unwrap_err();

        assert!(matches!(err, UserError::Network(_)));
    }

    #[tokio::test]
    async fn test_register_posts_wrapped_json() {
        let server = MockDirectoryServer::start(MockConfig::default()).unwrap();
        let directory = HttpUserDirectory::with_timeout(
            &server.base_url(),
            Some(&server.registration_url()),
            5,
        )
        .unwrap();

        let profile = directory_users()[0].clone();
        directory.register(&profile).await.unwrap();

        let recorded = server.registrations();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].content_type.as_deref(), Some("application/json"));

        let body: serde_json::Value = serde_json::from_str(&recorded[0].body).unwrap();
        let sent: UserProfile = serde_json::from_value(body["user"].clone()).unwrap();
        assert_eq!(sent, profile);
    }

    #[tokio::test]
    async fn test_register_failure_status() {
        let server = MockDirectoryServer::start(MockConfig {
            fail_status: Some(503),
            ..Default::default()
        })
        .unwrap();
        let directory = HttpUserDirectory::with_timeout(
            &server.base_url(),
            Some(&server.registration_url()),
            5,
        )
        .unwrap();

        let err = directory.register(&UserProfile::default()).await.unwrap_err();
        assert!(matches!(err, UserError::Network(_)));
    }
}
