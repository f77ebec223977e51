#![allow(dead_code)]

use std::{
    env,
    io::{ErrorKind, Read as _, Write as _},
    net::{SocketAddr, TcpListener},
    sync::{Arc, Mutex},
    thread::JoinHandle,
    time::{Duration, Instant},
};

use ec2_query::{BlockingTransport, Error, HttpResponse, Region, Transport};
use url::Url;

pub(crate) struct LiveConfig {
    pub(crate) access_key: String,
    pub(crate) secret_key: String,
    pub(crate) region: Region,
}

pub(crate) fn load_live_config() -> Result<Option<LiveConfig>, Error> {
    let Ok(access_key) = env::var("EC2_TEST_ACCESS_KEY") else {
        return Ok(None);
    };
    let Ok(secret_key) = env::var("EC2_TEST_SECRET_KEY") else {
        return Ok(None);
    };

    let region = env::var("EC2_TEST_REGION")
        .unwrap_or_else(|_| "us-east-1".to_string());
    let region = Region::new(region)?;

    Ok(Some(LiveConfig {
        access_key,
        secret_key,
        region,
    }))
}

/// Serves one canned HTTP response per accepted connection and records the raw requests.
pub(crate) struct TestServer {
    pub(crate) addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub(crate) fn start(status_line: &str, body: &str, connections: usize) -> Result<Self, Error> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|e| Error::transport("failed to bind test server", Some(Box::new(e))))?;
        listener
            .set_nonblocking(true)
            .map_err(|e| Error::transport("failed to configure test server", Some(Box::new(e))))?;
        let addr = listener.local_addr().map_err(|e| {
            Error::transport("failed to read test server address", Some(Box::new(e)))
        })?;

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: text/xml;charset=UTF-8\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        let handle = std::thread::spawn(move || {
            let deadline = Instant::now() + Duration::from_secs(5);
            let mut served = 0;
            while served < connections {
                match listener.accept() {
                    Ok((mut stream, _)) => {
                        let _ = stream.set_nonblocking(false);
                        let _ = stream.set_read_timeout(Some(Duration::from_secs(1)));
                        let mut request = Vec::new();
                        let mut buf = [0u8; 1024];
                        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                            match stream.read(&mut buf) {
                                Ok(0) => break,
                                Ok(n) => request.extend_from_slice(&buf[..n]),
                                Err(_) => break,
                            }
                        }
                        if let Ok(mut guard) = seen.lock() {
                            guard.push(String::from_utf8_lossy(&request).into_owned());
                        }
                        let _ = stream.write_all(response.as_bytes());
                        let _ = stream.flush();
                        served += 1;
                    }
                    Err(err) if err.kind() == ErrorKind::WouldBlock => {
                        if Instant::now() >= deadline {
                            break;
                        }
                        std::thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            addr,
            requests,
            handle: Some(handle),
        })
    }

    /// Waits for the server thread and returns the request heads it received.
    pub(crate) fn finish(mut self) -> Vec<String> {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

/// Sends every request to a local address while keeping path and query intact.
pub(crate) struct LocalTransport {
    target: SocketAddr,
    inner: BlockingTransport,
    pub(crate) original_urls: Arc<Mutex<Vec<Url>>>,
}

impl LocalTransport {
    pub(crate) fn new(target: SocketAddr) -> Self {
        Self {
            target,
            inner: BlockingTransport::new(None, Some(Duration::from_secs(5))),
            original_urls: Arc::default(),
        }
    }
}

impl Transport for LocalTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, Error> {
        if let Ok(mut guard) = self.original_urls.lock() {
            guard.push(url.clone());
        }

        let mut local = url.clone();
        local
            .set_scheme("http")
            .map_err(|_| Error::configuration("cannot rewrite scheme"))?;
        local
            .set_ip_host(self.target.ip())
            .map_err(|_| Error::configuration("cannot rewrite host"))?;
        local
            .set_port(Some(self.target.port()))
            .map_err(|_| Error::configuration("cannot rewrite port"))?;
        self.inner.get(&local)
    }
}
