#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub enum Reply {
    Page(u16, String),
    Redirect(String),
    /// Waits before answering with a 200 page
    Slow(Duration, String),
}

/// Minimal HTTP/1.1 server answering canned replies by path.
pub struct Stub {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    pub async fn start(routes: Vec<(&str, Reply)>) -> Self {
        let routes: HashMap<String, Reply> = routes
            .into_iter()
            .map(|(path, reply)| (path.to_string(), reply))
            .collect();
        let routes = Arc::new(routes);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let requests_c = requests.clone();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let routes = routes.clone();
                let requests = requests_c.clone();
                tokio::spawn(async move {
                    let Some(head) = read_head(&mut socket).await else {
                        return;
                    };
                    requests.lock().unwrap().push(head.clone());

                    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let path = target.split('?').next().unwrap_or("/").to_string();

                    let reply = match routes.get(&path).cloned() {
                        Some(Reply::Page(status, body)) => response(status, &[], &body),
                        Some(Reply::Redirect(location)) => {
                            response(301, &[("Location", location.as_str())], "")
                        }
                        Some(Reply::Slow(delay, body)) => {
                            tokio::time::sleep(delay).await;
                            response(200, &[], &body)
                        }
                        None => response(404, &[], "no such page"),
                    };
                    socket.write_all(reply.as_bytes()).await.ok();
                    socket.shutdown().await.ok();
                });
            }
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/courses/", self.addr)
    }

    /// Request heads received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Some(String::from_utf8_lossy(&buf).to_string())
}

fn response(status: u16, headers: &[(&str, &str)], body: &str) -> String {
    let mut resp = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n",
        body.len()
    );
    for (name, value) in headers {
        resp.push_str(&format!("{name}: {value}\r\n"));
    }
    resp.push_str("\r\n");
    resp.push_str(body);
    resp
}

/// A course page with one syllabus and one objectives entry.
pub fn course_page(topic: &str, objective: &str) -> String {
    format!(
        "<html><body>\
         <h2>Syllabus</h2><ul><li>{topic}</li></ul>\
         <h2>Objectives</h2><p>Students will:</p><ul><li>{objective}</li></ul>\
         <h2>Assessment</h2><p>Exam</p>\
         </body></html>"
    )
}
