// ABOUTME: Test helper utilities for scripting transport responses and mock servers
// ABOUTME: Provides a recording stub transport and canned provider payloads

use async_trait::async_trait;
use mockito::{Server, ServerGuard};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::UploadError;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::Result;

pub async fn mock_server() -> ServerGuard {
    Server::new_async().await
}

#[derive(Default)]
struct StubState {
    responses: VecDeque<Result<HttpResponse>>,
    requests: Vec<HttpRequest>,
}

/// Transport that replays scripted responses and records every request it sees
#[derive(Clone, Default)]
pub struct StubTransport {
    state: Arc<Mutex<StubState>>,
    delay: Option<Duration>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_status(&self, status: u16, body: &str) {
        self.push_response(HttpResponse::new(status, body.to_string()));
    }

    pub fn push_json(&self, body: serde_json::Value) {
        self.push_response(HttpResponse::new(200, body.to_string()));
    }

    pub fn push_response(&self, response: HttpResponse) {
        self.state.lock().unwrap().responses.push_back(Ok(response));
    }

    pub fn push_error(&self, error: UploadError) {
        self.state.lock().unwrap().responses.push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests()
            .pop()
            .expect("stub transport received no requests")
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.state.lock().unwrap().requests.push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.state
            .lock()
            .unwrap()
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(UploadError::invalid_response("stub", "no scripted response")))
    }
}

/// Smallest buffer the sniffer recognizes as PNG, padded to 10 bytes
pub fn png_bytes() -> Vec<u8> {
    vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00]
}

pub fn mock_imgbb_success() -> serde_json::Value {
    json!({
        "data": {
            "id": "2ndCYJK",
            "title": "pic",
            "url_viewer": "https://ibb.co/2ndCYJK",
            "url": "https://i.ibb.co/w04Prt6/pic.png",
            "display_url": "https://i.ibb.co/98W13PY/pic.png",
            "width": "1",
            "height": "1",
            "size": 42,
            "delete_url": "https://ibb.co/2ndCYJK/670a7e48ddcb85ac340c717a41047e5c"
        },
        "success": true,
        "status": 200
    })
}

pub fn mock_imgur_success() -> serde_json::Value {
    json!({
        "data": {
            "id": "orunSTu",
            "title": "pic",
            "type": "image/png",
            "width": 1,
            "height": 1,
            "size": 42,
            "deletehash": "x70po4w7BVvSUzZ",
            "link": "https://i.imgur.com/orunSTu.png"
        },
        "success": true,
        "status": 200
    })
}

pub fn mock_freeimage_success() -> serde_json::Value {
    json!({
        "status_code": 200,
        "success": { "message": "image uploaded", "code": 200 },
        "image": {
            "name": "pic",
            "extension": "png",
            "width": 1,
            "height": 1,
            "size": 42,
            "id_encoded": "Xz1A3f",
            "url": "https://iili.io/Xz1A3f.png",
            "url_viewer": "https://freeimage.host/i/Xz1A3f",
            "delete_url": "https://freeimage.host/Xz1A3f/delete/abcdef"
        },
        "status_txt": "OK"
    })
}

pub fn mock_imghippo_success() -> serde_json::Value {
    json!({
        "success": true,
        "status": 200,
        "message": "Image uploaded successfully.",
        "data": {
            "title": "pic",
            "url": "https://i.imghippo.com/files/Hx8261Ao.png",
            "view_url": "https://imghippo.com/i/Hx8261Ao.png",
            "extension": "png",
            "size": 42,
            "created_at": "2024-11-02 10:12:40"
        }
    })
}

pub fn mock_weibo_success() -> &'static str {
    r#"<?xml version="1.0" encoding="utf-8"?><root><data>eyJ1aWQiOjEyMzR9</data><pics><pic_1><width>640</width><size>4242</size><ret>1</ret><height>480</height><name>pic_1</name><pid>006gLxCfly1hq8abcdefj30hs0dcq3b</pid></pic_1></pics></root>"#
}
