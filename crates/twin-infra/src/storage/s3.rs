//! S3 session store.
//!
//! One object per session at `{session_id}.json` in a single bucket. S3
//! replaces objects atomically, so a single `PutObject` satisfies the
//! whole-log overwrite contract.

use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use twin_core::session::store::SessionStore;
use twin_types::chat::{Message, SessionId};
use twin_types::error::StoreError;

use super::{LOG_CONTENT_TYPE, decode_log, encode_log};

/// Object-storage-backed session store.
pub struct S3SessionStore {
    client: Client,
    bucket: String,
}

impl S3SessionStore {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl SessionStore for S3SessionStore {
    fn name(&self) -> &str {
        "s3"
    }

    async fn load(&self, session_id: &SessionId) -> Result<Vec<Message>, StoreError> {
        let key = session_id.storage_key();

        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) if matches!(err.as_service_error(), Some(GetObjectError::NoSuchKey(_))) => {
                debug!(bucket = %self.bucket, key = %key, "No conversation log yet");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(StoreError::Backend(format!(
                    "GetObject s3://{}/{key}: {}",
                    self.bucket,
                    DisplayErrorContext(&err)
                )));
            }
        };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Backend(format!("reading s3://{}/{key}: {e}", self.bucket)))?
            .into_bytes();

        decode_log(&bytes)
    }

    async fn save(&self, session_id: &SessionId, messages: &[Message]) -> Result<(), StoreError> {
        let key = session_id.storage_key();
        let body = encode_log(messages)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(LOG_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| {
                StoreError::Backend(format!(
                    "PutObject s3://{}/{key}: {}",
                    self.bucket,
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(
            bucket = %self.bucket,
            key = %key,
            messages = messages.len(),
            "Conversation log saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use aws_sdk_s3::config::retry::RetryConfig;
    use aws_sdk_s3::config::{
        BehaviorVersion, Credentials, Region, RequestChecksumCalculation,
        ResponseChecksumValidation,
    };
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;
    use crate::storage::LocalSessionStore;

    type Objects = Arc<Mutex<HashMap<String, Vec<u8>>>>;

    const NO_SUCH_KEY: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
        <Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message>\
        <RequestId>test</RequestId></Error>";

    /// A client for `endpoint` with path-style addressing and retries off.
    fn store_at(endpoint: &str) -> S3SessionStore {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "static"))
            .endpoint_url(endpoint)
            .force_path_style(true)
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
            .retry_config(RetryConfig::disabled())
            .build();
        S3SessionStore::new(Client::from_conf(config), "twin-memory".to_string())
    }

    /// A client pointed at a closed local port.
    fn unreachable_store() -> S3SessionStore {
        store_at("http://127.0.0.1:1")
    }

    /// Minimal in-memory S3: PUT stores the body by path, GET returns it or
    /// a `NoSuchKey` error.
    async fn spawn_fake_s3() -> (String, Objects) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let objects = Objects::default();

        let shared = objects.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(serve_connection(socket, shared.clone()));
            }
        });

        (endpoint, objects)
    }

    async fn serve_connection(mut socket: TcpStream, objects: Objects) {
        let mut buf = Vec::new();
        loop {
            let header_end = loop {
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
                let mut chunk = [0u8; 4096];
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            };

            let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
            let mut lines = head.lines();
            let mut request_line = lines.next().unwrap_or_default().split_whitespace();
            let method = request_line.next().unwrap_or_default().to_string();
            let target = request_line.next().unwrap_or_default();
            let path = target.split('?').next().unwrap_or_default().to_string();

            let mut content_length = 0;
            for line in lines {
                if let Some((name, value)) = line.split_once(':') {
                    let name = name.trim().to_ascii_lowercase();
                    if name == "content-length" {
                        content_length = value.trim().parse().unwrap_or(0);
                    } else if name == "expect" {
                        let _ = socket.write_all(b"HTTP/1.1 100 Continue\r\n\r\n").await;
                    }
                }
            }

            while buf.len() < header_end + content_length {
                let mut chunk = [0u8; 4096];
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let body = buf[header_end..header_end + content_length].to_vec();
            buf.drain(..header_end + content_length);

            let (status, content_type, payload) = match method.as_str() {
                "PUT" => {
                    objects.lock().unwrap().insert(path, body);
                    ("200 OK", "application/xml", Vec::new())
                }
                "GET" => match objects.lock().unwrap().get(&path) {
                    Some(stored) => ("200 OK", "application/json", stored.clone()),
                    None => ("404 Not Found", "application/xml", NO_SUCH_KEY.as_bytes().to_vec()),
                },
                _ => ("405 Method Not Allowed", "application/xml", Vec::new()),
            };

            let response_head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n\
                 ETag: \"test\"\r\nx-amz-request-id: test\r\n\r\n",
                payload.len()
            );
            if socket.write_all(response_head.as_bytes()).await.is_err()
                || socket.write_all(&payload).await.is_err()
            {
                return;
            }
        }
    }

    #[tokio::test]
    async fn test_missing_object_loads_as_empty_log() {
        let (endpoint, _objects) = spawn_fake_s3().await;
        let store = store_at(&endpoint);

        let log = store.load(&SessionId::from("new-visitor")).await.unwrap();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let (endpoint, objects) = spawn_fake_s3().await;
        let store = store_at(&endpoint);
        let id = SessionId::from("abc");
        let log = vec![Message::user("Où travaillez-vous ?"), Message::assistant("À Lyon.")];

        store.save(&id, &log).await.unwrap();
        assert_eq!(store.load(&id).await.unwrap(), log);

        let longer = vec![
            log[0].clone(),
            log[1].clone(),
            Message::user("Depuis quand ?"),
            Message::assistant("2019."),
        ];
        store.save(&id, &longer).await.unwrap();
        assert_eq!(store.load(&id).await.unwrap(), longer);
        assert_eq!(objects.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_object_matches_local_file_bytes() {
        let (endpoint, objects) = spawn_fake_s3().await;
        let store = store_at(&endpoint);
        let dir = tempfile::TempDir::new().unwrap();
        let local = LocalSessionStore::new(dir.path().to_path_buf());
        let id = SessionId::from("same");
        let log = vec![Message::user("hi"), Message::assistant("hello")];

        store.save(&id, &log).await.unwrap();
        local.save(&id, &log).await.unwrap();

        let object = objects
            .lock()
            .unwrap()
            .get("/twin-memory/same.json")
            .cloned()
            .unwrap();
        let file = tokio::fs::read(local.log_path(&id)).await.unwrap();
        assert_eq!(object, file);

        // Either backend reads what the other wrote.
        tokio::fs::write(dir.path().join("from-s3.json"), &object)
            .await
            .unwrap();
        assert_eq!(local.load(&SessionId::from("from-s3")).await.unwrap(), log);
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails_load() {
        let store = unreachable_store();
        let err = store.load(&SessionId::from("abc")).await.unwrap_err();
        match err {
            StoreError::Backend(msg) => assert!(msg.contains("s3://twin-memory/abc.json")),
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails_save() {
        let store = unreachable_store();
        let err = store
            .save(&SessionId::from("abc"), &[Message::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn test_store_metadata() {
        let store = unreachable_store();
        assert_eq!(store.name(), "s3");
        assert_eq!(store.bucket(), "twin-memory");
    }
}
