use super::form::FILE_FIELD;
use super::types::{TransferEvent, UploadRequest};
use futures::TryStreamExt;
use reqwest::cookie::Jar;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Issues the upload request and reports its lifecycle on `events`.
///
/// Implementations must deliver exactly one terminal event (`Load`, `Error`
/// or `Abort`) and should stop transferring once `cancel` fires.
pub trait UploadTransport {
    fn send(
        &self,
        request: UploadRequest,
        events: Sender<TransferEvent>,
        cancel: CancellationToken,
    );
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    runtime: Handle,
}

impl HttpTransport {
    pub fn new(jar: Arc<Jar>, runtime: Handle) -> reqwest::Result<Self> {
        let client = Client::builder().cookie_provider(jar).build()?;
        Ok(Self { client, runtime })
    }

    /// The underlying client, sharing this transport's cookie jar.
    pub fn client(&self) -> Client {
        self.client.clone()
    }
}

impl UploadTransport for HttpTransport {
    fn send(
        &self,
        request: UploadRequest,
        events: Sender<TransferEvent>,
        cancel: CancellationToken,
    ) {
        let client = self.client.clone();
        self.runtime.spawn(async move {
            let url = request.url.to_string();
            let progress = events.clone();

            let event = tokio::select! {
                _ = cancel.cancelled() => {
                    info!(%url, "upload aborted");
                    TransferEvent::Abort
                }
                result = post_multipart(&client, request, progress) => match result {
                    Ok((status, body)) => {
                        info!(%url, status, "upload request finished");
                        TransferEvent::Load { status, body }
                    }
                    Err(reason) => {
                        warn!(%url, %reason, "upload request failed");
                        TransferEvent::Error(reason)
                    }
                },
            };

            if events.send(event).is_err() {
                debug!(%url, "upload session dropped before the terminal event");
            }
        });
    }
}

async fn post_multipart(
    client: &Client,
    request: UploadRequest,
    events: Sender<TransferEvent>,
) -> Result<(u16, String), String> {
    let UploadRequest { url, fields, file } = request;

    let handle = tokio::fs::File::open(&file.path)
        .await
        .map_err(|e| format!("Failed to read file: {}", e))?;

    let total = file.size;
    let mut loaded = 0u64;
    let stream = ReaderStream::new(handle).inspect_ok(move |chunk| {
        loaded += chunk.len() as u64;
        let _ = events.send(TransferEvent::Progress { loaded, total });
    });

    let part = Part::stream_with_length(Body::wrap_stream(stream), total)
        .file_name(file.replacement_name.clone());

    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name, value);
    }
    let form = form.part(FILE_FIELD, part);

    debug!(%url, original = %file.original_name, saved = %file.replacement_name, "sending multipart upload");

    let response = client
        .post(url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))?;

    Ok((status, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::test_server::{serve, unreachable_addr, Reply};
    use crate::upload::types::FilePart;
    use reqwest::Url;
    use std::path::{Path, PathBuf};
    use std::sync::mpsc::{channel, Receiver};
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::runtime::Runtime;

    fn sample_file(dir: &Path) -> PathBuf {
        let path = dir.join("notes.txt");
        std::fs::write(&path, b"hello world").unwrap();
        path
    }

    fn request_for(url: &Url, path: &Path) -> UploadRequest {
        UploadRequest {
            url: url.clone(),
            fields: vec![
                ("name".to_string(), "Ada".to_string()),
                ("saved_filename".to_string(), "3f2c-uuid".to_string()),
            ],
            file: FilePart {
                path: path.to_path_buf(),
                original_name: "notes.txt".to_string(),
                replacement_name: "3f2c-uuid".to_string(),
                size: 11,
            },
        }
    }

    fn until_terminal(events: &Receiver<TransferEvent>) -> (Vec<TransferEvent>, TransferEvent) {
        let mut progress = Vec::new();
        loop {
            let event = events
                .recv_timeout(Duration::from_secs(10))
                .expect("transport event");
            if event.is_terminal() {
                return (progress, event);
            }
            progress.push(event);
        }
    }

    #[test]
    fn posts_multipart_with_cookie_and_reports_load() {
        let runtime = Runtime::new().unwrap();
        let (addr, seen_rx) = serve(
            &runtime,
            vec![Reply::new(200, "application/json", r#"{"message":"File uploaded"}"#)],
        );

        let dir = tempfile::tempdir().unwrap();
        let path = sample_file(dir.path());
        let url = Url::parse(&format!("http://{}/api/upload", addr)).unwrap();
        let jar = Arc::new(Jar::default());
        jar.add_cookie_str("filesize=11", &url);

        let transport = HttpTransport::new(jar, runtime.handle().clone()).unwrap();
        let (events_tx, events) = channel();
        transport.send(request_for(&url, &path), events_tx, CancellationToken::new());

        let (progress, terminal) = until_terminal(&events);
        assert_eq!(
            progress.last(),
            Some(&TransferEvent::Progress {
                loaded: 11,
                total: 11
            })
        );
        assert_eq!(
            terminal,
            TransferEvent::Load {
                status: 200,
                body: r#"{"message":"File uploaded"}"#.to_string()
            }
        );

        let seen = seen_rx.recv_timeout(Duration::from_secs(10)).unwrap();
        let lowered = seen.to_lowercase();
        assert!(lowered.starts_with("post /api/upload"));
        assert!(lowered.contains("cookie: filesize=11"));
        assert!(seen.contains(r#"name="saved_filename""#));
        assert!(seen.contains(r#"name="file"; filename="3f2c-uuid""#));
        assert!(seen.contains("hello world"));
    }

    #[test]
    fn cancellation_reports_abort() {
        let runtime = Runtime::new().unwrap();
        let listener = runtime
            .block_on(TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let addr = listener.local_addr().unwrap();

        runtime.spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let dir = tempfile::tempdir().unwrap();
        let path = sample_file(dir.path());
        let url = Url::parse(&format!("http://{}/api/upload", addr)).unwrap();
        let transport =
            HttpTransport::new(Arc::new(Jar::default()), runtime.handle().clone()).unwrap();
        let (events_tx, events) = channel();
        let cancel = CancellationToken::new();

        transport.send(request_for(&url, &path), events_tx, cancel.clone());
        cancel.cancel();

        let (_, terminal) = until_terminal(&events);
        assert_eq!(terminal, TransferEvent::Abort);
    }

    #[test]
    fn unreachable_server_reports_error() {
        let runtime = Runtime::new().unwrap();
        let addr = unreachable_addr();

        let dir = tempfile::tempdir().unwrap();
        let path = sample_file(dir.path());
        let url = Url::parse(&format!("http://{}/api/upload", addr)).unwrap();
        let transport =
            HttpTransport::new(Arc::new(Jar::default()), runtime.handle().clone()).unwrap();
        let (events_tx, events) = channel();

        transport.send(request_for(&url, &path), events_tx, CancellationToken::new());

        let (_, terminal) = until_terminal(&events);
        assert!(matches!(terminal, TransferEvent::Error(reason) if reason.starts_with("Failed to send request")));
    }

    #[test]
    fn missing_file_reports_error() {
        let runtime = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let url = Url::parse("http://127.0.0.1:9/api/upload").unwrap();
        let transport =
            HttpTransport::new(Arc::new(Jar::default()), runtime.handle().clone()).unwrap();
        let (events_tx, events) = channel();

        transport.send(
            request_for(&url, &dir.path().join("gone.txt")),
            events_tx,
            CancellationToken::new(),
        );

        let (progress, terminal) = until_terminal(&events);
        assert!(progress.is_empty());
        assert!(matches!(terminal, TransferEvent::Error(reason) if reason.starts_with("Failed to read file")));
    }
}
