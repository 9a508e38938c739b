// src/fetch/mod.rs

pub mod fallback;

pub use fallback::load_fallback;

use anyhow::{Context, Result};
use reqwest::Client;
use std::{future::Future, path::PathBuf};
use tracing::{error, info, warn};
use url::Url;

use crate::config::Config;
use crate::sheet::RawPayload;

/// Where a successfully fetched payload came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PayloadOrigin {
    Sheet,
    Snapshot,
}

impl PayloadOrigin {
    pub fn as_str(&self) -> &str {
        match self {
            PayloadOrigin::Sheet => "sheet",
            PayloadOrigin::Snapshot => "snapshot",
        }
    }
}

/// Result of one pass through the primary source and, if needed, the fallback.
#[derive(Debug)]
pub enum FetchOutcome {
    Success {
        payload: RawPayload,
        origin: PayloadOrigin,
    },
    /// The sheet failed and no fallback was configured.
    SourceFailed { error: anyhow::Error },
    /// The sheet failed and so did the fallback snapshot.
    FallbackFailed {
        source_error: anyhow::Error,
        fallback_error: anyhow::Error,
    },
}

impl FetchOutcome {
    pub fn payload(&self) -> Option<&RawPayload> {
        match self {
            FetchOutcome::Success { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// Anything that can hand over a raw sheet payload.
pub trait DataSource {
    fn fetch(&self) -> impl Future<Output = FetchOutcome> + Send;
}

/// Fetches the sheet export over HTTP, falling back to a local snapshot.
#[derive(Clone, Debug)]
pub struct SheetClient {
    client: Client,
    sheet_url: Url,
    fallback_path: Option<PathBuf>,
}

impl SheetClient {
    pub fn new(config: &Config) -> Result<Self> {
        let sheet_url = Url::parse(&config.sheet_url)
            .with_context(|| format!("parsing sheet URL {}", config.sheet_url))?;
        let client = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .context("building HTTP client")?;
        Ok(Self::with_client(
            client,
            sheet_url,
            config.fallback_path.clone(),
        ))
    }

    pub fn with_client(client: Client, sheet_url: Url, fallback_path: Option<PathBuf>) -> Self {
        Self {
            client,
            sheet_url,
            fallback_path,
        }
    }

    /// GET the sheet endpoint and decode the payload. Non-2xx is an error.
    pub async fn fetch_sheet(&self) -> Result<RawPayload> {
        let url = &self.sheet_url;
        let payload: RawPayload = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .json()
            .await
            .with_context(|| format!("decoding payload from {}", url))?;

        let rows = payload
            .values
            .first()
            .map(|v| v.len().saturating_sub(1))
            .unwrap_or(0);
        info!(columns = payload.values.len(), rows, "fetched job data from sheet");
        Ok(payload)
    }
}

impl DataSource for SheetClient {
    async fn fetch(&self) -> FetchOutcome {
        let source_error = match self.fetch_sheet().await {
            Ok(payload) => {
                return FetchOutcome::Success {
                    payload,
                    origin: PayloadOrigin::Sheet,
                }
            }
            Err(e) => e,
        };
        error!(
            url = %self.sheet_url,
            error = %format!("{:#}", source_error),
            "error fetching job data"
        );

        let Some(path) = &self.fallback_path else {
            warn!("no fallback snapshot configured");
            return FetchOutcome::SourceFailed {
                error: source_error,
            };
        };

        match load_fallback(path).await {
            Ok(payload) => FetchOutcome::Success {
                payload,
                origin: PayloadOrigin::Snapshot,
            },
            Err(fallback_error) => {
                error!(error = %format!("{:#}", fallback_error), "failed to load fallback data");
                FetchOutcome::FallbackFailed {
                    source_error,
                    fallback_error,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response on a random local port.
    async fn serve_once(status: &'static str, body: &str) -> Result<Url> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let body = body.to_string();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        Ok(Url::parse(&format!("http://{}/api/sheet", addr))?)
    }

    /// A URL nothing is listening on.
    async fn dead_url() -> Result<Url> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);
        Ok(Url::parse(&format!("http://{}/api/sheet", addr))?)
    }

    fn snapshot_file() -> Result<NamedTempFile> {
        let mut tmp = NamedTempFile::new()?;
        write!(
            tmp,
            r#"{{"headers": ["Job Title"], "values": [["From Snapshot"]]}}"#
        )?;
        Ok(tmp)
    }

    #[tokio::test]
    async fn test_fetch_from_sheet() -> Result<()> {
        let url = serve_once(
            "200 OK",
            r#"{"range":"JobBoard!A:I","majorDimension":"ROWS","values":[["Job Title"],["Dev"]]}"#,
        )
        .await?;
        let client = SheetClient::with_client(Client::new(), url, None);

        match client.fetch().await {
            FetchOutcome::Success { payload, origin } => {
                assert_eq!(origin, PayloadOrigin::Sheet);
                assert_eq!(payload.values, vec![vec!["Job Title"], vec!["Dev"]]);
            }
            other => panic!("expected success, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_http_error_uses_snapshot() -> Result<()> {
        let url = serve_once("500 Internal Server Error", "{}").await?;
        let snapshot = snapshot_file()?;
        let client =
            SheetClient::with_client(Client::new(), url, Some(snapshot.path().to_path_buf()));

        match client.fetch().await {
            FetchOutcome::Success { payload, origin } => {
                assert_eq!(origin, PayloadOrigin::Snapshot);
                assert_eq!(payload.values[0], vec!["Job Title", "From Snapshot"]);
            }
            other => panic!("expected snapshot, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_source_failed_without_fallback() -> Result<()> {
        let client = SheetClient::with_client(Client::new(), dead_url().await?, None);
        let outcome = client.fetch().await;
        assert!(matches!(outcome, FetchOutcome::SourceFailed { .. }));
        assert!(outcome.payload().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_both_sources_failed() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let client = SheetClient::with_client(
            Client::new(),
            dead_url().await?,
            Some(dir.path().join("missing.json")),
        );
        assert!(matches!(
            client.fetch().await,
            FetchOutcome::FallbackFailed { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_garbage_body_is_a_failure() -> Result<()> {
        let url = serve_once("200 OK", "definitely not json").await?;
        let client = SheetClient::with_client(Client::new(), url, None);
        assert!(client.fetch_sheet().await.is_err());
        Ok(())
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let config = Config {
            sheet_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(SheetClient::new(&config).is_err());
    }
}
