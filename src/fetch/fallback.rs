// src/fetch/fallback.rs

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::sheet::{FallbackSnapshot, RawPayload};

/// Load the local snapshot and reshape it into a column-major payload.
pub async fn load_fallback(path: impl AsRef<Path>) -> Result<RawPayload> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading fallback snapshot");

    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let snapshot: FallbackSnapshot = serde_json::from_str(&text)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    let payload = snapshot.into_payload();

    info!(columns = payload.values.len(), "loaded fallback snapshot");
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_snapshot_with_headers() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(
            tmp,
            r#"{{"headers": ["Job Title", "Salary Range"], "values": [["Dev"], ["$50,000"]]}}"#
        )?;

        let payload = load_fallback(tmp.path()).await?;
        assert_eq!(payload.range, "JobBoard!A:I");
        assert_eq!(payload.major_dimension.as_deref(), Some("COLUMNS"));
        assert_eq!(payload.values[1], vec!["Salary Range", "$50,000"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_or_malformed_snapshot() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(load_fallback(dir.path().join("data.json")).await.is_err());

        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "<html>not json</html>")?;
        assert!(load_fallback(tmp.path()).await.is_err());
        Ok(())
    }
}
