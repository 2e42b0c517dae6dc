//! Feed file output.
//!
//! One file per admitted store, named by store identifier, overwritten on
//! every run. The document arrives fully materialized, so a single write
//! either succeeds completely or leaves the previous file in place.

use std::io;
use std::path::{Path, PathBuf};

/// Write a store's feed document to `{output_dir}/{store_id}.xml`.
///
/// # Errors
///
/// Returns the underlying I/O error if the write fails.
pub async fn write_feed(output_dir: &Path, store_id: &str, xml: &str) -> io::Result<PathBuf> {
    let path = output_dir.join(format!("{store_id}.xml"));
    tokio::fs::write(&path, xml).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_feed_creates_named_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_feed(dir.path(), "dandan", "<rss/>")
            .await
            .expect("write");

        assert_eq!(path, dir.path().join("dandan.xml"));
        let content = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(content, "<rss/>");
    }

    #[tokio::test]
    async fn test_write_feed_overwrites_previous_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_feed(dir.path(), "dandan", "<rss>old</rss>")
            .await
            .expect("first write");
        let path = write_feed(dir.path(), "dandan", "<rss>new</rss>")
            .await
            .expect("second write");

        let content = std::fs::read_to_string(path).expect("read back");
        assert_eq!(content, "<rss>new</rss>");
    }

    #[tokio::test]
    async fn test_write_feed_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope");
        assert!(write_feed(&missing, "dandan", "<rss/>").await.is_err());
    }
}
