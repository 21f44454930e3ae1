use std::{io, path::Path};

use axum::body::Bytes;
use futures::{Stream, TryStreamExt};
use tokio::fs;
use tokio_util::io::StreamReader;
use uuid::Uuid;

use crate::prelude::*;

/// Public path prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

pub struct Uploads<'a> {
  dir: &'a Path,
}

impl<'a> Uploads<'a> {
  pub fn new(dir: &'a Path) -> Self {
    Self { dir }
  }

  /// Streams `body` to disk and returns the public URL of the stored file.
  pub async fn save<S, E>(&self, original_name: &str, body: S) -> Result<String>
  where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::error::Error + Send + Sync + 'static,
  {
    fs::create_dir_all(self.dir).await?;

    let name = format!("{}-{}", Uuid::new_v4().simple(), sanitize(original_name));
    let path = self.dir.join(&name);

    let reader = StreamReader::new(body.map_err(io::Error::other));
    let mut reader = std::pin::pin!(reader);
    let mut file = fs::File::create(&path).await?;

    let written = match tokio::io::copy(&mut reader, &mut file).await {
      Ok(written) => written,
      Err(err) => {
        drop(file);
        let _ = fs::remove_file(&path).await;
        return Err(err.into());
      }
    };

    info!("Stored upload `{name}` ({written} bytes)");
    Ok(format!("{PUBLIC_PREFIX}/{name}"))
  }
}

fn sanitize(name: &str) -> String {
  // browsers may send a full client-side path
  let name = name.rsplit(['/', '\\']).next().unwrap_or_default();

  let clean: String = name
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' }
    })
    .collect();

  if clean.trim_matches('.').is_empty() { "upload.bin".into() } else { clean }
}

#[cfg(test)]
mod tests {
  use futures::stream;

  use super::*;

  #[test]
  fn test_sanitize() {
    assert_eq!(sanitize("zenon v1.zip"), "zenon_v1.zip");
    assert_eq!(sanitize("C:\\Users\\me\\build.exe"), "build.exe");
    assert_eq!(sanitize("../../etc/passwd"), "passwd");
    assert_eq!(sanitize(".."), "upload.bin");
    assert_eq!(sanitize(""), "upload.bin");
  }

  #[tokio::test]
  async fn test_save_streams_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let chunks: Vec<Result<Bytes, io::Error>> =
      vec![Ok(Bytes::from_static(b"hello ")), Ok(Bytes::from_static(b"world"))];

    let url = Uploads::new(dir.path())
      .save("build.zip", stream::iter(chunks))
      .await
      .unwrap();

    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with("-build.zip"));

    let name = url.trim_start_matches("/uploads/");
    let content = std::fs::read(dir.path().join(name)).unwrap();
    assert_eq!(content, b"hello world");
  }

  #[tokio::test]
  async fn test_failed_stream_leaves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let chunks: Vec<Result<Bytes, io::Error>> = vec![
      Ok(Bytes::from_static(b"partial")),
      Err(io::Error::other("connection reset")),
    ];

    let result = Uploads::new(dir.path()).save("a.zip", stream::iter(chunks)).await;

    assert!(matches!(result, Err(Error::Io(_))));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
  }
}
