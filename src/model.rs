//! Inbound payloads and their validation

use serde::Deserialize;

use crate::prelude::*;

/// Product line used when a request does not name one.
pub const DEFAULT_EXECUTOR: &str = "velocity";

fn required(field: &str, value: String) -> Result<String> {
  let value = value.trim();
  if value.is_empty() {
    return Err(Error::validation(format!("`{field}` must not be empty")));
  }
  Ok(value.to_string())
}

fn optional(field: &str, value: Option<String>) -> Result<Option<String>> {
  value.map(|value| required(field, value)).transpose()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertRelease {
  #[serde(default)]
  pub version: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub download_url: String,
  pub executor_type: Option<String>,
  pub is_latest: Option<bool>,
}

/// An [`InsertRelease`] that passed validation.
#[derive(Debug, Clone)]
pub struct NewRelease {
  pub version: String,
  pub title: String,
  pub description: String,
  pub download_url: String,
  pub executor_type: String,
  pub is_latest: bool,
}

impl InsertRelease {
  pub fn validate(self) -> Result<NewRelease> {
    Ok(NewRelease {
      version: required("version", self.version)?,
      title: required("title", self.title)?,
      description: required("description", self.description)?,
      download_url: required("downloadUrl", self.download_url)?,
      executor_type: optional("executorType", self.executor_type)?
        .unwrap_or_else(|| DEFAULT_EXECUTOR.to_string()),
      is_latest: self.is_latest.unwrap_or(false),
    })
  }
}

/// Partial update of a release. Absent fields are left untouched.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePatch {
  pub version: Option<String>,
  pub title: Option<String>,
  pub description: Option<String>,
  pub download_url: Option<String>,
  pub executor_type: Option<String>,
  pub is_latest: Option<bool>,
}

impl ReleasePatch {
  pub fn validate(self) -> Result<Self> {
    Ok(Self {
      version: optional("version", self.version)?,
      title: optional("title", self.title)?,
      description: optional("description", self.description)?,
      download_url: optional("downloadUrl", self.download_url)?,
      executor_type: optional("executorType", self.executor_type)?,
      is_latest: self.is_latest,
    })
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
  pub executor_type: Option<String>,
  pub is_up: bool,
}

impl StatusUpdate {
  /// Resolves the target executor, rejecting a blank one.
  pub fn validate(self) -> Result<(String, bool)> {
    let executor = optional("executorType", self.executor_type)?
      .unwrap_or_else(|| DEFAULT_EXECUTOR.to_string());
    Ok((executor, self.is_up))
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorQuery {
  pub executor_type: Option<String>,
}

impl ExecutorQuery {
  /// The requested tag, if any. Blank values count as absent.
  pub fn tag(&self) -> Option<&str> {
    self.executor_type.as_deref().map(str::trim).filter(|tag| !tag.is_empty())
  }

  pub fn tag_or_default(&self) -> &str {
    self.tag().unwrap_or(DEFAULT_EXECUTOR)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn insert() -> InsertRelease {
    InsertRelease {
      version: "v1.0.0".into(),
      title: "Initial".into(),
      description: "First release".into(),
      download_url: "https://example.com/v1.zip".into(),
      ..Default::default()
    }
  }

  #[test]
  fn test_insert_defaults() {
    let release = insert().validate().unwrap();

    assert_eq!(release.executor_type, DEFAULT_EXECUTOR);
    assert!(!release.is_latest);
  }

  #[test]
  fn test_insert_rejects_blank_fields() {
    let err = InsertRelease { title: "   ".into(), ..insert() }
      .validate()
      .unwrap_err();
    assert!(matches!(err, Error::Validation(msg) if msg.contains("title")));

    let err = InsertRelease { executor_type: Some(String::new()), ..insert() }
      .validate()
      .unwrap_err();
    assert!(matches!(err, Error::Validation(msg) if msg.contains("executorType")));
  }

  #[test]
  fn test_insert_from_camel_case_json() {
    let raw = r#"{
      "version": "v2.0.0",
      "title": "Big one",
      "description": "Rewrite",
      "downloadUrl": "/uploads/x.zip",
      "executorType": "xeno",
      "isLatest": true
    }"#;

    let release = json::from_str::<InsertRelease>(raw).unwrap().validate().unwrap();
    assert_eq!(release.download_url, "/uploads/x.zip");
    assert_eq!(release.executor_type, "xeno");
    assert!(release.is_latest);
  }

  #[test]
  fn test_missing_field_is_validation_error() {
    let raw = r#"{ "version": "v2.0.0", "title": "t", "description": "d" }"#;
    let err = json::from_str::<InsertRelease>(raw).unwrap().validate().unwrap_err();
    assert!(matches!(err, Error::Validation(msg) if msg.contains("downloadUrl")));
  }

  #[test]
  fn test_patch_keeps_absent_fields() {
    let patch = ReleasePatch { title: Some(" New ".into()), ..Default::default() }
      .validate()
      .unwrap();

    assert_eq!(patch.title.as_deref(), Some("New"));
    assert!(patch.version.is_none());
    assert!(ReleasePatch { version: Some("".into()), ..Default::default() }
      .validate()
      .is_err());
  }

  #[test]
  fn test_status_update_executor() {
    let update = StatusUpdate { executor_type: None, is_up: false };
    assert_eq!(update.validate().unwrap(), (DEFAULT_EXECUTOR.to_string(), false));

    let update = StatusUpdate { executor_type: Some(" xeno ".into()), is_up: true };
    assert_eq!(update.validate().unwrap(), ("xeno".to_string(), true));

    let update = StatusUpdate { executor_type: Some("  ".into()), is_up: false };
    let err = update.validate().unwrap_err();
    assert!(matches!(err, Error::Validation(msg) if msg.contains("executorType")));
  }

  #[test]
  fn test_query_blank_tag_is_default() {
    let query = ExecutorQuery { executor_type: Some(" ".into()) };
    assert_eq!(query.tag(), None);
    assert_eq!(query.tag_or_default(), DEFAULT_EXECUTOR);

    let query = ExecutorQuery { executor_type: Some("xeno".into()) };
    assert_eq!(query.tag_or_default(), "xeno");
  }
}
