use std::sync::Arc;

use axum::{
  Json,
  extract::{FromRequest, Multipart, Path, Query, State},
  http::StatusCode,
};
use serde::Serialize;

use crate::{
  entity::{release, system_status},
  model::{ExecutorQuery, InsertRelease, ReleasePatch, StatusUpdate},
  prelude::*,
  state::AppState,
};

/// JSON body extractor answering malformed input with a `{message}` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Payload<T>(pub T);

fn parse_id(raw: &str) -> Result<i32> {
  raw.trim().parse().map_err(|_| Error::InvalidId)
}

#[derive(Debug, Serialize)]
pub struct Success {
  pub success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRes {
  pub success: bool,
  pub new_count: i32,
}

#[derive(Debug, Serialize)]
pub struct UploadRes {
  pub url: String,
}

pub async fn health() -> &'static str {
  "OK"
}

pub async fn list_releases(
  State(app): State<Arc<AppState>>,
  Query(query): Query<ExecutorQuery>,
) -> Result<Json<Vec<release::Model>>> {
  Ok(Json(app.sv().release.list(query.tag()).await?))
}

pub async fn latest_release(
  State(app): State<Arc<AppState>>,
  Query(query): Query<ExecutorQuery>,
) -> Result<Json<release::Model>> {
  let release = app
    .sv()
    .release
    .latest(query.tag_or_default())
    .await?
    .ok_or(Error::NoReleases)?;
  Ok(Json(release))
}

pub async fn create_release(
  State(app): State<Arc<AppState>>,
  Payload(req): Payload<InsertRelease>,
) -> Result<(StatusCode, Json<release::Model>)> {
  let release = app.sv().release.create(req.validate()?).await?;
  Ok((StatusCode::CREATED, Json(release)))
}

pub async fn update_release(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
  Payload(patch): Payload<ReleasePatch>,
) -> Result<Json<release::Model>> {
  let id = parse_id(&id)?;
  let release = app
    .sv()
    .release
    .update(id, patch.validate()?)
    .await?
    .ok_or(Error::ReleaseNotFound)?;
  Ok(Json(release))
}

pub async fn delete_release(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<Success>> {
  let id = parse_id(&id)?;
  if !app.sv().release.delete(id).await? {
    return Err(Error::ReleaseNotFound);
  }
  Ok(Json(Success { success: true }))
}

pub async fn track_download(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<DownloadRes>> {
  let id = parse_id(&id)?;
  let release = app
    .sv()
    .release
    .increment_downloads(id)
    .await?
    .ok_or(Error::ReleaseNotFound)?;

  Ok(Json(DownloadRes { success: true, new_count: release.download_count }))
}

pub async fn get_status(
  State(app): State<Arc<AppState>>,
  Query(query): Query<ExecutorQuery>,
) -> Result<Json<system_status::Model>> {
  Ok(Json(app.sv().status.get(query.tag_or_default()).await?))
}

pub async fn update_status(
  State(app): State<Arc<AppState>>,
  Payload(req): Payload<StatusUpdate>,
) -> Result<Json<system_status::Model>> {
  let (executor, is_up) = req.validate()?;
  let status = app.sv().status.update(&executor, is_up).await?;
  Ok(Json(status))
}

pub async fn upload(
  State(app): State<Arc<AppState>>,
  mut multipart: Multipart,
) -> Result<Json<UploadRes>> {
  while let Some(field) = multipart.next_field().await? {
    if field.name() != Some("file") {
      continue;
    }

    let name = field.file_name().unwrap_or_default().to_string();
    let url = app
      .sv()
      .uploads
      .save(&name, field)
      .await
      .map_err(Error::into_upload_cause)?;
    return Ok(Json(UploadRes { url }));
  }

  Err(Error::MissingUpload)
}
