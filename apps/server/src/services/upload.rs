//! Output.xml upload handling: body reading, decoding and parsing.
//!
//! The HTTP handler lives in `api::upload`; everything here is independent of
//! routing so it can be tested directly.

use actix_multipart::{Field, Multipart};
use actix_web::web::{Bytes, BytesMut};
use chrono::{DateTime, Utc};
use futures_util::{Stream, StreamExt};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::ParsedTestRun;
use crate::services::robot;

/// File name used when a raw upload does not provide one.
pub const DEFAULT_FILE_NAME: &str = "output.xml";

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

const MAX_FILE_NAME_LEN: usize = 255;

/// An uploaded document before decoding.
#[derive(Debug)]
pub struct UploadedDocument {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Read the `file` field of a multipart body, skipping every other field.
pub async fn read_multipart(mut payload: Multipart, max_size: usize) -> AppResult<UploadedDocument> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        if field.name() != Some(FILE_FIELD) {
            drain_field(&mut field).await;
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(sanitize_file_name)
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

        let bytes = read_limited(&mut field, max_size).await?;
        return Ok(UploadedDocument { file_name, bytes });
    }

    Err(AppError::InvalidInput(format!(
        "No file provided. Send the output.xml in a '{}' field.",
        FILE_FIELD
    )))
}

/// Read a raw request body.
pub async fn read_raw<S, E>(
    payload: S,
    file_name: Option<&str>,
    max_size: usize,
) -> AppResult<UploadedDocument>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut payload = payload;
    let bytes = read_limited(&mut payload, max_size).await?;
    Ok(UploadedDocument {
        file_name: file_name
            .map(sanitize_file_name)
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        bytes,
    })
}

async fn read_limited<S, E>(stream: &mut S, max_size: usize) -> AppResult<Bytes>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut buf = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
        if buf.len() + chunk.len() > max_size {
            return Err(AppError::PayloadTooLarge(format!(
                "Upload exceeds the {} byte limit",
                max_size
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

async fn drain_field(field: &mut Field) {
    while let Some(chunk) = field.next().await {
        if chunk.is_err() {
            break;
        }
    }
}

/// Decode an uploaded body as UTF-8 text, dropping a leading BOM.
pub fn decode_document(bytes: &[u8]) -> AppResult<&str> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::InvalidInput("No file provided".to_string()));
    }

    let text = std::str::from_utf8(bytes)
        .map_err(|e| AppError::InvalidInput(format!("Upload is not valid UTF-8: {}", e)))?;

    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Decode and parse an uploaded document.
pub fn parse_document(bytes: &[u8], now: DateTime<Utc>) -> AppResult<ParsedTestRun> {
    let xml = decode_document(bytes)?;
    robot::parse_output_xml(xml, now).map_err(|e| {
        debug!("Rejected upload: {}", e);
        AppError::from(e)
    })
}

/// Keep only the last path component, trimmed and bounded in length.
pub fn sanitize_file_name(raw: &str) -> String {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return DEFAULT_FILE_NAME.to_string();
    }

    name.chars().take(MAX_FILE_NAME_LEN).collect()
}
