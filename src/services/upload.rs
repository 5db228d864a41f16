use std::collections::HashMap;

use actix_multipart::{Multipart, MultipartError};
use actix_web::{error::PayloadError, http::header::HeaderMap, web::Bytes};
use futures::{stream, TryStreamExt};

pub const FILE_FIELD: &str = "file";

/// A buffered `multipart/form-data` body: the first `file` part plus every
/// other named part as trimmed text.
#[derive(Debug, Default, PartialEq)]
pub struct FormUpload {
    pub file: Option<Vec<u8>>,
    pub fields: HashMap<String, String>,
}

impl FormUpload {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }
}

/// Splits an already size-limited body into its form parts.
pub async fn read_form(headers: &HeaderMap, body: Bytes) -> Result<FormUpload, MultipartError> {
    let mut multipart = Multipart::new(
        headers,
        stream::once(async move { Ok::<_, PayloadError>(body) }),
    );
    let mut upload = FormUpload::default();

    while let Some(mut field) = multipart.try_next().await? {
        let name = field.name().map(str::to_string);

        let mut buf = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            buf.extend_from_slice(&chunk);
        }

        match name.as_deref() {
            Some(FILE_FIELD) if upload.file.is_none() => upload.file = Some(buf),
            Some(FILE_FIELD) => log::debug!("Ignoring extra file part"),
            Some(name) => {
                let value = String::from_utf8_lossy(&buf).trim().to_string();
                upload.fields.insert(name.to_string(), value);
            }
            None => {}
        }
    }

    Ok(upload)
}
