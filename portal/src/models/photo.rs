// parish-portal/src/models/photo.rs

//! Uploaded images (passport photo, transfer proof) carried as
//! `data:<mime>;base64,<payload>` URLs.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PhotoError {
  #[error("image must be sent as a data URL")]
  NotDataUrl,
  #[error("image data URL must be base64 encoded")]
  NotBase64Encoded,
  #[error("unsupported image type '{0}'")]
  UnsupportedType(String),
  #[error("image payload is not valid base64: {0}")]
  Payload(String),
  #[error("image is empty")]
  Empty,
}

/// An image upload: MIME type plus raw bytes. Only `image/*` types are accepted.
#[derive(Clone, PartialEq, Eq)]
pub struct Photo {
  content_type: String,
  bytes: Vec<u8>,
}

impl Photo {
  pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Result<Self, PhotoError> {
    let content_type = content_type.into().trim().to_ascii_lowercase();
    if !content_type.starts_with("image/") || content_type.len() == "image/".len() {
      return Err(PhotoError::UnsupportedType(content_type));
    }
    if bytes.is_empty() {
      return Err(PhotoError::Empty);
    }
    Ok(Self { content_type, bytes })
  }

  pub fn from_data_url(url: &str) -> Result<Self, PhotoError> {
    let rest = url.trim().strip_prefix("data:").ok_or(PhotoError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(PhotoError::NotDataUrl)?;
    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default();
    if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
      return Err(PhotoError::NotBase64Encoded);
    }
    let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
      .decode(cleaned.as_bytes())
      .map_err(|e| PhotoError::Payload(e.to_string()))?;
    Self::new(mime, bytes)
  }

  pub fn to_data_url(&self) -> String {
    format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
  }

  pub fn content_type(&self) -> &str {
    &self.content_type
  }

  pub fn bytes(&self) -> &[u8] {
    &self.bytes
  }
}

impl std::fmt::Debug for Photo {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Photo")
      .field("content_type", &self.content_type)
      .field("len", &self.bytes.len())
      .finish()
  }
}

impl Serialize for Photo {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.to_data_url())
  }
}

impl<'de> Deserialize<'de> for Photo {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Photo::from_data_url(&raw).map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_and_renders_data_url() {
    let photo = Photo::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
    assert_eq!(photo.content_type(), "image/png");
    assert_eq!(photo.bytes(), &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    assert_eq!(photo.to_data_url(), "data:image/png;base64,iVBORw0KGgo=");
  }

  #[test]
  fn rejects_non_images_and_bad_payloads() {
    assert_eq!(
      Photo::from_data_url("data:application/pdf;base64,JVBERi0=").unwrap_err(),
      PhotoError::UnsupportedType("application/pdf".into())
    );
    assert_eq!(Photo::from_data_url("image/png;base64,AAAA").unwrap_err(), PhotoError::NotDataUrl);
    assert_eq!(Photo::from_data_url("data:image/png,rawbytes").unwrap_err(), PhotoError::NotBase64Encoded);
    assert!(matches!(Photo::from_data_url("data:image/jpeg;base64,@@@"), Err(PhotoError::Payload(_))));
    assert_eq!(Photo::from_data_url("data:image/jpeg;base64,").unwrap_err(), PhotoError::Empty);
  }
}
