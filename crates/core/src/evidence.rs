// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Photo evidence payloads.
//!
//! Camera frames arrive as base64-encoded JPEG. Before upload they are
//! annotated with the capture date/time and normalised into both a
//! data-URL string and a binary blob for multipart submission.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// A captured camera frame, base64-encoded JPEG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo(String);

/// The frame was not valid base64.
#[derive(Debug, Error)]
#[error("photo is not valid base64: {0}")]
pub struct EvidenceError(#[from] base64::DecodeError);

impl Photo {
    /// Wrap a base64 frame, accepting either a bare payload or a full
    /// `data:image/jpeg;base64,` URL.
    pub fn from_base64(frame: impl Into<String>) -> Self {
        let frame = frame.into();
        match frame.strip_prefix(DATA_URL_PREFIX) {
            Some(bare) => Self(bare.to_string()),
            None => Self(frame),
        }
    }

    /// Wrap raw JPEG bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn as_base64(&self) -> &str {
        &self.0
    }

    /// Decode to raw JPEG bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EvidenceError> {
        Ok(base64::engine::general_purpose::STANDARD.decode(&self.0)?)
    }
}

/// An upload-ready evidence artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    /// `data:image/jpeg;base64,…` string for display layers.
    pub data_url: String,
    /// Raw JPEG bytes for the multipart part.
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl UploadPayload {
    /// Normalise a photo into both representations.
    pub fn from_photo(photo: &Photo, file_name: impl Into<String>) -> Result<Self, EvidenceError> {
        Ok(Self {
            data_url: format!("{DATA_URL_PREFIX}{}", photo.as_base64()),
            bytes: photo.to_bytes()?,
            file_name: file_name.into(),
        })
    }
}

/// Annotate a JPEG with a date/time label, best effort.
///
/// The label is written as a JPEG comment segment directly after the
/// start-of-image marker, leaving the pixel data untouched. Anything
/// that is not a well-formed JPEG (or a label too large for one
/// segment) comes back unchanged — evidence capture must never fail on
/// the stamping step.
pub fn stamp_jpeg(image: &[u8], label: &str) -> Vec<u8> {
    const SOI: [u8; 2] = [0xFF, 0xD8];
    const COM: [u8; 2] = [0xFF, 0xFE];

    let payload = label.as_bytes();
    // Segment length field counts itself (2 bytes) plus the payload.
    let seg_len = payload.len() + 2;
    if image.len() < 2 || image[0..2] != SOI || seg_len > u16::MAX as usize {
        return image.to_vec();
    }

    let mut stamped = Vec::with_capacity(image.len() + 4 + payload.len());
    stamped.extend_from_slice(&SOI);
    stamped.extend_from_slice(&COM);
    stamped.extend_from_slice(&(seg_len as u16).to_be_bytes());
    stamped.extend_from_slice(payload);
    stamped.extend_from_slice(&image[2..]);
    stamped
}

#[cfg(test)]
#[path = "evidence_tests.rs"]
mod tests;
