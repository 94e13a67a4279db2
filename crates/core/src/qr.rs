//! Identifier codec: deterministic QR encode/decode of product identifiers.
//!
//! The payload is carried byte-for-byte: no compression, encryption or
//! transformation is applied, so `decode(encode(s)) == s` for any payload
//! that fits in a QR symbol. Decode failures are ordinary recoverable
//! values, never panics.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, Luma};
use qrcode::QrCode;
use thiserror::Error;

/// Rendered symbol edge length in pixels, including the quiet zone.
///
/// Large enough for reliable re-detection after a print/photograph cycle.
const RENDER_SIZE: u32 = 360;

/// Failure to produce a QR image for a payload.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The payload exceeds QR symbol capacity.
    #[error("payload does not fit in a QR symbol: {0}")]
    Capacity(#[from] qrcode::types::QrError),

    /// PNG serialisation failed.
    #[error("failed to write PNG: {0}")]
    Png(#[from] image::ImageError),
}

/// Failure to extract a payload from an image.
///
/// All variants are recoverable conditions to report to the caller; none
/// should terminate a capture session on its own.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not a readable image at all.
    #[error("unreadable image data: {0}")]
    Image(#[from] image::ImageError),

    /// The image is readable but contains no detectable QR symbol.
    #[error("no QR code found in image")]
    NoCode,

    /// A symbol was detected but its contents could not be decoded.
    #[error("QR code could not be decoded: {0}")]
    Garbled(#[from] rqrr::DeQRError),
}

/// Encode a payload string into a PNG-encoded QR image.
///
/// Encoding is deterministic: the same input always produces a decodable
/// representation of that exact string.
///
/// # Errors
///
/// Returns [`EncodeError`] if the payload exceeds symbol capacity or the
/// PNG cannot be written.
pub fn encode(payload: &str) -> Result<Vec<u8>, EncodeError> {
    let code = QrCode::new(payload.as_bytes())?;
    let rendered: GrayImage = code
        .render::<Luma<u8>>()
        .min_dimensions(RENDER_SIZE, RENDER_SIZE)
        .build();

    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(rendered).write_to(&mut buf, image::ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Decode the first QR symbol found in encoded image bytes (PNG, JPEG).
///
/// # Errors
///
/// Returns [`DecodeError`] if the bytes are not an image, no symbol is
/// present, or the symbol contents are garbled.
pub fn decode(bytes: &[u8]) -> Result<String, DecodeError> {
    let img = image::load_from_memory(bytes)?.to_luma8();
    decode_frame(img)
}

/// Decode the first QR symbol found in an already-decoded grayscale frame.
///
/// Used by continuous capture, where frames arrive as raw luma buffers
/// rather than encoded files.
///
/// # Errors
///
/// Returns [`DecodeError::NoCode`] if no symbol is detected, or
/// [`DecodeError::Garbled`] if one is detected but unreadable.
pub fn decode_frame(frame: GrayImage) -> Result<String, DecodeError> {
    let mut prepared = rqrr::PreparedImage::prepare(frame);
    let grids = prepared.detect_grids();
    let grid = grids.first().ok_or(DecodeError::NoCode)?;
    let (_meta, content) = grid.decode()?;
    Ok(content)
}
