//! QR codec commands: encode a payload to a PNG, decode a PNG back.

use std::path::Path;

use thiserror::Error;

use makhzan_core::qr;

/// QR command failure.
#[derive(Debug, Error)]
pub enum QrCommandError {
    #[error("Encode error: {0}")]
    Encode(#[from] qr::EncodeError),

    #[error("Decode error: {0}")]
    Decode(#[from] qr::DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode a payload and write the PNG to `out`.
///
/// # Errors
///
/// Returns [`QrCommandError`] if encoding or the file write fails.
pub fn encode(payload: &str, out: &Path) -> Result<(), QrCommandError> {
    let png = qr::encode(payload)?;
    std::fs::write(out, png)?;
    println!("wrote {}", out.display());
    Ok(())
}

/// Decode the QR code in the image at `path` and print its payload.
///
/// # Errors
///
/// Returns [`QrCommandError`] if the file cannot be read or holds no
/// decodable code.
pub fn decode(path: &Path) -> Result<(), QrCommandError> {
    let bytes = std::fs::read(path)?;
    let payload = qr::decode(&bytes)?;
    println!("{payload}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_via_files() {
        let dir = std::env::temp_dir().join("makhzan-cli-qr-test");
        std::fs::create_dir_all(&dir).expect("temp dir");
        let out = dir.join("roundtrip.png");

        encode("cli-roundtrip-1", &out).expect("encodes");
        let bytes = std::fs::read(&out).expect("reads");
        assert_eq!(qr::decode(&bytes).expect("decodes"), "cli-roundtrip-1");

        std::fs::remove_file(&out).ok();
    }
}
