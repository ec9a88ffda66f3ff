//! Barcode decoding: image bytes → ordered, non-empty candidate strings.
//!
//! The actual symbology work is done by a [`BarcodeDecoder`]. This module only
//! adapts it to the pipeline: the primitive runs on the blocking pool, every
//! failure (bad image, decoder error, even a panic) collapses to "no
//! barcodes", and blank results are dropped.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Error reported by a [`BarcodeDecoder`]. Never escapes [`decode_candidates`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not an image the decoder can load.
    #[error("image could not be loaded: {0}")]
    Image(String),

    /// The detector itself failed.
    #[error("barcode detection failed: {0}")]
    Detection(String),
}

/// External decode primitive: every symbol found in one image, in the order
/// the detector emits them.
pub trait BarcodeDecoder: Send + Sync {
    fn decode(&self, image: &[u8]) -> Result<Vec<String>, DecodeError>;
}

/// A decoded payload and its position in the decoder's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCandidate {
    pub index: usize,
    pub text: String,
}

/// Run `decoder` over `bytes` and keep the non-blank results.
///
/// Always succeeds; a decoder failure yields an empty list.
pub async fn decode_candidates(
    decoder: &Arc<dyn BarcodeDecoder>,
    bytes: Arc<[u8]>,
) -> Vec<DecodedCandidate> {
    let decoder = Arc::clone(decoder);
    let joined = tokio::task::spawn_blocking(move || decoder.decode(&bytes)).await;

    let texts = match joined {
        Ok(Ok(texts)) => texts,
        Ok(Err(e)) => {
            debug!("Decoder returned no result: {}", e);
            return Vec::new();
        }
        Err(e) => {
            warn!("Decoder task panicked: {}", e);
            return Vec::new();
        }
    };

    let candidates = to_candidates(texts);
    debug!("Decoded {} candidate(s)", candidates.len());
    candidates
}

/// Number the raw results and drop empty or whitespace-only ones.
fn to_candidates(texts: Vec<String>) -> Vec<DecodedCandidate> {
    texts
        .into_iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(index, text)| DecodedCandidate { index, text })
        .collect()
}

// ── Built-in decoder ─────────────────────────────────────────────────────

/// Symbologies the built-in decoder looks for.
///
/// UPC-A is not in the set, so an EAN-13 starting with `0` stays a 13-digit
/// EAN-13 instead of being shortened to its 12-digit UPC-A form.
#[cfg(feature = "rxing")]
pub const RXING_FORMATS: [rxing::BarcodeFormat; 6] = [
    rxing::BarcodeFormat::CODE_128,
    rxing::BarcodeFormat::CODE_39,
    rxing::BarcodeFormat::QR_CODE,
    rxing::BarcodeFormat::EAN_13,
    rxing::BarcodeFormat::EAN_8,
    rxing::BarcodeFormat::ITF,
];

/// Decoder backed by the `rxing` multi-format reader.
///
/// The image is loaded with the `image` crate and converted to 8-bit luma
/// before detection, so any container `image` understands works here. Only
/// [`RXING_FORMATS`] are tried, in try-harder mode.
#[cfg(feature = "rxing")]
#[derive(Debug, Default, Clone, Copy)]
pub struct RxingDecoder;

#[cfg(feature = "rxing")]
impl RxingDecoder {
    fn hints() -> rxing::DecodingHintDictionary {
        use rxing::{DecodeHintType, DecodeHintValue};

        let mut hints = rxing::DecodingHintDictionary::new();
        hints.insert(DecodeHintType::TRY_HARDER, DecodeHintValue::TryHarder(true));
        hints.insert(
            DecodeHintType::POSSIBLE_FORMATS,
            DecodeHintValue::PossibleFormats(RXING_FORMATS.into_iter().collect()),
        );
        hints
    }
}

#[cfg(feature = "rxing")]
impl BarcodeDecoder for RxingDecoder {
    fn decode(&self, image: &[u8]) -> Result<Vec<String>, DecodeError> {
        let img = image::load_from_memory(image).map_err(|e| DecodeError::Image(e.to_string()))?;
        let luma = img.to_luma8();
        let (width, height) = luma.dimensions();

        let mut hints = Self::hints();
        let results = rxing::helpers::detect_multiple_in_luma_with_hints(
            luma.into_raw(),
            width,
            height,
            &mut hints,
        )
        .map_err(|e| DecodeError::Detection(e.to_string()))?;

        Ok(results.iter().map(|r| r.getText().to_string()).collect())
    }
}
