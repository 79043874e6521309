//! Encoding detection and decoding for raw CSV payloads.
//!
//! The published sheet is usually UTF-8, but legacy exports show up in
//! windows-1251. Detection is a best-effort, confidence-free guess over a
//! fixed byte sample; a BOM always wins, and an all-ASCII sample keeps the
//! UTF-8 assumption.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

use docboard_shared::{DocboardError, Result};

/// How many leading bytes the detector gets to look at.
const DETECT_SAMPLE_LEN: usize = 8192;

/// Guess the text encoding of a raw payload.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let sample = &bytes[..bytes.len().min(DETECT_SAMPLE_LEN)];
    let mut detector = EncodingDetector::new();
    let saw_non_ascii = detector.feed(sample, bytes.len() <= DETECT_SAMPLE_LEN);
    if !saw_non_ascii {
        // All-ASCII sample decodes identically everywhere; keep the default.
        return UTF_8;
    }

    detector.guess(None, true)
}

/// Decode a raw payload into text, detecting the encoding first.
///
/// Malformed sequences under the detected encoding are a fatal
/// [`DocboardError::Decode`] ("reachable but undecodable"), distinct from
/// a fetch failure. A leading BOM, if any, is stripped.
pub fn decode_payload(url: &str, bytes: &[u8]) -> Result<String> {
    let encoding = detect_encoding(bytes);
    let (text, actual, had_errors) = encoding.decode(bytes);

    if had_errors {
        return Err(DocboardError::decode(
            url,
            actual.name(),
            "payload contains byte sequences invalid for the detected encoding",
        ));
    }

    if actual != UTF_8 {
        tracing::warn!(encoding = actual.name(), "payload is not UTF-8, decoded from legacy encoding");
    }
    tracing::debug!(encoding = actual.name(), len = bytes.len(), "decoded payload");
    Ok(text.into_owned())
}
