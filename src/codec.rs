//! PCM codec.
//!
//! The speech model answers with headerless 16-bit little-endian mono PCM,
//! base64-encoded. This module turns that payload into samples and wraps
//! samples in a canonical 44-byte-header WAV container that any player can
//! open.

use std::io::Cursor;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use crate::error::DecodeError;

/// Size of the RIFF/WAVE header written by [`encode_pcm_to_container`].
pub const WAV_HEADER_LEN: usize = 44;

/// Standard alphabet; accepts payloads with or without trailing `=` padding,
/// but rejects padding that is present and wrong.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a base64 audio payload, ignoring any whitespace inside it.
pub fn decode_base64_to_bytes(payload: &str) -> Result<Vec<u8>, DecodeError> {
    let clean: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(PAYLOAD_ENGINE.decode(clean.as_bytes())?)
}

/// Reinterpret raw bytes as little-endian `i16` samples.
///
/// A trailing odd byte is dropped rather than treated as an error.
pub fn bytes_to_pcm_samples(bytes: &[u8]) -> Vec<i16> {
    if bytes.len() % 2 != 0 {
        log::debug!(
            "PCM payload has odd length {}, dropping trailing byte",
            bytes.len()
        );
    }

    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Encode mono 16-bit samples into a complete WAV file held in memory.
///
/// The output is a 44-byte canonical header (`RIFF`, `WAVE`, a 16-byte `fmt `
/// chunk with format code 1, and a `data` chunk) followed by the samples in
/// input order.
pub fn encode_pcm_to_container(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, DecodeError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(WAV_HEADER_LEN + samples.len() * 2));
    let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

/// Samples and format fields read back from a WAV container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

/// Parse a container produced by [`encode_pcm_to_container`].
///
/// Only mono 16-bit integer PCM is accepted.
pub fn decode_container(bytes: &[u8]) -> Result<DecodedAudio, DecodeError> {
    let reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    if spec.channels != 1
        || spec.bits_per_sample != 16
        || spec.sample_format != hound::SampleFormat::Int
    {
        return Err(DecodeError::UnsupportedFormat {
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
        });
    }

    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
    })
}

/// Playback length in seconds for `sample_count` mono samples.
///
/// Returns 0 for a zero sample rate.
pub fn duration_secs(sample_count: usize, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    sample_count as f64 / sample_rate as f64
}
