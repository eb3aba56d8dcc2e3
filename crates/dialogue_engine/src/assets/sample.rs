//! Encoded sound samples
//!
//! Samples keep the file bytes as loaded; decoding and playback belong to
//! the host's audio backend.

use super::{AssetError, AssetResult};

/// Container format recognised from magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// RIFF/WAVE
    Wav,
    /// Ogg container (Vorbis or Opus)
    Ogg,
    /// MPEG layer 3
    Mp3,
    /// FLAC lossless
    Flac,
}

impl AudioFormat {
    /// Detect the format from the leading bytes of a file
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes.get(..4)? {
            b"RIFF" => Some(Self::Wav),
            b"OggS" => Some(Self::Ogg),
            b"fLaC" => Some(Self::Flac),
            // ID3 tag or bare frame sync
            [b'I', b'D', b'3', _] | [0xFF, 0xFB | 0xFA | 0xF3 | 0xF2, _, _] => Some(Self::Mp3),
            _ => None,
        }
    }
}

/// An encoded audio sample
#[derive(Debug, Clone)]
pub struct SoundSample {
    data: Vec<u8>,
    format: AudioFormat,
}

impl SoundSample {
    /// Wrap encoded file bytes
    ///
    /// # Errors
    ///
    /// [`AssetError::InvalidData`] for empty or unrecognised data.
    pub fn from_bytes(data: Vec<u8>) -> AssetResult<Self> {
        if data.is_empty() {
            return Err(AssetError::InvalidData("Empty audio file".to_string()));
        }
        let format = AudioFormat::detect(&data)
            .ok_or_else(|| AssetError::InvalidData("Unrecognised audio format".to_string()))?;
        Ok(Self { data, format })
    }

    /// Encoded bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Detected container format
    pub const fn format(&self) -> AudioFormat {
        self.format
    }
}
