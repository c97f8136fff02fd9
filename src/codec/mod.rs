/// MSA RLE codec: run detection, per-track compression and whole-image encode/decode

/// Whole-image encode and decode
pub mod image;
/// Run detection
pub mod run;
/// Per-track compression and expansion
pub mod track;

pub use image::{decode, decode_with_header, encode, encode_with, inspect};
pub use run::find_run;
pub use track::{compress_track, decompress_track, CompressedTrack};

/// Options controlling MSA encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Attempt RLE compression on each track
    pub compression: bool,
}

impl EncodeOptions {
    /// Default options: compression enabled
    pub fn new() -> Self {
        Self { compression: true }
    }

    /// Store every track verbatim
    ///
    /// The result is still a valid MSA file that any reader accepts.
    pub fn uncompressed() -> Self {
        Self { compression: false }
    }

    /// Enable or disable compression
    pub fn with_compression(mut self, compression: bool) -> Self {
        self.compression = compression;
        self
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Location and kind of one chunk inside an MSA container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkInfo {
    /// Track number as stored in the header range
    pub track: u16,
    /// Side number
    pub side: u8,
    /// Container offset of the length prefix
    pub offset: usize,
    /// Value of the length prefix
    pub length: u16,
    /// Whether the payload is RLE-coded
    pub encoded: bool,
}

impl ChunkInfo {
    /// Payload size as a percentage of the uncompressed track
    pub fn ratio(&self, track_size: usize) -> f64 {
        if track_size == 0 {
            return 0.0;
        }
        self.length as f64 * 100.0 / track_size as f64
    }
}
