/// Image formats, MSA header layout and disk geometry

/// Format constants
pub mod constants;
/// Disk geometry and detection
pub mod geometry;
/// MSA header parsing and construction
pub mod header;

pub use constants::*;
pub use geometry::{detect_geometry, DiskGeometry};
pub use header::{to_disk16, to_host16, MsaHeader};

use std::path::Path;

/// On-disk image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// MSA container with per-track RLE
    Msa,
    /// Raw sector dump (.st)
    RawSt,
}

impl ImageFormat {
    /// Get the magic bytes for this format
    pub fn magic_bytes(&self) -> &'static [u8] {
        match self {
            ImageFormat::Msa => &[0x0E, 0x0F],
            ImageFormat::RawSt => &[], // Raw ST has no magic bytes
        }
    }

    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Msa => "MSA",
            ImageFormat::RawSt => "Raw ST",
        }
    }

    /// Usual file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Msa => "msa",
            ImageFormat::RawSt => "st",
        }
    }

    /// Pick a format from a file extension, defaulting to raw ST
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let is_msa = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("msa"))
            .unwrap_or(false);

        if is_msa {
            ImageFormat::Msa
        } else {
            ImageFormat::RawSt
        }
    }
}

/// Detect an MSA container from its first bytes
pub fn detect_format(magic: &[u8]) -> Option<ImageFormat> {
    if magic.len() >= MSA_HEADER_SIZE && magic.starts_with(ImageFormat::Msa.magic_bytes()) {
        Some(ImageFormat::Msa)
    } else {
        None
    }
}
