use thiserror::Error;

/// Result type alias for MSA operations
pub type Result<T> = std::result::Result<T, MsaError>;

/// Errors that can occur when working with MSA and raw ST images
#[derive(Debug, Error)]
pub enum MsaError {
    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Container does not start with the MSA marker
    #[error("Invalid MSA magic: expected 0x0E0F, found 0x{found:04X}")]
    InvalidMagic {
        /// Marker value actually found
        found: u16,
    },

    /// Header fields are out of range or inconsistent
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Parse error at specific offset
    #[error("Parse error at offset {offset}: {message}")]
    ParseError {
        /// Byte offset where error occurred
        offset: usize,
        /// Error message
        message: String,
    },

    /// A track chunk could not be expanded to a full track
    #[error("Malformed track {track} on side {side}: {source}")]
    MalformedTrack {
        /// Track number
        track: u16,
        /// Side number
        side: u8,
        /// What went wrong inside the chunk
        #[source]
        source: TrackError,
    },

    /// Raw image size does not match the geometry
    #[error("Geometry mismatch for {size} byte image: {message}")]
    GeometryMismatch {
        /// Size of the raw image in bytes
        size: usize,
        /// Error message
        message: String,
    },

    /// Geometry values cannot be represented in an MSA header
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Invalid track number specified
    #[error("Invalid track {track} on side {side} (max: {max})")]
    InvalidTrack {
        /// Side number
        side: u8,
        /// Track number
        track: u16,
        /// Maximum allowed track number
        max: u16,
    },

    /// Invalid sector number specified
    #[error("Invalid sector {sector} on track {track}, side {side}")]
    InvalidSector {
        /// Side number
        side: u8,
        /// Track number
        track: u16,
        /// Sector number (1-based)
        sector: u16,
    },

    /// YM recording session has no room for another frame
    #[error("YM recording is full ({frames} frames)")]
    RecordingFull {
        /// Number of frames already recorded
        frames: usize,
    },

    /// YM recording session was finished without any frames
    #[error("YM recording contains no frames")]
    EmptyRecording,
}

/// Reasons a single track chunk fails to expand
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// Token stream ended before the track was filled
    #[error("payload exhausted after {produced} of {expected} bytes")]
    PayloadExhausted {
        /// Bytes produced so far
        produced: usize,
        /// Bytes required for a full track
        expected: usize,
    },

    /// Escape sequence cut short by the end of the payload
    #[error("truncated escape sequence at payload offset {offset}")]
    TruncatedEscape {
        /// Offset of the 0xE5 marker within the payload
        offset: usize,
    },

    /// Verbatim chunk holds fewer bytes than a track
    #[error("verbatim chunk has {available} of {expected} bytes")]
    ShortVerbatim {
        /// Bytes present in the payload
        available: usize,
        /// Bytes required for a full track
        expected: usize,
    },

    /// Chunk length prefix or payload runs past the end of the container
    #[error("chunk at offset {offset} needs {length} bytes, only {available} available")]
    ChunkOverrun {
        /// Container offset of the chunk
        offset: usize,
        /// Bytes the chunk claims
        length: usize,
        /// Bytes left in the container
        available: usize,
    },
}

impl MsaError {
    /// Create a parse error with context
    pub fn parse<S: Into<String>>(offset: usize, message: S) -> Self {
        MsaError::ParseError {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid header error
    pub fn invalid_header<S: Into<String>>(message: S) -> Self {
        MsaError::InvalidHeader(message.into())
    }

    /// Create an invalid geometry error
    pub fn invalid_geometry<S: Into<String>>(message: S) -> Self {
        MsaError::InvalidGeometry(message.into())
    }

    /// Create a geometry mismatch error for an image of `size` bytes
    pub fn geometry_mismatch<S: Into<String>>(size: usize, message: S) -> Self {
        MsaError::GeometryMismatch {
            size,
            message: message.into(),
        }
    }

    /// Attach track/side context to a chunk failure
    pub fn malformed_track(track: u16, side: u8, source: TrackError) -> Self {
        MsaError::MalformedTrack {
            track,
            side,
            source,
        }
    }
}
