/// MSA container constants

/// MSA header marker
pub const MSA_MAGIC: u16 = 0x0E0F;

/// Size of the MSA header in bytes (five 16-bit words)
pub const MSA_HEADER_SIZE: usize = 10;

/// Size of a chunk length prefix in bytes
pub const CHUNK_PREFIX_SIZE: usize = 2;

/// Bytes per sector, fixed for all ST images
pub const SECTOR_SIZE: usize = 512;

/// Marker byte that introduces an RLE escape sequence
pub const RLE_MARKER: u8 = 0xE5;

/// Size of an escape sequence: marker, data byte, 16-bit run length
pub const RLE_ESCAPE_SIZE: usize = 4;

/// Shortest run of an ordinary byte worth escaping
pub const RLE_MIN_RUN: usize = 4;

/// Largest sectors per track whose track size fits a 16-bit length prefix
pub const MAX_SECTORS_PER_TRACK: u16 = (u16::MAX as usize / SECTOR_SIZE) as u16;

/// Filler byte written by the ST when formatting
pub const FORMAT_FILLER_BYTE: u8 = 0xE5;

/// Offsets of the fields the geometry probe reads from the boot sector BPB
pub const BPB_TOTAL_SECTORS_OFFSET: usize = 0x13;
/// Sectors per track field in the boot sector
pub const BPB_SECTORS_PER_TRACK_OFFSET: usize = 0x18;
/// Number of sides field in the boot sector
pub const BPB_SIDES_OFFSET: usize = 0x1A;
