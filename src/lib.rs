/*!
# msamanager

A Rust library for reading and writing Atari ST disk images in the MSA
container format and as raw `.st` sector dumps.

## Features

- Lossless MSA encode/decode with per-track run-length compression
- Verbatim fallback for tracks that do not compress, and a fully
  uncompressed mode
- Geometry detection for raw images from the boot sector or image size
- Track and sector access on an in-memory image
- YM register-stream recording sessions
- Idiomatic Rust API with comprehensive error handling

## Quick Start

```rust,no_run
use msamanager::{DiskGeometry, DiskImage, EncodeOptions, ImageFormat};

// Open an existing MSA file
let mut image = DiskImage::open("game.msa")?;

// Read a sector (sectors are numbered from 1)
let boot = image.read_sector(0, 0, 1)?;
println!("boot sector starts with {:02X?}", &boot[..2]);

// Convert to a raw image
image.save("game.st")?;

// Create a new blank double-sided image and store it uncompressed
let mut blank = DiskImage::create(DiskGeometry::atari_ds_dd())?;
blank.save_as("blank.msa", ImageFormat::Msa, &EncodeOptions::uncompressed())?;
# Ok::<(), msamanager::MsaError>(())
```

Working on buffers directly:

```rust
use msamanager::codec::{decode, encode};

let raw = vec![0xAAu8; 2 * 9 * 512];
let msa = encode(&raw, 9, 1, 2)?;
assert_eq!(decode(&msa)?, raw);
# Ok::<(), msamanager::MsaError>(())
```

## Modules

- `codec`: run detection, track compression and whole-image encode/decode
- `format`: MSA header, constants and disk geometry
- `image`: In-memory disk image and builder
- `io`: Reading and writing image files
- `ym`: YM register-stream recorder
- `error`: Error types and Result alias
*/

#![warn(missing_docs)]

/// MSA RLE codec
pub mod codec;
/// Error types and Result alias
pub mod error;
/// MSA header, constants and disk geometry
pub mod format;
/// In-memory disk image and builder
pub mod image;
/// I/O operations for reading and writing image files
pub mod io;
pub mod ym;

// Re-export common types
pub use codec::{ChunkInfo, CompressedTrack, EncodeOptions};
pub use error::{MsaError, Result, TrackError};
pub use format::{detect_geometry, DiskGeometry, ImageFormat, MsaHeader};
pub use image::{DiskImage, DiskImageBuilder};
pub use ym::YmRecorder;
