//! YM register-stream recording
//!
//! A recording captures the 14 PSG sound registers once per frame and is
//! written out as a `YM3!` stream: the 4-byte header followed by every frame
//! of register 0, then every frame of register 1, and so on.
//!
//! ```
//! use msamanager::YmRecorder;
//!
//! let mut recorder = YmRecorder::start();
//! recorder.record(&[0u8; 14], false)?;
//! let stream = recorder.finish()?;
//! assert_eq!(&stream[..4], b"YM3!");
//! # Ok::<(), msamanager::MsaError>(())
//! ```

use crate::error::{MsaError, Result};
use std::path::Path;

/// Number of PSG sound registers captured per frame
pub const YM_REGISTER_COUNT: usize = 14;

/// Register holding the envelope shape
pub const YM_ENVELOPE_SHAPE_REGISTER: usize = 13;

/// Stored in place of the envelope shape on frames where it was not written
pub const YM_ENVELOPE_UNCHANGED: u8 = 0xFF;

/// Stream header
pub const YM_HEADER: &[u8; 4] = b"YM3!";

/// Default capacity: 8 minutes at 50 frames per second
pub const YM_DEFAULT_MAX_FRAMES: usize = 50 * 60 * 8;

/// One recording session, owned by the caller
#[derive(Debug, Clone)]
pub struct YmRecorder {
    /// Frames in capture order, 14 bytes each
    frames: Vec<u8>,
    /// Number of frames the session accepts
    max_frames: usize,
}

impl YmRecorder {
    /// Start a session with the default capacity
    pub fn start() -> Self {
        Self::with_capacity(YM_DEFAULT_MAX_FRAMES)
    }

    /// Start a session holding at most `max_frames` frames
    pub fn with_capacity(max_frames: usize) -> Self {
        log::debug!("YM recording started ({} frames max)", max_frames);
        Self {
            frames: Vec::new(),
            max_frames,
        }
    }

    /// Record one frame of PSG registers
    ///
    /// The envelope shape register is only meaningful on frames that wrote it;
    /// otherwise it is stored as [`YM_ENVELOPE_UNCHANGED`].
    pub fn record(&mut self, registers: &[u8; YM_REGISTER_COUNT], envelope_written: bool) -> Result<()> {
        if self.is_full() {
            return Err(MsaError::RecordingFull {
                frames: self.frame_count(),
            });
        }

        self.frames
            .extend_from_slice(&registers[..YM_ENVELOPE_SHAPE_REGISTER]);
        self.frames.push(if envelope_written {
            registers[YM_ENVELOPE_SHAPE_REGISTER]
        } else {
            YM_ENVELOPE_UNCHANGED
        });

        if self.is_full() {
            log::info!("YM recording full after {} frames", self.frame_count());
        }
        Ok(())
    }

    /// Number of frames recorded so far
    pub fn frame_count(&self) -> usize {
        self.frames.len() / YM_REGISTER_COUNT
    }

    /// Whether the session has reached its capacity
    pub fn is_full(&self) -> bool {
        self.frame_count() >= self.max_frames
    }

    /// End the session and produce the `YM3!` stream
    pub fn finish(self) -> Result<Vec<u8>> {
        let count = self.frame_count();
        if count == 0 {
            return Err(MsaError::EmptyRecording);
        }

        let mut stream = Vec::with_capacity(YM_HEADER.len() + self.frames.len());
        stream.extend_from_slice(YM_HEADER);
        for register in 0..YM_REGISTER_COUNT {
            stream.extend(
                self.frames
                    .chunks_exact(YM_REGISTER_COUNT)
                    .map(|frame| frame[register]),
            );
        }

        log::debug!("YM recording stopped: {} frames, {} bytes", count, stream.len());
        Ok(stream)
    }

    /// End the session and write the stream to a file
    pub fn finish_to_file<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let stream = self.finish()?;
        std::fs::write(path, stream)?;
        Ok(())
    }
}
