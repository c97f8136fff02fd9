/// Per-track compression and expansion

use crate::codec::run::find_run;
use crate::error::TrackError;
use crate::format::constants::*;

/// Result of compressing one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressedTrack {
    /// Track stored as-is because RLE did not make it smaller
    Verbatim(Vec<u8>),
    /// RLE token stream, strictly shorter than the track
    Encoded(Vec<u8>),
}

impl CompressedTrack {
    /// Bytes written after the length prefix
    pub fn payload(&self) -> &[u8] {
        match self {
            CompressedTrack::Verbatim(data) | CompressedTrack::Encoded(data) => data,
        }
    }

    /// Value of the 16-bit length prefix
    pub fn length_prefix(&self) -> u16 {
        let length = self.payload().len();
        debug_assert!(
            length <= u16::MAX as usize,
            "chunk of {} bytes has no 16-bit prefix",
            length
        );
        length as u16
    }

    /// Whether the payload is an RLE token stream
    pub fn is_encoded(&self) -> bool {
        matches!(self, CompressedTrack::Encoded(_))
    }

    /// Take ownership of the payload
    pub fn into_payload(self) -> Vec<u8> {
        match self {
            CompressedTrack::Verbatim(data) | CompressedTrack::Encoded(data) => data,
        }
    }
}

/// RLE-encode one track, falling back to a verbatim copy
///
/// `raw_track` must be a whole track, i.e. `sectors_per_track * 512` bytes,
/// with at most 127 sectors so its length fits the chunk prefix.
pub fn compress_track(raw_track: &[u8]) -> CompressedTrack {
    let track_size = raw_track.len();
    debug_assert!(
        track_size <= MAX_SECTORS_PER_TRACK as usize * SECTOR_SIZE,
        "track of {} bytes is larger than {} sectors",
        track_size,
        MAX_SECTORS_PER_TRACK
    );
    let mut encoded = Vec::with_capacity(track_size);
    let mut offset = 0;

    while offset < track_size {
        // Already as large as the track, the verbatim copy wins
        if encoded.len() >= track_size {
            break;
        }

        let data = raw_track[offset];
        let run = find_run(&raw_track[offset..], track_size - offset);
        if run == 0 {
            encoded.push(data);
            offset += 1;
        } else {
            encoded.push(RLE_MARKER);
            encoded.push(data);
            encoded.extend_from_slice(&to_run_word(run));
            offset += run;
        }
    }

    if offset == track_size && encoded.len() < track_size {
        log::trace!("track compressed {} -> {} bytes", track_size, encoded.len());
        CompressedTrack::Encoded(encoded)
    } else {
        log::trace!("track stored verbatim ({} bytes)", track_size);
        CompressedTrack::Verbatim(raw_track.to_vec())
    }
}

/// Runs never exceed a track, and tracks fit in 16 bits
fn to_run_word(run: usize) -> [u8; 2] {
    crate::format::to_disk16(run as u16)
}

/// Expand one chunk payload into a full track
pub fn decompress_track(
    payload: &[u8],
    length_prefix: u16,
    sectors_per_track: u16,
) -> Result<Vec<u8>, TrackError> {
    let track_size = sectors_per_track as usize * SECTOR_SIZE;
    let mut track = Vec::with_capacity(track_size);
    expand_track(payload, length_prefix, track_size, &mut track)?;
    Ok(track)
}

/// Append exactly `track_size` bytes expanded from `payload` to `out`
///
/// On error `out` may hold a partial track; callers discard it.
pub(crate) fn expand_track(
    payload: &[u8],
    length_prefix: u16,
    track_size: usize,
    out: &mut Vec<u8>,
) -> Result<(), TrackError> {
    if length_prefix as usize == track_size {
        let data = payload.get(..track_size).ok_or(TrackError::ShortVerbatim {
            available: payload.len(),
            expected: track_size,
        })?;
        out.extend_from_slice(data);
        return Ok(());
    }

    let mut produced = 0;
    let mut pos = 0;

    while produced < track_size {
        let Some(&byte) = payload.get(pos) else {
            return Err(TrackError::PayloadExhausted {
                produced,
                expected: track_size,
            });
        };

        if byte != RLE_MARKER {
            out.push(byte);
            produced += 1;
            pos += 1;
            continue;
        }

        let escape = payload
            .get(pos..pos + RLE_ESCAPE_SIZE)
            .ok_or(TrackError::TruncatedEscape { offset: pos })?;
        let data = escape[1];
        let mut run = crate::format::to_host16([escape[2], escape[3]]) as usize;

        // Over-long runs in damaged images are cut to fit the track
        if produced + run > track_size {
            log::warn!(
                "run of {} at payload offset {} overflows track, clamped to {}",
                run,
                pos,
                track_size - produced
            );
            run = track_size - produced;
        }

        out.resize(out.len() + run, data);
        produced += run;
        pos += RLE_ESCAPE_SIZE;
    }

    if pos < payload.len() {
        log::debug!(
            "{} trailing payload bytes ignored after full track",
            payload.len() - pos
        );
    }

    Ok(())
}
