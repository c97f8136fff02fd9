/// Whole-image MSA encoding and decoding

use crate::codec::track::{compress_track, expand_track};
use crate::codec::{ChunkInfo, EncodeOptions};
use crate::error::{MsaError, Result, TrackError};
use crate::format::constants::*;
use crate::format::header::read_word;
use crate::format::{to_disk16, DiskGeometry, MsaHeader};

/// Encode a raw image into an MSA container
pub fn encode(raw: &[u8], sectors_per_track: u16, sides: u8, tracks: u16) -> Result<Vec<u8>> {
    let geometry = DiskGeometry::new(sectors_per_track, sides, tracks);
    encode_with(raw, &geometry, &EncodeOptions::default())
}

/// Encode a raw image into an MSA container with explicit options
pub fn encode_with(raw: &[u8], geometry: &DiskGeometry, options: &EncodeOptions) -> Result<Vec<u8>> {
    geometry.check_image_size(raw.len())?;
    let header = MsaHeader::from_geometry(geometry)?;
    let track_size = geometry.track_size();

    let mut container = Vec::with_capacity(
        MSA_HEADER_SIZE + geometry.track_count() * (CHUNK_PREFIX_SIZE + track_size),
    );
    container.extend_from_slice(&header.to_bytes());

    let mut encoded_tracks = 0;
    for track in 0..geometry.tracks {
        for side in 0..geometry.sides {
            let start = geometry.track_offset(track, side);
            let raw_track = &raw[start..start + track_size];

            if !options.compression {
                container.extend_from_slice(&to_disk16(track_size as u16));
                container.extend_from_slice(raw_track);
                continue;
            }

            let chunk = compress_track(raw_track);
            if chunk.is_encoded() {
                encoded_tracks += 1;
            }
            container.extend_from_slice(&to_disk16(chunk.length_prefix()));
            container.extend_from_slice(chunk.payload());
        }
    }

    log::debug!(
        "encoded {} tracks ({} compressed): {} -> {} bytes",
        geometry.track_count(),
        encoded_tracks,
        raw.len(),
        container.len()
    );

    Ok(container)
}

/// Decode an MSA container into a raw image
pub fn decode(container: &[u8]) -> Result<Vec<u8>> {
    decode_with_header(container).map(|(_, image)| image)
}

/// Decode an MSA container, also returning its parsed header
pub fn decode_with_header(container: &[u8]) -> Result<(MsaHeader, Vec<u8>)> {
    let header = MsaHeader::parse(container)?;
    let track_size = header.track_size();

    log::debug!(
        "MSA: {} sectors/track, {} sides, tracks {}..={}",
        header.sectors_per_track,
        header.sides,
        header.start_track,
        header.end_track
    );

    // Every chunk must be present before the image buffer is sized from the header
    let chunks = split_chunks(container, &header)?;

    let mut image = Vec::with_capacity(header.image_size());
    for chunk in &chunks {
        expand_track(chunk.payload, chunk.length, track_size, &mut image)
            .map_err(|e| MsaError::malformed_track(chunk.track, chunk.side, e))?;
    }

    Ok((header, image))
}

/// List the chunks of an MSA container without expanding them
pub fn inspect(container: &[u8]) -> Result<Vec<ChunkInfo>> {
    let header = MsaHeader::parse(container)?;
    let track_size = header.track_size();

    Ok(split_chunks(container, &header)?
        .into_iter()
        .map(|chunk| ChunkInfo {
            track: chunk.track,
            side: chunk.side,
            offset: chunk.offset,
            length: chunk.length,
            encoded: chunk.length as usize != track_size,
        })
        .collect())
}

/// One length-prefixed chunk located inside a container
struct RawChunk<'a> {
    track: u16,
    side: u8,
    offset: usize,
    length: u16,
    payload: &'a [u8],
}

/// Walk the chunk table in storage order, failing on the first chunk that does not fit
fn split_chunks<'a>(container: &'a [u8], header: &MsaHeader) -> Result<Vec<RawChunk<'a>>> {
    // Each chunk takes at least its prefix, so this bounds the reservation by the input
    let max_chunks = container.len().saturating_sub(MSA_HEADER_SIZE) / CHUNK_PREFIX_SIZE;
    let mut chunks =
        Vec::with_capacity((header.track_count() * header.sides as usize).min(max_chunks));
    let mut offset = MSA_HEADER_SIZE;

    for track in header.start_track..=header.end_track {
        for side in 0..header.sides {
            let (length, payload) = read_chunk(container, offset)
                .map_err(|e| MsaError::malformed_track(track, side, e))?;
            chunks.push(RawChunk {
                track,
                side,
                offset,
                length,
                payload,
            });
            offset += CHUNK_PREFIX_SIZE + length as usize;
        }
    }

    if offset < container.len() {
        log::debug!("{} bytes after last chunk ignored", container.len() - offset);
    }

    Ok(chunks)
}

/// Split the chunk at `offset` into its length prefix and payload
fn read_chunk(container: &[u8], offset: usize) -> std::result::Result<(u16, &[u8]), TrackError> {
    let available = container.len().saturating_sub(offset);
    let length = read_word(container, offset).ok_or(TrackError::ChunkOverrun {
        offset,
        length: CHUNK_PREFIX_SIZE,
        available,
    })?;

    let start = offset + CHUNK_PREFIX_SIZE;
    let payload = container
        .get(start..start + length as usize)
        .ok_or(TrackError::ChunkOverrun {
            offset,
            length: CHUNK_PREFIX_SIZE + length as usize,
            available,
        })?;

    Ok((length, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two tracks, two sides, each track different so ordering is visible
    fn sample_image() -> (DiskGeometry, Vec<u8>) {
        let geometry = DiskGeometry::new(2, 2, 2);
        let track_size = geometry.track_size();
        let mut raw = Vec::with_capacity(geometry.total_size());

        // track 0 side 0: blank
        raw.extend(std::iter::repeat(0x00).take(track_size));
        // track 0 side 1: formatted filler
        raw.extend(std::iter::repeat(0xE5).take(track_size));
        // track 1 side 0: incompressible
        raw.extend((0..track_size).map(|i| (i % 253) as u8));
        // track 1 side 1: mixed
        raw.extend((0..track_size).map(|i| if i < 100 { 0x4E } else { (i / 3) as u8 }));

        (geometry, raw)
    }

    #[test]
    fn test_round_trip() {
        let (geometry, raw) = sample_image();
        let container = encode(&raw, geometry.sectors_per_track, geometry.sides, geometry.tracks).unwrap();
        assert_eq!(decode(&container).unwrap(), raw);
    }

    #[test]
    fn test_header_written() {
        let (geometry, raw) = sample_image();
        let container = encode_with(&raw, &geometry, &EncodeOptions::default()).unwrap();
        assert_eq!(
            &container[..MSA_HEADER_SIZE],
            &[0x0E, 0x0F, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01]
        );
    }

    #[test]
    fn test_chunk_order_and_kinds() {
        let (geometry, raw) = sample_image();
        let container = encode_with(&raw, &geometry, &EncodeOptions::default()).unwrap();
        let chunks = inspect(&container).unwrap();

        let order: Vec<(u16, u8)> = chunks.iter().map(|c| (c.track, c.side)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);

        assert!(chunks[0].encoded);
        assert_eq!(chunks[0].length, 4);
        assert!(chunks[1].encoded);
        assert!(!chunks[2].encoded);
        assert_eq!(chunks[2].length as usize, geometry.track_size());
        assert_eq!(chunks[0].offset, MSA_HEADER_SIZE);
        assert_eq!(chunks[1].offset, MSA_HEADER_SIZE + 6);
    }

    #[test]
    fn test_uncompressed_option() {
        let (geometry, raw) = sample_image();
        let container = encode_with(&raw, &geometry, &EncodeOptions::uncompressed()).unwrap();
        assert_eq!(
            container.len(),
            MSA_HEADER_SIZE + geometry.track_count() * (2 + geometry.track_size())
        );
        assert!(inspect(&container).unwrap().iter().all(|c| !c.encoded));
        assert_eq!(decode(&container).unwrap(), raw);
    }

    #[test]
    fn test_encode_rejects_wrong_size() {
        let (geometry, mut raw) = sample_image();
        raw.push(0);
        assert!(matches!(
            encode_with(&raw, &geometry, &EncodeOptions::default()),
            Err(MsaError::GeometryMismatch { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_bad_geometry() {
        assert!(matches!(
            encode(&[0u8; 1536], 1, 3, 1),
            Err(MsaError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_decode_bad_magic() {
        let (geometry, raw) = sample_image();
        let mut container = encode_with(&raw, &geometry, &EncodeOptions::default()).unwrap();
        container[0] = 0x00;
        assert!(matches!(
            decode(&container),
            Err(MsaError::InvalidMagic { found: 0x000F })
        ));
    }

    #[test]
    fn test_decode_truncated_container() {
        let (geometry, raw) = sample_image();
        let container = encode_with(&raw, &geometry, &EncodeOptions::default()).unwrap();
        let truncated = &container[..container.len() - 1];
        assert!(matches!(
            decode(truncated),
            Err(MsaError::MalformedTrack {
                track: 1,
                side: 1,
                source: TrackError::ChunkOverrun { .. }
            })
        ));
    }

    #[test]
    fn test_decode_exhausted_chunk() {
        let mut container = MsaHeader {
            sectors_per_track: 1,
            sides: 1,
            start_track: 0,
            end_track: 0,
        }
        .to_bytes()
        .to_vec();
        // Claims 3 bytes of RLE, expands to only 3 bytes of a 512 byte track
        container.extend_from_slice(&[0x00, 0x03, 0x01, 0x02, 0x03]);
        assert!(matches!(
            decode(&container),
            Err(MsaError::MalformedTrack {
                track: 0,
                side: 0,
                source: TrackError::PayloadExhausted { produced: 3, expected: 512 }
            })
        ));
    }

    #[test]
    fn test_decode_partial_track_range() {
        let mut container = MsaHeader {
            sectors_per_track: 1,
            sides: 2,
            start_track: 40,
            end_track: 41,
        }
        .to_bytes()
        .to_vec();
        for fill in [0x10u8, 0x11, 0x12, 0x13] {
            container.extend_from_slice(&[0x00, 0x04, 0xE5, fill, 0x02, 0x00]);
        }

        let (header, image) = decode_with_header(&container).unwrap();
        assert_eq!(header.track_count(), 2);
        assert_eq!(image.len(), 4 * 512);
        assert!(image[..512].iter().all(|&b| b == 0x10));
        assert!(image[1536..].iter().all(|&b| b == 0x13));

        let chunks = inspect(&container).unwrap();
        assert_eq!(chunks[0].track, 40);
        assert_eq!(chunks[3].track, 41);
        assert_eq!(chunks[3].side, 1);
    }

    #[test]
    fn test_decode_clamps_overlong_run() {
        let mut container = MsaHeader {
            sectors_per_track: 1,
            sides: 1,
            start_track: 0,
            end_track: 0,
        }
        .to_bytes()
        .to_vec();
        container.extend_from_slice(&[0x00, 0x04, 0xE5, 0x77, 0x04, 0x00]);
        assert_eq!(decode(&container).unwrap(), vec![0x77; 512]);
    }

    #[test]
    fn test_decode_oversized_header_without_chunks() {
        // 127 sectors, two sides, tracks 0..=65535 and no chunk data at all
        let container = [0x0E, 0x0F, 0x00, 0x7F, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xFF];
        assert!(matches!(
            decode(&container),
            Err(MsaError::MalformedTrack {
                track: 0,
                side: 0,
                source: TrackError::ChunkOverrun { offset: 10, .. }
            })
        ));
        assert!(matches!(
            inspect(&container),
            Err(MsaError::MalformedTrack { track: 0, side: 0, .. })
        ));
    }

    #[test]
    fn test_decode_reports_first_missing_chunk() {
        let mut container = MsaHeader {
            sectors_per_track: 1,
            sides: 2,
            start_track: 0,
            end_track: 9,
        }
        .to_bytes()
        .to_vec();
        for _ in 0..3 {
            container.extend_from_slice(&[0x00, 0x04, 0xE5, 0x00, 0x02, 0x00]);
        }
        assert!(matches!(
            decode(&container),
            Err(MsaError::MalformedTrack {
                track: 1,
                side: 1,
                source: TrackError::ChunkOverrun { .. }
            })
        ));
    }
}
