/// MSA container header

use crate::error::{MsaError, Result};
use crate::format::constants::*;
use crate::format::geometry::DiskGeometry;

/// Convert a big-endian on-disk word to a host integer
#[inline]
pub fn to_host16(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// Convert a host integer to a big-endian on-disk word
#[inline]
pub fn to_disk16(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

/// Read the big-endian word at `offset`, if the slice is long enough
pub(crate) fn read_word(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(to_host16([bytes[0], bytes[1]]))
}

/// Parsed MSA header with the side count already decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsaHeader {
    /// Sectors per track
    pub sectors_per_track: u16,
    /// Number of sides (1 or 2)
    pub sides: u8,
    /// First track stored (0-based)
    pub start_track: u16,
    /// Last track stored (0-based, inclusive)
    pub end_track: u16,
}

impl MsaHeader {
    /// Build a header covering every track of `geometry`, starting at track 0
    pub fn from_geometry(geometry: &DiskGeometry) -> Result<Self> {
        geometry.validate()?;
        Ok(Self {
            sectors_per_track: geometry.sectors_per_track,
            sides: geometry.sides,
            start_track: 0,
            end_track: geometry.tracks - 1,
        })
    }

    /// Parse and validate a header from the start of a container
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < MSA_HEADER_SIZE {
            return Err(MsaError::parse(
                data.len(),
                format!("MSA header needs {} bytes, got {}", MSA_HEADER_SIZE, data.len()),
            ));
        }

        let word = |index: usize| to_host16([data[index * 2], data[index * 2 + 1]]);

        let magic = word(0);
        if magic != MSA_MAGIC {
            return Err(MsaError::InvalidMagic { found: magic });
        }

        let sectors_per_track = word(1);
        let side_field = word(2);
        let start_track = word(3);
        let end_track = word(4);

        if sectors_per_track == 0 || sectors_per_track > MAX_SECTORS_PER_TRACK {
            return Err(MsaError::invalid_header(format!(
                "sectors per track {} outside 1..={}",
                sectors_per_track, MAX_SECTORS_PER_TRACK
            )));
        }
        if side_field > 1 {
            return Err(MsaError::invalid_header(format!(
                "side field {} is not 0 or 1",
                side_field
            )));
        }
        if end_track < start_track {
            return Err(MsaError::invalid_header(format!(
                "ending track {} before starting track {}",
                end_track, start_track
            )));
        }

        Ok(Self {
            sectors_per_track,
            sides: side_field as u8 + 1,
            start_track,
            end_track,
        })
    }

    /// Serialize to the on-disk layout
    pub fn to_bytes(&self) -> [u8; MSA_HEADER_SIZE] {
        let words = [
            MSA_MAGIC,
            self.sectors_per_track,
            u16::from(self.sides).saturating_sub(1),
            self.start_track,
            self.end_track,
        ];

        let mut bytes = [0u8; MSA_HEADER_SIZE];
        for (slot, word) in bytes.chunks_exact_mut(2).zip(words) {
            slot.copy_from_slice(&to_disk16(word));
        }
        bytes
    }

    /// Number of tracks stored per side
    pub fn track_count(&self) -> usize {
        (self.end_track - self.start_track) as usize + 1
    }

    /// Size of one uncompressed track in bytes
    pub fn track_size(&self) -> usize {
        self.sectors_per_track as usize * SECTOR_SIZE
    }

    /// Size of the raw image this header describes
    pub fn image_size(&self) -> usize {
        self.track_count() * self.sides as usize * self.track_size()
    }

    /// Geometry of the stored tracks
    ///
    /// Fails when the stored range holds more tracks than a geometry can count.
    pub fn geometry(&self) -> Result<DiskGeometry> {
        let tracks = u16::try_from(self.track_count()).map_err(|_| {
            MsaError::invalid_header(format!(
                "track range {}..={} holds {} tracks, more than {}",
                self.start_track,
                self.end_track,
                self.track_count(),
                u16::MAX
            ))
        })?;
        Ok(DiskGeometry::new(self.sectors_per_track, self.sides, tracks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endian_helpers() {
        assert_eq!(to_host16([0x0E, 0x0F]), 0x0E0F);
        assert_eq!(to_disk16(0x0006), [0x00, 0x06]);
        assert_eq!(read_word(&[0xAA, 0x12, 0x34], 1), Some(0x1234));
        assert_eq!(read_word(&[0x12], 0), None);
    }

    #[test]
    fn test_header_layout() {
        let header = MsaHeader {
            sectors_per_track: 9,
            sides: 2,
            start_track: 0,
            end_track: 79,
        };
        assert_eq!(
            header.to_bytes(),
            [0x0E, 0x0F, 0x00, 0x09, 0x00, 0x01, 0x00, 0x00, 0x00, 0x4F]
        );
        assert_eq!(MsaHeader::parse(&header.to_bytes()).unwrap(), header);
    }

    #[test]
    fn test_side_field_symmetry() {
        for sides in 1..=2u8 {
            let geometry = DiskGeometry::new(9, sides, 80);
            let bytes = MsaHeader::from_geometry(&geometry).unwrap().to_bytes();
            assert_eq!(to_host16([bytes[4], bytes[5]]), u16::from(sides) - 1);
            assert_eq!(MsaHeader::parse(&bytes).unwrap().sides, sides);
        }
    }

    #[test]
    fn test_parse_rejects_bad_magic() {
        let bytes = [0x0E, 0x10, 0, 9, 0, 0, 0, 0, 0, 79];
        assert!(matches!(
            MsaHeader::parse(&bytes),
            Err(MsaError::InvalidMagic { found: 0x0E10 })
        ));
    }

    #[test]
    fn test_parse_rejects_short_header() {
        assert!(matches!(
            MsaHeader::parse(&[0x0E, 0x0F, 0x00]),
            Err(MsaError::ParseError { offset: 3, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_inconsistent_fields() {
        let zero_spt = [0x0E, 0x0F, 0, 0, 0, 0, 0, 0, 0, 79];
        assert!(matches!(MsaHeader::parse(&zero_spt), Err(MsaError::InvalidHeader(_))));

        let three_sides = [0x0E, 0x0F, 0, 9, 0, 2, 0, 0, 0, 79];
        assert!(matches!(MsaHeader::parse(&three_sides), Err(MsaError::InvalidHeader(_))));

        let backwards = [0x0E, 0x0F, 0, 9, 0, 0, 0, 10, 0, 9];
        assert!(matches!(MsaHeader::parse(&backwards), Err(MsaError::InvalidHeader(_))));
    }

    #[test]
    fn test_partial_track_range() {
        let header = MsaHeader {
            sectors_per_track: 10,
            sides: 1,
            start_track: 5,
            end_track: 9,
        };
        assert_eq!(header.track_count(), 5);
        assert_eq!(header.image_size(), 5 * 10 * 512);
    }

    #[test]
    fn test_geometry_of_full_track_range() {
        let header = MsaHeader {
            sectors_per_track: 1,
            sides: 1,
            start_track: 0,
            end_track: u16::MAX,
        };
        assert_eq!(header.track_count(), 65536);
        assert!(matches!(header.geometry(), Err(MsaError::InvalidHeader(_))));

        let header = MsaHeader { start_track: 1, ..header };
        assert_eq!(header.geometry().unwrap().tracks, u16::MAX);
    }
}
