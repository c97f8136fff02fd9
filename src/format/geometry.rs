/// Disk geometry, presets and detection from raw image contents

use crate::error::{MsaError, Result};
use crate::format::constants::*;

/// Physical layout of a raw ST image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskGeometry {
    /// Sectors per track (512 bytes each)
    pub sectors_per_track: u16,
    /// Number of sides (1 or 2)
    pub sides: u8,
    /// Number of tracks per side
    pub tracks: u16,
}

impl DiskGeometry {
    /// Create a new geometry
    pub fn new(sectors_per_track: u16, sides: u8, tracks: u16) -> Self {
        Self {
            sectors_per_track,
            sides,
            tracks,
        }
    }

    /// Single-sided double density (80 tracks, 9 sectors, 360K)
    pub fn atari_ss_dd() -> Self {
        Self::new(9, 1, 80)
    }

    /// Double-sided double density (80 tracks, 9 sectors, 720K)
    pub fn atari_ds_dd() -> Self {
        Self::new(9, 2, 80)
    }

    /// Double-sided with 10 sectors per track (800K)
    pub fn atari_ds_dd_10() -> Self {
        Self::new(10, 2, 80)
    }

    /// Double-sided with 11 sectors per track (880K)
    pub fn atari_ds_dd_11() -> Self {
        Self::new(11, 2, 80)
    }

    /// Double-sided high density (80 tracks, 18 sectors, 1.44M)
    pub fn atari_ds_hd() -> Self {
        Self::new(18, 2, 80)
    }

    /// Size of one track in bytes
    pub fn track_size(&self) -> usize {
        self.sectors_per_track as usize * SECTOR_SIZE
    }

    /// Number of (track, side) pairs
    pub fn track_count(&self) -> usize {
        self.tracks as usize * self.sides as usize
    }

    /// Calculate total disk capacity in bytes
    pub fn total_size(&self) -> usize {
        self.track_count() * self.track_size()
    }

    /// Calculate total disk capacity in kilobytes
    pub fn total_size_kb(&self) -> usize {
        self.total_size() / 1024
    }

    /// Byte offset of a track within a raw image
    pub fn track_offset(&self, track: u16, side: u8) -> usize {
        (track as usize * self.sides as usize + side as usize) * self.track_size()
    }

    /// Check that this geometry can be stored in an MSA header
    pub fn validate(&self) -> Result<()> {
        if self.sectors_per_track == 0 || self.sectors_per_track > MAX_SECTORS_PER_TRACK {
            return Err(MsaError::invalid_geometry(format!(
                "sectors per track {} outside 1..={}",
                self.sectors_per_track, MAX_SECTORS_PER_TRACK
            )));
        }
        if !(1..=2).contains(&self.sides) {
            return Err(MsaError::invalid_geometry(format!(
                "{} sides, expected 1 or 2",
                self.sides
            )));
        }
        if self.tracks == 0 {
            return Err(MsaError::invalid_geometry("no tracks"));
        }
        Ok(())
    }

    /// Check that a raw image of `size` bytes holds exactly this geometry
    pub fn check_image_size(&self, size: usize) -> Result<()> {
        self.validate()?;
        let cylinder = self.track_size() * self.sides as usize;
        if size % cylinder != 0 {
            return Err(MsaError::geometry_mismatch(
                size,
                format!("not a multiple of {} bytes per cylinder", cylinder),
            ));
        }
        if size != self.total_size() {
            return Err(MsaError::geometry_mismatch(
                size,
                format!(
                    "expected {} bytes for {} tracks x {} sides x {} sectors",
                    self.total_size(),
                    self.tracks,
                    self.sides,
                    self.sectors_per_track
                ),
            ));
        }
        Ok(())
    }
}

/// Sector counts tried when the boot sector cannot be trusted
const GUESS_SECTORS_PER_TRACK: [u16; 4] = [9, 10, 11, 18];

/// Track counts tried when the boot sector cannot be trusted
const GUESS_TRACKS: std::ops::RangeInclusive<u16> = 78..=86;

/// Images below this size are assumed single sided
const SINGLE_SIDED_LIMIT: usize = 500 * 1024;

/// Work out the geometry of a raw ST image
///
/// The BIOS parameter block in the boot sector is used when its total sector
/// count agrees with the image size. Otherwise the side count is guessed from
/// the size and the common sector/track counts are tried in turn.
pub fn detect_geometry(raw: &[u8]) -> Result<DiskGeometry> {
    let size = raw.len();
    if size == 0 || size % SECTOR_SIZE != 0 {
        return Err(MsaError::geometry_mismatch(
            size,
            format!("not a whole number of {} byte sectors", SECTOR_SIZE),
        ));
    }

    if let Some(geometry) = geometry_from_boot_sector(raw) {
        log::debug!("geometry from boot sector: {:?}", geometry);
        return Ok(geometry);
    }

    match geometry_from_size(size) {
        Some(geometry) => {
            log::debug!("geometry guessed from size {}: {:?}", size, geometry);
            Ok(geometry)
        }
        None => Err(MsaError::geometry_mismatch(
            size,
            "no boot sector geometry and no standard layout matches",
        )),
    }
}

fn read_le16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn geometry_from_boot_sector(raw: &[u8]) -> Option<DiskGeometry> {
    let total_sectors = read_le16(raw, BPB_TOTAL_SECTORS_OFFSET)? as usize;
    let sectors_per_track = read_le16(raw, BPB_SECTORS_PER_TRACK_OFFSET)?;
    let sides = read_le16(raw, BPB_SIDES_OFFSET)?;

    if total_sectors != raw.len() / SECTOR_SIZE {
        log::debug!(
            "boot sector claims {} sectors, image holds {}",
            total_sectors,
            raw.len() / SECTOR_SIZE
        );
        return None;
    }
    if sectors_per_track == 0 || sectors_per_track > MAX_SECTORS_PER_TRACK {
        return None;
    }
    if !(1..=2).contains(&sides) {
        return None;
    }

    let per_cylinder = sectors_per_track as usize * sides as usize;
    if total_sectors % per_cylinder != 0 {
        return None;
    }
    let tracks = u16::try_from(total_sectors / per_cylinder).ok()?;

    Some(DiskGeometry::new(sectors_per_track, sides as u8, tracks))
}

fn geometry_from_size(size: usize) -> Option<DiskGeometry> {
    let guessed_sides: u8 = if size < SINGLE_SIDED_LIMIT { 1 } else { 2 };

    for sides in [guessed_sides, 3 - guessed_sides] {
        for sectors_per_track in GUESS_SECTORS_PER_TRACK {
            for tracks in GUESS_TRACKS {
                let geometry = DiskGeometry::new(sectors_per_track, sides, tracks);
                if geometry.total_size() == size {
                    return Some(geometry);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_image(geometry: DiskGeometry) -> Vec<u8> {
        vec![0u8; geometry.total_size()]
    }

    fn write_bpb(raw: &mut [u8], total: u16, spt: u16, sides: u16) {
        raw[BPB_TOTAL_SECTORS_OFFSET..BPB_TOTAL_SECTORS_OFFSET + 2]
            .copy_from_slice(&total.to_le_bytes());
        raw[BPB_SECTORS_PER_TRACK_OFFSET..BPB_SECTORS_PER_TRACK_OFFSET + 2]
            .copy_from_slice(&spt.to_le_bytes());
        raw[BPB_SIDES_OFFSET..BPB_SIDES_OFFSET + 2].copy_from_slice(&sides.to_le_bytes());
    }

    #[test]
    fn test_preset_capacities() {
        assert_eq!(DiskGeometry::atari_ss_dd().total_size_kb(), 360);
        assert_eq!(DiskGeometry::atari_ds_dd().total_size_kb(), 720);
        assert_eq!(DiskGeometry::atari_ds_dd_10().total_size_kb(), 800);
        assert_eq!(DiskGeometry::atari_ds_dd_11().total_size_kb(), 880);
        assert_eq!(DiskGeometry::atari_ds_hd().total_size_kb(), 1440);
    }

    #[test]
    fn test_track_offset_is_side_minor() {
        let geometry = DiskGeometry::atari_ds_dd();
        assert_eq!(geometry.track_offset(0, 0), 0);
        assert_eq!(geometry.track_offset(0, 1), 4608);
        assert_eq!(geometry.track_offset(1, 0), 2 * 4608);
    }

    #[test]
    fn test_validate() {
        assert!(DiskGeometry::atari_ds_dd().validate().is_ok());
        assert!(DiskGeometry::new(0, 1, 80).validate().is_err());
        assert!(DiskGeometry::new(128, 1, 80).validate().is_err());
        assert!(DiskGeometry::new(9, 3, 80).validate().is_err());
        assert!(DiskGeometry::new(9, 1, 0).validate().is_err());
    }

    #[test]
    fn test_check_image_size() {
        let geometry = DiskGeometry::new(9, 2, 2);
        assert!(geometry.check_image_size(4 * 4608).is_ok());
        assert!(matches!(
            geometry.check_image_size(4 * 4608 + 512),
            Err(MsaError::GeometryMismatch { .. })
        ));
        assert!(matches!(
            geometry.check_image_size(6 * 4608),
            Err(MsaError::GeometryMismatch { .. })
        ));
    }

    #[test]
    fn test_detect_from_boot_sector() {
        let geometry = DiskGeometry::new(10, 2, 82);
        let mut raw = blank_image(geometry);
        write_bpb(&mut raw, 1640, 10, 2);
        assert_eq!(detect_geometry(&raw).unwrap(), geometry);
    }

    #[test]
    fn test_detect_ignores_lying_boot_sector() {
        let mut raw = blank_image(DiskGeometry::atari_ss_dd());
        // Claims double sided, but the image is only 360K
        write_bpb(&mut raw, 1440, 9, 2);
        assert_eq!(detect_geometry(&raw).unwrap(), DiskGeometry::atari_ss_dd());
    }

    #[test]
    fn test_detect_from_size() {
        for geometry in [
            DiskGeometry::atari_ss_dd(),
            DiskGeometry::atari_ds_dd(),
            DiskGeometry::atari_ds_dd_10(),
            DiskGeometry::atari_ds_hd(),
        ] {
            assert_eq!(detect_geometry(&blank_image(geometry)).unwrap(), geometry);
        }
    }

    #[test]
    fn test_detect_rejects_odd_sizes() {
        assert!(matches!(detect_geometry(&[]), Err(MsaError::GeometryMismatch { .. })));
        assert!(matches!(
            detect_geometry(&[0u8; 1000]),
            Err(MsaError::GeometryMismatch { .. })
        ));
        assert!(matches!(
            detect_geometry(&[0u8; 512 * 7]),
            Err(MsaError::GeometryMismatch { .. })
        ));
    }
}
