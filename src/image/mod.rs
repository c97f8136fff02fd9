/// In-memory disk image

/// Image builder for creating blank images
pub mod builder;

pub use builder::DiskImageBuilder;

use crate::codec::{self, EncodeOptions};
use crate::error::{MsaError, Result};
use crate::format::{detect_geometry, DiskGeometry, ImageFormat, MsaHeader, SECTOR_SIZE};
use std::path::Path;

/// Raw ST disk image with its geometry
///
/// Data is held as the flat sector dump: tracks in order, side 0 then side 1
/// for each track. MSA containers are expanded on load and re-encoded on save.
#[derive(Debug, Clone)]
pub struct DiskImage {
    /// Format the image was loaded from or created for
    pub(crate) format: ImageFormat,
    /// Physical layout
    pub(crate) geometry: DiskGeometry,
    /// Raw sector data
    pub(crate) data: Vec<u8>,
    /// Has the image been modified?
    pub(crate) changed: bool,
    /// Original filename if loaded from disk
    pub(crate) filename: Option<String>,
}

impl DiskImage {
    /// Open an MSA or raw ST file from disk
    ///
    /// Automatically detects file type based on extension:
    /// - `.msa` files are decoded from the MSA container
    /// - All other extensions are read as raw ST images
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        match ImageFormat::from_path(&path) {
            ImageFormat::Msa => crate::io::read_msa(path),
            ImageFormat::RawSt => crate::io::read_st(path),
        }
    }

    /// Create a blank, formatted image with the given geometry
    pub fn create(geometry: DiskGeometry) -> Result<Self> {
        DiskImageBuilder::new().geometry(geometry).build()
    }

    /// Create a new builder for constructing images
    pub fn builder() -> DiskImageBuilder {
        DiskImageBuilder::new()
    }

    /// Decode an MSA container held in memory
    pub fn from_msa(container: &[u8]) -> Result<Self> {
        let geometry = MsaHeader::parse(container)?.geometry()?;
        let (_, data) = codec::decode_with_header(container)?;
        Ok(Self {
            format: ImageFormat::Msa,
            geometry,
            data,
            changed: false,
            filename: None,
        })
    }

    /// Wrap a raw sector dump, detecting its geometry
    pub fn from_raw(data: Vec<u8>) -> Result<Self> {
        let geometry = detect_geometry(&data)?;
        Self::with_geometry(data, geometry)
    }

    /// Wrap a raw sector dump with a known geometry
    pub fn with_geometry(data: Vec<u8>, geometry: DiskGeometry) -> Result<Self> {
        geometry.check_image_size(data.len())?;
        Ok(Self {
            format: ImageFormat::RawSt,
            geometry,
            data,
            changed: false,
            filename: None,
        })
    }

    /// Get the format type
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Get the disk geometry
    pub fn geometry(&self) -> &DiskGeometry {
        &self.geometry
    }

    /// Get the original filename if loaded from disk
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Raw sector data in on-disk order
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image, returning the raw sector data
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the data of one track
    pub fn track(&self, track: u16, side: u8) -> Result<&[u8]> {
        let range = self.track_range(track, side)?;
        Ok(&self.data[range])
    }

    /// Read sector data (sector numbers start at 1)
    pub fn read_sector(&self, side: u8, track: u16, sector: u16) -> Result<&[u8]> {
        let range = self.sector_range(side, track, sector)?;
        Ok(&self.data[range])
    }

    /// Write sector data (sector numbers start at 1)
    ///
    /// Short data is padded with zeros, longer data is truncated to one sector.
    pub fn write_sector(&mut self, side: u8, track: u16, sector: u16, data: &[u8]) -> Result<()> {
        let range = self.sector_range(side, track, sector)?;
        let target = &mut self.data[range];
        let len = data.len().min(SECTOR_SIZE);
        target[..len].copy_from_slice(&data[..len]);
        target[len..].fill(0);
        self.changed = true;
        Ok(())
    }

    /// Encode the image as an MSA container
    pub fn to_msa(&self) -> Result<Vec<u8>> {
        self.to_msa_with(&EncodeOptions::default())
    }

    /// Encode the image as an MSA container with explicit options
    pub fn to_msa_with(&self, options: &EncodeOptions) -> Result<Vec<u8>> {
        codec::encode_with(&self.data, &self.geometry, options)
    }

    /// Save the image, choosing the format from the file extension
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let format = ImageFormat::from_path(&path);
        self.save_as(path, format, &EncodeOptions::default())
    }

    /// Save the image in an explicit format
    pub fn save_as<P: AsRef<Path>>(
        &mut self,
        path: P,
        format: ImageFormat,
        options: &EncodeOptions,
    ) -> Result<()> {
        match format {
            ImageFormat::Msa => crate::io::write_msa(self, &path, options)?,
            ImageFormat::RawSt => crate::io::write_st(self, &path)?,
        }
        self.format = format;
        self.changed = false;
        Ok(())
    }

    /// Check if the image has been modified
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Mark the image as unchanged
    pub fn mark_unchanged(&mut self) {
        self.changed = false;
    }

    /// Get the total capacity of the disk in bytes
    pub fn total_capacity(&self) -> usize {
        self.geometry.total_size()
    }

    /// Get the total capacity of the disk in kilobytes
    pub fn total_capacity_kb(&self) -> usize {
        self.geometry.total_size_kb()
    }

    fn track_range(&self, track: u16, side: u8) -> Result<std::ops::Range<usize>> {
        if side >= self.geometry.sides {
            return Err(MsaError::InvalidTrack {
                side,
                track,
                max: self.geometry.tracks.saturating_sub(1),
            });
        }
        if track >= self.geometry.tracks {
            return Err(MsaError::InvalidTrack {
                side,
                track,
                max: self.geometry.tracks.saturating_sub(1),
            });
        }
        let start = self.geometry.track_offset(track, side);
        Ok(start..start + self.geometry.track_size())
    }

    fn sector_range(&self, side: u8, track: u16, sector: u16) -> Result<std::ops::Range<usize>> {
        let track_range = self.track_range(track, side)?;
        if sector == 0 || sector > self.geometry.sectors_per_track {
            return Err(MsaError::InvalidSector {
                side,
                track,
                sector,
            });
        }
        let start = track_range.start + (sector as usize - 1) * SECTOR_SIZE;
        Ok(start..start + SECTOR_SIZE)
    }
}
