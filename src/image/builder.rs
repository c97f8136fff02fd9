/// Builder for creating blank images

use crate::error::Result;
use crate::format::{DiskGeometry, ImageFormat, FORMAT_FILLER_BYTE};
use crate::image::DiskImage;

/// Builder for constructing blank, formatted images
pub struct DiskImageBuilder {
    format: ImageFormat,
    geometry: DiskGeometry,
    filler_byte: u8,
}

impl DiskImageBuilder {
    /// Create a new builder with default values (720K double-sided MSA)
    pub fn new() -> Self {
        Self {
            format: ImageFormat::Msa,
            geometry: DiskGeometry::atari_ds_dd(),
            filler_byte: FORMAT_FILLER_BYTE,
        }
    }

    /// Set the image format
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the whole geometry
    pub fn geometry(mut self, geometry: DiskGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the number of sides
    pub fn sides(mut self, sides: u8) -> Self {
        self.geometry.sides = sides;
        self
    }

    /// Set the number of tracks per side
    pub fn tracks(mut self, tracks: u16) -> Self {
        self.geometry.tracks = tracks;
        self
    }

    /// Set sectors per track
    pub fn sectors_per_track(mut self, sectors_per_track: u16) -> Self {
        self.geometry.sectors_per_track = sectors_per_track;
        self
    }

    /// Set the byte every sector is filled with
    pub fn filler_byte(mut self, filler_byte: u8) -> Self {
        self.filler_byte = filler_byte;
        self
    }

    /// Build the image with the specified configuration
    pub fn build(self) -> Result<DiskImage> {
        self.geometry.validate()?;

        Ok(DiskImage {
            format: self.format,
            geometry: self.geometry,
            data: vec![self.filler_byte; self.geometry.total_size()],
            changed: true, // Newly created image is considered changed
            filename: None,
        })
    }
}

impl Default for DiskImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MsaError;

    #[test]
    fn test_builder_default() {
        let image = DiskImageBuilder::new().build().unwrap();

        assert_eq!(image.format(), ImageFormat::Msa);
        assert_eq!(*image.geometry(), DiskGeometry::atari_ds_dd());
        assert!(image.data().iter().all(|&b| b == FORMAT_FILLER_BYTE));
    }

    #[test]
    fn test_builder_custom() {
        let image = DiskImageBuilder::new()
            .format(ImageFormat::RawSt)
            .sides(1)
            .tracks(82)
            .sectors_per_track(10)
            .filler_byte(0x00)
            .build()
            .unwrap();

        assert_eq!(image.format(), ImageFormat::RawSt);
        assert_eq!(image.geometry().tracks, 82);
        assert_eq!(image.total_capacity(), 82 * 10 * 512);
        assert!(image.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_builder_rejects_bad_geometry() {
        let result = DiskImageBuilder::new().sides(3).build();
        assert!(matches!(result, Err(MsaError::InvalidGeometry(_))));
    }
}
