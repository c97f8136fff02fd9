/// MSA and raw ST file writer

use crate::codec::EncodeOptions;
use crate::error::Result;
use crate::image::DiskImage;
use std::fs;
use std::path::Path;

/// Encode an image and write it as an MSA file
pub fn write_msa<P: AsRef<Path>>(image: &DiskImage, path: P, options: &EncodeOptions) -> Result<()> {
    let container = image.to_msa_with(options)?;
    fs::write(&path, &container)?;
    log::debug!(
        "wrote {} bytes of MSA to {}",
        container.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Write an image as a raw ST sector dump
pub fn write_st<P: AsRef<Path>>(image: &DiskImage, path: P) -> Result<()> {
    fs::write(&path, image.data())?;
    log::debug!(
        "wrote {} raw bytes to {}",
        image.data().len(),
        path.as_ref().display()
    );
    Ok(())
}
