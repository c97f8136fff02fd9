/// MSA and raw ST file reader

use crate::error::Result;
use crate::format::ImageFormat;
use crate::image::DiskImage;
use std::fs;
use std::path::Path;

/// Check if a file is likely an MSA file based on extension
pub fn is_msa_file<P: AsRef<Path>>(path: P) -> bool {
    ImageFormat::from_path(path) == ImageFormat::Msa
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.to_string())
}

/// Read and decode an MSA file
pub fn read_msa<P: AsRef<Path>>(path: P) -> Result<DiskImage> {
    let container = fs::read(&path)?;
    log::debug!("read {} bytes from {}", container.len(), path.as_ref().display());

    let mut image = DiskImage::from_msa(&container)?;
    image.filename = file_name(path.as_ref());
    Ok(image)
}

/// Read a raw ST file, detecting its geometry
pub fn read_st<P: AsRef<Path>>(path: P) -> Result<DiskImage> {
    let data = fs::read(&path)?;
    log::debug!("read {} bytes from {}", data.len(), path.as_ref().display());

    let mut image = DiskImage::from_raw(data)?;
    image.filename = file_name(path.as_ref());
    Ok(image)
}
