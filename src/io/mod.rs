/// I/O operations for reading and writing image files

/// Reader implementation for MSA and raw ST files
pub mod reader;
/// Writer implementation for MSA and raw ST files
pub mod writer;

pub use reader::{is_msa_file, read_msa, read_st};
pub use writer::{write_msa, write_st};
