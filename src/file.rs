//! Encode and decode whole files.

use crate::codec::{decode, encode_with, Options, Stats};
use crate::container::Container;
use crate::decode::Strategy;
use crate::error::Result;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// `input` with `.huff` appended.
pub fn default_output(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".huff");
    PathBuf::from(name)
}

/// Reads UTF-8 text from `input` and writes its container to `output`, or
/// to [`default_output`] when none is given.
pub fn encode_file(
    input: impl AsRef<Path>,
    output: Option<&Path>,
    options: &Options,
) -> Result<Stats> {
    let input = input.as_ref();
    let text = String::from_utf8(fs::read(input)?)?;
    let (container, stats) = encode_with(&text, options)?;

    let output = output.map_or_else(|| default_output(input), Path::to_path_buf);
    fs::write(&output, container.serialize()?)?;

    log::debug!("wrote {} from {}", output.display(), input.display());
    Ok(stats)
}

/// Reads a container from `input` and writes the decoded text to `output`.
pub fn decode_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    strategy: Strategy,
) -> Result<()> {
    let bytes = fs::read(input.as_ref())?;
    let container = Container::parse(&bytes)?;
    let text = decode(&container, strategy)?;
    fs::write(output.as_ref(), text)?;
    Ok(())
}
