//! Bounds probing: dimensions and EXIF orientation without decoding pixels.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::Path;

use exif::{In, Reader, Tag};
use image::ImageReader;

use super::{DecodeError, ImageBounds, NaturalDimensions, Orientation};

/// Read the natural dimensions and orientation of an image file.
///
/// Only the image header and the EXIF block are read; no pixel storage is
/// allocated.
///
/// # Errors
///
/// Returns `DecodeError::UnreadablePath` if the file cannot be opened, its
/// format is not recognized, or it reports zero dimensions.
pub fn probe_bounds(path: &Path) -> Result<ImageBounds, DecodeError> {
    let (width, height) = ImageReader::open(path)
        .map_err(|e| unreadable(path, e))?
        .with_guessed_format()
        .map_err(|e| unreadable(path, e))?
        .into_dimensions()
        .map_err(|e| unreadable(path, e))?;

    let dimensions = NaturalDimensions::new(width, height);
    if !dimensions.is_valid() {
        return Err(unreadable(
            path,
            format!("invalid dimensions {width}x{height}"),
        ));
    }

    Ok(ImageBounds {
        dimensions,
        orientation: read_orientation(path),
    })
}

/// Read the natural dimensions and orientation of an in-memory image.
pub fn probe_bounds_from_bytes(bytes: &[u8]) -> Result<ImageBounds, DecodeError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::UnreadablePath(e.to_string()))?
        .into_dimensions()
        .map_err(|e| DecodeError::UnreadablePath(e.to_string()))?;

    let dimensions = NaturalDimensions::new(width, height);
    if !dimensions.is_valid() {
        return Err(DecodeError::UnreadablePath(format!(
            "invalid dimensions {width}x{height}"
        )));
    }

    Ok(ImageBounds {
        dimensions,
        orientation: orientation_from_container(&mut Cursor::new(bytes)),
    })
}

/// Read the EXIF orientation of an image file.
///
/// Returns `Orientation::Undefined` if the file cannot be read, carries no
/// EXIF data, or the orientation tag is missing or unsupported.
pub fn read_orientation(path: &Path) -> Orientation {
    match File::open(path) {
        Ok(file) => orientation_from_container(&mut BufReader::new(file)),
        Err(_) => Orientation::Undefined,
    }
}

fn unreadable(path: &Path, reason: impl Display) -> DecodeError {
    DecodeError::UnreadablePath(format!("{}: {}", path.display(), reason))
}

fn orientation_from_container<R: BufRead + Seek>(reader: &mut R) -> Orientation {
    let exif = match Reader::new().read_from_container(reader) {
        Ok(exif) => exif,
        Err(_) => return Orientation::Undefined,
    };

    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}
