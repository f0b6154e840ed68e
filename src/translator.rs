//! The pluggable bitmap-decoding boundary (spec §6). Decoding pixels is out
//! of scope for this core; translators are supplied by the caller.

use std::io::Read;
use crate::format::DatFileType;


/// A decoded frame, or the explicit absence of one.
///
/// Modeled as a sum type rather than a process-wide singleton (spec §9):
/// `Image::Null` replaces the source's global `NullImage` instance, so the
/// "no image" case is always visible in the type instead of requiring an
/// identity check against a shared static.
#[derive(Debug, Clone)]
pub enum Image<T> {
    Decoded(T),
    Null,
}

impl<T> Image<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, Image::Null)
    }

    pub fn as_ref(&self) -> Image<&T> {
        match self {
            Image::Decoded(value) => Image::Decoded(value),
            Image::Null => Image::Null,
        }
    }
}


/// Contract for a pluggable per-category bitmap decoder. Translators are
/// stateless: given a reader positioned at a frame's payload and the
/// container's pixel-format hint, produce a decoded image of type `T`.
///
/// A Container holds one translator instance per category that can carry
/// image data (Settler, Torso, Landscape, Shadow, Gui). The method takes a
/// `dyn Read` rather than a generic reader so a Container can hold its five
/// translators as trait objects.
pub trait BitmapTranslator {
    type Output;

    /// Decode the frame payload starting at the reader's current position.
    /// The caller has already seeked to the frame's absolute offset.
    fn translate(&self, reader: &mut dyn Read, pixel_format: DatFileType) -> Result<Self::Output, String>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_image_reports_is_null() {
        let image: Image<u32> = Image::Null;
        assert!(image.is_null());

        let decoded: Image<u32> = Image::Decoded(7);
        assert!(!decoded.is_null());
    }
}
