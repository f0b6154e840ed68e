//! Random-access little-endian byte reading over a seekable source.

use std::io::{Read, Seek, SeekFrom};
use lebe::prelude::*;
use crate::error::{Error, Result};


/// Random-access view over a DAT container. All multi-byte integers in the
/// format are little-endian; `ByteCursor` does not mandate a buffering
/// strategy, callers typically wrap a `BufReader<File>`.
pub struct ByteCursor<R> {
    inner: R,
}

impl<R: Read + Seek> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Seek to an absolute byte offset from the start of the stream.
    pub fn seek(&mut self, absolute_offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(absolute_offset))?;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(u8::read_from_little_endian(&mut self.inner)?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::read_from_little_endian(&mut self.inner)?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::read_from_little_endian(&mut self.inner)?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::read_from_little_endian(&mut self.inner)?)
    }

    /// Read `literal.len()` bytes and compare them against `literal`.
    /// Fails with `Error::FormatMismatch` (naming `context`) if they differ,
    /// or `Error::Truncated` if the stream runs out first.
    pub fn expect(&mut self, literal: &[u8], context: &str) -> Result<()> {
        let mut actual = vec![0_u8; literal.len()];
        self.inner.read_exact(&mut actual)
            .map_err(|_| Error::truncated(context.to_string()))?;

        if actual == literal {
            Ok(())
        } else {
            Err(Error::format_mismatch(format!("{} (expected {:?}, found {:?})", context, literal, actual)))
        }
    }

    /// Read and discard `count` bytes without allocating a destination buffer.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        let copied = std::io::copy(&mut (&mut self.inner).take(count), &mut std::io::sink())?;
        if copied != count {
            return Err(Error::truncated("skip"));
        }
        Ok(())
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Borrow the underlying reader as a trait object, for handing a frame's
    /// payload to a `BitmapTranslator` without exposing the concrete `R`.
    pub fn as_read(&mut self) -> &mut dyn Read {
        &mut self.inner
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_little_endian_primitives() {
        let bytes: Vec<u8> = vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let mut cursor = ByteCursor::new(Cursor::new(bytes));

        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_u16().unwrap(), 0x0403);
        assert_eq!(cursor.read_u16().unwrap(), 0x0605);
    }

    #[test]
    fn seek_is_absolute() {
        let bytes: Vec<u8> = vec![0xAA, 0xBB, 0xCC, 0xDD];
        let mut cursor = ByteCursor::new(Cursor::new(bytes));

        cursor.seek(2).unwrap();
        assert_eq!(cursor.read_u8().unwrap(), 0xCC);

        cursor.seek(0).unwrap();
        assert_eq!(cursor.read_u8().unwrap(), 0xAA);
    }

    #[test]
    fn expect_matches_literal() {
        let bytes: Vec<u8> = vec![1, 2, 3, 4];
        let mut cursor = ByteCursor::new(Cursor::new(bytes));
        cursor.expect(&[1, 2, 3], "test literal").unwrap();
    }

    #[test]
    fn expect_rejects_mismatch() {
        let bytes: Vec<u8> = vec![1, 2, 9, 4];
        let mut cursor = ByteCursor::new(Cursor::new(bytes));
        let result = cursor.expect(&[1, 2, 3], "test literal");
        assert!(matches!(result, Err(Error::FormatMismatch(_))));
    }

    #[test]
    fn expect_truncated_is_reported() {
        let bytes: Vec<u8> = vec![1, 2];
        let mut cursor = ByteCursor::new(Cursor::new(bytes));
        let result = cursor.expect(&[1, 2, 3, 4], "short literal");
        assert!(matches!(result, Err(Error::Truncated(_))));
    }
}
