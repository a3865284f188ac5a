//! Bounds-checked little-endian cursor over a byte slice.

use crate::error::VoxError;

/// A cursor that reports its absolute file offset in errors.
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            base: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub(crate) fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub(crate) fn bytes(&mut self, n: usize) -> Result<&'a [u8], VoxError> {
        let available = self.bytes.len() - self.pos;
        if n > available {
            return Err(VoxError::Truncated {
                offset: self.offset(),
                needed: n,
                available,
            });
        }
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Splits off the next `n` bytes as an independent reader.
    pub(crate) fn take(&mut self, n: usize) -> Result<ByteReader<'a>, VoxError> {
        let base = self.offset();
        let bytes = self.bytes(n)?;
        Ok(ByteReader { bytes, pos: 0, base })
    }

    pub(crate) fn array<const N: usize>(&mut self) -> Result<[u8; N], VoxError> {
        let mut out = [0; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, VoxError> {
        Ok(self.array::<1>()?[0])
    }

    pub(crate) fn u32(&mut self) -> Result<u32, VoxError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    pub(crate) fn i32(&mut self) -> Result<i32, VoxError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    /// A `u32` length followed by that many bytes. NUL bytes are dropped.
    pub(crate) fn string(&mut self) -> Result<String, VoxError> {
        let len = self.u32()? as usize;
        let raw = self.bytes(len)?;
        let trimmed: Vec<u8> = raw.iter().copied().filter(|b| *b != 0).collect();
        Ok(String::from_utf8_lossy(&trimmed).into_owned())
    }
}
