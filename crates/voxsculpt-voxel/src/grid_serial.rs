//! Flat-file persistence for [`VoxelGrid`].
//!
//! The grid is written as a flat array of floats in storage order
//! (`x * height * depth + y * depth + z`), [`VoxelValue::COMPONENTS`] floats per
//! voxel, either as a JSON array or as a raw little-endian `f32` stream. There is
//! no header: the caller supplies the size on load and it must match exactly.

use std::io::{Read, Write};

use glam::UVec3;

use crate::grid::{VoxelGrid, volume};
use crate::value::VoxelValue;

/// Errors that can occur while saving or loading a flat grid file.
#[derive(Debug, thiserror::Error)]
pub enum GridSerError {
    /// Reading or writing the underlying stream failed.
    #[error("grid file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The JSON payload could not be encoded or decoded.
    #[error("grid JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    /// The stored float count does not match the requested grid size.
    #[error("grid file holds {actual} floats, expected {expected}")]
    SizeMismatch {
        /// Float count implied by the requested size.
        expected: usize,
        /// Float count found in the file.
        actual: usize,
    },
    /// A binary stream whose length is not a whole number of `f32`s.
    #[error("binary grid stream of {0} bytes is not a multiple of 4")]
    MisalignedBinary(usize),
}

impl<V: VoxelValue> VoxelGrid<V> {
    /// Flattens the grid into its float components.
    pub fn to_flat(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(self.voxel_count() * V::COMPONENTS);
        for v in self.as_slice() {
            v.push_components(&mut flat);
        }
        flat
    }

    /// Rebuilds a grid of `size` from a flat float buffer.
    pub fn from_flat(size: UVec3, flat: &[f32]) -> Result<Self, GridSerError> {
        let expected = volume(size) * V::COMPONENTS;
        if flat.len() != expected {
            return Err(GridSerError::SizeMismatch {
                expected,
                actual: flat.len(),
            });
        }
        let data = flat
            .chunks_exact(V::COMPONENTS)
            .map(V::from_components)
            .collect();
        tracing::debug!(size = %size, floats = flat.len(), "flat grid decoded");
        Self::from_vec(size, data).ok_or(GridSerError::SizeMismatch {
            expected,
            actual: flat.len(),
        })
    }

    /// Writes the grid as a JSON array of floats.
    pub fn save_json<W: Write>(&self, writer: W) -> Result<(), GridSerError> {
        serde_json::to_writer(writer, &self.to_flat())?;
        Ok(())
    }

    /// Reads a JSON float array into a grid of `size`.
    pub fn load_json<R: Read>(reader: R, size: UVec3) -> Result<Self, GridSerError> {
        let flat: Vec<f32> = serde_json::from_reader(reader)?;
        Self::from_flat(size, &flat)
    }

    /// Writes the grid as a raw little-endian `f32` stream.
    pub fn save_binary<W: Write>(&self, mut writer: W) -> Result<(), GridSerError> {
        let flat = self.to_flat();
        let mut buf = Vec::with_capacity(flat.len() * 4);
        for f in flat {
            buf.extend_from_slice(&f.to_le_bytes());
        }
        writer.write_all(&buf)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a raw little-endian `f32` stream into a grid of `size`.
    pub fn load_binary<R: Read>(mut reader: R, size: UVec3) -> Result<Self, GridSerError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        if bytes.len() % 4 != 0 {
            return Err(GridSerError::MisalignedBinary(bytes.len()));
        }
        let flat: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        Self::from_flat(size, &flat)
    }
}
