/// Errors that abort decoding a `.vox` file.
///
/// Unknown chunks and bad voxel records are recovered locally and never
/// surface here.
#[derive(Debug, thiserror::Error)]
pub enum VoxError {
    /// The first four bytes are not `"VOX "`.
    #[error("not a vox file: magic is {0:?}")]
    InvalidMagic([u8; 4]),

    /// A read ran past the end of the file or of its enclosing chunk.
    #[error("vox data truncated at byte {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The file held no complete model (no `SIZE` + `XYZI` pair).
    #[error("vox file contains no models")]
    NoModels,

    /// A `SIZE` chunk with an axis outside `1..=MAX_MODEL_SIZE`.
    #[error("model size {size:?} is outside 1..={max} per axis")]
    InvalidSize { size: [i32; 3], max: i32 },

    /// A model whose translation puts its extent outside the `i32` range.
    #[error("model {model} at {position:?} extends past the coordinate range")]
    PositionOutOfRange { model: usize, position: [i32; 3] },

    /// The composited bounding box spans more voxels than a grid may hold.
    #[error("vox scene spans {min:?}..{max:?}, more than {limit} voxels")]
    SceneTooLarge {
        min: [i32; 3],
        max: [i32; 3],
        limit: u64,
    },
}
