//! Chunk-level parsing into models and a palette.
//!
//! Layout: 8-byte header (`"VOX "` + version), then chunks of
//! `id[4] content_len:u32 children_len:u32 content children`. `MAIN` holds the
//! rest of the file as children. Each known chunk is parsed from a reader
//! bounded by its declared content length, so an overlong record fails as
//! truncated instead of reading into the next chunk.

use glam::IVec3;

use crate::error::VoxError;
use crate::palette::Palette;
use crate::reader::ByteReader;

const MAGIC: [u8; 4] = *b"VOX ";

/// Largest edge MagicaVoxel allows for a single model.
pub const MAX_MODEL_SIZE: i32 = 256;

/// One voxel record: model-local position and palette index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxVoxel {
    pub x: u8,
    pub y: u8,
    pub z: u8,
    pub index: u8,
}

impl VoxVoxel {
    pub fn position(&self) -> IVec3 {
        IVec3::new(self.x as i32, self.y as i32, self.z as i32)
    }
}

/// A sub-model with its declared size and world position (Z-up file axes).
#[derive(Clone, Debug, PartialEq)]
pub struct VoxModel {
    pub size: IVec3,
    pub voxels: Vec<VoxVoxel>,
    pub position: IVec3,
}

/// Every model in a file plus the shared palette.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxScene {
    pub models: Vec<VoxModel>,
    pub palette: Palette,
}

#[derive(Default)]
struct Chunks {
    sizes: Vec<IVec3>,
    voxel_lists: Vec<Vec<VoxVoxel>>,
    positions: Vec<IVec3>,
    palette: Option<Palette>,
    skipped: usize,
}

/// Parses a `.vox` byte stream.
///
/// Models pair `SIZE` and `XYZI` chunks in file order. The n-th `_t`
/// translation found in an `nTRN` chunk positions the n-th model; models
/// without one sit at the origin.
pub fn parse(bytes: &[u8]) -> Result<VoxScene, VoxError> {
    let mut reader = ByteReader::new(bytes);
    let magic = reader.array::<4>()?;
    if magic != MAGIC {
        return Err(VoxError::InvalidMagic(magic));
    }
    let version = reader.u32()?;
    tracing::debug!(version, "vox header");

    let mut chunks = Chunks::default();
    while !reader.is_empty() {
        let id = reader.array::<4>()?;
        let content_len = reader.u32()? as usize;
        let children_len = reader.u32()? as usize;
        let _content = reader.take(content_len)?;
        let mut children = reader.take(children_len)?;
        if &id == b"MAIN" {
            read_children(&mut children, &mut chunks)?;
        } else {
            chunks.skipped += 1;
        }
    }

    let Chunks {
        sizes,
        voxel_lists,
        positions,
        palette,
        skipped,
    } = chunks;

    if sizes.len() != voxel_lists.len() {
        tracing::warn!(
            sizes = sizes.len(),
            voxel_lists = voxel_lists.len(),
            "unpaired SIZE/XYZI chunks, extra ones ignored"
        );
    }
    let models: Vec<VoxModel> = sizes
        .into_iter()
        .zip(voxel_lists)
        .enumerate()
        .map(|(i, (size, voxels))| VoxModel {
            size,
            voxels,
            position: positions.get(i).copied().unwrap_or(IVec3::ZERO),
        })
        .collect();

    if palette.is_none() {
        tracing::debug!("no RGBA chunk, using default palette");
    }
    tracing::debug!(models = models.len(), skipped_chunks = skipped, "vox parsed");

    Ok(VoxScene {
        models,
        palette: palette.unwrap_or_default(),
    })
}

fn read_children(reader: &mut ByteReader<'_>, chunks: &mut Chunks) -> Result<(), VoxError> {
    while !reader.is_empty() {
        let id = reader.array::<4>()?;
        let content_len = reader.u32()? as usize;
        let children_len = reader.u32()? as usize;
        let mut content = reader.take(content_len)?;
        reader.take(children_len)?;

        match &id {
            b"SIZE" => chunks.sizes.push(read_size(&mut content)?),
            b"XYZI" => chunks.voxel_lists.push(read_voxels(&mut content)?),
            b"nTRN" => {
                if let Some(position) = read_translation(&mut content)? {
                    chunks.positions.push(position);
                }
            }
            b"RGBA" => {
                let mut quads = [[0u8; 4]; 256];
                for quad in &mut quads {
                    *quad = content.array()?;
                }
                chunks.palette = Some(Palette::from_rgba(&quads));
            }
            _ => chunks.skipped += 1,
        }
    }
    Ok(())
}

fn read_size(content: &mut ByteReader<'_>) -> Result<IVec3, VoxError> {
    let size = IVec3::new(content.i32()?, content.i32()?, content.i32()?);
    if size.cmplt(IVec3::ONE).any() || size.cmpgt(IVec3::splat(MAX_MODEL_SIZE)).any() {
        return Err(VoxError::InvalidSize {
            size: size.to_array(),
            max: MAX_MODEL_SIZE,
        });
    }
    Ok(size)
}

fn read_voxels(content: &mut ByteReader<'_>) -> Result<Vec<VoxVoxel>, VoxError> {
    let count = content.u32()? as usize;
    // Each record is four bytes; validate before allocating.
    let records = content.bytes(count.saturating_mul(4))?;
    Ok(records
        .chunks_exact(4)
        .map(|r| VoxVoxel {
            x: r[0],
            y: r[1],
            z: r[2],
            index: r[3],
        })
        .collect())
}

/// Reads a transform node and returns its first `_t` translation, if any.
fn read_translation(content: &mut ByteReader<'_>) -> Result<Option<IVec3>, VoxError> {
    let node_id = content.i32()?;
    skip_dict(content)?;
    let _child_id = content.i32()?;
    let _reserved = content.i32()?;
    let _layer_id = content.i32()?;
    let frames = content.u32()?;

    let mut translation = None;
    for _ in 0..frames {
        let pairs = content.u32()?;
        for _ in 0..pairs {
            let key = content.string()?;
            let value = content.string()?;
            if key == "_t" && translation.is_none() {
                translation = Some(parse_translation(&value).unwrap_or_else(|| {
                    tracing::warn!(node_id, value = %value, "malformed _t, using origin");
                    IVec3::ZERO
                }));
            }
        }
    }
    Ok(translation)
}

fn skip_dict(content: &mut ByteReader<'_>) -> Result<(), VoxError> {
    let pairs = content.u32()?;
    for _ in 0..pairs {
        content.string()?;
        content.string()?;
    }
    Ok(())
}

fn parse_translation(value: &str) -> Option<IVec3> {
    let mut parts = value.split_whitespace().map(str::parse::<i32>);
    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;
    let z = parts.next()?.ok()?;
    parts.next().is_none().then_some(IVec3::new(x, y, z))
}
