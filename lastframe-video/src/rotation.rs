//! NV21 rotation in quarter turns
//!
//! Luma is rotated byte by byte; the chroma plane is rotated as whole V/U
//! pairs so the interleave survives the turn.

use crate::error::RotateError;
use crate::types::nv21_size;

/// Clockwise rotation in quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    /// Normalize any angle to a quarter turn. Angles that are not a multiple
    /// of 90 map to no rotation.
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => Rotation::Clockwise90,
            180 => Rotation::Clockwise180,
            270 => Rotation::Clockwise270,
            _ => Rotation::None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }

    /// Width and height after rotating a `width x height` frame
    pub fn output_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

/// Rotate an NV21 frame into `dst`, reusing its allocation.
///
/// `dst` is resized to exactly the rotated frame. Returns the rotated width
/// and height. No rotation is a plain copy and accepts odd dimensions.
pub fn rotate_nv21_into(
    src: &[u8],
    width: u32,
    height: u32,
    rotation: Rotation,
    dst: &mut Vec<u8>,
) -> Result<(u32, u32), RotateError> {
    let need = nv21_size(width, height);
    if src.len() < need {
        return Err(RotateError::SourceTooSmall {
            have: src.len(),
            need,
        });
    }
    if rotation != Rotation::None && (width % 2 != 0 || height % 2 != 0) {
        return Err(RotateError::OddDimensions { width, height });
    }

    dst.clear();
    dst.resize(need, 0);

    if rotation == Rotation::None {
        dst.copy_from_slice(&src[..need]);
        return Ok((width, height));
    }

    let (w, h) = (width as usize, height as usize);
    let (src_y, src_uv) = src[..need].split_at(w * h);
    let (dst_y, dst_uv) = dst.split_at_mut(w * h);

    rotate_plane(src_y, dst_y, w, h, rotation);
    rotate_plane::<[u8; 2]>(
        bytemuck::cast_slice(src_uv),
        bytemuck::cast_slice_mut(dst_uv),
        w / 2,
        h / 2,
        rotation,
    );

    Ok(rotation.output_dimensions(width, height))
}

/// Rotate a tightly packed `width x height` grid of samples
fn rotate_plane<T: Copy>(src: &[T], dst: &mut [T], width: usize, height: usize, rotation: Rotation) {
    match rotation {
        Rotation::None => dst.copy_from_slice(src),
        Rotation::Clockwise180 => {
            for (out, px) in dst.iter_mut().zip(src.iter().rev()) {
                *out = *px;
            }
        }
        Rotation::Clockwise90 => {
            // Rotated rows are `height` samples wide
            for (y, row) in src.chunks_exact(width).enumerate() {
                for (x, &px) in row.iter().enumerate() {
                    dst[x * height + (height - 1 - y)] = px;
                }
            }
        }
        Rotation::Clockwise270 => {
            for (y, row) in src.chunks_exact(width).enumerate() {
                for (x, &px) in row.iter().enumerate() {
                    dst[(width - 1 - x) * height + y] = px;
                }
            }
        }
    }
}
