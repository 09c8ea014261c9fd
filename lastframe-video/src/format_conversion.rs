//! Planar YUV 4:2:0 to NV21 conversion
//!
//! Camera stacks hand out three planes with independent row and pixel strides,
//! sometimes padded past the image width and sometimes truncated short of the
//! last row. The converter copes with both: padding never leaks into the
//! output, and missing samples are synthesized instead of failing the frame.

use crate::error::ConversionError;
use crate::types::{nv21_size, PlaneView};

/// Chroma value with no color shift
pub const NEUTRAL_CHROMA: u8 = 128;

/// Luma value written for rows the producer did not deliver
pub const MISSING_LUMA: u8 = 0;

/// Convert planar YUV 4:2:0 into NV21 (`width * height` luma bytes followed by
/// interleaved V/U pairs on a `width/2 x height/2` grid).
///
/// `out` must hold at least [`nv21_size`] bytes; only that prefix is written.
/// Odd heights and widths are truncated for chroma by floor division; the
/// chroma bytes past the last full pair are set to [`NEUTRAL_CHROMA`].
pub fn convert_yuv420_to_nv21(
    y: &PlaneView<'_>,
    u: &PlaneView<'_>,
    v: &PlaneView<'_>,
    width: usize,
    height: usize,
    out: &mut [u8],
) -> Result<(), ConversionError> {
    if width == 0 || height == 0 {
        return Err(ConversionError::EmptyFrame {
            width: width as u32,
            height: height as u32,
        });
    }
    for (index, plane) in [y, u, v].into_iter().enumerate() {
        if plane.row_stride == 0 || plane.pixel_stride == 0 {
            return Err(ConversionError::InvalidStride {
                plane: index,
                row_stride: plane.row_stride,
                pixel_stride: plane.pixel_stride,
            });
        }
    }

    let need = nv21_size(width as u32, height as u32);
    if out.len() < need {
        return Err(ConversionError::OutputTooSmall {
            have: out.len(),
            need,
        });
    }

    let luma_size = width * height;
    let (luma, chroma) = out[..need].split_at_mut(luma_size);

    copy_luma(y, luma, width, height);
    interleave_chroma(u, v, chroma, width / 2, height / 2);

    Ok(())
}

/// Copy the Y plane into a tightly packed destination
fn copy_luma(src: &PlaneView<'_>, dst: &mut [u8], width: usize, height: usize) {
    let luma_size = width * height;

    if src.pixel_stride == 1 && src.row_stride == width && src.available() >= luma_size {
        dst.copy_from_slice(&src.data[..luma_size]);
        return;
    }

    copy_plane(src, dst, width, height, MISSING_LUMA);
}

/// Strided plane copy. Rows past the limit are filled with `pad`; a short row
/// is extended by repeating its last valid sample.
fn copy_plane(src: &PlaneView<'_>, dst: &mut [u8], width: usize, height: usize, pad: u8) {
    let limit = src.available();

    for (row, out_row) in dst.chunks_exact_mut(width).take(height).enumerate() {
        let row_data = plane_row(src, row, limit);
        if row_data.is_empty() {
            out_row.fill(pad);
            continue;
        }

        let cols = width.min(row_data.len().div_ceil(src.pixel_stride));
        if src.pixel_stride == 1 {
            out_row[..cols].copy_from_slice(&row_data[..cols]);
        } else {
            for (dst_px, src_px) in out_row[..cols]
                .iter_mut()
                .zip(row_data.iter().step_by(src.pixel_stride))
            {
                *dst_px = *src_px;
            }
        }

        let tail = if cols > 0 { out_row[cols - 1] } else { pad };
        out_row[cols..].fill(tail);
    }
}

/// Interleave U and V into V/U pairs, padding missing columns with neutral chroma
fn interleave_chroma(
    u: &PlaneView<'_>,
    v: &PlaneView<'_>,
    dst: &mut [u8],
    half_width: usize,
    half_height: usize,
) {
    // Odd dimensions leave bytes past the last full pair; keep them neutral
    let pairs_len = (half_width * 2 * half_height).min(dst.len());
    dst[pairs_len..].fill(NEUTRAL_CHROMA);

    if half_width == 0 {
        return;
    }

    let u_limit = u.available();
    let v_limit = v.available();

    for (row, out_row) in dst
        .chunks_exact_mut(half_width * 2)
        .take(half_height)
        .enumerate()
    {
        let u_row = plane_row(u, row, u_limit);
        let v_row = plane_row(v, row, v_limit);

        let u_cols = u_row.len().div_ceil(u.pixel_stride);
        let v_cols = v_row.len().div_ceil(v.pixel_stride);
        let cols = half_width.min(u_cols).min(v_cols);

        let samples = v_row
            .iter()
            .step_by(v.pixel_stride)
            .zip(u_row.iter().step_by(u.pixel_stride));

        for (pair, (&v_px, &u_px)) in out_row.chunks_exact_mut(2).zip(samples).take(cols) {
            pair[0] = v_px;
            pair[1] = u_px;
        }

        out_row[cols * 2..].fill(NEUTRAL_CHROMA);
    }
}

/// Bytes of `row` that lie within the readable limit (empty if the row is missing)
fn plane_row<'a>(plane: &PlaneView<'a>, row: usize, limit: usize) -> &'a [u8] {
    match row.checked_mul(plane.row_stride) {
        Some(base) if base < limit => {
            let len = plane.row_stride.min(limit - base);
            &plane.data[base..base + len]
        }
        _ => &[],
    }
}
