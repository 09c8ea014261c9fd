//! NV21 to JPEG compression

use crate::error::EncodeError;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

/// EXIF Orientation value for pixels stored upright
pub const ORIENTATION_TOP_LEFT: u16 = 1;

const SOI: [u8; 2] = [0xFF, 0xD8];

/// Convert NV21 to packed RGB24 (JFIF full-range BT.601).
///
/// Odd edges reuse the nearest chroma pair.
pub fn nv21_to_rgb(nv21: &[u8], width: u32, height: u32, out: &mut Vec<u8>) {
    let (w, h) = (width as usize, height as usize);
    let (half_w, half_h) = (w / 2, h / 2);
    let (luma, chroma) = nv21.split_at(w * h);

    out.clear();
    out.reserve(w * h * 3);

    for j in 0..h {
        for i in 0..w {
            let y_val = luma[j * w + i] as f32;

            let (v, u) = if half_w == 0 || half_h == 0 {
                (0.0, 0.0)
            } else {
                let cx = (i / 2).min(half_w - 1);
                let cy = (j / 2).min(half_h - 1);
                let idx = (cy * half_w + cx) * 2;
                (chroma[idx] as f32 - 128.0, chroma[idx + 1] as f32 - 128.0)
            };

            let r = (y_val + 1.402 * v).clamp(0.0, 255.0);
            let g = (y_val - 0.344_136 * u - 0.714_136 * v).clamp(0.0, 255.0);
            let b = (y_val + 1.772 * u).clamp(0.0, 255.0);

            out.extend_from_slice(&[r as u8, g as u8, b as u8]);
        }
    }
}

/// Compress an NV21 frame to JPEG bytes. `quality` is clamped to 1..=100.
///
/// `rgb` is scratch space for the intermediate RGB image.
pub fn encode_nv21_jpeg(
    nv21: &[u8],
    width: u32,
    height: u32,
    quality: u8,
    rgb: &mut Vec<u8>,
) -> Result<Vec<u8>, EncodeError> {
    nv21_to_rgb(nv21, width, height, rgb);

    let mut jpeg = Vec::with_capacity(rgb.len() / 8);
    JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100)).encode(
        rgb,
        width,
        height,
        ExtendedColorType::Rgb8,
    )?;

    Ok(jpeg)
}

/// Insert an APP1 Exif segment carrying only an Orientation tag right after
/// SOI. Returns false if `jpeg` does not start with SOI.
pub fn insert_exif_orientation(jpeg: &mut Vec<u8>, orientation: u16) -> bool {
    if !jpeg.starts_with(&SOI) {
        return false;
    }
    let segment = exif_orientation_segment(orientation);
    jpeg.splice(SOI.len()..SOI.len(), segment);
    true
}

/// APP1 marker, length, Exif header, big-endian TIFF header and one IFD entry
fn exif_orientation_segment(orientation: u16) -> [u8; 36] {
    let [hi, lo] = orientation.to_be_bytes();
    [
        0xFF, 0xE1, // APP1
        0x00, 0x22, // segment length (34, excludes marker)
        b'E', b'x', b'i', b'f', 0x00, 0x00, //
        b'M', b'M', 0x00, 0x2A, // big-endian TIFF
        0x00, 0x00, 0x00, 0x08, // offset of IFD0
        0x00, 0x01, // one entry
        0x01, 0x12, // Orientation
        0x00, 0x03, // SHORT
        0x00, 0x00, 0x00, 0x01, // count
        hi, lo, 0x00, 0x00, // value, padded
        0x00, 0x00, 0x00, 0x00, // no next IFD
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::nv21_size;

    #[test]
    fn test_neutral_chroma_is_gray() {
        let mut nv21 = vec![128u8; nv21_size(2, 2)];
        nv21[..4].copy_from_slice(&[0, 64, 200, 255]);
        let mut rgb = Vec::new();

        nv21_to_rgb(&nv21, 2, 2, &mut rgb);

        assert_eq!(rgb, vec![0, 0, 0, 64, 64, 64, 200, 200, 200, 255, 255, 255]);
    }

    #[test]
    fn test_red_chroma() {
        // V high, U low on mid luma leans red
        let nv21 = vec![128, 128, 128, 128, 255, 0];
        let mut rgb = Vec::new();

        nv21_to_rgb(&nv21, 2, 2, &mut rgb);

        assert_eq!(rgb[0], 255);
        assert!(rgb[2] < 16);
    }

    #[test]
    fn test_encode_produces_jpeg() {
        let nv21 = vec![128u8; nv21_size(16, 8)];
        let mut rgb = Vec::new();

        let jpeg = encode_nv21_jpeg(&nv21, 16, 8, 90, &mut rgb).unwrap();

        assert!(jpeg.starts_with(&SOI));
        assert!(jpeg.ends_with(&[0xFF, 0xD9]));
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_quality_zero_is_clamped() {
        let nv21 = vec![90u8; nv21_size(8, 8)];
        let mut rgb = Vec::new();
        assert!(encode_nv21_jpeg(&nv21, 8, 8, 0, &mut rgb).is_ok());
    }

    #[test]
    fn test_exif_segment_follows_soi() {
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

        assert!(insert_exif_orientation(&mut jpeg, 6));

        assert_eq!(&jpeg[..4], &[0xFF, 0xD8, 0xFF, 0xE1]);
        assert_eq!(&jpeg[6..12], b"Exif\0\0");
        // Orientation value
        assert_eq!(&jpeg[30..32], &[0x00, 0x06]);
        // Original APP0 follows the new segment
        assert_eq!(&jpeg[38..40], &[0xFF, 0xE0]);
    }

    #[test]
    fn test_exif_skips_non_jpeg() {
        let mut data = vec![0x89, b'P', b'N', b'G'];
        assert!(!insert_exif_orientation(&mut data, ORIENTATION_TOP_LEFT));
        assert_eq!(data, vec![0x89, b'P', b'N', b'G']);
    }
}
