//! PNG image format support

use crate::{IoError, IoResult};
use convolab_core::{PixelBuffer, PixelBufferMut, channel};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image into an RGBA buffer.
///
/// Palette, low bit depth and 16-bit images are normalized to 8 bits per
/// channel. Images without an alpha channel get alpha 255.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<PixelBuffer> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    if info.bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unexpected PNG output depth {:?}",
            info.bit_depth
        )));
    }
    let samples = match info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG color type after expansion: {:?}",
                other
            )));
        }
    };

    let width = info.width;
    let height = info.height;
    let line_size = info.line_size;
    let data = &buf[..info.buffer_size()];

    let mut out = PixelBufferMut::new(width, height)?;
    for y in 0..height {
        let src = &data[y as usize * line_size..];
        let dst = out.row_mut(y);
        for (x, px) in dst.chunks_exact_mut(channel::COUNT).enumerate() {
            let s = &src[x * samples..x * samples + samples];
            let rgba = match samples {
                1 => [s[0], s[0], s[0], 255],
                2 => [s[0], s[0], s[0], s[1]],
                3 => [s[0], s[1], s[2], 255],
                _ => [s[0], s[1], s[2], s[3]],
            };
            px.copy_from_slice(&rgba);
        }
    }

    Ok(out.into())
}

/// Write an RGBA buffer as an 8-bit RGBA PNG.
pub fn write_png<W: Write>(pix: &PixelBuffer, writer: W) -> IoResult<()> {
    let mut encoder = Encoder::new(writer, pix.width(), pix.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    writer
        .write_image_data(pix.as_bytes())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use convolab_core::Rgba;
    use std::io::Cursor;

    #[test]
    fn test_png_roundtrip_rgba() {
        let pix = PixelBuffer::from_fn(7, 5, |x, y| {
            Rgba::new((x * 30) as u8, (y * 40) as u8, 99, (x * y * 6) as u8)
        })
        .unwrap();

        let mut buffer = Vec::new();
        write_png(&pix, &mut buffer).unwrap();

        let pix2 = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(pix2, pix);
    }

    #[test]
    fn test_read_grayscale_png_expands_to_rgba() {
        let mut bytes = Vec::new();
        {
            let mut encoder = Encoder::new(&mut bytes, 3, 1);
            encoder.set_color(ColorType::Grayscale);
            encoder.set_depth(BitDepth::Eight);
            let mut w = encoder.write_header().unwrap();
            w.write_image_data(&[0, 128, 255]).unwrap();
        }

        let pix = read_png(Cursor::new(bytes)).unwrap();
        assert_eq!(pix.get_pixel(1, 0), Some(Rgba::new(128, 128, 128, 255)));
        assert_eq!(pix.get_pixel(2, 0), Some(Rgba::gray(255)));
    }

    #[test]
    fn test_read_garbage_fails() {
        let err = read_png(Cursor::new(vec![1u8, 2, 3, 4])).unwrap_err();
        assert!(matches!(err, IoError::DecodeError(_)));
    }
}
