use crate::utils::{BlockviewError, Result};
use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Decode every frame of the image at `path`.
///
/// Still images yield a single frame. Animated GIF, PNG (APNG) and WebP
/// files yield all of their frames, composited to RGBA by the decoder.
pub fn decode_frames(path: &Path) -> Result<Vec<DynamicImage>> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;

    let frames = match reader.format() {
        Some(ImageFormat::Gif) => collect_animation(GifDecoder::new(open_buffered(path)?)?)?,
        Some(ImageFormat::Png) => {
            let decoder = PngDecoder::new(open_buffered(path)?)?;
            if decoder.is_apng()? {
                collect_animation(decoder.apng()?)?
            } else {
                vec![DynamicImage::from_decoder(decoder)?]
            }
        }
        Some(ImageFormat::WebP) => {
            let decoder = WebPDecoder::new(open_buffered(path)?)?;
            if decoder.has_animation() {
                collect_animation(decoder)?
            } else {
                vec![DynamicImage::from_decoder(decoder)?]
            }
        }
        Some(_) => vec![reader.decode()?],
        None => {
            return Err(BlockviewError::unsupported_source(format!(
                "{}: not a recognised image format",
                path.display()
            )));
        }
    };

    log::debug!("Decoded {} frame(s) from {}", frames.len(), path.display());
    Ok(frames)
}

fn open_buffered(path: &Path) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

fn collect_animation<'a>(decoder: impl AnimationDecoder<'a>) -> Result<Vec<DynamicImage>> {
    let frames = decoder.into_frames().collect_frames()?;
    if frames.is_empty() {
        return Err(BlockviewError::unsupported_source("animation has no frames"));
    }

    Ok(frames
        .into_iter()
        .map(|frame| DynamicImage::ImageRgba8(frame.into_buffer()))
        .collect())
}
