//! QR symbol rendering into PNG bytes.
//!
//! Pure functions: the same payload and options always produce the same bytes.

use crate::core::ConfigProvider;
use crate::utils::error::{Result, ToolError};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;

pub const EC_LEVELS: [&str; 4] = ["L", "M", "Q", "H"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Pixels per module.
    pub module_size: u32,
    /// Light border around the symbol, in modules.
    pub quiet_zone: u32,
    pub ec_level: EcLevel,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module_size: 10,
            quiet_zone: 4,
            ec_level: EcLevel::M,
        }
    }
}

impl RenderOptions {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self {
            module_size: config.module_size(),
            quiet_zone: config.quiet_zone(),
            ec_level: parse_ec_level(config.ec_level())?,
        })
    }
}

pub fn parse_ec_level(value: &str) -> Result<EcLevel> {
    match value.to_ascii_uppercase().as_str() {
        "L" => Ok(EcLevel::L),
        "M" => Ok(EcLevel::M),
        "Q" => Ok(EcLevel::Q),
        "H" => Ok(EcLevel::H),
        _ => Err(ToolError::InvalidConfigValueError {
            field: "render.ec_level".to_string(),
            value: value.to_string(),
            reason: format!("Valid levels: {}", EC_LEVELS.join(", ")),
        }),
    }
}

/// Encode `payload` verbatim and return the PNG file contents.
pub fn encode_png(payload: &str, options: &RenderOptions) -> Result<Vec<u8>> {
    let image = render_qr(payload, options)?;

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

pub fn render_qr(payload: &str, options: &RenderOptions) -> Result<GrayImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), options.ec_level)?;
    let modules = code.width() as u32;
    let scale = options.module_size.max(1);
    let border = options.quiet_zone;
    let size = (modules + 2 * border) * scale;

    let mut image = GrayImage::from_pixel(size, size, Luma([255u8]));

    for (i, color) in code.to_colors().iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let x = (i as u32 % modules + border) * scale;
        let y = (i as u32 / modules + border) * scale;
        for dy in 0..scale {
            for dx in 0..scale {
                image.put_pixel(x + dx, y + dy, Luma([0u8]));
            }
        }
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_is_deterministic() {
        let options = RenderOptions::default();
        let first = encode_png("https://example.com/a", &options).unwrap();
        let second = encode_png("https://example.com/a", &options).unwrap();
        assert_eq!(first, second);
        assert_ne!(first, encode_png("https://example.com/b", &options).unwrap());
    }

    #[test]
    fn test_png_matches_qr_modules() {
        let options = RenderOptions::default();
        let png = encode_png("https://example.com", &options).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_luma8();

        let code = QrCode::with_error_correction_level(b"https://example.com", EcLevel::M).unwrap();
        let modules = code.width() as u32;
        assert_eq!(decoded.width(), (modules + 8) * 10);
        assert_eq!(decoded.width(), decoded.height());

        // 每個模組中心點的顏色需與 QR 矩陣一致
        for (i, color) in code.to_colors().iter().enumerate() {
            let x = (i as u32 % modules + 4) * 10 + 5;
            let y = (i as u32 / modules + 4) * 10 + 5;
            let expected = if *color == Color::Dark { 0 } else { 255 };
            assert_eq!(decoded.get_pixel(x, y).0[0], expected);
        }
    }

    #[test]
    fn test_quiet_zone_is_light() {
        let options = RenderOptions {
            module_size: 2,
            quiet_zone: 3,
            ec_level: EcLevel::L,
        };
        let image = render_qr("hello", &options).unwrap();
        for x in 0..image.width() {
            assert_eq!(image.get_pixel(x, 0).0[0], 255);
            assert_eq!(image.get_pixel(x, 5).0[0], 255);
        }
        // Top-left finder pattern starts right after the border.
        assert_eq!(image.get_pixel(6, 6).0[0], 0);
    }

    #[test]
    fn test_malformed_urls_are_encoded_as_is() {
        assert!(encode_png("not a url at all", &RenderOptions::default()).is_ok());
    }

    #[test]
    fn test_oversized_payload_is_rejected() {
        let payload = "x".repeat(4000);
        let err = encode_png(&payload, &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, ToolError::QrEncodeError(_)));
    }

    #[test]
    fn test_parse_ec_level() {
        assert_eq!(parse_ec_level("h").unwrap(), EcLevel::H);
        assert_eq!(parse_ec_level("M").unwrap(), EcLevel::M);
        assert!(parse_ec_level("X").is_err());
    }
}
