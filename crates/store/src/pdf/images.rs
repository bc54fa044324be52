//! PDF Image Handling
//!
//! Header images are embedded without re-encoding:
//! - JPEG data is passed through with DCTDecode
//! - PNG image data is already a zlib stream of predicted scanlines, so the
//!   IDAT chunks are concatenated and described with FlateDecode and PNG
//!   predictor parameters
//!
//! Interlaced PNGs and PNGs with an alpha channel are rejected, as is any
//! other format.

use super::objects::{PdfDictionary, PdfObject, PdfStream, PdfString};
use thiserror::Error;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Error type for image decoding
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Invalid image format: {0}")]
    InvalidFormat(String),
    #[error("Unsupported image: {0}")]
    Unsupported(String),
}

/// Color space for images
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
    DeviceCMYK,
    /// Palette over DeviceRGB, three bytes per entry
    Indexed { palette: Vec<u8> },
}

impl ColorSpace {
    /// Number of color components per sample in the image data
    pub fn components(&self) -> u8 {
        match self {
            ColorSpace::DeviceGray | ColorSpace::Indexed { .. } => 1,
            ColorSpace::DeviceRGB => 3,
            ColorSpace::DeviceCMYK => 4,
        }
    }

    pub fn to_object(&self) -> PdfObject {
        match self {
            ColorSpace::DeviceGray => PdfObject::name("DeviceGray"),
            ColorSpace::DeviceRGB => PdfObject::name("DeviceRGB"),
            ColorSpace::DeviceCMYK => PdfObject::name("DeviceCMYK"),
            ColorSpace::Indexed { palette } => {
                let hival = (palette.len() / 3).saturating_sub(1);
                PdfObject::Array(vec![
                    PdfObject::name("Indexed"),
                    PdfObject::name("DeviceRGB"),
                    PdfObject::int(hival as i64),
                    PdfObject::String(PdfString::hex(palette.clone())),
                ])
            }
        }
    }
}

/// Image compression filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    DCTDecode,
    FlateDecode,
}

impl ImageFilter {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ImageFilter::DCTDecode => "DCTDecode",
            ImageFilter::FlateDecode => "FlateDecode",
        }
    }
}

/// Decoded image header plus the encoded sample data
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub bits_per_component: u8,
    pub color_space: ColorSpace,
    pub data: Vec<u8>,
    pub filter: ImageFilter,
    /// Invert samples, for Adobe CMYK JPEGs
    pub inverted: bool,
}

impl ImageData {
    /// Sniff the format of `bytes` and read its header
    pub fn decode(bytes: Vec<u8>) -> Result<Self, ImageError> {
        if bytes.starts_with(&[0xFF, 0xD8]) {
            Self::from_jpeg(bytes)
        } else if bytes.starts_with(&PNG_SIGNATURE) {
            Self::from_png(&bytes)
        } else {
            Err(ImageError::Unsupported(
                "only JPEG and PNG images can be embedded".to_string(),
            ))
        }
    }

    pub fn from_jpeg(data: Vec<u8>) -> Result<Self, ImageError> {
        let header = parse_jpeg_header(&data)?;
        let color_space = match header.components {
            1 => ColorSpace::DeviceGray,
            3 => ColorSpace::DeviceRGB,
            4 => ColorSpace::DeviceCMYK,
            n => {
                return Err(ImageError::Unsupported(format!(
                    "JPEG with {} components",
                    n
                )))
            }
        };
        let inverted = header.adobe && color_space == ColorSpace::DeviceCMYK;

        Ok(Self {
            width: header.width,
            height: header.height,
            bits_per_component: header.precision,
            color_space,
            data,
            filter: ImageFilter::DCTDecode,
            inverted,
        })
    }

    pub fn from_png(bytes: &[u8]) -> Result<Self, ImageError> {
        let png = parse_png(bytes)?;
        let color_space = match png.color_type {
            0 => ColorSpace::DeviceGray,
            2 => ColorSpace::DeviceRGB,
            3 => ColorSpace::Indexed {
                palette: png.palette.ok_or_else(|| {
                    ImageError::InvalidFormat("palette PNG without PLTE chunk".to_string())
                })?,
            },
            4 | 6 => {
                return Err(ImageError::Unsupported(
                    "PNG with an alpha channel".to_string(),
                ))
            }
            other => {
                return Err(ImageError::InvalidFormat(format!(
                    "unknown PNG color type {}",
                    other
                )))
            }
        };

        Ok(Self {
            width: png.width,
            height: png.height,
            bits_per_component: png.bit_depth,
            color_space,
            data: png.idat,
            filter: ImageFilter::FlateDecode,
            inverted: false,
        })
    }

    /// Pixel size as used by the layout
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Image XObject stream
    pub fn to_xobject(&self) -> PdfStream {
        let mut dict = PdfDictionary::new()
            .with_type("XObject")
            .with("Subtype", PdfObject::name("Image"))
            .with("Width", PdfObject::int(self.width as i64))
            .with("Height", PdfObject::int(self.height as i64))
            .with("ColorSpace", self.color_space.to_object())
            .with("BitsPerComponent", PdfObject::int(self.bits_per_component as i64))
            .with("Filter", PdfObject::name(self.filter.pdf_name()));

        if self.filter == ImageFilter::FlateDecode {
            let parms = PdfDictionary::new()
                .with("Predictor", PdfObject::int(15))
                .with("Colors", PdfObject::int(self.color_space.components() as i64))
                .with("BitsPerComponent", PdfObject::int(self.bits_per_component as i64))
                .with("Columns", PdfObject::int(self.width as i64));
            dict.insert("DecodeParms", PdfObject::Dictionary(parms));
        }
        if self.inverted {
            let decode = [1.0, 0.0].repeat(self.color_space.components() as usize);
            dict.insert("Decode", PdfObject::numbers(&decode));
        }

        PdfStream {
            dict,
            data: self.data.clone(),
            compressed: true,
        }
    }
}

#[derive(Debug)]
struct JpegHeader {
    width: u32,
    height: u32,
    precision: u8,
    components: u8,
    /// An Adobe APP14 segment precedes the frame header
    adobe: bool,
}

fn be16(data: &[u8], pos: usize) -> u32 {
    ((data[pos] as u32) << 8) | data[pos + 1] as u32
}

fn be32(data: &[u8], pos: usize) -> u32 {
    u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}

/// Walk the JPEG marker segments up to the first frame header
fn parse_jpeg_header(data: &[u8]) -> Result<JpegHeader, ImageError> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ImageError::InvalidFormat("Not a valid JPEG".to_string()));
    }

    let mut adobe = false;
    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return Err(ImageError::InvalidFormat("Invalid JPEG marker".to_string()));
        }
        let marker = data[pos + 1];
        pos += 2;

        match marker {
            // fill byte before a marker
            0xFF => {
                pos -= 1;
                continue;
            }
            0x01 | 0xD0..=0xD8 => continue,
            // end of image or start of scan before any frame header
            0xD9 | 0xDA => break,
            _ => {}
        }

        if pos + 2 > data.len() {
            break;
        }
        let length = be16(data, pos) as usize;
        if length < 2 {
            return Err(ImageError::InvalidFormat("Invalid JPEG segment length".to_string()));
        }

        let is_frame = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_frame {
            if pos + 8 > data.len() {
                break;
            }
            let header = JpegHeader {
                precision: data[pos + 2],
                height: be16(data, pos + 3),
                width: be16(data, pos + 5),
                components: data[pos + 7],
                adobe,
            };
            if header.width == 0 || header.height == 0 {
                return Err(ImageError::InvalidFormat("JPEG with zero size".to_string()));
            }
            return Ok(header);
        }
        if marker == 0xEE && data.get(pos + 2..pos + 7) == Some(b"Adobe".as_slice()) {
            adobe = true;
        }

        pos += length;
    }

    Err(ImageError::InvalidFormat(
        "Could not find image dimensions in JPEG".to_string(),
    ))
}

#[derive(Debug)]
struct PngImage {
    width: u32,
    height: u32,
    bit_depth: u8,
    color_type: u8,
    palette: Option<Vec<u8>>,
    idat: Vec<u8>,
}

/// Read the PNG chunks that matter for embedding
fn parse_png(data: &[u8]) -> Result<PngImage, ImageError> {
    if !data.starts_with(&PNG_SIGNATURE) {
        return Err(ImageError::InvalidFormat("Not a valid PNG".to_string()));
    }

    let mut header: Option<(u32, u32, u8, u8)> = None;
    let mut palette = None;
    let mut idat = Vec::new();
    let mut pos = PNG_SIGNATURE.len();

    loop {
        if pos + 8 > data.len() {
            return Err(ImageError::InvalidFormat("Truncated PNG".to_string()));
        }
        let length = be32(data, pos) as usize;
        let kind = &data[pos + 4..pos + 8];
        let body_start = pos + 8;
        let body_end = body_start
            .checked_add(length)
            .filter(|end| end + 4 <= data.len())
            .ok_or_else(|| ImageError::InvalidFormat("Truncated PNG chunk".to_string()))?;
        let body = &data[body_start..body_end];

        match kind {
            b"IHDR" => {
                if body.len() < 13 {
                    return Err(ImageError::InvalidFormat("Short IHDR chunk".to_string()));
                }
                if body[12] != 0 {
                    return Err(ImageError::Unsupported("interlaced PNG".to_string()));
                }
                header = Some((be32(body, 0), be32(body, 4), body[8], body[9]));
            }
            b"PLTE" => palette = Some(body.to_vec()),
            b"IDAT" => idat.extend_from_slice(body),
            b"IEND" => break,
            _ => {}
        }

        pos = body_end + 4;
    }

    let (width, height, bit_depth, color_type) =
        header.ok_or_else(|| ImageError::InvalidFormat("PNG without IHDR".to_string()))?;
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidFormat("PNG with zero size".to_string()));
    }
    if idat.is_empty() {
        return Err(ImageError::InvalidFormat("PNG without image data".to_string()));
    }

    Ok(PngImage {
        width,
        height,
        bit_depth,
        color_type,
        palette,
        idat,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal baseline JPEG header: SOI, APP0, SOF0, SOS
    pub(crate) fn jpeg_bytes(width: u16, height: u16, components: u8) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        data.extend_from_slice(b"JFIF\0");
        data.extend_from_slice(&[1, 1, 0, 0, 1, 0, 1, 0, 0]);
        data.extend_from_slice(&[0xFF, 0xC0, 0x00, 8 + 3 * components, 8]);
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data.push(components);
        for id in 0..components {
            data.extend_from_slice(&[id + 1, 0x11, 0]);
        }
        data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02, 0xFF, 0xD9]);
        data
    }

    fn chunk(kind: &[u8], body: &[u8]) -> Vec<u8> {
        let mut out = (body.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(kind);
        out.extend_from_slice(body);
        // CRC is not checked
        out.extend_from_slice(&[0, 0, 0, 0]);
        out
    }

    pub(crate) fn png_bytes(width: u32, height: u32, color_type: u8, interlace: u8) -> Vec<u8> {
        let mut ihdr = width.to_be_bytes().to_vec();
        ihdr.extend_from_slice(&height.to_be_bytes());
        ihdr.extend_from_slice(&[8, color_type, 0, 0, interlace]);

        let mut data = PNG_SIGNATURE.to_vec();
        data.extend(chunk(b"IHDR", &ihdr));
        if color_type == 3 {
            data.extend(chunk(b"PLTE", &[255, 0, 0, 0, 0, 255]));
        }
        data.extend(chunk(b"IDAT", &[0x78, 0x9C]));
        data.extend(chunk(b"IDAT", &[0x03, 0x00]));
        data.extend(chunk(b"IEND", &[]));
        data
    }

    #[test]
    fn test_jpeg_header() {
        let image = ImageData::decode(jpeg_bytes(640, 480, 3)).unwrap();
        assert_eq!(image.dimensions(), (640, 480));
        assert_eq!(image.color_space, ColorSpace::DeviceRGB);
        assert_eq!(image.filter, ImageFilter::DCTDecode);

        let gray = ImageData::decode(jpeg_bytes(10, 20, 1)).unwrap();
        assert_eq!(gray.color_space, ColorSpace::DeviceGray);
    }

    #[test]
    fn test_truncated_jpeg() {
        let mut data = jpeg_bytes(640, 480, 3);
        data.truncate(12);
        assert!(matches!(
            ImageData::decode(data),
            Err(ImageError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_png_rgb() {
        let image = ImageData::decode(png_bytes(3, 2, 2, 0)).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.color_space, ColorSpace::DeviceRGB);
        // IDAT chunks are concatenated
        assert_eq!(image.data, vec![0x78, 0x9C, 0x03, 0x00]);

        let xobject = image.to_xobject();
        let Some(PdfObject::Dictionary(parms)) = xobject.dict.get("DecodeParms") else {
            panic!("missing DecodeParms");
        };
        assert_eq!(parms.get("Predictor"), Some(&PdfObject::int(15)));
        assert_eq!(parms.get("Colors"), Some(&PdfObject::int(3)));
        assert_eq!(parms.get("Columns"), Some(&PdfObject::int(3)));
        assert!(xobject.compressed);
    }

    #[test]
    fn test_png_palette() {
        let image = ImageData::decode(png_bytes(4, 4, 3, 0)).unwrap();
        let space = image.color_space.to_object();
        assert_eq!(
            space,
            PdfObject::Array(vec![
                PdfObject::name("Indexed"),
                PdfObject::name("DeviceRGB"),
                PdfObject::int(1),
                PdfObject::String(PdfString::hex(vec![255, 0, 0, 0, 0, 255])),
            ])
        );
        assert_eq!(image.color_space.components(), 1);
    }

    #[test]
    fn test_png_rejections() {
        assert!(matches!(
            ImageData::decode(png_bytes(4, 4, 6, 0)),
            Err(ImageError::Unsupported(_))
        ));
        assert!(matches!(
            ImageData::decode(png_bytes(4, 4, 2, 1)),
            Err(ImageError::Unsupported(_))
        ));
        assert!(matches!(
            ImageData::decode(png_bytes(0, 4, 2, 0)),
            Err(ImageError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_unknown_format() {
        assert!(matches!(
            ImageData::decode(b"GIF89a....".to_vec()),
            Err(ImageError::Unsupported(_))
        ));
    }
}
