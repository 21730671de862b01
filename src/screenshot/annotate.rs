use crate::dom::element::{BoundingBox, Element};
use crate::dom::state::ElementMap;
use crate::errors::{PageLensError, Result};
use crate::screenshot::digits;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Controls how bounding boxes and index labels are drawn.
#[derive(Debug, Clone)]
pub struct AnnotationConfig {
    /// Border thickness in pixels.
    pub border_width: u32,
    /// Digit cell height in pixels.
    pub font_size: u32,
    /// Master switch for index labels.
    pub show_labels: bool,
    /// Suppress the label for any element that carries its own text.
    pub show_labels_only_for_unlabeled: bool,
    pub link_color: Rgba<u8>,
    pub button_color: Rgba<u8>,
    pub input_color: Rgba<u8>,
    pub default_color: Rgba<u8>,
    pub label_bg_color: Rgba<u8>,
    pub label_text_color: Rgba<u8>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            border_width: 2,
            font_size: 12,
            show_labels: true,
            show_labels_only_for_unlabeled: false,
            link_color: Rgba([76, 175, 80, 255]),      // green
            button_color: Rgba([33, 150, 243, 255]),   // blue
            input_color: Rgba([255, 152, 0, 255]),     // orange
            default_color: Rgba([156, 39, 176, 255]),  // purple
            label_bg_color: Rgba([0, 0, 0, 200]),
            label_text_color: Rgba([255, 255, 255, 255]),
        }
    }
}

impl AnnotationConfig {
    /// Every element gets a label; suited for LLM vision input.
    pub fn llm_style() -> Self {
        Self::default()
    }

    /// Labels only where the element itself shows no text, following the
    /// browser-use convention.
    pub fn browser_use_style() -> Self {
        Self {
            show_labels_only_for_unlabeled: true,
            ..Self::default()
        }
    }
}

/// Draws bounding boxes and index labels over a captured frame.
///
/// The input buffer is never mutated. An empty map returns the input
/// bytes unchanged; otherwise the result is re-encoded in the input
/// format, with everything that is not PNG coming back as JPEG at
/// quality 85.
pub fn annotate(image_data: &[u8], map: &ElementMap, config: &AnnotationConfig) -> Result<Vec<u8>> {
    if map.is_empty() {
        return Ok(image_data.to_vec());
    }

    let format = image::guess_format(image_data)
        .map_err(|e| PageLensError::ImageDecode(e.to_string()))?;
    let decoded = image::load_from_memory(image_data)
        .map_err(|e| PageLensError::ImageDecode(e.to_string()))?;
    let mut canvas = decoded.to_rgba8();

    for el in &map.elements {
        if !el.is_visible || el.bounding_box.is_empty() {
            continue;
        }

        let color = element_color(el, config);
        draw_border(&mut canvas, &el.bounding_box, color, config.border_width);

        if config.show_labels {
            if config.show_labels_only_for_unlabeled && !el.text.is_empty() {
                continue;
            }
            draw_index_label(&mut canvas, el.index, &el.bounding_box, config);
        }
    }

    encode(canvas, format)
}

/// Element colour by tag, with ARIA role as the fallback.
fn element_color(el: &Element, config: &AnnotationConfig) -> Rgba<u8> {
    match el.tag_name.as_str() {
        "a" => config.link_color,
        "button" => config.button_color,
        "input" | "textarea" | "select" => config.input_color,
        _ => match el.role.as_str() {
            "button" | "menuitem" | "tab" => config.button_color,
            "link" => config.link_color,
            "textbox" | "combobox" | "searchbox" => config.input_color,
            _ => config.default_color,
        },
    }
}

fn clamp(value: i64, min: i64, max: i64) -> i64 {
    value.max(min).min(max)
}

/// Four filled strips of `border_width` pixels along the clamped box edges.
fn draw_border(img: &mut RgbaImage, bbox: &BoundingBox, color: Rgba<u8>, border_width: u32) {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    let x0 = clamp(bbox.x as i64, 0, width as i64 - 1);
    let y0 = clamp(bbox.y as i64, 0, height as i64 - 1);
    let x1 = clamp((bbox.x + bbox.width) as i64, 0, width as i64 - 1);
    let y1 = clamp((bbox.y + bbox.height) as i64, 0, height as i64 - 1);
    let bw = border_width as i64;

    // top
    for y in y0..(y0 + bw).min(y1 + 1) {
        for x in x0..=x1 {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
    // bottom
    for y in (y1 - bw + 1).max(y0)..=y1 {
        for x in x0..=x1 {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
    // left
    for x in x0..(x0 + bw).min(x1 + 1) {
        for y in y0..=y1 {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
    // right
    for x in (x1 - bw + 1).max(x0)..=x1 {
        for y in y0..=y1 {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Paints the index label above the top centre of the box. A label that
/// would leave the image top moves just inside the box instead, and the
/// whole label is clamped horizontally into the frame.
fn draw_index_label(img: &mut RgbaImage, index: usize, bbox: &BoundingBox, config: &AnnotationConfig) {
    let label = index.to_string();
    let (width, height) = img.dimensions();

    let char_width = (config.font_size as i64 * 7 / 12).max(1);
    let char_height = config.font_size as i64;
    let padding = 2i64;
    let label_width = label.len() as i64 * char_width + padding * 2;
    let label_height = char_height + padding * 2;

    let mut label_x = (bbox.x + bbox.width / 2.0) as i64 - label_width / 2;
    let mut label_y = bbox.y as i64 - label_height - 2;
    if label_y < 0 {
        label_y = bbox.y as i64 + 2;
    }
    if label_x < 0 {
        label_x = 0;
    }
    if label_x + label_width > width as i64 {
        label_x = width as i64 - label_width;
    }

    for y in label_y..(label_y + label_height).min(height as i64) {
        for x in label_x..(label_x + label_width).min(width as i64) {
            if x >= 0 && y >= 0 {
                img.put_pixel(x as u32, y as u32, config.label_bg_color);
            }
        }
    }

    let mut text_x = label_x + padding;
    let text_y = label_y + padding;
    for ch in label.chars() {
        if let Some(digit) = ch.to_digit(10) {
            digits::draw_digit(
                img,
                digit as usize,
                text_x,
                text_y,
                char_width,
                char_height,
                config.label_text_color,
            );
        }
        text_x += char_width;
    }
}

fn encode(canvas: RgbaImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    match format {
        ImageFormat::Png => {
            DynamicImage::ImageRgba8(canvas)
                .write_to(&mut buffer, ImageFormat::Png)
                .map_err(|e| PageLensError::ImageEncode(e.to_string()))?;
        }
        _ => {
            // JPEG carries no alpha channel.
            let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, 85);
            rgb.write_with_encoder(encoder)
                .map_err(|e| PageLensError::ImageEncode(e.to_string()))?;
        }
    }
    Ok(buffer.into_inner())
}
