use image::{Rgba, RgbaImage};

/// 5x7 bitmaps for the digits 0-9, the only glyphs the annotator draws.
/// Index labels never need anything else, which keeps the whole path free
/// of font files and text shaping.
const DIGIT_PATTERNS: [[&str; 7]; 10] = [
    ["01110", "10001", "10001", "10001", "10001", "10001", "01110"], // 0
    ["00100", "01100", "00100", "00100", "00100", "00100", "01110"], // 1
    ["01110", "10001", "00001", "00110", "01000", "10000", "11111"], // 2
    ["01110", "10001", "00001", "00110", "00001", "10001", "01110"], // 3
    ["00010", "00110", "01010", "10010", "11111", "00010", "00010"], // 4
    ["11111", "10000", "11110", "00001", "00001", "10001", "01110"], // 5
    ["01110", "10000", "10000", "11110", "10001", "10001", "01110"], // 6
    ["11111", "00001", "00010", "00100", "01000", "01000", "01000"], // 7
    ["01110", "10001", "10001", "01110", "10001", "10001", "01110"], // 8
    ["01110", "10001", "10001", "01111", "00001", "00001", "01110"], // 9
];

/// Draws one digit scaled into a `width` x `height` cell at `(x, y)`.
/// Each "on" bitmap cell becomes a solid block of ceil-scaled pixels;
/// anything falling outside the image is skipped.
pub fn draw_digit(
    img: &mut RgbaImage,
    digit: usize,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    color: Rgba<u8>,
) {
    let Some(pattern) = DIGIT_PATTERNS.get(digit) else {
        return;
    };

    let (img_width, img_height) = img.dimensions();
    let scale_x = width as f64 / 5.0;
    let scale_y = height as f64 / 7.0;
    let block_w = scale_x.ceil() as i64;
    let block_h = scale_y.ceil() as i64;

    for (row, line) in pattern.iter().enumerate() {
        for (col, cell) in line.bytes().enumerate() {
            if cell != b'1' {
                continue;
            }
            let px = x + (col as f64 * scale_x) as i64;
            let py = y + (row as f64 * scale_y) as i64;

            for dy in 0..block_h {
                for dx in 0..block_w {
                    let draw_x = px + dx;
                    let draw_y = py + dy;
                    if draw_x >= 0
                        && draw_y >= 0
                        && (draw_x as u32) < img_width
                        && (draw_y as u32) < img_height
                    {
                        img.put_pixel(draw_x as u32, draw_y as u32, color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn test_digit_paints_inside_cell_only() {
        let mut img = RgbaImage::from_pixel(40, 40, BLACK);
        draw_digit(&mut img, 8, 10, 10, 10, 14, WHITE);

        let mut painted = 0;
        for (x, y, pixel) in img.enumerate_pixels() {
            if *pixel == WHITE {
                painted += 1;
                assert!((10..22).contains(&x), "x={} outside cell", x);
                assert!((10..26).contains(&y), "y={} outside cell", y);
            }
        }
        assert!(painted > 0);
    }

    #[test]
    fn test_digit_clipped_at_image_edge() {
        let mut img = RgbaImage::from_pixel(8, 8, BLACK);
        draw_digit(&mut img, 1, -3, -3, 10, 14, WHITE);
        draw_digit(&mut img, 7, 6, 6, 10, 14, WHITE);
        // Nothing panicked and something landed in-bounds.
        assert!(img.pixels().any(|p| *p == WHITE));
    }

    #[test]
    fn test_out_of_range_digit_is_ignored() {
        let mut img = RgbaImage::from_pixel(20, 20, BLACK);
        draw_digit(&mut img, 12, 0, 0, 10, 14, WHITE);
        assert!(img.pixels().all(|p| *p == BLACK));
    }
}
