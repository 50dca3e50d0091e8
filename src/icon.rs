// ── Window icon images ────────────────────────────────────────────────────────
//
// Pure Rust: image validation, best-fit selection, and the BGRA conversion
// the Win32 icon builder needs.  No `unsafe`, no OS calls.

use crate::error::{Result, SashError};

/// A straight (non-premultiplied) RGBA image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// Wrap `rgba` as a `width`×`height` image.
    ///
    /// Fails when either dimension is zero or the buffer is not exactly
    /// `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = u64::from(width) * u64::from(height) * 4;
        if width == 0 || height == 0 || rgba.len() as u64 != expected {
            return Err(SashError::InvalidImage {
                width,
                height,
                len: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: rgba,
        })
    }

    /// A single-colour image; handy for placeholders and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let count = (width as usize) * (height as usize);
        Self::new(width, height, rgba.repeat(count))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    fn covers(&self, width: u32, height: u32) -> bool {
        self.width >= width && self.height >= height
    }

    /// The pixels with red and blue swapped, as a 32-bit top-down DIB wants
    /// them.
    pub fn to_bgra(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len());
        for px in self.pixels.chunks_exact(4) {
            out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
        }
        out
    }
}

/// Pick the image that best suits a `width`×`height` slot.
///
/// An exact size match wins outright.  Otherwise images at least as large
/// as the target in both dimensions are preferred, closest aspect ratio
/// first; if none is large enough the largest by area is returned.  `None`
/// only for an empty slice.
pub fn best_fit(images: &[Image], width: u32, height: u32) -> Option<&Image> {
    let mut best = images.first()?;
    let target_ratio = f64::from(width) / f64::from(height.max(1));

    for image in images {
        if image.width == width && image.height == height {
            return Some(image);
        }

        if image.covers(width, height) {
            let delta = (target_ratio - image.aspect()).abs();
            let best_delta = (target_ratio - best.aspect()).abs();
            if delta < best_delta || !best.covers(width, height) {
                best = image;
            }
        } else if !best.covers(width, height) && image.area() > best.area() {
            best = image;
        }
    }

    Some(best)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn img(w: u32, h: u32) -> Image {
        Image::solid(w, h, [1, 2, 3, 4]).expect("valid image")
    }

    fn dims(image: Option<&Image>) -> Option<(u32, u32)> {
        image.map(|i| (i.width(), i.height()))
    }

    #[test]
    fn empty_set_has_no_fit() {
        assert_eq!(best_fit(&[], 32, 32), None);
    }

    #[test]
    fn exact_match_wins_wherever_it_is() {
        let sets = [
            vec![img(32, 32), img(16, 16), img(64, 64)],
            vec![img(16, 16), img(64, 64), img(32, 32)],
            vec![img(48, 48), img(128, 128), img(32, 32), img(33, 33)],
            vec![img(8, 8), img(32, 32)],
        ];
        for set in &sets {
            assert_eq!(dims(best_fit(set, 32, 32)), Some((32, 32)));
        }
    }

    #[test]
    fn larger_candidates_preferred_over_smaller() {
        let set = [img(16, 16), img(24, 24), img(48, 48)];
        assert_eq!(dims(best_fit(&set, 32, 32)), Some((48, 48)));
    }

    #[test]
    fn closest_aspect_ratio_among_large_enough() {
        let set = [img(128, 40), img(64, 64), img(40, 100)];
        assert_eq!(dims(best_fit(&set, 32, 32)), Some((64, 64)));

        let set = [img(64, 64), img(128, 64)];
        assert_eq!(dims(best_fit(&set, 64, 32)), Some((128, 64)));
    }

    #[test]
    fn equal_ratio_keeps_first_candidate() {
        let set = [img(64, 64), img(128, 128)];
        assert_eq!(dims(best_fit(&set, 32, 32)), Some((64, 64)));
    }

    #[test]
    fn no_candidate_large_enough_returns_largest_area() {
        let set = [img(8, 8), img(16, 12), img(12, 20), img(4, 4)];
        let best = best_fit(&set, 32, 32).expect("non-empty");
        let max_area = set.iter().map(|i| i.width() * i.height()).max().unwrap();
        assert_eq!(best.width() * best.height(), max_area);
        assert_eq!((best.width(), best.height()), (12, 20));
    }

    #[test]
    fn wide_but_short_is_not_large_enough() {
        // 64x8 is wider than the target but too short; the 16x16 has less
        // area, so the wide one wins by area.
        let set = [img(16, 16), img(64, 8)];
        assert_eq!(dims(best_fit(&set, 32, 32)), Some((64, 8)));

        // Once a covering candidate exists, it wins regardless of order.
        let set = [img(64, 8), img(40, 40), img(16, 16)];
        assert_eq!(dims(best_fit(&set, 32, 32)), Some((40, 40)));
    }

    #[test]
    fn image_validation() {
        assert!(Image::new(0, 4, vec![]).is_err());
        assert!(Image::new(2, 2, vec![0; 15]).is_err());
        assert!(Image::new(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn bgra_swaps_red_and_blue() {
        let image = Image::new(2, 1, vec![10, 20, 30, 40, 50, 60, 70, 80]).unwrap();
        assert_eq!(image.to_bgra(), vec![30, 20, 10, 40, 70, 60, 50, 80]);
    }
}
