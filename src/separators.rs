// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the gutters in a strip
//!
//! Walk down the image a few rows at a time.  At each candidate row,
//! look at a thin band of rows beneath it and count how many of the
//! sampled pixels are light.  If nearly all of them are, the band is a
//! gutter between two panels, and the candidate row is a separator.
//!
//! A gutter is usually several candidate rows tall, so the first row
//! of each gutter wins and any candidate within `min_spacing` of it is
//! the same gutter.  That also gives us separators in strictly
//! ascending order for free.

use crate::brightness::is_light;
use crate::options::SeparatorOptions;
use image::{GenericImageView, Pixel, Primitive};
use itertools::iproduct;
use log::{debug, trace};

/// Ascending y-coordinates of the rows believed to be gutters.
pub type SeparatorSet = Vec<u32>;

// The columns we look at in every band.  The very edges of a strip
// are usually border or paper and tell us nothing, so they are
// skipped, unless the strip is too narrow to have anything left.
fn sampled_columns(width: u32, opts: &SeparatorOptions) -> Vec<u32> {
    let stride = opts.column_stride.max(1) as usize;
    if width > opts.side_margin.saturating_mul(2) {
        (opts.side_margin..width - opts.side_margin)
            .step_by(stride)
            .collect()
    } else {
        (0..width).step_by(stride).collect()
    }
}

/// The fraction of sampled pixels in rows `y..y + band_rows` that are
/// light.  Zero when nothing could be sampled.
pub fn light_ratio_at<I, P, S>(image: &I, y: u32, columns: &[u32], opts: &SeparatorOptions) -> f64
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let height = image.height();
    let band_end = y.saturating_add(opts.band_rows).min(height);
    let (light, total) = iproduct!(y..band_end, columns.iter()).fold(
        (0usize, 0usize),
        |(light, total), (row, &col)| {
            let hit = is_light(&image.get_pixel(col, row), opts.brightness_threshold);
            (light + hit as usize, total + 1)
        },
    );
    if total == 0 {
        0.0
    } else {
        light as f64 / total as f64
    }
}

/// Scan an image for horizontal gutters.  Pure and deterministic; an
/// image shorter than twice the edge margin has no candidate rows and
/// yields an empty set.
pub fn find_separators<I, P, S>(image: &I, opts: &SeparatorOptions) -> SeparatorSet
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    let columns = sampled_columns(width, opts);
    let first = opts.edge_margin;
    let last = height.saturating_sub(opts.edge_margin);

    let mut separators = SeparatorSet::new();
    for y in (first..last).step_by(opts.row_stride.max(1) as usize) {
        let ratio = light_ratio_at(image, y, &columns, opts);
        if ratio <= opts.light_ratio {
            continue;
        }
        let spaced = separators
            .last()
            .map_or(true, |&prev| y - prev > opts.min_spacing);
        if spaced {
            trace!("separator at y={} ({:.1}% light)", y, ratio * 100.0);
            separators.push(y);
        }
    }
    debug!("separators for {}x{}: {:?}", width, height, separators);
    separators
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb, RgbImage};

    const INK: Rgb<u8> = Rgb([40, 40, 40]);
    const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

    fn strip_with_gutters(width: u32, height: u32, gutters: &[(u32, u32)]) -> RgbImage {
        ImageBuffer::from_fn(width, height, |_, y| {
            if gutters.iter().any(|&(a, b)| y >= a && y < b) {
                PAPER
            } else {
                INK
            }
        })
    }

    #[test]
    fn finds_one_separator_per_gutter() {
        let img = strip_with_gutters(600, 1800, &[(595, 605), (1195, 1205)]);
        let found = find_separators(&img, &SeparatorOptions::default());
        assert_eq!(found, vec![594, 1194]);
    }

    #[test]
    fn dark_image_has_no_separators() {
        let img = strip_with_gutters(300, 900, &[]);
        assert!(find_separators(&img, &SeparatorOptions::default()).is_empty());
    }

    #[test]
    fn short_image_has_no_candidates() {
        let img: RgbImage = ImageBuffer::from_pixel(200, 99, PAPER);
        assert!(find_separators(&img, &SeparatorOptions::default()).is_empty());
    }

    #[test]
    fn tall_gutter_is_reported_once() {
        // 100 rows of white is one gutter, not several.
        let opts = SeparatorOptions {
            min_spacing: 150,
            ..SeparatorOptions::default()
        };
        let img = strip_with_gutters(400, 1000, &[(400, 500)]);
        assert_eq!(find_separators(&img, &opts), vec![402]);
    }

    #[test]
    fn margins_are_not_sampled() {
        // Black frame down both sides, white everywhere else.
        let img: RgbImage = ImageBuffer::from_fn(100, 400, |x, y| {
            if x < 10 || x >= 90 || (y < 200 || y >= 210) {
                INK
            } else {
                PAPER
            }
        });
        let opts = SeparatorOptions {
            row_stride: 1,
            column_stride: 1,
            band_rows: 4,
            light_ratio: 0.99,
            ..SeparatorOptions::default()
        };
        assert_eq!(find_separators(&img, &opts), vec![200]);
    }

    #[test]
    fn grayscale_works_too() {
        let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_fn(300, 600, |_, y| {
            if (300..310).contains(&y) {
                Luma([250])
            } else {
                Luma([10])
            }
        });
        assert_eq!(find_separators(&img, &SeparatorOptions::default()), vec![302]);
    }

    #[test]
    fn ratio_of_empty_sample_is_zero() {
        let img = strip_with_gutters(10, 10, &[(0, 10)]);
        assert_eq!(light_ratio_at(&img, 0, &[], &SeparatorOptions::default()), 0.0);
    }
}
