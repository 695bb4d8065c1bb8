// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Crop regions out of a strip
//!
//! Every panel is a fresh buffer with the same pixel type as the
//! source; nothing is resampled or converted, and nothing in the
//! result points back at the source.

use crate::error::{Result, SegmentError};
use crate::options::ExtractionFallback;
use crate::regions::Region;
use image::{GenericImageView, ImageBuffer, Pixel, Primitive};
use log::warn;

/// A single extracted panel.
pub type Panel<P, S> = ImageBuffer<P, Vec<S>>;

/// Copy rows `region.start..region.end` of the image, full width, into
/// a new buffer.  Fails if the region is empty or runs off the bottom
/// of the image.
pub fn extract_panel<I, P, S>(image: &I, region: &Region) -> Result<Panel<P, S>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    if region.end <= region.start || region.end > height {
        return Err(SegmentError::Extraction {
            start: region.start,
            end: region.end,
            height,
        });
    }

    let mut imgbuf = ImageBuffer::new(width, region.height());
    for y in region.start..region.end {
        for x in 0..width {
            imgbuf.put_pixel(x, y - region.start, image.get_pixel(x, y));
        }
    }
    Ok(imgbuf)
}

/// A complete copy of the image, for when a crop goes wrong.
pub fn whole_image<I, P, S>(image: &I) -> Panel<P, S>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| image.get_pixel(x, y))
}

/// Extract every region, in order.  A region that can't be cropped is
/// either skipped or replaced by the whole image, depending on
/// `fallback`; either way its siblings are still extracted.
pub fn extract_panels<I, P, S>(
    image: &I,
    regions: &[Region],
    fallback: ExtractionFallback,
) -> Vec<Panel<P, S>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    regions
        .iter()
        .filter_map(|region| match extract_panel(image, region) {
            Ok(panel) => Some(panel),
            Err(err) => match fallback {
                ExtractionFallback::Skip => {
                    warn!("skipping region: {}", err);
                    None
                }
                ExtractionFallback::WholeImage => {
                    warn!("{}; substituting the whole strip", err);
                    Some(whole_image(image))
                }
            },
        })
        .collect()
}
