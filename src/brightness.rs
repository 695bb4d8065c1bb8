// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the brightness of a pixel
//!
//! The brightness of a pixel is the plain, unweighted mean of its red,
//! green, and blue channels.  This is deliberately *not* luma: the
//! separators we are hunting for are paper-white gutters, and a
//! perceptual weighting buys nothing there.  Alpha is ignored.
//!
//! Whatever the subpixel type, the result is scaled onto 0..=255 so
//! that one set of thresholds works for 8-bit, 16-bit, and float
//! images alike.

use image::{Pixel, Primitive};
use num_traits::ToPrimitive;

#[inline]
fn channel_as_f64<S: Primitive>(c: S) -> f64 {
    c.to_f64().unwrap_or(0.0)
}

/// Pixel -> Brightness, on a 0.0 ..= 255.0 scale.
///
/// One or two channels are gray (plus alpha); three or more are red,
/// green, blue (plus alpha).  Only the color channels are averaged.
#[inline]
pub fn brightness_of<P, S>(pixel: &P) -> f64
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let max: f64 = channel_as_f64(S::DEFAULT_MAX_VALUE);
    let color = if P::CHANNEL_COUNT >= 3 { 3 } else { 1 };
    let channels = pixel.channels();
    let sum: f64 = channels[..color].iter().map(|c| channel_as_f64(*c)).sum();
    (sum / color as f64) * (255.0 / max)
}

/// True when the pixel is brighter than `threshold` (0..=255).
#[inline]
pub fn is_light<P, S>(pixel: &P, threshold: u8) -> bool
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    brightness_of(pixel) > <f64 as From<u8>>::from(threshold)
}
