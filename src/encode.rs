// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Panels out as PNG, either raw bytes or a `data:` URL a browser can
//! display directly.

use crate::error::{Result, SegmentError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

pub fn to_png(panel: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            panel.as_raw(),
            panel.width(),
            panel.height(),
            ColorType::Rgba8,
        )
        .map_err(SegmentError::Encode)?;
    Ok(bytes)
}

pub fn to_data_url(panel: &RgbaImage) -> Result<String> {
    let png = to_png(panel)?;
    Ok(format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png)))
}
