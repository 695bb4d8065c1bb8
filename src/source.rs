// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where strips come from
//!
//! Decoding is the one step of the pipeline that can fail for reasons
//! that have nothing to do with the pixels, so it sits behind a trait:
//! the batch runner only needs something it can ask for a decoded
//! image, and something to call it in the logs.

use crate::error::{Result, SegmentError};
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Something that can be decoded into a strip image.
pub trait StripSource {
    /// Decode the strip.  Called once per strip, per batch.
    fn decode(&self) -> Result<DynamicImage>;

    /// A short human-readable name for logs and emergency panels.
    fn describe(&self) -> String;
}

impl StripSource for Path {
    fn decode(&self) -> Result<DynamicImage> {
        image::open(self).map_err(|cause| SegmentError::Decode {
            origin: self.display().to_string(),
            cause,
        })
    }

    fn describe(&self) -> String {
        self.display().to_string()
    }
}

impl StripSource for PathBuf {
    fn decode(&self) -> Result<DynamicImage> {
        self.as_path().decode()
    }

    fn describe(&self) -> String {
        self.as_path().describe()
    }
}

/// An encoded image (PNG, JPEG, ...) already sitting in memory.
#[derive(Debug, Clone)]
pub struct EncodedStrip {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl EncodedStrip {
    pub fn new<N: Into<String>>(name: N, bytes: Vec<u8>) -> Self {
        EncodedStrip {
            name: name.into(),
            bytes,
        }
    }
}

impl StripSource for EncodedStrip {
    fn decode(&self) -> Result<DynamicImage> {
        image::load_from_memory(&self.bytes).map_err(|cause| SegmentError::Decode {
            origin: self.name.clone(),
            cause,
        })
    }

    fn describe(&self) -> String {
        format!("{} ({} bytes)", self.name, self.bytes.len())
    }
}

impl StripSource for DynamicImage {
    fn decode(&self) -> Result<DynamicImage> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("{}x{} image", self.width(), self.height())
    }
}

impl<T: StripSource + ?Sized> StripSource for Box<T> {
    fn decode(&self) -> Result<DynamicImage> {
        (**self).decode()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T: StripSource + ?Sized> StripSource for &T {
    fn decode(&self) -> Result<DynamicImage> {
        (**self).decode()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let src = EncodedStrip::new("junk", b"definitely not a png".to_vec());
        match src.decode() {
            Err(SegmentError::Decode { origin, .. }) => assert_eq!(origin, "junk"),
            other => panic!("expected a decode error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_file_fails_to_decode() {
        let src = PathBuf::from("/nonexistent/strip.png");
        assert!(src.decode().is_err());
        assert_eq!(src.describe(), "/nonexistent/strip.png");
    }

    #[test]
    fn decoded_images_pass_straight_through() {
        let img = DynamicImage::new_rgb8(3, 4);
        assert_eq!(img.decode().unwrap(), img);
        assert_eq!(StripSource::describe(&img), "3x4 image");
    }
}
