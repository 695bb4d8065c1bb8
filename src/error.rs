// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors
//!
//! Only a handful of things can actually go wrong when segmenting a
//! strip: it won't decode, it has no pixels, a region points outside
//! the image, or a panel won't encode.  "No separators" and "no usable
//! regions" are not in here; those are ordinary outcomes, and they're
//! reported through `Layout` instead.

use failure::Fail;
use image::ImageError;
use std::io;

#[derive(Debug, Fail)]
pub enum SegmentError {
    /// The strip source could not be read or decoded into pixels.
    #[fail(display = "could not decode strip {}: {}", origin, cause)]
    Decode {
        origin: String,
        #[cause]
        cause: ImageError,
    },

    /// The strip decoded, but one of its dimensions is zero.
    #[fail(display = "strip has no pixels ({}x{})", width, height)]
    EmptyImage { width: u32, height: u32 },

    /// A region does not fit inside the image it is supposed to crop.
    #[fail(
        display = "region {}..{} does not fit an image {} rows tall",
        start, end, height
    )]
    Extraction { start: u32, end: u32, height: u32 },

    /// A panel could not be turned into PNG bytes.
    #[fail(display = "could not encode panel: {}", _0)]
    Encode(#[cause] ImageError),

    #[fail(display = "i/o error: {}", _0)]
    Io(#[cause] io::Error),

    /// A tunable is out of range.
    #[fail(display = "invalid option {}: {}", name, reason)]
    InvalidOption { name: &'static str, reason: String },
}

impl From<io::Error> for SegmentError {
    fn from(err: io::Error) -> Self {
        SegmentError::Io(err)
    }
}

impl SegmentError {
    pub(crate) fn invalid<R: Into<String>>(name: &'static str, reason: R) -> Self {
        SegmentError::InvalidOption {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SegmentError>;
