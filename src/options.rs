// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tunables
//!
//! Every magic number in the pipeline lives here, with a name and a
//! default.  The defaults are the ones that behave well on the strips
//! the site actually publishes: white gutters, panels stacked top to
//! bottom, a few hundred pixels wide.

use crate::error::{Result, SegmentError};

pub const DEFAULT_BAND_ROWS: u32 = 8;
pub const DEFAULT_BRIGHTNESS_THRESHOLD: u8 = 200;
pub const DEFAULT_LIGHT_RATIO: f64 = 0.75;
pub const DEFAULT_EDGE_MARGIN: u32 = 50;
pub const DEFAULT_MIN_SPACING: u32 = 60;
pub const DEFAULT_ROW_STRIDE: u32 = 4;
pub const DEFAULT_COLUMN_STRIDE: u32 = 4;
pub const DEFAULT_SIDE_MARGIN: u32 = 10;

pub const DEFAULT_SEPARATOR_SKIP: u32 = 15;
pub const DEFAULT_MIN_REGION_HEIGHT: u32 = 30;
pub const DEFAULT_MIN_SEPARATORS: usize = 1;

pub const DEFAULT_BASE_PANELS: u32 = 3;
pub const DEFAULT_ASPECT_BREAKPOINTS: [f64; 3] = [2.5, 4.0, 6.0];

/// How the separator scan samples the image.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparatorOptions {
    /// Consecutive rows examined for each candidate row.
    pub band_rows: u32,

    /// A pixel is light when its brightness exceeds this (0..=255).
    pub brightness_threshold: u8,

    /// A band is a separator when more than this fraction of its
    /// sampled pixels are light.
    pub light_ratio: f64,

    /// Rows at the top and bottom that are never candidates.
    pub edge_margin: u32,

    /// A candidate this close (or closer) to the previous separator is
    /// the same gutter and is dropped.
    pub min_spacing: u32,

    pub row_stride: u32,
    pub column_stride: u32,

    /// Columns at the left and right edges that are not sampled.
    pub side_margin: u32,
}

impl Default for SeparatorOptions {
    fn default() -> Self {
        Self {
            band_rows: DEFAULT_BAND_ROWS,
            brightness_threshold: DEFAULT_BRIGHTNESS_THRESHOLD,
            light_ratio: DEFAULT_LIGHT_RATIO,
            edge_margin: DEFAULT_EDGE_MARGIN,
            min_spacing: DEFAULT_MIN_SPACING,
            row_stride: DEFAULT_ROW_STRIDE,
            column_stride: DEFAULT_COLUMN_STRIDE,
            side_margin: DEFAULT_SIDE_MARGIN,
        }
    }
}

/// How separators become regions.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionOptions {
    /// Rows skipped past each separator so the gutter isn't carried
    /// into the panel below it.
    pub separator_skip: u32,

    /// Regions shorter than this are discarded.
    pub min_region_height: u32,

    /// Fewer separators than this and we divide uniformly instead.
    pub min_separators: usize,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            separator_skip: DEFAULT_SEPARATOR_SKIP,
            min_region_height: DEFAULT_MIN_REGION_HEIGHT,
            min_separators: DEFAULT_MIN_SEPARATORS,
        }
    }
}

/// The aspect-ratio heuristic used when separators don't pan out.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformOptions {
    /// Panel count for an image no taller than the first breakpoint.
    pub base_panels: u32,

    /// Ascending height/width ratios; each one strictly exceeded adds
    /// a panel.
    pub aspect_breakpoints: Vec<f64>,
}

impl Default for UniformOptions {
    fn default() -> Self {
        Self {
            base_panels: DEFAULT_BASE_PANELS,
            aspect_breakpoints: DEFAULT_ASPECT_BREAKPOINTS.to_vec(),
        }
    }
}

/// What to do with a region that cannot be cropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionFallback {
    /// Drop the region and carry on with its siblings.
    Skip,
    /// Put a copy of the whole strip in its place.
    WholeImage,
}

impl Default for ExtractionFallback {
    fn default() -> Self {
        ExtractionFallback::WholeImage
    }
}

/// Everything the single-strip pipeline needs to know.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentOptions {
    pub separators: SeparatorOptions,
    pub regions: RegionOptions,
    pub uniform: UniformOptions,
    pub on_extraction_error: ExtractionFallback,
}

impl SegmentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_band_rows(mut self, rows: u32) -> Self {
        self.separators.band_rows = rows;
        self
    }

    pub fn with_brightness_threshold(mut self, threshold: u8) -> Self {
        self.separators.brightness_threshold = threshold;
        self
    }

    pub fn with_light_ratio(mut self, ratio: f64) -> Self {
        self.separators.light_ratio = ratio;
        self
    }

    pub fn with_edge_margin(mut self, rows: u32) -> Self {
        self.separators.edge_margin = rows;
        self
    }

    pub fn with_min_spacing(mut self, rows: u32) -> Self {
        self.separators.min_spacing = rows;
        self
    }

    /// Set the row and column sampling strides together.
    pub fn with_strides(mut self, rows: u32, columns: u32) -> Self {
        self.separators.row_stride = rows;
        self.separators.column_stride = columns;
        self
    }

    pub fn with_side_margin(mut self, columns: u32) -> Self {
        self.separators.side_margin = columns;
        self
    }

    pub fn with_separator_skip(mut self, rows: u32) -> Self {
        self.regions.separator_skip = rows;
        self
    }

    pub fn with_min_region_height(mut self, rows: u32) -> Self {
        self.regions.min_region_height = rows;
        self
    }

    pub fn with_min_separators(mut self, count: usize) -> Self {
        self.regions.min_separators = count;
        self
    }

    pub fn with_base_panels(mut self, count: u32) -> Self {
        self.uniform.base_panels = count;
        self
    }

    pub fn with_aspect_breakpoints<B: Into<Vec<f64>>>(mut self, breakpoints: B) -> Self {
        self.uniform.aspect_breakpoints = breakpoints.into();
        self
    }

    pub fn with_extraction_fallback(mut self, fallback: ExtractionFallback) -> Self {
        self.on_extraction_error = fallback;
        self
    }

    /// Reject settings that would make the scan loop forever, divide
    /// by zero, or never (or always) fire.
    pub fn validate(&self) -> Result<()> {
        let sep = &self.separators;
        if sep.band_rows == 0 {
            return Err(SegmentError::invalid("band_rows", "must be at least 1"));
        }
        if sep.row_stride == 0 || sep.column_stride == 0 {
            return Err(SegmentError::invalid("stride", "must be at least 1"));
        }
        if !(sep.light_ratio > 0.0 && sep.light_ratio < 1.0) {
            return Err(SegmentError::invalid(
                "light_ratio",
                format!("{} is not strictly between 0 and 1", sep.light_ratio),
            ));
        }
        if self.uniform.base_panels == 0 {
            return Err(SegmentError::invalid("base_panels", "must be at least 1"));
        }
        let breaks = &self.uniform.aspect_breakpoints;
        if breaks.iter().any(|b| !(b.is_finite() && *b > 0.0)) {
            return Err(SegmentError::invalid(
                "aspect_breakpoints",
                "every breakpoint must be a positive number",
            ));
        }
        if breaks.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SegmentError::invalid(
                "aspect_breakpoints",
                "breakpoints must be strictly ascending",
            ));
        }
        Ok(())
    }
}
