// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Segment - The main function
//!
//! The main segmentation routine for a single strip: find the
//! separators, turn them into regions (or divide the strip evenly when
//! they don't pan out), and crop out the panels.

use crate::error::{Result, SegmentError};
use crate::extract::{extract_panels, whole_image, Panel};
use crate::options::SegmentOptions;
use crate::regions::{plan_regions, Layout, Region, RegionPlan};
use crate::separators::{find_separators, SeparatorSet};
use image::{GenericImageView, Pixel, Primitive};
use log::{debug, warn};

/// The panels of one strip, top to bottom, together with the regions
/// they were cut from.
#[derive(Debug)]
pub struct Segmentation<P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    pub layout: Layout,
    pub regions: Vec<Region>,
    pub panels: Vec<Panel<P, S>>,
}

impl<P, S> Segmentation<P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

// Like the rest of the crate, this holds nothing but a reference to the
// source; the source is never written to, and no panel borrows from it.

/// A struct for holding the strip to be segmented.
pub struct Segmenter<'a, I, P, S>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    image: &'a I,
    options: SegmentOptions,
}

impl<'a, I, P, S> Segmenter<'a, I, P, S>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    /// Creates a new Segmenter with the default tunables.
    pub fn new(image: &'a I) -> Self {
        Self::with_options(image, SegmentOptions::default())
    }

    pub fn with_options(image: &'a I, options: SegmentOptions) -> Self {
        Self { image, options }
    }

    pub fn options(&self) -> &SegmentOptions {
        &self.options
    }

    fn check_dimensions(&self) -> Result<(u32, u32)> {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Err(SegmentError::EmptyImage { width, height });
        }
        Ok((width, height))
    }

    pub fn separators(&self) -> SeparatorSet {
        find_separators(self.image, &self.options.separators)
    }

    /// Work out the regions without cropping anything.
    pub fn plan(&self) -> Result<RegionPlan> {
        let (width, height) = self.check_dimensions()?;
        let separators = self.separators();
        Ok(plan_regions(&separators, width, height, &self.options))
    }

    /// Run the whole pipeline.  The only failure is an image with no
    /// pixels; anything else degrades to fewer, or coarser, panels, and
    /// in the worst case to a single panel holding the whole strip.
    pub fn segment(&self) -> Result<Segmentation<P, S>> {
        let plan = self.plan()?;
        let panels = extract_panels(self.image, &plan.regions, self.options.on_extraction_error);
        debug!(
            "{} panels from {} regions ({:?})",
            panels.len(),
            plan.regions.len(),
            plan.layout
        );

        if panels.is_empty() {
            warn!("no panels survived extraction; using the whole strip");
            return Ok(Segmentation {
                layout: Layout::WholeImage,
                regions: vec![Region::new(0, self.image.height())],
                panels: vec![whole_image(self.image)],
            });
        }

        Ok(Segmentation {
            layout: plan.layout,
            regions: plan.regions,
            panels,
        })
    }
}

/// A convenience wrapper: segment an image with the given tunables.
pub fn segment<I, P, S>(image: &I, options: &SegmentOptions) -> Result<Segmentation<P, S>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    Segmenter::with_options(image, options.clone()).segment()
}
