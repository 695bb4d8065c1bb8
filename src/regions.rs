// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turn separators into panel regions
//!
//! A region is a half-open band of rows, `start..end`, spanning the
//! full width of the strip.  Regions come from one of two places: the
//! gaps between detected separators, or, when detection doesn't find
//! enough to go on, an even division of the strip whose panel count is
//! guessed from its aspect ratio.

use crate::options::{RegionOptions, SegmentOptions, UniformOptions};
use log::{debug, warn};
use std::iter::once;

/// One candidate panel: rows `start..end` of the source, full width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub start: u32,
    pub end: u32,
}

impl Region {
    pub fn new(start: u32, end: u32) -> Self {
        Region { start, end }
    }

    pub fn height(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// Why the separators were not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Fewer separators than `min_separators` were found.
    TooFewSeparators,
    /// Separators were found, but every region between them was too
    /// short to keep.
    NoUsableRegions,
}

/// Where a strip's regions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Separators,
    Uniform(FallbackReason),
    /// Nothing else worked; the whole strip is one panel.
    WholeImage,
}

/// The regions for one strip, and how we got them.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPlan {
    pub layout: Layout,
    pub regions: Vec<Region>,
}

/// Build regions from the gaps between separators.
///
/// The first region runs from the top of the image to the first
/// separator.  Every later region starts `separator_skip` rows past a
/// separator and runs to the next one, or to the bottom of the image.
/// Regions shorter than `min_region_height` (or empty) are dropped.
/// An empty separator list gives the whole image as one region.
pub fn regions_from_separators(separators: &[u32], height: u32, opts: &RegionOptions) -> Vec<Region> {
    let starts = once(0).chain(
        separators
            .iter()
            .map(|s| s.saturating_add(opts.separator_skip)),
    );
    let ends = separators.iter().cloned().chain(once(height));

    starts
        .zip(ends)
        .map(|(start, end)| Region::new(start, end.min(height)))
        .filter(|r| r.end > r.start && r.height() >= opts.min_region_height)
        .collect()
}

/// How many panels a strip of this shape probably has.  Starts at
/// `base_panels` and adds one for every breakpoint the height/width
/// ratio strictly exceeds.  Never more panels than there are rows.
pub fn panel_count_for(width: u32, height: u32, opts: &UniformOptions) -> u32 {
    if width == 0 || height == 0 {
        return 0;
    }
    let aspect = f64::from(height) / f64::from(width);
    let crossed = opts
        .aspect_breakpoints
        .iter()
        .filter(|&&b| aspect > b)
        .count() as u32;
    opts.base_panels.max(1).saturating_add(crossed).min(height)
}

/// Split the strip into equal-height regions, the last one taking up
/// whatever rows the division leaves over.  The result exactly covers
/// `0..height`.
pub fn divide_uniformly(width: u32, height: u32, opts: &UniformOptions) -> Vec<Region> {
    let count = panel_count_for(width, height, opts);
    if count == 0 {
        return vec![];
    }
    let panel_height = height / count;
    (0..count)
        .map(|i| {
            let start = i * panel_height;
            let end = if i == count - 1 { height } else { start + panel_height };
            Region::new(start, end)
        })
        .collect()
}

/// Decide on the regions for one strip, given whatever separators the
/// scan turned up.
pub fn plan_regions(separators: &[u32], width: u32, height: u32, opts: &SegmentOptions) -> RegionPlan {
    let reason = if separators.len() < opts.regions.min_separators {
        FallbackReason::TooFewSeparators
    } else {
        let regions = regions_from_separators(separators, height, &opts.regions);
        if !regions.is_empty() {
            debug!("{} regions from {} separators", regions.len(), separators.len());
            return RegionPlan {
                layout: Layout::Separators,
                regions,
            };
        }
        FallbackReason::NoUsableRegions
    };

    let regions = divide_uniformly(width, height, &opts.uniform);
    if !regions.is_empty() {
        debug!(
            "uniform division of {}x{} into {} regions ({:?})",
            width,
            height,
            regions.len(),
            reason
        );
        return RegionPlan {
            layout: Layout::Uniform(reason),
            regions,
        };
    }

    warn!("no regions for a {}x{} strip; using the whole image", width, height);
    RegionPlan {
        layout: Layout::WholeImage,
        regions: if height > 0 {
            vec![Region::new(0, height)]
        } else {
            vec![]
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(skip: u32, min: u32) -> RegionOptions {
        RegionOptions {
            separator_skip: skip,
            min_region_height: min,
            min_separators: 1,
        }
    }

    #[test]
    fn regions_between_separators() {
        let regions = regions_from_separators(&[594, 1194], 1800, &opts(15, 30));
        assert_eq!(
            regions,
            vec![
                Region::new(0, 594),
                Region::new(609, 1194),
                Region::new(1209, 1800)
            ]
        );
    }

    #[test]
    fn short_regions_are_dropped() {
        // The last separator sits 20 rows from the bottom.
        let regions = regions_from_separators(&[300, 580], 600, &opts(10, 30));
        assert_eq!(regions, vec![Region::new(0, 300), Region::new(310, 580)]);
    }

    #[test]
    fn skip_past_the_bottom_is_harmless() {
        let regions = regions_from_separators(&[590], 600, &opts(15, 1));
        assert_eq!(regions, vec![Region::new(0, 590)]);
    }

    #[test]
    fn no_separators_means_one_region() {
        assert_eq!(
            regions_from_separators(&[], 400, &opts(15, 30)),
            vec![Region::new(0, 400)]
        );
    }

    #[test]
    fn panel_count_follows_aspect_ratio() {
        let u = UniformOptions::default();
        assert_eq!(panel_count_for(600, 600, &u), 3);
        assert_eq!(panel_count_for(100, 250, &u), 3);
        assert_eq!(panel_count_for(100, 251, &u), 4);
        assert_eq!(panel_count_for(100, 401, &u), 5);
        assert_eq!(panel_count_for(100, 601, &u), 6);
        assert_eq!(panel_count_for(100, 5000, &u), 6);
        assert_eq!(panel_count_for(1000, 2, &u), 2);
        assert_eq!(panel_count_for(0, 100, &u), 0);
    }

    #[test]
    fn huge_base_count_is_capped_by_height() {
        let u = UniformOptions {
            base_panels: u32::MAX,
            ..UniformOptions::default()
        };
        assert_eq!(panel_count_for(100, 1000, &u), 1000);
        assert_eq!(divide_uniformly(100, 1000, &u).len(), 1000);
    }

    #[test]
    fn uniform_division_covers_the_image() {
        let regions = divide_uniformly(600, 600, &UniformOptions::default());
        assert_eq!(
            regions,
            vec![
                Region::new(0, 200),
                Region::new(200, 400),
                Region::new(400, 600)
            ]
        );

        let regions = divide_uniformly(100, 301, &UniformOptions::default());
        assert_eq!(regions.len(), 4);
        assert_eq!(regions[3], Region::new(225, 301));
    }

    #[test]
    fn plan_falls_back_when_separators_are_scarce() {
        let o = SegmentOptions::default().with_min_separators(2);
        let plan = plan_regions(&[300], 600, 600, &o);
        assert_eq!(plan.layout, Layout::Uniform(FallbackReason::TooFewSeparators));
        assert_eq!(plan.regions.len(), 3);
    }

    #[test]
    fn plan_falls_back_when_regions_are_too_short() {
        let o = SegmentOptions::default().with_min_region_height(500);
        let plan = plan_regions(&[300], 600, 600, &o);
        assert_eq!(plan.layout, Layout::Uniform(FallbackReason::NoUsableRegions));
        assert_eq!(plan.regions.len(), 3);
    }

    #[test]
    fn plan_uses_separators_when_it_can() {
        let plan = plan_regions(&[594, 1194], 600, 1800, &SegmentOptions::default());
        assert_eq!(plan.layout, Layout::Separators);
        assert_eq!(plan.regions.len(), 3);
    }

    #[test]
    fn plan_for_nothing_is_nothing() {
        let plan = plan_regions(&[], 0, 0, &SegmentOptions::default());
        assert_eq!(plan.layout, Layout::WholeImage);
        assert!(plan.regions.is_empty());
    }
}
