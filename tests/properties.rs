//! Property-based tests for the segmentation pipeline
//!
//! Tests invariants:
//! - Regions built from separators stay inside the image, in order,
//!   without overlapping, and no shorter than the minimum
//! - An image without gutters divides exactly as the uniform divider says
//! - Extraction yields one panel per region
//! - Same image, same options, same answer

use image::{ImageBuffer, Luma, Rgb, RgbImage};
use proptest::prelude::*;
use vignette::extract::extract_panels;
use vignette::regions::panel_count_for;
use vignette::{
    divide_uniformly, plan_regions, regions_from_separators, ExtractionFallback, Layout,
    RegionOptions, SegmentOptions, Segmenter, UniformOptions,
};

fn separators_below(height: u32) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0..height, 0..24).prop_map(|mut v| {
        v.sort_unstable();
        v.dedup();
        v
    })
}

fn height_and_separators() -> impl Strategy<Value = (u32, Vec<u32>)> {
    (1u32..4000).prop_flat_map(|h| (Just(h), separators_below(h)))
}

proptest! {
    #[test]
    fn separator_regions_are_in_bounds_and_ordered(
        (height, separators) in height_and_separators(),
        skip in 0u32..40,
        min in 0u32..80,
    ) {
        let opts = RegionOptions { separator_skip: skip, min_region_height: min, min_separators: 1 };
        let regions = regions_from_separators(&separators, height, &opts);
        for r in &regions {
            prop_assert!(r.start < r.end);
            prop_assert!(r.end <= height);
            prop_assert!(r.height() >= min);
        }
        for pair in regions.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn uniform_division_exactly_covers_the_image(width in 1u32..2000, height in 1u32..6000) {
        let opts = UniformOptions::default();
        let regions = divide_uniformly(width, height, &opts);
        prop_assert!(!regions.is_empty());
        prop_assert!(regions.len() <= 6);
        prop_assert_eq!(regions.len() as u32, panel_count_for(width, height, &opts));
        prop_assert_eq!(regions[0].start, 0);
        prop_assert_eq!(regions[regions.len() - 1].end, height);
        for pair in regions.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
            prop_assert!(pair[0].height() >= 1);
        }
    }

    #[test]
    fn gutterless_images_divide_uniformly(width in 1u32..48, height in 1u32..360, level in 0u8..=200) {
        let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, Luma([level]));
        let seg = Segmenter::new(&img);
        prop_assert!(seg.separators().is_empty());
        let result = seg.segment().unwrap();
        prop_assert!(matches!(result.layout, Layout::Uniform(_)));
        prop_assert_eq!(result.len(), divide_uniformly(width, height, &UniformOptions::default()).len());
        prop_assert!(!result.is_empty());
    }

    #[test]
    fn one_panel_per_region(width in 1u32..32, (height, separators) in (1u32..300).prop_flat_map(|h| (Just(h), separators_below(h)))) {
        let img: RgbImage = ImageBuffer::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]));
        let plan = plan_regions(&separators, width, height, &SegmentOptions::default());
        let panels = extract_panels(&img, &plan.regions, ExtractionFallback::Skip);
        prop_assert_eq!(panels.len(), plan.regions.len());
        for (panel, region) in panels.iter().zip(&plan.regions) {
            prop_assert_eq!(panel.dimensions(), (width, region.height()));
        }
    }

    #[test]
    fn segmentation_is_deterministic(
        width in 8u32..64,
        height in 120u32..400,
        gutter in 50u32..300,
        light in 201u8..=255,
    ) {
        let img: RgbImage = ImageBuffer::from_fn(width, height, |x, y| {
            if y >= gutter && y < gutter + 10 { Rgb([light, light, light]) } else { Rgb([(x * 5) as u8, 10, 10]) }
        });
        let opts = SegmentOptions::new().with_edge_margin(20).with_side_margin(0);
        let a = Segmenter::with_options(&img, opts.clone()).segment().unwrap();
        let b = Segmenter::with_options(&img, opts).segment().unwrap();
        prop_assert_eq!(a.layout, b.layout);
        prop_assert_eq!(&a.regions, &b.regions);
        prop_assert_eq!(a.panels, b.panels);
    }
}
