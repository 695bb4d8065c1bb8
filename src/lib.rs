// #![deny(missing_docs)]

//! Cut comic strips into their panels.

extern crate image;

pub mod brightness;
pub mod error;
pub use error::{Result, SegmentError};

pub mod options;
pub use options::{ExtractionFallback, RegionOptions, SegmentOptions, SeparatorOptions, UniformOptions};

pub mod separators;
pub use separators::{find_separators, SeparatorSet};

pub mod regions;
pub use regions::{divide_uniformly, plan_regions, regions_from_separators, FallbackReason, Layout, Region};

pub mod extract;
pub use extract::{extract_panel, extract_panels, Panel};

pub mod segmenter;
pub use segmenter::{segment, Segmentation, Segmenter};

pub mod source;
pub use source::{EncodedStrip, StripSource};

pub mod batch;
pub use batch::{BatchOutcome, BatchSegmenter, PanelContent, Strip, StripInfo, StripStatus, TaggedPanel};

pub mod encode;
