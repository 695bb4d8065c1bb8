// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Segment a run of strips
//!
//! Strips are handled strictly one after another, in the order they
//! were handed in, and their panels are appended to a single flat list
//! in that same order.  Each panel carries a copy of its strip's
//! metadata and its position within the strip.
//!
//! A strip that can't be processed at all (it won't decode, or it has
//! no pixels) never stops the batch.  It is replaced by one emergency
//! panel, `PanelContent::Original`, telling the caller to show the
//! strip's source as it is.

use crate::error::Result;
use crate::options::SegmentOptions;
use crate::regions::Layout;
use crate::segmenter::Segmenter;
use crate::source::StripSource;
use image::RgbaImage;
use log::{error, info, warn};
use std::thread;
use std::time::Duration;

/// Identity of a published strip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StripInfo {
    pub id: String,
    pub title: Option<String>,
    pub date: Option<String>,
}

impl StripInfo {
    pub fn new<I: Into<String>>(id: I) -> Self {
        StripInfo {
            id: id.into(),
            ..StripInfo::default()
        }
    }

    pub fn with_title<T: Into<String>>(mut self, title: T) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_date<D: Into<String>>(mut self, date: D) -> Self {
        self.date = Some(date.into());
        self
    }

    /// The title if there is one, otherwise the id.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// A strip to be segmented: its identity and where its pixels live.
#[derive(Debug, Clone)]
pub struct Strip<Src> {
    pub info: StripInfo,
    pub source: Src,
}

impl<Src: StripSource> Strip<Src> {
    pub fn new(info: StripInfo, source: Src) -> Self {
        Strip { info, source }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    /// Pixels cropped out of the decoded strip.
    Image(RgbaImage),
    /// The strip could not be segmented; show its source as is.
    Original { source: String },
}

/// One panel of the flattened batch output.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedPanel {
    pub strip: StripInfo,
    /// Position of this panel within its strip, from zero.
    pub index: usize,
    pub content: PanelContent,
}

impl TaggedPanel {
    pub fn image(&self) -> Option<&RgbaImage> {
        match &self.content {
            PanelContent::Image(img) => Some(img),
            PanelContent::Original { .. } => None,
        }
    }

    pub fn is_emergency(&self) -> bool {
        self.image().is_none()
    }

    /// `<title or id>_<index + 1>.png`
    pub fn file_name(&self) -> String {
        format!("{}_{}.png", self.strip.label(), self.index + 1)
    }
}

/// How a single strip went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripStatus {
    Segmented { layout: Layout, panels: usize },
    /// `reason` is the display text of the error that stopped it.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub panels: Vec<TaggedPanel>,
    /// One entry per input strip, in input order.
    pub strips: Vec<(StripInfo, StripStatus)>,
}

impl BatchOutcome {
    /// True when nothing at all came out, which is the only situation
    /// a caller should report as a failure.
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.strips
            .iter()
            .filter(|(_, status)| matches!(status, StripStatus::Failed { .. }))
            .count()
    }
}

/// Runs the single-strip pipeline over a batch.
#[derive(Debug, Clone, Default)]
pub struct BatchSegmenter {
    options: SegmentOptions,
    throttle: Option<Duration>,
}

impl BatchSegmenter {
    pub fn new(options: SegmentOptions) -> Self {
        BatchSegmenter {
            options,
            throttle: None,
        }
    }

    /// Pause this long between strips.  A courtesy to whatever else is
    /// sharing the thread; it changes nothing about the output.
    pub fn with_throttle(mut self, pause: Duration) -> Self {
        self.throttle = Some(pause);
        self
    }

    fn segment_strip<Src: StripSource>(&self, strip: &Strip<Src>) -> Result<(Layout, Vec<RgbaImage>)> {
        let image = strip.source.decode()?.to_rgba8();
        let segmentation = Segmenter::with_options(&image, self.options.clone()).segment()?;
        Ok((segmentation.layout, segmentation.panels))
    }

    pub fn run<'s, Src, It>(&self, strips: It) -> BatchOutcome
    where
        Src: StripSource + 's,
        It: IntoIterator<Item = &'s Strip<Src>>,
    {
        let mut outcome = BatchOutcome {
            panels: Vec::new(),
            strips: Vec::new(),
        };

        for (n, strip) in strips.into_iter().enumerate() {
            if n > 0 {
                if let Some(pause) = self.throttle {
                    thread::sleep(pause);
                }
            }
            info!("processing strip {} ({})", strip.info.label(), strip.source.describe());

            let status = match self.segment_strip(strip) {
                Ok((layout, panels)) => {
                    if let Layout::Uniform(reason) = layout {
                        warn!("strip {}: divided uniformly ({:?})", strip.info.id, reason);
                    }
                    let count = panels.len();
                    outcome
                        .panels
                        .extend(panels.into_iter().enumerate().map(|(index, img)| TaggedPanel {
                            strip: strip.info.clone(),
                            index,
                            content: PanelContent::Image(img),
                        }));
                    StripStatus::Segmented {
                        layout,
                        panels: count,
                    }
                }
                Err(err) => {
                    error!("strip {}: {}; using the original as one panel", strip.info.id, err);
                    outcome.panels.push(TaggedPanel {
                        strip: strip.info.clone(),
                        index: 0,
                        content: PanelContent::Original {
                            source: strip.source.describe(),
                        },
                    });
                    StripStatus::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            outcome.strips.push((strip.info.clone(), status));
        }

        info!(
            "{} panels from {} strips ({} failed)",
            outcome.panels.len(),
            outcome.strips.len(),
            outcome.failed()
        );
        outcome
    }
}
