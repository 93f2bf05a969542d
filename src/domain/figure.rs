// Chart figure domain models
use super::dataset::{ClassifiedDataset, ColorTag};

/// RGB display color, components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl DisplayColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl From<ColorTag> for DisplayColor {
    fn from(tag: ColorTag) -> Self {
        match tag {
            ColorTag::High => DisplayColor::new(0.84, 0.15, 0.16),
            ColorTag::Medium => DisplayColor::new(0.95, 0.77, 0.06),
            ColorTag::Low => DisplayColor::new(0.17, 0.63, 0.17),
            ColorTag::Baseline => DisplayColor::new(0.12, 0.47, 0.71),
        }
    }
}

/// A single horizontal bar. Slot 0 is the topmost bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub slot: usize,
    pub label: String,
    pub value: f64,
    pub color: DisplayColor,
}

/// A horizontal bar chart ready to be laid out on a page
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_axis_label: String,
    pub bars: Vec<Bar>,
}

impl Figure {
    pub fn new(title: String, x_axis_label: String, bars: Vec<Bar>) -> Self {
        Self {
            title,
            x_axis_label,
            bars,
        }
    }

    /// Build a chart from a classified dataset, keeping row order top to bottom
    pub fn render(dataset: &ClassifiedDataset, x_axis_label: &str, title: &str) -> Self {
        let bars = dataset
            .labels()
            .zip(dataset.values())
            .zip(dataset.colors())
            .enumerate()
            .map(|(slot, ((label, value), tag))| Bar {
                slot,
                label: label.to_string(),
                value,
                color: tag.into(),
            })
            .collect();

        Self::new(title.to_string(), x_axis_label.to_string(), bars)
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Right edge of the value axis. Never zero, so empty or all-zero
    /// charts still get a usable scale.
    pub fn axis_max(&self) -> f64 {
        let max = self
            .bars
            .iter()
            .map(|b| b.value)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);

        if max > 0.0 { max } else { 1.0 }
    }

    /// Evenly spaced tick values from 0 to `axis_max`
    pub fn ticks(&self, intervals: usize) -> Vec<f64> {
        let intervals = intervals.max(1);
        let max = self.axis_max();
        (0..=intervals)
            .map(|i| max * i as f64 / intervals as f64)
            .collect()
    }
}
