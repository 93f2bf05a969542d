// Dataset domain models
use super::classification::ClassificationPolicy;
use std::fmt;

/// One result row: a category label and its numeric value
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

impl LabeledValue {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// The three report sections, in page order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportSection {
    Counts,
    Priority,
    Noise,
}

impl ReportSection {
    /// Page order of the assembled document. Never reorder.
    pub const ALL: [ReportSection; 3] = [
        ReportSection::Counts,
        ReportSection::Priority,
        ReportSection::Noise,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReportSection::Counts => "counts",
            ReportSection::Priority => "priority",
            ReportSection::Noise => "noise",
        }
    }

    pub fn policy(&self) -> ClassificationPolicy {
        match self {
            ReportSection::Counts => ClassificationPolicy::FirstRowOnly,
            ReportSection::Priority => ClassificationPolicy::FixedThreshold,
            ReportSection::Noise => ClassificationPolicy::Statistical,
        }
    }

    pub fn x_axis_label(&self) -> &'static str {
        match self {
            ReportSection::Counts => "Daily Event Counts",
            ReportSection::Priority => "Priority by Signature",
            ReportSection::Noise => "Past 24hrs Noisiest Alerts",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportSection::Counts => "Event Level Comparison",
            ReportSection::Priority => "Top 10 Events",
            ReportSection::Noise => "Event Count by Signature",
        }
    }
}

impl fmt::Display for ReportSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic color of a bar, independent of any display palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTag {
    High,
    Medium,
    Low,
    Baseline,
}

/// Rows of one query result, in result-set order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<LabeledValue>,
}

impl Dataset {
    pub fn new(rows: Vec<LabeledValue>) -> Self {
        Self { rows }
    }

    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.value).collect()
    }

    /// Attach a color tag to every row using the given policy
    pub fn classify(self, policy: ClassificationPolicy) -> ClassifiedDataset {
        let tags = policy.classify(&self.values());
        let rows = self
            .rows
            .into_iter()
            .zip(tags)
            .map(|(row, tag)| ClassifiedRow {
                label: row.label,
                value: row.value,
                tag,
            })
            .collect();
        ClassifiedDataset { rows }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    pub label: String,
    pub value: f64,
    pub tag: ColorTag,
}

/// A dataset whose rows carry their color tags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedDataset {
    pub rows: Vec<ClassifiedRow>,
}

impl ClassifiedDataset {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.label.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.value)
    }

    pub fn colors(&self) -> impl Iterator<Item = ColorTag> + '_ {
        self.rows.iter().map(|r| r.tag)
    }
}
