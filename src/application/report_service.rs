// Report service - Use case for building the security event report
use crate::application::document_writer::DocumentWriter;
use crate::application::event_repository::EventRepository;
use crate::domain::classification::Summary;
use crate::domain::dataset::ReportSection;
use crate::domain::error::Result;
use crate::domain::figure::Figure;
use std::path::Path;
use std::sync::Arc;

/// What a finished run produced
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutcome {
    pub pages: usize,
    pub rows: Vec<(ReportSection, usize)>,
}

#[derive(Clone)]
pub struct ReportService {
    repository: Arc<dyn EventRepository>,
    writer: Arc<dyn DocumentWriter>,
}

impl ReportService {
    pub fn new(repository: Arc<dyn EventRepository>, writer: Arc<dyn DocumentWriter>) -> Self {
        Self { repository, writer }
    }

    /// Fetch, classify and chart every section, then write the document.
    /// Any failure aborts before the output path is touched.
    pub async fn generate(&self, output_path: &Path) -> Result<ReportOutcome> {
        let mut figures = Vec::with_capacity(ReportSection::ALL.len());
        let mut rows = Vec::with_capacity(ReportSection::ALL.len());

        for section in ReportSection::ALL {
            let figure = self.build_figure(section).await?;
            rows.push((section, figure.bars.len()));
            figures.push(figure);
        }

        self.writer.write(&figures, output_path)?;
        tracing::info!(
            "Wrote {} page report to {}",
            figures.len(),
            output_path.display()
        );

        Ok(ReportOutcome {
            pages: figures.len(),
            rows,
        })
    }

    async fn build_figure(&self, section: ReportSection) -> Result<Figure> {
        let dataset = self.repository.fetch(section).await?;

        match Summary::of(&dataset.values()) {
            Some(summary) => tracing::info!(
                "{}: {} rows, mean {:.2}, std dev {:.2}",
                section,
                summary.count,
                summary.mean,
                summary.std_dev
            ),
            None => tracing::info!("{}: no rows", section),
        }

        let classified = dataset.classify(section.policy());
        Ok(Figure::render(
            &classified,
            section.x_axis_label(),
            section.title(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::{ColorTag, Dataset, LabeledValue};
    use crate::domain::error::ReportError;
    use crate::domain::figure::DisplayColor;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRepository {
        rows: HashMap<ReportSection, Vec<LabeledValue>>,
        failing: Option<ReportSection>,
        calls: Mutex<Vec<ReportSection>>,
    }

    impl FakeRepository {
        fn with(mut self, section: ReportSection, rows: &[(&str, f64)]) -> Self {
            self.rows.insert(
                section,
                rows.iter().map(|(l, v)| LabeledValue::new(*l, *v)).collect(),
            );
            self
        }
    }

    #[async_trait]
    impl EventRepository for FakeRepository {
        async fn fetch(&self, section: ReportSection) -> Result<Dataset> {
            self.calls.lock().unwrap().push(section);
            if self.failing == Some(section) {
                return Err(ReportError::Store {
                    dataset: section.name(),
                    source: sqlx::Error::PoolClosed,
                });
            }
            Ok(Dataset::new(
                self.rows.get(&section).cloned().unwrap_or_default(),
            ))
        }
    }

    #[derive(Default)]
    struct RecordingWriter {
        documents: Mutex<Vec<(PathBuf, Vec<Figure>)>>,
    }

    impl DocumentWriter for RecordingWriter {
        fn write(&self, figures: &[Figure], path: &Path) -> Result<()> {
            self.documents
                .lock()
                .unwrap()
                .push((path.to_path_buf(), figures.to_vec()));
            Ok(())
        }
    }

    fn colors(figure: &Figure) -> Vec<DisplayColor> {
        figure.bars.iter().map(|b| b.color).collect()
    }

    #[tokio::test]
    async fn test_generate_end_to_end() {
        let repository = Arc::new(
            FakeRepository::default()
                .with(
                    ReportSection::Counts,
                    &[("2024-01-07", 5.0), ("2024-01-06", 0.0), ("2024-01-05", 12.0)],
                )
                .with(ReportSection::Noise, &[("sigA", 40.0), ("sigB", 5.0)])
                .with(ReportSection::Priority, &[("sigC", 9.0), ("sigD", 2.0)]),
        );
        let writer = Arc::new(RecordingWriter::default());
        let service = ReportService::new(repository, writer.clone());

        let outcome = service.generate(Path::new("/tmp/report.pdf")).await.unwrap();
        assert_eq!(outcome.pages, 3);

        let documents = writer.documents.lock().unwrap();
        assert_eq!(documents.len(), 1);
        let (path, figures) = &documents[0];
        assert_eq!(path, Path::new("/tmp/report.pdf"));

        let titles: Vec<&str> = figures.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Event Level Comparison", "Top 10 Events", "Event Count by Signature"]
        );

        let low = DisplayColor::from(ColorTag::Low);
        let high = DisplayColor::from(ColorTag::High);
        let baseline = DisplayColor::from(ColorTag::Baseline);
        assert_eq!(colors(&figures[0]), vec![low, baseline, baseline]);
        assert_eq!(colors(&figures[1]), vec![high, low]);
        assert_eq!(colors(&figures[2]), vec![low, low]);
        assert_eq!(figures[0].bars[0].label, "2024-01-07");
        assert_eq!(figures[0].bars[0].slot, 0);
    }

    #[tokio::test]
    async fn test_generate_with_empty_datasets_still_writes_three_pages() {
        let repository = Arc::new(
            FakeRepository::default().with(ReportSection::Priority, &[("sigC", 9.0)]),
        );
        let writer = Arc::new(RecordingWriter::default());
        let service = ReportService::new(repository, writer.clone());

        let outcome = service.generate(Path::new("report.pdf")).await.unwrap();
        assert_eq!(
            outcome.rows,
            vec![
                (ReportSection::Counts, 0),
                (ReportSection::Priority, 1),
                (ReportSection::Noise, 0),
            ]
        );

        let documents = writer.documents.lock().unwrap();
        let figures = &documents[0].1;
        assert_eq!(figures.len(), 3);
        assert!(figures[0].is_empty());
        assert!(figures[2].is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_aborts_before_writing() {
        let repository = Arc::new(FakeRepository {
            failing: Some(ReportSection::Priority),
            ..Default::default()
        });
        let writer = Arc::new(RecordingWriter::default());
        let service = ReportService::new(repository.clone(), writer.clone());

        let err = service.generate(Path::new("report.pdf")).await.unwrap_err();
        assert!(matches!(err, ReportError::Store { dataset: "priority", .. }));
        assert!(writer.documents.lock().unwrap().is_empty());
        assert_eq!(
            *repository.calls.lock().unwrap(),
            vec![ReportSection::Counts, ReportSection::Priority]
        );
    }
}
