//! Plain-text insights for one year, and their export.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::analysis::lagging::LaggingConfig;
use crate::analysis::ranking::digital_divide_ratio;
use crate::data::model::{GlobalMetrics, GrowthObservation};

/// Entries quoted by name in each insight.
const HIGHLIGHTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InsightKind {
    GlobalTrend,
    TopPerformers,
    FastestGrowing,
    CriticalLagging,
    DigitalDivide,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub content: String,
}

impl Insight {
    fn new(kind: InsightKind, title: &str, content: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            content,
        }
    }
}

/// Build the insight list for `metrics.year`. Insights whose inputs are
/// missing (no previous year, no lagging countries, ...) are left out.
pub fn build_insights(metrics: &GlobalMetrics, data: &[GrowthObservation], lagging: &LaggingConfig) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let (Some(growth), Some(average)) = (metrics.yoy_growth, metrics.global_average) {
        let direction = if growth > 0.0 { "increased" } else { "decreased" };
        insights.push(Insight::new(
            InsightKind::GlobalTrend,
            "Global Trend",
            format!(
                "Global bandwidth per capita {direction} by {:.2}% in {}. \
                 Average bandwidth reached {average:.2} Kbps per capita.",
                growth.abs(),
                metrics.year
            ),
        ));
    }

    if !metrics.top_countries.is_empty() {
        let leaders = metrics
            .top_countries
            .iter()
            .take(HIGHLIGHTS)
            .enumerate()
            .map(|(i, c)| format!("{}. {} ({:.1}K Kbps)", i + 1, c.country, c.bandwidth / 1000.0))
            .collect::<Vec<_>>()
            .join(", ");
        insights.push(Insight::new(
            InsightKind::TopPerformers,
            "Top Performers",
            format!("{leaders}. These countries lead in international bandwidth infrastructure."),
        ));
    }

    if !metrics.fastest_growing.is_empty() {
        let fastest = metrics
            .fastest_growing
            .iter()
            .take(HIGHLIGHTS)
            .map(|c| format!("{} (+{:.1}%)", c.country, c.growth))
            .collect::<Vec<_>>()
            .join(", ");
        insights.push(Insight::new(
            InsightKind::FastestGrowing,
            "Fastest Growing",
            format!("{fastest} showed remarkable YoY growth, indicating significant infrastructure investment."),
        ));
    }

    if !metrics.critical_lagging.is_empty() {
        let concerns = metrics
            .critical_lagging
            .iter()
            .take(HIGHLIGHTS)
            .map(|c| c.country.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        insights.push(Insight::new(
            InsightKind::CriticalLagging,
            "Critical Lagging Countries",
            format!(
                "{} countries show stagnant growth (≤{}% for {}+ years). Top concerns: {concerns}. \
                 These regions require urgent policy intervention.",
                metrics.critical_lagging.len(),
                lagging.threshold,
                lagging.min_consecutive
            ),
        ));
    }

    if let Some(ratio) = digital_divide_ratio(data, metrics.year) {
        insights.push(Insight::new(
            InsightKind::DigitalDivide,
            "Digital Divide",
            format!(
                "The bandwidth gap between highest and lowest countries is {ratio:.0}x, \
                 highlighting significant digital inequality that impacts economic competitiveness."
            ),
        ));
    }

    insights
}

/// Render insights as `title\ncontent\n` blocks separated by blank lines.
pub fn render_insights(insights: &[Insight]) -> String {
    insights
        .iter()
        .map(|i| format!("{}\n{}\n", i.title, i.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// File name used when exporting the insights of `year`.
pub fn export_file_name(year: i32) -> String {
    format!("bandwidth-insights-{year}.txt")
}

/// Write the rendered insights into `dir` and return the written path.
pub fn export_insights(dir: &Path, year: i32, insights: &[Insight]) -> std::io::Result<PathBuf> {
    let path = dir.join(export_file_name(year));
    std::fs::write(&path, render_insights(insights))?;
    log::info!("Exported {} insights to {}", insights.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::analysis::global::aggregate;
    use crate::analysis::growth::compute_growth;
    use crate::data::model::fixtures::obs;

    fn sample() -> Vec<GrowthObservation> {
        compute_growth(&[
            obs("Alpha", "A", 2019, 1000.0),
            obs("Alpha", "A", 2020, 1500.0),
            obs("Beta", "B", 2019, 200.0),
            obs("Beta", "B", 2020, 300.0),
        ])
    }

    fn kinds(insights: &[Insight]) -> Vec<InsightKind> {
        insights.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn full_year_produces_expected_insights() {
        // Arrange
        let data = sample();
        let metrics = aggregate(&data, 2020);

        // Act
        let insights = build_insights(&metrics, &data, &LaggingConfig::default());

        // Assert
        assert_eq!(
            kinds(&insights),
            vec![
                InsightKind::GlobalTrend,
                InsightKind::TopPerformers,
                InsightKind::FastestGrowing,
                InsightKind::DigitalDivide,
            ]
        );
        assert_eq!(
            insights[0].content,
            "Global bandwidth per capita increased by 50.00% in 2020. \
             Average bandwidth reached 900.00 Kbps per capita."
        );
        assert_eq!(
            insights[1].content,
            "1. Alpha (1.5K Kbps), 2. Beta (0.3K Kbps). \
             These countries lead in international bandwidth infrastructure."
        );
        assert!(insights[2].content.starts_with("Alpha (+50.0%), Beta (+50.0%)"));
        assert!(insights[3].content.contains("is 5x"));
    }

    #[test]
    fn declining_trend_reports_absolute_value() {
        let data = compute_growth(&[obs("A", "A", 2019, 200.0), obs("A", "A", 2020, 150.0)]);
        let metrics = aggregate(&data, 2020);

        let insights = build_insights(&metrics, &data, &LaggingConfig::default());

        assert!(insights[0].content.contains("decreased by 25.00%"));
    }

    #[test]
    fn lagging_insight_lists_concerns() {
        let data = compute_growth(&[
            obs("Slow", "S", 2016, 100.0),
            obs("Slow", "S", 2017, 101.0),
            obs("Slow", "S", 2018, 102.0),
            obs("Slow", "S", 2019, 103.0),
        ]);
        let metrics = aggregate(&data, 2019);

        let insights = build_insights(&metrics, &data, &LaggingConfig::default());
        let lagging = insights
            .iter()
            .find(|i| i.kind == InsightKind::CriticalLagging)
            .unwrap();

        assert_eq!(
            lagging.content,
            "1 countries show stagnant growth (≤5% for 3+ years). Top concerns: Slow. \
             These regions require urgent policy intervention."
        );
    }

    #[test]
    fn empty_year_has_no_insights() {
        let metrics = aggregate(&[], 2020);
        assert!(build_insights(&metrics, &[], &LaggingConfig::default()).is_empty());
    }

    #[test]
    fn render_joins_blocks_with_blank_line() {
        let insights = vec![
            Insight::new(InsightKind::GlobalTrend, "One", "first".into()),
            Insight::new(InsightKind::DigitalDivide, "Two", "second".into()),
        ];

        assert_eq!(render_insights(&insights), "One\nfirst\n\nTwo\nsecond\n");
    }

    #[test]
    fn export_writes_year_named_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let insights = vec![Insight::new(InsightKind::GlobalTrend, "One", "first".into())];

        // Act
        let path = export_insights(dir.path(), 2021, &insights).unwrap();

        // Assert
        assert_eq!(path.file_name().unwrap(), "bandwidth-insights-2021.txt");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "One\nfirst\n");
    }
}
