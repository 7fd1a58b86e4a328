//! Run aggregation and plain-text report rendering.
//!
//! [`RunReport::summarize`] is a read-only view over the raw result list:
//! overall counts, a per-category breakdown in first-seen order, failures
//! grouped by error-message prefix, and the distinct structured
//! output-field fingerprints each category produced. The raw results stay
//! the source of truth; caps in this module only bound what the renderer
//! prints.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::catalog::ModelCategory;
use crate::probe::{OutputShape, ProbeResult, ProbeStatus};
use crate::util::char_prefix;

/// Failures are grouped by this many leading characters of the error text.
pub const ERROR_GROUP_PREFIX_LEN: usize = 50;

/// The renderer lists individual successes only when a category has at most
/// this many.
pub const SUCCESS_LIST_LIMIT: usize = 10;

/// Most failing model ids shown per error group; the true count is kept.
pub const ERROR_EXAMPLE_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// ErrorGroup / CategorySummary / RunReport
// ---------------------------------------------------------------------------

/// Failures sharing an error-message prefix, with every offending model id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorGroup {
    pub prefix: String,
    pub model_ids: Vec<String>,
}

impl ErrorGroup {
    pub fn count(&self) -> usize {
        self.model_ids.len()
    }
}

/// Aggregate view over one category's results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: ModelCategory,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Every successful model id, in probe order.
    pub successful_models: Vec<String>,
    /// Failures grouped by error prefix, in first-seen order.
    pub error_groups: Vec<ErrorGroup>,
    /// Distinct top-level key sets observed among structured successes.
    pub output_fingerprints: BTreeSet<BTreeSet<String>>,
}

impl CategorySummary {
    fn new(category: ModelCategory) -> Self {
        Self {
            category,
            total: 0,
            succeeded: 0,
            failed: 0,
            skipped: 0,
            successful_models: Vec::new(),
            error_groups: Vec::new(),
            output_fingerprints: BTreeSet::new(),
        }
    }

    /// Successes over attempted (non-skipped) probes, 0.0 when none attempted.
    pub fn success_rate(&self) -> f64 {
        let attempted = self.succeeded + self.failed;
        if attempted == 0 {
            0.0
        } else {
            self.succeeded as f64 / attempted as f64
        }
    }
}

/// Aggregate view over a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total_neurons: u64,
    /// Per-category summaries in first-seen order.
    pub categories: Vec<CategorySummary>,
}

impl RunReport {
    /// Build the aggregate view. Counts and rates are independent of result
    /// order; only the listing order inside summaries follows it.
    pub fn summarize(results: &[ProbeResult]) -> Self {
        let mut report = Self {
            total: results.len(),
            succeeded: 0,
            failed: 0,
            skipped: 0,
            total_neurons: 0,
            categories: Vec::new(),
        };

        for result in results {
            let summary = report.category_mut(result.category);
            summary.total += 1;

            match result.status {
                ProbeStatus::Success => {
                    summary.succeeded += 1;
                    summary.successful_models.push(result.model_id.clone());
                    if let OutputShape::Structured(fields) = &result.output_shape {
                        summary.output_fingerprints.insert(fields.clone());
                    }
                }
                ProbeStatus::Failed => {
                    summary.failed += 1;
                    let prefix = char_prefix(
                        result.error.as_deref().unwrap_or("Unknown"),
                        ERROR_GROUP_PREFIX_LEN,
                    );
                    match summary.error_groups.iter_mut().find(|g| g.prefix == prefix) {
                        Some(group) => group.model_ids.push(result.model_id.clone()),
                        None => summary.error_groups.push(ErrorGroup {
                            prefix,
                            model_ids: vec![result.model_id.clone()],
                        }),
                    }
                }
                ProbeStatus::Skipped => summary.skipped += 1,
            }
        }

        report.succeeded = report.categories.iter().map(|c| c.succeeded).sum();
        report.failed = report.categories.iter().map(|c| c.failed).sum();
        report.skipped = report.categories.iter().map(|c| c.skipped).sum();
        report.total_neurons = results.iter().filter_map(|r| r.neurons_used).sum();
        report
    }

    fn category_mut(&mut self, category: ModelCategory) -> &mut CategorySummary {
        let idx = match self.categories.iter().position(|c| c.category == category) {
            Some(idx) => idx,
            None => {
                self.categories.push(CategorySummary::new(category));
                self.categories.len() - 1
            }
        };
        &mut self.categories[idx]
    }

    /// Probes that actually went on the wire.
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Successes over attempted probes, 0.0 when nothing was attempted.
    pub fn success_rate(&self) -> f64 {
        if self.attempted() == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.attempted() as f64
        }
    }

    /// Whether the run clears an exit threshold given as a percentage.
    pub fn meets_threshold(&self, threshold_percent: f64) -> bool {
        self.success_rate() * 100.0 >= threshold_percent
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the report as plain text. Presentation only; caps applied here
/// never drop data from the report itself.
pub fn render(report: &RunReport) -> String {
    let mut out = String::new();
    let bar = "=".repeat(80);
    let line = "-".repeat(80);

    let _ = writeln!(out, "{bar}");
    let _ = writeln!(out, "MODEL PROBE REPORT");
    let _ = writeln!(out, "{bar}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Total probes: {}", report.total);
    let _ = writeln!(
        out,
        "Successful: {} ({:.1}%)",
        report.succeeded,
        report.success_rate() * 100.0
    );
    let _ = writeln!(out, "Failed: {}", report.failed);
    if report.skipped > 0 {
        let _ = writeln!(out, "Skipped: {} (no usable fixture)", report.skipped);
    }
    if report.total_neurons > 0 {
        let _ = writeln!(out, "Total neurons used: {}", report.total_neurons);
    }

    for summary in &report.categories {
        let _ = writeln!(out);
        let _ = writeln!(out, "{line}");
        let _ = writeln!(out, "{}", summary.category.as_str().to_uppercase());
        let _ = writeln!(out, "{line}");
        let _ = writeln!(
            out,
            "Success rate: {}/{} ({:.0}%)",
            summary.succeeded,
            summary.succeeded + summary.failed,
            summary.success_rate() * 100.0
        );
        if summary.skipped > 0 {
            let _ = writeln!(out, "Skipped: {}", summary.skipped);
        }

        if !summary.successful_models.is_empty()
            && summary.successful_models.len() <= SUCCESS_LIST_LIMIT
        {
            let _ = writeln!(out);
            let _ = writeln!(out, "✅ Successful models:");
            for model_id in &summary.successful_models {
                let _ = writeln!(out, "  • {}", short_name(model_id));
            }
        }

        if !summary.error_groups.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "❌ Failed models ({}):", summary.failed);
            for group in &summary.error_groups {
                let _ = writeln!(out);
                let _ = writeln!(out, "  Error: {}", group.prefix);
                for model_id in group.model_ids.iter().take(ERROR_EXAMPLE_LIMIT) {
                    let _ = writeln!(out, "    • {}", short_name(model_id));
                }
                if group.count() > ERROR_EXAMPLE_LIMIT {
                    let _ = writeln!(out, "    ... and {} more", group.count() - ERROR_EXAMPLE_LIMIT);
                }
            }
        }

        if !summary.output_fingerprints.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "📊 Output formats:");
            for fingerprint in &summary.output_fingerprints {
                let fields: Vec<&str> = fingerprint.iter().map(String::as_str).collect();
                let _ = writeln!(out, "  [{}]", fields.join(", "));
            }
        }
    }

    out
}

fn short_name(model_id: &str) -> &str {
    model_id.rsplit('/').next().unwrap_or(model_id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProbeTarget;

    fn success(model_id: &str, category: ModelCategory, fields: &[&str], neurons: Option<u64>) -> ProbeResult {
        ProbeResult {
            model_id: model_id.to_string(),
            category,
            status: ProbeStatus::Success,
            input_fields: vec!["prompt".into()],
            output_shape: OutputShape::Structured(
                fields.iter().map(|s| s.to_string()).collect(),
            ),
            error: None,
            neurons_used: neurons,
            response_sample: None,
        }
    }

    fn failure(model_id: &str, category: ModelCategory, error: &str) -> ProbeResult {
        let target = ProbeTarget::new(model_id, category);
        ProbeResult::failed(&target, vec!["prompt".into()], error.to_string())
    }

    fn skipped(model_id: &str, category: ModelCategory) -> ProbeResult {
        let target = ProbeTarget::new(model_id, category);
        ProbeResult::skipped(&target)
    }

    #[test]
    fn test_empty_results_yield_zero_rates() {
        let report = RunReport::summarize(&[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.success_rate(), 0.0);
        assert!(!report.meets_threshold(50.0));
        assert!(report.categories.is_empty());
    }

    #[test]
    fn test_overall_counts() {
        let results = vec![
            success("@cf/a/one", ModelCategory::TextGeneration, &["response"], Some(10)),
            failure("@cf/a/two", ModelCategory::TextGeneration, "boom"),
            skipped("@cf/b/three", ModelCategory::ObjectDetection),
            success("@cf/c/four", ModelCategory::TextEmbeddings, &["data", "shape"], Some(5)),
        ];
        let report = RunReport::summarize(&results);

        assert_eq!(report.total, 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.total_neurons, 15);
    }

    #[test]
    fn test_counts_are_order_independent() {
        let results = vec![
            success("@cf/a/one", ModelCategory::TextGeneration, &["response"], Some(3)),
            failure("@cf/a/two", ModelCategory::TextGeneration, "boom"),
            failure("@cf/a/three", ModelCategory::TextGeneration, "boom"),
            success("@cf/c/four", ModelCategory::TextEmbeddings, &["data"], None),
            skipped("@cf/b/five", ModelCategory::ImageToText),
        ];
        let forward = RunReport::summarize(&results);

        let mut reversed = results.clone();
        reversed.reverse();
        let backward = RunReport::summarize(&reversed);

        assert_eq!(forward.total, backward.total);
        assert_eq!(forward.succeeded, backward.succeeded);
        assert_eq!(forward.failed, backward.failed);
        assert_eq!(forward.skipped, backward.skipped);
        assert_eq!(forward.success_rate(), backward.success_rate());
        for cat in [ModelCategory::TextGeneration, ModelCategory::TextEmbeddings] {
            let f = forward.categories.iter().find(|c| c.category == cat).unwrap();
            let b = backward.categories.iter().find(|c| c.category == cat).unwrap();
            assert_eq!(f.success_rate(), b.success_rate());
            assert_eq!(f.output_fingerprints, b.output_fingerprints);
        }
    }

    #[test]
    fn test_error_grouping_by_prefix() {
        let long_error = format!("{}{}", "x".repeat(ERROR_GROUP_PREFIX_LEN), "tail-a");
        let same_prefix = format!("{}{}", "x".repeat(ERROR_GROUP_PREFIX_LEN), "tail-b");
        let results = vec![
            failure("@cf/a/one", ModelCategory::TextGeneration, &long_error),
            failure("@cf/a/two", ModelCategory::TextGeneration, &same_prefix),
            failure("@cf/a/three", ModelCategory::TextGeneration, "different"),
        ];
        let report = RunReport::summarize(&results);
        let summary = &report.categories[0];

        assert_eq!(summary.error_groups.len(), 2);
        assert_eq!(summary.error_groups[0].count(), 2);
        assert_eq!(
            summary.error_groups[0].prefix,
            "x".repeat(ERROR_GROUP_PREFIX_LEN)
        );
        assert_eq!(summary.error_groups[1].model_ids, vec!["@cf/a/three".to_string()]);
    }

    #[test]
    fn test_error_group_retains_all_ids_beyond_display_cap() {
        let results: Vec<ProbeResult> = (0..8)
            .map(|i| {
                failure(
                    &format!("@cf/a/model-{i}"),
                    ModelCategory::TextGeneration,
                    "capacity exceeded",
                )
            })
            .collect();
        let report = RunReport::summarize(&results);
        let group = &report.categories[0].error_groups[0];

        assert_eq!(group.count(), 8);
        let text = render(&report);
        assert!(text.contains("... and 3 more"));
    }

    #[test]
    fn test_distinct_fingerprints_deduplicate() {
        let results = vec![
            success("@cf/a/one", ModelCategory::TextGeneration, &["response"], None),
            success("@cf/a/two", ModelCategory::TextGeneration, &["response"], None),
            success("@cf/a/three", ModelCategory::TextGeneration, &["response", "usage"], None),
        ];
        let report = RunReport::summarize(&results);
        assert_eq!(report.categories[0].output_fingerprints.len(), 2);
    }

    #[test]
    fn test_raw_successes_produce_no_fingerprint() {
        let raw = ProbeResult {
            model_id: "@cf/a/img".into(),
            category: ModelCategory::TextToImage,
            status: ProbeStatus::Success,
            input_fields: vec!["prompt".into()],
            output_shape: OutputShape::RawText,
            error: None,
            neurons_used: None,
            response_sample: Some("iVBOR".into()),
        };
        let report = RunReport::summarize(&[raw]);
        assert!(report.categories[0].output_fingerprints.is_empty());
        assert_eq!(report.succeeded, 1);
    }

    #[test]
    fn test_skips_do_not_count_against_rate() {
        let results = vec![
            success("@cf/a/one", ModelCategory::TextGeneration, &["response"], None),
            skipped("@cf/b/two", ModelCategory::ImageToText),
            skipped("@cf/b/three", ModelCategory::ImageToText),
        ];
        let report = RunReport::summarize(&results);
        assert_eq!(report.success_rate(), 1.0);
        assert!(report.meets_threshold(100.0));

        let skipped_only = report
            .categories
            .iter()
            .find(|c| c.category == ModelCategory::ImageToText)
            .unwrap();
        assert_eq!(skipped_only.success_rate(), 0.0);
        assert_eq!(skipped_only.skipped, 2);
    }

    #[test]
    fn test_render_lists_successes_only_under_limit() {
        let few: Vec<ProbeResult> = (0..3)
            .map(|i| success(&format!("@cf/a/m{i}"), ModelCategory::TextGeneration, &["response"], None))
            .collect();
        let text = render(&RunReport::summarize(&few));
        assert!(text.contains("Successful models:"));
        assert!(text.contains("• m1"));

        let many: Vec<ProbeResult> = (0..SUCCESS_LIST_LIMIT + 1)
            .map(|i| success(&format!("@cf/a/m{i}"), ModelCategory::TextGeneration, &["response"], None))
            .collect();
        let text = render(&RunReport::summarize(&many));
        assert!(!text.contains("Successful models:"));
        assert!(text.contains("Success rate: 11/11"));
    }

    #[test]
    fn test_render_overall_header() {
        let results = vec![
            success("@cf/a/one", ModelCategory::TextGeneration, &["response"], Some(12)),
            failure("@cf/a/two", ModelCategory::TextGeneration, "boom"),
        ];
        let text = render(&RunReport::summarize(&results));
        assert!(text.contains("MODEL PROBE REPORT"));
        assert!(text.contains("Total probes: 2"));
        assert!(text.contains("Successful: 1 (50.0%)"));
        assert!(text.contains("Total neurons used: 12"));
        assert!(text.contains("TEXT-GENERATION"));
        assert!(text.contains("[response]"));
    }
}
