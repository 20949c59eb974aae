use crate::analysis::ClusterAnalysis;
use crate::error::{ReportError, Result};
use crate::format::OutputFormat;
use pendscope_core::EvaluationResult;
use std::io::Write;
use tracing::debug;

const NO_PENDING_PODS: &str = "No pending pods found in the specified scope.";

/// Renders a pass's results to a writer in one output format
pub struct Reporter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> Reporter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Give back the writer (e.g. a buffer under test)
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write the report for `results`.
    ///
    /// An empty result set prints a single notice in every format.
    pub fn generate(
        &mut self,
        results: &[EvaluationResult],
        cluster_name: &str,
        total_nodes: usize,
    ) -> Result<()> {
        if results.is_empty() {
            writeln!(self.writer, "{}", NO_PENDING_PODS)?;
            return Ok(());
        }

        debug!(format = self.format.as_str(), results = results.len(), "Rendering report");

        match self.format {
            OutputFormat::Human => self.write_human(results),
            OutputFormat::Json => {
                let analysis = ClusterAnalysis::build(results, cluster_name, total_nodes);
                let json = pendscope_core::to_json_pretty(&analysis)
                    .map_err(|e| ReportError::serialization(e.to_string()))?;
                writeln!(self.writer, "{}", json)?;
                Ok(())
            }
            OutputFormat::Yaml => {
                let analysis = ClusterAnalysis::build(results, cluster_name, total_nodes);
                let yaml = pendscope_core::to_yaml(&analysis)
                    .map_err(|e| ReportError::serialization(e.to_string()))?;
                self.writer.write_all(yaml.as_bytes())?;
                Ok(())
            }
        }
    }

    fn write_human(&mut self, results: &[EvaluationResult]) -> Result<()> {
        writeln!(
            self.writer,
            "Found {} pending pod(s) for analysis:\n",
            results.len()
        )?;

        for result in results {
            if result.schedulable {
                writeln!(self.writer, "[✓] Pod: {} - Schedulable", result.pod.name)?;
            } else {
                writeln!(self.writer, "[✗] Pod: {}", result.pod.name)?;
                writeln!(self.writer, "→ Reason: {}", result.reason())?;
                writeln!(self.writer, "→ Suggested: {}", result.suggestion())?;
            }
            writeln!(self.writer)?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{failing, passing};

    fn render(format: OutputFormat, results: &[EvaluationResult]) -> String {
        let mut reporter = Reporter::new(Vec::new(), format);
        reporter.generate(results, "test-cluster", 2).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_empty_results_in_every_format() {
        for format in OutputFormat::ALL {
            assert_eq!(
                render(format, &[]),
                "No pending pods found in the specified scope.\n"
            );
        }
    }

    #[test]
    fn test_human_report() {
        let output = render(OutputFormat::Human, &[passing("web"), failing("batch")]);

        let expected = "Found 2 pending pod(s) for analysis:\n\n\
            [✓] Pod: web - Schedulable\n\n\
            [✗] Pod: batch\n\
            → Reason: requests.cpu = 3 exceeds all node allocatable.cpu (max: 2)\n\
            → Suggested: Lower requests.cpu to <= 2 or add higher-CPU node\n\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_json_report() {
        let output = render(OutputFormat::Json, &[passing("web"), failing("batch")]);
        let analysis: ClusterAnalysis = serde_json::from_str(&output).unwrap();

        assert_eq!(analysis.cluster_name, "test-cluster");
        assert_eq!(analysis.total_nodes, 2);
        assert_eq!(analysis.total_pending_pods, 2);
        assert_eq!(analysis.unschedulable_pods.len(), 1);
        assert_eq!(
            analysis.unschedulable_pods[0].reason(),
            "requests.cpu = 3 exceeds all node allocatable.cpu (max: 2)"
        );
        assert!(output.contains("\n  \"clusterName\": \"test-cluster\""));
    }

    #[test]
    fn test_yaml_report() {
        let output = render(OutputFormat::Yaml, &[failing("batch")]);
        let analysis: ClusterAnalysis = serde_yaml::from_str(&output).unwrap();

        assert_eq!(analysis.total_pending_pods, 1);
        assert_eq!(
            analysis.summary,
            "Found 1 pending pods, 1 unschedulable due to resource constraints"
        );
        assert!(output.contains("clusterName: test-cluster"));
    }
}
