//! Report orchestration for the sales_dashboard crate.

use std::path::PathBuf;

use log::info;

use crate::config::ReportConfig;
use crate::data::SalesTable;
use crate::error::Result;
use crate::static_charts;

/// Message printed once every artifact has been written.
pub const COMPLETION_MESSAGE: &str =
    "Dashboard created successfully! Check the visualizations folder.";

/// Files produced by a finished run, in the order they were written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportOutput {
    pub artifacts: Vec<PathBuf>,
}

/// Runs the load → static charts → interactive charts pipeline.
#[derive(Clone, Debug, Default)]
pub struct ReportBuilder {
    config: ReportConfig,
}

impl ReportBuilder {
    /// Creates a builder using the fixed report defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration used by the run.
    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the configured input file and renders every artifact.
    ///
    /// The first failure aborts the run. Artifacts written before the failure
    /// stay on disk.
    pub fn run(&self) -> Result<ReportOutput> {
        let table = SalesTable::load(self.config.input_path())?;
        info!(
            "loaded {} records from {}",
            table.len(),
            self.config.input_path().display()
        );
        self.render(&table)
    }

    /// Renders every artifact from an already loaded table.
    pub fn render(&self, table: &SalesTable) -> Result<ReportOutput> {
        let mut artifacts = static_charts::write_static_charts(table, &self.config)?;
        artifacts.extend(render_interactive(table, &self.config)?);
        Ok(ReportOutput { artifacts })
    }
}

#[cfg(feature = "interactive")]
fn render_interactive(table: &SalesTable, config: &ReportConfig) -> Result<Vec<PathBuf>> {
    crate::interactive::write_interactive_charts(table, config)
}

/// Stub used when the `interactive` feature is disabled.
#[cfg(not(feature = "interactive"))]
fn render_interactive(_table: &SalesTable, _config: &ReportConfig) -> Result<Vec<PathBuf>> {
    Err(crate::error::ReportError::Unsupported(
        "enable the `interactive` feature to render the HTML charts".to_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use std::fs;

    #[test]
    fn missing_date_column_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sales.csv");
        fs::write(
            &input,
            "Product,Region,Customer_ID,Quantity,Price,Total_Sales\nWidget,North,C1,1,1,1\n",
        )
        .unwrap();
        let output = dir.path().join("out");
        fs::create_dir(&output).unwrap();

        let err = ReportBuilder::new()
            .with_config(
                ReportConfig::default()
                    .with_input_path(&input)
                    .with_output_dir(&output),
            )
            .run()
            .unwrap_err();

        assert!(matches!(err, ReportError::MissingColumn(ref c) if c == "Date"));
        assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
    }

    #[test]
    fn missing_input_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReportBuilder::new()
            .with_config(
                ReportConfig::default()
                    .with_input_path(dir.path().join("absent.csv"))
                    .with_output_dir(dir.path()),
            )
            .run()
            .unwrap_err();
        assert!(matches!(err, ReportError::Read { .. }));
    }

    #[cfg(not(feature = "interactive"))]
    #[test]
    fn interactive_charts_need_the_feature() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::default().with_output_dir(dir.path());
        let err = render_interactive(&crate::data::tests::sample_table(), &config).unwrap_err();

        assert!(matches!(err, ReportError::Unsupported(_)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
