//! Names of the files a report run produces.

use std::fs;
use std::path::Path;

use crate::error::{ReportError, Result};

/// Every file written by a full report run, in generation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Artifact {
    BoxPlot,
    ViolinPlot,
    Heatmap,
    MultiPlot,
    InteractiveScatter,
    InteractiveLine,
    Dashboard,
}

impl Artifact {
    pub const STATIC: [Artifact; 4] = [
        Artifact::BoxPlot,
        Artifact::ViolinPlot,
        Artifact::Heatmap,
        Artifact::MultiPlot,
    ];

    pub const INTERACTIVE: [Artifact; 3] = [
        Artifact::InteractiveScatter,
        Artifact::InteractiveLine,
        Artifact::Dashboard,
    ];

    /// File name inside the output directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::BoxPlot => "boxplot.png",
            Artifact::ViolinPlot => "violinplot.png",
            Artifact::Heatmap => "heatmap.png",
            Artifact::MultiPlot => "multi_plot.png",
            Artifact::InteractiveScatter => "interactive_scatter.html",
            Artifact::InteractiveLine => "interactive_line.html",
            Artifact::Dashboard => "dashboard.html",
        }
    }
}

/// Writes `bytes` to `path`, creating or truncating the file.
///
/// Parent directories are never created; a missing output directory is an error.
pub(crate) fn write_artifact(path: &Path, bytes: impl AsRef<[u8]>) -> Result<()> {
    fs::write(path, bytes).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_distinct() {
        let mut names: Vec<_> = Artifact::STATIC
            .iter()
            .chain(Artifact::INTERACTIVE.iter())
            .map(|a| a.file_name())
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn writing_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("boxplot.png");
        let err = write_artifact(&path, b"png").unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
        assert!(!dir.path().join("missing").exists());
    }
}
