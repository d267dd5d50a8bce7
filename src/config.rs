//! Report settings passed into every generation step.

use std::path::{Path, PathBuf};

/// Input file read when no other path is configured.
pub const DEFAULT_INPUT_PATH: &str = "sales_data1.csv";

/// Directory that receives every artifact. It must already exist.
pub const DEFAULT_OUTPUT_DIR: &str = "visualizations";

/// Pixel dimensions of a rendered figure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FigureSize {
    pub width: u32,
    pub height: u32,
}

impl FigureSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for FigureSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// Categorical colour palettes used by the static charts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Palette {
    /// Default categorical palette.
    #[default]
    Deep,
    /// Muted variant of the default palette.
    Muted,
    /// Qualitative pastel palette.
    Set2,
}

const DEEP: &[(u8, u8, u8)] = &[
    (76, 114, 176),
    (221, 132, 82),
    (85, 168, 104),
    (196, 78, 82),
    (129, 114, 179),
    (147, 120, 96),
    (218, 139, 195),
    (140, 140, 140),
    (204, 185, 116),
    (100, 181, 205),
];

const MUTED: &[(u8, u8, u8)] = &[
    (72, 120, 208),
    (238, 133, 74),
    (106, 204, 100),
    (214, 95, 95),
    (149, 108, 180),
    (140, 97, 60),
    (220, 126, 192),
    (121, 121, 121),
    (213, 187, 103),
    (130, 198, 226),
];

const SET2: &[(u8, u8, u8)] = &[
    (102, 194, 165),
    (252, 141, 98),
    (141, 160, 203),
    (231, 138, 195),
    (166, 216, 84),
    (255, 217, 47),
    (229, 196, 148),
    (179, 179, 179),
];

impl Palette {
    /// RGB colours of the palette in order.
    pub fn colors(self) -> &'static [(u8, u8, u8)] {
        match self {
            Palette::Deep => DEEP,
            Palette::Muted => MUTED,
            Palette::Set2 => SET2,
        }
    }

    /// Colour for the `index`-th category, cycling when the palette runs out.
    pub fn pick(self, index: usize) -> (u8, u8, u8) {
        let colors = self.colors();
        colors[index % colors.len()]
    }
}

/// Paths, figure sizes and palettes for one report run.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    input_path: PathBuf,
    output_dir: PathBuf,
    box_plot_size: FigureSize,
    violin_plot_size: FigureSize,
    heatmap_size: FigureSize,
    grid_size: FigureSize,
    box_palette: Palette,
    violin_palette: Palette,
    category_palette: Palette,
    dashboard_size: FigureSize,
    dashboard_title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            box_plot_size: FigureSize::new(800, 600),
            violin_plot_size: FigureSize::new(800, 600),
            heatmap_size: FigureSize::new(1000, 800),
            grid_size: FigureSize::new(1200, 1000),
            box_palette: Palette::Set2,
            violin_palette: Palette::Muted,
            category_palette: Palette::Deep,
            dashboard_size: FigureSize::new(1000, 800),
            dashboard_title: "Interactive Sales Dashboard".to_owned(),
        }
    }
}

impl ReportConfig {
    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn box_plot_size(&self) -> FigureSize {
        self.box_plot_size
    }

    pub fn violin_plot_size(&self) -> FigureSize {
        self.violin_plot_size
    }

    pub fn heatmap_size(&self) -> FigureSize {
        self.heatmap_size
    }

    pub fn grid_size(&self) -> FigureSize {
        self.grid_size
    }

    pub fn box_palette(&self) -> Palette {
        self.box_palette
    }

    pub fn violin_palette(&self) -> Palette {
        self.violin_palette
    }

    /// Palette for the bar, count and scatter panels of the grid.
    pub fn category_palette(&self) -> Palette {
        self.category_palette
    }

    pub fn dashboard_size(&self) -> FigureSize {
        self.dashboard_size
    }

    pub fn dashboard_title(&self) -> &str {
        &self.dashboard_title
    }

    /// Sets the CSV file to load and returns the updated configuration.
    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    /// Sets the artifact directory and returns the updated configuration.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_box_plot_size(mut self, size: impl Into<FigureSize>) -> Self {
        self.box_plot_size = size.into();
        self
    }

    pub fn with_violin_plot_size(mut self, size: impl Into<FigureSize>) -> Self {
        self.violin_plot_size = size.into();
        self
    }

    pub fn with_heatmap_size(mut self, size: impl Into<FigureSize>) -> Self {
        self.heatmap_size = size.into();
        self
    }

    pub fn with_grid_size(mut self, size: impl Into<FigureSize>) -> Self {
        self.grid_size = size.into();
        self
    }

    pub fn with_box_palette(mut self, palette: Palette) -> Self {
        self.box_palette = palette;
        self
    }

    pub fn with_violin_palette(mut self, palette: Palette) -> Self {
        self.violin_palette = palette;
        self
    }

    pub fn with_category_palette(mut self, palette: Palette) -> Self {
        self.category_palette = palette;
        self
    }

    pub fn with_dashboard_size(mut self, size: impl Into<FigureSize>) -> Self {
        self.dashboard_size = size.into();
        self
    }

    pub fn with_dashboard_title(mut self, title: impl Into<String>) -> Self {
        self.dashboard_title = title.into();
        self
    }

    /// Path of `artifact` inside the output directory.
    pub fn artifact_path(&self, artifact: crate::Artifact) -> PathBuf {
        self.output_dir.join(artifact.file_name())
    }
}
