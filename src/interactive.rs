//! Interactive HTML charts built with `plotly`.
//!
//! Figures are assembled as [`Plot`] values first and serialized to HTML in a
//! separate step, so their traces and layout can be inspected (for example via
//! [`Plot::to_json`]) before anything touches the filesystem.

use std::path::PathBuf;

use log::info;
use plotly::color::Color;
use plotly::common::{Anchor, Font, Marker, Mode, Title};
use plotly::layout::{Annotation, Axis, GridPattern, Layout, LayoutGrid, Legend};
use plotly::{Bar, Plot, Scatter};
use serde::Serialize;

use crate::artifact::{write_artifact, Artifact};
use crate::config::ReportConfig;
use crate::data::SalesTable;
use crate::error::Result;
use crate::model::{self, CategoryField, CategoryOrder, TimePoint};

const SCATTER_HOVER_TEMPLATE: &str =
    "Price=%{x}<br>Total_Sales=%{y}<br>%{text}<extra>%{fullData.name}</extra>";

/// Titles of the four dashboard panels, row by row.
pub const DASHBOARD_PANEL_TITLES: [&str; 4] = [
    "Price vs Sales",
    "Sales Trend",
    "Product Sales",
    "Region Customers",
];

/// Horizontal domains of the left and right dashboard columns.
const COLUMN_DOMAINS: [[f64; 2]; 2] = [[0.0, 0.45], [0.55, 1.0]];
/// Vertical domains of the top and bottom dashboard rows.
const ROW_DOMAINS: [[f64; 2]; 2] = [[0.575, 1.0], [0.0, 0.425]];

/// A marker colour given as a number, mapped through the trace colour scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(transparent)]
struct ScaleValue(f64);

impl Color for ScaleValue {}

/// Paper-space `(x, y)` domains of a dashboard panel, panels row by row.
fn panel_domain(panel: usize) -> ([f64; 2], [f64; 2]) {
    (COLUMN_DOMAINS[panel % 2], ROW_DOMAINS[panel / 2])
}

fn panel_axes(panel: usize) -> (Axis, Axis) {
    let (x_domain, y_domain) = panel_domain(panel);
    (Axis::new().domain(&x_domain), Axis::new().domain(&y_domain))
}

fn date_axis(points: &[TimePoint]) -> Vec<String> {
    points
        .iter()
        .map(|p| p.date.format("%Y-%m-%d").to_string())
        .collect()
}

fn titled_axis(title: &str) -> Axis {
    Axis::new().title(Title::new(title))
}

/// Price versus Total_Sales, one marker trace per Region, Product and
/// Customer_ID in the hover label.
pub fn price_scatter(table: &SalesTable) -> Plot {
    let points = model::price_scatter(table, CategoryField::Region);
    let mut plot = Plot::new();

    for region in model::categories(table, CategoryField::Region, CategoryOrder::FirstSeen) {
        let group: Vec<_> = points.iter().filter(|p| p.group == region).collect();
        let hover: Vec<String> = group
            .iter()
            .map(|p| format!("Product={}<br>Customer_ID={}", p.product, p.customer_id))
            .collect();
        let trace = Scatter::new(
            group.iter().map(|p| p.x).collect(),
            group.iter().map(|p| p.y).collect(),
        )
        .mode(Mode::Markers)
        .name(&region)
        .text_array(hover)
        .hover_template(SCATTER_HOVER_TEMPLATE);
        plot.add_trace(trace);
    }

    plot.set_layout(
        Layout::new()
            .title(Title::new("Interactive Price vs Total Sales"))
            .x_axis(titled_axis("Price"))
            .y_axis(titled_axis("Total_Sales"))
            .legend(Legend::new().title(Title::new("Region"))),
    );
    plot
}

/// Total_Sales over Date, one line per Region.
pub fn sales_trend(table: &SalesTable) -> Plot {
    let mut plot = Plot::new();
    for (region, points) in model::sales_over_time_by(table, CategoryField::Region) {
        let trace = Scatter::new(date_axis(&points), points.iter().map(|p| p.value).collect())
            .mode(Mode::Lines)
            .name(&region);
        plot.add_trace(trace);
    }

    plot.set_layout(
        Layout::new()
            .title(Title::new("Sales Trend by Region"))
            .x_axis(titled_axis("Date"))
            .y_axis(titled_axis("Total_Sales"))
            .legend(Legend::new().title(Title::new("Region"))),
    );
    plot
}

/// The 2x2 dashboard.
///
/// The scatter panel colours markers by the integer code of each record's
/// Region rather than by named category traces. Panel titles are paper-space
/// annotations centred above each panel.
pub fn dashboard(table: &SalesTable, config: &ReportConfig) -> Plot {
    let mut plot = Plot::new();

    let points = model::price_scatter(table, CategoryField::Region);
    let codes: Vec<ScaleValue> = model::category_codes(table, CategoryField::Region)
        .into_iter()
        .map(|code| ScaleValue(code as f64))
        .collect();
    plot.add_trace(
        Scatter::new(
            points.iter().map(|p| p.x).collect(),
            points.iter().map(|p| p.y).collect(),
        )
        .mode(Mode::Markers)
        .marker(Marker::new().color_array(codes))
        .name("Price vs Sales")
        .x_axis("x")
        .y_axis("y"),
    );

    let timeline = model::sales_over_time(table);
    plot.add_trace(
        Scatter::new(
            date_axis(&timeline),
            timeline.iter().map(|p| p.value).collect(),
        )
        .mode(Mode::Lines)
        .name("Sales Trend")
        .x_axis("x2")
        .y_axis("y2"),
    );

    let product_sales =
        model::sum_by(table, CategoryField::Product, CategoryOrder::Lexicographic);
    plot.add_trace(
        Bar::new(
            product_sales.iter().map(|t| t.label.clone()).collect(),
            product_sales.iter().map(|t| t.value).collect(),
        )
        .name("Product Sales")
        .x_axis("x3")
        .y_axis("y3"),
    );

    let region_counts = model::count_by(
        table,
        CategoryField::Region,
        CategoryOrder::CountDescending,
    );
    plot.add_trace(
        Bar::new(
            region_counts.iter().map(|t| t.label.clone()).collect(),
            region_counts.iter().map(|t| t.value as u64).collect(),
        )
        .name("Region Customers")
        .x_axis("x4")
        .y_axis("y4"),
    );

    let size = config.dashboard_size();
    let panel_titles = DASHBOARD_PANEL_TITLES
        .iter()
        .enumerate()
        .map(|(panel, title)| {
            let ([left, right], [_, top]) = panel_domain(panel);
            Annotation::new()
                .text(*title)
                .x((left + right) / 2.0)
                .y(top)
                .x_ref("paper")
                .y_ref("paper")
                .x_anchor(Anchor::Center)
                .y_anchor(Anchor::Bottom)
                .show_arrow(false)
                .font(Font::new().size(16))
        })
        .collect();
    let (x1, y1) = panel_axes(0);
    let (x2, y2) = panel_axes(1);
    let (x3, y3) = panel_axes(2);
    let (x4, y4) = panel_axes(3);

    plot.set_layout(
        Layout::new()
            .title(Title::new(config.dashboard_title()))
            .width(size.width as usize)
            .height(size.height as usize)
            .grid(
                LayoutGrid::new()
                    .rows(2)
                    .columns(2)
                    .pattern(GridPattern::Independent),
            )
            .x_axis(x1)
            .y_axis(y1)
            .x_axis2(x2)
            .y_axis2(y2)
            .x_axis3(x3)
            .y_axis3(y3)
            .x_axis4(x4)
            .y_axis4(y4)
            .annotations(panel_titles),
    );
    plot
}

fn to_html(plot: &mut Plot) -> String {
    #[cfg(feature = "embed-js")]
    plot.use_local_plotly();
    plot.to_html()
}

/// Builds the interactive charts in order and writes them as HTML.
pub fn write_interactive_charts(table: &SalesTable, config: &ReportConfig) -> Result<Vec<PathBuf>> {
    let figures = [
        (Artifact::InteractiveScatter, price_scatter(table)),
        (Artifact::InteractiveLine, sales_trend(table)),
        (Artifact::Dashboard, dashboard(table, config)),
    ];

    let mut written = Vec::with_capacity(figures.len());
    for (artifact, mut plot) in figures {
        let html = to_html(&mut plot);
        let path = config.artifact_path(artifact);
        write_artifact(&path, html.as_bytes())?;
        info!("wrote {} ({} bytes)", path.display(), html.len());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::sample_table;
    use serde_json::Value;

    fn json(plot: &Plot) -> Value {
        serde_json::from_str(&plot.to_json()).expect("plot serializes to json")
    }

    fn numbers(value: &Value) -> Vec<f64> {
        value
            .as_array()
            .expect("array")
            .iter()
            .map(|v| v.as_f64().expect("number"))
            .collect()
    }

    #[test]
    fn scatter_has_one_trace_per_region() {
        let figure = json(&price_scatter(&sample_table()));
        let traces = figure["data"].as_array().unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0]["name"], "North");
        assert_eq!(traces[1]["name"], "South");
        assert_eq!(traces[0]["text"][0], "Product=Widget<br>Customer_ID=C1");
    }

    #[test]
    fn line_chart_splits_by_region() {
        let figure = json(&sales_trend(&sample_table()));
        let traces = figure["data"].as_array().unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0]["x"][0], "2024-01-01");
        assert_eq!(numbers(&traces[0]["y"]), [50.0, 40.0]);
    }

    #[test]
    fn dashboard_layout_and_aggregates() {
        let table = sample_table();
        let figure = json(&dashboard(&table, &ReportConfig::default()));

        assert_eq!(figure["layout"]["width"], 1000);
        assert_eq!(figure["layout"]["height"], 800);
        assert_eq!(
            figure["layout"]["title"]["text"],
            "Interactive Sales Dashboard"
        );

        let traces = figure["data"].as_array().unwrap();
        assert_eq!(traces.len(), 4);

        // Region codes follow sorted labels: North = 0, South = 1.
        assert_eq!(numbers(&traces[0]["marker"]["color"]), [0.0, 1.0, 0.0, 1.0]);

        assert_eq!(traces[2]["x"][0], "Gadget");
        let product_totals = numbers(&traces[2]["y"]);
        assert_eq!(product_totals, [60.0, 75.0]);
        assert_eq!(product_totals.iter().sum::<f64>(), table.grand_total());

        assert_eq!(numbers(&traces[3]["y"]), [2.0, 2.0]);
    }

    #[test]
    fn dashboard_titles_sit_above_each_panel() {
        let figure = json(&dashboard(&sample_table(), &ReportConfig::default()));
        let layout = &figure["layout"];
        let annotations = layout["annotations"].as_array().expect("annotations");
        let titles: Vec<&str> = annotations
            .iter()
            .map(|a| a["text"].as_str().expect("title text"))
            .collect();
        assert_eq!(titles, DASHBOARD_PANEL_TITLES);

        let axis_keys = [
            ("xaxis", "yaxis"),
            ("xaxis2", "yaxis2"),
            ("xaxis3", "yaxis3"),
            ("xaxis4", "yaxis4"),
        ];
        for (annotation, (x_key, y_key)) in annotations.iter().zip(axis_keys) {
            assert_eq!(annotation["xref"], "paper");
            assert_eq!(annotation["yref"], "paper");
            assert_eq!(annotation["showarrow"], false);
            let x_domain = numbers(&layout[x_key]["domain"]);
            let y_domain = numbers(&layout[y_key]["domain"]);
            let x = annotation["x"].as_f64().unwrap();
            assert!((x - (x_domain[0] + x_domain[1]) / 2.0).abs() < 1e-9);
            assert_eq!(annotation["y"].as_f64().unwrap(), y_domain[1]);
            assert!(layout[x_key].get("title").is_none());
        }
    }

    #[cfg(feature = "embed-js")]
    #[test]
    fn embedded_html_inlines_plotly() {
        let table = sample_table();
        let linked = price_scatter(&table).to_html();
        let embedded = to_html(&mut price_scatter(&table));
        assert!(
            embedded.len() > linked.len() + 100_000,
            "plotly.js should be inlined into the page"
        );
    }

    #[cfg(not(feature = "embed-js"))]
    #[test]
    fn html_links_plotly_from_cdn_by_default() {
        let html = to_html(&mut price_scatter(&sample_table()));
        assert!(html.contains("cdn.plot.ly"));
        assert!(html.contains("Interactive Price vs Total Sales"));
    }
}
