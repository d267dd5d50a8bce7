//! PNG charts rendered with `plotters` and encoded with `image`.
//!
//! Every chart is drawn into an in-memory RGB buffer through the bitmap
//! backend and then encoded as PNG, so the same figure can be written to disk
//! or inspected directly by callers. Drawing goes through generic helpers that
//! accept any [`DrawingArea`], which lets the 2x2 grid reuse the single-chart
//! code for its panels.

use std::io::Cursor;
use std::ops::Range;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use log::info;
use plotters::coord::ranged1d::SegmentedCoord;
use plotters::coord::types::RangedCoordusize;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::artifact::{write_artifact, Artifact};
use crate::config::{FigureSize, Palette, ReportConfig};
use crate::data::SalesTable;
use crate::error::{ReportError, Result};
use crate::fonts::{self, FONT_FAMILY};
use crate::model::{
    self, BoxSummary, CategoryField, CategoryOrder, CategoryTotal, CorrelationMatrix,
    ScatterPoint, TimePoint, ViolinShape,
};

const TITLE_FONT_SIZE: i32 = 24;
const PANEL_TITLE_FONT_SIZE: i32 = 20;
const ANNOTATION_FONT_SIZE: i32 = 22;
/// Width of a box or bar relative to its category slot.
const SLOT_WIDTH: f64 = 0.8;
const NAN_CELL: RGBColor = RGBColor(200, 200, 200);

/// An encoded PNG figure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub size: FigureSize,
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

fn render_png<F>(size: FigureSize, draw: F) -> Result<RenderedImage>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
{
    fonts::ensure_registered()?;

    let mut buffer = vec![0u8; size.width as usize * size.height as usize * 3];
    {
        let root =
            BitMapBackend::with_buffer(&mut buffer, (size.width, size.height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    encode_png(buffer, size)
}

fn encode_png(buffer: Vec<u8>, size: FigureSize) -> Result<RenderedImage> {
    let image = RgbImage::from_raw(size.width, size.height, buffer).ok_or_else(|| {
        ReportError::Encode(format!(
            "pixel buffer does not match a {}x{} figure",
            size.width, size.height
        ))
    })?;
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut bytes, ImageOutputFormat::Png)
        .map_err(|err| ReportError::Encode(err.to_string()))?;
    Ok(RenderedImage {
        bytes: bytes.into_inner(),
        size,
    })
}

/// Value range with a little headroom; degenerate or empty input still
/// yields a drawable range.
fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return 0.0..1.0;
    }
    if min == max {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        return (min - pad)..(max + pad);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Extends the top of a value range so a legend fits above the data.
fn legend_headroom(range: Range<f64>) -> Range<f64> {
    let span = range.end - range.start;
    range.start..(range.end + span * 0.3)
}

/// Range starting at zero for bar heights.
fn bar_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let max = values.into_iter().fold(0.0, f64::max);
    if max <= 0.0 {
        0.0..1.0
    } else {
        0.0..max * 1.05
    }
}

/// One unit-wide slot per category, centred on the integer positions so the
/// default key points land on the category labels.
fn slot_axis(len: usize) -> Range<f64> {
    -0.5..(len.max(1) as f64 - 0.5)
}

fn slot_label(labels: &[String], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

fn day_key(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

/// Day-key range with one day of padding so the end dates stay off the frame.
fn day_range(keys: &[i32]) -> Range<i32> {
    match (keys.iter().min(), keys.iter().max()) {
        (Some(&lo), Some(&hi)) => (lo - 1)..(hi + 1),
        _ => 0..1,
    }
}

fn day_label(key: i32) -> String {
    NaiveDate::from_num_days_from_ce_opt(key)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Maps a correlation in `[-1, 1]` onto the coolwarm diverging scale, white-grey at zero.
pub fn coolwarm(value: f64) -> RGBColor {
    const STOPS: [(f64, (u8, u8, u8)); 5] = [
        (0.0, (59, 76, 192)),
        (0.25, (141, 176, 254)),
        (0.5, (221, 221, 221)),
        (0.75, (244, 154, 123)),
        (1.0, (180, 4, 38)),
    ];
    let t = ((value.clamp(-1.0, 1.0) + 1.0) / 2.0).clamp(0.0, 1.0);
    for pair in STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
            return RGBColor(mix(c0.0, c1.0), mix(c0.1, c1.1), mix(c0.2, c1.2));
        }
    }
    rgb(STOPS[4].1)
}

fn annotation_color(background: RGBColor) -> RGBColor {
    let RGBColor(r, g, b) = background;
    let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luminance < 128.0 {
        WHITE
    } else {
        BLACK
    }
}

fn draw_box_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    boxes: &[BoxSummary],
    palette: Palette,
) -> Result<()> {
    let labels: Vec<String> = boxes.iter().map(|b| b.label.clone()).collect();
    let y_range = padded_range(boxes.iter().flat_map(|b| {
        [b.lower_whisker, b.upper_whisker]
            .into_iter()
            .chain(b.outliers.iter().copied())
    }));

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT_FAMILY, TITLE_FONT_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            slot_axis(boxes.len()),
            y_range,
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(boxes.len().max(1))
        .x_label_formatter(&|x| slot_label(&labels, *x))
        .x_desc(x_desc)
        .y_desc("Total_Sales")
        .draw()?;

    let half = SLOT_WIDTH / 2.0;
    for (i, summary) in boxes.iter().enumerate() {
        let x = i as f64;
        let fill = rgb(palette.pick(i));
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - half, summary.q1), (x + half, summary.q3)],
            fill.filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - half, summary.q1), (x + half, summary.q3)],
            BLACK.stroke_width(1),
        )))?;
        let whisker_cap = half / 2.0;
        chart.draw_series([
            PathElement::new(
                vec![(x - half, summary.median), (x + half, summary.median)],
                BLACK.stroke_width(2),
            ),
            PathElement::new(
                vec![(x, summary.q3), (x, summary.upper_whisker)],
                BLACK.stroke_width(1),
            ),
            PathElement::new(
                vec![(x, summary.q1), (x, summary.lower_whisker)],
                BLACK.stroke_width(1),
            ),
            PathElement::new(
                vec![
                    (x - whisker_cap, summary.upper_whisker),
                    (x + whisker_cap, summary.upper_whisker),
                ],
                BLACK.stroke_width(1),
            ),
            PathElement::new(
                vec![
                    (x - whisker_cap, summary.lower_whisker),
                    (x + whisker_cap, summary.lower_whisker),
                ],
                BLACK.stroke_width(1),
            ),
        ])?;
        chart.draw_series(
            summary
                .outliers
                .iter()
                .map(|&y| Circle::new((x, y), 3, BLACK.stroke_width(1))),
        )?;
    }
    Ok(())
}

fn draw_violin_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    violins: &[ViolinShape],
    palette: Palette,
) -> Result<()> {
    let labels: Vec<String> = violins.iter().map(|v| v.label.clone()).collect();
    let y_range = padded_range(violins.iter().flat_map(|v| {
        let (lo, hi) = v.extent();
        [lo, hi]
    }));
    // Densities share one scale so wider violins mean denser data.
    let peak = violins
        .iter()
        .map(ViolinShape::peak_density)
        .fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT_FAMILY, TITLE_FONT_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            slot_axis(violins.len()),
            y_range,
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(violins.len().max(1))
        .x_label_formatter(&|x| slot_label(&labels, *x))
        .x_desc(x_desc)
        .y_desc("Total_Sales")
        .draw()?;

    let half = SLOT_WIDTH / 2.0;
    for (i, violin) in violins.iter().enumerate() {
        let x = i as f64;
        let fill = rgb(palette.pick(i));

        if violin.density.is_empty() || peak <= 0.0 {
            let y = violin.summary.median;
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(x - half, y), (x + half, y)],
                fill.stroke_width(3),
            )))?;
            continue;
        }

        let right = violin
            .support
            .iter()
            .zip(&violin.density)
            .map(|(&y, &d)| (x + half * d / peak, y));
        let left = violin
            .support
            .iter()
            .zip(&violin.density)
            .rev()
            .map(|(&y, &d)| (x - half * d / peak, y));
        let outline: Vec<(f64, f64)> = right.chain(left).collect();

        chart.draw_series(std::iter::once(Polygon::new(outline.clone(), fill.filled())))?;
        let mut closed = outline;
        if let Some(first) = closed.first().copied() {
            closed.push(first);
        }
        chart.draw_series(std::iter::once(PathElement::new(closed, BLACK.stroke_width(1))))?;

        let summary = &violin.summary;
        let inner = 0.03;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x, summary.lower_whisker), (x, summary.upper_whisker)],
            RGBColor(60, 60, 60).stroke_width(1),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - inner, summary.q1), (x + inner, summary.q3)],
            RGBColor(60, 60, 60).filled(),
        )))?;
        chart.draw_series(std::iter::once(Circle::new(
            (x, summary.median),
            3,
            WHITE.filled(),
        )))?;
    }
    Ok(())
}

/// Segmented axis with exactly `n` cells. Integer ranges are inclusive in
/// `plotters`, so `0..n - 1` yields cells `0..=n - 1`.
fn matrix_axis(n: usize) -> SegmentedCoord<RangedCoordusize> {
    (0..n.max(1) - 1).into_segmented()
}

fn draw_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    matrix: &CorrelationMatrix,
) -> Result<()> {
    let area = area.titled(title, (FONT_FAMILY, TITLE_FONT_SIZE))?;
    let (width, _) = area.dim_in_pixel();
    let (matrix_area, scale_area) = area.split_horizontally((width as f64 * 0.85) as i32);

    let n = matrix.size();
    let labels = matrix.labels();
    // Row 0 is drawn at the top, so rows map onto reversed y segments.
    let row_segment = |row: usize| n - 1 - row;

    let mut chart = ChartBuilder::on(&matrix_area)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(110)
        .build_cartesian_2d(matrix_axis(n), matrix_axis(n))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|y| match y {
            SegmentValue::CenterOf(i) if *i < n => labels[row_segment(*i)].clone(),
            _ => String::new(),
        })
        .draw()?;

    for row in 0..n {
        for column in 0..n {
            let value = matrix.get(row, column);
            let fill = if value.is_nan() { NAN_CELL } else { coolwarm(value) };
            let y = row_segment(row);
            chart.draw_series(std::iter::once(Rectangle::new(
                [
                    (SegmentValue::Exact(column), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(column + 1), SegmentValue::Exact(y + 1)),
                ],
                fill.filled(),
            )))?;

            let text = if value.is_nan() {
                "nan".to_owned()
            } else {
                format!("{:.2}", value)
            };
            let style = (FONT_FAMILY, ANNOTATION_FONT_SIZE)
                .into_font()
                .color(&annotation_color(fill))
                .pos(Pos::new(HPos::Center, VPos::Center));
            chart.draw_series(std::iter::once(Text::new(
                text,
                (SegmentValue::CenterOf(column), SegmentValue::CenterOf(y)),
                style,
            )))?;
        }
    }

    draw_color_scale(&scale_area)
}

fn draw_color_scale<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> Result<()> {
    const STEPS: usize = 100;

    let mut chart = ChartBuilder::on(area)
        .margin_top(40)
        .margin_bottom(70)
        .margin_right(30)
        .y_label_area_size(45)
        .build_cartesian_2d(0.0..1.0, -1.0..1.0)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .y_label_formatter(&|v| format!("{:.1}", v))
        .draw()?;

    let step = 2.0 / STEPS as f64;
    chart.draw_series((0..STEPS).map(|i| {
        let low = -1.0 + step * i as f64;
        Rectangle::new([(0.0, low), (1.0, low + step)], coolwarm(low + step / 2.0).filled())
    }))?;
    Ok(())
}

fn draw_bar_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[CategoryTotal],
    palette: Palette,
) -> Result<()> {
    let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT_FAMILY, PANEL_TITLE_FONT_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            slot_axis(bars.len()),
            bar_range(bars.iter().map(|b| b.value)),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len().max(1))
        .x_label_formatter(&|x| slot_label(&labels, *x))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    let half = SLOT_WIDTH / 2.0;
    chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
        let x = i as f64;
        Rectangle::new(
            [(x - half, 0.0), (x + half, bar.value)],
            rgb(palette.pick(i)).filled(),
        )
    }))?;
    Ok(())
}

fn draw_time_line<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    points: &[TimePoint],
    palette: Palette,
) -> Result<()> {
    let keys: Vec<i32> = points.iter().map(|p| day_key(p.date)).collect();
    let x_range = day_range(&keys);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT_FAMILY, PANEL_TITLE_FONT_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, padded_range(points.iter().map(|p| p.value)))?;

    chart
        .configure_mesh()
        .x_labels(4)
        .x_label_formatter(&|key| day_label(*key))
        .x_desc("Date")
        .y_desc("Total_Sales")
        .draw()?;

    chart.draw_series(LineSeries::new(
        keys.iter().zip(points).map(|(&key, p)| (key, p.value)),
        rgb(palette.pick(0)).stroke_width(2),
    ))?;
    Ok(())
}

fn draw_grouped_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    points: &[ScatterPoint],
    groups: &[String],
    palette: Palette,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT_FAMILY, PANEL_TITLE_FONT_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            padded_range(points.iter().map(|p| p.x)),
            legend_headroom(padded_range(points.iter().map(|p| p.y))),
        )?;

    chart
        .configure_mesh()
        .x_desc("Price")
        .y_desc("Total_Sales")
        .draw()?;

    for (i, group) in groups.iter().enumerate() {
        let color = rgb(palette.pick(i));
        chart
            .draw_series(
                points
                    .iter()
                    .filter(|p| &p.group == group)
                    .map(|p| Circle::new((p.x, p.y), 4, color.filled())),
            )?
            .label(group.as_str())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    if !groups.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }
    Ok(())
}

/// Box plot of `Total_Sales` per Product.
pub fn box_plot(table: &SalesTable, config: &ReportConfig) -> Result<RenderedImage> {
    let boxes = model::box_summaries(table, CategoryField::Product);
    render_png(config.box_plot_size(), |root| {
        draw_box_chart(
            root,
            "Total Sales Distribution by Product",
            CategoryField::Product.column_name(),
            &boxes,
            config.box_palette(),
        )
    })
}

/// Violin plot of `Total_Sales` per Region.
pub fn violin_plot(table: &SalesTable, config: &ReportConfig) -> Result<RenderedImage> {
    let violins = model::violin_shapes(table, CategoryField::Region);
    render_png(config.violin_plot_size(), |root| {
        draw_violin_chart(
            root,
            "Total Sales Distribution by Region",
            CategoryField::Region.column_name(),
            &violins,
            config.violin_palette(),
        )
    })
}

/// Annotated correlation heatmap of Quantity, Price and Total_Sales.
pub fn correlation_heatmap(table: &SalesTable, config: &ReportConfig) -> Result<RenderedImage> {
    let matrix = model::sales_correlation(table);
    render_png(config.heatmap_size(), |root| {
        draw_heatmap(root, "Correlation Heatmap", &matrix)
    })
}

/// 2x2 grid: product totals, sales over time, price scatter and region counts.
pub fn multi_plot(table: &SalesTable, config: &ReportConfig) -> Result<RenderedImage> {
    let product_sales = model::sum_by(table, CategoryField::Product, CategoryOrder::FirstSeen);
    let timeline = model::sales_over_time(table);
    let scatter = model::price_scatter(table, CategoryField::Region);
    let regions = model::categories(table, CategoryField::Region, CategoryOrder::FirstSeen);
    let region_counts = model::count_by(table, CategoryField::Region, CategoryOrder::FirstSeen);
    let palette = config.category_palette();

    render_png(config.grid_size(), |root| {
        let panels = root.split_evenly((2, 2));
        draw_bar_chart(
            &panels[0],
            "Total Sales by Product",
            "Product",
            "Total_Sales",
            &product_sales,
            palette,
        )?;
        draw_time_line(&panels[1], "Sales Trend Over Time", &timeline, palette)?;
        draw_grouped_scatter(
            &panels[2],
            "Price vs Total Sales by Region",
            &scatter,
            &regions,
            palette,
        )?;
        draw_bar_chart(
            &panels[3],
            "Customer Count by Region",
            "Region",
            "count",
            &region_counts,
            palette,
        )
    })
}

type StaticChart = fn(&SalesTable, &ReportConfig) -> Result<RenderedImage>;

/// Renders the static charts in order and writes them into the output directory.
pub fn write_static_charts(table: &SalesTable, config: &ReportConfig) -> Result<Vec<PathBuf>> {
    let charts: [(Artifact, StaticChart); 4] = [
        (Artifact::BoxPlot, box_plot),
        (Artifact::ViolinPlot, violin_plot),
        (Artifact::Heatmap, correlation_heatmap),
        (Artifact::MultiPlot, multi_plot),
    ];

    let mut written = Vec::with_capacity(charts.len());
    for (artifact, render) in charts {
        let image = render(table, config)?;
        let path = config.artifact_path(artifact);
        write_artifact(&path, &image.bytes)?;
        info!("wrote {} ({} bytes)", path.display(), image.bytes.len());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coolwarm_is_centred_on_zero() {
        assert_eq!(coolwarm(0.0), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(-1.0), RGBColor(59, 76, 192));
        assert_eq!(coolwarm(1.0), RGBColor(180, 4, 38));
        assert_eq!(coolwarm(5.0), coolwarm(1.0));
    }

    #[test]
    fn annotation_contrast() {
        assert_eq!(annotation_color(coolwarm(1.0)), WHITE);
        assert_eq!(annotation_color(coolwarm(0.0)), BLACK);
    }

    #[test]
    fn ranges_survive_degenerate_input() {
        assert_eq!(padded_range(Vec::<f64>::new()), 0.0..1.0);
        let single = padded_range([40.0]);
        assert!(single.start < 40.0 && single.end > 40.0);
        assert_eq!(bar_range([0.0]), 0.0..1.0);
        let bars = bar_range([75.0, 60.0]);
        assert!(bars.end > 75.0);
    }

    #[test]
    fn slot_labels_only_on_integer_positions() {
        let labels = vec!["Widget".to_owned(), "Gadget".to_owned()];
        assert_eq!(slot_label(&labels, 0.0), "Widget");
        assert_eq!(slot_label(&labels, 1.0), "Gadget");
        assert_eq!(slot_label(&labels, 0.5), "");
        assert_eq!(slot_label(&labels, 2.0), "");
        assert_eq!(slot_label(&labels, -1.0), "");
    }

    #[test]
    fn day_keys_round_trip_to_labels() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        assert_eq!(day_label(day_key(date)), "2024-01-04");
    }

    #[test]
    fn time_axis_pads_both_ends() {
        let first = day_key(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let last = day_key(NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        let range = day_range(&[last, first]);
        assert_eq!(range, (first - 1)..(last + 1));
        assert_eq!(day_range(&[first]), (first - 1)..(first + 1));
        assert_eq!(day_range(&[]), 0..1);
    }

    #[test]
    fn legend_headroom_extends_only_the_top() {
        let range = legend_headroom(20.0..50.0);
        assert_eq!(range.start, 20.0);
        assert!((range.end - 59.0).abs() < 1e-9);
    }

    #[test]
    fn encode_rejects_mismatched_buffer() {
        let err = encode_png(vec![0; 10], FigureSize::new(4, 4)).unwrap_err();
        assert!(matches!(err, ReportError::Encode(_)));
    }

    #[test]
    fn encodes_png_signature() {
        let image = encode_png(vec![255; 4 * 4 * 3], FigureSize::new(4, 4)).unwrap();
        assert_eq!(&image.bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
