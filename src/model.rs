//! Chart-ready data derived from a [`SalesTable`].
//!
//! The types in this module are plain values that both generators consume.
//! They never reference a rendering crate, so the aggregation rules (category
//! ordering, sums, counts, correlations, distribution summaries) can be
//! tested without drawing anything.

use std::collections::HashMap;

use chrono::NaiveDate;
use ndarray::Array2;

use crate::data::{SalesRecord, SalesTable};
use crate::stats;

/// Categorical columns of the sales table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryField {
    Product,
    Region,
}

impl CategoryField {
    /// Column name as it appears in the CSV header.
    pub fn column_name(self) -> &'static str {
        match self {
            CategoryField::Product => "Product",
            CategoryField::Region => "Region",
        }
    }

    fn value(self, record: &SalesRecord) -> &str {
        match self {
            CategoryField::Product => &record.product,
            CategoryField::Region => &record.region,
        }
    }
}

/// Order in which category labels are laid out along an axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryOrder {
    /// Order of first appearance in the table.
    #[default]
    FirstSeen,
    /// Sorted by label.
    Lexicographic,
    /// Largest record count first; ties keep first-seen order.
    CountDescending,
}

/// Raw `Total_Sales` values belonging to one category.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryValues {
    pub label: String,
    pub values: Vec<f64>,
}

/// One aggregated number (sum or count) for a category.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryTotal {
    pub label: String,
    pub value: f64,
}

/// A point of the sales-over-time line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A point of the price versus total sales scatter.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub group: String,
    pub product: String,
    pub customer_id: String,
}

/// Square Pearson correlation matrix with row/column labels.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Array2<f64>,
}

impl CorrelationMatrix {
    /// Computes the matrix for the named columns.
    ///
    /// Diagonal entries are fixed at `1.0` for any nonempty input; off-diagonal
    /// entries are `NaN` when a column has no variance.
    pub fn compute(columns: &[(&str, Vec<f64>)]) -> Self {
        let labels = columns.iter().map(|(name, _)| (*name).to_owned()).collect();
        let data: Vec<Vec<f64>> = columns.iter().map(|(_, values)| values.clone()).collect();
        let n = data.len();
        let mut values = stats::pearson_matrix(&data)
            .unwrap_or_else(|| Array2::from_elem((n, n), f64::NAN));

        let observed = data.first().map_or(false, |column| !column.is_empty());
        let diagonal = if observed { 1.0 } else { f64::NAN };
        values.diag_mut().fill(diagonal);
        Self { labels, values }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Coefficient at `row`, `column`.
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[[row, column]]
    }
}

/// Five-number summary drawn as a box with 1.5 IQR whiskers.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSummary {
    pub label: String,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// Summarises one category; `None` when the category holds no values.
    pub fn from_values(label: impl Into<String>, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let q1 = stats::quantile(values, 0.25);
        let median = stats::quantile(values, 0.5);
        let q3 = stats::quantile(values, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let sorted = stats::sorted_copy(values);
        // Whiskers stop at the most extreme observations inside the fences.
        let inside = sorted
            .iter()
            .copied()
            .filter(|v| *v >= low_fence && *v <= high_fence);
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            label: label.into(),
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Number of points each violin outline is sampled at.
pub const VIOLIN_GRID_POINTS: usize = 100;

/// How far (in bandwidths) the density extends past the extreme values.
const VIOLIN_CUT: f64 = 2.0;

/// Kernel density outline for one category.
#[derive(Clone, Debug, PartialEq)]
pub struct ViolinShape {
    pub label: String,
    /// Sample positions along the value axis.
    pub support: Vec<f64>,
    /// Density at each support position; empty when the sample is degenerate.
    pub density: Vec<f64>,
    pub summary: BoxSummary,
}

impl ViolinShape {
    pub fn from_values(label: impl Into<String>, values: &[f64]) -> Option<Self> {
        let label = label.into();
        let summary = BoxSummary::from_values(label.clone(), values)?;

        let Some(bandwidth) = stats::scott_bandwidth(values) else {
            return Some(Self {
                label,
                support: Vec::new(),
                density: Vec::new(),
                summary,
            });
        };

        let min = values.iter().copied().fold(f64::INFINITY, f64::min) - VIOLIN_CUT * bandwidth;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + VIOLIN_CUT * bandwidth;
        let step = (max - min) / (VIOLIN_GRID_POINTS - 1) as f64;
        let support: Vec<f64> = (0..VIOLIN_GRID_POINTS)
            .map(|i| min + step * i as f64)
            .collect();
        let density = stats::gaussian_kde(values, bandwidth, &support);

        Some(Self {
            label,
            support,
            density,
            summary,
        })
    }

    /// Value range covered by the outline (or the single value).
    pub fn extent(&self) -> (f64, f64) {
        match (self.support.first(), self.support.last()) {
            (Some(lo), Some(hi)) => (*lo, *hi),
            _ => (self.summary.lower_whisker, self.summary.upper_whisker),
        }
    }

    pub fn peak_density(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }
}

/// Distinct labels of `field` in the requested order.
pub fn categories(table: &SalesTable, field: CategoryField, order: CategoryOrder) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in table.records() {
        let label = field.value(record);
        let count = counts.entry(label).or_insert(0);
        if *count == 0 {
            labels.push(label.to_owned());
        }
        *count += 1;
    }

    match order {
        CategoryOrder::FirstSeen => {}
        CategoryOrder::Lexicographic => labels.sort(),
        CategoryOrder::CountDescending => {
            labels.sort_by_key(|label| std::cmp::Reverse(counts[label.as_str()]))
        }
    }
    labels
}

/// Integer code of each record's category, with codes assigned in
/// lexicographic label order.
pub fn category_codes(table: &SalesTable, field: CategoryField) -> Vec<usize> {
    let labels = categories(table, field, CategoryOrder::Lexicographic);
    let index: HashMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(code, label)| (label.as_str(), code))
        .collect();
    table
        .records()
        .iter()
        .map(|record| index[field.value(record)])
        .collect()
}

/// `Total_Sales` values grouped by `field`.
pub fn values_by(
    table: &SalesTable,
    field: CategoryField,
    order: CategoryOrder,
) -> Vec<CategoryValues> {
    categories(table, field, order)
        .into_iter()
        .map(|label| {
            let values = table
                .records()
                .iter()
                .filter(|record| field.value(record) == label)
                .map(|record| record.total_sales)
                .collect();
            CategoryValues { label, values }
        })
        .collect()
}

/// Summed `Total_Sales` per category.
pub fn sum_by(table: &SalesTable, field: CategoryField, order: CategoryOrder) -> Vec<CategoryTotal> {
    values_by(table, field, order)
        .into_iter()
        .map(|group| CategoryTotal {
            value: group.values.iter().sum(),
            label: group.label,
        })
        .collect()
}

/// Record count per category.
pub fn count_by(
    table: &SalesTable,
    field: CategoryField,
    order: CategoryOrder,
) -> Vec<CategoryTotal> {
    values_by(table, field, order)
        .into_iter()
        .map(|group| CategoryTotal {
            value: group.values.len() as f64,
            label: group.label,
        })
        .collect()
}

/// Box summaries per category of `field`.
pub fn box_summaries(table: &SalesTable, field: CategoryField) -> Vec<BoxSummary> {
    values_by(table, field, CategoryOrder::FirstSeen)
        .iter()
        .filter_map(|group| BoxSummary::from_values(group.label.clone(), &group.values))
        .collect()
}

/// Violin outlines per category of `field`.
pub fn violin_shapes(table: &SalesTable, field: CategoryField) -> Vec<ViolinShape> {
    values_by(table, field, CategoryOrder::FirstSeen)
        .iter()
        .filter_map(|group| ViolinShape::from_values(group.label.clone(), &group.values))
        .collect()
}

/// Correlation between Quantity, Price and Total_Sales.
pub fn sales_correlation(table: &SalesTable) -> CorrelationMatrix {
    CorrelationMatrix::compute(&[
        ("Quantity", table.quantities()),
        ("Price", table.prices()),
        ("Total_Sales", table.total_sales()),
    ])
}

/// `Total_Sales` over time, one point per record, sorted by date.
pub fn sales_over_time(table: &SalesTable) -> Vec<TimePoint> {
    table
        .sorted_by_date()
        .into_iter()
        .map(|record| TimePoint {
            date: record.date,
            value: record.total_sales,
        })
        .collect()
}

/// Per-category time series, categories in first-seen order.
pub fn sales_over_time_by(table: &SalesTable, field: CategoryField) -> Vec<(String, Vec<TimePoint>)> {
    let sorted = table.sorted_by_date();
    categories(table, field, CategoryOrder::FirstSeen)
        .into_iter()
        .map(|label| {
            let points = sorted
                .iter()
                .filter(|record| field.value(record) == label)
                .map(|record| TimePoint {
                    date: record.date,
                    value: record.total_sales,
                })
                .collect();
            (label, points)
        })
        .collect()
}

/// Price versus Total_Sales points in table order, grouped by `field`.
pub fn price_scatter(table: &SalesTable, field: CategoryField) -> Vec<ScatterPoint> {
    table
        .records()
        .iter()
        .map(|record| ScatterPoint {
            x: record.price,
            y: record.total_sales,
            group: field.value(record).to_owned(),
            product: record.product.clone(),
            customer_id: record.customer_id.clone(),
        })
        .collect()
}
