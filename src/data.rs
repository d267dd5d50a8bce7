//! CSV loading for the sales table.
//!
//! The loader reads the whole file up front and keeps the rows in file order.
//! Nothing is validated beyond what is needed to turn each row into a
//! [`SalesRecord`]: the required headers must exist, `Date` must be a
//! `YYYY-MM-DD` calendar date and the numeric columns must parse as numbers.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;

use crate::error::{ReportError, Result};

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Date",
    "Product",
    "Region",
    "Customer_ID",
    "Quantity",
    "Price",
    "Total_Sales",
];

/// A single sales transaction.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SalesRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Customer_ID")]
    pub customer_id: String,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Total_Sales")]
    pub total_sales: f64,
}

/// Immutable, ordered collection of [`SalesRecord`] values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    /// Loads the table from a CSV file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Loads the table from any CSV byte stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
        verify_required_columns(&headers)?;

        let records = rdr
            .deserialize()
            .collect::<std::result::Result<Vec<SalesRecord>, _>>()?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn quantities(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.quantity).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.price).collect()
    }

    pub fn total_sales(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.total_sales).collect()
    }

    /// Sum of `Total_Sales` over every record.
    pub fn grand_total(&self) -> f64 {
        self.records.iter().map(|r| r.total_sales).sum()
    }

    /// Records stably sorted by date; rows sharing a date keep file order.
    pub fn sorted_by_date(&self) -> Vec<&SalesRecord> {
        let mut rows: Vec<&SalesRecord> = self.records.iter().collect();
        rows.sort_by_key(|r| r.date);
        rows
    }
}

fn verify_required_columns(headers: &[String]) -> Result<()> {
    let present: HashSet<&str> = headers.iter().map(String::as_str).collect();
    match REQUIRED_COLUMNS
        .iter()
        .find(|column| !present.contains(**column))
    {
        Some(missing) => Err(ReportError::MissingColumn((*missing).to_owned())),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE_CSV: &str = "\
Date,Product,Region,Customer_ID,Quantity,Price,Total_Sales
2024-01-01,Widget,North,C1,10,5.00,50.00
2024-01-02,Widget,South,C2,5,5.00,25.00
2024-01-03,Gadget,North,C3,2,20.00,40.00
2024-01-04,Gadget,South,C4,1,20.00,20.00
";

    pub(crate) fn sample_table() -> SalesTable {
        SalesTable::from_reader(SAMPLE_CSV.as_bytes()).expect("sample csv parses")
    }

    #[test]
    fn parses_rows_in_file_order() {
        let table = sample_table();
        assert_eq!(table.len(), 4);
        let first = &table.records()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(first.product, "Widget");
        assert_eq!(first.customer_id, "C1");
        assert_eq!(first.total_sales, 50.0);
        assert_eq!(table.records()[3].region, "South");
    }

    #[test]
    fn ignores_extra_columns() {
        let csv = "Date,Product,Region,Customer_ID,Quantity,Price,Total_Sales,Note\n\
                   2024-02-01,Widget,East,C9,3,2.5,7.5,promo\n";
        let table = SalesTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].total_sales, 7.5);
    }

    #[test]
    fn missing_date_column_is_reported() {
        let csv = "Product,Region,Customer_ID,Quantity,Price,Total_Sales\n\
                   Widget,North,C1,10,5.00,50.00\n";
        let err = SalesTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn(ref column) if column == "Date"));
    }

    #[test]
    fn unparsable_date_fails() {
        let csv = "Date,Product,Region,Customer_ID,Quantity,Price,Total_Sales\n\
                   01/02/2024,Widget,North,C1,10,5.00,50.00\n";
        assert!(matches!(
            SalesTable::from_reader(csv.as_bytes()),
            Err(ReportError::Csv(_))
        ));
    }

    #[test]
    fn non_numeric_price_fails() {
        let csv = "Date,Product,Region,Customer_ID,Quantity,Price,Total_Sales\n\
                   2024-01-01,Widget,North,C1,10,cheap,50.00\n";
        assert!(SalesTable::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = SalesTable::load("does/not/exist.csv").unwrap_err();
        match err {
            ReportError::Read { path, .. } => assert!(path.ends_with("exist.csv")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sorting_by_date_is_stable() {
        let csv = "Date,Product,Region,Customer_ID,Quantity,Price,Total_Sales\n\
                   2024-01-02,A,North,C1,1,1,1\n\
                   2024-01-01,B,North,C2,1,2,2\n\
                   2024-01-02,C,North,C3,1,3,3\n";
        let table = SalesTable::from_reader(csv.as_bytes()).unwrap();
        let order: Vec<&str> = table
            .sorted_by_date()
            .iter()
            .map(|r| r.product.as_str())
            .collect();
        assert_eq!(order, ["B", "A", "C"]);
    }
}
