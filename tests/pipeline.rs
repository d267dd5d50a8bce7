use std::fs;

use sales_dashboard::data::SalesTable;
use sales_dashboard::model::{self, CategoryField, CategoryOrder};
use sales_dashboard::{fonts, Artifact, ReportBuilder, ReportConfig, ReportError};

const SAMPLE_CSV: &str = "\
Date,Product,Region,Customer_ID,Quantity,Price,Total_Sales
2024-01-01,Widget,North,C1,10,5.00,50.00
2024-01-02,Widget,South,C2,5,5.00,25.00
2024-01-03,Gadget,North,C3,2,20.00,40.00
2024-01-04,Gadget,South,C4,1,20.00,20.00
";

#[test]
fn four_row_scenario_aggregates() {
    let table = SalesTable::from_reader(SAMPLE_CSV.as_bytes()).expect("sample csv parses");

    let product_sales = model::sum_by(&table, CategoryField::Product, CategoryOrder::FirstSeen);
    let pairs: Vec<(&str, f64)> = product_sales
        .iter()
        .map(|t| (t.label.as_str(), t.value))
        .collect();
    assert_eq!(pairs, [("Widget", 75.0), ("Gadget", 60.0)]);

    let region_counts = model::count_by(&table, CategoryField::Region, CategoryOrder::FirstSeen);
    let pairs: Vec<(&str, f64)> = region_counts
        .iter()
        .map(|t| (t.label.as_str(), t.value))
        .collect();
    assert_eq!(pairs, [("North", 2.0), ("South", 2.0)]);
}

#[cfg(feature = "interactive")]
#[test]
fn full_run_writes_every_artifact() {
    if !fonts::default_fonts_available() {
        eprintln!(
            "Skipping full_run_writes_every_artifact: no chart font found. Set SALES_DASHBOARD_FONTS_DIR or copy assets/fonts next to the binary."
        );
        return;
    }

    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("sales_data1.csv");
    fs::write(&input, SAMPLE_CSV).expect("write input");
    let output = dir.path().join("visualizations");
    fs::create_dir(&output).expect("create output dir");

    let config = ReportConfig::default()
        .with_input_path(&input)
        .with_output_dir(&output);
    let result = ReportBuilder::new()
        .with_config(config.clone())
        .run()
        .expect("report run");

    let expected: Vec<_> = Artifact::STATIC
        .iter()
        .chain(Artifact::INTERACTIVE.iter())
        .map(|artifact| config.artifact_path(*artifact))
        .collect();
    assert_eq!(result.artifacts, expected);

    for path in &expected {
        let metadata = fs::metadata(path).expect("artifact exists");
        assert!(metadata.len() > 0, "{} is empty", path.display());
    }

    let dashboard = fs::read_to_string(config.artifact_path(Artifact::Dashboard)).unwrap();
    assert!(dashboard.contains("Interactive Sales Dashboard"));
    assert!(dashboard.contains("Region Customers"));
}

#[test]
fn missing_output_directory_is_not_created() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("sales_data1.csv");
    fs::write(&input, SAMPLE_CSV).expect("write input");
    let output = dir.path().join("visualizations");

    let err = ReportBuilder::new()
        .with_config(
            ReportConfig::default()
                .with_input_path(&input)
                .with_output_dir(&output),
        )
        .run()
        .unwrap_err();

    // Without a font the run stops before the first write; either way nothing is created.
    assert!(matches!(
        err,
        ReportError::Write { .. } | ReportError::FontLoad(_)
    ));
    assert!(!output.exists());
}
