//! Tests for reading dataset files from disk

use episcan::pipeline::*;
use tempfile::TempDir;

mod common;

use common::*;

#[test]
fn test_read_csv_dataset() {
    let mut df = create_perfect_marker_dataframe();
    let temp_dir = TempDir::new().unwrap();
    let path = write_csv(temp_dir.path(), "P_001.csv", &mut df);

    let loaded = read_table(&path, b',', 100).unwrap();
    assert_eq!(loaded.shape(), (20, 4));

    let dataset = Dataset::from_dataframe(&loaded, "Class").unwrap();
    assert_eq!(dataset.marker_names(), vec!["M1", "M2", "M3"]);
    assert_eq!(dataset.class.group_sizes(), (10, 10));
}

#[test]
fn test_read_tab_separated_with_missing_markers() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.txt");
    std::fs::write(
        &path,
        "SNP1\tSNP2\tClass\nAA\t0\t0\nAG\tNA\t1\n\t2\t0\nGG\t1\t1\n",
    )
    .unwrap();

    let df = read_table(&path, b'\t', 100).unwrap();
    let dataset = Dataset::from_dataframe(&df, "Class").unwrap();

    assert_eq!(
        dataset.markers[0].values,
        vec![
            Some("AA".to_string()),
            Some("AG".to_string()),
            None,
            Some("GG".to_string())
        ]
    );
    assert_eq!(dataset.markers[1].values[1], None);
    assert_eq!(dataset.markers[1].values[2], Some("2".to_string()));
}

#[test]
fn test_read_gbk_encoded_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gbk.csv");
    let (bytes, _, _) = encoding_rs::GBK.encode("位点1,位点2,Class\n0,1,0\n1,1,1\n0,2,0\n1,0,1\n");
    std::fs::write(&path, &bytes).unwrap();

    let df = read_table(&path, b',', 100).unwrap();
    let dataset = Dataset::from_dataframe(&df, "Class").unwrap();

    assert_eq!(dataset.marker_names(), vec!["位点1", "位点2"]);
    assert_eq!(dataset.n_rows(), 4);
}

#[test]
fn test_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let result = read_table(&temp_dir.path().join("absent.csv"), b',', 100);
    assert!(matches!(result, Err(DatasetError::NotFound(_))));
}

#[test]
fn test_provider_uses_pattern_and_class_column() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("set-7.csv"),
        "a;b;status\n0;1;case\n1;1;control\n0;0;case\n1;0;control\n",
    )
    .unwrap();

    let options = LoaderOptions {
        class_column: "status".to_string(),
        separator: b';',
        ..Default::default()
    };
    let provider = FileDatasetProvider::new(temp_dir.path(), "set-{i}.csv".parse().unwrap(), options);

    assert_eq!(provider.name(7), "set-7.csv");
    let dataset = provider.load(7).unwrap();
    assert_eq!(dataset.marker_names(), vec!["a", "b"]);
    // "control" sorts after "case" and becomes code 1
    assert_eq!(dataset.class.codes, vec![0, 1, 0, 1]);
    assert_eq!(dataset.class.levels, ["case".to_string(), "control".to_string()]);

    assert!(matches!(provider.load(8), Err(DatasetError::NotFound(_))));
}

#[test]
fn test_class_column_with_missing_label_is_malformed() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("P_001.csv"), "M1,Class\n0,0\n1,\n0,1\n").unwrap();

    let provider = FileDatasetProvider::new(
        temp_dir.path(),
        "P_{i:03}.csv".parse().unwrap(),
        LoaderOptions::default(),
    );
    let err = provider.load(1).unwrap_err();
    assert!(matches!(err, DatasetError::Malformed(_)));
    assert!(err.to_string().contains("missing"));
}
