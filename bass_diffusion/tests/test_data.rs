use bass_diffusion::data::{DataLoader, Delimiter, LoaderOptions, SalesData};
use bass_diffusion::BassError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_data_loader_from_csv() {
    let file = write_file(
        ".csv",
        "period,sales\n1,100\n2,200\n3,400\n4,300\n5,150\n",
    );

    let data = DataLoader::from_path(file.path()).unwrap();

    assert_eq!(data.len(), 5);
    assert!(!data.is_empty());
    assert_eq!(data.sales(), &[100.0, 200.0, 400.0, 300.0, 150.0]);
    assert_eq!(
        data.cumulative_sales(),
        &[100.0, 300.0, 700.0, 1000.0, 1150.0]
    );
    assert_eq!(data.cumulative_sales_squared()[2], 490_000.0);
    assert_eq!(data.peak_index(), Some(2));
}

#[test]
fn test_data_loader_from_tab_separated_txt() {
    let file = write_file(".txt", "year\tadopters\n1998\t12.5\n1999\t30\n2000\t41\n");

    let data = DataLoader::from_path(file.path()).unwrap();

    assert_eq!(
        data.periods(),
        &["1998".to_string(), "1999".to_string(), "2000".to_string()]
    );
    assert_eq!(data.sales(), &[12.5, 30.0, 41.0]);
    assert_eq!(data.peak_period(), Some("2000"));
}

#[test]
fn test_source_name_is_file_stem() {
    let file = write_file(".csv", "period,sales\nQ1,1\n");
    let data = DataLoader::from_path(file.path()).unwrap();
    let stem = file.path().file_stem().unwrap().to_str().unwrap();
    assert_eq!(data.source_name(), stem);
}

#[rstest]
#[case("sales.xlsx")]
#[case("sales.json")]
#[case("sales")]
fn test_unsupported_extension(#[case] name: &str) {
    let result = DataLoader::from_path(name);
    assert!(matches!(result, Err(BassError::InvalidFormat(_))));
}

#[test]
fn test_missing_file() {
    let result = DataLoader::from_path("definitely_missing_sales_file.csv");
    assert!(matches!(result, Err(BassError::NotFound(_))));
}

#[rstest]
#[case("period,sales\n1,100\n2,abc\n")]
#[case("period,sales\n1,100,7\n")]
#[case("period,sales\n1\n")]
#[case("invalid,csv,format\n")]
#[case("period,sales\n1,NaN\n")]
fn test_malformed_rows(#[case] contents: &str) {
    let file = write_file(".csv", contents);
    let result = DataLoader::from_path(file.path());
    assert!(
        matches!(result, Err(BassError::ParseError(_))),
        "expected ParseError for {:?}, got {:?}",
        contents,
        result
    );
}

#[test]
fn test_header_only_file_is_empty() {
    let file = write_file(".csv", "period,sales\n");
    let data = DataLoader::from_path(file.path()).unwrap();
    assert!(data.is_empty());
    assert_eq!(data.peak_index(), None);
}

#[test]
fn test_loader_options() {
    // Explicit delimiter wins over the one implied by the extension
    let file = write_file(".csv", "1\t5\n2\t7\n");
    let loader = DataLoader::with_options(
        LoaderOptions::default()
            .with_delimiter(Delimiter::Tab)
            .with_header(false),
    );

    let data = loader.load(file.path()).unwrap();
    assert_eq!(data.sales(), &[5.0, 7.0]);
}

#[test]
fn test_whitespace_is_trimmed() {
    let data = DataLoader::from_reader(
        "period , sales\n 1 , 10 \n 2 ,  20\n".as_bytes(),
        Delimiter::Comma,
        "padded",
    )
    .unwrap();
    assert_eq!(data.sales(), &[10.0, 20.0]);
    assert_eq!(data.periods()[0], "1");
}

#[test]
fn test_in_memory_construction() {
    let data = SalesData::new(
        vec!["a".to_string(), "b".to_string()],
        vec![3.0, 4.0],
    )
    .unwrap()
    .with_source_name("letters");

    assert_eq!(data.source_name(), "letters");
    assert_eq!(data.time_index(), vec![1.0, 2.0]);
    assert!(SalesData::from_sales(vec![1.0, f64::INFINITY]).is_err());
}
