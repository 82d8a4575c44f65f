use bass_diffusion::error::BassError;
use bass_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    // IO error conversion
    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let bass_error = BassError::from(io_error);
    assert!(matches!(bass_error, BassError::IoError(_)));

    // Math errors map onto the fit taxonomy
    let err = BassError::from(MathError::InsufficientData("2 rows".to_string()));
    assert!(matches!(err, BassError::UnderdeterminedFit(_)));

    let err = BassError::from(MathError::SingularMatrix("rank 2".to_string()));
    assert!(matches!(err, BassError::UnderdeterminedFit(_)));

    let err = BassError::from(MathError::DomainError("p = 0".to_string()));
    assert!(matches!(err, BassError::DomainError(_)));

    let err = BassError::from(MathError::InvalidInput("NaN".to_string()));
    assert!(matches!(err, BassError::InvalidParameter(_)));
}

#[test]
fn test_csv_error_becomes_parse_error() {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader("a,b\nc\n".as_bytes());
    let csv_error = reader
        .records()
        .find_map(|r| r.err())
        .expect("unequal record lengths");

    assert!(matches!(BassError::from(csv_error), BassError::ParseError(_)));
}

#[test]
fn test_fmt_error_becomes_format_error() {
    let err = BassError::from(std::fmt::Error);
    assert!(matches!(err, BassError::FormatError(_)));
    assert!(err.to_string().starts_with("Format error"));
}

#[test]
fn test_error_display() {
    let error = BassError::DomainError("negative discriminant".to_string());
    assert_eq!(error.to_string(), "Domain error: negative discriminant");

    let error = BassError::NotFound("File not found: sales.csv".to_string());
    assert!(error.to_string().contains("sales.csv"));

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = BassError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}

#[test]
fn test_error_creation() {
    let format_error = BassError::InvalidFormat("xlsx".to_string());
    let fit_error = BassError::UnderdeterminedFit("need 3 rows".to_string());

    assert!(matches!(format_error, BassError::InvalidFormat(_)));
    if let BassError::UnderdeterminedFit(msg) = fit_error {
        assert_eq!(msg, "need 3 rows");
    } else {
        panic!("Wrong error variant");
    }
}
