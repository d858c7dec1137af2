use enginebench_common::BenchError;

#[test]
fn test_configuration_error_display() {
    let err = BenchError::Configuration("iterations must be at least 1".to_string());
    assert_eq!(err.to_string(), "Invalid configuration: iterations must be at least 1");
}

#[test]
fn test_calibration_error_display() {
    let err = BenchError::Calibration {
        url: "http://127.0.0.1:3000/".to_string(),
        reason: "connection refused".to_string(),
    };
    assert_eq!(err.to_string(), "Calibration failed for http://127.0.0.1:3000/: connection refused");
}

#[test]
fn test_network_error() {
    let err = BenchError::Network("connection reset".to_string());
    assert_eq!(err.to_string(), "Network error: connection reset");
}

#[test]
fn test_timeout_error() {
    assert_eq!(BenchError::Timeout(250).to_string(), "Request timed out after 250 ms");
}

#[test]
fn test_length_mismatch() {
    let err = BenchError::LengthMismatch { expected: 512, actual: 511 };
    assert_eq!(err.to_string(), "Expected 512 bytes, got 511 bytes");
}

#[test]
fn test_error_equality() {
    let err1 = BenchError::Network("a".to_string());
    let err2 = BenchError::Network("a".to_string());
    let err3 = BenchError::Network("b".to_string());

    assert_eq!(err1, err2);
    assert_ne!(err1, err3);
}

#[test]
fn test_only_setup_errors_are_fatal() {
    assert!(BenchError::Configuration("x".to_string()).is_fatal());
    assert!(BenchError::Calibration { url: "u".to_string(), reason: "r".to_string() }.is_fatal());

    assert!(!BenchError::Network("x".to_string()).is_fatal());
    assert!(!BenchError::Timeout(1).is_fatal());
    assert!(!BenchError::LengthMismatch { expected: 1, actual: 2 }.is_fatal());
    assert!(!BenchError::NoData.is_fatal());
}
