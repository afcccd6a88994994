//! Integration tests for capture storage through the thermometer registry.

use futures_util::future::join_all;
use pi_thermometer::{
    AppConfig, MonitorConfig, SafeRange, ThermometerConfig, ThermometerError,
    ThermometerRegistry,
};
use std::collections::HashSet;
use tokio_test::{assert_err, assert_ok};

fn registry(dir: &std::path::Path) -> ThermometerRegistry {
    let config = AppConfig {
        data_dir: dir.to_path_buf(),
        thermometers: vec![
            ThermometerConfig::emulated("w1", 19.75, SafeRange::new(18.0, 26.0))
                .with_calibration(0.25),
            ThermometerConfig::one_wire(
                "attic",
                dir.join("missing").join("w1_slave"),
                SafeRange::new(-10.0, 40.0),
            ),
        ],
        monitor: MonitorConfig::default(),
    };
    assert_ok!(ThermometerRegistry::from_config(&config))
}

#[tokio::test]
async fn test_capture_holds_calibrated_value() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry(dir.path());
    let w1 = assert_ok!(registry.get("w1"));

    let id = assert_ok!(w1.capture().await);
    let capture = assert_ok!(w1.retrieve(&id).await);
    assert_eq!(capture.payload, "19.5");
    assert_eq!(capture.id, id);
}

#[tokio::test]
async fn test_failed_measurement_persists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry(dir.path());
    let attic = assert_ok!(registry.get("attic"));

    let err = assert_err!(attic.capture().await);
    assert!(matches!(err, ThermometerError::HardwareUnavailable { .. }));
    assert!(assert_ok!(attic.list_captures().await).is_empty());
    assert!(!dir.path().join("attic").exists());
}

#[tokio::test]
async fn test_concurrent_creates_are_all_listed() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry(dir.path());
    let w1 = assert_ok!(registry.get("w1"));

    let ids: Vec<String> = join_all((0..20).map(|_| w1.capture()))
        .await
        .into_iter()
        .map(|result| result.unwrap())
        .collect();

    let unique: HashSet<_> = ids.iter().cloned().collect();
    assert_eq!(unique.len(), 20);

    let listed: HashSet<_> = assert_ok!(w1.list_captures().await).into_iter().collect();
    assert_eq!(listed, unique);
}

#[tokio::test]
async fn test_concurrent_deletes_succeed_once() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry(dir.path());
    let w1 = assert_ok!(registry.get("w1"));
    let id = assert_ok!(w1.capture().await);

    let results = join_all((0..5).map(|_| w1.delete(&id))).await;
    let deleted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(deleted, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, ThermometerError::CaptureNotFound { .. })));
}

#[tokio::test]
async fn test_unknown_thermometer() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry(dir.path());
    let err = assert_err!(registry.get("bogus"));
    assert!(err.is_not_found());
}
