//! Unit tests for the build artifact report.

use std::fs;
use std::path::Path;

use monodev::analysis::{analyze, ArtifactSpec};

fn write(root: &Path, rel: &str, bytes: usize) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
    fs::write(path, vec![b'x'; bytes]).expect("write");
}

#[test]
fn found_artifacts_are_summed() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "app/dist/js/app.3f2a.js", 2048);
    write(dir.path(), "packages/module-a/dist/module-a.js", 512);

    let report = analyze(
        dir.path(),
        &[
            ArtifactSpec::new("app", "app/dist/js/app.*.js"),
            ArtifactSpec::new("module-a", "packages/module-a/dist/module-a.js"),
        ],
    );

    assert_eq!(report.artifacts[0].size, Some(2048));
    assert_eq!(report.artifacts[1].size, Some(512));
    assert_eq!(report.total_bytes, 2560);
    assert!(report.missing().is_empty());
}

#[test]
fn missing_artifacts_are_reported_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "packages/module-b/dist/module-b.js", 100);

    let report = analyze(
        dir.path(),
        &[
            ArtifactSpec::new("module-a", "packages/module-a/dist/module-a.js"),
            ArtifactSpec::new("module-b", "packages/module-b/dist/module-b.js"),
        ],
    );

    assert_eq!(report.missing(), ["module-a"]);
    assert!(report.artifacts[0].path.is_none());
    assert_eq!(report.total_bytes, 100);
}

#[test]
fn first_match_in_sorted_order_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "dist/app.b.js", 20);
    write(dir.path(), "dist/app.a.js", 10);

    let report = analyze(dir.path(), &[ArtifactSpec::new("app", "dist/app.*.js")]);

    assert_eq!(report.artifacts[0].size, Some(10));
    assert!(report.artifacts[0]
        .path
        .as_ref()
        .is_some_and(|p| p.ends_with("app.a.js")));
}

#[test]
fn empty_spec_list_is_empty_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report = analyze(dir.path(), &[]);
    assert!(report.artifacts.is_empty());
    assert_eq!(report.total_bytes, 0);
}
