//! Contract tests for the `monodev-ctl` inspection binary.

use std::fs;
use std::process::{Command, Output};

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/monodev.toml");

fn ctl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_monodev-ctl"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("monodev-ctl runs")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn routes_json_lists_merged_table() {
    let out = ctl(&["--config", SAMPLE, "routes", "--json"]);
    assert_eq!(out.status.code(), Some(0));

    let routes: Vec<serde_json::Value> =
        serde_json::from_str(&stdout(&out)).expect("routes are JSON");
    let names: Vec<&str> = routes.iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(
        names,
        [
            "home",
            "about",
            "ModuleAPage1",
            "ModuleAPage2",
            "ModuleAPage3",
            "ModuleBDashboard",
            "ModuleBProfile",
            "ModuleBSettings",
        ]
    );
}

#[test]
fn lazy_routes_match_eager_routes() {
    let eager = ctl(&["--config", SAMPLE, "routes", "--json", "--mode", "eager"]);
    let lazy = ctl(&["--config", SAMPLE, "routes", "--json", "--mode", "lazy"]);

    assert_eq!(lazy.status.code(), Some(0));
    assert_eq!(stdout(&eager), stdout(&lazy));
}

#[test]
fn check_passes_on_sample_workspace() {
    let out = ctl(&["--config", SAMPLE, "check"]);
    let text = stdout(&out);

    assert_eq!(out.status.code(), Some(0), "{text}");
    assert!(text.contains("checks passed"));
    assert!(!text.contains('❌'));
}

#[test]
fn duplicate_module_routes_fail_routes_and_check() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    fs::create_dir_all(root.join("app")).expect("mkdir");
    for module in ["a", "b"] {
        let module_dir = root.join(module);
        fs::create_dir_all(&module_dir).expect("mkdir");
        fs::write(
            module_dir.join("module.toml"),
            format!(
                "name = \"{module}\"\n\n[[routes]]\npath = \"/{module}\"\nname = \"Clash\"\ncomponent = {{ target = \"./X.vue\" }}\n"
            ),
        )
        .expect("write manifest");
    }
    let config = root.join("monodev.toml");
    fs::write(
        &config,
        r#"
[main]
command = "true"
working_directory = "app"

[[modules]]
name = "a"
watch_command = "true"
working_directory = "a"

[[modules]]
name = "b"
watch_command = "true"
working_directory = "b"
"#,
    )
    .expect("write config");
    let config = config.to_string_lossy();

    let routes = ctl(&["--config", &config, "routes"]);
    assert_eq!(routes.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&routes.stderr).contains("duplicate route: Clash"));

    let check = ctl(&["--config", &config, "check"]);
    assert_eq!(check.status.code(), Some(1));
    assert!(stdout(&check).contains("route name uniqueness"));
}

#[test]
fn analyze_reports_missing_artifacts_without_failing() {
    let out = ctl(&["--config", SAMPLE, "analyze", "--json"]);
    assert_eq!(out.status.code(), Some(0));

    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("report is JSON");
    assert_eq!(report["total_bytes"], 0);
    assert_eq!(report["artifacts"].as_array().map(Vec::len), Some(3));
}

#[test]
fn modules_lists_manifest_metadata() {
    let out = ctl(&["--config", SAMPLE, "modules"]);
    let text = stdout(&out);

    assert_eq!(out.status.code(), Some(0));
    assert!(text.contains("module-a 1.0.0"));
    assert!(text.contains("store namespaces: moduleA, moduleB"));
}
