//! Integration tests over the sample workspace shipped in `demos/`.

use std::path::PathBuf;

use monodev::routing::loader::{ModuleRouteLoader, RouteLoadingMode};
use monodev::routing::resolver::ManifestResolver;
use monodev::store::host::HostStore;
use monodev::DevConfig;

fn sample_config() -> DevConfig {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/monodev.toml");
    DevConfig::load_from_path(&path).expect("sample config loads")
}

#[test]
fn sample_config_describes_two_modules() {
    let config = sample_config();

    assert_eq!(config.module_names(), ["module-a", "module-b"]);
    assert_eq!(config.route_loading, RouteLoadingMode::Eager);
    assert!(config.root.ends_with("demos"));
}

#[test]
fn eager_merge_over_sample_manifests() {
    let config = sample_config();

    let table = ModuleRouteLoader::from_config(&config).load_eager(config.base_routes.clone());

    assert_eq!(
        table.names(),
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
    assert!(table.validate().is_ok());
    let page = table.find("ModuleAPage1").expect("module-a route present");
    assert_eq!(page.meta.get("module").map(String::as_str), Some("module-a"));
    assert!(page.component.lazy);
}

#[tokio::test]
async fn lazy_merge_over_sample_manifests() {
    let config = sample_config();

    let (table, task) =
        ModuleRouteLoader::from_config(&config).load_lazy(config.base_routes.clone());
    let appended = task.await.expect("loader task completes");

    assert_eq!(appended, 6);
    assert_eq!(table.len(), 8);
}

#[test]
fn sample_store_registers_both_namespaces() {
    let config = sample_config();

    let store = HostStore::compose(&ManifestResolver::for_config(&config));

    assert_eq!(store.namespaces(), ["moduleA", "moduleB"]);
    let a = store.module_state("moduleA").expect("moduleA slice");
    assert_eq!(a["module_a_data"]["current_page"], "page1");
}
