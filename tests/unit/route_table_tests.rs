//! Unit tests for `RouteTable` and `LiveRouteTable`.

use monodev::models::route::{ComponentRef, RouteEntry};
use monodev::routing::table::{LiveRouteTable, RouteTable};
use monodev::AppError;

fn route(name: &str) -> RouteEntry {
    RouteEntry::new(format!("/{name}"), name, ComponentRef::lazy(format!("./{name}.vue")))
}

#[test]
fn try_new_accepts_unique_names() {
    let table = RouteTable::try_new(vec![route("home"), route("about")]).expect("unique");
    assert_eq!(table.names(), ["home", "about"]);
    assert_eq!(table.len(), 2);
}

#[test]
fn try_new_rejects_duplicates() {
    let err = RouteTable::try_new(vec![route("home"), route("about"), route("home")])
        .expect_err("duplicate");
    assert!(matches!(err, AppError::DuplicateRoute(ref names) if names == "home"));
}

#[test]
fn duplicates_reported_once_in_first_seen_order() {
    let table = RouteTable::new(vec![
        route("b"),
        route("a"),
        route("b"),
        route("a"),
        route("b"),
    ]);
    assert_eq!(table.duplicate_names(), ["b", "a"]);
    assert_eq!(
        table.validate().expect_err("duplicates").to_string(),
        "duplicate route: b, a"
    );
}

#[test]
fn append_keeps_existing_entries_first() {
    let mut table = RouteTable::new(vec![route("home")]);
    table.append(vec![route("x"), route("y")]);
    assert_eq!(table.names(), ["home", "x", "y"]);
}

#[test]
fn find_by_name() {
    let table = RouteTable::new(vec![route("home"), route("about")]);
    assert_eq!(table.find("about").map(|r| r.path.as_str()), Some("/about"));
    assert!(table.find("missing").is_none());
}

#[test]
fn empty_table() {
    let table = RouteTable::default();
    assert!(table.is_empty());
    assert!(table.validate().is_ok());
}

#[test]
fn live_table_clones_share_entries() {
    let live = LiveRouteTable::new(RouteTable::new(vec![route("home")]));
    let router_view = live.clone();

    live.append(vec![route("x"), route("y")]);

    assert_eq!(router_view.len(), 3);
    assert_eq!(router_view.snapshot().names(), ["home", "x", "y"]);
}

#[test]
fn snapshot_is_detached() {
    let live = LiveRouteTable::new(RouteTable::new(vec![route("home")]));
    let before = live.snapshot();
    live.append(vec![route("x")]);
    assert_eq!(before.len(), 1);
    assert_eq!(live.len(), 2);
}

#[test]
fn route_entry_parses_from_toml() {
    let entry: RouteEntry = toml::from_str(
        r#"
path = "/module-a/page1"
name = "ModuleAPage1"
component = { target = "./components/Page1.vue", lazy = true }
meta = { title = "Page 1", module = "module-a" }
"#,
    )
    .expect("valid entry");

    assert!(entry.component.lazy);
    assert_eq!(entry.meta.get("module").map(String::as_str), Some("module-a"));
}
