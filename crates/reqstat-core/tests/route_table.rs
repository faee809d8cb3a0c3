//! Route resolution and identifier derivation.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use reqstat_core::{RouteResolver, RouteTable};

fn table() -> RouteTable {
    RouteTable::new()
        .route("GET", "/test", Some("test"))
        .unwrap()
        .route("GET", "/users/:id", None)
        .unwrap()
        .route("GET", "/users/me", Some("users.me"))
        .unwrap()
        .route("POST", "/users", Some("users.create"))
        .unwrap()
        .route("GET", "/static/{*path}", None)
        .unwrap()
        .route("GET", "/", None)
        .unwrap()
}

fn resolve(path: &str, method: &str) -> String {
    table().resolve(path, method).unwrap().to_string()
}

#[test]
fn query_string_does_not_change_the_route() {
    let t = table();
    let a = t.resolve("/users/abc-uuid?x=1", "GET").unwrap();
    let b = t.resolve("/users/abc-uuid", "GET").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "users.id");
}

#[test]
fn identifier_never_contains_path_values() {
    let id = resolve("/users/3f2504e0-4f89-11d3-9a0c-0305e82c3301", "GET");
    assert_eq!(id, "users.id");
}

#[test]
fn literal_beats_capture() {
    assert_eq!(resolve("/users/me", "GET"), "users.me");
    assert_eq!(resolve("/users/you", "GET"), "users.id");
}

#[test]
fn method_is_part_of_the_match() {
    assert_eq!(resolve("/users", "post"), "users.create");
    let err = table().resolve("/users", "GET").unwrap_err();
    assert!(err.is_route_not_found());
    assert_eq!(err.code().as_str(), "ROUTE_NOT_FOUND");
}

#[test]
fn head_falls_back_to_get() {
    assert_eq!(resolve("/test", "HEAD"), "test");
}

#[test]
fn root_resolves_but_empty_segments_do_not() {
    assert_eq!(resolve("/", "GET"), "index");
    assert_eq!(resolve("/?q=1", "GET"), "index");
    for p in ["/test/", "/users//42", "/users/", "/static/"] {
        assert!(table().resolve(p, "GET").unwrap_err().is_route_not_found(), "path={p}");
    }
}

#[test]
fn templates_resolve_by_exact_registration() {
    let t = table();
    assert_eq!(t.resolve_template("/users/:id", "GET").unwrap().as_str(), "users.id");
    assert_eq!(t.resolve_template("/users/me", "GET").unwrap().as_str(), "users.me");
    assert_eq!(t.resolve_template("/test", "HEAD").unwrap().as_str(), "test");
    assert_eq!(t.resolve_template("/static/{*path}", "GET").unwrap().as_str(), "static.path");

    for (tpl, method) in [("/users/:id", "DELETE"), ("/users/{id}", "GET"), ("/healthz", "GET")] {
        let err = t.resolve_template(tpl, method).unwrap_err();
        assert!(err.is_route_not_found(), "template={tpl} method={method}");
    }
}

#[test]
fn catch_all_needs_a_segment() {
    assert_eq!(resolve("/static/css/site.css", "GET"), "static.path");
    assert!(table().resolve("/static", "GET").is_err());
}

#[test]
fn unknown_paths_are_not_found() {
    for p in ["/nope", "/users/1/extra", "/test/more"] {
        assert!(table().resolve(p, "GET").unwrap_err().is_route_not_found(), "path={p}");
    }
}

#[test]
fn bad_templates_and_names_rejected() {
    assert_eq!(
        RouteTable::new().route("GET", "users", None).unwrap_err().code().as_str(),
        "BAD_CONFIG"
    );
    assert_eq!(
        RouteTable::new()
            .route("GET", "/a", Some("bad name"))
            .unwrap_err()
            .code()
            .as_str(),
        "INVALID_METRIC_NAME"
    );
}
