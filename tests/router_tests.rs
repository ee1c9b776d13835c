use http::Method;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use waymark::params::param_map;
use waymark::{ErrorKind, ParamMap, Router, RouterError};

fn default_router() -> Router {
    Router::with_default_routes().unwrap()
}

#[test]
fn test_module_item_get() {
    let router = default_router();
    let matched = router.match_request(&Method::GET, "/users/42").unwrap();
    assert_eq!(matched.route_name, "module-item");
    assert_eq!(
        matched.params,
        param_map([
            ("module", "users"),
            ("item", "42"),
            ("action", "view"),
            ("format", "html"),
        ])
    );
}

#[test]
fn test_method_defaults_override_for_non_get() {
    let router = default_router();
    let put = router.match_request(&Method::PUT, "/users/42").unwrap();
    assert_eq!(put.action(), Some("put"));
    assert_eq!(put.get("item"), Some("42"));

    let delete = router.match_request(&Method::DELETE, "/users/42").unwrap();
    assert_eq!(delete.action(), Some("delete"));

    // No POST overlay on this route: the default applies.
    let post = router.match_request(&Method::POST, "/users/42").unwrap();
    assert_eq!(post.action(), Some("view"));
}

#[test]
fn test_home_route() {
    let router = default_router();
    for path in ["/", "", "//"] {
        let matched = router.match_request(&Method::GET, path).unwrap();
        assert_eq!(matched.route_name, "home");
        assert_eq!(
            matched.params,
            param_map([("module", "Home"), ("action", "index"), ("format", "html")])
        );
    }
}

#[test]
fn test_default_table_priority() {
    let router = default_router();
    let cases = [
        ("/users/edit/7", "module-action-item"),
        ("/users/list", "module-action"),
        ("/users", "module"),
        ("/users/42/", "module-item"),
    ];
    for (path, expected) in cases {
        let matched = router.match_request(&Method::GET, path).unwrap();
        assert_eq!(matched.route_name, expected, "path {path}");
    }

    let module = router.match_request(&Method::GET, "/users").unwrap();
    assert_eq!(module.action(), Some("index"));
    assert_eq!(module.module(), Some("users"));
}

#[test]
fn test_numeric_segment_rejects_letters() {
    let router = default_router();
    let matched = router.match_request(&Method::GET, "/users/abc").unwrap();
    assert_eq!(matched.route_name, "module-action");
    assert_eq!(matched.action(), Some("abc"));
}

#[test]
fn test_not_found() {
    let router = default_router();
    let err = router
        .match_request(&Method::GET, "/a/b/c/d")
        .unwrap_err();
    assert_eq!(
        err,
        RouterError::NotFound {
            method: "GET".into(),
            path: "a/b/c/d".into()
        }
    );
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_empty_router_is_configuration_error() {
    let router = Router::new();
    let err = router.match_request(&Method::GET, "/").unwrap_err();
    assert_eq!(err, RouterError::NoRoutes);
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_values_are_url_decoded() {
    let mut router = Router::new();
    router.route("search", "/search/<:term>").unwrap();
    let matched = router
        .match_request(&Method::GET, "/search/hello%20big+world")
        .unwrap();
    assert_eq!(matched.get("term"), Some("hello big world"));
}

#[test]
fn test_condition_veto_continues_scan() {
    let mut router = Router::new();
    router
        .route("admin-item", "/<:module>/<#item>")
        .unwrap()
        .defaults([("area", "admin")])
        .condition(|params: &ParamMap, _: &Method, _: &str| {
            params.get("module").map(String::as_str) == Some("admin")
        });
    router
        .route("module-item", "/<:module>/<#item>")
        .unwrap()
        .defaults([("area", "public")]);

    let admin = router.match_request(&Method::GET, "/admin/1").unwrap();
    assert_eq!(admin.route_name, "admin-item");
    assert_eq!(admin.get("area"), Some("admin"));

    let public = router.match_request(&Method::GET, "/users/1").unwrap();
    assert_eq!(public.route_name, "module-item");
    assert_eq!(public.get("area"), Some("public"));
}

#[test]
fn test_callback_runs_once_on_accepted_route() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let mut router = Router::new();
    router
        .route("first", "/<:module>")
        .unwrap()
        .condition(|_: &ParamMap, _: &Method, _: &str| false)
        .callback(|_: ParamMap, _: &Method, _: &str| panic!("rejected route ran its callback"));
    router
        .route("second", "/<:module>")
        .unwrap()
        .callback(move |mut params: ParamMap, method: &Method, _: &str| {
            seen.fetch_add(1, Ordering::SeqCst);
            params.insert("method".into(), method.to_string());
            params
        });

    let matched = router.match_request(&Method::POST, "/orders").unwrap();
    assert_eq!(matched.route_name, "second");
    assert_eq!(matched.get("method"), Some("POST"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_session_tracks_last_matched_route() {
    let router = default_router();
    let mut session = router.session();
    assert_eq!(session.matched_route().unwrap_err(), RouterError::NoMatchedRoute);

    session.match_request(&Method::GET, "/users/42").unwrap();
    assert_eq!(session.matched_route_name(), Some("module-item"));
    assert_eq!(session.matched_route().unwrap().template(), "<:module>/<#item>");

    assert!(session.match_request(&Method::GET, "/a/b/c/d").is_err());
    assert_eq!(session.matched_route_name(), None);
}

#[test]
fn test_router_shared_across_threads() {
    let router = Arc::new(default_router());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let router = Arc::clone(&router);
            std::thread::spawn(move || {
                let path = format!("/users/{i}");
                let mut session = router.session();
                let matched = session.match_request(&Method::GET, &path).unwrap();
                (matched.get("item").map(str::to_string), session.matched_route_name().map(str::to_string))
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (item, name) = handle.join().unwrap();
        assert_eq!(item, Some(i.to_string()));
        assert_eq!(name.as_deref(), Some("module-item"));
    }
}
