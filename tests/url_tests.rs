use http::Method;
use waymark::params::param_map;
use waymark::{ErrorKind, Router, RouterError};

#[test]
fn test_url_then_match_round_trip() {
    let router = Router::with_default_routes().unwrap();
    let params = param_map([("module", "users"), ("action", "edit"), ("item", "7")]);

    let url = router.url("module-action-item", &params).unwrap();
    assert_eq!(url, "users/edit/7");

    let matched = router.match_request(&Method::GET, &url).unwrap();
    let mut expected = params.clone();
    expected.insert("format".into(), "html".into());
    assert_eq!(matched.params, expected);
}

#[test]
fn test_round_trip_with_encoded_values() {
    let mut router = Router::new();
    router.route("tag", "/tags/<:tag>").unwrap();

    let url = router.url("tag", &param_map([("tag", "rust lang")])).unwrap();
    assert_eq!(url, "tags/rust%20lang");

    let matched = router.match_request(&Method::GET, &url).unwrap();
    assert_eq!(matched.get("tag"), Some("rust lang"));
}

#[test]
fn test_optional_group_omitted_when_unset() {
    let mut router = Router::new();
    router.route("list", "/<:module>(/page/<#page>)").unwrap();

    let without = router.url("list", &param_map([("module", "users")])).unwrap();
    assert_eq!(without, "users");

    let with = router
        .url("list", &param_map([("module", "users"), ("page", "3")]))
        .unwrap();
    assert_eq!(with, "users/page/3");

    let matched = router.match_request(&Method::GET, &with).unwrap();
    assert_eq!(matched.get("page"), Some("3"));
    let matched = router.match_request(&Method::GET, &without).unwrap();
    assert_eq!(matched.get("page"), None);
}

#[test]
fn test_optional_default_is_not_written_out() {
    let mut router = Router::new();
    router
        .route("post", "/blog/<:slug>(.<:format>)")
        .unwrap()
        .defaults([("format", "html")]);

    let url = router.url("post", &param_map([("slug", "hello")])).unwrap();
    assert_eq!(url, "blog/hello");

    let matched = router.match_request(&Method::GET, &url).unwrap();
    assert_eq!(matched.get("format"), Some("html"));
}

#[test]
fn test_required_param_falls_back_to_default() {
    let mut router = Router::new();
    router
        .route("module", "/<:module>")
        .unwrap()
        .defaults([("module", "home")]);
    assert_eq!(router.url_for("module").unwrap(), "home");
}

#[test]
fn test_missing_required_param() {
    let router = Router::with_default_routes().unwrap();
    let err = router
        .url("module-item", &param_map([("module", "users")]))
        .unwrap_err();
    assert_eq!(
        err,
        RouterError::MissingParameter {
            route: "module-item".into(),
            param: "item".into()
        }
    );
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn test_unknown_route() {
    let router = Router::with_default_routes().unwrap();
    let err = router.url_for("nope").unwrap_err();
    assert_eq!(err, RouterError::UnknownRoute("nope".into()));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_static_route_url() {
    let mut router = Router::new();
    router.route("about", "/about/team/").unwrap();
    assert_eq!(router.url_for("about").unwrap(), "about/team");
    assert_eq!(
        router
            .url("about", &param_map([("ignored", "x")]))
            .unwrap(),
        "about/team"
    );
    assert_eq!(Router::with_default_routes().unwrap().url_for("home").unwrap(), "");
}
