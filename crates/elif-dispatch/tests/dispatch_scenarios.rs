//! Integration tests for request dispatching
//!
//! Builds small resource trees the way an application would register them
//! and checks the selected method, bound variables and negotiated type for
//! each request, along with the 404/405/415/406 outcomes.

use elif_dispatch::{
    DispatchError, DispatchOutcome, DispatchRequest, Dispatched, Dispatcher, HttpMethod, LocatorError,
    MediaType, ResourceMethod, ResourceNode, ResourceTree, SubResourceLocator,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

/// `/orders/{id}` with an `/items` locator leading to a GET-only resource
fn orders_tree() -> ResourceTree {
    let items = Arc::new(
        ResourceNode::builder("order_items")
            .method(ResourceMethod::get("list_items").produces("application/json"))
            .build(),
    );

    ResourceTree::builder()
        .root(
            ResourceNode::builder("order")
                .path("/orders/{id}")
                .method(ResourceMethod::get("show_order").produces("application/json"))
                .locator(SubResourceLocator::to_node("items", "/items", items))
                .build(),
        )
        .build()
}

fn dispatched(outcome: DispatchOutcome) -> Dispatched {
    outcome.into_dispatched().expect("expected a matched method")
}

#[test]
fn test_sub_resource_scenario() {
    let dispatcher = Dispatcher::new(orders_tree());
    let request = DispatchRequest::get("/orders/42/items").with_accept("application/json");

    let result = dispatched(dispatcher.dispatch(&request).unwrap());

    assert_eq!(result.resource.name(), "order_items");
    assert_eq!(result.method.id(), "list_items");
    assert_eq!(result.binding("id"), Some("42"));
    assert_eq!(result.bindings.len(), 1);
    assert_eq!(result.media_type, MediaType::application_json());
    assert_eq!(result.matched_uris, vec!["/orders/42/items", "/orders/42"]);
}

#[test]
fn test_missing_verb_is_method_not_allowed() {
    let dispatcher = Dispatcher::new(orders_tree());
    let err = dispatcher
        .dispatch(&DispatchRequest::post("/orders/42/items"))
        .unwrap_err();

    let allowed = err.allowed_methods().expect("405 carries the allowed methods");
    assert!(allowed.contains(&HttpMethod::GET));
    assert!(!allowed.contains(&HttpMethod::POST));
    assert_eq!(err.status_code(), http::StatusCode::METHOD_NOT_ALLOWED);

    let response = err.to_response();
    assert_eq!(response.headers()[http::header::ALLOW], "GET, HEAD");
}

#[test]
fn test_unknown_root_is_not_found() {
    let dispatcher = Dispatcher::new(orders_tree());

    for path in ["/customers/1", "/", "", "/ordersX/1"] {
        let err = dispatcher.dispatch(&DispatchRequest::get(path)).unwrap_err();
        assert!(matches!(err, DispatchError::NotFound { .. }), "path {path:?}");
    }
}

#[test]
fn test_unknown_sub_path_is_not_found() {
    let dispatcher = Dispatcher::new(orders_tree());
    let err = dispatcher
        .dispatch(&DispatchRequest::get("/orders/42/payments"))
        .unwrap_err();
    assert_eq!(err, DispatchError::not_found("/orders/42/payments"));
    assert_eq!(err.status_code(), http::StatusCode::NOT_FOUND);
}

#[test]
fn test_literal_template_beats_variable_template() {
    let tree = ResourceTree::builder()
        .root(
            ResourceNode::builder("by_name")
                .path("/a/{x}")
                .method(ResourceMethod::get("variable"))
                .build(),
        )
        .root(
            ResourceNode::builder("literal")
                .path("/a/b")
                .method(ResourceMethod::get("literal"))
                .build(),
        )
        .build();
    let dispatcher = Dispatcher::new(tree);

    let result = dispatched(dispatcher.dispatch(&DispatchRequest::get("/a/b")).unwrap());
    assert_eq!(result.method.id(), "literal");
    assert!(result.bindings.is_empty());

    let result = dispatched(dispatcher.dispatch(&DispatchRequest::get("/a/c")).unwrap());
    assert_eq!(result.method.id(), "variable");
    assert_eq!(result.binding("x"), Some("c"));
}

#[test]
fn test_literal_sub_resource_method_beats_variable_one() {
    let tree = ResourceTree::builder()
        .root(
            ResourceNode::builder("a")
                .path("/a")
                .method(ResourceMethod::get("variable").path("/{x}"))
                .method(ResourceMethod::get("literal").path("/b"))
                .build(),
        )
        .build();
    let dispatcher = Dispatcher::new(tree);

    let result = dispatched(dispatcher.dispatch(&DispatchRequest::get("/a/b")).unwrap());
    assert_eq!(result.method.id(), "literal");
}

#[test]
fn test_sub_resource_method_wins_tie_with_locator() {
    let child = Arc::new(
        ResourceNode::builder("child")
            .method(ResourceMethod::get("child_get"))
            .build(),
    );
    let tree = ResourceTree::builder()
        .root(
            ResourceNode::builder("parent")
                .path("/parent")
                .locator(SubResourceLocator::to_node("child", "/{name}", child))
                .method(ResourceMethod::get("parent_get").path("/{name}"))
                .build(),
        )
        .build();

    let result = dispatched(
        Dispatcher::new(tree)
            .dispatch(&DispatchRequest::get("/parent/x"))
            .unwrap(),
    );
    assert_eq!(result.method.id(), "parent_get");
    assert_eq!(result.resource.name(), "parent");
}

#[test]
fn test_repeated_variable_must_match_same_text() {
    let tree = ResourceTree::builder()
        .root(
            ResourceNode::builder("mirror")
                .path("/{x}/{x}")
                .method(ResourceMethod::get("mirror"))
                .build(),
        )
        .build();
    let dispatcher = Dispatcher::new(tree);

    let result = dispatched(dispatcher.dispatch(&DispatchRequest::get("/foo/foo")).unwrap());
    assert_eq!(result.binding("x"), Some("foo"));

    let err = dispatcher.dispatch(&DispatchRequest::get("/foo/bar")).unwrap_err();
    assert!(matches!(err, DispatchError::NotFound { .. }));
}

#[test]
fn test_head_falls_back_to_get() {
    let dispatcher = Dispatcher::new(orders_tree());
    let request = DispatchRequest::new(HttpMethod::HEAD, "/orders/42");

    let result = dispatched(dispatcher.dispatch(&request).unwrap());
    assert_eq!(result.method.id(), "show_order");
    assert_eq!(result.method.http_method(), &HttpMethod::GET);
}

#[test]
fn test_head_method_preferred_over_get() {
    let tree = ResourceTree::builder()
        .root(
            ResourceNode::builder("files")
                .path("/files")
                .method(ResourceMethod::get("download"))
                .method(ResourceMethod::new("probe", HttpMethod::HEAD))
                .build(),
        )
        .build();

    let result = dispatched(
        Dispatcher::new(tree)
            .dispatch(&DispatchRequest::new(HttpMethod::HEAD, "/files"))
            .unwrap(),
    );
    assert_eq!(result.method.id(), "probe");
}

#[test]
fn test_options_lists_allowed_methods() {
    let tree = ResourceTree::builder()
        .root(
            ResourceNode::builder("orders")
                .path("/orders")
                .method(ResourceMethod::get("list"))
                .method(ResourceMethod::post("create"))
                .build(),
        )
        .build();

    let outcome = Dispatcher::new(tree)
        .dispatch(&DispatchRequest::new(HttpMethod::OPTIONS, "/orders"))
        .unwrap();

    let expected: BTreeSet<HttpMethod> = [HttpMethod::GET, HttpMethod::HEAD, HttpMethod::POST]
        .into_iter()
        .collect();
    assert_eq!(outcome.allowed_methods(), Some(&expected));
    assert!(outcome.dispatched().is_none());
}

#[test]
fn test_entity_type_selects_consuming_method() {
    let tree = ResourceTree::builder()
        .root(
            ResourceNode::builder("uploads")
                .path("/uploads")
                .method(ResourceMethod::post("upload_json").consumes("application/json"))
                .method(ResourceMethod::post("upload_text").consumes("text/*"))
                .build(),
        )
        .build();
    let dispatcher = Dispatcher::new(tree);

    let request = DispatchRequest::post("/uploads").with_content_type("text/csv");
    let result = dispatched(dispatcher.dispatch(&request).unwrap());
    assert_eq!(result.method.id(), "upload_text");

    let request = DispatchRequest::post("/uploads").with_content_type("application/json; charset=utf-8");
    let result = dispatched(dispatcher.dispatch(&request).unwrap());
    assert_eq!(result.method.id(), "upload_json");

    let request = DispatchRequest::post("/uploads").with_content_type("image/png");
    let err = dispatcher.dispatch(&request).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::UnsupportedMediaType { media_type: Some(ref m) } if m.essence() == "image/png"
    ));
    assert_eq!(err.status_code(), http::StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[test]
fn test_accept_header_selects_producing_method() {
    let tree = ResourceTree::builder()
        .root(
            ResourceNode::builder("report")
                .path("/report")
                .method(ResourceMethod::get("report_json").produces("application/json"))
                .method(ResourceMethod::get("report_html").produces("text/html"))
                .build(),
        )
        .build();
    let dispatcher = Dispatcher::new(tree);

    let request = DispatchRequest::get("/report").with_accept("text/html, application/json;q=0.5");
    let result = dispatched(dispatcher.dispatch(&request).unwrap());
    assert_eq!(result.method.id(), "report_html");
    assert_eq!(result.media_type, MediaType::new("text", "html"));

    let request = DispatchRequest::get("/report").with_accept("text/html;q=0.2, application/json");
    let result = dispatched(dispatcher.dispatch(&request).unwrap());
    assert_eq!(result.method.id(), "report_json");

    let request = DispatchRequest::get("/report").with_accept("image/png");
    let err = dispatcher.dispatch(&request).unwrap_err();
    assert!(matches!(err, DispatchError::NotAcceptable { .. }));
    assert_eq!(err.status_code(), http::StatusCode::NOT_ACCEPTABLE);
}

#[test]
fn test_forced_media_type_skips_negotiation() {
    let dispatcher = Dispatcher::new(orders_tree());
    let request = DispatchRequest::get("/orders/42").with_forced_media_type(MediaType::text_plain());

    let result = dispatched(dispatcher.dispatch(&request).unwrap());
    assert_eq!(result.media_type, MediaType::text_plain());
}

#[test]
fn test_matrix_parameters_are_ignored() {
    let dispatcher = Dispatcher::new(orders_tree());
    let request = DispatchRequest::get("/orders;version=2/42/items;page=3");

    let result = dispatched(dispatcher.dispatch(&request).unwrap());
    assert_eq!(result.method.id(), "list_items");
    assert_eq!(result.binding("id"), Some("42"));
}

#[test]
fn test_trailing_slash_is_accepted() {
    let dispatcher = Dispatcher::new(orders_tree());

    let result = dispatched(dispatcher.dispatch(&DispatchRequest::get("/orders/42/")).unwrap());
    assert_eq!(result.method.id(), "show_order");

    let result = dispatched(dispatcher.dispatch(&DispatchRequest::get("/orders/42/items/")).unwrap());
    assert_eq!(result.method.id(), "list_items");
}

#[test]
fn test_locator_sees_bindings_so_far() {
    let tree = ResourceTree::builder()
        .root(
            ResourceNode::builder("tenants")
                .path("/tenants/{tenant}")
                .sub_resource("projects", "/projects", |bindings| {
                    let tenant = bindings
                        .get("tenant")
                        .ok_or_else(|| LocatorError::new("tenant not bound"))?;
                    if tenant == "suspended" {
                        return Err(LocatorError::new("tenant suspended"));
                    }
                    Ok(Arc::new(
                        ResourceNode::builder(format!("projects_of_{tenant}"))
                            .method(ResourceMethod::get("list_projects"))
                            .method(ResourceMethod::get("show_project").path("/{project}"))
                            .build(),
                    ))
                })
                .build(),
        )
        .build();
    let dispatcher = Dispatcher::new(tree);

    let result = dispatched(
        dispatcher
            .dispatch(&DispatchRequest::get("/tenants/acme/projects/apollo"))
            .unwrap(),
    );
    assert_eq!(result.resource.name(), "projects_of_acme");
    assert_eq!(result.method.id(), "show_project");
    assert_eq!(result.binding("tenant"), Some("acme"));
    assert_eq!(result.binding("project"), Some("apollo"));

    let err = dispatcher
        .dispatch(&DispatchRequest::get("/tenants/suspended/projects"))
        .unwrap_err();
    assert_eq!(err, DispatchError::locator_failed("projects", "tenant suspended"));
}

#[test]
fn test_dispatch_http_request() {
    let dispatcher = Dispatcher::new(orders_tree());
    let request = http::Request::builder()
        .method(http::Method::GET)
        .uri("http://localhost/orders/7/items?page=2")
        .header(http::header::ACCEPT, "text/html;q=0.9")
        .header(http::header::ACCEPT, "application/json")
        .body(())
        .unwrap();

    let result = dispatched(dispatcher.dispatch_http(&request).unwrap());
    assert_eq!(result.method.id(), "list_items");
    assert_eq!(result.binding("id"), Some("7"));
    assert_eq!(result.media_type, MediaType::application_json());
}

#[test]
fn test_dispatch_is_deterministic() {
    let dispatcher = Dispatcher::new(orders_tree());
    let request = DispatchRequest::get("/orders/42/items");

    let first = dispatched(dispatcher.dispatch(&request).unwrap()).summary();
    for _ in 0..10 {
        let again = dispatched(dispatcher.dispatch(&request).unwrap()).summary();
        assert_eq!(again, first);
    }
}

#[test]
fn test_dispatch_is_deterministic_across_threads() {
    let dispatcher = Arc::new(Dispatcher::new(orders_tree()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                let path = format!("/orders/{}/items", i % 2);
                let outcome = dispatcher.dispatch(&DispatchRequest::get(path)).unwrap();
                (i % 2, dispatched(outcome).summary())
            })
        })
        .collect();

    for handle in handles {
        let (id, summary) = handle.join().unwrap();
        assert_eq!(summary.method, "list_items");
        assert_eq!(summary.bindings.get("id"), Some(id.to_string().as_str()));
        assert_eq!(summary.media_type, MediaType::application_json());
    }
}

#[test]
fn test_summary_serializes() {
    let dispatcher = Dispatcher::new(orders_tree());
    let result = dispatched(dispatcher.dispatch(&DispatchRequest::get("/orders/42")).unwrap());

    let json = serde_json::to_value(result.summary()).unwrap();
    assert_eq!(json["resource"], "order");
    assert_eq!(json["method"], "show_order");
    assert_eq!(json["bindings"]["id"], "42");
    assert_eq!(json["media_type"], "application/json");
}
