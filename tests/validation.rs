use wirecore::{asset, Container, CustomProvider, FactoryOptions, Key};

#[test]
fn clean_graph_validates() {
    let core = Container::new();
    core.constant("a", 1i32).unwrap();
    core.factory("b", FactoryOptions::new().inject(["a"]), |args| {
        Ok(asset(*args.get::<i32>(0)?))
    })
    .unwrap();

    let report = core.validate();
    assert!(report.is_ok(), "unexpected errors: {:?}", report.errors);
}

#[test]
fn missing_dependencies_are_errors() {
    let core = Container::new();
    core.factory("b", FactoryOptions::new().inject(["ghost"]), |_| {
        Ok(asset(()))
    })
    .unwrap();

    let report = core.validate();
    assert!(!report.is_ok());
    assert!(report
        .errors
        .iter()
        .any(|e| e.contains("\"ghost\"") && e.contains("\"b\"")));
}

#[test]
fn declared_cycles_are_errors_without_materializing() {
    let core = Container::new();
    core.factory("a", FactoryOptions::new().inject(["b"]), |_| Ok(asset(())))
        .unwrap();
    core.factory("b", FactoryOptions::new().inject(["a"]), |_| Ok(asset(())))
        .unwrap();

    let report = core.validate();
    assert!(report.errors.iter().any(|e| e.contains("cyclic dependency")));
}

#[test]
fn queued_providers_count_as_visible() {
    let core = Container::new();
    core.value("later", 1i32).unwrap();
    core.factory("user", FactoryOptions::new().inject(["later"]), |args| {
        Ok(asset(*args.get::<i32>(0)?))
    })
    .unwrap();

    // Not flushed yet, but validation answers for the post-flush graph.
    let report = core.validate();
    assert!(report.is_ok(), "unexpected errors: {:?}", report.errors);
}

#[test]
fn raw_providers_warn_but_do_not_fail() {
    let core = Container::new();
    core.provide("opaque", |_| CustomProvider::from_get(|_| Ok(asset(()))))
        .unwrap();

    let report = core.validate();
    assert!(report.is_ok());
    assert!(report.warnings.iter().any(|w| w.contains("\"opaque\"")));
}

#[test]
fn handle_dependencies_check_existence_but_not_cycles() {
    let core = Container::new();
    // a wants b's handle, b wants a's value; not a materialization cycle.
    core.factory("a", FactoryOptions::new().inject([Key::provider("b")]), |_| {
        Ok(asset(()))
    })
    .unwrap();
    core.factory("b", FactoryOptions::new().inject([Key::asset("a")]), |_| {
        Ok(asset(()))
    })
    .unwrap();

    let report = core.validate();
    assert!(report.is_ok(), "unexpected errors: {:?}", report.errors);
}

#[test]
fn ancestor_assets_satisfy_child_dependencies() {
    let root = Container::new();
    root.constant("shared", 1u8).unwrap();

    let child = root.create_child();
    child
        .factory("user", FactoryOptions::new().inject(["shared"]), |args| {
            Ok(asset(*args.get::<u8>(0)?))
        })
        .unwrap();

    let report = child.validate();
    assert!(report.is_ok(), "unexpected errors: {:?}", report.errors);
}
