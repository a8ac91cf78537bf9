use wirecore::{asset, Container, CoreError, CustomProvider, FactoryOptions};

fn chain(core: &Container, from: &str, to: &str) {
    let to = to.to_string();
    core.factory(from, FactoryOptions::new(), {
        let core = core.clone();
        move |_| core.get(&to)
    })
    .unwrap();
}

#[test]
fn self_reference_reports_immediately() {
    let core = Container::new();
    chain(&core, "a", "a");
    core.bootstrap().unwrap();

    match core.get("a") {
        Err(CoreError::Cycle(path)) => assert_eq!(path, vec!["a", "a"]),
        other => panic!("expected cycle, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn cycle_error_carries_the_full_path() {
    let core = Container::new();
    chain(&core, "a", "b");
    chain(&core, "b", "c");
    chain(&core, "c", "a");
    core.bootstrap().unwrap();

    match core.get("a") {
        Err(CoreError::Cycle(path)) => {
            assert_eq!(path, vec!["a", "b", "c", "a"]);
        }
        other => panic!("expected cycle, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn cycle_message_joins_the_path() {
    let core = Container::new();
    chain(&core, "a", "b");
    chain(&core, "b", "a");
    core.bootstrap().unwrap();

    let err = core.get("a").unwrap_err();
    assert_eq!(err.to_string(), r#"cyclic dependency "a -> b -> a""#);
}

#[test]
fn tracking_unwinds_after_a_cycle_error() {
    let core = Container::new();
    chain(&core, "a", "b");
    chain(&core, "b", "a");
    core.constant("ok", 7i32).unwrap();
    core.bootstrap().unwrap();

    assert!(matches!(core.get("a"), Err(CoreError::Cycle(_))));

    // The failed resolution left nothing behind.
    assert_eq!(*core.get_as::<i32>("ok").unwrap(), 7);
    assert!(matches!(core.get("b"), Err(CoreError::Cycle(ref p)) if p == &["b", "a", "b"]));
}

#[test]
fn declared_dependency_cycles_are_caught_too() {
    let core = Container::new();
    core.factory("a", FactoryOptions::new().inject(["b"]), |args| {
        Ok(args.raw(0).cloned().unwrap_or_else(|| asset(())))
    })
    .unwrap();
    core.factory("b", FactoryOptions::new().inject(["a"]), |args| {
        Ok(args.raw(0).cloned().unwrap_or_else(|| asset(())))
    })
    .unwrap();
    core.bootstrap().unwrap();

    match core.get("a") {
        Err(CoreError::Cycle(path)) => assert_eq!(path, vec!["a", "b", "a"]),
        other => panic!("expected cycle, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn cycles_spanning_containers_use_one_path() {
    let parent = Container::new();
    let child = parent.create_child();

    // Raw providers resolve through the requesting container, so the
    // parent's half of the loop closes through the child.
    parent
        .provide("up", |_| {
            CustomProvider::from_get(|injector| injector.get("down"))
        })
        .unwrap();
    child
        .factory("down", FactoryOptions::new().inject(["up"]), |_| {
            Ok(asset(()))
        })
        .unwrap();
    parent.bootstrap().unwrap();

    match child.get("down") {
        Err(CoreError::Cycle(path)) => assert_eq!(path, vec!["down", "up", "down"]),
        other => panic!("expected cycle, got {:?}", other.map(|_| ())),
    }
}
