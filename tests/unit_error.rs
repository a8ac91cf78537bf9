use wirecore::{Container, CoreError, CoreResult};

#[test]
fn display_messages_are_stable() {
    let cases = [
        (
            CoreError::DuplicateIdentifier("foo".into()),
            r#""foo" has already been registered"#,
        ),
        (
            CoreError::NotFound("foo".into()),
            r#"dependency "foo" not found"#,
        ),
        (
            CoreError::Cycle(vec!["foo".into(), "bar".into(), "baz".into(), "foo".into()]),
            r#"cyclic dependency "foo -> bar -> baz -> foo""#,
        ),
        (
            CoreError::MissingGetMethod("foo".into()),
            r#""foo" provider needs a get function"#,
        ),
        (
            CoreError::InvalidParameter("identifier must be a non-empty string".into()),
            "invalid parameter: identifier must be a non-empty string",
        ),
        (
            CoreError::ConfigDependency("foo".into()),
            r#"config dependency "foo" not found or illegal"#,
        ),
        (
            CoreError::TypeMismatch("foo".into()),
            r#"type mismatch for "foo""#,
        ),
    ];

    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn errors_work_as_std_errors() {
    fn source_of(err: &dyn std::error::Error) -> Option<&(dyn std::error::Error + 'static)> {
        err.source()
    }

    let err = CoreError::NotFound("foo".into());
    assert!(source_of(&err).is_none());

    let boxed: Box<dyn std::error::Error> = Box::new(err);
    assert_eq!(boxed.to_string(), r#"dependency "foo" not found"#);
}

#[test]
fn result_alias_propagates_with_question_mark() {
    fn resolve_pair(core: &Container) -> CoreResult<(u8, u8)> {
        let a = core.get_as::<u8>("a")?;
        let b = core.get_as::<u8>("b")?;
        Ok((*a, *b))
    }

    let core = Container::new();
    core.constant("a", 1u8).unwrap();
    core.constant("b", 2u8).unwrap();
    assert_eq!(resolve_pair(&core).unwrap(), (1, 2));

    let empty = Container::new();
    assert!(matches!(
        resolve_pair(&empty),
        Err(CoreError::NotFound(ref id)) if id == "a"
    ));
}

#[test]
fn errors_are_cloneable_for_reporting() {
    let err = CoreError::Cycle(vec!["a".into(), "a".into()]);
    let copy = err.clone();
    assert_eq!(err.to_string(), copy.to_string());
}
