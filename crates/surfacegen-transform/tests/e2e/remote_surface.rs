//! Deriving the non-blocking remote client from the blocking one.

use surfacegen_ast::{ClassDefinition, Expression, Keyword, MethodDefinition, Parameter, Statement};
use surfacegen_transform::overrides::shutdown_template;
use surfacegen_transform::*;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn policy() -> TransformationPolicy {
    TransformationPolicy::new()
        .with_keep_sync(["search"])
        .with_exclude_methods(["delete_all"])
        .with_async_methods(["search", "upsert", "query"])
}

fn constructor() -> MethodDefinition {
    MethodDefinition::new("__init__")
        .with_param(Parameter::new("url").annotated("str"))
        .with_param(
            Parameter::new("prefer_grpc")
                .annotated("bool")
                .with_default(Expression::bool(false)),
        )
        .with_body(vec![
            Statement::assign(
                Expression::self_attr("_prefer_grpc"),
                Expression::name("prefer_grpc"),
            ),
            Statement::assign(Expression::self_attr("_grpc_channel"), Expression::none()),
            Statement::assign(Expression::self_attr("_aio_grpc_channel"), Expression::none()),
            Statement::ann_assign(
                Expression::self_attr("_aio_grpc_points_client"),
                "Optional[PointsStub]",
                Some(Expression::none()),
            ),
            Statement::assign(
                Expression::self_attr("_grpc_points_client"),
                Expression::none(),
            ),
            Statement::assign(
                Expression::self_attr("http"),
                Expression::name("ApiClient").call_with(
                    vec![],
                    vec![Keyword::new("host", Expression::name("url"))],
                ),
            ),
            Statement::assign(Expression::self_attr("_closed"), Expression::bool(false)),
        ])
}

fn search() -> MethodDefinition {
    MethodDefinition::new("search")
        .with_param(Parameter::new("collection_name").annotated("str"))
        .with_param(Parameter::new("query_vector").annotated("list[float]"))
        .with_returns("list[ScoredPoint]")
        .with_statement(Statement::ret(Some(
            Expression::self_attr("http")
                .attr("points_api")
                .attr("search_points")
                .call(vec![
                    Expression::name("collection_name"),
                    Expression::name("query_vector"),
                ]),
        )))
}

fn upsert() -> MethodDefinition {
    MethodDefinition::new("upsert")
        .with_param(Parameter::new("collection_name").annotated("str"))
        .with_param(Parameter::new("points").annotated("list[PointStruct]"))
        .with_returns("UpdateResult")
        .with_body(vec![
            Statement::if_then(
                Expression::self_attr("_prefer_grpc"),
                vec![Statement::ret(Some(
                    Expression::self_attr("_grpc_points_client")
                        .attr("upsert")
                        .call_with(
                            vec![],
                            vec![
                                Keyword::new("collection_name", Expression::name("collection_name")),
                                Keyword::new("points", Expression::name("points")),
                            ],
                        ),
                ))],
            ),
            Statement::assign(
                Expression::name("hits"),
                Expression::self_attr("search").call(vec![
                    Expression::name("collection_name"),
                    Expression::List { elts: vec![] },
                ]),
            ),
            Statement::ret(Some(
                Expression::self_attr("http")
                    .attr("points_api")
                    .attr("upsert")
                    .call(vec![
                        Expression::name("collection_name"),
                        Expression::name("points"),
                    ]),
            )),
        ])
}

fn delete_all() -> MethodDefinition {
    MethodDefinition::new("delete_all").with_statement(Statement::expr(
        Expression::self_attr("http").attr("delete").call(vec![]),
    ))
}

fn blocking_close() -> MethodDefinition {
    MethodDefinition::new("close")
        .with_param(
            Parameter::new("grpc_grace")
                .annotated("Optional[float]")
                .with_default(Expression::none()),
        )
        .with_body(vec![
            Statement::expr(
                Expression::self_attr("_grpc_channel")
                    .attr("close")
                    .call(vec![]),
            ),
            Statement::expr(Expression::self_attr("http").attr("close").call(vec![])),
        ])
}

fn remote() -> ClassDefinition {
    ClassDefinition::new("QdrantRemote")
        .with_base("QdrantBase")
        .with_method(constructor())
        .with_method(search())
        .with_method(upsert())
        .with_method(delete_all())
        .with_method(blocking_close())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn derives_the_expected_surface() {
    let out = AsyncSurfaceGenerator::new(policy()).generate(&remote()).unwrap();

    assert_eq!(
        out.class.method_names(),
        vec!["__init__", "search", "upsert", "close"]
    );

    let classes: Vec<(&str, MethodClassification)> = out
        .classifications
        .iter()
        .map(|o| (o.name.as_str(), o.classification))
        .collect();
    assert_eq!(
        classes,
        vec![
            ("__init__", MethodClassification::ConstructionOverride),
            ("search", MethodClassification::KeptSync),
            ("upsert", MethodClassification::Converted),
            ("delete_all", MethodClassification::Excluded),
            ("close", MethodClassification::ShutdownOverride),
        ]
    );

    assert_eq!(out.summary.total_methods, 5);
    assert_eq!(out.summary.emitted(), 4);
    assert_eq!(out.summary.stripped_bindings, 2);
    assert_eq!(out.summary.awaited_calls, 2);
    assert!(out.verify_hash());
}

#[test]
fn constructor_loses_only_transport_bindings() {
    let out = AsyncSurfaceGenerator::new(policy()).generate(&remote()).unwrap();
    let init = out.class.method("__init__").unwrap();
    let original = constructor();

    assert!(!init.is_async);
    assert_eq!(init.params, original.params);
    assert_eq!(
        init.body,
        vec![
            original.body[0].clone(),
            original.body[1].clone(),
            original.body[4].clone(),
            original.body[5].clone(),
            original.body[6].clone(),
        ]
    );
}

#[test]
fn kept_sync_method_is_byte_identical() {
    let out = AsyncSurfaceGenerator::new(policy()).generate(&remote()).unwrap();
    assert_eq!(out.class.method("search"), Some(&search()));
}

#[test]
fn converted_method_renders_as_expected() {
    let out = AsyncSurfaceGenerator::new(policy()).generate(&remote()).unwrap();
    let rendered = out.class.method("upsert").unwrap().to_string();
    let expected = "\
async def upsert(self, collection_name: str, points: list[PointStruct]) -> UpdateResult:
    if self._prefer_grpc:
        return await self._grpc_points_client.upsert(collection_name=collection_name, points=points)
    hits = self.search(collection_name, [])
    return await self.http.points_api.upsert(collection_name, points)";
    assert_eq!(rendered, expected);
}

#[test]
fn shutdown_is_replaced_by_template() {
    let out = AsyncSurfaceGenerator::new(policy()).generate(&remote()).unwrap();
    assert_eq!(out.class.method("close"), Some(&shutdown_template()));
}

#[test]
fn generation_is_stable_across_runs() {
    let generator = AsyncSurfaceGenerator::new(policy());
    let first = generator.generate(&remote()).unwrap();
    let second = generator.generate(&first.class).unwrap();

    // A second pass over the derived class changes nothing but counts.
    assert_eq!(second.class, first.class);
    assert_eq!(second.summary.awaited_calls, 0);
    assert_eq!(second.content_hash, first.content_hash);
}

#[test]
fn class_rename_applies_to_header_and_call_sites() {
    let p = policy()
        .with_class_rename("QdrantRemote", "AsyncQdrantRemote")
        .with_class_rename("QdrantBase", "AsyncQdrantBase")
        .with_class_rename("ApiClient", "AsyncApiClient");
    let input = remote().with_method(MethodDefinition::new("query").with_statement(
        Statement::ret(Some(Expression::name("ApiClient").call(vec![]))),
    ));
    let out = AsyncSurfaceGenerator::new(p).generate(&input).unwrap();

    assert_eq!(out.class.name, "AsyncQdrantRemote");
    assert_eq!(out.class.bases, vec!["AsyncQdrantBase".to_string()]);
    assert_eq!(
        out.class.method("query").unwrap().body,
        vec![Statement::ret(Some(Expression::name("AsyncApiClient").call(vec![])))]
    );
    // The constructor is not a converted method; its call sites keep their names.
    assert!(out
        .class
        .method("__init__")
        .unwrap()
        .body
        .contains(&constructor().body[5]));
}

#[test]
fn json_interchange_round_trip() {
    let json = remote().to_json().unwrap();
    let input = ClassDefinition::from_json(&json).unwrap();
    let out = AsyncSurfaceGenerator::new(policy()).generate(&input).unwrap();

    let emitted = out.class.to_json().unwrap();
    let reparsed = ClassDefinition::from_json(&emitted).unwrap();
    assert_eq!(reparsed, out.class);
    assert_eq!(
        GenerationOutput::compute_hash(&reparsed).unwrap(),
        out.content_hash
    );
}

#[test]
fn policy_file_drives_generation() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "keep_sync = [\"search\"]").unwrap();
    writeln!(file, "exclude_methods = [\"delete_all\"]").unwrap();
    writeln!(file, "async_methods = [\"search\", \"upsert\", \"query\"]").unwrap();

    let loaded = TransformationPolicy::load(file.path()).unwrap();
    assert_eq!(loaded, policy());

    let from_file = AsyncSurfaceGenerator::new(loaded).generate(&remote()).unwrap();
    let in_code = AsyncSurfaceGenerator::new(policy()).generate(&remote()).unwrap();
    assert_eq!(from_file.class, in_code.class);
}
