use femtocode::{from_json_str, to_json_string, Endpoint, FemtoResult, FemtocodeError, Schema};

#[test]
fn hand_written_json_fills_in_the_defaults() -> FemtoResult<()> {
    // min and max default to the finite extremes
    let parsed = from_json_str(r#"{"type": "integer", "min": 0}"#)?;
    assert_eq!(
        parsed,
        Schema::number(Endpoint::Closed(0.0), Endpoint::ALMOST_INF, true)?
    );

    // a collection defaults to any length, unordered
    let parsed = from_json_str(r#"{"type": "collection", "items": "real"}"#)?;
    assert_eq!(parsed, Schema::collection_of(Schema::real()));
    Ok(())
}

#[test]
fn a_schema_catalog_round_trips_through_text() -> FemtoResult<()> {
    let schemas = [
        Schema::number(Endpoint::Open(0.0), Endpoint::Closed(1.0), false)?,
        Schema::boolean_just(true),
        Schema::impossible_because("records why"),
        Schema::string_sized(
            femtocode::Charset::Bytes,
            Endpoint::Closed(1.0),
            Endpoint::Closed(255.0),
        )?,
        Schema::record_of([
            ("id", Schema::integer_range(0.0, 1e9)?),
            ("tags", Schema::collection_of(Schema::string())),
        ])?,
        femtocode::union(&[Schema::null(), Schema::real()])?,
    ];
    for schema in schemas {
        let text = to_json_string(&schema);
        assert_eq!(from_json_str(&text)?, schema, "through {}", text);
    }
    Ok(())
}

#[test]
fn a_linked_list_declaration_resolves_on_parse() -> FemtoResult<()> {
    let parsed = from_json_str(
        r#"{
            "type": "record",
            "alias": "list",
            "fields": {
                "head": "real",
                "tail": {
                    "type": "union",
                    "possibilities": ["null", {"alias": "list"}]
                }
            }
        }"#,
    )?;
    let tail = match &parsed {
        Schema::Record { fields, .. } => &fields["tail"],
        other => panic!("expected a record, got {}", other.kind()),
    };
    match tail {
        Schema::Union { possibilities } => {
            assert!(possibilities
                .iter()
                .any(|p| matches!(p, Schema::Ref(r) if r.name() == "list" && r.target().is_some())));
        }
        other => panic!("expected a union, got {}", other.kind()),
    }

    // and back out: the reference serializes as a one-key alias object
    let text = to_json_string(&parsed);
    assert!(text.contains(r#"{"alias":"list"}"#));
    assert_eq!(from_json_str(&text)?, parsed);
    Ok(())
}

#[test]
fn a_reference_to_nowhere_is_a_resolution_error() {
    let err = from_json_str(r#"{"type": "collection", "items": {"alias": "ghost"}}"#).unwrap_err();
    assert!(matches!(err, FemtocodeError::Resolution(_)), "{}", err);
}

#[test]
fn malformed_documents_report_where_they_broke() {
    let cases = [
        (r#"{"type": "wibble"}"#, "$.type"),
        (r#"{"type": "real", "min": {"nearly": 3}}"#, "$.min"),
        (
            r#"{"type": "record", "fields": {"a": {"type": "real", "max": true}}}"#,
            "$.fields.a.max",
        ),
        (
            r#"{"type": "union", "possibilities": [7]}"#,
            "$.possibilities[0]",
        ),
    ];
    for (text, expected_path) in cases {
        match from_json_str(text).unwrap_err() {
            FemtocodeError::Json { path, .. } => assert_eq!(path, expected_path, "for {}", text),
            other => panic!("expected a json error for {}, got {}", text, other),
        }
    }
}

#[test]
fn an_inverted_interval_is_rejected_at_its_path() {
    let err = from_json_str(r#"{"type": "real", "min": 5, "max": 2}"#).unwrap_err();
    match err {
        FemtocodeError::Json { message, path } => {
            assert_eq!(path, "$");
            assert!(message.contains("min"));
        }
        other => panic!("expected a json error, got {}", other),
    }
}
