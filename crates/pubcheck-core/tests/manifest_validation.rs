//! End-to-end validation behavior for the audiobook-manifest variant

use proptest::prelude::*;
use pubcheck_core::{validate, Document, Error, NodePath, RuleSet, Severity};
use serde_json::{json, Value};

fn rules() -> RuleSet {
    RuleSet::standard()
}

/// One reading-order item with a matching resource entry, correct media
/// type, and consistent durations.
fn canonical_manifest() -> Value {
    json!({
        "@context": "https://readium.org/webpub-manifest/context.jsonld",
        "metadata": {
            "@type": "https://schema.org/Audiobook",
            "identifier": "urn:isbn:9780000000001",
            "title": "Example Audiobook",
            "modified": "2024-03-01T12:00:00Z",
            "duration": 60.0
        },
        "readingOrder": [
            {"href": "track1.mp3", "type": "audio/mpeg", "duration": 60.0}
        ],
        "resources": [
            {"href": "track1.mp3", "type": "audio/mpeg"}
        ]
    })
}

fn validate_manifest(raw: &Value) -> pubcheck_core::Report {
    let document = Document::parse_manifest(raw).expect("manifest should parse");
    validate(&document, &rules()).expect("no rule defects")
}

#[test]
fn canonical_valid_manifest_has_no_findings() {
    let report = validate_manifest(&canonical_manifest());
    assert!(report.is_valid());
    assert_eq!(report.findings().len(), 0, "unexpected: {:?}", report.findings());
}

#[test]
fn validation_is_deterministic() {
    let raw = json!({
        "metadata": {"title": "Messy Book", "duration": 50.0},
        "readingOrder": [
            {"href": "a.mp3", "duration": 30.0},
            {"href": "a.mp3", "type": "text/html", "duration": 30.0}
        ],
        "resources": []
    });
    let document = Document::parse_manifest(&raw).unwrap();
    let rule_set = rules();
    let first = validate(&document, &rule_set).unwrap();
    let second = validate(&document, &rule_set).unwrap();
    assert_eq!(first.findings(), second.findings());
    assert!(!first.findings().is_empty());
}

#[test]
fn dangling_reference_is_a_single_error_at_the_item() {
    let mut raw = canonical_manifest();
    raw["readingOrder"]
        .as_array_mut()
        .unwrap()
        .push(json!({"href": "track2.mp3", "type": "audio/mpeg"}));
    raw["metadata"].as_object_mut().unwrap().remove("duration");

    let report = validate_manifest(&raw);
    assert!(!report.is_valid());
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1, "unexpected: {errors:?}");
    assert_eq!(errors[0].rule, "internal-href-resolves");
    assert_eq!(errors[0].path.to_string(), "$.readingOrder[1]");
    assert!(errors[0].message.contains("track2.mp3"));
}

#[test]
fn external_reading_order_hrefs_need_no_resource_entry() {
    let mut raw = canonical_manifest();
    raw["readingOrder"][0]["href"] = json!("https://cdn.example.org/track1.mp3");
    raw["resources"] = json!([]);
    let report = validate_manifest(&raw);
    assert!(report.is_valid(), "unexpected: {:?}", report.findings());
}

#[test]
fn duration_mismatch_is_a_warning_not_an_error() {
    let mut raw = canonical_manifest();
    raw["metadata"]["duration"] = json!(100.0);
    raw["readingOrder"][0]["duration"] = json!(101.0);

    let report = validate_manifest(&raw);
    assert!(report.is_valid(), "warnings must not fail validation");
    let warnings: Vec<_> = report.warnings().collect();
    assert_eq!(warnings.len(), 1, "unexpected: {warnings:?}");
    assert_eq!(warnings[0].rule, "total-duration-consistency");
    assert_eq!(warnings[0].severity, Severity::Warning);
    assert_eq!(warnings[0].path.to_string(), "$.metadata.duration");
}

#[test]
fn duration_within_tolerance_is_accepted() {
    let mut raw = canonical_manifest();
    raw["metadata"]["duration"] = json!(60.4);
    let report = validate_manifest(&raw);
    assert_eq!(report.warning_count(), 0, "unexpected: {:?}", report.findings());
}

#[test]
fn missing_reading_order_is_structural_not_a_finding() {
    let raw = json!({"metadata": {"title": "No Tracks"}});
    let err = Document::parse_manifest(&raw).unwrap_err();
    match err {
        Error::Structural { path, reason } => {
            assert_eq!(path, "$");
            assert!(reason.contains("readingOrder"));
        }
        other => panic!("expected Structural, got {other:?}"),
    }
}

#[test]
fn metadata_map_reordering_does_not_change_the_report() {
    let a = json!({
        "metadata": {
            "title": "Order Test",
            "identifier": "urn:isbn:9780000000002",
            "x-vendor-a": 1,
            "x-vendor-b": 2
        },
        "readingOrder": [{"href": "t.mp3", "type": "audio/mpeg"}],
        "resources": [{"href": "t.mp3", "type": "audio/mpeg"}]
    });
    let b = json!({
        "resources": [{"href": "t.mp3", "type": "audio/mpeg"}],
        "readingOrder": [{"href": "t.mp3", "type": "audio/mpeg"}],
        "metadata": {
            "x-vendor-b": 2,
            "x-vendor-a": 1,
            "identifier": "urn:isbn:9780000000002",
            "title": "Order Test"
        }
    });
    assert_eq!(validate_manifest(&a).findings(), validate_manifest(&b).findings());
}

#[test]
fn every_injected_violation_is_reported_at_its_location() {
    let raw = json!({
        "metadata": {
            "title": "Broken Book",
            "identifier": "not a uri",
            "modified": "yesterday",
            "duration": -5.0
        },
        "readingOrder": [
            {"href": "a.mp3", "type": "audio/mpeg", "duration": 10.0},
            {"href": "a.mp3", "type": "text/plain", "duration": 10.0},
            {"href": "missing.mp3"}
        ],
        "resources": [
            {"href": "a.mp3", "type": "audio/mpeg"},
            {"href": "cover.jpg"}
        ],
        "toc": [
            {"href": "a.mp3#t=0"},
            {"href": "elsewhere.mp3#t=0", "title": "Ghost"}
        ]
    });
    let report = validate_manifest(&raw);

    let expected: &[(&str, &str)] = &[
        ("identifier-well-formed", "$.metadata.identifier"),
        ("datetime-well-formed", "$.metadata.modified"),
        ("non-negative-duration", "$.metadata.duration"),
        ("audio-media-type", "$.readingOrder[1].type"),
        ("duplicate-reading-order-href", "$.readingOrder[1]"),
        ("audio-media-type", "$.readingOrder[2]"),
        ("internal-href-resolves", "$.readingOrder[2]"),
        ("media-type-declared", "$.resources[1]"),
        ("toc-entry-title", "$.toc[0]"),
        ("toc-href-in-reading-order", "$.toc[1]"),
    ];
    for (rule, path) in expected {
        assert!(
            report
                .findings()
                .iter()
                .any(|f| f.rule == *rule && f.path.to_string() == *path),
            "missing {rule} at {path}; got {:?}",
            report.findings()
        );
    }
}

#[test]
fn empty_reading_order_is_an_error() {
    let raw = json!({"metadata": {"title": "Empty"}, "readingOrder": []});
    let report = validate_manifest(&raw);
    assert!(!report.is_valid());
    assert!(report
        .errors()
        .any(|f| f.rule == "reading-order-not-empty" && f.path.to_string() == "$.readingOrder"));
}

#[test]
fn findings_under_groups_by_subtree() {
    let mut raw = canonical_manifest();
    raw["readingOrder"]
        .as_array_mut()
        .unwrap()
        .push(json!({"href": "track2.mp3", "type": "audio/mpeg"}));
    raw["metadata"].as_object_mut().unwrap().remove("duration");
    let report = validate_manifest(&raw);

    let prefix = NodePath::root().key("readingOrder");
    assert_eq!(report.findings_under(&prefix).count(), report.findings().len());
    let metadata_prefix = NodePath::root().key("metadata");
    assert_eq!(report.findings_under(&metadata_prefix).count(), 0);
}

proptest! {
    /// The duration warning fires exactly when the mismatch exceeds the
    /// tolerance, for any track split.
    #[test]
    fn duration_warning_matches_tolerance(
        durations in proptest::collection::vec(0.0f64..10_000.0, 1..10),
        offset in -100.0f64..100.0,
    ) {
        let sum: f64 = durations.iter().sum();
        let declared = sum + offset;
        let items: Vec<Value> = durations
            .iter()
            .enumerate()
            .map(|(i, d)| json!({"href": format!("t{i}.mp3"), "type": "audio/mpeg", "duration": d}))
            .collect();
        let resources: Vec<Value> = durations
            .iter()
            .enumerate()
            .map(|(i, _)| json!({"href": format!("t{i}.mp3"), "type": "audio/mpeg"}))
            .collect();
        let raw = json!({
            "metadata": {
                "title": "Prop Book",
                "identifier": "urn:isbn:9780000000003",
                "duration": declared
            },
            "readingOrder": items,
            "resources": resources
        });

        let document = Document::parse_manifest(&raw).unwrap();
        let report = validate(&document, &RuleSet::standard()).unwrap();
        let mismatches = report
            .findings()
            .iter()
            .filter(|f| f.rule == "total-duration-consistency")
            .count();

        // Stay away from the exact boundary, where float error decides.
        let distance = (declared - sum).abs();
        if distance > 0.51 {
            prop_assert_eq!(mismatches, 1);
        } else if distance < 0.49 {
            prop_assert_eq!(mismatches, 0);
        }
        prop_assert!(report.findings().iter().all(|f| f.path.to_string().starts_with('$')));
    }
}
