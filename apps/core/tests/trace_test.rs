use resultchain_core::config::Config;
use resultchain_core::error::TraceError;
use resultchain_core::observer::MutationSource;
use resultchain_core::reconstructor::SecondRootPolicy;
use resultchain_core::trace::{self, ReplaySource};

const SHUFFLED_TRACE: &str = r#"{
  "sessions": [
    {
      "container": "results",
      "nodes": { "hdr": "header", "a": "result", "b": "result", "c": "result" },
      "batches": [
        [ { "added": ["c"], "previous_sibling": "b" } ],
        [ { "added": ["hdr"] }, { "added": ["a"], "previous_sibling": "hdr" } ],
        [ { "added": ["b"], "previous_sibling": "a" } ]
      ]
    },
    {
      "container": "results",
      "nodes": { "x": "result", "y": "result" },
      "batches": [ [ { "added": ["y"], "previous_sibling": "x" } ] ]
    }
  ]
}"#;

#[test]
fn replays_each_session_in_reconstructed_order() {
    let trace = trace::parse(SHUFFLED_TRACE, false).unwrap();
    let reports = trace::replay(&trace, &Config::default());

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].linked, vec!["a", "b", "c"]);
    assert_eq!(reports[0].pending, 0);
    assert_eq!(reports[0].segments, 1);

    assert!(reports[1].linked.is_empty());
    assert_eq!(reports[1].pending, 1);
}

#[test]
fn entry_kind_comes_from_config() {
    let trace = trace::parse(SHUFFLED_TRACE, false).unwrap();
    let config = Config {
        entry_kind: "header".into(),
        ..Default::default()
    };

    let reports = trace::replay(&trace, &config);
    assert_eq!(reports[0].linked, vec!["hdr"]);
}

#[test]
fn second_root_policy_comes_from_config() {
    let raw = r#"{ "sessions": [ {
        "container": "results",
        "nodes": { "a": "result", "b": "result" },
        "batches": [ [ { "added": ["a"] }, { "added": ["b"] } ] ]
    } ] }"#;
    let trace = trace::parse(raw, false).unwrap();

    let reject = Config {
        second_root: SecondRootPolicy::Reject,
        ..Default::default()
    };
    assert_eq!(trace::replay(&trace, &reject)[0].linked, vec!["a"]);

    let new_chain = trace::replay(&trace, &Config::default());
    assert_eq!(new_chain[0].linked, vec!["a", "b"]);
    assert_eq!(new_chain[0].segments, 2);
}

#[test]
fn loads_json5_trace_with_comments() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json5");
    std::fs::write(
        &path,
        r#"{
          // recorded from a slow render
          sessions: [
            {
              container: 'results',
              nodes: { a: 'result', b: 'result', },
              batches: [
                [ { added: ['b'], previous_sibling: 'a' } ],
                [ { added: ['a'], previous_sibling: null } ],
              ],
            },
          ],
        }"#,
    )
    .unwrap();

    let trace = trace::load(&path).unwrap();
    let reports = trace::replay(&trace, &Config::default());
    assert_eq!(reports[0].linked, vec!["a", "b"]);
}

#[test]
fn undeclared_node_is_rejected() {
    let raw = r#"{ "sessions": [ {
        "container": "results",
        "nodes": { "a": "result" },
        "batches": [ [ { "added": ["a"], "previous_sibling": "ghost" } ] ]
    } ] }"#;

    match trace::parse(raw, false) {
        Err(TraceError::UnknownNode { session, node }) => {
            assert_eq!(session, 0);
            assert_eq!(node, "ghost");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn missing_trace_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    assert!(matches!(trace::load(&path), Err(TraceError::Read { .. })));
}

#[test]
fn replay_source_tracks_active_observation() {
    let mut source = ReplaySource::default();
    let first = source.observe(&"results".to_string());
    let second = source.observe(&"results".to_string());

    source.disconnect(first);
    assert_eq!(source.active(), Some(second));
    source.disconnect(second);
    assert_eq!(source.active(), None);
}
