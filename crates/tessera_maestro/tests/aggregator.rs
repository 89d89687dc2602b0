//! End-to-end behavior of the aggregation engine, driven on a paused clock.

use std::sync::Arc;
use std::time::Duration;

use tessera_maestro::{
    AggregatorConfig, ChannelSink, ClearSelector, DiagnosticAggregator, MemorySink, PublishState,
    SinkEvent, DEFAULT_DEBOUNCE,
};
use tessera_patina::{DiagnosticsConfig, Severity, SharedConfig};
use tessera_relief::{Category, Diagnostic, Location, Point, Range, SourceTag};

fn semicolon_expected() -> Diagnostic {
    Diagnostic::error(1005, "';' expected", Location::new(2, 1), Location::new(2, 2))
}

fn not_assignable() -> Diagnostic {
    Diagnostic::error(
        2322,
        "Type 'string' is not assignable to type 'number'.",
        Location::new(1, 5),
        Location::new(1, 9),
    )
}

fn engine_with(config: DiagnosticsConfig) -> DiagnosticAggregator {
    DiagnosticAggregator::with_config(AggregatorConfig {
        debounce: DEFAULT_DEBOUNCE,
        config: Arc::new(config),
    })
    .unwrap()
}

async fn settle() {
    tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn semantic_error_is_published_after_quiet_period() {
    let engine = DiagnosticAggregator::new().unwrap();
    let sink = MemorySink::new();
    engine.set_sink(sink.clone());

    engine.set_errors(SourceTag::semantic(), "/p/a.ts", vec![semicolon_expected()], None);
    assert_eq!(sink.publish_count(), 0);

    settle().await;

    assert_eq!(sink.publish_count(), 1);
    let messages = sink.current();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].severity, Severity::Error);
    assert_eq!(messages[0].excerpt, "';' expected");
    assert_eq!(messages[0].location.file, "/p/a.ts");
    assert_eq!(messages[0].location.position, Range::from_coords(1, 0, 1, 1));
}

#[tokio::test(start_paused = true)]
async fn clearing_a_project_publishes_an_empty_set() {
    let engine = DiagnosticAggregator::new().unwrap();
    let sink = MemorySink::new();
    engine.set_sink(sink.clone());

    engine.set_errors(SourceTag::semantic(), "/p/a.ts", vec![semicolon_expected()], None);
    settle().await;
    assert_eq!(sink.current().len(), 1);

    assert_eq!(engine.clear_file_errors(&ClearSelector::project("/p")), 1);
    settle().await;

    assert_eq!(sink.publish_count(), 2);
    assert_eq!(sink.last_publish(), Some(vec![]));
    assert_eq!(engine.file_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn burst_of_mutations_publishes_once_with_final_state() {
    let engine = DiagnosticAggregator::new().unwrap();
    let sink = MemorySink::new();
    engine.set_sink(sink.clone());

    for line in 1..=20 {
        let diag = Diagnostic::error(
            1005,
            format!("error on line {line}"),
            Location::new(line, 1),
            Location::new(line, 2),
        );
        engine.set_errors(SourceTag::syntactic(), "/p/a.ts", vec![diag], None);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(sink.publish_count(), 0);

    settle().await;

    assert_eq!(sink.publish_count(), 1);
    let messages = sink.current();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].excerpt, "error on line 20");
}

#[tokio::test(start_paused = true)]
async fn identical_set_is_idempotent() {
    let engine = DiagnosticAggregator::new().unwrap();
    let sink = MemorySink::new();
    engine.set_sink(sink.clone());

    engine.set_errors(SourceTag::semantic(), "/p/a.ts", vec![semicolon_expected()], Some("/p/tsconfig.json"));
    settle().await;
    let first = sink.current();

    engine.set_errors(SourceTag::semantic(), "/p/a.ts", vec![semicolon_expected()], Some("/p/tsconfig.json"));
    settle().await;

    assert_eq!(sink.current(), first);
    assert_eq!(engine.file_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn set_replaces_previous_batch() {
    let engine = DiagnosticAggregator::new().unwrap();
    let d1 = Diagnostic::error(1, "d1", Location::new(1, 1), Location::new(1, 5));
    let d2 = Diagnostic::error(2, "d2", Location::new(1, 1), Location::new(1, 5));

    engine.set_errors("tagA", "f.ts", vec![d1], None);
    engine.set_errors("tagA", "f.ts", vec![d2.clone()], None);

    let everything = Range::from_coords(0, 0, 100, 0);
    assert_eq!(engine.errors_in_range("f.ts", everything), vec![d2]);
}

#[tokio::test(start_paused = true)]
async fn tags_are_isolated_but_queried_together() {
    let engine = DiagnosticAggregator::new().unwrap();
    let d1 = Diagnostic::error(1, "d1", Location::new(1, 1), Location::new(1, 5));
    let d2 = Diagnostic::warning(2, "d2", Location::new(3, 1), Location::new(3, 5));

    engine.set_errors("semantic", "f.ts", vec![d1.clone()], None);
    engine.set_errors("syntax", "f.ts", vec![d2.clone()], None);

    let everything = Range::from_coords(0, 0, 100, 0);
    let found = engine.errors_in_range("f.ts", everything);
    assert_eq!(found.len(), 2);
    assert!(found.contains(&d1));
    assert!(found.contains(&d2));
}

#[tokio::test(start_paused = true)]
async fn path_forms_resolve_to_the_same_file() {
    let engine = DiagnosticAggregator::new().unwrap();
    let d = Diagnostic::error(1, "d", Location::new(1, 1), Location::new(1, 5));
    engine.set_errors(SourceTag::semantic(), "a/b.ts", vec![d.clone()], None);

    let p = Point::new(0, 2);
    assert_eq!(engine.errors_at("a\\b.ts", p), vec![d.clone()]);
    assert_eq!(engine.errors_at("./a/c/../b.ts", p), vec![d]);
}

#[tokio::test(start_paused = true)]
async fn ignored_code_is_hidden_from_sink_but_not_queries() {
    let engine = engine_with(DiagnosticsConfig::default().with_ignored_codes(["2322"]));
    let sink = MemorySink::new();
    engine.set_sink(sink.clone());

    engine.set_errors(
        SourceTag::semantic(),
        "/p/a.ts",
        vec![not_assignable(), semicolon_expected()],
        None,
    );
    settle().await;

    let published: Vec<_> = sink.current().into_iter().map(|m| m.excerpt).collect();
    assert_eq!(published, ["';' expected"]);

    let at = engine.errors_at("/p/a.ts", Point::new(0, 6));
    assert_eq!(at, vec![not_assignable()]);
}

#[tokio::test(start_paused = true)]
async fn half_open_range_boundary() {
    let engine = DiagnosticAggregator::new().unwrap();
    // rows [3, 5)
    let d = Diagnostic::error(1, "span", Location::new(4, 1), Location::new(6, 1));
    engine.set_errors(SourceTag::semantic(), "f.ts", vec![d], None);

    assert!(engine
        .errors_in_range("f.ts", Range::from_coords(5, 0, 7, 0))
        .is_empty());
    assert_eq!(
        engine
            .errors_in_range("f.ts", Range::from_coords(4, 0, 6, 0))
            .len(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn no_sink_means_no_publish_but_state_returns_idle() {
    let engine = DiagnosticAggregator::new().unwrap();
    engine.set_errors(SourceTag::semantic(), "/p/a.ts", vec![semicolon_expected()], None);
    assert_eq!(engine.publish_state(), PublishState::Pending);

    settle().await;

    assert_eq!(engine.publish_state(), PublishState::Idle);
    assert!(!engine.has_sink());
    assert_eq!(engine.file_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn new_sink_receives_current_state() {
    let engine = DiagnosticAggregator::new().unwrap();
    engine.set_errors(SourceTag::semantic(), "/p/a.ts", vec![semicolon_expected()], None);
    settle().await;

    let sink = MemorySink::new();
    engine.set_sink(sink.clone());
    assert_eq!(engine.publish_state(), PublishState::Pending);
    assert_eq!(sink.publish_count(), 0);

    settle().await;
    assert_eq!(sink.current().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn replacing_a_sink_hands_back_the_old_one() {
    let engine = DiagnosticAggregator::new().unwrap();
    let first = MemorySink::new();
    let second = MemorySink::new();

    assert!(engine.set_sink(first.clone()).is_none());
    assert!(engine.set_sink(second.clone()).is_some());

    engine.set_errors(SourceTag::semantic(), "/p/a.ts", vec![semicolon_expected()], None);
    settle().await;

    assert_eq!(first.publish_count(), 0);
    assert!(!first.is_disposed());
    assert_eq!(second.publish_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn dispose_clears_and_detaches() {
    let engine = DiagnosticAggregator::new().unwrap();
    let sink = MemorySink::new();
    engine.set_sink(sink.clone());

    engine.set_errors(SourceTag::semantic(), "/p/a.ts", vec![semicolon_expected()], None);
    settle().await;
    assert_eq!(sink.current().len(), 1);

    engine.dispose();
    assert_eq!(sink.clear_count(), 1);
    assert!(sink.current().is_empty());
    assert!(sink.is_disposed());
    assert!(!engine.has_sink());

    engine.set_errors(SourceTag::semantic(), "/p/b.ts", vec![semicolon_expected()], None);
    settle().await;
    assert_eq!(sink.publish_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn dispose_supersedes_pending_publish() {
    let engine = DiagnosticAggregator::new().unwrap();
    let sink = MemorySink::new();
    engine.set_sink(sink.clone());

    engine.set_errors(SourceTag::semantic(), "/p/a.ts", vec![semicolon_expected()], None);
    engine.dispose();
    settle().await;

    assert_eq!(sink.publish_count(), 0);
    assert_eq!(engine.publish_state(), PublishState::Idle);
}

#[tokio::test(start_paused = true)]
async fn clear_is_safe_without_sink() {
    let engine = DiagnosticAggregator::new().unwrap();
    engine.clear();
    engine.dispose();
    assert!(!engine.has_sink());
}

#[tokio::test(start_paused = true)]
async fn trigger_lookup_and_clear() {
    let engine = DiagnosticAggregator::new().unwrap();
    let config = "/p/tsconfig.json";
    engine.set_errors(SourceTag::semantic(), "/p/a.ts", vec![semicolon_expected()], Some(config));
    engine.set_errors(SourceTag::syntactic(), "/p/a.ts", vec![], Some(config));
    engine.set_errors(SourceTag::semantic(), "/p/b.ts", vec![not_assignable()], Some(config));
    engine.set_errors(SourceTag::semantic(), "/q/c.ts", vec![not_assignable()], None);

    let files: Vec<_> = engine
        .files_for_trigger(config)
        .into_iter()
        .map(|p| p.into_string())
        .collect();
    assert_eq!(files, ["/p/a.ts", "/p/b.ts"]);

    assert_eq!(engine.clear_file_errors(&ClearSelector::trigger(config)), 3);
    assert_eq!(engine.file_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn unlocated_diagnostic_is_published_at_origin() {
    let engine = DiagnosticAggregator::new().unwrap();
    let sink = MemorySink::new();
    engine.set_sink(sink.clone());

    engine.set_errors(
        SourceTag::config_file(),
        "/p/tsconfig.json",
        vec![Diagnostic::unlocated(Category::Error, 5023, "Unknown compiler option 'foo'.")],
        None,
    );
    settle().await;

    let messages = sink.current();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].location.position, Range::empty_at(Point::new(0, 0)));
}

#[tokio::test(start_paused = true)]
async fn configuration_changes_apply_on_next_publish() {
    let config = SharedConfig::default();
    let engine = DiagnosticAggregator::with_config(AggregatorConfig {
        debounce: DEFAULT_DEBOUNCE,
        config: Arc::new(config.clone()),
    })
    .unwrap();
    let sink = MemorySink::new();
    engine.set_sink(sink.clone());

    let unused = Diagnostic::new(
        Category::Suggestion,
        6133,
        "'x' is declared but its value is never read.",
        Location::new(1, 7),
        Location::new(1, 8),
    );
    engine.set_errors(SourceTag::suggestion(), "/p/a.ts", vec![unused.clone()], None);
    settle().await;
    assert_eq!(sink.current()[0].severity, Severity::Info);

    config.update(|c| c.suppress_all_diagnostics = true);
    engine.set_errors(SourceTag::suggestion(), "/p/a.ts", vec![unused], None);
    settle().await;
    assert!(sink.current().is_empty());
}

#[tokio::test(start_paused = true)]
async fn channel_sink_sees_full_lifecycle() {
    let engine = DiagnosticAggregator::new().unwrap();
    let (sink, mut events) = ChannelSink::new();
    engine.set_sink(sink);

    engine.set_errors(SourceTag::semantic(), "/p/a.ts", vec![semicolon_expected()], None);
    settle().await;
    engine.dispose();

    match events.recv().await {
        Some(SinkEvent::Publish(messages)) => assert_eq!(messages.len(), 1),
        other => panic!("expected a publish, got {other:?}"),
    }
    assert_eq!(events.recv().await, Some(SinkEvent::Clear));
    assert_eq!(events.recv().await, Some(SinkEvent::Dispose));
}
