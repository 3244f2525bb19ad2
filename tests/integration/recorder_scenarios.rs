//! End-to-end recorder behavior through the public API.

use std::sync::Arc;
use std::thread;

use debug_recorder::telemetry::{
    Context, LogLevel, TelemetryRecorder, WebhookExporter, DEFAULT_RECENT_LIMIT,
};
use debug_recorder::config::{RecorderConfig, WebhookConfig};
use serde_json::json;

#[test]
fn overflowing_default_log_buffer_keeps_last_thousand() {
    let recorder = TelemetryRecorder::new();
    for i in 1..=1005 {
        recorder.info(format!("entry {}", i));
    }

    let logs = recorder.recent_logs(i64::MAX);
    assert_eq!(logs.len(), 1000);
    assert_eq!(logs[0].message, "entry 6");
    assert_eq!(logs[999].message, "entry 1005");
}

#[test]
fn overflowing_default_metric_buffer_keeps_last_five_hundred() {
    let recorder = TelemetryRecorder::new();
    for i in 1..=520 {
        recorder.record_metric(format!("op {}", i), i as f64, None);
    }

    let metrics = recorder.recent_metrics(1_000);
    assert_eq!(metrics.len(), 500);
    assert_eq!(metrics[0].name, "op 21");
    assert_eq!(recorder.metric_count(), 500);
}

#[test]
fn timeout_errors_share_a_type() {
    let recorder = TelemetryRecorder::new();
    recorder.record(LogLevel::Error, "Timeout: db call failed", None);
    recorder.record(LogLevel::Error, "Timeout: cache call failed", None);

    let summary = recorder.error_summary();
    assert_eq!(summary.total_errors, 2);
    assert_eq!(summary.error_types.len(), 1);
    assert_eq!(summary.error_types["Timeout"], 2);
}

#[test]
fn mixed_error_messages_are_bucketed() {
    let recorder = TelemetryRecorder::new();
    for message in ["A: x", "A: y", "B: z", "nocolon"] {
        recorder.error(message);
    }
    recorder.warn("A: warnings are not errors");

    let summary = recorder.error_summary();
    assert_eq!(summary.total_errors, 4);
    let types: Vec<(&str, usize)> = summary
        .error_types
        .iter()
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    assert_eq!(types, vec![("A", 2), ("B", 1), ("Unknown", 1)]);
}

#[test]
fn no_errors_yields_empty_summary() {
    let recorder = TelemetryRecorder::new();
    recorder.info("Page loaded");
    recorder.debug("cache warm");

    let summary = recorder.error_summary();
    assert_eq!(summary.total_errors, 0);
    assert!(summary.error_types.is_empty());
    assert!(summary.recent_errors.is_empty());
}

#[test]
fn reads_do_not_mutate_state() {
    let recorder = TelemetryRecorder::new();
    let mut context = Context::new();
    context.insert("route".to_string(), json!("/dashboard"));
    recorder.record(LogLevel::Error, "Render: chart failed", Some(context));
    recorder.info("Page loaded");
    recorder.record_metric("dashboard.render", 33.0, None);

    let logs = recorder.recent_logs(DEFAULT_RECENT_LIMIT);
    let summary = recorder.error_summary();
    let report = recorder.report();
    for _ in 0..3 {
        assert_eq!(recorder.recent_logs(DEFAULT_RECENT_LIMIT), logs);
        assert_eq!(recorder.error_summary(), summary);
        assert_eq!(recorder.report(), report);
    }
}

#[test]
fn report_lists_at_most_ten_of_each() {
    let recorder = TelemetryRecorder::new();
    for i in 0..15 {
        recorder.error(format!("Job {}: failed", i));
        recorder.record_metric(format!("job.{}", i), 1.5, None);
    }

    let report = recorder.report();
    assert!(report.contains("- Total Errors: 15"));
    assert_eq!(report.matches("- [ERROR] ").count(), 10);
    assert_eq!(report.lines().filter(|l| l.starts_with("- job.")).count(), 10);
    assert!(!report.contains("job.4:"));
    assert!(report.contains("- job.14: 1.5ms"));
}

#[test]
fn snapshots_are_independent_copies() {
    let recorder = TelemetryRecorder::new();
    recorder.info("original");
    let mut snapshot = recorder.recent_logs(1);
    snapshot[0].message = "changed".to_string();
    assert_eq!(recorder.recent_logs(1)[0].message, "original");
}

#[test]
fn concurrent_writers_respect_bound_and_per_thread_order() {
    let recorder = Arc::new(TelemetryRecorder::builder().max_logs(1000).build());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let recorder = Arc::clone(&recorder);
            thread::spawn(move || {
                for i in 0..500 {
                    recorder.info(format!("{}:{}", t, i));
                    if i % 50 == 0 {
                        assert!(recorder.log_count() <= 1000);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let logs = recorder.recent_logs(i64::MAX);
    assert_eq!(logs.len(), 1000);
    assert!(logs.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let mut last_seen = [None::<u32>; 8];
    for entry in &logs {
        let (thread_id, seq) = entry.message.split_once(':').unwrap();
        let thread_id: usize = thread_id.parse().unwrap();
        let seq: u32 = seq.parse().unwrap();
        if let Some(prev) = last_seen[thread_id] {
            assert!(seq > prev, "entries from one thread must stay in order");
        }
        last_seen[thread_id] = Some(seq);
    }
}

#[test]
fn unconfigured_webhook_records_without_runtime() {
    let config = RecorderConfig {
        webhook: WebhookConfig::default(),
        ..RecorderConfig::default()
    };
    assert!(WebhookExporter::from_config(&config.webhook).unwrap().is_none());

    let recorder = TelemetryRecorder::new();
    recorder.error("Network error: offline");
    assert_eq!(recorder.log_count(), 1);
}
