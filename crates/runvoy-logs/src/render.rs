use chrono::{TimeZone, Utc};
use runvoy_core::{DisplayLine, ExecutionStatus, LogEvent, Sink};

/// Sorts by `(timestamp, original arrival index)` using a stable sort so
/// equal-timestamp events keep the emitter's delivery order, then assigns
/// dense 1-based line numbers by post-sort position.
pub fn order_for_static_render(events: &[LogEvent]) -> Vec<DisplayLine> {
    let mut indexed: Vec<(usize, &LogEvent)> = events.iter().enumerate().collect();
    indexed.sort_by_key(|(idx, ev)| (ev.timestamp, *idx));

    indexed
        .into_iter()
        .enumerate()
        .map(|(pos, (_, ev))| DisplayLine {
            line_number: pos + 1,
            timestamp: ev.timestamp,
            message: ev.trimmed_message().to_string(),
        })
        .collect()
}

/// `YYYY-MM-DD HH:MM:SS` UTC, per the fixed display format.
pub fn format_timestamp(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "????-??-?? ??:??:??".to_string())
}

/// One-shot historical fetch: events already known at `GetLogs` time, with
/// no further updates expected. Renders a 3-column table then the
/// terminal status.
pub fn static_render(sink: &dyn Sink, events: &[LogEvent], status: ExecutionStatus) {
    let lines = order_for_static_render(events);
    let rows: Vec<Vec<String>> = lines
        .iter()
        .map(|l| vec![l.line_number.to_string(), format_timestamp(l.timestamp), l.message.clone()])
        .collect();
    sink.table(&["#", "timestamp", "message"], &rows);
    sink.info(&format!("execution {status}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(ts: i64, msg: &str) -> LogEvent {
        LogEvent { timestamp: ts, message: msg.to_string() }
    }

    #[test]
    fn distinct_timestamps_sort_ascending() {
        let events = vec![ev(300, "c"), ev(100, "a"), ev(200, "b")];
        let lines = order_for_static_render(&events);
        assert_eq!(lines.iter().map(|l| l.message.as_str()).collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(lines.iter().map(|l| l.line_number).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn equal_timestamps_preserve_arrival_order() {
        let events = vec![ev(1762984282441, "a"), ev(1762984282442, "b"), ev(1762984282442, "c")];
        let lines = order_for_static_render(&events);
        assert_eq!(lines.iter().map(|l| l.message.as_str()).collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn formats_fixed_width_utc_timestamp() {
        let millis = Utc.with_ymd_and_hms(2025, 11, 12, 22, 31, 22).unwrap().timestamp_millis();
        assert_eq!(format_timestamp(millis), "2025-11-12 22:31:22");
    }
}
