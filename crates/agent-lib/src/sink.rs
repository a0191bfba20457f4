//! Metric sinks.
//!
//! The pipelines are parameterized over [`MetricSink`] rather than a
//! concrete output; [`PutvalSink`] speaks the collectd Exec-plugin line
//! protocol and [`RecordingSink`] captures dispatches for inspection.

use crate::models::MetricPoint;
use std::io::Write;
use std::sync::Mutex;
use tracing::warn;

/// Output seam for emitted points.
///
/// `dispatch_as` re-addresses a point to an alternate host identity (leader
/// mirroring, custom host namespecs); sinks that do not distinguish hosts
/// may treat it like `dispatch`.
pub trait MetricSink: Send + Sync {
    fn dispatch(&self, point: &MetricPoint);
    fn dispatch_as(&self, host: &str, point: &MetricPoint);
}

/// collectd naming schema:
/// `host "/" plugin ["-" plugin instance] "/" type ["-" type instance]`.
pub fn identifier(host: &str, point: &MetricPoint) -> String {
    let mut id = format!("{}/{}", host, point.plugin);
    if let Some(instance) = &point.plugin_instance {
        id.push('-');
        id.push_str(instance);
    }
    id.push('/');
    id.push_str(&point.type_name);
    if let Some(instance) = &point.type_instance {
        id.push('-');
        id.push_str(instance);
    }
    id
}

/// Integral values print without a fraction; collectd parses both forms but
/// counters are conventionally integers.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Writes `PUTVAL` lines for the collectd Exec plugin:
/// `PUTVAL "host/plugin-instance/type-instance" interval=N N:v1[:v2]`.
pub struct PutvalSink<W: Write + Send> {
    hostname: String,
    interval_secs: u64,
    writer: Mutex<W>,
}

impl<W: Write + Send> PutvalSink<W> {
    pub fn new(hostname: impl Into<String>, interval_secs: u64, writer: W) -> Self {
        Self {
            hostname: hostname.into(),
            interval_secs,
            writer: Mutex::new(writer),
        }
    }

    pub fn render_line(&self, host: &str, point: &MetricPoint) -> String {
        let values: Vec<String> = point.values.iter().map(|v| format_value(*v)).collect();
        format!(
            "PUTVAL \"{}\" interval={} N:{}",
            identifier(host, point),
            self.interval_secs,
            values.join(":")
        )
    }

    fn write_line(&self, host: &str, point: &MetricPoint) {
        let line = self.render_line(host, point);
        match self.writer.lock() {
            Ok(mut writer) => {
                if let Err(error) = writeln!(writer, "{line}") {
                    warn!(error = %error, "Failed to write PUTVAL line");
                }
            }
            Err(error) => warn!(error = %error, "Sink writer lock poisoned"),
        }
    }
}

impl<W: Write + Send> MetricSink for PutvalSink<W> {
    fn dispatch(&self, point: &MetricPoint) {
        self.write_line(&self.hostname, point);
    }

    fn dispatch_as(&self, host: &str, point: &MetricPoint) {
        self.write_line(host, point);
    }
}

/// One captured dispatch: `host` is `None` for the sink's own identity.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPoint {
    pub host: Option<String>,
    pub point: MetricPoint,
}

/// Sink capturing every dispatch, for tests and dry runs.
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<RecordedPoint>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<RecordedPoint> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&self, host: Option<String>, point: &MetricPoint) {
        if let Ok(mut records) = self.records.lock() {
            records.push(RecordedPoint {
                host,
                point: point.clone(),
            });
        }
    }
}

impl MetricSink for RecordingSink {
    fn dispatch(&self, point: &MetricPoint) {
        self.record(None, point);
    }

    fn dispatch_as(&self, host: &str, point: &MetricPoint) {
        self.record(Some(host.to_string()), point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> MetricPoint {
        MetricPoint::new(
            "web.net",
            Some("if0".to_string()),
            "if_octets",
            None,
            vec![10.0, 20.0],
        )
    }

    #[test]
    fn test_identifier_assembly() {
        let full = MetricPoint::new(
            "sys.cpu",
            Some("0".to_string()),
            "time_ns",
            Some("user".to_string()),
            vec![1.0],
        );
        assert_eq!(identifier("node1", &full), "node1/sys.cpu-0/time_ns-user");

        let bare = MetricPoint::new("sys.cpu", None, "gauge", None, vec![1.0]);
        assert_eq!(identifier("node1", &bare), "node1/sys.cpu/gauge");
    }

    #[test]
    fn test_putval_line_with_value_tuple() {
        let sink = PutvalSink::new("node1", 10, Vec::new());
        assert_eq!(
            sink.render_line("node1", &point()),
            "PUTVAL \"node1/web.net-if0/if_octets\" interval=10 N:10:20"
        );
    }

    #[test]
    fn test_putval_keeps_fractional_values() {
        let sink = PutvalSink::new("node1", 10, Vec::new());
        let point = MetricPoint::new("sys.cpu", None, "gauge", Some("avg".to_string()), vec![0.25]);
        assert_eq!(
            sink.render_line("node1", &point),
            "PUTVAL \"node1/sys.cpu/gauge-avg\" interval=10 N:0.25"
        );
    }

    #[test]
    fn test_recording_sink_distinguishes_hosts() {
        let sink = RecordingSink::new();
        sink.dispatch(&point());
        sink.dispatch_as("mirror", &point());

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].host, None);
        assert_eq!(records[1].host.as_deref(), Some("mirror"));
    }
}
