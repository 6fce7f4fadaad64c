//! In-process request metrics registry.
//!
//! Counter and histogram families with dynamic label values backed by `DashMap`.
//! Label names are fixed per family (const generic arity) and values are kept
//! in declaration order, so the exposition prints `method`, `endpoint`,
//! `http_status` in that order. Series are sorted by label values on render
//! to keep output deterministic.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Prometheus text exposition content type (format 0.0.4).
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_LATENCY: &str = "http_request_latency_seconds";

/// Prometheus client default latency buckets, in seconds. `+Inf` is implicit.
pub const DEFAULT_LATENCY_BUCKETS: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Float rendering used for `le` and `_sum`: integral values keep one decimal.
fn fmt_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

fn owned_key<const N: usize>(values: [&str; N]) -> [String; N] {
    values.map(|v| v.to_owned())
}

fn label_str<const N: usize>(names: &[&str; N], values: &[String; N]) -> String {
    names
        .iter()
        .zip(values.iter())
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn series(name: &str, suffix: &str, labels: &str) -> String {
    if labels.is_empty() {
        format!("{name}{suffix}")
    } else {
        format!("{name}{suffix}{{{labels}}}")
    }
}

pub struct CounterVec<const N: usize> {
    name: &'static str,
    help: &'static str,
    labels: [&'static str; N],
    map: DashMap<[String; N], AtomicU64>,
}

impl<const N: usize> CounterVec<N> {
    pub fn new(name: &'static str, help: &'static str, labels: [&'static str; N]) -> Self {
        Self {
            name,
            help,
            labels,
            map: DashMap::new(),
        }
    }

    /// Increment by 1.
    pub fn inc(&self, values: [&str; N]) {
        self.add(values, 1);
    }

    fn add(&self, values: [&str; N], v: u64) {
        let key = owned_key(values);
        if let Some(counter) = self.map.get(&key) {
            counter.fetch_add(v, Ordering::Relaxed);
            return;
        }
        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of one series (0 if never observed).
    pub fn get(&self, values: [&str; N]) -> u64 {
        self.map
            .get(&owned_key(values))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} counter", self.name);

        let mut rows: Vec<([String; N], u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, val) in rows {
            let labels = label_str(&self.labels, &key);
            let _ = writeln!(out, "{} {}", series(self.name, "", &labels), val);
        }
    }
}

/// Point-in-time view of one histogram series. Bucket counts are cumulative.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    pub buckets: Vec<(f64, u64)>,
    pub sum: f64,
    pub count: u64,
}

struct HistogramSeries {
    // per-bucket (non-cumulative); values above the last bound only reach `count`
    counts: Vec<u64>,
    sum: f64,
    count: u64,
}

impl HistogramSeries {
    fn new(buckets: usize) -> Self {
        Self {
            counts: vec![0; buckets],
            sum: 0.0,
            count: 0,
        }
    }

    fn observe(&mut self, bounds: &[f64], v: f64) {
        if let Some(i) = bounds.iter().position(|&le| v <= le) {
            self.counts[i] += 1;
        }
        self.sum += v;
        self.count += 1;
    }

    fn snapshot(&self, bounds: &[f64]) -> HistogramSnapshot {
        let mut acc = 0;
        let buckets = bounds
            .iter()
            .zip(self.counts.iter())
            .map(|(&le, &c)| {
                acc += c;
                (le, acc)
            })
            .collect();
        HistogramSnapshot {
            buckets,
            sum: self.sum,
            count: self.count,
        }
    }
}

/// Histogram family. A series is mutated under its DashMap shard write lock,
/// so `count`, `sum` and the buckets always move together.
pub struct HistogramVec<const N: usize> {
    name: &'static str,
    help: &'static str,
    labels: [&'static str; N],
    bounds: &'static [f64],
    map: DashMap<[String; N], HistogramSeries>,
}

impl<const N: usize> HistogramVec<N> {
    pub fn new(
        name: &'static str,
        help: &'static str,
        labels: [&'static str; N],
        bounds: &'static [f64],
    ) -> Self {
        Self {
            name,
            help,
            labels,
            bounds,
            map: DashMap::new(),
        }
    }

    /// Observe a duration, recorded in seconds.
    pub fn observe(&self, values: [&str; N], duration: Duration) {
        let secs = duration.as_secs_f64();
        let mut entry = self
            .map
            .entry(owned_key(values))
            .or_insert_with(|| HistogramSeries::new(self.bounds.len()));
        entry.observe(self.bounds, secs);
    }

    pub fn snapshot(&self, values: [&str; N]) -> Option<HistogramSnapshot> {
        self.map
            .get(&owned_key(values))
            .map(|s| s.snapshot(self.bounds))
    }

    /// Render in Prometheus text exposition format (unit: seconds).
    fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} histogram", self.name);

        let mut rows: Vec<([String; N], HistogramSnapshot)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().snapshot(self.bounds)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, snap) in rows {
            let labels = label_str(&self.labels, &key);
            let prefix = if labels.is_empty() {
                String::new()
            } else {
                format!("{labels},")
            };

            for (le, count) in &snap.buckets {
                let _ = writeln!(
                    out,
                    "{}_bucket{{{}le=\"{}\"}} {}",
                    self.name,
                    prefix,
                    fmt_float(*le),
                    count
                );
            }
            let _ = writeln!(
                out,
                "{}_bucket{{{}le=\"+Inf\"}} {}",
                self.name, prefix, snap.count
            );
            let sum = series(self.name, "_sum", &labels);
            let _ = writeln!(out, "{} {}", sum, fmt_float(snap.sum));
            let count = series(self.name, "_count", &labels);
            let _ = writeln!(out, "{} {}", count, snap.count);
        }
    }
}

/// The request registry: one counter and one latency histogram.
///
/// Built once per `AppState` and shared by `Arc`; two states never share series.
pub struct MetricsRegistry {
    requests_total: CounterVec<3>,
    request_latency: HistogramVec<1>,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            requests_total: CounterVec::new(
                REQUESTS_TOTAL,
                "Total HTTP requests",
                ["method", "endpoint", "http_status"],
            ),
            request_latency: HistogramVec::new(
                REQUEST_LATENCY,
                "HTTP request latency",
                ["endpoint"],
                &DEFAULT_LATENCY_BUCKETS,
            ),
        }
    }

    /// Record one completed request.
    pub fn record(&self, method: &str, path: &str, status: u16, elapsed: Duration) {
        let status = status.to_string();
        self.requests_total.inc([method, path, &status]);
        self.request_latency.observe([path], elapsed);
    }

    /// Render both families in Prometheus text exposition format.
    pub fn export(&self) -> String {
        let mut out = String::new();
        self.requests_total.render(&mut out);
        self.request_latency.render(&mut out);
        out
    }

    pub fn requests_total(&self, method: &str, path: &str, status: u16) -> u64 {
        let status = status.to_string();
        self.requests_total.get([method, path, &status])
    }

    pub fn latency(&self, path: &str) -> Option<HistogramSnapshot> {
        self.request_latency.snapshot([path])
    }
}
