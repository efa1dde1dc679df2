use super::subscription::ReqType;
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use std::time::{Duration, Instant};

/// Per-root event counters for the lifetime of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadStats {
    req_type: ReqType,
    counts: IndexMap<String, u64>,
}

impl DownloadStats {
    pub fn new(req_type: ReqType) -> Self {
        Self {
            req_type,
            counts: IndexMap::new(),
        }
    }

    /// Count one event for `root`, returning its new count.
    pub fn record(&mut self, root: &str) -> u64 {
        match self.counts.get_mut(root) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => {
                self.counts.insert(root.to_string(), 1);
                1
            }
        }
    }

    pub fn count(&self, root: &str) -> u64 {
        self.counts.get(root).copied().unwrap_or_default()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Counts in first-seen order.
    pub fn counts(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(root, count)| (root.as_str(), *count))
    }

    /// Multi-line progress report as of `now`.
    pub fn report(&self, now: DateTime<Local>) -> String {
        let mode = self.req_type.mode();
        let mut report = format!(
            "Download progress as of {}:",
            now.format("%Y-%m-%d %H:%M:%S")
        );
        for (root, count) in self.counts() {
            report.push_str(&format!("\n  {root}: {count} {mode}"));
        }
        report.push_str(&format!("\nTotal {mode} downloaded: {}", self.total()));
        report
    }
}

/// Wall-clock throttle for periodic progress reports.
#[derive(Debug, Clone, Copy)]
pub struct ReportTimer {
    interval: Duration,
    last: Instant,
}

impl ReportTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
        }
    }

    /// True at most once per `interval`, resetting the timer when it fires.
    pub fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_download_stats_counts_per_root() {
        let mut stats = DownloadStats::new(ReqType::Trade);

        assert_eq!(stats.record("TSLA"), 1);
        assert_eq!(stats.record("AAPL"), 1);
        assert_eq!(stats.record("TSLA"), 2);

        assert_eq!(stats.count("TSLA"), 2);
        assert_eq!(stats.count("MSFT"), 0);
        assert_eq!(stats.total(), 3);
    }

    #[test]
    fn test_download_stats_report() {
        let mut stats = DownloadStats::new(ReqType::Quote);
        stats.record("SPY");
        stats.record("QQQ");
        stats.record("SPY");

        let now = Local.with_ymd_and_hms(2024, 1, 2, 9, 31, 0).unwrap();

        assert_eq!(
            stats.report(now),
            "Download progress as of 2024-01-02 09:31:00:\n  \
             SPY: 2 quotes\n  \
             QQQ: 1 quotes\n\
             Total quotes downloaded: 3"
        );
    }

    #[test]
    fn test_report_timer_fires_once_per_interval() {
        let start = Instant::now();
        let mut timer = ReportTimer {
            interval: Duration::from_secs(60),
            last: start,
        };

        assert!(!timer.due(start + Duration::from_secs(59)));
        assert!(timer.due(start + Duration::from_secs(60)));
        assert!(!timer.due(start + Duration::from_secs(61)));
        assert!(timer.due(start + Duration::from_secs(120)));
    }
}
