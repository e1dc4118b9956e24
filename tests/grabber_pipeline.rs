use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use rstest::rstest;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use epg_grabber::errors::{AppError, FetchError, FetchResult};
use epg_grabber::guide::{GuideWriter, XmltvFileWriter};
use epg_grabber::ingestor::{GrabberService, RunContext, SchedulerSettings};
use epg_grabber::models::{Channel, FetchJob, GuideDocument, LocalizedText, Program};
use epg_grabber::sources::{AdapterRegistry, EpgSiteAdapter};

const SITE: &str = "fake.example";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn at(date: NaiveDate, hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(3600)
        .unwrap()
        .from_local_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
        .unwrap()
}

/// Adapter serving canned schedules and recording how it was called
#[derive(Default)]
struct FakeAdapter {
    /// site_id -> channel id reported for it
    channel_ids: HashMap<String, String>,
    /// site_id -> start hours served for every day
    schedules: HashMap<String, Vec<u32>>,
    fail_on: Option<String>,
    delay: Duration,
    /// site_id -> extra delay before its channel is returned
    slow: HashMap<String, Duration>,
    channel_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fetched_days: Mutex<Vec<(String, NaiveDate)>>,
    channel_days: Mutex<Vec<NaiveDate>>,
}

impl FakeAdapter {
    fn with_channel(mut self, site_id: &str, channel_id: &str, hours: &[u32]) -> Self {
        self.channel_ids.insert(site_id.to_string(), channel_id.to_string());
        self.schedules.insert(site_id.to_string(), hours.to_vec());
        self
    }

    fn failing_on(mut self, site_id: &str) -> Self {
        self.fail_on = Some(site_id.to_string());
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn slow_on(mut self, site_id: &str, delay: Duration) -> Self {
        self.slow.insert(site_id.to_string(), delay);
        self
    }
}

#[async_trait]
impl EpgSiteAdapter for FakeAdapter {
    fn site_id(&self) -> &str {
        SITE
    }

    async fn fetch_channel(&self, site_local_id: &str, display_name: &str) -> FetchResult<Channel> {
        self.channel_calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let delay = self.slow.get(site_local_id).copied().unwrap_or(self.delay);
        tokio::time::sleep(delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on.as_deref() == Some(site_local_id) {
            return Err(FetchError::status(format!("http://{SITE}/{site_local_id}"), 502));
        }

        let id = self
            .channel_ids
            .get(site_local_id)
            .cloned()
            .unwrap_or_else(|| site_local_id.to_uppercase());
        Ok(Channel::new(id).with_display_name(display_name))
    }

    async fn fetch_channel_for_day(
        &self,
        site_local_id: &str,
        display_name: &str,
        date: NaiveDate,
    ) -> FetchResult<Channel> {
        self.channel_days.lock().unwrap().push(date);
        self.fetch_channel(site_local_id, display_name).await
    }

    async fn fetch_programs(
        &self,
        channel: &Channel,
        site_local_id: &str,
        date: NaiveDate,
    ) -> FetchResult<Vec<Program>> {
        self.fetched_days
            .lock()
            .unwrap()
            .push((site_local_id.to_string(), date));

        let hours = self.schedules.get(site_local_id).cloned().unwrap_or_default();
        Ok(hours
            .into_iter()
            .map(|hour| {
                Program::new(
                    channel.id.clone(),
                    LocalizedText::new(format!("{site_local_id} {hour:02}:00")),
                    at(date, hour),
                )
            })
            .collect())
    }
}

/// Keeps the written document in memory
#[derive(Default)]
struct MemoryWriter {
    document: Mutex<Option<GuideDocument>>,
}

impl GuideWriter for MemoryWriter {
    fn write(&self, document: &GuideDocument) -> epg_grabber::errors::AppResult<()> {
        *self.document.lock().unwrap() = Some(document.clone());
        Ok(())
    }

    fn destination(&self) -> String {
        "memory".to_string()
    }
}

impl MemoryWriter {
    fn take(&self) -> GuideDocument {
        self.document.lock().unwrap().take().expect("guide was not written")
    }
}

fn service(adapter: Arc<FakeAdapter>, workers: usize, timespan_days: u32) -> GrabberService {
    let mut registry = AdapterRegistry::new();
    registry.register(adapter).unwrap();
    GrabberService::new(
        Arc::new(registry),
        SchedulerSettings {
            workers,
            timespan_days,
        },
    )
}

fn job(site_id: &str) -> FetchJob {
    FetchJob::new(SITE, site_id, "", site_id.to_uppercase())
}

fn stop_times(document: &GuideDocument) -> Vec<String> {
    document
        .programs
        .iter()
        .map(|p| p.stop.map(|s| s.format("%H:%M:%S").to_string()).unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn test_single_channel_sorted_and_stitched() {
    let adapter = Arc::new(FakeAdapter::default().with_channel("a", "A", &[8, 10, 9]));
    let writer = MemoryWriter::default();

    let summary = service(adapter, 1, 1)
        .run(vec![job("a")], &RunContext::silent(today()), &writer)
        .await
        .unwrap();
    assert_eq!(summary.channels, 1);
    assert_eq!(summary.programs, 3);
    assert_eq!(summary.destination, "memory");

    let document = writer.take();
    let starts: Vec<_> = document
        .programs
        .iter()
        .map(|p| p.start.format("%H:%M").to_string())
        .collect();
    assert_eq!(starts, vec!["08:00", "09:00", "10:00"]);
    assert_eq!(stop_times(&document), vec!["09:00:00", "10:00:00", "23:59:59"]);
}

#[tokio::test]
async fn test_channels_ordered_by_id_regardless_of_job_order() {
    let adapter = Arc::new(
        FakeAdapter::default()
            .with_channel("b", "B", &[6])
            .with_channel("a", "A", &[6]),
    );
    let writer = MemoryWriter::default();

    service(adapter, 2, 1)
        .run(vec![job("b"), job("a")], &RunContext::silent(today()), &writer)
        .await
        .unwrap();

    let document = writer.take();
    let ids: Vec<_> = document.channels.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
    let program_channels: Vec<_> = document.programs.iter().map(|p| p.channel.as_str()).collect();
    assert_eq!(program_channels, vec!["A", "B"]);
    assert_eq!(stop_times(&document), vec!["23:59:59", "23:59:59"]);
}

#[tokio::test]
async fn test_duplicate_channel_ids_are_concatenated() {
    let adapter = Arc::new(
        FakeAdapter::default()
            .with_channel("morning", "SAME", &[6, 8])
            .with_channel("evening", "SAME", &[7, 20]),
    );
    let writer = MemoryWriter::default();

    service(adapter, 2, 1)
        .run(
            vec![job("morning"), job("evening")],
            &RunContext::silent(today()),
            &writer,
        )
        .await
        .unwrap();

    let document = writer.take();
    assert_eq!(document.channels.len(), 1);
    let starts: Vec<_> = document
        .programs
        .iter()
        .map(|p| p.start.format("%H").to_string())
        .collect();
    assert_eq!(starts, vec!["06", "07", "08", "20"]);
    assert_eq!(
        stop_times(&document),
        vec!["07:00:00", "08:00:00", "20:00:00", "23:59:59"]
    );
}

#[tokio::test]
async fn test_every_day_of_timespan_is_fetched() {
    let adapter = Arc::new(FakeAdapter::default().with_channel("a", "A", &[12]));
    let writer = MemoryWriter::default();

    service(adapter.clone(), 1, 3)
        .run(vec![job("a")], &RunContext::silent(today()), &writer)
        .await
        .unwrap();

    let days: Vec<_> = adapter
        .fetched_days
        .lock()
        .unwrap()
        .iter()
        .map(|(_, d)| d.to_string())
        .collect();
    assert_eq!(days, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);

    // Noon on day one stops at noon on day two
    let document = writer.take();
    assert_eq!(document.programs.len(), 3);
    assert_eq!(document.programs[0].stop, Some(document.programs[1].start));
    assert_eq!(
        document.programs[2].stop.unwrap().to_rfc3339(),
        "2024-03-03T23:59:59+01:00"
    );
}

#[tokio::test]
async fn test_failed_job_aborts_run_without_output() {
    let adapter = Arc::new(
        FakeAdapter::default()
            .with_channel("a", "A", &[6])
            .with_channel("b", "B", &[6])
            .failing_on("b"),
    );
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guide.xml");
    let writer = XmltvFileWriter::new(&path);

    let err = service(adapter, 2, 1)
        .run(vec![job("a"), job("b")], &RunContext::silent(today()), &writer)
        .await
        .unwrap_err();

    match err {
        AppError::JobFailed {
            site,
            site_id,
            source,
        } => {
            assert_eq!(site, SITE);
            assert_eq!(site_id, "b");
            assert!(matches!(source, FetchError::Status { status: 502, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!path.exists());
}

#[tokio::test]
async fn test_unknown_site_fails_before_any_fetch() {
    let adapter = Arc::new(FakeAdapter::default().with_channel("a", "A", &[6]));
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guide.xml");
    let writer = XmltvFileWriter::new(&path);

    let jobs = vec![job("a"), FetchJob::new("unknown.example", "x", "", "X")];
    let err = service(adapter.clone(), 4, 1)
        .run(jobs, &RunContext::silent(today()), &writer)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UnknownSite { ref site } if site == "unknown.example"));
    assert_eq!(adapter.channel_calls.load(Ordering::SeqCst), 0);
    assert!(!path.exists());
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
#[tokio::test]
async fn test_worker_pool_is_bounded(#[case] workers: usize) {
    let mut adapter = FakeAdapter::default().with_delay(Duration::from_millis(20));
    let site_ids: Vec<String> = (0..8).map(|i| format!("ch{i}")).collect();
    for site_id in &site_ids {
        adapter = adapter.with_channel(site_id, &site_id.to_uppercase(), &[6]);
    }
    let adapter = Arc::new(adapter);
    let writer = MemoryWriter::default();

    let jobs = site_ids.iter().map(|id| job(id)).collect();
    let summary = service(adapter.clone(), workers, 1)
        .run(jobs, &RunContext::silent(today()), &writer)
        .await
        .unwrap();

    assert_eq!(summary.channels, 8);
    assert_eq!(adapter.channel_calls.load(Ordering::SeqCst), 8);
    let peak = adapter.max_in_flight.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= workers, "peak {peak} exceeds {workers} workers");
    if workers >= 2 {
        assert!(peak >= 2, "jobs never overlapped with {workers} workers");
    }
}

#[tokio::test]
async fn test_duplicate_channel_merge_follows_job_order() {
    // The first job finishes last; its payload and programs still come first
    let adapter = Arc::new(
        FakeAdapter::default()
            .with_channel("first", "SAME", &[6])
            .with_channel("second", "SAME", &[6])
            .slow_on("first", Duration::from_millis(100)),
    );
    let writer = MemoryWriter::default();

    service(adapter, 2, 1)
        .run(
            vec![
                FetchJob::new(SITE, "first", "", "First"),
                FetchJob::new(SITE, "second", "", "Second"),
            ],
            &RunContext::silent(today()),
            &writer,
        )
        .await
        .unwrap();

    let document = writer.take();
    assert_eq!(document.channels.len(), 1);
    assert_eq!(document.channels[0].display_names[0].value, "First");
    let titles: Vec<_> = document
        .programs
        .iter()
        .filter_map(Program::primary_title)
        .collect();
    assert_eq!(titles, vec!["first 06:00", "second 06:00"]);
}

#[tokio::test]
async fn test_channel_page_uses_first_day_of_run() {
    let adapter = Arc::new(FakeAdapter::default().with_channel("a", "A", &[6]));
    let writer = MemoryWriter::default();

    service(adapter.clone(), 1, 2)
        .run(vec![job("a")], &RunContext::silent(today()), &writer)
        .await
        .unwrap();

    assert_eq!(*adapter.channel_days.lock().unwrap(), vec![today()]);
}

#[tokio::test]
async fn test_xmltv_file_written_on_success() {
    let adapter = Arc::new(
        FakeAdapter::default()
            .with_channel("b", "B", &[21])
            .with_channel("a", "A", &[20]),
    );
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guide.xml");
    let writer = XmltvFileWriter::new(&path);

    service(adapter, 2, 1)
        .run(vec![job("a"), job("b")], &RunContext::silent(today()), &writer)
        .await
        .unwrap();

    let xml = std::fs::read_to_string(&path).unwrap();
    let a = xml.find("<channel id=\"A\">").unwrap();
    let b = xml.find("<channel id=\"B\">").unwrap();
    assert!(a < b);
    assert!(xml.contains(
        "<programme start=\"20240301200000 +0100\" stop=\"20240301235959 +0100\" channel=\"A\">"
    ));
    assert!(xml.contains("<display-name>A</display-name>"));
}
