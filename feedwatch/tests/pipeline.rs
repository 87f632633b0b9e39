use std::{
    collections::VecDeque,
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Parser;
use feedwatch::{
    aggregate::{AggregateTable, Hour},
    palette::Palette,
    run::{FeedStats, LoopSettings, RunLoop, Wake, Waiter},
    run_feed,
    tail::TailReader,
    ui::{RefreshSink, TerminalSink},
    Config, FeedError,
};
use ratatui::backend::TestBackend;

/// Appends one batch to the feed per wait, then interrupts.
struct Writer {
    path: PathBuf,
    batches: VecDeque<Vec<&'static str>>,
}

impl Writer {
    fn new(path: &Path, batches: Vec<Vec<&'static str>>) -> Self {
        Self {
            path: path.to_path_buf(),
            batches: batches.into(),
        }
    }
}

impl Waiter for Writer {
    async fn wait(&mut self, _interval: Duration) -> Wake {
        let Some(batch) = self.batches.pop_front() else {
            return Wake::Interrupted;
        };
        let mut file = OpenOptions::new().append(true).open(&self.path).unwrap();
        for line in batch {
            file.write_all(line.as_bytes()).unwrap();
        }
        file.flush().unwrap();
        Wake::Elapsed
    }

    fn interrupted(&mut self) -> bool {
        false
    }
}

#[derive(Default)]
struct Frames(Vec<AggregateTable>);

impl RefreshSink for Frames {
    fn render(&mut self, snapshot: &AggregateTable, _: &FeedStats) -> Result<(), FeedError> {
        self.0.push(snapshot.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), FeedError> {
        Ok(())
    }
}

fn settings() -> LoopSettings {
    LoopSettings {
        poll_interval: Duration::from_millis(10),
        min_redraw: Duration::ZERO,
    }
}

fn h(hour: u8) -> Hour {
    Hour::new(hour).unwrap()
}

fn tail(path: &Path) -> TailReader {
    TailReader::open(path).unwrap()
}

fn feed_with(existing: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project_live.json");
    File::create(&path)
        .unwrap()
        .write_all(existing.as_bytes())
        .unwrap();
    (dir, path)
}

#[tokio::test]
async fn test_only_appended_lines_are_counted() {
    let (_dir, path) = feed_with(
        "{\"timestamp\": \"2025-01-29 01:00:00\", \"category\": \"tech\"}\n",
    );
    let writer = Writer::new(
        &path,
        vec![
            vec![
                "{\"timestamp\": \"2025-01-29 14:35:20\", \"category\": \"tech\", \"text\": \"hi\"}\n",
                "{\"timestamp\": \"2025-01-29 14:50:00\", \"category\": \"food\"}\n",
            ],
            vec!["{\"timestamp\": \"2025-01-29 09:00:00\"}\n"],
        ],
    );

    let mut rl = RunLoop::new(tail(&path), Frames::default(), writer, settings());
    let stats = rl.run().await.unwrap();

    assert_eq!(stats.aggregated, 3);
    assert_eq!(stats.dropped, 0);

    let table = rl.aggregator().snapshot();
    assert_eq!(table.count(h(1), "tech"), 0);
    assert_eq!(table.count(h(14), "tech"), 1);
    assert_eq!(table.count(h(14), "food"), 1);
    assert_eq!(table.count(h(9), "other"), 1);
    assert_eq!(table.total(), 3);

    // One frame per record, and the last one matches the final table.
    assert_eq!(rl.sink().0.len(), 3);
    assert_eq!(rl.sink().0.last(), Some(&table));
}

#[tokio::test]
async fn test_line_split_across_polls() {
    let (_dir, path) = feed_with("");
    let writer = Writer::new(
        &path,
        vec![
            vec!["{\"timestamp\": \"2025-01-29 "],
            vec!["22:10:00\", \"category\": \"gaming\"}\n"],
        ],
    );

    let mut rl = RunLoop::new(tail(&path), Frames::default(), writer, settings());
    let stats = rl.run().await.unwrap();

    assert_eq!(stats.lines_read, 1);
    assert_eq!(stats.dropped, 0);
    assert_eq!(rl.aggregator().table().count(h(22), "gaming"), 1);
}

#[tokio::test]
async fn test_bad_lines_do_not_stop_the_feed() {
    let (_dir, path) = feed_with("");
    let writer = Writer::new(
        &path,
        vec![vec![
            "not json\n",
            "{\"text\": \"no timestamp\"}\n",
            "{\"timestamp\": \"29/01/2025 10:00\"}\n",
            "{\"timestamp\": \"2025-01-29 10:00:00\", \"category\": \"humor\"}\n",
        ]],
    );

    let mut rl = RunLoop::new(tail(&path), Frames::default(), writer, settings());
    let stats = rl.run().await.unwrap();

    assert_eq!(stats.lines_read, 4);
    assert_eq!(stats.dropped, 3);
    assert_eq!(stats.aggregated, 1);
    assert_eq!(rl.aggregator().table().count(h(10), "humor"), 1);
}

#[tokio::test]
async fn test_terminal_sink_end_to_end() {
    let (_dir, path) = feed_with("");
    let writer = Writer::new(
        &path,
        vec![vec![
            "{\"timestamp\": \"2025-01-29 08:00:00\", \"category\": \"travel\"}\n",
            "{\"timestamp\": \"2025-01-29 20:00:00\", \"category\": \"entertainment\"}\n",
        ]],
    );
    let sink =
        TerminalSink::with_backend(TestBackend::new(120, 30), Palette::default(), &path).unwrap();

    let mut rl = RunLoop::new(tail(&path), sink, writer, settings());
    rl.run().await.unwrap();

    let screen: String = rl
        .sink()
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect();
    assert!(screen.contains("Travel"));
    assert!(screen.contains("Entertainment"));
    assert!(screen.contains("2 messages"));
    assert!(!screen.contains("Waiting for new messages..."));
}

#[tokio::test]
async fn test_missing_file_fails_before_display() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let config = Config::try_parse_from([
        "feedwatch",
        "--headless",
        "--file",
        missing.to_str().unwrap(),
    ])
    .unwrap();

    match run_feed(config).await {
        Err(FeedError::FileMissing(path)) => assert_eq!(path, missing),
        other => panic!("expected FileMissing, got {other:?}"),
    }
}
