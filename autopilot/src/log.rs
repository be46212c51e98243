use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

const LOG_DEPTH: usize = 64;

struct SyncRecord {
    timestamp: Instant,
    level: Level,
    thread: Option<String>,
    content: String,
}

/// Prints the records queued by the navigator threads
pub struct LogSink {
    receiver: Receiver<SyncRecord>,
    start: Instant,
}

/// `log` backend that never blocks the calling thread: records are dropped when the sink lags
pub struct Logger {
    sender: SyncSender<SyncRecord>,
    level: LevelFilter,
}

impl Logger {
    pub fn init(level: LevelFilter) -> LogSink {
        let (sender, receiver) = sync_channel(LOG_DEPTH);
        let start = Instant::now();
        let logger = Box::new(Self {
            sender,
            level,
        });
        let _ = log::set_logger(Box::leak(logger)).map(|()| log::set_max_level(level));

        LogSink {
            receiver,
            start,
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = self.sender.try_send(SyncRecord {
                timestamp: Instant::now(),
                content: std::fmt::format(*record.args()),
                thread: thread::current().name().map(str::to_owned),
                level: record.level(),
            });
        }
    }

    fn flush(&self) {}
}

impl LogSink {
    pub fn handle_logs(&mut self) {
        for record in self.receiver.try_iter() {
            println!(
                "[{:<9.5}] {:<5} {:<10}: {}",
                record.timestamp.duration_since(self.start).as_secs_f32(),
                record.level,
                record.thread.as_deref().unwrap_or("-"),
                record.content
            );
        }
    }
}
