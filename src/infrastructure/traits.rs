//! I/O boundary traits for testability
//!
//! These traits abstract the simulation's side effects (writing event lines,
//! waiting between events, drawing random numbers), allowing the simulator to
//! be tested with in-memory sinks, zero-delay pacing and seeded randomness.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::RandomSource;

/// Destination for formatted event lines.
pub trait EventSink: Send {
    /// Write one complete line (without trailing newline).
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Delay inserted after every leaf event.
pub trait Pacer: Send + Sync {
    /// Block for one pacing interval.
    fn pause(&self) -> Result<(), PaceInterrupted>;
}

/// The pacing wait was cancelled from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaceInterrupted;

impl fmt::Display for PaceInterrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("pacing interrupted")
    }
}

impl std::error::Error for PaceInterrupted {}

// ============================================================
// SINKS
// ============================================================

/// In-memory sink, mostly for tests.
impl EventSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}

/// Sink over any `Write`, flushed after every line.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

/// Console sink writing to stdout.
pub type ConsoleSink = WriterSink<io::Stdout>;

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> EventSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }
}

/// Plain-text log file, one event per line.
#[derive(Debug)]
pub struct LogFileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl LogFileSink {
    /// Open the log file, truncating it unless `append` is set.
    pub fn open(path: &Path, append: bool) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for LogFileSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        // flushed per line so an aborted run leaves a complete prefix
        self.writer.flush()
    }
}

/// Writes every line to each registered sink, in registration order, before
/// accepting the next line.
#[derive(Default)]
pub struct FanOutSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl FanOutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl EventSink + 'static) -> Self {
        self.push(sink);
        self
    }

    pub fn push(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanOutSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        for sink in &mut self.sinks {
            sink.write_line(line)?;
        }
        Ok(())
    }
}

// ============================================================
// PACERS
// ============================================================

/// No delay at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPacer;

impl Pacer for NoPacer {
    fn pause(&self) -> Result<(), PaceInterrupted> {
        Ok(())
    }
}

/// Real delay via `thread::sleep`, cancellable through a shared flag.
///
/// Only embedders set the flag (see [`SleepPacer::interrupt_handle`]). The
/// `fallforest` binary installs no signal handler, so Ctrl-C terminates the
/// process directly and never yields the `INTERRUPTED` exit code.
#[derive(Debug, Clone)]
pub struct SleepPacer {
    interval: Duration,
    interrupted: Arc<AtomicBool>,
}

impl SleepPacer {
    /// Longest single sleep between checks of the interrupt flag.
    const SLICE: Duration = Duration::from_millis(50);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Flag that, once set, makes the current and every later pause fail.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    fn check(&self) -> Result<(), PaceInterrupted> {
        if self.interrupted.load(Ordering::SeqCst) {
            Err(PaceInterrupted)
        } else {
            Ok(())
        }
    }
}

impl Pacer for SleepPacer {
    fn pause(&self) -> Result<(), PaceInterrupted> {
        self.check()?;
        let deadline = Instant::now() + self.interval;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            thread::sleep((deadline - now).min(Self::SLICE));
            self.check()?;
        }
    }
}

// ============================================================
// RANDOMNESS
// ============================================================

/// Random source backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Deterministic source: the same seed always yields the same tree.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_int(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0, "bound must be positive");
        if bound == 0 {
            return 0;
        }
        self.rng.random_range(0..bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Shares its buffer so the test can look at it after the sink is boxed.
    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<String>>>);

    impl EventSink for Shared {
        fn write_line(&mut self, line: &str) -> io::Result<()> {
            self.0.lock().unwrap().push(line.to_string());
            Ok(())
        }
    }

    struct Broken;

    impl EventSink for Broken {
        fn write_line(&mut self, _line: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn given_two_sinks_when_fanning_out_then_both_get_lines_in_order() {
        let a = Shared::default();
        let b = Shared::default();
        let mut sink = FanOutSink::new().with(a.clone()).with(b.clone());

        sink.write_line("one").unwrap();
        sink.write_line("two").unwrap();

        assert_eq!(*a.0.lock().unwrap(), vec!["one", "two"]);
        assert_eq!(*b.0.lock().unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn given_failing_sink_when_fanning_out_then_stops_at_failure() {
        let after = Shared::default();
        let mut sink = FanOutSink::new().with(Broken).with(after.clone());

        let err = sink.write_line("lost").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(after.0.lock().unwrap().is_empty());
    }

    #[test]
    fn given_writer_sink_when_writing_then_appends_newlines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write_line("a").unwrap();
        sink.write_line("b").unwrap();
        assert_eq!(sink.into_inner(), b"a\nb\n");
    }

    #[test]
    fn given_same_seed_when_drawing_then_sequences_match() {
        let mut a = StdRandom::seeded(7);
        let mut b = StdRandom::seeded(7);
        let xs: Vec<u32> = (0..32).map(|_| a.next_int(3)).collect();
        let ys: Vec<u32> = (0..32).map(|_| b.next_int(3)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|&x| x < 3));
    }

    #[test]
    fn given_set_flag_when_pausing_then_interrupted() {
        let pacer = SleepPacer::new(Duration::from_secs(60));
        pacer.interrupt_handle().store(true, Ordering::SeqCst);
        assert_eq!(pacer.pause(), Err(PaceInterrupted));
    }

    #[test]
    fn given_zero_interval_when_pausing_then_returns_immediately() {
        let pacer = SleepPacer::new(Duration::ZERO);
        assert_eq!(pacer.pause(), Ok(()));
        assert_eq!(NoPacer.pause(), Ok(()));
    }
}
