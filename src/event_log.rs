//! JSON-lines game event log.
//!
//! One object per line, each carrying `t_ms` (milliseconds since the log was
//! opened), `episode` and a `type` tag:
//!
//! ```text
//! {"t_ms":0,"episode":0,"type":"session_start","seed":42}
//! {"t_ms":812,"episode":0,"type":"piece_locked","kind":"t","lines_cleared":0,"points":0}
//! {"t_ms":9120,"episode":0,"type":"game_over","score":1234,"level":1,"lines":12,"pieces":40}
//! ```
//!
//! The log never interrupts play: the first failed write disables it.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::GameConfig;
use crate::types::GameEvent;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record {
    SessionStart {
        seed: u64,
    },
    Restart,
    PieceLocked {
        kind: &'static str,
        lines_cleared: u32,
        points: u32,
    },
    LevelUp {
        level: u32,
    },
    GameOver {
        score: u32,
        level: u32,
        lines: u32,
        pieces: u32,
    },
}

impl From<&GameEvent> for Record {
    fn from(event: &GameEvent) -> Self {
        match *event {
            GameEvent::PieceLocked {
                kind,
                lines_cleared,
                points,
            } => Record::PieceLocked {
                kind: kind.as_str(),
                lines_cleared,
                points,
            },
            GameEvent::LevelUp { level } => Record::LevelUp { level },
            GameEvent::GameOver {
                score,
                level,
                lines,
                pieces,
            } => Record::GameOver {
                score,
                level,
                lines,
                pieces,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Line<'a> {
    t_ms: u64,
    episode: u32,
    #[serde(flatten)]
    record: &'a Record,
}

pub struct EventLog {
    out: Option<Box<dyn Write>>,
    started: Instant,
    /// Episode the next record belongs to; bumped after game over and restart.
    episode: u32,
    buf: Vec<u8>,
}

impl EventLog {
    /// A log that drops everything.
    pub fn disabled() -> Self {
        Self {
            out: None,
            started: Instant::now(),
            episode: 0,
            buf: Vec::new(),
        }
    }

    pub fn from_writer(out: impl Write + 'static) -> Self {
        Self {
            out: Some(Box::new(out)),
            buf: Vec::with_capacity(256),
            ..Self::disabled()
        }
    }

    /// Append to `path`, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open event log {}", path.display()))?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }

    /// Open `TETRIS_LOG_PATH` if configured, otherwise a disabled log.
    pub fn from_config(config: &GameConfig) -> Result<Self> {
        match &config.log_path {
            Some(path) => Self::open(path),
            None => Ok(Self::disabled()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.out.is_some()
    }

    pub fn session_start(&mut self, seed: u64) {
        self.write(&Record::SessionStart { seed });
    }

    /// Record a player restart; later records belong to the next episode.
    pub fn restart(&mut self) {
        self.write(&Record::Restart);
        self.episode = self.episode.wrapping_add(1);
    }

    pub fn record(&mut self, event: &GameEvent) {
        self.write(&Record::from(event));
        if matches!(event, GameEvent::GameOver { .. }) {
            self.episode = self.episode.wrapping_add(1);
        }
    }

    fn write(&mut self, record: &Record) {
        let Some(out) = self.out.as_mut() else {
            return;
        };

        let line = Line {
            t_ms: u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX),
            episode: self.episode,
            record,
        };

        self.buf.clear();
        if serde_json::to_writer(&mut self.buf, &line).is_err() {
            return;
        }
        self.buf.push(b'\n');

        if out.write_all(&self.buf).and_then(|()| out.flush()).is_err() {
            self.out = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    /// Writer whose bytes stay readable after the log takes ownership.
    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Shared {
        fn lines(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.borrow();
            std::str::from_utf8(&bytes)
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_one_json_object_per_line() {
        let sink = Shared::default();
        let mut log = EventLog::from_writer(sink.clone());

        log.session_start(42);
        log.record(&GameEvent::PieceLocked {
            kind: PieceKind::T,
            lines_cleared: 1,
            points: 40,
        });
        log.record(&GameEvent::LevelUp { level: 1 });

        let lines = sink.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["type"], "session_start");
        assert_eq!(lines[0]["seed"], 42);
        assert_eq!(lines[1]["type"], "piece_locked");
        assert_eq!(lines[1]["kind"], "t");
        assert_eq!(lines[1]["points"], 40);
        assert_eq!(lines[2]["type"], "level_up");
        assert_eq!(lines[2]["level"], 1);
        assert!(lines.iter().all(|l| l["t_ms"].is_u64()));
    }

    #[test]
    fn game_over_and_restart_advance_the_episode() {
        let sink = Shared::default();
        let mut log = EventLog::from_writer(sink.clone());

        log.record(&GameEvent::GameOver {
            score: 10,
            level: 0,
            lines: 0,
            pieces: 3,
        });
        log.restart();
        log.record(&GameEvent::LevelUp { level: 1 });

        let lines = sink.lines();
        assert_eq!(lines[0]["type"], "game_over");
        assert_eq!(lines[0]["episode"], 0);
        assert_eq!(lines[0]["pieces"], 3);
        assert_eq!(lines[1]["type"], "restart");
        assert_eq!(lines[1]["episode"], 1);
        assert_eq!(lines[2]["episode"], 2);
    }

    #[test]
    fn write_failure_disables_the_log() {
        let mut log = EventLog::from_writer(Broken);
        assert!(log.is_enabled());
        log.session_start(1);
        assert!(!log.is_enabled());
        // Further records are dropped quietly.
        log.record(&GameEvent::LevelUp { level: 2 });
    }

    #[test]
    fn disabled_log_accepts_records() {
        let mut log = EventLog::disabled();
        log.session_start(1);
        log.restart();
        assert!(!log.is_enabled());
    }
}
