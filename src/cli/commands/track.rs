//! Interactive tracking loop.
//!
//! A ticker thread and a stdin reader feed one channel; every tracker
//! mutation happens on the receiving side, one event at a time.

use crate::cli::parser::Commands;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::core::timer::format_duration;
use crate::core::tracker::Tracker;
use crate::db::pool::DbPool;
use crate::db::TimeStore;
use crate::errors::{AppError, AppResult};
use crate::models::{Confirmation, SoundCue, TrackerSignal};
use crate::ui::messages::{ask, bell, error, header, info, success, warning};
use crate::utils::colors::{RESET, color_for_state};
use crate::utils::formatting::readable;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::debug;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Tick,
    Line(String),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Track { task } = cmd {
        let pool = DbPool::new(cfg.database_path())?;
        let task_row = pool
            .get_task(*task)?
            .ok_or_else(|| AppError::not_found("Task", *task))?;
        let project_name = pool
            .get_project(task_row.project_id)?
            .map(|p| p.name)
            .unwrap_or_default();

        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
        let settings = cfg.check_settings();
        let mut session = TrackSession::new(Tracker::new(pool, clock, settings));
        session.tracker.select_task(Some(task_row.id))?;

        header(format!("{project_name} / {}", task_row.name));
        info(format!(
            "Checking every {}. Commands: s = start, p = pause, r = reset, q = stop and quit.",
            readable(i64::from(settings.check_interval_seconds()))
        ));

        session.tracker.start();

        let (tx, rx) = mpsc::channel();
        spawn_ticker(tx.clone());
        spawn_stdin_reader(tx);

        session.run(&rx)?;
        println!();
    }
    Ok(())
}

fn spawn_ticker(tx: Sender<Event>) {
    thread::spawn(move || {
        loop {
            thread::sleep(TICK);
            if tx.send(Event::Tick).is_err() {
                break;
            }
        }
    });
}

fn spawn_stdin_reader(tx: Sender<Event>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) => {
                    if tx.send(Event::Line(l)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "stdin closed");
                    break;
                }
            }
        }
        let _ = tx.send(Event::Eof);
    });
}

/// State of the interactive loop around one tracker.
pub struct TrackSession<S: TimeStore> {
    pub tracker: Tracker<S>,
    quitting: bool,
}

impl<S: TimeStore> TrackSession<S> {
    pub fn new(tracker: Tracker<S>) -> Self {
        Self {
            tracker,
            quitting: false,
        }
    }

    pub fn run(&mut self, events: &Receiver<Event>) -> AppResult<()> {
        for event in events.iter() {
            let flow = match event {
                Event::Tick => self.on_tick(),
                Event::Line(line) => self.on_line(&line),
                Event::Eof => self.on_eof(),
            };
            if flow == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    pub fn on_tick(&mut self) -> Flow {
        let signals = self.tracker.tick();
        if !signals.is_empty() {
            println!();
            self.render(&signals);
            return Flow::Continue;
        }

        match self.tracker.pending() {
            Some(req) if req.cue == Some(SoundCue::Looped) => bell(),
            Some(_) => {}
            None => self.status_line(),
        }
        Flow::Continue
    }

    pub fn on_line(&mut self, line: &str) -> Flow {
        if let Some(id) = self.tracker.pending().map(|r| r.id) {
            let answer = Confirmation::from_answer(line);
            match self.tracker.resolve(id, answer) {
                Ok(signals) => {
                    let failed = signals
                        .iter()
                        .any(|s| matches!(s, TrackerSignal::StorageFailed { .. }));
                    self.render(&signals);
                    if failed {
                        // keep the unsaved time reachable
                        self.quitting = false;
                    }
                }
                Err(e) => error(e),
            }
            return if self.quitting { Flow::Quit } else { Flow::Continue };
        }

        match line.trim().to_ascii_lowercase().as_str() {
            "s" | "start" => {
                if !self.tracker.start() {
                    info("Already running.");
                }
            }
            "p" | "pause" => {
                if self.tracker.pause() {
                    info(format!("Paused at {}.", self.tracker.display()));
                }
            }
            "r" | "reset" => {
                self.tracker.reset();
                info("Timer reset, elapsed time discarded.");
            }
            "q" | "quit" | "stop" => {
                self.quitting = true;
                let signals = self.tracker.request_stop();
                if signals.is_empty() {
                    return Flow::Quit;
                }
                self.render(&signals);
            }
            "" => self.status_line(),
            other => warning(format!("Unknown command '{other}' (s, p, r, q).")),
        }
        Flow::Continue
    }

    /// Input closed: an outstanding question counts as no.
    pub fn on_eof(&mut self) -> Flow {
        if let Some(id) = self.tracker.pending().map(|r| r.id) {
            if let Ok(signals) = self.tracker.resolve(id, Confirmation::No) {
                self.render(&signals);
            }
        } else if self.tracker.elapsed() > 0 {
            warning(format!(
                "Input closed, {} of unconfirmed time discarded.",
                self.tracker.display()
            ));
        }
        Flow::Quit
    }

    fn status_line(&self) {
        let state = self.tracker.state();
        print!(
            "\r⏱  {} {}{:<7}{} next check in {}   ",
            self.tracker.display(),
            color_for_state(state),
            state.as_str(),
            RESET,
            format_duration(self.tracker.next_check_in())
        );
        io::stdout().flush().ok();
    }

    fn render(&self, signals: &[TrackerSignal]) {
        for signal in signals {
            match signal {
                TrackerSignal::Sound(_) => bell(),
                TrackerSignal::ConfirmationRequested(req) => {
                    let span = readable(req.elapsed_seconds as i64);
                    if req.resume_after {
                        ask(format!("{span} tracked since the last check. Were you working?"));
                    } else {
                        ask(format!("Save {span} of work before stopping?"));
                    }
                }
                TrackerSignal::SessionRecorded(rec) => success(format!(
                    "Recorded {} as session #{}.",
                    readable(rec.duration_seconds),
                    rec.id
                )),
                TrackerSignal::SessionDiscarded(secs) => {
                    info(format!("Discarded {}.", readable(*secs as i64)))
                }
                TrackerSignal::StorageFailed {
                    elapsed_seconds,
                    message,
                } => error(format!(
                    "Could not save the session: {message}. {} kept on the timer, press s to continue.",
                    readable(*elapsed_seconds as i64)
                )),
            }
        }
    }
}
