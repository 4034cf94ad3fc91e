//! Countdown scheduling.
//!
//! The controller never sleeps. It asks a [`CountdownScheduler`] to start
//! delivering one tick per period for a given cycle, and to stop. Whoever owns
//! the controller feeds the delivered cycle ids back through
//! [`SosController::tick_cycle`](crate::SosController::tick_cycle).

use std::time::Duration;

use tokio::{
  sync::mpsc,
  task::JoinHandle,
  time::{Instant, MissedTickBehavior},
};

/// Identifies one armed countdown. Incremented on every activation.
pub type Cycle = u64;

pub trait CountdownScheduler {
  /// Begin delivering ticks for `cycle`, replacing any previous schedule.
  fn start(&mut self, cycle: Cycle);

  /// Stop delivering ticks. Harmless when nothing is scheduled.
  fn clear(&mut self);
}

// ─── Tokio interval ──────────────────────────────────────────────────────────

/// Delivers ticks from a tokio interval task over an unbounded channel.
///
/// Must be started from within a tokio runtime.
pub struct IntervalScheduler {
  period: Duration,
  tx:     mpsc::UnboundedSender<Cycle>,
  task:   Option<JoinHandle<()>>,
}

impl IntervalScheduler {
  pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

  /// Create the scheduler and the receiving end of its ticks.
  pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<Cycle>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let scheduler = Self {
      period,
      tx,
      task: None,
    };
    (scheduler, rx)
  }

  pub fn is_running(&self) -> bool {
    self.task.as_ref().is_some_and(|t| !t.is_finished())
  }
}

impl CountdownScheduler for IntervalScheduler {
  fn start(&mut self, cycle: Cycle) {
    self.clear();
    let period = self.period;
    let tx = self.tx.clone();
    self.task = Some(tokio::spawn(async move {
      // The first tick lands one full period after arming.
      let mut interval = tokio::time::interval_at(Instant::now() + period, period);
      interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
      loop {
        interval.tick().await;
        if tx.send(cycle).is_err() {
          break;
        }
      }
    }));
  }

  fn clear(&mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
  }
}

impl Drop for IntervalScheduler {
  fn drop(&mut self) { self.clear(); }
}

// ─── Manual ──────────────────────────────────────────────────────────────────

/// A scheduler that only records what it was asked to do. Ticks are driven
/// by calling [`SosController::tick`](crate::SosController::tick) directly.
#[derive(Debug, Default)]
pub struct ManualScheduler {
  /// The cycle currently scheduled, if any.
  pub active: Option<Cycle>,
  pub starts: Vec<Cycle>,
  pub clears: usize,
}

impl CountdownScheduler for ManualScheduler {
  fn start(&mut self, cycle: Cycle) {
    self.active = Some(cycle);
    self.starts.push(cycle);
  }

  fn clear(&mut self) {
    self.active = None;
    self.clears += 1;
  }
}
