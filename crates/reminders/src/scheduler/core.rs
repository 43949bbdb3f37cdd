//! [`DailyScheduler`]: fetch, decide and send once a day.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeDelta};
use cron::Schedule;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use reviewbot_notify::sink::ErrorReport;
use reviewbot_notify::{ChatClient, ErrorSink, PingBuilder};
use reviewbot_sheet::SnapshotSource;

use crate::clock::{Clock, SystemClock};
use crate::engine::{any_due, build_reminder};
use crate::error::SchedulerError;

use super::cron::{next_fire_after, parse_schedule, DAILY_CRON, FIRING_PERIOD};
use super::state::SchedulerState;

fn period() -> TimeDelta {
    TimeDelta::seconds(FIRING_PERIOD.as_secs() as i64)
}

/// Where reminders go and whose members get pinged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderTarget {
    pub channel_id: String,
    pub role_id: String,
}

/// Owns the daily reminder loop and everything it talks to.
pub struct DailyScheduler {
    snapshots: Arc<dyn SnapshotSource>,
    chat: Arc<dyn ChatClient>,
    errors: Arc<dyn ErrorSink>,
    clock: Arc<dyn Clock>,
    target: ReminderTarget,
    schedule: Schedule,
    state: watch::Sender<SchedulerState>,
}

impl DailyScheduler {
    pub fn new(
        snapshots: Arc<dyn SnapshotSource>,
        chat: Arc<dyn ChatClient>,
        errors: Arc<dyn ErrorSink>,
        target: ReminderTarget,
    ) -> Result<Self, SchedulerError> {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Ok(Self {
            snapshots,
            chat,
            errors,
            clock: Arc::new(SystemClock),
            target,
            schedule: parse_schedule(DAILY_CRON)?,
            state,
        })
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        self.state.borrow().clone()
    }

    /// Check that the reminder channel and host role are usable.
    ///
    /// A failure is logged and reported to the error sink before it is
    /// returned; the caller must not start the loop in that case.
    pub async fn initialize(&self) -> Result<(), SchedulerError> {
        match self.check_collaborators().await {
            Ok(()) => {
                info!(
                    platform = self.chat.platform_name(),
                    channel_id = %self.target.channel_id,
                    role_id = %self.target.role_id,
                    "reminder target verified"
                );
                Ok(())
            }
            Err(e) => {
                self.errors
                    .report(&ErrorReport::new("reminder initialization", &e))
                    .await;
                Err(e)
            }
        }
    }

    async fn check_collaborators(&self) -> Result<(), SchedulerError> {
        let kind = self
            .chat
            .channel_kind(&self.target.channel_id)
            .await
            .map_err(|e| {
                SchedulerError::Unavailable(format!(
                    "reminder channel {}: {e}",
                    self.target.channel_id
                ))
            })?;
        if !kind.accepts_text() {
            return Err(SchedulerError::Unavailable(format!(
                "reminder channel {} is not a text channel ({kind:?})",
                self.target.channel_id
            )));
        }

        if !self.chat.role_exists(&self.target.role_id).await? {
            return Err(SchedulerError::Unavailable(format!(
                "host role {} not found",
                self.target.role_id
            )));
        }
        Ok(())
    }

    /// The message the engine produces for `today`, without sending it.
    pub async fn compose(&self, today: NaiveDate) -> Result<Option<String>, SchedulerError> {
        let snapshot = self.snapshots.snapshot(today).await?;
        if !any_due(&snapshot, today) {
            debug!(records = snapshot.len(), %today, "no reminder condition fired");
            return Ok(None);
        }

        let roster = self.chat.role_members(&self.target.role_id).await?;
        debug!(records = snapshot.len(), roster = roster.len(), %today, "composing reminder");

        let chat = self.chat.clone();
        let pings = PingBuilder::with_mention(roster, move |m| chat.mention(m));
        Ok(build_reminder(today, &snapshot, &pings))
    }

    /// Run one reminder cycle now: compose for today and send if anything fired.
    pub async fn fire_once(&self) -> Result<Option<String>, SchedulerError> {
        let today = self.clock.now().date_naive();
        let message = self.compose(today).await?;

        match &message {
            Some(text) => {
                self.chat.send_text(&self.target.channel_id, text).await?;
                info!(%today, lines = text.lines().count() - 1, "daily reminder sent");
            }
            None => info!(%today, "no reminders due"),
        }
        Ok(message)
    }

    /// One firing with every failure contained, panics included.
    async fn fire_isolated(self: &Arc<Self>) {
        self.state.send_replace(SchedulerState::Firing);

        let this = Arc::clone(self);
        let outcome = tokio::spawn(async move { this.fire_once().await }).await;

        let error = match outcome {
            Ok(Ok(_)) => return,
            Ok(Err(e)) => e,
            Err(join) => SchedulerError::Panicked(join.to_string()),
        };
        warn!(error = %error, "daily reminder cycle failed");
        self.errors
            .report(&ErrorReport::new("daily reminder", &error))
            .await;
    }

    /// Next local midnight after `now`, falling back to a full period.
    fn first_fire(&self, now: DateTime<Local>) -> DateTime<Local> {
        next_fire_after(&self.schedule, &now).unwrap_or_else(|| now + period())
    }

    /// Spawn the loop. It runs until [`SchedulerHandle::stop`].
    pub fn start(self: Arc<Self>) -> SchedulerHandle {
        let shutdown = Arc::new(Notify::new());
        let state = self.state.subscribe();
        let task = tokio::spawn(self.run(shutdown.clone()));
        SchedulerHandle {
            shutdown,
            state,
            task,
        }
    }

    async fn run(self: Arc<Self>, shutdown: Arc<Notify>) {
        let mut next_fire = self.first_fire(self.clock.now());
        info!(next_fire = %next_fire, "daily reminder scheduler armed");

        loop {
            self.state.send_replace(SchedulerState::Armed { next_fire });

            // Recomputed from wall time on every pass.
            let delay = (next_fire - self.clock.now()).to_std().unwrap_or_default();

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.notified() => break,
            }

            self.fire_isolated().await;

            // Never earlier than the midnight after the one just served; a
            // late firing skips ahead instead of catching up.
            next_fire = self.first_fire(self.clock.now().max(next_fire));
            debug!(next_fire = %next_fire, "next reminder cycle scheduled");
        }

        self.state.send_replace(SchedulerState::Stopped);
        info!("daily reminder scheduler stopped");
    }
}

/// Control handle for a started scheduler.
pub struct SchedulerHandle {
    shutdown: Arc<Notify>,
    state: watch::Receiver<SchedulerState>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn state(&self) -> SchedulerState {
        self.state.borrow().clone()
    }

    /// Ask the loop to stop and wait for it. A cycle already running finishes first.
    pub async fn stop(self) {
        self.shutdown.notify_one();
        if let Err(e) = self.task.await {
            warn!(error = %e, "scheduler task ended abnormally");
        }
    }
}
