//! Pausable deferred events
//!
//! Delayed gameplay effects (wave spawns, respawns, invulnerability and
//! flash windows) are scheduled here instead of on the host's timer, so a
//! pause freezes them. A paused timeout keeps only the time it still owes;
//! resuming restarts the clock for that remainder.

/// Handle returned by [`Scheduler::schedule`]
pub type TimeoutId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutState {
    Running,
    Paused,
    /// Fired or cancelled; removed on the next poll
    Done,
}

/// A single deferred event
#[derive(Debug, Clone)]
pub struct Timeout<E> {
    pub id: TimeoutId,
    pub event: E,
    /// Time still owed when the clock last (re)started
    remaining_ms: f64,
    /// Wall time the clock last (re)started
    started_at: f64,
    state: TimeoutState,
}

impl<E> Timeout<E> {
    fn new(id: TimeoutId, event: E, delay_ms: f64, now: f64) -> Self {
        Self {
            id,
            event,
            remaining_ms: delay_ms.max(0.0),
            started_at: now,
            state: TimeoutState::Running,
        }
    }

    pub fn state(&self) -> TimeoutState {
        self.state
    }

    /// Time left before firing, as seen at `now`
    pub fn remaining(&self, now: f64) -> f64 {
        match self.state {
            TimeoutState::Running => (self.remaining_ms - (now - self.started_at)).max(0.0),
            TimeoutState::Paused => self.remaining_ms,
            TimeoutState::Done => 0.0,
        }
    }

    /// Stop the clock, permanently consuming the time already elapsed
    pub fn pause(&mut self, now: f64) {
        if self.state == TimeoutState::Running {
            self.remaining_ms = self.remaining(now);
            self.state = TimeoutState::Paused;
        }
    }

    /// Restart the clock for whatever time is still owed
    pub fn resume(&mut self, now: f64) {
        if self.state == TimeoutState::Paused {
            self.started_at = now;
            self.state = TimeoutState::Running;
        }
    }

    pub fn cancel(&mut self) {
        self.state = TimeoutState::Done;
    }

    fn deadline(&self) -> f64 {
        self.started_at + self.remaining_ms
    }

    fn is_due(&self, now: f64) -> bool {
        self.state == TimeoutState::Running && now >= self.deadline()
    }
}

/// Owns every pending timeout and pauses them in lockstep
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    timeouts: Vec<Timeout<E>>,
    next_id: TimeoutId,
    paused: bool,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            timeouts: Vec::new(),
            next_id: 1,
            paused: false,
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` to fire `delay_ms` after `now`. Scheduling while paused
    /// creates a paused timeout that starts counting on resume.
    pub fn schedule(&mut self, event: E, delay_ms: f64, now: f64) -> TimeoutId {
        let id = self.next_id;
        self.next_id += 1;
        let mut timeout = Timeout::new(id, event, delay_ms, now);
        if self.paused {
            timeout.pause(now);
        }
        log::debug!("Scheduled timeout {} in {:.0}ms", id, delay_ms);
        self.timeouts.push(timeout);
        id
    }

    pub fn cancel(&mut self, id: TimeoutId) -> bool {
        match self.timeouts.iter_mut().find(|t| t.id == id) {
            Some(t) if t.state != TimeoutState::Done => {
                t.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn pause_all(&mut self, now: f64) {
        self.paused = true;
        for t in &mut self.timeouts {
            t.pause(now);
        }
    }

    pub fn resume_all(&mut self, now: f64) {
        self.paused = false;
        for t in &mut self.timeouts {
            t.resume(now);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Timeouts not yet fired or cancelled
    pub fn pending(&self) -> usize {
        self.timeouts
            .iter()
            .filter(|t| t.state != TimeoutState::Done)
            .count()
    }

    pub fn get(&self, id: TimeoutId) -> Option<&Timeout<E>> {
        self.timeouts.iter().find(|t| t.id == id)
    }

    /// Drop everything, fired or not
    pub fn clear(&mut self) {
        self.timeouts.clear();
    }

    /// Remove and return every event whose time has come, earliest first
    pub fn poll(&mut self, now: f64) -> Vec<E> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.timeouts.len() {
            let t = &self.timeouts[i];
            if t.state == TimeoutState::Done {
                self.timeouts.remove(i);
            } else if t.is_due(now) {
                let t = self.timeouts.remove(i);
                due.push((t.deadline(), t.id, t.event));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, _, event)| event).collect()
    }
}
