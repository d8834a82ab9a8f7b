use std::time::{Duration, Instant};

/// Identifies one arming of the scheduler. Timers created for an older
/// arming carry a stale ticket and are ignored when they fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arm {
    /// Zero delay: the caller evaluates right away.
    Immediate(String),
    /// The host should call back with `ticket` once `deadline` passes.
    Scheduled {
        ticket: DebounceTicket,
        deadline: Instant,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DebounceState {
    pending_query: String,
    deadline: Instant,
    ticket: DebounceTicket,
}

#[derive(Debug)]
pub struct DebounceScheduler {
    delay: Duration,
    generation: u64,
    pending: Option<DebounceState>,
}

impl DebounceScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Takes effect on the next arm; a deadline already armed keeps its time.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn on_query_changed(&mut self, query: &str, now: Instant) -> Arm {
        self.generation = self.generation.wrapping_add(1);

        if self.delay.is_zero() {
            self.pending = None;
            return Arm::Immediate(query.to_string());
        }

        let ticket = DebounceTicket(self.generation);
        let deadline = now + self.delay;
        self.pending = Some(DebounceState {
            pending_query: query.to_string(),
            deadline,
            ticket,
        });
        Arm::Scheduled { ticket, deadline }
    }

    /// Hands out the pending query if `ticket` belongs to the live arming.
    pub fn on_delay_fired(&mut self, ticket: DebounceTicket) -> Option<String> {
        let live = self.pending.as_ref().map(|state| state.ticket == ticket);
        match live {
            Some(true) => self.pending.take().map(|state| state.pending_query),
            Some(false) => {
                tracing::trace!(ticket = ticket.0, "stale debounce ticket dropped");
                None
            }
            None => None,
        }
    }

    /// Polling form of [`Self::on_delay_fired`] for hosts that tick instead of
    /// scheduling one-shot timers.
    pub fn fire_due(&mut self, now: Instant) -> Option<String> {
        let due = self
            .pending
            .as_ref()
            .map(|state| now >= state.deadline)
            .unwrap_or(false);
        if !due {
            return None;
        }
        self.pending.take().map(|state| state.pending_query)
    }

    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.generation = self.generation.wrapping_add(1);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|state| state.deadline)
    }

    pub fn pending_query(&self) -> Option<&str> {
        self.pending.as_ref().map(|state| state.pending_query.as_str())
    }
}
