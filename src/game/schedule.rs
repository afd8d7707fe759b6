use std::time::Duration;

/// Identifies one establishment of the tick schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleId(u64);

/// Handle for the periodic tick timer, owned by a single engine.
///
/// At most one schedule is active at a time: establishing a new one always
/// cancels the previous one first. The host drives ticks from whatever
/// schedule is currently active and drops its timer when none is.
#[derive(Debug)]
pub struct TickSchedule {
    period: Duration,
    active: Option<ScheduleId>,
    next_id: u64,
    established: u64,
    cancelled: u64,
}

impl TickSchedule {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            active: None,
            next_id: 0,
            established: 0,
            cancelled: 0,
        }
    }

    /// Cancel any active schedule and activate a fresh one
    pub fn establish(&mut self) -> ScheduleId {
        self.cancel();

        let id = ScheduleId(self.next_id);
        self.next_id += 1;
        self.established += 1;
        self.active = Some(id);
        id
    }

    /// Cancel the active schedule. Returns false if nothing was active.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(_) => {
                self.cancelled += 1;
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> Option<ScheduleId> {
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of schedules established so far
    pub fn established_count(&self) -> u64 {
        self.established
    }

    /// Number of schedules actually cancelled so far
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}
