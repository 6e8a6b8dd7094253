/// Mouse-look activation state.
///
/// Moves forward only: `Idle -> Pending -> Active`, once per session. The
/// host owns the actual timer; this type only records where the session is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MouseActivation {
    /// No pointer activity seen yet.
    #[default]
    Idle,
    /// Startup delay in flight.
    Pending,
    /// Mouse look is live.
    Active,
}

/// What the host must do after a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationRequest {
    /// Nothing to schedule.
    None,
    /// Start the one-shot timer; call `activation_elapsed` when it fires.
    StartTimer { delay_ms: u32 },
}

impl MouseActivation {
    /// First pointer activity of the session. A zero delay activates immediately.
    pub fn begin(&mut self, delay_ms: u32) -> ActivationRequest {
        match self {
            Self::Idle if delay_ms == 0 => {
                *self = Self::Active;
                ActivationRequest::None
            }
            Self::Idle => {
                *self = Self::Pending;
                ActivationRequest::StartTimer { delay_ms }
            }
            Self::Pending | Self::Active => ActivationRequest::None,
        }
    }

    /// Timer fired. Ignored unless pending.
    pub fn elapse(&mut self) -> bool {
        if *self == Self::Pending {
            *self = Self::Active;
            true
        } else {
            false
        }
    }

    pub fn is_active(&self) -> bool {
        *self == Self::Active
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Active => "active",
        }
    }
}

/// Polled stand-in for a host timer, for hosts without callback timers.
///
/// Holds an absolute deadline in milliseconds on the caller's clock.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActivationDeadline {
    deadline_ms: Option<f64>,
}

impl ActivationDeadline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the deadline `delay_ms` after `now_ms`. Re-arming is ignored.
    pub fn arm(&mut self, now_ms: f64, delay_ms: u32) {
        if self.deadline_ms.is_none() {
            self.deadline_ms = Some(now_ms + f64::from(delay_ms));
        }
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Drop a pending deadline without firing.
    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }
}
