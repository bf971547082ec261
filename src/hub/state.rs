//! Hub lifecycle state machine

/// Hub lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubPhase {
    /// Built from a disabled configuration; terminal
    Disabled,
    /// Accepting viewers and broadcasting
    Active,
    /// Shutdown started, waiting for viewers to close
    Closing,
    /// Shutdown finished; terminal
    Closed,
}

impl HubPhase {
    /// Initial phase for a hub
    pub fn initial(enabled: bool) -> Self {
        if enabled {
            HubPhase::Active
        } else {
            HubPhase::Disabled
        }
    }

    /// Whether new viewers and broadcasts are processed
    pub fn is_active(self) -> bool {
        self == HubPhase::Active
    }

    /// Move to `Closing`; returns `true` only on the first transition
    pub fn begin_close(&mut self) -> bool {
        if *self == HubPhase::Active {
            *self = HubPhase::Closing;
            true
        } else {
            false
        }
    }

    /// Move from `Closing` to `Closed`
    pub fn finish_close(&mut self) {
        if *self == HubPhase::Closing {
            *self = HubPhase::Closed;
        }
    }

    /// Lowercase name used in logs and stats
    pub fn as_str(self) -> &'static str {
        match self {
            HubPhase::Disabled => "disabled",
            HubPhase::Active => "active",
            HubPhase::Closing => "closing",
            HubPhase::Closed => "closed",
        }
    }
}

impl std::fmt::Display for HubPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
