use crate::loggers::core::LogLevel;

/// What a severity operation does when called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Active,
    Noop,
}

/// Per-instance severity → behaviour mapping, one slot per catalog level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTable {
    slots: [Dispatch; LogLevel::ALL.len()],
}

impl DispatchTable {
    /// Recomputes every slot from scratch. A disabled instance gets an
    /// all-noop table no matter the threshold.
    pub fn derive(enabled: bool, threshold: LogLevel) -> Self {
        let slots = LogLevel::ALL.map(|level| {
            if enabled && level >= threshold {
                Dispatch::Active
            } else {
                Dispatch::Noop
            }
        });
        Self { slots }
    }

    pub fn get(&self, level: LogLevel) -> Dispatch {
        self.slots[level.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (LogLevel, Dispatch)> + '_ {
        LogLevel::ALL.into_iter().zip(self.slots.iter().copied())
    }
}

/// `Disabled` is only ever entered at construction and never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerState {
    Disabled,
    Enabled(LogLevel),
}
