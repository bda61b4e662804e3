use chrono::{Local, NaiveDateTime};

/// Source of the local wall-clock time used for stack names.
pub trait Clock: std::fmt::Debug + Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub time: NaiveDateTime,
}

impl FixedClock {
    pub fn new(time: NaiveDateTime) -> FixedClock {
        FixedClock { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.time
    }
}
