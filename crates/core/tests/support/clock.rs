use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta};
use wecom_core::Clock;

/// Clock that only moves when told to.
pub struct MockClock {
    now: Mutex<DateTime<Local>>,
}

impl MockClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, seconds: i64) {
        let mut now = self.now.lock().unwrap();
        *now += TimeDelta::seconds(seconds);
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}
