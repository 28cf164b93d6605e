use chrono::{Local, Timelike};

use crate::activity::TimeOfDay;

/// Source of the local hour used to place a break in the day.
pub trait Clock: Send {
    fn local_hour(&self) -> u32;

    fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.local_hour())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// Always reports the same hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    hour: u32,
}

impl FixedClock {
    pub fn at_hour(hour: u32) -> Self {
        Self { hour: hour % 24 }
    }
}

impl Clock for FixedClock {
    fn local_hour(&self) -> u32 {
        self.hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_maps_to_time_of_day() {
        assert_eq!(FixedClock::at_hour(8).time_of_day(), TimeOfDay::Morning);
        assert_eq!(FixedClock::at_hour(14).time_of_day(), TimeOfDay::Midday);
        assert_eq!(FixedClock::at_hour(20).time_of_day(), TimeOfDay::Evening);
        assert_eq!(FixedClock::at_hour(2).time_of_day(), TimeOfDay::Night);
        assert_eq!(FixedClock::at_hour(29).local_hour(), 5);
    }

    #[test]
    fn system_clock_hour_is_valid() {
        assert!(SystemClock.local_hour() < 24);
    }
}
