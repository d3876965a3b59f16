use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const TIME_FORMAT: &str = "%H:%M";

/// Date/time assigned to one notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Slot {
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn time_string(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }
}

/// Picks uniformly random slots inside an inclusive date range and an
/// inclusive time-of-day range. Inverted ranges collapse to their start.
#[derive(Debug)]
pub struct SlotPicker<R: Rng> {
    date_from: NaiveDate,
    date_to: NaiveDate,
    time_from: NaiveTime,
    time_to: NaiveTime,
    rng: R,
}

impl SlotPicker<StdRng> {
    /// Seeded pickers repeat the same slots for the same ranges.
    pub fn from_seed(
        dates: (NaiveDate, NaiveDate),
        times: (NaiveTime, NaiveTime),
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(dates, times, rng)
    }
}

impl<R: Rng> SlotPicker<R> {
    pub fn new(dates: (NaiveDate, NaiveDate), times: (NaiveTime, NaiveTime), rng: R) -> Self {
        Self {
            date_from: dates.0,
            date_to: dates.1,
            time_from: times.0,
            time_to: times.1,
            rng,
        }
    }

    pub fn next_slot(&mut self) -> Slot {
        let days = (self.date_to - self.date_from).num_days().max(0);
        let offset = self.rng.gen_range(0..=days);
        let date = self.date_from + Duration::days(offset);

        let start = self.time_from.num_seconds_from_midnight();
        let end = self.time_to.num_seconds_from_midnight().max(start);
        let seconds = self.rng.gen_range(start..=end);
        let time = NaiveTime::from_hms_opt(seconds / 3600, (seconds % 3600) / 60, 0)
            .unwrap_or(self.time_from);

        Slot { date, time }
    }
}
