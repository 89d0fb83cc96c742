use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod minigame;

pub const DAY_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayInfo {
    pub number: u8,
    pub name: &'static str,
    pub date: &'static str,
    pub game: GameRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameRule {
    TapFind { targets: u8 },
    MemoryMatch { pairs: u8 },
    Catch { goal: u16, time_limit_secs: u16 },
    Quiz { set: QuizSet },
    SlidePuzzle { side: u8 },
    Reveal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizSet {
    Love,
    Kiss,
}

pub const DAYS: [DayInfo; DAY_COUNT] = [
    DayInfo {
        number: 1,
        name: "Rose Day",
        date: "Feb 7",
        game: GameRule::TapFind { targets: 10 },
    },
    DayInfo {
        number: 2,
        name: "Propose Day",
        date: "Feb 8",
        game: GameRule::MemoryMatch { pairs: 6 },
    },
    DayInfo {
        number: 3,
        name: "Chocolate Day",
        date: "Feb 9",
        game: GameRule::Catch {
            goal: 15,
            time_limit_secs: 30,
        },
    },
    DayInfo {
        number: 4,
        name: "Teddy Day",
        date: "Feb 10",
        game: GameRule::Quiz { set: QuizSet::Love },
    },
    DayInfo {
        number: 5,
        name: "Promise Day",
        date: "Feb 11",
        game: GameRule::SlidePuzzle { side: 3 },
    },
    DayInfo {
        number: 6,
        name: "Hug Day",
        date: "Feb 12",
        game: GameRule::TapFind { targets: 10 },
    },
    DayInfo {
        number: 7,
        name: "Kiss Day",
        date: "Feb 13",
        game: GameRule::Quiz { set: QuizSet::Kiss },
    },
    DayInfo {
        number: 8,
        name: "Valentine's Day",
        date: "Feb 14",
        game: GameRule::Reveal,
    },
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayStatus {
    pub day_number: u8,
    pub day_name: String,
    pub is_unlocked: bool,
    pub is_completed: bool,
    pub completion_time: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progress {
    pub days: Vec<DayStatus>,
    pub replay_mode: bool,
    pub all_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ProgressEvent {
    DayCompleted { day_number: u8 },
    AllDaysCompleted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("invalid day number {0}, expected 1 through 8")]
    InvalidDay(u32),
}

pub fn compute_unlock(days: &mut [DayStatus], replay_mode: bool) {
    if replay_mode {
        for day in days.iter_mut() {
            day.is_unlocked = true;
        }
        return;
    }

    // Day 1 has no predecessor and is always open.
    let mut previous_completed = true;
    for day in days.iter_mut() {
        day.is_unlocked = previous_completed;
        previous_completed = day.is_completed;
    }
}

impl Progress {
    pub fn new() -> Self {
        let days = DAYS
            .iter()
            .map(|info| DayStatus {
                day_number: info.number,
                day_name: info.name.to_string(),
                is_unlocked: info.number == 1,
                is_completed: false,
                completion_time: None,
            })
            .collect();

        Self {
            days,
            replay_mode: false,
            all_completed: false,
        }
    }

    pub fn complete_day(
        &mut self,
        day_number: u32,
        now: u64,
    ) -> Result<Vec<ProgressEvent>, ProgressError> {
        if day_number < 1 || day_number > DAY_COUNT as u32 {
            return Err(ProgressError::InvalidDay(day_number));
        }

        let index = (day_number - 1) as usize;
        if self.days[index].is_completed {
            // Duplicate completion (a retried request) is a no-op.
            return Ok(Vec::new());
        }

        self.days[index].is_completed = true;
        self.days[index].completion_time = Some(now);

        let mut events = vec![ProgressEvent::DayCompleted {
            day_number: day_number as u8,
        }];

        if self.days.iter().all(|d| d.is_completed) {
            self.all_completed = true;
            self.replay_mode = true;
            events.push(ProgressEvent::AllDaysCompleted);
        }

        compute_unlock(&mut self.days, self.replay_mode);
        Ok(events)
    }

    pub fn reset(&mut self) {
        *self = Progress::new();
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_only_day_one_unlocked() {
        let progress = Progress::new();

        assert_eq!(progress.days.len(), DAY_COUNT);
        assert!(!progress.replay_mode);
        assert!(!progress.all_completed);
        assert_eq!(progress.days[0].day_name, "Rose Day");
        assert_eq!(progress.days[7].day_name, "Valentine's Day");

        for day in &progress.days {
            assert_eq!(day.is_unlocked, day.day_number == 1);
            assert!(!day.is_completed);
            assert_eq!(day.completion_time, None);
        }
    }

    #[test]
    fn completing_a_day_unlocks_the_next() {
        let mut progress = Progress::new();
        let events = progress.complete_day(1, 1_000).unwrap();

        assert_eq!(events, vec![ProgressEvent::DayCompleted { day_number: 1 }]);
        assert!(progress.days[0].is_completed);
        assert_eq!(progress.days[0].completion_time, Some(1_000));
        assert!(progress.days[1].is_unlocked);
        assert!(!progress.days[2].is_unlocked);
    }

    #[test]
    fn completion_is_idempotent() {
        let mut progress = Progress::new();
        progress.complete_day(1, 1_000).unwrap();
        let events = progress.complete_day(1, 2_000).unwrap();

        assert!(events.is_empty());
        assert!(progress.days[0].is_completed);
        // The first completion time sticks.
        assert_eq!(progress.days[0].completion_time, Some(1_000));
    }

    #[test]
    fn out_of_range_days_are_rejected() {
        let mut progress = Progress::new();
        let before = progress.clone();

        assert_eq!(
            progress.complete_day(0, 1_000).unwrap_err(),
            ProgressError::InvalidDay(0)
        );
        assert_eq!(
            progress.complete_day(9, 1_000).unwrap_err(),
            ProgressError::InvalidDay(9)
        );
        assert_eq!(progress, before);
    }

    #[test]
    fn completing_all_days_enables_replay_mode() {
        let mut progress = Progress::new();
        for day in 1..=7 {
            progress.complete_day(day, u64::from(day) * 100).unwrap();
            assert!(!progress.replay_mode);
        }

        let events = progress.complete_day(8, 800).unwrap();
        assert_eq!(
            events,
            vec![
                ProgressEvent::DayCompleted { day_number: 8 },
                ProgressEvent::AllDaysCompleted,
            ]
        );
        assert!(progress.replay_mode);
        assert!(progress.all_completed);
        assert!(progress.days.iter().all(|d| d.is_unlocked));
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut progress = Progress::new();
        for day in 1..=8 {
            progress.complete_day(day, 1_000).unwrap();
        }

        progress.reset();
        assert_eq!(progress, Progress::new());
    }

    #[test]
    fn unlock_policy_follows_predecessor_completion() {
        let mut progress = Progress::new();
        progress.days[0].is_completed = true;
        progress.days[1].is_completed = true;
        progress.days[4].is_completed = true;

        compute_unlock(&mut progress.days, false);

        let unlocked: Vec<bool> = progress.days.iter().map(|d| d.is_unlocked).collect();
        assert_eq!(
            unlocked,
            vec![true, true, true, false, false, true, false, false]
        );
        // Completion flags are derived from, never written by, the policy.
        let completed: Vec<bool> = progress.days.iter().map(|d| d.is_completed).collect();
        assert_eq!(
            completed,
            vec![true, true, false, false, true, false, false, false]
        );
    }

    #[test]
    fn replay_mode_unlocks_everything() {
        let mut progress = Progress::new();
        compute_unlock(&mut progress.days, true);
        assert!(progress.days.iter().all(|d| d.is_unlocked));
        assert!(progress.days.iter().all(|d| !d.is_completed));
    }
}
