//! Win-condition state machines for the daily mini-games.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use thiserror::Error;

use crate::{GameRule, QuizSet, DAYS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MinigameError {
    #[error("unknown day {0}")]
    UnknownDay(u32),
    #[error("unknown target {0}")]
    UnknownTarget(u8),
    #[error("card index {0} out of range")]
    CardOutOfRange(usize),
    #[error("card already face up")]
    CardAlreadyFaceUp,
    #[error("round is over")]
    RoundOver,
    #[error("quiz already finished")]
    QuizFinished,
    #[error("choice {0} out of range")]
    ChoiceOutOfRange(usize),
    #[error("tile index {0} out of range")]
    TileOutOfRange(usize),
}

/// Tap-to-find round: won once every hidden target has been tapped.
/// Rose Day hides 10 roses, Hug Day scatters 10 hearts.
#[derive(Debug, Clone)]
pub struct TapFind {
    total: u8,
    found: HashSet<u8>,
}

impl TapFind {
    pub fn new(total: u8) -> Self {
        Self {
            total,
            found: HashSet::new(),
        }
    }

    /// Taps target `id` (1-based). Repeat taps are no-ops; returns whether
    /// this tap was a new find.
    pub fn tap(&mut self, id: u8) -> Result<bool, MinigameError> {
        if id == 0 || id > self.total {
            return Err(MinigameError::UnknownTarget(id));
        }
        Ok(self.found.insert(id))
    }

    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    pub fn is_won(&self) -> bool {
        self.found.len() == usize::from(self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub pair_id: u8,
    pub face_up: bool,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlipOutcome {
    FirstCard,
    Matched { pair_id: u8 },
    Mismatch,
}

/// Two-card-flip memory board. A matched pair locks face up for good; a
/// mismatch turns both cards back down.
#[derive(Debug, Clone)]
pub struct MemoryMatch {
    cards: Vec<Card>,
    first_up: Option<usize>,
    matched_pairs: u8,
    pairs: u8,
}

impl MemoryMatch {
    pub fn new(pairs: u8, rng: &mut impl Rng) -> Self {
        let mut cards = Vec::with_capacity(usize::from(pairs) * 2);
        for pair_id in 1..=pairs {
            for _ in 0..2 {
                cards.push(Card {
                    pair_id,
                    face_up: false,
                    matched: false,
                });
            }
        }
        cards.shuffle(rng);

        Self {
            cards,
            first_up: None,
            matched_pairs: 0,
            pairs,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn matched_pairs(&self) -> u8 {
        self.matched_pairs
    }

    pub fn flip(&mut self, index: usize) -> Result<FlipOutcome, MinigameError> {
        let card = self
            .cards
            .get(index)
            .ok_or(MinigameError::CardOutOfRange(index))?;
        if card.face_up || card.matched {
            return Err(MinigameError::CardAlreadyFaceUp);
        }

        match self.first_up.take() {
            None => {
                self.cards[index].face_up = true;
                self.first_up = Some(index);
                Ok(FlipOutcome::FirstCard)
            }
            Some(first) if self.cards[first].pair_id == self.cards[index].pair_id => {
                let pair_id = self.cards[index].pair_id;
                self.cards[first].matched = true;
                self.cards[index].matched = true;
                self.cards[index].face_up = true;
                self.matched_pairs += 1;
                Ok(FlipOutcome::Matched { pair_id })
            }
            Some(first) => {
                self.cards[first].face_up = false;
                Ok(FlipOutcome::Mismatch)
            }
        }
    }

    pub fn is_won(&self) -> bool {
        self.matched_pairs == self.pairs
    }
}

/// Timed catch round. The caller feeds elapsed seconds via `advance`;
/// catches only count while time remains. Chocolate Day asks for 15
/// chocolates inside 30 seconds, with a retry on a short round.
#[derive(Debug, Clone)]
pub struct CatchGame {
    goal: u16,
    time_limit_secs: u16,
    elapsed_secs: u16,
    caught: u16,
}

impl CatchGame {
    pub fn new(goal: u16, time_limit_secs: u16) -> Self {
        Self {
            goal,
            time_limit_secs,
            elapsed_secs: 0,
            caught: 0,
        }
    }

    pub fn catch(&mut self) -> Result<u16, MinigameError> {
        if self.time_is_up() {
            return Err(MinigameError::RoundOver);
        }
        self.caught += 1;
        Ok(self.caught)
    }

    pub fn advance(&mut self, secs: u16) {
        self.elapsed_secs = self
            .elapsed_secs
            .saturating_add(secs)
            .min(self.time_limit_secs);
    }

    pub fn restart(&mut self) {
        self.elapsed_secs = 0;
        self.caught = 0;
    }

    pub fn time_is_up(&self) -> bool {
        self.elapsed_secs >= self.time_limit_secs
    }

    pub fn caught(&self) -> u16 {
        self.caught
    }

    pub fn is_won(&self) -> bool {
        self.time_is_up() && self.caught >= self.goal
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub prompt: &'static str,
    pub choices: [&'static str; 4],
    pub correct: usize,
    pub fact: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub finished: bool,
}

const LOVE_QUIZ: [QuizQuestion; 5] = [
    QuizQuestion {
        prompt: "What is considered the 'love hormone'?",
        choices: ["Dopamine", "Oxytocin", "Serotonin", "Adrenaline"],
        correct: 1,
        fact: Some("Oxytocin is released during hugs, kisses, and cuddles!"),
    },
    QuizQuestion {
        prompt: "How long does it take to fall in love?",
        choices: ["1 week", "1 month", "1/5th of a second", "1 year"],
        correct: 2,
        fact: Some("Science says it takes just 1/5th of a second to fall in love!"),
    },
    QuizQuestion {
        prompt: "What percentage of the body is made up when you hug someone?",
        choices: [
            "One complete heart",
            "Two halves",
            "Infinite connection",
            "Perfect match",
        ],
        correct: 0,
        fact: Some("When you hug, your hearts sync up creating one rhythm!"),
    },
    QuizQuestion {
        prompt: "Couples who do this together are happier:",
        choices: ["Watch TV", "Cook together", "Laugh together", "All of the above"],
        correct: 3,
        fact: Some("Shared activities strengthen bonds and create lasting memories!"),
    },
    QuizQuestion {
        prompt: "The ancient Greeks had how many words for love?",
        choices: ["1", "4", "8", "12"],
        correct: 2,
        fact: Some("Ancient Greeks recognized 8 different types of love!"),
    },
];

const KISS_QUESTIONS: [QuizQuestion; 3] = [
    QuizQuestion {
        prompt: "What's my favorite thing about you?",
        choices: ["Your smile", "Your humor", "Everything", "Your kindness"],
        correct: 2,
        fact: None,
    },
    QuizQuestion {
        prompt: "What makes us special?",
        choices: ["Our love", "Our bond", "Our connection", "All of the above"],
        correct: 3,
        fact: None,
    },
    QuizQuestion {
        prompt: "What's the best part of our relationship?",
        choices: ["Trust", "Understanding", "Love", "All together"],
        correct: 3,
        fact: None,
    },
];

/// Question-by-question quiz. Every answer advances; the score counts
/// correct picks but never gates completion.
#[derive(Debug, Clone)]
pub struct Quiz {
    questions: &'static [QuizQuestion],
    current: usize,
    score: u8,
}

impl Quiz {
    pub fn for_set(set: QuizSet) -> Self {
        let questions: &'static [QuizQuestion] = match set {
            QuizSet::Love => &LOVE_QUIZ,
            QuizSet::Kiss => &KISS_QUESTIONS,
        };
        Self {
            questions,
            current: 0,
            score: 0,
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    pub fn answer(&mut self, choice: usize) -> Result<AnswerOutcome, MinigameError> {
        let question = self
            .questions
            .get(self.current)
            .ok_or(MinigameError::QuizFinished)?;
        if choice >= question.choices.len() {
            return Err(MinigameError::ChoiceOutOfRange(choice));
        }

        let correct = choice == question.correct;
        if correct {
            self.score += 1;
        }
        self.current += 1;

        Ok(AnswerOutcome {
            correct,
            finished: self.current == self.questions.len(),
        })
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn is_won(&self) -> bool {
        self.current >= self.questions.len()
    }
}

/// Swap puzzle: tap two tiles to exchange them, solved when the tiles read
/// in order. Promise Day uses a 3x3 board.
#[derive(Debug, Clone)]
pub struct SlidePuzzle {
    tiles: Vec<u8>,
    side: u8,
}

impl SlidePuzzle {
    pub fn new(side: u8, rng: &mut impl Rng) -> Self {
        let count = usize::from(side) * usize::from(side);
        let mut tiles: Vec<u8> = (0..count as u8).collect();
        if count > 1 {
            // Re-roll a shuffle that happens to come out already solved.
            loop {
                tiles.shuffle(rng);
                if !is_ordered(&tiles) {
                    break;
                }
            }
        }
        Self { tiles, side }
    }

    pub fn side(&self) -> u8 {
        self.side
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    /// Swaps the tiles at `a` and `b`, returning whether the board is now
    /// solved.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<bool, MinigameError> {
        if a >= self.tiles.len() {
            return Err(MinigameError::TileOutOfRange(a));
        }
        if b >= self.tiles.len() {
            return Err(MinigameError::TileOutOfRange(b));
        }
        self.tiles.swap(a, b);
        Ok(self.is_won())
    }

    pub fn is_won(&self) -> bool {
        is_ordered(&self.tiles)
    }
}

fn is_ordered(tiles: &[u8]) -> bool {
    tiles.iter().enumerate().all(|(i, &tile)| tile == i as u8)
}

/// Valentine's Day finale: a single reveal press wins.
#[derive(Debug, Clone, Default)]
pub struct Reveal {
    revealed: bool,
}

impl Reveal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn is_won(&self) -> bool {
        self.revealed
    }
}

/// A live mini-game for one day of the week. Reaching `is_won` is the
/// caller's cue to report `complete_day` for that day exactly once.
#[derive(Debug, Clone)]
pub enum Session {
    TapFind(TapFind),
    MemoryMatch(MemoryMatch),
    Catch(CatchGame),
    Quiz(Quiz),
    SlidePuzzle(SlidePuzzle),
    Reveal(Reveal),
}

impl Session {
    pub fn for_day(day_number: u32, rng: &mut impl Rng) -> Result<Self, MinigameError> {
        let info = DAYS
            .iter()
            .find(|d| u32::from(d.number) == day_number)
            .ok_or(MinigameError::UnknownDay(day_number))?;

        let session = match info.game {
            GameRule::TapFind { targets } => Session::TapFind(TapFind::new(targets)),
            GameRule::MemoryMatch { pairs } => Session::MemoryMatch(MemoryMatch::new(pairs, rng)),
            GameRule::Catch {
                goal,
                time_limit_secs,
            } => Session::Catch(CatchGame::new(goal, time_limit_secs)),
            GameRule::Quiz { set } => Session::Quiz(Quiz::for_set(set)),
            GameRule::SlidePuzzle { side } => Session::SlidePuzzle(SlidePuzzle::new(side, rng)),
            GameRule::Reveal => Session::Reveal(Reveal::new()),
        };
        Ok(session)
    }

    pub fn is_won(&self) -> bool {
        match self {
            Session::TapFind(game) => game.is_won(),
            Session::MemoryMatch(game) => game.is_won(),
            Session::Catch(game) => game.is_won(),
            Session::Quiz(game) => game.is_won(),
            Session::SlidePuzzle(game) => game.is_won(),
            Session::Reveal(game) => game.is_won(),
        }
    }
}
