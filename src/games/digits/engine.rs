use crate::error::GameError;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::{Rng, thread_rng};

pub const MIN_DIGITS: usize = 2;
pub const MAX_DIGITS: usize = 6;
pub const DEFAULT_DIGITS: usize = 4;

/// Clamps a digit-count selector value into the playable range.
pub fn clamp_digit_count(count: usize) -> usize
{
    count.clamp(MIN_DIGITS, MAX_DIGITS)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig
{
    pub digit_count: usize,
    pub allow_repeats: bool,
}

impl Default for GameConfig
{
    fn default() -> Self
    {
        Self {
            digit_count: DEFAULT_DIGITS,
            allow_repeats: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status
{
    InProgress,
    Won,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry
{
    pub guess: Vec<u8>,
    pub correct_positions: usize,
    pub attempt_number: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection
{
    Incomplete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitResult
{
    Rejected(Rejection),
    Continuing { correct_positions: usize },
    Won { attempts: u32, correct_positions: usize },
}

/// One round of play. Owned by the caller and threaded through the
/// [`GuessEngine`] operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState
{
    secret: Vec<u8>,
    guess: Vec<Option<u8>>,
    cursor: usize,
    attempts: u32,
    best_score: Option<u32>,
    status: Status,
    history: Vec<HistoryEntry>,
}

impl GameState
{
    fn new(secret: Vec<u8>, best_score: Option<u32>) -> Self
    {
        Self {
            guess: vec![None; secret.len()],
            secret,
            cursor: 0,
            attempts: 0,
            best_score,
            status: Status::InProgress,
            history: Vec::new(),
        }
    }

    pub fn digit_count(&self) -> usize
    {
        self.secret.len()
    }

    pub fn guess(&self) -> &[Option<u8>]
    {
        &self.guess
    }

    pub fn cursor(&self) -> usize
    {
        self.cursor
    }

    pub fn attempts(&self) -> u32
    {
        self.attempts
    }

    pub fn is_won(&self) -> bool
    {
        self.status == Status::Won
    }

    /// Attempts of this round, oldest first.
    pub fn history(&self) -> &[HistoryEntry]
    {
        &self.history
    }

    /// Share of digits aligned by the latest attempt, 0 before any attempt.
    pub fn progress_percent(&self) -> usize
    {
        self.history
            .last()
            .map(|entry| entry.correct_positions * 100 / self.digit_count())
            .unwrap_or(0)
    }

    fn correct_positions(&self) -> usize
    {
        self.guess
            .iter()
            .zip(self.secret.iter())
            .filter(|(guess, secret)| **guess == Some(**secret))
            .count()
    }

    fn clear_guess(&mut self)
    {
        self.guess.fill(None);
        self.cursor = 0;
    }
}

pub struct GuessEngine<R = ThreadRng>
{
    rng: R,
    best_score: Option<u32>,
}

impl GuessEngine<ThreadRng>
{
    pub fn new(best_score: Option<u32>) -> Self
    {
        Self::with_rng(thread_rng(), best_score)
    }
}

impl<R: Rng> GuessEngine<R>
{
    pub fn with_rng(rng: R, best_score: Option<u32>) -> Self
    {
        Self { rng, best_score }
    }

    pub fn best_score(&self) -> Option<u32>
    {
        self.best_score
    }

    pub fn start_round(&mut self, config: GameConfig) -> Result<GameState, GameError>
    {
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&config.digit_count) {
            return Err(GameError::InvalidConfig {
                got: config.digit_count,
                min: MIN_DIGITS,
                max: MAX_DIGITS,
            });
        }

        let secret = self.generate_secret(config);
        log::debug!(
            "New round: {} digits, repeats {}, secret {:?}",
            config.digit_count,
            config.allow_repeats,
            secret
        );
        Ok(GameState::new(secret, self.best_score))
    }

    fn generate_secret(&mut self, config: GameConfig) -> Vec<u8>
    {
        if config.allow_repeats {
            (0..config.digit_count)
                .map(|_| self.rng.gen_range(0..10u8))
                .collect()
        } else {
            let mut pool: Vec<u8> = (0..10).collect();
            pool.shuffle(&mut self.rng);
            pool.truncate(config.digit_count);
            pool
        }
    }

    pub fn enter_digit(&self, mut state: GameState, digit: u8) -> GameState
    {
        if state.is_won() || state.cursor >= state.digit_count() || digit > 9 {
            return state;
        }
        state.guess[state.cursor] = Some(digit);
        state.cursor += 1;
        state
    }

    pub fn backspace(&self, mut state: GameState) -> GameState
    {
        if state.is_won() || state.cursor == 0 {
            return state;
        }
        state.cursor -= 1;
        state.guess[state.cursor] = None;
        state
    }

    pub fn submit(&mut self, mut state: GameState) -> (GameState, SubmitResult)
    {
        if state.is_won() || state.guess.iter().any(Option::is_none) {
            return (state, SubmitResult::Rejected(Rejection::Incomplete));
        }

        state.attempts += 1;
        let correct_positions = state.correct_positions();
        state.history.push(HistoryEntry {
            guess: state.guess.iter().flatten().copied().collect(),
            correct_positions,
            attempt_number: state.attempts,
        });

        if correct_positions == state.digit_count() {
            state.status = Status::Won;
            let best = match state.best_score {
                Some(best) => best.min(state.attempts),
                None => state.attempts,
            };
            state.best_score = Some(best);
            self.best_score = Some(self.best_score.map_or(best, |prev| prev.min(best)));
            log::info!("Round won in {} attempts, best {}", state.attempts, best);
            let attempts = state.attempts;
            return (
                state,
                SubmitResult::Won {
                    attempts,
                    correct_positions,
                },
            );
        }

        state.clear_guess();
        (state, SubmitResult::Continuing { correct_positions })
    }
}
