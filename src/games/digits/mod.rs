pub mod engine;
pub mod store;
pub mod theme;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use engine::{
    GameConfig, GameState, GuessEngine, MAX_DIGITS, MIN_DIGITS, SubmitResult,
    clamp_digit_count,
};
use rand::Rng;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::time::Duration;
use store::{FileStore, ScoreStore, load_best_or_unset};
use theme::Theme;

const TICK_MS: u64 = 33;
const PROGRESS_WIDTH: usize = 20;
const HISTORY_ROWS: usize = 10;
const FOURDLE_DIGITS: usize = 4;

pub struct DigitsConfig
{
    digit_count: usize,
    fixed_digits: bool,
    allow_repeats: bool,
    theme: Theme,
    store_path: Option<PathBuf>,
}

impl DigitsConfig
{
    /// Options for the configurable game: `--digits`, `--repeats`, `--theme`, `--store`.
    pub fn from_args(args: &[String]) -> Result<Self, String>
    {
        let defaults = GameConfig::default();
        let mut config = Self {
            digit_count: defaults.digit_count,
            fixed_digits: false,
            allow_repeats: defaults.allow_repeats,
            theme: Theme::Cyber,
            store_path: None,
        };

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if let Some(value) = option_value(arg, "--digits", &mut iter)? {
                let count = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid digit count '{value}'"))?;
                config.digit_count = clamp_digit_count(count);
            } else if let Some(value) = option_value(arg, "--theme", &mut iter)? {
                config.theme = Theme::parse(&value)?;
            } else if let Some(value) = option_value(arg, "--store", &mut iter)? {
                config.store_path = Some(PathBuf::from(value));
            } else if arg == "--repeats" {
                config.allow_repeats = true;
            } else {
                return Err(format!("Unknown digits option '{arg}'"));
            }
        }

        Ok(config)
    }

    /// The fixed four-digit variant. Only `--store` is accepted.
    pub fn fourdle_from_args(args: &[String]) -> Result<Self, String>
    {
        let mut config = Self {
            digit_count: FOURDLE_DIGITS,
            fixed_digits: true,
            allow_repeats: false,
            theme: Theme::Classic,
            store_path: None,
        };

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if let Some(value) = option_value(arg, "--store", &mut iter)? {
                config.store_path = Some(PathBuf::from(value));
            } else {
                return Err(format!("Unknown fourdle option '{arg}'"));
            }
        }

        Ok(config)
    }

    fn store(&self) -> FileStore
    {
        match &self.store_path {
            Some(path) => FileStore::new(path.clone()),
            None => FileStore::new(FileStore::default_path()),
        }
    }
}

/// Accepts both `--name value` and `--name=value`.
fn option_value<'a>(
    arg: &str,
    name: &str,
    rest: &mut impl Iterator<Item = &'a String>,
) -> Result<Option<String>, String>
{
    if arg == name {
        let value = rest
            .next()
            .ok_or_else(|| format!("Expected value after {name}"))?;
        return Ok(Some(value.clone()));
    }
    let inline = arg
        .strip_prefix(name)
        .and_then(|tail| tail.strip_prefix('='))
        .map(str::to_string);
    Ok(inline)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action
{
    Digit(u8),
    Backspace,
    Submit,
    NewRound,
    Fewer,
    More,
    Quit,
}

fn action_for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Action>
{
    match code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char(ch) if ch.is_ascii_digit() => Some(Action::Digit(ch as u8 - b'0')),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::NewRound),
        KeyCode::Backspace | KeyCode::Delete => Some(Action::Backspace),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Left | KeyCode::Down => Some(Action::Fewer),
        KeyCode::Right | KeyCode::Up => Some(Action::More),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen
{
    Select,
    Playing,
    Won,
}

struct App<R: Rng>
{
    engine: GuessEngine<R>,
    store: Box<dyn ScoreStore>,
    theme: Theme,
    allow_repeats: bool,
    fixed_digits: bool,
    selected_digits: usize,
    screen: Screen,
    state: Option<GameState>,
    message: String,
}

impl<R: Rng> App<R>
{
    fn new(
        engine: GuessEngine<R>,
        store: Box<dyn ScoreStore>,
        config: &DigitsConfig,
    ) -> Result<Self, String>
    {
        let mut app = Self {
            engine,
            store,
            theme: config.theme,
            allow_repeats: config.allow_repeats,
            fixed_digits: config.fixed_digits,
            selected_digits: config.digit_count,
            screen: Screen::Select,
            state: None,
            message: String::new(),
        };
        if app.fixed_digits {
            app.start_round()?;
        }
        Ok(app)
    }

    fn start_round(&mut self) -> Result<(), String>
    {
        let config = GameConfig {
            digit_count: self.selected_digits,
            allow_repeats: self.allow_repeats,
        };
        let state = self
            .engine
            .start_round(config)
            .map_err(|err| err.to_string())?;
        self.state = Some(state);
        self.screen = Screen::Playing;
        self.message = self.theme.idle().to_string();
        Ok(())
    }

    fn leave_round(&mut self) -> Result<(), String>
    {
        if self.fixed_digits {
            return self.start_round();
        }
        self.state = None;
        self.screen = Screen::Select;
        self.message.clear();
        Ok(())
    }

    /// Returns `true` when the player asked to quit.
    fn apply(&mut self, action: Action) -> Result<bool, String>
    {
        if action == Action::Quit {
            return Ok(true);
        }

        match self.screen {
            Screen::Select => match action {
                Action::Fewer => {
                    self.selected_digits = clamp_digit_count(self.selected_digits.saturating_sub(1));
                }
                Action::More => {
                    self.selected_digits = clamp_digit_count(self.selected_digits + 1);
                }
                Action::Submit | Action::NewRound => self.start_round()?,
                _ => {}
            },
            Screen::Playing => match action {
                Action::Digit(digit) => {
                    if let Some(state) = self.state.take() {
                        self.state = Some(self.engine.enter_digit(state, digit));
                    }
                }
                Action::Backspace => {
                    if let Some(state) = self.state.take() {
                        self.state = Some(self.engine.backspace(state));
                    }
                }
                Action::Submit => self.submit(),
                Action::NewRound => self.leave_round()?,
                _ => {}
            },
            Screen::Won => match action {
                Action::Submit | Action::NewRound => self.leave_round()?,
                _ => {}
            },
        }

        Ok(false)
    }

    fn submit(&mut self)
    {
        let Some(state) = self.state.take() else {
            return;
        };
        let (state, result) = self.engine.submit(state);
        self.state = Some(state);
        self.message = self.theme.message_for(result);

        if let SubmitResult::Won { .. } = result {
            self.screen = Screen::Won;
            if let Some(best) = self.engine.best_score() {
                if let Err(err) = self.store.save_best(best) {
                    log::warn!("Couldn't save best score: {err}");
                }
            }
        }
    }

    fn best_label(&self) -> String
    {
        match self.engine.best_score() {
            Some(best) => best.to_string(),
            None => "-".to_string(),
        }
    }

    fn render_lines(&self) -> Vec<String>
    {
        let mut lines = Vec::new();
        lines.push(format!("KB Games - {}", self.theme.title()));

        let Some(state) = self.state.as_ref().filter(|_| self.screen != Screen::Select) else {
            lines.push(format!("Best score: {}", self.best_label()));
            lines.push(String::new());
            lines.push(format!("Digits: < {} >", self.selected_digits));
            lines.push(String::new());
            lines.push(format!(
                "Left/Right choose {}-{} digits. Enter starts. Esc quits.",
                MIN_DIGITS, MAX_DIGITS
            ));
            return lines;
        };

        lines.push(format!(
            "Attempts: {}  Best: {}  Digits: {}",
            state.attempts(),
            self.best_label(),
            state.digit_count()
        ));
        lines.push(String::new());
        lines.push(render_slots(state));
        lines.push(render_progress(state.progress_percent()));
        lines.push(String::new());
        lines.push(self.message.clone());
        lines.push(String::new());

        if !state.history().is_empty() {
            lines.push("History:".to_string());
            for entry in state.history().iter().rev().take(HISTORY_ROWS) {
                let guess: String = entry.guess.iter().map(|d| char::from(b'0' + d)).collect();
                lines.push(format!(
                    "  #{:<3} {}  Correct: {}",
                    entry.attempt_number, guess, entry.correct_positions
                ));
            }
            lines.push(String::new());
        }

        if self.screen == Screen::Won {
            lines.push("Enter or N starts a new round. Esc quits.".to_string());
        } else {
            lines.push("Type digits, Backspace edits, Enter submits.".to_string());
            lines.push("N starts a new round. Esc quits.".to_string());
        }
        lines
    }
}

fn render_slots(state: &GameState) -> String
{
    state
        .guess()
        .iter()
        .enumerate()
        .map(|(idx, slot)| {
            let ch = slot.map_or('_', |digit| char::from(b'0' + digit));
            if idx == state.cursor() && !state.is_won() {
                format!("[{ch}]")
            } else {
                format!(" {ch} ")
            }
        })
        .collect()
}

fn render_progress(percent: usize) -> String
{
    let filled = percent.min(100) * PROGRESS_WIDTH / 100;
    format!(
        "[{}{}] {percent}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled)
    )
}

struct TerminalGuard
{
    stdout: Stdout,
}

impl TerminalGuard
{
    fn enter() -> io::Result<Self>
    {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;
        Ok(Self { stdout })
    }

    fn stdout(&mut self) -> &mut Stdout
    {
        &mut self.stdout
    }
}

impl Drop for TerminalGuard
{
    fn drop(&mut self)
    {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub fn run_with_config(config: DigitsConfig) -> Result<(), String>
{
    let store = config.store();
    log::info!("Using score store {}", store.path().display());
    let engine = GuessEngine::new(load_best_or_unset(&store));
    let mut app = App::new(engine, Box::new(store), &config)?;

    let mut term = TerminalGuard::enter().map_err(|err| err.to_string())?;
    draw(term.stdout(), &app.render_lines())?;

    loop {
        if !event::poll(Duration::from_millis(TICK_MS)).map_err(|err| err.to_string())? {
            continue;
        }
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read().map_err(|err| err.to_string())?
        else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        let Some(action) = action_for_key(code, modifiers) else {
            continue;
        };
        if app.apply(action)? {
            break;
        }
        draw(term.stdout(), &app.render_lines())?;
    }

    Ok(())
}

fn draw(stdout: &mut Stdout, lines: &[String]) -> Result<(), String>
{
    let output = format!("{}\r\n", lines.join("\r\n"));
    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All)).map_err(|err| err.to_string())?;
    stdout.write_all(output.as_bytes()).map_err(|err| err.to_string())?;
    stdout.flush().map_err(|err| err.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use super::store::MemoryStore;

    fn args(list: &[&str]) -> Vec<String>
    {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    fn app(config: &DigitsConfig) -> App<StdRng>
    {
        let engine = GuessEngine::with_rng(StdRng::seed_from_u64(11), None);
        App::new(engine, Box::new(MemoryStore::default()), config).unwrap()
    }

    fn type_digits(app: &mut App<StdRng>, digits: &[u8])
    {
        for &digit in digits {
            app.apply(Action::Digit(digit)).unwrap();
        }
    }

    /// Two-digit rounds are small enough to sweep every guess.
    fn solve(app: &mut App<StdRng>)
    {
        for first in 0..10u8 {
            for second in 0..10u8 {
                type_digits(app, &[first, second]);
                app.apply(Action::Submit).unwrap();
                if app.screen == Screen::Won {
                    return;
                }
            }
        }
        panic!("no two-digit guess matched");
    }

    #[test]
    fn from_args_parses_options()
    {
        let config =
            DigitsConfig::from_args(&args(&["--digits=9", "--repeats", "--theme", "classic"]))
                .unwrap();
        assert_eq!(config.digit_count, MAX_DIGITS);
        assert!(config.allow_repeats);
        assert_eq!(config.theme, Theme::Classic);
        assert!(!config.fixed_digits);

        let config = DigitsConfig::from_args(&args(&["--digits", "1", "--store=/tmp/x.json"])).unwrap();
        assert_eq!(config.digit_count, MIN_DIGITS);
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/x.json")));
    }

    #[test]
    fn from_args_rejects_bad_input()
    {
        assert!(DigitsConfig::from_args(&args(&["--digits"])).is_err());
        assert!(DigitsConfig::from_args(&args(&["--digits=four"])).is_err());
        assert!(DigitsConfig::from_args(&args(&["--wpm=20"])).is_err());
        assert!(DigitsConfig::fourdle_from_args(&args(&["--digits=3"])).is_err());
    }

    #[test]
    fn keys_map_to_actions()
    {
        let none = KeyModifiers::NONE;
        assert_eq!(action_for_key(KeyCode::Char('7'), none), Some(Action::Digit(7)));
        assert_eq!(action_for_key(KeyCode::Enter, none), Some(Action::Submit));
        assert_eq!(action_for_key(KeyCode::Backspace, none), Some(Action::Backspace));
        assert_eq!(action_for_key(KeyCode::Char('n'), none), Some(Action::NewRound));
        assert_eq!(
            action_for_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Action::Quit)
        );
        assert_eq!(action_for_key(KeyCode::Char('x'), none), None);
    }

    #[test]
    fn selector_clamps_and_starts_round()
    {
        let config = DigitsConfig::from_args(&args(&["--digits=5"])).unwrap();
        let mut app = app(&config);
        assert_eq!(app.screen, Screen::Select);
        for _ in 0..5 {
            app.apply(Action::More).unwrap();
        }
        assert_eq!(app.selected_digits, MAX_DIGITS);
        for _ in 0..10 {
            app.apply(Action::Fewer).unwrap();
        }
        assert_eq!(app.selected_digits, MIN_DIGITS);

        app.apply(Action::Submit).unwrap();
        assert_eq!(app.screen, Screen::Playing);
        assert_eq!(app.state.as_ref().unwrap().digit_count(), MIN_DIGITS);
        assert_eq!(app.message, Theme::Cyber.idle());
    }

    #[test]
    fn fourdle_starts_immediately_with_four_digits()
    {
        let config = DigitsConfig::fourdle_from_args(&[]).unwrap();
        let app = app(&config);
        assert_eq!(app.screen, Screen::Playing);
        assert_eq!(app.state.as_ref().unwrap().digit_count(), FOURDLE_DIGITS);
        assert!(app.render_lines()[0].contains("Guess the Number"));
    }

    #[test]
    fn incomplete_submit_shows_message()
    {
        let config = DigitsConfig::fourdle_from_args(&[]).unwrap();
        let mut app = app(&config);
        type_digits(&mut app, &[1, 2]);
        app.apply(Action::Submit).unwrap();
        assert_eq!(app.message, Theme::Classic.incomplete());
        assert_eq!(app.state.as_ref().unwrap().attempts(), 0);
        assert_eq!(app.state.as_ref().unwrap().cursor(), 2);
    }

    #[test]
    fn win_saves_best_score_and_new_round_resets()
    {
        let config = DigitsConfig::from_args(&args(&["--digits=2"])).unwrap();
        let mut app = app(&config);
        app.apply(Action::Submit).unwrap();
        solve(&mut app);

        assert_eq!(app.screen, Screen::Won);
        let attempts = app.state.as_ref().unwrap().attempts();
        assert_eq!(app.engine.best_score(), Some(attempts));
        assert_eq!(app.store.load_best().unwrap(), Some(attempts));
        assert!(app.render_lines().iter().any(|line| line.contains("Enter or N")));

        let won = app.state.clone();
        app.apply(Action::Digit(3)).unwrap();
        app.apply(Action::Backspace).unwrap();
        assert_eq!(app.state, won);

        app.apply(Action::Submit).unwrap();
        assert_eq!(app.screen, Screen::Select);
        assert!(app.state.is_none());
    }

    #[test]
    fn quit_is_reported()
    {
        let config = DigitsConfig::fourdle_from_args(&[]).unwrap();
        let mut app = app(&config);
        assert!(app.apply(Action::Quit).unwrap());
        assert!(!app.apply(Action::Backspace).unwrap());
    }

    #[test]
    fn slots_and_progress_render()
    {
        let config = DigitsConfig::fourdle_from_args(&[]).unwrap();
        let mut app = app(&config);
        type_digits(&mut app, &[4, 2]);
        let state = app.state.as_ref().unwrap();
        assert_eq!(render_slots(state), " 4  2 [_] _ ");
        assert_eq!(render_progress(0), format!("[{}] 0%", "-".repeat(PROGRESS_WIDTH)));
        assert_eq!(
            render_progress(50),
            format!("[{}{}] 50%", "#".repeat(10), "-".repeat(10))
        );
    }
}
