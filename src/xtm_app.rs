// Menu-driven application state
// Turns submitted input lines into session and score-log operations.
// Nothing here touches the terminal; xtm_ui renders whatever screen is current.

use rand::rngs::StdRng;
use std::path::PathBuf;

use crate::xtm_board::FlagOutcome;
use crate::xtm_game::{Config, Difficulty, GameSettings, save_config_to};
use crate::xtm_input::{InputError, parse_action, parse_bounded, parse_token};
use crate::xtm_scores::{PlayerRecord, ScoreLog, player_stats, top_winners, winners};
use crate::xtm_session::{GameSession, SessionState, Turn};

pub const HELP_LINES: [&str; 6] = [
    "- Goal: Reveal all non-bomb cells.",
    "- Enter a row, then a column, then an action.",
    "- 'r' to reveal a cell.",
    "- 'f' to flag/unflag a cell.",
    "- You can place as many flags as there are bombs.",
    "- Avoid bombs!",
];

/// Which part of a move is being asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePrompt {
    Row,
    Column(usize),
    Action,
}

#[derive(Debug, Clone)]
pub enum Screen {
    Menu,
    Name,
    Difficulty { name: String },
    Playing { name: String, session: GameSession, prompt: MovePrompt },
    GameOver { name: String, session: GameSession },
    ScoresFilter,
    ScoresCount { filter: String, winners: Vec<PlayerRecord> },
    StatsName,
    Report { title: String, lines: Vec<String> },
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

pub struct App {
    pub cfg: Config,
    config_file: Option<PathBuf>, // where preference changes are saved, if anywhere
    scores: ScoreLog,
    rng: StdRng,
    screen: Screen,
    input: String,
    notice: Option<Notice>,
}

impl App {
    pub fn new(cfg: Config, config_file: Option<PathBuf>, scores: ScoreLog, rng: StdRng) -> Self {
        App {
            cfg,
            config_file,
            scores,
            rng,
            screen: Screen::Menu,
            input: String::new(),
            notice: None,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn scores(&self) -> &ScoreLog {
        &self.scores
    }

    pub fn is_exit(&self) -> bool {
        matches!(self.screen, Screen::Exit)
    }

    pub fn type_char(&mut self, c: char) {
        // one token is all any prompt needs
        if self.input.chars().count() < 32 {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Text shown in front of the input line
    pub fn prompt(&self) -> String {
        match &self.screen {
            Screen::Menu => "Enter your choice (1-5):".to_string(),
            Screen::Name => "Enter your name:".to_string(),
            Screen::Difficulty { .. } => "Select difficulty (1: Easy, 2: Medium, 3: Hard):".to_string(),
            Screen::Playing { prompt, .. } => match prompt {
                MovePrompt::Row => "Enter row:".to_string(),
                MovePrompt::Column(_) => "Enter column:".to_string(),
                MovePrompt::Action => "Enter action (r to reveal, f to flag):".to_string(),
            },
            Screen::GameOver { .. } => "1. Play Again   2. Go Back to Main Menu   Enter choice:".to_string(),
            Screen::ScoresFilter => "Enter difficulty to filter (Easy/Medium/Hard):".to_string(),
            Screen::ScoresCount { winners, .. } => {
                format!("Enter number of top players to display (1-{}):", winners.len())
            }
            Screen::StatsName => "Enter player name to view stats:".to_string(),
            Screen::Report { .. } => "Press Enter to continue".to_string(),
            Screen::Exit => String::new(),
        }
    }

    /// Esc: leave the current screen, or quit from the main menu
    pub fn back(&mut self) {
        self.notice = None;
        match &self.screen {
            Screen::Menu => {
                self.goto(Screen::Exit, "");
                self.info("Exiting the game. Goodbye!");
            }
            Screen::Playing { name, .. } => {
                log::info!("{} abandoned a game", name);
                self.goto(Screen::Menu, "");
            }
            _ => self.goto(Screen::Menu, ""),
        }
    }

    /// Enter: hand the input line to the current screen
    pub fn submit(&mut self) {
        let line = std::mem::take(&mut self.input);
        self.notice = None;
        let screen = std::mem::replace(&mut self.screen, Screen::Menu);
        let next = match screen {
            Screen::Menu => self.on_menu(&line),
            Screen::Name => self.on_name(&line),
            Screen::Difficulty { name } => self.on_difficulty(name, &line),
            Screen::Playing {
                name,
                session,
                prompt,
            } => self.on_move(name, session, prompt, &line),
            Screen::GameOver { name, session } => self.on_game_over(name, session, &line),
            Screen::ScoresFilter => self.on_scores_filter(&line),
            Screen::ScoresCount { filter, winners } => self.on_scores_count(filter, winners, &line),
            Screen::StatsName => self.on_stats_name(&line),
            Screen::Report { .. } => Screen::Menu,
            Screen::Exit => Screen::Exit,
        };
        let prefill = self.prefill_for(&next);
        self.goto(next, &prefill);
    }

    fn goto(&mut self, screen: Screen, prefill: &str) {
        self.screen = screen;
        self.input = prefill.to_string();
    }

    /// Remembered answers offered as the default for some prompts
    fn prefill_for(&self, screen: &Screen) -> String {
        match screen {
            Screen::Name | Screen::StatsName => self.cfg.player_name.clone(),
            Screen::Difficulty { .. } => self.cfg.difficulty.to_choice().to_string(),
            Screen::ScoresFilter => self.cfg.difficulty.name().to_string(),
            _ => String::new(),
        }
    }

    fn warn(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Warning,
            text: text.into(),
        });
    }

    fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Info,
            text: text.into(),
        });
    }

    fn retry(&mut self, err: InputError, screen: Screen) -> Screen {
        self.warn(err.to_string());
        screen
    }

    fn on_menu(&mut self, line: &str) -> Screen {
        match parse_bounded(line, 1, 5) {
            Ok(1) => Screen::Name,
            Ok(2) => Screen::ScoresFilter,
            Ok(3) => Screen::StatsName,
            Ok(4) => Screen::Report {
                title: "How to Play".to_string(),
                lines: HELP_LINES.iter().map(|s| s.to_string()).collect(),
            },
            Ok(_) => {
                self.info("Exiting the game. Goodbye!");
                Screen::Exit
            }
            Err(e) => self.retry(e, Screen::Menu),
        }
    }

    fn on_name(&mut self, line: &str) -> Screen {
        match parse_token(line) {
            Ok(name) => {
                if self.cfg.player_name != name {
                    self.cfg.player_name = name.clone();
                    self.persist();
                }
                Screen::Difficulty { name }
            }
            Err(e) => self.retry(e, Screen::Name),
        }
    }

    fn on_difficulty(&mut self, name: String, line: &str) -> Screen {
        let difficulty = match parse_bounded(line, 1, 3).map(Difficulty::from_choice) {
            Ok(Some(d)) => d,
            Ok(None) => return Screen::Difficulty { name },
            Err(e) => return self.retry(e, Screen::Difficulty { name }),
        };
        if self.cfg.difficulty != difficulty {
            self.cfg.difficulty = difficulty;
            self.persist();
        }
        match GameSession::start(GameSettings::for_difficulty(difficulty), &mut self.rng) {
            Ok(session) if session.is_finished() => self.finish_game(name, session),
            Ok(session) => Screen::Playing {
                name,
                session,
                prompt: MovePrompt::Row,
            },
            Err(e) => {
                log::error!("could not build a {} board: {}", difficulty.name(), e);
                self.warn(format!("Could not start the game: {}", e));
                Screen::Menu
            }
        }
    }

    fn on_move(&mut self, name: String, mut session: GameSession, prompt: MovePrompt, line: &str) -> Screen {
        let max = session.board().size() as i64 - 1;
        let prompt = match prompt {
            MovePrompt::Row => match parse_bounded(line, 0, max) {
                Ok(row) => MovePrompt::Column(row as usize),
                Err(e) => {
                    self.warn(e.to_string());
                    MovePrompt::Row
                }
            },
            MovePrompt::Column(row) => match parse_bounded(line, 0, max) {
                Ok(col) => match session.select(row, col as usize) {
                    Ok(()) => MovePrompt::Action,
                    Err(e) => {
                        self.warn(e.to_string());
                        MovePrompt::Row
                    }
                },
                Err(e) => {
                    self.warn(e.to_string());
                    MovePrompt::Column(row)
                }
            },
            MovePrompt::Action => match parse_action(line) {
                Ok(action) => match session.act(action) {
                    Ok(Turn::Won) | Ok(Turn::Lost) => return self.finish_game(name, session),
                    Ok(Turn::Flagged(FlagOutcome::BudgetExhausted)) => {
                        self.warn("No flags left. Remove a flag first.");
                        MovePrompt::Row
                    }
                    Ok(_) => MovePrompt::Row,
                    Err(e) => {
                        log::warn!("unexpected move from {}: {}", name, e);
                        MovePrompt::Row
                    }
                },
                Err(e) => {
                    // a bad action gives up the target, not the turn
                    session.cancel();
                    self.warn(e.to_string());
                    MovePrompt::Row
                }
            },
        };
        Screen::Playing {
            name,
            session,
            prompt,
        }
    }

    fn finish_game(&mut self, name: String, session: GameSession) -> Screen {
        let secs = session.elapsed_secs();
        match session.state() {
            SessionState::Won => self.info(format!("Congratulations! You cleared the minefield in {}s!", secs)),
            _ => self.warn(format!("BOOM! You hit a bomb! ({}s)", secs)),
        }
        match session.record(&name) {
            Some(Ok(record)) => {
                if let Err(e) = self.scores.append(&record) {
                    log::error!("could not save score for {}: {}", name, e);
                    self.warn(format!("Score not saved: {}", e));
                }
            }
            Some(Err(e)) => log::error!("could not build score record: {}", e),
            None => {}
        }
        Screen::GameOver { name, session }
    }

    fn on_game_over(&mut self, name: String, session: GameSession, line: &str) -> Screen {
        match parse_bounded(line, 1, 2) {
            Ok(1) => Screen::Difficulty { name },
            Ok(_) => Screen::Menu,
            Err(e) => self.retry(e, Screen::GameOver { name, session }),
        }
    }

    fn on_scores_filter(&mut self, line: &str) -> Screen {
        let filter = match parse_token(line) {
            Ok(f) => f.to_lowercase(),
            Err(e) => return self.retry(e, Screen::ScoresFilter),
        };
        let records = match self.scores.load() {
            Ok(r) => r,
            Err(e) => {
                log::info!("high scores: {}", e);
                return report("High Scores", vec!["No high scores available.".to_string()]);
            }
        };
        let found = winners(&records, &filter);
        if found.is_empty() {
            return report("High Scores", vec![format!("No winners for {}.", filter)]);
        }
        Screen::ScoresCount {
            filter,
            winners: found,
        }
    }

    fn on_scores_count(&mut self, filter: String, found: Vec<PlayerRecord>, line: &str) -> Screen {
        match parse_bounded(line, 1, found.len() as i64) {
            Ok(n) => {
                let top = top_winners(&found, &filter, n as usize);
                let mut lines = vec![format!("Top {} players for {}:", n, filter)];
                lines.extend(top.iter().map(|r| format!("{} - Time: {}s", r.name, r.secs)));
                report("High Scores", lines)
            }
            Err(e) => self.retry(
                e,
                Screen::ScoresCount {
                    filter,
                    winners: found,
                },
            ),
        }
    }

    fn on_stats_name(&mut self, line: &str) -> Screen {
        let name = match parse_token(line) {
            Ok(n) => n.to_lowercase(),
            Err(e) => return self.retry(e, Screen::StatsName),
        };
        let records = match self.scores.load() {
            Ok(r) => r,
            Err(e) => {
                log::info!("player stats: {}", e);
                return report("Player Stats", vec!["No player stats available.".to_string()]);
            }
        };
        match player_stats(&records, &name) {
            None => report("Player Stats", vec![format!("No records found for player {}.", name)]),
            Some(stats) => report(
                "Player Stats",
                vec![
                    format!("Stats for player {}:", name),
                    format!("Total Games Played: {}", stats.games),
                    format!("Wins: {}", stats.wins),
                    format!("Losses: {}", stats.losses),
                    format!("Average Time: {}s", stats.average_secs),
                ],
            ),
        }
    }

    fn persist(&self) {
        if let Some(path) = &self.config_file {
            save_config_to(&self.cfg, path);
        }
    }
}

fn report(title: &str, lines: Vec<String>) -> Screen {
    Screen::Report {
        title: title.to_string(),
        lines,
    }
}
