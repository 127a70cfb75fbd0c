// Terminal UI: renders the current screen with ratatui and feeds key presses to the App

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::error::Error;
use std::io;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

use crate::xtm_app::{App, MovePrompt, NoticeKind, Screen};
use crate::xtm_board::Board;
use crate::xtm_color::Palette;
use crate::xtm_game::{Difficulty, GameSettings};
use crate::xtm_session::{GameSession, SessionState};

const MENU_ITEMS: [&str; 5] = ["Play Game", "View High Scores", "Player Stats", "Help", "Exit"];

/// Set up the terminal, run the event loop until the player exits, and restore the terminal
pub fn run(app: &mut App) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(n) = app.notice() {
        println!("{}", n.text);
    }
    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    // redraw periodically so the game clock keeps moving
    let tick_rate = Duration::from_millis(200);
    while !app.is_exit() {
        let palette = Palette {
            ascii: app.cfg.ascii_icons,
            colors: app.cfg.colors,
        };
        terminal.draw(|f| draw(f, app, &palette))?;

        if !event::poll(tick_rate)? {
            continue;
        }
        if let Event::Key(KeyEvent {
            code, modifiers, kind, ..
        }) = event::read()?
        {
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Char(c) => app.type_char(c),
                KeyCode::Backspace => app.backspace(),
                KeyCode::Enter => app.submit(),
                KeyCode::Esc => app.back(),
                _ => {}
            }
        }
    }
    Ok(())
}

fn draw<B: Backend>(f: &mut Frame<B>, app: &App, palette: &Palette) {
    let size = f.size();
    f.render_widget(Clear, size);

    // layout: header, body, notice line, input box
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    let header = Paragraph::new(Spans::from(header_spans(app, palette)))
        .block(Block::default().borders(Borders::ALL).title(" MINESWEEPER "))
        .alignment(Alignment::Left);
    f.render_widget(header, chunks[0]);

    draw_body(f, app, palette, chunks[1]);

    if let Some(n) = app.notice() {
        let style = palette.notice(n.kind == NoticeKind::Warning);
        let notice = Paragraph::new(Spans::from(Span::styled(format!(" {}", n.text), style)));
        f.render_widget(notice, chunks[2]);
    }

    let prompt = app.prompt();
    let input = Paragraph::new(Spans::from(vec![
        Span::raw(" "),
        Span::styled(prompt.clone(), palette.key()),
        Span::raw(" "),
        Span::raw(app.input().to_string()),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Esc: Back "));
    f.render_widget(input, chunks[3]);

    // place the terminal cursor after the typed text
    let typed = (2 + prompt.width() + app.input().width()) as u16;
    let x = chunks[3].x + 1 + typed.min(chunks[3].width.saturating_sub(3));
    f.set_cursor(x, chunks[3].y + 1);
}

fn header_spans<'a>(app: &App, palette: &Palette) -> Vec<Span<'a>> {
    match app.screen() {
        Screen::Playing { name, session, .. } => vec![
            Span::raw(format!(" Player: {}   {}   ", name, session.settings().difficulty.name())),
            Span::styled(
                format!("Flags: {}/{}", session.flags().remaining(), session.flags().total()),
                palette.key(),
            ),
            Span::raw(format!("   Time: {}s ", session.elapsed_secs())),
        ],
        Screen::GameOver { name, session } => vec![Span::raw(format!(
            " Player: {}   {}   Time: {}s ",
            name,
            session.settings().difficulty.name(),
            session.elapsed_secs()
        ))],
        Screen::ScoresFilter | Screen::ScoresCount { .. } => vec![Span::raw(" High Scores ")],
        Screen::StatsName => vec![Span::raw(" Player Stats ")],
        Screen::Report { title, .. } => vec![Span::raw(format!(" {} ", title))],
        _ => vec![Span::raw(" Main Menu ")],
    }
}

fn draw_body<B: Backend>(f: &mut Frame<B>, app: &App, palette: &Palette, area: Rect) {
    let lines: Vec<Spans> = match app.screen() {
        Screen::Menu | Screen::Exit => MENU_ITEMS
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Spans::from(vec![
                    Span::styled(format!("{}.", i + 1), palette.key()),
                    Span::raw(format!(" {}", item)),
                ])
            })
            .collect(),
        Screen::Name => vec![Spans::from("Who is playing? Names are a single word.")],
        Screen::Difficulty { name } => {
            let mut lines = vec![Spans::from(format!("Welcome, {}!", name)), Spans::from("")];
            for d in Difficulty::ALL {
                let s = GameSettings::for_difficulty(d);
                lines.push(Spans::from(vec![
                    Span::styled(format!("{}.", d.to_choice()), palette.key()),
                    Span::raw(format!(
                        " {:<8}{:>2}x{:<2}  {} bombs",
                        d.name(),
                        s.size,
                        s.size,
                        s.bomb_count
                    )),
                ]));
            }
            lines
        }
        Screen::Playing { session, prompt, .. } => {
            let focus = match (prompt, session.state()) {
                (MovePrompt::Column(row), _) => Focus::Row(*row),
                (_, SessionState::AwaitingAction { row, col }) => Focus::Cell(row, col),
                _ => Focus::None,
            };
            board_lines(session.board(), false, focus, palette)
        }
        Screen::GameOver { session, .. } => game_over_lines(session, palette),
        Screen::ScoresFilter => vec![Spans::from("Rankings list the fastest wins for one difficulty.")],
        Screen::ScoresCount { filter, winners } => {
            vec![Spans::from(format!("{} winning games found for {}.", winners.len(), filter))]
        }
        Screen::StatsName => vec![Spans::from("Look up games played, wins, losses and average time.")],
        Screen::Report { lines, .. } => lines.iter().map(|l| Spans::from(l.clone())).collect(),
    };

    // center the content block in the body area
    let width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16 + 4;
    let height = lines.len() as u16 + 2;
    let rect = center_rect(width.min(area.width), height.min(area.height), area);
    let p = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(p, rect);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    None,
    Row(usize),
    Cell(usize, usize),
}

/// Board with row/column numbers; `truth` exposes every bomb and count
fn board_lines<'a>(board: &Board, truth: bool, focus: Focus, palette: &Palette) -> Vec<Spans<'a>> {
    let n = board.size();
    let mut header = String::from("    ");
    for col in 0..n {
        header.push_str(&format!("{:>2} ", col));
    }
    let mut lines = vec![Spans::from(header)];
    for row in 0..n {
        let mut spans = vec![Span::raw(format!("{:>2} |", row))];
        for col in 0..n {
            let hint = if truth {
                board.truth_hint(row, col)
            } else {
                board.hint(row, col)
            };
            let mut style = palette.style(hint);
            let focused = match focus {
                Focus::Row(r) => r == row,
                Focus::Cell(r, c) => (r, c) == (row, col),
                Focus::None => false,
            };
            if focused {
                style = style.patch(palette.cursor());
            }
            spans.push(Span::styled(format!(" {} ", palette.glyph(hint)), style));
        }
        lines.push(Spans::from(spans));
    }
    lines
}

fn game_over_lines<'a>(session: &GameSession, palette: &Palette) -> Vec<Spans<'a>> {
    let (headline, focus) = match session.state() {
        SessionState::Lost { row, col } => ("BOOM! You hit a bomb!", Focus::Cell(row, col)),
        _ => ("Congratulations! You cleared the minefield!", Focus::None),
    };
    let mut lines = vec![
        Spans::from(Span::styled(headline, palette.notice(focus != Focus::None))),
        Spans::from(""),
    ];
    lines.extend(board_lines(session.board(), true, focus, palette));
    lines
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
