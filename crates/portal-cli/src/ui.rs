use std::io;
use std::time::Duration;
use std::time::Instant;

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Terminal;

use portal_core::chat::ChatMessage;
use portal_core::chat::ChatRole;
use portal_core::documents::DocumentStatus;
use portal_core::documents::ANALYZING_MESSAGE;
use portal_core::documents::REQUIRED_DOCUMENTS;
use portal_core::panels::CanvasSectionId;
use portal_core::panels::Panel;
use portal_core::progress::StepStatus;
use portal_core::ChatCommand;
use portal_core::SessionState;
use portal_core::UserAction;
use portal_exec::SessionDriver;

const MAX_CHIP_KEYS: usize = 4;

struct TuiGuard;

impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableBracketedPaste,
            crossterm::cursor::Show
        );
    }
}

pub fn run(driver: &mut SessionDriver) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        crossterm::cursor::Hide
    )?;
    let _guard = TuiGuard; // restores the terminal on exit or panic

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    run_app(&mut terminal, driver).map_err(|e| e.into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Quit,
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, driver: &mut SessionDriver) -> io::Result<()> {
    let started = Instant::now();
    let mut last_draw = started;
    loop {
        driver.drain_ready();

        // Animated markers need a steady redraw while something is pending.
        let animating = driver.state().is_awaiting_reply() || driver.state().documents.is_analyzing();
        let stale = animating && last_draw.elapsed() >= Duration::from_millis(100);
        if driver.take_frame_request() || stale {
            let spinner = spinner_frame(started.elapsed());
            terminal.draw(|f| ui(f, driver.state(), spinner))?;
            last_draw = Instant::now();
        }

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key(key, driver) == KeyOutcome::Quit {
                    tracing::info!("chat closed by user");
                    return Ok(());
                }
            }
            Event::Paste(text) => driver.dispatch(UserAction::InputPaste(text)),
            Event::Resize(_, _) => {
                let spinner = spinner_frame(started.elapsed());
                terminal.draw(|f| ui(f, driver.state(), spinner))?;
                last_draw = Instant::now();
            }
            _ => {}
        }
    }
}

fn handle_key(key: KeyEvent, driver: &mut SessionDriver) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Char('c') if ctrl => return KeyOutcome::Quit,
        KeyCode::Char('u') if ctrl => driver.dispatch(UserAction::SelectDocuments(Vec::new())),
        KeyCode::Char('e') if ctrl => {
            if let Some(action) = cycle_canvas(driver.state()) {
                driver.dispatch(action);
            }
        }
        KeyCode::Char(_) => {
            if let Some(action) = char_action(&key) {
                driver.dispatch(action);
            }
        }
        KeyCode::Backspace => driver.dispatch(UserAction::InputBackspace),
        KeyCode::Enter => {
            let line = driver.state().draft.clone();
            for action in command_actions(driver.state(), line.as_str()) {
                driver.dispatch(action);
            }
        }
        _ => {}
    }
    KeyOutcome::Continue
}

/// Alt+1..4 picks a suggestion chip; unmodified characters, digits
/// included, always go to the input box.
fn char_action(key: &KeyEvent) -> Option<UserAction> {
    let KeyCode::Char(ch) = key.code else {
        return None;
    };
    if key.modifiers.contains(KeyModifiers::ALT) {
        return chip_index(ch).map(UserAction::ActivateChip);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    Some(UserAction::InputChar(ch))
}

fn chip_index(ch: char) -> Option<usize> {
    let digit = ch.to_digit(10)? as usize;
    (1..=MAX_CHIP_KEYS).contains(&digit).then(|| digit - 1)
}

/// Translates the typed line into reducer actions. Plain text goes through
/// `Submit` so the reducer clears the box itself.
fn command_actions(state: &SessionState, line: &str) -> Vec<UserAction> {
    let Some(command) = ChatCommand::parse(line) else {
        return Vec::new();
    };
    let action = match command {
        ChatCommand::Send(_) => return vec![UserAction::Submit],
        ChatCommand::Upload(files) => UserAction::SelectDocuments(files),
        ChatCommand::Remove(position) => {
            match state.documents.iter().nth(position - 1) {
                Some(document) => UserAction::RemoveDocument(document.id),
                None => {
                    tracing::debug!(position, "no document at that position");
                    return vec![UserAction::ClearInput];
                }
            }
        }
        ChatCommand::Submit => UserAction::SubmitApplication,
        ChatCommand::Reset => UserAction::ResetSession,
    };
    vec![UserAction::ClearInput, action]
}

/// Steps the newest canvas through its sections, then collapses it.
fn cycle_canvas(state: &SessionState) -> Option<UserAction> {
    let (message_seq, expanded) = state.messages.iter().rev().find_map(|message| {
        match message.content.as_panel() {
            Some(Panel::ApplicationCanvas(canvas)) => Some((message.seq, canvas.expanded)),
            _ => None,
        }
    })?;
    Some(match next_section(expanded) {
        Some(section) => UserAction::ExpandCanvasSection {
            message_seq,
            section,
        },
        None => UserAction::CollapseCanvas { message_seq },
    })
}

fn next_section(current: Option<CanvasSectionId>) -> Option<CanvasSectionId> {
    match current {
        None => Some(CanvasSectionId::Applicant),
        Some(CanvasSectionId::Applicant) => Some(CanvasSectionId::EsgProfile),
        Some(CanvasSectionId::EsgProfile) => Some(CanvasSectionId::Documents),
        Some(CanvasSectionId::Documents) => None,
    }
}

fn spinner_frame(elapsed: Duration) -> &'static str {
    let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    frames[(elapsed.as_millis() / 100) as usize % frames.len()]
}

#[derive(Debug, Clone, Copy)]
struct UiPalette {
    accent: Color,
    accent_alt: Color,
    success: Color,
    warning: Color,
    muted: Color,
    border: Color,
    panel_bg: Color,
}

const PALETTE: UiPalette = UiPalette {
    accent: Color::Cyan,
    accent_alt: Color::Blue,
    success: Color::Green,
    warning: Color::Yellow,
    muted: Color::DarkGray,
    border: Color::Gray,
    panel_bg: Color::Reset,
};

fn ui(f: &mut ratatui::Frame, state: &SessionState, spinner: &str) {
    let palette = PALETTE;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Chips
            Constraint::Length(3), // Input
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    let mode = if state.options.renewal {
        "Renewal"
    } else {
        "New application"
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            state.template.title,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(palette.muted)),
        Span::raw(mode),
        Span::styled(" | ", Style::default().fg(palette.muted)),
        Span::raw(format!("{} member", state.options.tier.label())),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border)),
    );
    f.render_widget(header, chunks[0]);

    let show_documents = !state.documents.is_empty();
    let mut columns = vec![Constraint::Length(30), Constraint::Min(20)];
    if show_documents {
        columns.push(Constraint::Length(36));
    }
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(columns)
        .split(chunks[1]);

    render_progress_rail(f, body[0], state, palette);
    render_chat(f, body[1], state, spinner, palette);
    if show_documents {
        render_documents(f, body[2], state, spinner, palette);
    }
    render_chips(f, chunks[2], state, palette);

    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(palette.accent)),
        Span::raw(state.draft.as_str()),
        Span::styled("█", Style::default().fg(palette.muted)),
    ]))
    .block(
        Block::default()
            .title("Message")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border)),
    );
    f.render_widget(input, chunks[3]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(palette.accent)),
        Span::styled(" send  ", Style::default().fg(palette.muted)),
        Span::styled("Alt+1-4", Style::default().fg(palette.accent)),
        Span::styled(" chips  ", Style::default().fg(palette.muted)),
        Span::styled("^U", Style::default().fg(palette.accent)),
        Span::styled(" upload  ", Style::default().fg(palette.muted)),
        Span::styled("^E", Style::default().fg(palette.accent)),
        Span::styled(" canvas  ", Style::default().fg(palette.muted)),
        Span::styled("/remove N /submit /reset", Style::default().fg(palette.accent_alt)),
        Span::styled("  Esc", Style::default().fg(palette.warning)),
        Span::styled(" quit", Style::default().fg(palette.muted)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[4]);
}

fn render_progress_rail(f: &mut ratatui::Frame, area: Rect, state: &SessionState, palette: UiPalette) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Application Progress",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for step in state.progress.steps() {
        let (marker, color) = match step.status {
            StepStatus::Completed => ("●", palette.success),
            StepStatus::Current => ("➤", palette.accent),
            StepStatus::Upcoming => ("○", palette.muted),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} "), Style::default().fg(color)),
            Span::styled(step.title.as_str(), Style::default().fg(color)),
        ]));
    }
    if !state.progress.is_finished() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Required documents",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for document in REQUIRED_DOCUMENTS {
            lines.push(Line::from(Span::styled(
                format!("· {}", document.name),
                Style::default().fg(palette.muted),
            )));
        }
    }

    let block = Block::default()
        .title("Steps")
        .borders(Borders::ALL)
        .style(Style::default().bg(palette.panel_bg))
        .border_style(Style::default().fg(palette.border));
    let p = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(p, parts[0]);

    let percent = state.progress.percent_complete();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        )
        .gauge_style(Style::default().fg(palette.success))
        .percent(u16::from(percent))
        .label(format!("{percent}% complete"));
    f.render_widget(gauge, parts[1]);
}

fn message_lines(message: &ChatMessage, palette: UiPalette) -> Vec<Line<'static>> {
    let (label, color) = match message.role {
        ChatRole::User => ("You", palette.accent_alt),
        ChatRole::Assistant => ("Assistant", palette.accent),
    };
    let mut lines = vec![Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];
    if let Some(panel) = message.content.as_panel() {
        lines.push(Line::from(Span::styled(
            format!("┌ {}", panel.title()),
            Style::default().fg(palette.warning),
        )));
        lines.extend(
            panel
                .to_lines()
                .into_iter()
                .map(|line| Line::from(format!("│ {line}"))),
        );
    } else {
        lines.extend(message.content.to_lines().into_iter().map(Line::from));
    }
    lines.push(Line::from(""));
    lines
}

fn render_chat(
    f: &mut ratatui::Frame,
    area: Rect,
    state: &SessionState,
    spinner: &str,
    palette: UiPalette,
) {
    let mut lines: Vec<Line<'static>> = state
        .messages
        .iter()
        .flat_map(|message| message_lines(message, palette))
        .collect();
    if state.messages.typing_indicator().is_some() {
        lines.push(Line::from(Span::styled(
            format!("{spinner} Assistant is typing..."),
            Style::default().fg(palette.muted),
        )));
    }

    let inner_width = area.width.saturating_sub(2).max(1);
    let inner_height = area.height.saturating_sub(2);
    let total = wrapped_height(&lines, inner_width);
    let scroll = total.saturating_sub(inner_height);

    let block = Block::default()
        .title("Assistant")
        .borders(Borders::ALL)
        .style(Style::default().bg(palette.panel_bg))
        .border_style(Style::default().fg(palette.border));
    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(p, area);
}

/// Rows `lines` occupy once wrapped at `width` columns.
fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_documents(
    f: &mut ratatui::Frame,
    area: Rect,
    state: &SessionState,
    spinner: &str,
    palette: UiPalette,
) {
    let mut lines = Vec::new();
    for (position, document) in state.documents.iter().enumerate() {
        let (marker, color) = match document.status {
            DocumentStatus::Verified => ("✓".to_string(), palette.success),
            DocumentStatus::Pending => (spinner.to_string(), palette.warning),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", position + 1), Style::default().fg(palette.muted)),
            Span::styled(format!("{marker} "), Style::default().fg(color)),
            Span::raw(document.filename.clone()),
        ]));
        if let Some(doc_type) = &document.doc_type {
            lines.push(Line::from(Span::styled(
                format!("    {doc_type}"),
                Style::default().fg(palette.accent),
            )));
        }
        lines.push(Line::from(Span::styled(
            format!("    {}", document.message),
            Style::default().fg(palette.muted),
        )));
    }
    if state.documents.is_analyzing() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            ANALYZING_MESSAGE,
            Style::default().fg(palette.warning),
        )));
    }

    let title = format!(
        "Documents {}/{} verified",
        state.documents.verified_count(),
        state.documents.len()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().bg(palette.panel_bg))
        .border_style(Style::default().fg(palette.border));
    let p = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

fn render_chips(f: &mut ratatui::Frame, area: Rect, state: &SessionState, palette: UiPalette) {
    let mut spans = Vec::new();
    for (idx, chip) in state.suggestions.iter().take(MAX_CHIP_KEYS).enumerate() {
        let style = if chip.is_enabled() {
            Style::default().fg(palette.accent)
        } else {
            Style::default().fg(palette.muted)
        };
        spans.push(Span::styled(format!("[Alt+{}] ", idx + 1), Style::default().fg(palette.muted)));
        spans.push(Span::styled(chip.title.as_str(), style));
        spans.push(Span::raw("   "));
    }
    let block = Block::default()
        .title("Suggestions")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));
    let p = Paragraph::new(Line::from(spans)).block(block);
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use portal_core::SessionOptions;
    use pretty_assertions::assert_eq;

    use super::*;

    fn state() -> SessionState {
        SessionState::new(SessionOptions::default())
    }

    #[test]
    fn chip_keys_are_one_through_four() {
        assert_eq!(chip_index('1'), Some(0));
        assert_eq!(chip_index('4'), Some(3));
        assert_eq!(chip_index('5'), None);
        assert_eq!(chip_index('0'), None);
        assert_eq!(chip_index('a'), None);
    }

    #[test]
    fn digits_type_unless_alt_is_held() {
        let plain = KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE);
        assert!(matches!(char_action(&plain), Some(UserAction::InputChar('2'))));
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert!(matches!(char_action(&shifted), Some(UserAction::InputChar('A'))));

        let alt = KeyEvent::new(KeyCode::Char('2'), KeyModifiers::ALT);
        assert!(matches!(char_action(&alt), Some(UserAction::ActivateChip(1))));
        let alt_letter = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        assert!(char_action(&alt_letter).is_none());
        let ctrl = KeyEvent::new(KeyCode::Char('2'), KeyModifiers::CONTROL);
        assert!(char_action(&ctrl).is_none());
    }

    #[test]
    fn a_message_can_start_with_a_year() {
        let mut draft = String::new();
        for ch in "2024 report".chars() {
            let key = KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE);
            match char_action(&key) {
                Some(UserAction::InputChar(typed)) => draft.push(typed),
                other => panic!("unexpected {other:?} for {ch:?}"),
            }
        }
        assert_eq!(draft, "2024 report");
    }

    #[test]
    fn plain_lines_submit_the_draft() {
        let actions = command_actions(&state(), "calculate my score");
        assert!(matches!(actions.as_slice(), [UserAction::Submit]));
        assert!(command_actions(&state(), "  ").is_empty());
    }

    #[test]
    fn remove_maps_position_to_document_id() {
        let mut state = state();
        state.documents.select_files(&[]);
        state.documents.select_files(&[]);
        let actions = command_actions(&state, "/remove 5");
        assert!(matches!(
            actions.as_slice(),
            [UserAction::ClearInput, UserAction::RemoveDocument(5)]
        ));

        let actions = command_actions(&state, "/remove 9");
        assert!(matches!(actions.as_slice(), [UserAction::ClearInput]));
    }

    #[test]
    fn canvas_cycle_walks_sections_then_collapses() {
        assert_eq!(next_section(None), Some(CanvasSectionId::Applicant));
        assert_eq!(
            next_section(Some(CanvasSectionId::EsgProfile)),
            Some(CanvasSectionId::Documents)
        );
        assert_eq!(next_section(Some(CanvasSectionId::Documents)), None);
        assert!(cycle_canvas(&state()).is_none());
    }

    #[test]
    fn wrapped_height_counts_overflow_rows() {
        let lines = vec![Line::from("abcdefghij"), Line::from(""), Line::from("abc")];
        assert_eq!(wrapped_height(&lines, 4), 3 + 1 + 1);
    }
}
