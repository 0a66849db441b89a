//! Frame layout: scene, code workspace, caption, progress and status bar.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};

use holo_playback::{DisplayState, Mode, WorkspaceView};

use super::scene::Scene;

/// Draw one frame for `state`.
pub fn draw(frame: &mut Frame, state: &DisplayState, scene: &Scene) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Scene and workspace
            Constraint::Length(4), // Caption
            Constraint::Length(1), // Progress
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    if state.workspace.is_empty() {
        scene.draw(frame, chunks[0], state);
    } else {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[0]);
        scene.draw(frame, cols[0], state);
        draw_workspace(frame, cols[1], &state.workspace);
    }

    draw_caption(frame, chunks[1], state);
    if state.generating {
        draw_progress(frame, chunks[2], state);
    }
    draw_status(frame, chunks[3], state);
}

fn draw_caption(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let mut text = state.caption.clone();
    if state.speaking {
        text.push('▌');
    }
    let caption = Paragraph::new(text)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(caption, area);
}

fn draw_progress(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let label = format!("GENERATING CODE {}%", state.percent());
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::Black))
        .ratio(state.progress.clamp(0.0, 1.0))
        .label(Span::styled(label, Style::default().fg(Color::White).bold()));
    frame.render_widget(gauge, area);
}

fn draw_status(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let mode_color = match state.mode {
        Mode::Idle => Color::Gray,
        Mode::Speaking => Color::Cyan,
        Mode::Generating => Color::Magenta,
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", state.mode.to_string().to_uppercase()),
            Style::default().fg(Color::Black).bg(mode_color).bold(),
        ),
        Span::raw(format!(
            " loop {}  step {}  t={:.1}s   q quit",
            state.iteration + 1,
            state.step,
            state.seconds()
        )),
    ]);
    let status = Paragraph::new(line).style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(status, area);
}

fn draw_workspace(frame: &mut Frame, area: Rect, view: &WorkspaceView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" workspace ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let badges: Vec<Span> = view
        .files
        .iter()
        .flat_map(|name| {
            [
                Span::styled(format!("[{name}]"), Style::default().fg(Color::Green)),
                Span::raw(" "),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(badges)), rows[0]);

    if view.panels.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, view.panels.len() as u32); view.panels.len()];
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(rows[1]);

    for (panel, slot) in view.panels.iter().zip(slots.iter()) {
        let (mark, color) = if panel.done {
            (" ✓", Color::Green)
        } else {
            ("", Color::Yellow)
        };
        let code = Paragraph::new(panel.visible_code.as_str())
            .style(Style::default().fg(Color::White))
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(color))
                    .title(format!(" {}{mark} ", panel.title)),
            );
        frame.render_widget(code, *slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn render(state: &DisplayState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let scene = Scene::new(42);
        terminal.draw(|f| draw(f, state, &scene)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn idle_frame_has_status_and_no_gauge() {
        let out = render(&DisplayState::default());
        assert!(out.contains("IDLE"));
        assert!(out.contains("q quit"));
        assert!(!out.contains("GENERATING CODE"));
    }

    #[test]
    fn speaking_frame_shows_caption() {
        let state = DisplayState {
            mode: Mode::Speaking,
            speaking: true,
            caption: "Good evening".into(),
            ..DisplayState::default()
        };
        let out = render(&state);
        assert!(out.contains("Good evening"));
        assert!(out.contains("SPEAKING"));
    }

    #[test]
    fn generating_frame_shows_progress_and_workspace() {
        let state = DisplayState {
            mode: Mode::Generating,
            generating: true,
            progress: 0.424,
            workspace: holo_playback::CodeWorkspace::demo().view_at(Some(1_000)),
            ..DisplayState::default()
        };
        let out = render(&state);
        assert!(out.contains("GENERATING CODE 42%"));
        assert!(out.contains("api/openai.ts"));
        assert!(out.contains("workspace"));
    }
}
