//! UI rendering for the TUI

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, Paragraph},
};

use super::state::{AppState, Mode, SHELL_ITEMS};
use crate::theme::ThemeColors;
use crate::update::{ButtonView, NoticePart, NoticeRegion, NoticeView};

const NOTICE_WIDTH: u16 = 64;
const NOTICE_HEIGHT: u16 = 16;
const BUTTON_WIDTH: u16 = 26;
const BUTTON_GAP: u16 = 4;

// Rows inside the notice border
const ROW_INTRO: usize = 1;
const ROW_CURRENT: usize = 3;
const ROW_NEW: usize = 4;
const ROW_STATUS: usize = 6;
const ROW_GAUGE: usize = 7;
const ROW_SPEED: usize = 8;
const ROW_SIZE: usize = 9;
const ROW_BUTTONS: u16 = 11;
const ROW_FOOTER: usize = 13;
const NOTICE_ROWS: usize = 14;

/// Main render function
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let colors = state.theme.colors();

    // Set background
    let area = frame.area();
    let bg_block = Block::default().style(Style::default().bg(colors.bg));
    frame.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, state, chunks[0]);
    render_items(frame, state, chunks[1]);
    render_status_bar(frame, state, chunks[2]);

    if state.mode == Mode::Help {
        render_help_popup(frame, state);
    }

    if state.interface_blocked() {
        frame.buffer_mut().set_style(area, colors.blocked());
    }

    let view = state.controller().view().cloned();
    match view {
        Some(view) => render_notice(frame, state, &view),
        None => state.controller_mut().set_notice_region(NoticeRegion::default()),
    }
}

fn render_header(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", colors.text()),
        Span::styled(&state.config.app_name, colors.text_primary()),
        Span::styled(format!("  v{}", crate::VERSION), colors.text_dim()),
        Span::styled(format!("  theme: {}", state.theme), colors.text_dim()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(colors.block()),
    );

    frame.render_widget(header, area);
}

fn render_items(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let items: Vec<ListItem> = SHELL_ITEMS
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let is_selected = i == state.selected_item;
            let cursor = if is_selected { "▸" } else { " " };
            let style = if is_selected {
                colors.selected()
            } else {
                colors.text()
            };
            ListItem::new(Line::from(format!(" {cursor} {item}"))).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(colors.block_focus())
            .title(" Workspace ")
            .title_style(colors.text_primary()),
    );

    frame.render_widget(list, area);
}

fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    // Spinner animation frames
    const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

    let content = if state.interface_blocked() {
        vec![Span::styled(" Update required", colors.text_warning())]
    } else if !state.status.is_empty() {
        let spinner = if state.checking {
            let frame_idx = usize::try_from(state.current_tick() / 2).unwrap_or(0) % SPINNER.len();
            format!("{} ", SPINNER[frame_idx])
        } else {
            String::new()
        };
        vec![
            Span::styled(" ", Style::default()),
            Span::styled(spinner, colors.key_hint()),
            Span::styled(&state.status, colors.text_dim()),
        ]
    } else {
        vec![
            Span::styled(" ", Style::default()),
            Span::styled("u", colors.key_hint()),
            Span::styled(": check for updates  ", colors.text_dim()),
            Span::styled("?", colors.key_hint()),
            Span::styled(": help  ", colors.text_dim()),
            Span::styled("t", colors.key_hint()),
            Span::styled(": theme  ", colors.text_dim()),
            Span::styled("q", colors.key_hint()),
            Span::styled(": quit", colors.text_dim()),
        ]
    };

    let status = Paragraph::new(Line::from(content)).style(Style::default().bg(colors.bg_panel));
    frame.render_widget(status, area);
}

fn render_help_popup(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();
    let popup_area = centered_rect(50, 60, frame.area());

    let bg_block = Block::default().style(Style::default().bg(colors.bg_panel));
    frame.render_widget(Clear, popup_area);
    frame.render_widget(bg_block, popup_area);

    let entry = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<14}"), colors.key_hint()),
            Span::styled(what, colors.text()),
        ])
    };

    let help = Paragraph::new(vec![
        Line::from(""),
        entry("j/k or ↑/↓", "Move selection"),
        entry("u", "Check for updates"),
        entry("t", "Next theme"),
        entry("?", "Toggle this help"),
        entry("q", "Quit"),
        Line::from(""),
        Line::styled(
            "  While an update notice is shown",
            colors.text_primary().add_modifier(Modifier::BOLD),
        ),
        entry("Tab", "Move between the notice's controls"),
        entry("Enter/Space", "Activate Manually Download"),
        entry("Click", "Activate a control"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(colors.block_focus())
            .title(" Help ")
            .title_style(colors.text_primary()),
    );

    frame.render_widget(help, popup_area);
}

/// Screen regions of the notice inside `area`.
///
/// Pure, so the guard's hit-testing and the drawing agree by construction.
/// On short panels the buttons move up to the last inner row; they are left
/// out only when the panel has no inner row or column to hold them.
pub fn notice_layout(area: Rect, has_actions: bool) -> NoticeRegion {
    let width = NOTICE_WIDTH.min(area.width);
    let height = NOTICE_HEIGHT.min(area.height);
    let panel = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let inner_x = panel.x + 1;
    let inner_width = panel.width.saturating_sub(2);
    let button_width = BUTTON_WIDTH.min(inner_width.saturating_sub(BUTTON_GAP) / 2);
    let (install, download) = if has_actions && height >= 3 && button_width > 0 {
        let start = inner_x + inner_width.saturating_sub(button_width * 2 + BUTTON_GAP) / 2;
        let y = panel.y + 1 + ROW_BUTTONS.min(height - 3);
        (
            Some(Rect::new(start, y, button_width, 1)),
            Some(Rect::new(start + button_width + BUTTON_GAP, y, button_width, 1)),
        )
    } else {
        (None, None)
    };

    NoticeRegion {
        backdrop: area,
        panel,
        install,
        download,
    }
}

fn render_notice(frame: &mut Frame, state: &mut AppState, view: &NoticeView) {
    let colors = state.theme.colors();
    let region = notice_layout(frame.area(), view.actions.is_some());
    state.controller_mut().set_notice_region(region);
    state.sync_focus();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(colors.text_warning())
        .style(Style::default().bg(colors.bg_panel).fg(colors.fg))
        .title(format!(" ⬆ {} ", view.title))
        .title_alignment(Alignment::Center)
        .title_style(colors.notice_title());
    let inner = block.inner(region.panel);

    frame.render_widget(Clear, region.panel);
    frame.render_widget(block, region.panel);

    let rows = Layout::vertical([Constraint::Length(1); NOTICE_ROWS]).split(inner);
    let centered = |text: Line<'static>| Paragraph::new(text).alignment(Alignment::Center);

    frame.render_widget(
        centered(Line::styled(
            format!("A new version of {} is available.", state.config.app_name),
            colors.text(),
        )),
        rows[ROW_INTRO],
    );
    frame.render_widget(
        centered(version_line("Current version: ", &view.current_version, colors.text(), &colors)),
        rows[ROW_CURRENT],
    );
    frame.render_widget(
        centered(version_line(
            "New version:     ",
            &view.new_version,
            colors.text_success().add_modifier(Modifier::BOLD),
            &colors,
        )),
        rows[ROW_NEW],
    );
    frame.render_widget(
        centered(Line::styled(view.status.clone(), colors.text_primary())),
        rows[ROW_STATUS],
    );

    if let Some(progress) = &view.progress {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(colors.primary).bg(colors.bg))
            .ratio(f64::from(progress.percent) / 100.0)
            .label(progress.percent_label.clone());
        frame.render_widget(gauge, rows[ROW_GAUGE].inner(ratatui::layout::Margin::new(2, 0)));

        if let Some(speed) = &progress.speed {
            frame.render_widget(
                centered(Line::styled(speed.clone(), colors.text_dim())),
                rows[ROW_SPEED],
            );
        }
        if let Some(size) = &progress.size {
            frame.render_widget(
                centered(Line::styled(size.clone(), colors.text_dim())),
                rows[ROW_SIZE],
            );
        }
    }

    frame.render_widget(
        centered(Line::styled(
            view.footer,
            colors.text_dim().add_modifier(Modifier::ITALIC),
        )),
        rows[ROW_FOOTER],
    );

    if let Some(actions) = &view.actions {
        let buttons = [
            (region.install, &actions.install, NoticePart::InstallControl),
            (region.download, &actions.manual_download, NoticePart::DownloadControl),
        ];
        for (rect, button, part) in buttons {
            if let Some(rect) = rect {
                render_button(frame, &colors, rect, button, state.is_focused(part));
            }
        }
    }
}

fn version_line(
    label: &'static str,
    version: &str,
    value_style: Style,
    colors: &ThemeColors,
) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, colors.text_dim()),
        Span::styled(version.to_string(), value_style),
    ])
}

fn render_button(
    frame: &mut Frame,
    colors: &ThemeColors,
    area: Rect,
    button: &ButtonView,
    focused: bool,
) {
    let style = if button.enabled {
        colors.button(focused)
    } else {
        colors.button_disabled()
    };
    let widget = Paragraph::new(button.label)
        .alignment(Alignment::Center)
        .style(style);
    frame.render_widget(widget, area);
}

/// Helper function to create a centered rect
const fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_width = r.width * percent_x / 100;
    let popup_height = r.height * percent_y / 100;
    Rect {
        x: r.x + (r.width.saturating_sub(popup_width)) / 2,
        y: r.y + (r.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::update::{Origin, ProgressSample, UpdateInfo};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(state: &mut AppState) -> String {
        draw_sized(state, 80, 24)
    }

    fn draw_sized(state: &mut AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn notice_state() -> AppState {
        let mut state = AppState::new(Config::default());
        state
            .controller_mut()
            .show_notice(&UpdateInfo::new("1.0.0", "1.1.0"));
        state.sync_focus();
        state
    }

    #[test]
    fn test_shell_without_notice() {
        let mut state = AppState::new(Config::default());
        let screen = draw(&mut state);
        assert!(screen.contains("Dashboard"));
        assert!(!screen.contains("NEW UPDATE AVAILABLE"));
        assert_eq!(
            state.controller().guard().region(),
            &NoticeRegion::default()
        );
    }

    #[test]
    fn test_downloading_notice_shows_versions_and_progress() {
        let mut state = notice_state();
        state.controller_mut().apply_progress(&ProgressSample {
            percent: Some(42.7),
            bytes_per_second: Some(2_097_152.0),
            transferred: Some(10_485_760.0),
            total: Some(52_428_800.0),
        });

        let screen = draw(&mut state);
        assert!(screen.contains("NEW UPDATE AVAILABLE"));
        assert!(screen.contains("1.0.0"));
        assert!(screen.contains("1.1.0"));
        assert!(screen.contains("Downloading update... 43%"));
        assert!(screen.contains("2.00 MB/s"));
        assert!(screen.contains("10.00 MB / 50.00 MB"));
        assert!(screen.contains("This notice cannot be closed until you update"));
        assert!(!screen.contains("Install & Restart"));

        let region = *state.controller().guard().region();
        assert!(region.install.is_none());
        assert_eq!(
            region.locate(region.panel.x + 1, region.panel.y + 1),
            Origin::Notice(NoticePart::Panel)
        );
    }

    #[test]
    fn test_ready_notice_shows_actions() {
        let mut state = notice_state();
        state.controller_mut().mark_downloaded();

        let screen = draw(&mut state);
        assert!(screen.contains("Update downloaded! Ready to install."));
        assert!(screen.contains("Install & Restart"));
        assert!(screen.contains("Manually Download"));
        assert!(!screen.contains("MB/s"));

        let region = *state.controller().guard().region();
        let install = region.install.unwrap();
        assert_eq!(
            state.controller().guard().locate(install.x, install.y),
            Origin::Notice(NoticePart::InstallControl)
        );
    }

    #[test]
    fn test_notice_layout_geometry() {
        let area = Rect::new(0, 0, 100, 30);
        let region = notice_layout(area, true);
        assert_eq!(region.backdrop, area);
        assert_eq!(region.panel, Rect::new(18, 7, 64, 16));

        let install = region.install.unwrap();
        let download = region.download.unwrap();
        assert_eq!(install.y, download.y);
        assert!(install.right() + BUTTON_GAP <= download.x);
        assert!(region.panel.contains(install.as_position()));
        assert!(download.right() <= region.panel.right());

        assert_eq!(notice_layout(area, false).install, None);
    }

    #[test]
    fn test_notice_layout_tiny_terminal() {
        let region = notice_layout(Rect::new(0, 0, 20, 6), true);
        assert_eq!(region.panel, Rect::new(0, 0, 20, 6));
        assert_eq!(region.install, Some(Rect::new(1, 4, 7, 1)));
        assert_eq!(region.download, Some(Rect::new(12, 4, 7, 1)));

        let flat = notice_layout(Rect::new(0, 0, 20, 2), true);
        assert_eq!(flat.install, None);
        assert_eq!(flat.download, None);
        let narrow = notice_layout(Rect::new(0, 0, 5, 6), true);
        assert_eq!(narrow.install, None);
    }

    #[test]
    fn test_short_terminal_keeps_actions_reachable() {
        let mut state = notice_state();
        state.controller_mut().mark_downloaded();

        let screen = draw_sized(&mut state, 80, 10);
        assert!(screen.contains("Install & Restart"));
        assert!(screen.contains("Manually Download"));

        let region = *state.controller().guard().region();
        let install = region.install.unwrap();
        assert!(install.bottom() < region.panel.bottom());
        assert_eq!(
            state.controller().guard().locate(install.x, install.y),
            Origin::Notice(NoticePart::InstallControl)
        );

        state.cycle_notice_focus(true);
        assert!(state.is_focused(NoticePart::InstallControl));
    }

    #[test]
    fn test_focus_leaves_controls_that_are_no_longer_drawn() {
        let mut state = notice_state();
        state.controller_mut().mark_downloaded();
        draw(&mut state);
        state.cycle_notice_focus(true);
        assert!(state.is_focused(NoticePart::InstallControl));

        draw_sized(&mut state, 40, 2);
        assert!(state.is_focused(NoticePart::Panel));
        state.cycle_notice_focus(true);
        assert!(state.is_focused(NoticePart::Panel));
    }
}
