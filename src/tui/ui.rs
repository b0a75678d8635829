use crate::core::engine::{MenuEngine, MenuView};
use crate::core::log_sink::LogLine;
use crate::tui::TuiState;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Paragraph};

pub fn draw_ui(frame: &mut Frame, engine: &MenuEngine, tui: &TuiState) {
    use Constraint::{Length, Min, Percentage};
    let layout = Layout::vertical([Length(1), Min(0), Length(3)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    let view = engine.view();

    // Title bar
    let title = Span::styled(
        format!("qmenu | {}", view.title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    );
    frame.render_widget(title, title_area);

    // Main area: menu on the left, log panel on the right
    let [menu_area, log_area] =
        Layout::horizontal([Percentage(50), Percentage(50)]).areas(main_area);
    draw_menu(frame, menu_area, &view);
    draw_log(frame, log_area, &engine.sink().window(tui.log_window));

    // Input line
    draw_input(frame, input_area, &view, &tui.input);
}

fn draw_menu(frame: &mut Frame, area: Rect, view: &MenuView) {
    let mut entries: Vec<ListItem> = view
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let marker = if entry.submenu { ">>" } else { "Action" };
            ListItem::new(Span::styled(
                format!("{}. {} ({marker})", index + 1, entry.name),
                Style::default().fg(Color::Green),
            ))
        })
        .collect();

    let back = match &view.parent {
        Some(parent) => format!("0. Parent Menu: {parent}"),
        None => String::from("0. Exit"),
    };
    entries.push(ListItem::new(Span::styled(
        back,
        Style::default().fg(Color::Yellow),
    )));

    let list = List::new(entries).block(Block::bordered().title(view.title.clone()));
    frame.render_widget(list, area);
}

fn draw_log(frame: &mut Frame, area: Rect, window: &[LogLine]) {
    let lines: Vec<Line> = window
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    entry.at.format("%H:%M:%S ").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(entry.text.clone(), Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();
    let log = Paragraph::new(lines).block(Block::bordered().title("Log"));
    frame.render_widget(log, area);
}

fn draw_input(frame: &mut Frame, area: Rect, view: &MenuView, input: &str) {
    let prompt = view
        .prompt
        .clone()
        .unwrap_or_else(|| String::from("Select an option:"));
    let paragraph = Paragraph::new(input).block(Block::bordered().title(prompt));
    frame.render_widget(paragraph, area);
}
