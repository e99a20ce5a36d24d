use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::game::{GeographyGame, Phase, SettingsField};

pub(crate) fn draw(frame: &mut Frame, game: &GeographyGame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Status
            Constraint::Min(0),    // Main area
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    let header = Paragraph::new("🌍 ═══ GEOTERM · GEOGRAPHY CHALLENGE ═══ 🌍")
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(header, chunks[0]);

    draw_status(frame, chunks[1], game);

    match game.phase {
        Phase::Settings => draw_settings(frame, chunks[2], game),
        Phase::Playing => draw_playing(frame, chunks[2], game),
        Phase::GameOver => draw_game_over(frame, chunks[2], game),
    }

    draw_footer(frame, chunks[3], game);
}

fn draw_status(frame: &mut Frame, area: Rect, game: &GeographyGame) {
    let s = &game.session;
    let status = format!(
        "Score: {}   High Score: {}   Streak: {}x   ⏱ {}s   Hints: {}",
        s.score(),
        s.high_score(),
        s.streak(),
        s.time_remaining(),
        s.hints_remaining(),
    );
    let widget = Paragraph::new(status)
        .block(Block::default().borders(Borders::ALL).title("Session"))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn draw_settings(frame: &mut Frame, area: Rect, game: &GeographyGame) {
    let continent_label = match game.settings.continent.as_str() {
        "all" => "All Continents",
        other => other,
    };
    let marker = |field| if game.focus == field { "▶" } else { " " };

    let mut text = format!(
        "{} Continent:  {}\n\n{} Difficulty: {}",
        marker(SettingsField::Continent),
        continent_label,
        marker(SettingsField::Difficulty),
        game.settings.difficulty.label(),
    );
    if let Some(error) = &game.error {
        text.push_str(&format!("\n\n⚠ {error}"));
    }

    let widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" GAME SETTINGS "))
        .alignment(Alignment::Center);
    frame.render_widget(widget, centered(area, 60, 40));
}

fn draw_playing(frame: &mut Frame, area: Rect, game: &GeographyGame) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    // Target panel
    let mut lines = Vec::new();
    if let Some(round) = &game.round {
        lines.push(format!("Find: {}  {}", round.target().name, round.target().flag));
        if !round.hints_revealed().is_empty() {
            lines.push(String::new());
            lines.push("Hints:".to_string());
            for hint in round.hints_revealed() {
                lines.push(format!("  • {hint}"));
            }
        }
    } else {
        lines.push("…".to_string());
    }
    let target = Paragraph::new(lines.join("\n"))
        .block(Block::default().borders(Borders::ALL).title("Target"))
        .style(Style::default().fg(Color::Green));
    frame.render_widget(target, halves[0]);

    // Country list; Enter "clicks" the selected country
    let items: Vec<ListItem> = game
        .choices()
        .into_iter()
        .map(ListItem::new)
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Countries"))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("▶ ");
    let mut state = ListState::default();
    state.select(Some(game.cursor));
    frame.render_stateful_widget(list, halves[1], &mut state);
}

fn draw_game_over(frame: &mut Frame, area: Rect, game: &GeographyGame) {
    let mut text = String::from("Game Over!\n\n");
    if let Some(summary) = &game.last_summary {
        text.push_str(&format!("Final Score: {}\n", summary.final_score));
        if summary.new_high_score {
            text.push_str("🎉 New High Score!\n");
        }
        text.push_str(&format!("Longest Streak: {}x\n", summary.final_streak));
    }
    if !game.unlocked.is_empty() {
        text.push('\n');
        for achievement in &game.unlocked {
            text.push_str(&format!(
                "🏆 Achievement Unlocked: {} (+{})\n",
                achievement.title, achievement.reward
            ));
        }
    }
    if let Some(error) = &game.error {
        text.push_str(&format!("\n⚠ {error}"));
    }

    let widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" RESULTS "))
        .style(Style::default().fg(Color::Magenta))
        .alignment(Alignment::Center);
    frame.render_widget(widget, centered(area, 60, 60));
}

fn draw_footer(frame: &mut Frame, area: Rect, game: &GeographyGame) {
    let text = match game.phase {
        Phase::Settings => {
            "↑↓ change · Tab switch field · Enter start · Esc quit".to_string()
        }
        Phase::Playing => game.feedback.clone().unwrap_or_else(|| {
            "↑↓ select · Enter answer · h hint · e end game · Esc quit".to_string()
        }),
        Phase::GameOver => "Enter play again · Esc quit".to_string(),
    };
    let widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

/// A rect of `pct_x` by `pct_y` percent, centered inside `area`.
fn centered(area: Rect, pct_x: u16, pct_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
