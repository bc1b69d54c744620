//! Rendering: a pure function of [`App`].

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use reach_core::Category;

use crate::app::{AccountForm, App, KnowledgeForm, LoginField, Modal, Screen};
use crate::theme::category_style;

pub fn draw(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::Login => draw_login(frame, app),
        Screen::Dashboard => {
            draw_dashboard(frame, app);
            match &app.modal {
                Modal::AddAccount(form) => draw_account_modal(frame, form),
                Modal::AddKnowledge(form) => draw_knowledge_modal(frame, form),
                Modal::None => {}
            }
        }
    }
}

// =============================================================================
// LOGIN
// =============================================================================

fn draw_login(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 40, frame.area());
    let block = Block::default()
        .title(" Sign in to ReachInbox ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let mut lines = vec![
        Line::from(Span::styled(
            "AI-Powered Email Aggregator",
            Style::default().fg(Color::DarkGray),
        )),
        Line::raw(""),
        field_line("Email", &app.login.email, app.login.focus == LoginField::Email),
        field_line(
            "Password",
            &"•".repeat(app.login.password.chars().count()),
            app.login.focus == LoginField::Password,
        ),
        Line::raw(""),
    ];
    if let Some(error) = &app.login.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::raw(""));
    }
    lines.push(Line::from(Span::styled(
        "Tab switch · Enter sign in · Esc quit",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

// =============================================================================
// DASHBOARD
// =============================================================================

fn draw_dashboard(frame: &mut Frame, app: &App) {
    let [header, stats, filter, main, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(frame, app, header);
    draw_stats(frame, app, stats);
    draw_filter_bar(frame, app, filter);

    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(main);
    draw_email_list(frame, app, list_area);
    draw_email_detail(frame, app, detail_area);

    draw_status_line(frame, app, status);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let user = app
        .session
        .as_ref()
        .map(|s| s.email.as_str())
        .unwrap_or("-");
    let line = Line::from(vec![
        Span::styled(
            "ReachInbox",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(user, Style::default().fg(Color::Gray)),
        Span::raw("   "),
        Span::styled(
            "/ search · c category · a account · r refresh · g reply · A add account · K add knowledge · L logout · q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_stats(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::horizontal([
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
    ])
    .split(area);

    let (total, interested, meetings, accounts) = match &app.state.stats {
        Some(stats) => (
            stats.total_emails.to_string(),
            stats.count_for(Category::Interested).to_string(),
            stats.count_for(Category::MeetingBooked).to_string(),
            stats.accounts_configured.to_string(),
        ),
        None => ("-".into(), "-".into(), "-".into(), "-".into()),
    };

    stat_tile(frame, chunks[0], "Total Emails", &total, Color::White);
    stat_tile(
        frame,
        chunks[1],
        "Interested",
        &interested,
        category_style(Some(Category::Interested)).color,
    );
    stat_tile(
        frame,
        chunks[2],
        "Meetings",
        &meetings,
        category_style(Some(Category::MeetingBooked)).color,
    );
    stat_tile(frame, chunks[3], "Accounts", &accounts, Color::Magenta);
}

fn stat_tile(frame: &mut Frame, area: Rect, title: &str, value: &str, color: Color) {
    let line = Line::from(Span::styled(
        value.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL),
        ),
        area,
    );
}

fn draw_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let category = app
        .state
        .filter
        .category
        .map(|c| c.as_str())
        .unwrap_or("all");
    let account = app.state.filter.account.as_deref().unwrap_or("all");

    let mut spans = vec![Span::raw("Search: ")];
    if app.searching {
        spans.push(Span::styled(
            format!("{}▏", app.state.filter.query),
            Style::default().fg(Color::Yellow),
        ));
    } else {
        spans.push(Span::raw(app.state.filter.query.clone()));
    }
    spans.push(Span::raw("   Category: "));
    spans.push(Span::styled(
        category,
        Style::default().fg(category_style(app.state.filter.category).color),
    ));
    spans.push(Span::raw("   Account: "));
    spans.push(Span::styled(account, Style::default().fg(Color::Cyan)));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_email_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Emails ({}) ", app.state.filtered.len()))
        .borders(Borders::ALL);

    if app.state.filtered.is_empty() {
        let empty = Paragraph::new("No emails found\nAdd an account to start syncing")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .filtered
        .iter()
        .map(|email| {
            let style = category_style(email.category());
            let sender_style = if email.read {
                Style::default().fg(Color::Gray)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            let header = Line::from(vec![
                Span::styled(style.glyph, Style::default().fg(style.color)),
                Span::raw(" "),
                Span::styled(email.sender.clone(), sender_style),
            ]);
            let subject = Line::from(Span::styled(
                format!("  {}", email.subject),
                Style::default().fg(Color::Gray),
            ));
            ListItem::new(Text::from(vec![header, subject]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("➜ ")
        .highlight_style(Style::default().fg(Color::Green));

    let mut list_state = ListState::default();
    list_state.select(app.state.selected);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_email_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Email ").borders(Borders::ALL);

    let Some(email) = app.state.selected_email() else {
        let empty = Paragraph::new("Select an email to view details")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let style = category_style(email.category());
    let category = email.ai_category.as_deref().unwrap_or("Uncategorized");

    let mut lines = vec![
        Line::from(Span::styled(
            email.subject.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("From: ", Style::default().fg(Color::DarkGray)),
            Span::raw(email.sender.clone()),
            Span::styled("   Account: ", Style::default().fg(Color::DarkGray)),
            Span::raw(email.account.clone()),
        ]),
        Line::from(vec![
            Span::styled("Category: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} {}", style.glyph, category),
                Style::default().fg(style.color),
            ),
        ]),
        Line::raw(""),
    ];
    for body_line in email.body.lines() {
        lines.push(Line::raw(body_line.to_string()));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "AI Reply Suggestion (g to generate)",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));
    if app.state.loading_reply {
        lines.push(Line::from(Span::styled(
            "Generating AI-powered reply...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if let Some(reply) = &app.state.suggested_reply {
        for reply_line in reply.lines() {
            lines.push(Line::from(Span::styled(
                reply_line.to_string(),
                Style::default().fg(Color::Green),
            )));
        }
    }

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

fn draw_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let Some(status) = &app.state.status else {
        return;
    };
    let color = if status.error { Color::Red } else { Color::Green };
    frame.render_widget(
        Paragraph::new(Span::styled(
            status.text.clone(),
            Style::default().fg(color),
        )),
        area,
    );
}

// =============================================================================
// MODALS
// =============================================================================

fn draw_account_modal(frame: &mut Frame, form: &AccountForm) {
    let area = centered_rect(55, 45, frame.area());
    let block = Block::default()
        .title(" Add IMAP Account ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let lines = vec![
        Line::from(Span::styled(
            "Connect your email account for real-time synchronization.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::raw(""),
        field_line("Email Address", &form.email, form.focus == 0),
        field_line(
            "App Password",
            &"•".repeat(form.password.chars().count()),
            form.focus == 1,
        ),
        field_line("IMAP Server", &form.server, form.focus == 2),
        field_line("Port", &form.port, form.focus == 3),
        Line::raw(""),
        Line::from(Span::styled(
            "Tab next field · Enter add · Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn draw_knowledge_modal(frame: &mut Frame, form: &KnowledgeForm) {
    let area = centered_rect(55, 40, frame.area());
    let block = Block::default()
        .title(" Add Product Knowledge ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let lines = vec![
        Line::from(Span::styled(
            "Added to the vector database for AI-powered reply suggestions.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::raw(""),
        field_line("Content", &form.content, form.focus == 0),
        field_line("Metadata (JSON)", &form.metadata, form.focus == 1),
        Line::raw(""),
        Line::from(Span::styled(
            "Tab next field · Enter add · Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

// =============================================================================
// HELPERS
// =============================================================================

fn field_line<'a>(label: &'a str, value: &str, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "▏" } else { "" };
    Line::from(vec![
        Span::styled(format!("{}: ", label), label_style),
        Span::raw(format!("{}{}", value, cursor)),
    ])
}

/// A rect centered in `area`, sized as percentages of it.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}
