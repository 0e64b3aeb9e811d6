use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{AppEvent, Notification, NotificationLevel};
use super::theme;
use super::views::combat::{CombatCommand, CombatViewState};
use crate::core::bestiary::{self, MonsterGateway};

/// Ticks a notification stays visible.
const NOTIFICATION_TTL: u32 = 100;
/// Notifications shown at once.
const MAX_NOTIFICATIONS: usize = 3;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Combat tracker view state.
    pub combat: CombatViewState,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Whether the monster list fetch is in flight.
    loading_list: bool,
    /// Receiver for background events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Sender handed to background fetch tasks.
    event_tx: mpsc::UnboundedSender<AppEvent>,
    /// Monster reference data source.
    gateway: Arc<dyn MonsterGateway>,
}

impl AppState {
    pub fn new(
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        gateway: Arc<dyn MonsterGateway>,
    ) -> Self {
        Self {
            running: true,
            combat: CombatViewState::default(),
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            loading_list: false,
            event_rx,
            event_tx,
            gateway,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        self.spawn_monster_list_fetch();

        while self.running {
            // Render
            terminal.draw(|frame| self.render(frame))?;

            // Select next event
            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Background fetches ──────────────────────────────────────────────

    fn spawn_monster_list_fetch(&mut self) {
        if self.loading_list {
            return;
        }
        self.loading_list = true;

        let gateway = Arc::clone(&self.gateway);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = bestiary::fetch_monster_list(gateway.as_ref())
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::MonsterListLoaded(result));
        });
    }

    fn spawn_monster_detail_fetch(&self, index: String, count: usize) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = bestiary::fetch_monster_detail(gateway.as_ref(), &index)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::MonsterDetailLoaded {
                index,
                count,
                result,
            });
        });
    }

    // ── Event handling ──────────────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: Ctrl+C always quits
                if is_force_quit(&crossterm_event) {
                    self.running = false;
                    return;
                }

                // Priority 2: Help modal
                if self.show_help {
                    if let Event::Key(KeyEvent {
                        code: KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q'),
                        kind: KeyEventKind::Press,
                        ..
                    }) = crossterm_event
                    {
                        self.show_help = false;
                    }
                    return;
                }

                // Priority 3: Combat view
                if !self.combat.handle_input(&crossterm_event) {
                    // Priority 4: Global keybindings
                    self.handle_global_key(&crossterm_event);
                }
            }
            AppEvent::Tick => self.on_tick(),
            AppEvent::MonsterListLoaded(result) => {
                self.loading_list = false;
                match result {
                    Ok(list) => {
                        log::info!("Monster list ready ({} entries)", list.len());
                        self.combat.on_monster_list_loaded(list);
                    }
                    Err(e) => {
                        log::error!("Monster list fetch failed: {e}");
                        self.push_notification(
                            format!("Could not load monster list: {e}"),
                            NotificationLevel::Error,
                        );
                    }
                }
            }
            AppEvent::MonsterDetailLoaded {
                index,
                count,
                result,
            } => {
                if let Err(ref e) = result {
                    log::error!("Monster fetch for '{index}' failed: {e}");
                }
                self.combat.on_monster_detail_loaded(&index, count, result);
            }
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Quit => {
                self.running = false;
            }
        }

        self.drain_combat_commands();
    }

    fn handle_global_key(&mut self, event: &Event) {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return;
        };

        match code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('L') => {
                if self.combat.encounter().state().monster_list().is_empty() {
                    self.spawn_monster_list_fetch();
                }
            }
            _ => {}
        }
    }

    /// Run side effects queued by the combat view.
    fn drain_combat_commands(&mut self) {
        for command in self.combat.take_commands() {
            match command {
                CombatCommand::FetchMonster { index, count } => {
                    log::debug!("Fetching monster '{index}' x{count}");
                    self.spawn_monster_detail_fetch(index, count);
                }
                CombatCommand::Notify { message, level } => {
                    self.push_notification(message, level);
                }
            }
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: NOTIFICATION_TTL,
        });

        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([Constraint::Min(10), Constraint::Length(1)]).split(area);

        self.combat.render(frame, chunks[0]);
        self.render_status_bar(frame, chunks[1]);

        // Overlays
        self.render_notifications(frame, area);

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let list_len = self.combat.encounter().state().monster_list().len();
        let bestiary_status = if self.loading_list {
            Span::styled("loading", Style::default().fg(theme::PRIMARY_LIGHT))
        } else if list_len == 0 {
            Span::styled("offline", Style::default().fg(theme::WARNING))
        } else {
            Span::styled(
                format!("{list_len} monsters"),
                Style::default().fg(theme::TEXT_MUTED),
            )
        };

        let busy = if self.combat.is_busy() {
            Span::styled(" FETCHING ", theme::busy_badge())
        } else {
            Span::raw("")
        };

        let status = Line::from(vec![
            Span::styled(" TTCOMBAT ", theme::brand_badge()),
            Span::raw(" "),
            busy,
            Span::raw(" "),
            Span::styled("SRD:", theme::key_hint()),
            Span::raw(" "),
            bestiary_status,
            Span::raw(" │ "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("L", theme::key_hint()),
            Span::raw(":reload list "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1;

        let notification_area = Rect::new(x, y, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(format!(" {prefix} "), Style::default().fg(color).bold()),
                    Span::raw(&n.message),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = vec![
            ("Global:", ""),
            ("q", "Quit application"),
            ("?", "Toggle this help"),
            ("L", "Reload monster list"),
            ("Ctrl+C", "Force quit"),
            ("", ""),
            ("Roster:", ""),
            ("p", "Add player character"),
            ("m", "Add monster (Tab completes name)"),
            ("r", "Add one random PC"),
            ("R", "Add several random PCs"),
            ("x", "Remove selected participant"),
            ("j/k", "Select participant"),
            ("", ""),
            ("Combat:", ""),
            ("s", "Start combat"),
            ("Space / n", "Next turn"),
            ("1-9", "Use action of the active monster"),
            ("D", "Damage selected monster"),
            ("h", "Heal selected monster"),
            ("[ / ]", "Scroll combat log"),
            ("", ""),
            ("Forms:", ""),
            ("Tab / Shift+Tab", "Next / previous field"),
            ("Enter", "Submit"),
            ("Ctrl+R", "Roll initiative (PC form)"),
            ("Esc", "Close"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                " Keybindings",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
        ];

        for (key, desc) in &keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {key}"),
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{:<22}", key),
                        Style::default().fg(theme::PRIMARY_LIGHT).bold(),
                    ),
                    Span::raw(*desc),
                ]));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  Press "),
            Span::styled("?", Style::default().fg(theme::PRIMARY_LIGHT).bold()),
            Span::raw(" or "),
            Span::styled("Esc", Style::default().fg(theme::PRIMARY_LIGHT).bold()),
            Span::raw(" to close"),
        ]));

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

fn is_force_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) if modifiers.contains(KeyModifiers::CONTROL)
    )
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
