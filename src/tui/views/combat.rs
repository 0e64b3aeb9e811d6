//! Combat Tracker view.
//!
//! One screen: initiative list on the left, turn info, stat block and log
//! on the right. Forms and prompts open as modals over it.
//!
//! The view never touches the network. Fetches are queued as
//! [`CombatCommand`]s which the app drains after each input and runs on
//! background tasks.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

use crate::core::bestiary::{
    cached_monster_detail, resolve_monster_name, store_monster_list, MonsterDetail, MonsterSummary,
};
use crate::core::combat::{
    ActionOutcome, CombatError, Encounter, ErrorCategory, InitiativeRow, ParticipantKind,
    TurnPrompt, MAX_MONSTER_BATCH, MAX_RANDOM_PLAYERS,
};
use crate::tui::events::NotificationLevel;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

use super::stat_block::render_stat_block;

/// Most suggestions listed under the monster name field.
const MAX_SUGGESTIONS: usize = 5;

// ============================================================================
// Commands
// ============================================================================

/// Side effects the view asks the app to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatCommand {
    FetchMonster { index: String, count: usize },
    Notify {
        message: String,
        level: NotificationLevel,
    },
}

// ============================================================================
// Modes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HpAction {
    Damage,
    Heal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    PlayerForm,
    MonsterForm,
    RandomCount,
    Hp(HpAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerField {
    Name,
    Initiative,
    ArmorClass,
}

impl PlayerField {
    fn next(self) -> Self {
        match self {
            Self::Name => Self::Initiative,
            Self::Initiative => Self::ArmorClass,
            Self::ArmorClass => Self::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Name => Self::ArmorClass,
            Self::Initiative => Self::Name,
            Self::ArmorClass => Self::Initiative,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonsterField {
    Name,
    Count,
}

impl MonsterField {
    fn toggle(self) -> Self {
        match self {
            Self::Name => Self::Count,
            Self::Count => Self::Name,
        }
    }
}

fn notification_level(category: ErrorCategory) -> NotificationLevel {
    match category {
        ErrorCategory::Network => NotificationLevel::Error,
        ErrorCategory::Validation | ErrorCategory::Lookup | ErrorCategory::Precondition => {
            NotificationLevel::Warning
        }
    }
}

// ============================================================================
// Combat View State
// ============================================================================

pub struct CombatViewState {
    encounter: Encounter,
    mode: Mode,

    // Player form
    player_name: InputBuffer,
    player_init: InputBuffer,
    player_ac: InputBuffer,
    player_field: PlayerField,

    // Monster form
    monster_name: InputBuffer,
    monster_count: InputBuffer,
    monster_field: MonsterField,
    monster_busy: bool,

    random_count: InputBuffer,
    hp_input: InputBuffer,
    hp_target: Option<String>,
    form_error: Option<String>,

    selected_idx: usize,
    turn_info: Vec<String>,
    log_scroll: usize,
    commands: Vec<CombatCommand>,
}

impl CombatViewState {
    pub fn new(encounter: Encounter) -> Self {
        Self {
            encounter,
            mode: Mode::Normal,
            player_name: InputBuffer::new(),
            player_init: InputBuffer::numeric(),
            player_ac: InputBuffer::numeric(),
            player_field: PlayerField::Name,
            monster_name: InputBuffer::new(),
            monster_count: InputBuffer::numeric(),
            monster_field: MonsterField::Name,
            monster_busy: false,
            random_count: InputBuffer::numeric(),
            hp_input: InputBuffer::numeric(),
            hp_target: None,
            form_error: None,
            selected_idx: 0,
            turn_info: vec![],
            log_scroll: 0,
            commands: vec![],
        }
    }

    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    /// A monster fetch is in flight; further monster submits are ignored.
    pub fn is_busy(&self) -> bool {
        self.monster_busy
    }

    pub fn turn_info(&self) -> &[String] {
        &self.turn_info
    }

    /// Drain queued side effects.
    pub fn take_commands(&mut self) -> Vec<CombatCommand> {
        std::mem::take(&mut self.commands)
    }

    fn notify(&mut self, message: impl Into<String>, level: NotificationLevel) {
        self.commands.push(CombatCommand::Notify {
            message: message.into(),
            level,
        });
    }

    fn report(&mut self, error: &CombatError) {
        self.notify(error.to_string(), notification_level(error.category()));
    }

    // ────────────────────────────────────────────────────────────────────
    // Background results
    // ────────────────────────────────────────────────────────────────────

    pub fn on_monster_list_loaded(&mut self, list: Vec<MonsterSummary>) {
        store_monster_list(self.encounter.state_mut(), list);
    }

    pub fn on_monster_detail_loaded(
        &mut self,
        index: &str,
        count: usize,
        result: Result<MonsterDetail, String>,
    ) {
        self.monster_busy = false;
        match result {
            Ok(detail) => {
                if self.add_monsters(index, &detail, count) && self.mode == Mode::MonsterForm {
                    self.reset_monster_form();
                }
            }
            Err(message) => {
                let message = format!("Error adding monster: {message}");
                self.form_error = Some(message.clone());
                self.notify(message, NotificationLevel::Error);
            }
        }
    }

    fn add_monsters(&mut self, index: &str, detail: &MonsterDetail, count: usize) -> bool {
        match self.encounter.add_monsters(index, detail, count) {
            Ok(ids) => {
                let label = if ids.len() > 1 {
                    format!("Added {} {}", ids.len(), detail.name)
                } else {
                    format!("Added {}", detail.name)
                };
                self.notify(label, NotificationLevel::Success);
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Input handling
    // ────────────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match self.mode {
            Mode::Normal => self.handle_normal(*code, *modifiers),
            Mode::PlayerForm => self.handle_player_form(*code, *modifiers),
            Mode::MonsterForm => self.handle_monster_form(*code),
            Mode::RandomCount => self.handle_random_count(*code),
            Mode::Hp(action) => self.handle_hp_input(*code, action),
        }
    }

    fn handle_normal(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }

        match code {
            KeyCode::Char('p') => {
                self.open_player_form();
                true
            }
            KeyCode::Char('m') => {
                self.open_monster_form();
                true
            }
            KeyCode::Char('r') => {
                self.add_random_players(1);
                true
            }
            KeyCode::Char('R') => {
                self.random_count.set_text("1");
                self.form_error = None;
                self.mode = Mode::RandomCount;
                true
            }
            KeyCode::Char('s') => {
                match self.encounter.start_combat() {
                    Ok(prompt) => {
                        self.log_scroll = 0;
                        self.show_prompt(&prompt);
                    }
                    Err(e) => {
                        self.turn_info = vec![e.to_string()];
                        self.report(&e);
                    }
                }
                true
            }
            KeyCode::Char(' ') | KeyCode::Char('n') => {
                match self.encounter.next_turn() {
                    Ok(prompt) => self.show_prompt(&prompt),
                    Err(e) => self.report(&e),
                }
                true
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.encounter.state().len();
                if len > 0 {
                    self.selected_idx = (self.selected_idx + 1) % len;
                }
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let len = self.encounter.state().len();
                if len > 0 {
                    self.selected_idx = if self.selected_idx == 0 {
                        len - 1
                    } else {
                        self.selected_idx - 1
                    };
                }
                true
            }
            KeyCode::Char('D') => {
                self.open_hp_prompt(HpAction::Damage);
                true
            }
            KeyCode::Char('h') => {
                self.open_hp_prompt(HpAction::Heal);
                true
            }
            KeyCode::Char('x') => {
                self.remove_selected();
                true
            }
            KeyCode::Char(c @ '1'..='9') => {
                let action_index = (c as usize) - ('1' as usize);
                self.perform_action(action_index);
                true
            }
            KeyCode::Char('[') => {
                self.log_scroll = self.log_scroll.saturating_add(1);
                true
            }
            KeyCode::Char(']') => {
                self.log_scroll = self.log_scroll.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    fn handle_player_form(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Esc => self.close_modal(),
            KeyCode::Tab | KeyCode::Down => self.player_field = self.player_field.next(),
            KeyCode::BackTab | KeyCode::Up => self.player_field = self.player_field.prev(),
            KeyCode::Enter => self.submit_player(),
            KeyCode::Char('r') if modifiers == KeyModifiers::CONTROL => {
                // Roll a d20 for the initiative field
                let roll = self.encounter.roll_die(20);
                self.player_init.set_text(&roll.to_string());
            }
            other => {
                let buf = match self.player_field {
                    PlayerField::Name => &mut self.player_name,
                    PlayerField::Initiative => &mut self.player_init,
                    PlayerField::ArmorClass => &mut self.player_ac,
                };
                if buf.handle_key(other) {
                    self.form_error = None;
                }
            }
        }
        true
    }

    fn handle_monster_form(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc => self.close_modal(),
            KeyCode::Tab => {
                if self.monster_field == MonsterField::Name && self.complete_monster_name() {
                    return true;
                }
                self.monster_field = self.monster_field.toggle();
            }
            KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.monster_field = self.monster_field.toggle();
            }
            KeyCode::Enter => self.submit_monster(),
            other => {
                let buf = match self.monster_field {
                    MonsterField::Name => &mut self.monster_name,
                    MonsterField::Count => &mut self.monster_count,
                };
                if buf.handle_key(other) {
                    self.form_error = None;
                }
            }
        }
        true
    }

    fn handle_random_count(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc => self.close_modal(),
            KeyCode::Enter => {
                let count = self.random_count.parse::<usize>().unwrap_or(1);
                self.add_random_players(count);
                self.close_modal();
            }
            other => {
                self.random_count.handle_key(other);
            }
        }
        true
    }

    fn handle_hp_input(&mut self, code: KeyCode, action: HpAction) -> bool {
        match code {
            KeyCode::Esc => self.close_modal(),
            KeyCode::Enter => {
                self.submit_hp(action);
            }
            other => {
                if self.hp_input.handle_key(other) {
                    self.form_error = None;
                }
            }
        }
        true
    }

    // ────────────────────────────────────────────────────────────────────
    // Operations
    // ────────────────────────────────────────────────────────────────────

    fn open_player_form(&mut self) {
        self.player_name.clear();
        self.player_init.clear();
        self.player_ac.clear();
        self.player_field = PlayerField::Name;
        self.form_error = None;
        self.mode = Mode::PlayerForm;
    }

    fn open_monster_form(&mut self) {
        if !self.monster_busy {
            self.reset_monster_form();
        }
        self.form_error = None;
        self.mode = Mode::MonsterForm;
    }

    fn reset_monster_form(&mut self) {
        self.monster_name.clear();
        self.monster_count.set_text("1");
        self.monster_field = MonsterField::Name;
    }

    fn close_modal(&mut self) {
        self.mode = Mode::Normal;
        self.form_error = None;
        self.hp_target = None;
    }

    fn submit_player(&mut self) {
        let name = self.player_name.text().trim().to_string();
        let initiative = self.player_init.parse::<i32>();
        let ac = self.player_ac.parse::<u32>();

        let (Some(initiative), Some(ac)) = (initiative, ac) else {
            self.form_error = Some("Name, initiative and AC are required".into());
            return;
        };
        if name.is_empty() {
            self.form_error = Some("Name, initiative and AC are required".into());
            return;
        }

        match self.encounter.add_player(&name, initiative, ac) {
            Ok(_) => {
                // Stay open for the next entry
                self.player_name.clear();
                self.player_init.clear();
                self.player_ac.clear();
                self.player_field = PlayerField::Name;
                self.form_error = None;
            }
            Err(e) => self.form_error = Some(e.to_string()),
        }
    }

    /// Monster names starting with the typed text, case-insensitive.
    fn monster_suggestions(&self) -> Vec<&str> {
        let typed = self.monster_name.text().trim().to_lowercase();
        if typed.is_empty() {
            return vec![];
        }
        self.encounter
            .state()
            .monster_list()
            .iter()
            .filter(|m| m.name.to_lowercase().starts_with(&typed))
            .take(MAX_SUGGESTIONS)
            .map(|m| m.name.as_str())
            .collect()
    }

    /// Complete the name field to the first suggestion. False when there
    /// was nothing to complete.
    fn complete_monster_name(&mut self) -> bool {
        let Some(first) = self.monster_suggestions().first().map(|s| s.to_string()) else {
            return false;
        };
        if first == self.monster_name.text() {
            return false;
        }
        self.monster_name.set_text(&first);
        true
    }

    fn submit_monster(&mut self) {
        if self.monster_busy {
            return;
        }

        let name = self.monster_name.text().trim().to_string();
        if name.is_empty() {
            self.form_error = Some("Monster name required".into());
            return;
        }
        let requested = match self.monster_count.parse::<usize>() {
            Some(count) if count >= 1 => count,
            _ => {
                self.form_error = Some("Count must be at least 1".into());
                return;
            }
        };

        if self.encounter.state().monster_list().is_empty() {
            self.form_error = Some("Monster list is not loaded yet".into());
            return;
        }
        let index = match resolve_monster_name(self.encounter.state(), &name) {
            Ok(index) => index,
            Err(e) => {
                self.form_error = Some(e.to_string());
                return;
            }
        };

        let count = requested.min(MAX_MONSTER_BATCH);
        if requested > count {
            self.notify(
                format!("At most {MAX_MONSTER_BATCH} monsters can be added at once; adding {count}."),
                NotificationLevel::Warning,
            );
        }

        if let Some(detail) = cached_monster_detail(self.encounter.state(), &index) {
            if self.add_monsters(&index, &detail, count) {
                self.reset_monster_form();
            }
            return;
        }

        self.monster_busy = true;
        self.form_error = None;
        self.commands.push(CombatCommand::FetchMonster { index, count });
    }

    fn add_random_players(&mut self, count: usize) {
        match self.encounter.add_random_players(count) {
            Ok(ids) => {
                let message = if ids.len() == 1 {
                    self.encounter
                        .state()
                        .participant(&ids[0])
                        .map(|p| {
                            format!(
                                "Added random PC: {} (Initiative: {}, AC: {})",
                                p.name(),
                                p.initiative(),
                                p.ac()
                            )
                        })
                        .unwrap_or_default()
                } else {
                    format!("Added {} random PCs to the initiative order.", ids.len())
                };
                self.notify(message, NotificationLevel::Success);
            }
            Err(e) => self.report(&e),
        }
    }

    fn selected_row(&self) -> Option<InitiativeRow> {
        self.encounter.initiative_view().into_iter().nth(self.selected_idx)
    }

    fn open_hp_prompt(&mut self, action: HpAction) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if row.kind != ParticipantKind::Monster {
            self.report(&CombatError::NotAMonster(row.name));
            return;
        }
        self.hp_target = Some(row.id);
        self.hp_input.clear();
        self.form_error = None;
        self.mode = Mode::Hp(action);
    }

    fn submit_hp(&mut self, action: HpAction) {
        let Some(target) = self.hp_target.clone() else {
            self.close_modal();
            return;
        };
        let Some(amount) = self.hp_input.parse::<i64>() else {
            self.form_error = Some("Enter a positive number".into());
            return;
        };

        let result = match action {
            HpAction::Damage => self.encounter.apply_damage(&target, amount),
            HpAction::Heal => self.encounter.apply_heal(&target, amount),
        };
        match result {
            Ok(change) => {
                if change.defeated && change.before > 0 {
                    let name = self
                        .encounter
                        .state()
                        .participant(&target)
                        .map(|p| p.name().to_string())
                        .unwrap_or_default();
                    self.notify(format!("{name} is defeated"), NotificationLevel::Info);
                }
                self.close_modal();
            }
            Err(e) => self.form_error = Some(e.to_string()),
        }
    }

    fn remove_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        match self.encounter.remove_participant(&row.id) {
            Ok(removed) => {
                let len = self.encounter.state().len();
                if self.selected_idx >= len {
                    self.selected_idx = len.saturating_sub(1);
                }
                self.notify(format!("Removed {}", removed.name()), NotificationLevel::Info);
            }
            Err(e) => self.report(&e),
        }
    }

    fn perform_action(&mut self, action_index: usize) {
        let Some(active) = self.encounter.state().active_participant() else {
            return;
        };
        if active.kind() != ParticipantKind::Monster || !active.can_act() {
            return;
        }
        let (id, name) = (active.id().to_string(), active.name().to_string());

        match self.encounter.perform_monster_action(&id, action_index) {
            Ok(outcome) => self.show_outcome(&outcome),
            Err(CombatError::ActionNotAvailable { .. }) => {
                self.turn_info.push("Action not available.".to_string());
            }
            Err(CombatError::NoTargets) => {
                self.turn_info = vec![format!("{name}'s turn"), "No targets available.".to_string()];
            }
            Err(e) => self.report(&e),
        }
    }

    fn show_prompt(&mut self, prompt: &TurnPrompt) {
        self.turn_info = vec![prompt.headline()];
        match prompt {
            TurnPrompt::Monster { id, actions, .. } => {
                if actions.is_empty() {
                    self.turn_info.push("This monster has no actions.".to_string());
                } else {
                    self.turn_info
                        .push("Select an action from the monster's stat block.".to_string());
                }
                self.select_id(id);
            }
            TurnPrompt::Player { id, .. } => self.select_id(id),
            TurnPrompt::Stalled => {}
        }
    }

    fn show_outcome(&mut self, outcome: &ActionOutcome) {
        let mut lines = vec![format!("{}'s turn", outcome.actor())];
        lines.extend(outcome.lines());
        self.turn_info = lines;
    }

    fn select_id(&mut self, id: &str) {
        if let Some(pos) = self
            .encounter
            .initiative_view()
            .iter()
            .position(|row| row.id == id)
        {
            self.selected_idx = pos;
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Rendering
    // ────────────────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block_focused("Combat Tracker");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let h_chunks = Layout::horizontal([
            Constraint::Percentage(40),
            Constraint::Percentage(60),
        ])
        .split(inner);

        let left = Layout::vertical([
            Constraint::Length(2), // Toolbar
            Constraint::Min(5),    // Initiative
        ])
        .split(h_chunks[0]);

        self.render_toolbar(frame, left[0]);
        let rows = self.encounter.initiative_view();
        self.render_initiative_list(frame, left[1], &rows);

        let right = Layout::vertical([
            Constraint::Length(self.turn_info_height()),
            Constraint::Min(8),
            Constraint::Length(8),
        ])
        .split(h_chunks[1]);

        self.render_turn_info(frame, right[0]);
        self.render_stat_panel(frame, right[1], &rows);
        self.render_combat_log(frame, right[2]);

        match self.mode {
            Mode::Normal => {}
            Mode::PlayerForm => self.render_player_form(frame, inner),
            Mode::MonsterForm => self.render_monster_form(frame, inner),
            Mode::RandomCount => self.render_random_count(frame, inner),
            Mode::Hp(action) => self.render_hp_prompt(frame, inner, action),
        }
    }

    fn turn_info_height(&self) -> u16 {
        (self.turn_info.len() as u16 + 2).clamp(3, 8)
    }

    fn render_toolbar(&self, frame: &mut Frame, area: Rect) {
        let state = self.encounter.state();
        let status = if state.combat_started() {
            let (position, total) = self.encounter.turn_counter();
            Line::from(vec![
                Span::styled(
                    format!(" Round: {} ", state.current_round()),
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("│ ", Style::default().fg(theme::TEXT_DIM)),
                Span::styled(
                    format!("Turn: {position}/{total}"),
                    Style::default().fg(theme::PRIMARY_LIGHT),
                ),
            ])
        } else {
            Line::from(Span::styled(
                " Not started",
                Style::default().fg(theme::TEXT_MUTED),
            ))
        };

        let hint = Line::from(vec![
            Span::styled("p", theme::key_hint()),
            Span::styled(":pc ", Style::default().fg(theme::TEXT_DIM)),
            Span::styled("m", theme::key_hint()),
            Span::styled(":monster ", Style::default().fg(theme::TEXT_DIM)),
            Span::styled("r/R", theme::key_hint()),
            Span::styled(":random ", Style::default().fg(theme::TEXT_DIM)),
            Span::styled("s", theme::key_hint()),
            Span::styled(":start ", Style::default().fg(theme::TEXT_DIM)),
            Span::styled("Space", theme::key_hint()),
            Span::styled(":next", Style::default().fg(theme::TEXT_DIM)),
        ]);

        frame.render_widget(Paragraph::new(vec![status, hint]), area);
    }

    fn render_initiative_list(&self, frame: &mut Frame, area: Rect, rows: &[InitiativeRow]) {
        let block = Block::default()
            .title(format!(" Initiative ({}) ", rows.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::PRIMARY));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    " Add PCs (p) and monsters (m)",
                    Style::default().fg(theme::TEXT_DIM),
                )),
                inner,
            );
            return;
        }

        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let is_selected = i == self.selected_idx;
                let prefix = match (row.active, is_selected) {
                    (true, true) => "▸▶",
                    (true, false) => " ▶",
                    (false, true) => "▸ ",
                    (false, false) => "  ",
                };

                let name_style = if row.defeated {
                    Style::default()
                        .fg(theme::DEFEATED)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else if row.active {
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD)
                } else if is_selected {
                    Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::TEXT)
                };

                let mut spans = vec![
                    Span::styled(prefix.to_string(), Style::default().fg(theme::ACCENT)),
                    Span::styled(
                        format!("{} ", kind_icon(row.kind)),
                        Style::default().fg(theme::kind_color(row.kind)),
                    ),
                    Span::styled(
                        format!("{:>3} ", row.initiative),
                        Style::default().fg(theme::PRIMARY_LIGHT),
                    ),
                    Span::styled(
                        truncate_name(&row.name, (area.width as usize).saturating_sub(24)),
                        name_style,
                    ),
                    Span::styled(format!(" AC {}", row.ac), theme::muted()),
                ];
                if let (Some((current, max)), Some(band)) = (row.hp, row.hp_band) {
                    spans.push(Span::styled(
                        format!(" {current}/{max}"),
                        Style::default().fg(theme::hp_color(band)),
                    ));
                }
                Line::from(spans)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_turn_info(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block_default("Turn");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = self
            .turn_info
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let style = if i == 0 {
                    theme::title()
                } else if text.starts_with("Hit!") {
                    Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD)
                } else if text == "Misses!" {
                    Style::default().fg(theme::TEXT_MUTED)
                } else {
                    Style::default().fg(theme::TEXT)
                };
                Line::from(Span::styled(text.clone(), style))
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }

    /// Stat block of the active monster on its turn, otherwise of the
    /// selected monster.
    fn render_stat_panel(&self, frame: &mut Frame, area: Rect, rows: &[InitiativeRow]) {
        let state = self.encounter.state();
        let active_monster = state
            .active_participant()
            .filter(|p| state.combat_started() && p.can_act())
            .and_then(|p| p.as_monster());

        let (monster, on_turn) = match active_monster {
            Some(m) => (Some(m), true),
            None => (
                rows.get(self.selected_idx)
                    .and_then(|row| state.participant(&row.id))
                    .and_then(|p| p.as_monster()),
                false,
            ),
        };

        render_stat_block(frame, area, monster, on_turn, 0);
    }

    fn render_combat_log(&self, frame: &mut Frame, area: Rect) {
        let events = self.encounter.log();
        let block = Block::default()
            .title(format!(" Log ({}) ", events.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::TEXT_DIM));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if events.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    " No events yet",
                    Style::default().fg(theme::TEXT_DIM),
                )),
                inner,
            );
            return;
        }

        let lines: Vec<Line> = events
            .iter()
            .rev()
            .map(|e| {
                Line::from(vec![
                    Span::styled(
                        format!("R{}.{} ", e.round, e.turn),
                        Style::default().fg(theme::TEXT_DIM),
                    ),
                    Span::styled(e.description.clone(), Style::default().fg(theme::TEXT_MUTED)),
                ])
            })
            .collect();

        let visible = inner.height as usize;
        let scroll = if lines.len() > visible {
            self.log_scroll.min(lines.len() - visible)
        } else {
            0
        };
        let total = lines.len();

        frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), inner);

        if total > visible {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible)).position(scroll);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .thumb_style(Style::default().fg(theme::PRIMARY_LIGHT))
                    .track_style(Style::default().fg(theme::TEXT_DIM)),
                inner,
                &mut scrollbar_state,
            );
        }
    }

    // ── Modals ──────────────────────────────────────────────────────────

    fn render_player_form(&self, frame: &mut Frame, area: Rect) {
        let modal = modal_rect(area, 44, 14);
        frame.render_widget(Clear, modal);
        let block = theme::block_focused("Add Player Character").style(Style::default().bg(theme::BG_BASE));
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

        render_field(frame, chunks[0], "Name", &self.player_name, self.player_field == PlayerField::Name);
        render_field(frame, chunks[1], "Initiative", &self.player_init, self.player_field == PlayerField::Initiative);
        render_field(frame, chunks[2], "AC", &self.player_ac, self.player_field == PlayerField::ArmorClass);
        self.render_form_error(frame, chunks[3]);

        let hint = Line::from(vec![
            Span::styled("Enter", theme::key_hint()),
            Span::styled(":add ", Style::default().fg(theme::TEXT_DIM)),
            Span::styled("Tab", theme::key_hint()),
            Span::styled(":field ", Style::default().fg(theme::TEXT_DIM)),
            Span::styled("Ctrl+R", theme::key_hint()),
            Span::styled(":roll init ", Style::default().fg(theme::TEXT_DIM)),
            Span::styled("Esc", theme::key_hint()),
            Span::styled(":close", Style::default().fg(theme::TEXT_DIM)),
        ]);
        frame.render_widget(Paragraph::new(hint), chunks[4]);
    }

    fn render_monster_form(&self, frame: &mut Frame, area: Rect) {
        let modal = modal_rect(area, 44, 16);
        frame.render_widget(Clear, modal);
        let title = if self.monster_busy { "Add Monster (loading…)" } else { "Add Monster" };
        let block = theme::block_focused(title).style(Style::default().bg(theme::BG_BASE));
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(MAX_SUGGESTIONS as u16),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

        render_field(frame, chunks[0], "Monster", &self.monster_name, self.monster_field == MonsterField::Name);

        let suggestions: Vec<Line> = if self.encounter.state().monster_list().is_empty() {
            vec![Line::from(Span::styled(" Loading monster list…", theme::muted()))]
        } else {
            self.monster_suggestions()
                .into_iter()
                .map(|name| Line::from(Span::styled(format!("  {name}"), theme::muted())))
                .collect()
        };
        frame.render_widget(Paragraph::new(suggestions), chunks[1]);

        render_field(frame, chunks[2], "Count", &self.monster_count, self.monster_field == MonsterField::Count);
        self.render_form_error(frame, chunks[3]);

        let hint = if self.monster_busy {
            Line::from(Span::styled(" Fetching stat block… ", theme::busy_badge()))
        } else {
            Line::from(vec![
                Span::styled("Enter", theme::key_hint()),
                Span::styled(":add ", Style::default().fg(theme::TEXT_DIM)),
                Span::styled("Tab", theme::key_hint()),
                Span::styled(":complete/field ", Style::default().fg(theme::TEXT_DIM)),
                Span::styled("Esc", theme::key_hint()),
                Span::styled(":close", Style::default().fg(theme::TEXT_DIM)),
            ])
        };
        frame.render_widget(Paragraph::new(hint), chunks[4]);
    }

    fn render_random_count(&self, frame: &mut Frame, area: Rect) {
        let modal = modal_rect(area, 34, 5);
        frame.render_widget(Clear, modal);
        let block = Block::default()
            .title(format!(" Random PCs (1-{MAX_RANDOM_PLAYERS}) "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::INFO))
            .style(Style::default().bg(theme::BG_BASE));
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        render_inline_value(frame, inner, &self.random_count);
    }

    fn render_hp_prompt(&self, frame: &mut Frame, area: Rect, action: HpAction) {
        let (label, color) = match action {
            HpAction::Damage => ("Damage Amount", theme::ERROR),
            HpAction::Heal => ("Heal Amount", theme::SUCCESS),
        };
        let target = self
            .hp_target
            .as_deref()
            .and_then(|id| self.encounter.state().participant(id))
            .map(|p| p.name().to_string())
            .unwrap_or_default();

        let modal = modal_rect(area, 34, 5);
        frame.render_widget(Clear, modal);
        let block = Block::default()
            .title(format!(" {label}: {target} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme::BG_BASE));
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner);
        render_inline_value(frame, rows[0], &self.hp_input);
        self.render_form_error(frame, rows[1]);
    }

    fn render_form_error(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref err) = self.form_error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {err}"),
                    Style::default().fg(theme::ERROR),
                )),
                area,
            );
        }
    }
}

impl Default for CombatViewState {
    fn default() -> Self {
        Self::new(Encounter::default())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn render_field(frame: &mut Frame, area: Rect, label: &str, buf: &InputBuffer, focused: bool) {
    let border_style = if focused {
        Style::default().fg(theme::PRIMARY_LIGHT)
    } else {
        Style::default().fg(theme::TEXT_DIM)
    };
    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = buf.text();
    let style = if text.is_empty() {
        Style::default().fg(theme::TEXT_DIM)
    } else {
        Style::default().fg(theme::TEXT)
    };
    let display = if text.is_empty() { label } else { text };
    frame.render_widget(Paragraph::new(Span::styled(display.to_string(), style)), inner);

    if focused {
        frame.set_cursor_position((inner.x + buf.cursor_column(), inner.y));
    }
}

fn render_inline_value(frame: &mut Frame, area: Rect, buf: &InputBuffer) {
    let text = buf.text();
    let display = if text.is_empty() { "0" } else { text };
    frame.render_widget(
        Paragraph::new(Span::styled(
            display.to_string(),
            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Left),
        area,
    );
    frame.set_cursor_position((area.x + buf.cursor_column(), area.y));
}

/// Centered rect of at most `width` x `height` inside `area`.
fn modal_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn kind_icon(kind: ParticipantKind) -> &'static str {
    match kind {
        ParticipantKind::Player => "🛡",
        ParticipantKind::Monster => "👹",
    }
}

fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else if max > 2 {
        let kept: String = name.chars().take(max - 1).collect();
        format!("{kept}…")
    } else {
        name.chars().take(max).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
