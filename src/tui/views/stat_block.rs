//! Monster stat block panel.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::bestiary::models::{format_challenge_rating, format_senses, format_speed};
use crate::core::combat::{HpBand, MonsterParticipant};
use crate::core::dice::format_modifier;
use crate::tui::theme;

/// Lines of a stat block. Action numbers are shown as key hints only when
/// `actions_enabled` (it is this monster's turn).
pub fn stat_block_lines(monster: &MonsterParticipant, actions_enabled: bool) -> Vec<Line<'static>> {
    let band = HpBand::from_hp(monster.current_hp(), monster.max_hp());
    let mut lines = vec![
        Line::from(Span::styled(monster.name.clone(), theme::title())),
        Line::from(Span::styled(
            monster.type_line(),
            theme::muted().add_modifier(Modifier::ITALIC),
        )),
        Line::raw(""),
        labelled("Armor Class", monster.ac.to_string()),
        Line::from(vec![
            Span::styled("Hit Points ", theme::heading()),
            Span::styled(
                format!("{}/{}", monster.current_hp(), monster.max_hp()),
                Style::default()
                    .fg(theme::hp_color(band))
                    .add_modifier(Modifier::BOLD),
            ),
            if monster.defeated() {
                Span::styled("  DEFEATED", Style::default().fg(theme::ERROR))
            } else {
                Span::raw("")
            },
        ]),
        labelled("Speed", format_speed(&monster.speed)),
        Line::raw(""),
    ];

    let codes: Vec<Span> = monster
        .ability_scores
        .iter()
        .map(|(ability, _)| Span::styled(format!("{:^9}", ability.code()), theme::heading()))
        .collect();
    let scores: Vec<Span> = monster
        .ability_scores
        .iter()
        .map(|(_, s)| {
            Span::styled(
                format!("{:^9}", format!("{} ({})", s.score, format_modifier(s.modifier))),
                Style::default().fg(theme::TEXT),
            )
        })
        .collect();
    lines.push(Line::from(codes));
    lines.push(Line::from(scores));
    lines.push(Line::raw(""));

    if !monster.senses.is_empty() {
        lines.push(labelled("Senses", format_senses(&monster.senses)));
    }
    if !monster.languages.is_empty() {
        lines.push(labelled("Languages", monster.languages.clone()));
    }
    lines.push(labelled(
        "Challenge",
        format_challenge_rating(monster.challenge_rating),
    ));

    if !monster.special_abilities.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("Special Abilities", theme::title())));
        for ability in &monster.special_abilities {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}. ", ability.name),
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD | Modifier::ITALIC),
                ),
                Span::styled(ability.desc.clone(), theme::muted()),
            ]));
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Actions", theme::title())));
    if monster.actions.is_empty() {
        lines.push(Line::from(Span::styled("No actions listed.", theme::muted())));
    }
    for (i, action) in monster.actions.iter().enumerate() {
        let key = if actions_enabled && i < 9 {
            Span::styled(
                format!("[{}] ", i + 1),
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw("")
        };
        let bonus = action
            .attack_bonus
            .map(|b| format!(" ({} to hit)", format_modifier(b)))
            .unwrap_or_default();
        lines.push(Line::from(vec![
            key,
            Span::styled(
                format!("{}{}. ", action.name, bonus),
                Style::default()
                    .fg(theme::TEXT)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ),
            Span::styled(action.desc.clone(), theme::muted()),
        ]));
    }

    lines
}

fn labelled(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label} "), theme::heading()),
        Span::styled(value, Style::default().fg(theme::TEXT)),
    ])
}

pub fn render_stat_block(
    frame: &mut Frame,
    area: Rect,
    monster: Option<&MonsterParticipant>,
    actions_enabled: bool,
    scroll: u16,
) {
    let block = Block::default()
        .title(" Stat Block ")
        .borders(Borders::ALL)
        .border_style(if actions_enabled {
            theme::border_focused()
        } else {
            theme::border_default()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(monster) = monster else {
        frame.render_widget(
            Paragraph::new(Span::styled(
                " No stat block available for player characters.",
                Style::default().fg(theme::TEXT_DIM),
            )),
            inner,
        );
        return;
    };

    frame.render_widget(
        Paragraph::new(stat_block_lines(monster, actions_enabled))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        inner,
    );
}
