//! Quest command parsing and the player/admin command surface.
//!
//! The host forwards raw `QUEST ...` input here; responses are plain display
//! strings the host renders verbatim. Admin verbs are gated on a flag the
//! host derives from its own permission model.

use std::path::Path;

use log::info;
use uuid::Uuid;

use crate::host::QuestHost;
use crate::quest::engine::QuestEngine;
use crate::quest::period::Period;
use crate::quest::pools::QuestPools;
use crate::quest::scheduler::RolloverWatch;
use crate::quest::types::TurnInSummary;

/// Parsed quest command verbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestCommand {
    /// QUEST, QUEST SHOW - display all active quests and progress
    Show,
    /// QUEST TURNIN <period> - claim a completed quest
    TurnIn(Period),
    /// QUEST REROLL [period] - admin: discard and regenerate for everyone
    Reroll(Option<Period>),
    /// QUEST RESET <player> [period] - admin: wipe a player's progress
    Reset(Uuid, Option<Period>),
    /// QUEST FORCECOMPLETE <player> <period> - admin: complete and claim
    ForceComplete(Uuid, Period),
    /// QUEST SETPROGRESS <player> <period> <index> <amount> - admin
    SetProgress(Uuid, Period, usize, u32),
    /// QUEST RELOAD - admin: re-read the pool file
    Reload,
    Unknown(String),
}

/// True when the input starts with the quest verb and should be routed here.
pub fn is_quest_command(input: &str) -> bool {
    input
        .trim()
        .split_whitespace()
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case("quest"))
}

/// Parse raw input into a [`QuestCommand`]. The leading `QUEST` token is
/// required; malformed arguments fold into `Unknown` with a usage hint.
pub fn parse_quest_command(input: &str) -> QuestCommand {
    let parts: Vec<&str> = input.trim().split_whitespace().collect();
    if parts.is_empty() || !parts[0].eq_ignore_ascii_case("quest") {
        return QuestCommand::Unknown(input.trim().to_string());
    }
    let Some(verb) = parts.get(1) else {
        return QuestCommand::Show;
    };

    match verb.to_ascii_lowercase().as_str() {
        "show" => QuestCommand::Show,
        "turnin" => match parts.get(2).and_then(|id| Period::from_id(id)) {
            Some(period) => QuestCommand::TurnIn(period),
            None => QuestCommand::Unknown("Usage: QUEST TURNIN <daily|weekly|monthly>".to_string()),
        },
        "reroll" => match parts.get(2) {
            None => QuestCommand::Reroll(None),
            Some(id) if id.eq_ignore_ascii_case("all") => QuestCommand::Reroll(None),
            Some(id) => match Period::from_id(id) {
                Some(period) => QuestCommand::Reroll(Some(period)),
                None => {
                    QuestCommand::Unknown("Usage: QUEST REROLL [daily|weekly|monthly|all]".to_string())
                }
            },
        },
        "reset" => {
            let usage = "Usage: QUEST RESET <player-uuid> [daily|weekly|monthly]";
            let Some(player) = parts.get(2).and_then(|raw| Uuid::parse_str(raw).ok()) else {
                return QuestCommand::Unknown(usage.to_string());
            };
            match parts.get(3) {
                None => QuestCommand::Reset(player, None),
                Some(id) => match Period::from_id(id) {
                    Some(period) => QuestCommand::Reset(player, Some(period)),
                    None => QuestCommand::Unknown(usage.to_string()),
                },
            }
        }
        "forcecomplete" => {
            let usage = "Usage: QUEST FORCECOMPLETE <player-uuid> <daily|weekly|monthly>";
            let player = parts.get(2).and_then(|raw| Uuid::parse_str(raw).ok());
            let period = parts.get(3).and_then(|id| Period::from_id(id));
            match (player, period) {
                (Some(player), Some(period)) => QuestCommand::ForceComplete(player, period),
                _ => QuestCommand::Unknown(usage.to_string()),
            }
        }
        "setprogress" => {
            let usage = "Usage: QUEST SETPROGRESS <player-uuid> <period> <index> <amount>";
            let player = parts.get(2).and_then(|raw| Uuid::parse_str(raw).ok());
            let period = parts.get(3).and_then(|id| Period::from_id(id));
            let index = parts.get(4).and_then(|raw| raw.parse::<usize>().ok());
            let amount = parts.get(5).and_then(|raw| raw.parse::<u32>().ok());
            match (player, period, index, amount) {
                (Some(player), Some(period), Some(index), Some(amount)) => {
                    QuestCommand::SetProgress(player, period, index, amount)
                }
                _ => QuestCommand::Unknown(usage.to_string()),
            }
        }
        "reload" => QuestCommand::Reload,
        _ => QuestCommand::Unknown(format!(
            "Unknown quest command: '{}'\nType QUEST for your active quests.",
            verb
        )),
    }
}

/// Execute a parsed command on behalf of `actor`.
pub fn handle_quest_command(
    engine: &mut QuestEngine,
    watch: &mut RolloverWatch,
    host: &mut dyn QuestHost,
    pools_path: &Path,
    actor: Uuid,
    admin: bool,
    command: QuestCommand,
) -> String {
    match command {
        QuestCommand::Show => render_quest_overview(engine, actor),
        QuestCommand::TurnIn(period) => match engine.turn_in(actor, period, host) {
            Some(summary) => render_turn_in(engine, actor, &summary),
            None => "Quest not ready yet.".to_string(),
        },
        QuestCommand::Reroll(target) if admin => {
            let rerolled = match target {
                Some(period) => {
                    let seed = engine.force_global_reroll(period);
                    watch.invalidate(period);
                    vec![(period, seed)]
                }
                None => {
                    let all = engine.force_global_reroll_all();
                    watch.invalidate_all();
                    all
                }
            };
            info!("{} rerolled {} period(s)", actor, rerolled.len());
            rerolled
                .iter()
                .map(|(period, seed)| format!("{} quest rerolled (seed {})", period.display_name(), seed))
                .collect::<Vec<_>>()
                .join("\n")
        }
        QuestCommand::Reset(player, target) if admin => {
            match target {
                Some(period) => {
                    engine.reset_player_quest(player, period);
                    format!("Reset {} quest progress for {}", period.id(), player)
                }
                None => {
                    engine.reset_player_all(player);
                    format!("Reset all quest progress for {}", player)
                }
            }
        }
        QuestCommand::ForceComplete(player, period) if admin => {
            match engine.force_complete(player, period, host) {
                Some(summary) => format!(
                    "Force-completed {} quest for {} (+{} {})",
                    period.id(),
                    player,
                    summary.amount,
                    period.spec().currency_name
                ),
                None => format!("{} quest for {} was already claimed.", period.id(), player),
            }
        }
        QuestCommand::SetProgress(player, period, index, amount) if admin => {
            match engine.set_objective_progress(player, period, index, amount) {
                Ok(()) => format!(
                    "Set {} objective {} to {} for {}",
                    period.id(),
                    index,
                    amount,
                    player
                ),
                Err(err) => format!("Cannot set progress: {}", err),
            }
        }
        QuestCommand::Reload if admin => {
            let pools = QuestPools::load_or_create(pools_path);
            engine.reload_pools(pools);
            "Quest pools reloaded.".to_string()
        }
        QuestCommand::Unknown(message) => message,
        // Admin verb without the admin flag.
        _ => "You do not have permission to do that.".to_string(),
    }
}

/// Render every period's quest with per-objective progress markers.
fn render_quest_overview(engine: &mut QuestEngine, player: Uuid) -> String {
    let mut out = String::new();
    for period in Period::ALL {
        let (quest, progress) = engine.quest_view(player, period);
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!(
            "=== {} Quest ({}) ===\n",
            period.display_name(),
            quest.seed
        ));
        if quest.objectives.is_empty() {
            out.push_str("  (no objectives available)\n");
            continue;
        }
        for (index, objective) in quest.objectives.iter().enumerate() {
            let counter = progress.counters.get(index).copied().unwrap_or(0);
            let marker = if counter >= objective.amount { "x" } else { " " };
            out.push_str(&format!(
                "[{}] {} [{}/{}]\n",
                marker,
                objective.description(),
                counter,
                objective.amount
            ));
        }
        if progress.completed {
            out.push_str("  Completed! Come back after the next rollover.\n");
        } else if engine.is_complete(player, period) {
            out.push_str(&format!(
                "  Ready! Use QUEST TURNIN {} to claim your reward.\n",
                period.id().to_uppercase()
            ));
        }
        if period.has_streak() {
            let streak = engine.streak(player, period);
            if streak > 0 {
                out.push_str(&format!("  Day {} Streak\n", streak));
            }
        }
    }
    out
}

/// Render the turn-in confirmation with streak and bonus details.
fn render_turn_in(engine: &mut QuestEngine, player: Uuid, summary: &TurnInSummary) -> String {
    let spec = summary.period.spec();
    let mut out = format!("✓ {} Quest completed!\n", summary.period.display_name());
    if summary.period.has_streak() {
        out.push_str(&format!(
            "  Day {} Streak (+{} bonus)\n",
            summary.streak_day, summary.streak_bonus
        ));
        let next = engine
            .streak(player, summary.period)
            .min(spec.max_streak);
        if summary.at_max_bonus {
            out.push_str(&format!(
                "  Reward: +{} {} (max!)\n",
                summary.amount, spec.currency_name
            ));
        } else {
            out.push_str(&format!(
                "  Reward: +{} {} (next: +{})\n",
                summary.amount,
                spec.currency_name,
                spec.base_amount + next
            ));
        }
    } else {
        out.push_str(&format!(
            "  Reward: +{} {}\n",
            summary.amount, spec.currency_name
        ));
    }
    for grant in &summary.bonus_grants {
        out.push_str(&format!("  Bonus: +{} {}\n", grant.amount, grant.item));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_quest_is_show() {
        assert_eq!(parse_quest_command("quest"), QuestCommand::Show);
        assert_eq!(parse_quest_command("  QUEST SHOW "), QuestCommand::Show);
    }

    #[test]
    fn turnin_requires_a_period() {
        assert_eq!(
            parse_quest_command("quest turnin daily"),
            QuestCommand::TurnIn(Period::Daily)
        );
        assert!(matches!(
            parse_quest_command("quest turnin"),
            QuestCommand::Unknown(_)
        ));
        assert!(matches!(
            parse_quest_command("quest turnin yearly"),
            QuestCommand::Unknown(_)
        ));
    }

    #[test]
    fn reroll_accepts_period_or_all() {
        assert_eq!(parse_quest_command("quest reroll"), QuestCommand::Reroll(None));
        assert_eq!(
            parse_quest_command("quest reroll all"),
            QuestCommand::Reroll(None)
        );
        assert_eq!(
            parse_quest_command("quest reroll weekly"),
            QuestCommand::Reroll(Some(Period::Weekly))
        );
    }

    #[test]
    fn setprogress_parses_all_arguments() {
        let player = Uuid::new_v4();
        let input = format!("quest setprogress {} daily 1 7", player);
        assert_eq!(
            parse_quest_command(&input),
            QuestCommand::SetProgress(player, Period::Daily, 1, 7)
        );
        assert!(matches!(
            parse_quest_command("quest setprogress nope daily 1 7"),
            QuestCommand::Unknown(_)
        ));
    }

    #[test]
    fn quest_verb_detection() {
        assert!(is_quest_command("QUEST turnin daily"));
        assert!(is_quest_command("  quest"));
        assert!(!is_quest_command("questing around"));
        assert!(!is_quest_command("look"));
    }
}
