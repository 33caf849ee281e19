use crate::error::{GameError, GameResult};
use crate::types::*;

/// Spend `amount` credits raising `attribute` by the same amount.
///
/// Leaves the player untouched on any error.
pub fn train(player: &mut PlayerRecord, attribute: Attribute, amount: u32) -> GameResult<()> {
    if player.credits < amount {
        return Err(GameError::InsufficientCredits {
            available: player.credits,
            requested: amount,
        });
    }

    let slot = player
        .profile
        .slot_mut(attribute)
        .ok_or_else(|| GameError::UnknownAttribute(attribute.name().to_string()))?;

    let raised = slot.saturating_add(amount);
    if raised > ATTRIBUTE_MAX {
        return Err(GameError::AttributeCapped {
            attribute: attribute.name().to_string(),
            max: ATTRIBUTE_MAX,
        });
    }

    *slot = raised;
    player.credits -= amount;
    player.training_sessions += 1;

    log::debug!(
        "{} trained {} by {} ({} credits left)",
        player.name,
        attribute.name(),
        amount,
        player.credits
    );
    Ok(())
}

/// Boolean form of [`train`]: `false` means nothing changed.
///
/// Besides a short balance, a raise that would take the attribute past
/// [`ATTRIBUTE_MAX`] or an attribute the player's model doesn't track also
/// returns `false`, even when the credits would cover it.
pub fn apply_credits(player: &mut PlayerRecord, attribute: Attribute, amount: u32) -> bool {
    train(player, attribute, amount).is_ok()
}

/// Add credits; negative amounts are treated as zero
pub fn earn_credits(player: &mut PlayerRecord, amount: i64) {
    let amount = amount.clamp(0, u32::MAX as i64) as u32;
    player.credits = player.credits.saturating_add(amount);
}

/// One week of rest: injuries count down and fitness comes back
pub fn recover(player: &mut PlayerRecord, config: &GameConfig) {
    if player.injured {
        player.injury_weeks = player.injury_weeks.saturating_sub(1);
        if player.injury_weeks == 0 {
            player.injured = false;
        }
    }
    player.fitness = player
        .fitness
        .saturating_add(config.fitness_recovery)
        .min(ATTRIBUTE_MAX);
}

/// Recovery tick for a whole roster
pub fn recover_squad(squad: &mut [PlayerRecord], config: &GameConfig) {
    for player in squad.iter_mut() {
        recover(player, config);
    }
}
