use crate::types::*;
use rand::seq::SliceRandom;
use rand::Rng;

/// Build a fresh 20-man squad for `club`
pub fn generate_squad(club: &str, config: &GameConfig, rng: &mut impl Rng) -> Vec<PlayerRecord> {
    (0..SQUAD_SIZE)
        .map(|slot| {
            let name = generate_name(config.name_pool.as_ref(), rng);
            let position = pick_position(&config.position_scheme, slot, rng);
            let profile = generate_profile(config.squad_model, config, rng);
            PlayerRecord::new(&name, club, position, profile)
        })
        .collect()
}

/// Academy intake: one prospect per fixed name, each attached to a random club
pub fn generate_youth_roster(config: &GameConfig, rng: &mut impl Rng) -> Vec<PlayerRecord> {
    config
        .youth_names
        .iter()
        .map(|name| {
            let club = config
                .clubs
                .choose(rng)
                .map(|c| c.name.clone())
                .unwrap_or_default();
            let position = *Position::OUTFIELD_AND_KEEPER
                .choose(rng)
                .unwrap_or(&Position::Midfielder);
            let profile = generate_profile(ProgressionModel::Attributes, config, rng);
            PlayerRecord::new(name, &club, position, profile)
        })
        .collect()
}

fn generate_name(pool: Option<&NamePool>, rng: &mut impl Rng) -> String {
    let combined = pool.and_then(|pool| {
        let first = pool.first_names.choose(rng)?;
        let last = pool.last_names.choose(rng)?;
        Some(format!("{} {}", first, last))
    });
    combined.unwrap_or_else(|| format!("Player {}", rng.gen_range(100..=999)))
}

fn pick_position(scheme: &PositionScheme, slot: usize, rng: &mut impl Rng) -> Position {
    match scheme {
        PositionScheme::Template(template) if !template.is_empty() => {
            template[slot % template.len()]
        }
        _ => *Position::OUTFIELD_AND_KEEPER
            .choose(rng)
            .unwrap_or(&Position::Midfielder),
    }
}

fn generate_profile(model: ProgressionModel, config: &GameConfig, rng: &mut impl Rng) -> Profile {
    match model {
        ProgressionModel::Rating => Profile::Rating {
            rating: draw(config.rating_range, rng),
        },
        ProgressionModel::Attributes => Profile::Attributes {
            stats: Stats {
                speed: draw(config.stat_range, rng),
                passing: draw(config.stat_range, rng),
                shooting: draw(config.stat_range, rng),
                stamina: draw(config.stat_range, rng),
            },
        },
    }
}

/// Uniform over an inclusive range given in either order
fn draw((a, b): (u32, u32), rng: &mut impl Rng) -> u32 {
    rng.gen_range(a.min(b)..=a.max(b))
}
