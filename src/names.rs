//! Random display names (`AdjectiveNounNN`)

use rand::Rng;
use rand::seq::IndexedRandom;

const ADJECTIVES: &[&str] = &[
    "Swift", "Blazing", "Cosmic", "Neon", "Turbo", "Hyper", "Ultra", "Mega", "Super", "Epic",
    "Mystic", "Shadow", "Thunder", "Storm", "Fire", "Ice", "Dark", "Light", "Golden", "Silver",
    "Savage", "Wild", "Fierce", "Bold", "Brave", "Lucky", "Rapid", "Flash", "Cyber", "Pixel",
];

const NOUNS: &[&str] = &[
    "Tapper", "Player", "Ninja", "Hunter", "Master", "Legend", "Hero", "Warrior", "Champion", "Pro",
    "Gamer", "Ace", "Star", "King", "Queen", "Wolf", "Fox", "Dragon", "Phoenix", "Tiger",
    "Hawk", "Eagle", "Cobra", "Viper", "Shark", "Bear", "Lion", "Panther", "Falcon", "Raven",
];

/// A fresh name such as `NeonFalcon42`, always within the leaderboard limit
pub fn generate_name<R: Rng>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Swift");
    let noun = NOUNS.choose(rng).copied().unwrap_or("Tapper");
    let number: u32 = rng.random_range(0..100);
    format!("{}{}{}", adjective, noun, number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::MAX_PLAYER_NAME_LEN;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_names_fit_leaderboard() {
        let mut rng = Pcg32::seed_from_u64(0);
        for _ in 0..500 {
            let name = generate_name(&mut rng);
            assert!(name.chars().count() <= MAX_PLAYER_NAME_LEN, "{}", name);
            assert!(name.chars().last().unwrap().is_ascii_digit());
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = generate_name(&mut Pcg32::seed_from_u64(5));
        let b = generate_name(&mut Pcg32::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
