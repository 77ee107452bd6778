use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, trace};

use crate::errors::GenerationError;

pub const MIN_LENGTH: usize = 1;
pub const MAX_LENGTH: usize = 512;
pub const DEFAULT_LENGTH: usize = 8;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NUMERIC: &str = "0123456789";
const SPECIAL: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// A named group of characters that is enabled or disabled as a unit.
///
/// Declaration order is the canonical pool order, and the derived `Ord`
/// follows it, so a `BTreeSet<CharacterClass>` iterates canonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CharacterClass {
    Lowercase,
    Uppercase,
    Numeric,
    Special,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 4] = [
        CharacterClass::Lowercase,
        CharacterClass::Uppercase,
        CharacterClass::Numeric,
        CharacterClass::Special,
    ];

    pub fn table(self) -> &'static str {
        match self {
            CharacterClass::Lowercase => LOWERCASE,
            CharacterClass::Uppercase => UPPERCASE,
            CharacterClass::Numeric => NUMERIC,
            CharacterClass::Special => SPECIAL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CharacterClass::Lowercase => "lowercase",
            CharacterClass::Uppercase => "uppercase",
            CharacterClass::Numeric => "numeric",
            CharacterClass::Special => "special",
        }
    }

    /// Keyboard shortcut: the first letter of the name.
    pub fn shortcut(self) -> char {
        match self {
            CharacterClass::Lowercase => 'l',
            CharacterClass::Uppercase => 'u',
            CharacterClass::Numeric => 'n',
            CharacterClass::Special => 's',
        }
    }

    pub fn from_shortcut(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.shortcut() == key)
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown character class: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub classes: BTreeSet<CharacterClass>,
    pub length: usize,
}

impl GenerationRequest {
    pub fn new<I>(classes: I, length: usize) -> Self
    where
        I: IntoIterator<Item = CharacterClass>,
    {
        Self {
            classes: classes.into_iter().collect(),
            length,
        }
    }
}

/// Draws one character from a non-empty pool.
pub trait Randomizer: Sync {
    fn name(&self) -> &'static str;

    fn draw(&self, pool: &[char], rng: &mut dyn rand::RngCore) -> char;
}

/// Uniform index into the pool.
pub struct Simplest;

impl Randomizer for Simplest {
    fn name(&self) -> &'static str {
        "simplest"
    }

    fn draw(&self, pool: &[char], rng: &mut dyn rand::RngCore) -> char {
        draw_one(pool, rng)
    }
}

pub static RANDOMIZERS: &[&dyn Randomizer] = &[&Simplest];

pub fn build_pool(classes: &BTreeSet<CharacterClass>) -> Result<Vec<char>, GenerationError> {
    if classes.is_empty() {
        return Err(GenerationError::InvalidRequest);
    }

    let pool: Vec<char> = classes.iter().flat_map(|class| class.table().chars()).collect();
    trace!(size = pool.len(), "built character pool");

    Ok(pool)
}

/// Panics if `pool` is empty; `build_pool` never returns an empty pool.
pub fn draw_one<R: Rng + ?Sized>(pool: &[char], rng: &mut R) -> char {
    pool[rng.random_range(0..pool.len())]
}

pub fn parse_length(input: &str) -> Result<usize, GenerationError> {
    let invalid = || GenerationError::InvalidLength(input.trim().to_string());

    let length: usize = input.trim().parse().map_err(|_| invalid())?;
    check_length(length).map_err(|_| invalid())?;

    Ok(length)
}

fn check_length(length: usize) -> Result<(), GenerationError> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(GenerationError::InvalidLength(length.to_string()));
    }

    Ok(())
}

pub fn generate(request: &GenerationRequest) -> Result<String, GenerationError> {
    let mut rng = rand::rng();
    generate_with(request, &mut rng)
}

pub fn generate_with<R: Rng>(
    request: &GenerationRequest,
    rng: &mut R,
) -> Result<String, GenerationError> {
    let pool = build_pool(&request.classes)?;
    check_length(request.length)?;

    let mut sequence = String::with_capacity(request.length);
    for _ in 0..request.length {
        let randomizer = RANDOMIZERS.choose(rng).copied().unwrap_or(&Simplest);
        let c = randomizer.draw(&pool, rng);
        trace!(randomizer = randomizer.name(), "drew character");
        sequence.push(c);
    }

    debug!(
        length = request.length,
        classes = ?request.classes,
        pool = pool.len(),
        "generated sequence"
    );

    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn union_of(classes: &[CharacterClass]) -> String {
        classes.iter().map(|class| class.table()).collect()
    }

    fn all_subsets() -> Vec<Vec<CharacterClass>> {
        (1u8..16)
            .map(|mask| {
                CharacterClass::ALL
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, class)| class)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn tables_have_expected_sizes_and_are_disjoint() {
        assert_eq!(CharacterClass::Lowercase.table().len(), 26);
        assert_eq!(CharacterClass::Uppercase.table().len(), 26);
        assert_eq!(CharacterClass::Numeric.table().len(), 10);
        assert_eq!(CharacterClass::Special.table().len(), 32);

        let all = union_of(&CharacterClass::ALL);
        let unique: BTreeSet<char> = all.chars().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn every_subset_and_length_yields_valid_sequence() {
        let mut rng = StdRng::seed_from_u64(7);

        for subset in all_subsets() {
            let allowed = union_of(&subset);
            for length in [1, 2, 8, 100, 511, 512] {
                let request = GenerationRequest::new(subset.iter().copied(), length);
                let sequence = generate_with(&request, &mut rng).unwrap();

                assert_eq!(sequence.chars().count(), length);
                assert!(sequence.chars().all(|c| allowed.contains(c)), "{subset:?}: {sequence}");
            }
        }
    }

    #[test]
    fn empty_class_set_is_rejected_for_any_length() {
        for length in [0, 1, 8, 512, 513] {
            let request = GenerationRequest { classes: BTreeSet::new(), length };
            assert_eq!(generate(&request), Err(GenerationError::InvalidRequest));
        }
        assert_eq!(build_pool(&BTreeSet::new()), Err(GenerationError::InvalidRequest));
    }

    #[test]
    fn out_of_range_lengths_are_rejected() {
        for length in [0, 513] {
            let request = GenerationRequest::new(CharacterClass::ALL, length);
            assert!(matches!(generate(&request), Err(GenerationError::InvalidLength(_))));
        }
    }

    #[test]
    fn single_lowercase_character() {
        let request = GenerationRequest::new([CharacterClass::Lowercase], 1);
        let sequence = generate(&request).unwrap();

        assert_eq!(sequence.len(), 1);
        assert!(LOWERCASE.contains(sequence.as_str()));
    }

    #[test]
    fn numeric_draws_are_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(42);
        let request = GenerationRequest::new([CharacterClass::Numeric], MAX_LENGTH);

        let mut counts = [0usize; 10];
        let mut total = 0;
        while total < 10_000 {
            let sequence = generate_with(&request, &mut rng).unwrap();
            for c in sequence.chars().take(10_000 - total) {
                counts[c.to_digit(10).unwrap() as usize] += 1;
                total += 1;
            }
        }

        // Expected 1000 each, standard deviation is 30.
        for (digit, count) in counts.iter().enumerate() {
            assert!((850..=1150).contains(count), "digit {digit} drawn {count} times");
        }
    }

    #[test]
    fn pool_is_canonical_concatenation() {
        let classes: BTreeSet<_> =
            [CharacterClass::Special, CharacterClass::Lowercase].into_iter().collect();
        let expected: Vec<char> = format!("{}{}", LOWERCASE, SPECIAL).chars().collect();

        let before = build_pool(&classes).unwrap();
        generate(&GenerationRequest::new(CharacterClass::ALL, 64)).unwrap();
        let after = build_pool(&classes).unwrap();

        assert_eq!(before, expected);
        assert_eq!(before, after);
    }

    #[test]
    fn draw_one_stays_in_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = ['x'];
        for _ in 0..32 {
            assert_eq!(draw_one(&pool, &mut rng), 'x');
        }
    }

    #[test]
    fn parse_length_accepts_integers_in_range() {
        assert_eq!(parse_length("1"), Ok(1));
        assert_eq!(parse_length("512"), Ok(512));
        assert_eq!(parse_length(" 8 "), Ok(8));

        for bad in ["0", "513", "-1", "abc", "", "8.5"] {
            assert_eq!(
                parse_length(bad),
                Err(GenerationError::InvalidLength(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn class_names_and_shortcuts_round_trip() {
        for class in CharacterClass::ALL {
            assert_eq!(class.name().parse::<CharacterClass>(), Ok(class));
            assert_eq!(CharacterClass::from_shortcut(class.shortcut()), Some(class));
        }
        assert_eq!(CharacterClass::from_shortcut('g'), None);
        assert!("greek".parse::<CharacterClass>().is_err());
    }

    #[test]
    fn registry_has_simplest() {
        assert!(RANDOMIZERS.iter().any(|r| r.name() == "simplest"));
    }
}
