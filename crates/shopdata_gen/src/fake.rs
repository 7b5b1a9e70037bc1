//! Value fabrication on top of a seeded RNG.
//!
//! Wraps the `fake` crate and the RNG behind one type so every random draw in
//! a generation pass comes from the same deterministic stream.

use crate::error::GenerateError;
use chrono::{Days, NaiveDate};
use fake::faker::address::en::{CityName, StateAbbr};
use fake::faker::company::en::CatchPhrase;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Word, Words};
use fake::faker::name::en::Name;
use fake::Fake;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Color names for clothing products
const COLOR_NAMES: &[&str] = &[
    "AliceBlue",
    "Beige",
    "Black",
    "BlanchedAlmond",
    "Blue",
    "Brown",
    "BurlyWood",
    "CadetBlue",
    "Chocolate",
    "Coral",
    "Crimson",
    "DarkGreen",
    "DarkKhaki",
    "DarkOliveGreen",
    "DarkSlateGray",
    "FireBrick",
    "ForestGreen",
    "Gold",
    "GoldenRod",
    "Gray",
    "Indigo",
    "Ivory",
    "Khaki",
    "Lavender",
    "LightSkyBlue",
    "Maroon",
    "MidnightBlue",
    "MintCream",
    "Navy",
    "Olive",
    "Orange",
    "Orchid",
    "Peru",
    "Plum",
    "Purple",
    "RosyBrown",
    "Salmon",
    "SeaGreen",
    "Sienna",
    "SlateBlue",
    "Tan",
    "Teal",
    "Tomato",
    "Turquoise",
    "White",
];

/// Star ratings with their sampling weights
const RATING_WEIGHTS: [(u8, f64); 5] = [(1, 0.05), (2, 0.10), (3, 0.15), (4, 0.30), (5, 0.40)];

/// Synthetic values drawn from one RNG, so a seed fixes every value
pub struct FakeData<R: Rng> {
    rng: R,
}

impl<R: Rng> FakeData<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a full name
    pub fn full_name(&mut self) -> Result<String, GenerateError> {
        non_empty(Name().fake_with_rng(&mut self.rng), "customer name")
    }

    /// `SafeEmail` address (example.com/org/net domains)
    pub fn email(&mut self) -> Result<String, GenerateError> {
        non_empty(SafeEmail().fake_with_rng(&mut self.rng), "customer email")
    }

    /// Generate a "City, ST" location
    pub fn location(&mut self) -> Result<String, GenerateError> {
        let city = non_empty(CityName().fake_with_rng(&mut self.rng), "city")?;
        let state = non_empty(StateAbbr().fake_with_rng(&mut self.rng), "state abbreviation")?;
        Ok(format!("{}, {}", city, state))
    }

    pub fn catch_phrase(&mut self) -> Result<String, GenerateError> {
        non_empty(CatchPhrase().fake_with_rng(&mut self.rng), "catch phrase")
    }

    pub fn word(&mut self) -> Result<String, GenerateError> {
        non_empty(Word().fake_with_rng(&mut self.rng), "word")
    }

    pub fn color_name(&mut self) -> &'static str {
        self.pick(COLOR_NAMES)
    }

    /// Generate a sentence of exactly `word_count` words (capitalized, with period)
    pub fn sentence(&mut self, word_count: usize) -> Result<String, GenerateError> {
        let words: Vec<String> = Words(word_count..word_count + 1).fake_with_rng(&mut self.rng);
        if words.len() != word_count || words.iter().any(|w| w.is_empty()) {
            return Err(GenerateError::Exhausted("review comment"));
        }
        let mut text = words.join(" ");
        if let Some(first) = text.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        text.push('.');
        Ok(text)
    }

    /// Generate a price rounded to cents, within `[min, max]`
    pub fn price(&mut self, min: f64, max: f64) -> f64 {
        let value = self.rng.random_range(min..=max);
        (value * 100.0).round() / 100.0
    }

    /// Generate a random integer in range (inclusive)
    pub fn int_range(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    /// Generate a random count in range (inclusive)
    pub fn count_range(&mut self, min: usize, max: usize) -> usize {
        self.rng.random_range(min..=max)
    }

    /// `true` with the given probability
    pub fn bool_with_probability(&mut self, probability: f64) -> bool {
        self.rng.random::<f64>() < probability
    }

    /// Pick a random element from a non-empty slice
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.rng.random_range(0..items.len())]
    }

    /// Pick `amount` distinct ids, clamped to the pool size
    pub fn sample_distinct(&mut self, pool: &[i64], amount: usize) -> Vec<i64> {
        pool.choose_multiple(&mut self.rng, amount.min(pool.len()))
            .copied()
            .collect()
    }

    /// Draw a 1-5 star rating, skewed positive
    pub fn rating(&mut self) -> Result<u8, GenerateError> {
        RATING_WEIGHTS
            .choose_weighted(&mut self.rng, |&(_, weight)| weight)
            .map(|&(stars, _)| stars)
            .map_err(|e| GenerateError::Weights(e.to_string()))
    }

    /// Generate a date uniformly within `[start, end]`
    pub fn date_between(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<NaiveDate, GenerateError> {
        let span = (end - start).num_days();
        if span < 0 {
            return Err(GenerateError::DateRange(format!(
                "empty interval {} to {}",
                start, end
            )));
        }
        let offset = self.rng.random_range(0..=span) as u64;
        start
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| GenerateError::DateRange(format!("{} + {} days", start, offset)))
    }
}

fn non_empty(value: String, field: &'static str) -> Result<String, GenerateError> {
    if value.trim().is_empty() {
        Err(GenerateError::Exhausted(field))
    } else {
        Ok(value)
    }
}
