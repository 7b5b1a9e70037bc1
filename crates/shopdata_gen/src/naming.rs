//! Category-conditioned product names.

use crate::error::GenerateError;
use crate::fake::FakeData;
use crate::model::Category;
use rand::Rng;

/// Builds a product name from fabricated parts
pub type NameTemplate<R> = fn(&mut FakeData<R>) -> Result<String, GenerateError>;

const DEVICE_TYPES: &[&str] = &["Phone", "Tablet", "Laptop", "Headphones", "Speaker", "Camera"];
const GARMENT_TYPES: &[&str] = &["T-Shirt", "Jeans", "Jacket", "Dress", "Shoes", "Hat"];
const HOME_GOODS: &[&str] = &["Coffee Maker", "Blender", "Lamp", "Chair", "Table", "Vase"];

/// The name template for a category
pub fn template_for<R: Rng>(category: Category) -> NameTemplate<R> {
    match category {
        Category::Electronics => electronics,
        Category::Clothing => clothing,
        Category::HomeAndKitchen => home_and_kitchen,
        Category::Books => book,
        _ => generic,
    }
}

fn electronics<R: Rng>(fake: &mut FakeData<R>) -> Result<String, GenerateError> {
    let phrase = fake.catch_phrase()?;
    Ok(format!("{} {}", phrase, fake.pick(DEVICE_TYPES)))
}

fn clothing<R: Rng>(fake: &mut FakeData<R>) -> Result<String, GenerateError> {
    let color = fake.color_name();
    Ok(format!("{} {}", color, fake.pick(GARMENT_TYPES)))
}

fn home_and_kitchen<R: Rng>(fake: &mut FakeData<R>) -> Result<String, GenerateError> {
    let item = fake.pick(HOME_GOODS);
    Ok(format!("{} {}", item, fake.word()?))
}

fn book<R: Rng>(fake: &mut FakeData<R>) -> Result<String, GenerateError> {
    let phrase = fake.catch_phrase()?;
    Ok(format!("{} - {}", phrase, title_case(&fake.word()?)))
}

fn generic<R: Rng>(fake: &mut FakeData<R>) -> Result<String, GenerateError> {
    fake.catch_phrase()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
