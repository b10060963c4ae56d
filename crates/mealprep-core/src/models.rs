use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between day, meal and suggestion in a meal-plan entry label.
pub const LABEL_SEPARATOR: &str = " - ";

// ---------------------------------------------------------------------------
// Food list
// ---------------------------------------------------------------------------

/// The user's food items, cleaned for use in a prompt.
///
/// Entries are trimmed, blank entries are dropped, and duplicates are removed
/// keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodList {
    items: Vec<String>,
}

impl FoodList {
    pub fn new<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut items: Vec<String> = Vec::new();
        for entry in raw {
            let item = entry.as_ref().trim();
            if item.is_empty() || items.iter().any(|existing| existing == item) {
                continue;
            }
            items.push(item.to_string());
        }
        Self { items }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The food groups the categorization prompt offers the model.
///
/// Parsed pantry entries keep the model's group text verbatim; this enum only
/// drives prompt rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodGroup {
    Grains,
    ProteinMeat,
    FruitsVegetables,
    Dairy,
    SugarsOils,
    Miscellaneous,
}

impl FoodGroup {
    pub const ALL: [FoodGroup; 6] = [
        Self::Grains,
        Self::ProteinMeat,
        Self::FruitsVegetables,
        Self::Dairy,
        Self::SugarsOils,
        Self::Miscellaneous,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Grains => "Grains",
            Self::ProteinMeat => "Protein/Meat",
            Self::FruitsVegetables => "Fruits/Vegetables",
            Self::Dairy => "Dairy",
            Self::SugarsOils => "Sugars/Oils",
            Self::Miscellaneous => "Miscellaneous",
        }
    }

    /// Typical members, shown to the model as hints.
    pub fn examples(self) -> &'static str {
        match self {
            Self::Grains => "rice, oats, bread, pasta",
            Self::ProteinMeat => "chicken, fish, beans, eggs, tofu",
            Self::FruitsVegetables => "apples, bananas, lettuce, tomatoes, carrots",
            Self::Dairy => "milk, cheese, yogurt",
            Self::SugarsOils => "butter, oils, chocolate, syrup, honey",
            Self::Miscellaneous => "juice, coffee, spices",
        }
    }
}

impl fmt::Display for FoodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------

/// A day covered by the meal plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// Column order of the meal grid.
    pub const ALL: [Weekday; 5] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
        };
        f.write_str(s)
    }
}

impl FromStr for Weekday {
    type Err = WeekdayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" => Ok(Self::Monday),
            "tuesday" => Ok(Self::Tuesday),
            "wednesday" => Ok(Self::Wednesday),
            "thursday" => Ok(Self::Thursday),
            "friday" => Ok(Self::Friday),
            _ => Err(WeekdayParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Weekday`] string.
#[derive(Debug, Clone)]
pub struct WeekdayParseError(pub String);

impl fmt::Display for WeekdayParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid weekday: {:?}", self.0)
    }
}

impl std::error::Error for WeekdayParseError {}

// ---------------------------------------------------------------------------

/// A meal slot within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

impl Meal {
    /// Row order of the meal grid.
    pub const ALL: [Meal; 3] = [Self::Breakfast, Self::Lunch, Self::Dinner];
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
        };
        f.write_str(s)
    }
}

impl FromStr for Meal {
    type Err = MealParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            _ => Err(MealParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Meal`] string.
#[derive(Debug, Clone)]
pub struct MealParseError(pub String);

impl fmt::Display for MealParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid meal: {:?}", self.0)
    }
}

impl std::error::Error for MealParseError {}

// ---------------------------------------------------------------------------
// Parsed rows
// ---------------------------------------------------------------------------

/// One `"<Group>: <Item>"` line of a categorization completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantryEntry {
    pub food_group: String,
    pub item: String,
}

/// Pantry entries sharing a food group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantryGroup {
    pub food_group: String,
    pub items: Vec<String>,
    pub count: usize,
}

/// One `"<Day> | <Meal> | <Suggestion>"` line of a meal-plan completion.
///
/// Day and meal are kept as the model wrote them; [`Weekday`] and [`Meal`]
/// are only consulted when pivoting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlanEntry {
    pub day: String,
    pub meal: String,
    pub suggestion: String,
}

impl MealPlanEntry {
    /// Selector label: `"<Day> - <Meal> - <Suggestion>"`.
    pub fn label(&self) -> String {
        [self.day.as_str(), self.meal.as_str(), self.suggestion.as_str()].join(LABEL_SEPARATOR)
    }
}

/// A generated recipe for one meal-plan selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// The meal-plan label the recipe was generated for.
    pub meal: String,
    pub text: String,
}

/// A generated macro-nutrient breakdown for one recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacrosReport {
    /// The meal-plan label of the recipe the report describes.
    pub meal: String,
    pub text: String,
}
