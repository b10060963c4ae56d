//! Fake text generator for tests and offline use.
//!
//! Completions are matched by checking whether the prompt contains a
//! registered substring, in registration order.

use async_trait::async_trait;

use super::{GenerateError, TextGenerator};

const SAMPLE_PANTRY: &str = "\
Grains: Rice
Grains: Oats
Protein/Meat: Chicken
Protein/Meat: Eggs
Fruits/Vegetables: Banana
Fruits/Vegetables: Spinach
Dairy: Milk
Miscellaneous: Coffee";

const SAMPLE_MEAL_PLAN: &str = "\
Monday | Breakfast | Oatmeal with sliced banana
Monday | Lunch | Chicken and rice bowl
Monday | Dinner | Spinach omelette
Tuesday | Breakfast | Scrambled eggs with spinach
Tuesday | Lunch | Rice salad with chicken
Tuesday | Dinner | Chicken stir-fry over rice
Wednesday | Breakfast | Banana oat pancakes
Wednesday | Lunch | Egg fried rice
Wednesday | Dinner | Baked chicken with sauteed spinach
Thursday | Breakfast | Overnight oats with milk
Thursday | Lunch | Chicken spinach wrap
Thursday | Dinner | Rice and egg bowl
Friday | Breakfast | Banana milk smoothie
Friday | Lunch | Leftover chicken and rice
Friday | Dinner | Spinach and chicken risotto";

const SAMPLE_RECIPE: &str = "\
Ingredients:
- 1 cup rice
- 200 g chicken breast, diced
- 1 cup spinach
- 1 tbsp oil
- Salt and pepper to taste

Instructions:
1. Rinse the rice and cook it in 2 cups of water for 15 minutes.
2. Season the chicken and cook it in the oil over medium heat until golden.
3. Stir in the spinach until wilted.
4. Serve the chicken and spinach over the rice.";

const SAMPLE_MACROS: &str = "\
Macros per Serving:
- Calories: 520
- Protein: 38g
- Carbohydrates: 62g
- Fiber: 3g
- Fat: 12g

Breakdown by Ingredient:
- Rice: 205, 4g, 45g, 1g, 0g
- Chicken breast: 220, 32g, 0g, 0g, 5g
- Spinach: 7, 1g, 1g, 1g, 0g
- Oil: 120, 0g, 0g, 0g, 14g";

/// A text generator that returns canned completions.
#[derive(Debug, Default)]
pub struct FakeGenerator {
    /// (prompt substring, completion), checked in order.
    responses: Vec<(String, String)>,
    /// Completion used when no substring matches.
    default_response: Option<String>,
}

impl FakeGenerator {
    /// Create a generator with no registered completions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator answering prompts containing `prompt_contains`.
    pub fn with_response(prompt_contains: &str, completion: &str) -> Self {
        let mut generator = Self::new();
        generator.add_response(prompt_contains, completion);
        generator
    }

    /// Register a completion for prompts containing a substring.
    pub fn add_response(&mut self, prompt_contains: &str, completion: &str) {
        self.responses
            .push((prompt_contains.to_string(), completion.to_string()));
    }

    /// Set the completion used when nothing matches.
    pub fn with_default_response(mut self, completion: &str) -> Self {
        self.default_response = Some(completion.to_string());
        self
    }

    /// A generator that can drive a full session without a model.
    ///
    /// The macros pattern is registered first because a macros prompt embeds
    /// a whole recipe.
    pub fn with_sample_responses() -> Self {
        let mut generator = Self::new();
        generator.add_response("macros breakdown", SAMPLE_MACROS);
        generator.add_response("Create a recipe", SAMPLE_RECIPE);
        generator.add_response("meal plan", SAMPLE_MEAL_PLAN);
        generator.add_response("categorize", SAMPLE_PANTRY);
        generator
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let prompt_lower = prompt.to_lowercase();
        for (pattern, completion) in &self.responses {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return Ok(completion.clone());
            }
        }

        match &self.default_response {
            Some(completion) => Ok(completion.clone()),
            None => Err(GenerateError::NoCompletion(
                prompt.chars().take(100).collect(),
            )),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
