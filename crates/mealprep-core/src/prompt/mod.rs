//! Prompt templates for the four generation tasks.
//!
//! Each template states the task, spells out the exact line format the
//! parser expects (with a worked example), and forbids any extra text. All
//! functions here are pure: the same input always renders the same prompt.

use crate::models::{FoodGroup, FoodList, Meal, Weekday};

/// Delimiter between food group and item in a categorization line.
pub const PANTRY_DELIMITER: &str = ": ";

/// Delimiter between day, meal and suggestion in a meal-plan line.
pub const MEAL_PLAN_DELIMITER: &str = " | ";

/// Worked example for the categorization format.
const PANTRY_EXAMPLE: &[(FoodGroup, &str)] = &[
    (FoodGroup::Grains, "Rice"),
    (FoodGroup::Grains, "Oatmeal"),
    (FoodGroup::Grains, "Bagel"),
    (FoodGroup::ProteinMeat, "Chicken"),
    (FoodGroup::ProteinMeat, "Steak"),
    (FoodGroup::FruitsVegetables, "Banana"),
    (FoodGroup::Dairy, "Milk"),
    (FoodGroup::Miscellaneous, "Cookie"),
];

const RECIPE_FORMAT: &str = "Example format:
Ingredients:
- [Ingredient 1 with quantity]
- [Ingredient 2 with quantity]

Instructions:
1. [Step 1]
2. [Step 2]
";

const MACROS_FORMAT: &str = "Example format:
Macros per Serving:
- Calories: [value]
- Protein: [value]
- Carbohydrates: [value]
- Fiber: [value]
- Fat: [value]

Breakdown by Ingredient:
- [Ingredient 1]: [calories], [protein], [carbs], [fiber], [fat]
- [Ingredient 2]: [calories], [protein], [carbs], [fiber], [fat]
";

/// Render a food list the way it is quoted inside prompts.
fn quoted_list(foods: &FoodList) -> String {
    let quoted: Vec<String> = foods.items().iter().map(|f| format!("'{f}'")).collect();
    format!("[{}]", quoted.join(", "))
}

/// Build the prompt asking the model to sort foods into food groups.
pub fn categorize_prompt(foods: &FoodList) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str(&format!(
        "You have the following food items: {}.\n",
        quoted_list(foods)
    ));
    prompt.push_str(
        "Please categorize these items into one of the specified food groups based on \
         common sense priority, ensuring that each item belongs to only one food group, \
         without any assumptions, explanations, or repetitions.\n\n",
    );

    prompt.push_str("The food groups are:\n\n");
    for (i, group) in FoodGroup::ALL.iter().enumerate() {
        prompt.push_str(&format!("{}. {}: e.g., {}.\n", i + 1, group, group.examples()));
    }
    prompt.push_str(&format!(
        "\nIf any items do not fit into the first five groups, categorize them under \"{}\".\n\n",
        FoodGroup::Miscellaneous
    ));

    prompt.push_str(
        "Respond only with the following format, one item per line, and strictly do not \
         add any comments, explanations, or additional text:\n\n",
    );
    for (group, item) in PANTRY_EXAMPLE {
        prompt.push_str(&format!("{group}{PANTRY_DELIMITER}{item}\n"));
    }

    prompt
}

/// Build the prompt asking for a Monday-to-Friday meal plan.
pub fn meal_plan_prompt(foods: &FoodList) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str(&format!(
        "You have the following food items: {}.\n",
        quoted_list(foods)
    ));
    prompt.push_str(&format!(
        "Create a {}-day meal plan from {} to {}.\n",
        Weekday::ALL.len(),
        Weekday::Monday,
        Weekday::Friday
    ));
    prompt.push_str(
        "Each day should include three meals: breakfast, lunch, and dinner.\n\
         Ensure that each meal suggestion utilizes only the provided food items and is \
         well-balanced.\n\n",
    );
    prompt.push_str(
        "Respond with the meal plan in the following format, one meal per line, without \
         any additional comments, explanations, or text:\n\n",
    );

    let mut n = 0;
    for day in Weekday::ALL {
        for meal in Meal::ALL {
            n += 1;
            prompt.push_str(&format!(
                "{day}{MEAL_PLAN_DELIMITER}{meal}{MEAL_PLAN_DELIMITER}suggestion{n}\n"
            ));
        }
    }

    prompt
}

/// Build the prompt asking for a recipe for one meal-plan selection.
pub fn recipe_prompt(meal_label: &str) -> String {
    let mut prompt = String::with_capacity(512);

    prompt.push_str(&format!(
        "Create a recipe for the following meal: {meal_label}.\n"
    ));
    prompt.push_str(
        "Please include the following details:\n\
         1. A list of ingredients with quantities.\n\
         2. Step-by-step preparation instructions.\n\n\
         Only include the ingredients and instructions, without any additional comments, \
         titles, or suggestions.\n\n",
    );
    prompt.push_str(RECIPE_FORMAT);

    prompt
}

/// Build the prompt asking for a macro-nutrient breakdown of a recipe.
pub fn macros_prompt(recipe_text: &str) -> String {
    let mut prompt = String::with_capacity(512 + recipe_text.len());

    prompt.push_str(&format!(
        "Generate a macros breakdown for the following recipe:\n{}\n\n",
        recipe_text.trim()
    ));
    prompt.push_str(
        "Provide only:\n\
         1. Macros per Serving (calories, protein, carbohydrates, fiber, and fat).\n\
         2. Breakdown by Ingredient (including ingredient name, calories, protein, carbs, \
         fiber, and fat).\n\n\
         Exclude any additional comments, titles, or suggestions.\n\n",
    );
    prompt.push_str(MACROS_FORMAT);

    prompt
}
