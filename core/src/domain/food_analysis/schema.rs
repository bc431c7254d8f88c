pub const FOOD_PROMPT: &str = "What is the name of this food? Calories of food in picture? \
Protein amount in food? Carbs? Fat? Fiber? Sodium? Insights? Recommendations? \
Only answer the questions specifically. No need to repeat the questions.";
