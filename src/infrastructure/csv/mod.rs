// ============================================================
// CSV INFRASTRUCTURE
// ============================================================
// File reading, encoding detection, and food item loading

mod food_loader;

pub use food_loader::FoodCsvLoader;
