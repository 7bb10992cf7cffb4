pub const MAX_DOG_NAME_LENGTH: usize = 100;
pub const MAX_BREED_LENGTH: usize = 100;
pub const MAX_AGE_MONTHS: i64 = 300;
pub const MIN_WEIGHT_KG: f64 = 0.01;
pub const MAX_WEIGHT_KG: f64 = 200.00;
pub const MAX_CATEGORY_CODE_LENGTH: usize = 50;
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;
