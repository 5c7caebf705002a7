pub mod allergens;
pub mod chefs;
pub mod health;
pub mod recipes;
pub mod regular_users;
