//! SeaORM entity modules for the cookbook application.
//!
//! Admins, regular users and chefs live in one `users` table and are told
//! apart by their `role`. Regular users own a cookbook and a multiset of
//! allergens; chefs own recipes.

pub mod allergen;
pub mod my_cook_book;
pub mod recipe;
pub mod regular_user_allergen;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::allergen::Entity as Allergen;
    pub use super::my_cook_book::Entity as MyCookBook;
    pub use super::recipe::Entity as Recipe;
    pub use super::regular_user_allergen::Entity as RegularUserAllergen;
    pub use super::user::Entity as User;
}
