//! Input forms and the checks they must pass before anything is written.
//!
//! Field constraints are declared with `validator`; the email pattern and
//! the password confirmation are checked here by hand so that every problem
//! ends up in one [`FieldErrors`] map.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::error::{FieldErrors, Result, WorkflowError};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[_A-Za-z0-9+\-]+(\.[_A-Za-z0-9\-]+)*@[A-Za-z0-9\-]+(\.[A-Za-z0-9]+)*(\.[A-Za-z]{2,})$")
        .expect("email pattern is a valid regex")
});

const EMAIL_INVALID: &str = "Email is not valid.";
const PASSWORDS_DIFFER: &str = "Passwords must be the same.";

/// Registration payload shared by regular users, chefs and admins.
///
/// Every field is optional on the wire so that a missing field is reported
/// as a field error instead of a malformed body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UserForm {
    #[validate(
        required(message = "Username must be specified"),
        length(min = 2, max = 30, message = "User name must be between 2 and 30 characters long.")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "Name must be included."),
        length(min = 2, max = 30, message = "Name must be between 2 and 30 characters long.")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Lastname must be included."),
        length(min = 2, max = 30, message = "Lastname must be between 2 and 30 characters long.")
    )]
    pub lastname: Option<String>,
    #[validate(required(message = "Email must be included."))]
    pub email: Option<String>,
    #[validate(
        required(message = "Password must be included."),
        length(min = 2, max = 30, message = "Password must be between 2 and 30 characters long.")
    )]
    pub password: Option<String>,
    #[validate(
        required(message = "Password confirmation must be included."),
        length(min = 2, max = 30, message = "Password confirmation must be between 2 and 30 characters long.")
    )]
    pub confirmed_password: Option<String>,
}

/// A [`UserForm`] that passed every check.
#[derive(Debug, Clone)]
pub struct ValidUser {
    pub username: String,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

/// Profile fields overwritten by an update.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateUserForm {
    #[validate(length(min = 2, max = 30, message = "Name must be between 2 and 30 characters long."))]
    pub name: String,
    #[validate(length(min = 2, max = 30, message = "Lastname must be between 2 and 30 characters long."))]
    pub lastname: String,
    #[validate(length(min = 2, max = 30, message = "User name must be between 2 and 30 characters long."))]
    pub username: String,
    pub email: String,
    #[validate(length(min = 2, max = 30, message = "Password must be between 2 and 30 characters long."))]
    pub password: String,
}

/// Chef update; `recipe_ids` is honoured for admins only.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateChefForm {
    #[serde(flatten)]
    pub profile: UpdateUserForm,
    /// Replaces the chef's whole recipe list when sent by an admin
    pub recipe_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct AllergenForm {
    #[validate(length(min = 2, max = 30, message = "Allergen name must be between 2 and 30 characters long."))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct RecipeForm {
    #[validate(length(min = 2, max = 30, message = "Recipe name must be between 2 and 30 characters long."))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters long."))]
    pub description: Option<String>,
}

/// Flattens `validator` errors into field name -> messages.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut collected = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = collected.entry(field.to_string()).or_default();
        for err in field_errors {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            messages.push(message);
        }
    }
    collected
}

fn collect(result: std::result::Result<(), ValidationErrors>) -> FieldErrors {
    match result {
        Ok(()) => FieldErrors::new(),
        Err(errors) => field_errors(&errors),
    }
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    if !EMAIL_PATTERN.is_match(email) {
        errors
            .entry("email".to_string())
            .or_default()
            .push(EMAIL_INVALID.to_string());
    }
}

fn finish(errors: FieldErrors) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(WorkflowError::Validation(errors))
    }
}

/// Runs all registration checks and reports every failing field at once.
pub fn validate_user_form(form: &UserForm) -> Result<ValidUser> {
    let mut errors = collect(form.validate());

    if let Some(email) = &form.email {
        check_email(email, &mut errors);
    }

    if let (Some(password), Some(confirmed)) = (&form.password, &form.confirmed_password) {
        if password != confirmed {
            errors
                .entry("confirmed_password".to_string())
                .or_default()
                .push(PASSWORDS_DIFFER.to_string());
        }
    }

    finish(errors)?;

    match (
        &form.username,
        &form.name,
        &form.lastname,
        &form.email,
        &form.password,
    ) {
        (Some(username), Some(name), Some(lastname), Some(email), Some(password)) => Ok(ValidUser {
            username: username.clone(),
            name: name.clone(),
            lastname: lastname.clone(),
            email: email.clone(),
            password: password.clone(),
        }),
        // required() already reported any missing field
        _ => Err(WorkflowError::invalid_field("form", "Incomplete user form")),
    }
}

pub fn validate_update_form(form: &UpdateUserForm) -> Result<()> {
    let mut errors = collect(form.validate());
    check_email(&form.email, &mut errors);
    finish(errors)
}

pub fn validate_allergen_form(form: &AllergenForm) -> Result<()> {
    finish(collect(form.validate()))
}

pub fn validate_recipe_form(form: &RecipeForm) -> Result<()> {
    finish(collect(form.validate()))
}

#[cfg(test)]
pub(crate) fn sample_form(username: &str, email: &str) -> UserForm {
    UserForm {
        username: Some(username.to_string()),
        name: Some("Ana".to_string()),
        lastname: Some("Petrovic".to_string()),
        email: Some(email.to_string()),
        password: Some("secret".to_string()),
        confirmed_password: Some("secret".to_string()),
    }
}
