//! Recipe entity record and identifier validation.

use serde::{Deserialize, Serialize};

use crate::error::RecipeError;
use crate::prep_period::PrepPeriod;

/// A recipe. `id == 0` means the record has not been persisted yet.
///
/// The list attributes are independently optional: `None` means "leave the stored list
/// alone on save", which is different from `Some(vec![])`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "PrepPeriod::is_zero")]
    pub prep_period: PrepPeriod,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(default, skip_serializing_if = "is_absent_or_empty")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "is_absent_or_empty")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "is_absent_or_empty")]
    pub images: Option<Vec<String>>,
}

fn is_absent_or_empty(values: &Option<Vec<String>>) -> bool {
    values.as_ref().map_or(true, Vec::is_empty)
}

impl Recipe {
    /// Creates an unsaved recipe with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Lightweight record used by paginated listings.
    pub fn summary(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    pub fn list(&self, attr: ListAttribute) -> Option<&[String]> {
        match attr {
            ListAttribute::Categories => self.categories.as_deref(),
            ListAttribute::Ingredients => self.ingredients.as_deref(),
            ListAttribute::Images => self.images.as_deref(),
        }
    }

    pub fn set_list(&mut self, attr: ListAttribute, values: Vec<String>) {
        let slot = match attr {
            ListAttribute::Categories => &mut self.categories,
            ListAttribute::Ingredients => &mut self.ingredients,
            ListAttribute::Images => &mut self.images,
        };
        *slot = Some(values);
    }
}

/// The write-once list attributes of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListAttribute {
    Categories,
    Ingredients,
    Images,
}

impl ListAttribute {
    pub const ALL: [ListAttribute; 3] = [
        ListAttribute::Categories,
        ListAttribute::Ingredients,
        ListAttribute::Images,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListAttribute::Categories => "categories",
            ListAttribute::Ingredients => "ingredients",
            ListAttribute::Images => "images",
        }
    }
}

/// Accepts only persisted ids (`id > 0`).
pub fn validate_id(id: i64) -> Result<i64, RecipeError> {
    if id <= 0 {
        return Err(RecipeError::InvalidId(id));
    }
    Ok(id)
}

/// Accepts only 1-based page numbers.
pub fn validate_page(page: i64) -> Result<i64, RecipeError> {
    if page <= 0 {
        return Err(RecipeError::InvalidPage(page));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_id_rejects_non_positive() {
        assert_eq!(validate_id(0), Err(RecipeError::InvalidId(0)));
        assert_eq!(validate_id(-5), Err(RecipeError::InvalidId(-5)));
        assert_eq!(validate_id(7), Ok(7));
        assert_eq!(RecipeError::InvalidId(0).to_string(), "invalid id");
    }

    #[test]
    fn test_validate_page_rejects_non_positive() {
        assert_eq!(validate_page(0), Err(RecipeError::InvalidPage(0)));
        assert_eq!(validate_page(-1), Err(RecipeError::InvalidPage(-1)));
        assert_eq!(validate_page(1), Ok(1));
    }

    #[test]
    fn test_absent_lists_stay_absent_when_decoded() {
        let recipe: Recipe = serde_json::from_value(json!({
            "title": "Soup",
            "categories": ["dinner"],
            "images": null
        }))
        .unwrap();

        assert_eq!(recipe.id, 0);
        assert!(!recipe.is_persisted());
        assert_eq!(recipe.categories, Some(vec!["dinner".to_string()]));
        assert_eq!(recipe.ingredients, None);
        assert_eq!(recipe.images, None);
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let mut recipe = Recipe::summary(3, "Toast");
        recipe.set_list(ListAttribute::Images, Vec::new());

        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value, json!({ "id": 3, "title": "Toast" }));
    }

    #[test]
    fn test_prep_period_round_trips_through_json() {
        let recipe: Recipe =
            serde_json::from_value(json!({ "title": "PanCake", "prep_period": "10m" })).unwrap();
        assert_eq!(recipe.prep_period, PrepPeriod::from_secs(600));

        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["prep_period"], "10m0s");
    }

    #[test]
    fn test_list_accessors_follow_attribute() {
        let mut recipe = Recipe::new("Salad");
        recipe.set_list(ListAttribute::Ingredients, vec!["lettuce".to_string()]);

        assert_eq!(recipe.list(ListAttribute::Categories), None);
        assert_eq!(
            recipe.list(ListAttribute::Ingredients),
            Some(&["lettuce".to_string()][..])
        );
        assert_eq!(ListAttribute::Images.as_str(), "images");
    }
}
