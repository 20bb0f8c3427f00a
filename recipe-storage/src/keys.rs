//! Key schema for recipe storage.
//!
//! Keys are colon-delimited strings:
//!
//! - `recipe_id` - counter used to allocate recipe ids
//! - `recipes` - global index of recipe ids in commit order
//! - `recipe:{id}` - hash of scalar fields
//! - `recipe:{id}:{attr}` - write-once list attribute (`categories`, `ingredients`, `images`)

use recipe_core::ListAttribute;

/// Counter incremented once per created recipe.
pub const ID_COUNTER: &str = "recipe_id";

/// List of every created recipe id, appended at creation only.
pub const INDEX: &str = "recipes";

/// Hash fields written under [`by_id`].
pub mod field {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const DIFFICULTY: &str = "difficulty";
    pub const PREP_PERIOD: &str = "prep_period";
    pub const METHOD: &str = "method";
}

/// Build key for the scalar hash of a recipe.
///
/// Schema: `recipe:{id}`
#[inline]
pub fn by_id(id: i64) -> String {
    format!("recipe:{}", id)
}

/// Build key for a list attribute of a recipe.
///
/// Schema: `recipe:{id}:{attr}`
#[inline]
pub fn list(id: i64, attr: ListAttribute) -> String {
    format!("recipe:{}:{}", id, attr.as_str())
}

/// Zero-based inclusive index range covering `page` (1-based) of the global index.
///
/// `None` when the range is not addressable, which no index can reach.
#[inline]
pub fn page_range(page: i64, page_size: i64) -> Option<(isize, isize)> {
    let from = page.checked_sub(1)?.checked_mul(page_size)?;
    let to = from.checked_add(page_size - 1)?;
    Some((isize::try_from(from).ok()?, isize::try_from(to).ok()?))
}
