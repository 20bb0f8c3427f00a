//! Recipe repository: maps a recipe onto the key-value store.
//!
//! One recipe spans a hash of scalar fields, up to three write-once lists and one entry in
//! the global index (see [`crate::keys`]). Ids come from an atomic counter; every save is a
//! single transactional batch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use recipe_core::{validate_id, validate_page, ListAttribute, PrepPeriod, Recipe};
use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::keys::{self, field};
use crate::kv::{KvStore, ReadOp, ReadReply, WriteOp};
use crate::repository::Repository;

/// Recipes returned per listing page.
pub const PAGE_SIZE: i64 = 20;

#[derive(Clone)]
pub struct RecipeRepository {
    store: Arc<dyn KvStore>,
}

impl RecipeRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Creates the recipe when `recipe.id == 0`, assigning the new id in place; otherwise
    /// overwrites the scalar fields stored under `recipe.id`.
    ///
    /// List attributes that are present are written only if their key does not exist yet.
    /// An id consumed by a create whose batch then fails is not reused; the record is reset
    /// to unsaved so a retry allocates a fresh id.
    pub async fn save(&self, recipe: &mut Recipe) -> Result<(), StorageError> {
        let created = if recipe.id == 0 {
            recipe.id = self.store.incr(keys::ID_COUNTER).await?;
            debug!(id = recipe.id, "Allocated recipe id");
            true
        } else {
            validate_id(recipe.id)?;
            false
        };

        let result = self.write(recipe, created).await;
        if let Err(err) = &result {
            if created {
                warn!(id = recipe.id, error = %err, "Create failed after id allocation, id left unused");
                recipe.id = 0;
            }
        }
        result
    }

    async fn write(&self, recipe: &Recipe, created: bool) -> Result<(), StorageError> {
        let id = recipe.id;
        let mut ops = Vec::with_capacity(2 + ListAttribute::ALL.len());

        if created {
            ops.push(WriteOp::Append {
                key: keys::INDEX.to_string(),
                values: vec![id.to_string()],
            });
        }

        ops.push(WriteOp::SetFields {
            key: keys::by_id(id),
            fields: scalar_fields(recipe),
        });

        for attr in ListAttribute::ALL {
            let Some(values) = recipe.list(attr) else {
                continue;
            };
            let key = keys::list(id, attr);
            if self.store.exists(&key).await? {
                debug!(id, attribute = attr.as_str(), "List attribute already stored, skipping");
                continue;
            }
            ops.push(WriteOp::AppendIfAbsent {
                key,
                values: values.to_vec(),
            });
        }

        self.store.execute_transaction(ops).await?;

        info!(id, created, title = %recipe.title, "Saved recipe");
        Ok(())
    }

    /// Loads the full recipe stored under `id`.
    ///
    /// An id that was never created yields a recipe with empty fields, not an error.
    pub async fn load(&self, id: i64) -> Result<Recipe, StorageError> {
        let id = validate_id(id)?;

        let mut ops = vec![ReadOp::GetAll {
            key: keys::by_id(id),
        }];
        ops.extend(ListAttribute::ALL.iter().map(|attr| ReadOp::Range {
            key: keys::list(id, *attr),
            start: 0,
            stop: -1,
        }));

        let mut replies = self.store.read_batch(ops).await?.into_iter();
        let fields = next_reply(&mut replies)?.into_fields()?;

        let prep_period = PrepPeriod::from_stored(text(&fields, field::PREP_PERIOD).as_str())
            .map_err(|e| StorageError::Decode(format!("recipe {}: {}", id, e)))?;

        let mut recipe = Recipe {
            id,
            title: text(&fields, field::TITLE),
            difficulty: text(&fields, field::DIFFICULTY),
            prep_period,
            method: text(&fields, field::METHOD),
            ..Recipe::default()
        };
        for attr in ListAttribute::ALL {
            recipe.set_list(attr, next_reply(&mut replies)?.into_list()?);
        }

        debug!(id, found = !fields.is_empty(), "Loaded recipe");
        Ok(recipe)
    }

    /// Returns one page (1-based) of recipe summaries, id and title only, in index order.
    pub async fn list(&self, page: i64) -> Result<Vec<Recipe>, StorageError> {
        let page = validate_page(page)?;
        let Some((from, to)) = keys::page_range(page, PAGE_SIZE) else {
            debug!(page, "Recipe page is beyond any index");
            return Ok(Vec::new());
        };

        let raw_ids = self.store.lrange(keys::INDEX, from, to).await?;
        if raw_ids.is_empty() {
            debug!(page, "Recipe page is empty");
            return Ok(Vec::new());
        }

        let index_ids = raw_ids
            .iter()
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| {
                    StorageError::Decode(format!("invalid recipe id {:?} in index", raw))
                })
            })
            .collect::<Result<Vec<i64>, _>>()?;

        let ops = index_ids
            .iter()
            .map(|id| ReadOp::GetFields {
                key: keys::by_id(*id),
                fields: vec![field::ID.to_string(), field::TITLE.to_string()],
            })
            .collect();
        let replies = self.store.read_batch(ops).await?;
        if replies.len() != index_ids.len() {
            return Err(StorageError::Store(format!(
                "expected {} summary replies, got {}",
                index_ids.len(),
                replies.len()
            )));
        }

        let mut recipes = Vec::with_capacity(index_ids.len());
        for (index_id, reply) in index_ids.into_iter().zip(replies) {
            let mut values = reply.into_values()?.into_iter();
            let id = values
                .next()
                .flatten()
                .and_then(|raw| raw.parse::<i64>().ok())
                .unwrap_or(index_id);
            let title = values.next().flatten().unwrap_or_default();
            recipes.push(Recipe::summary(id, title));
        }

        debug!(page, count = recipes.len(), "Listed recipes");
        Ok(recipes)
    }
}

#[async_trait]
impl Repository<Recipe> for RecipeRepository {
    async fn save(&self, entity: &mut Recipe) -> Result<(), StorageError> {
        RecipeRepository::save(self, entity).await
    }

    async fn load(&self, id: i64) -> Result<Recipe, StorageError> {
        RecipeRepository::load(self, id).await
    }

    async fn list(&self, page: i64) -> Result<Vec<Recipe>, StorageError> {
        RecipeRepository::list(self, page).await
    }
}

fn scalar_fields(recipe: &Recipe) -> Vec<(String, String)> {
    vec![
        (field::ID.to_string(), recipe.id.to_string()),
        (field::TITLE.to_string(), recipe.title.clone()),
        (field::DIFFICULTY.to_string(), recipe.difficulty.clone()),
        (field::PREP_PERIOD.to_string(), recipe.prep_period.to_string()),
        (field::METHOD.to_string(), recipe.method.clone()),
    ]
}

fn text(fields: &HashMap<String, String>, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

fn next_reply(replies: &mut impl Iterator<Item = ReadReply>) -> Result<ReadReply, StorageError> {
    replies
        .next()
        .ok_or_else(|| StorageError::Store("missing reply in read batch".to_string()))
}
