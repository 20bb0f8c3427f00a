//! Integration tests for [`recipe_storage::RedisPoolManager`].
//!
//! These need a running Redis; they are skipped unless `REDIS_URL` is set
//! (e.g. `REDIS_URL=redis://localhost:6379`). They write to the real key schema.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use recipe_core::Recipe;
use recipe_storage::{KvStore, RecipeRepository, RedisPoolManager, WriteOp};

async fn connect() -> Option<RedisPoolManager> {
    let Ok(url) = std::env::var("REDIS_URL") else {
        eprintln!("Skipping Redis test: REDIS_URL not set");
        return None;
    };
    Some(
        RedisPoolManager::from_url(&url)
            .await
            .expect("Failed to connect to Redis"),
    )
}

fn scratch_key(name: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("test:{}:{}:{}", std::process::id(), nanos, name)
}

#[tokio::test]
async fn test_redis_append_if_absent_is_write_once() {
    let Some(store) = connect().await else {
        return;
    };
    let key = scratch_key("list");

    for values in [vec!["a".to_string(), "b".to_string()], vec!["x".to_string()]] {
        store
            .execute_transaction(vec![WriteOp::AppendIfAbsent {
                key: key.clone(),
                values,
            }])
            .await
            .unwrap();
    }

    assert_eq!(store.lrange(&key, 0, -1).await.unwrap(), vec!["a", "b"]);
}

#[tokio::test]
async fn test_redis_save_and_load_round_trip() {
    let Some(store) = connect().await else {
        return;
    };
    let repo = RecipeRepository::new(Arc::new(store.clone()));

    let mut recipe = Recipe::new("Redis Pancake");
    recipe.difficulty = "easy".to_string();
    recipe.prep_period = "10m".parse().unwrap();
    recipe.categories = Some(vec!["breakfast".to_string()]);
    repo.save(&mut recipe).await.expect("Failed to save");
    assert!(recipe.id > 0);

    let mut update = recipe.clone();
    update.title = "Redis Pancake v2".to_string();
    update.categories = Some(vec!["dinner".to_string()]);
    repo.save(&mut update).await.expect("Failed to update");

    let loaded = repo.load(recipe.id).await.expect("Failed to load");
    assert_eq!(loaded.title, "Redis Pancake v2");
    assert_eq!(loaded.prep_period.to_string(), "10m0s");
    assert_eq!(loaded.categories, Some(vec!["breakfast".to_string()]));

    let index = store.lrange("recipes", 0, -1).await.unwrap();
    let id = recipe.id.to_string();
    assert_eq!(index.iter().filter(|entry| **entry == id).count(), 1);
}
