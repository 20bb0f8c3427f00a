use recipe_storage::RecipeRepository;

#[derive(Clone)]
pub struct AppState {
    pub repo: RecipeRepository,
}

impl AppState {
    pub fn new(repo: RecipeRepository) -> Self {
        Self { repo }
    }
}
