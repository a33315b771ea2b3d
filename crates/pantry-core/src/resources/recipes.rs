use serde_json::json;

use crate::import::detect_platform;
use crate::models::{Recipe, StoreAction};
use crate::resources::RecipeBinding;
use crate::store::envelope::decode_field;
use crate::store::{ResourceBinding, ResourceStore, StoreResult};
use crate::transport::ApiRequest;

const IMPORT_PATH: &str = "/recipes/import";

impl ResourceStore<RecipeBinding> {
    /// Asks the backend to extract a recipe from a social-media post. Same
    /// list semantics as `create`: the result is returned, not inserted.
    pub async fn import_from_social(&self, url: &str) -> StoreResult<Recipe> {
        let platform = detect_platform(url)
            .map_err(|error| self.surface(error.attributed(RecipeBinding::KIND, StoreAction::Import)))?;

        let _loading = self.begin();
        let recipe = self
            .run(
                StoreAction::Import,
                ApiRequest::post(IMPORT_PATH).with_body(json!({
                    "url": url.trim(),
                    "platform": platform,
                })),
                |body| decode_field::<Recipe>(body, RecipeBinding::SINGULAR),
            )
            .await?;

        tracing::info!(
            recipe_id = recipe.id.0,
            platform = platform.as_str(),
            "imported recipe from social post"
        );
        self.announce(StoreAction::Import);
        Ok(recipe)
    }
}
