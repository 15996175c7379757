//! AI-assisted recipe drafting.
//!
//! A [`RecipeGenerator`] renders a [`BrewRequest`] into a prompt, asks a
//! [`CompletionBackend`] for a completion constrained to
//! [`schema::response_schema`], and parses the reply into an [`AiRecipe`].
//! Nothing here touches the recipe store; turning a draft into a stored
//! recipe is the caller's decision.

use tracing::instrument;

use crate::domain::ValidationErrors;

mod draft;
mod gemini;
mod prompt;
pub mod schema;

pub use gemini::GeminiBackend;
pub use prompt::{BrewRequest, DEFAULT_EQUIPMENT};
pub use schema::{AiAdditionalIngredient, AiGrain, AiHop, AiRecipe, AiYeast};

/// A language model that can answer a prompt with JSON matching a schema.
pub trait CompletionBackend {
    /// Send `prompt` and return the raw JSON text of the reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be reached, rejects the request,
    /// or replies with nothing.
    fn complete(&self, prompt: &str, schema: &serde_json::Value) -> Result<String, GenerationError>;
}

/// Produces recipe drafts from brew requests.
#[derive(Debug)]
pub struct RecipeGenerator<C> {
    backend: C,
}

impl<C: CompletionBackend> RecipeGenerator<C> {
    /// Use the given model backend.
    pub const fn new(backend: C) -> Self {
        Self { backend }
    }

    /// Ask the model for a recipe draft.
    ///
    /// Exactly one call is made to the backend. The reply must match the
    /// response schema exactly; anything else is rejected.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - the request is too vague to act on
    /// - the model cannot be reached or returns an error
    /// - the model returns nothing, or something that is not a recipe
    #[instrument(level = "debug", skip_all)]
    pub fn generate(&self, request: &BrewRequest) -> Result<AiRecipe, GenerationError> {
        request.validate()?;

        let prompt = request.render_prompt();
        let schema = schema::response_schema();
        tracing::debug!("Prompt is {} characters", prompt.len());

        let reply = self.backend.complete(&prompt, &schema)?;
        if reply.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        let recipe = AiRecipe::from_json(&reply)?;
        tracing::debug!("Model drafted '{}' ({})", recipe.recipe_name, recipe.detected_style);
        Ok(recipe)
    }
}

/// A recipe draft could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The request was rejected before contacting the model.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ValidationErrors),

    /// No API key was found in the configured environment variable.
    #[error("no API key found; set the {0} environment variable")]
    MissingApiKey(String),

    /// The model could not be reached.
    #[error("request to the model failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model API answered with an error.
    #[error("model API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message reported by the API.
        message: String,
    },

    /// The model answered with no content.
    #[error("the model returned no recipe")]
    EmptyResponse,

    /// The model's answer does not match the recipe schema.
    #[error("the model's answer is not a valid recipe: {0}")]
    Nonconforming(String),
}
