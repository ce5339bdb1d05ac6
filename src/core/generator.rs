/// Explanation generator seam: turns a document into a script.
///
/// The generator itself lives outside this crate. Whatever goes wrong on
/// its side reaches playback as an ordinary fallback script.
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::schema::script::Script;
use crate::schema::settings::GeneratorSettings;

/// An uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generator unavailable: {0}")]
    Unavailable(String),
    #[error("empty response from generator")]
    EmptyResponse,
    #[error("invalid generator response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

pub trait ExplanationGenerator {
    fn generate(
        &self,
        document: &Document,
        settings: &GeneratorSettings,
    ) -> Result<Script, GeneratorError>;
}

/// Decode a raw generator response body.
pub fn parse_response(body: &str) -> Result<Script, GeneratorError> {
    if body.trim().is_empty() {
        return Err(GeneratorError::EmptyResponse);
    }
    let response: crate::schema::script::GeneratorResponse = serde_json::from_str(body)?;
    Ok(response.into())
}

/// Run the generator, substituting [`Script::fallback`] on any failure.
/// A successful but empty script is passed through untouched.
pub fn generate_or_fallback(
    generator: &dyn ExplanationGenerator,
    document: &Document,
    settings: &GeneratorSettings,
) -> Script {
    match generator.generate(document, settings) {
        Ok(script) => {
            info!(
                document = %document.name,
                title = %script.title,
                lines = script.len(),
                "script generated"
            );
            script
        }
        Err(e) => {
            warn!(document = %document.name, error = %e, "generation failed, using fallback script");
            Script::fallback()
        }
    }
}
