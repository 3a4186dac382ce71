use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures of the game surface. None of these are fatal; they end up on the
/// notification banner.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("no window available")]
    MissingWindow,
    #[error("no document available")]
    MissingDocument,
    #[error("document has no body")]
    MissingBody,
    #[error("missing element `{0}`")]
    MissingElement(String),
    #[error("DOM operation failed: {0}")]
    Dom(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{0} error: {1}")]
    Step(&'static str, Box<SurfaceError>),
}

impl SurfaceError {
    /// Tag an error with the click-loop step that produced it.
    pub fn during(self, step: &'static str) -> Self {
        SurfaceError::Step(step, Box::new(self))
    }
}

impl From<JsValue> for SurfaceError {
    fn from(value: JsValue) -> Self {
        SurfaceError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(feature = "bot")]
#[derive(Error, Debug)]
pub enum BotError {
    #[error("invalid game url: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Request(#[from] teloxide::RequestError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_context_prefixes_message() {
        let err = SurfaceError::MissingElement("kc-score".into()).during("Click");
        assert_eq!(err.to_string(), "Click error: missing element `kc-score`");
    }
}
