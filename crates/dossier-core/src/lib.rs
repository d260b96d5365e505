//! Startup Dossier: Core library.
//! Domain resolution, the dossier prompt, the model gateway, and the flat record the popup renders.

pub mod config;
pub mod domain;
pub mod dossier;
pub mod error;
pub mod model_gateway;
pub mod normalizer;
pub mod prompt;
pub mod render;
pub mod schema;
pub mod session;

pub use config::{api_key_from_env, RelayConfig};
pub use domain::{resolve_domain, DomainString};
pub use dossier::CanonicalDossier;
pub use error::{FetchError, ModelError, ModelResult, SessionError};
pub use model_gateway::{CompletionBackend, OpenAiGateway};
pub use normalizer::{normalize, SOURCE_TAG};
pub use prompt::build_prompt;
pub use render::{export_json, funding_badge, render, BadgeTone, FundingBadge, RenderedView};
pub use session::{FetchGuard, PopupSession};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
