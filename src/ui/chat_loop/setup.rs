use std::error::Error;
use std::sync::Arc;

use tracing::{info, warn};

use crate::core::completion::{CompletionClient, GeminiClient};
use crate::core::config::{credential_from_env, Config, ConfigError};
use crate::ui::shell::Session;

/// Build the session for the chat loop from config and the environment.
///
/// A missing credential is not an error here: the shell starts in its
/// unavailable state instead. Config and syllabus problems abort startup.
pub fn bootstrap_session(config: &Config, model: Option<&str>) -> Result<Session, Box<dyn Error>> {
    session_from(config, model, credential_from_env())
}

fn session_from(
    config: &Config,
    model: Option<&str>,
    credential: Result<String, ConfigError>,
) -> Result<Session, Box<dyn Error>> {
    let context = Arc::new(config.syllabus_context()?);

    let client: Option<Arc<dyn CompletionClient>> = match credential {
        Ok(api_key) => {
            let settings = config.completion_settings(model);
            info!(model = %settings.model, base_url = %settings.base_url, "completion client ready");
            Some(Arc::new(GeminiClient::new(api_key, &settings)?))
        }
        Err(ConfigError::MissingCredential) => {
            warn!("no API key in the environment; chat is unavailable");
            None
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Session::start(client, context))
}
