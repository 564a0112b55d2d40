use crate::constants;

/// Process-wide settings for the language-model service, read once at start.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable required"))
            .and_then(|key| {
                if key.trim().is_empty() {
                    anyhow::bail!("OPENAI_API_KEY cannot be empty");
                }
                Ok(key)
            })?;

        Self::new(
            api_key,
            constants::OPENAI_BASE_URL.clone(),
            constants::INTERVIEW_MODEL.clone(),
            *constants::INTERVIEW_TEMPERATURE,
        )
    }

    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        temperature: f32,
    ) -> anyhow::Result<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            anyhow::bail!("base URL must start with http:// or https://");
        }
        if model.trim().is_empty() {
            anyhow::bail!("model name cannot be empty");
        }
        if !(0.0..=2.0).contains(&temperature) {
            anyhow::bail!("temperature must be between 0.0 and 2.0");
        }

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            temperature,
        })
    }

    /// Override model and base URL from CLI flags, keeping validation.
    pub fn with_overrides(self, model: Option<String>, base_url: Option<String>) -> anyhow::Result<Self> {
        let Config {
            api_key,
            base_url: current_url,
            model: current_model,
            temperature,
        } = self;
        Self::new(
            api_key,
            base_url.unwrap_or(current_url),
            model.unwrap_or(current_model),
            temperature,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = Config::new(
            "key".to_string(),
            "http://localhost:8080/".to_string(),
            "gpt-test".to_string(),
            0.0,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let result = Config::new(
            "key".to_string(),
            "localhost:8080".to_string(),
            "gpt-test".to_string(),
            0.0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_out_of_range_temperature() {
        let result = Config::new(
            "key".to_string(),
            "http://localhost".to_string(),
            "gpt-test".to_string(),
            3.5,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_replace_model_only() {
        let config = Config::new(
            "key".to_string(),
            "http://localhost".to_string(),
            "gpt-test".to_string(),
            0.0,
        )
        .unwrap()
        .with_overrides(Some("gpt-other".to_string()), None)
        .unwrap();
        assert_eq!(config.model, "gpt-other");
        assert_eq!(config.base_url, "http://localhost");
    }
}
