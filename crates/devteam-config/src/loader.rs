use std::path::Path;

use secrecy::ExposeSecret;

use crate::{Config, ProviderKind};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// Model ids are not checked here; clients reject unknown models when
    /// they are constructed.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_providers()?;
        self.validate_llm()?;
        self.validate_agents()?;
        Ok(())
    }

    /// Every provider an agent may call needs a non-empty key
    fn validate_providers(&self) -> anyhow::Result<()> {
        let mut referenced = vec![self.agents.provider];
        if let Some(fallback) = &self.agents.fallback {
            referenced.push(fallback.provider);
        }

        for kind in referenced {
            self.require_api_key(kind)?;
        }

        Ok(())
    }

    fn require_api_key(&self, kind: ProviderKind) -> anyhow::Result<()> {
        let has_key = self
            .llm
            .providers
            .get(kind)
            .and_then(|p| p.api_key.as_ref())
            .is_some_and(|key| !key.expose_secret().is_empty());

        if !has_key {
            anyhow::bail!("llm.providers.{kind}.api_key must be set because agents use provider '{kind}'");
        }

        Ok(())
    }

    fn validate_llm(&self) -> anyhow::Result<()> {
        if self.llm.retry.max_attempts == 0 {
            anyhow::bail!("llm.retry.max_attempts must be at least 1");
        }

        self.llm.retry.initial_delay()?;

        let ratio = self.llm.reasoning.budget_ratio;
        let in_range = ratio > 0.0 && ratio < 1.0;
        if !in_range {
            anyhow::bail!("llm.reasoning.budget_ratio must be between 0 and 1 (exclusive), got {ratio}");
        }

        Ok(())
    }

    fn validate_agents(&self) -> anyhow::Result<()> {
        let agents = &self.agents;

        if agents.max_turns == 0 {
            anyhow::bail!("agents.max_turns must be at least 1");
        }

        if agents.max_tokens == 0 {
            anyhow::bail!("agents.max_tokens must be at least 1");
        }

        if !(0.0..=2.0).contains(&agents.temperature) {
            anyhow::bail!("agents.temperature must be within [0, 2], got {}", agents.temperature);
        }

        if let Some(fallback) = &agents.fallback
            && fallback.provider == agents.provider
            && fallback.model.is_none()
        {
            tracing::warn!(provider = %fallback.provider, "fallback uses the same provider and default model as the primary");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{AgentKind, LogFormat};

    const MINIMAL: &str = r#"
        [llm.providers.anthropic]
        api_key = "sk-ant-test"
    "#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_toml(MINIMAL).unwrap();

        assert_eq!(config.agents.provider, ProviderKind::Anthropic);
        assert_eq!(config.llm.retry.max_attempts, 5);
        assert!((config.llm.reasoning.budget_ratio - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.telemetry.log_filter, "info");
        assert_eq!(config.telemetry.format, LogFormat::Text);
    }

    #[test]
    fn full_config() {
        let config = Config::from_toml(
            r#"
            [llm.providers.openai]
            api_key = "sk-openai"
            base_url = "http://127.0.0.1:9000/v1"

            [llm.providers.gemini]
            api_key = "gm-key"

            [llm.retry]
            max_attempts = 3
            initial_delay = "200ms"

            [llm.reasoning]
            budget_ratio = 0.25

            [agents]
            provider = "openai"
            reasoning = true
            max_turns = 4
            temperature = 1.0

            [agents.fallback]
            provider = "gemini"
            model = "gemini-2.5-pro"

            [agents.qa]
            model = "gpt-5-mini"

            [telemetry]
            log_filter = "devteam=debug"
            format = "json"
            "#,
        )
        .unwrap();

        let openai = config.llm.providers.get(ProviderKind::Openai).unwrap();
        assert_eq!(openai.base_url.as_ref().unwrap().as_str(), "http://127.0.0.1:9000/v1");
        assert_eq!(config.llm.retry.max_attempts, 3);
        assert!(config.agents.reasoning);
        assert_eq!(config.agents.fallback.as_ref().unwrap().provider, ProviderKind::Gemini);
        assert_eq!(config.agents.kind(AgentKind::Qa).model.as_deref(), Some("gpt-5-mini"));
        assert_eq!(config.telemetry.format, LogFormat::Json);
    }

    #[test]
    fn missing_key_for_primary_provider() {
        let err = Config::from_toml("[agents]\nprovider = \"gemini\"").unwrap_err();
        assert!(err.to_string().contains("llm.providers.gemini.api_key"));
    }

    #[test]
    fn missing_key_for_fallback_provider() {
        let raw = format!("{MINIMAL}\n[agents.fallback]\nprovider = \"openai\"");
        let err = Config::from_toml(&raw).unwrap_err();
        assert!(err.to_string().contains("llm.providers.openai.api_key"));
    }

    #[test]
    fn empty_key_rejected() {
        let err = Config::from_toml("[llm.providers.anthropic]\napi_key = \"\"").unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn budget_ratio_out_of_range() {
        let raw = format!("{MINIMAL}\n[llm.reasoning]\nbudget_ratio = 1.0");
        let err = Config::from_toml(&raw).unwrap_err();
        assert!(err.to_string().contains("budget_ratio"));
    }

    #[test]
    fn temperature_out_of_range() {
        let raw = format!("{MINIMAL}\n[agents]\ntemperature = 2.5");
        let err = Config::from_toml(&raw).unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn zero_attempts_rejected() {
        let raw = format!("{MINIMAL}\n[llm.retry]\nmax_attempts = 0");
        assert!(Config::from_toml(&raw).is_err());
    }

    #[test]
    fn unknown_field_rejected() {
        let raw = format!("{MINIMAL}\n[agents]\nmax_turn = 3");
        assert!(Config::from_toml(&raw).is_err());
    }

    #[test]
    fn load_expands_env_from_file() {
        temp_env::with_var("DEVTEAM_TEST_ANTHROPIC_KEY", Some("sk-from-env"), || {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "[llm.providers.anthropic]").unwrap();
            writeln!(file, "api_key = \"{{{{ env.DEVTEAM_TEST_ANTHROPIC_KEY }}}}\"").unwrap();

            let config = Config::load(file.path()).unwrap();
            let key = config.llm.providers.anthropic.unwrap().api_key.unwrap();
            assert_eq!(key.expose_secret(), "sk-from-env");
        });
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
