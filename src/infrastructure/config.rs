use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub views: ViewSettings,
    #[serde(default)]
    pub trace: TraceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TraceSettings {
    #[serde(default = "default_trace_capacity")]
    pub capacity: usize,
}

fn default_base_url() -> String {
    "https://pdda.shuwantech.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_page_size() -> u32 {
    8
}

fn default_trace_capacity() -> usize {
    200
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            capacity: default_trace_capacity(),
        }
    }
}

/// Load `config/dashboard.toml` (optional) overlaid with `PD_` environment
/// variables, e.g. `PD_API__BASE_URL`.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("PD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    if config.views.page_size == 0 {
        anyhow::bail!("views.page_size must be at least 1");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> DashboardConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = parse("");
        assert_eq!(config.api.base_url, "https://pdda.shuwantech.com");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.views.page_size, 8);
        assert_eq!(config.trace.capacity, 200);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
    }

    #[test]
    fn test_partial_override() {
        let config = parse(
            r#"
            [api]
            base_url = "http://localhost:9000"

            [views]
            page_size = 20
            "#,
        );
        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.views.page_size, 20);
    }
}
