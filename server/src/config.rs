use anyhow::{Context, Result};
use platform_gateway::GatewaySettings;

#[derive(Clone, Debug)]
pub enum GatewayMode {
    /// Hosted table service over HTTP.
    Remote(GatewaySettings),
    /// Seeded in-process tables; nothing is persisted.
    Demo,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub gateway: GatewayMode,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Read configuration from the environment. `demo` comes from the
    /// `--demo` flag or `HR_DEMO`.
    pub fn load(demo: bool) -> Result<Self> {
        let gateway = if demo {
            GatewayMode::Demo
        } else {
            GatewayMode::Remote(
                GatewaySettings::from_env()
                    .context("gateway settings missing; set HR_GATEWAY_URL and HR_GATEWAY_KEY or pass --demo")?,
            )
        };

        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        Ok(Self {
            gateway,
            cors_allowed_origins,
        })
    }

    pub fn is_demo(&self) -> bool {
        matches!(self.gateway, GatewayMode::Demo)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
