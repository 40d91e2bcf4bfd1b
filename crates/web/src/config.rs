use clap::Parser;
use lyrics_core::StyleProfile;

/// Server configuration, from flags or `LYRICS_WEB_*` environment variables.
#[derive(Parser, Debug, Clone)]
#[command(name = "lyrics-web")]
#[command(author, version, about = "Web front end for building lyrics slide decks")]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "LYRICS_WEB_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "LYRICS_WEB_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Styling profile for every deck served: classic or stage
    #[arg(long, env = "LYRICS_WEB_PROFILE", default_value = "classic")]
    pub profile: StyleProfile,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            profile: StyleProfile::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::parse_from(["lyrics-web", "--port", "8080", "--profile", "stage"]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.profile, StyleProfile::Stage);
        assert_eq!(config.bind_addr(), format!("{}:8080", config.host));
    }

    #[test]
    fn test_config_definition_is_valid() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
