use std::env;

/// Origins allowed to call the API from a browser. `*` allows any origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_origins: Vec<String> = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if allowed_origins.is_empty() {
            return Self::default();
        }

        Self { allowed_origins }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.allows_any_origin() || self.allowed_origins.iter().any(|o| o == origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_permissive() {
        let config = CorsConfig::from_lookup(|_| None);
        assert!(config.allows_any_origin());
        assert!(config.allows("https://anywhere.example"));
    }

    #[test]
    fn test_origin_list() {
        let config = CorsConfig::from_lookup(|_| {
            Some("http://localhost:3000, http://localhost:5173,".to_string())
        });
        assert_eq!(config.allowed_origins.len(), 2);
        assert!(!config.allows_any_origin());
        assert!(config.allows("http://localhost:5173"));
        assert!(!config.allows("http://evil.example"));
    }

    #[test]
    fn test_blank_value_falls_back_to_default() {
        let config = CorsConfig::from_lookup(|_| Some(" , ".to_string()));
        assert_eq!(config, CorsConfig::default());
    }
}
