// src/config/publish.rs
use std::fmt;

pub const ENV_WORDPRESS_URL: &str = "WORDPRESS_URL";
pub const ENV_WORDPRESS_USERNAME: &str = "WORDPRESS_USERNAME";
pub const ENV_WORDPRESS_PASSWORD: &str = "WORDPRESS_PASSWORD";
pub const ENV_POST_CATEGORY: &str = "POST_CATEGORY";

pub const DEFAULT_POST_CATEGORY: &str = "Media Updates";

/// Where and as whom to publish. Absent settings mean a generate-only run.
#[derive(Clone, PartialEq, Eq)]
pub struct PublishSettings {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub category: String,
}

impl fmt::Debug for PublishSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishSettings")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("category", &self.category)
            .finish()
    }
}

impl PublishSettings {
    /// Read from process environment. `None` unless URL, username and
    /// password are all set and non-blank.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let username = get(ENV_WORDPRESS_USERNAME);
        let password = get(ENV_WORDPRESS_PASSWORD);
        let (Some(username), Some(password)) = (username, password) else {
            tracing::debug!("WordPress credentials not provided; publish disabled");
            return None;
        };
        let Some(base_url) = get(ENV_WORDPRESS_URL) else {
            tracing::warn!("credentials set but {ENV_WORDPRESS_URL} missing; publish disabled");
            return None;
        };

        Some(Self {
            base_url,
            username,
            password,
            category: get(ENV_POST_CATEGORY).unwrap_or_else(|| DEFAULT_POST_CATEGORY.to_string()),
        })
    }
}
