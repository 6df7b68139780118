//! App Configuration
//!
//! Resolved once at startup from build-time environment variables.

use log::LevelFilter;

const UNKNOWN: &str = "unknown";

/// Startup configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Deployment base path without trailing slash ("" = site root)
    pub base_path: String,
    pub log_level: LevelFilter,
    pub build: BuildInfo,
}

/// Build metadata shown on the extras page
#[derive(Debug, Clone, PartialEq)]
pub struct BuildInfo {
    pub commit_sha: String,
    pub commit_sha_short: String,
    pub build_time: String,
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("APP_BASE_PATH"),
            option_env!("APP_LOG"),
            option_env!("APP_COMMIT_SHA"),
            option_env!("APP_COMMIT_SHA_SHORT"),
            option_env!("APP_BUILD_TIME"),
        )
    }

    fn from_values(
        base_path: Option<&str>,
        log: Option<&str>,
        commit_sha: Option<&str>,
        commit_sha_short: Option<&str>,
        build_time: Option<&str>,
    ) -> Self {
        let default_level = if cfg!(debug_assertions) { LevelFilter::Debug } else { LevelFilter::Info };
        let log_level = log
            .and_then(|v| v.trim().parse::<LevelFilter>().ok())
            .unwrap_or(default_level);

        let or_unknown = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(UNKNOWN)
                .to_string()
        };

        Self {
            base_path: base_path.unwrap_or("").trim().trim_end_matches('/').to_string(),
            log_level,
            build: BuildInfo {
                commit_sha: or_unknown(commit_sha),
                commit_sha_short: or_unknown(commit_sha_short),
                build_time: or_unknown(build_time),
            },
        }
    }
}
