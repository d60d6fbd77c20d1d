use dotenv;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{error, info, warn};

static CONFIG: OnceLock<HashMap<String, String>> = OnceLock::new();

/// Default configuration values
const DEFAULTS: &[(&str, &str)] = &[
    ("SERVER_ADDRESS", "127.0.0.1"),
    ("SERVER_PORT", "8000"),
    ("ACCESS_TOKEN_TTL_SECONDS", "900"),
    ("REFRESH_TOKEN_TTL_DAYS", "7"),
    ("EMAIL_TOKEN_TTL_DAYS", "3"),
    ("BCRYPT_COST", "12"),
    ("REDIS_URL", "redis://127.0.0.1:6379"),
    ("SMTP_PORT", "465"),
    ("MAIL_FROM_NAME", "PixnTalk"),
    ("RATE_LIMIT_REQUESTS_PER_MINUTE", "60"),
    ("LOG_LEVEL", "info"),
];

/// Parameters with no usable default; read from the environment only.
const REQUIRED: &[&str] = &[
    "DATABASE_URL",
    "JWT_SECRET",
    "SMTP_SERVER",
    "SMTP_USERNAME",
    "SMTP_PASSWORD",
    "MAIL_FROM",
    "APP_BASE_URL",
];

pub fn init() {
    match dotenv::dotenv() {
        Ok(path) => info!("Loaded environment file: {:?}", path),
        Err(_) => warn!("No .env file found, using system environment variables"),
    }

    let mut config = HashMap::new();

    // Load defaults first
    for (key, value) in DEFAULTS {
        config.insert(key.to_string(), value.to_string());
    }

    // Override with environment variables
    for key in DEFAULTS.iter().map(|(k, _)| *k).chain(REQUIRED.iter().copied()) {
        if let Ok(value) = std::env::var(key) {
            config.insert(key.to_string(), value);
        }
    }

    if CONFIG.set(config).is_err() {
        error!("Configuration already initialized");
    } else {
        info!("Configuration initialized successfully");
    }
}

pub fn get(parameter: &str) -> String {
    CONFIG
        .get()
        .and_then(|config| config.get(parameter))
        .cloned()
        .unwrap_or_else(|| {
            error!("Configuration parameter '{}' not found", parameter);
            panic!("Required configuration parameter '{}' is missing", parameter);
        })
}

pub fn get_optional(parameter: &str) -> Option<String> {
    CONFIG
        .get()
        .and_then(|config| config.get(parameter))
        .cloned()
}

pub fn get_i64(parameter: &str) -> i64 {
    let value = get(parameter);
    value.parse::<i64>().unwrap_or_else(|_| {
        error!("Configuration parameter '{}' is not a valid i64: {}", parameter, value);
        panic!("Configuration parameter '{}' is not a valid i64", parameter);
    })
}

pub fn get_u32(parameter: &str) -> u32 {
    let value = get(parameter);
    value.parse::<u32>().unwrap_or_else(|_| {
        error!("Configuration parameter '{}' is not a valid u32: {}", parameter, value);
        panic!("Configuration parameter '{}' is not a valid u32", parameter);
    })
}

/// Ports and other u16-ranged values; a value over 65535 fails at startup
/// instead of silently wrapping.
pub fn get_u16(parameter: &str) -> u16 {
    let value = get(parameter);
    value.parse::<u16>().unwrap_or_else(|_| {
        error!("Configuration parameter '{}' is not a valid u16: {}", parameter, value);
        panic!("Configuration parameter '{}' is not a valid u16", parameter);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_u16_rejects_out_of_range_port() {
        std::env::set_var("SMTP_PORT", "70000");
        init();

        assert!(std::panic::catch_unwind(|| get_u16("SMTP_PORT")).is_err());
    }
}
