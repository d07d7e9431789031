//! Environment settings shared by the gateway and the client.
//!
//! Both read the mock-mode flag through [`mock_mode_from_env`] so one
//! deployment never mixes a mocked gateway with a live client or the
//! other way around.

/// Primary environment variable for mock mode.
pub const MOCK_MODE_VAR: &str = "MOCK_MODE";

/// Accepted alias, kept for deployments configured for the old web frontend.
pub const MOCK_MODE_FALLBACK_VAR: &str = "NEXT_PUBLIC_MOCK_MODE";

/// Interpret a boolean-ish environment value.
///
/// `1`, `true`, `yes` and `on` (any case, surrounding whitespace ignored)
/// are true; everything else is false.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Read the mock-mode flag from `MOCK_MODE`, falling back to
/// `NEXT_PUBLIC_MOCK_MODE`. Off when neither is set.
pub fn mock_mode_from_env() -> bool {
    std::env::var(MOCK_MODE_VAR)
        .or_else(|_| std::env::var(MOCK_MODE_FALLBACK_VAR))
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}
