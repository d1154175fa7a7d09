use std::collections::BTreeMap;

use crate::{BailianError, Result};

pub const API_KEY_VAR: &str = "DASHSCOPE_API_KEY";
pub const ACCESS_TOKEN_VAR: &str = "MCP_ACCESS_TOKEN";
pub const ALLOWED_HOSTS_VAR: &str = "MCP_ALLOWED_HOSTS";

/// Environment lookup with an override map layered over process variables.
/// Empty values are treated as unset.
#[derive(Clone, Default)]
pub struct Env {
    pub overrides: BTreeMap<String, String>,
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.overrides.keys().map(|key| key.as_str()).collect();
        f.debug_struct("Env").field("override_keys", &keys).finish()
    }
}

impl Env {
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.overrides.get(key) {
            return Some(value.clone()).filter(|value| !value.trim().is_empty());
        }
        std::env::var(key)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

/// Resolve the upstream API key: an explicit credential wins over the
/// process-wide environment variable. Absence of both is fatal.
pub fn resolve_api_key(explicit: Option<&str>, env: &Env) -> Result<String> {
    if let Some(key) = explicit.filter(|key| !key.trim().is_empty()) {
        return Ok(key.to_string());
    }
    env.get(API_KEY_VAR).ok_or(BailianError::MissingApiKey)
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api_key: String,
    pub access_token: Option<String>,
    pub allowed_hosts: Vec<String>,
}

impl ServerConfig {
    pub fn from_env(env: &Env) -> Result<Self> {
        Ok(Self {
            api_key: resolve_api_key(None, env)?,
            access_token: env.get(ACCESS_TOKEN_VAR),
            allowed_hosts: allowed_hosts(env),
        })
    }
}

/// Host allow-list patterns, default permissive (`*:*`) so the service keeps
/// working behind reverse proxies that rewrite the Host header.
pub fn allowed_hosts(env: &Env) -> Vec<String> {
    let raw = env
        .get(ALLOWED_HOSTS_VAR)
        .unwrap_or_else(|| "*:*".to_string());
    raw.split(',')
        .map(|pattern| pattern.trim().to_string())
        .filter(|pattern| !pattern.is_empty())
        .collect()
}
