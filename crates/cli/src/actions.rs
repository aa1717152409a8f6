//! Command handlers.
//!
//! Each handler takes its input as bytes and returns the text to print,
//! so they can be tested without touching stdin or stdout.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use nemestrix_codec::{parse_flat, Decoder, Encoder};
use nemestrix_core::Limits;
use nemestrix_engine::ForestConfig;
use nemestrix_security::{hash_api_key, ApiKey, API_KEY_HASH_ENV};

/// `generate-key [KEY]`
pub fn generate_key(key: Option<&str>) -> String {
    let key = match key {
        Some(k) => ApiKey::from_string(k),
        None => ApiKey::generate(),
    };
    let hash = hash_api_key(key.as_str());
    format!(
        "API key: {}\nHash:    {}\n\nAdd to your environment:\n{}={}\n",
        key, hash, API_KEY_HASH_ENV, hash
    )
}

/// `verify-key KEY`
pub fn verify_key(config: &ForestConfig, key: &str) -> Result<String> {
    let verifier = match config.verifier()? {
        Some(v) => v,
        None => bail!("no [auth] api_key_hash configured"),
    };
    verifier.verify(Some(key))?;
    Ok("key is valid\n".to_string())
}

/// `encode`: one `label<TAB>json-scalar` line per leaf
pub fn encode(input: &[u8], limits: Limits) -> Result<String> {
    let pairs = Encoder::new(limits).encode_bytes(input)?;
    let mut out = String::new();
    for (label, leaf) in &pairs {
        writeln!(out, "{}\t{}", label, leaf)?;
    }
    Ok(out)
}

/// `decode`: flat object in, nested JSON out
pub fn decode(input: &[u8], limits: Limits) -> Result<String> {
    let flat: Value = serde_json::from_slice(input).context("input is not valid JSON")?;
    let pairs = parse_flat(&flat)?;
    let nested = Decoder::new(limits).decode(pairs)?;
    Ok(format!("{}\n", serde_json::to_string_pretty(&nested)?))
}

/// `init-config [PATH]`
pub fn init_config(path: &Path) -> Result<String> {
    let created = ForestConfig::write_default_if_missing(path)?;
    Ok(if created {
        format!("wrote {}\n", path.display())
    } else {
        format!("{} already exists, left unchanged\n", path.display())
    })
}
