use anyhow::{anyhow, Context, Result};
use fleet_core::AgentConfig;
use std::fs;
use std::path::Path;

pub fn parse_seed(seed: &str) -> Result<u32> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {s}"))
    } else {
        s.parse::<u32>()
            .with_context(|| format!("invalid decimal seed: {s}"))
    }
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

/// `count` seeds spread from `base` by the golden-ratio step.
pub fn generate_seeds(base: u32, count: usize) -> Vec<u32> {
    (0..count as u32)
        .map(|i| base.wrapping_add(i.wrapping_mul(0x9E37_79B9)))
        .collect()
}

/// A JSON config file wins over a preset; with neither, defaults. The
/// result is always clamped.
pub fn load_config(path: Option<&Path>, preset: Option<&str>) -> Result<AgentConfig> {
    let mut cfg = if let Some(path) = path {
        let data = fs::read(path)
            .with_context(|| format!("failed reading config {}", path.display()))?;
        serde_json::from_slice::<AgentConfig>(&data)
            .with_context(|| format!("failed parsing config {}", path.display()))?
    } else if let Some(name) = preset {
        AgentConfig::preset(name).ok_or_else(|| {
            anyhow!(
                "unknown preset '{name}' (try: {})",
                AgentConfig::preset_names().join(", ")
            )
        })?
    } else {
        AgentConfig::default()
    };
    cfg.clamp();
    Ok(cfg)
}

pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    let encoded = serde_json::to_vec_pretty(value)?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_parse_in_hex_and_decimal() {
        assert_eq!(parse_seed("0xDEADBEEF").ok(), Some(0xDEAD_BEEF));
        assert_eq!(parse_seed(" 42 ").ok(), Some(42));
        assert!(parse_seed("").is_err());
        assert!(parse_seed("0xZZ").is_err());
        assert_eq!(seed_to_hex(0xBEEF), "0x0000beef");
    }

    #[test]
    fn generated_seeds_start_at_base() {
        let seeds = generate_seeds(7, 3);
        assert_eq!(seeds[0], 7);
        assert_eq!(seeds[1], 7u32.wrapping_add(0x9E37_79B9));
        assert_eq!(seeds.len(), 3);
    }
}
