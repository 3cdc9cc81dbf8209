//! Chain id to network name lookup

use std::collections::BTreeMap;

const BUILTIN_NETWORKS: &[(&str, &str)] = &[
    ("0x1", "Ethereum Mainnet"),
    ("0x5", "Goerli Testnet"),
    ("0x11155111", "Sepolia Testnet"),
    ("0xaa36a7", "Sepolia Testnet"),
    ("0x89", "Polygon Mainnet"),
    ("0x13881", "Polygon Mumbai Testnet"),
    ("0xa86a", "Avalanche Mainnet"),
    ("0xa869", "Avalanche Fuji Testnet"),
];

/// Static registry of known networks keyed by lowercase hex chain id
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    names: BTreeMap<String, String>,
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self {
            names: BUILTIN_NETWORKS
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
        }
    }
}

impl NetworkRegistry {
    /// Built-in table plus extra entries; extras win on conflict
    pub fn with_overrides<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut registry = Self::default();
        for (id, name) in extra {
            let key = normalize(id.as_ref());
            if key.is_empty() {
                continue;
            }
            registry.names.insert(key, name.into());
        }
        registry
    }

    /// Exact label for a known id, `None` otherwise
    pub fn lookup(&self, chain_id: &str) -> Option<&str> {
        self.names.get(&normalize(chain_id)).map(String::as_str)
    }

    /// Display label; unknown ids embed the raw id as given
    pub fn name_for(&self, chain_id: &str) -> String {
        self.lookup(chain_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unknown Network ({chain_id})"))
    }
}

fn normalize(chain_id: &str) -> String {
    chain_id.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let registry = NetworkRegistry::default();
        assert_eq!(registry.name_for("0x1"), "Ethereum Mainnet");
        assert_eq!(registry.name_for("0x89"), "Polygon Mainnet");
        assert_eq!(registry.name_for("0xa869"), "Avalanche Fuji Testnet");
        assert_eq!(registry.name_for("0xA86A"), "Avalanche Mainnet");
    }

    #[test]
    fn test_unknown_embeds_raw_id() {
        let registry = NetworkRegistry::default();
        assert_eq!(registry.name_for("0x7a69"), "Unknown Network (0x7a69)");
        assert_eq!(registry.name_for(""), "Unknown Network ()");
    }

    #[test]
    fn test_overrides() {
        let registry = NetworkRegistry::with_overrides([
            ("0x7A69", "Anvil"),
            ("0x1", "Mainnet"),
            ("  ", "ignored"),
        ]);
        assert_eq!(registry.name_for("0x7a69"), "Anvil");
        assert_eq!(registry.name_for("0x1"), "Mainnet");
        assert!(registry.lookup("").is_none());
    }
}
