use std::collections::HashMap;

use setup_node_backend::InputSource;

/// Inputs handed to the step by the runner as `INPUT_<NAME>` variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvInputs;

impl EnvInputs {
    #[must_use]
    pub fn variable_name(name: &str) -> String {
        format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
    }
}

impl InputSource for EnvInputs {
    fn get_input(&self, name: &str) -> String {
        std::env::var(Self::variable_name(name))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapInputs {
    values: HashMap<String, String>,
}

impl MapInputs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapInputs
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl InputSource for MapInputs {
    fn get_input(&self, name: &str) -> String {
        self.values
            .get(name)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use setup_node_backend::InputSource;

    use super::{EnvInputs, MapInputs};

    #[test]
    fn variable_name_keeps_hyphens_and_uppercases() {
        assert_eq!(
            EnvInputs::variable_name("node-version-file"),
            "INPUT_NODE-VERSION-FILE"
        );
        assert_eq!(EnvInputs::variable_name("my input"), "INPUT_MY_INPUT");
    }

    #[test]
    fn env_inputs_read_missing_as_empty() {
        assert_eq!(
            EnvInputs.get_input("setup-node-test-input-that-is-never-set"),
            ""
        );
    }

    #[test]
    fn map_inputs_trim_values() {
        let inputs = MapInputs::new().with("node-version", "  18.x\n");

        assert_eq!(inputs.get_input("node-version"), "18.x");
        assert_eq!(inputs.get_input("cache"), "");
    }

    #[test]
    fn map_inputs_collect_from_pairs() {
        let inputs: MapInputs = [("cache", "npm"), ("stable", "false")].into_iter().collect();

        assert_eq!(inputs.get_input("cache"), "npm");
        assert_eq!(inputs.get_input("stable"), "false");
    }
}
