//! CMake definitions handed to the external build invocation.

use std::fmt;

use serde::Serialize;

pub const CMAKE_INSTALL_PREFIX: &str = "CMAKE_INSTALL_PREFIX";
pub const HCL_COMMUNICATION: &str = "HCL_COMMUNICATION";
pub const HCL_COMMUNICATION_PROTOCOL: &str = "HCL_COMMUNICATION_PROTOCOL";
pub const HCL_LOGGING: &str = "HCL_LOGGING";
pub const HCL_LOG_LEVEL: &str = "HCL_LOG_LEVEL";
pub const HCL_PROFILER: &str = "HCL_PROFILER";

/// A single `NAME=VALUE` definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Definition {
    pub name: &'static str,
    pub value: String,
}

impl Definition {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    /// The definition as a CMake command-line argument (`-DNAME=VALUE`).
    pub fn cmake_arg(&self) -> String {
        format!("-D{}={}", self.name, self.value)
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Ordered definitions. Order is preserved exactly as pushed so repeated
/// resolutions produce identical command lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlagList(Vec<Definition>);

impl FlagList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.0.push(Definition::new(name, value));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Definition> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Definition] {
        &self.0
    }

    /// Value of the first definition named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    /// Number of definitions named `name`.
    pub fn count(&self, name: &str) -> usize {
        self.0.iter().filter(|d| d.name == name).count()
    }

    /// `NAME=VALUE` strings in order.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// `-DNAME=VALUE` arguments in order.
    pub fn cmake_args(&self) -> Vec<String> {
        self.0.iter().map(Definition::cmake_arg).collect()
    }
}

impl<'a> IntoIterator for &'a FlagList {
    type Item = &'a Definition;
    type IntoIter = std::slice::Iter<'a, Definition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_forms() {
        let def = Definition::new(HCL_COMMUNICATION, "THALLIUM");
        assert_eq!(def.to_string(), "HCL_COMMUNICATION=THALLIUM");
        assert_eq!(def.cmake_arg(), "-DHCL_COMMUNICATION=THALLIUM");
    }

    #[test]
    fn test_flag_list_preserves_order() {
        let mut flags = FlagList::new();
        flags.push(CMAKE_INSTALL_PREFIX, "/opt/hcl");
        flags.push(HCL_COMMUNICATION, "RPCLIB");
        flags.push(HCL_COMMUNICATION_PROTOCOL, "TCP");

        assert_eq!(
            flags.to_strings(),
            vec![
                "CMAKE_INSTALL_PREFIX=/opt/hcl",
                "HCL_COMMUNICATION=RPCLIB",
                "HCL_COMMUNICATION_PROTOCOL=TCP",
            ]
        );
        assert_eq!(flags.cmake_args()[1], "-DHCL_COMMUNICATION=RPCLIB");
        assert_eq!(flags.get(HCL_COMMUNICATION_PROTOCOL), Some("TCP"));
        assert_eq!(flags.get(HCL_PROFILER), None);
        assert_eq!(flags.count(HCL_COMMUNICATION), 1);
        assert_eq!(flags.as_slice().len(), 3);
    }

    #[test]
    fn test_flag_list_serializes_as_array() {
        let mut flags = FlagList::new();
        flags.push(HCL_LOGGING, "CPP_LOGGER");
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(json, r#"[{"name":"HCL_LOGGING","value":"CPP_LOGGER"}]"#);
    }
}
