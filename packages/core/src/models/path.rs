//! Target location for generated content
//!
//! A [`ContainerPath`] names a root block, the kind of container block that
//! groups generated content directly under it, and the label of the section
//! inside that container whose children get replaced.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Block type used as the top-level grouping container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    #[default]
    Callout,
    Toggle,
    Quote,
}

impl ContainerKind {
    /// Remote type discriminator
    pub fn type_name(&self) -> &'static str {
        match self {
            ContainerKind::Callout => "callout",
            ContainerKind::Toggle => "toggle",
            ContainerKind::Quote => "quote",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ContainerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "callout" => Ok(ContainerKind::Callout),
            "toggle" => Ok(ContainerKind::Toggle),
            "quote" => Ok(ContainerKind::Quote),
            other => Err(format!(
                "unknown container kind '{}' (expected callout, toggle or quote)",
                other
            )),
        }
    }
}

/// Where rendered content must land
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerPath {
    pub root_id: String,
    pub container: ContainerKind,
    /// Matched by exact, case- and whitespace-sensitive equality
    pub section_label: String,
}

impl ContainerPath {
    pub fn new(
        root_id: impl Into<String>,
        container: ContainerKind,
        section_label: impl Into<String>,
    ) -> Self {
        Self {
            root_id: root_id.into(),
            container,
            section_label: section_label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_kind_parse() {
        assert_eq!("callout".parse::<ContainerKind>(), Ok(ContainerKind::Callout));
        assert_eq!("toggle".parse::<ContainerKind>(), Ok(ContainerKind::Toggle));
        assert!("Callout".parse::<ContainerKind>().is_err());
    }

    #[test]
    fn test_container_kind_display_matches_type_name() {
        assert_eq!(ContainerKind::Quote.to_string(), "quote");
    }
}
