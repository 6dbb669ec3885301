//! Scenario file handling
//!
//! A scenario (`spy.toml` by default) describes a page, which of its elements
//! are spy targets, the spy options, and a script of steps to replay:
//!
//! ```toml
//! [spy]
//! threshold_top = 64
//!
//! [page]
//! viewport_height = 600
//!
//! [[page.element]]
//! id = "install"
//! top = 64
//! height = 700
//!
//! [[target]]
//! name = "install"
//!
//! [[step]]
//! action = "scroll"
//! y = 700
//! ```

use anyhow::{Context, Result};
use blinc_spy::{PageSpec, SpyOptions, SpyTarget};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default scenario file name
pub const SCENARIO_FILE: &str = "spy.toml";

/// A page plus a scroll script
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Scenario {
    #[serde(default)]
    pub spy: SpyOptions,
    #[serde(default)]
    pub page: PageSpec,
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetConfig>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// A spy target; `element` defaults to `name`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetConfig {
    pub name: String,
    #[serde(default)]
    pub element: Option<String>,
}

impl TargetConfig {
    pub fn to_target(&self) -> SpyTarget {
        SpyTarget::new(
            self.name.clone(),
            self.element.clone().unwrap_or_else(|| self.name.clone()),
        )
    }
}

/// One scripted action
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// Scroll the window to `y`
    Scroll { y: f32 },
    /// Resize the window
    Resize { height: f32 },
    /// Scroll a container's content to `y`
    ContainerScroll { container: String, y: f32 },
    /// Register another target
    Add {
        name: String,
        #[serde(default)]
        element: Option<String>,
    },
    /// Unregister targets by name
    Remove { name: String },
    /// Stop spying (clears targets)
    Stop,
    /// Start spying again with the scenario's options
    Spy,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Scroll { y } => write!(f, "scroll y={y}"),
            Step::Resize { height } => write!(f, "resize height={height}"),
            Step::ContainerScroll { container, y } => {
                write!(f, "container-scroll {container} y={y}")
            }
            Step::Add { name, element } => match element {
                Some(element) => write!(f, "add {name} ({element})"),
                None => write!(f, "add {name}"),
            },
            Step::Remove { name } => write!(f, "remove {name}"),
            Step::Stop => write!(f, "stop"),
            Step::Spy => write!(f, "spy"),
        }
    }
}

impl Scenario {
    /// Load a scenario from a file, or from `spy.toml` inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let file = if path.is_dir() {
            path.join(SCENARIO_FILE)
        } else {
            path.to_path_buf()
        };

        if !file.exists() {
            anyhow::bail!(
                "No scenario found at {}. Run `blinc-spy init` to create one.",
                file.display()
            );
        }

        let content = fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;

        let scenario: Scenario = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", file.display()))?;

        Ok(scenario)
    }

    /// Targets to register before the first step
    pub fn spy_targets(&self) -> Vec<SpyTarget> {
        self.targets.iter().map(TargetConfig::to_target).collect()
    }
}

/// Starter scenario written by `blinc-spy init`
pub const SCENARIO_TEMPLATE: &str = r#"# Scroll-spy scenario
#
# Replay with: blinc-spy run spy.toml

[spy]
# container = "sidebar"
threshold_top = 64
threshold_bottom = 0
mode = "top-most"

[page]
viewport_height = 600

[[page.element]]
id = "navbar"
top = 0
height = 64

[[page.element]]
id = "install"
top = 64
height = 700

[[page.element]]
id = "configure"
top = 764
height = 400

[[page.element]]
id = "deploy"
top = 1164
height = 900

[[target]]
name = "install"

[[target]]
name = "configure"

[[target]]
name = "deploy"

[[step]]
action = "scroll"
y = 700

[[step]]
action = "scroll"
y = 1200

[[step]]
action = "resize"
height = 1200

[[step]]
action = "remove"
name = "deploy"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use blinc_spy::SpyMode;

    #[test]
    fn test_template_parses() {
        let scenario: Scenario = toml::from_str(SCENARIO_TEMPLATE).unwrap();

        assert_eq!(scenario.spy.threshold_top, 64.0);
        assert_eq!(scenario.spy.mode, SpyMode::TopMost);
        assert_eq!(scenario.page.elements.len(), 4);
        assert_eq!(scenario.targets.len(), 3);
        assert_eq!(
            scenario.steps,
            vec![
                Step::Scroll { y: 700.0 },
                Step::Scroll { y: 1200.0 },
                Step::Resize { height: 1200.0 },
                Step::Remove {
                    name: "deploy".into()
                },
            ]
        );
    }

    #[test]
    fn test_target_element_defaults_to_name() {
        let scenario: Scenario = toml::from_str(
            r#"
            [[target]]
            name = "a"

            [[target]]
            name = "b"
            element = "section-b"
            "#,
        )
        .unwrap();

        assert_eq!(
            scenario.spy_targets(),
            vec![SpyTarget::element("a"), SpyTarget::new("b", "section-b")]
        );
    }

    #[test]
    fn test_step_display() {
        let step = Step::ContainerScroll {
            container: "sidebar".into(),
            y: 120.0,
        };
        assert_eq!(step.to_string(), "container-scroll sidebar y=120");
        assert_eq!(Step::Stop.to_string(), "stop");
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SCENARIO_FILE), SCENARIO_TEMPLATE).unwrap();

        let scenario = Scenario::load(dir.path()).unwrap();
        assert_eq!(scenario.steps.len(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Scenario::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("No scenario found"));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[[step]]\naction = \"teleport\"\n").unwrap();

        let err = Scenario::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
