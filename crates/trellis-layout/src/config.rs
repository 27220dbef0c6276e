//! Declarative Layout Configs
//!
//! serde-deserializable layout descriptions, in the style of the
//! framework's declarative component configs. A config builds into a
//! `LayoutTree`. Dimensions accept numbers (`200`), percent strings
//! (`"70%"`), and `"auto"`.

use serde::Deserialize;
use trellis_geometry::Axis;

use crate::tree::{Align, Constraints, Container, ContainerId, Dimension, Item, ItemSpec, LayoutTree};

/// Config parse/build error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unrecognized dimension {0:?}")]
    BadDimension(String),

    #[error("cross must be a percentage like \"50%\", got {0:?}")]
    BadCrossPercent(String),

    #[error("item declares both flex and size")]
    ConflictingSpec,
}

/// A dimension as written in a config: a pixel number or a keyword string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DimensionValue {
    Pixels(f32),
    Text(String),
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisConfig {
    #[default]
    Horizontal,
    Vertical,
}

impl From<AxisConfig> for Axis {
    fn from(axis: AxisConfig) -> Axis {
        match axis {
            AxisConfig::Horizontal => Axis::Horizontal,
            AxisConfig::Vertical => Axis::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignConfig {
    #[default]
    Start,
    Stretchmax,
}

impl From<AlignConfig> for Align {
    fn from(align: AlignConfig) -> Align {
        match align {
            AlignConfig::Start => Align::Start,
            AlignConfig::Stretchmax => Align::StretchMax,
        }
    }
}

/// Declarative container description
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub axis: AxisConfig,
    pub align: AlignConfig,
    pub width: Option<DimensionValue>,
    pub height: Option<DimensionValue>,
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,
    pub children: Vec<ChildConfig>,
}

/// Declarative item description; `container` nests another container
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChildConfig {
    pub flex: Option<f32>,
    /// Main-axis size: pixels or a percent string
    pub size: Option<DimensionValue>,
    /// Cross-axis percent, e.g. "50%"
    pub cross: Option<String>,
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,
    pub container: Option<Box<ContainerConfig>>,
}

fn parse_percent(text: &str) -> Option<f32> {
    text.strip_suffix('%')?.trim().parse().ok()
}

fn parse_dimension(value: &DimensionValue) -> Result<Dimension, ConfigError> {
    match value {
        DimensionValue::Pixels(v) => Ok(Dimension::Fixed(*v)),
        DimensionValue::Text(text) => {
            if text == "auto" {
                Ok(Dimension::Auto)
            } else {
                parse_percent(text)
                    .map(Dimension::Percent)
                    .ok_or_else(|| ConfigError::BadDimension(text.clone()))
            }
        }
    }
}

fn constraints_from(
    min_width: Option<f32>,
    max_width: Option<f32>,
    min_height: Option<f32>,
    max_height: Option<f32>,
) -> Constraints {
    Constraints {
        min_width,
        max_width,
        min_height,
        max_height,
    }
}

fn item_from(config: &ChildConfig) -> Result<Item, ConfigError> {
    let spec = match (config.flex, &config.size) {
        (Some(_), Some(_)) => return Err(ConfigError::ConflictingSpec),
        (Some(weight), None) => ItemSpec::Flex(weight),
        (None, Some(size)) => match parse_dimension(size)? {
            Dimension::Auto => ItemSpec::Content,
            Dimension::Fixed(v) => ItemSpec::Fixed(v),
            Dimension::Percent(p) => ItemSpec::Percent(p),
        },
        (None, None) => ItemSpec::Content,
    };

    let mut item = Item::content_sized().with_constraints(constraints_from(
        config.min_width,
        config.max_width,
        config.min_height,
        config.max_height,
    ));
    item.spec = spec;

    if let Some(cross) = &config.cross {
        let pct = parse_percent(cross).ok_or_else(|| ConfigError::BadCrossPercent(cross.clone()))?;
        item = item.with_cross_percent(pct);
    }
    Ok(item)
}

fn container_from(config: &ContainerConfig) -> Result<Container, ConfigError> {
    let mut container = Container::new(config.axis.into(), config.align.into())
        .with_constraints(constraints_from(
            config.min_width,
            config.max_width,
            config.min_height,
            config.max_height,
        ));
    if let Some(width) = &config.width {
        container.width = parse_dimension(width)?;
    }
    if let Some(height) = &config.height {
        container.height = parse_dimension(height)?;
    }
    Ok(container)
}

/// Build a config into `tree`, returning the new container's id
pub fn build(tree: &mut LayoutTree, config: &ContainerConfig) -> Result<ContainerId, ConfigError> {
    let cid = tree.add_container(container_from(config)?);
    for child in &config.children {
        let item = item_from(child)?;
        match &child.container {
            Some(sub) => {
                let sub_cid = build(tree, sub)?;
                tree.add_nested(cid, item, sub_cid);
            }
            None => {
                tree.add_item(cid, item);
            }
        }
    }
    tracing::debug!(
        container = cid.index(),
        children = config.children.len(),
        "built container from config"
    );
    Ok(cid)
}
