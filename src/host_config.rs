use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Process-wide presentation defaults consumed by renderers. Immutable;
/// overrides go through [`merge_host_config`], which allocates a new value.
pub static DEFAULT_HOST_CONFIG: Lazy<HostConfig> = Lazy::new(HostConfig::default);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct HostConfig {
    pub font_family: String,
    pub spacing: SpacingScale,
    pub separator: SeparatorStyle,
    pub font_sizes: FontSizes,
    pub font_weights: FontWeights,
    pub container_styles: ContainerStyles,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            font_family: "Segoe UI, sans-serif".to_string(),
            spacing: SpacingScale::default(),
            separator: SeparatorStyle::default(),
            font_sizes: FontSizes::default(),
            font_weights: FontWeights::default(),
            container_styles: ContainerStyles::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SpacingScale {
    pub none: u32,
    pub small: u32,
    pub r#default: u32,
    pub medium: u32,
    pub large: u32,
    pub extra_large: u32,
    pub padding: u32,
}

impl Default for SpacingScale {
    fn default() -> Self {
        SpacingScale {
            none: 0,
            small: 3,
            r#default: 8,
            medium: 20,
            large: 30,
            extra_large: 40,
            padding: 20,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SeparatorStyle {
    pub line_thickness: u32,
    pub line_color: String,
}

impl Default for SeparatorStyle {
    fn default() -> Self {
        SeparatorStyle {
            line_thickness: 1,
            line_color: "#B2000000".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FontSizes {
    pub small: u32,
    pub r#default: u32,
    pub medium: u32,
    pub large: u32,
    pub extra_large: u32,
}

impl Default for FontSizes {
    fn default() -> Self {
        FontSizes {
            small: 12,
            r#default: 14,
            medium: 17,
            large: 21,
            extra_large: 26,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FontWeights {
    pub lighter: u32,
    pub r#default: u32,
    pub bolder: u32,
}

impl Default for FontWeights {
    fn default() -> Self {
        FontWeights {
            lighter: 200,
            r#default: 400,
            bolder: 600,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerStyles {
    pub r#default: ContainerPalette,
    pub emphasis: ContainerPalette,
    pub good: ContainerPalette,
    pub attention: ContainerPalette,
    pub warning: ContainerPalette,
    pub accent: ContainerPalette,
}

impl Default for ContainerStyles {
    fn default() -> Self {
        ContainerStyles {
            r#default: ContainerPalette::default(),
            emphasis: ContainerPalette::new("#F2F2F2", "#101010"),
            good: ContainerPalette::new("#DFF6DD", "#0E700E"),
            attention: ContainerPalette::new("#FDE7E9", "#A80000"),
            warning: ContainerPalette::new("#FFF4CE", "#795E00"),
            accent: ContainerPalette::new("#E5F1FB", "#004D8C"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerPalette {
    pub background_color: String,
    pub foreground_color: String,
}

impl ContainerPalette {
    fn new(background: &str, foreground: &str) -> Self {
        ContainerPalette {
            background_color: background.to_string(),
            foreground_color: foreground.to_string(),
        }
    }
}

impl Default for ContainerPalette {
    fn default() -> Self {
        ContainerPalette::new("#FFFFFF", "#101010")
    }
}

/// Partial override of [`HostConfig`]; every leaf is optional so callers can
/// deserialize a sparse JSON object straight into a patch.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HostConfigPatch {
    pub font_family: Option<String>,
    pub spacing: Option<SpacingPatch>,
    pub separator: Option<SeparatorPatch>,
    pub font_sizes: Option<FontSizesPatch>,
    pub font_weights: Option<FontWeightsPatch>,
    pub container_styles: Option<ContainerStylesPatch>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SpacingPatch {
    pub none: Option<u32>,
    pub small: Option<u32>,
    pub r#default: Option<u32>,
    pub medium: Option<u32>,
    pub large: Option<u32>,
    pub extra_large: Option<u32>,
    pub padding: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SeparatorPatch {
    pub line_thickness: Option<u32>,
    pub line_color: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FontSizesPatch {
    pub small: Option<u32>,
    pub r#default: Option<u32>,
    pub medium: Option<u32>,
    pub large: Option<u32>,
    pub extra_large: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FontWeightsPatch {
    pub lighter: Option<u32>,
    pub r#default: Option<u32>,
    pub bolder: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerStylesPatch {
    pub r#default: Option<ContainerPalettePatch>,
    pub emphasis: Option<ContainerPalettePatch>,
    pub good: Option<ContainerPalettePatch>,
    pub attention: Option<ContainerPalettePatch>,
    pub warning: Option<ContainerPalettePatch>,
    pub accent: Option<ContainerPalettePatch>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerPalettePatch {
    pub background_color: Option<String>,
    pub foreground_color: Option<String>,
}

/// Merges a partial override into a base configuration, per category and
/// key by key: a patch touching only `spacing.small` keeps every other
/// spacing key from the base. Neither input is mutated.
pub fn merge_host_config(base: &HostConfig, patch: &HostConfigPatch) -> HostConfig {
    let mut merged = base.clone();
    if let Some(font_family) = &patch.font_family {
        merged.font_family = font_family.clone();
    }
    if let Some(spacing) = &patch.spacing {
        merge_spacing(&mut merged.spacing, spacing);
    }
    if let Some(separator) = &patch.separator {
        merge_separator(&mut merged.separator, separator);
    }
    if let Some(font_sizes) = &patch.font_sizes {
        merge_font_sizes(&mut merged.font_sizes, font_sizes);
    }
    if let Some(font_weights) = &patch.font_weights {
        merge_font_weights(&mut merged.font_weights, font_weights);
    }
    if let Some(container_styles) = &patch.container_styles {
        merge_container_styles(&mut merged.container_styles, container_styles);
    }
    merged
}

fn merge_spacing(base: &mut SpacingScale, patch: &SpacingPatch) {
    if let Some(value) = patch.none {
        base.none = value;
    }
    if let Some(value) = patch.small {
        base.small = value;
    }
    if let Some(value) = patch.r#default {
        base.r#default = value;
    }
    if let Some(value) = patch.medium {
        base.medium = value;
    }
    if let Some(value) = patch.large {
        base.large = value;
    }
    if let Some(value) = patch.extra_large {
        base.extra_large = value;
    }
    if let Some(value) = patch.padding {
        base.padding = value;
    }
}

fn merge_separator(base: &mut SeparatorStyle, patch: &SeparatorPatch) {
    if let Some(value) = patch.line_thickness {
        base.line_thickness = value;
    }
    if let Some(value) = &patch.line_color {
        base.line_color = value.clone();
    }
}

fn merge_font_sizes(base: &mut FontSizes, patch: &FontSizesPatch) {
    if let Some(value) = patch.small {
        base.small = value;
    }
    if let Some(value) = patch.r#default {
        base.r#default = value;
    }
    if let Some(value) = patch.medium {
        base.medium = value;
    }
    if let Some(value) = patch.large {
        base.large = value;
    }
    if let Some(value) = patch.extra_large {
        base.extra_large = value;
    }
}

fn merge_font_weights(base: &mut FontWeights, patch: &FontWeightsPatch) {
    if let Some(value) = patch.lighter {
        base.lighter = value;
    }
    if let Some(value) = patch.r#default {
        base.r#default = value;
    }
    if let Some(value) = patch.bolder {
        base.bolder = value;
    }
}

fn merge_container_styles(base: &mut ContainerStyles, patch: &ContainerStylesPatch) {
    merge_palette(&mut base.r#default, patch.r#default.as_ref());
    merge_palette(&mut base.emphasis, patch.emphasis.as_ref());
    merge_palette(&mut base.good, patch.good.as_ref());
    merge_palette(&mut base.attention, patch.attention.as_ref());
    merge_palette(&mut base.warning, patch.warning.as_ref());
    merge_palette(&mut base.accent, patch.accent.as_ref());
}

fn merge_palette(base: &mut ContainerPalette, patch: Option<&ContainerPalettePatch>) {
    let Some(patch) = patch else {
        return;
    };
    if let Some(value) = &patch.background_color {
        base.background_color = value.clone();
    }
    if let Some(value) = &patch.foreground_color {
        base.foreground_color = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_spacing_override_keeps_unspecified_keys() {
        let base = HostConfig::default();
        let patch = HostConfigPatch {
            spacing: Some(SpacingPatch {
                small: Some(5),
                ..SpacingPatch::default()
            }),
            ..HostConfigPatch::default()
        };

        let merged = merge_host_config(&base, &patch);
        assert_eq!(merged.spacing.small, 5);
        assert_eq!(merged.spacing.r#default, base.spacing.r#default);
        assert_eq!(merged.spacing.padding, base.spacing.padding);
    }

    #[test]
    fn merge_never_mutates_the_base() {
        let base = HostConfig::default();
        let snapshot = base.clone();
        let patch: HostConfigPatch = serde_json::from_value(json!({
            "fontFamily": "monospace",
            "spacing": { "small": 99 },
            "containerStyles": { "emphasis": { "backgroundColor": "#000000" } }
        }))
        .expect("patch should deserialize");

        let merged = merge_host_config(&base, &patch);
        assert_eq!(base, snapshot);
        assert_eq!(merged.font_family, "monospace");
        assert_eq!(merged.spacing.small, 99);
        assert_eq!(merged.container_styles.emphasis.background_color, "#000000");
        assert_eq!(
            merged.container_styles.emphasis.foreground_color,
            base.container_styles.emphasis.foreground_color
        );
    }

    #[test]
    fn scalar_fields_are_override_wins() {
        let base = HostConfig::default();
        let patch = HostConfigPatch {
            font_family: Some("serif".to_string()),
            ..HostConfigPatch::default()
        };
        assert_eq!(merge_host_config(&base, &patch).font_family, "serif");
    }

    #[test]
    fn default_config_deserializes_from_empty_object() {
        let config: HostConfig = serde_json::from_value(json!({})).expect("defaults apply");
        assert_eq!(config, HostConfig::default());
    }
}
