//! Declarative card model, two-phase validation, and render dispatch.
//!
//! A card arrives as JSON, is validated structurally and against the
//! whole-tree business rules, and is then dispatched node by node to
//! externally registered renderer functions. The core computes no layout,
//! keeps no UI state, and performs no I/O; presentation defaults live in an
//! immutable host configuration that overrides merge against copy-on-write.

mod binding;
mod error;
mod host_config;
mod model;
mod parser;
mod render;
mod trace;
mod validation;

pub use binding::{BindingScope, BindingSummary, expand_card};
pub use error::CardError;
pub use host_config::{
    ContainerPalette, ContainerPalettePatch, ContainerStyles, ContainerStylesPatch,
    DEFAULT_HOST_CONFIG, FontSizes, FontSizesPatch, FontWeights, FontWeightsPatch, HostConfig,
    HostConfigPatch, SeparatorPatch, SeparatorStyle, SpacingPatch, SpacingScale,
    merge_host_config,
};
pub use model::*;
pub use parser::{parse, parse_value, parse_with_data, stringify};
pub use render::{
    ActionRenderer, ElementRenderer, RenderContext, RenderResult, RendererRegistry,
    fallback_marker, render,
};
pub use trace::{TelemetryEvent, hash_value, trace_enabled};
pub use validation::{
    MAX_TOP_LEVEL_ACTIONS, ValidationIssue, ValidationReport, validate, validate_business_rules,
    validate_structure,
};
