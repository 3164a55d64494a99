use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::error::CardError;
use crate::host_config::{DEFAULT_HOST_CONFIG, HostConfig};
use crate::model::{Action, Card, Element};
use crate::trace;
use crate::trace::TelemetryEvent;
use crate::validation;
use crate::validation::ValidationIssue;

pub type ElementRenderer = Arc<dyn Fn(&Element, &RenderContext) -> Value + Send + Sync>;
pub type ActionRenderer = Arc<dyn Fn(&Action, &RenderContext) -> Value + Send + Sync>;

/// Maps type tags to externally supplied renderer functions, one registry
/// for elements and one for actions. Registering a tag twice replaces the
/// earlier renderer, so hosts can override stock handlers.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    elements: HashMap<String, ElementRenderer>,
    actions: HashMap<String, ActionRenderer>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_element<F>(&mut self, type_tag: impl Into<String>, renderer: F)
    where
        F: Fn(&Element, &RenderContext) -> Value + Send + Sync + 'static,
    {
        self.elements.insert(type_tag.into(), Arc::new(renderer));
    }

    pub fn register_action<F>(&mut self, type_tag: impl Into<String>, renderer: F)
    where
        F: Fn(&Action, &RenderContext) -> Value + Send + Sync + 'static,
    {
        self.actions.insert(type_tag.into(), Arc::new(renderer));
    }

    pub fn element_renderer(&self, type_tag: &str) -> Option<&ElementRenderer> {
        self.elements.get(type_tag)
    }

    pub fn action_renderer(&self, type_tag: &str) -> Option<&ActionRenderer> {
        self.actions.get(type_tag)
    }
}

/// Deterministic marker emitted for a node whose type tag has no registered
/// renderer, so one unsupported node never aborts the card.
pub fn fallback_marker(type_tag: &str) -> Value {
    json!({ "type": "Fallback", "unsupportedType": type_tag })
}

/// Carries the active host configuration and both renderer registries, so a
/// container renderer can recursively dispatch its children.
#[derive(Clone)]
pub struct RenderContext {
    pub host_config: HostConfig,
    pub registry: RendererRegistry,
}

impl RenderContext {
    pub fn new(registry: RendererRegistry) -> Self {
        RenderContext {
            host_config: DEFAULT_HOST_CONFIG.clone(),
            registry,
        }
    }

    pub fn with_host_config(registry: RendererRegistry, host_config: HostConfig) -> Self {
        RenderContext {
            host_config,
            registry,
        }
    }

    /// Single-level dispatch for one element.
    pub fn render_element(&self, element: &Element) -> Value {
        match self.registry.element_renderer(element.type_tag()) {
            Some(renderer) => (renderer.as_ref())(element, self),
            None => fallback_marker(element.type_tag()),
        }
    }

    /// Single-level dispatch for one action.
    pub fn render_action(&self, action: &Action) -> Value {
        match self.registry.action_renderer(action.type_tag()) {
            Some(renderer) => (renderer.as_ref())(action, self),
            None => fallback_marker(action.type_tag()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderResult {
    pub body: Vec<Value>,
    pub actions: Vec<Value>,
    pub warnings: Vec<ValidationIssue>,
    pub telemetry_events: Vec<TelemetryEvent>,
}

/// Validates the card and maps its top-level body and actions through the
/// registries, preserving order. Any validation error refuses the render
/// with an aggregate [`CardError::Validation`]; warnings pass through on
/// the result. Nested elements and actions are the responsibility of the
/// container or action-set renderer, which recurses via the context.
pub fn render(card: &Card, ctx: &RenderContext) -> Result<RenderResult, CardError> {
    let raw = card.to_value();
    let report = validation::validate(&raw);
    if !report.errors.is_empty() {
        return Err(CardError::Validation {
            issues: report.errors,
        });
    }

    let body: Vec<Value> = card
        .body
        .iter()
        .map(|element| ctx.render_element(element))
        .collect();
    let actions: Vec<Value> = card
        .actions
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|action| ctx.render_action(action))
        .collect();

    let mut telemetry_events = Vec::new();
    if trace::trace_enabled() {
        telemetry_events.push(trace::build_render_trace(
            trace::hash_value(&raw),
            &report,
            body.len(),
            actions.len(),
        ));
    }

    Ok(RenderResult {
        body,
        actions,
        warnings: report.warnings,
        telemetry_events,
    })
}
