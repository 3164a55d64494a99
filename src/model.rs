use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CardError;

/// Discriminator required on every root card object.
pub const CARD_TYPE: &str = "AdaptiveCard";

/// Version a builder-made card targets unless overridden.
pub const TARGET_VERSION: &str = "1.5";

/// Root declarative document describing a renderable card tree.
///
/// Built either through the chainable mutators (which never validate) or
/// atomically by the parser after validation has passed. Absent optional
/// fields are omitted from the JSON output, never emitted as `null`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(rename = "type")]
    pub card_type: String,
    pub version: String,
    #[serde(default)]
    pub body: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema_ref: Option<String>,
}

impl Card {
    pub fn new() -> Self {
        Card {
            card_type: CARD_TYPE.to_string(),
            version: TARGET_VERSION.to_string(),
            body: Vec::new(),
            actions: None,
            metadata: None,
            schema_ref: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_schema_ref(mut self, schema_ref: impl Into<String>) -> Self {
        self.schema_ref = Some(schema_ref.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn add_element(mut self, element: Element) -> Self {
        self.body.push(element);
        self
    }

    pub fn add_action(mut self, action: Action) -> Self {
        self.actions.get_or_insert_with(Vec::new).push(action);
        self
    }

    /// Canonical JSON object for this card. `body` is always present, even
    /// when empty; absent optional fields are omitted.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn from_value(value: Value) -> Result<Card, CardError> {
        serde_json::from_value(value).map_err(CardError::Decode)
    }
}

impl Default for Card {
    fn default() -> Self {
        Card::new()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Spacing {
    None,
    Small,
    Default,
    Medium,
    Large,
    ExtraLarge,
    Padding,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HeightHint {
    Auto,
    Stretch,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TextSize {
    Small,
    Default,
    Medium,
    Large,
    ExtraLarge,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TextWeight {
    Lighter,
    Default,
    Bolder,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TextColor {
    Default,
    Dark,
    Light,
    Accent,
    Good,
    Warning,
    Attention,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ImageSize {
    Auto,
    Stretch,
    Small,
    Medium,
    Large,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ImageStyle {
    Default,
    Person,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ContainerStyle {
    Default,
    Emphasis,
    Good,
    Attention,
    Warning,
    Accent,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlignment {
    Top,
    Center,
    Bottom,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ActionStyle {
    Default,
    Positive,
    Destructive,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AssociatedInputs {
    Auto,
    None,
}

/// Presentation hints shared by every element variant.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommonProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<HeightHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub items: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_action: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ContainerStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlignment>,
    #[serde(flatten)]
    pub common: CommonProps,
}

impl Container {
    pub fn new(items: Vec<Element>) -> Self {
        Container {
            items,
            ..Container::default()
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<TextSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<TextWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<TextColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(flatten)]
    pub common: CommonProps,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        TextBlock {
            text: text.into(),
            ..TextBlock::default()
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ImageSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ImageStyle>,
    #[serde(flatten)]
    pub common: CommonProps,
}

impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Image {
            url: url.into(),
            ..Image::default()
        }
    }
}

/// Single-line (or multiline) text input. The `id` keys the submitted value,
/// so unlike other elements it is required.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_multiline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
    #[serde(flatten)]
    pub common: CommonProps,
}

impl TextInput {
    pub fn new(id: impl Into<String>) -> Self {
        TextInput {
            id: id.into(),
            ..TextInput::default()
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub actions: Vec<Action>,
    #[serde(flatten)]
    pub common: CommonProps,
}

impl ActionSet {
    pub fn new(actions: Vec<Action>) -> Self {
        ActionSet {
            actions,
            ..ActionSet::default()
        }
    }
}

/// Raw object kept verbatim for a type tag this crate does not model.
/// Round-trips byte-stably and renders through the fallback path.
#[derive(Clone, Debug, PartialEq)]
pub struct UnknownNode {
    pub type_tag: String,
    pub payload: Value,
}

/// One visual node in a card body. Closed over the variants this crate
/// models; anything else is preserved as [`UnknownNode`].
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Container(Container),
    TextBlock(TextBlock),
    Image(Image),
    TextInput(TextInput),
    ActionSet(ActionSet),
    Unknown(UnknownNode),
}

impl Element {
    pub fn type_tag(&self) -> &str {
        match self {
            Element::Container(_) => "Container",
            Element::TextBlock(_) => "TextBlock",
            Element::Image(_) => "Image",
            Element::TextInput(_) => "Input.Text",
            Element::ActionSet(_) => "ActionSet",
            Element::Unknown(node) => &node.type_tag,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Element::Container(container) => container.id.as_deref(),
            Element::TextBlock(text) => text.id.as_deref(),
            Element::Image(image) => image.id.as_deref(),
            Element::TextInput(input) => Some(&input.id),
            Element::ActionSet(set) => set.id.as_deref(),
            Element::Unknown(node) => node.payload.get("id").and_then(Value::as_str),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Element::Container(props) => tagged_value("Container", props),
            Element::TextBlock(props) => tagged_value("TextBlock", props),
            Element::Image(props) => tagged_value("Image", props),
            Element::TextInput(props) => tagged_value("Input.Text", props),
            Element::ActionSet(props) => tagged_value("ActionSet", props),
            Element::Unknown(node) => node.payload.clone(),
        }
    }

    pub fn from_value(value: Value) -> Result<Element, CardError> {
        let tag = type_tag_of(&value, "element")?;
        let element = match tag.as_str() {
            "Container" => Element::Container(from_props(value)?),
            "TextBlock" => Element::TextBlock(from_props(value)?),
            "Image" => Element::Image(from_props(value)?),
            "Input.Text" => Element::TextInput(from_props(value)?),
            "ActionSet" => Element::ActionSet(from_props(value)?),
            _ => Element::Unknown(UnknownNode {
                type_tag: tag,
                payload: value,
            }),
        };
        Ok(element)
    }
}

impl Serialize for Element {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Element::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Fields shared by every action variant.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionCommon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ActionStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_inputs: Option<AssociatedInputs>,
    #[serde(flatten)]
    pub common: ActionCommon,
}

impl SubmitAction {
    pub fn new() -> Self {
        SubmitAction::default()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenUrlAction {
    pub url: String,
    #[serde(flatten)]
    pub common: ActionCommon,
}

impl OpenUrlAction {
    pub fn new(url: impl Into<String>) -> Self {
        OpenUrlAction {
            url: url.into(),
            common: ActionCommon::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShowCardAction {
    pub card: Box<Card>,
    #[serde(flatten)]
    pub common: ActionCommon,
}

impl ShowCardAction {
    pub fn new(card: Card) -> Self {
        ShowCardAction {
            card: Box::new(card),
            common: ActionCommon::default(),
        }
    }
}

/// User-triggerable operation attached to a card, container, or action set.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Submit(SubmitAction),
    OpenUrl(OpenUrlAction),
    ShowCard(ShowCardAction),
    Unknown(UnknownNode),
}

impl Action {
    pub fn type_tag(&self) -> &str {
        match self {
            Action::Submit(_) => "Action.Submit",
            Action::OpenUrl(_) => "Action.OpenUrl",
            Action::ShowCard(_) => "Action.ShowCard",
            Action::Unknown(node) => &node.type_tag,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Action::Submit(submit) => submit.common.id.as_deref(),
            Action::OpenUrl(open_url) => open_url.common.id.as_deref(),
            Action::ShowCard(show_card) => show_card.common.id.as_deref(),
            Action::Unknown(node) => node.payload.get("id").and_then(Value::as_str),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Action::Submit(props) => tagged_value("Action.Submit", props),
            Action::OpenUrl(props) => tagged_value("Action.OpenUrl", props),
            Action::ShowCard(props) => tagged_value("Action.ShowCard", props),
            Action::Unknown(node) => node.payload.clone(),
        }
    }

    pub fn from_value(value: Value) -> Result<Action, CardError> {
        let tag = type_tag_of(&value, "action")?;
        let action = match tag.as_str() {
            "Action.Submit" => Action::Submit(from_props(value)?),
            "Action.OpenUrl" => Action::OpenUrl(from_props(value)?),
            "Action.ShowCard" => Action::ShowCard(from_props(value)?),
            _ => Action::Unknown(UnknownNode {
                type_tag: tag,
                payload: value,
            }),
        };
        Ok(action)
    }
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Action::from_value(value).map_err(serde::de::Error::custom)
    }
}

fn type_tag_of(value: &Value, kind: &str) -> Result<String, CardError> {
    let tag = value
        .as_object()
        .ok_or_else(|| CardError::InvalidInput(format!("{kind} must be a JSON object")))?
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| CardError::InvalidInput(format!("{kind} is missing its type tag")))?;
    Ok(tag.to_string())
}

fn from_props<T: DeserializeOwned>(value: Value) -> Result<T, CardError> {
    serde_json::from_value(value).map_err(CardError::Decode)
}

fn tagged_value<T: Serialize>(tag: &str, props: &T) -> Value {
    let mut map = match serde_json::to_value(props) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    map.insert("type".to_string(), Value::String(tag.to_string()));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_chains_and_appends() {
        let card = Card::new()
            .with_version("1.3")
            .add_element(Element::TextBlock(TextBlock::new("Hello")))
            .add_element(Element::Image(Image::new("https://example.com/a.png")))
            .add_action(Action::Submit(SubmitAction::new()));

        assert_eq!(card.version, "1.3");
        assert_eq!(card.body.len(), 2);
        assert_eq!(card.actions.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn absent_options_are_omitted_not_null() {
        let card = Card::new().add_element(Element::TextBlock(TextBlock::new("Hi")));
        let value = card.to_value();

        assert_eq!(value["type"], CARD_TYPE);
        assert!(value.get("actions").is_none());
        assert!(value.get("metadata").is_none());
        assert!(value.get("$schema").is_none());
        assert!(value["body"][0].get("wrap").is_none());
    }

    #[test]
    fn falsy_values_are_preserved() {
        let mut submit = SubmitAction::new();
        submit.common.is_enabled = Some(false);
        submit.data = Some(json!(0));
        let mut text = TextBlock::new("Hi");
        text.wrap = Some(false);

        let card = Card::new()
            .add_element(Element::TextBlock(text))
            .add_action(Action::Submit(submit));
        let value = card.to_value();

        assert_eq!(value["body"][0]["wrap"], json!(false));
        assert_eq!(value["actions"][0]["isEnabled"], json!(false));
        assert_eq!(value["actions"][0]["data"], json!(0));
    }

    #[test]
    fn empty_body_still_serializes() {
        let value = Card::new().to_value();
        assert_eq!(value["body"], json!([]));
    }

    #[test]
    fn unknown_element_round_trips_verbatim() {
        let raw = json!({ "type": "Foo.Bar", "custom": { "nested": [1, 2] } });
        let element = Element::from_value(raw.clone()).expect("unknown should parse");
        assert_eq!(element.type_tag(), "Foo.Bar");
        assert_eq!(element.to_value(), raw);
    }

    #[test]
    fn element_without_type_is_rejected() {
        let err = Element::from_value(json!({ "text": "Hi" })).unwrap_err();
        assert!(matches!(err, CardError::InvalidInput(_)));
    }

    #[test]
    fn show_card_nests_a_full_card() {
        let nested = Card::new().add_element(Element::TextBlock(TextBlock::new("inner")));
        let card = Card::new().add_action(Action::ShowCard(ShowCardAction::new(nested)));
        let value = card.to_value();

        assert_eq!(value["actions"][0]["type"], "Action.ShowCard");
        assert_eq!(value["actions"][0]["card"]["body"][0]["text"], "inner");
    }

    #[test]
    fn display_renders_compact_json() {
        let card = Card::new();
        let text = card.to_string();
        let round: Value = serde_json::from_str(&text).expect("display output is json");
        assert_eq!(round, card.to_value());
    }
}
