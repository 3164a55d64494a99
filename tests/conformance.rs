use adaptive_card_core::{
    Action, ActionSet, Card, CardError, Container, DEFAULT_HOST_CONFIG, Element, HostConfigPatch,
    Image, OpenUrlAction, RenderContext, RendererRegistry, ShowCardAction, SubmitAction,
    TextBlock, TextInput, fallback_marker, merge_host_config, parse, parse_with_data, render,
    stringify, validate,
};
use serde_json::{Value, json};

fn issue_codes(issues: &[adaptive_card_core::ValidationIssue]) -> Vec<String> {
    issues.iter().map(|issue| issue.code.clone()).collect()
}

fn stock_registry() -> RendererRegistry {
    let mut registry = RendererRegistry::new();
    registry.register_element("TextBlock", |element, ctx| {
        let Element::TextBlock(text) = element else {
            return Value::Null;
        };
        json!({
            "kind": "text",
            "content": text.text,
            "fontFamily": ctx.host_config.font_family
        })
    });
    registry.register_element("Container", |element, ctx| {
        let Element::Container(container) = element else {
            return Value::Null;
        };
        let children: Vec<Value> = container
            .items
            .iter()
            .map(|child| ctx.render_element(child))
            .collect();
        json!({ "kind": "container", "children": children })
    });
    registry.register_action("Action.Submit", |action, _ctx| {
        let Action::Submit(submit) = action else {
            return Value::Null;
        };
        json!({ "kind": "submit", "data": submit.data })
    });
    registry.register_action("Action.ShowCard", |action, ctx| {
        let Action::ShowCard(show_card) = action else {
            return Value::Null;
        };
        let body: Vec<Value> = show_card
            .card
            .body
            .iter()
            .map(|child| ctx.render_element(child))
            .collect();
        json!({ "kind": "showCard", "body": body })
    });
    registry
}

#[test]
fn end_to_end_parse_and_render() {
    let card = parse(r#"{"type":"AdaptiveCard","version":"1.5","body":[{"type":"TextBlock","text":"Hi"}]}"#)
        .expect("parse succeeds");
    let ctx = RenderContext::new(stock_registry());
    let result = render(&card, &ctx).expect("render succeeds");

    assert_eq!(result.body.len(), 1);
    assert_eq!(result.body[0]["content"], "Hi");
    assert!(result.actions.is_empty());
}

#[test]
fn missing_body_is_exactly_one_error() {
    let report = validate(&json!({ "type": "AdaptiveCard", "version": "1.5" }));
    assert!(!report.is_valid());
    assert_eq!(issue_codes(&report.errors), vec!["MISSING_BODY"]);
}

#[test]
fn validation_aggregates_every_defect() {
    let report = validate(&json!({
        "type": "AdaptiveCard",
        "version": "1.5",
        "body": [
            { "type": "TextBlock" },
            { "type": "Image" },
            { "type": "Input.Text", "id": "shared" }
        ],
        "actions": [
            { "type": "Action.Submit", "id": "shared" }
        ]
    }));

    assert!(report.errors.len() >= 3, "{:?}", report.errors);
    let codes = issue_codes(&report.errors);
    assert!(codes.contains(&"MISSING_TEXT".to_string()));
    assert!(codes.contains(&"MISSING_URL".to_string()));
    assert!(codes.contains(&"DUPLICATE_ID".to_string()));
}

#[test]
fn duplicate_ids_span_unrelated_subtrees() {
    let report = validate(&json!({
        "type": "AdaptiveCard",
        "version": "1.5",
        "body": [ { "type": "Input.Text", "id": "confirm" } ],
        "actions": [ { "type": "Action.Submit", "id": "confirm" } ]
    }));
    assert_eq!(issue_codes(&report.errors), vec!["DUPLICATE_ID"]);
}

#[test]
fn warnings_do_not_block_validity() {
    let actions: Vec<Value> = (0..7).map(|_| json!({ "type": "Action.Submit" })).collect();
    let report = validate(&json!({
        "type": "AdaptiveCard",
        "version": "2.0",
        "body": [],
        "actions": actions
    }));

    assert!(report.is_valid());
    assert!(report.warnings.len() >= 2, "{:?}", report.warnings);
    let codes = issue_codes(&report.warnings);
    assert!(codes.contains(&"VERSION_OUT_OF_RANGE".to_string()));
    assert!(codes.contains(&"TOO_MANY_ACTIONS".to_string()));
}

#[test]
fn builder_cards_round_trip_through_stringify() {
    let nested = Card::new().add_element(Element::TextBlock(TextBlock::new("details")));
    let mut submit = SubmitAction::new();
    submit.common.id = Some("send".to_string());
    submit.common.is_enabled = Some(false);
    submit.data = Some(json!({ "count": 0, "flag": false }));
    let mut input = TextInput::new("comment");
    input.is_multiline = Some(false);

    let card = Card::new()
        .with_version("1.4")
        .with_schema_ref("http://adaptivecards.io/schemas/adaptive-card.json")
        .add_element(Element::Container(Container::new(vec![
            Element::TextBlock(TextBlock::new("Hello")),
            Element::Image(Image::new("https://example.com/a.png")),
            Element::TextInput(input),
        ])))
        .add_element(Element::ActionSet(ActionSet::new(vec![Action::OpenUrl(
            OpenUrlAction::new("https://example.com"),
        )])))
        .add_action(Action::Submit(submit))
        .add_action(Action::ShowCard(ShowCardAction::new(nested)));

    let round = parse(&stringify(&card)).expect("round trip parses");
    assert_eq!(round, card);
}

#[test]
fn falsy_fields_survive_the_round_trip() {
    let mut submit = SubmitAction::new();
    submit.common.is_enabled = Some(false);
    let card = Card::new().add_action(Action::Submit(submit));

    let text = stringify(&card);
    assert!(text.contains(r#""isEnabled":false"#), "{text}");
    let round = parse(&text).expect("round trip parses");
    assert_eq!(round, card);
}

#[test]
fn unknown_element_renders_a_fallback_marker() {
    let card = parse(
        r#"{
            "type": "AdaptiveCard",
            "version": "1.5",
            "body": [
                { "type": "Foo.Bar", "payload": { "x": 1 } },
                { "type": "TextBlock", "text": "still here" }
            ]
        }"#,
    )
    .expect("unknown types pass structural validation");

    let ctx = RenderContext::new(stock_registry());
    let result = render(&card, &ctx).expect("render does not throw");
    assert_eq!(result.body[0], fallback_marker("Foo.Bar"));
    assert_eq!(result.body[1]["content"], "still here");
}

#[test]
fn container_renderer_recurses_through_the_context() {
    let card = Card::new().add_element(Element::Container(Container::new(vec![
        Element::TextBlock(TextBlock::new("a")),
        Element::TextBlock(TextBlock::new("b")),
    ])));
    let ctx = RenderContext::new(stock_registry());

    let result = render(&card, &ctx).expect("render succeeds");
    assert_eq!(result.body[0]["kind"], "container");
    assert_eq!(result.body[0]["children"][0]["content"], "a");
    assert_eq!(result.body[0]["children"][1]["content"], "b");
}

#[test]
fn show_card_renderer_reaches_the_nested_body() {
    let nested = Card::new().add_element(Element::TextBlock(TextBlock::new("inner")));
    let card = Card::new().add_action(Action::ShowCard(ShowCardAction::new(nested)));
    let ctx = RenderContext::new(stock_registry());

    let result = render(&card, &ctx).expect("render succeeds");
    assert_eq!(result.actions[0]["kind"], "showCard");
    assert_eq!(result.actions[0]["body"][0]["content"], "inner");
}

#[test]
fn render_refuses_a_card_with_errors() {
    let card = Card::new().add_element(Element::TextBlock(TextBlock::new("")));
    let ctx = RenderContext::new(stock_registry());
    let err = render(&card, &ctx).unwrap_err();
    assert!(matches!(err, CardError::Validation { .. }));
}

#[test]
fn host_config_merge_is_per_category() {
    let patch: HostConfigPatch =
        serde_json::from_value(json!({ "spacing": { "small": 5 } })).expect("patch deserializes");
    let merged = merge_host_config(&DEFAULT_HOST_CONFIG, &patch);

    assert_eq!(merged.spacing.small, 5);
    assert_eq!(merged.spacing.r#default, DEFAULT_HOST_CONFIG.spacing.r#default);
    assert_eq!(DEFAULT_HOST_CONFIG.spacing.small, 3);
}

#[test]
fn overridden_host_config_reaches_renderers() {
    let patch: HostConfigPatch =
        serde_json::from_value(json!({ "fontFamily": "monospace" })).expect("patch deserializes");
    let host_config = merge_host_config(&DEFAULT_HOST_CONFIG, &patch);
    let ctx = RenderContext::with_host_config(stock_registry(), host_config);

    let card = Card::new().add_element(Element::TextBlock(TextBlock::new("Hi")));
    let result = render(&card, &ctx).expect("render succeeds");
    assert_eq!(result.body[0]["fontFamily"], "monospace");
}

#[test]
fn trace_events_emit_under_the_env_gate() {
    unsafe {
        std::env::set_var("ADAPTIVE_CARD_TRACE", "1");
    }
    let card = Card::new().add_element(Element::TextBlock(TextBlock::new("Hi")));
    let ctx = RenderContext::new(stock_registry());
    let result = render(&card, &ctx).expect("render succeeds");
    unsafe {
        std::env::remove_var("ADAPTIVE_CARD_TRACE");
    }

    assert_eq!(result.telemetry_events.len(), 1);
    let event = &result.telemetry_events[0];
    assert_eq!(event.name, "adaptive_card.render");
    assert_eq!(event.properties["rendered"]["body"], 1);
    assert!(
        event.properties["card_hash"]
            .as_str()
            .unwrap_or_default()
            .starts_with("blake3:")
    );
}

#[test]
fn templated_cards_bind_then_parse() {
    let input = r#"{
        "type": "AdaptiveCard",
        "version": "1.5",
        "body": [
            { "type": "TextBlock", "text": "{{greeting}} @{user.name||\"Guest\"}" }
        ]
    }"#;
    let card = parse_with_data(input, &json!({ "greeting": "Welcome" }))
        .expect("templated parse succeeds");
    let Element::TextBlock(text) = &card.body[0] else {
        panic!("expected a text block");
    };
    assert_eq!(text.text, "Welcome Guest");
}
