use tileflow_core::{
    validate_model, Connector, ConnectorAnchor, Coords, IssueKind, Model, ModelItem, View,
    ViewItem,
};

fn model_with_anchor(anchor: ConnectorAnchor) -> Model {
    let mut model = Model::new("Validation");
    model.items.push(ModelItem::new("a", "A"));
    let mut view = View::new("v1", "Main");
    view.items.push(ViewItem::new("a", Coords::new(0, 0)));
    view.connectors.push(Connector::new(
        "c1",
        vec![ConnectorAnchor::to_item("c1-a", "a"), anchor],
    ));
    model.views.push(view);
    model
}

#[test]
fn orphan_item_anchor_yields_exactly_one_issue() {
    let model = model_with_anchor(ConnectorAnchor::to_item("c1-b", "ghost"));
    let issues = validate_model(&model);

    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0].kind,
        IssueKind::InvalidAnchorToViewItemRef {
            anchor: "c1-b".to_string(),
            view_item: "ghost".to_string(),
            view: "v1".to_string(),
            connector: "c1".to_string(),
        }
    );
}

#[test]
fn missing_anchor_target_is_anchor_to_anchor_issue() {
    let model = model_with_anchor(ConnectorAnchor::to_anchor("c1-b", "nowhere"));
    let codes: Vec<_> = validate_model(&model).iter().map(|i| i.code()).collect();
    assert_eq!(codes, vec!["INVALID_ANCHOR_TO_ANCHOR_REF"]);
}

#[test]
fn cross_connector_cycle_is_invalid_anchor_ref() {
    let mut model = Model::new("Cycle");
    let mut view = View::new("v1", "Main");
    view.connectors.push(Connector::new(
        "c1",
        vec![
            ConnectorAnchor::to_anchor("p", "q"),
            ConnectorAnchor::to_tile("p2", Coords::new(1, 1)),
        ],
    ));
    view.connectors.push(Connector::new(
        "c2",
        vec![
            ConnectorAnchor::to_anchor("q", "p"),
            ConnectorAnchor::to_tile("q2", Coords::new(3, 3)),
        ],
    ));
    model.views.push(view);

    let issues = validate_model(&model);
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().all(|issue| issue.code() == "INVALID_ANCHOR_REF"));
}

#[test]
fn connector_with_one_anchor_is_reported() {
    let mut model = Model::new("Arity");
    let mut view = View::new("v1", "Main");
    view.connectors.push(Connector::new(
        "c1",
        vec![ConnectorAnchor::to_tile("only", Coords::zero())],
    ));
    model.views.push(view);

    let issues = validate_model(&model);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code(), "CONNECTOR_TOO_FEW_ANCHORS");
}

#[test]
fn issues_serialize_as_type_params_message() {
    let model = model_with_anchor(ConnectorAnchor::to_anchor("c1-b", "nowhere"));
    let issues = validate_model(&model);
    let json = serde_json::to_value(&issues).unwrap();

    assert_eq!(json[0]["type"], "INVALID_ANCHOR_TO_ANCHOR_REF");
    assert_eq!(
        json[0]["params"],
        serde_json::json!({
            "srcAnchor": "c1-b",
            "destAnchor": "nowhere",
            "view": "v1",
            "connector": "c1"
        })
    );
    assert!(json[0]["message"].is_string());
}

#[test]
fn validation_does_not_mutate() {
    let model = model_with_anchor(ConnectorAnchor::to_item("c1-b", "ghost"));
    let before = model.clone();
    let _ = validate_model(&model);
    assert_eq!(model, before);
}
