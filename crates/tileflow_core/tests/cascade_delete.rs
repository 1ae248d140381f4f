use tileflow_core::{
    validate_model, Connector, ConnectorAnchor, Coords, EditorConfig, EditorService, FixedClock,
    Model, ModelItem, View, ViewItem,
};

/// Three views each placing `a`, `b` and `c`; two connectors per view touch
/// `a`, one of them through an anchor chain.
fn three_view_editor() -> EditorService<FixedClock> {
    let mut model = Model::new("Cascade");
    for id in ["a", "b", "c"] {
        model.items.push(ModelItem::new(id, id.to_uppercase()));
    }
    for view_id in ["v1", "v2", "v3"] {
        let mut view = View::new(view_id, view_id);
        view.items.push(ViewItem::new("a", Coords::new(0, 0)));
        view.items.push(ViewItem::new("b", Coords::new(4, 0)));
        view.items.push(ViewItem::new("c", Coords::new(0, 4)));
        view.connectors.push(Connector::new(
            format!("{view_id}-ab"),
            vec![
                ConnectorAnchor::to_item(format!("{view_id}-ab-1"), "a"),
                ConnectorAnchor::to_item(format!("{view_id}-ab-2"), "b"),
            ],
        ));
        view.connectors.push(Connector::new(
            format!("{view_id}-chain"),
            vec![
                ConnectorAnchor::to_anchor(format!("{view_id}-chain-1"), format!("{view_id}-ab-1")),
                ConnectorAnchor::to_item(format!("{view_id}-chain-2"), "c"),
            ],
        ));
        model.views.push(view);
    }
    EditorService::with_clock(model, EditorConfig::default(), FixedClock(0))
}

#[test]
fn deleting_model_item_removes_placements_and_connectors_everywhere() {
    let mut editor = three_view_editor();
    assert_eq!(editor.scene().connector_count(), 6);
    assert!(editor.validate().is_empty());

    editor.delete_model_item("a").unwrap();

    let model = editor.model();
    assert!(model.item("a").is_none());
    for view in &model.views {
        assert!(view.item("a").is_none());
        assert_eq!(view.items.len(), 2);
        assert!(view.connectors.is_empty(), "view {} kept connectors", view.id);
    }
    assert!(editor.scene().connectors.is_empty());
    assert!(validate_model(model).is_empty());
}

#[test]
fn two_connectors_below_minimum_are_removed() {
    let mut model = Model::new("Minimal");
    for id in ["hub", "x", "y"] {
        model.items.push(ModelItem::new(id, id));
    }
    for (index, view_id) in ["v1", "v2", "v3"].into_iter().enumerate() {
        let mut view = View::new(view_id, view_id);
        view.items.push(ViewItem::new("hub", Coords::new(0, 0)));
        view.items.push(ViewItem::new("x", Coords::new(3, 0)));
        view.items.push(ViewItem::new("y", Coords::new(0, 3)));
        if index == 0 {
            view.connectors.push(Connector::new(
                "hub-x",
                vec![
                    ConnectorAnchor::to_item("hx-1", "hub"),
                    ConnectorAnchor::to_item("hx-2", "x"),
                ],
            ));
            view.connectors.push(Connector::new(
                "y-hub",
                vec![
                    ConnectorAnchor::to_item("yh-1", "y"),
                    ConnectorAnchor::to_item("yh-2", "hub"),
                ],
            ));
        }
        model.views.push(view);
    }
    let mut editor = EditorService::with_clock(model, EditorConfig::default(), FixedClock(0));

    editor.delete_model_item("hub").unwrap();

    assert!(editor
        .model()
        .views
        .iter()
        .all(|view| view.item("hub").is_none() && view.connectors.is_empty()));
    assert!(editor.validate().is_empty());
}

#[test]
fn deleting_view_item_only_touches_that_view() {
    let mut editor = three_view_editor();
    editor.delete_view_item("v2", "b").unwrap();

    let v2 = editor.model().view("v2").unwrap();
    assert!(v2.item("b").is_none());
    assert!(v2.connectors.is_empty());
    assert_eq!(editor.model().view("v1").unwrap().connectors.len(), 2);
    assert!(editor.scene().connector("v2", "v2-ab").is_none());
    assert!(editor.scene().connector("v2", "v2-chain").is_none());
    assert!(editor.scene().connector("v3", "v3-chain").is_some());
    assert!(editor.validate().is_empty());
}

#[test]
fn undoing_a_cascade_restores_connectors_and_routes() {
    let mut editor = three_view_editor();
    let scene = editor.scene().clone();

    editor.delete_model_item("a").unwrap();
    assert!(editor.undo());

    assert_eq!(editor.model().views[0].connectors.len(), 2);
    assert_eq!(editor.scene(), &scene);
}

#[test]
fn deleting_view_drops_only_its_scene_entries() {
    let mut editor = three_view_editor();
    editor.delete_view("v3").unwrap();

    assert!(editor.model().view("v3").is_none());
    assert_eq!(editor.scene().connector_count(), 4);
    assert!(!editor.scene().connectors.contains_key("v3"));
}

#[test]
fn views_reusing_a_connector_id_keep_their_own_routes() {
    let mut model = Model::new("Shared ids");
    model.items.push(ModelItem::new("a", "A"));
    for (view_id, far) in [("v1", Coords::new(3, 0)), ("v2", Coords::new(0, 7))] {
        let mut view = View::new(view_id, view_id);
        view.items.push(ViewItem::new("a", Coords::new(0, 0)));
        view.connectors.push(Connector::new(
            "c1",
            vec![
                ConnectorAnchor::to_item("from", "a"),
                ConnectorAnchor::to_tile("to", far),
            ],
        ));
        model.views.push(view);
    }
    let mut editor = EditorService::with_clock(model, EditorConfig::default(), FixedClock(0));

    let route_end = |editor: &EditorService<FixedClock>, view_id: &str| {
        editor
            .scene()
            .connector(view_id, "c1")
            .and_then(|connector| connector.path.absolute_tiles().last().copied())
    };
    assert_eq!(editor.scene().connector_count(), 2);
    assert_eq!(route_end(&editor, "v1"), Some(Coords::new(3, 0)));
    assert_eq!(route_end(&editor, "v2"), Some(Coords::new(0, 7)));

    editor.delete_view("v1").unwrap();
    assert_eq!(route_end(&editor, "v2"), Some(Coords::new(0, 7)));

    editor.delete_connector("v2", "c1").unwrap();
    assert!(editor.scene().connectors.is_empty());
}
