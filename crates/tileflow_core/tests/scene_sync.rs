use tileflow_core::{
    find_path, rebuild_scene, reduce_view, Connector, ConnectorAnchor, Coords, Model, Scene, Size,
    State, TextBox, View, ViewAction, ViewContext, ViewItem,
};

fn model() -> Model {
    let mut view = View::new("v1", "Main");
    view.items.push(ViewItem::new("a", Coords::new(0, 0)));
    view.items.push(ViewItem::new("b", Coords::new(7, 3)));
    view.connectors.push(Connector::new(
        "c1",
        vec![
            ConnectorAnchor::to_item("c1-a", "a"),
            ConnectorAnchor::to_tile("c1-mid", Coords::new(3, -2)),
            ConnectorAnchor::to_item("c1-b", "b"),
        ],
    ));
    view.text_boxes
        .push(TextBox::new("t1", Coords::new(2, 6), "Load balancer"));
    let mut model = Model::new("Sync");
    model.views.push(view);
    model
}

#[test]
fn syncing_a_view_twice_matches_syncing_once() {
    let state = State::new(model(), Scene::new());
    let ctx = ViewContext::new("v1", &state, 0);
    let once = reduce_view(ViewAction::SyncScene, &ctx).unwrap();
    let ctx = ViewContext::new("v1", &once, 0);
    let twice = reduce_view(ViewAction::SyncScene, &ctx).unwrap();

    assert_eq!(once, twice);
    assert_eq!(
        serde_json::to_string(&once.scene).unwrap(),
        serde_json::to_string(&twice.scene).unwrap()
    );
    // Sync derives scene data only.
    assert_eq!(once.model, state.model);
}

#[test]
fn rebuild_matches_incremental_sync() {
    let model = model();
    let state = State::new(model.clone(), Scene::new());
    let ctx = ViewContext::new("v1", &state, 0);
    let synced = reduce_view(ViewAction::SyncScene, &ctx).unwrap();

    assert_eq!(rebuild_scene(&model, &Scene::new()), synced.scene);
}

#[test]
fn connector_path_passes_through_every_anchor() {
    let scene = rebuild_scene(&model(), &Scene::new());
    let tiles = scene.connector("v1", "c1").unwrap().path.absolute_tiles();

    assert_eq!(tiles.first(), Some(&Coords::new(0, 0)));
    assert!(tiles.contains(&Coords::new(3, -2)));
    assert_eq!(tiles.last(), Some(&Coords::new(7, 3)));
    for pair in tiles.windows(2) {
        assert_eq!(pair[0].manhattan_to(pair[1]), 1);
    }
}

#[test]
fn pathfinder_is_deterministic_across_calls() {
    let cases = [
        (Size::new(20, 20), Coords::new(0, 0), Coords::new(19, 19)),
        (Size::new(5, 9), Coords::new(4, 0), Coords::new(0, 8)),
        (Size::new(0, 0), Coords::new(-3, 2), Coords::new(2, -3)),
    ];
    for (grid, from, to) in cases {
        let first = find_path(grid, from, to);
        for _ in 0..10 {
            assert_eq!(find_path(grid, from, to), first);
        }
        assert_eq!(first.len() as u32, from.manhattan_to(to) + 1);
    }
}
