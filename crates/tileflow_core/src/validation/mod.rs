//! Referential integrity checks over model snapshots.
//!
//! # Responsibility
//! - Report every dangling or malformed cross-entity reference as a typed
//!   [`Issue`].
//! - Stay pure: validators read a snapshot and return a list.
//!
//! # Invariants
//! - Validators never mutate and never panic.
//! - An empty list is the only success signal.
//! - Each connector anchor yields at most one issue.

use crate::model::diagram::{AnchorRef, Connector, ConnectorAnchor, Model, ModelItem, Rectangle, View};
use crate::routing::connector_path::{get_anchor_tile, PathError};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Closed set of integrity problems, with the ids involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    tag = "type",
    content = "params",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum IssueKind {
    InvalidAnchorToViewItemRef {
        anchor: String,
        view_item: String,
        view: String,
        connector: String,
    },
    InvalidConnectorColorRef {
        connector: String,
        view: String,
        color: String,
    },
    InvalidRectangleColorRef {
        rectangle: String,
        view: String,
        color: String,
    },
    InvalidAnchorToAnchorRef {
        src_anchor: String,
        dest_anchor: String,
        view: String,
        connector: String,
    },
    InvalidViewItemToModelItemRef {
        view: String,
        model_item: String,
    },
    /// Anchor reference exists but can never resolve to a tile.
    InvalidAnchorRef {
        anchor: String,
        view: String,
        connector: String,
    },
    InvalidModelToIconRef {
        model_item: String,
        icon: String,
    },
    ConnectorTooFewAnchors {
        connector: String,
        view: String,
    },
}

impl IssueKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAnchorToViewItemRef { .. } => "INVALID_ANCHOR_TO_VIEW_ITEM_REF",
            Self::InvalidConnectorColorRef { .. } => "INVALID_CONNECTOR_COLOR_REF",
            Self::InvalidRectangleColorRef { .. } => "INVALID_RECTANGLE_COLOR_REF",
            Self::InvalidAnchorToAnchorRef { .. } => "INVALID_ANCHOR_TO_ANCHOR_REF",
            Self::InvalidViewItemToModelItemRef { .. } => "INVALID_VIEW_ITEM_TO_MODEL_ITEM_REF",
            Self::InvalidAnchorRef { .. } => "INVALID_ANCHOR_REF",
            Self::InvalidModelToIconRef { .. } => "INVALID_MODEL_TO_ICON_REF",
            Self::ConnectorTooFewAnchors { .. } => "CONNECTOR_TOO_FEW_ANCHORS",
        }
    }
}

impl Display for IssueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAnchorToViewItemRef {
                anchor,
                view_item,
                view,
                connector,
            } => write!(
                f,
                "anchor `{anchor}` of connector `{connector}` in view `{view}` references missing view item `{view_item}`"
            ),
            Self::InvalidConnectorColorRef {
                connector,
                view,
                color,
            } => write!(
                f,
                "connector `{connector}` in view `{view}` references missing color `{color}`"
            ),
            Self::InvalidRectangleColorRef {
                rectangle,
                view,
                color,
            } => write!(
                f,
                "rectangle `{rectangle}` in view `{view}` references missing color `{color}`"
            ),
            Self::InvalidAnchorToAnchorRef {
                src_anchor,
                dest_anchor,
                view,
                connector,
            } => write!(
                f,
                "anchor `{src_anchor}` of connector `{connector}` in view `{view}` references missing anchor `{dest_anchor}`"
            ),
            Self::InvalidViewItemToModelItemRef { view, model_item } => write!(
                f,
                "view `{view}` places missing model item `{model_item}`"
            ),
            Self::InvalidAnchorRef {
                anchor,
                view,
                connector,
            } => write!(
                f,
                "anchor `{anchor}` of connector `{connector}` in view `{view}` does not resolve to a tile"
            ),
            Self::InvalidModelToIconRef { model_item, icon } => write!(
                f,
                "model item `{model_item}` references missing icon `{icon}`"
            ),
            Self::ConnectorTooFewAnchors { connector, view } => write!(
                f,
                "connector `{connector}` in view `{view}` has fewer than two anchors"
            ),
        }
    }
}

/// One integrity finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    #[serde(flatten)]
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Checks one anchor of `connector` against the anchors and items of `view`.
pub fn validate_connector_anchor(
    anchor: &ConnectorAnchor,
    connector: &Connector,
    view: &View,
) -> Vec<Issue> {
    let issue = match &anchor.target {
        AnchorRef::Tile(_) => None,
        AnchorRef::Item(item_id) => view.item(item_id).is_none().then(|| {
            Issue::new(IssueKind::InvalidAnchorToViewItemRef {
                anchor: anchor.id.clone(),
                view_item: item_id.clone(),
                view: view.id.clone(),
                connector: connector.id.clone(),
            })
        }),
        AnchorRef::Anchor(target_id) => match view.anchor(target_id) {
            None => Some(Issue::new(IssueKind::InvalidAnchorToAnchorRef {
                src_anchor: anchor.id.clone(),
                dest_anchor: target_id.clone(),
                view: view.id.clone(),
                connector: connector.id.clone(),
            })),
            Some((owner, _)) if owner.id == connector.id => Some(invalid_anchor_ref(anchor, connector, view)),
            Some(_) => match get_anchor_tile(anchor, view) {
                Err(PathError::AnchorCycle(_)) => Some(invalid_anchor_ref(anchor, connector, view)),
                // A broken link further down the chain is reported on that anchor.
                _ => None,
            },
        },
    };
    issue.into_iter().collect()
}

fn invalid_anchor_ref(anchor: &ConnectorAnchor, connector: &Connector, view: &View) -> Issue {
    Issue::new(IssueKind::InvalidAnchorRef {
        anchor: anchor.id.clone(),
        view: view.id.clone(),
        connector: connector.id.clone(),
    })
}

pub fn validate_connector(connector: &Connector, view: &View, model: &Model) -> Vec<Issue> {
    let mut issues = Vec::new();

    if let Some(color) = &connector.color {
        if model.color(color).is_none() {
            issues.push(Issue::new(IssueKind::InvalidConnectorColorRef {
                connector: connector.id.clone(),
                view: view.id.clone(),
                color: color.clone(),
            }));
        }
    }

    if connector.anchors.len() < 2 {
        issues.push(Issue::new(IssueKind::ConnectorTooFewAnchors {
            connector: connector.id.clone(),
            view: view.id.clone(),
        }));
    }

    for anchor in &connector.anchors {
        issues.extend(validate_connector_anchor(anchor, connector, view));
    }

    issues
}

pub fn validate_rectangle(rectangle: &Rectangle, view: &View, model: &Model) -> Vec<Issue> {
    match &rectangle.color {
        Some(color) if model.color(color).is_none() => {
            vec![Issue::new(IssueKind::InvalidRectangleColorRef {
                rectangle: rectangle.id.clone(),
                view: view.id.clone(),
                color: color.clone(),
            })]
        }
        _ => Vec::new(),
    }
}

pub fn validate_view(view: &View, model: &Model) -> Vec<Issue> {
    let mut issues = Vec::new();

    for item in &view.items {
        if model.item(&item.id).is_none() {
            issues.push(Issue::new(IssueKind::InvalidViewItemToModelItemRef {
                view: view.id.clone(),
                model_item: item.id.clone(),
            }));
        }
    }

    for connector in &view.connectors {
        issues.extend(validate_connector(connector, view, model));
    }

    for rectangle in &view.rectangles {
        issues.extend(validate_rectangle(rectangle, view, model));
    }

    issues
}

pub fn validate_model_item(item: &ModelItem, model: &Model) -> Vec<Issue> {
    match &item.icon {
        Some(icon) if model.icon(icon).is_none() => {
            vec![Issue::new(IssueKind::InvalidModelToIconRef {
                model_item: item.id.clone(),
                icon: icon.clone(),
            })]
        }
        _ => Vec::new(),
    }
}

/// Validates every item and view of `model`.
pub fn validate_model(model: &Model) -> Vec<Issue> {
    let mut issues = Vec::new();
    for item in &model.items {
        issues.extend(validate_model_item(item, model));
    }
    for view in &model.views {
        issues.extend(validate_view(view, model));
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::{validate_connector_anchor, validate_model, IssueKind};
    use crate::model::diagram::{Color, Connector, ConnectorAnchor, Model, ModelItem, Rectangle, View, ViewItem};
    use crate::model::geometry::Coords;

    fn base_model() -> Model {
        let mut model = Model::new("Test");
        model.items.push(ModelItem::new("a", "A"));
        model.items.push(ModelItem::new("b", "B"));
        model.colors.push(Color {
            id: "blue".to_string(),
            value: "#0000ff".to_string(),
        });
        let mut view = View::new("v1", "Main");
        view.items.push(ViewItem::new("a", Coords::new(0, 0)));
        view.items.push(ViewItem::new("b", Coords::new(4, 0)));
        view.connectors.push(Connector::new(
            "c1",
            vec![
                ConnectorAnchor::to_item("c1-a", "a"),
                ConnectorAnchor::to_item("c1-b", "b"),
            ],
        ));
        model.views.push(view);
        model
    }

    #[test]
    fn consistent_model_has_no_issues() {
        assert!(validate_model(&base_model()).is_empty());
    }

    #[test]
    fn self_referencing_anchor_is_invalid_anchor_ref() {
        let model = base_model();
        let view = &model.views[0];
        let connector = Connector::new(
            "c2",
            vec![
                ConnectorAnchor::to_anchor("c2-a", "c2-b"),
                ConnectorAnchor::to_item("c2-b", "a"),
            ],
        );
        let mut view = view.clone();
        view.connectors.push(connector.clone());

        let issues = validate_connector_anchor(&connector.anchors[0], &connector, &view);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code(), "INVALID_ANCHOR_REF");
    }

    #[test]
    fn anchor_pointing_to_other_connector_is_valid() {
        let mut model = base_model();
        model.views[0].connectors.push(Connector::new(
            "c2",
            vec![
                ConnectorAnchor::to_anchor("c2-a", "c1-b"),
                ConnectorAnchor::to_tile("c2-b", Coords::new(4, 4)),
            ],
        ));
        assert!(validate_model(&model).is_empty());
    }

    #[test]
    fn color_and_icon_refs_are_checked() {
        let mut model = base_model();
        model.items[0].icon = Some("no-such-icon".to_string());
        model.views[0].connectors[0].color = Some("red".to_string());
        let mut rectangle = Rectangle::new("r1", Coords::zero(), Coords::new(2, 2));
        rectangle.color = Some("blue".to_string());
        model.views[0].rectangles.push(rectangle);
        let mut missing = Rectangle::new("r2", Coords::zero(), Coords::new(1, 1));
        missing.color = Some("green".to_string());
        model.views[0].rectangles.push(missing);

        let codes: Vec<_> = validate_model(&model).iter().map(|issue| issue.code()).collect();
        assert_eq!(
            codes,
            vec![
                "INVALID_MODEL_TO_ICON_REF",
                "INVALID_CONNECTOR_COLOR_REF",
                "INVALID_RECTANGLE_COLOR_REF"
            ]
        );
    }

    #[test]
    fn issue_serializes_with_type_params_and_message() {
        let mut model = base_model();
        model.views[0].items.push(ViewItem::new("ghost", Coords::new(9, 9)));

        let issues = validate_model(&model);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].kind,
            IssueKind::InvalidViewItemToModelItemRef {
                view: "v1".to_string(),
                model_item: "ghost".to_string(),
            }
        );

        let json = serde_json::to_value(&issues[0]).unwrap();
        assert_eq!(json["type"], "INVALID_VIEW_ITEM_TO_MODEL_ITEM_REF");
        assert_eq!(json["params"]["modelItem"], "ghost");
        assert!(json["message"].as_str().unwrap().contains("ghost"));
    }
}
