//! Integration tests for the TreeView model: structure, state propagation,
//! reordering and rendering.

use std::fs;

use rstest::{fixture, rstest};

use treeview::application::TreeView;
use treeview::config::Settings;
use treeview::domain::{NodeId, NodeRecord};
use treeview::util::testing;

fn ids(ids: &[NodeId]) -> Vec<&str> {
    ids.iter().map(NodeId::as_str).collect()
}

fn flat_ids(view: &TreeView) -> Vec<String> {
    view.flatten()
        .into_iter()
        .map(|r| r.node_id.as_str().to_string())
        .collect()
}

#[fixture]
fn basic_view() -> TreeView {
    testing::init_test_setup();
    let json = fs::read_to_string("tests/resources/trees/basic.json").unwrap();
    let records = NodeRecord::parse_forest(&json).unwrap();
    TreeView::with_data(Settings::default(), records)
}

// ============================================================
// Loading
// ============================================================

#[rstest]
fn given_record_file_when_loading_then_nodes_are_in_display_order(basic_view: TreeView) {
    // Act
    let order = flat_ids(&basic_view);

    // Assert
    assert_eq!(order, vec!["docs", "report", "notes", "media", "img", "logo"]);
    assert_eq!(basic_view.arena().depth(), 3);
    assert_eq!(basic_view.node("img").unwrap().parent_id.as_str(), "media");
}

#[rstest]
fn given_record_flags_when_loading_then_state_sets_are_seeded(basic_view: TreeView) {
    // Assert
    assert_eq!(ids(&basic_view.checked_ids()), vec!["logo"]);
    assert!(basic_view.selected_ids().is_empty());
    assert_eq!(basic_view.visible_ids().len(), 6);
    assert!(basic_view.node("docs").unwrap().expanded);
}

#[test]
fn given_single_record_when_loading_then_ids_are_normalized() {
    // Arrange
    let json = fs::read_to_string("tests/resources/trees/single.json").unwrap();

    // Act
    let view = TreeView::with_data(Settings::default(), NodeRecord::parse_forest(&json).unwrap());

    // Assert
    assert!(view.exists("root"));
    assert!(view.exists("  CHILD "));
    assert_eq!(view.children("root")[0].node_id.as_str(), "child");
}

// ============================================================
// Structure
// ============================================================

#[rstest]
fn given_existing_id_when_adding_then_rejected(mut basic_view: TreeView) {
    // Act
    let added = basic_view.add("media", "Report", "", "Duplicate", "");

    // Assert
    assert!(!added);
    assert_eq!(basic_view.flatten().len(), 6);
    assert_eq!(basic_view.node("report").unwrap().text, "Q3 Report");
}

#[rstest]
fn given_unknown_parent_when_adding_then_nothing_changes(mut basic_view: TreeView) {
    // Act
    let added = basic_view.add("missing", "orphan", "", "Orphan", "");

    // Assert
    assert!(!added);
    assert!(!basic_view.exists("orphan"));
}

#[rstest]
fn given_add_without_icon_when_refreshing_then_blank_icon_is_used(mut basic_view: TreeView) {
    // Act
    assert!(basic_view.add("", "New Root", "", "New root", ""));
    basic_view.refresh();

    // Assert
    let item = basic_view.visual().find(&NodeId::new("new root")).unwrap();
    assert_eq!(item.element_id, "treeview-new root");
    assert_eq!(item.icon.as_ref().unwrap().src, "./assets/blank.svg");
    assert!(basic_view.visible_ids().contains(&NodeId::new("new root")));
}

#[rstest]
fn given_target_when_adding_before_and_after_then_sibling_order_is_kept(mut basic_view: TreeView) {
    // Act
    assert!(basic_view.add_before("notes", "draft", "", "Draft", ""));
    assert!(basic_view.add_after("notes", "archive", "", "Archive", ""));

    // Assert
    let children: Vec<_> = basic_view
        .children("docs")
        .into_iter()
        .map(|r| r.node_id.as_str().to_string())
        .collect();
    assert_eq!(children, vec!["report", "draft", "notes", "archive"]);
}

#[rstest]
fn given_selected_subtree_when_removing_then_state_sets_are_purged(mut basic_view: TreeView) {
    // Arrange
    basic_view.select("media", true);
    assert_eq!(ids(&basic_view.selected_ids()), vec!["media", "img", "logo"]);

    // Act
    let removed = basic_view.remove("media");

    // Assert
    assert!(removed);
    assert!(!basic_view.exists("img"));
    assert!(!basic_view.exists("logo"));
    assert!(basic_view.selected_ids().is_empty());
    assert!(basic_view.checked_ids().is_empty());
    assert_eq!(ids(&basic_view.visible_ids()), vec!["docs", "report", "notes"]);
    assert!(basic_view.visual().find(&NodeId::new("media")).is_none());
}

#[rstest]
fn given_branch_when_removing_children_then_node_becomes_leaf(mut basic_view: TreeView) {
    // Act
    assert!(basic_view.remove_children("docs"));

    // Assert
    assert!(basic_view.exists("docs"));
    assert!(basic_view.children("docs").is_empty());
    assert!(!basic_view.exists("report"));
    let item = basic_view.visual().find(&NodeId::new("docs")).unwrap();
    assert!(!item.is_branch());
    assert!(item.blank_icon.is_some());
}

#[rstest]
fn given_node_when_updating_then_visual_is_patched(mut basic_view: TreeView) {
    // Act
    assert!(basic_view.update("notes", "", "Meeting notes", ""));

    // Assert
    let item = basic_view.visual().find(&NodeId::new("notes")).unwrap();
    assert_eq!(item.label.text, "Meeting notes");
    assert_eq!(item.href, None);
    assert_eq!(basic_view.node("notes").unwrap().icon_url, "./assets/blank.svg");
}

#[rstest]
fn given_tree_when_clearing_then_everything_is_gone(mut basic_view: TreeView) {
    // Arrange
    basic_view.select("docs", true);

    // Act
    basic_view.clear();

    // Assert
    assert!(basic_view.tree().is_empty());
    assert!(basic_view.checked_ids().is_empty());
    assert!(basic_view.selected_ids().is_empty());
    assert!(basic_view.visible_ids().is_empty());
    assert!(!basic_view.exists("docs"));
    assert!(basic_view.visual().is_empty());
}

// ============================================================
// Queries
// ============================================================

#[rstest]
fn given_branch_id_when_finding_then_record_carries_subtree(basic_view: TreeView) {
    // Act
    let found = basic_view.find(" MEDIA ").unwrap();

    // Assert
    assert_eq!(found.node_id.as_str(), "media");
    assert_eq!(found.nodes.len(), 1);
    assert_eq!(found.nodes[0].nodes[0].node_id.as_str(), "logo");
    assert!(basic_view.find("missing").is_none());
    assert!(basic_view.find("").is_none());
}

#[rstest]
fn given_no_selection_when_getting_selected_node_then_none(basic_view: TreeView) {
    assert!(basic_view.selected_node(false).is_none());
    assert!(basic_view.selected_node(true).is_none());
}

#[rstest]
fn given_several_selected_when_getting_selected_node_then_first_in_display_order(
    mut basic_view: TreeView,
) {
    // Arrange: "img" is selected first but "notes" comes first on screen
    basic_view.select("img", true);
    basic_view.select("notes", true);

    // Act
    let selected = basic_view.selected_node(false).unwrap();

    // Assert
    assert_eq!(selected.node_id.as_str(), "notes");
    assert!(selected.nodes.is_empty());
}

#[rstest]
#[case(false, 0)]
#[case(true, 1)]
fn given_selected_branch_when_getting_selected_node_then_children_only_on_request(
    mut basic_view: TreeView,
    #[case] include_children: bool,
    #[case] expected_children: usize,
) {
    // Arrange
    basic_view.select("img", true);

    // Act
    let selected = basic_view.selected_node(include_children).unwrap();

    // Assert
    assert_eq!(selected.node_id.as_str(), "img");
    assert_eq!(selected.nodes.len(), expected_children);
}

// ============================================================
// State propagation
// ============================================================

#[rstest]
fn given_branch_when_checking_then_descendants_are_checked(mut basic_view: TreeView) {
    // Act
    basic_view.check("docs", true);

    // Assert
    assert_eq!(ids(&basic_view.checked_ids()), vec!["logo", "docs", "report", "notes"]);
    assert!(basic_view.node("notes").unwrap().checked);
}

#[rstest]
fn given_selection_when_selecting_many_then_selection_is_replaced(mut basic_view: TreeView) {
    // Arrange
    basic_view.select("docs", true);

    // Act
    basic_view.select_many(["logo", "media", "logo"]);

    // Assert
    assert_eq!(ids(&basic_view.selected_ids()), vec!["logo", "media", "img"]);
    assert!(!basic_view.node("docs").unwrap().selected);
    assert!(!basic_view.node("report").unwrap().selected);
}

#[rstest]
fn given_checked_nodes_when_clearing_checked_then_flags_are_reset(mut basic_view: TreeView) {
    // Act
    basic_view.clear_checked();

    // Assert
    assert!(basic_view.checked_ids().is_empty());
    assert!(!basic_view.node("logo").unwrap().checked);
}

#[rstest]
fn given_branch_when_hiding_then_subtree_rows_are_hidden(mut basic_view: TreeView) {
    // Act
    basic_view.hide("media");

    // Assert
    for id in ["media", "img", "logo"] {
        assert!(basic_view.visual().find(&NodeId::new(id)).unwrap().is_hidden());
    }
    assert!(!basic_view.visual().find(&NodeId::new("docs")).unwrap().is_hidden());
    assert_eq!(basic_view.visible_ids().len(), 3);

    basic_view.show("img");
    assert!(!basic_view.visual().find(&NodeId::new("logo")).unwrap().is_hidden());
}

#[rstest]
fn given_branch_when_disabling_then_descendants_are_disabled(mut basic_view: TreeView) {
    // Act
    basic_view.enable("docs", false);

    // Assert
    assert!(basic_view.node("report").unwrap().disabled);
    let item = basic_view.visual().find(&NodeId::new("notes")).unwrap();
    assert!(item.has_class("menu-disabled"));
    assert!(item.aria_disabled);
}

#[rstest]
fn given_mixed_state_when_expanding_all_then_every_node_is_open(mut basic_view: TreeView) {
    // Act
    basic_view.expand_all();

    // Assert
    assert!(basic_view.flatten().iter().all(|r| r.expanded == Some(true)));
    let media = basic_view.visual().find(&NodeId::new("media")).unwrap();
    let expander = media.expander.as_ref().unwrap();
    assert!(expander.open);
    assert_eq!(expander.icon.src, "./assets/chevron-down-solid.svg");

    basic_view.collapse_all();
    assert!(basic_view.flatten().iter().all(|r| r.expanded == Some(false)));
}

// ============================================================
// Reordering
// ============================================================

#[test]
fn given_two_roots_when_moving_right_then_left_then_structure_round_trips() {
    // Arrange
    testing::init_test_setup();
    let mut view = TreeView::new(Settings::default());
    view.add("", "a", "", "A", "");
    view.add("", "b", "", "B", "");

    // Act
    let moved_right = view.move_right("b");

    // Assert
    assert!(moved_right);
    assert_eq!(view.node("b").unwrap().parent_id.as_str(), "a");
    assert_eq!(view.tree().len(), 1);

    // Act
    let moved_left = view.move_left("b");

    // Assert
    assert!(moved_left);
    assert!(view.node("b").unwrap().parent_id.is_empty());
    assert_eq!(flat_ids(&view), vec!["a", "b"]);
}

#[rstest]
#[case("docs", false)]
#[case("report", false)]
#[case("notes", true)]
fn given_position_when_moving_up_then_only_non_first_nodes_move(
    mut basic_view: TreeView,
    #[case] id: &str,
    #[case] expected: bool,
) {
    assert_eq!(basic_view.move_up(id), expected);
}

#[rstest]
fn given_first_root_when_moving_down_then_roots_swap(mut basic_view: TreeView) {
    // Act
    assert!(basic_view.move_down("docs"));

    // Assert
    assert_eq!(flat_ids(&basic_view)[0], "media");
    assert!(!basic_view.move_down("docs"));
}

#[rstest]
fn given_root_when_moving_left_then_rejected(mut basic_view: TreeView) {
    assert!(!basic_view.move_left("docs"));
    assert!(!basic_view.move_left("missing"));
}

// ============================================================
// Text rendering
// ============================================================

#[rstest]
fn given_state_when_rendering_text_then_markers_are_shown(mut basic_view: TreeView) {
    // Arrange
    basic_view.select("notes", true);
    basic_view.hide("report");

    // Act
    let text = treeview::application::to_text_tree(
        basic_view.arena(),
        basic_view.state(),
        basic_view.settings(),
        "basic",
    )
    .to_string();

    // Assert
    assert!(text.starts_with("basic"));
    assert!(text.contains("- Documents (docs)"));
    assert!(text.contains("+ Media (media)"));
    assert!(text.contains("*Notes (notes)"));
    assert!(text.contains("Q3 Report (report) (hidden)"));
}
