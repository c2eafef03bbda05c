use laboveda_core::Selection;
use std::collections::HashMap;

fn order(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[test]
fn toggle_parity_matches_odd_toggle_counts() {
    let universe = order(&["n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7", "n8", "n9"]);
    let mut selection: Selection<String> = Selection::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    // Deterministic pseudo-random walk over the universe.
    for step in 0..100usize {
        let id = universe[(step * 7 + 3) % universe.len()].clone();
        *counts.entry(id.clone()).or_insert(0) += 1;
        selection.toggle(id);
    }

    for id in &universe {
        let odd = counts.get(id).copied().unwrap_or(0) % 2 == 1;
        assert_eq!(
            selection.contains(id),
            odd,
            "{id} parity mismatch after toggle walk"
        );
    }
    let expected_len = universe
        .iter()
        .filter(|id| counts.get(*id).copied().unwrap_or(0) % 2 == 1)
        .count();
    assert_eq!(selection.len(), expected_len);
}

#[test]
fn toggle_twice_returns_to_empty() {
    let mut selection: Selection<String> = Selection::new();

    selection.toggle("n1".to_string());
    assert!(selection.contains(&"n1".to_string()));
    assert_eq!(selection.len(), 1);

    selection.toggle("n1".to_string());
    assert!(selection.is_empty());
    assert_eq!(selection.last_selected(), Some(&"n1".to_string()));
}

#[test]
fn extend_range_spans_inclusive_between_anchor_and_target() {
    let list = order(&["n1", "n2", "n3", "n4"]);
    let mut selection: Selection<String> = Selection::new();

    selection.toggle("n1".to_string());
    selection.extend_range("n3".to_string(), &list);

    assert!(selection.contains(&"n1".to_string()));
    assert!(selection.contains(&"n2".to_string()));
    assert!(selection.contains(&"n3".to_string()));
    assert!(!selection.contains(&"n4".to_string()));
    assert_eq!(selection.len(), 3);
}

#[test]
fn extend_range_endpoints_are_order_independent() {
    let list = order(&["n1", "n2", "n3", "n4"]);
    let mut selection: Selection<String> = Selection::new();

    selection.toggle("n3".to_string());
    selection.extend_range("n1".to_string(), &list);

    assert_eq!(selection.len(), 3);
    assert!(selection.contains(&"n1".to_string()));
    assert!(selection.contains(&"n2".to_string()));
    assert!(selection.contains(&"n3".to_string()));
}

#[test]
fn extend_range_keeps_selection_outside_the_span() {
    let list = order(&["n1", "n2", "n3", "n4", "n5"]);
    let mut selection: Selection<String> = Selection::new();

    selection.toggle("n5".to_string());
    selection.toggle("n1".to_string());
    selection.extend_range("n3".to_string(), &list);

    assert!(selection.contains(&"n5".to_string()), "outside span survives");
    assert_eq!(selection.len(), 4);
}

#[test]
fn extend_range_without_anchor_degrades_to_toggle() {
    let list = order(&["n1", "n2", "n3"]);
    let mut selection: Selection<String> = Selection::new();

    selection.extend_range("n2".to_string(), &list);

    assert_eq!(selection.len(), 1);
    assert!(selection.contains(&"n2".to_string()));
    assert_eq!(selection.last_selected(), Some(&"n2".to_string()));
}

#[test]
fn extend_range_retains_the_anchor() {
    let list = order(&["n1", "n2", "n3", "n4"]);
    let mut selection: Selection<String> = Selection::new();

    selection.toggle("n1".to_string());
    selection.extend_range("n4".to_string(), &list);
    assert_eq!(selection.last_selected(), Some(&"n1".to_string()));

    // Re-span from the same anchor.
    selection.extend_range("n2".to_string(), &list);
    assert_eq!(selection.len(), 4);
    assert_eq!(selection.last_selected(), Some(&"n1".to_string()));
}

#[test]
fn start_drag_collapses_to_unselected_grab() {
    let mut selection: Selection<String> = Selection::new();

    selection.toggle("n1".to_string());
    selection.toggle("n2".to_string());
    selection.start_drag(&"n4".to_string());

    assert_eq!(selection.len(), 1);
    assert!(selection.contains(&"n4".to_string()));
    assert_eq!(selection.last_selected(), Some(&"n4".to_string()));
}

#[test]
fn start_drag_keeps_existing_multiselect_when_grabbing_selected_id() {
    let mut selection: Selection<String> = Selection::new();

    selection.toggle("n1".to_string());
    selection.toggle("n2".to_string());
    selection.start_drag(&"n1".to_string());

    assert_eq!(selection.len(), 2);
    assert!(selection.contains(&"n1".to_string()));
    assert!(selection.contains(&"n2".to_string()));
}

#[test]
fn clear_empties_set_and_drops_anchor() {
    let mut selection: Selection<String> = Selection::new();

    selection.toggle("n1".to_string());
    selection.clear();

    assert!(selection.is_empty());
    assert_eq!(selection.last_selected(), None);
}

#[test]
fn batch_returns_selected_ids_in_list_order() {
    let list = order(&["n1", "n2", "n3", "n4"]);
    let mut selection: Selection<String> = Selection::new();

    selection.toggle("n3".to_string());
    selection.toggle("n1".to_string());

    assert_eq!(selection.batch(&list), order(&["n1", "n3"]));
}

#[test]
fn batch_skips_ids_missing_from_the_reference_order() {
    let list = order(&["n1", "n2"]);
    let mut selection: Selection<String> = Selection::new();

    selection.toggle("n1".to_string());
    selection.toggle("gone".to_string());

    assert_eq!(selection.batch(&list), order(&["n1"]));
}
