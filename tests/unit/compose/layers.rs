use super::*;
use crate::{
    geometry::mask::{MaskPaint, MaskShape},
    params::{
        registry::ids,
        store::{ParamStore, Style},
    },
};

fn values(style: Style) -> FrameValues {
    FrameValues::resolve(&ParamStore::with_defaults(), &style)
}

fn group_masks(tree: &LayerTree) -> Vec<Option<String>> {
    tree.children
        .iter()
        .map(|n| match n {
            Node::Group { mask, .. } => mask.clone(),
            Node::Spoke(_) => None,
        })
        .collect()
}

/// Whether the mask's half-plane rectangle covers the left side (`x <= 0` in the mask frame).
fn takes_left_side(def: &MaskDef) -> bool {
    match def.region.shapes().next() {
        Some((_, MaskShape::Rect { rect, .. })) => rect.x1 <= 0.0,
        other => panic!("expected a half-plane rect, got {other:?}"),
    }
}

#[test]
fn raw_layers_carry_one_ring_each() {
    let v = values(Style::default());
    let front = build_front(&v);
    let back = build_back(&v);
    assert_eq!(front.spoke_count(), 36);
    assert_eq!(back.spoke_count(), 36);
    assert!(front.defs.is_empty() && back.defs.is_empty());

    let Node::Spoke(first) = &front.children[0] else {
        panic!("front layer holds bare spokes");
    };
    assert_eq!(first.stroke, v.front_color);
    let Node::Spoke(first) = &back.children[0] else {
        panic!("back layer holds bare spokes");
    };
    assert_eq!(first.stroke, v.back_color);
}

#[test]
fn merged_pairs_back_with_b_and_front_with_a() {
    let v = values(Style::default());
    let tree = build_merged(&v);
    tree.validate().unwrap();

    assert_eq!(
        group_masks(&tree),
        vec![Some(MASK_B_MERGED.to_string()), Some(MASK_A_MERGED.to_string())]
    );
    assert_eq!(tree.spoke_count(), 72);

    let Node::Group { children, .. } = &tree.children[1] else {
        panic!("front group");
    };
    let Node::Spoke(s) = &children[0] else {
        panic!("spoke");
    };
    assert_eq!(s.stroke, v.front_color);

    assert!(takes_left_side(tree.mask(MASK_A_MERGED).unwrap()));
    assert!(!takes_left_side(tree.mask(MASK_B_MERGED).unwrap()));
}

#[test]
fn inversion_swaps_the_mask_sides() {
    let v = values(Style {
        inverted: true,
        ..Style::default()
    });
    let tree = build_merged(&v);
    assert!(!takes_left_side(tree.mask(MASK_A_MERGED).unwrap()));
    assert!(takes_left_side(tree.mask(MASK_B_MERGED).unwrap()));
}

#[test]
fn auxiliary_view_wraps_the_pair_in_the_intersection_mask() {
    let v = values(Style::default());
    let tree = build_auxiliary_masked(&v);
    tree.validate().unwrap();

    let ids: Vec<&str> = tree.defs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec![MASK_A_AUX, MASK_B_AUX, MASK_AUX_INTERSECT]);

    assert_eq!(group_masks(&tree), vec![Some(MASK_AUX_INTERSECT.to_string())]);
    let Node::Group { children, .. } = &tree.children[0] else {
        panic!("outer group");
    };
    let inner: Vec<Option<String>> = children
        .iter()
        .map(|n| match n {
            Node::Group { mask, .. } => mask.clone(),
            Node::Spoke(_) => None,
        })
        .collect();
    assert_eq!(
        inner,
        vec![Some(MASK_B_AUX.to_string()), Some(MASK_A_AUX.to_string())]
    );
    assert_eq!(tree.spoke_count(), 72);
}

#[test]
fn non_positive_h_hides_the_auxiliary_view() {
    let mut store = ParamStore::with_defaults();
    // The registry keeps h in [50, 250]; build values directly to reach the degenerate case.
    store.set(ids::H, 100.0).unwrap();
    let mut v = FrameValues::resolve(&store, &Style::default());
    v.h = 0.0;
    let tree = build_auxiliary_masked(&v);
    assert!(tree.mask(MASK_AUX_INTERSECT).unwrap().region.reveals_nothing());

    v.h = 100.0;
    let tree = build_auxiliary_masked(&v);
    let region = &tree.mask(MASK_AUX_INTERSECT).unwrap().region;
    assert!(matches!(
        region.shapes().next(),
        Some((_, MaskShape::Lens { paint: MaskPaint::Reveal, .. }))
    ));
}

#[test]
fn every_view_is_built_in_order_and_validates() {
    let v = values(Style::default());
    let all = build_all(&v);
    for (tree, view) in all.iter().zip(LayerView::ALL) {
        assert_eq!(tree.view, view);
        tree.validate().unwrap();
        assert_eq!(build_view(view, &v), *tree);
    }
}

#[test]
fn zero_spokes_still_produce_mask_definitions() {
    let mut v = values(Style::default());
    v.count = 0;
    let tree = build_merged(&v);
    assert_eq!(tree.spoke_count(), 0);
    assert_eq!(tree.defs.len(), 2);
    assert_eq!(tree.children.len(), 2);
}
