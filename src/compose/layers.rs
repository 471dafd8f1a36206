use crate::{
    compose::frame::FrameValues,
    geometry::{
        mask::{MaskSpec, build_auxiliary_intersection_mask, build_half_plane_lens_mask},
        spokes::build_spokes,
    },
    scene::tree::{LayerTree, LayerView, MaskDef, Node},
};

pub const MASK_A_MERGED: &str = "maskA_merged";
pub const MASK_B_MERGED: &str = "maskB_merged";
pub const MASK_A_AUX: &str = "maskA_aux";
pub const MASK_B_AUX: &str = "maskB_aux";
pub const MASK_AUX_INTERSECT: &str = "maskAux_intersect";

pub fn build_front(v: &FrameValues) -> LayerTree {
    let mut tree = LayerTree::new(LayerView::Front);
    tree.children = Node::spokes(build_spokes(&v.front_spokes()));
    tree
}

pub fn build_back(v: &FrameValues) -> LayerTree {
    let mut tree = LayerTree::new(LayerView::Back);
    tree.children = Node::spokes(build_spokes(&v.back_spokes()));
    tree
}

/// Masks A (front) and B (back) share geometry and take opposite sides, so the two rings never
/// show through the same region.
fn side_masks(v: &FrameValues, id_a: &str, id_b: &str) -> [MaskDef; 2] {
    let spec = |is_left_side| MaskSpec {
        is_left_side,
        inner_radius: v.r,
        outer_radius: v.mask_outer_radius,
        delta_offset: v.d,
        rotation_degrees: v.mask_rotation_deg,
    };

    [
        MaskDef {
            id: id_a.to_string(),
            region: build_half_plane_lens_mask(&spec(!v.inverted)),
        },
        MaskDef {
            id: id_b.to_string(),
            region: build_half_plane_lens_mask(&spec(v.inverted)),
        },
    ]
}

/// Back ring under mask B, then front ring under mask A.
fn masked_pair(v: &FrameValues, id_a: &str, id_b: &str) -> Vec<Node> {
    vec![
        Node::masked_group(id_b, Node::spokes(build_spokes(&v.back_spokes()))),
        Node::masked_group(id_a, Node::spokes(build_spokes(&v.front_spokes()))),
    ]
}

pub fn build_merged(v: &FrameValues) -> LayerTree {
    let mut tree = LayerTree::new(LayerView::Merged);
    tree.defs.extend(side_masks(v, MASK_A_MERGED, MASK_B_MERGED));
    tree.children = masked_pair(v, MASK_A_MERGED, MASK_B_MERGED);
    tree
}

pub fn build_auxiliary_masked(v: &FrameValues) -> LayerTree {
    let mut tree = LayerTree::new(LayerView::AuxiliaryMasked);
    tree.defs.extend(side_masks(v, MASK_A_AUX, MASK_B_AUX));
    tree.defs.push(MaskDef {
        id: MASK_AUX_INTERSECT.to_string(),
        region: build_auxiliary_intersection_mask(v.h),
    });
    tree.children = vec![Node::masked_group(
        MASK_AUX_INTERSECT,
        masked_pair(v, MASK_A_AUX, MASK_B_AUX),
    )];
    tree
}

pub fn build_view(view: LayerView, v: &FrameValues) -> LayerTree {
    match view {
        LayerView::Front => build_front(v),
        LayerView::Back => build_back(v),
        LayerView::Merged => build_merged(v),
        LayerView::AuxiliaryMasked => build_auxiliary_masked(v),
    }
}

/// All four views, in [`LayerView::ALL`] order.
pub fn build_all(v: &FrameValues) -> [LayerTree; 4] {
    LayerView::ALL.map(|view| build_view(view, v))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layers.rs"]
mod tests;
