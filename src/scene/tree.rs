use std::{fmt, str::FromStr};

use crate::{
    foundation::error::{FractreeError, FractreeResult},
    geometry::{mask::MaskRegion, spokes::Spoke},
};

/// The four views produced by every render.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum LayerView {
    Front,
    Back,
    Merged,
    AuxiliaryMasked,
}

impl LayerView {
    pub const ALL: [LayerView; 4] = [
        LayerView::Front,
        LayerView::Back,
        LayerView::Merged,
        LayerView::AuxiliaryMasked,
    ];

    /// Stable element id of the view, also used in output file names.
    pub fn element_id(self) -> &'static str {
        match self {
            Self::Front => "svgFront",
            Self::Back => "svgBack",
            Self::Merged => "svgMerged",
            Self::AuxiliaryMasked => "svgAuxiliaryMasked",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.element_id() == id)
    }

    /// Only the composited views can be captured to video.
    pub fn is_capturable(self) -> bool {
        matches!(self, Self::Merged | Self::AuxiliaryMasked)
    }
}

impl fmt::Display for LayerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

impl FromStr for LayerView {
    type Err = FractreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let view = match s.to_ascii_lowercase().as_str() {
            "front" => Some(Self::Front),
            "back" => Some(Self::Back),
            "merged" => Some(Self::Merged),
            "aux" | "auxiliary" | "auxiliary-masked" => Some(Self::AuxiliaryMasked),
            _ => Self::from_element_id(s),
        };
        view.ok_or_else(|| FractreeError::config(format!("unknown layer view '{s}'")))
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaskDef {
    pub id: String,
    pub region: MaskRegion,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Spoke(Spoke),
    Group {
        /// Id of a [`MaskDef`] in the owning tree.
        mask: Option<String>,
        children: Vec<Node>,
    },
}

impl Node {
    pub fn group(children: Vec<Node>) -> Self {
        Self::Group {
            mask: None,
            children,
        }
    }

    pub fn masked_group(mask: impl Into<String>, children: Vec<Node>) -> Self {
        Self::Group {
            mask: Some(mask.into()),
            children,
        }
    }

    pub fn spokes(spokes: Vec<Spoke>) -> Vec<Node> {
        spokes.into_iter().map(Node::Spoke).collect()
    }

    fn spoke_count(&self) -> usize {
        match self {
            Self::Spoke(_) => 1,
            Self::Group { children, .. } => children.iter().map(Node::spoke_count).sum(),
        }
    }
}

/// Immutable drawing instructions for one view.
///
/// Trees are rebuilt wholesale on every render; the surface receiving them decides whether to
/// diff or replace.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerTree {
    pub view: LayerView,
    pub defs: Vec<MaskDef>,
    pub children: Vec<Node>,
}

impl LayerTree {
    pub fn new(view: LayerView) -> Self {
        Self {
            view,
            defs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn spoke_count(&self) -> usize {
        self.children.iter().map(Node::spoke_count).sum()
    }

    pub fn mask(&self, id: &str) -> Option<&MaskDef> {
        self.defs.iter().find(|d| d.id == id)
    }

    /// Every mask referenced by a group is defined in `defs`.
    pub fn validate(&self) -> FractreeResult<()> {
        fn walk(tree: &LayerTree, nodes: &[Node]) -> FractreeResult<()> {
            for node in nodes {
                if let Node::Group { mask, children } = node {
                    if let Some(id) = mask
                        && tree.mask(id).is_none()
                    {
                        return Err(FractreeError::validation(format!(
                            "{}: group references undefined mask '{id}'",
                            tree.view
                        )));
                    }
                    walk(tree, children)?;
                }
            }
            Ok(())
        }
        walk(self, &self.children)
    }

    pub fn to_svg(&self) -> String {
        crate::scene::svg::write_svg(self)
    }

    pub fn to_json_pretty(&self) -> FractreeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| FractreeError::serde(e.to_string()))
    }
}
