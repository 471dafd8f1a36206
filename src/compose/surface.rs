use std::{collections::BTreeMap, sync::Arc};

use crate::scene::tree::{LayerTree, LayerView};

/// Receives a full replacement of one view's drawing tree. No partial patching.
pub trait DrawingSurface {
    fn replace_view(&mut self, tree: Arc<LayerTree>);
}

/// Keeps the most recent tree per view.
#[derive(Debug, Default)]
pub struct RetainedSurface {
    views: BTreeMap<LayerView, Arc<LayerTree>>,
    replacements: u64,
}

impl RetainedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self, view: LayerView) -> Option<&Arc<LayerTree>> {
        self.views.get(&view)
    }

    pub fn views(&self) -> impl Iterator<Item = &Arc<LayerTree>> {
        self.views.values()
    }

    /// Total number of replacements received across all views.
    pub fn replacements(&self) -> u64 {
        self.replacements
    }
}

impl DrawingSurface for RetainedSurface {
    fn replace_view(&mut self, tree: Arc<LayerTree>) {
        self.replacements += 1;
        self.views.insert(tree.view, tree);
    }
}

impl<S: DrawingSurface + ?Sized> DrawingSurface for &mut S {
    fn replace_view(&mut self, tree: Arc<LayerTree>) {
        (**self).replace_view(tree);
    }
}
