use id_arena::Id;

use crate::model::{Model, RenderModelId};

pub type SceneModelId = Id<SceneModel>;

/// A mesh in CPU form plus the handle of its GPU copy, filled in once the
/// renderer has uploaded it.
pub struct SceneModel {
    pub model: Model,
    pub render_model: Option<RenderModelId>,
}

impl SceneModel {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            render_model: None,
        }
    }
}
