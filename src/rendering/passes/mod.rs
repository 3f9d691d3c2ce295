pub mod background_pass;
pub mod model_pass;
pub mod pass;
pub mod shadow_pass;
