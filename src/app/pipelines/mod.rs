pub mod ascope_pipeline;
pub mod municipality_pipeline;
