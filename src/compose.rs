pub mod frame;
pub mod layers;
pub mod orchestrator;
pub mod surface;
