pub mod descriptor;
pub mod queue;
