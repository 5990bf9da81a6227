pub mod fit;
pub mod rounded;
