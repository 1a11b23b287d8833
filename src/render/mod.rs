mod native;
mod shared;
mod variants;

pub use native::QuadRenderer;
pub use shared::{QUAD_INDICES, QUAD_VERTICES};
pub use variants::ShaderVariant;
