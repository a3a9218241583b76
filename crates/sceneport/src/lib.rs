#![doc(html_no_source)]

mod sceneport;
pub use sceneport::Sceneport;

// Reexport all crates
pub use sceneport_convert;
pub use sceneport_foreign;
pub use sceneport_model;
pub use sceneport_resource;
pub use sceneport_texture;
pub use sceneport_transform;
