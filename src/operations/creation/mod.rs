mod extrude_profile;
mod make_box;
mod make_cylinder;
mod shell_builder;

pub use extrude_profile::{ExtrudeProfile, ProfileSegment};
pub use make_box::MakeBox;
pub use make_cylinder::MakeCylinder;
pub use shell_builder::ShellBuilder;
