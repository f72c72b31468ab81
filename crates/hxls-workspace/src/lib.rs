mod conventions;
mod walk;

pub use conventions::FileConventions;
pub use walk::walk_files;
pub use walk::WalkOptions;
