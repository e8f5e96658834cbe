pub mod layout;
pub mod tables;

pub use layout::WorkingLayout;
