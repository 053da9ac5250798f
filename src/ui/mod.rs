pub mod animations;
pub mod header_footer;
pub mod layout;

pub use animations::Spinner;
pub use header_footer::{Footer, FooterStatus, Header};
pub use layout::GridLayout;
