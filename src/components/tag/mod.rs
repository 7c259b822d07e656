mod color;
mod component;

pub use color::{TagColor, tag_class};
pub use component::{CLOSABLE_BY_DEFAULT, HcTag, dismiss_handler};
