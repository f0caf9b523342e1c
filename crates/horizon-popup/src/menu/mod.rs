//! Menu model: items, sections, the immutable [`MenuSpec`] and its builder.

mod builder;
mod item;
mod section;
mod spec;

pub use builder::MenuBuilder;
pub use item::{
    CustomItem, IconRef, Item, ItemActions, ItemCallback, Label, LabelItem, LayoutRef,
    ViewBoundCallback,
};
pub use section::{Section, SectionBuilder, build_sections};
pub use spec::MenuSpec;
