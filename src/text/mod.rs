pub mod fonts;
pub mod measure;
pub mod wrap;
