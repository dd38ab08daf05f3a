pub mod record;
pub mod scope;
pub mod source;

pub use record::*;
pub use scope::*;
pub use source::*;
