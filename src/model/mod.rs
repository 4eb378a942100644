pub mod category;
pub mod color;
pub mod config;
pub mod id;
pub mod page;
pub mod record;
pub mod registry;
pub mod tab;
pub mod task;
pub mod workspace;

pub use category::*;
pub use color::*;
pub use config::*;
pub use id::*;
pub use page::*;
pub use record::*;
pub use registry::*;
pub use tab::*;
pub use task::*;
pub use workspace::*;
