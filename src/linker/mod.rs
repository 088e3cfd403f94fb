pub mod annotate;
pub mod candidate;
pub mod config;
pub mod conflict;
pub mod cortex;
pub mod escape;
pub mod fold;
pub mod render;
pub mod term_index;

pub use annotate::*;
pub use candidate::*;
pub use config::*;
pub use conflict::*;
pub use cortex::*;
pub use escape::*;
pub use render::*;
pub use term_index::*;
