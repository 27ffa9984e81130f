pub mod engine;
pub mod farms;
pub mod locale;
pub mod registry;
pub mod resolver;

pub use locale::Localizer;
pub use registry::Registry;
