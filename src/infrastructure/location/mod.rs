//! Location infrastructure module

mod static_source;

pub use static_source::StaticLocationSource;
