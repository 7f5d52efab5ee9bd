pub mod curve_samples;
pub mod files;
pub mod wells;

pub use curve_samples::Entity as CurveSamples;
pub use files::Entity as Files;
pub use wells::Entity as Wells;
