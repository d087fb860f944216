pub mod builder;
pub mod constant;
pub mod error;
pub mod fixtures;
pub mod setup;

pub use builder::TestBuilder;
pub use error::TestError;
pub use setup::TestSetup;

// Re-exported so tests can define one-off endpoints without depending on
// mockito themselves.
pub use mockito;

pub mod prelude {
    pub use crate::{constant::*, fixtures::identity as factory, TestBuilder, TestError, TestSetup};
}
