pub mod samples;

pub use crate::domain::model::{Note, Occurrence, PubsubMessage, Subscription};
pub use crate::domain::ports::{AnalysisApi, ConfigProvider, PubsubApi, TokenProvider};
pub use crate::utils::error::Result;
