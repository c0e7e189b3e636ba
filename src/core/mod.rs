pub mod convert;
pub mod etl;
pub mod poster;
pub mod reader;
pub mod scraper;

pub use crate::domain::model::{ConversionResult, MigrationReport, SourceIssue};
pub use crate::domain::ports::{ConfigProvider, IssuePoster, Pipeline, Storage};
pub use crate::utils::error::Result;
