pub mod etl;
pub mod pipeline;
pub mod split;

pub use crate::domain::model::{
    CityOutcome, CityPartition, Record, RecordTable, SplitReport, SplitResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
