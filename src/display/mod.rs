//! # 7-Segment Display Encoding
//!
//! - [`segments`]: character → segment pattern table
//! - [`dispatch`]: sends tokens through a [`ByteSink`](crate::transport::ByteSink)

pub mod dispatch;
pub mod segments;

pub use dispatch::{DispatchReport, Dispatcher};
pub use segments::SegmentTable;
