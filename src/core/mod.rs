pub mod fetcher;
pub mod html;
pub mod parser;

pub use crate::domain::model::{Group, GroupReport, Listing, TransferReport};
pub use crate::domain::ports::{FetchedPage, PageSource};
pub use crate::utils::error::Result;
