//! Extension traits

mod depot;
mod pagination;
mod result;

pub(crate) use depot::DepotExt as _;
pub(crate) use pagination::{PaginationResponse, page_request};
pub(crate) use result::ResultExt as _;
