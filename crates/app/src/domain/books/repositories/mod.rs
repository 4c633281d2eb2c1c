mod books;
mod reviews;

pub(crate) use books::*;
pub(crate) use reviews::*;
