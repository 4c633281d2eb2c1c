mod carts;
mod items;

pub(crate) use carts::*;
pub(crate) use items::*;
