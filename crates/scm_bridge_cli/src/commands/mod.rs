pub(crate) mod coding;
pub(crate) mod meta;
