pub(crate) mod common;

mod rejection;
