pub mod acquisition;
pub mod intake;
