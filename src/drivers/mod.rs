pub mod cst820;

pub use cst820::Cst820;
