pub mod common;
pub mod invoice;
pub mod invoice_number;

pub use common::*;
pub use invoice::*;
pub use invoice_number::*;
