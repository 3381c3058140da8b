pub mod id;
pub mod table;
pub mod value;
pub mod xml;
