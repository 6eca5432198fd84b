pub mod forms;
pub mod products;
