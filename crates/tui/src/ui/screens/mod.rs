pub mod plan;
pub mod selector;
pub mod shop;
