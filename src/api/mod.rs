pub mod employee;
pub mod health;
