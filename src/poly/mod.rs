pub mod coefficient;
pub mod polynomial;
