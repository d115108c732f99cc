pub mod drama;
