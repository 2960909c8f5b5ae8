pub mod health;
pub mod journal;
pub mod recommend;
