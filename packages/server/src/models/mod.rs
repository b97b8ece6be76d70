pub mod agent;
pub mod content;
pub mod health;
pub mod search;
