/// API route modules
pub mod audio;
pub mod health;
pub mod range;
pub mod verse;
