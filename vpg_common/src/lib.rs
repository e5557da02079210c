mod cents;
mod secret;

pub use cents::Cents;
pub use secret::Secret;
