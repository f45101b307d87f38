pub mod changes;
pub mod events;
pub mod gcal;
pub mod health;
pub mod notifications;
pub mod poi;
pub mod settings;
pub mod todos;
