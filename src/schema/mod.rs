pub mod line;
pub mod script;
pub mod settings;
