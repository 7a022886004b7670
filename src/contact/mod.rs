pub mod field_names;
pub mod form;
pub mod guard;
pub mod issued;
pub mod relay;

/// What a visitor typed, keyed by the real field names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
