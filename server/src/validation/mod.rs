pub mod slug;
pub mod text;
pub mod url;
